//! Setpoint command outcomes.
//!
//! Temperature writes never propagate a device failure to the host; the
//! outcome carries enough detail for callers to tell an applied write from
//! a validation rejection or an absorbed transport failure.

use crate::error::Error;

/// Why a setpoint request was refused before any device call was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The grill is powered off and will not accept a setpoint.
    GrillOff,
    /// The chamber has not finished warming up to the minimum
    /// temperature required for a setpoint change.
    ChamberTooCold {
        /// Decoded chamber temperature at the time of the request.
        current: u16,
    },
}

/// Result of a temperature-set request.
#[derive(Debug)]
pub enum SetOutcome {
    /// The setpoint was forwarded to the grill.
    Applied,
    /// The request matched the cached target; no device write was made.
    Unchanged,
    /// The request failed validation; no device write was made.
    Rejected(Rejection),
    /// The device write was attempted and failed. The error was logged
    /// and absorbed rather than propagated.
    Failed(Error),
}

impl SetOutcome {
    /// Check if the setpoint reached the grill.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// Check if the request was refused by validation.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Check if the device write itself failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}
