//! Device and discovery contracts.
//!
//! The UDP wire protocol and network discovery live outside this crate.
//! This module defines the traits those collaborators implement and the
//! adapter layer consumes.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::status::{ProbeSlot, StatusSnapshot};

/// Advisory setpoint bounds reported by a grill.
///
/// The adapters expose these to the host for display and never validate
/// setpoint requests against them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrillLimits {
    /// Lowest chamber setpoint in °F.
    pub min_grill_temp: u16,
    /// Highest chamber setpoint in °F.
    pub max_grill_temp: u16,
    /// Lowest probe setpoint in °F.
    pub min_probe_temp: u16,
    /// Highest probe setpoint in °F.
    pub max_probe_temp: u16,
}

impl Default for GrillLimits {
    /// Bounds reported by current GMG firmware.
    fn default() -> Self {
        Self {
            min_grill_temp: 150,
            max_grill_temp: 550,
            min_probe_temp: 32,
            max_probe_temp: 257,
        }
    }
}

/// Handle to one physical grill.
///
/// Implementations own the network transport. All adapters for a grill
/// share one handle; the adapter layer adds no locking around it, so an
/// implementation must be safe to call from concurrent command paths.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GrillDevice: Send + Sync {
    /// Manufacturer serial number, e.g. "GMG7290033".
    fn serial_number(&self) -> String;

    /// Network address of the controller.
    fn address(&self) -> SocketAddr;

    /// Advisory setpoint bounds, fixed per firmware.
    fn limits(&self) -> GrillLimits;

    /// Read a fresh status record.
    ///
    /// Full refresh on every call; transport failures surface as errors.
    async fn status(&self) -> Result<StatusSnapshot>;

    /// Set the chamber target temperature in °F.
    async fn set_temp(&self, target: u16) -> Result<()>;

    /// Set a food probe's target temperature in °F.
    async fn set_temp_probe(&self, target: u16, slot: ProbeSlot) -> Result<()>;

    /// Start the igniter and auger.
    async fn power_on(&self) -> Result<()>;

    /// Shut the grill down.
    async fn power_off(&self) -> Result<()>;

    /// Start a fan-only cool-down cycle.
    async fn power_on_cool(&self) -> Result<()>;
}

/// Discovery/factory contract that yields device handles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GrillFactory: Send + Sync {
    /// Scan the local network for grills, collecting answers until the
    /// timeout elapses. An empty result is not an error.
    async fn discover(&self, timeout: Duration) -> Result<Vec<Arc<dyn GrillDevice>>>;

    /// Build handles for a statically configured address.
    async fn create(&self, host: &str, name: &str) -> Result<Vec<Arc<dyn GrillDevice>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = GrillLimits::default();
        assert_eq!(limits.min_grill_temp, 150);
        assert_eq!(limits.max_grill_temp, 550);
        assert_eq!(limits.min_probe_temp, 32);
        assert_eq!(limits.max_probe_temp, 257);
    }
}
