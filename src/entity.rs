//! Host-platform entity surface.
//!
//! A home-automation host registers every adapter through this trait and
//! drives it from its own polling scheduler.

use std::fmt;

use async_trait::async_trait;

use crate::command::SetOutcome;
use crate::error::Result;

/// Temperature scale exposed to the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TemperatureUnit {
    /// Degrees Celsius.
    Celsius,
    /// Degrees Fahrenheit.
    #[default]
    Fahrenheit,
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Celsius => write!(f, "°C"),
            Self::Fahrenheit => write!(f, "°F"),
        }
    }
}

/// Common surface every registered climate entity exposes to the host.
///
/// The chamber adapter additionally carries power control; probes are
/// read-only apart from their setpoint.
#[async_trait]
pub trait ClimateEntity: Send + Sync {
    /// Stable external key for the entity.
    fn unique_id(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;

    /// Icon hint for the host UI.
    fn icon(&self) -> &'static str;

    /// The grill reports everything in Fahrenheit.
    fn temperature_unit(&self) -> TemperatureUnit {
        TemperatureUnit::Fahrenheit
    }

    /// Entities in this crate support a target temperature and nothing
    /// else.
    fn supports_target_temperature(&self) -> bool {
        true
    }

    /// Lowest advisory setpoint in °F.
    fn min_temp(&self) -> u16;

    /// Highest advisory setpoint in °F.
    fn max_temp(&self) -> u16;

    /// Setpoint granularity in degrees.
    fn target_temperature_step(&self) -> u16 {
        1
    }

    /// Current temperature in °F.
    fn current_temperature(&self) -> u16;

    /// Target temperature in °F.
    fn target_temperature(&self) -> u16;

    /// Request a new setpoint. Never propagates a device failure; see
    /// [`SetOutcome`].
    async fn set_temperature(&self, target: u16) -> SetOutcome;

    /// Poll entry point invoked by the host's scheduler. Transport
    /// failures propagate to the scheduling wrapper.
    async fn update(&self) -> Result<()>;
}
