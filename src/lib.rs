//! # gmg-rust-wifi
//!
//! A cross-platform Rust library for integrating Green Mountain Grills
//! WiFi pellet smokers into home-automation platforms.
//!
//! The grill and both of its food probes are exposed as thermostat-like
//! climate entities. This crate is the adapter layer: it turns the
//! controller's polled status record into climate semantics (power state,
//! current/target temperature, validated setpoint commands). The UDP wire
//! protocol and network discovery are supplied by collaborators through
//! the [`GrillDevice`] and [`GrillFactory`] traits.
//!
//! ## Features
//!
//! - **Chamber control**: power on, fan-only cool-down, power off, and
//!   validated setpoint changes for the cooking chamber
//! - **Food probes**: per-slot temperature and setpoint adapters with
//!   disconnected-slot detection
//! - **Shared snapshot cache**: one status poll fans out consistently to
//!   every adapter for the same grill
//! - **High-range decoding**: transparent handling of the controller's
//!   offset-and-flag temperature encoding
//! - **Host composition**: one call builds the full entity list from
//!   discovered or statically configured grills
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gmg_rust_wifi::{build_adapters, GrillDevice, PowerState, Result};
//!
//! async fn register(devices: Vec<Arc<dyn GrillDevice>>) -> Result<()> {
//!     // One chamber adapter and two probe adapters per grill
//!     let adapter_sets = build_adapters(devices, None).await?;
//!
//!     for set in &adapter_sets {
//!         let grill = &set.grill;
//!         println!(
//!             "{}: {} °F -> {} °F ({})",
//!             grill.unique_id(),
//!             grill.current_temperature(),
//!             grill.target_temperature(),
//!             grill.power_state()
//!         );
//!
//!         grill.set_power_state(PowerState::Heat).await?;
//!
//!         // Refused until the chamber has warmed up
//!         let outcome = grill.set_temperature(225).await;
//!         if !outcome.is_applied() {
//!             println!("setpoint not applied: {:?}", outcome);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for data types

// Public modules
pub mod cache;
pub mod command;
pub mod device;
pub mod entity;
pub mod error;
pub mod grill;
pub mod probe;
pub mod registry;
pub mod status;

// Re-exports for convenience
pub use cache::{CallbackHandle, StatusCache};
pub use command::{Rejection, SetOutcome};
pub use device::{GrillDevice, GrillFactory, GrillLimits};
pub use entity::{ClimateEntity, TemperatureUnit};
pub use error::{Error, Result};
pub use grill::{GrillClimate, MIN_CHAMBER_TEMP_F};
pub use probe::{ProbeClimate, PROBE_DISCONNECTED_RAW};
pub use registry::{
    build_adapters, setup, GrillAdapters, GrillConfig, DEFAULT_DISCOVERY_TIMEOUT, DEFAULT_NAME,
};
pub use status::{PowerState, ProbeSlot, RawTemperature, StatusSnapshot, PROBE_COUNT};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that key types are exported
        let _ = std::any::TypeId::of::<StatusCache>();
        let _ = std::any::TypeId::of::<GrillClimate>();
        let _ = std::any::TypeId::of::<ProbeClimate>();
        let _ = std::any::TypeId::of::<GrillAdapters>();
        let _ = std::any::TypeId::of::<Error>();
        let _ = std::any::TypeId::of::<StatusSnapshot>();
        let _ = std::any::TypeId::of::<PowerState>();
        let _ = std::any::TypeId::of::<SetOutcome>();
    }

    #[test]
    fn test_probe_count() {
        assert_eq!(PROBE_COUNT, 2);
        assert_eq!(ProbeSlot::MAX as usize, PROBE_COUNT);
    }
}
