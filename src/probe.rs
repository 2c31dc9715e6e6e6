//! Food-probe climate adapter.
//!
//! One adapter per physical probe slot. Probes project the slot-specific
//! subset of the same shared snapshot the chamber adapter reads; they have
//! no power control of their own.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::cache::StatusCache;
use crate::command::{Rejection, SetOutcome};
use crate::device::{GrillDevice, GrillLimits};
use crate::entity::ClimateEntity;
use crate::error::Result;
use crate::status::ProbeSlot;

/// Raw reading reported for a slot with no probe plugged in.
///
/// Not confirmed by the manufacturer protocol; a connected probe could in
/// principle coincidentally read this value. Override per adapter with
/// [`ProbeClimate::with_disconnected_raw`] if a firmware reports a
/// different sentinel.
pub const PROBE_DISCONNECTED_RAW: u16 = 89;

/// Climate adapter for one food-temperature probe slot.
pub struct ProbeClimate {
    /// Shared device handle.
    device: Arc<dyn GrillDevice>,
    /// Shared snapshot cache.
    cache: Arc<StatusCache>,
    /// Slot this adapter projects.
    slot: ProbeSlot,
    /// Stable external key: `{serial}_probe_{slot}`.
    unique_id: String,
    /// Advisory setpoint bounds, read once at construction.
    limits: GrillLimits,
    /// Sentinel reading for an empty slot.
    disconnected_raw: u16,
}

impl ProbeClimate {
    /// Create a probe adapter for one slot over the shared handle and
    /// cache.
    pub fn new(device: Arc<dyn GrillDevice>, cache: Arc<StatusCache>, slot: ProbeSlot) -> Self {
        let unique_id = format!("{}_probe_{}", device.serial_number(), slot);
        let limits = device.limits();

        Self {
            device,
            cache,
            slot,
            unique_id,
            limits,
            disconnected_raw: PROBE_DISCONNECTED_RAW,
        }
    }

    /// Override the disconnected-slot sentinel reading.
    pub fn with_disconnected_raw(mut self, raw: u16) -> Self {
        self.disconnected_raw = raw;
        self
    }

    /// Stable external key: `{serial}_probe_{slot}`.
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Display name. Probes are named after their key.
    pub fn name(&self) -> &str {
        &self.unique_id
    }

    /// The slot this adapter projects.
    pub fn slot(&self) -> ProbeSlot {
        self.slot
    }

    /// Poll the grill and refresh the shared snapshot.
    ///
    /// Transport failures propagate to the host's scheduling wrapper.
    pub async fn update(&self) -> Result<()> {
        self.cache.refresh().await
    }

    /// Whether the slot is currently measuring.
    ///
    /// Derived, read-only state: the grill must be heating and the slot's
    /// raw reading must differ from the disconnected sentinel. Probes
    /// cannot be switched on or off independently.
    pub fn is_active(&self) -> bool {
        let snapshot = self.cache.snapshot();
        snapshot.on == 1 && snapshot.probe_temp(self.slot) != self.disconnected_raw
    }

    /// Current probe temperature in °F, as reported.
    pub fn current_temperature(&self) -> u16 {
        self.cache.snapshot().probe_temp(self.slot)
    }

    /// Probe target temperature in °F.
    pub fn target_temperature(&self) -> u16 {
        self.cache.snapshot().probe_set_temp(self.slot)
    }

    /// Request a new probe setpoint.
    ///
    /// Refused without a device write when the request matches the cached
    /// target for this slot or when the grill is powered off. There is no
    /// warm-up floor for probes. A failed device write is logged and
    /// absorbed into the outcome.
    pub async fn set_temperature(&self, target: u16) -> SetOutcome {
        let snapshot = self.cache.snapshot();

        if target == snapshot.probe_set_temp(self.slot) {
            debug!("probe {} already set to {} F", self.slot, target);
            return SetOutcome::Unchanged;
        }

        if snapshot.on == 0 {
            warn!("grill is not on, cannot set probe temperature");
            return SetOutcome::Rejected(Rejection::GrillOff);
        }

        debug!("setting probe {} temperature to {} F", self.slot, target);
        match self.device.set_temp_probe(target, self.slot).await {
            Ok(()) => SetOutcome::Applied,
            Err(e) => {
                error!(
                    "error setting probe {} temperature to {} F: {}",
                    self.slot, target, e
                );
                SetOutcome::Failed(e)
            }
        }
    }

    /// Lowest advisory probe setpoint in °F.
    pub fn min_temp(&self) -> u16 {
        self.limits.min_probe_temp
    }

    /// Highest advisory probe setpoint in °F.
    pub fn max_temp(&self) -> u16 {
        self.limits.max_probe_temp
    }
}

#[async_trait]
impl ClimateEntity for ProbeClimate {
    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn name(&self) -> &str {
        &self.unique_id
    }

    fn icon(&self) -> &'static str {
        "mdi:thermometer-lines"
    }

    fn min_temp(&self) -> u16 {
        self.limits.min_probe_temp
    }

    fn max_temp(&self) -> u16 {
        self.limits.max_probe_temp
    }

    fn current_temperature(&self) -> u16 {
        ProbeClimate::current_temperature(self)
    }

    fn target_temperature(&self) -> u16 {
        ProbeClimate::target_temperature(self)
    }

    async fn set_temperature(&self, target: u16) -> SetOutcome {
        ProbeClimate::set_temperature(self, target).await
    }

    async fn update(&self) -> Result<()> {
        ProbeClimate::update(self).await
    }
}

impl std::fmt::Debug for ProbeClimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeClimate")
            .field("unique_id", &self.unique_id)
            .field("slot", &self.slot)
            .field("is_active", &self.is_active())
            .finish()
    }
}
