//! Cooking-chamber climate adapter.
//!
//! Translates the polled status record into thermostat semantics for the
//! smoker's main chamber: power state, current/target temperature, and
//! validated setpoint and power commands.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::cache::StatusCache;
use crate::command::{Rejection, SetOutcome};
use crate::device::{GrillDevice, GrillLimits};
use crate::entity::ClimateEntity;
use crate::error::Result;
use crate::status::PowerState;

/// Minimum chamber temperature before a new setpoint is accepted.
///
/// The GMG manual asks for roughly 150 °F of warm-up before changing the
/// setpoint; the controller enforces 140.
pub const MIN_CHAMBER_TEMP_F: u16 = 140;

/// Climate adapter for the smoker's main cooking chamber.
pub struct GrillClimate {
    /// Shared device handle.
    device: Arc<dyn GrillDevice>,
    /// Shared snapshot cache.
    cache: Arc<StatusCache>,
    /// Stable external key: the grill serial number.
    unique_id: String,
    /// Display name.
    name: String,
    /// Advisory setpoint bounds, read once at construction.
    limits: GrillLimits,
}

impl GrillClimate {
    /// Create a chamber adapter over a shared device handle and cache.
    ///
    /// Without a display name the adapter is named after its serial
    /// number.
    pub fn new(
        device: Arc<dyn GrillDevice>,
        cache: Arc<StatusCache>,
        name: Option<&str>,
    ) -> Self {
        let unique_id = device.serial_number();
        let name = name.map(str::to_owned).unwrap_or_else(|| unique_id.clone());
        let limits = device.limits();

        Self {
            device,
            cache,
            unique_id,
            name,
            limits,
        }
    }

    /// Stable external key: the grill serial number.
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Poll the grill and refresh the shared snapshot.
    ///
    /// Transport failures propagate to the host's scheduling wrapper.
    pub async fn update(&self) -> Result<()> {
        self.cache.refresh().await
    }

    /// Current power state, decoded from the cached snapshot.
    pub fn power_state(&self) -> PowerState {
        self.cache.snapshot().power_state()
    }

    /// The power states a caller may request.
    pub fn power_states(&self) -> [PowerState; 3] {
        [PowerState::Heat, PowerState::FanOnly, PowerState::Off]
    }

    /// Current chamber temperature in °F.
    pub fn current_temperature(&self) -> u16 {
        self.cache.snapshot().chamber_temp()
    }

    /// Chamber target temperature in °F.
    pub fn target_temperature(&self) -> u16 {
        self.cache.snapshot().chamber_set_temp()
    }

    /// Request a power state change.
    ///
    /// Heat starts the igniter, FanOnly starts a cool-down cycle, Off
    /// shuts the grill down. After the command a fresh poll is triggered
    /// so reads reflect the new device state.
    pub async fn set_power_state(&self, state: PowerState) -> Result<()> {
        debug!("setting power state to {}", state);

        match state {
            PowerState::Heat => self.device.power_on().await?,
            PowerState::FanOnly => self.device.power_on_cool().await?,
            PowerState::Off => self.device.power_off().await?,
        }

        self.update().await
    }

    /// Shut the grill down.
    pub async fn turn_off(&self) -> Result<()> {
        self.set_power_state(PowerState::Off).await
    }

    /// Request a new chamber setpoint.
    ///
    /// The request is refused without a device write when it matches the
    /// cached target, when the grill is off (no automatic power-on: a
    /// setpoint must never ignite the grill), or when the chamber has not
    /// reached [`MIN_CHAMBER_TEMP_F`]. A failed device write is logged
    /// and absorbed into the outcome.
    pub async fn set_temperature(&self, target: u16) -> SetOutcome {
        let snapshot = self.cache.snapshot();

        if target == snapshot.chamber_set_temp() {
            debug!("chamber already set to {} F", target);
            return SetOutcome::Unchanged;
        }

        if snapshot.power_state().is_off() {
            warn!("grill is not on, cannot set temperature");
            return SetOutcome::Rejected(Rejection::GrillOff);
        }

        let current = snapshot.chamber_temp();
        if current < MIN_CHAMBER_TEMP_F {
            warn!(
                "chamber is only {} F, cannot set temperature before warm-up",
                current
            );
            return SetOutcome::Rejected(Rejection::ChamberTooCold { current });
        }

        debug!("setting chamber temperature to {} F", target);
        match self.device.set_temp(target).await {
            Ok(()) => SetOutcome::Applied,
            Err(e) => {
                error!("error setting chamber temperature to {} F: {}", target, e);
                SetOutcome::Failed(e)
            }
        }
    }

    /// Lowest advisory chamber setpoint in °F.
    pub fn min_temp(&self) -> u16 {
        self.limits.min_grill_temp
    }

    /// Highest advisory chamber setpoint in °F.
    pub fn max_temp(&self) -> u16 {
        self.limits.max_grill_temp
    }
}

#[async_trait]
impl ClimateEntity for GrillClimate {
    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn icon(&self) -> &'static str {
        "mdi:grill"
    }

    fn min_temp(&self) -> u16 {
        self.limits.min_grill_temp
    }

    fn max_temp(&self) -> u16 {
        self.limits.max_grill_temp
    }

    fn current_temperature(&self) -> u16 {
        GrillClimate::current_temperature(self)
    }

    fn target_temperature(&self) -> u16 {
        GrillClimate::target_temperature(self)
    }

    async fn set_temperature(&self, target: u16) -> SetOutcome {
        GrillClimate::set_temperature(self, target).await
    }

    async fn update(&self) -> Result<()> {
        GrillClimate::update(self).await
    }
}

impl std::fmt::Debug for GrillClimate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrillClimate")
            .field("unique_id", &self.unique_id)
            .field("power_state", &self.power_state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MockGrillDevice;
    use crate::error::Error;
    use crate::status::StatusSnapshot;

    const SERIAL: &str = "GMG7290033";

    fn mock_with_status(snapshot: StatusSnapshot) -> MockGrillDevice {
        let mut mock = MockGrillDevice::new();
        mock.expect_serial_number()
            .return_const(SERIAL.to_string());
        mock.expect_limits().return_const(GrillLimits::default());
        mock.expect_status().returning(move || Ok(snapshot));
        mock
    }

    async fn grill(mock: MockGrillDevice) -> GrillClimate {
        let device: Arc<dyn GrillDevice> = Arc::new(mock);
        let cache = Arc::new(StatusCache::new(device.clone()).await.unwrap());
        GrillClimate::new(device, cache, None)
    }

    fn heating(temp: u16, set_temp: u16) -> StatusSnapshot {
        StatusSnapshot {
            on: 1,
            temp,
            grill_set_temp: set_temp,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_identity_and_bounds() {
        let grill = grill(mock_with_status(heating(150, 225))).await;

        assert_eq!(grill.unique_id(), SERIAL);
        assert_eq!(grill.name(), SERIAL);
        assert_eq!(grill.min_temp(), 150);
        assert_eq!(grill.max_temp(), 550);
    }

    #[tokio::test]
    async fn test_power_state_mapping() {
        for (code, expected) in [
            (0, PowerState::Off),
            (1, PowerState::Heat),
            (2, PowerState::FanOnly),
            (7, PowerState::Off),
        ] {
            let snapshot = StatusSnapshot {
                on: code,
                ..Default::default()
            };
            let grill = grill(mock_with_status(snapshot)).await;
            assert_eq!(grill.power_state(), expected);
        }
    }

    #[tokio::test]
    async fn test_high_range_decode() {
        // {on:1, temp:150, temp_high:0, grill_set_temp:10, grill_set_temp_high:1}
        let snapshot = StatusSnapshot {
            on: 1,
            temp: 150,
            temp_high: 0,
            grill_set_temp: 10,
            grill_set_temp_high: 1,
            ..Default::default()
        };
        let grill = grill(mock_with_status(snapshot)).await;

        assert_eq!(grill.current_temperature(), 150);
        assert_eq!(grill.target_temperature(), 266);
    }

    #[tokio::test]
    async fn test_set_temperature_applied() {
        let mut mock = mock_with_status(heating(165, 150));
        mock.expect_set_temp()
            .withf(|target| *target == 225)
            .times(1)
            .returning(|_| Ok(()));

        let grill = grill(mock).await;
        assert!(grill.set_temperature(225).await.is_applied());
    }

    #[tokio::test]
    async fn test_set_temperature_unchanged_skips_device_write() {
        // No expect_set_temp: any device write would panic the mock
        let grill = grill(mock_with_status(heating(165, 225))).await;

        let outcome = grill.set_temperature(225).await;
        assert!(matches!(outcome, SetOutcome::Unchanged));
    }

    #[tokio::test]
    async fn test_set_temperature_rejected_when_off() {
        let snapshot = StatusSnapshot {
            on: 0,
            temp: 150,
            ..Default::default()
        };
        let grill = grill(mock_with_status(snapshot)).await;

        let outcome = grill.set_temperature(225).await;
        assert!(matches!(
            outcome,
            SetOutcome::Rejected(Rejection::GrillOff)
        ));
        assert_eq!(grill.target_temperature(), 0);
    }

    #[tokio::test]
    async fn test_set_temperature_rejected_below_warmup_floor() {
        let grill = grill(mock_with_status(heating(100, 150))).await;

        let outcome = grill.set_temperature(225).await;
        assert!(matches!(
            outcome,
            SetOutcome::Rejected(Rejection::ChamberTooCold { current: 100 })
        ));
    }

    #[tokio::test]
    async fn test_set_temperature_write_failure_is_absorbed() {
        let mut mock = mock_with_status(heating(165, 150));
        mock.expect_set_temp().times(1).returning(|_| {
            Err(Error::Timeout {
                operation: "set_temp".to_string(),
            })
        });

        let grill = grill(mock).await;
        assert!(grill.set_temperature(225).await.is_failed());
    }

    #[tokio::test]
    async fn test_set_power_state_commands_and_refreshes() {
        let mut mock = mock_with_status(heating(80, 0));
        mock.expect_power_on().times(1).returning(|| Ok(()));
        mock.expect_power_on_cool().times(1).returning(|| Ok(()));
        mock.expect_power_off().times(1).returning(|| Ok(()));

        let grill = grill(mock).await;
        grill.set_power_state(PowerState::Heat).await.unwrap();
        grill.set_power_state(PowerState::FanOnly).await.unwrap();
        grill.set_power_state(PowerState::Off).await.unwrap();
    }

    #[tokio::test]
    async fn test_mode_change_triggers_fresh_poll() {
        let mut seq = mockall::Sequence::new();
        let mut mock = MockGrillDevice::new();
        mock.expect_serial_number()
            .return_const(SERIAL.to_string());
        mock.expect_limits().return_const(GrillLimits::default());
        // Construction prime reads "off"
        mock.expect_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(StatusSnapshot::default()));
        mock.expect_power_on()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        // Post-command refresh reads "heating"
        mock.expect_status()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(heating(85, 0)));

        let grill = grill(mock).await;
        assert_eq!(grill.power_state(), PowerState::Off);

        grill.set_power_state(PowerState::Heat).await.unwrap();
        assert_eq!(grill.power_state(), PowerState::Heat);
    }

    #[tokio::test]
    async fn test_turn_off() {
        let mut mock = mock_with_status(heating(220, 225));
        mock.expect_power_off().times(1).returning(|| Ok(()));

        let grill = grill(mock).await;
        grill.turn_off().await.unwrap();
    }

    #[tokio::test]
    async fn test_entity_surface() {
        let grill = grill(mock_with_status(heating(150, 225))).await;
        let entity: &dyn ClimateEntity = &grill;

        assert_eq!(entity.icon(), "mdi:grill");
        assert_eq!(entity.target_temperature_step(), 1);
        assert!(entity.supports_target_temperature());
        assert_eq!(
            entity.temperature_unit(),
            crate::entity::TemperatureUnit::Fahrenheit
        );
    }
}
