//! Adapter composition and host registration.
//!
//! Turns factory-supplied device handles into the flat entity list a host
//! platform registers: one chamber adapter plus one adapter per probe
//! slot for every grill, all sharing a single primed snapshot cache.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::cache::StatusCache;
use crate::device::{GrillDevice, GrillFactory};
use crate::entity::ClimateEntity;
use crate::error::Result;
use crate::grill::GrillClimate;
use crate::probe::ProbeClimate;
use crate::status::ProbeSlot;

/// Display name used when the configuration does not provide one.
pub const DEFAULT_NAME: &str = "GMGGrill";

/// Network scan window used when no host is configured.
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Host-level configuration surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrillConfig {
    /// Static controller address. When absent, grills are found by
    /// scanning the local network instead.
    pub host: Option<String>,
    /// Display-name override for the chamber entity.
    pub name: Option<String>,
}

impl GrillConfig {
    /// The display name handed to the factory for a static host.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }
}

/// One grill's adapter set.
pub struct GrillAdapters {
    /// Shared snapshot cache; hosts may subscribe to its refreshes.
    pub cache: Arc<StatusCache>,
    /// Chamber adapter.
    pub grill: Arc<GrillClimate>,
    /// Probe adapters, one per slot, lowest slot first.
    pub probes: Vec<Arc<ProbeClimate>>,
}

impl GrillAdapters {
    /// Build the adapter set for one device handle.
    ///
    /// Primes the shared snapshot with an initial status read; a
    /// transport failure here fails the whole registration for this
    /// grill.
    pub async fn new(device: Arc<dyn GrillDevice>, name: Option<&str>) -> Result<Self> {
        let cache = Arc::new(StatusCache::new(device.clone()).await?);
        let grill = Arc::new(GrillClimate::new(device.clone(), cache.clone(), name));
        let probes = ProbeSlot::all()
            .map(|slot| Arc::new(ProbeClimate::new(device.clone(), cache.clone(), slot)))
            .collect();

        debug!("built adapters for grill {}", grill.unique_id());

        Ok(Self {
            cache,
            grill,
            probes,
        })
    }

    /// Flat registration list for the host platform, chamber first.
    pub fn entities(&self) -> Vec<Arc<dyn ClimateEntity>> {
        let mut entities: Vec<Arc<dyn ClimateEntity>> = vec![self.grill.clone()];
        entities.extend(
            self.probes
                .iter()
                .map(|probe| probe.clone() as Arc<dyn ClimateEntity>),
        );
        entities
    }
}

/// Compose adapter sets for a list of device handles.
///
/// Everything reachable from here goes through the handles, so the
/// composition is testable without a live network. The optional name
/// applies to each chamber entity.
pub async fn build_adapters(
    devices: Vec<Arc<dyn GrillDevice>>,
    name: Option<&str>,
) -> Result<Vec<GrillAdapters>> {
    let mut sets = Vec::with_capacity(devices.len());

    for device in devices {
        info!(
            "found grill {} at {}",
            device.serial_number(),
            device.address()
        );
        sets.push(GrillAdapters::new(device, name).await?);
    }

    Ok(sets)
}

/// Resolve devices from the configuration and compose their adapters.
///
/// A configured host skips discovery entirely; otherwise the local
/// network is scanned for [`DEFAULT_DISCOVERY_TIMEOUT`].
pub async fn setup(factory: &dyn GrillFactory, config: &GrillConfig) -> Result<Vec<GrillAdapters>> {
    let devices = match config.host.as_deref() {
        Some(host) => {
            debug!("grill configured statically at {}", host);
            factory.create(host, config.display_name()).await?
        }
        None => {
            debug!("no host configured, scanning for grills");
            factory.discover(DEFAULT_DISCOVERY_TIMEOUT).await?
        }
    };

    build_adapters(devices, config.name.as_deref()).await
}
