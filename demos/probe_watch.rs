//! Lower-level example: watch one probe slot through the shared cache
//!
//! Shows the per-grill snapshot cache directly: one writer refreshing,
//! a callback observing every refresh, and a probe adapter projecting
//! its slot from the same snapshots.
//!
//! Run with: cargo run --example probe_watch

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use gmg_rust_wifi::{
    GrillDevice, GrillLimits, ProbeClimate, ProbeSlot, Result, StatusCache, StatusSnapshot,
};

/// Minimal simulated controller: always heating, probe 1 climbing
/// toward pulled-pork territory.
struct FixedGrill {
    probe_temp: Mutex<u16>,
}

#[async_trait]
impl GrillDevice for FixedGrill {
    fn serial_number(&self) -> String {
        "GMG0424242".to_string()
    }

    fn address(&self) -> SocketAddr {
        "192.168.1.31:8080".parse().unwrap()
    }

    fn limits(&self) -> GrillLimits {
        GrillLimits::default()
    }

    async fn status(&self) -> Result<StatusSnapshot> {
        let mut probe_temp = self.probe_temp.lock();
        *probe_temp = (*probe_temp + 7).min(203);

        Ok(StatusSnapshot {
            on: 1,
            temp: 225,
            probe_temps: [*probe_temp, 89],
            probe_set_temps: [195, 0],
            ..Default::default()
        })
    }

    async fn set_temp(&self, _target: u16) -> Result<()> {
        Ok(())
    }

    async fn set_temp_probe(&self, _target: u16, _slot: ProbeSlot) -> Result<()> {
        Ok(())
    }

    async fn power_on(&self) -> Result<()> {
        Ok(())
    }

    async fn power_off(&self) -> Result<()> {
        Ok(())
    }

    async fn power_on_cool(&self) -> Result<()> {
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gmg_rust_wifi=debug".parse().unwrap()),
        )
        .init();

    let device: Arc<dyn GrillDevice> = Arc::new(FixedGrill {
        probe_temp: Mutex::new(40),
    });

    let cache = Arc::new(StatusCache::new(device.clone()).await?);
    let probe = ProbeClimate::new(device, cache.clone(), ProbeSlot::new(1));

    println!("Watching {}...", probe.unique_id());

    // Every refresh fans out to this callback
    let _handle = cache.on_refresh(|snapshot| {
        println!(
            "refresh: chamber {} °F, probe 1 raw {}",
            snapshot.chamber_temp(),
            snapshot.probe_temp(ProbeSlot::new(1))
        );
    });

    for _ in 0..10 {
        probe.update().await?;
        println!(
            "probe 1: {} °F -> {} °F (active: {})",
            probe.current_temperature(),
            probe.target_temperature(),
            probe.is_active()
        );
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    Ok(())
}
