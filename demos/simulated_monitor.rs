//! Full-stack example against an in-memory simulated grill
//!
//! Run with: cargo run --example simulated_monitor

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use gmg_rust_wifi::{
    build_adapters, ClimateEntity, GrillDevice, GrillLimits, PowerState, ProbeSlot, Result,
    StatusSnapshot,
};

/// Ambient temperature the simulated chamber starts from.
const AMBIENT_F: u16 = 70;

/// Idle target the controller heats toward before a setpoint arrives.
const IDLE_TARGET_F: u16 = 150;

struct SimState {
    on: u8,
    chamber_temp: u16,
    chamber_set: u16,
    probe_temps: [u16; 2],
    probe_sets: [u16; 2],
}

/// In-memory stand-in for a grill controller. Probe slot 1 is left
/// empty; slot 2 has a probe in a brisket.
struct SimulatedGrill {
    serial: String,
    address: SocketAddr,
    state: Mutex<SimState>,
}

impl SimulatedGrill {
    fn new(serial: &str) -> Self {
        Self {
            serial: serial.to_string(),
            address: "192.168.1.30:8080".parse().unwrap(),
            state: Mutex::new(SimState {
                on: 0,
                chamber_temp: AMBIENT_F,
                chamber_set: 0,
                probe_temps: [89, 38],
                probe_sets: [0, 0],
            }),
        }
    }

    /// Split a temperature into the controller's raw byte + high flag.
    fn split(value: u16) -> (u16, u8) {
        if value >= 256 {
            (value - 256, 1)
        } else {
            (value, 0)
        }
    }
}

#[async_trait]
impl GrillDevice for SimulatedGrill {
    fn serial_number(&self) -> String {
        self.serial.clone()
    }

    fn address(&self) -> SocketAddr {
        self.address
    }

    fn limits(&self) -> GrillLimits {
        GrillLimits::default()
    }

    async fn status(&self) -> Result<StatusSnapshot> {
        let mut state = self.state.lock();

        // Each poll advances the simulation one step
        if state.on == 1 {
            let target = if state.chamber_set > 0 {
                state.chamber_set
            } else {
                IDLE_TARGET_F
            };
            state.chamber_temp = (state.chamber_temp + 25).min(target);
            state.probe_temps[1] = (state.probe_temps[1] + 10).min(203);
        } else {
            state.chamber_temp = state.chamber_temp.saturating_sub(15).max(AMBIENT_F);
        }

        let (temp, temp_high) = Self::split(state.chamber_temp);
        let (set_temp, set_temp_high) = Self::split(state.chamber_set);

        Ok(StatusSnapshot {
            on: state.on,
            temp,
            temp_high,
            grill_set_temp: set_temp,
            grill_set_temp_high: set_temp_high,
            probe_temps: state.probe_temps,
            probe_set_temps: state.probe_sets,
        })
    }

    async fn set_temp(&self, target: u16) -> Result<()> {
        self.state.lock().chamber_set = target;
        Ok(())
    }

    async fn set_temp_probe(&self, target: u16, slot: ProbeSlot) -> Result<()> {
        self.state.lock().probe_sets[slot.index()] = target;
        Ok(())
    }

    async fn power_on(&self) -> Result<()> {
        self.state.lock().on = 1;
        Ok(())
    }

    async fn power_off(&self) -> Result<()> {
        self.state.lock().on = 0;
        Ok(())
    }

    async fn power_on_cool(&self) -> Result<()> {
        self.state.lock().on = 2;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gmg_rust_wifi=debug".parse().unwrap()),
        )
        .init();

    let device: Arc<dyn GrillDevice> = Arc::new(SimulatedGrill::new("GMG7290033"));
    let sets = build_adapters(vec![device], Some("Patio Smoker")).await?;
    let set = &sets[0];

    println!("Registered entities:");
    for entity in set.entities() {
        println!(
            "  {} ({}, {}..{} {})",
            entity.unique_id(),
            entity.icon(),
            entity.min_temp(),
            entity.max_temp(),
            entity.temperature_unit()
        );
    }

    let grill = &set.grill;
    println!("\nStarting the grill...");
    grill.set_power_state(PowerState::Heat).await?;

    let mut setpoint_applied = false;
    for _ in 0..12 {
        grill.update().await?;

        println!(
            "chamber: {:3} °F -> {:3} °F ({})",
            grill.current_temperature(),
            grill.target_temperature(),
            grill.power_state()
        );

        // The chamber refuses a setpoint until it has warmed up
        if !setpoint_applied {
            let outcome = grill.set_temperature(275).await;
            println!("  set 275 °F: {:?}", outcome);
            setpoint_applied = outcome.is_applied();
        }

        for probe in &set.probes {
            if probe.is_active() {
                println!(
                    "  probe {}: {} °F -> {} °F",
                    probe.slot(),
                    probe.current_temperature(),
                    probe.target_temperature()
                );
            } else {
                println!("  probe {}: not connected", probe.slot());
            }
        }

        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    // Aim for medium-rare on the connected probe
    let outcome = set.probes[1].set_temperature(135).await;
    println!("\nprobe 2 set 135 °F: {:?}", outcome);

    println!("Shutting down with a cool-down cycle...");
    grill.set_power_state(PowerState::FanOnly).await?;
    grill.turn_off().await?;
    println!("Done! ({})", grill.power_state());

    Ok(())
}
