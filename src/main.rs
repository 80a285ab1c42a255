use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::thread;
use std::time::{Duration, Instant};

use traffic_light::simulation::{
    CycleConfig, CycleMode, TrafficLight, TrafficLightError, CYCLE_MAX_MS, CYCLE_MIN_MS,
    CYCLE_STEP_MS,
};

#[derive(Parser)]
#[command(name = "traffic_light")]
#[command(about = "Headless traffic light with vehicles waiting for green")]
struct Cli {
    /// Number of vehicle threads waiting to cross
    #[arg(long, default_value_t = 3)]
    vehicles: usize,

    /// Shortest cycle in milliseconds
    #[arg(long, default_value_t = CYCLE_MIN_MS)]
    min_ms: u64,

    /// Longest cycle in milliseconds (exclusive)
    #[arg(long, default_value_t = CYCLE_MAX_MS)]
    max_ms: u64,

    /// Only draw durations in whole steps of --step-ms above the minimum
    #[arg(long)]
    stepped: bool,

    /// Step size used with --stepped
    #[arg(long, default_value_t = CYCLE_STEP_MS)]
    step_ms: u64,

    /// Seed for reproducible cycle durations
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn cycle_config(&self) -> CycleConfig {
        let mut config = CycleConfig::new(
            Duration::from_millis(self.min_ms),
            Duration::from_millis(self.max_ms),
        );
        if self.stepped {
            config = config.with_mode(CycleMode::Stepped {
                step: Duration::from_millis(self.step_ms),
            });
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let light = TrafficLight::with_config(cli.cycle_config())
        .context("Invalid traffic light configuration")?;
    run_headless(&light, cli.vehicles)
}

/// Run the light until every vehicle has crossed on green
fn run_headless(light: &TrafficLight, vehicles: usize) -> Result<()> {
    println!("Running traffic light in headless mode...");
    println!(
        "Vehicles: {}, Cycle: {:?}..{:?} ({:?})",
        vehicles,
        light.config().min,
        light.config().max,
        light.config().mode
    );
    println!("Initial phase: {}", light.current_phase());
    println!();

    let start = Instant::now();
    light.simulate().context("Failed to start traffic light")?;

    let crossed = thread::scope(|scope| {
        let handles: Vec<_> = (0..vehicles)
            .map(|vehicle| {
                scope.spawn(move || -> Result<(), TrafficLightError> {
                    light.wait_for_green()?;
                    println!(
                        "Vehicle {} crossed on {} after {:.1}s",
                        vehicle,
                        light.current_phase(),
                        start.elapsed().as_secs_f32()
                    );
                    Ok(())
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join())
            .filter(|result| matches!(result, Ok(Ok(()))))
            .count()
    });

    let final_phase = light.current_phase();
    light.stop();
    info!("Traffic light stopped");

    println!();
    println!("=== SIMULATION COMPLETE ===");
    println!("Vehicles crossed: {}", crossed);
    println!("Elapsed: {:.1}s", start.elapsed().as_secs_f32());
    println!("Final phase: {}", final_phase);

    if crossed < vehicles {
        anyhow::bail!("{} vehicle(s) never saw a green light", vehicles - crossed);
    }
    Ok(())
}
