use std::collections::HashMap;
use std::num::NonZeroU32;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;

use traci_tls::sim::{scenarios, FixedTimeSimulator};
use traci_tls::{Connection, ConnectionConfig, SignalState, TrafficLight};

#[derive(Parser)]
#[command(name = "traci_tls")]
#[command(about = "Drive the traffic lights of a fixed-time simulation")]
struct Cli {
    /// Built-in scenario to load
    #[arg(long, default_value = "cross3ltl")]
    scenario: String,

    /// Number of simulation steps to run
    #[arg(long, default_value = "120")]
    ticks: u32,

    /// Simulated milliseconds per step
    #[arg(long, default_value = "1000")]
    step_length_ms: NonZeroU32,

    /// Only watch this traffic light (default: all of them)
    #[arg(long)]
    tls: Option<String>,

    /// State code to force on the watched lights
    #[arg(long = "override")]
    override_state: Option<String>,

    /// Step at which the override is applied
    #[arg(long, default_value = "0")]
    override_at: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let scenario = match scenarios::by_name(&cli.scenario) {
        Some(scenario) => scenario.context("failed to build scenario")?,
        None => bail!(
            "unknown scenario {:?}, expected one of {:?}",
            cli.scenario,
            scenarios::SCENARIO_NAMES
        ),
    };
    let override_state = cli
        .override_state
        .as_deref()
        .map(SignalState::from_code)
        .transpose()
        .context("invalid --override state")?;

    let simulator = FixedTimeSimulator::new(scenario, cli.step_length_ms.get());
    let network = simulator.network_description();
    let connection = Connection::new(
        simulator,
        network,
        ConnectionConfig {
            step_length_ms: cli.step_length_ms,
        },
    );

    let repository = connection.traffic_light_repository();
    let lights = match &cli.tls {
        Some(id) => vec![repository.get_by_id(id)?],
        None => repository.get_all()?,
    };

    for light in &lights {
        describe(light)?;
    }

    let mut last_phase: HashMap<String, i32> = HashMap::new();
    let mut switches = 0usize;
    loop {
        let step = connection.current_sim_step();

        if let Some(state) = &override_state {
            if step == cli.override_at {
                for light in &lights {
                    let mut query = light.change_lights_state_query();
                    query.set_value(state.clone());
                    query
                        .run()
                        .with_context(|| format!("failed to override {:?}", light.id()))?;
                    info!("Step {}: forced {} on {:?}", step, state, light.id());
                }
            }
        }

        for light in &lights {
            let phase = light.read_current_phase_index_query().get()?;
            let previous = last_phase.insert(light.id().to_owned(), phase);
            if previous != Some(phase) {
                if previous.is_some() {
                    switches += 1;
                }
                info!(
                    "Step {} ({} ms): {:?} phase {} state {} for {} ms",
                    step,
                    connection.sim_time_ms(),
                    light.id(),
                    phase,
                    light.read_current_state_query().get()?,
                    light.read_current_phase_duration_query().get()?
                );
            }
        }

        if step >= u64::from(cli.ticks) {
            break;
        }
        connection
            .advance_step()
            .with_context(|| format!("failed to advance past step {}", step))?;
    }

    info!("=== SIMULATION COMPLETE ===");
    info!("Steps run: {}", connection.current_sim_step());
    info!("Traffic lights watched: {}", lights.len());
    info!("Phase switches: {}", switches);
    Ok(())
}

fn describe(light: &TrafficLight) -> Result<()> {
    let links = light.read_controlled_links_query().get()?;
    let program = light.complete_definition_query().get()?;
    info!(
        "Traffic light {:?}: {} links, {} logics",
        light.id(),
        links.len(),
        program.logics().len()
    );
    for logic in program.logics() {
        info!(
            "  program {:?}: {} phases, cycle {} ms",
            logic.sub_id,
            logic.phases.len(),
            logic.cycle_duration()
        );
    }
    Ok(())
}
