use std::process::ExitCode;

use clap::Parser;

use rust_orrery::config::{CliArgs, SceneConfig};
use rust_orrery::error::SceneError;
use rust_orrery::gui::{create_window, Simulation};
use rust_orrery::logging::init_logging;
use rust_orrery::model::BodyRegistry;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config = match SceneConfig::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            // Logging isn't up yet, so this goes straight to stderr
            eprintln!("failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.log_level);

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: SceneConfig) -> Result<(), SceneError> {
    let registry = match &config.assets.bodies_file {
        Some(path) => BodyRegistry::load(path)?,
        None => BodyRegistry::solar_system(),
    };
    tracing::info!(bodies = registry.len(), "loaded body registry");

    let mut window = create_window(&config)?;
    let simulation = Simulation::new(registry, &mut window, &config)?;
    window.render_loop(simulation);
    Ok(())
}
