use std::process::ExitCode;

use clap::Parser;
use orrery_app::{ConfigSource, PlatformDirs, build_system, run};
use orrery_config::{CliArgs, Config};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::resolve() {
        Ok(dirs) => dirs.with_config_override(args.config.clone()),
        Err(e) => {
            eprintln!("Failed to resolve platform directories: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let mut config = match Config::load_or_create(&dirs.config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    info!("Config directory: {}", dirs.config_dir.display());

    let system = match build_system(&config) {
        Ok(system) => system,
        Err(e) => {
            error!("Invalid body table: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!("Loaded {} bodies", system.len());

    let source = ConfigSource {
        dir: dirs.config_dir.clone(),
        overrides: args,
    };
    match run(config, system, Some(source)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
