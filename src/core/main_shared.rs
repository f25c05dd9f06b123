use std::env;
use std::path::PathBuf;

use clap::Parser;
use log::debug;

use crate::core::cli::{Args, Commands, PrintArgs};
use crate::core::cmds;
use crate::core::logging::init_logging;
use crate::types::AppResult;
use crate::types::config::{CliOverrides, init_with_overrides};

pub async fn run_main() -> AppResult<()> {
    let args = Args::parse();

    // Handle global arguments
    if let Some(cwd_arg) = args.cwd.as_ref() {
        let cwd = PathBuf::from(cwd_arg).canonicalize()?;
        env::set_current_dir(&cwd)?;
    }

    // Build CLI overrides for config precedence
    let mut cli_overrides = CliOverrides {
        log_level: args.log_level.clone(),
        log_color: args.log_color.clone(),
        ..Default::default()
    };
    if let Commands::Transform(transform_args) = &args.command {
        cli_overrides.lcov = transform_args.lcov.clone();
        cli_overrides.sourcemap = transform_args.sourcemap.clone();
        cli_overrides.maps = transform_args.maps.clone();
        cli_overrides.source_dir = transform_args.source_dir.clone();
        cli_overrides.output = transform_args.output.clone();
    }

    // Initialize configuration (files, then CLI overrides)
    init_with_overrides(&cli_overrides)?;

    // Initialize logging after config so level/color are applied
    init_logging();
    debug!("Current working directory: {}", env::current_dir()?.display());

    // Dispatch to appropriate command
    match args.command {
        Commands::Init => cmds::execute_init().await?,
        Commands::Transform(_) => cmds::execute_transform().await?,
        Commands::Print {
            command: print_args,
        } => match print_args {
            PrintArgs::Config(args) => {
                cmds::execute_print(cmds::print::PrintCommand::Config(args.format))?
            }
        },
    }

    Ok(())
}
