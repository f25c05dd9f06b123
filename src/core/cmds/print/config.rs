use log::info;

use crate::types::AppResult;
use crate::types::config::config;

pub fn execute(format: &str) -> AppResult<()> {
    let effective_config = config().to_effective();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&effective_config)?),
        "toml" => print!("{}", toml::to_string_pretty(&effective_config)?),
        _ => {
            // Table format
            info!("Effective Configuration:");
            info!("");
            info!("Inputs:");
            info!(
                "  lcov: {}",
                effective_config.lcov.as_deref().unwrap_or("(not set)")
            );
            match (&effective_config.sourcemaps, &effective_config.sourcemap) {
                (Some(maps), _) => {
                    info!("  sourcemaps:");
                    for (key, path) in maps {
                        info!("    {key}: {path}");
                    }
                }
                (None, Some(map)) => info!("  sourcemap: {map} (all modules)"),
                (None, None) => info!("  sourcemap: (not set)"),
            }

            info!("");
            info!("Output:");
            info!(
                "  source_dir: {}",
                effective_config.source_dir.as_deref().unwrap_or(".")
            );
            info!(
                "  output: {}",
                effective_config.output.as_deref().unwrap_or("(stdout)")
            );

            info!("");
            info!("Log:");
            if let Some(log) = &effective_config.log {
                info!("  level: {}", log.level.as_deref().unwrap_or("info"));
                match log.color {
                    Some(true) => info!("  color: on"),
                    Some(false) => info!("  color: off"),
                    None => info!("  color: auto"),
                }
            }
        }
    }

    Ok(())
}
