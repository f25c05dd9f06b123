use std::path::PathBuf;

use log::{info, warn};

use crate::types::config::{Config, get_config_filename};
use crate::types::{AppError, AppResult};

const EXAMPLE_CONFIG: &str = include_str!("../../../example.toml");

pub async fn execute_init() -> AppResult<()> {
    let config_filename = get_config_filename();
    let cfg_path = PathBuf::from(config_filename);

    let contents = if tokio::fs::try_exists(&cfg_path).await? {
        warn!("{config_filename} already exists; leaving it unchanged");
        tokio::fs::read_to_string(&cfg_path).await?
    } else {
        tokio::fs::write(&cfg_path, EXAMPLE_CONFIG).await?;
        info!("Created {}", cfg_path.display());
        EXAMPLE_CONFIG.to_string()
    };

    let cfg: Config = toml::from_str(&contents)
        .map_err(|e| AppError::Custom(format!("Invalid {config_filename}: {e}")))?;
    for (what, path) in expected_inputs(&cfg) {
        if path.exists() {
            info!("  {what}: {}", path.display());
        } else {
            warn!("  {what}: {} (not found yet)", path.display());
        }
    }

    Ok(())
}

/// Input files a config points at, labelled for display.
fn expected_inputs(cfg: &Config) -> Vec<(String, PathBuf)> {
    let mut inputs = Vec::new();
    if let Some(lcov) = cfg.lcov() {
        inputs.push(("coverage report".to_string(), PathBuf::from(lcov)));
    }
    match (cfg.sourcemaps(), cfg.sourcemap()) {
        (Some(maps), _) => {
            for (key, path) in maps {
                inputs.push((format!("source map for '{key}'"), PathBuf::from(path)));
            }
        }
        (None, Some(map)) => inputs.push(("source map".to_string(), PathBuf::from(map))),
        (None, None) => {}
    }
    inputs
}
