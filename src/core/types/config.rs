use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::types::{AppError, AppResult, Options, Source, SourceMaps};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LogConfig {
    pub level: Option<String>,
    pub color: Option<bool>, // None = auto-detect (semantic)
}

impl LogConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn color(&self) -> Option<bool> {
        self.color // None has semantic meaning (auto-detect)
    }

    pub fn to_effective(&self) -> Self {
        Self {
            level: Some(self.level().to_string()),
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    // Top-level fields
    pub lcov: Option<String>,
    pub sourcemap: Option<String>,
    pub source_dir: Option<String>,
    pub output: Option<String>,

    // Nested sections
    pub sourcemaps: Option<BTreeMap<String, String>>, // module key -> map path
    pub log: Option<LogConfig>,
}

impl Config {
    pub fn lcov(&self) -> Option<&str> {
        self.lcov.as_deref()
    }

    pub fn sourcemap(&self) -> Option<&str> {
        self.sourcemap.as_deref()
    }

    pub fn sourcemaps(&self) -> Option<&BTreeMap<String, String>> {
        self.sourcemaps.as_ref().filter(|maps| !maps.is_empty())
    }

    pub fn source_dir(&self) -> &str {
        self.source_dir.as_deref().unwrap_or(".")
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref() // None = print to stdout
    }

    pub fn log(&self) -> LogConfig {
        self.log.clone().unwrap_or_default()
    }

    pub fn to_effective(&self) -> Self {
        Self {
            lcov: self.lcov.clone(),
            sourcemap: self.sourcemap.clone(),
            source_dir: Some(self.source_dir().to_string()),
            output: self.output.clone(),
            sourcemaps: self.sourcemaps().cloned(),
            log: Some(self.log().to_effective()),
        }
    }

    /// Build run options; keyed maps take precedence over a single map.
    pub fn resolve_options(&self) -> AppResult<Options> {
        let lcov = self.lcov().ok_or_else(|| {
            AppError::Custom("No coverage report configured (set `lcov` or pass --lcov)".into())
        })?;

        let sourcemaps = if let Some(maps) = self.sourcemaps() {
            SourceMaps::Keyed(
                maps.iter()
                    .map(|(key, path)| (key.clone(), Source::Path(PathBuf::from(path))))
                    .collect(),
            )
        } else if let Some(map) = self.sourcemap() {
            SourceMaps::Single(Source::Path(PathBuf::from(map)))
        } else {
            return Err(AppError::Custom(
                "No source map configured (set `sourcemap`, `[sourcemaps]`, or pass --sourcemap/--map)"
                    .into(),
            ));
        };

        let mut options = Options::new(lcov, sourcemaps).source_dir(self.source_dir());
        if let Some(output) = self.output() {
            options = options.output_file(output);
        }
        Ok(options)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub lcov: Option<String>,
    pub sourcemap: Option<String>,
    pub maps: Vec<String>, // "key=path"
    pub source_dir: Option<String>,
    pub output: Option<String>,
    pub log_level: Option<String>,
    pub log_color: Option<String>, // "on" | "off"
}

pub const CONFIG_FILENAME: &str = "lcov-sourcemap.toml";

static CONFIG: OnceCell<Config> = OnceCell::new();

pub fn get_config_filename() -> &'static str {
    CONFIG_FILENAME
}

pub fn config() -> &'static Config {
    CONFIG.get_or_init(|| {
        let mut cfg = Config::default();
        // Apply nearest config file found by walking up from cwd
        if let Some(path) = find_nearest_config_file()
            && let Some(file_cfg) = read_config_file(&path)
        {
            apply_file_config(&mut cfg, &file_cfg);
        }
        cfg
    })
}

pub fn init_with_overrides(overrides: &CliOverrides) -> AppResult<()> {
    let mut cfg = Config::default();

    // 1) Config file: walk up from cwd and use the first config file found
    if let Some(path) = find_nearest_config_file()
        && let Some(file_cfg) = read_config_file(&path)
    {
        apply_file_config(&mut cfg, &file_cfg);
    }

    // 2) CLI arguments (highest priority). Only override if user specified.
    apply_cli_overrides(&mut cfg, overrides)?;

    let _ = CONFIG.set(cfg);
    Ok(())
}

fn read_config_file(path: &Path) -> Option<Config> {
    match fs::read_to_string(path) {
        Ok(contents) => toml::from_str::<Config>(&contents).ok(),
        Err(_) => None,
    }
}

fn apply_file_config(cfg: &mut Config, file: &Config) {
    // Merge top-level fields
    if file.lcov.is_some() {
        cfg.lcov = file.lcov.clone();
    }
    if file.sourcemap.is_some() {
        cfg.sourcemap = file.sourcemap.clone();
    }
    if file.source_dir.is_some() {
        cfg.source_dir = file.source_dir.clone();
    }
    if file.output.is_some() {
        cfg.output = file.output.clone();
    }

    // Merge sourcemaps section
    if let Some(file_maps) = &file.sourcemaps {
        let mut maps = cfg.sourcemaps.clone().unwrap_or_default();
        maps.extend(file_maps.iter().map(|(k, v)| (k.clone(), v.clone())));
        cfg.sourcemaps = Some(maps);
    }

    // Merge log section
    if let Some(file_log) = &file.log {
        let mut log = cfg.log.clone().unwrap_or_default();
        if file_log.level.is_some() {
            log.level = file_log.level.clone();
        }
        if file_log.color.is_some() {
            log.color = file_log.color;
        }
        cfg.log = Some(log);
    }
}

fn apply_cli_overrides(cfg: &mut Config, overrides: &CliOverrides) -> AppResult<()> {
    // Top-level overrides
    if overrides.lcov.is_some() {
        cfg.lcov = overrides.lcov.clone();
    }
    if overrides.source_dir.is_some() {
        cfg.source_dir = overrides.source_dir.clone();
    }
    if overrides.output.is_some() {
        cfg.output = overrides.output.clone();
    }

    // Source maps given on the command line replace the file's selection entirely
    if overrides.sourcemap.is_some() || !overrides.maps.is_empty() {
        cfg.sourcemap = overrides.sourcemap.clone();
        cfg.sourcemaps = if overrides.maps.is_empty() {
            None
        } else {
            let mut maps = BTreeMap::new();
            for arg in &overrides.maps {
                let (key, path) = parse_map_arg(arg)?;
                maps.insert(key, path);
            }
            Some(maps)
        };
    }

    // Log overrides
    let mut log = cfg.log.clone().unwrap_or_default();
    if let Some(level) = &overrides.log_level
        && !level.trim().is_empty()
    {
        log.level = Some(level.trim().to_string());
    }
    if let Some(color_str) = &overrides.log_color {
        match color_str.to_lowercase().as_str() {
            "on" => log.color = Some(true),
            "off" => log.color = Some(false),
            _ => {}
        }
    }
    if overrides.log_level.is_some() || overrides.log_color.is_some() {
        cfg.log = Some(log);
    }

    Ok(())
}

/// Split a `KEY=PATH` command line argument.
pub fn parse_map_arg(arg: &str) -> AppResult<(String, String)> {
    match arg.split_once('=') {
        Some((key, path)) if !key.trim().is_empty() && !path.trim().is_empty() => {
            Ok((key.trim().to_string(), path.trim().to_string()))
        }
        _ => Err(AppError::Custom(format!(
            "Invalid source map '{arg}': expected KEY=PATH"
        ))),
    }
}

fn find_nearest_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let config_filename = get_config_filename();
    for dir in cwd.ancestors() {
        let candidate = dir.join(config_filename);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

pub fn colors_enabled() -> bool {
    match config().log().color() {
        Some(force) => force,
        None => console::colors_enabled_stderr(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE_CONFIG: &str = r#"
lcov = "coverage/lcov.info"
sourcemap = "dist/app.js.map"
output = "coverage/remapped.info"

[sourcemaps]
app = "dist/app.js.map"
worker = "dist/worker.js.map"

[log]
level = "debug"
"#;

    fn file_config() -> Config {
        toml::from_str(FILE_CONFIG).expect("valid config")
    }

    #[test]
    fn test_file_config_merge() {
        let mut cfg = Config::default();
        apply_file_config(&mut cfg, &file_config());

        assert_eq!(cfg.lcov(), Some("coverage/lcov.info"));
        assert_eq!(cfg.source_dir(), ".");
        assert_eq!(cfg.sourcemaps().map(|m| m.len()), Some(2));
        assert_eq!(cfg.log().level(), "debug");
        assert_eq!(cfg.log().color(), None);
    }

    #[test]
    fn test_keyed_maps_take_precedence() {
        let mut cfg = Config::default();
        apply_file_config(&mut cfg, &file_config());

        let options = cfg.resolve_options().unwrap();
        match options.sourcemaps {
            SourceMaps::Keyed(maps) => {
                assert_eq!(
                    maps.get("worker"),
                    Some(&Source::Path(PathBuf::from("dist/worker.js.map")))
                );
            }
            other => panic!("expected keyed maps, got {other:?}"),
        }
        assert_eq!(
            options.output_file,
            Some(PathBuf::from("coverage/remapped.info"))
        );
        assert_eq!(options.source_dir, Some(PathBuf::from(".")));
    }

    #[test]
    fn test_cli_sourcemap_replaces_file_selection() {
        let mut cfg = Config::default();
        apply_file_config(&mut cfg, &file_config());
        let overrides = CliOverrides {
            sourcemap: Some("out/single.js.map".to_string()),
            log_color: Some("off".to_string()),
            ..Default::default()
        };
        apply_cli_overrides(&mut cfg, &overrides).unwrap();

        assert!(cfg.sourcemaps().is_none());
        assert_eq!(cfg.log().color(), Some(false));
        assert_eq!(cfg.log().level(), "debug");
        let options = cfg.resolve_options().unwrap();
        assert_eq!(
            options.sourcemaps,
            SourceMaps::Single(Source::Path(PathBuf::from("out/single.js.map")))
        );
    }

    #[test]
    fn test_cli_maps() {
        let mut cfg = Config::default();
        let overrides = CliOverrides {
            lcov: Some("lcov.info".to_string()),
            maps: vec!["main=dist/main.js.map".to_string()],
            ..Default::default()
        };
        apply_cli_overrides(&mut cfg, &overrides).unwrap();
        assert_eq!(
            cfg.sourcemaps().and_then(|m| m.get("main")).map(String::as_str),
            Some("dist/main.js.map")
        );

        let bad = CliOverrides {
            maps: vec!["no-separator".to_string()],
            ..Default::default()
        };
        assert!(apply_cli_overrides(&mut Config::default(), &bad).is_err());
    }

    #[test]
    fn test_missing_inputs_are_reported() {
        assert!(Config::default().resolve_options().is_err());

        let cfg = Config {
            lcov: Some("lcov.info".to_string()),
            ..Default::default()
        };
        assert!(cfg.resolve_options().is_err());
    }

    #[test]
    fn test_parse_map_arg() {
        assert_eq!(
            parse_map_arg("bundle = dist/bundle.js.map").unwrap(),
            ("bundle".to_string(), "dist/bundle.js.map".to_string())
        );
        assert!(parse_map_arg("=x").is_err());
        assert!(parse_map_arg("x=").is_err());
    }
}
