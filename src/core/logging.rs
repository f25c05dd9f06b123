use std::io;
use std::str::FromStr;

use console::Style;
use log::{Level, LevelFilter};

use crate::types::config::{colors_enabled, config};

fn level_style(level: Level) -> Style {
    match level {
        Level::Error => Style::new().red().bold(),
        Level::Warn => Style::new().yellow(),
        Level::Info => Style::new().green(),
        Level::Debug => Style::new().blue(),
        Level::Trace => Style::new().dim(),
    }
}

/// Route the `log` facade to stderr; stdout is reserved for report output.
pub fn init_logging() {
    let log_config = config().log();
    let level = LevelFilter::from_str(log_config.level()).unwrap_or(LevelFilter::Info);
    let colors = colors_enabled();

    let result = fern::Dispatch::new()
        .format(move |out, message, record| {
            let level = format!("{:<5}", record.level());
            let level = if colors {
                level_style(record.level())
                    .force_styling(true)
                    .apply_to(level)
                    .to_string()
            } else {
                level
            };
            out.finish(format_args!(
                "{} {} {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                level,
                message
            ))
        })
        .level(level)
        // dependencies only speak up when something is wrong
        .level_for("tokio", LevelFilter::Warn)
        .chain(io::stderr())
        .apply();

    if result.is_err() {
        // a logger was already installed (e.g. by an embedding binary)
        log::debug!("Logger already initialized");
    }
}
