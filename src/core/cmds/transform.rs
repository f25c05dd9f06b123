use std::io::{self, Write};

use log::info;

use crate::core::pipeline::{get_lcov, write_lcov};
use crate::types::AppResult;
use crate::types::config::config;

pub async fn execute_transform() -> AppResult<()> {
    let options = config().resolve_options()?;
    info!("Remapping coverage from {}", options.lcov);

    if options.output_file.is_some() {
        return write_lcov(&options).await;
    }

    let lcov = get_lcov(&options).await?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{lcov}")?;
    stdout.flush()?;
    Ok(())
}
