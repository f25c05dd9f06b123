use std::env;

use log::info;

use crate::core::engine::assemble::assemble;
use crate::core::engine::transform::transform;
use crate::core::loader;
use crate::types::{AppError, AppResult, Options};

/// Remap the coverage described by `options` and return the LCOV text.
///
/// Nothing is returned unless every input loads and parses.
pub async fn get_lcov(options: &Options) -> AppResult<String> {
    let inputs = loader::load(&options.lcov, &options.sourcemaps).await?;
    let files = transform(&inputs.reports, &inputs.maps)?;

    let source_dir = match &options.source_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir()?,
    };
    Ok(assemble(&files, &source_dir).await)
}

/// Like [`get_lcov`], then write the result to `options.output_file`.
pub async fn write_lcov(options: &Options) -> AppResult<()> {
    let output = options
        .output_file
        .as_ref()
        .ok_or_else(|| AppError::Custom("No output file configured".to_string()))?;

    let lcov = get_lcov(options).await?;
    tokio::fs::write(output, lcov)
        .await
        .map_err(|source| AppError::Write {
            path: output.clone(),
            source,
        })?;
    info!("Wrote remapped coverage to {}", output.display());
    Ok(())
}
