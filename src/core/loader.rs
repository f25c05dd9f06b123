use std::collections::BTreeMap;

use indexmap::IndexMap;
use log::{debug, warn};
use tokio::task::JoinSet;

use crate::core::engine::resolver::SourceMapResolver;
use crate::core::lcov;
use crate::types::{AppError, AppResult, CoverageReport, Source, SourceMaps};

/// Parsed coverage and decoded source maps, joined later by module key.
pub struct Inputs {
    pub reports: IndexMap<String, CoverageReport>,
    pub maps: SourceMaps<SourceMapResolver>,
}

/// Read and parse the report and every source map concurrently. The first
/// failure aborts the whole load.
pub async fn load(lcov: &Source, sourcemaps: &SourceMaps) -> AppResult<Inputs> {
    let (reports, maps) = tokio::try_join!(load_reports(lcov), load_source_maps(sourcemaps))?;
    debug!(
        "Loaded {} coverage module(s) and {} source map(s)",
        reports.len(),
        maps.len()
    );
    Ok(Inputs { reports, maps })
}

pub async fn load_reports(source: &Source) -> AppResult<IndexMap<String, CoverageReport>> {
    let text = source.read().await?;
    let reports = lcov::parse(&text).map_err(|e| AppError::Lcov {
        origin: source.to_string(),
        source: e,
    })?;
    Ok(key_reports(reports))
}

/// Index reports by module key. A later record with the same key replaces
/// the earlier one but keeps its position.
pub fn key_reports(reports: Vec<CoverageReport>) -> IndexMap<String, CoverageReport> {
    let mut keyed = IndexMap::new();
    for report in reports {
        let key = report.module_key();
        if let Some(previous) = keyed.insert(key.clone(), report) {
            warn!(
                "Coverage for '{}' replaces earlier record '{}' with the same module key '{key}'",
                keyed[&key].file, previous.file
            );
        }
    }
    keyed
}

pub async fn load_source_map(source: Source) -> AppResult<SourceMapResolver> {
    let text = source.read().await?;
    SourceMapResolver::from_slice(text.as_bytes()).map_err(|e| AppError::SourceMap {
        origin: source.to_string(),
        source: e,
    })
}

pub async fn load_source_maps(maps: &SourceMaps) -> AppResult<SourceMaps<SourceMapResolver>> {
    match maps {
        SourceMaps::Single(source) => Ok(SourceMaps::Single(
            load_source_map(source.clone()).await?,
        )),
        SourceMaps::Keyed(sources) => {
            let mut tasks = JoinSet::new();
            for (key, source) in sources {
                let key = key.clone();
                let source = source.clone();
                tasks.spawn(async move { (key, load_source_map(source).await) });
            }

            let mut loaded = BTreeMap::new();
            while let Some(joined) = tasks.join_next().await {
                let (key, resolver) = joined
                    .map_err(|e| AppError::Custom(format!("Source map loader failed: {e}")))?;
                loaded.insert(key, resolver?);
            }
            Ok(SourceMaps::Keyed(loaded))
        }
    }
}
