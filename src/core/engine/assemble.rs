use std::path::{Path, PathBuf};

use log::{debug, info};
use tokio::task::JoinSet;

use crate::core::engine::transform::FileSet;

/// Probe whether `source_dir/path` exists. Any failure counts as absent.
async fn exists(source_dir: PathBuf, path: String) -> bool {
    let full = source_dir.join(&path);
    match tokio::fs::try_exists(&full).await {
        Ok(found) => found,
        Err(e) => {
            debug!("Could not check {}: {e}", full.display());
            false
        }
    }
}

/// Serialize every file whose original source still exists under
/// `source_dir`, in insertion order, one record per file.
pub async fn assemble(files: &FileSet, source_dir: &Path) -> String {
    let mut probes = JoinSet::new();
    for (idx, path) in files.keys().enumerate() {
        let source_dir = source_dir.to_path_buf();
        let path = path.clone();
        probes.spawn(async move { (idx, exists(source_dir, path).await) });
    }

    let mut present = vec![false; files.len()];
    while let Some(probe) = probes.join_next().await {
        match probe {
            Ok((idx, found)) => present[idx] = found,
            // a probe that panicked leaves its file marked absent
            Err(e) => debug!("Existence check failed: {e}"),
        }
    }

    let records: Vec<String> = files
        .values()
        .zip(&present)
        .filter_map(|(file, keep)| {
            if *keep {
                Some(file.to_lcov())
            } else {
                debug!(
                    "Dropping {}: not found under {}",
                    file.path,
                    source_dir.display()
                );
                None
            }
        })
        .collect();

    info!(
        "Assembled {} of {} file(s) from {}",
        records.len(),
        files.len(),
        source_dir.display()
    );

    records.join("\n")
}
