use indexmap::IndexMap;
use log::{debug, info};
use regex::Regex;

use crate::core::engine::traits::{Bias, OriginalPosition, PositionResolver};
use crate::types::{AppResult, CoverageReport, File, SourceMaps};

/// Original files keyed by their relative path, in first-seen order.
pub type FileSet = IndexMap<String, File>;

/// Turns resolved sources into the relative paths used as `SF:` values by
/// replacing the map's `sourceRoot` with `./`.
struct SourceRoot {
    pattern: Option<Regex>,
}

impl SourceRoot {
    fn new(root: &str) -> AppResult<Self> {
        let pattern = if root.is_empty() {
            None
        } else {
            Some(Regex::new(&format!("^{}/?", regex::escape(root)))?)
        };
        Ok(Self { pattern })
    }

    /// Sources outside the root are returned unchanged.
    fn relative_path(&self, source: &str) -> String {
        let stripped = match &self.pattern {
            Some(pattern) if pattern.is_match(source) => pattern.replace(source, ""),
            Some(_) => return source.to_string(),
            None => source.into(),
        };
        let stripped = stripped.trim_start_matches("./").trim_start_matches('/');
        format!("./{stripped}")
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransformStats {
    pub modules: usize,
    pub unmatched_modules: usize,
    pub resolved: usize,
    pub dropped: usize,
}

/// Remap every report through the source map sharing its module key.
///
/// Reports without a matching map are skipped. Entries that do not resolve
/// to an original source are dropped. Files are shared across modules, so two
/// bundles that both contain `./src/util.js` feed a single record.
pub fn transform<R: PositionResolver>(
    reports: &IndexMap<String, CoverageReport>,
    maps: &SourceMaps<R>,
) -> AppResult<FileSet> {
    let mut files = FileSet::new();
    let mut stats = TransformStats::default();

    for (key, report) in reports {
        let Some(resolver) = maps.get(key) else {
            debug!("No source map for module '{key}' ({}), skipping", report.file);
            stats.unmatched_modules += 1;
            continue;
        };
        stats.modules += 1;
        transform_module(report, resolver, &mut files, &mut stats)?;
    }

    info!(
        "Remapped {} module(s) into {} original file(s): {} entries resolved, {} dropped",
        stats.modules,
        files.len(),
        stats.resolved,
        stats.dropped
    );
    if stats.unmatched_modules > 0 {
        info!(
            "Skipped {} module(s) without a source map",
            stats.unmatched_modules
        );
    }

    Ok(files)
}

fn transform_module<R: PositionResolver>(
    report: &CoverageReport,
    resolver: &R,
    files: &mut FileSet,
    stats: &mut TransformStats,
) -> AppResult<()> {
    let root = SourceRoot::new(resolver.source_root())?;

    let mut resolve = |line: u32| -> Option<(String, u32)> {
        match resolver.original_position_for(line, 0, Bias::LeastUpperBound) {
            Some(OriginalPosition { source, line }) => {
                stats.resolved += 1;
                Some((root.relative_path(&source), line))
            }
            None => {
                debug!("{}:{line} has no original position", report.file);
                stats.dropped += 1;
                None
            }
        }
    };

    for func in &report.functions.details {
        if let Some((path, line)) = resolve(func.line) {
            file_entry(files, path).add_function(&func.name, line, func.hit);
        }
    }

    for da in &report.lines.details {
        if let Some((path, line)) = resolve(da.line) {
            file_entry(files, path).add_line(line, da.hit);
        }
    }

    for brda in &report.branches.details {
        if let Some((path, line)) = resolve(brda.line) {
            file_entry(files, path).add_branch(brda.block, line, brda.branch, brda.taken);
        }
    }

    Ok(())
}

fn file_entry(files: &mut FileSet, path: String) -> &mut File {
    files
        .entry(path)
        .or_insert_with_key(|path| File::new(path.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_strips_source_root() {
        let root = SourceRoot::new("/home/dev/project/").unwrap();
        assert_eq!(root.relative_path("/home/dev/project/src/a.js"), "./src/a.js");

        let root = SourceRoot::new("/home/dev/project").unwrap();
        assert_eq!(root.relative_path("/home/dev/project/src/a.js"), "./src/a.js");
    }

    #[test]
    fn test_relative_path_escapes_root() {
        // '.' must match literally, not any character
        let root = SourceRoot::new("a.b").unwrap();
        assert_eq!(root.relative_path("a.b/x.js"), "./x.js");
        assert_eq!(root.relative_path("axb/x.js"), "axb/x.js");
    }

    #[test]
    fn test_relative_path_keeps_sources_outside_root() {
        let root = SourceRoot::new("/build").unwrap();
        assert_eq!(root.relative_path("/elsewhere/a.js"), "/elsewhere/a.js");
        assert_eq!(root.relative_path("/build/src/a.js"), "./src/a.js");
    }

    #[test]
    fn test_relative_path_without_root() {
        let root = SourceRoot::new("").unwrap();
        assert_eq!(root.relative_path("src/a.js"), "./src/a.js");
        assert_eq!(root.relative_path("./src/a.js"), "./src/a.js");
        assert_eq!(root.relative_path("../lib/a.js"), "./../lib/a.js");
    }
}
