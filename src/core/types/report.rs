use std::path::Path;

use serde::Serialize;

/// A function entry from an `FN:`/`FNDA:` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDetail {
    pub name: String,
    pub line: u32,
    pub hit: u64,
}

/// An executable line entry from `DA:`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDetail {
    pub line: u32,
    pub hit: u64,
}

/// A branch entry from `BRDA:`. `taken` is `None` when the report
/// wrote `-` (the branch was never evaluated).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchDetail {
    pub line: u32,
    pub block: u32,
    pub branch: u32,
    pub taken: Option<u64>,
}

/// Declared found/hit totals plus the per-entry details of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section<T> {
    pub found: u64,
    pub hit: u64,
    pub details: Vec<T>,
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Self {
            found: 0,
            hit: 0,
            details: Vec::new(),
        }
    }
}

/// Coverage of one compiled module, i.e. one `SF:` record of the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    pub title: String,
    pub file: String,
    pub functions: Section<FunctionDetail>,
    pub lines: Section<LineDetail>,
    pub branches: Section<BranchDetail>,
}

impl CoverageReport {
    /// Key pairing this report with its source map: the basename of the
    /// declared file with the final extension removed.
    pub fn module_key(&self) -> String {
        module_key(&self.file)
    }
}

/// `dist/bundle.js` -> `bundle`, `a.min.js` -> `a.min`.
pub fn module_key(file: &str) -> String {
    // LCOV written on Windows keeps backslashes, which `Path` only splits on there
    let file = file.rsplit(['/', '\\']).next().unwrap_or(file);
    Path::new(file)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
