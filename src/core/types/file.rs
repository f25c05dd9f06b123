use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionCoverage {
    pub name: String,
    pub hit: u64,
}

/// Coverage accumulated for one original source file.
///
/// Entries are keyed by their original position, so several generated
/// positions that collapse onto the same original line leave a single entry.
/// On collision the most recent write wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    pub path: String,
    functions: BTreeMap<u32, FunctionCoverage>,
    lines: BTreeMap<u32, u64>,
    /// Keyed by (line, block, branch) so iteration follows output order
    branches: BTreeMap<(u32, u32, u32), Option<u64>>,
}

impl File {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            functions: BTreeMap::new(),
            lines: BTreeMap::new(),
            branches: BTreeMap::new(),
        }
    }

    pub fn add_function(&mut self, name: &str, line: u32, hit: u64) {
        self.functions.insert(
            line,
            FunctionCoverage {
                name: name.to_string(),
                hit,
            },
        );
    }

    pub fn add_line(&mut self, line: u32, hit: u64) {
        self.lines.insert(line, hit);
    }

    pub fn add_branch(&mut self, block: u32, line: u32, branch: u32, taken: Option<u64>) {
        self.branches.insert((line, block, branch), taken);
    }

    pub fn functions(&self) -> impl Iterator<Item = (u32, &FunctionCoverage)> {
        self.functions.iter().map(|(line, f)| (*line, f))
    }

    pub fn lines(&self) -> impl Iterator<Item = (u32, u64)> {
        self.lines.iter().map(|(line, hit)| (*line, *hit))
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.lines.is_empty() && self.branches.is_empty()
    }

    /// Render this file as one LCOV record, without a trailing newline.
    pub fn to_lcov(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SF:{}", self.path)?;

        for (line, func) in &self.functions {
            writeln!(f, "FN:{},{}", line, func.name)?;
        }
        for func in self.functions.values() {
            writeln!(f, "FNDA:{},{}", func.hit, func.name)?;
        }
        let functions_hit = self.functions.values().filter(|func| func.hit > 0).count();
        writeln!(f, "FNF:{}", self.functions.len())?;
        writeln!(f, "FNH:{}", functions_hit)?;

        for ((line, block, branch), taken) in &self.branches {
            match taken {
                Some(taken) => writeln!(f, "BRDA:{line},{block},{branch},{taken}")?,
                None => writeln!(f, "BRDA:{line},{block},{branch},-")?,
            }
        }
        let branches_hit = self
            .branches
            .values()
            .filter(|taken| matches!(taken, Some(t) if *t > 0))
            .count();
        writeln!(f, "BRF:{}", self.branches.len())?;
        writeln!(f, "BRH:{}", branches_hit)?;

        for (line, hit) in &self.lines {
            writeln!(f, "DA:{line},{hit}")?;
        }
        let lines_hit = self.lines.values().filter(|hit| **hit > 0).count();
        writeln!(f, "LF:{}", self.lines.len())?;
        writeln!(f, "LH:{}", lines_hit)?;

        write!(f, "end_of_record")
    }
}
