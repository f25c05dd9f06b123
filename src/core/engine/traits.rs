/// Which mapping to pick when none starts exactly at the queried position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    /// The closest mapping before the position
    GreatestLowerBound,
    /// The closest mapping after the position
    LeastUpperBound,
}

/// A resolved position in an original source file. `line` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPosition {
    pub source: String,
    pub line: u32,
}

/// Translates positions in generated code to positions in original sources.
pub trait PositionResolver: Send + Sync {
    /// The `sourceRoot` declared by the map, or "" when it has none.
    fn source_root(&self) -> &str;

    /// Resolve a 1-based generated line and 0-based column.
    ///
    /// Returns `None` when no mapping is found, or when the selected mapping
    /// has no original source (e.g. injected helper code).
    fn original_position_for(&self, line: u32, column: u32, bias: Bias)
    -> Option<OriginalPosition>;
}
