pub mod core;

// Re-export key items for easy importing in this crate
pub use crate::core::types;

// Re-export key items for easy importing in other crates
pub use crate::core::engine::assemble::assemble;
pub use crate::core::engine::resolver::SourceMapResolver;
pub use crate::core::engine::traits::{Bias, OriginalPosition, PositionResolver};
pub use crate::core::engine::transform::{FileSet, transform};
pub use crate::core::main_shared::run_main;
pub use crate::core::pipeline::{get_lcov, write_lcov};
