pub mod config;
mod error;
mod file;
mod report;
mod source;

pub use error::*;
pub use file::*;
pub use report::*;
pub use source::*;
