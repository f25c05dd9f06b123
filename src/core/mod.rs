pub mod cli;
pub mod cmds;
pub mod engine;
pub mod lcov;
pub mod loader;
pub mod logging;
pub mod main_shared;
pub mod pipeline;
pub mod types;
