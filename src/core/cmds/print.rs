use crate::types::AppResult;

pub mod config;

pub enum PrintCommand {
    Config(String),
}

pub fn execute_print(command: PrintCommand) -> AppResult<()> {
    match command {
        PrintCommand::Config(format) => config::execute(&format),
    }
}
