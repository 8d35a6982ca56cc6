//! CLI module - argument parsing, prompts and the interactive converter

mod args;
mod convert;
mod prompts;
mod tools;

pub use args::{Cli, Commands};
pub use convert::{error_message, run_convert, ConvertOptions};
pub use prompts::*;
pub use tools::report_tools;
