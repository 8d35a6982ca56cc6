//! Command-line argument definitions using clap

use clap::{ArgAction, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::convert::ToolSet;

use super::ConvertOptions;

/// zip7z - Convert archives between ZIP and 7z using the system archivers
#[derive(Parser, Debug)]
#[command(name = "zip7z")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Conversion mode: "27z" (ZIP to 7z) or "2zip" (7z to ZIP), case-insensitive.
    /// If not provided, will be prompted for interactively.
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Archive to convert. If not provided, will be prompted for interactively.
    #[arg(short, long)]
    pub input: Option<String>,

    /// Directory in which the intermediate directory and output archive are created.
    /// Relative archive paths are resolved against it.
    #[arg(short = 'C', long, default_value = ".")]
    pub workdir: PathBuf,

    /// ZIP extraction program
    #[arg(long, env = "ZIP7Z_UNZIP", default_value = "unzip")]
    pub unzip_bin: OsString,

    /// 7z archiver program (used for both extraction and creation)
    #[arg(long, env = "ZIP7Z_SEVENZIP", default_value = "7za")]
    pub sevenzip_bin: OsString,

    /// ZIP creation program
    #[arg(long, env = "ZIP7Z_ZIP", default_value = "zip")]
    pub zip_bin: OsString,

    /// Increase diagnostic logging on stderr (-v debug, -vv trace).
    /// RUST_LOG takes precedence when set.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Show which archiver programs are available
    Tools,
}

impl Cli {
    /// External programs selected by flags, environment, or defaults
    pub fn tool_set(&self) -> ToolSet {
        ToolSet {
            unzip: self.unzip_bin.clone(),
            seven_zip: self.sevenzip_bin.clone(),
            zip: self.zip_bin.clone(),
        }
    }

    /// Answers already given on the command line; the rest are prompted for
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            mode: self.mode.clone(),
            input: self.input.clone(),
            workdir: self.workdir.clone(),
        }
    }
}
