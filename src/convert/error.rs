//! Error types for archive conversion.
//!
//! Every failure the converter can hit, from bad user input through a
//! misbehaving archiver to a directory that refuses to be deleted, is a
//! variant of [`ConvertError`]. The CLI layer wraps these in `anyhow` and
//! turns them into a single `Error: ...` line and exit code 1.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors that can occur while validating or running a conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Mode was neither `27z` nor `2zip` (case-insensitive).
    #[error("Incorrect mode - {0} (expected 27z or 2zip)")]
    InvalidMode(String),

    /// Archive path does not reference an existing regular file.
    #[error("No such file - {}", .0.display())]
    FileNotFound(PathBuf),

    /// Path has no usable stem to name the intermediate directory after.
    #[error("Cannot derive an archive name from {}", .0.display())]
    MissingStem(PathBuf),

    /// The extraction target or partial output already exists in the working directory.
    #[error(
        "Intermediate path {} already exists; move it out of the way first",
        .0.display()
    )]
    IntermediateExists(PathBuf),

    /// The output archive would overwrite the archive being converted.
    #[error("Output {} would overwrite the input archive", .0.display())]
    OutputIsInput(PathBuf),

    /// Archiver binary could not be located.
    #[error("Archiver '{tool}' not found on PATH")]
    ToolNotFound { tool: String },

    /// Archiver binary was found but could not be started.
    #[error("Failed to run '{tool}': {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Archiver ran and reported failure.
    #[error("'{tool}' failed ({status}){}", format_detail(.detail))]
    ToolFailed {
        tool: String,
        status: ExitStatus,
        detail: String,
    },

    /// Extraction produced no entries to recompress.
    #[error("Archive {} extracted to nothing", .0.display())]
    EmptyArchive(PathBuf),

    /// Intermediate directory could not be removed after conversion.
    #[error("Failed to remove intermediate directory {}: {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other filesystem failure, with what we were doing at the time.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ConvertError::Io {
            context: context.into(),
            source,
        }
    }

    /// True for failures raised by an external archiver.
    pub fn is_subprocess(&self) -> bool {
        matches!(
            self,
            ConvertError::ToolNotFound { .. }
                | ConvertError::Spawn { .. }
                | ConvertError::ToolFailed { .. }
        )
    }
}

fn format_detail(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {}", detail)
    }
}
