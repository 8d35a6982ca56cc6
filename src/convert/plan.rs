//! Validation of user input into a concrete conversion plan
//!
//! Everything here runs before the first side effect: a plan that was built
//! successfully is safe to execute. The only existing file it may touch is a
//! previous output archive of the same name, and that is replaced only once
//! the new archive has been written in full.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use super::{ConversionMode, ConvertError};

/// A validated conversion with every path resolved to an absolute location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionPlan {
    pub mode: ConversionMode,
    /// Canonical path of the archive being converted
    pub archive: PathBuf,
    /// Archive file name without its extension
    pub stem: OsString,
    /// Canonical working directory; intermediate dir and output live here
    pub workdir: PathBuf,
    /// Extraction target, `<workdir>/<stem>`
    pub intermediate_dir: PathBuf,
    /// Archive to produce, `<workdir>/<stem>.<7z|zip>`
    pub output: PathBuf,
    /// Where the archiver writes before the result is renamed over `output`,
    /// `<workdir>/.<stem>.partial.<7z|zip>`
    pub partial_output: PathBuf,
}

impl ConversionPlan {
    /// Validate raw prompt answers in the order the user gives them: mode first, then path.
    pub fn from_input(mode: &str, archive: &str, workdir: &Path) -> Result<Self, ConvertError> {
        let mode: ConversionMode = mode.parse()?;
        Self::new(mode, &path_from_input(archive, workdir), workdir)
    }

    /// Build a plan for converting `archive`, resolving relative paths against `workdir`.
    pub fn new(mode: ConversionMode, archive: &Path, workdir: &Path) -> Result<Self, ConvertError> {
        let workdir = fs::canonicalize(workdir).map_err(|e| {
            ConvertError::io(
                format!("Working directory {} is not accessible", workdir.display()),
                e,
            )
        })?;

        let candidate = if archive.is_absolute() {
            archive.to_path_buf()
        } else {
            workdir.join(archive)
        };
        if archive.as_os_str().is_empty() || !candidate.is_file() {
            return Err(ConvertError::FileNotFound(archive.to_path_buf()));
        }
        let archive_path = fs::canonicalize(&candidate).map_err(|e| {
            ConvertError::io(format!("Failed to resolve {}", candidate.display()), e)
        })?;

        // Name things after what the user typed, not a symlink target
        let stem = candidate
            .file_stem()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_os_string())
            .ok_or_else(|| ConvertError::MissingStem(archive.to_path_buf()))?;

        let intermediate_dir = workdir.join(&stem);
        let mut output_name = stem.clone();
        output_name.push(".");
        output_name.push(mode.output_extension());
        let output = workdir.join(output_name);

        let mut partial_name = OsString::from(".");
        partial_name.push(&stem);
        partial_name.push(".partial.");
        partial_name.push(mode.output_extension());
        let partial_output = workdir.join(partial_name);

        if output == archive_path
            || fs::canonicalize(&output).is_ok_and(|resolved| resolved == archive_path)
        {
            return Err(ConvertError::OutputIsInput(output));
        }
        for path in [&intermediate_dir, &partial_output] {
            if fs::symlink_metadata(path).is_ok() {
                return Err(ConvertError::IntermediateExists(path.clone()));
            }
        }

        Ok(Self {
            mode,
            archive: archive_path,
            stem,
            workdir,
            intermediate_dir,
            output,
            partial_output,
        })
    }

    /// Stem for display purposes
    pub fn display_stem(&self) -> String {
        self.stem.to_string_lossy().into_owned()
    }
}

/// Turn a typed path answer into a path.
///
/// Line endings are dropped. A pair of quotes around the whole answer (as
/// terminals add for dragged-in files) is removed, unless the quoted name
/// itself exists in `workdir`.
pub fn path_from_input(raw: &str, workdir: &Path) -> PathBuf {
    let trimmed = raw.trim_end_matches(|c: char| c == '\r' || c == '\n');
    let literal = PathBuf::from(trimmed);
    if workdir.join(&literal).exists() {
        return literal;
    }
    for quote in ['"', '\''] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return PathBuf::from(inner);
        }
    }
    literal
}
