//! External archiver invocation
//!
//! The [`Archiver`] trait is the seam between the conversion pipeline and the
//! tools that understand archive formats. [`ExternalArchiver`] shells out to
//! `unzip`, `7za` and `zip`; tests plug in an in-process fake.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use super::{ArchiveFormat, ConvertError};

/// Lines of tool output quoted in a failure message
const DETAIL_LINES: usize = 5;

/// Capability to extract and create archives.
///
/// Destinations passed to `compress_*` are absolute and do not exist yet.
/// Implementations must store the *contents* of `dir` at the archive root, not `dir` itself.
pub trait Archiver {
    /// Extract `archive` into the existing directory `into`.
    fn extract(&self, format: ArchiveFormat, archive: &Path, into: &Path)
        -> Result<(), ConvertError>;

    /// Create the 7z archive `dest` from the contents of `dir`.
    fn compress_to_seven_zip(&self, dir: &Path, dest: &Path) -> Result<(), ConvertError>;

    /// Create the ZIP archive `dest` from the contents of `dir`, recursively.
    fn compress_to_zip(&self, dir: &Path, dest: &Path) -> Result<(), ConvertError>;

    /// Dispatch to the compressor for `format`.
    fn compress(&self, format: ArchiveFormat, dir: &Path, dest: &Path) -> Result<(), ConvertError> {
        match format {
            ArchiveFormat::SevenZip => self.compress_to_seven_zip(dir, dest),
            ArchiveFormat::Zip => self.compress_to_zip(dir, dest),
        }
    }
}

/// Names or paths of the external programs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSet {
    /// ZIP extraction, invoked as `unzip -q <archive> -d <dir>`
    pub unzip: OsString,
    /// 7z archiver, invoked as `7za x ...` and `7za a ...`
    pub seven_zip: OsString,
    /// ZIP creation, invoked as `zip -r -q <dest> <entries>`
    pub zip: OsString,
}

impl Default for ToolSet {
    fn default() -> Self {
        Self {
            unzip: "unzip".into(),
            seven_zip: "7za".into(),
            zip: "zip".into(),
        }
    }
}

impl ToolSet {
    /// `(role, program)` pairs in pipeline order
    pub fn entries(&self) -> [(&'static str, &OsStr); 3] {
        [
            ("ZIP extraction", self.unzip.as_os_str()),
            ("7z archiver", self.seven_zip.as_os_str()),
            ("ZIP creation", self.zip.as_os_str()),
        ]
    }

    /// Resolve a program against PATH (or as a path if it contains a separator)
    pub fn locate(program: &OsStr) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// [`Archiver`] backed by real subprocesses
#[derive(Debug, Clone, Default)]
pub struct ExternalArchiver {
    tools: ToolSet,
}

impl ExternalArchiver {
    pub fn new(tools: ToolSet) -> Self {
        Self { tools }
    }

    /// Run `program` to completion in `cwd`, capturing its output.
    fn run(&self, program: &OsStr, args: &[OsString], cwd: &Path) -> Result<(), ConvertError> {
        let tool = program.to_string_lossy().into_owned();
        let resolved =
            ToolSet::locate(program).ok_or_else(|| ConvertError::ToolNotFound { tool: tool.clone() })?;

        debug!(tool = %resolved.display(), ?args, cwd = %cwd.display(), "running archiver");
        let output = Command::new(&resolved)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ConvertError::Spawn {
                tool: tool.clone(),
                source,
            })?;
        debug!(tool = %tool, status = %output.status, "archiver finished");

        if !output.status.success() {
            let detail = failure_detail(&output.stderr, &output.stdout);
            warn!(tool = %tool, status = %output.status, %detail, "archiver failed");
            return Err(ConvertError::ToolFailed {
                tool,
                status: output.status,
                detail,
            });
        }
        Ok(())
    }

    /// Arguments naming each top-level entry of `dir`, relative to `dir`.
    fn entry_args(dir: &Path) -> Result<Vec<OsString>, ConvertError> {
        let entries = top_level_entries(dir)?;
        if entries.is_empty() {
            return Err(ConvertError::EmptyArchive(dir.to_path_buf()));
        }
        Ok(entries.into_iter().map(protect_leading_dash).collect())
    }
}

impl Archiver for ExternalArchiver {
    fn extract(
        &self,
        format: ArchiveFormat,
        archive: &Path,
        into: &Path,
    ) -> Result<(), ConvertError> {
        match format {
            ArchiveFormat::Zip => {
                let args = vec![
                    OsString::from("-q"),
                    archive.as_os_str().to_os_string(),
                    OsString::from("-d"),
                    into.as_os_str().to_os_string(),
                ];
                self.run(&self.tools.unzip, &args, into)
            }
            ArchiveFormat::SevenZip => {
                let mut out_switch = OsString::from("-o");
                out_switch.push(into);
                let args = vec![
                    OsString::from("x"),
                    OsString::from("-y"),
                    out_switch,
                    archive.as_os_str().to_os_string(),
                ];
                self.run(&self.tools.seven_zip, &args, into)
            }
        }
    }

    fn compress_to_seven_zip(&self, dir: &Path, dest: &Path) -> Result<(), ConvertError> {
        let mut args = vec![
            OsString::from("a"),
            OsString::from("-y"),
            dest.as_os_str().to_os_string(),
        ];
        args.extend(Self::entry_args(dir)?);
        self.run(&self.tools.seven_zip, &args, dir)
    }

    fn compress_to_zip(&self, dir: &Path, dest: &Path) -> Result<(), ConvertError> {
        let mut args = vec![
            OsString::from("-r"),
            OsString::from("-q"),
            dest.as_os_str().to_os_string(),
        ];
        args.extend(Self::entry_args(dir)?);
        self.run(&self.tools.zip, &args, dir)
    }
}

/// Names of the entries directly inside `dir`, sorted.
pub fn top_level_entries(dir: &Path) -> Result<Vec<OsString>, ConvertError> {
    let read_dir = fs::read_dir(dir)
        .map_err(|e| ConvertError::io(format!("Failed to read {}", dir.display()), e))?;
    let mut entries = read_dir
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ConvertError::io(format!("Failed to read {}", dir.display()), e))?;
    entries.sort();
    Ok(entries)
}

/// Keep names like `-foo` or `@list` from being parsed as switches.
fn protect_leading_dash(name: OsString) -> OsString {
    let lossy = name.to_string_lossy();
    if lossy.starts_with('-') || lossy.starts_with('@') {
        let mut protected = OsString::from("./");
        protected.push(&name);
        protected
    } else {
        name
    }
}

/// Last few non-empty lines of stderr, falling back to stdout.
fn failure_detail(stderr: &[u8], stdout: &[u8]) -> String {
    let pick = |bytes: &[u8]| {
        let text = String::from_utf8_lossy(bytes);
        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        let start = lines.len().saturating_sub(DETAIL_LINES);
        lines[start..].join("; ")
    };
    let detail = pick(stderr);
    if detail.is_empty() {
        pick(stdout)
    } else {
        detail
    }
}
