//! Extract → compress → cleanup for a single validated plan

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{info, warn};
use walkdir::WalkDir;

use super::{top_level_entries, Archiver, ConversionPlan, ConvertError};

/// Steps after validation, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Compress,
    Cleanup,
}

impl Stage {
    pub fn number(self) -> u8 {
        match self {
            Stage::Extract => 1,
            Stage::Compress => 2,
            Stage::Cleanup => 3,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extract => write!(f, "Extract"),
            Stage::Compress => write!(f, "Compress"),
            Stage::Cleanup => write!(f, "Cleanup"),
        }
    }
}

/// Hooks for reporting pipeline progress. All methods default to no-ops.
pub trait StageObserver {
    fn stage_started(&mut self, _stage: Stage, _plan: &ConversionPlan) {}
    fn stage_finished(&mut self, _stage: Stage, _elapsed: Duration) {}
    fn stage_failed(&mut self, _stage: Stage, _error: &ConvertError) {}
    fn output_replaced(&mut self, _output: &Path) {}
}

impl StageObserver for () {}

/// Wall-clock time spent in each stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageTimings {
    pub extract: Duration,
    pub compress: Duration,
    pub cleanup: Duration,
}

impl StageTimings {
    pub fn total(&self) -> Duration {
        self.extract + self.compress + self.cleanup
    }
}

/// Result of a successful conversion
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub plan: ConversionPlan,
    /// Entries directly under the intermediate directory
    pub entries: usize,
    /// Regular files anywhere under the intermediate directory
    pub files: usize,
    pub bytes_in: u64,
    pub bytes_out: u64,
    /// An older archive at the output path was replaced
    pub replaced_output: bool,
    pub timings: StageTimings,
}

/// Run the conversion described by `plan`.
///
/// The archiver writes to `plan.partial_output`, which is renamed over
/// `plan.output` only once compression succeeded, so a pre-existing output
/// survives any failure. On an extract or compress failure the intermediate
/// directory and partial output are removed best-effort. A cleanup failure
/// after a successful compress is returned as [`ConvertError::Cleanup`] and
/// the output archive stays where it is.
pub fn run_conversion<A, O>(
    plan: &ConversionPlan,
    archiver: &A,
    observer: &mut O,
) -> Result<ConversionOutcome, ConvertError>
where
    A: Archiver + ?Sized,
    O: StageObserver + ?Sized,
{
    info!(
        mode = %plan.mode,
        archive = %plan.archive.display(),
        output = %plan.output.display(),
        "starting conversion"
    );
    let bytes_in = file_size(&plan.archive);
    let mut timings = StageTimings::default();

    fs::create_dir(&plan.intermediate_dir).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => {
            ConvertError::IntermediateExists(plan.intermediate_dir.clone())
        }
        _ => ConvertError::io(
            format!("Failed to create {}", plan.intermediate_dir.display()),
            e,
        ),
    })?;

    // Extract
    let ((entries, files), elapsed) = run_stage(Stage::Extract, plan, observer, || {
        archiver.extract(
            plan.mode.source_format(),
            &plan.archive,
            &plan.intermediate_dir,
        )?;
        let entries = top_level_entries(&plan.intermediate_dir)?.len();
        if entries == 0 {
            return Err(ConvertError::EmptyArchive(plan.archive.clone()));
        }
        Ok((entries, count_files(&plan.intermediate_dir)))
    })
    .inspect_err(|_| discard_intermediate(&plan.intermediate_dir))?;
    timings.extract = elapsed;
    info!(entries, files, "extracted");

    // Compress
    let mut replaced_output = false;
    let ((), elapsed) = run_stage(Stage::Compress, plan, observer, || {
        archiver
            .compress(
                plan.mode.target_format(),
                &plan.intermediate_dir,
                &plan.partial_output,
            )
            .inspect_err(|_| discard_partial(&plan.partial_output))?;

        replaced_output = fs::symlink_metadata(&plan.output).is_ok();
        fs::rename(&plan.partial_output, &plan.output).map_err(|e| {
            discard_partial(&plan.partial_output);
            ConvertError::io(
                format!("Failed to move new archive into place at {}", plan.output.display()),
                e,
            )
        })
    })
    .inspect_err(|_| discard_intermediate(&plan.intermediate_dir))?;
    timings.compress = elapsed;
    if replaced_output {
        warn!(output = %plan.output.display(), "replaced existing archive");
        observer.output_replaced(&plan.output);
    }

    // Cleanup
    let ((), elapsed) = run_stage(Stage::Cleanup, plan, observer, || {
        fs::remove_dir_all(&plan.intermediate_dir).map_err(|source| ConvertError::Cleanup {
            path: plan.intermediate_dir.clone(),
            source,
        })
    })?;
    timings.cleanup = elapsed;

    let bytes_out = file_size(&plan.output);
    info!(bytes_in, bytes_out, "conversion complete");

    Ok(ConversionOutcome {
        plan: plan.clone(),
        entries,
        files,
        bytes_in,
        bytes_out,
        replaced_output,
        timings,
    })
}

fn run_stage<T, O, F>(
    stage: Stage,
    plan: &ConversionPlan,
    observer: &mut O,
    body: F,
) -> Result<(T, Duration), ConvertError>
where
    O: StageObserver + ?Sized,
    F: FnOnce() -> Result<T, ConvertError>,
{
    observer.stage_started(stage, plan);
    let start = Instant::now();
    match body() {
        Ok(value) => {
            let elapsed = start.elapsed();
            observer.stage_finished(stage, elapsed);
            Ok((value, elapsed))
        }
        Err(err) => {
            observer.stage_failed(stage, &err);
            Err(err)
        }
    }
}

/// Remove a half-populated intermediate directory after a failed stage.
fn discard_intermediate(dir: &Path) {
    if let Err(e) = fs::remove_dir_all(dir) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(dir = %dir.display(), error = %e, "could not remove intermediate directory");
        }
    }
}

/// Remove an archive the archiver may have left half-written.
fn discard_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "could not remove partial archive");
        }
    }
}

fn count_files(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .count()
}

fn file_size(path: &Path) -> u64 {
    fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
