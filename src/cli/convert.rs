//! Interactive ZIP ⇄ 7z conversion
//!
//! Asks for the mode and archive path (unless given as flags), validates them
//! in that order, then drives the conversion pipeline with a spinner per step.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::ProgressBar;

use crate::convert::{
    path_from_input, run_conversion, Archiver, ConversionMode, ConversionOutcome,
    ConversionPlan, ConvertError, Stage, StageObserver,
};
use crate::report::{display_summary, format_duration};
use crate::utils::{
    create_spinner, finish_with_failure, finish_with_success, print_banner, print_completion,
    print_info, print_step_header, print_warning,
};

use super::{InputProvider, MODE_PROMPT, PATH_PROMPT};

/// Conversion inputs that may be supplied up front instead of prompted for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub mode: Option<String>,
    pub input: Option<String>,
    pub workdir: PathBuf,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            mode: None,
            input: None,
            workdir: PathBuf::from("."),
        }
    }
}

/// Run one conversion, prompting through `input` for anything not in `options`.
pub fn run_convert(
    options: &ConvertOptions,
    input: &mut dyn InputProvider,
    archiver: &dyn Archiver,
) -> Result<ConversionOutcome> {
    print_banner(env!("CARGO_PKG_VERSION"));

    let mode = match &options.mode {
        Some(mode) => mode.clone(),
        None => input.ask(MODE_PROMPT)?,
    };
    let mode: ConversionMode = mode.parse()?;

    let archive = match &options.input {
        Some(path) => path.clone(),
        None => input.ask(PATH_PROMPT)?,
    };
    let plan = ConversionPlan::new(
        mode,
        &path_from_input(&archive, &options.workdir),
        &options.workdir,
    )?;

    println!();
    println!(
        " {} Converting {}",
        style("◆").cyan().bold(),
        style(mode.description()).bold()
    );
    println!("   Input:  {}", style(plan.archive.display()).dim());
    println!("   Output: {}", style(plan.output.display()).dim());

    let mut observer = SpinnerObserver::default();
    let outcome = run_conversion(&plan, archiver, &mut observer)?;

    display_summary(&outcome);
    print_completion(&outcome.plan.output);

    Ok(outcome)
}

/// Render an error and its causes on one line, skipping causes the
/// message already quotes.
pub fn error_message(err: &anyhow::Error) -> String {
    let mut message = err.to_string();
    for cause in err.chain().skip(1) {
        let cause = cause.to_string();
        if !message.contains(&cause) {
            message.push_str(": ");
            message.push_str(&cause);
        }
    }
    message
}

/// Prints a step header and runs a spinner for each pipeline stage
#[derive(Default)]
struct SpinnerObserver {
    spinner: Option<ProgressBar>,
}

impl StageObserver for SpinnerObserver {
    fn stage_started(&mut self, stage: Stage, plan: &ConversionPlan) {
        print_step_header(stage.number(), &stage.to_string());
        let message = match stage {
            Stage::Extract => format!(
                "Extracting {} archive into {}/ ...",
                plan.mode.source_format(),
                plan.display_stem()
            ),
            Stage::Compress => format!(
                "Writing {} ...",
                plan.output
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            ),
            Stage::Cleanup => format!("Removing {}/ ...", plan.display_stem()),
        };
        self.spinner = Some(create_spinner(&message));
    }

    fn stage_finished(&mut self, stage: Stage, elapsed: Duration) {
        if let Some(spinner) = self.spinner.take() {
            let verb = match stage {
                Stage::Extract => "Extracted",
                Stage::Compress => "Compressed",
                Stage::Cleanup => "Cleaned up",
            };
            finish_with_success(&spinner, &format!("{} in {}", verb, format_duration(elapsed)));
        }
    }

    fn stage_failed(&mut self, stage: Stage, error: &ConvertError) {
        if let Some(spinner) = self.spinner.take() {
            finish_with_failure(&spinner, &format!("{} failed", stage));
        }
        if matches!(error, ConvertError::Cleanup { .. }) {
            print_info("The output archive was written; only the intermediate directory remains");
        }
    }

    fn output_replaced(&mut self, output: &Path) {
        print_warning(&format!("Replaced existing {}", output.display()));
    }
}
