//! Conversion summary report generation

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::convert::ConversionOutcome;
use crate::utils::{format_bytes, truncate_path};

/// Build the summary table for a finished conversion
pub fn summary_table(outcome: &ConversionOutcome) -> Table {
    let plan = &outcome.plan;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    table.add_row(vec![
        Cell::new("🔁 Mode"),
        Cell::new(format!("{} ({})", plan.mode, plan.mode.description())),
    ]);
    table.add_row(vec![
        Cell::new("📥 Input"),
        Cell::new(truncate_path(&plan.archive, 48)),
    ]);
    table.add_row(vec![
        Cell::new("📤 Output"),
        Cell::new(truncate_path(&plan.output, 48)).fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new("🗂️  Entries / Files"),
        Cell::new(format!("{} / {}", outcome.entries, outcome.files)),
    ]);
    table.add_row(vec![
        Cell::new("📏 Size"),
        Cell::new(format!(
            "{} → {}",
            format_bytes(outcome.bytes_in),
            format_bytes(outcome.bytes_out)
        ))
        .fg(if outcome.bytes_out <= outcome.bytes_in {
            Color::Green
        } else {
            Color::Yellow
        }),
    ]);
    table.add_row(vec![
        Cell::new("⏱️  Extract"),
        Cell::new(format_duration(outcome.timings.extract)),
    ]);
    table.add_row(vec![
        Cell::new("⏱️  Compress"),
        Cell::new(format_duration(outcome.timings.compress)),
    ]);
    table.add_row(vec![
        Cell::new("⏱️  Cleanup"),
        Cell::new(format_duration(outcome.timings.cleanup)),
    ]);
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(format_duration(outcome.timings.total())).add_attribute(Attribute::Bold),
    ]);

    table
}

/// Print the summary table with a section header
pub fn display_summary(outcome: &ConversionOutcome) {
    println!();
    println!(
        "    {} {}",
        style("📋").cyan(),
        style("CONVERSION SUMMARY").white().bold()
    );
    println!("    {}", style("─".repeat(40)).dim());
    println!();

    for line in summary_table(outcome).to_string().lines() {
        println!("    {}", line);
    }
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{}m {:02}s", duration.as_secs() / 60, duration.as_secs() % 60)
    }
}
