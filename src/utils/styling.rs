//! Terminal styling utilities for status and error output

use console::{style, Emoji};
use std::path::Path;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", ">> ");

/// Banner heading, unstyled
pub fn banner_heading() -> String {
    "=== 7z2zip and zip27z converter ===".to_string()
}

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!("    {}", style(banner_heading()).cyan().bold());
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(40)).dim());
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(40)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print a fatal error in the `Error: ...` form scripts look for
pub fn print_error(message: &str) {
    println!("{} {}", style("Error:").red().bold(), message);
}

/// Print the final completion message
pub fn print_completion(output: &Path) {
    println!();
    println!(
        "    {} {} {}",
        PACKAGE,
        style("Conversion complete:").green().bold(),
        style(truncate_path(output, 60)).cyan()
    );
    println!();
}

/// Human-readable byte count
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}

pub fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(count - max_len + 3).collect();
        format!("...{}", tail)
    }
}
