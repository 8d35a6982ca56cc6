//! `tools` subcommand - report which archiver programs can be found

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::convert::ToolSet;
use crate::utils::print_success;

/// Print a table of the configured archivers. Returns true when all were found.
pub fn report_tools(tools: &ToolSet) -> bool {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Role").add_attribute(Attribute::Bold),
        Cell::new("Program").add_attribute(Attribute::Bold),
        Cell::new("Status").add_attribute(Attribute::Bold),
        Cell::new("Path").add_attribute(Attribute::Bold),
    ]);

    let mut all_found = true;
    for (role, program) in tools.entries() {
        let program_name = program.to_string_lossy();
        match ToolSet::locate(program) {
            Some(path) => {
                table.add_row(vec![
                    Cell::new(role),
                    Cell::new(&program_name),
                    Cell::new("found").fg(Color::Green),
                    Cell::new(path.display()),
                ]);
            }
            None => {
                all_found = false;
                table.add_row(vec![
                    Cell::new(role),
                    Cell::new(&program_name),
                    Cell::new("missing").fg(Color::Red),
                    Cell::new("-"),
                ]);
            }
        }
    }

    println!();
    println!("{}", table);
    if all_found {
        println!();
        print_success("All archivers available");
    } else {
        println!();
        println!(
            "{} Install the missing programs or point --unzip-bin / --sevenzip-bin / --zip-bin at them.",
            style("!").yellow().bold()
        );
    }
    all_found
}
