//! Run summary tables printed to stdout.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::commands::{BatchReport, RunReport};

pub fn print_summary(report: &RunReport) {
    println!("Output: {}", report.output.display());
    println!("Manifest: {}", report.manifest.display());
    println!("{}", stats_table(std::slice::from_ref(report)));
}

pub fn print_batch_summary(report: &BatchReport) {
    if !report.runs.is_empty() {
        println!("{}", stats_table(&report.runs));
    }
    if report.has_failures() {
        eprintln!("Failed variants:");
        for (name, error) in &report.failures {
            eprintln!("- {name}: {error}");
        }
    }
}

/// One row per run with the stage counts.
pub fn stats_table(runs: &[RunReport]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            header_cell("Left"),
            header_cell("Left Records"),
            header_cell("Right Records"),
            header_cell("Identifier"),
            header_cell("Fuzzy Accepted"),
            header_cell("Discarded"),
            header_cell("Matches"),
        ]);

    for run in runs {
        let s = &run.stats;
        table.add_row(vec![
            Cell::new(&run.label).fg(Color::Cyan),
            Cell::new(s.left_records),
            Cell::new(s.right_records),
            Cell::new(s.identifier_matches),
            Cell::new(s.fuzzy_matches),
            Cell::new(s.discarded),
            Cell::new(s.resolved)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
    }

    for idx in 1..7 {
        if let Some(column) = table.column_mut(idx) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}
