use std::collections::BTreeMap;

use comfy_table::{Cell, Color};

use crate::core::{QuotaPhase, RunReport};
use crate::output::format::{create_styled_table, format_number, header_cell, right_cell, styled_cell};
use crate::utils::format_date;

use super::ConceptStatus;

fn color(use_color: bool, c: Color) -> Option<Color> {
    use_color.then_some(c)
}

fn phase_label(phase: QuotaPhase) -> &'static str {
    match phase {
        QuotaPhase::Idle => "idle",
        QuotaPhase::Running => "running",
        QuotaPhase::Exhausted => "budget exhausted",
        QuotaPhase::Completed => "completed",
    }
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

pub(crate) fn print_run_summary(report: &RunReport, use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Outcome", use_color),
        header_cell("Count", use_color),
        header_cell("Concepts", use_color),
    ]);

    let rows: [(&str, &[String], Option<Color>); 4] = [
        ("Processed", report.processed.as_slice(), color(use_color, Color::Green)),
        ("Not due", report.skipped_not_due.as_slice(), None),
        ("Failed", report.failed.as_slice(), color(use_color, Color::Red)),
        ("Left due", report.left_due.as_slice(), color(use_color, Color::Yellow)),
    ];
    for (label, concepts, c) in rows {
        table.add_row(vec![
            styled_cell(label, c, false),
            right_cell(&concepts.len().to_string(), c, false),
            Cell::new(join_or_dash(concepts)),
        ]);
    }

    println!("\n  Collection Summary\n");
    println!("{table}");

    let quota_line = format!(
        "{} / {} quota units, {} rows written, {}",
        format_number(report.units_charged),
        format_number(report.quota_ceiling),
        report.rows_written,
        phase_label(report.phase),
    );
    if use_color && report.exhausted() {
        println!("\n  \x1b[33m{quota_line}\x1b[0m\n");
    } else {
        println!("\n  {quota_line}\n");
    }
}

pub(crate) fn print_status_table(entries: &[ConceptStatus], refresh_interval_days: u32, use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Concept", use_color),
        header_cell("Queries", use_color),
        header_cell("Regions", use_color),
        header_cell("Last fetch", use_color),
        header_cell("Next due", use_color),
        header_cell("Due", use_color),
    ]);

    for entry in entries {
        let due_color = if entry.due {
            color(use_color, Color::Green)
        } else {
            None
        };
        table.add_row(vec![
            Cell::new(&entry.concept),
            right_cell(&entry.queries.to_string(), None, false),
            right_cell(&entry.regions.to_string(), None, false),
            Cell::new(entry.last_fetch.map(format_date).unwrap_or_else(|| "never".to_string())),
            Cell::new(entry.next_due.map(format_date).unwrap_or_else(|| "-".to_string())),
            styled_cell(if entry.due { "yes" } else { "no" }, due_color, entry.due),
        ]);
    }

    let due = entries.iter().filter(|e| e.due).count();
    println!("\n  Schedule (refresh every {refresh_interval_days} day(s))\n");
    println!("{table}");
    println!("\n  {due} of {} concepts due\n", entries.len());
}

pub(crate) fn print_quota_table(days: &BTreeMap<String, u64>, ceiling: u64, use_color: bool) {
    let mut table = create_styled_table();
    table.set_header(vec![
        header_cell("Quota day (Pacific)", use_color),
        header_cell("Units", use_color),
        header_cell("Remaining", use_color),
    ]);

    for (day, used) in days {
        let over = *used >= ceiling;
        let c = if over { color(use_color, Color::Red) } else { None };
        table.add_row(vec![
            Cell::new(day),
            right_cell(&format_number(*used), c, over),
            right_cell(&format_number(ceiling.saturating_sub(*used)), None, false),
        ]);
    }

    println!("\n  Quota Usage\n");
    println!("{table}");
}
