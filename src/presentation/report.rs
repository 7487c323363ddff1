//! Fixed-width report rendering.
//!
//! Tables use 30-character left-aligned columns framed by `| ` and ` |`, so
//! a two-column table is 67 characters wide and a three-column one 100.
//! Values longer than a column are not truncated.

use std::fmt::Write;

use crate::application::services::{BatchReport, CascadeReport, HydrationReport, Listing};
use crate::domain::Token;

/// Width of every table column.
pub const COLUMN_WIDTH: usize = 30;

/// Total width of a table with `columns` columns.
pub fn table_width(columns: usize) -> usize {
    columns * (COLUMN_WIDTH + 3) + 1
}

fn row_line(cells: &[String]) -> String {
    let inner = cells
        .iter()
        .map(|cell| format!("{:<width$}", cell, width = COLUMN_WIDTH))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("| {} |", inner)
}

/// Render a listing as a framed table with a centred heading.
pub fn render_listing(listing: &Listing) -> String {
    let width = table_width(listing.columns.len());
    let rule = "-".repeat(width);
    let column_rule: Vec<String> = listing.columns.iter().map(|_| "-".repeat(COLUMN_WIDTH)).collect();

    let mut out = String::new();
    let _ = writeln!(out, "{:^width$}", listing.heading, width = width);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{}", row_line(&listing.columns));
    let _ = writeln!(out, "{}", row_line(&column_rule));
    for row in &listing.rows {
        let _ = writeln!(out, "{}", row_line(row));
    }
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out);
    if let Some(note) = &listing.note {
        let _ = writeln!(out, "{}", note);
    }
    out
}

/// `category` is shown as the caller selected it: quoted name or bare ID.
pub fn render_cascade(category: &Token, report: &CascadeReport) -> String {
    let mut out = format!(
        "Category {} (ID: {}) deleted; {} channel(s) deleted",
        category,
        report.category_id,
        report.deleted_channels.len()
    );
    if !report.is_clean() {
        let _ = write!(out, ", {} failed", report.failed_channels.len());
    }
    out.push('\n');
    for (channel_id, error) in &report.failed_channels {
        let _ = writeln!(out, "  channel {}: {}", channel_id, error);
    }
    out
}

pub fn render_batch(report: &BatchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Rows processed: {} (created {}, existing {}, unmatched {}, skipped {}, failed {})",
        report.processed,
        report.created,
        report.existing,
        report.unmatched,
        report.skipped,
        report.failed()
    );
    for failure in &report.failures {
        let _ = writeln!(out, "  row {} '{}': {}", failure.row, failure.channel, failure.error);
    }
    out
}

pub fn render_hydration(report: &HydrationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Categories: {} created, {} existing, {} failed",
        report.categories_created,
        report.categories_existing,
        report.failures.len()
    );
    for (name, error) in &report.failures {
        let _ = writeln!(out, "  {}: {}", name, error);
    }
    for (course, batch) in &report.rosters {
        let _ = write!(out, "{}: {}", course, render_batch(batch));
    }
    out
}
