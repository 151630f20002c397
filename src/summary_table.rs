//! Console summaries for the fetch, aggregate and list commands.

use crate::artifacts::ArtifactEntry;
use crate::report::CombinedReport;
use crate::series::PriceSample;
use chrono::{DateTime, Local, NaiveDate};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, modifiers::UTF8_ROUND_CORNERS,
    presets::UTF8_BORDERS_ONLY,
};
use std::path::Path;

fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "N/A".to_string())
}

pub fn print_fetch_summary(series: &[PriceSample]) {
    println!("\nSummary:");
    println!("Total days: {}", series.len());

    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        println!("No samples returned.");
        return;
    };
    println!("First day price: ${:.2}", first.price_usd);
    println!("Latest day price: ${:.2}", last.price_usd);
}

pub fn report_table(report: &CombinedReport) -> Table {
    let mut table = styled_table(&["Asset", "Days", "Total Sum", "Average Price"]);
    for (symbol, analysis) in report.assets() {
        table.add_row(vec![
            Cell::new(symbol).fg(Color::Cyan),
            Cell::new(analysis.detailed_math.number_of_days).set_alignment(CellAlignment::Right),
            Cell::new(format!("${:.2}", analysis.detailed_math.total_sum))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("${:.2}", analysis.final_average_price))
                .fg(Color::Green)
                .set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn print_report_summary(report: &CombinedReport, output: &Path) {
    println!("\nAnalysis Results:");
    println!(
        "Time Period: {} to {}",
        format_date(report.time_period.start_date),
        format_date(report.time_period.end_date)
    );
    println!("\n{}", report_table(report));
    println!("\nDetailed calculations have been saved to: {}", output.display());
}

pub fn artifact_table(entries: &[ArtifactEntry], latest: Option<&ArtifactEntry>) -> Table {
    let mut table = styled_table(&["File", "Modified", "Embedded Stamp", ""]);
    for entry in entries {
        let modified: DateTime<Local> = entry.modified.into();
        let stamp = entry
            .embedded
            .map(|s| s.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let marker = if latest.is_some_and(|l| l.path == entry.path) {
            Cell::new("latest").fg(Color::Green)
        } else {
            Cell::new("")
        };

        table.add_row(vec![
            Cell::new(&entry.file_name),
            Cell::new(modified.format("%Y-%m-%d %H:%M:%S").to_string()).fg(Color::DarkGrey),
            Cell::new(stamp).fg(Color::DarkGrey),
            marker,
        ]);
    }
    table
}
