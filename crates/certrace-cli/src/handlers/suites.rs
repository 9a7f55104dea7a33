use std::path::PathBuf;

use anyhow::Result;
use owo_colors::OwoColorize;

use certrace_report::load_report;
use certrace_types::{Suite, nanos_to_seconds, rebase_nanos};

use super::collect_report_files;

pub fn handle(reports: &[PathBuf]) -> Result<()> {
    let files = collect_report_files(reports)?;

    for file in &files {
        println!("{}", file.display().to_string().bold());
        let suites = load_report(file)?;
        if suites.is_empty() {
            println!("  {}", "no suites".bright_black());
            continue;
        }
        for suite in &suites {
            let operations: Vec<&str> = suite.operation_ids().collect();
            println!(
                "  {}  {}  {} record(s) over {:.1}s  [{}]",
                suite.name().green(),
                suite.device().label().bright_black(),
                suite.len(),
                duration_seconds(suite),
                operations.join(", ")
            );
        }
    }

    Ok(())
}

fn duration_seconds(suite: &Suite) -> f64 {
    let timestamps: Vec<i64> = suite.data().iter().map(|d| d.timestamp).collect();
    rebase_nanos(&timestamps)
        .last()
        .map(|&ns| nanos_to_seconds(ns))
        .unwrap_or(0.0)
}
