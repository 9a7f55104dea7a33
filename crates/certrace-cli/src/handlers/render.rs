use std::path::{Path, PathBuf};

use anyhow::Result;
use owo_colors::OwoColorize;

use certrace_graphers::default_registry;
use certrace_report::{ReportAssembler, ReportContext, load_report, write_markdown};

use super::collect_report_files;

pub fn handle(reports: &[PathBuf], out: &Path) -> Result<()> {
    let files = collect_report_files(reports)?;

    let mut suites = Vec::new();
    for file in &files {
        suites.extend(load_report(file)?);
    }

    let mut ctx = ReportContext::new(out)?;
    let assembler = ReportAssembler::new(default_registry());
    let report = assembler.assemble(suites, &mut ctx);
    let document = write_markdown(&report, &ctx)?;

    println!("{} {}", "Rendered".green().bold(), document.display());
    println!(
        "  {} report file(s), {} per-device section(s), {} summary group(s)",
        files.len(),
        report.sections.len(),
        report.synthesis.len()
    );

    let failed = report.failed_section_count();
    if failed > 0 {
        println!("  {}", format!("{failed} section(s) failed to render").red());
    }

    Ok(())
}
