use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

use certrace_types::Item;

use crate::assembler::{AssembledReport, Section};
use crate::context::ReportContext;

pub const DOCUMENT_NAME: &str = "summary.md";

/// Serialize the assembled report to `summary.md` in the context's
/// output directory.
pub fn write_markdown(report: &AssembledReport, ctx: &ReportContext) -> Result<PathBuf> {
    let path = ctx.output_dir().join(DOCUMENT_NAME);
    let document = render_document(report, ctx.output_dir(), Utc::now());
    fs::write(&path, document)
        .with_context(|| format!("writing summary document {}", path.display()))?;
    Ok(path)
}

/// Pure document rendering; image paths are written relative to
/// `base_dir` so the output directory can be moved as a unit.
pub fn render_document(
    report: &AssembledReport,
    base_dir: &Path,
    generated_at: DateTime<Utc>,
) -> String {
    let mut doc = String::new();
    let _ = writeln!(
        doc,
        "Report generated on {}",
        generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    for section in &report.sections {
        doc.push_str("\n---\n\n");
        let _ = writeln!(doc, "# {}", section.suite_name);
        if let Some(label) = &section.device_label {
            let _ = writeln!(doc, "\n{label}");
        }
        render_section_body(&mut doc, section, base_dir);
    }

    if !report.synthesis.is_empty() {
        doc.push_str("\n---\n\n# Cross-device summary\n");
        for section in &report.synthesis {
            let _ = writeln!(doc, "\n## {}", section.suite_name);
            render_section_body(&mut doc, section, base_dir);
        }
    }

    doc
}

fn render_section_body(doc: &mut String, section: &Section, base_dir: &Path) {
    if let Some(failure) = &section.failure {
        let _ = writeln!(doc, "\n_Rendering failed: {failure}_");
        return;
    }

    for item in &section.items {
        match item {
            Item::Heading { text, level } => {
                let _ = writeln!(doc, "\n{} {}", "#".repeat(usize::from(*level).max(1)), text);
            }
            Item::Text { text } => {
                let _ = writeln!(doc, "\n{text}");
            }
            Item::Image { path, device_label } => {
                let relative = path.strip_prefix(base_dir).unwrap_or(path);
                let alt = device_label.clone().unwrap_or_else(|| "chart".to_string());
                let _ = writeln!(doc, "\n![{alt}]({})", relative.display());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_document_layout() {
        let report = AssembledReport {
            sections: vec![
                Section {
                    suite_name: "FakeOperation".to_string(),
                    device_label: Some("Pixel 4 (Google, 11)".to_string()),
                    items: vec![
                        Item::image("/out/images/fake.svg", Some("Pixel 4 (Google, 11)".to_string())),
                        Item::text("Everything Looks Fine"),
                    ],
                    failure: None,
                },
                Section {
                    suite_name: "Broken".to_string(),
                    device_label: Some("Pixel 4 (Google, 11)".to_string()),
                    items: Vec::new(),
                    failure: Some("bad data shape".to_string()),
                },
            ],
            synthesis: vec![Section {
                suite_name: "FakeOperation".to_string(),
                device_label: None,
                items: vec![Item::text("Summarization Looks Fantastic")],
                failure: None,
            }],
        };

        let document = render_document(&report, Path::new("/out"), fixed_time());
        insta::assert_snapshot!(document, @r###"
        Report generated on 2026-08-06T12:00:00Z

        ---

        # FakeOperation

        Pixel 4 (Google, 11)

        ![Pixel 4 (Google, 11)](images/fake.svg)

        Everything Looks Fine

        ---

        # Broken

        Pixel 4 (Google, 11)

        _Rendering failed: bad data shape_

        ---

        # Cross-device summary

        ## FakeOperation

        Summarization Looks Fantastic
        "###);
    }

    #[test]
    fn test_no_synthesis_part_when_empty() {
        let report = AssembledReport {
            sections: Vec::new(),
            synthesis: Vec::new(),
        };
        let document = render_document(&report, Path::new("/out"), fixed_time());
        assert!(!document.contains("Cross-device summary"));
    }

    #[test]
    fn test_item_heading_levels() {
        let report = AssembledReport {
            sections: vec![Section {
                suite_name: "S".to_string(),
                device_label: None,
                items: vec![Item::subheading("Details")],
                failure: None,
            }],
            synthesis: Vec::new(),
        };
        let document = render_document(&report, Path::new("/out"), fixed_time());
        assert!(document.contains("\n## Details\n"));
    }
}
