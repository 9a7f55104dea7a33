// Grapher for the memory allocation stress test.
//
// Renders a fixed set of custom fields, one panel per field, with a
// per-field presentation style. Records missing a field are skipped
// for that panel only.

use anyhow::Result;

use certrace_report::{HandlerSpec, Matcher, ReportContext, SuiteHandler};
use certrace_types::{Item, Suite, nanos_to_seconds, slug};

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

pub fn spec() -> HandlerSpec {
    HandlerSpec {
        id: "memory_allocation",
        matcher: Matcher::Suite(|suite| suite.name().contains("Memory allocation")),
        construct: |suite| Box::new(MemoryAllocationHandler::new(suite)),
        summarizer: None,
    }
}

#[derive(Debug, Clone, Copy)]
enum FieldStyle {
    /// Byte counts plotted as megabytes
    MemoryMb,
    /// 0/1 values with No/Yes ticks
    Boolean,
    /// Sparse events drawn as full-height markers with their level
    TrimLevel,
    /// Sparse events drawn as point marks
    EventMark,
}

// Field order here is presentation order.
const FIELDS: &[(&str, FieldStyle)] = &[
    ("on_trim_level", FieldStyle::TrimLevel),
    ("is_free", FieldStyle::EventMark),
    ("sys_mem_info.available_memory", FieldStyle::MemoryMb),
    ("sys_mem_info.native_allocated", FieldStyle::MemoryMb),
    ("sys_mem_info.low_memory", FieldStyle::Boolean),
    ("total_allocation_bytes", FieldStyle::MemoryMb),
];

pub struct MemoryAllocationHandler {
    suite: Suite,
}

impl MemoryAllocationHandler {
    pub fn new(suite: Suite) -> Self {
        Self { suite }
    }

    /// (relative seconds, value) pairs for one field, absent samples
    /// skipped.
    fn series_for(&self, field: &str) -> Vec<(f64, f64)> {
        let Some(first_timestamp) = self.suite.first_timestamp() else {
            return Vec::new();
        };
        self.suite
            .data()
            .iter()
            .filter_map(|datum| {
                let value = datum.custom_field_numeric(field)?;
                Some((nanos_to_seconds(datum.timestamp - first_timestamp), value))
            })
            .collect()
    }
}

impl SuiteHandler for MemoryAllocationHandler {
    fn suite(&self) -> &Suite {
        &self.suite
    }

    fn render(&self, ctx: &mut ReportContext) -> Result<Vec<Item>> {
        if self.suite.is_empty() {
            return Ok(vec![Item::text("No data captured for this suite.")]);
        }

        let first = self.suite.first_timestamp().unwrap_or(0);
        let last = self
            .suite
            .data()
            .last()
            .map(|d| d.timestamp)
            .unwrap_or(first);
        let span_seconds = nanos_to_seconds(last - first);

        let device_label = self.suite.device().label();
        let stem = format!(
            "{}_{}",
            slug(self.suite.name()),
            slug(&self.suite.device().model)
        );

        let path = ctx.plot(&stem, |surface| {
            surface.set_title(self.suite.name());

            for &(field, style) in FIELDS {
                let series = self.series_for(field);
                match style {
                    FieldStyle::MemoryMb => {
                        let panel = surface.panel(format!("{field} (mb)"));
                        panel.x_limits(0.0, span_seconds);
                        let scaled: Vec<(f64, f64)> = series
                            .iter()
                            .map(|&(x, y)| (x, y / BYTES_PER_MEGABYTE))
                            .collect();
                        panel.line(&scaled);
                    }
                    FieldStyle::Boolean => {
                        let panel = surface.panel(field);
                        panel.x_limits(0.0, span_seconds);
                        panel.y_limits(0.0, 1.0);
                        panel.y_tick(0.0, "No");
                        panel.y_tick(1.0, "Yes");
                        panel.line(&series);
                    }
                    FieldStyle::TrimLevel => {
                        let panel = surface.panel(field);
                        panel.x_limits(0.0, span_seconds);
                        for (x, level) in series {
                            panel.vline(x, format!("level {}", level as i64));
                        }
                    }
                    FieldStyle::EventMark => {
                        let panel = surface.panel(field);
                        panel.x_limits(0.0, span_seconds);
                        panel.y_limits(0.0, 1.0);
                        for (x, _) in series {
                            panel.mark(x, 0.5);
                        }
                    }
                }
            }

            Ok(())
        })?;

        Ok(vec![Item::image(path, Some(device_label))])
    }
}
