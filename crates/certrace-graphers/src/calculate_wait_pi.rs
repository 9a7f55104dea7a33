// Grapher for the calculate pi & wait operation.
//
// A suite from this test interleaves two operation kinds: worker
// records reporting (t0, t1, iterations) spans per thread, and monitor
// records carrying the device temperature. The first datum is not a
// sample; it holds the run parameters (wait method, affinity pinning).

use std::collections::BTreeMap;

use anyhow::Result;

use certrace_report::{HandlerSpec, Matcher, ReportContext, SuiteHandler, SuiteSummarizer};
use certrace_types::{Item, Suite, nanos_to_seconds, slug};

pub const WORKER_OPERATION: &str = "CalculateWaitPIOperation";
pub const MONITOR_OPERATION: &str = "MonitorOperation";

pub fn spec() -> HandlerSpec {
    HandlerSpec {
        id: "calculate_wait_pi",
        matcher: Matcher::Datum(|datum| datum.suite_id.contains("WaitForPI")),
        construct: |suite| Box::new(CalculateWaitPiHandler::new(suite)),
        summarizer: Some(|| Box::new(CalculateWaitPiSummarizer::new())),
    }
}

#[derive(Debug, Clone, PartialEq)]
struct RunParams {
    wait_method: String,
    affinity: bool,
}

/// Per-thread iteration spans, in relative seconds.
#[derive(Debug, Default, Clone, PartialEq)]
struct ThreadChart {
    starts: Vec<f64>,
    widths: Vec<f64>,
    iterations: Vec<f64>,
    total_iterations: f64,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Classification {
    run_params: Option<RunParams>,
    threads: BTreeMap<i64, ThreadChart>,
    temperature: Vec<(f64, f64)>,
    max_iterations: f64,
    max_seconds: f64,
}

/// Pure and re-runnable: same suite, same buckets.
fn classify(suite: &Suite) -> Classification {
    let mut out = Classification::default();

    let mut data = suite.data().iter();
    let Some(first) = data.next() else {
        return out;
    };

    out.run_params = Some(RunParams {
        wait_method: first
            .custom_field_str("wait_method")
            .unwrap_or("unknown")
            .to_string(),
        affinity: first
            .custom_field_numeric("affinity")
            .map(|v| v != 0.0)
            .unwrap_or(false),
    });

    let first_timestamp = first.timestamp;

    for datum in data {
        let seconds = nanos_to_seconds(datum.timestamp - first_timestamp);
        out.max_seconds = out.max_seconds.max(seconds);

        match datum.operation_id.as_str() {
            WORKER_OPERATION => {
                let (Some(thread_id), Some(t0), Some(t1), Some(iterations)) = (
                    datum.thread_id,
                    datum.custom_field_numeric("t0"),
                    datum.custom_field_numeric("t1"),
                    datum.custom_field_numeric("iterations"),
                ) else {
                    continue;
                };

                let chart = out.threads.entry(thread_id).or_default();
                chart.starts.push(nanos_to_seconds(t0 as i64 - first_timestamp));
                chart.widths.push(nanos_to_seconds((t1 - t0) as i64));
                chart.iterations.push(iterations);
                chart.total_iterations += iterations;
                out.max_iterations = out.max_iterations.max(iterations);
            }
            MONITOR_OPERATION => {
                let Some(milli_celsius) =
                    datum.custom_field_numeric("temperature_info.max_cpu_temperature")
                else {
                    continue;
                };
                out.temperature.push((seconds, milli_celsius / 1000.0));
            }
            _ => {}
        }
    }

    out
}

pub struct CalculateWaitPiHandler {
    suite: Suite,
    chart: Classification,
}

impl CalculateWaitPiHandler {
    pub fn new(suite: Suite) -> Self {
        let chart = classify(&suite);
        Self { suite, chart }
    }

    pub fn total_iterations(&self) -> f64 {
        self.chart
            .threads
            .values()
            .map(|t| t.total_iterations)
            .sum()
    }
}

impl SuiteHandler for CalculateWaitPiHandler {
    fn suite(&self) -> &Suite {
        &self.suite
    }

    fn render(&self, ctx: &mut ReportContext) -> Result<Vec<Item>> {
        if self.suite.is_empty() {
            return Ok(vec![Item::text("No data captured for this suite.")]);
        }

        let device_label = self.suite.device().label();
        let stem = format!(
            "{}_{}",
            slug(self.suite.name()),
            slug(&self.suite.device().model)
        );

        let path = ctx.plot(&stem, |surface| {
            if let Some(params) = &self.chart.run_params {
                surface.set_title(format!(
                    "{} ({} affinity)",
                    params.wait_method,
                    if params.affinity { "with" } else { "without" }
                ));
            }

            for (position, thread) in self.chart.threads.values().enumerate() {
                let panel = surface.panel(format!("Thread #{position}"));
                panel.x_limits(0.0, self.chart.max_seconds);
                panel.y_limits(0.0, self.chart.max_iterations);
                for i in 0..thread.starts.len() {
                    panel.bar(thread.starts[i], thread.widths[i], thread.iterations[i]);
                }
                panel.center_text(format!(
                    "{:.0}M iterations",
                    thread.total_iterations / 1e6
                ));
            }

            let panel = surface.panel("Temperature (°C)");
            panel.x_limits(0.0, self.chart.max_seconds);
            panel.line(&self.chart.temperature);

            let panel = surface.panel("Total iterations");
            panel.center_text(format!("{:.0}M iterations", self.total_iterations() / 1e6));

            Ok(())
        })?;

        Ok(vec![Item::image(path, Some(device_label))])
    }
}

/// Sums worker iterations across every device in the run.
pub struct CalculateWaitPiSummarizer {
    members: Vec<Box<dyn SuiteHandler>>,
}

impl CalculateWaitPiSummarizer {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    fn device_totals(&self) -> Vec<(String, f64)> {
        self.members
            .iter()
            .map(|handler| {
                let suite = handler.suite();
                // index 0 is the run-params record, never a sample
                let total: f64 = suite
                    .data()
                    .iter()
                    .skip(1)
                    .filter(|d| d.operation_id == WORKER_OPERATION)
                    .filter_map(|d| d.custom_field_numeric("iterations"))
                    .sum();
                (suite.device().model.clone(), total)
            })
            .collect()
    }
}

impl Default for CalculateWaitPiSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SuiteSummarizer for CalculateWaitPiSummarizer {
    fn append(&mut self, handler: Box<dyn SuiteHandler>) {
        self.members.push(handler);
    }

    fn member_count(&self) -> usize {
        self.members.len()
    }

    fn render_synthesis(&self, ctx: &mut ReportContext) -> Result<Vec<Item>> {
        let Some(first) = self.members.first() else {
            return Ok(vec![Item::text("No member suites.")]);
        };

        let totals = self.device_totals();
        let grand_total: f64 = totals.iter().map(|(_, t)| t).sum();
        let stem = format!("{}_summary", slug(first.suite().name()));

        let path = ctx.plot(&stem, |surface| {
            surface.set_title("Iterations by device");
            let panel = surface.panel("iterations");
            for (i, (model, total)) in totals.iter().enumerate() {
                panel.bar(i as f64, 0.8, *total);
                panel.x_tick(i as f64 + 0.4, model.clone());
            }
            Ok(())
        })?;

        Ok(vec![
            Item::image(path, None),
            Item::text(format!(
                "{:.0}M iterations across {} device(s)",
                grand_total / 1e6,
                totals.len()
            )),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certrace_types::{Datum, DeviceInfo};
    use serde_json::json;

    fn params_datum(ts: i64) -> Datum {
        Datum {
            suite_id: "WaitForPI".to_string(),
            operation_id: WORKER_OPERATION.to_string(),
            thread_id: None,
            cpu_id: None,
            timestamp: ts,
            custom: json!({"wait_method": "sleep", "affinity": true}),
        }
    }

    fn worker_datum(ts: i64, thread: i64, t0: i64, t1: i64, iterations: f64) -> Datum {
        Datum {
            suite_id: "WaitForPI".to_string(),
            operation_id: WORKER_OPERATION.to_string(),
            thread_id: Some(thread),
            cpu_id: None,
            timestamp: ts,
            custom: json!({"t0": t0, "t1": t1, "iterations": iterations}),
        }
    }

    fn monitor_datum(ts: i64, milli_celsius: f64) -> Datum {
        Datum {
            suite_id: "WaitForPI".to_string(),
            operation_id: MONITOR_OPERATION.to_string(),
            thread_id: None,
            cpu_id: None,
            timestamp: ts,
            custom: json!({"temperature_info": {"max_cpu_temperature": milli_celsius}}),
        }
    }

    fn sample_suite() -> Suite {
        Suite::new(
            "WaitForPI",
            DeviceInfo::new("Pixel 4", "Google", "11"),
            vec![
                params_datum(1_000_000_000),
                worker_datum(2_000_000_000, 7, 1_000_000_000, 2_000_000_000, 2e6),
                worker_datum(3_000_000_000, 8, 1_000_000_000, 3_000_000_000, 4e6),
                monitor_datum(2_500_000_000, 41_500.0),
                worker_datum(4_000_000_000, 7, 3_000_000_000, 4_000_000_000, 1e6),
            ],
        )
    }

    #[test]
    fn test_classification_buckets_by_thread() {
        let handler = CalculateWaitPiHandler::new(sample_suite());

        assert_eq!(handler.chart.threads.len(), 2);
        let thread7 = &handler.chart.threads[&7];
        assert_eq!(thread7.starts, vec![0.0, 2.0]);
        assert_eq!(thread7.widths, vec![1.0, 1.0]);
        assert_eq!(thread7.total_iterations, 3e6);

        assert_eq!(handler.chart.temperature, vec![(1.5, 41.5)]);
        assert_eq!(handler.chart.max_iterations, 4e6);
        assert_eq!(handler.chart.max_seconds, 3.0);
        assert_eq!(handler.total_iterations(), 7e6);

        let params = handler.chart.run_params.as_ref().unwrap();
        assert_eq!(params.wait_method, "sleep");
        assert!(params.affinity);
    }

    #[test]
    fn test_classification_is_rerunnable() {
        let suite = sample_suite();
        assert_eq!(classify(&suite), classify(&suite));
    }

    #[test]
    fn test_records_missing_fields_are_skipped() {
        let mut bad_worker = worker_datum(2_000_000_000, 7, 0, 0, 0.0);
        bad_worker.custom = json!({"t0": 1_000_000_000});
        let suite = Suite::new(
            "WaitForPI",
            DeviceInfo::unknown(),
            vec![
                params_datum(1_000_000_000),
                bad_worker,
                worker_datum(2_000_000_000, 7, 1_000_000_000, 2_000_000_000, 5e5),
            ],
        );

        let handler = CalculateWaitPiHandler::new(suite);
        assert_eq!(handler.chart.threads[&7].starts.len(), 1);
        assert_eq!(handler.total_iterations(), 5e5);
    }

    #[test]
    fn test_empty_suite_renders_no_data_item() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = ReportContext::new(dir.path().join("out")).unwrap();

        let handler =
            CalculateWaitPiHandler::new(Suite::new("WaitForPI", DeviceInfo::unknown(), vec![]));
        let items = handler.render(&mut ctx).unwrap();
        assert_eq!(items, vec![Item::text("No data captured for this suite.")]);
    }

    #[test]
    fn test_render_produces_device_labeled_image() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = ReportContext::new(dir.path().join("out")).unwrap();

        let handler = CalculateWaitPiHandler::new(sample_suite());
        let items = handler.render(&mut ctx).unwrap();

        assert_eq!(items.len(), 1);
        match &items[0] {
            Item::Image { path, device_label } => {
                assert!(path.exists());
                assert_eq!(device_label.as_deref(), Some("Pixel 4 (Google, 11)"));
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn test_summarizer_sums_across_devices() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = ReportContext::new(dir.path().join("out")).unwrap();

        let mut summarizer = CalculateWaitPiSummarizer::new();
        summarizer.append(Box::new(CalculateWaitPiHandler::new(sample_suite())));
        summarizer.append(Box::new(CalculateWaitPiHandler::new(sample_suite())));

        assert_eq!(summarizer.member_count(), 2);
        let totals = summarizer.device_totals();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].1, 7e6);

        let items = summarizer.render_synthesis(&mut ctx).unwrap();
        assert_eq!(items.len(), 2);
        match &items[1] {
            Item::Text { text } => assert_eq!(text, "14M iterations across 2 device(s)"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_single_member_group_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = ReportContext::new(dir.path().join("out")).unwrap();

        let mut summarizer = CalculateWaitPiSummarizer::new();
        summarizer.append(Box::new(CalculateWaitPiHandler::new(sample_suite())));
        assert!(summarizer.render_synthesis(&mut ctx).is_ok());
    }
}
