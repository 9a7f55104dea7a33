// Grapher for the schedule affinity test.
//
// Counts, per cpu, how often a worker observed itself on a different
// cpu than the one it was pinned to, split by test phase. Mismatches
// during the running phase decide the pass/fail outcome text.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;

use certrace_report::{HandlerSpec, Matcher, ReportContext, SuiteHandler};
use certrace_types::{Item, Suite, slug};

pub const AFFINITY_OPERATION: &str = "ScheduleAffinityOperation";

const PHASES: [(&str, &str); 3] = [
    ("did_set_affinity", "Startup"),
    ("work_running", "Running"),
    ("work_finished", "Finishing"),
];

pub fn spec() -> HandlerSpec {
    HandlerSpec {
        id: "schedule_affinity",
        matcher: Matcher::Suite(|suite| suite.name().contains("Affinity Test")),
        construct: |suite| Box::new(ScheduleAffinityHandler::new(suite)),
        summarizer: None,
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Classification {
    /// Every cpu that reported at all, mismatching or not.
    cpus: BTreeSet<i64>,
    /// cpu id -> mismatch count per phase.
    misses: BTreeMap<i64, [u64; 3]>,
}

impl Classification {
    fn running_misses_total(&self) -> u64 {
        self.misses.values().map(|phases| phases[1]).sum()
    }

    fn max_misses(&self) -> u64 {
        self.misses
            .values()
            .flat_map(|phases| phases.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

fn classify(suite: &Suite) -> Classification {
    let mut out = Classification::default();

    for datum in suite.data_for_operation(AFFINITY_OPERATION) {
        let Some(actual_cpu) = datum.cpu_id else {
            continue;
        };
        out.cpus.insert(actual_cpu);

        let Some(phase) = datum
            .custom_field_str("message")
            .and_then(|message| PHASES.iter().position(|&(key, _)| key == message))
        else {
            continue;
        };
        let Some(expected_cpu) = datum.custom_field_numeric("expected_cpu") else {
            continue;
        };

        if expected_cpu as i64 != actual_cpu {
            out.misses.entry(actual_cpu).or_default()[phase] += 1;
        }
    }

    out
}

pub struct ScheduleAffinityHandler {
    suite: Suite,
    buckets: Classification,
}

impl ScheduleAffinityHandler {
    pub fn new(suite: Suite) -> Self {
        let buckets = classify(&suite);
        Self { suite, buckets }
    }

    fn outcome_text(&self) -> String {
        let running = self.buckets.running_misses_total();
        if running > 0 {
            format!("Found {running} CPU affinity mismatches")
        } else {
            "PASSED".to_string()
        }
    }
}

impl SuiteHandler for ScheduleAffinityHandler {
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
            surface.set_title("Affinity mismatches by cpu");
            let y_max = self.buckets.max_misses().max(1) as f64;
            let cpu_count = self.buckets.cpus.len();

            for (position, cpu) in self.buckets.cpus.iter().enumerate() {
                let phases = self
                    .buckets
                    .misses
                    .get(cpu)
                    .copied()
                    .unwrap_or_default();

                let panel = surface.panel(format!("cpu_{cpu}"));
                panel.y_limits(0.0, y_max);
                panel.x_limits(0.0, PHASES.len() as f64);
                for (i, &count) in phases.iter().enumerate() {
                    panel.bar(i as f64 + 0.1, 0.8, count as f64);
                }

                // phase labels only under the bottom row
                if position == cpu_count - 1 {
                    for (i, &(_, label)) in PHASES.iter().enumerate() {
                        panel.x_tick(i as f64 + 0.5, label);
                    }
                }
            }

            Ok(())
        })?;

        Ok(vec![
            Item::image(path, Some(device_label)),
            Item::text(self.outcome_text()),
        ])
    }
}
