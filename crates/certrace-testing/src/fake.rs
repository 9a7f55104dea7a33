use std::collections::BTreeMap;

use anyhow::Result;

use certrace_report::{HandlerSpec, Matcher, ReportContext, SuiteHandler, SuiteSummarizer};
use certrace_types::{Item, Suite, slug};

pub const FAKE_OPERATION: &str = "FakeOperation";

/// Lifecycle events a fake run emits, in emission order.
pub const FAKE_EVENTS: [&str; 5] = [
    "Start",
    "WaitStarted",
    "Heartbeat",
    "StopOrdered",
    "WaitFinished",
];

/// Registry entry for the fake test type. Tests append this to the
/// registries they build; it never ships in the production registry.
pub fn fake_spec() -> HandlerSpec {
    HandlerSpec {
        id: "fake_operation",
        matcher: Matcher::Datum(|datum| datum.operation_id == FAKE_OPERATION),
        construct: |suite| Box::new(FakeOperationHandler::new(suite)),
        summarizer: Some(|| Box::new(FakeOperationSummarizer::new())),
    }
}

fn count_events<'a>(data: impl Iterator<Item = &'a certrace_types::Datum>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for datum in data {
        if let Some(event) = datum.custom_field_str("event") {
            *counts.entry(event.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

fn event_bars(surface: &mut certrace_report::PlotSurface, counts: &BTreeMap<String, usize>) {
    let panel = surface.panel("event counts");
    for (i, event) in FAKE_EVENTS.iter().enumerate() {
        let count = counts.get(*event).copied().unwrap_or(0);
        panel.bar(i as f64 + 0.1, 0.8, count as f64);
        panel.x_tick(i as f64 + 0.5, *event);
    }
}

pub struct FakeOperationHandler {
    suite: Suite,
    event_counts: BTreeMap<String, usize>,
}

impl FakeOperationHandler {
    pub fn new(suite: Suite) -> Self {
        let event_counts = count_events(suite.data_for_operation(FAKE_OPERATION));
        Self { suite, event_counts }
    }

    pub fn event_counts(&self) -> &BTreeMap<String, usize> {
        &self.event_counts
    }
}

impl SuiteHandler for FakeOperationHandler {
    fn suite(&self) -> &Suite {
        &self.suite
    }

    fn render(&self, ctx: &mut ReportContext) -> Result<Vec<Item>> {
        let device_label = self.suite.device().label();
        let stem = format!(
            "{}_{}",
            slug(self.suite.name()),
            slug(&self.suite.device().model)
        );

        let path = ctx.plot(&stem, |surface| {
            surface.set_title(self.suite.name());
            event_bars(surface, &self.event_counts);
            Ok(())
        })?;

        Ok(vec![
            Item::image(path, Some(device_label)),
            Item::text("Everything Looks Fine"),
        ])
    }
}

pub struct FakeOperationSummarizer {
    members: Vec<Box<dyn SuiteHandler>>,
}

impl FakeOperationSummarizer {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Event counts summed over every member device.
    pub fn combined_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for handler in &self.members {
            for (event, count) in
                count_events(handler.suite().data_for_operation(FAKE_OPERATION))
            {
                *counts.entry(event).or_insert(0) += count;
            }
        }
        counts
    }
}

impl Default for FakeOperationSummarizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SuiteSummarizer for FakeOperationSummarizer {
    fn append(&mut self, handler: Box<dyn SuiteHandler>) {
        self.members.push(handler);
    }

    fn member_count(&self) -> usize {
        self.members.len()
    }

    fn render_synthesis(&self, ctx: &mut ReportContext) -> Result<Vec<Item>> {
        let counts = self.combined_counts();
        let heartbeats = counts.get("Heartbeat").copied().unwrap_or(0);

        let path = ctx.plot("fake_operation_summary", |surface| {
            surface.set_title("FakeOperation across devices");
            event_bars(surface, &counts);
            Ok(())
        })?;

        Ok(vec![
            Item::image(path, None),
            Item::text(format!(
                "{} Heartbeat events across {} device(s)",
                heartbeats,
                self.members.len()
            )),
            Item::text("Summarization Looks Fantastic"),
        ])
    }
}
