use serde::Serialize;

use certrace_types::{Item, Suite};

use crate::context::ReportContext;
use crate::handler::{SuiteHandler, SuiteSummarizer};
use crate::registry::HandlerRegistry;

/// One rendered document section: a suite on one device, or one
/// summarizer group's synthesis.
#[derive(Debug, Serialize)]
pub struct Section {
    pub suite_name: String,
    /// Absent for cross-device synthesis sections.
    pub device_label: Option<String>,
    pub items: Vec<Item>,
    /// A contained rendering failure; the section stays in the
    /// document as a gap marker.
    pub failure: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssembledReport {
    pub sections: Vec<Section>,
    pub synthesis: Vec<Section>,
}

impl AssembledReport {
    pub fn failed_section_count(&self) -> usize {
        self.sections
            .iter()
            .chain(self.synthesis.iter())
            .filter(|s| s.failure.is_some())
            .count()
    }
}

struct SummaryGroup {
    variant_id: &'static str,
    suite_name: String,
    summarizer: Box<dyn SuiteSummarizer>,
}

/// Walks all suites of a run through the registry: per-device render
/// pass first, then one synthesis per summarizer group.
///
/// Failures are contained at the smallest omittable unit: one suite's
/// section or one group's synthesis. The document is always produced,
/// possibly with gaps.
pub struct ReportAssembler {
    registry: HandlerRegistry,
}

impl ReportAssembler {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn assemble(&self, suites: Vec<Suite>, ctx: &mut ReportContext) -> AssembledReport {
        let mut sections = Vec::new();
        let mut groups: Vec<SummaryGroup> = Vec::new();

        for suite in suites {
            let Some(spec) = self.registry.match_suite(&suite) else {
                log::debug!("no handler variant for suite {:?}", suite.name());
                continue;
            };

            let handler = (spec.construct)(suite);
            let suite_name = handler.suite().name().to_string();
            let device_label = handler.suite().device().label();

            let section = match handler.render(ctx) {
                Ok(items) => Section {
                    suite_name: suite_name.clone(),
                    device_label: Some(device_label),
                    items,
                    failure: None,
                },
                Err(err) => {
                    log::warn!("rendering failed for suite {:?}: {:#}", suite_name, err);
                    Section {
                        suite_name: suite_name.clone(),
                        device_label: Some(device_label),
                        items: Vec::new(),
                        failure: Some(format!("{err:#}")),
                    }
                }
            };
            sections.push(section);

            // Handlers join their group even when rendering failed;
            // classification state built at construction is still valid
            // for the cross-device pass.
            if let Some(factory) = spec.summarizer {
                let position = groups
                    .iter()
                    .position(|g| g.variant_id == spec.id && g.suite_name == suite_name);
                let index = match position {
                    Some(index) => index,
                    None => {
                        groups.push(SummaryGroup {
                            variant_id: spec.id,
                            suite_name: suite_name.clone(),
                            summarizer: factory(),
                        });
                        groups.len() - 1
                    }
                };
                groups[index].summarizer.append(handler);
            }
        }

        let mut synthesis = Vec::new();
        for group in &groups {
            let section = match group.summarizer.render_synthesis(ctx) {
                Ok(items) => Section {
                    suite_name: group.suite_name.clone(),
                    device_label: None,
                    items,
                    failure: None,
                },
                Err(err) => {
                    log::warn!(
                        "summarization failed for suite {:?} ({}): {:#}",
                        group.suite_name,
                        group.variant_id,
                        err
                    );
                    Section {
                        suite_name: group.suite_name.clone(),
                        device_label: None,
                        items: Vec::new(),
                        failure: Some(format!("{err:#}")),
                    }
                }
            };
            synthesis.push(section);
        }

        AssembledReport { sections, synthesis }
    }
}
