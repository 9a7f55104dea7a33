use anyhow::Result;
use certrace_types::{Item, Suite};

use crate::context::ReportContext;

/// Per-device classifier/renderer for one suite.
///
/// Lifecycle: constructed with ownership of its suite (eager
/// classification happens there, pure computation, no I/O), rendered
/// once during the per-device pass, then either discarded or handed to
/// a summarizer group for the cross-device pass.
pub trait SuiteHandler {
    /// The suite this handler was constructed for.
    fn suite(&self) -> &Suite;

    /// Render this device's report items in document order.
    ///
    /// Must produce a result for an empty suite (a "no data" item is
    /// fine) and must skip records lacking the fields it reads rather
    /// than failing. An `Err` here is contained by the assembler as one
    /// failed section.
    fn render(&self, ctx: &mut ReportContext) -> Result<Vec<Item>>;
}

/// Cross-device aggregator for all handlers of one logical suite.
///
/// Constructed empty through its variant's factory, it accumulates the
/// member handlers as each device's suite is processed, then renders a
/// synthesis exactly once after the per-device pass completes. A group
/// of size one is valid; member order is discovery order.
pub trait SuiteSummarizer {
    /// Take ownership of one more member handler.
    fn append(&mut self, handler: Box<dyn SuiteHandler>);

    fn member_count(&self) -> usize;

    /// Render the aggregate items for this group.
    fn render_synthesis(&self, ctx: &mut ReportContext) -> Result<Vec<Item>>;
}
