use certrace_types::{Datum, Suite};

use crate::handler::{SuiteHandler, SuiteSummarizer};

/// Capability predicate for one handler variant.
///
/// The matcher is the stateless half of a variant: it answers "can you
/// handle this" without constructing anything. Handler state exists
/// only after a match.
pub enum Matcher {
    /// Accept when the suite as a whole satisfies the predicate
    /// (typically a `suite.name()` substring or an operation-id probe).
    Suite(fn(&Suite) -> bool),
    /// Accept when at least one datum in the suite satisfies the
    /// predicate.
    Datum(fn(&Datum) -> bool),
}

impl Matcher {
    pub fn matches(&self, suite: &Suite) -> bool {
        match self {
            Matcher::Suite(predicate) => predicate(suite),
            Matcher::Datum(predicate) => suite.data().iter().any(predicate),
        }
    }
}

/// One registered handler variant.
pub struct HandlerSpec {
    /// Stable variant id; also one half of the summarizer grouping key
    /// and the prefix of the variant's artifact names.
    pub id: &'static str,
    pub matcher: Matcher,
    pub construct: fn(Suite) -> Box<dyn SuiteHandler>,
    /// `None` declares the variant has no meaningful cross-device
    /// summary; the assembler never creates a group for it.
    pub summarizer: Option<fn() -> Box<dyn SuiteSummarizer>>,
}

/// Ordered list of handler variants.
///
/// Registries are built explicitly by the caller and passed into the
/// assembler; there is no process-wide registry. Order is a total
/// order fixed at construction: when two predicates could accept the
/// same suite, the earlier variant wins, so changing the order changes
/// dispatch.
pub struct HandlerRegistry {
    specs: Vec<HandlerSpec>,
}

impl HandlerRegistry {
    pub fn new(specs: Vec<HandlerSpec>) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[HandlerSpec] {
        &self.specs
    }

    /// First variant in registry order whose predicate accepts the
    /// suite. `None` means the suite produces no per-device section,
    /// which is not an error.
    pub fn match_suite(&self, suite: &Suite) -> Option<&HandlerSpec> {
        self.specs.iter().find(|spec| spec.matcher.matches(suite))
    }

    /// Match and construct in one step, for callers that don't need the
    /// suite back on a miss.
    pub fn create_suite_handler(&self, suite: Suite) -> Option<Box<dyn SuiteHandler>> {
        let spec = self.match_suite(&suite)?;
        Some((spec.construct)(suite))
    }
}
