// Concrete handler variants, one module per certification test type.
//
// Adding a test type means adding one module with a `spec()` and
// appending it to `default_registry`; dispatch logic never changes.

pub mod calculate_wait_pi;
pub mod memory_allocation;
pub mod schedule_affinity;

pub use calculate_wait_pi::CalculateWaitPiHandler;
pub use memory_allocation::MemoryAllocationHandler;
pub use schedule_affinity::ScheduleAffinityHandler;

use certrace_report::HandlerRegistry;

/// The production registry. Order is load-bearing: the first variant
/// whose predicate accepts a suite wins.
pub fn default_registry() -> HandlerRegistry {
    HandlerRegistry::new(vec![
        schedule_affinity::spec(),
        memory_allocation::spec(),
        calculate_wait_pi::spec(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_order_is_fixed() {
        let registry = default_registry();
        let ids: Vec<&str> = registry.specs().iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec!["schedule_affinity", "memory_allocation", "calculate_wait_pi"]
        );
    }
}
