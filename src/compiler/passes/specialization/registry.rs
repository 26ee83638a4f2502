//! Run-wide bookkeeping for the specialization pass.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::ir::FunctionId;

/// Tracks which functions are clones and hands out clone names.
///
/// One registry lives for exactly one run of the pass. Name counters are
/// keyed by the bare function name, so every clone of `f` is numbered from
/// the same sequence: `f1`, `f2`, and so on.
#[derive(Debug, Clone, Default)]
pub struct CloneRegistry {
    clones: FxHashSet<FunctionId>,
    counters: FxHashMap<String, usize>,
}

impl CloneRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `function` was created by this run.
    #[must_use]
    pub fn is_clone(&self, function: FunctionId) -> bool {
        self.clones.contains(&function)
    }

    /// Marks `function` as a clone.
    pub fn register(&mut self, function: FunctionId) {
        self.clones.insert(function);
    }

    /// Returns the next clone name for `name` and advances its counter.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use argspec::compiler::CloneRegistry;
    ///
    /// let mut registry = CloneRegistry::new();
    /// assert_eq!(registry.next_clone_name("f"), "f1");
    /// assert_eq!(registry.next_clone_name("f"), "f2");
    /// assert_eq!(registry.next_clone_name("g"), "g1");
    /// ```
    pub fn next_clone_name(&mut self, name: &str) -> String {
        let counter = self.counters.entry(name.to_string()).or_insert(0);
        *counter += 1;
        format!("{name}{counter}")
    }

    /// Returns how many clone names have been handed out for `name`.
    #[must_use]
    pub fn counter(&self, name: &str) -> usize {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Returns the number of registered clones.
    #[must_use]
    pub fn clone_count(&self) -> usize {
        self.clones.len()
    }

    /// Iterates over the registered clones in no particular order.
    pub fn clones(&self) -> impl Iterator<Item = FunctionId> + '_ {
        self.clones.iter().copied()
    }

    /// Forgets every clone and counter.
    pub fn clear(&mut self) {
        self.clones.clear();
        self.counters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_per_name() {
        let mut registry = CloneRegistry::new();
        assert_eq!(registry.next_clone_name("sum"), "sum1");
        assert_eq!(registry.next_clone_name("max"), "max1");
        assert_eq!(registry.next_clone_name("sum"), "sum2");
        assert_eq!(registry.counter("sum"), 2);
        assert_eq!(registry.counter("abs"), 0);
    }

    #[test]
    fn test_counter_advances_without_registration() {
        let mut registry = CloneRegistry::new();
        registry.next_clone_name("f");
        registry.next_clone_name("f");
        assert_eq!(registry.clone_count(), 0);
        assert_eq!(registry.next_clone_name("f"), "f3");
    }

    #[test]
    fn test_register_and_clear() {
        let mut registry = CloneRegistry::new();
        registry.register(FunctionId::new(3));
        registry.next_clone_name("f");

        assert!(registry.is_clone(FunctionId::new(3)));
        assert!(!registry.is_clone(FunctionId::new(0)));
        assert_eq!(registry.clones().collect::<Vec<_>>(), vec![FunctionId::new(3)]);

        registry.clear();
        assert_eq!(registry.clone_count(), 0);
        assert_eq!(registry.next_clone_name("f"), "f1");
    }
}
