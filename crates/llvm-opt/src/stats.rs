//! Statistics counters
//!
//! A single owned, ordered counter map. Not a process-wide static: the
//! whole pipeline is single-threaded and synchronous, so the `Optimizer`
//! simply owns one and hands out `&mut` as it runs each pass.

use indexmap::IndexMap;

pub const CSE_DEAD: &str = "CSEDead";
pub const CSE_SIMPLIFY: &str = "CSESimplify";
pub const CSE_ELIM: &str = "CSEElim";
pub const CSE_LD_ELIM: &str = "CSELdElim";
pub const CSE_STORE2LOAD: &str = "CSEStore2Load";
pub const CSE_ST_ELIM: &str = "CSEStElim";

/// Enumeration order for `.stats` output -- the order counters were first
/// declared in spec, not insertion order at runtime.
const COUNTER_NAMES: &[&str] = &[CSE_DEAD, CSE_SIMPLIFY, CSE_ELIM, CSE_LD_ELIM, CSE_STORE2LOAD, CSE_ST_ELIM];

pub struct Stats {
    counters: IndexMap<&'static str, u64>,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    pub fn new() -> Self {
        let mut counters = IndexMap::new();
        for name in COUNTER_NAMES {
            counters.insert(*name, 0);
        }
        Self { counters }
    }

    pub fn increment(&mut self, name: &'static str) {
        *self.counters.entry(name).or_insert(0) += 1;
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Non-zero counters, in enumeration order -- the `.stats` file body.
    pub fn nonzero(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.counters.iter().filter(|(_, v)| **v != 0).map(|(k, v)| (*k, *v))
    }

    pub fn all(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.counters.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let stats = Stats::new();
        assert_eq!(stats.get(CSE_DEAD), 0);
        assert_eq!(stats.nonzero().count(), 0);
    }

    #[test]
    fn test_increment_is_monotonic() {
        let mut stats = Stats::new();
        stats.increment(CSE_DEAD);
        stats.increment(CSE_DEAD);
        assert_eq!(stats.get(CSE_DEAD), 2);
    }

    #[test]
    fn test_enumeration_order_preserved() {
        let mut stats = Stats::new();
        stats.increment(CSE_ST_ELIM);
        stats.increment(CSE_DEAD);
        let names: Vec<_> = stats.nonzero().map(|(n, _)| n).collect();
        assert_eq!(names, vec![CSE_DEAD, CSE_ST_ELIM]);
    }
}
