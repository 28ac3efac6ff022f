//! Memoization for schedule generation.
//!
//! The generator is pure, so a schedule can be cached by its full input
//! tuple. Inputs are low-cardinality (bounded sliders and whole-won
//! amounts), so entries simply live for the lifetime of the cache.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::AgriLoanResult;

use super::generator::{generate_schedule, LoanSchedule, LoanTerms};

/// Schedule cache keyed by [`LoanTerms`]. No eviction.
#[derive(Debug, Default)]
pub struct ScheduleCache {
    entries: HashMap<LoanTerms, LoanSchedule>,
}

impl ScheduleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the schedule for `terms`, generating and storing it on first
    /// use. Invalid terms propagate their error and are never cached.
    pub fn get_or_generate(&mut self, terms: &LoanTerms) -> AgriLoanResult<&LoanSchedule> {
        match self.entries.entry(terms.clone()) {
            Entry::Occupied(slot) => Ok(slot.into_mut()),
            Entry::Vacant(slot) => {
                let schedule = generate_schedule(terms)?;
                Ok(slot.insert(schedule))
            }
        }
    }
}
