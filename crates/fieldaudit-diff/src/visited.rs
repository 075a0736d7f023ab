//! Cycle guard for one formatting call.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use fieldaudit_types::{Auditable, ObjectKey};

/// Order in which an object was first entered during a traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraversalId(usize);

impl fmt::Display for TraversalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome of entering an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visit {
    First(TraversalId),
    Revisit(TraversalId),
}

/// Objects already entered during one top-level call.
///
/// A guard must not outlive the call that created it: keys are only
/// meaningful while the traversed borrows are alive.
#[derive(Debug, Default)]
pub struct VisitedGuard {
    entered: HashMap<ObjectKey, TraversalId>,
}

impl VisitedGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `object` as entered, assigning a traversal id the first time.
    pub fn enter(&mut self, object: &dyn Auditable) -> Visit {
        let next = TraversalId(self.entered.len());
        match self.entered.entry(object.object_key()) {
            Entry::Occupied(entry) => Visit::Revisit(*entry.get()),
            Entry::Vacant(entry) => Visit::First(*entry.insert(next)),
        }
    }

    /// Number of distinct objects entered.
    pub fn len(&self) -> usize {
        self.entered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entered.is_empty()
    }
}
