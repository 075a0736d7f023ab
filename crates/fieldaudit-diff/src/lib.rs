//! Field-level differ for audit trails.
//!
//! Compares two values of the same auditable type field by field and
//! produces an ordered [`ChangeSet`] of before/after snapshots. Complex
//! values are rendered into a canonical, write-only text form; nested
//! objects are summarized by id and name when possible, and reference cycles
//! collapse to a placeholder.
//!
//! # Key Functions
//!
//! - [`compute_changes`] / [`compute_changes_dyn`] -- Object comparison
//! - [`compute_flat_changes`] -- Flat record comparison (`BTreeMap<String, Value>`)
//! - [`format_value`] -- Canonical rendering of a single value
//! - [`AuditRecord::create`] -- Build an audit record from a request

mod classify;
pub mod error;
pub mod flat_diff;
pub mod format;
pub mod object_diff;
pub mod record;
mod summary;
pub mod visited;

pub use error::{DiffError, DiffResult};
pub use fieldaudit_types::{ChangeSet, DiffEntry, IgnoredFields};
pub use flat_diff::{compute_flat_changes, FlatRecord};
pub use format::{display_text, format_value, ValueFormatter, CYCLE_PLACEHOLDER, NULL_TEXT};
pub use object_diff::{compute_changes, compute_changes_dyn};
pub use record::{AuditRecord, AuditRequest};
pub use visited::{TraversalId, Visit, VisitedGuard};
