//! Flat record comparison: diff two pre-extracted key/value mappings.
//!
//! Records are represented as `BTreeMap<String, serde_json::Value>`. Only
//! keys of the old record are inspected; a key missing from the new record
//! compares as `null`.

use std::collections::BTreeMap;

use fieldaudit_types::{AuditValue, ChangeSet, DiffEntry, IgnoredFields};
use serde_json::Value;
use tracing::debug;

use crate::error::DiffResult;
use crate::format::format_value;

/// A flat record of field name to JSON value.
pub type FlatRecord = BTreeMap<String, Value>;

/// Compare two flat records.
///
/// A key is recorded when it is not ignored and its old and new values are
/// not equal. Scalars render as plain text and `null` as an absent side.
/// Arrays and objects are compared deeply and rendered with the same rules
/// as object fields.
pub fn compute_flat_changes(
    old: &FlatRecord,
    new: &FlatRecord,
    ignored: &IgnoredFields,
) -> DiffResult<ChangeSet> {
    let mut changes = ChangeSet::new();

    for (key, old_value) in old {
        if ignored.contains(key) {
            continue;
        }
        let new_value = new.get(key).unwrap_or(&Value::Null);
        if old_value != new_value {
            changes.insert(key.as_str(), DiffEntry::new(flat_text(old_value)?, flat_text(new_value)?));
        }
    }

    debug!(keys = old.len(), changed = changes.len(), "flat changes computed");
    Ok(changes)
}

fn flat_text(value: &Value) -> DiffResult<Option<String>> {
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        Value::Array(_) | Value::Object(_) => Some(format_value(&value.audit_value())?),
    })
}
