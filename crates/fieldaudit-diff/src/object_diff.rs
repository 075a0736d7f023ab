//! Object comparison: diff two values of the same auditable type field by
//! field.

use fieldaudit_types::{Auditable, ChangeSet, IgnoredFields};
use tracing::{debug, trace};

use crate::classify::{classify_field, read_field};
use crate::error::{DiffError, DiffResult};

/// Compare two values of the same type.
///
/// Every declared field not in `ignored` is compared under its category's
/// rule. Changed fields appear in declaration order.
pub fn compute_changes<T: Auditable>(
    old: &T,
    new: &T,
    ignored: &IgnoredFields,
) -> DiffResult<ChangeSet> {
    diff_objects(old, new, ignored)
}

/// Compare two type-erased values.
///
/// Fails with [`DiffError::InvalidArgument`] if either value is absent or
/// their runtime types differ.
pub fn compute_changes_dyn(
    old: Option<&dyn Auditable>,
    new: Option<&dyn Auditable>,
    ignored: &IgnoredFields,
) -> DiffResult<ChangeSet> {
    let (Some(old), Some(new)) = (old, new) else {
        return Err(DiffError::InvalidArgument("objects cannot be absent".into()));
    };
    if old.as_any().type_id() != new.as_any().type_id() {
        return Err(DiffError::InvalidArgument(format!(
            "objects must be of the same type, got {} and {}",
            old.type_name(),
            new.type_name()
        )));
    }
    diff_objects(old, new, ignored)
}

fn diff_objects(
    old: &dyn Auditable,
    new: &dyn Auditable,
    ignored: &IgnoredFields,
) -> DiffResult<ChangeSet> {
    let fields = old.fields();
    debug!(
        type_name = old.type_name(),
        fields = fields.len(),
        ignored = ignored.len(),
        "computing object changes"
    );

    let mut changes = ChangeSet::new();
    for field in fields {
        if ignored.contains(field.name()) {
            trace!(field = field.name(), "field ignored");
            continue;
        }
        let old_value = read_field(old, field)?;
        let new_value = read_field(new, field)?;
        classify_field(&mut changes, field, &old_value, &new_value)?;
    }

    debug!(type_name = old.type_name(), changed = changes.len(), "object changes computed");
    Ok(changes)
}
