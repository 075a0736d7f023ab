//! Per-field dispatch by declared category.

use fieldaudit_types::{Auditable, ChangeSet, DiffEntry, FieldDescriptor, FieldValue};
use tracing::trace;

use crate::error::{DiffError, DiffResult};
use crate::format::{display_text, format_value};

/// Read a declared field, failing if the object cannot produce it.
pub(crate) fn read_field<'a>(
    object: &'a dyn Auditable,
    field: &'static FieldDescriptor,
) -> DiffResult<FieldValue<'a>> {
    object
        .field_value(field.name())
        .ok_or(DiffError::FieldInaccessible {
            type_name: object.type_name(),
            field: field.name(),
        })
}

/// Compare one field and record a change if the values differ.
pub(crate) fn classify_field(
    changes: &mut ChangeSet,
    field: &FieldDescriptor,
    old: &FieldValue<'_>,
    new: &FieldValue<'_>,
) -> DiffResult<()> {
    if field.category().is_collection() {
        compare_collections(changes, field, old, new)
    } else {
        // Nested objects compare as whole values, like scalars.
        compare_whole(changes, field, old, new)
    }
}

fn compare_whole(
    changes: &mut ChangeSet,
    field: &FieldDescriptor,
    old: &FieldValue<'_>,
    new: &FieldValue<'_>,
) -> DiffResult<()> {
    if old == new {
        return Ok(());
    }
    trace!(field = field.name(), category = %field.category(), "field changed");
    changes.insert(
        field.name(),
        DiffEntry::texts(display_text(old)?, display_text(new)?),
    );
    Ok(())
}

/// Sequences compare element-wise in order; maps by content. Two empty
/// collections never count as a change.
fn compare_collections(
    changes: &mut ChangeSet,
    field: &FieldDescriptor,
    old: &FieldValue<'_>,
    new: &FieldValue<'_>,
) -> DiffResult<()> {
    if old.is_empty_collection() && new.is_empty_collection() {
        return Ok(());
    }
    if old == new {
        return Ok(());
    }
    trace!(field = field.name(), category = %field.category(), "collection changed");
    changes.insert(
        field.name(),
        DiffEntry::texts(format_value(old)?, format_value(new)?),
    );
    Ok(())
}
