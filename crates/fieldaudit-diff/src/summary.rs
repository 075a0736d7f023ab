//! Entity summaries: short renderings of nested objects.
//!
//! An object with both an id and a name is reduced to those two fields. An
//! object with only an id leads with it and then dumps its other fields. An
//! object without an id is dumped in full.

use fieldaudit_types::{Auditable, FieldDescriptor, FieldValue};

use crate::classify::read_field;
use crate::error::DiffResult;
use crate::format::{quote, ValueFormatter};

pub(crate) fn summarize(
    formatter: &mut ValueFormatter,
    object: &dyn Auditable,
    depth: usize,
) -> DiffResult<String> {
    let id = present_field(object, object.id_field())?;
    let name = present_field(object, object.name_field())?;

    let mut parts = Vec::new();
    match (id, name) {
        (Some((_, id)), Some((_, name))) => {
            parts.push(format!("\"id\": {}", quote(formatter.plain_at(&id, depth + 1)?)));
            parts.push(format!("\"name\": {}", quote(formatter.plain_at(&name, depth + 1)?)));
        }
        (Some((id_field, id)), None) => {
            parts.push(format!("\"id\": {}", quote(formatter.plain_at(&id, depth + 1)?)));
            dump_fields(formatter, object, Some(id_field), depth, &mut parts)?;
        }
        (None, _) => dump_fields(formatter, object, None, depth, &mut parts)?,
    }
    Ok(format!("{{{}}}", parts.join(", ")))
}

/// The field's descriptor and value, if declared and not null.
fn present_field<'a>(
    object: &'a dyn Auditable,
    field: Option<&'static FieldDescriptor>,
) -> DiffResult<Option<(&'static FieldDescriptor, FieldValue<'a>)>> {
    let Some(field) = field else {
        return Ok(None);
    };
    let value = read_field(object, field)?;
    Ok((!value.is_null()).then_some((field, value)))
}

fn dump_fields(
    formatter: &mut ValueFormatter,
    object: &dyn Auditable,
    skip: Option<&FieldDescriptor>,
    depth: usize,
    parts: &mut Vec<String>,
) -> DiffResult<()> {
    for field in object.fields() {
        if field.is_reserved() || skip.is_some_and(|skip| skip.name() == field.name()) {
            continue;
        }
        let value = read_field(object, field)?;
        if value.is_null() || matches!(&value, FieldValue::Sequence(items) if items.is_empty()) {
            continue;
        }
        let rendered = formatter.format_at(&value, depth + 1)?;
        parts.push(format!("{}: {}", quote(field.name()), rendered));
    }
    Ok(())
}
