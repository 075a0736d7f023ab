//! Canonical rendering of field values.
//!
//! The output is write-only: it is meant for audit trails and is never
//! parsed back. Maps share the `[ ... ]` delimiters of sequences, so the two
//! cannot be told apart on read-back.

use std::mem;

use fieldaudit_types::{Auditable, FieldValue};
use tracing::trace;

use crate::error::DiffResult;
use crate::summary;
use crate::visited::{Visit, VisitedGuard};

/// Rendering of an object entered a second time in one call.
pub const CYCLE_PLACEHOLDER: &str = "{...}";

/// Rendering of an absent value.
pub const NULL_TEXT: &str = "null";

/// Render a value in one top-level formatting call.
pub fn format_value(value: &FieldValue<'_>) -> DiffResult<String> {
    ValueFormatter::new().format(value)
}

/// Plain textual form of a value.
///
/// Scalars render unquoted; everything else goes through [`format_value`].
pub fn display_text(value: &FieldValue<'_>) -> DiffResult<String> {
    match value {
        FieldValue::Null => Ok(NULL_TEXT.to_string()),
        FieldValue::Scalar(scalar) => Ok(scalar.to_string()),
        other => format_value(other),
    }
}

pub(crate) fn quote(text: impl std::fmt::Display) -> String {
    format!("\"{text}\"")
}

/// Recursive formatter sharing one [`VisitedGuard`] across a call tree.
#[derive(Debug, Default)]
pub struct ValueFormatter {
    visited: VisitedGuard,
}

impl ValueFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(&mut self, value: &FieldValue<'_>) -> DiffResult<String> {
        let rendered = self.format_at(value, 0)?;
        trace!(objects = self.visited.len(), "value formatted");
        Ok(rendered)
    }

    /// `depth` is descriptive only; termination relies on the guard.
    pub(crate) fn format_at(&mut self, value: &FieldValue<'_>, depth: usize) -> DiffResult<String> {
        match value {
            FieldValue::Null => Ok(NULL_TEXT.to_string()),
            FieldValue::Enum(name) => Ok(quote(name)),
            FieldValue::Scalar(scalar) => Ok(quote(scalar)),
            FieldValue::Sequence(items) => self.format_sequence(items, depth),
            FieldValue::Map(entries) => self.format_map(entries, depth),
            FieldValue::Object(object) => self.format_object(*object, depth),
        }
    }

    /// Unquoted form, sharing this call's guard.
    pub(crate) fn plain_at(&mut self, value: &FieldValue<'_>, depth: usize) -> DiffResult<String> {
        match value {
            FieldValue::Null => Ok(NULL_TEXT.to_string()),
            FieldValue::Scalar(scalar) => Ok(scalar.to_string()),
            FieldValue::Enum(name) => Ok((*name).to_string()),
            other => self.format_at(other, depth),
        }
    }

    fn format_sequence(&mut self, items: &[FieldValue<'_>], depth: usize) -> DiffResult<String> {
        trace!(depth, len = items.len(), "formatting sequence");
        if items.is_empty() {
            return Ok("[]".to_string());
        }
        let rendered = items
            .iter()
            .map(|item| self.format_at(item, depth + 1))
            .collect::<DiffResult<Vec<_>>>()?;
        Ok(format!("[{}]", rendered.join(", ")))
    }

    fn format_map(
        &mut self,
        entries: &[(FieldValue<'_>, FieldValue<'_>)],
        depth: usize,
    ) -> DiffResult<String> {
        trace!(depth, len = entries.len(), "formatting map");
        if entries.is_empty() {
            return Ok("[]".to_string());
        }

        // Sort before rendering values so the guard sees objects in output order.
        let mut keyed = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            keyed.push((self.plain_at(key, depth + 1)?, value));
        }
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        let mut rendered = Vec::with_capacity(keyed.len());
        for (key, value) in keyed {
            rendered.push(format!("{}: {}", quote(key), self.format_at(value, depth + 1)?));
        }
        Ok(format!("[{}]", rendered.join(", ")))
    }

    fn format_object(&mut self, object: &dyn Auditable, depth: usize) -> DiffResult<String> {
        // Zero-sized values share one address and cannot reach back to themselves.
        if mem::size_of_val(object.as_any()) == 0 {
            trace!(depth, type_name = object.type_name(), "summarizing zero-sized object");
            return summary::summarize(self, object, depth);
        }
        match self.visited.enter(object) {
            Visit::Revisit(id) => {
                trace!(depth, %id, type_name = object.type_name(), "object already entered");
                Ok(CYCLE_PLACEHOLDER.to_string())
            }
            Visit::First(id) => {
                trace!(depth, %id, type_name = object.type_name(), "summarizing object");
                summary::summarize(self, object, depth)
            }
        }
    }
}
