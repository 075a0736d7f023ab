//! Foundation types for field-level auditing.
//!
//! This crate describes *what* can be compared: the static field table of an
//! auditable type, borrowed views of its runtime values, and the change set a
//! comparison produces. The comparison itself lives in `fieldaudit-diff`.
//!
//! # Key Types
//!
//! - [`Auditable`] — A type whose fields can be enumerated and read by name
//! - [`FieldDescriptor`] — Name, [`FieldCategory`] and [`FieldRole`] of one field
//! - [`FieldValue`] / [`Scalar`] — Borrowed view of a field's runtime value
//! - [`AuditValue`] — Conversion from Rust values into [`FieldValue`]
//! - [`DiffEntry`] / [`ChangeSet`] — Ordered before/after snapshots per field
//! - [`IgnoredFields`] — Field names excluded from comparison
//!
//! Types are usually made auditable with the [`auditable!`] and
//! [`audit_enum!`] macros, which generate the descriptor table once per type.

pub mod change;
pub mod field;
pub mod ignored;
pub mod object;
pub mod value;

pub use change::{ChangeSet, DiffEntry};
pub use field::{FieldCategory, FieldDescriptor, FieldRole, RESERVED_FIELD_PREFIX};
pub use ignored::IgnoredFields;
pub use object::{Auditable, ObjectKey};
pub use value::{AuditValue, FieldValue, Scalar};
