//! Static field descriptors.

use std::fmt;

use serde::Serialize;

/// Fields whose name starts with this prefix are internal markers and are
/// never included in field dumps.
pub const RESERVED_FIELD_PREFIX: &str = "_";

/// Comparison category of a field, derived from its declared type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCategory {
    /// Plain values: numbers, text, booleans, identifiers, timestamps.
    Scalar,
    /// Fieldless enums, rendered by variant name.
    Enum,
    /// Ordered collections.
    Sequence,
    /// Key/value collections.
    Map,
    /// Nested auditable objects.
    Object,
}

impl FieldCategory {
    /// Returns `true` for sequence and map categories.
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Sequence | Self::Map)
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Scalar => "scalar",
            Self::Enum => "enum",
            Self::Sequence => "sequence",
            Self::Map => "map",
            Self::Object => "object",
        };
        f.write_str(label)
    }
}

/// Semantic role a field plays when an object is summarized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    #[default]
    Plain,
    /// The object's identifier.
    Id,
    /// The object's human-readable name.
    Name,
}

impl FieldRole {
    /// Role implied by a field name: `id` and `name` are recognized.
    pub const fn infer(name: &str) -> Self {
        if const_str_eq(name, "id") {
            Self::Id
        } else if const_str_eq(name, "name") {
            Self::Name
        } else {
            Self::Plain
        }
    }
}

/// Name, category and role of one declared field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FieldDescriptor {
    name: &'static str,
    category: FieldCategory,
    role: FieldRole,
}

impl FieldDescriptor {
    /// Describe a field. The role is inferred from the name.
    pub const fn new(name: &'static str, category: FieldCategory) -> Self {
        Self {
            name,
            category,
            role: FieldRole::infer(name),
        }
    }

    /// Override the inferred role, e.g. to mark `uuid` as the id field.
    pub const fn with_role(mut self, role: FieldRole) -> Self {
        self.role = role;
        self
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn category(&self) -> FieldCategory {
        self.category
    }

    pub const fn role(&self) -> FieldRole {
        self.role
    }

    /// Returns `true` if the field is an internal marker.
    pub fn is_reserved(&self) -> bool {
        self.name.starts_with(RESERVED_FIELD_PREFIX)
    }
}

const fn const_str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}
