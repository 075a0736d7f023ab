//! Borrowed views of runtime field values.
//!
//! A [`FieldValue`] is what the differ sees when it reads a field: it borrows
//! from the audited object instead of cloning it, so nested objects keep
//! their identity for cycle detection.

use std::borrow::Cow;
use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value;

use crate::field::FieldCategory;
use crate::object::Auditable;

/// A leaf value.
#[derive(Clone, Debug)]
pub enum Scalar<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Text(Cow<'a, str>),
}

impl PartialEq for Scalar<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::UInt(a), Self::UInt(b)) => a == b,
            (Self::Int(a), Self::UInt(b)) | (Self::UInt(b), Self::Int(a)) => {
                u64::try_from(*a).is_ok_and(|a| a == *b)
            }
            // Bitwise, so NaN equals itself and 0.0 differs from -0.0.
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            // Debug keeps the fractional part, so `1.0` never reads as `1`.
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// The runtime value of a field.
#[derive(Clone)]
pub enum FieldValue<'a> {
    /// Absent value (`None`, JSON `null`).
    Null,
    Scalar(Scalar<'a>),
    /// Enum variant name.
    Enum(&'static str),
    Sequence(Vec<FieldValue<'a>>),
    /// Entries in the collection's own iteration order.
    Map(Vec<(FieldValue<'a>, FieldValue<'a>)>),
    Object(&'a dyn Auditable),
}

impl<'a> FieldValue<'a> {
    /// Build a text scalar.
    pub fn text(value: impl Into<Cow<'a, str>>) -> Self {
        Self::Scalar(Scalar::Text(value.into()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for a sequence or map without elements.
    pub fn is_empty_collection(&self) -> bool {
        match self {
            Self::Sequence(items) => items.is_empty(),
            Self::Map(entries) => entries.is_empty(),
            _ => false,
        }
    }
}

impl PartialEq for FieldValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            // Map equality ignores entry order.
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, value)| b.iter().any(|(k, v)| k == key && v == value))
            }
            (Self::Object(a), Self::Object(b)) => a.eq_dyn(*b),
            _ => false,
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
            Self::Enum(name) => f.debug_tuple("Enum").field(name).finish(),
            Self::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
            Self::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Self::Object(object) => f.debug_tuple("Object").field(&object.type_name()).finish(),
        }
    }
}

/// Conversion of a Rust value into a [`FieldValue`].
///
/// `CATEGORY` is the declared category used by descriptor tables; it must be
/// a constant so tables can be built at compile time.
pub trait AuditValue {
    const CATEGORY: FieldCategory;

    fn audit_value(&self) -> FieldValue<'_>;
}

macro_rules! signed_scalar {
    ($($ty:ty),*) => {
        $(impl AuditValue for $ty {
            const CATEGORY: FieldCategory = FieldCategory::Scalar;

            fn audit_value(&self) -> FieldValue<'_> {
                FieldValue::Scalar(Scalar::Int(i64::from(*self)))
            }
        })*
    };
}

macro_rules! unsigned_scalar {
    ($($ty:ty),*) => {
        $(impl AuditValue for $ty {
            const CATEGORY: FieldCategory = FieldCategory::Scalar;

            fn audit_value(&self) -> FieldValue<'_> {
                FieldValue::Scalar(Scalar::UInt(u64::from(*self)))
            }
        })*
    };
}

signed_scalar!(i8, i16, i32, i64);
unsigned_scalar!(u8, u16, u32, u64);

impl AuditValue for isize {
    const CATEGORY: FieldCategory = FieldCategory::Scalar;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::Scalar(Scalar::Int(*self as i64))
    }
}

impl AuditValue for usize {
    const CATEGORY: FieldCategory = FieldCategory::Scalar;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::Scalar(Scalar::UInt(*self as u64))
    }
}

impl AuditValue for f32 {
    const CATEGORY: FieldCategory = FieldCategory::Scalar;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::Scalar(Scalar::Float(f64::from(*self)))
    }
}

impl AuditValue for f64 {
    const CATEGORY: FieldCategory = FieldCategory::Scalar;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::Scalar(Scalar::Float(*self))
    }
}

impl AuditValue for bool {
    const CATEGORY: FieldCategory = FieldCategory::Scalar;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::Scalar(Scalar::Bool(*self))
    }
}

impl AuditValue for char {
    const CATEGORY: FieldCategory = FieldCategory::Scalar;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::Scalar(Scalar::Char(*self))
    }
}

impl AuditValue for str {
    const CATEGORY: FieldCategory = FieldCategory::Scalar;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::text(self)
    }
}

impl AuditValue for String {
    const CATEGORY: FieldCategory = FieldCategory::Scalar;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::text(self.as_str())
    }
}

impl AuditValue for Cow<'_, str> {
    const CATEGORY: FieldCategory = FieldCategory::Scalar;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::text(self.as_ref())
    }
}

impl AuditValue for uuid::Uuid {
    const CATEGORY: FieldCategory = FieldCategory::Scalar;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::text(self.to_string())
    }
}

impl<Tz> AuditValue for chrono::DateTime<Tz>
where
    Tz: chrono::TimeZone,
    Tz::Offset: fmt::Display,
{
    const CATEGORY: FieldCategory = FieldCategory::Scalar;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::text(self.to_rfc3339())
    }
}

impl AuditValue for chrono::NaiveDate {
    const CATEGORY: FieldCategory = FieldCategory::Scalar;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::text(self.to_string())
    }
}

/// JSON values are classified as scalars; their runtime shape still decides
/// how they are compared and rendered.
impl AuditValue for Value {
    const CATEGORY: FieldCategory = FieldCategory::Scalar;

    fn audit_value(&self) -> FieldValue<'_> {
        match self {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    FieldValue::Scalar(Scalar::UInt(u))
                } else if let Some(i) = n.as_i64() {
                    FieldValue::Scalar(Scalar::Int(i))
                } else {
                    FieldValue::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Value::String(s) => FieldValue::text(s.as_str()),
            Value::Array(items) => {
                FieldValue::Sequence(items.iter().map(AuditValue::audit_value).collect())
            }
            Value::Object(map) => FieldValue::Map(
                map.iter()
                    .map(|(k, v)| (FieldValue::text(k.as_str()), v.audit_value()))
                    .collect(),
            ),
        }
    }
}

impl AuditValue for dyn Auditable {
    const CATEGORY: FieldCategory = FieldCategory::Object;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::Object(self)
    }
}

impl<T: AuditValue> AuditValue for Option<T> {
    const CATEGORY: FieldCategory = T::CATEGORY;

    fn audit_value(&self) -> FieldValue<'_> {
        match self {
            Some(value) => value.audit_value(),
            None => FieldValue::Null,
        }
    }
}

impl<T: AuditValue> AuditValue for OnceCell<T> {
    const CATEGORY: FieldCategory = T::CATEGORY;

    fn audit_value(&self) -> FieldValue<'_> {
        self.get().map_or(FieldValue::Null, AuditValue::audit_value)
    }
}

macro_rules! delegate_pointer {
    ($($ptr:ident),*) => {
        $(impl<T: AuditValue + ?Sized> AuditValue for $ptr<T> {
            const CATEGORY: FieldCategory = T::CATEGORY;

            fn audit_value(&self) -> FieldValue<'_> {
                (**self).audit_value()
            }
        })*
    };
}

delegate_pointer!(Box, Rc, Arc);

impl<T: AuditValue + ?Sized> AuditValue for &T {
    const CATEGORY: FieldCategory = T::CATEGORY;

    fn audit_value(&self) -> FieldValue<'_> {
        (**self).audit_value()
    }
}

impl<T: AuditValue> AuditValue for [T] {
    const CATEGORY: FieldCategory = FieldCategory::Sequence;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::Sequence(self.iter().map(AuditValue::audit_value).collect())
    }
}

impl<T: AuditValue> AuditValue for Vec<T> {
    const CATEGORY: FieldCategory = FieldCategory::Sequence;

    fn audit_value(&self) -> FieldValue<'_> {
        self.as_slice().audit_value()
    }
}

impl<T: AuditValue> AuditValue for VecDeque<T> {
    const CATEGORY: FieldCategory = FieldCategory::Sequence;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::Sequence(self.iter().map(AuditValue::audit_value).collect())
    }
}

// Hash sets are deliberately absent: sequence equality is order-sensitive and
// their iteration order is not stable.
impl<T: AuditValue> AuditValue for BTreeSet<T> {
    const CATEGORY: FieldCategory = FieldCategory::Sequence;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::Sequence(self.iter().map(AuditValue::audit_value).collect())
    }
}

impl<K: AuditValue, V: AuditValue> AuditValue for BTreeMap<K, V> {
    const CATEGORY: FieldCategory = FieldCategory::Map;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::Map(
            self.iter()
                .map(|(k, v)| (k.audit_value(), v.audit_value()))
                .collect(),
        )
    }
}

impl<K: AuditValue, V: AuditValue, S: BuildHasher> AuditValue for HashMap<K, V, S> {
    const CATEGORY: FieldCategory = FieldCategory::Map;

    fn audit_value(&self) -> FieldValue<'_> {
        FieldValue::Map(
            self.iter()
                .map(|(k, v)| (k.audit_value(), v.audit_value()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn option_delegates_category_and_value() {
        assert_eq!(<Option<String>>::CATEGORY, FieldCategory::Scalar);
        assert_eq!(<Option<Vec<u8>>>::CATEGORY, FieldCategory::Sequence);
        assert!(None::<String>.audit_value().is_null());
        assert_eq!(Some(3u8).audit_value(), FieldValue::Scalar(Scalar::UInt(3)));
    }

    #[test]
    fn sequences_are_order_sensitive() {
        let a = vec![1, 2];
        let b = vec![2, 1];
        assert_ne!(a.audit_value(), b.audit_value());
        assert_eq!(a.audit_value(), vec![1, 2].audit_value());
    }

    #[test]
    fn maps_ignore_entry_order() {
        let mut a = HashMap::new();
        a.insert("x".to_string(), 1);
        a.insert("y".to_string(), 2);
        let b: BTreeMap<String, i32> = [("y".to_string(), 2), ("x".to_string(), 1)].into();
        assert_eq!(a.audit_value(), b.audit_value());
    }

    #[test]
    fn map_size_mismatch_is_unequal() {
        let a: BTreeMap<&str, i32> = [("x", 1)].into();
        let b: BTreeMap<&str, i32> = [("x", 1), ("y", 2)].into();
        assert_ne!(a.audit_value(), b.audit_value());
    }

    #[test]
    fn float_equality_is_bitwise() {
        assert_eq!(f64::NAN.audit_value(), f64::NAN.audit_value());
        assert_ne!(0.0f64.audit_value(), (-0.0f64).audit_value());
    }

    #[test]
    fn signed_and_unsigned_compare_by_value() {
        assert_eq!(5i32.audit_value(), 5u32.audit_value());
        assert_ne!((-1i32).audit_value(), u64::MAX.audit_value());
    }

    #[test]
    fn json_values_map_to_field_values() {
        let value = json!({"a": [1, -2, 1.5], "b": null, "c": "text", "d": true});
        let FieldValue::Map(entries) = value.audit_value() else {
            panic!("expected map");
        };
        assert_eq!(entries.len(), 4);
        assert_eq!(
            entries[0].1,
            FieldValue::Sequence(vec![
                FieldValue::Scalar(Scalar::UInt(1)),
                FieldValue::Scalar(Scalar::Int(-2)),
                FieldValue::Scalar(Scalar::Float(1.5)),
            ])
        );
        assert!(entries[1].1.is_null());
        assert_eq!(entries[2].1, FieldValue::text("text"));
    }

    #[test]
    fn empty_collections() {
        assert!(Vec::<u8>::new().audit_value().is_empty_collection());
        assert!(BTreeMap::<u8, u8>::new().audit_value().is_empty_collection());
        assert!(!vec![1].audit_value().is_empty_collection());
        assert!(!FieldValue::Null.is_empty_collection());
    }

    #[test]
    fn scalar_display() {
        assert_eq!(Scalar::Text("abc".into()).to_string(), "abc");
        assert_eq!(Scalar::Int(-4).to_string(), "-4");
        assert_eq!(Scalar::Bool(true).to_string(), "true");
        assert_eq!(Scalar::Float(1.0).to_string(), "1.0");
        assert_eq!(Scalar::Float(2.5).to_string(), "2.5");
        assert_eq!(Scalar::Float(f64::NAN).to_string(), "NaN");
        assert_eq!(uuid::Uuid::nil().audit_value(), FieldValue::text(uuid::Uuid::nil().to_string()));
    }
}
