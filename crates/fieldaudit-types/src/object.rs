//! Auditable objects and the macros that describe them.

use std::any::{Any, TypeId};

use crate::field::{FieldDescriptor, FieldRole};
use crate::value::FieldValue;

/// Identity of an object within one traversal.
///
/// The default key combines the concrete type with the location of the
/// value, which is stable for as long as the borrow being traversed lives.
/// Types with a persistent identity may override
/// [`Auditable::object_key`] with [`ObjectKey::stable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKey {
    Located { type_id: TypeId, addr: usize },
    Stable { type_id: TypeId, id: u64 },
}

impl ObjectKey {
    /// Key derived from where `value` lives.
    pub fn located<T: Any + ?Sized>(value: &T) -> Self {
        Self::Located {
            type_id: TypeId::of::<T>(),
            addr: (value as *const T).cast::<()>() as usize,
        }
    }

    /// Key derived from a caller-provided identifier.
    pub fn stable<T: Any + ?Sized>(id: u64) -> Self {
        Self::Stable {
            type_id: TypeId::of::<T>(),
            id,
        }
    }
}

/// A value whose declared fields can be enumerated and read by name.
///
/// Implementations are normally generated by [`auditable!`](crate::auditable).
pub trait Auditable: Any {
    /// Name of the concrete type, used in diagnostics.
    fn type_name(&self) -> &'static str;

    /// Declared fields in declaration order, private ones included.
    fn fields(&self) -> &'static [FieldDescriptor];

    /// Read a declared field. `None` means the field cannot be read.
    fn field_value(&self, name: &str) -> Option<FieldValue<'_>>;

    fn as_any(&self) -> &dyn Any;

    /// Value equality against another object of any type.
    fn eq_dyn(&self, other: &dyn Auditable) -> bool;

    fn object_key(&self) -> ObjectKey {
        ObjectKey::located(self)
    }

    /// Descriptor of the id-equivalent field, if the type declares one.
    fn id_field(&self) -> Option<&'static FieldDescriptor> {
        self.fields().iter().find(|field| field.role() == FieldRole::Id)
    }

    /// Descriptor of the name-equivalent field, if the type declares one.
    fn name_field(&self) -> Option<&'static FieldDescriptor> {
        self.fields().iter().find(|field| field.role() == FieldRole::Name)
    }

    fn declares_id(&self) -> bool {
        self.id_field().is_some()
    }

    fn declares_name(&self) -> bool {
        self.name_field().is_some()
    }
}

/// Define a struct and make it [`Auditable`].
///
/// The generated descriptor table lists every field in declaration order with
/// the category of its declared type. The struct must implement `PartialEq`,
/// which backs [`Auditable::eq_dyn`]; every field type must implement
/// [`AuditValue`](crate::AuditValue).
///
/// ```
/// use fieldaudit_types::{auditable, Auditable, FieldCategory};
///
/// auditable! {
///     #[derive(Debug, PartialEq)]
///     pub struct Owner {
///         pub id: Option<u64>,
///         pub name: String,
///         tags: Vec<String>,
///     }
/// }
///
/// let owner = Owner { id: Some(1), name: "Ana".into(), tags: vec![] };
/// assert_eq!(owner.fields().len(), 3);
/// assert_eq!(owner.fields()[2].category(), FieldCategory::Sequence);
/// ```
#[macro_export]
macro_rules! auditable {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field : $ty ),*
        }

        impl $crate::Auditable for $name {
            fn type_name(&self) -> &'static str {
                stringify!($name)
            }

            fn fields(&self) -> &'static [$crate::FieldDescriptor] {
                const FIELDS: &[$crate::FieldDescriptor] = &[
                    $( $crate::FieldDescriptor::new(
                        stringify!($field),
                        <$ty as $crate::AuditValue>::CATEGORY,
                    ) ),*
                ];
                FIELDS
            }

            fn field_value(&self, name: &str) -> ::std::option::Option<$crate::FieldValue<'_>> {
                match name {
                    $( stringify!($field) => ::std::option::Option::Some(
                        $crate::AuditValue::audit_value(&self.$field),
                    ), )*
                    _ => ::std::option::Option::None,
                }
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn eq_dyn(&self, other: &dyn $crate::Auditable) -> bool {
                other
                    .as_any()
                    .downcast_ref::<Self>()
                    .is_some_and(|other| self == other)
            }
        }

        impl $crate::AuditValue for $name {
            const CATEGORY: $crate::FieldCategory = $crate::FieldCategory::Object;

            fn audit_value(&self) -> $crate::FieldValue<'_> {
                $crate::FieldValue::Object(self)
            }
        }
    };
}

/// Define a fieldless enum whose values are audited by variant name.
///
/// A variant may be given an explicit label with `Variant => "LABEL"`.
///
/// ```
/// use fieldaudit_types::{audit_enum, AuditValue, FieldValue};
///
/// audit_enum! {
///     #[derive(Debug, Clone, Copy, PartialEq)]
///     pub enum Status {
///         Active => "ACTIVE",
///         Suspended,
///     }
/// }
///
/// assert_eq!(Status::Active.audit_value(), FieldValue::Enum("ACTIVE"));
/// assert_eq!(Status::Suspended.audit_value(), FieldValue::Enum("Suspended"));
/// ```
#[macro_export]
macro_rules! audit_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident $(=> $label:literal)? ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),*
        }

        impl $crate::AuditValue for $name {
            const CATEGORY: $crate::FieldCategory = $crate::FieldCategory::Enum;

            fn audit_value(&self) -> $crate::FieldValue<'_> {
                $crate::FieldValue::Enum(match self {
                    $( Self::$variant => $crate::audit_enum!(@label $variant $($label)?), )*
                })
            }
        }
    };
    (@label $variant:ident $label:literal) => {
        $label
    };
    (@label $variant:ident) => {
        stringify!($variant)
    };
}
