//! Entity - The contract the repository persists
//!
//! An entity is a plain struct with identity: a mutable id that is absent
//! until the record is persisted, plus a compile-time-declared field set.
//! Two entities are the same entity iff they have the same concrete type and
//! the same id - attribute values never participate in equality.
//!
//! The `entity!` macro generates the struct, the `Entity` impl, and the
//! id-only equality, replacing the kind of runtime accessor generation a
//! dynamic language would do at class-definition time.

use thiserror::Error;

use super::key::Key;
use super::record::Record;

/// Errors raised while converting between records and entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// The record carries an attribute the entity never declared.
    /// Unknown names always fail; they are never silently dropped.
    #[error("unknown attribute '{name}' for entity '{entity}'")]
    UnknownAttribute { entity: &'static str, name: String },

    /// A declared attribute is absent from the record.
    #[error("missing attribute '{name}' for entity '{entity}'")]
    MissingAttribute {
        entity: &'static str,
        name: &'static str,
    },

    /// A declared attribute is present but of the wrong value family.
    #[error("attribute '{name}' for entity '{entity}' is not a {expected}")]
    AttributeType {
        entity: &'static str,
        name: &'static str,
        expected: &'static str,
    },
}

/// The persistence contract.
///
/// Implementations are normally generated by the [`entity!`](crate::entity)
/// macro; hand-written impls only need to honor the same rules:
/// `from_record` must reject unknown attribute names, and equality must be
/// by id alone.
pub trait Entity: Clone {
    /// Concrete type name, used for diagnostics and the default collection.
    const NAME: &'static str;

    /// The declared attribute set. Hydration validates every record name
    /// against this list.
    const FIELDS: &'static [&'static str];

    /// The persisted id, absent until the entity has been created.
    fn id(&self) -> Option<Key>;

    /// Write the persisted id back onto the entity.
    fn set_id(&mut self, id: Key);

    /// Dump the declared attributes into a record. The id is not included.
    fn to_record(&self) -> Record;

    /// Rebuild an entity from a stored record.
    fn from_record(id: Key, record: &Record) -> Result<Self, EntityError>;

    /// The collection this entity type is stored under by default:
    /// pluralized, lowercased type name. Repositories may override it.
    fn collection() -> String {
        default_collection(Self::NAME)
    }
}

/// Default collection name for an entity type: `User` → `users`,
/// `City` → `cities`, `Boss` → `bosses`.
pub fn default_collection(name: &str) -> String {
    pluralize(&name.to_lowercase())
}

fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        let vowel_before = stem
            .chars()
            .last()
            .is_some_and(|c| "aeiou".contains(c));
        if !stem.is_empty() && !vowel_before {
            return format!("{}ies", stem);
        }
    }
    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{}es", word);
    }
    format!("{}s", word)
}

/// Validate every record attribute name against the declared field set.
pub fn check_declared_fields(
    entity: &'static str,
    fields: &'static [&'static str],
    record: &Record,
) -> Result<(), EntityError> {
    for name in record.names() {
        if !fields.contains(&name) {
            return Err(EntityError::UnknownAttribute {
                entity,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// Declare an entity struct with its persisted field set.
///
/// ```
/// shelf_domain::entity! {
///     /// A registered user.
///     pub struct User {
///         name: String,
///         age: i64,
///     }
/// }
///
/// let user = User::new("Luca".to_string(), 34);
/// assert!(user.id.is_none());
/// ```
///
/// Generates the struct (an `id: Option<Key>` slot plus the declared
/// fields, all public), a positional constructor, the [`Entity`] impl with
/// unknown-field rejection, and equality by `(type, id)`.
#[macro_export]
macro_rules! entity {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $ftype:ty
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            pub id: Option<$crate::model::key::Key>,
            $(
                $(#[$fmeta])*
                pub $field: $ftype,
            )+
        }

        impl $name {
            /// Positional constructor over the declared fields; the id
            /// starts unset.
            pub fn new($($field: $ftype),+) -> Self {
                Self {
                    id: None,
                    $($field,)+
                }
            }
        }

        impl $crate::model::entity::Entity for $name {
            const NAME: &'static str = stringify!($name);
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),+];

            fn id(&self) -> Option<$crate::model::key::Key> {
                self.id.clone()
            }

            fn set_id(&mut self, id: $crate::model::key::Key) {
                self.id = Some(id);
            }

            fn to_record(&self) -> $crate::model::record::Record {
                let mut record = $crate::model::record::Record::new();
                $(
                    record.insert(
                        stringify!($field),
                        $crate::model::value::Value::from(self.$field.clone()),
                    );
                )+
                record
            }

            fn from_record(
                id: $crate::model::key::Key,
                record: &$crate::model::record::Record,
            ) -> ::std::result::Result<Self, $crate::model::entity::EntityError> {
                $crate::model::entity::check_declared_fields(
                    Self::NAME,
                    Self::FIELDS,
                    record,
                )?;
                Ok(Self {
                    id: Some(id),
                    $(
                        $field: {
                            let value = record.get(stringify!($field)).ok_or(
                                $crate::model::entity::EntityError::MissingAttribute {
                                    entity: Self::NAME,
                                    name: stringify!($field),
                                },
                            )?;
                            <$ftype as $crate::model::value::FromValue>::from_value(value)
                                .ok_or(
                                    $crate::model::entity::EntityError::AttributeType {
                                        entity: Self::NAME,
                                        name: stringify!($field),
                                        expected: stringify!($ftype),
                                    },
                                )?
                        },
                    )+
                })
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $name {}
    };
}
