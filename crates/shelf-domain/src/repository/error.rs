//! Error taxonomy for repository operations
//!
//! Expected business states are not errors: `first`, `last`, and `find_by`
//! return `Ok(None)` on miss. Only `find` (singular, by id) raises on miss.

use thiserror::Error;

use crate::model::entity::EntityError;
use crate::model::key::Key;
use crate::repository::adapter::AdapterError;

/// Errors raised by repository operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// `create` hit a record that already exists at the entity's id.
    #[error("entity already exists with id {id} in collection '{collection}'")]
    EntityExisted { collection: String, id: Key },

    /// `update`/`delete` on an entity with no stored record (unset id, or
    /// an id absent from the collection).
    #[error("entity has no persisted record in collection '{collection}'")]
    NonPersisted {
        collection: String,
        id: Option<Key>,
    },

    /// `find` by an id that matches no record.
    #[error("no entity with id {id} in collection '{collection}'")]
    EntityNotFound { collection: String, id: Key },

    /// `find` with an id-bearer that exposes no id value.
    #[error("lookup argument does not expose an id")]
    EntityIdNotFound,

    /// The repository was constructed with an empty collection name.
    #[error("collection name for entity '{entity}' is empty")]
    UnboundCollection { entity: &'static str },

    /// Hydrating a stored record into an entity failed.
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Residual adapter fault (backend failure). Duplicate-id and
    /// not-found outcomes are mapped to the typed variants above before
    /// ever reaching this one.
    #[error(transparent)]
    Adapter(AdapterError),
}

impl From<AdapterError> for Error {
    fn from(err: AdapterError) -> Self {
        Error::Adapter(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
