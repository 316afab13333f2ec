//! Repository - The type-bound CRUD/query gateway
//!
//! One repository maps one entity type to one named collection. Persistence
//! state is never stored on the entity; it is inferred per-operation from id
//! presence: `create` wants no stored record, `update`/`delete` want one,
//! `persist` dispatches between the two.

use std::marker::PhantomData;

use tracing::debug;

use crate::model::entity::Entity;
use crate::model::key::Key;
use crate::model::lookup::Lookup;
use crate::model::record::Record;
use crate::model::value::Value;
use crate::query::builder::{Query, QueryBuilder};
use crate::query::predicate::Predicate;
use crate::repository::adapter::{Adapter, AdapterError};
use crate::repository::error::{Error, Result};

/// Construction-time configuration.
///
/// The collection binding is resolved exactly once, here; there is no
/// mutable class-level state to race against in-flight operations.
#[derive(Debug, Clone, Default)]
pub struct RepositoryConfig {
    /// Collection name override. `None` means the entity's default
    /// (pluralized, lowercased type name).
    pub collection: Option<String>,
}

impl RepositoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, name: impl Into<String>) -> Self {
        self.collection = Some(name.into());
        self
    }
}

/// The CRUD/query gateway for one entity type and one collection.
pub struct Repository<E: Entity, A: Adapter> {
    adapter: A,
    collection: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity, A: Adapter> Repository<E, A> {
    /// Bind to the entity's default collection.
    pub fn new(adapter: A) -> Result<Self> {
        Self::with_config(adapter, RepositoryConfig::new())
    }

    /// Bind with an explicit configuration. An empty resolved collection
    /// name is a configuration error, caught before any operation runs.
    pub fn with_config(adapter: A, config: RepositoryConfig) -> Result<Self> {
        let collection = config.collection.unwrap_or_else(E::collection);
        if collection.is_empty() {
            return Err(Error::UnboundCollection { entity: E::NAME });
        }
        Ok(Self {
            adapter,
            collection,
            _entity: PhantomData,
        })
    }

    /// The bound collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Insert a new record for the entity.
    ///
    /// A caller-assigned id is preserved verbatim; an unset id is filled in
    /// by the adapter. On success the id is written back onto the entity
    /// and returned. A record already present at the id fails with
    /// [`Error::EntityExisted`].
    pub fn create(&self, entity: &mut E) -> Result<Key> {
        debug!(collection = %self.collection, entity = E::NAME, "create");
        match self
            .adapter
            .insert(&self.collection, entity.id(), entity.to_record())
        {
            Ok(id) => {
                entity.set_id(id.clone());
                Ok(id)
            }
            Err(AdapterError::DuplicateId { id, .. }) => Err(Error::EntityExisted {
                collection: self.collection.clone(),
                id,
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Overwrite the stored record with the entity's current attributes.
    pub fn update(&self, entity: &E) -> Result<()> {
        let Some(id) = entity.id() else {
            return Err(self.non_persisted(None));
        };
        debug!(collection = %self.collection, %id, "update");
        match self
            .adapter
            .update(&self.collection, &id, entity.to_record())
        {
            Ok(()) => Ok(()),
            Err(AdapterError::NotFound { .. }) => Err(self.non_persisted(Some(id))),
            Err(err) => Err(err.into()),
        }
    }

    /// Upsert dispatch: unset id creates, set id updates.
    pub fn persist(&self, entity: &mut E) -> Result<Key> {
        match entity.id() {
            None => self.create(entity),
            Some(id) => {
                self.update(entity)?;
                Ok(id)
            }
        }
    }

    /// Remove the entity's stored record. Other records are untouched.
    pub fn delete(&self, entity: &E) -> Result<()> {
        let Some(id) = entity.id() else {
            return Err(self.non_persisted(None));
        };
        debug!(collection = %self.collection, %id, "delete");
        match self.adapter.delete(&self.collection, &id) {
            Ok(()) => Ok(()),
            Err(AdapterError::NotFound { .. }) => Err(self.non_persisted(Some(id))),
            Err(err) => Err(err.into()),
        }
    }

    /// Fetch exactly one entity by id.
    ///
    /// Accepts raw keys (`find(42)`, `find("42")`) and id-bearers
    /// (`find(Lookup::of(&ticket))`). A bearer exposing no id fails with
    /// [`Error::EntityIdNotFound`]; a miss fails with
    /// [`Error::EntityNotFound`]. Entities are not accepted - see
    /// [`Lookup`].
    pub fn find(&self, lookup: impl Into<Lookup>) -> Result<E> {
        let id = match lookup.into() {
            Lookup::Raw(key) | Lookup::Bearer(Some(key)) => key,
            Lookup::Bearer(None) => return Err(Error::EntityIdNotFound),
        };
        match self.adapter.find_by_id(&self.collection, &id)? {
            Some(record) => Ok(E::from_record(id, &record)?),
            None => Err(Error::EntityNotFound {
                collection: self.collection.clone(),
                id,
            }),
        }
    }

    /// Every entity in the collection, as a restartable lazy sequence.
    /// Iteration order is storage-defined.
    pub fn all(&self) -> Result<Entities<E>> {
        let rows = self.adapter.scan(&self.collection)?;
        Ok(Entities::new(rows))
    }

    /// Block-style iteration: invoke `f` once per entity.
    pub fn each(&self, mut f: impl FnMut(E)) -> Result<()> {
        for entity in self.all()? {
            f(entity?);
        }
        Ok(())
    }

    /// The entity at the minimum of `sort_key`, absent-value when the
    /// collection is empty.
    pub fn first(&self, sort_key: &str) -> Result<Option<E>> {
        self.hydrate_optional(self.adapter.first(&self.collection, sort_key)?)
    }

    /// The entity at the maximum of `sort_key`, absent-value when the
    /// collection is empty.
    pub fn last(&self, sort_key: &str) -> Result<Option<E>> {
        self.hydrate_optional(self.adapter.last(&self.collection, sort_key)?)
    }

    /// Number of records in the collection.
    pub fn count(&self) -> Result<usize> {
        Ok(self.adapter.count(&self.collection)?)
    }

    /// Remove every record in the collection. Idempotent.
    pub fn clear(&self) -> Result<()> {
        debug!(collection = %self.collection, "clear");
        Ok(self.adapter.clear(&self.collection)?)
    }

    /// First entity whose attribute equals `value`, absent-value if none.
    pub fn find_by(&self, field: &str, value: impl Into<Value>) -> Result<Option<E>> {
        let query = self
            .adapter
            .query()
            .filter(Predicate::eq(field, value))
            .build();
        let mut rows = self.adapter.run(&self.collection, &query)?;
        if rows.is_empty() {
            return Ok(None);
        }
        let (id, record) = rows.remove(0);
        Ok(Some(E::from_record(id, &record)?))
    }

    /// Execute a custom finder: the closure refines the adapter-supplied
    /// builder into an expression, which runs as one logical query. Each
    /// invocation builds a fresh expression; finders stay stateless.
    pub fn query(&self, build: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Result<Vec<E>> {
        let query = build(self.adapter.query()).build();
        self.run(&query)
    }

    /// Execute a prebuilt expression (the composition path: one finder's
    /// expression refined or complemented by another).
    pub fn run(&self, query: &Query) -> Result<Vec<E>> {
        self.adapter
            .run(&self.collection, query)?
            .into_iter()
            .map(|(id, record)| E::from_record(id, &record).map_err(Error::from))
            .collect()
    }

    fn hydrate_optional(&self, row: Option<(Key, Record)>) -> Result<Option<E>> {
        match row {
            Some((id, record)) => Ok(Some(E::from_record(id, &record)?)),
            None => Ok(None),
        }
    }

    fn non_persisted(&self, id: Option<Key>) -> Error {
        Error::NonPersisted {
            collection: self.collection.clone(),
            id,
        }
    }
}

/// Restartable sequence of hydrated entities, produced by
/// [`Repository::all`].
pub struct Entities<E: Entity> {
    rows: Vec<(Key, Record)>,
    cursor: usize,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Entities<E> {
    fn new(rows: Vec<(Key, Record)>) -> Self {
        Self {
            rows,
            cursor: 0,
            _entity: PhantomData,
        }
    }

    /// Rewind to the beginning of the sequence.
    pub fn restart(&mut self) {
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<E: Entity> Iterator for Entities<E> {
    type Item = Result<E>;

    fn next(&mut self) -> Option<Self::Item> {
        let (id, record) = self.rows.get(self.cursor)?;
        self.cursor += 1;
        Some(E::from_record(id.clone(), record).map_err(Error::from))
    }
}
