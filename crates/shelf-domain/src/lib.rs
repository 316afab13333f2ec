//! # Shelf Domain Layer
//!
//! The core of Shelf: a persistence-mapping layer that binds plain domain
//! structs ("entities") to records in a named collection through a
//! repository, without knowing the storage technology.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/      - Keys, values, records, the entity contract   ││
//! │  │  query/      - Predicate tree + builder (adapter-opaque)    ││
//! │  │  repository/ - Adapter port, error taxonomy, Repository     ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The repository never interprets a query expression and never talks to a
//! concrete store; both cross the `Adapter` port. Swap the adapter and
//! nothing in this crate changes.
//!
//! ## Quick tour
//!
//! ```
//! use shelf_domain::{entity, Repository};
//! # use shelf_domain::{Adapter, AdapterError, Key, Record, Query};
//! # use std::cell::RefCell;
//! # use std::collections::BTreeMap;
//! # struct Mem(RefCell<BTreeMap<Key, Record>>);
//! # impl Adapter for Mem {
//! #     fn insert(&self, _c: &str, id: Option<Key>, r: Record) -> Result<Key, AdapterError> {
//! #         let mut rows = self.0.borrow_mut();
//! #         let id = id.unwrap_or(Key::Int(rows.len() as i64 + 1));
//! #         rows.insert(id.clone(), r);
//! #         Ok(id)
//! #     }
//! #     fn update(&self, _c: &str, _i: &Key, _r: Record) -> Result<(), AdapterError> { Ok(()) }
//! #     fn delete(&self, _c: &str, _i: &Key) -> Result<(), AdapterError> { Ok(()) }
//! #     fn find_by_id(&self, _c: &str, id: &Key) -> Result<Option<Record>, AdapterError> {
//! #         Ok(self.0.borrow().get(id).cloned())
//! #     }
//! #     fn scan(&self, _c: &str) -> Result<Vec<(Key, Record)>, AdapterError> { Ok(vec![]) }
//! #     fn first(&self, _c: &str, _s: &str) -> Result<Option<(Key, Record)>, AdapterError> { Ok(None) }
//! #     fn last(&self, _c: &str, _s: &str) -> Result<Option<(Key, Record)>, AdapterError> { Ok(None) }
//! #     fn count(&self, _c: &str) -> Result<usize, AdapterError> { Ok(self.0.borrow().len()) }
//! #     fn clear(&self, _c: &str) -> Result<(), AdapterError> { Ok(()) }
//! #     fn run(&self, _c: &str, _q: &Query) -> Result<Vec<(Key, Record)>, AdapterError> { Ok(vec![]) }
//! # }
//!
//! entity! {
//!     pub struct User {
//!         name: String,
//!         age: i64,
//!     }
//! }
//!
//! let repo = Repository::<User, _>::new(Mem(RefCell::new(BTreeMap::new()))).unwrap();
//! let mut user = User::new("Luca".to_string(), 34);
//! let id = repo.create(&mut user).unwrap();
//! assert_eq!(repo.find(id).unwrap(), user);
//! ```

pub mod model;
pub mod query;
pub mod repository;

// Re-export commonly used types
pub use model::{
    entity::{default_collection, Entity, EntityError},
    key::Key,
    lookup::{IdBearer, Lookup},
    record::Record,
    value::{FromValue, Value},
};

pub use query::{
    builder::{Direction, Query, QueryBuilder, Sort},
    predicate::Predicate,
};

pub use repository::{
    adapter::{Adapter, AdapterError},
    error::{Error, Result},
    store::{Entities, Repository, RepositoryConfig},
};
