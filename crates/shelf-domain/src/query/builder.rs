//! Query Builder - Deferred, composable filter + ordering expressions
//!
//! The builder is supplied by the adapter (`Adapter::query`), refined by a
//! caller closure, and the built `Query` goes straight back to the adapter.
//! The repository never inspects its internals; it only carries it across.

use serde::{Deserialize, Serialize};

use super::predicate::Predicate;

/// Sort direction for an ordered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Asc,
    Desc,
}

/// An ordering over a single sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
}

/// An immutable filter/ordering expression, built once per finder
/// invocation and interpreted only by the adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub predicate: Predicate,
    pub order: Option<Sort>,
}

impl Query {
    /// A query matching the given predicate, unordered.
    pub fn matching(predicate: Predicate) -> Self {
        Self {
            predicate,
            order: None,
        }
    }
}

/// Chainable builder for a [`Query`].
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    predicate: Predicate,
    order: Option<Sort>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self {
            predicate: Predicate::True,
            order: None,
        }
    }

    /// Add a filter; successive filters AND-combine.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicate = match self.predicate {
            Predicate::True => predicate,
            current => Predicate::and([current, predicate]),
        };
        self
    }

    /// Set the ordering; a later call replaces an earlier one.
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order = Some(Sort {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn build(self) -> Query {
        Query {
            predicate: self.predicate,
            order: self.order,
        }
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
