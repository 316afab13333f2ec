//! Query DSL - Filter predicates and ordering
//!
//! Finders build expressions here; adapters interpret them. The repository
//! is only a courier between the two.

pub mod builder;
pub mod predicate;
