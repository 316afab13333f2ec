//! Domain Model - The vocabulary of Shelf
//!
//! Keys, values, records, the entity contract, and the lookup sum type.
//! Everything here is storage-agnostic; adapters only ever see `Key`,
//! `Value`, and `Record`.

pub mod entity;
pub mod key;
pub mod lookup;
pub mod record;
pub mod value;
