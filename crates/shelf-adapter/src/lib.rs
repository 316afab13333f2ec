//! # Shelf Adapter Layer
//!
//! Storage implementations of the `Adapter` port defined in `shelf-domain`.
//!
//! The domain decides WHAT a repository needs; this crate decides HOW a
//! particular technology delivers it. Currently:
//!
//! - `memory` - thread-safe in-memory store, the default for tests and
//!   development.

pub mod memory;

pub use memory::{IdStrategy, MemoryAdapter};

// TODO: sqlite adapter once a file-backed store is needed
