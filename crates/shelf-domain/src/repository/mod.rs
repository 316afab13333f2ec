//! Repository - Ports and the CRUD core
//!
//! The `Adapter` trait is the port: it defines WHAT the repository needs
//! from storage, not HOW it is done. `Repository` itself is storage-blind;
//! it only dispatches on identity state and maps adapter outcomes into the
//! error taxonomy.
//!
//! ```text
//! Domain Layer          │  Adapter Layer
//! ──────────────────────┼────────────────────────
//! trait Adapter         │  MemoryAdapter
//!   fn insert()         │  (sqlite, http, ... )
//!   fn run()            │
//! ```

pub mod adapter;
pub mod error;
pub mod store;
