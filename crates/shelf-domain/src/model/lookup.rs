//! Lookup - The argument shape accepted by `Repository::find`
//!
//! A lookup is either a raw key or something that *carries* a key (a
//! reference object, a request token). Entities are deliberately neither:
//! an identity-bearing domain object is not a lookup key, and passing one
//! to `find` must not compile.

use super::key::Key;
use uuid::Uuid;

/// An object that exposes an id usable as a lookup key.
///
/// Implement this for reference/handle types, not for entities.
pub trait IdBearer {
    fn lookup_id(&self) -> Option<Key>;
}

/// Closed sum of the shapes `find` accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// A raw key value.
    Raw(Key),
    /// An id-bearer's key; `None` when the bearer exposes no id, which
    /// `find` reports as `EntityIdNotFound`.
    Bearer(Option<Key>),
}

impl Lookup {
    /// Wrap an id-bearing object.
    ///
    /// Entities do not implement [`IdBearer`], so handing one to `find` is
    /// a compile error rather than a runtime surprise:
    ///
    /// ```compile_fail
    /// use shelf_domain::model::lookup::Lookup;
    ///
    /// shelf_domain::entity! {
    ///     pub struct User {
    ///         name: String,
    ///     }
    /// }
    ///
    /// let user = User::new("Luca".to_string());
    /// let _ = Lookup::of(&user); // User is not an IdBearer
    /// ```
    pub fn of<B: IdBearer>(bearer: &B) -> Self {
        Lookup::Bearer(bearer.lookup_id())
    }
}

impl From<Key> for Lookup {
    fn from(key: Key) -> Self {
        Lookup::Raw(key)
    }
}

impl From<i64> for Lookup {
    fn from(id: i64) -> Self {
        Lookup::Raw(Key::from(id))
    }
}

impl From<&str> for Lookup {
    fn from(id: &str) -> Self {
        Lookup::Raw(Key::from(id))
    }
}

impl From<String> for Lookup {
    fn from(id: String) -> Self {
        Lookup::Raw(Key::from(id))
    }
}

impl From<Uuid> for Lookup {
    fn from(id: Uuid) -> Self {
        Lookup::Raw(Key::from(id))
    }
}
