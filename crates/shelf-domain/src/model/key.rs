//! Key - The identity of a stored record
//!
//! Ids arrive from callers in whatever shape is convenient (an integer, a
//! string, a UUID). A `Key` normalizes them so that the same logical id
//! always hits the same record: `"42"` and `42` are one key, `"abc"` stays a
//! plain string key. No other cross-type coercion happens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Normalized record identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Integer id (the native shape for sequence-generated ids)
    Int(i64),
    /// Opaque string id
    Str(String),
    /// UUID id
    Uuid(Uuid),
}

impl Key {
    /// Parse a raw string into its canonical key shape.
    ///
    /// Numeric strings become `Int`, UUID strings become `Uuid`, anything
    /// else stays `Str`. Insertion and lookup both go through this, so the
    /// two sides always agree on the representation.
    pub fn parse(raw: &str) -> Self {
        if let Ok(n) = raw.parse::<i64>() {
            return Key::Int(n);
        }
        if let Ok(u) = Uuid::parse_str(raw) {
            return Key::Uuid(u);
        }
        Key::Str(raw.to_string())
    }
}

impl From<i64> for Key {
    fn from(id: i64) -> Self {
        Key::Int(id)
    }
}

impl From<&str> for Key {
    fn from(id: &str) -> Self {
        Key::parse(id)
    }
}

impl From<String> for Key {
    fn from(id: String) -> Self {
        Key::parse(&id)
    }
}

impl From<Uuid> for Key {
    fn from(id: Uuid) -> Self {
        Key::Uuid(id)
    }
}

impl core::fmt::Display for Key {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{}", n),
            Key::Str(s) => write!(f, "{}", s),
            Key::Uuid(u) => write!(f, "{}", u),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_string_normalizes_to_int() {
        assert_eq!(Key::from("42"), Key::Int(42));
        assert_eq!(Key::from("42"), Key::from(42));
        assert_eq!(Key::from("-7"), Key::Int(-7));
    }

    #[test]
    fn test_uuid_string_normalizes_to_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(Key::from(id.to_string()), Key::Uuid(id));
    }

    #[test]
    fn test_plain_string_stays_string() {
        assert_eq!(Key::from("user-1a"), Key::Str("user-1a".to_string()));
    }

    #[test]
    fn test_different_representations_do_not_collide() {
        // "042" is numeric but a different literal than 42 once parsed
        assert_eq!(Key::from("042"), Key::Int(42));
        // non-numeric strings never match integer keys
        assert_ne!(Key::from("forty-two"), Key::Int(42));
    }

    #[test]
    fn test_display_round_trips() {
        let key = Key::Int(7);
        assert_eq!(Key::parse(&key.to_string()), key);

        let key = Key::Str("draft".to_string());
        assert_eq!(Key::parse(&key.to_string()), key);
    }
}
