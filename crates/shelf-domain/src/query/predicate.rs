//! Predicate - A serializable filter tree
//!
//! Custom finders compose these; adapters interpret them. The tree is plain
//! data (serde-serializable), so an adapter can walk it, translate it to its
//! own query language, or ship it over a wire. A reference evaluator is
//! provided for in-process adapters.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::model::record::Record;
use crate::model::value::Value;

/// A filter expression over record attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// Matches every record.
    True,
    Eq { field: String, value: Value },
    Ne { field: String, value: Value },
    Gt { field: String, value: Value },
    Gte { field: String, value: Value },
    Lt { field: String, value: Value },
    Lte { field: String, value: Value },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Ne {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Gt {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Gte {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Lt {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Lte {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn and(parts: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::And(parts.into_iter().collect())
    }

    pub fn or(parts: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::Or(parts.into_iter().collect())
    }

    /// The complement of another expression. This is the combinator that
    /// lets one finder be defined as "everything finder F does not match".
    pub fn not(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    /// Reference evaluation against a record.
    ///
    /// Equality is strict per value family; ordering predicates never match
    /// when the field is absent or the families are incomparable.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Predicate::True => true,
            Predicate::Eq { field, value } => {
                record.get(field).is_some_and(|v| v == value)
            }
            Predicate::Ne { field, value } => {
                !record.get(field).is_some_and(|v| v == value)
            }
            Predicate::Gt { field, value } => {
                Self::ordered(record, field, value, &[Ordering::Greater])
            }
            Predicate::Gte { field, value } => Self::ordered(
                record,
                field,
                value,
                &[Ordering::Greater, Ordering::Equal],
            ),
            Predicate::Lt { field, value } => {
                Self::ordered(record, field, value, &[Ordering::Less])
            }
            Predicate::Lte { field, value } => Self::ordered(
                record,
                field,
                value,
                &[Ordering::Less, Ordering::Equal],
            ),
            Predicate::And(parts) => parts.iter().all(|p| p.matches(record)),
            Predicate::Or(parts) => parts.iter().any(|p| p.matches(record)),
            Predicate::Not(inner) => !inner.matches(record),
        }
    }

    fn ordered(record: &Record, field: &str, value: &Value, accept: &[Ordering]) -> bool {
        record
            .get(field)
            .and_then(|v| v.compare(value))
            .is_some_and(|ord| accept.contains(&ord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, age: i64) -> Record {
        Record::new().with("name", name).with("age", age)
    }

    #[test]
    fn test_eq_and_ne() {
        let r = record("Luca", 34);
        assert!(Predicate::eq("name", "Luca").matches(&r));
        assert!(!Predicate::eq("name", "Mara").matches(&r));
        assert!(Predicate::ne("name", "Mara").matches(&r));
        // absent field: eq never matches, ne does
        assert!(!Predicate::eq("nickname", "L").matches(&r));
        assert!(Predicate::ne("nickname", "L").matches(&r));
    }

    #[test]
    fn test_ordering_predicates() {
        let r = record("Luca", 34);
        assert!(Predicate::gt("age", 18).matches(&r));
        assert!(Predicate::gte("age", 34).matches(&r));
        assert!(Predicate::lt("age", 50).matches(&r));
        assert!(!Predicate::lt("age", 34).matches(&r));
        // incomparable families never match
        assert!(!Predicate::gt("name", 18).matches(&r));
        // absent field never matches
        assert!(!Predicate::gte("height", 1).matches(&r));
    }

    #[test]
    fn test_combinators() {
        let r = record("Luca", 34);
        let adult = Predicate::gte("age", 18);
        let named = Predicate::eq("name", "Luca");

        assert!(Predicate::and([adult.clone(), named.clone()]).matches(&r));
        assert!(Predicate::or([Predicate::eq("age", 0), named.clone()]).matches(&r));
        assert!(!Predicate::not(adult.clone()).matches(&r));
        assert!(Predicate::not(Predicate::eq("age", 0)).matches(&r));
    }

    #[test]
    fn test_not_is_exact_complement() {
        let rows = [record("a", 10), record("b", 20), record("c", 30)];
        let p = Predicate::gt("age", 15);
        for r in &rows {
            assert_ne!(p.matches(r), Predicate::not(p.clone()).matches(r));
        }
    }
}
