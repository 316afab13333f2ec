//! In-Memory Adapter
//!
//! Thread-safe implementation of the storage port using `Arc<RwLock<..>>`.
//! Useful for testing and development; clones share the same store.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;
use uuid::Uuid;

use shelf_domain::{Adapter, AdapterError, Direction, Key, Query, Record, Sort, Value};

type Collections = HashMap<String, BTreeMap<Key, Record>>;

/// How the adapter mints ids for records inserted without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdStrategy {
    /// Next integer above the collection's current maximum integer key.
    /// Keeps ids small and exercises string↔native id normalization.
    #[default]
    Sequence,
    /// Random UUID v4.
    Uuid,
}

/// In-memory storage adapter.
///
/// Cloning is cheap and every clone shares the same underlying store, so a
/// single adapter can back repositories for several entity types at once
/// (each under its own collection).
#[derive(Debug, Clone, Default)]
pub struct MemoryAdapter {
    collections: Arc<RwLock<Collections>>,
    ids: IdStrategy,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_strategy(ids: IdStrategy) -> Self {
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
            ids,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, AdapterError> {
        self.collections.read().map_err(|_| AdapterError::Backend {
            message: "failed to acquire read lock".to_string(),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, AdapterError> {
        self.collections.write().map_err(|_| AdapterError::Backend {
            message: "failed to acquire write lock".to_string(),
        })
    }

    fn next_id(&self, rows: &BTreeMap<Key, Record>) -> Key {
        match self.ids {
            IdStrategy::Sequence => {
                let max = rows
                    .keys()
                    .filter_map(|k| match k {
                        Key::Int(n) => Some(*n),
                        _ => None,
                    })
                    .max()
                    .unwrap_or(0);
                Key::Int(max + 1)
            }
            IdStrategy::Uuid => Key::Uuid(Uuid::new_v4()),
        }
    }

    fn edge(
        &self,
        collection: &str,
        sort_key: &str,
        want: Ordering,
    ) -> Result<Option<(Key, Record)>, AdapterError> {
        let collections = self.read()?;
        let Some(rows) = collections.get(collection) else {
            return Ok(None);
        };
        let mut best: Option<(Key, Record, Value)> = None;
        for (id, record) in rows {
            // records without the sort key are not ordering candidates
            let Some(value) = sort_value(id, record, sort_key) else {
                continue;
            };
            best = match best {
                None => Some((id.clone(), record.clone(), value)),
                Some(current) => {
                    if value.compare(&current.2) == Some(want) {
                        Some((id.clone(), record.clone(), value))
                    } else {
                        Some(current)
                    }
                }
            };
        }
        Ok(best.map(|(id, record, _)| (id, record)))
    }
}

/// Resolve a sort key against a row; `"id"` sorts by the record key.
fn sort_value(id: &Key, record: &Record, sort_key: &str) -> Option<Value> {
    if sort_key == "id" {
        return Some(match id {
            Key::Int(n) => Value::Int(*n),
            Key::Str(s) => Value::Text(s.clone()),
            Key::Uuid(u) => Value::Text(u.to_string()),
        });
    }
    record.get(sort_key).cloned()
}

/// Order rows by the sort spec; rows missing the key or with incomparable
/// values go last regardless of direction.
fn order_rows(rows: &mut [(Key, Record)], sort: &Sort) {
    rows.sort_by(|(a_id, a), (b_id, b)| {
        let a_val = sort_value(a_id, a, &sort.field);
        let b_val = sort_value(b_id, b, &sort.field);
        match (a_val, b_val) {
            (Some(a_val), Some(b_val)) => {
                let ord = a_val.compare(&b_val).unwrap_or(Ordering::Equal);
                match sort.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
}

impl Adapter for MemoryAdapter {
    fn insert(
        &self,
        collection: &str,
        id: Option<Key>,
        record: Record,
    ) -> Result<Key, AdapterError> {
        let mut collections = self.write()?;
        let rows = collections.entry(collection.to_string()).or_default();
        let id = match id {
            Some(id) => {
                if rows.contains_key(&id) {
                    return Err(AdapterError::DuplicateId {
                        collection: collection.to_string(),
                        id,
                    });
                }
                id
            }
            None => self.next_id(rows),
        };
        rows.insert(id.clone(), record);
        debug!(collection, %id, "memory insert");
        Ok(id)
    }

    fn update(&self, collection: &str, id: &Key, record: Record) -> Result<(), AdapterError> {
        let mut collections = self.write()?;
        let slot = collections
            .get_mut(collection)
            .and_then(|rows| rows.get_mut(id));
        match slot {
            Some(stored) => {
                *stored = record;
                debug!(collection, %id, "memory update");
                Ok(())
            }
            None => Err(AdapterError::NotFound {
                collection: collection.to_string(),
                id: id.clone(),
            }),
        }
    }

    fn delete(&self, collection: &str, id: &Key) -> Result<(), AdapterError> {
        let mut collections = self.write()?;
        let removed = collections
            .get_mut(collection)
            .and_then(|rows| rows.remove(id));
        match removed {
            Some(_) => {
                debug!(collection, %id, "memory delete");
                Ok(())
            }
            None => Err(AdapterError::NotFound {
                collection: collection.to_string(),
                id: id.clone(),
            }),
        }
    }

    fn find_by_id(&self, collection: &str, id: &Key) -> Result<Option<Record>, AdapterError> {
        Ok(self
            .read()?
            .get(collection)
            .and_then(|rows| rows.get(id))
            .cloned())
    }

    fn scan(&self, collection: &str) -> Result<Vec<(Key, Record)>, AdapterError> {
        Ok(self
            .read()?
            .get(collection)
            .map(|rows| {
                rows.iter()
                    .map(|(id, record)| (id.clone(), record.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn first(
        &self,
        collection: &str,
        sort_key: &str,
    ) -> Result<Option<(Key, Record)>, AdapterError> {
        self.edge(collection, sort_key, Ordering::Less)
    }

    fn last(
        &self,
        collection: &str,
        sort_key: &str,
    ) -> Result<Option<(Key, Record)>, AdapterError> {
        self.edge(collection, sort_key, Ordering::Greater)
    }

    fn count(&self, collection: &str) -> Result<usize, AdapterError> {
        Ok(self.read()?.get(collection).map_or(0, BTreeMap::len))
    }

    fn clear(&self, collection: &str) -> Result<(), AdapterError> {
        let mut collections = self.write()?;
        collections.remove(collection);
        debug!(collection, "memory clear");
        Ok(())
    }

    fn run(&self, collection: &str, query: &Query) -> Result<Vec<(Key, Record)>, AdapterError> {
        let mut rows: Vec<(Key, Record)> = self
            .scan(collection)?
            .into_iter()
            .filter(|(_, record)| query.predicate.matches(record))
            .collect();
        if let Some(sort) = &query.order {
            order_rows(&mut rows, sort);
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_domain::{Predicate, QueryBuilder};

    fn record(name: &str, age: i64) -> Record {
        Record::new().with("name", name).with("age", age)
    }

    #[test]
    fn test_insert_generates_sequential_ids() {
        let adapter = MemoryAdapter::new();
        let a = adapter.insert("users", None, record("A", 1)).unwrap();
        let b = adapter.insert("users", None, record("B", 2)).unwrap();
        assert_eq!(a, Key::Int(1));
        assert_eq!(b, Key::Int(2));

        // sequence resumes above caller-assigned integer ids
        adapter
            .insert("users", Some(Key::Int(10)), record("C", 3))
            .unwrap();
        let d = adapter.insert("users", None, record("D", 4)).unwrap();
        assert_eq!(d, Key::Int(11));
    }

    #[test]
    fn test_insert_duplicate_id_is_distinct_from_other_failures() {
        let adapter = MemoryAdapter::new();
        let id = adapter.insert("users", None, record("A", 1)).unwrap();
        let err = adapter
            .insert("users", Some(id.clone()), record("B", 2))
            .unwrap_err();
        assert_eq!(
            err,
            AdapterError::DuplicateId {
                collection: "users".to_string(),
                id,
            }
        );
        assert_eq!(adapter.count("users").unwrap(), 1);
    }

    #[test]
    fn test_uuid_strategy() {
        let adapter = MemoryAdapter::with_id_strategy(IdStrategy::Uuid);
        let id = adapter.insert("users", None, record("A", 1)).unwrap();
        assert!(matches!(id, Key::Uuid(_)));
        assert_eq!(
            adapter.find_by_id("users", &id).unwrap(),
            Some(record("A", 1))
        );
        // the string rendering normalizes back to the same key
        assert_eq!(Key::from(id.to_string()), id);
    }

    #[test]
    fn test_update_and_delete_report_not_found() {
        let adapter = MemoryAdapter::new();
        let missing = Key::Int(404);

        assert_eq!(
            adapter.update("users", &missing, record("A", 1)).unwrap_err(),
            AdapterError::NotFound {
                collection: "users".to_string(),
                id: missing.clone(),
            }
        );
        assert_eq!(
            adapter.delete("users", &missing).unwrap_err(),
            AdapterError::NotFound {
                collection: "users".to_string(),
                id: missing,
            }
        );
    }

    #[test]
    fn test_clones_share_the_store() {
        let adapter = MemoryAdapter::new();
        let other = adapter.clone();
        adapter.insert("users", None, record("A", 1)).unwrap();
        assert_eq!(other.count("users").unwrap(), 1);
    }

    #[test]
    fn test_first_and_last_by_field_and_by_id() {
        let adapter = MemoryAdapter::new();
        adapter.insert("users", None, record("Old", 80)).unwrap();
        adapter.insert("users", None, record("Young", 8)).unwrap();

        let (_, first) = adapter.first("users", "age").unwrap().unwrap();
        assert_eq!(first.get("name"), Some(&Value::Text("Young".into())));

        let (_, last) = adapter.last("users", "age").unwrap().unwrap();
        assert_eq!(last.get("name"), Some(&Value::Text("Old".into())));

        let (id, _) = adapter.first("users", "id").unwrap().unwrap();
        assert_eq!(id, Key::Int(1));

        assert_eq!(adapter.first("ghosts", "age").unwrap(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let adapter = MemoryAdapter::new();
        adapter.insert("users", None, record("A", 1)).unwrap();

        adapter.clear("users").unwrap();
        assert_eq!(adapter.count("users").unwrap(), 0);
        adapter.clear("users").unwrap();
        assert_eq!(adapter.count("users").unwrap(), 0);
    }

    #[test]
    fn test_run_filters_and_orders() {
        let adapter = MemoryAdapter::new();
        adapter.insert("users", None, record("A", 10)).unwrap();
        adapter.insert("users", None, record("B", 30)).unwrap();
        adapter.insert("users", None, record("C", 20)).unwrap();

        let query = QueryBuilder::new()
            .filter(Predicate::gt("age", 10))
            .order_by("age", Direction::Desc)
            .build();
        let rows = adapter.run("users", &query).unwrap();
        let names: Vec<&Value> = rows.iter().filter_map(|(_, r)| r.get("name")).collect();
        assert_eq!(
            names,
            vec![&Value::Text("B".into()), &Value::Text("C".into())]
        );
    }

    #[test]
    fn test_rows_missing_the_sort_key_go_last() {
        let adapter = MemoryAdapter::new();
        adapter.insert("users", None, record("A", 30)).unwrap();
        adapter
            .insert("users", None, Record::new().with("name", "NoAge"))
            .unwrap();
        adapter.insert("users", None, record("C", 10)).unwrap();

        let query = QueryBuilder::new().order_by("age", Direction::Asc).build();
        let rows = adapter.run("users", &query).unwrap();
        let names: Vec<&Value> = rows.iter().filter_map(|(_, r)| r.get("name")).collect();
        assert_eq!(
            names,
            vec![
                &Value::Text("C".into()),
                &Value::Text("A".into()),
                &Value::Text("NoAge".into()),
            ]
        );
    }
}
