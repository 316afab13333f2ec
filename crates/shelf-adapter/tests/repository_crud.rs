//! End-to-end CRUD lifecycle: Repository over the in-memory adapter.

use shelf_adapter::{IdStrategy, MemoryAdapter};
use shelf_domain::{
    entity, Entity, Error, IdBearer, Key, Lookup, Repository, RepositoryConfig,
};

entity! {
    /// A registered user.
    pub struct User {
        name: String,
        age: i64,
    }
}

entity! {
    /// A note, with an optional body to exercise nullable attributes.
    pub struct Note {
        title: String,
        body: Option<String>,
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .try_init();
}

fn user_repo() -> Repository<User, MemoryAdapter> {
    Repository::new(MemoryAdapter::new()).unwrap()
}

#[test]
fn full_lifecycle_scenario() {
    init_tracing();
    let repo = user_repo();
    assert_eq!(repo.count().unwrap(), 0);

    // create returns the generated id and writes it back
    let mut user = User::new("L".to_string(), 34);
    let id = repo.create(&mut user).unwrap();
    assert_eq!(user.id, Some(id.clone()));

    // find returns an equal entity with the same attributes
    let found = repo.find(id.clone()).unwrap();
    assert_eq!(found, user);
    assert_eq!(found.name, "L");

    // creating again at the same id fails EntityExisted
    let mut dup = User::new("Someone".to_string(), 1);
    dup.set_id(id.clone());
    assert!(matches!(
        repo.create(&mut dup).unwrap_err(),
        Error::EntityExisted { .. }
    ));

    // delete succeeds, then find fails EntityNotFound
    repo.delete(&user).unwrap();
    assert!(matches!(
        repo.find(id).unwrap_err(),
        Error::EntityNotFound { .. }
    ));
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn find_accepts_raw_keys_and_id_bearers_identically() {
    let repo = user_repo();
    let mut user = User::new("Luca".to_string(), 34);
    let id = repo.create(&mut user).unwrap();
    assert_eq!(id, Key::Int(1));

    // raw native key, raw string key: same lookup
    assert_eq!(repo.find(1).unwrap(), user);
    assert_eq!(repo.find("1").unwrap(), user);

    // id-bearer behaves exactly like the raw key it carries
    struct Session {
        current_user: Option<Key>,
    }
    impl IdBearer for Session {
        fn lookup_id(&self) -> Option<Key> {
            self.current_user.clone()
        }
    }

    let session = Session {
        current_user: Some(Key::Int(1)),
    };
    assert_eq!(repo.find(Lookup::of(&session)).unwrap(), repo.find(1).unwrap());

    let anonymous = Session { current_user: None };
    assert_eq!(
        repo.find(Lookup::of(&anonymous)).unwrap_err(),
        Error::EntityIdNotFound
    );
}

#[test]
fn persist_upserts_on_id_presence() {
    let repo = user_repo();

    let mut user = User::new("Luca".to_string(), 34);
    let id = repo.persist(&mut user).unwrap();
    assert_eq!(repo.count().unwrap(), 1);

    user.age = 35;
    assert_eq!(repo.persist(&mut user).unwrap(), id);
    assert_eq!(repo.count().unwrap(), 1);
    assert_eq!(repo.find(id).unwrap().age, 35);

    // a set id with no stored record behaves as update: it fails
    let mut stale = User::new("Stale".to_string(), 1);
    stale.set_id(Key::Int(99));
    assert!(matches!(
        repo.persist(&mut stale).unwrap_err(),
        Error::NonPersisted { .. }
    ));
}

#[test]
fn absent_value_reads_do_not_raise() {
    let repo = user_repo();
    assert_eq!(repo.first("age").unwrap(), None);
    assert_eq!(repo.last("age").unwrap(), None);
    assert_eq!(repo.find_by("name", "Nobody").unwrap(), None);
}

#[test]
fn clear_then_all_is_empty() {
    let repo = user_repo();
    repo.create(&mut User::new("A".to_string(), 1)).unwrap();
    repo.create(&mut User::new("B".to_string(), 2)).unwrap();

    repo.clear().unwrap();
    assert!(repo.all().unwrap().is_empty());
    assert_eq!(repo.count().unwrap(), 0);
    // idempotent
    repo.clear().unwrap();
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn entity_types_share_one_adapter_under_separate_collections() {
    let adapter = MemoryAdapter::new();
    let users: Repository<User, _> = Repository::new(adapter.clone()).unwrap();
    let notes: Repository<Note, _> = Repository::new(adapter).unwrap();
    assert_eq!(users.collection(), "users");
    assert_eq!(notes.collection(), "notes");

    users.create(&mut User::new("Luca".to_string(), 34)).unwrap();
    notes
        .create(&mut Note::new("todo".to_string(), None))
        .unwrap();

    assert_eq!(users.count().unwrap(), 1);
    assert_eq!(notes.count().unwrap(), 1);

    let note = notes.find(1).unwrap();
    assert_eq!(note.title, "todo");
    assert_eq!(note.body, None);
}

#[test]
fn uuid_id_strategy_round_trips_through_find() {
    let repo: Repository<User, _> =
        Repository::new(MemoryAdapter::with_id_strategy(IdStrategy::Uuid)).unwrap();

    let mut user = User::new("Luca".to_string(), 34);
    let id = repo.create(&mut user).unwrap();
    assert!(matches!(id, Key::Uuid(_)));

    // native key and its string rendering hit the same record
    assert_eq!(repo.find(id.clone()).unwrap(), user);
    assert_eq!(repo.find(id.to_string()).unwrap(), user);
}

#[test]
fn collection_binding_is_configurable() {
    let repo: Repository<User, _> = Repository::with_config(
        MemoryAdapter::new(),
        RepositoryConfig::new().with_collection("staff"),
    )
    .unwrap();
    assert_eq!(repo.collection(), "staff");

    let err = Repository::<User, _>::with_config(
        MemoryAdapter::new(),
        RepositoryConfig::new().with_collection(""),
    )
    .err()
    .unwrap();
    assert_eq!(err, Error::UnboundCollection { entity: "User" });
}

#[test]
fn equality_is_by_type_and_id() {
    let a = User::new("A".to_string(), 1);
    let b = User::new("B".to_string(), 2);
    assert_eq!(a, b); // both ids unset

    let mut a1 = a.clone();
    a1.set_id(Key::Int(1));
    let mut b1 = b.clone();
    b1.set_id(Key::Int(1));
    let mut b2 = b.clone();
    b2.set_id(Key::Int(2));

    assert_eq!(a1, b1);
    assert_ne!(a1, b2);
    assert_ne!(a1, a);
}
