//! Append-only, snapshot-based people store.
//!
//! # Responsibilities
//! - Hold every person created during the process lifetime, in append order
//! - Serve lock-free snapshots to readers
//!
//! # Design Decisions
//! - `ArcSwap` holds an immutable `Vec`; readers load the current `Arc` once
//!   and iterate it without further synchronization
//! - Appends use read-copy-update so concurrent appends never lose a record
//! - No removal or replacement operation exists

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::people::model::Person;

/// Shared handle to the store; clones observe the same records.
#[derive(Clone)]
pub struct PeopleStore {
    people: Arc<ArcSwap<Vec<Person>>>,
}

impl PeopleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            people: Arc::new(ArcSwap::from_pointee(Vec::new())),
        }
    }

    /// Append a person and return the new record count.
    pub fn append(&self, person: Person) -> usize {
        let previous = self.people.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(person.clone());
            next
        });
        previous.len() + 1
    }

    /// Current contents, frozen at the moment of the call.
    pub fn snapshot(&self) -> Arc<Vec<Person>> {
        self.people.load_full()
    }

    /// First person whose name equals `name`, in append order.
    pub fn find(&self, name: &str) -> Option<Person> {
        self.people
            .load()
            .iter()
            .find(|person| person.name == name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.people.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for PeopleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeopleStore").field("len", &self.len()).finish()
    }
}

impl Default for PeopleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn test_append_preserves_order() {
        let store = PeopleStore::new();
        assert!(store.is_empty());

        assert_eq!(store.append(Person::new("a")), 1);
        assert_eq!(store.append(Person::new("b")), 2);

        let names: Vec<String> = store.snapshot().iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_snapshot_is_stable() {
        let store = PeopleStore::new();
        store.append(Person::new("a"));

        let before = store.snapshot();
        store.append(Person::new("b"));

        assert_eq!(before.len(), 1);
        assert_eq!(store.snapshot().len(), 2);
    }

    #[test]
    fn test_find_returns_first_match() {
        let store = PeopleStore::new();
        store.append(Person::new("bob"));
        store.append(Person::new("alice"));
        store.append(Person::new("bob"));

        assert_eq!(store.find("bob"), Some(Person::new("bob")));
        assert_eq!(store.find("carol"), None);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_clones_share_records() {
        let store = PeopleStore::new();
        let other = store.clone();
        other.append(Person::new("shared"));
        assert_eq!(store.find("shared"), Some(Person::new("shared")));
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let store = PeopleStore::new();
        let threads = 8;
        let per_thread = 50;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let store = store.clone();
                thread::spawn(move || {
                    for i in 0..per_thread {
                        store.append(Person::new(format!("p-{}-{}", t, i)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), threads * per_thread);
        let unique: HashSet<&str> = snapshot.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(unique.len(), threads * per_thread);
    }
}
