//! People resource.
//!
//! # Data Flow
//! ```text
//! POST /people   → routes.rs (decode Person) → store.rs (append)
//! GET  /people   → routes.rs → store.rs (snapshot) → JSON array
//! GET  /people/x → routes.rs → store.rs (first match) → JSON object | 404
//! ```

pub mod model;
pub mod routes;
pub mod store;

pub use model::Person;
pub use routes::PeopleRoutes;
pub use store::PeopleStore;

use crate::health::{HealthCheck, HealthStatus};

/// Reports how many people the store currently holds.
#[derive(Debug, Clone)]
pub struct StoreHealthCheck {
    store: PeopleStore,
}

impl StoreHealthCheck {
    pub fn new(store: PeopleStore) -> Self {
        Self { store }
    }
}

impl HealthCheck for StoreHealthCheck {
    fn check(&self) -> HealthStatus {
        HealthStatus::healthy_with(format!("{} people stored", self.store.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_health_reports_count() {
        let store = PeopleStore::new();
        store.append(Person::new("bob"));
        let status = StoreHealthCheck::new(store).check();
        assert!(status.healthy);
        assert_eq!(status.message.as_deref(), Some("1 people stored"));
    }
}
