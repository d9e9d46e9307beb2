//! Core domain logic for event registration.
//! This crate is the single source of truth for registration invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::event::Event;
pub use model::manager::{ManagerSnapshot, RegistrationManager};
pub use model::participant::Participant;
pub use model::registration::Registration;
pub use model::ModelError;
pub use repo::memory_store::InMemoryRegistrationStore;
pub use repo::sqlite_store::SqliteRegistrationStore;
pub use repo::{RegistrationStore, StoreError, StoreResult};
pub use service::registration_service::{RegistrationService, ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
