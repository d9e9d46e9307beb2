//! Snapshot store kept in process memory.
//!
//! Used by service tests and callers that do not need durability across
//! process restarts.

use super::{RegistrationStore, StoreResult};
use crate::model::manager::RegistrationManager;

/// Keeps a detached copy of the last saved aggregate.
#[derive(Debug, Default)]
pub struct InMemoryRegistrationStore {
    snapshot: Option<RegistrationManager>,
    save_count: usize,
}

impl InMemoryRegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `save` calls since construction.
    pub fn save_count(&self) -> usize {
        self.save_count
    }

    /// Whether a saved image currently exists.
    pub fn has_image(&self) -> bool {
        self.snapshot.is_some()
    }
}

impl RegistrationStore for InMemoryRegistrationStore {
    fn save(&mut self, manager: &RegistrationManager) -> StoreResult<()> {
        self.snapshot = Some(manager.clone());
        self.save_count += 1;
        Ok(())
    }

    fn load(&self) -> StoreResult<RegistrationManager> {
        Ok(self.snapshot.clone().unwrap_or_default())
    }

    fn reset(&mut self) -> StoreResult<()> {
        self.snapshot = None;
        Ok(())
    }
}
