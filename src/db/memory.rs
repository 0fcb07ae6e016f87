//! In-memory persistence backend for tests and ephemeral sessions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::db::StateBackend;
use crate::error::{AppError, Result};
use crate::models::UserStateDoc;

/// Process-local store. Cloning shares the underlying document.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    doc: Arc<Mutex<Option<UserStateDoc>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document (simulates a returning user).
    pub fn with_doc(doc: UserStateDoc) -> Self {
        Self {
            doc: Arc::new(Mutex::new(Some(doc))),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// When offline, every operation fails with a persistence error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// The last persisted document, if any.
    pub fn persisted(&self) -> Option<UserStateDoc> {
        self.doc.lock().unwrap().clone()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("Store offline".to_string()));
        }
        Ok(())
    }
}

impl StateBackend for MemoryBackend {
    async fn load(&self) -> Result<Option<UserStateDoc>> {
        self.check_online()?;
        Ok(self.doc.lock().unwrap().clone())
    }

    async fn save(&self, doc: &UserStateDoc) -> Result<()> {
        self.check_online()?;
        *self.doc.lock().unwrap() = Some(doc.clone());
        Ok(())
    }

    async fn create_if_absent(&self, doc: &UserStateDoc) -> Result<()> {
        self.check_online()?;
        let mut slot = self.doc.lock().unwrap();
        if slot.is_none() {
            *slot = Some(doc.clone());
        }
        Ok(())
    }
}
