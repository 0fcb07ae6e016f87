//! Persistence layer: pluggable backing stores for the user state document.
//!
//! The store is generic over `StateBackend`, so the deployment target picks
//! local-file, Firestore, or in-memory persistence without touching the
//! command layer.

pub mod firestore;
pub mod local;
pub mod memory;

pub use firestore::FirestoreBackend;
pub use local::LocalStateBackend;
pub use memory::MemoryBackend;

use crate::error::Result;
use crate::models::UserStateDoc;

/// Collection names as constants.
pub mod collections {
    /// User state documents (keyed by user id)
    pub const USER_STATES: &str = "user_states";
}

/// A backing store holding one user's persisted state document.
///
/// Implementations report failures as `AppError::Persistence`; callers keep
/// the optimistic in-memory state and surface the failure once, without
/// retrying.
pub trait StateBackend: Send + Sync {
    /// Read the stored document. `Ok(None)` means it has never been written.
    fn load(&self) -> impl std::future::Future<Output = Result<Option<UserStateDoc>>> + Send;

    /// Write the full document (read-modify-write discipline: the caller
    /// always persists a state derived from the last loaded value).
    fn save(&self, doc: &UserStateDoc) -> impl std::future::Future<Output = Result<()>> + Send;

    /// First-run document creation. Must never clobber an existing
    /// document; backends with a real create-if-absent primitive override
    /// this.
    fn create_if_absent(
        &self,
        doc: &UserStateDoc,
    ) -> impl std::future::Future<Output = Result<()>> + Send {
        self.save(doc)
    }
}
