//! Process-wide boundary registry.
//!
//! Maps a task or dispatch key to the stack snapshot captured when it was
//! created, plus the key of whatever was executing at that moment. Written
//! by the interceptors from whichever thread spawns or dispatches; read by
//! the reconstructor from any thread. Each operation is atomic in
//! isolation; the reconstruction walk never needs a consistent snapshot of
//! the whole map.

use parking_lot::RwLock;
use skein_types::{BoundaryKey, FrameSnapshot};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::LazyLock;

/// Creation metadata for one task or dispatch.
#[derive(Debug, Clone)]
pub struct BoundaryEntry {
    /// Calling stack at the moment of creation, innermost first. The
    /// innermost frame carries the boundary marking.
    pub snapshot: FrameSnapshot,
    /// Key of the task or dispatch that was executing at creation time.
    /// `None` when creation happened outside any tracked context.
    pub parent: Option<BoundaryKey>,
}

#[derive(Debug)]
pub enum RegistryError {
    DuplicateKey(BoundaryKey),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateKey(key) => {
                write!(f, "boundary key {key} is already registered")
            }
        }
    }
}

impl Error for RegistryError {}

static ENTRIES: LazyLock<RwLock<HashMap<BoundaryKey, BoundaryEntry>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Register creation metadata under a fresh key.
///
/// Fails if `key` is already present; the id generators never reuse a
/// value, so a collision means a caller minted its own key.
pub fn register(key: BoundaryKey, entry: BoundaryEntry) -> Result<(), RegistryError> {
    let mut entries = ENTRIES.write();
    if entries.contains_key(&key) {
        return Err(RegistryError::DuplicateKey(key));
    }
    entries.insert(key, entry);
    Ok(())
}

/// Fetch the entry for `key`, if any. Absence is a normal outcome for
/// untracked or already-reclaimed boundaries.
pub fn lookup(key: BoundaryKey) -> Option<BoundaryEntry> {
    ENTRIES.read().get(&key).cloned()
}

/// Drop the entry for `key`. No-op when absent.
pub fn remove(key: BoundaryKey) {
    ENTRIES.write().remove(&key);
}
