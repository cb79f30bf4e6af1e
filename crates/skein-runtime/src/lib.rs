//! The trace engine: boundary registry, context propagation, interception
//! bookkeeping, and the causal reconstructor.
//!
//! Nothing here ever suspends, and nothing here is allowed to fail in a way
//! the host program can observe: bookkeeping errors degrade trace
//! completeness, they never block a spawn or dispatch.

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use skein_types::{DispatchId, TaskId};

pub mod registry;

mod context;
mod intercept;
mod reconstruct;

pub use context::{
    current_context, enter_dispatch_scope, ContextHandle, DispatchScope, CURRENT_CONTEXT,
};
pub use intercept::{dispatch_creation_context, task_creation_context};
pub use reconstruct::reconstruct;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_DISPATCH_ID: AtomicU64 = AtomicU64::new(1);
static ENABLED: AtomicBool = AtomicBool::new(false);

pub(crate) fn next_task_id() -> TaskId {
    let raw = NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed);
    TaskId::new(raw).expect("task id invariant violated: generated id must be non-zero")
}

pub(crate) fn next_dispatch_id() -> DispatchId {
    let raw = NEXT_DISPATCH_ID.fetch_add(1, Ordering::Relaxed);
    DispatchId::new(raw).expect("dispatch id invariant violated: generated id must be non-zero")
}

/// Start recording boundary entries for new spawns and dispatches.
///
/// Idempotent. Tasks created before the first `enable()` stay untracked.
pub fn enable() {
    ENABLED.store(true, Ordering::SeqCst);
}

/// Stop recording new boundary entries.
///
/// Idempotent. Existing registry contents are kept, so traces requested
/// later simply show a gap for the disabled period instead of failing.
pub fn disable() {
    ENABLED.store(false, Ordering::SeqCst);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_non_zero() {
        let a = next_task_id();
        let b = next_task_id();
        assert_ne!(a, b);
        assert!(a.get() >= 1);

        let c = next_dispatch_id();
        let d = next_dispatch_id();
        assert_ne!(c, d);
    }

    #[test]
    fn control_surface_is_idempotent() {
        enable();
        enable();
        assert!(is_enabled());
        disable();
        disable();
        assert!(!is_enabled());
    }
}
