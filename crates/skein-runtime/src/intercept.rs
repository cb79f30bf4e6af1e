//! Interception bookkeeping shared by the spawn and dispatch wrappers.
//!
//! A wrapper always mints a fresh key and returns a [`ContextHandle`] to
//! install as the child's execution context, even while tracing is
//! disabled, so that later-enabled descendants can still name the untracked
//! ancestor and the reconstructor can mark the gap. Capture and registry
//! writes happen only while the control surface is enabled, and any failure
//! in them is logged and swallowed: the spawn or dispatch itself must never
//! be affected.

use crate::context::{current_context, ContextHandle};
use crate::registry::{self, BoundaryEntry};
use skein_capture::{capture_current, CaptureOptions};
use skein_types::{BoundaryKey, FrameSnapshot};

/// Bookkeeping for "a new task is about to be spawned".
pub fn task_creation_context() -> ContextHandle {
    boundary_context(BoundaryKey::Task(crate::next_task_id()))
}

/// Bookkeeping for "work is about to be dispatched to the blocking pool".
pub fn dispatch_creation_context() -> ContextHandle {
    boundary_context(BoundaryKey::Dispatch(crate::next_dispatch_id()))
}

fn boundary_context(key: BoundaryKey) -> ContextHandle {
    let parent = current_context();
    if crate::is_enabled() {
        record_boundary(key, parent.as_ref().map(|ctx| ctx.key()));
    }
    ContextHandle::new(key, parent)
}

fn record_boundary(key: BoundaryKey, parent: Option<BoundaryKey>) {
    let mut frames = match capture_current(CaptureOptions::default()) {
        Ok(frames) => frames,
        Err(error) => {
            tracing::warn!(%key, %error, "creation stack capture failed; boundary stays untracked");
            return;
        }
    };

    // The innermost surviving frame is the creation call site.
    match key {
        BoundaryKey::Task(id) => frames[0].boundary_task = Some(id),
        BoundaryKey::Dispatch(_) => frames[0].is_executor_boundary = true,
    }

    let snapshot = match FrameSnapshot::new(frames) {
        Ok(snapshot) => snapshot,
        Err(error) => {
            tracing::warn!(%key, %error, "creation snapshot rejected; boundary stays untracked");
            return;
        }
    };

    if let Err(error) = registry::register(key, BoundaryEntry { snapshot, parent }) {
        tracing::warn!(%key, %error, "boundary registration dropped");
    }
}
