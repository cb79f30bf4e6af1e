//! Execution-context propagation.
//!
//! Each tracked task or dispatch runs under a [`ContextHandle`]: inside a
//! task it lives in a tokio task-local, inside pool-dispatched work in a
//! plain thread-local installed by a scope guard when the dispatched closure
//! starts running. The handle chain doubles as the reclamation mechanism:
//! a child holds its parent's handle, so a boundary entry stays registered
//! exactly as long as the boundary itself or a live descendant can still
//! name it.

use crate::registry;
use skein_types::BoundaryKey;
use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

struct ContextInner {
    key: BoundaryKey,
    parent: Option<ContextHandle>,
}

impl Drop for ContextInner {
    fn drop(&mut self) {
        registry::remove(self.key);
    }
}

/// Owning handle for one tracked boundary. Cloneable; the registry entry
/// for `key` is removed when the last clone drops.
#[derive(Clone)]
pub struct ContextHandle {
    inner: Arc<ContextInner>,
}

impl ContextHandle {
    pub fn new(key: BoundaryKey, parent: Option<ContextHandle>) -> Self {
        Self {
            inner: Arc::new(ContextInner { key, parent }),
        }
    }

    pub fn key(&self) -> BoundaryKey {
        self.inner.key
    }

    pub fn parent(&self) -> Option<&ContextHandle> {
        self.inner.parent.as_ref()
    }
}

impl fmt::Debug for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextHandle")
            .field("key", &self.inner.key)
            .finish_non_exhaustive()
    }
}

tokio::task_local! {
    /// The context of the currently executing task. Installed by the spawn
    /// interceptor via `CURRENT_CONTEXT.scope(...)`.
    pub static CURRENT_CONTEXT: ContextHandle;
}

thread_local! {
    /// The context of pool-dispatched work currently running on this
    /// thread. Installed by [`enter_dispatch_scope`] on the pool thread at
    /// the moment the dispatched closure begins running.
    static DISPATCH_CONTEXT: RefCell<Option<ContextHandle>> = const { RefCell::new(None) };
}

/// What is executing on this thread right now, if anything tracked.
///
/// Pool-dispatch context wins over task context: on a pool thread the
/// dispatched closure is the execution point, whatever task submitted it.
pub fn current_context() -> Option<ContextHandle> {
    let dispatched = DISPATCH_CONTEXT.with(|slot| slot.borrow().clone());
    if dispatched.is_some() {
        return dispatched;
    }
    CURRENT_CONTEXT.try_with(|ctx| ctx.clone()).ok()
}

pub(crate) fn in_dispatch_scope() -> bool {
    DISPATCH_CONTEXT.with(|slot| slot.borrow().is_some())
}

/// Guard restoring the previous dispatch context on drop (including on
/// unwind out of the dispatched closure).
pub struct DispatchScope {
    previous: Option<ContextHandle>,
}

pub fn enter_dispatch_scope(ctx: ContextHandle) -> DispatchScope {
    let previous = DISPATCH_CONTEXT.with(|slot| slot.borrow_mut().replace(ctx));
    DispatchScope { previous }
}

impl Drop for DispatchScope {
    fn drop(&mut self) {
        DISPATCH_CONTEXT.with(|slot| {
            *slot.borrow_mut() = self.previous.take();
        });
    }
}
