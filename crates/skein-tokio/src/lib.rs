//! Traced task spawning, mirroring [`tokio::task`].
//!
//! These wrappers are drop-in replacements for [`tokio::spawn`] and
//! [`tokio::task::spawn_blocking`], composed at tokio's public API boundary:
//! each one records a boundary entry for the trace engine and then delegates
//! to the wrapped tokio call unchanged. Swapping `tokio::spawn` for
//! [`spawn`] is the only integration step a program needs.
//!
//! | Item | Tokio equivalent |
//! |---|---|
//! | [`spawn`] | [`tokio::spawn`] |
//! | [`spawn_blocking`] | [`tokio::task::spawn_blocking`] |

use std::future::Future;

use skein_runtime::CURRENT_CONTEXT;
use tokio::task::JoinHandle;

/// Spawns a task, equivalent to [`tokio::spawn`].
///
/// Captures the calling stack as the new task's creation snapshot (while
/// tracing is enabled) and propagates the task's identity into its execution
/// context so traces requested inside it can walk back to this call site.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let ctx = skein_runtime::task_creation_context();
    tokio::spawn(CURRENT_CONTEXT.scope(ctx, future))
}

/// Spawns blocking work on the pool, equivalent to
/// [`tokio::task::spawn_blocking`].
///
/// The dispatch identity crosses the thread boundary with the closure and is
/// installed on the pool thread at the moment the closure starts running, so
/// a trace requested inside the blocking work continues into the dispatching
/// task's lineage.
pub fn spawn_blocking<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let ctx = skein_runtime::dispatch_creation_context();
    tokio::task::spawn_blocking(move || {
        let _scope = skein_runtime::enter_dispatch_scope(ctx);
        f()
    })
}
