//! Causal trace reconstruction for tokio tasks and blocking-pool work.
//!
//! A spawned task's execution point is disconnected, in time and in call
//! frames, from the code that created it. Skein re-links that lineage:
//! replace [`tokio::spawn`] / [`tokio::task::spawn_blocking`] with
//! [`spawn`] / [`spawn_blocking`], call [`enable`] once, and
//! [`reconstruct`] returns the full causal chain — the live stack, then the
//! creation stack of every ancestor task, across task boundaries and across
//! the hop onto the blocking pool.
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() {
//!     skein::enable();
//!
//!     skein::spawn(async {
//!         let trace = skein::reconstruct();
//!         for frame in &trace.frames {
//!             // frame.name, frame.line, frame.location, frame.depth,
//!             // frame.boundary_task, frame.is_executor_boundary
//!         }
//!     });
//! }
//! ```
//!
//! Frames are ordered innermost first with strictly increasing depths.
//! Task-creation sites are marked with [`Frame::boundary_task`], pool
//! dispatch sites with [`Frame::is_executor_boundary`]. Bookkeeping
//! failures never propagate to spawns or dispatches — they only shorten the
//! trace.

pub use skein_runtime::{disable, enable, is_enabled, reconstruct};
pub use skein_tokio::{spawn, spawn_blocking};
pub use skein_types::{
    BoundaryKey, DispatchId, Frame, FrameSnapshot, InvariantError, TaskId, TraceResult,
};
