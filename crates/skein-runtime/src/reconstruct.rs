//! Causal trace reconstruction.
//!
//! Merges the live synchronous stack with the historical creation snapshots
//! of every tracked ancestor into one ordered frame chain, innermost first.
//! Pure read-and-merge: the registry is never mutated, so reconstruction is
//! safe to call repeatedly and concurrently from anywhere.

use crate::context::{current_context, in_dispatch_scope};
use crate::registry;
use skein_types::{BoundaryKey, Frame, TraceResult};
use std::collections::HashSet;

/// Reconstruct the causal trace for the calling execution point.
///
/// Never fails: a missing ancestor entry terminates the walk with a bare
/// synthetic frame naming the untracked boundary, and a capture failure
/// degrades to an empty live prefix.
pub fn reconstruct() -> TraceResult {
    let live = match skein_capture::capture_current(skein_capture::CaptureOptions::default()) {
        Ok(frames) => frames,
        Err(error) => {
            tracing::debug!(%error, "no live frames visible at reconstruction point");
            Vec::new()
        }
    };

    let current_key = current_context().map(|ctx| ctx.key());
    let frames = assemble(live, current_key);

    TraceResult {
        frames,
        current_task: current_key.and_then(BoundaryKey::as_task),
        in_executor: in_dispatch_scope(),
    }
}

/// Walk the registry from `start`, appending each ancestor's creation
/// snapshot with depths renumbered to continue the chain.
fn assemble(live: Vec<Frame>, start: Option<BoundaryKey>) -> Vec<Frame> {
    let mut chain = live;
    let mut depth_offset = chain.len();
    // Parent links are acyclic by construction (a creator exists strictly
    // before its creation); the visited set bounds the walk regardless.
    let mut visited: HashSet<BoundaryKey> = HashSet::new();
    let mut cursor = start;

    while let Some(key) = cursor {
        if !visited.insert(key) {
            break;
        }
        let Some(entry) = registry::lookup(key) else {
            let terminal = Frame::synthetic(key.to_string(), depth_offset)
                .expect("synthetic frame name is never empty");
            chain.push(terminal);
            break;
        };
        for frame in entry.snapshot.frames() {
            let mut frame = frame.clone();
            frame.depth += depth_offset;
            chain.push(frame);
        }
        depth_offset += entry.snapshot.len();
        cursor = entry.parent;
    }

    chain
}
