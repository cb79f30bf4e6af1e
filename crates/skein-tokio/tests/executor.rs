//! Lineage reconstruction across the blocking-pool boundary.

use skein_types::TraceResult;

fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    skein_runtime::enable();
}

fn assert_depths_contiguous(trace: &TraceResult) {
    for (index, frame) in trace.frames.iter().enumerate() {
        assert_eq!(frame.depth, index, "depth must be contiguous from 0");
    }
}

#[inline(never)]
fn blocking_probe() -> TraceResult {
    skein_runtime::reconstruct()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dispatch_is_tagged_and_continues_into_task_lineage() {
    init();

    let trace = skein_tokio::spawn(async {
        skein_tokio::spawn_blocking(|| blocking_probe())
            .await
            .unwrap()
    })
    .await
    .unwrap();

    // Pool context: no current task, executor flag set.
    assert!(trace.in_executor);
    assert!(trace.current_task.is_none());
    assert_depths_contiguous(&trace);
    assert!(
        trace.frames[0].name.contains("blocking_probe"),
        "innermost frame is the live pool work: {}",
        trace.frames[0].name
    );

    // Exactly one frame marks the dispatch call site, resolved to this file.
    let boundaries: Vec<usize> = trace
        .frames
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is_executor_boundary)
        .map(|(index, _)| index)
        .collect();
    assert_eq!(boundaries.len(), 1);
    let dispatch = &trace.frames[boundaries[0]];
    assert!(dispatch.boundary_task.is_none());
    assert!(dispatch.line.is_some());
    assert!(
        dispatch
            .location
            .as_deref()
            .is_some_and(|loc| loc.ends_with("executor.rs")),
        "dispatch site should resolve to this file: {:?}",
        dispatch.location
    );

    // The chain continues past the dispatch into the spawning task's
    // creation boundary.
    let task_at = trace
        .frames
        .iter()
        .position(|f| f.boundary_task.is_some())
        .expect("enclosing task boundary present");
    assert!(boundaries[0] < task_at);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dispatch_from_untracked_context_roots_cleanly() {
    init();

    // The test body runs in tokio's root task, which skein never spawned.
    let trace = skein_tokio::spawn_blocking(|| blocking_probe())
        .await
        .unwrap();

    assert!(trace.in_executor);
    assert!(trace.current_task.is_none());
    assert_depths_contiguous(&trace);
    assert_eq!(
        trace
            .frames
            .iter()
            .filter(|f| f.is_executor_boundary)
            .count(),
        1
    );
    assert!(trace.frames.iter().all(|f| f.boundary_task.is_none()));
    // Untracked parent means a root, not a gap marker.
    assert!(!trace
        .frames
        .iter()
        .any(|f| f.name.starts_with("task-") || f.name.starts_with("dispatch-")));
}
