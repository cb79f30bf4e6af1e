//! Behavior of the control surface: spawns while disabled leave a gap, not
//! an error.
//!
//! Lives in its own test binary because it toggles the process-wide flag.

use skein_types::TraceResult;

fn assert_depths_contiguous(trace: &TraceResult) {
    for (index, frame) in trace.frames.iter().enumerate() {
        assert_eq!(frame.depth, index, "depth must be contiguous from 0");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn disabled_spawn_leaves_a_synthetic_gap() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    skein_runtime::disable();

    let handle = skein_tokio::spawn(async {
        let own_key = skein_runtime::current_context()
            .expect("even untracked tasks carry an identity")
            .key();
        // Spawned while disabled: no boundary entry was recorded.
        assert!(skein_runtime::registry::lookup(own_key).is_none());

        let gap_trace = skein_runtime::reconstruct();

        // Re-enable and spawn a child from inside the untracked task.
        skein_runtime::enable();
        let child_trace = skein_tokio::spawn(async { skein_runtime::reconstruct() })
            .await
            .unwrap();

        (own_key, gap_trace, child_trace)
    });
    let (own_key, gap_trace, child_trace) = handle.await.unwrap();

    // Inside the untracked task itself: the walk stops immediately at a
    // bare synthetic frame naming it.
    assert_depths_contiguous(&gap_trace);
    let terminal = gap_trace.frames.last().unwrap();
    assert_eq!(terminal.name, own_key.to_string());
    assert!(terminal.line.is_none());
    assert!(terminal.location.is_none());
    assert_eq!(gap_trace.current_task, own_key.as_task());

    // The child is tracked and names the untracked parent as its gap.
    assert_depths_contiguous(&child_trace);
    let child = child_trace.current_task.expect("child task is current");
    assert!(child_trace
        .frames
        .iter()
        .any(|f| f.boundary_task == Some(child)));
    let child_terminal = child_trace.frames.last().unwrap();
    assert_eq!(child_terminal.name, own_key.to_string());
    assert!(child_terminal.line.is_none());
}
