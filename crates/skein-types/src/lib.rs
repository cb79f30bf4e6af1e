//! Data model for causal async traces.
//!
//! A trace is an ordered sequence of [`Frame`]s, innermost first. Frames come
//! from two places: the live synchronous stack at the point a trace is
//! requested, and historical [`FrameSnapshot`]s captured when a task was
//! spawned or work was dispatched to the blocking pool. Boundary crossings are
//! marked on the innermost frame of the historical snapshot: `boundary_task`
//! for task creation, `is_executor_boundary` for pool dispatch.

use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    ZeroId(&'static str),
    EmptyField(&'static str),
    EmptySnapshotFrames,
    NonContiguousDepth { index: usize, depth: usize },
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroId(field) => write!(f, "{field} must be non-zero"),
            Self::EmptyField(field) => write!(f, "{field} must be non-empty"),
            Self::EmptySnapshotFrames => write!(f, "snapshot frames must be non-empty"),
            Self::NonContiguousDepth { index, depth } => write!(
                f,
                "snapshot frame {index} has depth {depth}, expected {index}"
            ),
        }
    }
}

impl Error for InvariantError {}

/// Identifier of a spawned task, unique for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(value: u64) -> Result<Self, InvariantError> {
        if value == 0 {
            return Err(InvariantError::ZeroId("task_id"));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Identifier of one dispatch of synchronous work to the blocking pool,
/// unique for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DispatchId(u64);

impl DispatchId {
    pub fn new(value: u64) -> Result<Self, InvariantError> {
        if value == 0 {
            return Err(InvariantError::ZeroId("dispatch_id"));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DispatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dispatch-{}", self.0)
    }
}

/// Registry key: either a task or a single pool-dispatch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BoundaryKey {
    Task(TaskId),
    Dispatch(DispatchId),
}

impl BoundaryKey {
    pub fn as_task(self) -> Option<TaskId> {
        match self {
            Self::Task(id) => Some(id),
            Self::Dispatch(_) => None,
        }
    }

    pub fn is_dispatch(self) -> bool {
        matches!(self, Self::Dispatch(_))
    }
}

impl fmt::Display for BoundaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task(id) => id.fmt(f),
            Self::Dispatch(id) => id.fmt(f),
        }
    }
}

/// One entry in a causal trace.
///
/// Either a real source position (`line`/`location` present) or a synthetic
/// marker such as the terminal frame for an untracked ancestor (`line` and
/// `location` absent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub name: String,
    pub line: Option<u32>,
    pub location: Option<String>,
    /// 0 = innermost (closest to the point of capture), increasing outward.
    pub depth: usize,
    /// Set when this frame is the call site that created `boundary_task`.
    pub boundary_task: Option<TaskId>,
    /// True when this frame is the call site that dispatched work to the pool.
    pub is_executor_boundary: bool,
}

impl Frame {
    pub fn new(
        name: impl Into<String>,
        line: Option<u32>,
        location: Option<String>,
        depth: usize,
    ) -> Result<Self, InvariantError> {
        let name = name.into();
        if name.is_empty() {
            return Err(InvariantError::EmptyField("frame_name"));
        }
        Ok(Self {
            name,
            line,
            location,
            depth,
            boundary_task: None,
            is_executor_boundary: false,
        })
    }

    /// A bare name-only frame, used as the terminal marker when an ancestor
    /// has no registry entry.
    pub fn synthetic(name: impl Into<String>, depth: usize) -> Result<Self, InvariantError> {
        Self::new(name, None, None, depth)
    }

    /// True when the frame sits at the same source position as `other`,
    /// ignoring depth and boundary markings.
    pub fn same_site(&self, other: &Frame) -> bool {
        self.name == other.name && self.line == other.line && self.location == other.location
    }
}

/// An immutable, ordered sequence of frames captured at one instant,
/// innermost (depth 0) to outermost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSnapshot {
    frames: Vec<Frame>,
}

impl FrameSnapshot {
    pub fn new(frames: Vec<Frame>) -> Result<Self, InvariantError> {
        if frames.is_empty() {
            return Err(InvariantError::EmptySnapshotFrames);
        }
        for (index, frame) in frames.iter().enumerate() {
            if frame.depth != index {
                return Err(InvariantError::NonContiguousDepth {
                    index,
                    depth: frame.depth,
                });
            }
        }
        Ok(Self { frames })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Output of a reconstruction: the merged causal chain, innermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceResult {
    pub frames: Vec<Frame>,
    /// The task executing at capture time. `None` at top level and inside
    /// pool-dispatched work (a dispatch key does not denote a task).
    pub current_task: Option<TaskId>,
    /// True when the trace was requested from inside pool-dispatched work.
    pub in_executor: bool,
}
