//! Live-stack introspection for trace capture.
//!
//! Captures the current synchronous call stack as ordered [`Frame`]s,
//! innermost first, resolved to function name, file, and line via the
//! `backtrace` crate. Frames belonging to the engine itself, the standard
//! library, or the tokio runtime are dropped so snapshots only contain the
//! caller's code.

use skein_types::{Frame, InvariantError};
use std::error::Error;
use std::fmt;
use std::num::NonZeroUsize;

#[derive(Debug, Clone, Copy)]
pub struct CaptureOptions {
    /// Depth bound on the captured snapshot. Caps per-capture memory
    /// independently of how deep the real stack is.
    pub max_frames: NonZeroUsize,
    /// Frames to drop from the innermost end after internal-frame filtering.
    pub skip_frames: usize,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            max_frames: NonZeroUsize::new(64)
                .expect("invariant violated: default max_frames must be non-zero"),
            skip_frames: 0,
        }
    }
}

#[derive(Debug)]
pub enum CaptureError {
    /// Nothing remained after filtering; the caller's code is not visible
    /// from here (e.g. fully inlined or symbol-stripped stacks).
    EmptyCapture,
    InvariantViolation {
        context: &'static str,
        source: InvariantError,
    },
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCapture => {
                write!(f, "no caller frames survived capture filtering")
            }
            Self::InvariantViolation { context, source } => {
                write!(f, "invariant violated in {context}: {source}")
            }
        }
    }
}

impl Error for CaptureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvariantViolation { source, .. } => Some(source),
            Self::EmptyCapture => None,
        }
    }
}

/// Symbol prefixes that never belong in a user-facing trace: this engine's
/// own crates, the capture machinery, the standard library, the tokio
/// runtime, and libc entry points.
const INTERNAL_PREFIXES: &[&str] = &[
    "skein_capture::",
    "skein_runtime::",
    "skein_tokio::",
    "backtrace::",
    "std::",
    "core::",
    "alloc::",
    "test::",
    "tokio::",
    "__",
    "_start",
    "start_thread",
    "clone3",
];

/// True for frames that should be hidden from captured snapshots.
pub fn is_internal_symbol(name: &str) -> bool {
    INTERNAL_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// Capture the live synchronous call stack, innermost first.
///
/// Returned frames have contiguous depths starting at 0 and no boundary
/// markings; callers tag boundary frames themselves.
pub fn capture_current(options: CaptureOptions) -> Result<Vec<Frame>, CaptureError> {
    let backtrace = backtrace::Backtrace::new();

    let mut frames = Vec::new();
    let mut skip_remaining = options.skip_frames;

    'outer: for frame in backtrace.frames() {
        for symbol in frame.symbols() {
            let Some(raw_name) = symbol.name() else {
                continue;
            };
            let name = strip_hash_suffix(&raw_name.to_string()).to_string();
            if name.is_empty() || is_internal_symbol(&name) {
                continue;
            }

            if skip_remaining > 0 {
                skip_remaining -= 1;
                continue;
            }

            let line = symbol.lineno();
            let location = symbol.filename().map(|path| path.display().to_string());
            let depth = frames.len();
            let frame = Frame::new(name, line, location, depth)
                .map_err(|source| CaptureError::InvariantViolation {
                    context: "captured_frame",
                    source,
                })?;
            frames.push(frame);

            if frames.len() == options.max_frames.get() {
                break 'outer;
            }
        }
    }

    if frames.is_empty() {
        return Err(CaptureError::EmptyCapture);
    }

    Ok(frames)
}

/// Drop the `::h0123456789abcdef` disambiguator legacy mangling appends to
/// demangled Rust symbol names.
fn strip_hash_suffix(name: &str) -> &str {
    let Some(pos) = name.rfind("::h") else {
        return name;
    };
    let hash = &name[pos + 3..];
    if hash.len() == 16 && hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        &name[..pos]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_symbols_are_hidden() {
        assert!(is_internal_symbol("skein_runtime::reconstruct::reconstruct"));
        assert!(is_internal_symbol("tokio::runtime::task::raw::poll"));
        assert!(is_internal_symbol("std::rt::lang_start"));
        assert!(is_internal_symbol("__libc_start_main"));
        assert!(!is_internal_symbol("my_app::main"));
        assert!(!is_internal_symbol("worker::handle_request::{{closure}}"));
    }

    #[test]
    fn hash_suffix_is_stripped() {
        assert_eq!(
            strip_hash_suffix("my_app::run::hdeadbeef01234567"),
            "my_app::run"
        );
        // Not a 16-hex-digit suffix: left alone.
        assert_eq!(strip_hash_suffix("my_app::run::hello"), "my_app::run::hello");
        assert_eq!(strip_hash_suffix("my_app::run"), "my_app::run");
    }
}
