use std::thread::ThreadId;

use thiserror::Error;

/// Outcome of a failed presentation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentError {
    /// The surface is momentarily unusable (lost, outdated, timed out, contents
    /// lost). The frame is dropped; the caller simply renders the next one.
    #[error("frame skipped: {0}")]
    Transient(String),

    /// The surface can no longer present at all.
    #[error("presentation failed: {0}")]
    Fatal(String),
}

impl PresentError {
    #[inline]
    pub fn is_transient(&self) -> bool {
        matches!(self, PresentError::Transient(_))
    }
}

/// Errors returned by runtime operations of a [`crate::GraphicsEngine`].
///
/// Construction failures are reported separately as `anyhow::Error`.
#[derive(Debug, Error)]
pub enum GraphicsError {
    #[error("graphics engine already cleaned up")]
    Disposed,

    #[error("accelerated surface is pinned to thread {pinned:?}, called from {caller:?}")]
    WrongThread { pinned: ThreadId, caller: ThreadId },

    #[error("renderer has not been set up yet")]
    NotReady,

    #[error(transparent)]
    Present(#[from] PresentError),

    #[error("failed to dispose native window: {0:#}")]
    Teardown(#[source] anyhow::Error),
}
