use crate::error::PresentError;

/// High-level response after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM).
    Fatal,
}

impl SurfaceErrorAction {
    /// What `flip` reports for a frame lost to `err`.
    pub fn into_present_error(self, err: &wgpu::SurfaceError) -> PresentError {
        match self {
            SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                PresentError::Transient(err.to_string())
            }
            SurfaceErrorAction::Fatal => PresentError::Fatal(err.to_string()),
        }
    }
}
