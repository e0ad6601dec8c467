use std::thread::{self, ThreadId};

use crate::error::GraphicsError;

/// The single thread allowed to drive an accelerated surface.
///
/// Bound to whichever thread constructs the surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ThreadAffinity {
    pinned: ThreadId,
}

impl ThreadAffinity {
    pub fn current() -> Self {
        Self {
            pinned: thread::current().id(),
        }
    }

    #[inline]
    pub fn pinned(self) -> ThreadId {
        self.pinned
    }

    /// Fails with [`GraphicsError::WrongThread`] off the pinned thread.
    pub fn check(self) -> Result<(), GraphicsError> {
        let caller = thread::current().id();
        if caller == self.pinned {
            Ok(())
        } else {
            Err(GraphicsError::WrongThread {
                pinned: self.pinned,
                caller,
            })
        }
    }
}
