use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Tracks frames that have been started but not yet finished presenting.
///
/// `flip` takes a [`FrameToken`] before presenting; the token is released when
/// the frame is done (synchronously for the software path, from the GPU
/// completion callback for the accelerated path). `cleanup` waits for the
/// fence to drain before disposing native resources.
#[derive(Clone, Default)]
pub struct FrameFence {
    shared: Arc<FenceState>,
}

#[derive(Default)]
struct FenceState {
    in_flight: Mutex<u32>,
    drained: Condvar,
}

impl FrameFence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a frame as in flight until the returned token is released or dropped.
    pub fn begin(&self) -> FrameToken {
        *self.shared.in_flight.lock() += 1;
        FrameToken {
            shared: self.shared.clone(),
        }
    }

    pub fn in_flight(&self) -> u32 {
        *self.shared.in_flight.lock()
    }

    /// Waits until no frame is in flight, for at most `timeout`.
    ///
    /// `poll` runs between waits so backends can drive completion callbacks.
    /// Returns `false` if frames were still in flight when the bound expired.
    pub fn wait_idle(&self, timeout: Duration, mut poll: impl FnMut()) -> bool {
        const STEP: Duration = Duration::from_millis(5);
        let deadline = Instant::now() + timeout;

        loop {
            if self.in_flight() == 0 {
                return true;
            }

            // Outside the lock: completion callbacks release tokens from here.
            poll();

            let mut in_flight = self.shared.in_flight.lock();
            if *in_flight == 0 {
                return true;
            }

            let now = Instant::now();
            if now >= deadline {
                return false;
            }

            let step = (deadline - now).min(STEP);
            self.shared.drained.wait_for(&mut in_flight, step);
        }
    }
}

/// One in-flight frame. Releasing or dropping it completes the frame.
#[must_use = "dropping the token immediately completes the frame"]
pub struct FrameToken {
    shared: Arc<FenceState>,
}

impl FrameToken {
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for FrameToken {
    fn drop(&mut self) {
        let mut in_flight = self.shared.in_flight.lock();
        *in_flight = in_flight.saturating_sub(1);
        if *in_flight == 0 {
            self.shared.drained.notify_all();
        }
    }
}
