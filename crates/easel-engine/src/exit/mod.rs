//! Process-wide close handling.
//!
//! Every managed window registers with the single [`ExitSignal`] when it is
//! constructed. Closing any registered window terminates the process. The
//! signal only stores window keys, never the windows themselves.
//!
//! Lifecycle: created lazily on first use, lives for the rest of the process.
//! [`ExitSignal::install`] may replace the terminator before that first use.

use parking_lot::Mutex;
use state::InitCell;

use crate::platform::WindowKey;

/// Called with the exit status when the process must end.
pub type Terminator = fn(i32);

static EXIT_SIGNAL: InitCell<ExitSignal> = InitCell::new();

pub struct ExitSignal {
    registered: Mutex<Vec<WindowKey>>,
    terminator: Terminator,
}

impl ExitSignal {
    /// Standalone signal; most code wants [`ExitSignal::global`].
    pub fn new(terminator: Terminator) -> Self {
        Self {
            registered: Mutex::new(Vec::new()),
            terminator,
        }
    }

    /// The process-wide signal, initialised on first access.
    pub fn global() -> &'static ExitSignal {
        EXIT_SIGNAL.get_or_init(|| ExitSignal::new(exit_process))
    }

    /// Installs the process-wide signal with a custom terminator.
    ///
    /// Returns `false` when the global signal already exists; the existing
    /// terminator is kept.
    pub fn install(terminator: Terminator) -> bool {
        EXIT_SIGNAL.set(ExitSignal::new(terminator))
    }

    pub fn register(&self, key: WindowKey) {
        let mut registered = self.registered.lock();
        if !registered.contains(&key) {
            registered.push(key);
        }
    }

    /// Returns `true` when `key` was registered.
    pub fn unregister(&self, key: WindowKey) -> bool {
        let mut registered = self.registered.lock();
        let before = registered.len();
        registered.retain(|k| *k != key);
        registered.len() != before
    }

    pub fn is_registered(&self, key: WindowKey) -> bool {
        self.registered.lock().contains(&key)
    }

    pub fn registered_count(&self) -> usize {
        self.registered.lock().len()
    }

    /// The user asked to close `key`. Terminates with status 0 if the window is
    /// managed; closes of unknown windows are ignored.
    pub fn window_closing(&self, key: WindowKey) {
        if !self.is_registered(key) {
            log::debug!("close request from unmanaged window {key:?} ignored");
            return;
        }

        log::info!("window {key:?} closed, exiting");
        self.terminate(0);
    }

    pub fn terminate(&self, status: i32) {
        (self.terminator)(status);
    }
}

fn exit_process(status: i32) {
    std::process::exit(status);
}
