use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use crate::config::WindowKind;
use crate::platform::{NativeWindow, Toolkit};

use super::pump::EventPump;
use super::window::DesktopWindow;

/// Real windows on the current desktop.
///
/// Owns the process event loop, so at most one toolkit exists per process and
/// it must be created on the main thread on platforms that require it.
pub struct DesktopToolkit {
    pump: Rc<RefCell<EventPump>>,
}

impl DesktopToolkit {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pump: Rc::new(RefCell::new(EventPump::new()?)),
        })
    }
}

impl Toolkit for DesktopToolkit {
    fn create_window(&self, kind: WindowKind) -> Result<Box<dyn NativeWindow>> {
        Ok(Box::new(DesktopWindow::create(self.pump.clone(), kind)?))
    }
}
