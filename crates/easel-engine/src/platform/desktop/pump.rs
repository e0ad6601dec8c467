use std::collections::HashMap;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

/// How long a settling pump keeps the loop running.
pub(super) const SETTLE: Duration = Duration::from_millis(50);

/// Window events the backend cares about, parked until the owning window pumps.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(super) enum PumpedEvent {
    CloseRequested,
    Resized(PhysicalSize<u32>),
}

/// The process event loop plus per-window inboxes.
pub(super) struct EventPump {
    event_loop: EventLoop<()>,
    inbox: HashMap<WindowId, Vec<PumpedEvent>>,
    exited: bool,
}

impl EventPump {
    pub(super) fn new() -> Result<Self> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        Ok(Self {
            event_loop,
            inbox: HashMap::new(),
            exited: false,
        })
    }

    /// Creates a window from inside the event loop.
    pub(super) fn create_window(&mut self, attrs: WindowAttributes) -> Result<Window> {
        let mut collector = Collector {
            inbox: &mut self.inbox,
            pending: Some(attrs),
            created: None,
        };

        let deadline = Instant::now() + Duration::from_millis(500);
        while collector.created.is_none() && Instant::now() < deadline && !self.exited {
            let status = self
                .event_loop
                .pump_app_events(Some(Duration::from_millis(10)), &mut collector);
            if let PumpStatus::Exit(code) = status {
                log::debug!("event loop exited with {code} while creating a window");
                self.exited = true;
            }
        }

        match collector.created {
            Some(result) => result.context("failed to create window"),
            None => Err(anyhow!("event loop never offered a window creation callback")),
        }
    }

    /// Runs the loop for up to `timeout` without creating anything.
    pub(super) fn pump(&mut self, timeout: Duration) {
        if self.exited {
            return;
        }

        let mut collector = Collector {
            inbox: &mut self.inbox,
            pending: None,
            created: None,
        };
        if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(Some(timeout), &mut collector) {
            log::debug!("event loop exited with {code}");
            self.exited = true;
        }
    }

    /// Pumps repeatedly for `duration` so compositor round-trips can complete.
    pub(super) fn settle(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            self.pump(Duration::from_millis(5));
            if Instant::now() >= deadline || self.exited {
                break;
            }
        }
    }

    pub(super) fn take_events(&mut self, id: WindowId) -> Vec<PumpedEvent> {
        self.inbox.remove(&id).unwrap_or_default()
    }

    pub(super) fn forget(&mut self, id: WindowId) {
        self.inbox.remove(&id);
    }
}

struct Collector<'a> {
    inbox: &'a mut HashMap<WindowId, Vec<PumpedEvent>>,
    pending: Option<WindowAttributes>,
    created: Option<std::result::Result<Window, winit::error::OsError>>,
}

impl Collector<'_> {
    fn create_pending(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(attrs) = self.pending.take() {
            self.created = Some(event_loop.create_window(attrs));
        }
    }
}

impl ApplicationHandler for Collector<'_> {
    // The first pump of a process delivers `resumed`; later pumps only reach
    // `about_to_wait`. Either one may create the window.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn window_event(&mut self, _: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        let pumped = match event {
            WindowEvent::CloseRequested => PumpedEvent::CloseRequested,
            WindowEvent::Resized(size) => PumpedEvent::Resized(size),
            // Repaints are driven by flip, never by the window system.
            _ => return,
        };
        self.inbox.entry(id).or_default().push(pumped);
    }
}
