use std::{
    cell::{Ref, RefCell},
    collections::HashMap,
    rc::{Rc, Weak},
    time::Duration,
};

use tracing::{debug, trace};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::WindowId,
};

use crate::Error;

thread_local! {
    static WINDOW_SYSTEM: RefCell<Weak<WindowSystem>> = const { RefCell::new(Weak::new()) };
}

/// Shared owner of the process's window event loop.
///
/// Every windowed console holds an `Rc` to it; the loop lives until the last
/// one is dropped. Events are pumped without blocking and parked in a
/// mailbox per window until that window's console polls.
///
/// The guard is thread-local, so windowed consoles must stay on the thread
/// that created the first one.
pub(crate) struct WindowSystem {
    event_loop: RefCell<EventLoop<()>>,
    mailboxes: RefCell<HashMap<WindowId, Vec<WindowEvent>>>,
}

impl WindowSystem {
    /// Returns the live window system, creating it on first use.
    pub(crate) fn acquire() -> Result<Rc<Self>, Error> {
        WINDOW_SYSTEM.with(|slot| {
            if let Some(system) = slot.borrow().upgrade() {
                return Ok(system);
            }

            let event_loop = EventLoop::new().map_err(Error::window_system_failed)?;
            let system = Rc::new(Self {
                event_loop: RefCell::new(event_loop),
                mailboxes: RefCell::new(HashMap::new()),
            });
            *slot.borrow_mut() = Rc::downgrade(&system);

            debug!("window system started");
            Ok(system)
        })
    }

    /// The event loop, for creating windows.
    pub(crate) fn event_loop(&self) -> Ref<'_, EventLoop<()>> {
        self.event_loop.borrow()
    }

    /// Starts collecting events for `window`.
    pub(crate) fn register(&self, window: WindowId) {
        self.mailboxes.borrow_mut().entry(window).or_default();
    }

    /// Stops collecting events for `window` and discards any still pending.
    pub(crate) fn unregister(&self, window: WindowId) {
        self.mailboxes.borrow_mut().remove(&window);
    }

    /// Pumps pending platform events, then moves those addressed to `window`
    /// into `out`.
    pub(crate) fn drain(&self, window: WindowId, out: &mut Vec<WindowEvent>) {
        self.pump();
        if let Some(mailbox) = self.mailboxes.borrow_mut().get_mut(&window) {
            out.append(mailbox);
        }
    }

    fn pump(&self) {
        let mut mailboxes = self.mailboxes.borrow_mut();
        let mut router = EventRouter { mailboxes: &mut mailboxes, routed: 0 };

        let status = self
            .event_loop
            .borrow_mut()
            .pump_app_events(Some(Duration::ZERO), &mut router);

        if router.routed > 0 {
            trace!(events = router.routed, "window events pumped");
        }
        if let PumpStatus::Exit(code) = status {
            debug!(code, "window event loop requested exit");
        }
    }
}

impl Drop for WindowSystem {
    fn drop(&mut self) {
        debug!("window system shut down");
    }
}

/// Sorts window events into per-window mailboxes, dropping events for
/// windows nobody registered.
struct EventRouter<'a> {
    mailboxes: &'a mut HashMap<WindowId, Vec<WindowEvent>>,
    routed: usize,
}

impl ApplicationHandler for EventRouter<'_> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window: WindowId, event: WindowEvent) {
        if let Some(mailbox) = self.mailboxes.get_mut(&window) {
            mailbox.push(event);
            self.routed += 1;
        }
    }
}
