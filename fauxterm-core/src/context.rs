use std::ops::{Deref, DerefMut};

use crate::{
    Action, Backend, Console, ConsoleId, Error, Event, EventKind, EventQueue, EventSink, Key,
    MouseButton, WindowControls,
};

struct ConsoleEntry {
    id: ConsoleId,
    console: Console,
    backend: Box<dyn Backend>,
}

/// Owner of every console and of the shared event queue.
///
/// Consoles are kept in creation order: events are polled and the context is
/// torn down in that order. Dropping the context destroys every remaining
/// console.
pub struct Context {
    entries: Vec<ConsoleEntry>,
    events: EventQueue,
    next_id: u32,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("consoles", &self.entries.iter().map(|e| e.id).collect::<Vec<_>>())
            .field("events", &self.events)
            .finish()
    }
}

impl Context {
    /// A context without consoles.
    #[must_use]
    pub fn new() -> Self {
        Self { entries: Vec::new(), events: EventQueue::new(), next_id: 1 }
    }

    /// Takes ownership of a console and the backend presenting it.
    pub fn attach(&mut self, console: Console, backend: Box<dyn Backend>) -> ConsoleId {
        let id = ConsoleId(self.next_id);
        self.next_id += 1;

        tracing::debug!(
            console = id.get(),
            layers = console.layer_count(),
            terminal = console.is_real_terminal(),
            "console attached"
        );
        self.entries.push(ConsoleEntry { id, console, backend });
        id
    }

    /// Whether any console is alive.
    #[must_use]
    pub fn has_console(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Ids of the live consoles, in creation order.
    pub fn console_ids(&self) -> impl Iterator<Item = ConsoleId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    /// Console `id`, if it is still alive.
    #[must_use]
    pub fn console(&self, id: ConsoleId) -> Option<&Console> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.console)
    }

    /// Mutable access to a console together with its backend operations.
    pub fn console_mut(&mut self, id: ConsoleId) -> Option<ConsoleMut<'_>> {
        self.entries
            .iter_mut()
            .find(|e| e.id == id)
            .map(|entry| ConsoleMut { entry })
    }

    /// Collects pending input from every console into the event queue.
    pub fn poll_events(&mut self) {
        for entry in &mut self.entries {
            let mut sink = EventSink::new(entry.id, &mut self.events);
            entry.backend.poll_events(&mut entry.console, &mut sink);
        }
    }

    /// Pops the oldest queued event.
    pub fn next_event(&mut self) -> Option<Event> {
        self.events.pop()
    }

    /// Queues an application-defined event.
    pub fn push_event(&mut self, console: ConsoleId, kind: EventKind) {
        self.events.push(Event { console, kind });
    }

    /// Presents one console. Unknown ids are ignored.
    ///
    /// # Errors
    /// Returns the backend's error if presenting fails.
    pub fn refresh(&mut self, id: ConsoleId) -> Result<(), Error> {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => entry.backend.refresh(&mut entry.console),
            None => Ok(()),
        }
    }

    /// Presents every console in creation order.
    ///
    /// # Errors
    /// Stops at, and returns, the first backend error.
    pub fn refresh_all(&mut self) -> Result<(), Error> {
        for entry in &mut self.entries {
            entry.backend.refresh(&mut entry.console)?;
        }
        Ok(())
    }

    /// Destroys a console and its backend. Events it already queued stay
    /// in the queue. Returns whether the console existed.
    pub fn destroy_console(&mut self, id: ConsoleId) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };

        let mut entry = self.entries.remove(index);
        entry.backend.destroy(&mut entry.console);
        tracing::debug!(console = id.get(), "console destroyed");
        true
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        for mut entry in self.entries.drain(..) {
            entry.backend.destroy(&mut entry.console);
            tracing::debug!(console = entry.id.get(), "console destroyed");
        }
    }
}

/// A console borrowed from its [`Context`], with the operations its backend
/// provides.
///
/// Window operations on a console without a window do nothing. Getters then
/// report `false` or `(0, 0)`, except `is_decorated` (`true`) and `opacity`
/// (`1.0`).
pub struct ConsoleMut<'a> {
    entry: &'a mut ConsoleEntry,
}

impl Deref for ConsoleMut<'_> {
    type Target = Console;

    fn deref(&self) -> &Console {
        &self.entry.console
    }
}

impl DerefMut for ConsoleMut<'_> {
    fn deref_mut(&mut self) -> &mut Console {
        &mut self.entry.console
    }
}

impl ConsoleMut<'_> {
    /// Handle of this console.
    #[must_use]
    pub fn id(&self) -> ConsoleId {
        self.entry.id
    }

    /// Presents this console.
    ///
    /// # Errors
    /// Returns the backend's error if presenting fails.
    pub fn refresh(&mut self) -> Result<(), Error> {
        self.entry.backend.refresh(&mut self.entry.console)
    }

    /// Pans and zooms the presented grid. Ignored by terminals.
    pub fn transform_viewport(&mut self, translation: (f32, f32), scale: (f32, f32)) {
        self.entry.backend.transform_viewport(translation, scale);
    }

    /// Drops any pan and zoom.
    pub fn reset_viewport(&mut self) {
        self.entry.backend.reset_viewport();
    }

    /// Last cursor position in pixels; `(0, 0)` without a pointer.
    #[must_use]
    pub fn cursor_viewport_pos(&self) -> (f64, f64) {
        self.entry.backend.cursor_viewport_pos()
    }

    /// Last cursor position in tiles, with pan and zoom undone.
    #[must_use]
    pub fn cursor_tile_pos(&self) -> (f64, f64) {
        self.entry.backend.cursor_tile_pos()
    }

    /// Whether `button` is held down.
    #[must_use]
    pub fn mouse_button(&self, button: MouseButton) -> Action {
        self.entry.backend.mouse_button(button)
    }

    /// Whether `key` is held down. Terminals always report `Release`.
    #[must_use]
    pub fn key_state(&self, key: Key) -> Action {
        self.entry.backend.key_state(key)
    }

    /// Whether this console is presented in a window.
    pub fn has_window(&mut self) -> bool {
        self.entry.backend.window_controls().is_some()
    }

    fn window(&mut self) -> Option<&mut dyn WindowControls> {
        self.entry.backend.window_controls()
    }

    fn window_query<T>(&mut self, default: T, query: impl FnOnce(&dyn WindowControls) -> T) -> T {
        self.window().map_or(default, |w| query(w))
    }

    fn with_window_and_console(&mut self, f: impl FnOnce(&mut dyn WindowControls, &mut Console)) {
        let ConsoleEntry { console, backend, .. } = &mut *self.entry;
        if let Some(window) = backend.window_controls() {
            f(window, console);
        }
    }

    /// Window size in pixels; `(0, 0)` for terminals.
    pub fn window_pixel_wh(&mut self) -> (u32, u32) {
        self.window_query((0, 0), |w| w.window_pixel_wh())
    }

    /// Resizes and shows the window.
    pub fn set_window_pixel_wh(&mut self, wh: (u32, u32)) {
        if let Some(w) = self.window() {
            w.set_window_pixel_wh(wh);
        }
    }

    /// Grid size the window was last fitted to.
    pub fn viewport_tile_wh(&mut self) -> (usize, usize) {
        self.window_query((0, 0), |w| w.viewport_tile_wh())
    }

    /// Sizes the window to the current grid.
    pub fn fit_window_to_viewport(&mut self) {
        self.with_window_and_console(|w, c| w.fit_window_to_viewport(c));
    }

    /// Sizes the grid to the whole tiles fitting in the window.
    pub fn fit_viewport_to_window(&mut self) {
        self.with_window_and_console(|w, c| w.fit_viewport_to_window(c));
    }

    /// Leaves fullscreen with a window of `tile_wh` tiles.
    pub fn set_windowed_tile_wh(&mut self, tile_wh: (usize, usize)) {
        self.with_window_and_console(|w, c| w.set_windowed_tile_wh(c, tile_wh));
    }

    /// Covers the current monitor with a borderless window.
    pub fn set_windowed_fullscreen(&mut self) {
        self.with_window_and_console(|w, c| w.set_windowed_fullscreen(c));
    }

    /// Whether the window covers its monitor.
    pub fn is_fullscreen(&mut self) -> bool {
        self.window_query(false, |w| w.is_fullscreen())
    }

    /// Hides the window.
    pub fn hide_window(&mut self) {
        if let Some(w) = self.window() {
            w.hide_window();
        }
    }

    /// Whether the window is shown.
    pub fn is_visible(&mut self) -> bool {
        self.window_query(false, |w| w.is_visible())
    }

    /// Allows or forbids resizing by the user.
    pub fn set_resizable(&mut self, resizable: bool) {
        if let Some(w) = self.window() {
            w.set_resizable(resizable);
        }
    }

    /// Whether the user may resize the window.
    pub fn is_resizable(&mut self) -> bool {
        self.window_query(false, |w| w.is_resizable())
    }

    /// Shows or hides the title bar and borders.
    pub fn set_decorated(&mut self, decorated: bool) {
        if let Some(w) = self.window() {
            w.set_decorated(decorated);
        }
    }

    /// Whether the window has a title bar; `true` for terminals.
    pub fn is_decorated(&mut self) -> bool {
        self.window_query(true, |w| w.is_decorated())
    }

    /// Keeps the window above all others.
    pub fn set_floating(&mut self, floating: bool) {
        if let Some(w) = self.window() {
            w.set_floating(floating);
        }
    }

    /// Whether the window stays on top.
    pub fn is_floating(&mut self) -> bool {
        self.window_query(false, |w| w.is_floating())
    }

    /// Iconifies the window.
    pub fn minimize(&mut self) {
        if let Some(w) = self.window() {
            w.minimize();
        }
    }

    /// Whether the window is iconified.
    pub fn is_minimized(&mut self) -> bool {
        self.window_query(false, |w| w.is_minimized())
    }

    /// Maximizes the window.
    pub fn maximize(&mut self) {
        if let Some(w) = self.window() {
            w.maximize();
        }
    }

    /// Whether the window is maximized.
    pub fn is_maximized(&mut self) -> bool {
        self.window_query(false, |w| w.is_maximized())
    }

    /// Undoes minimize or maximize.
    pub fn restore(&mut self) {
        if let Some(w) = self.window() {
            w.restore();
        }
    }

    /// Gives the window input focus.
    pub fn focus(&mut self) {
        if let Some(w) = self.window() {
            w.focus();
        }
    }

    /// Whether the window has input focus.
    pub fn is_focused(&mut self) -> bool {
        self.window_query(false, |w| w.is_focused())
    }

    /// Asks the window manager to flag the window.
    pub fn request_attention(&mut self) {
        if let Some(w) = self.window() {
            w.request_attention();
        }
    }

    /// Sets whole-window opacity in `0.0..=1.0`.
    pub fn set_opacity(&mut self, opacity: f32) {
        if let Some(w) = self.window() {
            w.set_opacity(opacity);
        }
    }

    /// Window opacity; 1.0 for terminals.
    pub fn opacity(&mut self) -> f32 {
        self.window_query(1.0, |w| w.opacity())
    }
}
