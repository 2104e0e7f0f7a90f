use crate::{Action, Console, Error, EventSink, Key, MouseButton};

/// A presentation device behind a [`Console`]: a character terminal, a GPU
/// window, or anything else that can show layered tiles.
///
/// The default bodies describe a device with no pointer, no transformable
/// viewport and no window, which is what a character terminal without
/// mouse support looks like. Backends override what they support.
pub trait Backend {
    /// Presents the console's queued layers and consumes them.
    ///
    /// # Errors
    /// Returns an error if the device fails to present the frame.
    fn refresh(&mut self, console: &mut Console) -> Result<(), Error>;

    /// Translates pending device input into events. Never blocks.
    fn poll_events(&mut self, console: &mut Console, events: &mut EventSink<'_>);

    /// Releases the device. Called exactly once, before the backend is
    /// dropped.
    fn destroy(&mut self, _console: &mut Console) {}

    /// Applies a user translation (in normalized device units) and scale on
    /// top of the base transform.
    fn transform_viewport(&mut self, _translation: (f32, f32), _scale: (f32, f32)) {}

    /// Drops the user transform.
    fn reset_viewport(&mut self) {}

    /// Last cursor position in device pixels.
    fn cursor_viewport_pos(&self) -> (f64, f64) {
        (0.0, 0.0)
    }

    /// Last cursor position in console tiles.
    fn cursor_tile_pos(&self) -> (f64, f64) {
        (0.0, 0.0)
    }

    /// Current state of a mouse button.
    fn mouse_button(&self, _button: MouseButton) -> Action {
        Action::Release
    }

    /// Current state of a key.
    fn key_state(&self, _key: Key) -> Action {
        Action::Release
    }

    /// Window controls, if this backend presents into a window.
    fn window_controls(&mut self) -> Option<&mut dyn WindowControls> {
        None
    }
}

/// Operations on the window presenting a console.
///
/// Methods that change the grid size take the console so the backend can
/// update its tile size and clear stale layers.
pub trait WindowControls {
    /// Window size in pixels.
    fn window_pixel_wh(&self) -> (u32, u32);

    /// Requests a window size in pixels and shows the window.
    fn set_window_pixel_wh(&mut self, wh: (u32, u32));

    /// Grid size in tiles.
    fn viewport_tile_wh(&self) -> (usize, usize);

    /// Sizes the window to fit the console grid exactly.
    fn fit_window_to_viewport(&mut self, console: &mut Console);

    /// Sizes the console grid to the whole tiles fitting in the window.
    fn fit_viewport_to_window(&mut self, console: &mut Console);

    /// Leaves fullscreen and sizes the window to `tile_wh` tiles.
    fn set_windowed_tile_wh(&mut self, console: &mut Console, tile_wh: (usize, usize));

    /// Switches to borderless fullscreen on the current monitor.
    fn set_windowed_fullscreen(&mut self, console: &mut Console);

    /// Whether the window covers its monitor.
    fn is_fullscreen(&self) -> bool;

    /// Hides the window; refreshes are skipped until it is shown again.
    fn hide_window(&mut self);

    /// Whether the window is shown.
    fn is_visible(&self) -> bool;

    /// Allows or forbids resizing by the user.
    fn set_resizable(&mut self, resizable: bool);

    /// Whether the user may resize the window.
    fn is_resizable(&self) -> bool;

    /// Shows or hides the title bar and borders.
    fn set_decorated(&mut self, decorated: bool);

    /// Whether the title bar and borders are shown.
    fn is_decorated(&self) -> bool;

    /// Keeps the window above all others.
    fn set_floating(&mut self, floating: bool);

    /// Whether the window stays above all others.
    fn is_floating(&self) -> bool;

    /// Iconifies the window.
    fn minimize(&mut self);

    /// Whether the window is iconified.
    fn is_minimized(&self) -> bool;

    /// Maximizes the window.
    fn maximize(&mut self);

    /// Whether the window is maximized.
    fn is_maximized(&self) -> bool;

    /// Restores the window from a minimized or maximized state.
    fn restore(&mut self);

    /// Brings the window to the front and gives it input focus.
    fn focus(&mut self);

    /// Whether the window has input focus.
    fn is_focused(&self) -> bool;

    /// Asks the window manager to flag the window.
    fn request_attention(&mut self);

    /// Whole-window opacity in `0.0..=1.0`.
    fn set_opacity(&mut self, opacity: f32);

    /// Last opacity set, 1.0 by default.
    fn opacity(&self) -> f32;
}
