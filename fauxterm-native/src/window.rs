use std::{io, num::NonZeroU32, rc::Rc};

use fauxterm_core::{
    Action, Backend, Console, ConsoleId, Context, EventKind, EventSink, GlConsoleRenderer, GlState,
    GlslVersion, Key, Modifiers, MouseButton, Viewport, WindowControls,
};
use glutin::{
    config::{ConfigTemplateBuilder, GlConfig},
    context::{
        ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext,
        PossiblyCurrentContext, PossiblyCurrentGlContext, Version,
    },
    display::{GetGlDisplay, GlDisplay},
    surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface},
};
use glutin_winit::DisplayBuilder;
use raw_window_handle::HasWindowHandle;
use tracing::{debug, trace, warn};
use winit::{
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, ModifiersState, PhysicalKey},
    window::{Fullscreen, UserAttentionType, Window, WindowAttributes, WindowLevel},
};

use crate::{Error, WindowConfig, window_system::WindowSystem};

/// Size of a freshly created, still hidden window.
const INITIAL_WINDOW_PX: (u32, u32) = (640, 480);

/// Creates a console presented in an OpenGL 3.3 window.
///
/// The window starts hidden with a 0x0 tile grid. Size it with one of the
/// window controls, e.g. `set_windowed_tile_wh`, which also shows it.
///
/// # Errors
/// Returns an error if the window system, the window, its GL context or the
/// renderer cannot be created.
pub fn create_window_console(ctx: &mut Context, config: &WindowConfig) -> Result<ConsoleId, Error> {
    let system = WindowSystem::acquire()?;
    let window = GlWindow::new(&*system.event_loop(), config.window_title(), config.uses_vsync())?;

    let layers = config.layer_infos();
    let renderer = GlConsoleRenderer::new(&window.gl, layers.len(), GlslVersion::Gl330)?;

    let mut console = Console::new(layers.len(), (0, 0), config.mode(), false);
    for (i, info) in layers.iter().enumerate() {
        console.set_layer_font(i, info.font.clone());
        console.set_layer_divisor(i, info.divisor);
    }
    console.set_frame_limit(config.fps());

    system.register(window.window.id());
    let backend = WindowBackend {
        window,
        renderer: Some(renderer),
        gl_state: GlState::new(),
        viewport: Viewport::default(),
        tile_px: config.tile_px(),
        modifiers: Modifiers::empty(),
        cursor_px: (0.0, 0.0),
        console_tiles: (0, 0),
        mouse_buttons: [Action::Release; MouseButton::COUNT],
        keys: vec![Action::Release; usize::from(Key::LAST.0) + 1],
        visible: false,
        fullscreen: false,
        floating: false,
        opacity: 1.0,
        pending: Vec::new(),
        system,
    };

    let id = ctx.attach(console, Box::new(backend));
    debug!(
        console = id.get(),
        layers = layers.len(),
        tile_px = ?config.tile_px(),
        title = config.window_title(),
        "window console created"
    );
    Ok(id)
}

/// A window with a current OpenGL context and the `glow` bindings loaded
/// from it. Fields drop in declaration order: GL objects before the window.
struct GlWindow {
    gl: glow::Context,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
}

impl GlWindow {
    fn new(event_loop: &EventLoop<()>, title: &str, vsync: bool) -> Result<Self, Error> {
        let window_attrs = WindowAttributes::default()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(INITIAL_WINDOW_PX.0, INITIAL_WINDOW_PX.1))
            .with_visible(false);

        let config_template = ConfigTemplateBuilder::new().with_alpha_size(8);

        // Tiles are pixel art: prefer the config with the fewest samples.
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(window_attrs))
            .build(event_loop, config_template, |configs| {
                configs
                    .reduce(|best, config| {
                        if config.num_samples() < best.num_samples() { config } else { best }
                    })
                    .expect("glutin offers at least one matching config")
            })
            .map_err(Error::window_creation_failed)?;

        let window = window.ok_or_else(|| Error::window_creation_failed("no window returned"))?;
        let gl_display = gl_config.display();
        let raw_handle = window
            .window_handle()
            .map_err(Error::window_creation_failed)?
            .as_raw();

        let context_attrs = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_handle));

        let not_current_context = unsafe { gl_display.create_context(&gl_config, &context_attrs) }
            .map_err(Error::gl_context_failed)?;

        let inner = window.inner_size();
        let surface_attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_handle,
            non_zero(inner.width),
            non_zero(inner.height),
        );

        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attrs) }
            .map_err(Error::gl_surface_failed)?;

        let gl_context = not_current_context
            .make_current(&gl_surface)
            .map_err(Error::gl_context_failed)?;

        let interval = if vsync { SwapInterval::Wait(NonZeroU32::MIN) } else { SwapInterval::DontWait };
        if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
            warn!(error = %e, vsync, "swap interval not applied");
        }

        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|name| gl_display.get_proc_address(name))
        };

        Ok(Self { gl, gl_surface, gl_context, window })
    }

    fn physical_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn resize_surface(&self, size: PhysicalSize<u32>) {
        self.gl_surface
            .resize(&self.gl_context, non_zero(size.width), non_zero(size.height));
    }

    fn make_current(&self) -> Result<(), fauxterm_core::Error> {
        self.gl_context
            .make_current(&self.gl_surface)
            .map_err(backend_error)
    }

    fn swap_buffers(&self) -> Result<(), fauxterm_core::Error> {
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .map_err(backend_error)
    }
}

fn non_zero(v: u32) -> NonZeroU32 {
    NonZeroU32::new(v).unwrap_or(NonZeroU32::MIN)
}

fn backend_error(e: glutin::error::Error) -> fauxterm_core::Error {
    fauxterm_core::Error::Backend(io::Error::other(e.to_string()))
}

/// A console drawn with OpenGL into its own window.
///
/// The console's tile grid is mapped to the top-left of the framebuffer at
/// `tile_px` pixels per base tile; the user viewport transform pans and
/// zooms on top of that.
struct WindowBackend {
    window: GlWindow,
    renderer: Option<GlConsoleRenderer>,
    gl_state: GlState,
    viewport: Viewport,
    tile_px: (u32, u32),
    modifiers: Modifiers,
    cursor_px: (f64, f64),
    // last tile size seen on the console, for cursor mapping
    console_tiles: (usize, usize),
    mouse_buttons: [Action; MouseButton::COUNT],
    keys: Vec<Action>,
    visible: bool,
    fullscreen: bool,
    floating: bool,
    opacity: f32,
    pending: Vec<WindowEvent>,
    // dropped after `window`: the event loop must outlive it
    system: Rc<WindowSystem>,
}

impl WindowBackend {
    fn grid_px(&self, tile_wh: (usize, usize)) -> (u32, u32) {
        let px = |tiles: usize, tile: u32| u32::try_from(tiles).unwrap_or(u32::MAX).saturating_mul(tile);
        (px(tile_wh.0, self.tile_px.0), px(tile_wh.1, self.tile_px.1))
    }

    fn update_base(&mut self, tile_wh: (usize, usize), framebuffer_px: (u32, u32)) {
        self.console_tiles = tile_wh;
        let (w, h) = self.grid_px(tile_wh);
        self.viewport.update_base((f64::from(w), f64::from(h)), framebuffer_px);
    }

    fn show(&mut self) {
        self.window.window.set_visible(true);
        self.visible = true;
    }

    /// Requests a new inner size; returns the size to lay out for, which is
    /// the granted size when the platform applies it immediately.
    fn request_size(&mut self, px: (u32, u32)) -> (u32, u32) {
        let requested = PhysicalSize::new(px.0.max(1), px.1.max(1));
        let granted = self.window.window.request_inner_size(requested).unwrap_or(requested);
        self.window.resize_surface(granted);
        (granted.width, granted.height)
    }

    fn on_window_event(&mut self, console: &mut Console, event: WindowEvent, events: &mut EventSink<'_>) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(kind) = self.on_key(&event) {
                    events.push(kind);
                }
            },
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = translate_modifiers(modifiers.state());
            },
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = translate_button(button) else { return };
                let action = translate_state(state);
                self.mouse_buttons[usize::from(button.0)] = action;
                events.push(EventKind::MouseButton { button, action, mods: self.modifiers });
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_px = (position.x, position.y);
                let tile_xy = (
                    position.x / f64::from(self.tile_px.0.max(1)),
                    position.y / f64::from(self.tile_px.1.max(1)),
                );
                events.push(EventKind::CursorPos { viewport_xy: self.cursor_px, tile_xy });
            },
            WindowEvent::MouseWheel { delta, .. } => {
                let xy = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (f64::from(x), f64::from(y)),
                    MouseScrollDelta::PixelDelta(pos) => (
                        pos.x / f64::from(self.tile_px.0.max(1)),
                        pos.y / f64::from(self.tile_px.1.max(1)),
                    ),
                };
                events.push(EventKind::Scroll { xy });
            },
            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.window.resize_surface(size);
                    self.update_base(console.tile_wh(), (size.width, size.height));
                }
                debug!(width = size.width, height = size.height, "window resized");
                events.push(EventKind::Resize { tile_wh: console.tile_wh() });
            },
            WindowEvent::CloseRequested => events.push(EventKind::Close),
            _ => {},
        }
    }

    fn on_key(&mut self, event: &KeyEvent) -> Option<EventKind> {
        let PhysicalKey::Code(code) = event.physical_key else { return None };
        let key = translate_key(code)?;
        let action = translate_state(event.state);
        if let Some(state) = self.keys.get_mut(usize::from(key.0)) {
            *state = action;
        }
        Some(EventKind::Key { key, scancode: 0, action, mods: self.modifiers })
    }
}

impl Backend for WindowBackend {
    fn refresh(&mut self, console: &mut Console) -> Result<(), fauxterm_core::Error> {
        let (cols, rows) = console.tile_wh();
        self.console_tiles = (cols, rows);
        if !self.visible || cols == 0 || rows == 0 {
            return Ok(());
        }
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(());
        };

        self.window.make_current()?;
        let framebuffer_px = self.window.physical_size();
        let stats = renderer.render(
            &self.window.gl,
            &mut self.gl_state,
            console,
            framebuffer_px,
            &self.viewport.combined(),
        )?;

        if let Some(limiter) = console.frame_limiter_mut() {
            limiter.throttle();
        }
        self.window.swap_buffers()?;

        trace!(
            layers = stats.layers_drawn,
            vertices = stats.vertices,
            missing = stats.missing_glyphs,
            "window refreshed"
        );
        Ok(())
    }

    fn poll_events(&mut self, console: &mut Console, events: &mut EventSink<'_>) {
        let mut pending = std::mem::take(&mut self.pending);
        self.system.drain(self.window.window.id(), &mut pending);
        for event in pending.drain(..) {
            self.on_window_event(console, event, events);
        }
        self.pending = pending;
    }

    fn destroy(&mut self, _console: &mut Console) {
        self.system.unregister(self.window.window.id());
        self.window.window.set_visible(false);
        self.visible = false;

        let Some(renderer) = self.renderer.take() else { return };
        match self.window.make_current() {
            Ok(()) => renderer.delete(&self.window.gl),
            Err(e) => warn!(error = %e, "GL context lost, renderer not released"),
        }
        debug!("window console destroyed");
    }

    fn transform_viewport(&mut self, translation: (f32, f32), scale: (f32, f32)) {
        self.viewport.transform(translation, scale);
    }

    fn reset_viewport(&mut self) {
        self.viewport.reset();
    }

    fn cursor_viewport_pos(&self) -> (f64, f64) {
        self.cursor_px
    }

    fn cursor_tile_pos(&self) -> (f64, f64) {
        self.viewport
            .cursor_tile_pos(self.cursor_px, self.tile_px, self.console_tiles)
    }

    fn mouse_button(&self, button: MouseButton) -> Action {
        self.mouse_buttons
            .get(usize::from(button.0))
            .copied()
            .unwrap_or_default()
    }

    fn key_state(&self, key: Key) -> Action {
        self.keys.get(usize::from(key.0)).copied().unwrap_or_default()
    }

    fn window_controls(&mut self) -> Option<&mut dyn WindowControls> {
        Some(self)
    }
}

impl WindowControls for WindowBackend {
    fn window_pixel_wh(&self) -> (u32, u32) {
        self.window.physical_size()
    }

    fn set_window_pixel_wh(&mut self, wh: (u32, u32)) {
        self.request_size(wh);
        self.show();
    }

    fn viewport_tile_wh(&self) -> (usize, usize) {
        let (w, h) = self.window.physical_size();
        tiles_fitting((w, h), self.tile_px)
    }

    fn fit_window_to_viewport(&mut self, console: &mut Console) {
        let tile_wh = console.tile_wh();
        let framebuffer_px = self.request_size(self.grid_px(tile_wh));
        self.show();
        self.update_base(tile_wh, framebuffer_px);
    }

    fn fit_viewport_to_window(&mut self, console: &mut Console) {
        let framebuffer_px = self.window.physical_size();
        let (cols, rows) = tiles_fitting(framebuffer_px, self.tile_px);
        let tile_wh = (cols.max(1), rows.max(1));
        console.set_tile_wh(tile_wh);
        self.update_base(tile_wh, framebuffer_px);
    }

    fn set_windowed_tile_wh(&mut self, console: &mut Console, tile_wh: (usize, usize)) {
        if self.fullscreen {
            self.window.window.set_fullscreen(None);
            self.fullscreen = false;
        }
        console.set_tile_wh(tile_wh);
        self.fit_window_to_viewport(console);
        console.clear();
        debug!(cols = tile_wh.0, rows = tile_wh.1, "windowed");
    }

    fn set_windowed_fullscreen(&mut self, console: &mut Console) {
        let window = &self.window.window;
        let Some(monitor) = window.current_monitor().or_else(|| window.primary_monitor()) else {
            warn!("no monitor available for fullscreen");
            return;
        };

        let size = monitor.size();
        window.set_fullscreen(Some(Fullscreen::Borderless(Some(monitor))));
        self.fullscreen = true;

        let (cols, rows) = tiles_fitting((size.width, size.height), self.tile_px);
        let tile_wh = (cols.max(1), rows.max(1));
        console.set_tile_wh(tile_wh);
        self.window.resize_surface(size);
        self.show();
        self.update_base(tile_wh, (size.width, size.height));
        console.clear();
        debug!(cols = tile_wh.0, rows = tile_wh.1, "fullscreen");
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn hide_window(&mut self) {
        self.window.window.set_visible(false);
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_resizable(&mut self, resizable: bool) {
        self.window.window.set_resizable(resizable);
    }

    fn is_resizable(&self) -> bool {
        self.window.window.is_resizable()
    }

    fn set_decorated(&mut self, decorated: bool) {
        self.window.window.set_decorations(decorated);
    }

    fn is_decorated(&self) -> bool {
        self.window.window.is_decorated()
    }

    fn set_floating(&mut self, floating: bool) {
        let level = if floating { WindowLevel::AlwaysOnTop } else { WindowLevel::Normal };
        self.window.window.set_window_level(level);
        self.floating = floating;
    }

    fn is_floating(&self) -> bool {
        self.floating
    }

    fn minimize(&mut self) {
        self.window.window.set_minimized(true);
    }

    fn is_minimized(&self) -> bool {
        self.window.window.is_minimized().unwrap_or(false)
    }

    fn maximize(&mut self) {
        self.window.window.set_maximized(true);
    }

    fn is_maximized(&self) -> bool {
        self.window.window.is_maximized()
    }

    fn restore(&mut self) {
        self.window.window.set_minimized(false);
        self.window.window.set_maximized(false);
    }

    fn focus(&mut self) {
        self.window.window.focus_window();
    }

    fn is_focused(&self) -> bool {
        self.window.window.has_focus()
    }

    fn request_attention(&mut self) {
        self.window
            .window
            .request_user_attention(Some(UserAttentionType::Informational));
    }

    fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }
}

fn tiles_fitting(px: (u32, u32), tile_px: (u32, u32)) -> (usize, usize) {
    let fit = |px: u32, tile: u32| if tile == 0 { 0 } else { (px / tile) as usize };
    (fit(px.0, tile_px.0), fit(px.1, tile_px.1))
}

fn translate_state(state: ElementState) -> Action {
    match state {
        ElementState::Pressed => Action::Press,
        ElementState::Released => Action::Release,
    }
}

fn translate_modifiers(state: ModifiersState) -> Modifiers {
    let mut mods = Modifiers::empty();
    mods.set(Modifiers::SHIFT, state.shift_key());
    mods.set(Modifiers::CONTROL, state.control_key());
    mods.set(Modifiers::ALT, state.alt_key());
    mods.set(Modifiers::SUPER, state.super_key());
    mods
}

fn translate_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    use winit::event::MouseButton as Button;

    let index = match button {
        Button::Left => MouseButton::LEFT.0,
        Button::Right => MouseButton::RIGHT.0,
        Button::Middle => MouseButton::MIDDLE.0,
        Button::Back => 3,
        Button::Forward => 4,
        Button::Other(n) => u8::try_from(n).ok().filter(|&n| n <= MouseButton::LAST.0)?,
    };
    Some(MouseButton(index))
}

#[rustfmt::skip]
fn translate_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Space        => Key::SPACE,
        KeyCode::Quote        => Key::APOSTROPHE,
        KeyCode::Comma        => Key::COMMA,
        KeyCode::Minus        => Key::MINUS,
        KeyCode::Period       => Key::PERIOD,
        KeyCode::Slash        => Key::SLASH,
        KeyCode::Semicolon    => Key::SEMICOLON,
        KeyCode::Equal        => Key::EQUAL,
        KeyCode::BracketLeft  => Key::LEFT_BRACKET,
        KeyCode::Backslash    => Key::BACKSLASH,
        KeyCode::BracketRight => Key::RIGHT_BRACKET,
        KeyCode::Backquote    => Key::GRAVE_ACCENT,
        KeyCode::IntlBackslash => Key::WORLD_1,
        KeyCode::IntlRo       => Key::WORLD_2,

        KeyCode::Digit0 => Key::NUM_0,
        KeyCode::Digit1 => Key::NUM_1,
        KeyCode::Digit2 => Key::NUM_2,
        KeyCode::Digit3 => Key::NUM_3,
        KeyCode::Digit4 => Key::NUM_4,
        KeyCode::Digit5 => Key::NUM_5,
        KeyCode::Digit6 => Key::NUM_6,
        KeyCode::Digit7 => Key::NUM_7,
        KeyCode::Digit8 => Key::NUM_8,
        KeyCode::Digit9 => Key::NUM_9,

        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,

        KeyCode::Escape      => Key::ESCAPE,
        KeyCode::Enter       => Key::ENTER,
        KeyCode::Tab         => Key::TAB,
        KeyCode::Backspace   => Key::BACKSPACE,
        KeyCode::Insert      => Key::INSERT,
        KeyCode::Delete      => Key::DELETE,
        KeyCode::ArrowRight  => Key::RIGHT,
        KeyCode::ArrowLeft   => Key::LEFT,
        KeyCode::ArrowDown   => Key::DOWN,
        KeyCode::ArrowUp     => Key::UP,
        KeyCode::PageUp      => Key::PAGE_UP,
        KeyCode::PageDown    => Key::PAGE_DOWN,
        KeyCode::Home        => Key::HOME,
        KeyCode::End         => Key::END,
        KeyCode::CapsLock    => Key::CAPS_LOCK,
        KeyCode::ScrollLock  => Key::SCROLL_LOCK,
        KeyCode::NumLock     => Key::NUM_LOCK,
        KeyCode::PrintScreen => Key::PRINT_SCREEN,
        KeyCode::Pause       => Key::PAUSE,

        KeyCode::F1  => Key::F1,
        KeyCode::F2  => return Key::function(2),
        KeyCode::F3  => return Key::function(3),
        KeyCode::F4  => return Key::function(4),
        KeyCode::F5  => return Key::function(5),
        KeyCode::F6  => return Key::function(6),
        KeyCode::F7  => return Key::function(7),
        KeyCode::F8  => return Key::function(8),
        KeyCode::F9  => return Key::function(9),
        KeyCode::F10 => return Key::function(10),
        KeyCode::F11 => return Key::function(11),
        KeyCode::F12 => return Key::function(12),
        KeyCode::F13 => return Key::function(13),
        KeyCode::F14 => return Key::function(14),
        KeyCode::F15 => return Key::function(15),
        KeyCode::F16 => return Key::function(16),
        KeyCode::F17 => return Key::function(17),
        KeyCode::F18 => return Key::function(18),
        KeyCode::F19 => return Key::function(19),
        KeyCode::F20 => return Key::function(20),
        KeyCode::F21 => return Key::function(21),
        KeyCode::F22 => return Key::function(22),
        KeyCode::F23 => return Key::function(23),
        KeyCode::F24 => return Key::function(24),
        KeyCode::F25 => Key::F25,

        KeyCode::Numpad0 => Key::KP_0,
        KeyCode::Numpad1 => return Key::keypad(1),
        KeyCode::Numpad2 => return Key::keypad(2),
        KeyCode::Numpad3 => return Key::keypad(3),
        KeyCode::Numpad4 => return Key::keypad(4),
        KeyCode::Numpad5 => return Key::keypad(5),
        KeyCode::Numpad6 => return Key::keypad(6),
        KeyCode::Numpad7 => return Key::keypad(7),
        KeyCode::Numpad8 => return Key::keypad(8),
        KeyCode::Numpad9 => Key::KP_9,
        KeyCode::NumpadDecimal  => Key::KP_DECIMAL,
        KeyCode::NumpadDivide   => Key::KP_DIVIDE,
        KeyCode::NumpadMultiply => Key::KP_MULTIPLY,
        KeyCode::NumpadSubtract => Key::KP_SUBTRACT,
        KeyCode::NumpadAdd      => Key::KP_ADD,
        KeyCode::NumpadEnter    => Key::KP_ENTER,
        KeyCode::NumpadEqual    => Key::KP_EQUAL,

        KeyCode::ShiftLeft    => Key::LEFT_SHIFT,
        KeyCode::ControlLeft  => Key::LEFT_CONTROL,
        KeyCode::AltLeft      => Key::LEFT_ALT,
        KeyCode::SuperLeft    => Key::LEFT_SUPER,
        KeyCode::ShiftRight   => Key::RIGHT_SHIFT,
        KeyCode::ControlRight => Key::RIGHT_CONTROL,
        KeyCode::AltRight     => Key::RIGHT_ALT,
        KeyCode::SuperRight   => Key::RIGHT_SUPER,
        KeyCode::ContextMenu  => Key::MENU,

        _ => return None,
    };
    Some(key)
}
