use std::{
    io::{self, BufWriter, IsTerminal, Stdout, Write},
    time::Duration,
};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event as TermEvent, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseButton as TermButton, MouseEvent, MouseEventKind,
    },
    queue,
    style::{Color as TermColor, Colors, Print, ResetColor, SetColors},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use fauxterm_core::{
    Action, Backend, Cell, CellWriter, ColorPairs, ColorResolver, Compositor, Console, ConsoleId,
    Context, EventKind, EventSink, Key, Modifiers, MouseButton, TerminalCaps,
    negotiate_color_modes,
};
use tracing::{debug, trace, warn};

use crate::{Error, TerminalConfig};

const OUTPUT_BUFFER_BYTES: usize = 64 * 1024;

/// Creates a console drawn into the controlling terminal.
///
/// The terminal is switched to raw mode and the alternate screen, with the
/// cursor hidden and, if configured, mouse capture on. It is restored when
/// the console is destroyed.
///
/// # Errors
/// Returns [`Error::NoTerminal`] unless stdin and stdout are both terminals,
/// or [`Error::Io`] if the terminal cannot be configured.
pub fn create_terminal_console(ctx: &mut Context, config: &TerminalConfig) -> Result<ConsoleId, Error> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(Error::NoTerminal);
    }

    let (req_fg, req_bg) = config.requested_modes();
    let caps = TerminalCaps::detect();
    let (fg_mode, bg_mode) = negotiate_color_modes(req_fg, req_bg, caps);

    let mouse_capture = config.captures_mouse();
    let mut out = BufWriter::with_capacity(OUTPUT_BUFFER_BYTES, io::stdout());
    enter(&mut out, mouse_capture)?;

    let setup = terminal::size().map_err(Error::from).and_then(|(cols, rows)| {
        let tile_wh = (usize::from(cols), usize::from(rows));
        Ok((tile_wh, Compositor::new(tile_wh)?))
    });
    let (tile_wh, compositor) = match setup {
        Ok(setup) => setup,
        Err(e) => {
            let _ = leave(&mut out, mouse_capture);
            return Err(e);
        },
    };

    let mut console = Console::new(config.layers(), tile_wh, fg_mode, true)
        .with_color_modes(fg_mode, bg_mode);
    console.set_frame_limit(config.fps());

    let backend = TerminalBackend {
        out,
        compositor,
        resolver: ColorResolver::new(fg_mode, bg_mode),
        pairs: ColorPairs::new(),
        active_pair: None,
        mouse_capture,
        mouse_buttons: [Action::Release; MouseButton::COUNT],
        cursor_tile: (0, 0),
        restored: false,
    };

    let id = ctx.attach(console, Box::new(backend));
    debug!(
        console = id.get(),
        cols = tile_wh.0,
        rows = tile_wh.1,
        ?fg_mode,
        ?bg_mode,
        ?caps,
        "terminal console created"
    );
    Ok(id)
}

/// Puts the terminal back into cooked mode on the main screen.
///
/// Safe to call more than once; meant for panic hooks of applications
/// that own a terminal console.
///
/// # Errors
/// Returns an error if the terminal cannot be written to.
pub fn restore_terminal() -> io::Result<()> {
    leave(&mut io::stdout(), true)
}

fn enter(out: &mut impl Write, mouse_capture: bool) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let result = (|| {
        queue!(out, EnterAlternateScreen, Hide, ResetColor, Clear(ClearType::All))?;
        if mouse_capture {
            queue!(out, EnableMouseCapture)?;
        }
        out.flush()
    })();

    if result.is_err() {
        let _ = terminal::disable_raw_mode();
    }
    result
}

fn leave(out: &mut impl Write, mouse_capture: bool) -> io::Result<()> {
    if mouse_capture {
        queue!(out, DisableMouseCapture)?;
    }
    queue!(out, ResetColor, Show, LeaveAlternateScreen)?;
    out.flush()?;
    terminal::disable_raw_mode()
}

/// A console rendered as character cells in the controlling terminal.
///
/// Every refresh composites the layers into a cell grid and writes only the
/// cells that differ from the previous frame.
struct TerminalBackend {
    out: BufWriter<Stdout>,
    compositor: Compositor,
    resolver: ColorResolver,
    pairs: ColorPairs,
    active_pair: Option<u32>,
    mouse_capture: bool,
    mouse_buttons: [Action; MouseButton::COUNT],
    cursor_tile: (u16, u16),
    restored: bool,
}

impl TerminalBackend {
    fn on_resize(&mut self, console: &mut Console, cols: u16, rows: u16, events: &mut EventSink<'_>) {
        let tile_wh = (usize::from(cols), usize::from(rows));
        if let Err(e) = self.compositor.resize(tile_wh) {
            warn!(cols, rows, error = %e, "terminal resize refused, keeping previous grid");
            return;
        }

        console.set_tile_wh(tile_wh);
        self.compositor.invalidate();
        self.active_pair = None;
        if let Err(e) = queue!(self.out, ResetColor, Clear(ClearType::All)) {
            warn!(error = %e, "failed to clear terminal after resize");
        }

        debug!(cols, rows, "terminal resized");
        events.push(EventKind::Resize { tile_wh });
    }

    fn on_mouse(&mut self, mouse: MouseEvent, events: &mut EventSink<'_>) {
        self.cursor_tile = (mouse.column, mouse.row);
        let mods = translate_modifiers(mouse.modifiers);
        let tile_xy = (f64::from(mouse.column), f64::from(mouse.row));
        let cursor = EventKind::CursorPos { viewport_xy: (0.0, 0.0), tile_xy };

        match mouse.kind {
            MouseEventKind::Down(button) | MouseEventKind::Up(button) => {
                let button = translate_button(button);
                let action = match mouse.kind {
                    MouseEventKind::Down(_) => Action::Press,
                    _ => Action::Release,
                };
                self.mouse_buttons[usize::from(button.0)] = action;
                events.push(EventKind::MouseButton { button, action, mods });
                events.push(cursor);
            },
            MouseEventKind::Drag(_) | MouseEventKind::Moved => events.push(cursor),
            MouseEventKind::ScrollUp => events.push(EventKind::Scroll { xy: (0.0, 1.0) }),
            MouseEventKind::ScrollDown => events.push(EventKind::Scroll { xy: (0.0, -1.0) }),
            MouseEventKind::ScrollLeft => events.push(EventKind::Scroll { xy: (-1.0, 0.0) }),
            MouseEventKind::ScrollRight => events.push(EventKind::Scroll { xy: (1.0, 0.0) }),
        }
    }
}

impl Backend for TerminalBackend {
    fn refresh(&mut self, console: &mut Console) -> Result<(), fauxterm_core::Error> {
        self.compositor.resolve(console);

        let mut writer = AnsiCellWriter {
            out: &mut self.out,
            resolver: self.resolver,
            pairs: &mut self.pairs,
            active_pair: &mut self.active_pair,
        };
        let stats = self.compositor.flush(&mut writer)?;

        if let Some(limiter) = console.frame_limiter_mut() {
            limiter.throttle();
        }
        self.out.flush()?;

        trace!(
            written = stats.cells_written,
            skipped = stats.cells_skipped,
            pairs = self.pairs.len(),
            "terminal refreshed"
        );
        Ok(())
    }

    fn poll_events(&mut self, console: &mut Console, events: &mut EventSink<'_>) {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {},
                Ok(false) => break,
                Err(e) => {
                    warn!(error = %e, "terminal input poll failed");
                    break;
                },
            }

            let event = match event::read() {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "terminal input read failed");
                    break;
                },
            };

            match event {
                TermEvent::Key(key) => {
                    if let Some(kind) = translate_key_event(key) {
                        events.push(kind);
                    }
                },
                TermEvent::Mouse(mouse) => self.on_mouse(mouse, events),
                TermEvent::Resize(cols, rows) => self.on_resize(console, cols, rows, events),
                TermEvent::FocusGained | TermEvent::FocusLost | TermEvent::Paste(_) => {},
            }
        }
    }

    fn destroy(&mut self, _console: &mut Console) {
        if self.restored {
            return;
        }
        self.restored = true;

        match leave(&mut self.out, self.mouse_capture) {
            Ok(()) => debug!("terminal restored"),
            Err(e) => warn!(error = %e, "failed to restore terminal"),
        }
    }

    fn cursor_tile_pos(&self) -> (f64, f64) {
        (f64::from(self.cursor_tile.0), f64::from(self.cursor_tile.1))
    }

    fn mouse_button(&self, button: MouseButton) -> Action {
        self.mouse_buttons
            .get(usize::from(button.0))
            .copied()
            .unwrap_or_default()
    }
}

/// Writes composited cells as cursor moves, SGR colors and characters.
///
/// Colors are emitted only when the pair differs from the one last written,
/// and not at all when neither side has colors.
struct AnsiCellWriter<'a, W: Write> {
    out: &'a mut W,
    resolver: ColorResolver,
    pairs: &'a mut ColorPairs,
    active_pair: &'a mut Option<u32>,
}

impl<W: Write> CellWriter for AnsiCellWriter<'_, W> {
    fn write_cell(&mut self, x: usize, y: usize, cell: &Cell) -> io::Result<()> {
        let col = u16::try_from(x).unwrap_or(u16::MAX);
        let row = u16::try_from(y).unwrap_or(u16::MAX);
        queue!(self.out, MoveTo(col, row))?;

        if self.resolver.has_colors() {
            let colors = self.resolver.resolve(cell);
            if *self.active_pair != Some(colors.pair) {
                if self.pairs.register(&colors) {
                    trace!(pair = colors.pair, fg = colors.fg_index, bg = colors.bg_index, "color pair registered");
                }
                if colors.is_default() {
                    queue!(self.out, ResetColor)?;
                } else {
                    let pair = Colors::new(
                        TermColor::AnsiValue(colors.fg_index),
                        TermColor::AnsiValue(colors.bg_index),
                    );
                    queue!(self.out, SetColors(pair))?;
                }
                *self.active_pair = Some(colors.pair);
            }
        }

        queue!(self.out, Print(printable(cell.codepoint)))
    }
}

fn printable(codepoint: u32) -> char {
    char::from_u32(codepoint)
        .filter(|c| !c.is_control())
        .unwrap_or(' ')
}

fn translate_key_event(event: KeyEvent) -> Option<EventKind> {
    let key = translate_key(event.code)?;
    let action = match event.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => Action::Press,
        KeyEventKind::Release => Action::Release,
    };
    Some(EventKind::Key {
        key,
        scancode: 0,
        action,
        mods: translate_modifiers(event.modifiers),
    })
}

fn translate_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Up => Key::UP,
        KeyCode::Down => Key::DOWN,
        KeyCode::Left => Key::LEFT,
        KeyCode::Right => Key::RIGHT,
        KeyCode::Enter => Key::ENTER,
        KeyCode::Esc => Key::ESCAPE,
        KeyCode::Tab | KeyCode::BackTab => Key::TAB,
        KeyCode::Backspace => Key::BACKSPACE,
        KeyCode::Insert => Key::INSERT,
        KeyCode::Delete => Key::DELETE,
        KeyCode::Home => Key::HOME,
        KeyCode::End => Key::END,
        KeyCode::PageUp => Key::PAGE_UP,
        KeyCode::PageDown => Key::PAGE_DOWN,
        KeyCode::F(n) => return Key::function(n),
        KeyCode::Char(c) => return Key::from_ascii(c),
        _ => return None,
    };
    Some(key)
}

fn translate_modifiers(modifiers: KeyModifiers) -> Modifiers {
    let mut mods = Modifiers::empty();
    mods.set(Modifiers::SHIFT, modifiers.contains(KeyModifiers::SHIFT));
    mods.set(Modifiers::CONTROL, modifiers.contains(KeyModifiers::CONTROL));
    mods.set(Modifiers::ALT, modifiers.contains(KeyModifiers::ALT));
    mods.set(Modifiers::SUPER, modifiers.contains(KeyModifiers::SUPER));
    mods
}

fn translate_button(button: TermButton) -> MouseButton {
    match button {
        TermButton::Left => MouseButton::LEFT,
        TermButton::Right => MouseButton::RIGHT,
        TermButton::Middle => MouseButton::MIDDLE,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;
    use fauxterm_data::{Color, ColorMode, Rgba};

    use super::*;

    fn key_event(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn writer_output(mode: ColorMode, cells: &[Cell]) -> String {
        let mut out = Vec::new();
        let mut pairs = ColorPairs::new();
        let mut active_pair = None;
        let mut writer = AnsiCellWriter {
            out: &mut out,
            resolver: ColorResolver::new(mode, mode),
            pairs: &mut pairs,
            active_pair: &mut active_pair,
        };
        for (x, cell) in cells.iter().enumerate() {
            writer.write_cell(x, 0, cell).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    fn cell(ch: char, fg: Color, bg: Color) -> Cell {
        Cell { codepoint: ch as u32, fg, bg }
    }

    #[test]
    fn test_named_keys() {
        let table = [
            (KeyCode::Up, Key::UP),
            (KeyCode::Down, Key::DOWN),
            (KeyCode::Left, Key::LEFT),
            (KeyCode::Right, Key::RIGHT),
            (KeyCode::Enter, Key::ENTER),
            (KeyCode::Esc, Key::ESCAPE),
            (KeyCode::Tab, Key::TAB),
            (KeyCode::Backspace, Key::BACKSPACE),
            (KeyCode::Insert, Key::INSERT),
            (KeyCode::Delete, Key::DELETE),
            (KeyCode::Home, Key::HOME),
            (KeyCode::End, Key::END),
            (KeyCode::PageUp, Key::PAGE_UP),
            (KeyCode::PageDown, Key::PAGE_DOWN),
            (KeyCode::F(1), Key::F1),
            (KeyCode::F(25), Key::F25),
        ];
        for (code, expected) in table {
            assert_eq!(translate_key(code), Some(expected), "{code:?}");
        }
    }

    #[test]
    fn test_printable_keys_are_upper_cased() {
        assert_eq!(translate_key(KeyCode::Char('a')), Some(Key(u16::from(b'A'))));
        assert_eq!(translate_key(KeyCode::Char('Z')), Some(Key(u16::from(b'Z'))));
        assert_eq!(translate_key(KeyCode::Char(' ')), Some(Key(32)));
        assert_eq!(translate_key(KeyCode::Char('~')), Some(Key(126)));
        assert_eq!(translate_key(KeyCode::Char('é')), None);
        assert_eq!(translate_key(KeyCode::F(26)), None);
        assert_eq!(translate_key(KeyCode::Null), None);
    }

    #[test]
    fn test_repeat_is_press() {
        let kinds = [
            (KeyEventKind::Press, Action::Press),
            (KeyEventKind::Repeat, Action::Press),
            (KeyEventKind::Release, Action::Release),
        ];
        for (kind, expected) in kinds {
            let event = translate_key_event(key_event(KeyCode::Esc, kind));
            let Some(EventKind::Key { key, action, scancode, .. }) = event else {
                panic!("expected a key event");
            };
            assert_eq!(key, Key::ESCAPE);
            assert_eq!(action, expected);
            assert_eq!(scancode, 0);
        }
    }

    #[test]
    fn test_modifiers_are_translated() {
        let mods = translate_modifiers(KeyModifiers::SHIFT | KeyModifiers::ALT);
        assert_eq!(mods, Modifiers::SHIFT | Modifiers::ALT);
        assert_eq!(translate_modifiers(KeyModifiers::NONE), Modifiers::empty());
    }

    #[test]
    fn test_default_pair_resets_colors() {
        let out = writer_output(ColorMode::Ansi8, &[cell('x', Color::WHITE, Color::BLACK)]);
        assert!(out.contains("\x1b[0m"), "{out:?}");
        assert!(out.ends_with('x'));
    }

    #[test]
    fn test_colors_emitted_only_on_pair_change() {
        let red = Color::new(1, 1, 196, Rgba::new(255, 0, 0, 255));
        let cells = [
            cell('a', red, Color::BLACK),
            cell('b', red, Color::BLACK),
            cell('c', Color::WHITE, Color::BLACK),
        ];
        let out = writer_output(ColorMode::Ansi8, &cells);

        assert_eq!(out.matches("38;5;1").count(), 1, "{out:?}");
        assert_eq!(out.matches("\x1b[0m").count(), 1, "{out:?}");
    }

    #[test]
    fn test_no_colors_writes_no_attributes() {
        let red = Color::new(1, 1, 196, Rgba::new(255, 0, 0, 255));
        let out = writer_output(ColorMode::NoColors, &[cell('a', red, Color::BLACK)]);
        assert!(!out.contains('m'), "{out:?}");
        assert!(out.ends_with('a'));
    }

    #[test]
    fn test_control_codepoints_print_as_space() {
        assert_eq!(printable(0x1b), ' ');
        assert_eq!(printable(0xD800), ' ');
        assert_eq!(printable(u32::from('@')), '@');
    }
}
