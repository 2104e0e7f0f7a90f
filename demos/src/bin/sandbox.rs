//! A smiley to push around on every open console.
//!
//! Arrow keys move it. In the window, `F` toggles fullscreen, middle-drag
//! pans, the wheel zooms and `R` resets the view. ESC quits.

use clap::Parser;
use color_eyre::Result;
use fauxterm_core::{Action, Color, ConsoleId, Context, EventKind, Key, MouseButton, Rgba};
use fauxterm_demos::{Consoles, bootstrap, cli::Cli, open_consoles};

const SMILEY: u32 = 0x263A;
const WINDOW_TILES: (usize, usize) = (40, 20);
const ZOOM_STEP: f32 = 1.1;
const ZOOM_RANGE: (f32, f32) = (0.1, 10.0);

const YELLOW: Color = Color::new(3, 11, 226, Rgba::new(255, 255, 0, 255));
const DARK_BLUE: Color = Color::new(4, 4, 17, Rgba::new(0, 0, 64, 255));

/// Where the smiley is on one console.
#[derive(Debug, Clone, Copy)]
struct Smiley {
    console: ConsoleId,
    pos: (usize, usize),
}

impl Smiley {
    fn centered(console: ConsoleId, tile_wh: (usize, usize)) -> Self {
        Self { console, pos: (tile_wh.0 / 2, tile_wh.1 / 2) }
    }

    fn step(&mut self, key: Key, tile_wh: (usize, usize)) {
        let (x, y) = &mut self.pos;
        match key {
            Key::UP => *y = y.saturating_sub(1),
            Key::DOWN if *y + 1 < tile_wh.1 => *y += 1,
            Key::LEFT => *x = x.saturating_sub(1),
            Key::RIGHT if *x + 1 < tile_wh.0 => *x += 1,
            _ => {},
        }
    }

    fn clamp(&mut self, tile_wh: (usize, usize)) {
        self.pos.0 = self.pos.0.min(tile_wh.0.saturating_sub(1));
        self.pos.1 = self.pos.1.min(tile_wh.1.saturating_sub(1));
    }
}

/// Pan and zoom of the window console.
#[derive(Debug, Clone, Copy)]
struct View {
    zoom: f32,
    pan: (f32, f32),
    drag_from: Option<(f64, f64)>,
}

impl Default for View {
    fn default() -> Self {
        Self { zoom: 1.0, pan: (0.0, 0.0), drag_from: None }
    }
}

impl View {
    fn scroll(&mut self, dy: f64) {
        if dy > 0.0 {
            self.zoom *= ZOOM_STEP;
        } else if dy < 0.0 {
            self.zoom /= ZOOM_STEP;
        }
        self.zoom = self.zoom.clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
    }

    /// Pans by a cursor motion in pixels over a grid of `grid_px` pixels.
    fn drag_to(&mut self, cursor: (f64, f64), grid_px: (f64, f64)) {
        let Some(from) = self.drag_from.replace(cursor) else { return };
        if grid_px.0 <= 0.0 || grid_px.1 <= 0.0 {
            return;
        }
        self.pan.0 += ((cursor.0 - from.0) * 2.0 / grid_px.0) as f32;
        self.pan.1 -= ((cursor.1 - from.1) * 2.0 / grid_px.1) as f32;
    }
}

struct Sandbox {
    consoles: Consoles,
    smileys: Vec<Smiley>,
    view: View,
    tile_px: (u32, u32),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = bootstrap(&cli)?;

    let mut ctx = Context::new();
    let consoles = open_consoles(&mut ctx, &cli, "fauxterm sandbox - arrow keys to move", WINDOW_TILES)?;
    let smileys = consoles
        .iter()
        .filter_map(|id| Some(Smiley::centered(id, ctx.console(id)?.tile_wh())))
        .collect();

    let mut sandbox = Sandbox { consoles, smileys, view: View::default(), tile_px: cli.tile_size };

    while ctx.has_console() {
        if !sandbox.handle_events(&mut ctx) {
            break;
        }
        sandbox.draw(&mut ctx)?;
    }

    tracing::info!("sandbox finished");
    Ok(())
}

impl Sandbox {
    fn smiley_mut(&mut self, console: ConsoleId) -> Option<&mut Smiley> {
        self.smileys.iter_mut().find(|s| s.console == console)
    }

    fn is_window(&self, console: ConsoleId) -> bool {
        self.consoles.window == Some(console)
    }

    fn grid_px(&self, tile_wh: (usize, usize)) -> (f64, f64) {
        (
            tile_wh.0 as f64 * f64::from(self.tile_px.0),
            tile_wh.1 as f64 * f64::from(self.tile_px.1),
        )
    }

    /// Returns `false` once the user asked to quit.
    fn handle_events(&mut self, ctx: &mut Context) -> bool {
        ctx.poll_events();
        while let Some(event) = ctx.next_event() {
            let id = event.console;
            match event.kind {
                EventKind::Key { key: Key::ESCAPE, action: Action::Press, .. } => return false,
                EventKind::Key { key, action: Action::Press, .. } => self.on_key(ctx, id, key),
                EventKind::Close => {
                    ctx.destroy_console(id);
                    self.consoles.remove(id);
                    self.smileys.retain(|s| s.console != id);
                },
                EventKind::Resize { tile_wh } => {
                    if let Some(smiley) = self.smiley_mut(id) {
                        smiley.clamp(tile_wh);
                    }
                },
                EventKind::Scroll { xy } if self.is_window(id) => self.view.scroll(xy.1),
                EventKind::MouseButton { button: MouseButton::MIDDLE, action, .. }
                    if self.is_window(id) =>
                {
                    self.view.drag_from = match action {
                        Action::Press => ctx.console_mut(id).map(|c| c.cursor_viewport_pos()),
                        Action::Release => None,
                    };
                },
                EventKind::CursorPos { viewport_xy, .. } if self.view.drag_from.is_some() => {
                    if let Some(console) = ctx.console(id).filter(|_| self.is_window(id)) {
                        let grid_px = self.grid_px(console.tile_wh());
                        self.view.drag_to(viewport_xy, grid_px);
                    }
                },
                _ => {},
            }
        }
        true
    }

    fn on_key(&mut self, ctx: &mut Context, id: ConsoleId, key: Key) {
        let Some(mut console) = ctx.console_mut(id) else { return };

        match key {
            Key::F if console.has_window() => {
                if console.is_fullscreen() {
                    console.set_windowed_tile_wh(WINDOW_TILES);
                } else {
                    console.set_windowed_fullscreen();
                }
            },
            Key::R if console.has_window() => {
                self.view = View::default();
                console.reset_viewport();
                console.fit_viewport_to_window();
                if let Some(smiley) = self.smiley_mut(id) {
                    smiley.pos = (0, 0);
                }
                return;
            },
            _ => {},
        }

        let tile_wh = console.tile_wh();
        if let Some(smiley) = self.smiley_mut(id) {
            smiley.step(key, tile_wh);
            smiley.clamp(tile_wh);
        }
    }

    fn draw(&self, ctx: &mut Context) -> Result<()> {
        for smiley in &self.smileys {
            let Some(mut console) = ctx.console_mut(smiley.console) else { continue };

            if self.is_window(smiley.console) {
                console.transform_viewport(self.view.pan, (self.view.zoom, self.view.zoom));
            }
            let (cx, cy) = console.cursor_tile_pos();

            console.clear();
            console.fill(DARK_BLUE);
            if let Some(layer) = console.layer_mut(0) {
                let pos = (
                    i32::try_from(smiley.pos.0).unwrap_or(i32::MAX),
                    i32::try_from(smiley.pos.1).unwrap_or(i32::MAX),
                );
                layer.push_codepoint(SMILEY, pos, YELLOW, Color::BLACK);
                layer.push_text(format!("cursor {cx:.1},{cy:.1}"), (0, 0), 0, 1, Color::WHITE, DARK_BLUE);
            }
            console.refresh()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_is_clamped() {
        let mut view = View::default();
        for _ in 0..100 {
            view.scroll(1.0);
        }
        assert!((view.zoom - ZOOM_RANGE.1).abs() < f32::EPSILON);

        for _ in 0..200 {
            view.scroll(-1.0);
        }
        assert!((view.zoom - ZOOM_RANGE.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_drag_pans_in_ndc() {
        let mut view = View { drag_from: Some((0.0, 0.0)), ..View::default() };
        view.drag_to((64.0, 32.0), (640.0, 320.0));
        assert!((view.pan.0 - 0.2).abs() < 1e-6);
        assert!((view.pan.1 + 0.2).abs() < 1e-6);
    }
}
