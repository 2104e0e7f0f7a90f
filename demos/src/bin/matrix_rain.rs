//! Falling trails of digits, on the terminal, in a window, or both.
//!
//! ```sh
//! cargo run -p fauxterm-demos --bin matrix-rain
//! cargo run -p fauxterm-demos --bin matrix-rain -- --backend window \
//!     --font cp437_16x16.font --page cp437_16x16.png
//! ```
//!
//! ESC or closing the window quits.

use clap::Parser;
use color_eyre::Result;
use fauxterm_core::{Action, Color, ConsoleId, Context, EventKind, Key, Layer};
use fauxterm_demos::{bootstrap, cli::Cli, open_consoles};
use rand::{Rng, rngs::ThreadRng};

/// One in this many idle columns starts a trail each frame.
const SPAWN_CHANCE: u32 = 50;
const MIN_TRAIL: i32 = 5;
const MAX_TRAIL: i32 = 19;

#[derive(Debug, Clone, Copy, Default)]
struct Trail {
    alive: bool,
    head: i32,
    length: i32,
}

/// Trails of one console, one per column.
#[derive(Debug)]
struct Rain {
    console: ConsoleId,
    trails: Vec<Trail>,
}

impl Rain {
    fn new(console: ConsoleId, columns: usize) -> Self {
        Self { console, trails: vec![Trail::default(); columns] }
    }

    fn resize(&mut self, columns: usize) {
        self.trails.resize(columns, Trail::default());
    }

    fn step(&mut self, rows: i32, rng: &mut impl Rng) {
        for trail in &mut self.trails {
            if !trail.alive {
                if rng.random_ratio(1, SPAWN_CHANCE) {
                    *trail = Trail {
                        alive: true,
                        head: 0,
                        length: rng.random_range(MIN_TRAIL..=MAX_TRAIL),
                    };
                }
            } else {
                trail.head += 1;
                if trail.head - trail.length >= rows {
                    trail.alive = false;
                }
            }
        }
    }

    fn draw(&self, layer: &mut Layer, rows: i32, rng: &mut impl Rng) {
        for (x, trail) in self.trails.iter().enumerate().filter(|(_, t)| t.alive) {
            let Ok(x) = i32::try_from(x) else { break };
            for j in 0..trail.length {
                let y = trail.head - j;
                if !(0..rows).contains(&y) {
                    continue;
                }

                let digit = u32::from(b'0') + rng.random_range(0..10);
                let intensity = 1.0 - j as f32 / trail.length as f32;
                let fg = Color::from_rgba_f32(0.0, intensity, 0.0, 1.0);
                layer.push_codepoint(digit, (x, y), fg, Color::BLACK);
            }
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = bootstrap(&cli)?;

    let mut ctx = Context::new();
    let consoles = open_consoles(&mut ctx, &cli, "fauxterm matrix rain", (80, 50))?;

    let mut rains: Vec<Rain> = consoles
        .iter()
        .filter_map(|id| Some(Rain::new(id, ctx.console(id)?.tile_wh().0)))
        .collect();
    let mut rng = rand::rng();

    while ctx.has_console() {
        if !handle_events(&mut ctx, &mut rains) {
            break;
        }
        frame(&mut ctx, &mut rains, &mut rng)?;
    }

    tracing::info!("matrix rain finished");
    Ok(())
}

/// Returns `false` once the user asked to quit.
fn handle_events(ctx: &mut Context, rains: &mut Vec<Rain>) -> bool {
    ctx.poll_events();
    while let Some(event) = ctx.next_event() {
        match event.kind {
            EventKind::Close => {
                ctx.destroy_console(event.console);
                rains.retain(|rain| rain.console != event.console);
            },
            EventKind::Key { key: Key::ESCAPE, action: Action::Press, .. } => return false,
            EventKind::Resize { .. } => {
                let Some(mut console) = ctx.console_mut(event.console) else { continue };
                if console.has_window() {
                    console.fit_viewport_to_window();
                }
                let columns = console.tile_wh().0;
                if let Some(rain) = rains.iter_mut().find(|rain| rain.console == event.console) {
                    rain.resize(columns);
                }
            },
            _ => {},
        }
    }
    true
}

fn frame(ctx: &mut Context, rains: &mut [Rain], rng: &mut ThreadRng) -> Result<()> {
    for rain in rains {
        let Some(mut console) = ctx.console_mut(rain.console) else { continue };
        let rows = i32::try_from(console.tile_wh().1).unwrap_or(i32::MAX);

        console.clear();
        console.fill(Color::BLACK);
        rain.step(rows, rng);
        if let Some(layer) = console.layer_mut(0) {
            rain.draw(layer, rows, rng);
        }
        console.refresh()?;
    }
    Ok(())
}
