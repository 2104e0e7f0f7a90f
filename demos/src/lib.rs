//! Shared setup of the demo programs: command line, logging, panic hook and
//! console creation.

pub mod cli;
pub mod logging;

use std::{panic, rc::Rc};

use color_eyre::eyre::{Result, WrapErr, eyre};
use fauxterm_core::{Context, Font};
use fauxterm_native::{
    ConsoleId, LayerInfo, TerminalConfig, WindowConfig, create_terminal_console,
    create_window_console,
};
use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    cli::Cli,
    logging::{LoggingConfig, init_logging},
};

/// Consoles opened for the selected backends.
#[derive(Debug, Clone, Copy, Default)]
pub struct Consoles {
    /// Console in the controlling terminal
    pub terminal: Option<ConsoleId>,
    /// Console in an OpenGL window
    pub window: Option<ConsoleId>,
}

impl Consoles {
    /// Every opened console, terminal first.
    pub fn iter(&self) -> impl Iterator<Item = ConsoleId> {
        self.terminal.into_iter().chain(self.window)
    }

    /// Forgets a console after it has been destroyed.
    pub fn remove(&mut self, id: ConsoleId) {
        if self.terminal == Some(id) {
            self.terminal = None;
        }
        if self.window == Some(id) {
            self.window = None;
        }
    }
}

/// Installs error reporting, logging and, when a terminal console will be
/// opened, a panic hook that restores the terminal first.
///
/// # Errors
/// Returns an error if error reporting or logging cannot be set up.
pub fn bootstrap(cli: &Cli) -> Result<Option<WorkerGuard>> {
    color_eyre::install()?;

    let logging_config = if cli.backend.uses_terminal() {
        LoggingConfig::for_terminal_ui()
    } else {
        LoggingConfig::from_env()
    };
    let guard = init_logging(&logging_config).wrap_err("Failed to initialize logging")?;

    if cli.backend.uses_terminal() {
        install_terminal_panic_hook();
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), backend = ?cli.backend, "starting");
    Ok(guard)
}

/// Chains a panic hook that puts the terminal back into cooked mode before
/// the previous hook prints the report.
pub fn install_terminal_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = fauxterm_native::restore_terminal();
        previous(info);
    }));
}

/// Opens a console for each backend the command line selects.
///
/// A window console starts hidden; it is shown once sized to `window_tiles`.
///
/// # Errors
/// Returns an error if a console cannot be created, or if a window is
/// requested without a font.
pub fn open_consoles(
    ctx: &mut Context,
    cli: &Cli,
    title: &str,
    window_tiles: (usize, usize),
) -> Result<Consoles> {
    let mut consoles = Consoles::default();

    if cli.backend.uses_terminal() {
        let config = TerminalConfig::new()
            .color_mode(cli.color_mode.into())
            .frame_limit(cli.fps);
        let id = create_terminal_console(ctx, &config).wrap_err("Failed to open terminal console")?;
        consoles.terminal = Some(id);
    }

    if cli.backend.uses_window() {
        let font = load_font(cli)?;
        let config = WindowConfig::new(cli.tile_size)
            .title(title)
            .color_mode(cli.color_mode.into())
            .frame_limit(cli.fps)
            .layer(LayerInfo::new(font));
        let id = create_window_console(ctx, &config).wrap_err("Failed to open window console")?;

        if let Some(mut console) = ctx.console_mut(id) {
            console.set_windowed_tile_wh(window_tiles);
            console.set_resizable(true);
        }
        consoles.window = Some(id);
    }

    Ok(consoles)
}

/// Loads the font named on the command line, drawing `?` for codepoints it
/// lacks.
///
/// # Errors
/// Returns an error if no font was given or it fails to load.
pub fn load_font(cli: &Cli) -> Result<Rc<Font>> {
    let descriptor = cli
        .font
        .as_ref()
        .ok_or_else(|| eyre!("the window backend needs --font <DESCRIPTOR> and --page <PNG>"))?;

    let font = Font::load(descriptor, &cli.pages)
        .wrap_err_with(|| format!("Failed to load font {}", descriptor.display()))?
        .with_fallback(u32::from('?'));

    tracing::info!(font = font.name(), tile_wh = ?font.tile_wh(), "font loaded");
    Ok(Rc::new(font))
}
