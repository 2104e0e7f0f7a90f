//! Command line shared by the demo programs.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use fauxterm_data::ColorMode;

/// Shared command line of the demo programs.
#[derive(Parser, Debug)]
#[command(version, about = "fauxterm demo", long_about = None)]
pub struct Cli {
    /// Where to draw
    #[arg(short, long, value_enum, default_value_t = BackendChoice::Terminal)]
    pub backend: BackendChoice,

    /// Font descriptor for the window backend
    #[arg(long, value_name = "DESCRIPTOR", requires = "pages")]
    pub font: Option<PathBuf>,

    /// PNG page of the font, in page order; repeat for multi-page fonts
    #[arg(long = "page", value_name = "PNG", requires = "font")]
    pub pages: Vec<PathBuf>,

    /// Window tile size in pixels
    #[arg(long, value_name = "WxH", default_value = "16x16", value_parser = parse_tile_size)]
    pub tile_size: (u32, u32),

    /// Frame rate cap; 0 disables it
    #[arg(long, value_name = "N", default_value_t = 30.0)]
    pub fps: f64,

    /// Requested color mode
    #[arg(long, value_enum, default_value_t = ColorModeArg::Ansi256)]
    pub color_mode: ColorModeArg,
}

/// Backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendChoice {
    /// The controlling terminal
    Terminal,
    /// An OpenGL window
    Window,
    /// A terminal console and a window console side by side
    Both,
}

impl BackendChoice {
    /// Whether a terminal console is opened.
    #[must_use]
    pub fn uses_terminal(self) -> bool {
        matches!(self, Self::Terminal | Self::Both)
    }

    /// Whether a window console is opened.
    #[must_use]
    pub fn uses_window(self) -> bool {
        matches!(self, Self::Window | Self::Both)
    }
}

/// Color mode names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorModeArg {
    /// Monochrome
    None,
    /// 8 ANSI colors
    Ansi8,
    /// 16 ANSI colors
    Ansi16,
    /// xterm 256-color palette
    Ansi256,
    /// 24-bit color
    Truecolor,
}

impl From<ColorModeArg> for ColorMode {
    fn from(arg: ColorModeArg) -> Self {
        match arg {
            ColorModeArg::None => ColorMode::NoColors,
            ColorModeArg::Ansi8 => ColorMode::Ansi8,
            ColorModeArg::Ansi16 => ColorMode::Ansi16,
            ColorModeArg::Ansi256 => ColorMode::Ansi256,
            ColorModeArg::Truecolor => ColorMode::TrueColorAlpha,
        }
    }
}

fn parse_tile_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;

    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .ok()
            .filter(|&v| v > 0)
            .ok_or_else(|| format!("invalid tile dimension '{v}'"))
    };
    Ok((parse(w)?, parse(h)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_size_parsing() {
        assert_eq!(parse_tile_size("16x16"), Ok((16, 16)));
        assert_eq!(parse_tile_size("8X12"), Ok((8, 12)));
        assert!(parse_tile_size("16").is_err());
        assert!(parse_tile_size("0x16").is_err());
        assert!(parse_tile_size("ax16").is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["demo"]).unwrap();
        assert_eq!(cli.backend, BackendChoice::Terminal);
        assert_eq!(cli.tile_size, (16, 16));
        assert!(cli.font.is_none());
        assert!(cli.pages.is_empty());
    }

    #[test]
    fn test_font_requires_pages() {
        assert!(Cli::try_parse_from(["demo", "--font", "cp437.font"]).is_err());

        let cli = Cli::try_parse_from([
            "demo", "--backend", "both", "--font", "cp437.font", "--page", "a.png", "--page", "b.png",
        ])
        .unwrap();
        assert!(cli.backend.uses_terminal() && cli.backend.uses_window());
        assert_eq!(cli.pages.len(), 2);
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
