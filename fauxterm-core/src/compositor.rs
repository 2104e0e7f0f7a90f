use std::io;

use fauxterm_data::Color;

use crate::{Console, Error, LayerCommand};

/// One resolved grid cell.
///
/// `Cell::default()` is all zeroes, which no drawn cell ever equals, so a
/// freshly allocated previous-frame buffer forces a full repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    /// Unicode scalar value
    pub codepoint: u32,
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
}

/// Output device of a [`Compositor`]: receives changed cells only, in
/// row-major order.
pub trait CellWriter {
    /// Writes `cell` at column `x`, row `y`.
    ///
    /// # Errors
    /// Propagates device I/O failures; the flush stops at the first one.
    fn write_cell(&mut self, x: usize, y: usize, cell: &Cell) -> io::Result<()>;
}

/// Outcome of one [`Compositor::flush`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Cells that differed from the previous frame
    pub cells_written: usize,
    /// Cells left untouched
    pub cells_skipped: usize,
}

/// Double-buffered diff renderer for character terminals.
///
/// Each refresh runs three phases:
///
/// | Phase   | Method                 | Effect                                        |
/// |---------|------------------------|-----------------------------------------------|
/// | resolve | [`resolve`]            | layer commands are painted onto `current`     |
/// | diff    | [`flush`]              | cells where `current != previous` are written |
/// | commit  | [`flush`]              | each written cell is copied into `previous`   |
///
/// `current` is a persistent scratch grid: cells no command touches keep
/// their last resolved value.
///
/// [`resolve`]: Compositor::resolve
/// [`flush`]: Compositor::flush
#[derive(Debug)]
pub struct Compositor {
    size: (usize, usize),
    current: Vec<Cell>,
    previous: Vec<Cell>,
}

impl Compositor {
    /// Allocates both buffers for a `w x h` grid.
    ///
    /// # Errors
    /// Returns [`Error::Allocation`] if the buffers cannot be allocated.
    pub fn new(size: (usize, usize)) -> Result<Self, Error> {
        let (current, previous) = allocate_buffers(size)?;
        Ok(Self { size, current, previous })
    }

    /// Reallocates both buffers for a new grid size, zero-filled so the
    /// next flush repaints everything. Returns whether the size changed.
    ///
    /// # Errors
    /// Returns [`Error::Allocation`] if the new buffers cannot be
    /// allocated; the old buffers are kept in that case.
    pub fn resize(&mut self, size: (usize, usize)) -> Result<bool, Error> {
        if size == self.size {
            return Ok(false);
        }

        let (current, previous) = allocate_buffers(size)?;
        self.current = current;
        self.previous = previous;
        self.size = size;

        tracing::debug!(width = size.0, height = size.1, "compositor resized");
        Ok(true)
    }

    /// Forgets the previous frame, so the next flush repaints every cell.
    pub fn invalidate(&mut self) {
        self.previous.fill(Cell::default());
    }

    /// Paints the console's pending fill and every queued layer command onto
    /// the working grid, in layer order, then consumes them.
    pub fn resolve(&mut self, console: &mut Console) {
        if let Some(bg) = console.take_fill() {
            self.apply(LayerCommand::Fill { codepoint: ' ' as u32, fg: Color::WHITE, bg });
        }

        for layer in console.layers_mut() {
            for command in layer.take_commands() {
                self.apply(command);
            }
        }
    }

    fn apply(&mut self, command: LayerCommand) {
        match command {
            LayerCommand::Fill { codepoint, fg, bg } => {
                self.current.fill(Cell { codepoint, fg, bg });
            },
            LayerCommand::Tile(tile) => {
                let (x, y) = (tile.pos.0 as usize, tile.pos.1 as usize);
                if x < self.size.0 && y < self.size.1 {
                    self.current[y * self.size.0 + x] =
                        Cell { codepoint: tile.codepoint, fg: tile.fg, bg: tile.bg };
                }
            },
        }
    }

    /// Writes every cell that changed since the last flush and commits it.
    ///
    /// # Errors
    /// Propagates the first error from `writer`. Cells written before the
    /// failure stay committed; the rest are retried on the next flush.
    pub fn flush(&mut self, writer: &mut impl CellWriter) -> io::Result<RenderStats> {
        let width = self.size.0.max(1);
        let mut stats = RenderStats::default();

        for (i, (cur, prev)) in self.current.iter().zip(self.previous.iter_mut()).enumerate() {
            if cur == prev {
                stats.cells_skipped += 1;
                continue;
            }

            writer.write_cell(i % width, i / width, cur)?;
            *prev = *cur;
            stats.cells_written += 1;
        }

        Ok(stats)
    }

    /// Grid size in cells.
    #[must_use]
    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    /// The resolved cell at `(x, y)`.
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        if x >= self.size.0 {
            return None;
        }
        self.current.get(y * self.size.0 + x)
    }
}

fn allocate_buffers(size: (usize, usize)) -> Result<(Vec<Cell>, Vec<Cell>), Error> {
    let cells = size
        .0
        .checked_mul(size.1)
        .ok_or_else(|| Error::allocation_failed("compositor buffers", usize::MAX))?;

    let allocate = || -> Result<Vec<Cell>, Error> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(cells)
            .map_err(|_| Error::allocation_failed("compositor buffer", cells))?;
        buffer.resize(cells, Cell::default());
        Ok(buffer)
    };

    Ok((allocate()?, allocate()?))
}

#[cfg(test)]
mod tests {
    use fauxterm_data::{ColorMode, Rgba};

    use super::*;

    #[derive(Default)]
    struct Capture {
        cells: Vec<(usize, usize, u32)>,
    }

    impl CellWriter for Capture {
        fn write_cell(&mut self, x: usize, y: usize, cell: &Cell) -> io::Result<()> {
            self.cells.push((x, y, cell.codepoint));
            Ok(())
        }
    }

    struct Failing;

    impl CellWriter for Failing {
        fn write_cell(&mut self, _: usize, _: usize, _: &Cell) -> io::Result<()> {
            Err(io::Error::other("device gone"))
        }
    }

    const FG: Color = Color::WHITE;
    const BG: Color = Color::BLACK;

    fn console(layers: usize) -> Console {
        Console::new(layers, (4, 3), ColorMode::Ansi16, true)
    }

    fn render(compositor: &mut Compositor, console: &mut Console) -> Capture {
        compositor.resolve(console);
        let mut capture = Capture::default();
        compositor.flush(&mut capture).unwrap();
        capture
    }

    #[test]
    fn test_first_frame_writes_every_cell() {
        let mut compositor = Compositor::new((4, 3)).unwrap();
        let mut console = console(1);
        console.fill(BG);

        let capture = render(&mut compositor, &mut console);
        assert_eq!(capture.cells.len(), 12);
        assert_eq!(capture.cells[5], (1, 1, ' ' as u32));
    }

    #[test]
    fn test_same_frame_twice_writes_nothing() {
        let mut compositor = Compositor::new((4, 3)).unwrap();
        let mut console = console(1);
        console.fill(BG);
        console.layer_mut(0).unwrap().push_text("hi", (1, 1), 0, 0, FG, BG);
        render(&mut compositor, &mut console);

        console.fill(BG);
        console.layer_mut(0).unwrap().push_text("hi", (1, 1), 0, 0, FG, BG);
        compositor.resolve(&mut console);
        let stats = compositor.flush(&mut Capture::default()).unwrap();
        assert_eq!(stats, RenderStats { cells_written: 0, cells_skipped: 12 });
    }

    #[test]
    fn test_only_changed_cells_are_written() {
        let mut compositor = Compositor::new((4, 3)).unwrap();
        let mut console = console(1);
        console.fill(BG);
        console.layer_mut(0).unwrap().push_text("ab", (0, 0), 0, 0, FG, BG);
        render(&mut compositor, &mut console);

        console.fill(BG);
        console.layer_mut(0).unwrap().push_text("ax", (0, 0), 0, 0, FG, BG);
        console.layer_mut(0).unwrap().push_codepoint('z' as u32, (3, 2), FG, BG);
        let capture = render(&mut compositor, &mut console);

        assert_eq!(capture.cells, vec![(1, 0, 'x' as u32), (3, 2, 'z' as u32)]);
    }

    #[test]
    fn test_color_change_counts_as_change() {
        let mut compositor = Compositor::new((4, 3)).unwrap();
        let mut console = console(1);
        console.layer_mut(0).unwrap().push_codepoint('a' as u32, (0, 0), FG, BG);
        render(&mut compositor, &mut console);

        let red = Color::from_rgba(255, 0, 0, 255);
        console.layer_mut(0).unwrap().push_codepoint('a' as u32, (0, 0), red, BG);
        assert_eq!(render(&mut compositor, &mut console).cells, vec![(0, 0, 'a' as u32)]);
    }

    #[test]
    fn test_higher_layer_wins() {
        let mut compositor = Compositor::new((4, 3)).unwrap();
        let mut console = console(2);
        console.layer_mut(1).unwrap().push_codepoint('t' as u32, (2, 1), FG, BG);
        console.layer_mut(0).unwrap().push_codepoint('b' as u32, (2, 1), FG, BG);

        compositor.resolve(&mut console);
        assert_eq!(compositor.cell(2, 1).unwrap().codepoint, 't' as u32);
    }

    #[test]
    fn test_layer_fill_covers_earlier_commands() {
        let mut compositor = Compositor::new((4, 3)).unwrap();
        let mut console = console(1);
        let layer = console.layer_mut(0).unwrap();
        layer.push_codepoint('a' as u32, (0, 0), FG, BG);
        layer.fill('.' as u32, FG, BG);
        layer.push_codepoint('b' as u32, (1, 0), FG, BG);

        compositor.resolve(&mut console);
        assert_eq!(compositor.cell(0, 0).unwrap().codepoint, '.' as u32);
        assert_eq!(compositor.cell(1, 0).unwrap().codepoint, 'b' as u32);
    }

    #[test]
    fn test_out_of_range_tiles_dropped() {
        let mut compositor = Compositor::new((4, 3)).unwrap();
        let mut console = console(1);
        let layer = console.layer_mut(0).unwrap();
        layer.push_codepoint('a' as u32, (4, 0), FG, BG);
        layer.push_codepoint('a' as u32, (0, 3), FG, BG);

        let capture = render(&mut compositor, &mut console);
        assert!(capture.cells.is_empty());
    }

    #[test]
    fn test_resolve_consumes_commands_and_fill() {
        let mut compositor = Compositor::new((4, 3)).unwrap();
        let mut console = console(1);
        console.fill(BG);
        console.layer_mut(0).unwrap().push_codepoint('a' as u32, (0, 0), FG, BG);

        compositor.resolve(&mut console);
        assert!(console.layer(0).unwrap().is_empty());
        assert_eq!(console.pending_fill(), None);
    }

    #[test]
    fn test_fill_uses_space_on_fill_color() {
        let mut compositor = Compositor::new((4, 3)).unwrap();
        let mut console = console(1);
        let navy = Color::new(4, 4, 17, Rgba::new(0, 0, 95, 255));
        console.fill(navy);

        compositor.resolve(&mut console);
        let cell = compositor.cell(3, 2).unwrap();
        assert_eq!(*cell, Cell { codepoint: ' ' as u32, fg: Color::WHITE, bg: navy });
    }

    #[test]
    fn test_resize_forces_full_repaint() {
        let mut compositor = Compositor::new((4, 3)).unwrap();
        let mut console = console(1);
        console.fill(BG);
        render(&mut compositor, &mut console);

        assert!(!compositor.resize((4, 3)).unwrap());
        assert!(compositor.resize((2, 2)).unwrap());
        assert_eq!(compositor.size(), (2, 2));

        console.fill(BG);
        assert_eq!(render(&mut compositor, &mut console).cells.len(), 4);
    }

    #[test]
    fn test_failed_resize_keeps_old_buffers() {
        let mut compositor = Compositor::new((4, 3)).unwrap();
        assert!(compositor.resize((usize::MAX, 2)).is_err());
        assert_eq!(compositor.size(), (4, 3));
        assert!(compositor.cell(3, 2).is_some());
    }

    #[test]
    fn test_failed_write_leaves_cell_dirty() {
        let mut compositor = Compositor::new((4, 3)).unwrap();
        let mut console = console(1);
        console.fill(BG);
        compositor.resolve(&mut console);

        assert!(compositor.flush(&mut Failing).is_err());
        let stats = compositor.flush(&mut Capture::default()).unwrap();
        assert_eq!(stats.cells_written, 12);
    }

    #[test]
    fn test_invalidate_repaints() {
        let mut compositor = Compositor::new((4, 3)).unwrap();
        let mut console = console(1);
        console.fill(BG);
        render(&mut compositor, &mut console);

        compositor.invalidate();
        let stats = compositor.flush(&mut Capture::default()).unwrap();
        assert_eq!(stats.cells_written, 12);
    }
}
