//! Viewport size queries.

use std::io;

/// Drawable extent of the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Rows available for output.
    pub height: usize,
    /// Columns available per row.
    pub width: usize,
}

impl Viewport {
    /// Create a viewport with an explicit drawable size.
    pub const fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Derive the drawable area from a raw terminal size.
    ///
    /// One row is held back so the cursor line never scrolls the top of the
    /// output off screen. Both dimensions are at least 1.
    pub fn from_terminal_size(cols: u16, rows: u16) -> Self {
        Self {
            height: usize::from(rows.saturating_sub(1)).max(1),
            width: usize::from(cols).max(1),
        }
    }
}

/// Something that can report the current viewport.
pub trait ViewportSource {
    /// Query the viewport. Called once per frame and on refresh.
    fn viewport(&mut self) -> io::Result<Viewport>;
}

/// Fixed size, mostly useful for tests and non-terminal output.
impl ViewportSource for Viewport {
    fn viewport(&mut self) -> io::Result<Viewport> {
        Ok(*self)
    }
}

/// Queries the controlling terminal through crossterm.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalViewport;

impl ViewportSource for TerminalViewport {
    fn viewport(&mut self) -> io::Result<Viewport> {
        let (cols, rows) = crossterm::terminal::size()?;
        Ok(Viewport::from_terminal_size(cols, rows))
    }
}
