//! `OutputBuffer`: Single-syscall output buffer for ANSI sequences.

use crossterm::cursor::{MoveDown, MoveUp};
use crossterm::style::{Color, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{Command, QueueableCommand};
use std::io::{self, Write};

/// Pre-allocated buffer for building a repaint.
///
/// All output is accumulated here, then flushed in a single `write()` call
/// to prevent terminal flickering.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    /// Create a new output buffer with the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a buffer sized for a typical terminal (4KB).
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Get the buffer contents.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get the buffer length.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write a string.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    #[inline]
    fn queue(&mut self, command: impl Command) {
        // Writing into a Vec cannot fail.
        let _ = self.data.queue(command);
    }

    /// Return to column 1 of the current row.
    #[inline]
    pub fn carriage_return(&mut self) {
        self.data.push(b'\r');
    }

    /// Erase the whole current row, leaving the cursor at column 1.
    #[inline]
    pub fn erase_line(&mut self) {
        self.carriage_return();
        self.queue(Clear(ClearType::CurrentLine));
    }

    /// Move to column 1 of the next row, scrolling if at the bottom.
    #[inline]
    pub fn newline(&mut self) {
        self.data.extend_from_slice(b"\r\n");
    }

    /// Move the cursor down one row without writing text.
    #[inline]
    pub fn cursor_down(&mut self) {
        self.queue(MoveDown(1));
    }

    /// Move the cursor up `rows` rows. Zero is a no-op.
    #[inline]
    pub fn cursor_up(&mut self, rows: u16) {
        if rows > 0 {
            self.queue(MoveUp(rows));
        }
    }

    /// Write `text` wrapped in a foreground color and a reset.
    ///
    /// The 16 named colors use their basic SGR codes (`CSI 31 m` for dark
    /// red) so they show on terminals without a 256-color palette.
    #[inline]
    pub fn write_colored(&mut self, color: Color, text: &str) {
        match basic_sgr(color) {
            Some(code) => {
                let _ = write!(self.data, "\x1b[{code}m");
            }
            None => self.queue(SetForegroundColor(color)),
        }
        self.write_str(text);
        self.queue(ResetColor);
    }

    /// Flush to a writer in a single call.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    pub fn flush_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

/// Basic SGR foreground code for a named color.
const fn basic_sgr(color: Color) -> Option<u8> {
    let code = match color {
        Color::Black => 30,
        Color::DarkRed => 31,
        Color::DarkGreen => 32,
        Color::DarkYellow => 33,
        Color::DarkBlue => 34,
        Color::DarkMagenta => 35,
        Color::DarkCyan => 36,
        Color::Grey => 37,
        Color::DarkGrey => 90,
        Color::Red => 91,
        Color::Green => 92,
        Color::Yellow => 93,
        Color::Blue => 94,
        Color::Magenta => 95,
        Color::Cyan => 96,
        Color::White => 97,
        _ => return None,
    };
    Some(code)
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}
