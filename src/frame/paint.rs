//! Painting: Generate minimal ANSI sequences for a new frame.
//!
//! Two paths exist:
//! 1. **Full redraw**: erase the previously drawn span and print every
//!    visible line. Used for the first frame, refreshes, scrolling, and any
//!    change of shape (visible line count, viewport size, window position).
//! 2. **Line diff**: walk the window index by index and only rewrite lines
//!    that changed, or that need their highlight cleared.
//!
//! The diff is positional on purpose. A line that moved is a changed line;
//! there is no insertion or deletion detection.
//!
//! Every paint leaves the cursor on the last row of the span it drew, which
//! is where the next paint expects to start.

use super::text::fit_to_width;
use super::Frame;
use crate::terminal::OutputBuffer;
use crossterm::style::Color;

/// Counter value given to a line on the frame it changes.
///
/// The line is highlighted on that frame, skipped while the counter decays,
/// and reprinted in plain style once the counter reaches 1.
pub const DEFAULT_DECAY: u8 = 4;

/// Counter value at which an unchanged line is reprinted to clear its highlight.
const CLEAR_AT: u8 = 1;

/// Style settings for the diff path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffStyle {
    /// Counter assigned to changed lines. Must be at least 2.
    pub decay: u8,
    /// Foreground color for changed lines.
    pub highlight: Color,
}

impl Default for DiffStyle {
    fn default() -> Self {
        Self {
            decay: DEFAULT_DECAY,
            highlight: Color::DarkRed,
        }
    }
}

/// Result of a paint operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaintStats {
    /// Whether the span was erased and redrawn from scratch.
    pub full_redraw: bool,
    /// Lines whose text was written in plain style.
    pub reprinted: usize,
    /// Lines whose text was written with the highlight color.
    pub highlighted: usize,
    /// Lines left untouched (cursor movement only).
    pub skipped: usize,
    /// Bytes emitted.
    pub bytes: usize,
}

impl PaintStats {
    /// Lines whose text was rewritten, in any style.
    pub const fn text_writes(&self) -> usize {
        self.reprinted + self.highlighted
    }
}

#[allow(clippy::cast_possible_truncation)]
fn rows(count: usize) -> u16 {
    count.min(u16::MAX as usize) as u16
}

/// Erase a previously drawn span of `drawn` rows, bottom to top.
///
/// The cursor is expected on the last row of the span and ends on its first
/// row, column 1. The top row itself is left for the caller to overwrite.
pub fn erase_span(output: &mut OutputBuffer, drawn: usize) {
    if drawn == 0 {
        return;
    }
    for _ in 1..drawn {
        output.erase_line();
        output.cursor_up(1);
    }
    output.carriage_return();
}

/// Move from the last row of a `drawn`-row span to column 1 of its first row.
pub fn rewind_span(output: &mut OutputBuffer, drawn: usize) {
    if drawn == 0 {
        return;
    }
    output.cursor_up(rows(drawn - 1));
    output.carriage_return();
}

/// Print every visible line of `frame` starting at `head`, in plain style.
///
/// The caller positions the cursor at the top of the span first, usually
/// with [`erase_span`].
pub fn paint_full(output: &mut OutputBuffer, frame: &Frame, head: usize, width: usize) -> PaintStats {
    let start = output.len();
    let window = frame.window(head);
    let last = window.end.saturating_sub(1);

    for index in window {
        output.erase_line();
        output.write_str(&fit_to_width(frame.line(index).unwrap_or_default(), width));
        if index != last {
            output.newline();
        }
    }

    PaintStats {
        full_redraw: true,
        reprinted: frame.visible(),
        highlighted: 0,
        skipped: 0,
        bytes: output.len() - start,
    }
}

/// Diff `next` against `previous` over the window starting at `head`.
///
/// Both frames must have the same visible line count and have been drawn at
/// the same head; otherwise use [`paint_full`]. The stability counters of
/// `next` are seeded here from those of `previous`.
///
/// For each index in the window:
/// - **equal**: the previous counter is decremented (floor 0). If it lands on
///   1 the line is reprinted plain to clear its highlight, otherwise the
///   cursor just moves down.
/// - **different**: the line is reprinted with the highlight color and its
///   counter reset to `style.decay`.
///
/// The caller positions the cursor at the top of the span first, usually
/// with [`rewind_span`].
pub fn paint_diff(
    output: &mut OutputBuffer,
    previous: &Frame,
    next: &mut Frame,
    head: usize,
    width: usize,
    style: DiffStyle,
) -> PaintStats {
    debug_assert_eq!(previous.visible(), next.visible());
    debug_assert!(style.decay > CLEAR_AT);

    let start = output.len();
    let mut stats = PaintStats::default();
    let window = next.window(head);
    let last = window.end.saturating_sub(1);

    for index in window {
        let Some((line, counter)) = next.diff_slot(index) else {
            break;
        };
        let unchanged = previous.line(index) == Some(line);

        if unchanged {
            let count = previous.stability(index).saturating_sub(1);
            *counter = count;
            if count == CLEAR_AT {
                output.erase_line();
                output.write_str(&fit_to_width(line, width));
                stats.reprinted += 1;
            } else {
                stats.skipped += 1;
                if index != last {
                    output.cursor_down();
                }
                continue;
            }
        } else {
            *counter = style.decay;
            output.erase_line();
            output.write_colored(style.highlight, &fit_to_width(line, width));
            stats.highlighted += 1;
        }

        if index != last {
            output.newline();
        }
    }

    stats.bytes = output.len() - start;
    stats
}
