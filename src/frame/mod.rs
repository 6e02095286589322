//! Frame module: the data model behind every repaint.
//!
//! This module contains:
//! - [`Frame`]: one command output split into lines, clipped to the viewport
//! - [`compute_head`]: scroll-window clamping against a taller-than-viewport frame
//! - [`paint`]: the ANSI emitters for full redraws and line-level diffs
//! - [`text`]: width fitting for individual lines

pub mod paint;
pub mod text;

use std::ops::Range;

/// One captured command output.
///
/// `lines` holds every line of the output, while `visible` records how many
/// of them fit into the viewport the frame was built for. Stability counters
/// are kept per line index and only ever written by the diff pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<String>,
    visible: usize,
    stability: Vec<u8>,
}

impl Frame {
    /// A frame with nothing drawn. Used before the first output arrives.
    pub const fn empty() -> Self {
        Self {
            lines: Vec::new(),
            visible: 0,
            stability: Vec::new(),
        }
    }

    /// Split raw output on newlines and clip it to `height` rows.
    ///
    /// A trailing newline produces a trailing empty line, so the cursor ends
    /// up where the command itself would have left it.
    pub fn from_output(output: &str, height: usize) -> Self {
        let lines: Vec<String> = output.split('\n').map(str::to_owned).collect();
        let stability = vec![0; lines.len()];
        let mut frame = Self {
            lines,
            visible: 0,
            stability,
        };
        frame.clip(height);
        frame
    }

    /// Recompute the visible line count for a new viewport height.
    pub fn clip(&mut self, height: usize) {
        self.visible = self.lines.len().min(height);
    }

    /// Number of lines before clipping.
    #[inline]
    pub fn original_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of lines drawn for this frame.
    #[inline]
    pub const fn visible(&self) -> usize {
        self.visible
    }

    /// Whether nothing has been drawn.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.visible == 0
    }

    /// Line at `index`, if the output had that many lines.
    #[inline]
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Stability counter for `index`. Lines the frame does not have count as 0.
    #[inline]
    pub fn stability(&self, index: usize) -> u8 {
        self.stability.get(index).copied().unwrap_or(0)
    }

    /// Line at `index` together with its writable stability counter.
    #[inline]
    pub fn diff_slot(&mut self, index: usize) -> Option<(&str, &mut u8)> {
        let line = self.lines.get(index)?;
        let counter = self.stability.get_mut(index)?;
        Some((line.as_str(), counter))
    }

    /// Line indices shown when the window starts at `head`.
    ///
    /// # Panics
    ///
    /// Debug builds assert that `head` leaves room for every visible line.
    #[inline]
    pub fn window(&self, head: usize) -> Range<usize> {
        debug_assert!(head + self.visible <= self.lines.len());
        head..head + self.visible
    }
}

/// Clamp a scroll request against a frame of `original_count` lines.
///
/// Content that fits entirely (`original_count < height`) never scrolls and
/// always yields 0. Otherwise `head + delta` is clamped to
/// `0..=original_count - height`. Passing `delta = 0` re-clamps an existing
/// head after the frame or the viewport changed shape.
pub fn compute_head(original_count: usize, head: usize, delta: isize, height: usize) -> usize {
    if original_count < height {
        return 0;
    }
    let max_head = original_count - height;
    head.saturating_add_signed(delta).min(max_head)
}
