//! Render Engine: the event loop that owns the screen.
//!
//! The renderer holds exactly one frame, the one currently on screen, along
//! with the scroll head and the viewport it was drawn for. It waits on two
//! channels: new frames from the runner, and refresh/scroll commands from
//! the input actor. Each event produces at most one write.

use super::messages::RenderCommand;
use crate::error::{Error, Result};
use crate::frame::paint::{erase_span, paint_diff, paint_full, rewind_span, DiffStyle, PaintStats};
use crate::frame::{compute_head, Frame};
use crate::terminal::{OutputBuffer, Viewport, ViewportSource};
use crossbeam_channel::{never, select, Receiver};
use std::io::Write;
use tracing::{debug, trace};

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    /// Total paints performed.
    pub paints: u64,
    /// Paints that redrew the whole span.
    pub full_redraws: u64,
    /// Total bytes written to the terminal.
    pub bytes_written: u64,
}

/// Renderer state.
pub struct Renderer<W: Write, V: ViewportSource> {
    /// Terminal (or any sink in tests).
    out: W,
    /// Where viewport sizes come from.
    viewports: V,
    /// Pre-allocated output buffer.
    output: OutputBuffer,
    /// Frame currently on screen.
    frame: Frame,
    /// Index of the first shown line.
    head: usize,
    /// Viewport the held frame was drawn for.
    viewport: Option<Viewport>,
    /// Diff styling.
    style: DiffStyle,
    /// Render statistics.
    stats: RenderStats,
}

impl<W: Write, V: ViewportSource> Renderer<W, V> {
    /// Create a renderer with nothing on screen.
    pub fn new(out: W, viewports: V, style: DiffStyle) -> Self {
        Self {
            out,
            viewports,
            output: OutputBuffer::new(),
            frame: Frame::empty(),
            head: 0,
            viewport: None,
            style,
            stats: RenderStats::default(),
        }
    }

    /// The frame currently on screen.
    pub const fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Index of the first shown line.
    pub const fn head(&self) -> usize {
        self.head
    }

    /// Accumulated statistics.
    pub const fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// The sink, mostly for inspecting test output.
    pub const fn writer(&self) -> &W {
        &self.out
    }

    /// Run until the frame channel closes.
    ///
    /// A closed command channel (no input actor, or it stopped) is not an
    /// error; the loop simply keeps serving frames. An
    /// [`RenderCommand::InputClosed`] ends the loop with an error.
    pub fn run(&mut self, frames: &Receiver<String>, commands: &Receiver<RenderCommand>) -> Result<()> {
        let closed = never();
        let mut commands_open = true;

        loop {
            let command_rx = if commands_open { commands } else { &closed };
            select! {
                recv(frames) -> frame => match frame {
                    Ok(output) => {
                        self.apply_frame(&output)?;
                    }
                    Err(_) => {
                        debug!("frame channel closed, render loop ending");
                        return Ok(());
                    }
                },
                recv(command_rx) -> command => match command {
                    Ok(RenderCommand::Refresh) => {
                        self.refresh()?;
                    }
                    Ok(RenderCommand::Scroll(delta)) => {
                        self.scroll(delta)?;
                    }
                    Ok(RenderCommand::InputClosed(reason)) => {
                        return Err(Error::InputClosed(reason));
                    }
                    Err(_) => {
                        debug!("command channel closed");
                        commands_open = false;
                    }
                },
            }
        }
    }

    /// Paint a new command output.
    ///
    /// A full redraw happens when the visible line count, the viewport, or
    /// the (re-clamped) head differ from the previous paint. Otherwise only
    /// changed lines are rewritten.
    pub fn apply_frame(&mut self, output: &str) -> Result<PaintStats> {
        let viewport = self.viewports.viewport()?;
        let mut next = Frame::from_output(output, viewport.height);
        let head = compute_head(next.original_count(), self.head, 0, viewport.height);

        self.output.clear();
        let reshaped = next.visible() != self.frame.visible()
            || self.viewport != Some(viewport)
            || head != self.head;
        let stats = if reshaped {
            erase_span(&mut self.output, self.frame.visible());
            paint_full(&mut self.output, &next, head, viewport.width)
        } else {
            rewind_span(&mut self.output, self.frame.visible());
            paint_diff(&mut self.output, &self.frame, &mut next, head, viewport.width, self.style)
        };
        self.flush(&stats)?;

        self.frame = next;
        self.head = head;
        self.viewport = Some(viewport);
        Ok(stats)
    }

    /// Repaint the held frame from scratch.
    ///
    /// The viewport is queried again so a refresh also picks up a resize.
    pub fn refresh(&mut self) -> Result<PaintStats> {
        let viewport = self.viewports.viewport()?;
        let drawn = self.frame.visible();
        self.frame.clip(viewport.height);
        self.head = compute_head(self.frame.original_count(), self.head, 0, viewport.height);
        self.viewport = Some(viewport);
        self.repaint(drawn, viewport.width)
    }

    /// Move the scroll window by `delta` lines.
    ///
    /// The viewport is queried again, so scrolling after a resize clamps and
    /// draws against the current size. Returns `None` when neither the head
    /// nor the viewport changed, in which case nothing is written.
    pub fn scroll(&mut self, delta: isize) -> Result<Option<PaintStats>> {
        if self.viewport.is_none() {
            return Ok(None);
        }
        let viewport = self.viewports.viewport()?;
        let head = compute_head(self.frame.original_count(), self.head, delta, viewport.height);
        let resized = self.viewport != Some(viewport);
        if head == self.head && !resized {
            trace!(head, delta, "scroll at bound, ignored");
            return Ok(None);
        }

        let drawn = self.frame.visible();
        self.frame.clip(viewport.height);
        self.head = head;
        self.viewport = Some(viewport);
        self.repaint(drawn, viewport.width).map(Some)
    }

    /// Write a trailing newline so whatever comes next starts below the span.
    pub fn finish(&mut self) -> Result<()> {
        if !self.frame.is_empty() {
            self.out.write_all(b"\r\n")?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Erase `drawn` rows and draw the held frame at the current head.
    fn repaint(&mut self, drawn: usize, width: usize) -> Result<PaintStats> {
        self.output.clear();
        erase_span(&mut self.output, drawn);
        let stats = paint_full(&mut self.output, &self.frame, self.head, width);
        self.flush(&stats)?;
        Ok(stats)
    }

    fn flush(&mut self, paint: &PaintStats) -> Result<()> {
        if !self.output.is_empty() {
            self.output.flush_to(&mut self.out)?;
        }
        self.stats.paints += 1;
        self.stats.bytes_written += self.output.len() as u64;
        if paint.full_redraw {
            self.stats.full_redraws += 1;
        }
        trace!(?paint, head = self.head, "painted");
        Ok(())
    }
}
