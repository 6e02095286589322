//! Engine: Main coordinator that ties actors together.
//!
//! The engine owns the terminal session, spawns the runner and (unless
//! interactive) the input actor, and runs the render loop on the calling
//! thread until the runner stops.

use super::messages::{RenderCommand, RunSignal};
use super::runner::RunnerConfig;
use super::{InputActor, Renderer, RunnerActor};
use crate::error::Result;
use crate::frame::paint::{DiffStyle, DEFAULT_DECAY};
use crate::pipeline::OutputSource;
use crate::terminal::{TerminalSession, TerminalViewport, ViewportSource};
use crossbeam_channel::{bounded, unbounded};
use crossterm::style::Color;
use std::io::{self, Read, Write};
use std::time::Duration;
use tracing::info;

/// Configuration for the Engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Delay between command executions.
    pub interval: Duration,
    /// Skip raw mode and keybindings; just run, display, repeat.
    pub interactive: bool,
    /// Keep going when the command fails.
    pub force: bool,
    /// Stability counter given to changed lines.
    pub decay: u8,
    /// Foreground color of changed lines.
    pub highlight: Color,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            interactive: false,
            force: false,
            decay: DEFAULT_DECAY,
            highlight: Color::DarkRed,
        }
    }
}

impl EngineConfig {
    const fn runner(&self) -> RunnerConfig {
        RunnerConfig {
            interval: self.interval,
            force: self.force,
        }
    }

    const fn style(&self) -> DiffStyle {
        DiffStyle {
            decay: self.decay,
            highlight: self.highlight,
        }
    }
}

/// The main topless engine.
pub struct Engine;

impl Engine {
    /// Run against the real terminal until the runner stops.
    ///
    /// Raw mode (when not interactive) is held for exactly the duration of
    /// this call, and released on every return path.
    pub fn run<S: OutputSource>(config: &EngineConfig, source: S) -> Result<()> {
        let session = TerminalSession::enter(!config.interactive)?;
        let input = session.is_raw().then(io::stdin);
        let result = Self::drive(config, source, input, io::stdout(), TerminalViewport);
        drop(session);
        result
    }

    /// Wire the actors over arbitrary I/O.
    ///
    /// * `input` - Keystroke source; `None` disables keybindings.
    /// * `out` - Where paints are written.
    /// * `viewports` - Size source queried per frame.
    ///
    /// Returns once the runner has stopped and its result is known, or as
    /// soon as the render loop fails.
    pub fn drive<S, R, W, V>(config: &EngineConfig, source: S, input: Option<R>, out: W, viewports: V) -> Result<()>
    where
        S: OutputSource,
        R: Read + Send + 'static,
        W: Write,
        V: ViewportSource,
    {
        let (frame_tx, frame_rx) = bounded::<String>(0);
        let (run_tx, run_rx) = unbounded::<RunSignal>();
        let (render_tx, render_rx) = bounded::<RenderCommand>(0);

        let runner = RunnerActor::spawn(source, config.runner(), frame_tx, run_rx)?;
        // Dropped senders simply mean no input: the runner sees a closed
        // control channel and the renderer a closed command channel.
        let _input = match input {
            Some(reader) => Some(InputActor::spawn(reader, run_tx, render_tx)?),
            None => {
                drop((run_tx, render_tx));
                None
            }
        };

        info!(interval = ?config.interval, force = config.force, interactive = config.interactive, "engine started");

        let mut renderer = Renderer::new(out, viewports, config.style());
        let rendered = renderer.run(&frame_rx, &render_rx);
        let finished = renderer.finish();
        drop(frame_rx);
        rendered?;
        finished?;

        let stats = renderer.stats();
        info!(paints = stats.paints, full_redraws = stats.full_redraws, bytes = stats.bytes_written, "render loop ended");
        runner.join()
    }
}
