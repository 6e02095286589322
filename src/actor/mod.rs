//! Actor Model: Message-passing concurrency for the refresh engine.
//!
//! This module implements a small actor system using crossbeam channels:
//! - **Input Actor**: Reads raw keystrokes, turns them into signals
//! - **Runner Actor**: Re-runs the command, delivers each output as a frame
//! - **Renderer**: Runs on the calling thread, diffs and paints frames
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     RunSignal       ┌──────────────┐
//! │ Input Thread │ ─────────────────▶  │Runner Thread │
//! └──────────────┘                     └──────────────┘
//!        │                                    │
//!        │ RenderCommand                      │ frame (String)
//!        ▼                                    ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                     Renderer                         │
//! └─────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//!                         stdout
//! ```
//!
//! Frames travel over a zero-capacity channel, so the runner never gets more
//! than one output ahead of the screen. Run signals use an unbounded channel
//! that the runner drains once per cycle without blocking.

mod engine;
mod input;
mod messages;
mod renderer;
mod runner;

pub use engine::{Engine, EngineConfig};
pub use input::{InputActor, Interpreter, KeyDecoder, PAGE_SCROLL};
pub use messages::{Dispatch, Key, RenderCommand, RunSignal};
pub use renderer::{RenderStats, Renderer};
pub use runner::{RunnerActor, RunnerConfig};
