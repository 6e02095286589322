//! # Topless
//!
//! Re-run a command on an interval and repaint its output in place.
//!
//! Topless keeps the previous output on screen and rewrites only the lines
//! that changed, highlighting them for a few cycles. Output taller than the
//! terminal can be scrolled, execution can be paused, and nothing outside
//! the drawn span is touched, so the terminal's own scrollback survives.
//!
//! ## Core Concepts
//!
//! - **Line diff**: positional comparison against the previous frame
//! - **Stability counters**: changed lines stay highlighted, then get cleared
//! - **Actor model**: isolated threads for input and command execution
//! - **Backpressure**: a frame is only produced once the last one is painted
//!
//! ## Example
//!
//! ```rust,no_run
//! use topless::{Engine, EngineConfig, Pipeline};
//!
//! let words = vec!["date".to_string()];
//! Engine::run(&EngineConfig::default(), Pipeline::direct(&words))?;
//! # Ok::<(), topless::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod terminal;

// Re-exports for convenience
pub use actor::{Engine, EngineConfig, RenderCommand, Renderer, RunSignal};
pub use error::{Error, ExecError};
pub use frame::paint::{DiffStyle, PaintStats};
pub use frame::{compute_head, Frame};
pub use pipeline::{Execution, OutputSource, Pipeline, Stage};
pub use terminal::{Viewport, ViewportSource};
