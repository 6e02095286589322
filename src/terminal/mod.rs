//! Terminal module: everything that touches the real terminal.
//!
//! - [`OutputBuffer`]: accumulates one repaint, flushed with a single write
//! - [`TerminalSession`]: raw mode with guaranteed restoration
//! - [`Viewport`] / [`ViewportSource`]: size queries

mod output;
mod session;
mod viewport;

pub use output::OutputBuffer;
pub use session::TerminalSession;
pub use viewport::{TerminalViewport, Viewport, ViewportSource};
