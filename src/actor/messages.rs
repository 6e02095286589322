//! Message types for actor communication.
//!
//! These enums define the protocol between actors in the system.

/// Keys the input decoder recognises.
///
/// Anything else on stdin decodes to [`Key::Other`] and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable ASCII character.
    Char(char),
    /// Control + letter, given as the lowercase letter.
    Ctrl(char),
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Any other byte or escape sequence.
    Other,
}

/// Control signals for the pipeline runner.
///
/// Each carries the new value of a flag owned by the input interpreter;
/// the runner keeps the latest one it has seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSignal {
    /// Pause (`true`) or resume (`false`) command execution.
    Pause(bool),
    /// Stop (`true`) or cancel a pending stop (`false`).
    Exit(bool),
}

/// Commands sent to the render engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    /// Repaint the held frame from scratch.
    Refresh,

    /// Move the scroll window by this many lines.
    Scroll(isize),

    /// Standard input closed or failed; the program cannot be controlled anymore.
    InputClosed(String),
}

/// Where an interpreted key goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// To the pipeline runner.
    Run(RunSignal),
    /// To the render engine.
    Render(RenderCommand),
}
