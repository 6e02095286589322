//! Input Actor: Dedicated thread for reading keystrokes.
//!
//! Raw mode hands us bytes exactly as the terminal sends them. The actor
//! decodes them into [`Key`]s, interprets those into signals, and routes
//! each signal to the runner or the render engine.

use super::messages::{Dispatch, Key, RenderCommand, RunSignal};
use crossbeam_channel::Sender;
use std::io::Read;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, trace};

/// Bytes requested per read.
const READ_CHUNK: usize = 128;

const ESC: u8 = 0x1b;

/// Longest escape sequence held back while waiting for its final byte.
const MAX_ESCAPE: usize = 16;

/// Lines moved by Ctrl-D / Ctrl-U.
pub const PAGE_SCROLL: isize = 10;

/// Incremental decoder from raw terminal bytes to keys.
///
/// Escape sequences may be split across reads, so an incomplete one is held
/// back until the next chunk arrives.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    pending: Vec<u8>,
}

/// Outcome of decoding at one position.
enum Step {
    /// A key and the number of bytes it used.
    Key(Key, usize),
    /// More bytes are needed.
    Incomplete,
}

impl KeyDecoder {
    /// Create an empty decoder.
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Decode a chunk, returning every complete key in order.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Key> {
        self.pending.extend_from_slice(bytes);
        let mut keys = Vec::new();
        let mut pos = 0;
        while pos < self.pending.len() {
            match Self::decode_one(&self.pending[pos..]) {
                Step::Key(key, used) => {
                    keys.push(key);
                    pos += used;
                }
                Step::Incomplete => break,
            }
        }
        self.pending.drain(..pos);
        keys
    }

    fn decode_one(bytes: &[u8]) -> Step {
        match bytes[0] {
            ESC => Self::decode_escape(bytes),
            byte @ 0x01..=0x1a => Step::Key(Key::Ctrl(char::from(b'a' + byte - 1)), 1),
            byte @ 0x20..=0x7e => Step::Key(Key::Char(char::from(byte)), 1),
            _ => Step::Key(Key::Other, 1),
        }
    }

    /// Decode `ESC [ ...` (CSI) and `ESC O x` (SS3) sequences.
    ///
    /// An `ESC` followed by anything else is a lone escape key; only the
    /// `ESC` itself is consumed so the following byte decodes on its own.
    /// A CSI sequence with no final byte within [`MAX_ESCAPE`] bytes is
    /// dropped as [`Key::Other`].
    fn decode_escape(bytes: &[u8]) -> Step {
        match bytes.get(1) {
            None => Step::Incomplete,
            Some(b'[') => {
                // Parameter and intermediate bytes, then one final byte.
                let scan = &bytes[2..bytes.len().min(MAX_ESCAPE)];
                let Some(offset) = scan.iter().position(|b| (0x40..=0x7e).contains(b)) else {
                    if bytes.len() >= MAX_ESCAPE {
                        return Step::Key(Key::Other, MAX_ESCAPE);
                    }
                    return Step::Incomplete;
                };
                let end = 2 + offset;
                let key = match &bytes[2..=end] {
                    b"A" => Key::Up,
                    b"B" => Key::Down,
                    _ => Key::Other,
                };
                Step::Key(key, end + 1)
            }
            Some(b'O') => match bytes.get(2) {
                None => Step::Incomplete,
                Some(b'A') => Step::Key(Key::Up, 3),
                Some(b'B') => Step::Key(Key::Down, 3),
                Some(_) => Step::Key(Key::Other, 3),
            },
            Some(_) => Step::Key(Key::Other, 1),
        }
    }
}

/// Turns keys into signals and owns the pause/exit flags.
#[derive(Debug, Default)]
pub struct Interpreter {
    paused: bool,
    exiting: bool,
}

impl Interpreter {
    /// Fresh interpreter: running, not exiting.
    pub const fn new() -> Self {
        Self {
            paused: false,
            exiting: false,
        }
    }

    /// Map a key to a signal, updating the flags it toggles.
    pub fn interpret(&mut self, key: Key) -> Option<Dispatch> {
        match key {
            Key::Char('q') => {
                self.exiting = !self.exiting;
                Some(Dispatch::Run(RunSignal::Exit(self.exiting)))
            }
            Key::Char('w') => {
                self.paused = !self.paused;
                Some(Dispatch::Run(RunSignal::Pause(self.paused)))
            }
            // Raw mode swallows SIGINT, so Ctrl-C only ever requests exit.
            Key::Ctrl('c') => {
                self.exiting = true;
                Some(Dispatch::Run(RunSignal::Exit(true)))
            }
            Key::Char('r') => Some(Dispatch::Render(RenderCommand::Refresh)),
            Key::Ctrl('d') => Some(Dispatch::Render(RenderCommand::Scroll(PAGE_SCROLL))),
            Key::Ctrl('u') => Some(Dispatch::Render(RenderCommand::Scroll(-PAGE_SCROLL))),
            Key::Down => Some(Dispatch::Render(RenderCommand::Scroll(1))),
            Key::Up => Some(Dispatch::Render(RenderCommand::Scroll(-1))),
            _ => None,
        }
    }

    /// Whether the last pause toggle left execution paused.
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether an exit is currently requested.
    pub const fn is_exiting(&self) -> bool {
        self.exiting
    }
}

/// Input actor that reads and interprets keystrokes.
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// # Arguments
    ///
    /// * `reader` - Byte source, normally standard input in raw mode.
    /// * `run_tx` - Signals for the pipeline runner.
    /// * `render_tx` - Commands for the render engine.
    ///
    /// The thread blocks in `read` and has no shutdown flag: it ends when the
    /// stream closes or when both receivers are gone. In the real program
    /// process exit reclaims it.
    pub fn spawn<R>(reader: R, run_tx: Sender<RunSignal>, render_tx: Sender<RenderCommand>) -> std::io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name("topless-input".to_string())
            .spawn(move || Self::run_loop(reader, &run_tx, &render_tx))?;

        Ok(Self {
            handle: Some(handle),
        })
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main read loop.
    fn run_loop<R: Read>(mut reader: R, run_tx: &Sender<RunSignal>, render_tx: &Sender<RenderCommand>) {
        let mut decoder = KeyDecoder::new();
        let mut interpreter = Interpreter::new();
        let mut chunk = [0u8; READ_CHUNK];

        let reason = loop {
            let read = match reader.read(&mut chunk) {
                Ok(0) => break "end of file".to_string(),
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => break e.to_string(),
            };

            for key in decoder.feed(&chunk[..read]) {
                trace!(?key, "key decoded");
                let delivered = match interpreter.interpret(key) {
                    Some(Dispatch::Run(signal)) => {
                        debug!(?signal, "run signal");
                        run_tx.send(signal).is_ok()
                    }
                    Some(Dispatch::Render(command)) => render_tx.send(command).is_ok(),
                    None => true,
                };
                if !delivered {
                    debug!("receiver gone, input actor stopping");
                    return;
                }
            }
        };

        error!(%reason, "input stream closed");
        let _ = render_tx.send(RenderCommand::InputClosed(reason));
    }
}
