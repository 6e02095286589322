//! Terminal session: raw mode acquisition with guaranteed release.
//!
//! A [`TerminalSession`] enables raw mode (when asked) and restores the
//! terminal when dropped. Panics and termination signals restore it too,
//! so no exit path leaves the user's shell without echo.

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::io::{self, Write};
use std::panic;
use std::sync::Once;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Scoped terminal mode.
#[derive(Debug)]
pub struct TerminalSession {
    raw: bool,
    signals: Option<SignalGuard>,
}

impl TerminalSession {
    /// Enter the session.
    ///
    /// With `raw` set, the terminal is switched to character-at-a-time,
    /// no-echo input and a signal watcher is started. Without it the
    /// terminal is left alone.
    pub fn enter(raw: bool) -> io::Result<Self> {
        if !raw {
            return Ok(Self {
                raw: false,
                signals: None,
            });
        }

        install_panic_hook();
        crossterm::terminal::enable_raw_mode()?;
        debug!("raw mode enabled");

        let signals = match SignalGuard::new() {
            Ok(guard) => Some(guard),
            Err(e) => {
                let _ = crossterm::terminal::disable_raw_mode();
                return Err(e);
            }
        };

        Ok(Self { raw, signals })
    }

    /// Whether raw mode is engaged.
    pub const fn is_raw(&self) -> bool {
        self.raw
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.signals.take();
        if self.raw {
            restore();
            debug!("terminal restored");
        }
    }
}

/// Put the terminal back into cooked mode. Safe to call more than once.
fn restore() {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore();
            previous(info);
        }));
    });
}

/// Watches for termination signals while raw mode is on.
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<JoinHandle<()>>,
}

impl SignalGuard {
    fn new() -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;
        let handle = signals.handle();
        let thread = thread::Builder::new()
            .name("topless-signals".to_string())
            .spawn(move || {
                if let Some(signal) = signals.forever().next() {
                    warn!(signal, "termination signal received, restoring terminal");
                    restore();
                    std::process::exit(128 + signal);
                }
            })?;
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
