//! Topless - run a command repeatedly and repaint its output in place.
//!
//! # Usage
//!
//! ```bash
//! # Every second
//! topless ls -l
//!
//! # Every half second, through the shell, ignoring failures
//! topless -s 0.5 -sh -f 'ps aux | grep ssh'
//!
//! # Log to a file (stdout is the display)
//! RUST_LOG=topless=debug topless --log-file /tmp/topless.log date
//! ```
//!
//! # Keys
//!
//! `q` quit, `w` pause/resume, `r` redraw, arrows scroll one line,
//! Ctrl-D / Ctrl-U scroll ten lines. `-i` disables all of them.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use topless::{Engine, EngineConfig, Error, Pipeline};

/// Run a command repeatedly and redraw only the lines that changed
#[derive(Parser, Debug)]
#[command(name = "topless")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seconds to wait between runs
    #[arg(short = 's', value_name = "SECONDS", default_value = "1", value_parser = parse_seconds)]
    seconds: Duration,

    /// Interactive mode: no raw input, no keybindings
    #[arg(short = 'i')]
    interactive: bool,

    /// Run the command through `sh -c` (also accepted as `-sh`)
    #[arg(long = "sh")]
    shell: bool,

    /// Keep running when the command fails
    #[arg(short = 'f')]
    force: bool,

    /// Frames a changed line stays highlighted before it is cleared
    #[arg(long, value_name = "FRAMES", default_value_t = topless::frame::paint::DEFAULT_DECAY,
          value_parser = clap::value_parser!(u8).range(2..))]
    decay: u8,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long, env = "TOPLESS_LOG", value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Command and its arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    command: Vec<String>,
}

impl Args {
    fn config(&self) -> EngineConfig {
        EngineConfig {
            interval: self.seconds,
            interactive: self.interactive,
            force: self.force,
            decay: self.decay,
            ..EngineConfig::default()
        }
    }

    fn pipeline(&self) -> Pipeline {
        if self.shell {
            Pipeline::shell(&self.command)
        } else {
            Pipeline::direct(&self.command)
        }
    }
}

fn parse_seconds(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value.parse().map_err(|e| format!("{e}"))?;
    Duration::try_from_secs_f64(seconds).map_err(|_| format!("`{value}` is not a valid number of seconds"))
}

/// Rewrite the single-dash `-sh` flag to `--sh` before clap sees it.
///
/// Only options ahead of the command are touched; `-s` consumes the next
/// word, and the first bare word starts the command.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut args = args.into_iter();
    out.extend(args.next());

    let mut takes_value = false;
    let mut in_options = true;
    for arg in args {
        if in_options && !takes_value {
            if arg == "-sh" {
                out.push(OsString::from("--sh"));
                continue;
            }
            match arg.to_str() {
                Some("--") => in_options = false,
                Some("-s" | "--decay" | "--log-file") => takes_value = true,
                Some(flag) if flag.starts_with('-') => {}
                _ => in_options = false,
            }
        } else {
            takes_value = false;
        }
        out.push(arg);
    }
    out
}

/// Initialize logging into `path`.
///
/// Nothing is logged without a file: stdout is the display and stderr
/// shares the same terminal.
fn init_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topless=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(true)
        .init();

    Ok(())
}

fn run(args: &Args) -> Result<()> {
    if let Some(path) = &args.log_file {
        init_logging(path)?;
    }
    info!(command = ?args.command, shell = args.shell, "starting");
    Engine::run(&args.config(), args.pipeline())?;
    Ok(())
}

/// Report a failed run and return the exit status.
///
/// Partial command output goes to `out` first, exactly once and newline
/// terminated, so it sits above the error message written to `err_out`.
fn report(err: &anyhow::Error, out: &mut impl Write, err_out: &mut impl Write) -> u8 {
    if let Some(Error::Execution { output, .. }) = err.downcast_ref::<Error>() {
        if !output.is_empty() {
            let _ = out.write_all(output.as_bytes());
            if !output.ends_with('\n') {
                let _ = out.write_all(b"\n");
            }
        }
    }
    let _ = out.flush();
    let _ = err_out.write_all(format!("topless: {err:#}\n").as_bytes());
    1
}

fn main() -> ExitCode {
    let args = match Args::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => ExitCode::from(report(&err, &mut io::stdout().lock(), &mut io::stderr().lock())),
    }
}
