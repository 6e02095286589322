//! Runner Actor: Dedicated thread that re-runs the command on a timer.
//!
//! At most one execution is in flight at a time, so frames reach the render
//! engine in execution order. Delivery uses a rendezvous channel: the runner
//! waits until the engine has taken the previous frame before moving on.

use super::messages::RunSignal;
use crate::error::{Error, Result};
use crate::pipeline::{Execution, OutputSource};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Runner settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Delay between executions.
    pub interval: Duration,
    /// Treat execution failures as ordinary frames.
    pub force: bool,
}

/// Runner actor handle.
pub struct RunnerActor {
    /// Handle to the runner thread.
    handle: Option<JoinHandle<Result<()>>>,
}

/// Latest pause/exit values seen by the runner.
#[derive(Debug, Default, Clone, Copy)]
struct Flags {
    paused: bool,
    exiting: bool,
}

impl Flags {
    /// Drain every pending signal without blocking, keeping the latest values.
    fn poll(&mut self, control: &Receiver<RunSignal>) {
        loop {
            match control.try_recv() {
                Ok(RunSignal::Pause(paused)) => self.paused = paused,
                Ok(RunSignal::Exit(exiting)) => self.exiting = exiting,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
    }
}

impl RunnerActor {
    /// Spawn the runner thread.
    ///
    /// # Arguments
    ///
    /// * `source` - What to run each cycle.
    /// * `config` - Interval and force mode.
    /// * `frames` - Output channel to the render engine. Dropped when the
    ///   runner stops, which ends the render loop.
    /// * `control` - Pause/exit signals from the input actor.
    pub fn spawn<S: OutputSource>(
        source: S,
        config: RunnerConfig,
        frames: Sender<String>,
        control: Receiver<RunSignal>,
    ) -> std::io::Result<Self> {
        let handle = thread::Builder::new()
            .name("topless-runner".to_string())
            .spawn(move || Self::run_loop(source, config, &frames, &control))?;

        Ok(Self {
            handle: Some(handle),
        })
    }

    /// Wait for the runner to stop and return how it ended.
    pub fn join(mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| Error::ThreadPanicked("runner"))?,
            None => Ok(()),
        }
    }

    /// Main execution loop.
    fn run_loop<S: OutputSource>(
        mut source: S,
        config: RunnerConfig,
        frames: &Sender<String>,
        control: &Receiver<RunSignal>,
    ) -> Result<()> {
        let mut flags = Flags::default();
        let mut cycle = 0u64;

        loop {
            flags.poll(control);
            if flags.exiting {
                info!(cycle, "exit requested, runner stopping");
                return Ok(());
            }
            if flags.paused {
                thread::sleep(config.interval);
                continue;
            }

            let Execution { output, error } = source.run();
            cycle += 1;

            if let Some(error) = error {
                if !config.force {
                    warn!(cycle, %error, "command failed, stopping");
                    return Err(Error::Execution { output, source: error });
                }
                debug!(cycle, %error, "command failed, continuing in force mode");
            }

            if frames.send(output).is_err() {
                debug!("render engine gone, runner stopping");
                return Ok(());
            }
            thread::sleep(config.interval);
        }
    }
}
