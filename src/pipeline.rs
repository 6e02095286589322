//! Command pipelines: spawn each stage, wire stdout to the next stdin,
//! capture the last stage's output.

use crate::error::ExecError;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use tracing::trace;

/// One stage of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    /// Program to execute.
    pub program: String,
    /// Arguments passed to it.
    pub args: Vec<String>,
}

impl Stage {
    /// Build a stage from a program and its arguments.
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a stage from argv-style words; `None` when `words` is empty.
    pub fn from_words(words: &[String]) -> Option<Self> {
        let (program, args) = words.split_first()?;
        Some(Self::new(program.clone(), args.iter().cloned()))
    }
}

/// The result of one execution.
#[derive(Debug, Default)]
pub struct Execution {
    /// Output of the final stage (lossy UTF-8). Empty when an earlier stage failed.
    pub output: String,
    /// Why the execution failed, if it did.
    pub error: Option<ExecError>,
}

impl Execution {
    /// A successful execution.
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            error: None,
        }
    }

    /// A failed execution with whatever output was captured.
    pub fn failed(output: impl Into<String>, error: ExecError) -> Self {
        Self {
            output: output.into(),
            error: Some(error),
        }
    }
}

/// Produces one frame of output per call.
///
/// [`Pipeline`] is the real implementation; closures work too, which keeps
/// the runner testable without spawning processes.
pub trait OutputSource: Send + 'static {
    /// Run once and return the captured output.
    fn run(&mut self) -> Execution;
}

impl<F> OutputSource for F
where
    F: FnMut() -> Execution + Send + 'static,
{
    fn run(&mut self) -> Execution {
        self()
    }
}

/// A chain of processes wired stdin to stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// A pipeline from explicit stages.
    pub const fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// A single-stage pipeline running `words` directly.
    pub fn direct(words: &[String]) -> Self {
        Self::new(Stage::from_words(words).into_iter().collect())
    }

    /// A single-stage pipeline running `words` joined by spaces through `sh -c`.
    pub fn shell(words: &[String]) -> Self {
        Self::new(vec![Stage::new("sh", ["-c".to_string(), words.join(" ")])])
    }

    /// The configured stages.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Run the whole chain once.
    ///
    /// Stage 0 reads from `/dev/null` and every stage's stderr is discarded.
    /// A stage that fails to start aborts the run with empty output. After
    /// the last stage's output is read, stages are waited in order: an
    /// intermediate failure yields empty output, a failure of the last stage
    /// keeps what it printed.
    pub fn execute(&self) -> Execution {
        let Some(last) = self.stages.len().checked_sub(1) else {
            return Execution::failed("", ExecError::Empty);
        };

        let mut children: Vec<Child> = Vec::with_capacity(self.stages.len());
        for (index, stage) in self.stages.iter().enumerate() {
            let stdin = match children.last_mut().and_then(|child| child.stdout.take()) {
                Some(upstream) => Stdio::from(upstream),
                None => Stdio::null(),
            };
            let spawned = Command::new(&stage.program)
                .args(&stage.args)
                .stdin(stdin)
                .stdout(Stdio::piped())
                .stderr(Stdio::null())
                .spawn();
            match spawned {
                Ok(child) => children.push(child),
                Err(source) => {
                    reap(&mut children);
                    return Execution::failed(
                        "",
                        ExecError::Spawn {
                            program: stage.program.clone(),
                            source,
                        },
                    );
                }
            }
            trace!(stage = index, program = %stage.program, "stage started");
        }

        let mut captured = Vec::new();
        let read = children[last]
            .stdout
            .take()
            .map_or(Ok(0), |mut stdout| stdout.read_to_end(&mut captured));
        if let Err(source) = read {
            reap(&mut children);
            return Execution::failed(
                "",
                ExecError::Capture {
                    program: self.stages[last].program.clone(),
                    source,
                },
            );
        }
        let output = String::from_utf8_lossy(&captured).into_owned();

        for (index, stage) in self.stages.iter().enumerate() {
            let kept = if index == last { output.as_str() } else { "" };
            match children[index].wait() {
                Ok(status) if status.success() => {}
                Ok(status) => {
                    reap(&mut children[index + 1..]);
                    return Execution::failed(
                        kept,
                        ExecError::Status {
                            program: stage.program.clone(),
                            status,
                        },
                    );
                }
                Err(source) => {
                    reap(&mut children[index + 1..]);
                    return Execution::failed(
                        kept,
                        ExecError::Wait {
                            program: stage.program.clone(),
                            source,
                        },
                    );
                }
            }
        }

        Execution::ok(output)
    }
}

impl OutputSource for Pipeline {
    fn run(&mut self) -> Execution {
        self.execute()
    }
}

/// Kill and wait for stages that will not be waited normally.
fn reap(children: &mut [Child]) {
    for child in children {
        let _ = child.kill();
        let _ = child.wait();
    }
}
