use crate::error::{BuildStampError, Result};
use std::ffi::{OsStr, OsString};
use std::io::Read;
use std::process::{Child, ChildStdout, Command, ExitStatus, Stdio};

/// One external process in a pipeline
#[derive(Debug, Clone)]
pub struct Stage {
    pub program: String,
    pub args: Vec<OsString>,
}

impl Stage {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg<A: AsRef<OsStr>>(mut self, arg: A) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Printable form of the command, used for diagnostics only
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            line.push(' ');
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                line.push_str(&format!("'{}'", arg));
            } else {
                line.push_str(&arg);
            }
        }
        line
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

#[derive(Debug)]
pub struct PipelineOutput {
    /// Everything the last stage wrote to stdout
    pub stdout: Vec<u8>,
    /// Exit status of every stage, first to last
    pub statuses: Vec<ExitStatus>,
}

impl PipelineOutput {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Status of the final stage
    pub fn status(&self) -> Option<ExitStatus> {
        self.statuses.last().copied()
    }

    /// Exit code of the final stage; 1 if it was killed by a signal
    pub fn exit_code(&self) -> i32 {
        self.status().and_then(|s| s.code()).unwrap_or(1)
    }
}

/// Processes connected stdout-to-stdin, like `a | b | c` in a shell.
///
/// stdin of the first stage and stderr of every stage are inherited.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Spawn every stage, wait for the last one and return its output
    pub fn run(&self) -> Result<PipelineOutput> {
        if self.stages.is_empty() {
            return Err(BuildStampError::Config {
                message: "Pipeline has no stages".to_string(),
            });
        }

        let mut children: Vec<Child> = Vec::with_capacity(self.stages.len());
        let mut upstream: Option<ChildStdout> = None;

        for stage in &self.stages {
            let mut command = stage.command();
            if let Some(previous) = upstream.take() {
                command.stdin(Stdio::from(previous));
            }
            command.stdout(Stdio::piped());

            let mut child = match command.spawn() {
                Ok(child) => child,
                Err(e) => {
                    abort(&mut children);
                    return Err(BuildStampError::from_spawn(e, &stage.program));
                }
            };

            upstream = child.stdout.take();
            children.push(child);
        }

        let mut stdout = Vec::new();
        if let Some(mut last) = upstream {
            if let Err(e) = last.read_to_end(&mut stdout) {
                abort(&mut children);
                return Err(BuildStampError::Io(e));
            }
        }

        // The last stage has seen EOF on its input by now, so reaping
        // front to back cannot block on a full pipe.
        let mut statuses = Vec::with_capacity(children.len());
        for child in &mut children {
            statuses.push(child.wait()?);
        }

        Ok(PipelineOutput { stdout, statuses })
    }
}

fn abort(children: &mut [Child]) {
    for child in children.iter_mut() {
        let _ = child.kill();
        let _ = child.wait();
    }
}
