//! Blocking subprocess execution with a timeout.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

/// Interval between exit-status polls while a child is running.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// How long killed processes get to close their pipes.
const KILL_GRACE: Duration = Duration::from_millis(500);

/// Everything observed about one finished (or killed) invocation.
///
/// Callers decide what counts as success; nothing here is an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalToolResult {
    /// Captured stdout, decoded permissively
    pub stdout: String,
    /// Captured stderr, decoded permissively
    pub stderr: String,
    /// Exit code; `None` when killed by a signal or on timeout
    pub exit_code: Option<i32>,
    /// The timeout elapsed and the child was killed
    pub timed_out: bool,
}

impl ExternalToolResult {
    /// Exited normally with status 0.
    #[must_use]
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    /// Exit code rendered for messages (`signal` when there is none).
    #[must_use]
    pub fn exit_code_display(&self) -> String {
        self.exit_code
            .map_or_else(|| "signal".to_string(), |c| c.to_string())
    }
}

/// A program invocation with arguments and a timeout.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ToolCommand {
    /// Create a command for `program` with the given timeout.
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Human-readable command line for logs.
    #[must_use]
    pub fn display(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion or until the timeout elapses.
    ///
    /// Only a failure to start the process is an `Err`. Output is drained on
    /// background threads so a child filling its pipe cannot stall. On unix
    /// the child leads its own process group and the whole group is killed
    /// at the deadline, including helpers it forked. A timeout too large to
    /// represent means no deadline.
    pub fn run(&self) -> std::io::Result<ExternalToolResult> {
        tracing::debug!("Running: {}", self.display());

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut command, 0);

        let deadline = Instant::now().checked_add(self.timeout);
        let mut child = command.spawn()?;

        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let (exit_code, killed) = wait_with_deadline(&mut child, deadline)?;

        let reader_deadline = if killed { grace_deadline() } else { deadline };
        let mut stdout = collect(stdout_reader.as_ref(), reader_deadline);
        let mut stderr = collect(stderr_reader.as_ref(), reader_deadline);

        // The child exited but something it started still holds a pipe.
        let lingering = !killed && (stdout.is_none() || stderr.is_none());
        if lingering {
            tracing::debug!("Output of {} still open at the deadline", self.display());
            kill_group(&child);
            let grace = grace_deadline();
            stdout = stdout.or_else(|| collect(stdout_reader.as_ref(), grace));
            stderr = stderr.or_else(|| collect(stderr_reader.as_ref(), grace));
        }

        let timed_out = killed || lingering;
        Ok(ExternalToolResult {
            stdout: stdout.unwrap_or_default(),
            stderr: stderr.unwrap_or_default(),
            exit_code: if timed_out { None } else { exit_code },
            timed_out,
        })
    }
}

fn wait_with_deadline(
    child: &mut Child,
    deadline: Option<Instant>,
) -> std::io::Result<(Option<i32>, bool)> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok((status.code(), false));
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            kill_group(child);
            // The child may exit between try_wait and kill.
            let _ = child.kill();
            child.wait()?;
            return Ok((None, true));
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

fn grace_deadline() -> Option<Instant> {
    Instant::now().checked_add(KILL_GRACE)
}

/// SIGKILL the child's process group.
#[cfg(unix)]
fn kill_group(child: &Child) {
    let Ok(pgid) = libc::pid_t::try_from(child.id()) else {
        return;
    };
    // SAFETY: kill(2) takes plain integers; a stale group id fails with ESRCH.
    unsafe {
        libc::kill(-pgid, libc::SIGKILL);
    }
}

#[cfg(not(unix))]
fn kill_group(_child: &Child) {}

fn spawn_reader<R>(source: Option<R>) -> Option<Receiver<Vec<u8>>>
where
    R: Read + Send + 'static,
{
    source.map(|mut source| {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = source.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
        rx
    })
}

/// Wait for a reader until `deadline`; `None` if it is still blocked.
fn collect(reader: Option<&Receiver<Vec<u8>>>, deadline: Option<Instant>) -> Option<String> {
    let Some(rx) = reader else {
        return Some(String::new());
    };
    let bytes = match deadline {
        Some(d) => match rx.recv_timeout(d.saturating_duration_since(Instant::now())) {
            Ok(bytes) => bytes,
            Err(RecvTimeoutError::Timeout) => return None,
            Err(RecvTimeoutError::Disconnected) => Vec::new(),
        },
        None => rx.recv().unwrap_or_default(),
    };
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str, timeout: Duration) -> ToolCommand {
        ToolCommand::new("sh", timeout).args(["-c", script])
    }

    #[test]
    fn test_captures_stdout_stderr_and_code() {
        let result = sh("echo out; echo err >&2; exit 3", Duration::from_secs(10))
            .run()
            .expect("sh runs");
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
        assert_eq!(result.exit_code, Some(3));
        assert!(!result.timed_out);
        assert!(!result.success());
    }

    #[test]
    fn test_success() {
        let result = sh("true", Duration::from_secs(10)).run().expect("sh runs");
        assert!(result.success());
    }

    #[test]
    fn test_timeout_kills_child() {
        let start = Instant::now();
        let result = sh("exec sleep 5", Duration::from_millis(200))
            .run()
            .expect("sh runs");
        assert!(result.timed_out);
        assert_eq!(result.exit_code, None);
        assert_eq!(result.exit_code_display(), "signal");
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_timeout_reaches_forked_children() {
        let start = Instant::now();
        let result = sh("sleep 4; echo done", Duration::from_millis(200))
            .run()
            .expect("sh runs");
        assert!(result.timed_out);
        assert!(!result.stdout.contains("done"));
        assert!(start.elapsed() < Duration::from_secs(3), "{:?}", start.elapsed());
    }

    #[test]
    fn test_background_child_holding_pipe_is_killed() {
        let start = Instant::now();
        let result = sh("sleep 4 & echo started", Duration::from_millis(300))
            .run()
            .expect("sh runs");
        assert!(result.timed_out);
        assert_eq!(result.exit_code, None);
        assert_eq!(result.stdout, "started\n");
        assert!(start.elapsed() < Duration::from_secs(3), "{:?}", start.elapsed());
    }

    #[test]
    fn test_huge_timeout_means_no_deadline() {
        let result = sh("true", Duration::from_secs(u64::MAX))
            .run()
            .expect("sh runs");
        assert!(result.success());
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = ToolCommand::new("diffsbom-no-such-program", Duration::from_secs(1))
            .run()
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_large_output_does_not_stall() {
        let result = sh("i=0; while [ $i -lt 20000 ]; do echo line$i; i=$((i+1)); done", Duration::from_secs(30))
            .run()
            .expect("sh runs");
        assert!(result.success());
        assert_eq!(result.stdout.lines().count(), 20000);
    }

    #[test]
    fn test_display() {
        let cmd = ToolCommand::new("syft", Duration::from_secs(1)).args(["scan", "."]);
        assert_eq!(cmd.display(), "syft scan .");
    }
}
