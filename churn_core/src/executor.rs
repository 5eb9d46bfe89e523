use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Outcome classification for a single target run.
///
/// Launch, pipe, and wait failures all fold into [`RunStatus::LaunchError`]
/// rather than propagating: a broken run is a per-candidate condition, never
/// a reason to abort the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// The target exited with status 0.
    Ok,
    /// The target exited with the given non-zero status code. A signal death
    /// on Unix is mapped to `128 + signal`, mirroring shell convention.
    NonZeroExit(i32),
    /// The target exceeded the configured deadline and was killed.
    Timeout,
    /// The target could not be spawned, fed input, or waited on.
    LaunchError(String),
}

impl RunStatus {
    /// True for every status except a clean zero exit.
    pub fn is_abnormal(&self) -> bool {
        !matches!(self, RunStatus::Ok)
    }
}

/// Result of one target run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub status: RunStatus,
    /// Everything the target wrote to stdout followed by everything it wrote
    /// to stderr, lossily decoded. The two streams are captured on separate
    /// pipes and concatenated, so temporal interleaving between them is not
    /// preserved in the transcript.
    pub combined_output: String,
}

/// Settings for spawning the target through the host shell.
#[derive(Debug, Clone)]
pub struct ShellCommandConfig {
    /// The command line handed verbatim to `sh -c` (or `cmd.exe /c`).
    pub command_line: String,
    /// Working directory for every spawned target process.
    pub working_dir: PathBuf,
    /// Per-process deadline; the target is killed once it elapses.
    pub timeout: Duration,
}

/// Runs one fresh target process per candidate input, delivering the
/// candidate on stdin and capturing stdout and stderr.
pub struct ShellExecutor {
    config: ShellCommandConfig,
}

impl ShellExecutor {
    pub fn new(config: ShellCommandConfig) -> Self {
        Self { config }
    }

    /// The argv actually spawned: the platform shell wrapping the configured
    /// command line.
    pub fn command_tokens(&self) -> Vec<String> {
        if cfg!(windows) {
            vec![
                "cmd.exe".to_string(),
                "/c".to_string(),
                self.config.command_line.clone(),
            ]
        } else {
            vec![
                "sh".to_string(),
                "-c".to_string(),
                self.config.command_line.clone(),
            ]
        }
    }

    /// Executes the target once with `input` on stdin.
    ///
    /// All three pipes are serviced on background threads: both output pipes
    /// are drained so a target that fills a pipe buffer early cannot
    /// deadlock against the harness, and the stdin write runs off-thread so
    /// a candidate larger than the pipe buffer cannot stall the harness on a
    /// target that never reads its input. The writer closes stdin when done
    /// to signal end-of-input. The kill-on-timeout poll loop therefore
    /// bounds the whole run, not just the portion after input delivery.
    pub fn execute(&self, input: &str) -> RunOutcome {
        let tokens = self.command_tokens();
        let mut cmd = Command::new(&tokens[0]);
        cmd.args(&tokens[1..])
            .current_dir(&self.config.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return RunOutcome {
                    status: RunStatus::LaunchError(format!(
                        "Failed to spawn command {tokens:?}: {e}"
                    )),
                    combined_output: String::new(),
                };
            }
        };

        let stdout_drain = spawn_pipe_drain(child.stdout.take());
        let stderr_drain = spawn_pipe_drain(child.stderr.take());

        let mut write_error: Option<String> = None;
        let stdin_writer = match child.stdin.take() {
            Some(mut child_stdin) => {
                let payload = input.as_bytes().to_vec();
                Some(thread::spawn(move || -> Option<String> {
                    let result = child_stdin.write_all(&payload);
                    // Dropping the handle closes the pipe: end-of-input.
                    match result {
                        // A target that exits without reading stdin closes
                        // the pipe under us; that alone does not make the
                        // run a communication failure.
                        Err(e) if e.kind() != ErrorKind::BrokenPipe => {
                            Some(format!("Failed to write candidate to stdin: {e}"))
                        }
                        _ => None,
                    }
                }))
            }
            None => {
                write_error = Some("Child stdin was not available after piping".to_string());
                None
            }
        };

        let wait_result = self.wait_with_timeout(&mut child);

        // The writer unblocks once the target exits or is killed (the read
        // end of the pipe is gone), so joining here cannot hang.
        if let Some(handle) = stdin_writer {
            if write_error.is_none() {
                write_error = handle.join().ok().flatten();
            }
        }

        let mut combined = drained_bytes(stdout_drain);
        combined.extend(drained_bytes(stderr_drain));
        let combined_output = String::from_utf8_lossy(&combined).into_owned();

        let status = match wait_result {
            Ok(exit) if exit.success() => match write_error {
                Some(msg) => RunStatus::LaunchError(msg),
                None => RunStatus::Ok,
            },
            Ok(exit) => {
                let code = match exit.code() {
                    Some(code) => code,
                    None => {
                        #[cfg(unix)]
                        {
                            use std::os::unix::process::ExitStatusExt;
                            exit.signal().map_or(-1, |signal| 128 + signal)
                        }
                        #[cfg(not(unix))]
                        {
                            -1
                        }
                    }
                };
                RunStatus::NonZeroExit(code)
            }
            Err(status) => status,
        };

        RunOutcome {
            status,
            combined_output,
        }
    }

    fn wait_with_timeout(&self, child: &mut Child) -> Result<std::process::ExitStatus, RunStatus> {
        let start_time = Instant::now();

        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {
                    if start_time.elapsed() > self.config.timeout {
                        if let Err(e) = child.kill() {
                            return Err(RunStatus::LaunchError(format!(
                                "Failed to kill timed-out target: {e}"
                            )));
                        }
                        // Reap the killed child so the drain threads see EOF.
                        let _ = child.wait();
                        return Err(RunStatus::Timeout);
                    }
                    thread::sleep(Duration::from_millis(10));
                }
                Err(e) => {
                    return Err(RunStatus::LaunchError(format!(
                        "Error waiting for target: {e}"
                    )));
                }
            }
        }
    }
}

fn spawn_pipe_drain<S>(pipe: Option<S>) -> Option<thread::JoinHandle<Vec<u8>>>
where
    S: Read + Send + 'static,
{
    pipe.map(|mut stream| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = stream.read_to_end(&mut buffer);
            buffer
        })
    })
}

fn drained_bytes(handle: Option<thread::JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
