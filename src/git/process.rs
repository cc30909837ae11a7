//! git::process
//!
//! Bounded invocation of the `git` binary for network operations.
//!
//! Push and fetch go through the user's installed git so that their
//! credential helpers, SSH agent and `insteadOf` rules all apply. Each call
//! is bounded by a deadline; a process that outlives it is killed.
//! `GIT_TERMINAL_PROMPT=0` keeps git from blocking on a credential prompt.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::capability::{FailureKind, RemoteFailure};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run `git <args>` in `work_dir`, failing if it does not exit successfully
/// within `timeout`.
pub(crate) fn run_remote(
    work_dir: &Path,
    args: &[&str],
    timeout: Duration,
) -> Result<(), RemoteFailure> {
    tracing::debug!(?args, dir = %work_dir.display(), "running git");

    let mut child = Command::new("git")
        .args(args)
        .current_dir(work_dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| RemoteFailure::new(FailureKind::Other, format!("cannot run git: {}", e)))?;

    // Drain stderr on its own thread so a chatty git never blocks on a full
    // pipe while we poll for exit.
    let stderr_reader = child.stderr.take().map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = pipe.read_to_string(&mut buf);
            buf
        })
    });

    let started = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if started.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    tracing::debug!(?args, ?timeout, "git timed out");
                    return Err(RemoteFailure::new(
                        FailureKind::Timeout,
                        format!(
                            "git {} timed out after {}s",
                            args.first().copied().unwrap_or_default(),
                            timeout.as_secs()
                        ),
                    ));
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                let _ = child.kill();
                return Err(RemoteFailure::new(
                    FailureKind::Other,
                    format!("waiting for git failed: {}", e),
                ));
            }
        }
    };

    let stderr = stderr_reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();

    if status.success() {
        return Ok(());
    }

    let failure = RemoteFailure::new(classify_failure(&stderr), last_line(&stderr));
    tracing::debug!(?args, code = ?status.code(), %failure, "git failed");
    Err(failure)
}

/// Map git's stderr to a failure kind.
pub(crate) fn classify_failure(stderr: &str) -> FailureKind {
    let text = stderr.to_ascii_lowercase();

    const AUTH: &[&str] = &[
        "authentication failed",
        "permission denied",
        "could not read username",
        "could not read password",
        "terminal prompts disabled",
        "invalid username or password",
        "403",
    ];
    const NETWORK: &[&str] = &[
        "could not resolve host",
        "could not resolve hostname",
        "connection refused",
        "connection timed out",
        "network is unreachable",
        "no route to host",
        "failed to connect",
        "unable to access",
        "connection reset",
        "could not read from remote repository",
    ];
    const REJECTED: &[&str] = &[
        "[rejected]",
        "[remote rejected]",
        "non-fast-forward",
        "pre-receive hook declined",
    ];

    if AUTH.iter().any(|p| text.contains(p)) {
        FailureKind::Auth
    } else if REJECTED.iter().any(|p| text.contains(p)) {
        FailureKind::Rejected
    } else if NETWORK.iter().any(|p| text.contains(p)) {
        FailureKind::Network
    } else {
        FailureKind::Other
    }
}

fn last_line(stderr: &str) -> String {
    stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("hint:"))
        .last()
        .unwrap_or("")
        .to_string()
}
