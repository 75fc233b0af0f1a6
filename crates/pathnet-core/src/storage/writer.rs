//! Writes that wait for a file held open by another program.
//!
//! Spreadsheet applications keep the tables they display locked. A write is
//! preceded by an open-for-append check; while the check (or the write
//! itself) is refused, the writer sleeps and tries again a bounded number
//! of times.

use crate::error::{PathnetError, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// How often and how patiently to retry a refused write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first one).
    pub attempts: u32,
    /// Sleep between attempts, in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay_ms: 2_000,
        }
    }
}

impl RetryPolicy {
    /// Set the maximum number of attempts.
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Set the delay between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn is_lock_error(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::PermissionDenied | ErrorKind::ResourceBusy | ErrorKind::WouldBlock
    ) || matches!(err.raw_os_error(), Some(32 | 33))
}

/// True when `path` does not exist yet or can be opened for append.
fn check_writable(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        return Ok(());
    }
    OpenOptions::new().append(true).open(path).map(|_| ())
}

fn write_once(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    check_writable(path)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(bytes)?;
    file.flush()
}

/// Run `attempt` until it succeeds, fails with something other than a lock
/// error, or `policy.attempts` runs out. `sleep` is called between attempts.
pub(crate) fn retry_locked<T>(
    path: &Path,
    policy: &RetryPolicy,
    mut attempt: impl FnMut() -> std::io::Result<T>,
    mut sleep: impl FnMut(Duration),
) -> Result<T> {
    let attempts = policy.attempts.max(1);
    for n in 1..=attempts {
        match attempt() {
            Ok(value) => {
                debug!(path = %path.display(), attempt = n, "wrote file");
                return Ok(value);
            }
            Err(e) if is_lock_error(&e) => {
                if n < attempts {
                    warn!(
                        path = %path.display(),
                        attempt = n,
                        "file is locked, retrying in {} ms",
                        policy.delay_ms
                    );
                    sleep(policy.delay());
                }
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(PathnetError::FileLocked {
        path: path.to_path_buf(),
        attempts,
    })
}

/// Write `bytes` to `path`, retrying while the file is locked.
pub fn write_with_retry(path: &Path, bytes: &[u8], policy: &RetryPolicy) -> Result<()> {
    retry_locked(path, policy, || write_once(path, bytes), std::thread::sleep)
}

/// Write text, creating the parent directory when needed.
pub fn write_text(path: &Path, text: &str, policy: &RetryPolicy) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    write_with_retry(path, text.as_bytes(), policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_new_and_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nodes.csv");
        let policy = RetryPolicy::default().with_attempts(1);

        write_with_retry(&path, b"a,b\n", &policy).unwrap();
        write_with_retry(&path, b"c\n", &policy).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "c\n");
    }

    #[test]
    fn test_write_text_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plans").join("layout.csv");
        write_text(&path, "name,x,y\n", &RetryPolicy::default()).unwrap();
        assert!(path.exists());
    }

    fn locked() -> std::io::Error {
        std::io::Error::from(ErrorKind::PermissionDenied)
    }

    fn policy(attempts: u32) -> RetryPolicy {
        RetryPolicy::default()
            .with_attempts(attempts)
            .with_delay(Duration::from_millis(250))
    }

    #[test]
    fn test_gives_up_after_attempts() {
        let mut calls = 0;
        let mut sleeps = Vec::new();
        let err = retry_locked(
            Path::new("locked.csv"),
            &policy(3),
            || -> std::io::Result<()> {
                calls += 1;
                Err(locked())
            },
            |d| sleeps.push(d),
        )
        .err()
        .unwrap();
        assert!(matches!(err, PathnetError::FileLocked { attempts: 3, .. }));
        assert_eq!(calls, 3);
        // no sleep after the last attempt
        assert_eq!(sleeps, vec![Duration::from_millis(250); 2]);
    }

    #[test]
    fn test_succeeds_once_lock_is_released() {
        let mut calls = 0;
        let mut sleeps = Vec::new();
        let written = retry_locked(
            Path::new("nodes.csv"),
            &policy(5),
            || {
                calls += 1;
                if calls <= 2 { Err(locked()) } else { Ok(calls) }
            },
            |d| sleeps.push(d),
        )
        .unwrap();
        assert_eq!(written, 3);
        assert_eq!(sleeps.len(), 2);
    }

    #[test]
    fn test_other_errors_are_not_retried() {
        let mut calls = 0;
        let err = retry_locked(
            Path::new("nodes.csv"),
            &policy(5),
            || -> std::io::Result<()> {
                calls += 1;
                Err(std::io::Error::from(ErrorKind::NotFound))
            },
            |_| panic!("slept on a non-lock error"),
        )
        .err()
        .unwrap();
        assert!(matches!(err, PathnetError::Io(_)));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let mut calls = 0;
        retry_locked(
            Path::new("nodes.csv"),
            &policy(0),
            || {
                calls += 1;
                Ok(())
            },
            |_| {},
        )
        .unwrap();
        assert_eq!(calls, 1);
    }
}
