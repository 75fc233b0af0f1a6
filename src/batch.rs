//! Sequential script runner.
//!
//! Scripts run one at a time with their directory as working directory.
//! A script is a regular file that is executable or whose extension has a
//! configured interpreter. Order is by file name.

use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone, Debug, Default)]
pub struct BatchOptions {
    pub delay: Duration,
    pub stop_on_error: bool,
    /// Run this program too when it sits in the directory.
    pub include_self: bool,
    pub interpreters: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    /// Scripts started; fewer than `total` after a stop on error.
    pub ran: usize,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.succeeded == self.total
    }
}

#[cfg(unix)]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &std::fs::Metadata) -> bool {
    false
}

fn interpreter_for<'a>(path: &Path, opts: &'a BatchOptions) -> Option<&'a str> {
    let ext = path.extension()?.to_str()?;
    opts.interpreters
        .iter()
        .find(|(e, _)| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
        .map(|(_, program)| program.as_str())
}

/// Scripts in `dir`, sorted by file name.
pub fn list_scripts(dir: &Path, opts: &BatchOptions) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Not a directory: {}", dir.display());
    }
    let this_exe = if opts.include_self {
        None
    } else {
        std::env::current_exe().ok().and_then(|p| p.canonicalize().ok())
    };

    let mut scripts = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))? {
        let path = entry?.path();
        let Ok(meta) = std::fs::metadata(&path) else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        if interpreter_for(&path, opts).is_none() && !is_executable(&meta) {
            continue;
        }
        if let Some(exe) = &this_exe {
            if path.canonicalize().is_ok_and(|p| &p == exe) {
                debug!(path = %path.display(), "skipping the running program");
                continue;
            }
        }
        scripts.push(path);
    }
    scripts.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(scripts)
}

fn command_for(path: &Path, opts: &BatchOptions) -> Command {
    match interpreter_for(path, opts) {
        Some(program) => {
            let mut cmd = Command::new(program);
            cmd.arg(path);
            cmd
        }
        None => Command::new(path),
    }
}

/// Run every script in `dir`, printing progress to stdout.
pub fn run_scripts(dir: &Path, opts: &BatchOptions) -> Result<BatchSummary> {
    let dir = &dir
        .canonicalize()
        .with_context(|| format!("Cannot open {}", dir.display()))?;
    let scripts = list_scripts(dir, opts)?;
    let mut summary = BatchSummary {
        total: scripts.len(),
        ..BatchSummary::default()
    };
    if scripts.is_empty() {
        println!("No scripts in {}.", dir.display());
        return Ok(summary);
    }

    println!("{} scripts, in this order:", scripts.len());
    for (i, script) in scripts.iter().enumerate() {
        println!("{}. {}", i + 1, file_name(script));
    }

    for (i, script) in scripts.iter().enumerate() {
        let name = file_name(script);
        println!("[{}/{}] {}", i + 1, scripts.len(), name);
        summary.ran += 1;

        let ok = match command_for(script, opts).current_dir(dir).status() {
            Ok(status) if status.success() => {
                println!("ok: {}", name);
                true
            }
            Ok(status) => {
                let code = status
                    .code()
                    .map_or_else(|| "signal".to_string(), |c| c.to_string());
                println!("failed: {} (exit code {})", name, code);
                false
            }
            Err(err) => {
                warn!(script = %name, "could not start: {}", err);
                println!("failed: {} ({})", name, err);
                false
            }
        };
        if ok {
            summary.succeeded += 1;
        } else if opts.stop_on_error {
            println!("Stopping after the first failure.");
            break;
        }

        if !opts.delay.is_zero() && i + 1 < scripts.len() {
            debug!(delay = ?opts.delay, "waiting before the next script");
            std::thread::sleep(opts.delay);
        }
    }

    println!("Succeeded: {}/{}", summary.succeeded, summary.total);
    Ok(summary)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
