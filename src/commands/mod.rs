//! One function per subcommand. Results go to stdout; diagnostics go
//! through `tracing` to stderr.

pub mod hygiene;
pub mod network;

use crate::batch::{BatchOptions, run_scripts};
use crate::config::Config;
use crate::prompt;
use anyhow::{Context as _, Result};
use pathnet_core::Sheet;
use pathnet_core::storage::{BackupNaming, create_backup, write_markdown};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings shared by every command: the config file overlaid with the
/// global flags.
pub struct Context {
    pub config: Config,
    pub assume_yes: bool,
    pub has_header: bool,
    /// `None` when backups are off.
    pub backup: Option<BackupNaming>,
}

impl Context {
    pub(crate) fn new(config: Config, cli: &crate::Cli) -> Self {
        let has_header = config.tables.has_header && !cli.no_header;
        let backup = (config.backup.enabled && !cli.no_backup)
            .then(|| cli.backup_naming.unwrap_or(config.backup.naming));
        Context {
            config,
            assume_yes: cli.yes,
            has_header,
            backup,
        }
    }

    pub fn node_path(&self, arg: Option<PathBuf>) -> PathBuf {
        arg.unwrap_or_else(|| self.config.tables.node.clone())
    }

    pub fn edge_path(&self, arg: Option<PathBuf>) -> PathBuf {
        arg.unwrap_or_else(|| self.config.tables.edge.clone())
    }

    pub fn load(&self, path: &Path) -> Result<Sheet> {
        Sheet::load(path, self.has_header)
            .with_context(|| format!("Failed to load {}", path.display()))
    }

    pub fn confirm(&self, question: &str) -> Result<bool> {
        Ok(prompt::confirm(question, self.assume_yes)?)
    }

    /// Back up the table's file, then overwrite it.
    pub fn save_in_place(&self, sheet: &mut Sheet) -> Result<()> {
        if let (Some(naming), Some(path)) = (self.backup, sheet.path.as_deref()) {
            let backup = create_backup(path, naming)
                .with_context(|| format!("Failed to back up {}", path.display()))?;
            println!("Backup: {}", backup.display());
        }
        let saved = sheet
            .save(&self.config.retry)
            .with_context(|| format!("Failed to save {}", sheet.display_name()))?;
        println!("Saved {}", saved.display());
        Ok(())
    }

    /// Ask, then save. Returns whether the table was written.
    pub fn confirm_and_save(&self, sheet: &mut Sheet, question: &str) -> Result<bool> {
        if !self.confirm(question)? {
            println!("Cancelled; {} left unchanged.", sheet.display_name());
            return Ok(false);
        }
        self.save_in_place(sheet)?;
        Ok(true)
    }
}

pub fn export(ctx: &Context, file: &Path, output: &Path) -> Result<bool> {
    let sheet = ctx.load(file)?;
    write_markdown(output, &sheet)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Exported to {}", output.display());
    Ok(true)
}

/// Seconds to sleep between scripts. Negative, NaN and overflowing values
/// are rejected.
fn batch_delay(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).with_context(|| {
        format!("Invalid delay {}: expected a non-negative number of seconds", secs)
    })
}

pub fn run_batch(
    ctx: &Context,
    dir: &Path,
    delay: Option<f64>,
    stop_on_error: bool,
    include_self: bool,
) -> Result<bool> {
    let batch = &ctx.config.batch;
    let opts = BatchOptions {
        delay: batch_delay(delay.unwrap_or(batch.delay_secs))?,
        stop_on_error: stop_on_error || batch.stop_on_error,
        include_self,
        interpreters: batch.interpreters.clone(),
    };
    let summary = run_scripts(dir, &opts)?;
    Ok(summary.all_succeeded())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_delay_bounds() {
        assert_eq!(batch_delay(0.5).unwrap(), Duration::from_millis(500));
        assert_eq!(batch_delay(0.0).unwrap(), Duration::ZERO);
        assert!(batch_delay(-1.0).is_err());
        assert!(batch_delay(f64::NAN).is_err());
        assert!(batch_delay(1e30).is_err());
    }
}
