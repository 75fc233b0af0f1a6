//! Sibling copies written before a table is changed in place.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// How backup files are named.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupNaming {
    /// `<stem>_backup.<ext>`, overwritten by the next backup
    Suffix,
    /// `<stem>_backup_YYYYMMDD_HHMMSS.<ext>`
    #[default]
    Timestamp,
}

impl FromStr for BackupNaming {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "suffix" => Ok(BackupNaming::Suffix),
            "timestamp" | "timestamped" => Ok(BackupNaming::Timestamp),
            other => Err(format!("Unknown backup naming: {}", other)),
        }
    }
}

impl fmt::Display for BackupNaming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupNaming::Suffix => f.write_str("suffix"),
            BackupNaming::Timestamp => f.write_str("timestamp"),
        }
    }
}

/// Path the backup of `path` gets under `naming`, using `stamp` for the
/// timestamped form.
pub fn backup_path(path: &Path, naming: BackupNaming, stamp: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match naming {
        BackupNaming::Suffix => format!("{}_backup", stem),
        BackupNaming::Timestamp => format!("{}_backup_{}", stem, stamp),
    };
    let file_name = match path.extension() {
        Some(ext) => format!("{}.{}", name, ext.to_string_lossy()),
        None => name,
    };
    path.with_file_name(file_name)
}

/// Copy `path` next to itself and return the copy's path.
pub fn create_backup(path: &Path, naming: BackupNaming) -> Result<PathBuf> {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let target = backup_path(path, naming, &stamp);
    std::fs::copy(path, &target)?;
    info!(backup = %target.display(), "backup written");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_names() {
        let p = Path::new("/data/nodes.csv");
        assert_eq!(
            backup_path(p, BackupNaming::Suffix, "x"),
            PathBuf::from("/data/nodes_backup.csv")
        );
        assert_eq!(
            backup_path(p, BackupNaming::Timestamp, "20250101_120000"),
            PathBuf::from("/data/nodes_backup_20250101_120000.csv")
        );
        assert_eq!(
            backup_path(Path::new("edges"), BackupNaming::Suffix, ""),
            PathBuf::from("edges_backup")
        );
    }

    #[test]
    fn test_create_backup_copies_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edges.csv");
        std::fs::write(&path, "SOURCE,TARGET\nA,B\n").unwrap();

        let copy = create_backup(&path, BackupNaming::Timestamp).unwrap();
        let name = copy.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("edges_backup_"));
        assert!(name.ends_with(".csv"));
        // edges_backup_ + YYYYMMDD_HHMMSS + .csv
        assert_eq!(name.len(), "edges_backup_".len() + 15 + 4);
        assert_eq!(std::fs::read(&copy).unwrap(), std::fs::read(&path).unwrap());
    }

    #[test]
    fn test_naming_parse() {
        assert_eq!("Suffix".parse::<BackupNaming>(), Ok(BackupNaming::Suffix));
        assert!("dated".parse::<BackupNaming>().is_err());
    }
}
