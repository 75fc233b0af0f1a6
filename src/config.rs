//! `pathnet.toml`: defaults for every command.
//!
//! Problems with the file never stop a command. They are returned as
//! warnings and the built-in defaults are used instead.

use directories::ProjectDirs;
use pathnet_core::storage::{BackupNaming, DEFAULT_LEDGER_FILE, RetryPolicy};
use pathnet_engine::layout::{LayoutParams, LayoutStrategy};
use pathnet_engine::style::StyleRules;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "pathnet.toml";
const MAX_CONFIG_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub tables: TablesConfig,
    pub backup: BackupConfig,
    pub retry: RetryPolicy,
    pub layout: LayoutConfig,
    pub style: StyleRules,
    pub batch: BatchConfig,
}

/// Tables used when a command is given no paths.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TablesConfig {
    pub node: PathBuf,
    pub edge: PathBuf,
    pub has_header: bool,
}

impl Default for TablesConfig {
    fn default() -> Self {
        TablesConfig {
            node: PathBuf::from("node table.csv"),
            edge: PathBuf::from("edge table.csv"),
            has_header: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackupConfig {
    pub enabled: bool,
    pub naming: BackupNaming,
}

impl Default for BackupConfig {
    fn default() -> Self {
        BackupConfig {
            enabled: true,
            naming: BackupNaming::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub strategy: LayoutStrategy,
    /// File listing node ids that already have a position.
    pub ledger: PathBuf,
    pub params: LayoutParams,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            strategy: LayoutStrategy::default(),
            ledger: PathBuf::from(DEFAULT_LEDGER_FILE),
            params: LayoutParams::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Pause between two scripts.
    pub delay_secs: f64,
    pub stop_on_error: bool,
    /// Program that runs files with a given extension. Executable files
    /// with other extensions are run directly.
    pub interpreters: BTreeMap<String, String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            delay_secs: 0.0,
            stop_on_error: false,
            interpreters: BTreeMap::from([
                ("py".to_string(), "python3".to_string()),
                ("sh".to_string(), "sh".to_string()),
            ]),
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "pathnet")?;
    Some(proj.config_dir().join(CONFIG_FILE))
}

/// Load `explicit` or, without it, the user config file.
/// A missing user config is not a problem; a missing explicit one is.
pub fn load_config(explicit: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();
    let Some(path) = explicit.map(Path::to_path_buf).or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if explicit.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    match read_config(&path) {
        Ok(config) => (config, warnings),
        Err(err) => {
            warnings.push(err);
            (Config::default(), warnings)
        }
    }
}

fn read_config(path: &Path) -> Result<Config, String> {
    let meta = std::fs::metadata(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    if meta.len() > MAX_CONFIG_BYTES {
        return Err(format!(
            "Ignoring {}: config too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_CONFIG_BYTES
        ));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    toml::from_str(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let file = write_config(
            "[tables]\nnode = \"nodes.csv\"\n\n[retry]\nattempts = 5\n\n\
             [layout]\nstrategy = \"radial\"\n\n[layout.params]\nmin_cycle_len = 7\n",
        );
        let (config, warnings) = load_config(Some(file.path()));
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(config.tables.node, PathBuf::from("nodes.csv"));
        assert_eq!(config.tables.edge, PathBuf::from("edge table.csv"));
        assert_eq!(config.retry.attempts, 5);
        assert_eq!(config.retry.delay_ms, 2_000);
        assert_eq!(config.layout.strategy, LayoutStrategy::Radial);
        assert_eq!(config.layout.params.min_cycle_len, 7);
        assert_eq!(config.layout.params.main_radius, 300.0);
    }

    #[test]
    fn test_unknown_key_falls_back_with_warning() {
        let file = write_config("[backup]\nenabeld = false\n");
        let (config, warnings) = load_config(Some(file.path()));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Failed to parse"));
        assert!(config.backup.enabled);
    }

    #[test]
    fn test_style_rules_from_toml() {
        let file = write_config(
            "[style.node_shapes]\nenzyme = \"ELLIPSE\"\n\n[backup]\nnaming = \"suffix\"\n",
        );
        let (config, warnings) = load_config(Some(file.path()));
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(config.style.node_shapes.get("enzyme").unwrap(), "ELLIPSE");
        assert_eq!(config.backup.naming, BackupNaming::Suffix);
    }

    #[test]
    fn test_style_tables_merge_over_defaults() {
        let file = write_config(
            "[style.node_shapes]\nEnzyme = \"ELLIPSE\"\n\n\
             [style.arrows.inhibit]\ntarget_shape = \"CIRCLE\"\n",
        );
        let (config, warnings) = load_config(Some(file.path()));
        assert!(warnings.is_empty(), "{:?}", warnings);
        let defaults = StyleRules::default();
        let shapes = &config.style.node_shapes;
        assert_eq!(shapes.len(), defaults.node_shapes.len());
        assert_eq!(shapes.get("Enzyme").unwrap(), "ELLIPSE");
        assert!(shapes.get("enzyme").is_none());
        assert_eq!(shapes.get("drug").unwrap(), "HEXAGON");
        // a replaced entry starts from the field defaults, not the old entry
        let inhibit = &config.style.arrows["inhibit"];
        assert_eq!(inhibit.target_shape, "CIRCLE");
        assert_eq!(inhibit.color, None);
        assert!(config.style.arrows.contains_key("activate"));
        assert_eq!(config.style.line_types, defaults.line_types);
    }

    #[test]
    fn test_missing_explicit_config_warns() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(Some(&dir.path().join("nope.toml")));
        assert_eq!(warnings.len(), 1);
        assert_eq!(config, Config::default());
    }
}
