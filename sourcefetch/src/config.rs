//! Tool settings.
//!
//! Settings are read from `.sourcefetch.toml` in the workspace. Every key is
//! optional; a missing file means all defaults.
//!
//! # Configuration File Format
//!
//! ```toml
//! remote = "https://github.com/${env:SDK_FORK}/amazon-freertos.git"
//! clone_parent = "${workspaceFolder}/../.."
//! merge_tool = ["python3", "merge_config.py"]
//! gui = ["guiconfig"]
//!
//! [[catalog]]
//! vendor = "espressif"
//! boards = ["esp32"]
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::{BoardCatalog, VendorEntry, default_entries};

/// Default settings file name, looked up in the workspace.
pub const SETTINGS_FILE: &str = ".sourcefetch.toml";

/// Everything about the external tools and the layout of the cloned tree.
///
/// String values may use `${workspaceFolder}` and `${env:NAME}`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Repository cloned into the output directory.
    pub remote: String,
    /// Directory the clone is created in. The default sits two levels above
    /// the workspace, outside the tool's checkout.
    pub clone_parent: String,
    /// Directory inside the clone that holds the SDK tree.
    pub tree_subdir: String,
    /// Configuration directory relative to the SDK tree.
    pub configuration_dir: String,
    /// Root of the tool's checkout, searched for board option files before
    /// cloning.
    pub defaults_root: String,
    /// Base Kconfig schema file name, resolved against the workspace before
    /// cloning and against the configuration directory afterwards.
    pub schema: String,
    /// Version-control client; `clone` and its arguments are appended.
    pub vcs: Vec<String>,
    /// Kconfig merge tool; schema, output and option files are appended.
    pub merge_tool: Vec<String>,
    /// Graphical configuration editor.
    pub gui: Vec<String>,
    /// Setup script run inside the configuration directory at the end.
    pub handoff: Vec<String>,
    /// Vendor/board list shown in the menus. The built-in list is used when
    /// absent.
    pub catalog: Option<Vec<VendorEntry>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remote: "https://github.com/ethan-tucker/amazon-freertos.git".to_string(),
            clone_parent: "${workspaceFolder}/../..".to_string(),
            tree_subdir: "amazon-freertos".to_string(),
            configuration_dir: "tools/configuration".to_string(),
            defaults_root: "${workspaceFolder}/..".to_string(),
            schema: "Kconfig".to_string(),
            vcs: vec!["git".to_string()],
            merge_tool: vec!["python".to_string(), "merge_config.py".to_string()],
            gui: vec!["guiconfig".to_string()],
            handoff: vec!["python".to_string(), "configure.py".to_string()],
            catalog: None,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults if it does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if a command list is empty.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("can not open settings file: {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("invalid settings file: {}", path.display()))?;
        settings.validate()?;

        info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for (name, cmd) in [
            ("vcs", &self.vcs),
            ("merge_tool", &self.merge_tool),
            ("gui", &self.gui),
            ("handoff", &self.handoff),
        ] {
            if cmd.first().is_none_or(|p| p.is_empty()) {
                bail!("setting `{name}` needs at least a program name");
            }
        }
        Ok(())
    }

    /// The catalog to offer, validated.
    pub fn catalog(&self) -> anyhow::Result<BoardCatalog> {
        match &self.catalog {
            Some(entries) => BoardCatalog::new(entries.clone()).context("invalid `catalog` setting"),
            None => BoardCatalog::new(default_entries()),
        }
    }
}

/// Path of the JSON schema written next to a settings file:
/// `.sourcefetch.toml` → `.sourcefetch-schema.json`.
pub fn schema_path_for(settings_path: &Path) -> PathBuf {
    let name = settings_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| ".sourcefetch".to_string());
    settings_path.with_file_name(format!("{name}-schema.json"))
}

/// Writes the JSON schema of [`Settings`] next to `settings_path` and
/// returns where it went.
pub fn write_schema(settings_path: &Path) -> anyhow::Result<PathBuf> {
    let schema = schemars::schema_for!(Settings);
    let content = serde_json::to_string_pretty(&schema)?;
    let path = schema_path_for(settings_path);
    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
