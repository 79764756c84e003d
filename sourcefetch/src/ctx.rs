//! Application context.
//!
//! [`AppContext`] carries the workspace location and settings, and turns
//! setting values into concrete paths and commands. All paths are absolute
//! or workspace-relative; the process working directory is never changed.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    config::{SETTINGS_FILE, Settings},
    utils::{ToolCommand, replace_env_placeholders},
};

/// Name of the merged configuration snapshot.
pub const SNAPSHOT_FILE: &str = ".config";

/// Name of the board-choice record.
pub const BOARD_CHOICE_FILE: &str = "boardChoice.csv";

/// Path configuration.
#[derive(Default, Clone)]
pub struct PathConfig {
    /// The tool's own directory: holds the base schema, the merge script and
    /// the pre-clone snapshot.
    pub workspace: PathBuf,
    /// Settings file the context was loaded from.
    pub settings: PathBuf,
}

/// Paths inside one cloned SDK tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClonedTree {
    /// The directory created by the clone.
    pub clone_dir: PathBuf,
    /// SDK root inside the clone, searched for board option files.
    pub tree_root: PathBuf,
    /// Configuration directory receiving `.config` and `boardChoice.csv`.
    pub config_dir: PathBuf,
}

impl ClonedTree {
    /// The merged snapshot inside the tree.
    pub fn snapshot(&self) -> PathBuf {
        self.config_dir.join(SNAPSHOT_FILE)
    }

    /// The board-choice record inside the tree.
    pub fn board_choice(&self) -> PathBuf {
        self.config_dir.join(BOARD_CHOICE_FILE)
    }
}

/// State shared by every step of a run.
#[derive(Default, Clone)]
pub struct AppContext {
    /// Workspace and settings locations.
    pub paths: PathConfig,
    /// Loaded settings.
    pub settings: Settings,
}

impl AppContext {
    /// Builds a context for `workspace`, reading settings from
    /// `settings_path` or `<workspace>/.sourcefetch.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the workspace does not exist or the settings file
    /// is invalid.
    pub fn new(workspace: &Path, settings_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let workspace = workspace
            .canonicalize()
            .with_context(|| format!("workspace not found: {}", workspace.display()))?;
        let settings_path = settings_path.unwrap_or_else(|| workspace.join(SETTINGS_FILE));
        let settings = Settings::load(&settings_path)?;

        debug!("workspace: {}", workspace.display());
        Ok(Self {
            paths: PathConfig {
                workspace,
                settings: settings_path,
            },
            settings,
        })
    }

    /// Expands `${workspaceFolder}` and `${env:NAME}` in a setting value.
    pub fn value_replace_with_var<S>(&self, value: S) -> String
    where
        S: AsRef<std::ffi::OsStr>,
    {
        let raw = value.as_ref().to_string_lossy();
        let raw = raw.replace(
            "${workspaceFolder}",
            format!("{}", self.paths.workspace.display()).as_ref(),
        );
        replace_env_placeholders(&raw)
    }

    /// Expands a path setting and anchors relative results at the workspace.
    pub fn resolve_path(&self, value: &str) -> PathBuf {
        let path = PathBuf::from(self.value_replace_with_var(value));
        if path.is_relative() {
            self.paths.workspace.join(path)
        } else {
            path
        }
    }

    /// Creates a command for a configured program list (program followed by
    /// fixed arguments), run in `workdir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `argv` is empty.
    pub fn command(&self, argv: &[String], workdir: &Path) -> anyhow::Result<ToolCommand> {
        let (program, fixed) = argv
            .split_first()
            .ok_or_else(|| anyhow!("empty command in settings"))?;
        let this = self.clone();
        let mut cmd = ToolCommand::new(program, workdir, move |s| this.value_replace_with_var(s));
        cmd.setting_args(fixed);
        cmd.env("WORKSPACE_FOLDER", self.paths.workspace.display().to_string());
        Ok(cmd)
    }

    /// Base schema in the workspace.
    pub fn schema(&self) -> PathBuf {
        self.resolve_path(&self.settings.schema)
    }

    /// Snapshot produced by the pre-clone merge and edited in the GUI.
    pub fn snapshot(&self) -> PathBuf {
        self.paths.workspace.join(SNAPSHOT_FILE)
    }

    /// Root searched for board option files before cloning.
    pub fn defaults_root(&self) -> PathBuf {
        self.resolve_path(&self.settings.defaults_root)
    }

    /// Directory clones are created in.
    pub fn clone_parent(&self) -> PathBuf {
        self.resolve_path(&self.settings.clone_parent)
    }

    /// Paths of the tree cloned into `output_dir`.
    pub fn cloned_tree(&self, output_dir: &str) -> ClonedTree {
        let clone_dir = self.clone_parent().join(output_dir);
        let tree_root = clone_dir.join(self.value_replace_with_var(&self.settings.tree_subdir));
        let config_dir =
            tree_root.join(self.value_replace_with_var(&self.settings.configuration_dir));
        ClonedTree {
            clone_dir,
            tree_root,
            config_dir,
        }
    }
}
