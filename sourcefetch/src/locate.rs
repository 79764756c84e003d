//! Discovery of layered Kconfig option files for a board.
//!
//! A board can carry option files at two levels:
//!
//! ```text
//! <root>/vendors/<vendor>/boards/<board>/*Kconfig                          board defaults
//! <root>/vendors/<vendor>/boards/<board>/aws_demos/config_files/*Kconfig   demo options
//! ```
//!
//! The returned list is in merge order: board-level files first, demo files
//! second, each level sorted by path so the precedence does not depend on
//! directory enumeration order.

use std::path::{Path, PathBuf};

use anyhow::Context;
use glob::{Pattern, glob};

/// File name suffix shared by every option file.
pub const KCONFIG_SUFFIX: &str = "Kconfig";

/// Demo option directory relative to a board directory.
pub const DEMO_CONFIG_DIR: &str = "aws_demos/config_files";

/// Directory holding a board's files under `root`.
pub fn board_dir(root: &Path, vendor: &str, board: &str) -> PathBuf {
    root.join("vendors").join(vendor).join("boards").join(board)
}

/// Board defaults file in the tool's own tree, `<root>/vendors/<vendor>/<board>/KConfig`.
///
/// This flat layout predates the per-board option directories and is only
/// searched before cloning.
pub fn legacy_defaults_file(root: &Path, vendor: &str, board: &str) -> Option<PathBuf> {
    let path = root.join("vendors").join(vendor).join(board).join("KConfig");
    path.is_file().then_some(path)
}

/// Lists the option files for `vendor`/`board` under `root` in merge order.
///
/// A board without option files yields an empty list.
///
/// # Errors
///
/// Returns an error if a path cannot be turned into a glob pattern or a
/// matched entry cannot be read.
pub fn locate_config_files(vendor: &str, board: &str, root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let board_dir = board_dir(root, vendor, board);
    let demo_dir = board_dir.join(DEMO_CONFIG_DIR);

    let mut files = matching_files(&board_dir)?;
    files.extend(matching_files(&demo_dir)?);

    debug!(
        "{} option file(s) for {vendor}/{board} under {}",
        files.len(),
        root.display()
    );
    for file in &files {
        trace!("  {}", file.display());
    }

    Ok(files)
}

/// Regular files directly in `dir` whose names end in [`KCONFIG_SUFFIX`].
fn matching_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*{KCONFIG_SUFFIX}",
        Pattern::escape(&dir.to_string_lossy())
    );

    let mut files = Vec::new();
    for entry in glob(&pattern).with_context(|| format!("bad search pattern `{pattern}`"))? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
