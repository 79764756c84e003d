//! Kconfig merging through the external merge tool.
//!
//! The tool is called as `<merge_tool...> <schema> <output> <option files...>`.
//! Later option files override earlier ones; the tool prints warnings for
//! values that could not be honoured. Its output goes straight to the
//! console.

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::{
    catalog::Selection,
    ctx::AppContext,
    locate::{legacy_defaults_file, locate_config_files},
};

/// One merge: base schema, output snapshot and the option files in
/// precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    /// Base Kconfig schema.
    pub schema: PathBuf,
    /// Snapshot to write.
    pub output: PathBuf,
    /// Option files, lowest precedence first.
    pub overrides: Vec<PathBuf>,
}

impl MergePlan {
    /// Appends a file with the highest precedence so far.
    pub fn push_override(&mut self, path: PathBuf) {
        self.overrides.push(path);
    }
}

impl AppContext {
    /// Runs the merge tool for `plan`, with `workdir` as its working
    /// directory.
    ///
    /// The tool needs at least one option file, so a plan without overrides
    /// is skipped and the existing output, if any, is left as it is.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be started or exits with a
    /// non-zero status.
    pub fn merge_config(&self, plan: &MergePlan, workdir: &Path) -> anyhow::Result<()> {
        if plan.overrides.is_empty() {
            info!(
                "no option files, keeping {} as it is",
                plan.output.display()
            );
            return Ok(());
        }

        info!(
            "merging {} option file(s) into {}",
            plan.overrides.len(),
            plan.output.display()
        );
        let mut cmd = self.command(&self.settings.merge_tool, workdir)?;
        cmd.arg(&plan.schema).arg(&plan.output).args(&plan.overrides);
        cmd.run()
    }

    /// Merges the board's defaults from the defaults root into the workspace
    /// snapshot, ready for the GUI pass.
    pub fn set_library_defaults(&self, selection: &Selection) -> anyhow::Result<MergePlan> {
        println!("{}", "\n-----Applying board defaults-----\n".bold());
        let root = self.defaults_root();
        let mut overrides: Vec<PathBuf> =
            legacy_defaults_file(&root, &selection.vendor, &selection.board)
                .into_iter()
                .collect();
        overrides.extend(locate_config_files(
            &selection.vendor,
            &selection.board,
            &root,
        )?);

        let plan = MergePlan {
            schema: self.schema(),
            output: self.snapshot(),
            overrides,
        };
        self.merge_config(&plan, &self.paths.workspace)?;
        Ok(plan)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::locate::{DEMO_CONFIG_DIR, board_dir};

    /// Stand-in merge tool: refuses to run without an option file, like the
    /// real one, then writes the option file list, one per line, into the
    /// output file.
    fn fake_merge_tool() -> Vec<String> {
        vec![
            "sh".into(),
            "-c".into(),
            concat!(
                r#"[ $# -ge 2 ] || { echo "usage: merge_config.py Kconfig merged_config config1"; exit 1; }; "#,
                r#"out="$1"; shift; printf '%s\n' "$@" > "$out""#
            )
            .into(),
        ]
    }

    /// Context whose workspace is `<tmp>/sourceFetcher/source`, so the
    /// defaults root is `<tmp>/sourceFetcher`.
    fn ctx(tmp: &TempDir) -> AppContext {
        let workspace = tmp.path().join("sourceFetcher").join("source");
        fs::create_dir_all(&workspace).unwrap();
        let mut ctx = AppContext::new(&workspace, None).unwrap();
        ctx.settings.merge_tool = fake_merge_tool();
        ctx
    }

    fn selection(vendor: &str, board: &str) -> Selection {
        Selection {
            vendor: vendor.into(),
            board: board.into(),
        }
    }

    #[test]
    fn test_merge_passes_files_in_order() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp);
        let plan = MergePlan {
            schema: ctx.schema(),
            output: tmp.path().join("merged"),
            overrides: vec!["a_Kconfig".into(), "b_Kconfig".into()],
        };

        ctx.merge_config(&plan, tmp.path()).unwrap();
        assert_eq!(
            fs::read_to_string(tmp.path().join("merged")).unwrap(),
            "a_Kconfig\nb_Kconfig\n"
        );
    }

    #[test]
    fn test_library_defaults_use_located_files() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp);
        let board = board_dir(&ctx.defaults_root(), "nuvoton", "numaker_iot_m487_wifi");
        fs::create_dir_all(board.join(DEMO_CONFIG_DIR)).unwrap();
        fs::write(board.join("Kconfig"), "").unwrap();
        fs::write(board.join(DEMO_CONFIG_DIR).join("mqtt_Kconfig"), "").unwrap();

        let plan = ctx
            .set_library_defaults(&selection("nuvoton", "numaker_iot_m487_wifi"))
            .unwrap();

        assert_eq!(plan.output, ctx.paths.workspace.join(".config"));
        assert_eq!(plan.overrides.len(), 2);
        let written = fs::read_to_string(ctx.snapshot()).unwrap();
        assert_eq!(
            written,
            format!(
                "{}\n{}\n",
                board.join("Kconfig").display(),
                board.join(DEMO_CONFIG_DIR).join("mqtt_Kconfig").display()
            )
        );
    }

    #[test]
    fn test_library_defaults_legacy_file_first() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp);
        let root = ctx.defaults_root();
        let legacy = root.join("vendors/pc/windows/KConfig");
        fs::create_dir_all(legacy.parent().unwrap()).unwrap();
        fs::write(&legacy, "CONFIG_PC=y\n").unwrap();
        let board = board_dir(&root, "pc", "windows");
        fs::create_dir_all(&board).unwrap();
        fs::write(board.join("Kconfig"), "").unwrap();

        let plan = ctx.set_library_defaults(&selection("pc", "windows")).unwrap();
        assert_eq!(plan.overrides, vec![legacy, board.join("Kconfig")]);
    }

    #[test]
    fn test_no_option_files_skips_merge() {
        let tmp = TempDir::new().unwrap();
        let ctx = ctx(&tmp);

        // no vendors tree at all: the tool would refuse to run
        let plan = ctx.set_library_defaults(&selection("pc", "linux")).unwrap();
        assert!(plan.overrides.is_empty());
        assert!(!ctx.snapshot().exists());

        // an existing snapshot is kept for the editor
        fs::write(ctx.snapshot(), "CONFIG_KEEP=y\n").unwrap();
        ctx.set_library_defaults(&selection("pc", "linux")).unwrap();
        assert_eq!(fs::read_to_string(ctx.snapshot()).unwrap(), "CONFIG_KEEP=y\n");
    }

    #[test]
    fn test_merge_failure_propagates() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = ctx(&tmp);
        ctx.settings.merge_tool = vec!["sh".into(), "-c".into(), "exit 1".into()];
        let plan = MergePlan {
            schema: ctx.schema(),
            output: ctx.snapshot(),
            overrides: vec!["a_Kconfig".into()],
        };
        assert!(ctx.merge_config(&plan, tmp.path()).is_err());
    }
}
