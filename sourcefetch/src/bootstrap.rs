//! Output tree bootstrapping and the end-to-end setup flow.
//!
//! After the board is chosen and its features edited, the SDK is cloned next
//! to the workspace, the snapshot is regenerated inside the clone, the board
//! choice is recorded and the SDK's own configuration script takes over.
//! Each step runs once, in order; a failure stops the run where it is.

use std::io::{BufRead, Write};

use anyhow::Context;
use colored::Colorize;

use crate::{
    catalog::{BoardCatalog, Selection},
    ctx::{AppContext, ClonedTree},
    locate::locate_config_files,
    menu::Prompter,
    merge::MergePlan,
};

/// Answers that would otherwise be asked on the console.
#[derive(Debug, Default, Clone)]
pub struct SetupOptions {
    /// Vendor to use instead of the vendor menu.
    pub vendor: Option<String>,
    /// Board to use instead of the board menu. Requires `vendor`.
    pub board: Option<String>,
    /// Output directory name to use instead of asking.
    pub output: Option<String>,
    /// Skip the GUI editing pass.
    pub skip_gui: bool,
}

/// Writes `vendor,board` to the tree's board-choice record, replacing any
/// previous content.
pub fn write_board_choice(tree: &ClonedTree, selection: &Selection) -> anyhow::Result<()> {
    let path = tree.board_choice();
    std::fs::write(&path, selection.record())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("recorded board choice `{}` in {}", selection.record(), path.display());
    Ok(())
}

impl AppContext {
    /// Clones the SDK into `<clone_parent>/<output_dir>`, submodules
    /// included.
    ///
    /// # Errors
    ///
    /// Returns an error if the version-control client fails.
    pub fn clone_source(&self, output_dir: &str) -> anyhow::Result<ClonedTree> {
        println!("{}", "\n-----Cloning FreeRTOS Repository-----\n".bold());
        let parent = self.clone_parent();
        std::fs::create_dir_all(&parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;

        let mut cmd = self.command(&self.settings.vcs, &parent)?;
        cmd.arg("clone")
            .setting_arg(&self.settings.remote)
            .arg("--recurse-submodules")
            .arg(output_dir);
        cmd.run()?;

        let tree = self.cloned_tree(output_dir);
        if !tree.config_dir.is_dir() {
            bail!(
                "cloned tree has no configuration directory at {}",
                tree.config_dir.display()
            );
        }
        Ok(tree)
    }

    /// Regenerates the snapshot inside `tree` and records the board choice.
    ///
    /// The merge uses the tree's schema and its board option files, with the
    /// edited workspace snapshot applied last so the GUI choices win.
    pub fn update_board_chosen(
        &self,
        selection: &Selection,
        tree: &ClonedTree,
    ) -> anyhow::Result<MergePlan> {
        let mut plan = MergePlan {
            schema: tree
                .config_dir
                .join(self.value_replace_with_var(&self.settings.schema)),
            output: tree.snapshot(),
            overrides: locate_config_files(&selection.vendor, &selection.board, &tree.tree_root)?,
        };

        let edited = self.snapshot();
        if edited.is_file() {
            plan.push_override(edited);
        } else {
            warn!(
                "no edited snapshot at {}, using board defaults only",
                edited.display()
            );
        }

        self.merge_config(&plan, &tree.config_dir)?;
        write_board_choice(tree, selection)?;
        Ok(plan)
    }

    /// Runs the SDK's configuration script inside the tree.
    pub fn call_configuration_script(&self, tree: &ClonedTree) -> anyhow::Result<()> {
        println!("{}", "\n-----Handing off to the SDK configuration-----\n".bold());
        let mut cmd = self.command(&self.settings.handoff, &tree.config_dir)?;
        cmd.run()
    }

    /// Clone, regenerate, record and hand off, for an already chosen board
    /// and output directory name.
    pub fn bootstrap(&self, selection: &Selection, output_dir: &str) -> anyhow::Result<ClonedTree> {
        let tree = self.clone_source(output_dir)?;
        self.update_board_chosen(selection, &tree)?;
        self.call_configuration_script(&tree)?;
        Ok(tree)
    }

    /// The whole interactive setup.
    pub fn run_setup<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
        opts: &SetupOptions,
    ) -> anyhow::Result<ClonedTree> {
        let catalog = self.settings.catalog()?;
        let selection = choose_board(&catalog, prompter, opts)?;
        info!("selected {selection}");

        self.set_library_defaults(&selection)?;

        if opts.skip_gui {
            info!("skipping the configuration editor");
        } else {
            self.enable_libraries()?;
        }

        let output_dir = match &opts.output {
            Some(dir) if !dir.trim().is_empty() => dir.clone(),
            Some(_) => bail!("output directory name is empty"),
            None => prompter.prompt_output_directory()?,
        };

        let tree = self.bootstrap(&selection, &output_dir)?;
        println!(
            "{}",
            format!("Sources ready in {}", tree.clone_dir.display())
                .green()
                .bold()
        );
        Ok(tree)
    }
}

fn choose_board<R: BufRead, W: Write>(
    catalog: &BoardCatalog,
    prompter: &mut Prompter<R, W>,
    opts: &SetupOptions,
) -> anyhow::Result<Selection> {
    match (&opts.vendor, &opts.board) {
        (Some(vendor), Some(board)) => Selection::from_catalog(catalog, vendor, board),
        (Some(vendor), None) => {
            let entry = catalog
                .entries()
                .iter()
                .find(|e| &e.vendor == vendor)
                .ok_or_else(|| anyhow!("unknown vendor `{vendor}`"))?;
            prompter.select_vendor_board(entry)
        }
        (None, Some(_)) => bail!("a board can only be given together with its vendor"),
        (None, None) => prompter.select_board(catalog),
    }
}
