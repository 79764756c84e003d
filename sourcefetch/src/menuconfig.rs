//! Graphical feature selection.
//!
//! Hands the merged snapshot to the external Kconfig editor (`guiconfig` by
//! default). The editor saves in place; nothing it returns is interpreted.

use colored::Colorize;

use crate::ctx::AppContext;

/// Environment variable telling Kconfig tools which snapshot to edit.
pub const KCONFIG_CONFIG_ENV: &str = "KCONFIG_CONFIG";

impl AppContext {
    /// Opens the workspace snapshot in the GUI editor and blocks until it is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns an error only if the editor cannot be started.
    pub fn enable_libraries(&self) -> anyhow::Result<()> {
        println!("{}", "\n-----Choose the libraries to enable-----\n".bold());
        info!("opening {} in the configuration editor", self.snapshot().display());

        let mut cmd = self.command(&self.settings.gui, &self.paths.workspace)?;
        cmd.env(KCONFIG_CONFIG_ENV, self.snapshot());
        let status = cmd.run_status()?;
        if !status.success() {
            warn!("configuration editor exited with {status}");
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_editor_sees_snapshot() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = AppContext::new(tmp.path(), None).unwrap();
        ctx.settings.gui = vec![
            "sh".into(),
            "-c".into(),
            r#"echo "CONFIG_OTA=y" >> "$KCONFIG_CONFIG""#.into(),
        ];

        ctx.enable_libraries().unwrap();
        assert_eq!(
            std::fs::read_to_string(ctx.snapshot()).unwrap(),
            "CONFIG_OTA=y\n"
        );
    }

    #[test]
    fn test_editor_exit_status_ignored() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = AppContext::new(tmp.path(), None).unwrap();
        ctx.settings.gui = vec!["sh".into(), "-c".into(), "exit 2".into()];
        assert!(ctx.enable_libraries().is_ok());

        ctx.settings.gui = vec!["sourcefetch-missing-editor".into()];
        assert!(ctx.enable_libraries().is_err());
    }
}
