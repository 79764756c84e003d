//! Process helpers and placeholder expansion.
//!
//! The SDK setup leans on four outside programs: the version-control client,
//! the Kconfig merge script, the Kconfig GUI and the SDK's own configuration
//! script. Each is started through a [`ToolCommand`].
//!
//! Only text taken from the settings file goes through placeholder
//! expansion. Folder names typed at the prompt and discovered file paths are
//! passed through untouched.

use std::{
    ffi::OsStr,
    ops::{Deref, DerefMut},
    path::Path,
    process::ExitStatus,
};

use anyhow::{Context, bail};
use colored::Colorize;

/// Expands placeholders in a setting value.
pub type Expander = Box<dyn Fn(&OsStr) -> String>;

/// One invocation of an external setup tool, pinned to a working directory.
///
/// Dereferences to `std::process::Command` for inspection and for anything
/// not wrapped here.
pub struct ToolCommand {
    inner: std::process::Command,
    expand: Expander,
}

impl Deref for ToolCommand {
    type Target = std::process::Command;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ToolCommand {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl ToolCommand {
    /// Prepares `program` (a setting value, so expanded) to run in `workdir`.
    pub fn new<S>(program: S, workdir: &Path, expand: impl Fn(&OsStr) -> String + 'static) -> Self
    where
        S: AsRef<OsStr>,
    {
        let mut inner = std::process::Command::new(expand(program.as_ref()));
        inner.current_dir(workdir);
        Self {
            inner,
            expand: Box::new(expand),
        }
    }

    /// The command line shown to the user before the tool starts.
    pub fn cmd_line(&self) -> String {
        std::iter::once(self.get_program())
            .chain(self.get_args())
            .map(|s| s.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn announce(&self) {
        let line = self.cmd_line();
        debug!(
            "`{line}` in {}",
            self.get_current_dir()
                .map(|d| d.display().to_string())
                .unwrap_or_default()
        );
        println!("{}", line.purple().bold());
    }

    /// Runs the tool and treats a non-zero exit as failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot be started or exits with a
    /// non-zero status.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let status = self.run_status()?;
        if !status.success() {
            bail!("`{}` failed with status: {status}", self.cmd_line());
        }
        Ok(())
    }

    /// Runs the tool and returns its exit status as is. Used for the GUI,
    /// whose result is not checked.
    ///
    /// # Errors
    ///
    /// Returns an error only if the tool cannot be started.
    pub fn run_status(&mut self) -> anyhow::Result<ExitStatus> {
        self.announce();
        let program = self.get_program().to_string_lossy().into_owned();
        self.inner
            .status()
            .with_context(|| format!("failed to start `{program}`"))
    }

    /// Appends a value read from the settings file, placeholders expanded.
    pub fn setting_arg<S: AsRef<OsStr>>(&mut self, value: S) -> &mut Self {
        let value = (self.expand)(value.as_ref());
        self.inner.arg(value);
        self
    }

    /// Appends several settings values, placeholders expanded.
    pub fn setting_args<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for value in values {
            self.setting_arg(value);
        }
        self
    }

    /// Appends an argument exactly as given.
    pub fn arg<S: AsRef<OsStr>>(&mut self, arg: S) -> &mut Self {
        self.inner.arg(arg);
        self
    }

    /// Appends arguments exactly as given.
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.inner.args(args);
        self
    }

    /// Sets an environment variable for the tool, value taken as given.
    pub fn env<K: AsRef<OsStr>, V: AsRef<OsStr>>(&mut self, key: K, val: V) -> &mut Self {
        self.inner.env(key, val);
        self
    }
}

/// Expands `${env:NAME}` placeholders from the process environment.
///
/// Unset variables expand to an empty string. Anything else that looks like
/// a placeholder (`${workspaceFolder}`, unterminated `${`) is left as is.
///
/// ```rust
/// use sourcefetch::utils::replace_env_placeholders;
///
/// unsafe { std::env::set_var("SF_DOC_REMOTE", "git@example.com:sdk.git"); }
/// assert_eq!(
///     replace_env_placeholders("${env:SF_DOC_REMOTE}"),
///     "git@example.com:sdk.git"
/// );
/// ```
pub fn replace_env_placeholders(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find('}') else {
            result.push_str(&rest[start..]);
            return result;
        };

        let inner = &after[..end];
        match inner.strip_prefix("env:") {
            Some(name) => {
                let value = std::env::var(name).unwrap_or_default();
                trace!("expanded ${{env:{name}}} to {value:?}");
                result.push_str(&value);
            }
            None => {
                result.push_str("${");
                result.push_str(inner);
                result.push('}');
            }
        }
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    result
}
