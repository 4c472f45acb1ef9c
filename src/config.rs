//! Journal configuration
//!
//! Loaded from YAML once at startup and turned into a
//! [`Journal`](crate::vault::Journal). Unknown keys are ignored, so the file
//! can be shared with other tools.
//!
//! ```yaml
//! vault_root: ~/Obsidian
//! diary_day_root: ~/Obsidian/Diary/Day
//! diary_week_root: ~/Obsidian/Diary/Week
//! backup_root: ~/Obsidian/.backups
//! write_root: ~/Obsidian/Diary
//! daily_template_path: ~/Obsidian/Templates/Day.md
//! ```

use crate::error::Error;
use serde::Deserialize;
use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

/// Environment variable naming the config file
pub const ENV_VAR: &str = "LIFE_MENTOR_CONFIG";

/// Config file used when neither a path nor [`ENV_VAR`] is given
pub const DEFAULT_PATH: &str = "config/config.yaml";

/// Paths of the journal inside an Obsidian vault
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Vault directory
    pub vault_root: PathBuf,

    /// Daily notes, `{diary_day_root}/{YYYY-MM-DD}.md`
    pub diary_day_root: PathBuf,

    /// Weekly notes, `{diary_week_root}/{YYYY}-W{week}.md`
    pub diary_week_root: Option<PathBuf>,

    /// Backups of overwritten notes
    pub backup_root: PathBuf,

    /// Daily notes must be written under this directory
    pub write_root: PathBuf,

    /// Weekly notes must be written under this directory, defaults to
    /// [`JournalConfig::diary_week_root`]
    pub week_write_root: Option<PathBuf>,

    /// Templater file for new daily notes
    pub daily_template_path: Option<PathBuf>,

    /// Templater file for new weekly notes
    pub weekly_template_path: Option<PathBuf>,
}

/// Expand a leading `~` against `home`
fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    let (Some(home), Ok(rest)) = (home, path.strip_prefix("~")) else {
        return path.to_path_buf();
    };

    home.join(rest)
}

impl JournalConfig {
    /// Parse YAML, empty text gives the default config
    ///
    /// # Errors
    /// - [`Error::Yaml`] if the text is not a valid config mapping
    pub fn from_yaml(text: &str) -> Result<Self, Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yml::from_str(text)?;
        Ok(config.expand_home(std::env::var_os("HOME").map(PathBuf::from).as_deref()))
    }

    /// Load config from `path`, else [`ENV_VAR`], else [`DEFAULT_PATH`]
    ///
    /// # Errors
    /// - [`Error::ConfigNotFound`] if the chosen file does not exist
    /// - [`Error::Io`] if it cannot be read
    /// - [`Error::Yaml`] if it is not a valid config
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip_all))]
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        Self::load_from(&Self::config_path(path, std::env::var_os(ENV_VAR)))
    }

    fn config_path(path: Option<&Path>, env: Option<OsString>) -> PathBuf {
        let home = std::env::var_os("HOME").map(PathBuf::from);

        path.map(Path::to_path_buf)
            .or_else(|| env.filter(|value| !value.is_empty()).map(PathBuf::from))
            .map_or_else(|| PathBuf::from(DEFAULT_PATH), |path| expand_home(&path, home.as_deref()))
    }

    fn load_from(path: &Path) -> Result<Self, Error> {
        if !path.is_file() {
            #[cfg(feature = "tracing")]
            tracing::error!(path = %path.display(), "Config not found");

            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), "Load config");

        Self::from_yaml(&fs::read_to_string(path)?)
    }

    fn expand_home(self, home: Option<&Path>) -> Self {
        let expand = |path: PathBuf| expand_home(&path, home);

        Self {
            vault_root: expand(self.vault_root),
            diary_day_root: expand(self.diary_day_root),
            diary_week_root: self.diary_week_root.map(expand),
            backup_root: expand(self.backup_root),
            write_root: expand(self.write_root),
            week_write_root: self.week_write_root.map(expand),
            daily_template_path: self.daily_template_path.map(expand),
            weekly_template_path: self.weekly_template_path.map(expand),
        }
    }

    /// Write root for weekly notes, [`None`] without a week root
    #[must_use]
    pub fn week_write_root(&self) -> Option<&Path> {
        self.week_write_root
            .as_deref()
            .or(self.diary_week_root.as_deref())
    }
}
