//! Configuration management

mod cli;
mod file;

pub use cli::Cli;
pub use file::{ConfigFile, LocalSection, SyncSection};

use crate::types::{Category, CategoryRoots, SyncError, SyncPolicy};
use std::path::{PathBuf, MAIN_SEPARATOR};

/// Local folder for each category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalRoots {
    pub library: Option<PathBuf>,
    pub templates: Option<PathBuf>,
    pub media: Option<PathBuf>,
    pub playlists: Option<PathBuf>,
}

impl LocalRoots {
    pub fn get(&self, category: Category) -> Option<&PathBuf> {
        match category {
            Category::Library => self.library.as_ref(),
            Category::Templates => self.templates.as_ref(),
            Category::Media => self.media.as_ref(),
            Category::Playlists => self.playlists.as_ref(),
        }
    }

    pub fn set(&mut self, category: Category, path: PathBuf) {
        let slot = match category {
            Category::Library => &mut self.library,
            Category::Templates => &mut self.templates,
            Category::Media => &mut self.media,
            Category::Playlists => &mut self.playlists,
        };
        *slot = Some(path);
    }
}

/// Which categories take part in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct CategorySelection {
    pub library: bool,
    pub templates: bool,
    pub media: bool,
    pub playlists: bool,
}

impl Default for CategorySelection {
    fn default() -> Self {
        Self {
            library: true,
            templates: true,
            media: true,
            playlists: true,
        }
    }
}

impl CategorySelection {
    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Library => self.library,
            Category::Templates => self.templates,
            Category::Media => self.media,
            Category::Playlists => self.playlists,
        }
    }

    pub fn set(&mut self, category: Category, enabled: bool) {
        let slot = match category {
            Category::Library => &mut self.library,
            Category::Templates => &mut self.templates,
            Category::Media => &mut self.media,
            Category::Playlists => &mut self.playlists,
        };
        *slot = enabled;
    }

    /// Enabled categories in processing order
    pub fn enabled(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(move |category| self.is_enabled(*category))
    }
}

/// Global configuration for prosync
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Root of the shared sync folder
    pub source: PathBuf,

    /// This machine's ProPresenter folders
    pub local: LocalRoots,

    /// Library path as it must appear inside received playlists
    pub library_reference: Option<String>,

    /// Direction and replace flag
    pub policy: SyncPolicy,

    pub categories: CategorySelection,

    /// Dry run (show plan, don't execute)
    pub dry_run: bool,

    pub quiet: bool,
}

impl Config {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.source.as_os_str().is_empty() {
            return Err(SyncError::Config(
                "No sync source given (use --source or `source` in the config file)".to_string(),
            ));
        }

        if !self.source.is_dir() {
            return Err(SyncError::Config(format!(
                "Sync source not accessible: {}",
                self.source.display()
            )));
        }

        if self.categories.enabled().next().is_none() {
            return Err(SyncError::Config(
                "Every category is disabled; nothing to sync".to_string(),
            ));
        }

        for category in self.categories.enabled() {
            if self.local.get(category).is_none() {
                return Err(SyncError::Config(format!(
                    "No local {} folder configured",
                    category
                )));
            }
        }

        if self.categories.playlists && self.library_reference().is_none() {
            return Err(SyncError::Config(
                "Playlist sync needs --library or --library-reference".to_string(),
            ));
        }

        Ok(())
    }

    /// Remote and local roots for one category
    pub fn roots(&self, category: Category) -> Result<CategoryRoots, SyncError> {
        let local = self.local.get(category).ok_or_else(|| {
            SyncError::Config(format!("No local {} folder configured", category))
        })?;
        Ok(CategoryRoots::new(
            category.remote_root(&self.source),
            local.clone(),
        ))
    }

    /// Library location written into localized playlists.
    ///
    /// An explicit reference is used verbatim. Otherwise the local library
    /// path is used with a trailing separator, since cue file names are
    /// appended to it directly.
    pub fn library_reference(&self) -> Option<String> {
        if let Some(reference) = &self.library_reference {
            return Some(reference.clone());
        }
        let mut reference = self.local.library.as_ref()?.display().to_string();
        if !reference.ends_with(&['/', '\\'][..]) {
            reference.push(MAIN_SEPARATOR);
        }
        Some(reference)
    }
}

impl TryFrom<Cli> for Config {
    type Error = SyncError;

    /// Merge defaults, the optional config file and flags, then validate
    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let file = match &cli.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };

        let mut config = Config {
            source: cli
                .source
                .clone()
                .or_else(|| file.source.clone())
                .unwrap_or_default(),
            library_reference: cli
                .library_reference
                .clone()
                .or_else(|| file.library_reference.clone()),
            dry_run: cli.dry_run,
            quiet: cli.quiet,
            ..Config::default()
        };

        config.policy.direction = cli
            .direction()
            .or(file.direction)
            .unwrap_or(config.policy.direction);
        config.policy.replace = cli
            .replace()
            .or(file.replace)
            .unwrap_or(config.policy.replace);

        for category in Category::ALL {
            if let Some(path) = cli
                .local_root(category)
                .or_else(|| file.local_root(category))
            {
                config.local.set(category, path.clone());
            }
            if let Some(enabled) = cli
                .category_switch(category)
                .or_else(|| file.category_switch(category))
            {
                config.categories.set(category, enabled);
            }
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SyncDirection;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn all_roots(temp: &TempDir) -> LocalRoots {
        LocalRoots {
            library: Some(temp.path().join("Library")),
            templates: Some(temp.path().join("Templates")),
            media: Some(temp.path().join("Media")),
            playlists: Some(temp.path().join("Playlists")),
        }
    }

    fn valid_config(temp: &TempDir) -> Config {
        Config {
            source: temp.path().to_path_buf(),
            local: all_roots(temp),
            ..Config::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.policy.direction, SyncDirection::Both);
        assert!(!config.policy.replace);
        assert_eq!(config.categories.enabled().count(), 4);
    }

    #[test]
    fn test_valid_config_passes() {
        let temp = TempDir::new().expect("tempdir");
        assert!(valid_config(&temp).validate().is_ok());
    }

    #[test]
    fn test_missing_source_rejected() {
        let temp = TempDir::new().expect("tempdir");
        let mut config = valid_config(&temp);
        config.source = temp.path().join("offline-share");

        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
        assert!(err.to_string().contains("Sync source not accessible"));
    }

    #[test]
    fn test_enabled_category_needs_local_root() {
        let temp = TempDir::new().expect("tempdir");
        let mut config = valid_config(&temp);
        config.local.media = None;
        assert!(config.validate().is_err());

        config.categories.media = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nothing_enabled_rejected() {
        let temp = TempDir::new().expect("tempdir");
        let mut config = valid_config(&temp);
        for category in Category::ALL {
            config.categories.set(category, false);
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_library_reference_defaults_to_library_with_separator() {
        let config = Config {
            local: LocalRoots {
                library: Some(PathBuf::from("/home/me/Library")),
                ..LocalRoots::default()
            },
            ..Config::default()
        };
        assert_eq!(
            config.library_reference(),
            Some(format!("/home/me/Library{MAIN_SEPARATOR}"))
        );

        let explicit = Config {
            library_reference: Some("E:\\Lib\\".to_string()),
            ..config
        };
        assert_eq!(explicit.library_reference(), Some("E:\\Lib\\".to_string()));
    }

    #[test]
    fn test_roots_follow_share_layout() {
        let temp = TempDir::new().expect("tempdir");
        let config = valid_config(&temp);

        let roots = config.roots(Category::Library).expect("roots");
        assert_eq!(roots.remote, temp.path().join("__Documents").join("Default"));
        assert_eq!(roots.local, temp.path().join("Library"));
    }

    #[test]
    fn test_flags_override_file_override_defaults() {
        let temp = TempDir::new().expect("tempdir");
        let config_path = temp.path().join("prosync.toml");
        fs::write(
            &config_path,
            format!(
                r#"
source = {source:?}
direction = "UpdateClient"
replace = true

[local]
library = {library:?}
templates = {library:?}
media = {library:?}
playlists = {library:?}

[sync]
media = false
"#,
                source = temp.path().display().to_string(),
                library = temp.path().join("Library").display().to_string(),
            ),
        )
        .expect("write config");

        let cli = Cli::parse_from([
            "prosync",
            "--config",
            config_path.to_str().expect("utf8 path"),
            "--no-replace",
            "--sync-media",
        ]);
        let config = Config::try_from(cli).expect("config");

        // from the file
        assert_eq!(config.policy.direction, SyncDirection::Down);
        // flags beat the file
        assert!(!config.policy.replace);
        assert!(config.categories.media);
        // untouched default
        assert!(config.categories.library);
    }

    #[test]
    fn test_try_from_validates() {
        let cli = Cli::parse_from(["prosync", "--source", "/definitely/not/here"]);
        let err = Config::try_from(cli).unwrap_err();
        assert!(err.is_config_error());
    }
}
