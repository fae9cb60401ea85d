// SPDX-License-Identifier: MIT OR Apache-2.0
//! Player settings.
//!
//! Settings live in a RON file and cover:
//! - Which graph to load (a file, or the bundled ring fixture)
//! - Start node and traversal mode
//! - Sequencer timing

use crate::cli::Cli;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vizlab_graph::TraversalMode;
use vizlab_sequencer::SequencerConfig;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file looked up in the working directory when no `--config` is given
pub const SETTINGS_FILE_NAME: &str = "vizlab.ron";

/// Player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Format version
    pub version: u32,
    /// Graph file (RON); `None` plays the bundled ring fixture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<PathBuf>,
    /// Node the traversal starts from
    pub start: String,
    /// Traversal mode
    pub mode: TraversalMode,
    /// Sequencer timing
    pub sequencer: SequencerConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            graph: None,
            start: "1".to_string(),
            mode: TraversalMode::default(),
            sequencer: SequencerConfig::default(),
        }
    }
}

impl AppSettings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse settings from RON text
    pub fn parse(content: &str) -> Result<Self, AppError> {
        let settings: AppSettings = ron::from_str(content)?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(AppError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve settings for a CLI invocation
    ///
    /// Reads `--config` if given, else `vizlab.ron` when it exists, else
    /// defaults; then applies command-line overrides.
    pub fn resolve(cli: &Cli) -> Result<Self, AppError> {
        let mut settings = match &cli.config {
            Some(path) => Self::load(path)?,
            None if Path::new(SETTINGS_FILE_NAME).exists() => {
                Self::load(Path::new(SETTINGS_FILE_NAME))?
            }
            None => Self::default(),
        };
        settings.apply_overrides(cli);
        settings.sequencer.validate()?;
        Ok(settings)
    }

    /// Apply command-line flags on top of file values
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(graph) = &cli.graph {
            self.graph = Some(graph.clone());
        }
        if let Some(start) = &cli.start {
            self.start = start.clone();
        }
        if let Some(mode) = cli.mode {
            self.mode = mode;
        }
        if let Some(delay_ms) = cli.delay_ms {
            self.sequencer.delay_ms = delay_ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_settings() {
        let settings = AppSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.start, "1");
        assert_eq!(settings.mode, TraversalMode::Bfs);
        assert!(settings.graph.is_none());
    }

    #[test]
    fn test_serialization() {
        let settings = AppSettings {
            mode: TraversalMode::Dfs,
            start: "7".to_string(),
            ..AppSettings::default()
        };
        let text =
            ron::ser::to_string_pretty(&settings, ron::ser::PrettyConfig::default()).unwrap();
        assert_eq!(AppSettings::parse(&text).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings = AppSettings::parse(r#"(mode: dfs, sequencer: (delay_ms: 40))"#).unwrap();
        assert_eq!(settings.mode, TraversalMode::Dfs);
        assert_eq!(settings.sequencer.delay_ms, 40);
        assert_eq!(settings.start, "1");
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = AppSettings::parse("(version: 99)").unwrap_err();
        assert!(matches!(
            err,
            AppError::UnsupportedVersion {
                found: 99,
                supported: SETTINGS_FORMAT_VERSION
            }
        ));
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from(["vizlab", "--start", "5", "--mode", "dfs", "--delay-ms", "10"]);
        let mut settings = AppSettings::default();
        settings.apply_overrides(&cli);
        assert_eq!(settings.start, "5");
        assert_eq!(settings.mode, TraversalMode::Dfs);
        assert_eq!(settings.sequencer.delay_ms, 10);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("vizlab-settings-{}.ron", std::process::id()));
        let settings = AppSettings {
            graph: Some(PathBuf::from("graphs/ring.ron")),
            ..AppSettings::default()
        };
        settings.save(&path).unwrap();
        let loaded = AppSettings::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, settings);
    }
}
