// SPDX-License-Identifier: MIT OR Apache-2.0
//! Application errors.

use thiserror::Error;
use vizlab_graph::{GraphFileError, SearchError};
use vizlab_sequencer::SequencerError;

/// Anything that stops the player
#[derive(Debug, Error)]
pub enum AppError {
    /// Filesystem or runtime I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed
    #[error("Invalid settings file: {0}")]
    SettingsParse(#[from] ron::error::SpannedError),

    /// Settings could not be serialized
    #[error("Could not serialize settings: {0}")]
    SettingsWrite(#[from] ron::Error),

    /// Settings written by a newer player
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },

    /// Graph file could not be read or written
    #[error("Graph file error: {0}")]
    GraphFile(#[from] GraphFileError),

    /// Traversal was rejected
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Sequencer misconfiguration
    #[error(transparent)]
    Sequencer(#[from] SequencerError),

    /// No tokio runtime available for timers
    #[error("No async runtime: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),
}
