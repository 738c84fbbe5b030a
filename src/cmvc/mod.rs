//! CMVC command layer
//!
//! This module builds `Report` queries, runs them and parses their raw output.

pub mod constants;
mod executor;
/// Parser module (public for integration testing)
pub mod parser;
pub mod query;
pub mod schema;

pub use executor::{CmvcExecutor, ReportRunner};
pub use schema::ReportView;

use std::fmt;
use std::io;
use thiserror::Error;

/// Step of a detection cycle an error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Querying integrated tracks (`-view TrackView`)
    TrackView,
    /// Querying the files of those tracks (`-view ChangeView`)
    ChangeView,
    /// Running the checkout script
    Checkout,
    /// Writing the changelog file
    Changelog,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::TrackView => f.write_str("track-view"),
            Phase::ChangeView => f.write_str("change-view"),
            Phase::Checkout => f.write_str("checkout"),
            Phase::Changelog => f.write_str("changelog"),
        }
    }
}

/// Errors that can occur while detecting or checking out CMVC changes
#[derive(Error, Debug)]
pub enum CmvcError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("{phase} command failed (exit code {exit_code}){}: {stderr}", release_suffix(.release))]
    Execution {
        phase: Phase,
        release: Option<String>,
        exit_code: i32,
        stderr: String,
    },

    #[error("Malformed {view} report: {reason}")]
    MalformedReport { view: ReportView, reason: String },

    #[error("Invalid changelog: {0}")]
    ChangelogFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("{phase} failed: {source}")]
    Io {
        phase: Phase,
        #[source]
        source: io::Error,
    },

    #[error("{0} is not installed or not in PATH")]
    ToolNotFound(String),
}

fn release_suffix(release: &Option<String>) -> String {
    match release {
        Some(release) => format!(" for release {}", release),
        None => String::new(),
    }
}

impl CmvcError {
    pub(crate) fn malformed(view: ReportView, reason: impl Into<String>) -> Self {
        CmvcError::MalformedReport {
            view,
            reason: reason.into(),
        }
    }

    /// Attach `phase` to a bare I/O error; other errors pass through unchanged
    pub fn in_phase(self, phase: Phase) -> Self {
        match self {
            CmvcError::IoError(source) => CmvcError::Io { phase, source },
            other => other,
        }
    }
}
