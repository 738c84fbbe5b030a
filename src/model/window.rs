//! Query inputs: the polled time window and the monitored releases

use std::fmt;

use chrono::NaiveDateTime;

use crate::cmvc::CmvcError;
use crate::cmvc::constants::dates;

/// Period of time scanned for integrated tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl TimeWindow {
    /// Create a window, rejecting one that ends before it starts
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Result<Self, CmvcError> {
        if from > to {
            return Err(CmvcError::Configuration(format!(
                "time window starts after it ends ({} > {})",
                from.format(dates::FORMAT),
                to.format(dates::FORMAT)
            )));
        }
        Ok(Self { from, to })
    }

    /// Window starting at the last successful build, or at the beginning of time
    pub fn since(
        last_success: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Result<Self, CmvcError> {
        Self::new(last_success.unwrap_or_else(beginning_of_time), now)
    }
}

/// Sentinel lower bound used when no successful build exists
pub fn beginning_of_time() -> NaiveDateTime {
    NaiveDateTime::parse_from_str(dates::BEGINNING_OF_TIME, dates::FORMAT)
        .unwrap_or_default()
}

/// Ordered list of release names to monitor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleaseSet(Vec<String>);

impl ReleaseSet {
    /// Parse a comma-separated release list, trimming names and dropping empty ones
    pub fn parse(value: &str) -> Self {
        value.split(',').collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: AsRef<str>> FromIterator<S> for ReleaseSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }
}

impl fmt::Display for ReleaseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}
