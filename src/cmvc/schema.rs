//! Line schemas for `Report -raw` output
//!
//! Each view is described declaratively: delimiter, column count, and which
//! columns carry which value. A change in the remote output layout only needs
//! a change here, not in the parser.

use std::fmt;

/// Separator used between fields in raw report output
pub const FIELD_SEPARATOR: char = '|';

/// Separator between sub-values inside a list column
pub const LIST_SEPARATOR: char = ' ';

/// Report views this crate queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportView {
    /// Integrated tracks in a time window
    TrackView,
    /// Files belonging to a set of tracks
    ChangeView,
}

impl ReportView {
    /// Name passed to `Report -view`
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportView::TrackView => "TrackView",
            ReportView::ChangeView => "ChangeView",
        }
    }

    /// Line schema describing this view's raw output
    pub fn schema(&self) -> &'static LineSchema {
        match self {
            ReportView::TrackView => &TRACK_VIEW,
            ReportView::ChangeView => &CHANGE_VIEW,
        }
    }
}

impl fmt::Display for ReportView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout of one raw data line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSchema {
    /// Primary field delimiter
    pub delimiter: char,
    /// Exact number of fields a data line must have
    pub field_count: usize,
    /// Column holding several values, and the delimiter between them
    pub list_field: Option<(usize, char)>,
    /// Last column is free text: it may contain the delimiter and span lines
    pub free_text_tail: bool,
}

impl LineSchema {
    /// Split a line into trimmed fields, or `None` if the field count is wrong
    ///
    /// With a free-text tail, extra delimiters stay in the last field.
    pub fn split<'a>(&self, line: &'a str) -> Option<Vec<&'a str>> {
        let fields: Vec<&str> = if self.free_text_tail {
            line.splitn(self.field_count, self.delimiter)
                .map(str::trim)
                .collect()
        } else {
            line.split(self.delimiter).map(str::trim).collect()
        };
        (fields.len() == self.field_count).then_some(fields)
    }

    /// Whether `line`, following a data line, continues its free-text tail
    pub fn continues_record(&self, line: &str) -> bool {
        self.free_text_tail && !line.trim().is_empty() && self.split(line).is_none()
    }

    /// Sub-values of the list column, skipping empty ones
    pub fn list_values<'a>(&self, fields: &[&'a str]) -> Vec<&'a str> {
        match self.list_field {
            Some((index, separator)) => fields[index]
                .split(separator)
                .filter(|v| !v.is_empty())
                .collect(),
            None => Vec::new(),
        }
    }
}

/// TrackView columns
///
/// Fields (separated by `|`):
/// 1. releaseName
/// 2. defectName (track id)
/// 3. state
/// 4. userLogin
/// 5. lastUpdate (`%Y/%m/%d %H:%M:%S`)
/// 6. abstract (description)
pub mod track_columns {
    pub const RELEASE: usize = 0;
    pub const TRACK: usize = 1;
    pub const STATE: usize = 2;
    pub const USER: usize = 3;
    pub const LAST_UPDATE: usize = 4;
    pub const DESCRIPTION: usize = 5;
}

/// ChangeView columns
///
/// Fields (separated by `|`):
/// 1. releaseName
/// 2. defectName (track id)
/// 3. versionSID (revision)
/// 4. pathName (space-separated file names)
pub mod change_columns {
    pub const RELEASE: usize = 0;
    pub const TRACK: usize = 1;
    pub const REVISION: usize = 2;
    pub const FILES: usize = 3;
}

pub static TRACK_VIEW: LineSchema = LineSchema {
    delimiter: FIELD_SEPARATOR,
    field_count: 6,
    list_field: None,
    free_text_tail: true,
};

pub static CHANGE_VIEW: LineSchema = LineSchema {
    delimiter: FIELD_SEPARATOR,
    field_count: 4,
    list_field: Some((change_columns::FILES, LIST_SEPARATOR)),
    free_text_tail: false,
};
