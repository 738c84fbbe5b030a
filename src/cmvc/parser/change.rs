//! ChangeView parser (`Report -raw -view ChangeView`)

use super::super::CmvcError;
use super::super::schema::{ReportView, change_columns as col};
use super::{Parser, Records};
use crate::model::FileRecord;

impl Parser {
    /// Lazily parse ChangeView output into file records
    ///
    /// Expected format (`|`-separated):
    /// `<release>|<track>|<versionSID>|<path> [<path> ...]`
    ///
    /// A line naming several paths yields one record per path.
    pub fn file_records(output: &str) -> Records<'_, FileRecord> {
        Records::new(output, ReportView::ChangeView, Self::map_change_fields)
    }

    /// Parse all of a ChangeView report
    pub fn parse_change_view(output: &str) -> Result<Vec<FileRecord>, CmvcError> {
        Self::file_records(output).collect()
    }

    fn map_change_fields(fields: &[&str]) -> Result<Vec<FileRecord>, CmvcError> {
        Ok(ReportView::ChangeView
            .schema()
            .list_values(fields)
            .into_iter()
            .map(|file_name| FileRecord {
                track_id: fields[col::TRACK].to_string(),
                release_name: fields[col::RELEASE].to_string(),
                file_name: file_name.to_string(),
                revision: fields[col::REVISION].to_string(),
            })
            .collect())
    }
}
