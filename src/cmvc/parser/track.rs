//! TrackView parser (`Report -raw -view TrackView`)

use chrono::NaiveDateTime;

use super::super::CmvcError;
use super::super::constants::dates;
use super::super::schema::{ReportView, track_columns as col};
use super::{Parser, Records};
use crate::model::TrackRecord;

impl Parser {
    /// Lazily parse TrackView output into track records
    ///
    /// Expected format (`|`-separated):
    /// `<release>|<track>|<state>|<user>|<lastUpdate>|<abstract>`
    pub fn track_records(output: &str) -> Records<'_, TrackRecord> {
        Records::new(output, ReportView::TrackView, Self::map_track_fields)
    }

    /// Parse all of a TrackView report
    pub fn parse_track_view(output: &str) -> Result<Vec<TrackRecord>, CmvcError> {
        Self::track_records(output).collect()
    }

    /// Whether the TrackView report holds at least one track
    ///
    /// Stops reading at the first recognized track.
    pub fn has_any_track(output: &str) -> Result<bool, CmvcError> {
        Self::track_records(output).next().transpose().map(|t| t.is_some())
    }

    fn map_track_fields(fields: &[&str]) -> Result<Vec<TrackRecord>, CmvcError> {
        let last_update = NaiveDateTime::parse_from_str(fields[col::LAST_UPDATE], dates::FORMAT)
            .map_err(|e| {
                CmvcError::malformed(
                    ReportView::TrackView,
                    format!(
                        "track {} has unreadable lastUpdate {:?}: {}",
                        fields[col::TRACK],
                        fields[col::LAST_UPDATE],
                        e
                    ),
                )
            })?;

        Ok(vec![TrackRecord {
            track_id: fields[col::TRACK].to_string(),
            release_name: fields[col::RELEASE].to_string(),
            user: fields[col::USER].to_string(),
            last_update,
            state: fields[col::STATE].to_string(),
            description: fields[col::DESCRIPTION].to_string(),
        }])
    }
}
