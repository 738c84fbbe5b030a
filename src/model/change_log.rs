//! Change model assembled from one detection cycle
//!
//! Track records are folded in first; file records are merged afterwards and
//! attached to the track they belong to.

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use tracing::warn;

use super::{FileRecord, TrackRecord};
use crate::cmvc::{CmvcError, ReportView};

/// A file changed by a track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub file_name: String,
    pub revision: String,
}

/// One track as exposed to the build system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeLogEntry {
    pub track_id: String,
    pub release_name: String,
    pub user: String,
    pub last_update: NaiveDateTime,
    pub state: String,
    pub description: String,

    /// Files in report order; empty until the change view is merged
    pub files: Vec<ChangedFile>,
}

impl From<TrackRecord> for ChangeLogEntry {
    fn from(record: TrackRecord) -> Self {
        Self {
            track_id: record.track_id,
            release_name: record.release_name,
            user: record.user,
            last_update: record.last_update,
            state: record.state,
            description: record.description,
            files: Vec::new(),
        }
    }
}

/// All tracks found in one cycle, grouped by release
#[derive(Debug, Clone, Default)]
pub struct ChangeModel {
    entries: IndexMap<String, ChangeLogEntry>,
    tracks_by_release: IndexMap<String, Vec<String>>,
}

impl ChangeModel {
    /// Build a model with one entry per track record
    ///
    /// A track id reported twice means the report cannot be trusted.
    pub fn from_track_records<I>(records: I) -> Result<Self, CmvcError>
    where
        I: IntoIterator<Item = TrackRecord>,
    {
        Self::from_entries(records.into_iter().map(ChangeLogEntry::from)).map_err(|track_id| {
            CmvcError::malformed(
                ReportView::TrackView,
                format!("track {} reported more than once", track_id),
            )
        })
    }

    /// Build a model from complete entries, returning the first duplicate id on failure
    pub(crate) fn from_entries<I>(entries: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = ChangeLogEntry>,
    {
        let mut model = Self::default();
        for entry in entries {
            if model.entries.contains_key(&entry.track_id) {
                return Err(entry.track_id);
            }
            model
                .tracks_by_release
                .entry(entry.release_name.clone())
                .or_default()
                .push(entry.track_id.clone());
            model.entries.insert(entry.track_id.clone(), entry);
        }
        Ok(model)
    }

    /// Attach files to their tracks, in report order
    ///
    /// A file whose track is not in the model is skipped: the track may have
    /// left the window between the two queries.
    pub fn merge_file_records<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = FileRecord>,
    {
        for record in records {
            match self.entries.get_mut(&record.track_id) {
                Some(entry) => entry.files.push(ChangedFile {
                    file_name: record.file_name,
                    revision: record.revision,
                }),
                None => warn!(
                    track = %record.track_id,
                    release = %record.release_name,
                    file = %record.file_name,
                    "Skipping file of a track outside the change set"
                ),
            }
        }
    }

    /// Track ids integrated into `release`, in discovery order
    pub fn tracks_for_release(&self, release: &str) -> &[String] {
        self.tracks_by_release
            .get(release)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All track ids, in discovery order
    pub fn track_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Releases that have at least one track
    pub fn releases(&self) -> impl Iterator<Item = &str> {
        self.tracks_by_release.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ChangeLogEntry> {
        self.entries.values()
    }

    pub fn entry(&self, track_id: &str) -> Option<&ChangeLogEntry> {
        self.entries.get(track_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// IndexMap equality ignores order; models compare in discovery order.
impl PartialEq for ChangeModel {
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
            && self.tracks_by_release.iter().eq(other.tracks_by_release.iter())
    }
}

impl Eq for ChangeModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn track(id: &str, release: &str) -> TrackRecord {
        TrackRecord {
            track_id: id.to_string(),
            release_name: release.to_string(),
            user: "fuechi".to_string(),
            last_update: NaiveDate::from_ymd_opt(2020, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            state: "integrate".to_string(),
            description: format!("Track {}", id),
        }
    }

    fn file(id: &str, name: &str) -> FileRecord {
        FileRecord {
            track_id: id.to_string(),
            release_name: "RC_1".to_string(),
            file_name: name.to_string(),
            revision: "1.2".to_string(),
        }
    }

    #[test]
    fn test_from_track_records_groups_by_release() {
        let model = ChangeModel::from_track_records(vec![
            track("100", "RC_1"),
            track("101", "RC_2"),
            track("102", "RC_1"),
        ])
        .unwrap();

        assert_eq!(model.len(), 3);
        assert_eq!(model.tracks_for_release("RC_1"), &["100", "102"]);
        assert_eq!(model.tracks_for_release("RC_2"), &["101"]);
        assert!(model.tracks_for_release("RC_3").is_empty());
        assert_eq!(model.releases().collect::<Vec<_>>(), vec!["RC_1", "RC_2"]);
        assert!(model.entries().all(|e| e.files.is_empty()));
    }

    #[test]
    fn test_from_track_records_keeps_discovery_order() {
        let model =
            ChangeModel::from_track_records(vec![track("300", "RC_1"), track("100", "RC_1")])
                .unwrap();
        assert_eq!(model.track_ids().collect::<Vec<_>>(), vec!["300", "100"]);
    }

    #[test]
    fn test_duplicate_track_is_malformed() {
        let err = ChangeModel::from_track_records(vec![track("100", "RC_1"), track("100", "RC_2")])
            .unwrap_err();
        assert!(matches!(
            err,
            CmvcError::MalformedReport {
                view: ReportView::TrackView,
                ..
            }
        ));
    }

    #[test]
    fn test_merge_appends_files_in_order() {
        let mut model = ChangeModel::from_track_records(vec![track("100", "RC_1")]).unwrap();
        model.merge_file_records(vec![file("100", "a.c"), file("100", "b.c")]);

        let names: Vec<_> = model
            .entry("100")
            .unwrap()
            .files
            .iter()
            .map(|f| f.file_name.as_str())
            .collect();
        assert_eq!(names, vec!["a.c", "b.c"]);
    }

    #[test]
    fn test_merge_skips_orphan_file() {
        let mut model = ChangeModel::from_track_records(vec![track("100", "RC_1")]).unwrap();
        let before = model.clone();
        model.merge_file_records(vec![file("999", "ghost.c")]);

        assert_eq!(model, before);
        assert!(model.entry("999").is_none());
    }

    #[test]
    fn test_empty_model() {
        let model = ChangeModel::from_track_records(Vec::new()).unwrap();
        assert!(model.is_empty());
        assert!(model.tracks_for_release("RC_1").is_empty());
    }

    #[test]
    fn test_equality_is_order_sensitive() {
        let a = ChangeModel::from_track_records(vec![track("1", "RC_1"), track("2", "RC_1")])
            .unwrap();
        let b = ChangeModel::from_track_records(vec![track("2", "RC_1"), track("1", "RC_1")])
            .unwrap();
        assert_ne!(a, b);
    }
}
