//! Raw report records
//!
//! Transient values produced by the parser and folded into a
//! [`ChangeModel`](super::ChangeModel).

use chrono::NaiveDateTime;

/// One integrated track, as reported by `-view TrackView`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRecord {
    /// Track identifier (CMVC `defectName`)
    pub track_id: String,

    /// Release the track is integrated into
    pub release_name: String,

    /// Login of the track owner
    pub user: String,

    /// Last time the track changed
    pub last_update: NaiveDateTime,

    /// Track state (normally `integrate`)
    pub state: String,

    /// Track abstract
    pub description: String,
}

/// One file touched by a track, as reported by `-view ChangeView`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Track the file belongs to
    pub track_id: String,

    /// Release of the track
    pub release_name: String,

    /// Path of the file within the family
    pub file_name: String,

    /// Version SID of the file
    pub revision: String,
}
