//! Data models for cmvc-scm
//!
//! This module contains the records parsed from CMVC reports and the change
//! model assembled from them.

mod change_log;
mod track;
mod window;

pub use change_log::{ChangeLogEntry, ChangeModel, ChangedFile};
pub use track::{FileRecord, TrackRecord};
pub use window::{ReleaseSet, TimeWindow, beginning_of_time};
