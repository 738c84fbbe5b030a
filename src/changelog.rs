//! Persisted changelog format
//!
//! A [`ChangeModel`] is stored as a JSON document so that old changelogs stay
//! readable whatever the raw report layout becomes. Field tags are fixed;
//! an unknown tag or a newer `version` is rejected rather than silently
//! dropped.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cmvc::CmvcError;
use crate::model::{ChangeLogEntry, ChangeModel, ChangedFile};

/// Highest changelog version this build reads and the one it writes
pub const CHANGELOG_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChangelogDoc {
    version: u32,
    entries: Vec<EntryDoc>,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct EntryDoc {
    track: String,
    release: String,
    user: String,
    #[serde(with = "cmvc_date")]
    last_update: chrono::NaiveDateTime,
    state: String,
    description: String,
    files: Vec<FileDoc>,
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileDoc {
    name: String,
    revision: String,
}

/// Dates are stored in the fixed format CMVC uses, plus any fractional second
mod cmvc_date {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    use crate::cmvc::constants::dates;

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&date.format(dates::PRECISE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, dates::PRECISE_FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(&raw, dates::FORMAT))
            .map_err(de::Error::custom)
    }
}

impl From<&ChangeLogEntry> for EntryDoc {
    fn from(entry: &ChangeLogEntry) -> Self {
        Self {
            track: entry.track_id.clone(),
            release: entry.release_name.clone(),
            user: entry.user.clone(),
            last_update: entry.last_update,
            state: entry.state.clone(),
            description: entry.description.clone(),
            files: entry
                .files
                .iter()
                .map(|f| FileDoc {
                    name: f.file_name.clone(),
                    revision: f.revision.clone(),
                })
                .collect(),
        }
    }
}

impl From<EntryDoc> for ChangeLogEntry {
    fn from(doc: EntryDoc) -> Self {
        Self {
            track_id: doc.track,
            release_name: doc.release,
            user: doc.user,
            last_update: doc.last_update,
            state: doc.state,
            description: doc.description,
            files: doc
                .files
                .into_iter()
                .map(|f| ChangedFile {
                    file_name: f.name,
                    revision: f.revision,
                })
                .collect(),
        }
    }
}

/// Serialize `model` to `sink`
pub fn write<W: Write>(model: &ChangeModel, mut sink: W) -> Result<(), CmvcError> {
    let doc = ChangelogDoc {
        version: CHANGELOG_VERSION,
        entries: model.entries().map(EntryDoc::from).collect(),
    };

    serde_json::to_writer_pretty(&mut sink, &doc).map_err(json_error)?;
    sink.write_all(b"\n")?;
    sink.flush()?;
    Ok(())
}

/// Parse a changelog previously produced by [`write`]
pub fn read<R: Read>(source: R) -> Result<ChangeModel, CmvcError> {
    let doc: ChangelogDoc = serde_json::from_reader(source).map_err(json_error)?;

    if doc.version > CHANGELOG_VERSION {
        return Err(CmvcError::ChangelogFormat(format!(
            "unsupported changelog version {} (newest known is {})",
            doc.version, CHANGELOG_VERSION
        )));
    }

    ChangeModel::from_entries(doc.entries.into_iter().map(ChangeLogEntry::from)).map_err(
        |track_id| CmvcError::ChangelogFormat(format!("track {} appears twice", track_id)),
    )
}

/// Write the changelog file for a build
pub fn write_file(model: &ChangeModel, path: &Path) -> Result<(), CmvcError> {
    write(model, BufWriter::new(File::create(path)?))
}

/// Read a build's changelog file
pub fn read_file(path: &Path) -> Result<ChangeModel, CmvcError> {
    read(BufReader::new(File::open(path)?))
}

fn json_error(err: serde_json::Error) -> CmvcError {
    if err.is_io() {
        CmvcError::IoError(io::Error::from(err))
    } else {
        CmvcError::ChangelogFormat(err.to_string())
    }
}
