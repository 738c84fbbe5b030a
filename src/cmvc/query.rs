//! `-where` clause construction for `Report`
//!
//! Every user-supplied value that ends up in a clause goes through
//! [`quote_list`]; nothing is interpolated unescaped.

use super::CmvcError;
use super::constants::{INTEGRATE_STATE, dates};
use crate::model::{ReleaseSet, TimeWindow};

/// Filter for `-view TrackView`: integrated tracks of `releases` updated within `window`
///
/// A non-blank `override_clause` replaces the generated filter verbatim.
pub fn build_track_filter(
    window: &TimeWindow,
    releases: &ReleaseSet,
    override_clause: Option<&str>,
) -> Result<String, CmvcError> {
    if releases.is_empty() {
        return Err(CmvcError::Configuration(
            "at least one release is required".to_string(),
        ));
    }

    if let Some(clause) = override_clause.filter(|c| !c.trim().is_empty()) {
        return Ok(clause.to_string());
    }

    Ok(format!(
        "lastUpdate between {} and {} and state = {} and releaseName in ({}) order by defectName",
        quote(&window.from.format(dates::FORMAT).to_string()),
        quote(&window.to.format(dates::FORMAT).to_string()),
        quote(INTEGRATE_STATE),
        quote_list(releases.iter()),
    ))
}

/// Filter for `-view ChangeView`: files of `track_ids` within `releases`
///
/// Returns `None` when there are no tracks, so no query is issued.
pub fn build_file_filter<'a, I>(track_ids: I, releases: &ReleaseSet) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut track_ids = track_ids.into_iter().peekable();
    track_ids.peek()?;

    Some(format!(
        "defectName in ({}) and releaseName in ({}) order by defectName",
        quote_list(track_ids),
        quote_list(releases.iter()),
    ))
}

/// Single-quote each value (doubling embedded quotes) and join with `, `
pub fn quote_list<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| quote(v.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Double-quoted, space-separated token list handed to the checkout script
///
/// Empty input gives an empty string: nothing to check out.
pub fn quote_for_shell<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tokens: Vec<String> = values
        .into_iter()
        .map(|v| v.as_ref().replace('\\', "\\\\").replace('"', "\\\""))
        .collect();

    if tokens.is_empty() {
        String::new()
    } else {
        format!("\"{}\"", tokens.join(" "))
    }
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
