//! `Report -raw` output parser
//!
//! Turns raw report text into typed records, one view at a time.

mod change;
mod track;


use std::borrow::Cow;
use std::collections::VecDeque;
use std::iter::Peekable;
use std::str::Lines;

use tracing::debug;

use super::CmvcError;
use super::schema::ReportView;

/// Parser for raw CMVC report output
///
/// Stateless: every call starts a fresh pass over its input.
pub struct Parser;

/// Maps the fields of one recognized line to records
type LineMapper<T> = fn(&[&str]) -> Result<Vec<T>, CmvcError>;

/// Lazy sequence of records parsed from one report
///
/// Lines that do not match the view's schema (blank lines, banners) are
/// skipped. When the last column is free text, short lines directly after a
/// data line continue that column and are joined to it with `\n`; a blank
/// line or the next data line ends the record. If the input had content but
/// no line matched, the sequence ends with a [`CmvcError::MalformedReport`].
pub struct Records<'a, T> {
    lines: Peekable<Lines<'a>>,
    view: ReportView,
    map: LineMapper<T>,
    pending: VecDeque<T>,
    saw_content: bool,
    recognized: usize,
    done: bool,
}

impl<'a, T> Records<'a, T> {
    pub(super) fn new(output: &'a str, view: ReportView, map: LineMapper<T>) -> Self {
        Self {
            lines: output.lines().peekable(),
            view,
            map,
            pending: VecDeque::new(),
            saw_content: false,
            recognized: 0,
            done: false,
        }
    }

    /// Number of data records recognized so far
    pub fn recognized_lines(&self) -> usize {
        self.recognized
    }
}

impl<T> Iterator for Records<'_, T> {
    type Item = Result<T, CmvcError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(Ok(record));
            }
            if self.done {
                return None;
            }

            let Some(line) = self.lines.next() else {
                self.done = true;
                if self.saw_content && self.recognized == 0 {
                    return Some(Err(CmvcError::malformed(
                        self.view,
                        "no line matches the expected layout",
                    )));
                }
                return None;
            };

            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            self.saw_content = true;

            let schema = self.view.schema();
            if schema.split(line).is_none() {
                debug!(view = %self.view, line, "Skipping non-data line");
                continue;
            }

            let mut record = Cow::Borrowed(line);
            while let Some(&next) = self.lines.peek() {
                let next = next.trim_end_matches('\r');
                if !schema.continues_record(next) {
                    break;
                }
                let joined = record.to_mut();
                joined.push('\n');
                joined.push_str(next);
                self.lines.next();
            }

            let Some(fields) = schema.split(&record) else {
                continue;
            };

            match (self.map)(&fields) {
                Ok(records) => {
                    self.recognized += 1;
                    self.pending.extend(records);
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}
