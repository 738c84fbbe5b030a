//! Common test utilities for scenario tests.
//!
//! This module provides fakes for the `Report` command and the checkout
//! script, plus fixtures shared by the scenarios.
//!
//! Note: Each integration test file compiles as a separate crate,
//! so not all helpers are used in every test file. We suppress
//! dead_code warnings at the module level.

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fake_family;
pub mod recording_checkout;

pub use fake_family::FakeFamily;
pub use recording_checkout::RecordingCheckout;

use chrono::{NaiveDate, NaiveDateTime};
use cmvc_scm::config::Config;
use cmvc_scm::model::ReleaseSet;

/// Midnight of the given day in January 2020.
pub fn jan(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// A valid configuration monitoring `releases`.
pub fn config(releases: &str) -> Config {
    Config {
        family: "family@localhost@6666".to_string(),
        releases: ReleaseSet::parse(releases),
        ..Default::default()
    }
}
