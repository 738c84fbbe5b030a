//! cmvc-scm - change detection for CMVC families
//!
//! Decides whether a build is needed and what to check out by querying a
//! CMVC family for integrated tracks.
//!
//! This library provides:
//! - [`cmvc`]: Query construction, `Report` execution and raw output parsing
//! - [`model`]: Track/file records and the assembled change model
//! - [`changelog`]: Persisted changelog format
//! - [`checkout`]: Checkout script invocation
//! - [`scm`]: The poll/checkout cycle
//! - [`config`]: Job configuration

pub mod changelog;
pub mod checkout;
pub mod cmvc;
pub mod config;
pub mod model;
pub mod scm;
