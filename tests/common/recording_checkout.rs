//! RecordingCheckout helper for scenario tests.

use std::cell::RefCell;
use std::path::Path;

use cmvc_scm::checkout::Checkout;
use cmvc_scm::cmvc::{CmvcError, Phase};

/// Records checkout calls instead of running a script.
#[derive(Default)]
pub struct RecordingCheckout {
    pub prepared: RefCell<usize>,
    pub calls: RefCell<Vec<(String, String)>>,
    fail_on: Option<String>,
}

impl RecordingCheckout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the checkout of `release` fail like a script exiting with 1.
    pub fn failing_on(release: &str) -> Self {
        Self {
            fail_on: Some(release.to_string()),
            ..Self::default()
        }
    }

    /// `(release, quoted tracks)` pairs in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.borrow().clone()
    }
}

impl Checkout for RecordingCheckout {
    fn prepare(&self, _workspace: &Path) -> Result<(), CmvcError> {
        *self.prepared.borrow_mut() += 1;
        Ok(())
    }

    fn checkout(&self, _workspace: &Path, release: &str, tracks: &str) -> Result<(), CmvcError> {
        self.calls
            .borrow_mut()
            .push((release.to_string(), tracks.to_string()));

        if self.fail_on.as_deref() == Some(release) {
            return Err(CmvcError::Execution {
                phase: Phase::Checkout,
                release: Some(release.to_string()),
                exit_code: 1,
                stderr: "checkout script failed".to_string(),
            });
        }
        Ok(())
    }
}
