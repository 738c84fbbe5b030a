//! FakeFamily helper for scenario tests.
//!
//! Stands in for the `Report` command: returns canned raw output per view
//! and records every query it receives.

use std::cell::RefCell;

use cmvc_scm::cmvc::{CmvcError, Phase, ReportRunner, ReportView};

/// Canned response for one view
enum Response {
    Output(String),
    Fail(i32),
}

/// A fake CMVC family answering `Report -raw` queries.
pub struct FakeFamily {
    track_view: Response,
    change_view: Response,
    queries: RefCell<Vec<(ReportView, String)>>,
}

impl FakeFamily {
    /// A family whose reports are empty.
    pub fn new() -> Self {
        Self {
            track_view: Response::Output(String::new()),
            change_view: Response::Output(String::new()),
            queries: RefCell::new(Vec::new()),
        }
    }

    /// Raw output returned for `-view TrackView`.
    pub fn with_track_view(mut self, output: &str) -> Self {
        self.track_view = Response::Output(output.to_string());
        self
    }

    /// Raw output returned for `-view ChangeView`.
    pub fn with_change_view(mut self, output: &str) -> Self {
        self.change_view = Response::Output(output.to_string());
        self
    }

    /// Make `-view ChangeView` exit with `code`.
    pub fn failing_change_view(mut self, code: i32) -> Self {
        self.change_view = Response::Fail(code);
        self
    }

    /// Make `-view TrackView` exit with `code`.
    pub fn failing_track_view(mut self, code: i32) -> Self {
        self.track_view = Response::Fail(code);
        self
    }

    /// Every query received so far, in order.
    pub fn queries(&self) -> Vec<(ReportView, String)> {
        self.queries.borrow().clone()
    }

    /// Views queried so far, in order.
    pub fn views(&self) -> Vec<ReportView> {
        self.queries.borrow().iter().map(|(v, _)| *v).collect()
    }
}

impl ReportRunner for FakeFamily {
    fn run_report(&self, view: ReportView, where_clause: &str) -> Result<String, CmvcError> {
        self.queries
            .borrow_mut()
            .push((view, where_clause.to_string()));

        let (response, phase) = match view {
            ReportView::TrackView => (&self.track_view, Phase::TrackView),
            ReportView::ChangeView => (&self.change_view, Phase::ChangeView),
        };
        match response {
            Response::Output(output) => Ok(output.clone()),
            Response::Fail(code) => Err(CmvcError::Execution {
                phase,
                release: None,
                exit_code: *code,
                stderr: format!("{} failed", view),
            }),
        }
    }
}
