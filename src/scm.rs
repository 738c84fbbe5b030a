//! Change detection cycle
//!
//! Drives the two-phase fetch against a CMVC family: integrated tracks
//! first, then the files of those tracks. Polling stops after the first
//! phase; checkout assembles the full [`ChangeModel`], applies it and
//! persists the changelog.

use std::path::Path;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use tracing::info;

use crate::changelog;
use crate::checkout::Checkout;
use crate::cmvc::constants::env;
use crate::cmvc::parser::Parser;
use crate::cmvc::query::{build_file_filter, build_track_filter, quote_for_shell};
use crate::cmvc::{CmvcError, CmvcExecutor, Phase, ReportRunner, ReportView};
use crate::config::Config;
use crate::model::{ChangeModel, TimeWindow};

/// What the build system knows about earlier builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildHistory {
    /// The job has never been built
    NoPriorBuild,
    /// The job was built before; `last_success` is the last successful build's start
    Built { last_success: Option<NaiveDateTime> },
}

/// Answer to a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Changes,
    NoChanges,
}

impl PollOutcome {
    /// Exit status when a build is needed
    pub const CHANGES_STATUS: u8 = 0;
    /// Exit status when nothing changed; a failed poll exits with 1
    pub const NO_CHANGES_STATUS: u8 = 2;

    pub fn has_changes(&self) -> bool {
        matches!(self, PollOutcome::Changes)
    }

    /// Exit status reporting this outcome, distinct from a failed poll
    pub fn exit_status(&self) -> u8 {
        match self {
            PollOutcome::Changes => Self::CHANGES_STATUS,
            PollOutcome::NoChanges => Self::NO_CHANGES_STATUS,
        }
    }
}

/// Result of a checkout cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    /// Tracks and files that were checked out
    pub model: ChangeModel,
    /// Releases the checkout script ran for, in configuration order
    pub checked_out: Vec<String>,
}

/// CMVC change detection for one configured family
pub struct CmvcScm<R> {
    config: Config,
    runner: R,
}

impl CmvcScm<CmvcExecutor> {
    /// Validate `config` and query the family with the `Report` command
    pub fn from_config(config: Config) -> Result<Self, CmvcError> {
        config.validate()?;
        let executor = CmvcExecutor::new(config.family.clone())
            .with_become(config.become_user().map(str::to_string))
            .with_client_path(Some(config.client_path()))
            .with_envs(env_vars(&config));
        Ok(Self::with_runner(config, executor))
    }
}

impl<R: ReportRunner> CmvcScm<R> {
    pub fn with_runner(config: Config, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Environment exposed to `Report` and the checkout script
    pub fn env_vars(&self) -> IndexMap<String, String> {
        env_vars(&self.config)
    }

    /// Whether the family has integrated tracks since the last successful build
    pub fn poll(
        &self,
        history: BuildHistory,
        now: NaiveDateTime,
    ) -> Result<PollOutcome, CmvcError> {
        let BuildHistory::Built { last_success } = history else {
            info!("No existing build, starting a new one");
            return Ok(PollOutcome::Changes);
        };

        let output = self.fetch_tracks(last_success, now)?;
        if Parser::has_any_track(&output)? {
            info!(family = %self.config.family, "Integrated tracks found");
            Ok(PollOutcome::Changes)
        } else {
            info!(family = %self.config.family, "No changes");
            Ok(PollOutcome::NoChanges)
        }
    }

    /// Run both report phases and assemble the change model
    pub fn detect_changes(
        &self,
        last_success: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Result<ChangeModel, CmvcError> {
        let output = self.fetch_tracks(last_success, now)?;
        let mut model = ChangeModel::from_track_records(Parser::parse_track_view(&output)?)?;
        info!(tracks = model.len(), "Tracks found");

        let Some(filter) = build_file_filter(model.track_ids(), &self.config.releases) else {
            return Ok(model);
        };

        let output = self.runner.run_report(ReportView::ChangeView, &filter)?;
        model.merge_file_records(Parser::parse_change_view(&output)?);
        Ok(model)
    }

    /// Detect changes, check them out release by release and write the changelog
    ///
    /// The changelog is written even when nothing changed, so every build has one.
    pub fn checkout(
        &self,
        last_success: Option<NaiveDateTime>,
        now: NaiveDateTime,
        workspace: &Path,
        changelog_path: &Path,
        checkout: &dyn Checkout,
    ) -> Result<CheckoutOutcome, CmvcError> {
        let model = self.detect_changes(last_success, now)?;
        let mut checked_out = Vec::new();

        if !model.is_empty() {
            checkout
                .prepare(workspace)
                .map_err(|e| e.in_phase(Phase::Checkout))?;

            for release in self.config.releases.iter() {
                let tracks = quote_for_shell(model.tracks_for_release(release));
                if tracks.is_empty() {
                    info!(release, "No tracks found for release");
                    continue;
                }
                checkout.checkout(workspace, release, &tracks)?;
                checked_out.push(release.to_string());
            }
        }

        info!(path = %changelog_path.display(), "Writing changelog file");
        changelog::write_file(&model, changelog_path)
            .map_err(|e| e.in_phase(Phase::Changelog))?;

        Ok(CheckoutOutcome { model, checked_out })
    }

    fn fetch_tracks(
        &self,
        last_success: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Result<String, CmvcError> {
        if last_success.is_none() {
            info!("No existing successful build");
        }
        let window = TimeWindow::since(last_success, now)?;
        let filter =
            build_track_filter(&window, &self.config.releases, self.config.where_clause())?;
        self.runner.run_report(ReportView::TrackView, &filter)
    }
}

/// Named values the CMVC tools and the checkout script read from the environment
pub fn env_vars(config: &Config) -> IndexMap<String, String> {
    let mut vars = IndexMap::new();
    vars.insert(
        env::CLIENT_PATH.to_string(),
        config.client_path().display().to_string(),
    );
    vars.insert(env::FAMILY.to_string(), config.family.clone());
    vars.insert(env::RELEASES.to_string(), config.releases.to_string());
    if let Some(user) = config.become_user() {
        vars.insert(env::BECOME.to_string(), user.to_string());
    }
    vars
}
