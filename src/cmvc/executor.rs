//! CMVC command executor
//!
//! Handles running `Report` and capturing its output.

use std::path::{Path, PathBuf};
use std::process::Command;

use indexmap::IndexMap;
use tracing::debug;

use super::constants::{self, flags};
use super::schema::ReportView;
use super::{CmvcError, Phase};

/// Something that can run a `Report -raw` query and return its stdout
///
/// Blocks until the report completes.
pub trait ReportRunner {
    fn run_report(&self, view: ReportView, where_clause: &str) -> Result<String, CmvcError>;
}

/// Executor for CMVC `Report` commands
#[derive(Debug, Clone)]
pub struct CmvcExecutor {
    /// Family to query (`family@host@port`)
    family: String,

    /// Login to impersonate, if any
    become_user: Option<String>,

    /// Directory holding the CMVC client binaries (None = PATH)
    client_path: Option<PathBuf>,

    /// Extra environment passed to every command
    envs: IndexMap<String, String>,
}

impl CmvcExecutor {
    /// Create a new executor for a family
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            become_user: None,
            client_path: None,
            envs: IndexMap::new(),
        }
    }

    /// Run commands as another CMVC login
    pub fn with_become(mut self, user: Option<String>) -> Self {
        self.become_user = user.filter(|u| !u.is_empty());
        self
    }

    /// Look for `Report` in a specific client directory
    pub fn with_client_path(mut self, path: Option<PathBuf>) -> Self {
        self.client_path = path;
        self
    }

    /// Environment injected into every spawned command
    pub fn with_envs(mut self, envs: IndexMap<String, String>) -> Self {
        self.envs = envs;
        self
    }

    /// Arguments for a raw report of `view` filtered by `where_clause`
    pub fn report_args(&self, view: ReportView, where_clause: &str) -> Vec<String> {
        let mut args = vec![
            flags::FAMILY.to_string(),
            self.family.clone(),
            flags::RAW.to_string(),
            flags::VIEW.to_string(),
            view.as_str().to_string(),
            flags::WHERE.to_string(),
            where_clause.to_string(),
        ];

        if let Some(ref user) = self.become_user {
            args.push(flags::BECOME.to_string());
            args.push(user.clone());
        }

        args
    }

    /// Resolve the `Report` binary, preferring the configured client directory
    fn report_program(&self) -> PathBuf {
        match self.client_path {
            Some(ref dir) if dir.is_dir() => dir.join(constants::REPORT_COMMAND),
            _ => PathBuf::from(constants::REPORT_COMMAND),
        }
    }

    fn run(&self, program: &Path, args: &[String], phase: Phase) -> Result<String, CmvcError> {
        debug!(?program, ?args, %phase, "Running CMVC command");

        let output = Command::new(program)
            .args(args)
            .envs(&self.envs)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CmvcError::ToolNotFound(program.display().to_string())
                } else {
                    CmvcError::IoError(e)
                }
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(CmvcError::Execution {
                phase,
                release: None,
                exit_code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}

impl ReportRunner for CmvcExecutor {
    fn run_report(&self, view: ReportView, where_clause: &str) -> Result<String, CmvcError> {
        let phase = match view {
            ReportView::TrackView => Phase::TrackView,
            ReportView::ChangeView => Phase::ChangeView,
        };
        self.run(
            &self.report_program(),
            &self.report_args(view, where_clause),
            phase,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_args() {
        let executor = CmvcExecutor::new("family@localhost@6666");
        let args = executor.report_args(ReportView::TrackView, "state = 'integrate'");
        assert_eq!(
            args,
            vec![
                "-family",
                "family@localhost@6666",
                "-raw",
                "-view",
                "TrackView",
                "-where",
                "state = 'integrate'",
            ]
        );
    }

    #[test]
    fn test_report_args_with_become() {
        let executor = CmvcExecutor::new("fam").with_become(Some("builder".to_string()));
        let args = executor.report_args(ReportView::ChangeView, "x");
        assert_eq!(&args[args.len() - 2..], &["-become", "builder"]);
    }

    #[test]
    fn test_empty_become_is_ignored() {
        let executor = CmvcExecutor::new("fam").with_become(Some(String::new()));
        assert!(!executor.report_args(ReportView::TrackView, "x").contains(&"-become".to_string()));
    }

    #[test]
    fn test_report_program_falls_back_to_path() {
        let executor =
            CmvcExecutor::new("fam").with_client_path(Some(PathBuf::from("/nonexistent/cmvc")));
        assert_eq!(executor.report_program(), PathBuf::from("Report"));
    }

    #[test]
    fn test_report_program_in_client_dir() {
        let dir = tempfile::tempdir().unwrap();
        let executor = CmvcExecutor::new("fam").with_client_path(Some(dir.path().to_path_buf()));
        assert_eq!(executor.report_program(), dir.path().join("Report"));
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let executor = CmvcExecutor::new("fam").with_client_path(Some(dir.path().to_path_buf()));
        let err = executor
            .run_report(ReportView::TrackView, "x")
            .unwrap_err();
        assert!(matches!(err, CmvcError::ToolNotFound(_)));
    }
}
