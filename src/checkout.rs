//! Checkout step
//!
//! Applies the detected tracks to a workspace by running an external script
//! once per release: `<script> "<track> <track> ..." <release>`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use indexmap::IndexMap;
use tracing::info;

use crate::cmvc::{CmvcError, Phase};

/// Applies tracks to a workspace
pub trait Checkout {
    /// Prepare the workspace before the first release is checked out
    fn prepare(&self, workspace: &Path) -> Result<(), CmvcError>;

    /// Check out `tracks` (a shell-quoted token list) of `release`
    fn checkout(&self, workspace: &Path, release: &str, tracks: &str) -> Result<(), CmvcError>;
}

/// Runs a user-provided checkout script in a wiped workspace
#[derive(Debug, Clone)]
pub struct ScriptCheckout {
    script: PathBuf,
    envs: IndexMap<String, String>,
}

impl ScriptCheckout {
    pub fn new(script: PathBuf) -> Self {
        Self {
            script,
            envs: IndexMap::new(),
        }
    }

    /// Environment injected into the script
    pub fn with_envs(mut self, envs: IndexMap<String, String>) -> Self {
        self.envs = envs;
        self
    }

    /// Program and leading arguments used to launch the script
    fn launcher(&self) -> Command {
        let is_groovy = self
            .script
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("groovy"));

        if is_groovy && !cfg!(unix) {
            let mut cmd = Command::new("groovy");
            cmd.arg(&self.script);
            cmd
        } else {
            Command::new(&self.script)
        }
    }
}

impl Checkout for ScriptCheckout {
    fn prepare(&self, workspace: &Path) -> Result<(), CmvcError> {
        info!(workspace = %workspace.display(), "Wiping out workspace");
        wipe_workspace(workspace)
    }

    fn checkout(&self, workspace: &Path, release: &str, tracks: &str) -> Result<(), CmvcError> {
        info!(release, "Invoking checkout script");

        let output = self
            .launcher()
            .arg(tracks)
            .arg(release)
            .current_dir(workspace)
            .envs(&self.envs)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CmvcError::ToolNotFound(self.script.display().to_string())
                } else {
                    CmvcError::IoError(e)
                }
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(CmvcError::Execution {
                phase: Phase::Checkout,
                release: Some(release.to_string()),
                exit_code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}

/// Remove everything inside `workspace`, creating it if missing
pub fn wipe_workspace(workspace: &Path) -> Result<(), CmvcError> {
    if !workspace.exists() {
        fs::create_dir_all(workspace)?;
        return Ok(());
    }

    for entry in fs::read_dir(workspace)? {
        let path = entry?.path();
        if path.is_dir() && !path.is_symlink() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wipe_workspace_removes_contents() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
        fs::write(dir.path().join("sub/deeper/b.txt"), "b").unwrap();

        wipe_workspace(dir.path()).unwrap();

        assert!(dir.path().exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_wipe_workspace_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = dir.path().join("ws");
        wipe_workspace(&workspace).unwrap();
        assert!(workspace.is_dir());
    }

    #[test]
    fn test_missing_script_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let checkout = ScriptCheckout::new(dir.path().join("missing.sh"));
        let err = checkout.checkout(dir.path(), "RC_1", "\"100\"").unwrap_err();
        assert!(matches!(err, CmvcError::ToolNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_script_receives_tracks_and_release() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("checkout.sh");
        fs::write(&script, "#!/bin/sh\nprintf '%s|%s' \"$1\" \"$2\" > args.txt\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let workspace = dir.path().join("ws");
        fs::create_dir_all(&workspace).unwrap();

        ScriptCheckout::new(script)
            .checkout(&workspace, "RC_1", "\"100 101\"")
            .unwrap();

        let args = fs::read_to_string(workspace.join("args.txt")).unwrap();
        assert_eq!(args, "\"100 101\"|RC_1");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_script_names_release() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fail.sh");
        fs::write(&script, "#!/bin/sh\necho nope >&2\nexit 3\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let err = ScriptCheckout::new(script)
            .checkout(dir.path(), "RC_9", "\"1\"")
            .unwrap_err();
        match err {
            CmvcError::Execution {
                phase,
                release,
                exit_code,
                ..
            } => {
                assert_eq!(phase, Phase::Checkout);
                assert_eq!(release.as_deref(), Some("RC_9"));
                assert_eq!(exit_code, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
