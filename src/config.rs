//! Job configuration
//!
//! Loaded from a TOML file and validated before any remote call is made.
//!
//! ```toml
//! family = "family@localhost@6666"
//! releases = "RC_1, RC_2"
//! become = "builder"
//! checkout_script = "/opt/ci/checkout.sh"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::cmvc::CmvcError;
use crate::cmvc::constants::DEFAULT_CMVC_PATH;
use crate::model::ReleaseSet;

/// Family is either a bare name or `name@host@port`
static FAMILY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+(@[^@\s]+@\d+)?$").expect("Invalid family regex")
});

/// Settings for one monitored family
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// CMVC family (`family@host@port`)
    pub family: String,

    /// Releases to monitor, comma-separated or as a list
    #[serde(deserialize_with = "deserialize_releases")]
    pub releases: ReleaseSet,

    /// Login to impersonate when talking to the family
    #[serde(rename = "become", default)]
    pub become_user: Option<String>,

    /// Script invoked once per release to check out its tracks
    #[serde(default)]
    pub checkout_script: Option<PathBuf>,

    /// Replaces the generated TrackView filter when set
    #[serde(default)]
    pub track_view_where_clause: Option<String>,

    /// Directory holding the CMVC client binaries
    #[serde(default)]
    pub cmvc_path: Option<PathBuf>,
}

impl Config {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, CmvcError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CmvcError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration without validating it
    pub fn from_toml(content: &str) -> Result<Self, CmvcError> {
        toml::from_str(content).map_err(|e| CmvcError::Configuration(e.to_string()))
    }

    /// Check the settings a detection cycle relies on
    pub fn validate(&self) -> Result<(), CmvcError> {
        if self.family.trim().is_empty() {
            return Err(CmvcError::Configuration("family is mandatory".to_string()));
        }
        if !FAMILY_REGEX.is_match(&self.family) {
            return Err(CmvcError::Configuration(format!(
                "family {:?} is not of the form name or name@host@port",
                self.family
            )));
        }
        if self.releases.is_empty() {
            return Err(CmvcError::Configuration(
                "at least one release is mandatory".to_string(),
            ));
        }
        if let Some(ref script) = self.checkout_script
            && !script.exists()
        {
            return Err(CmvcError::Configuration(format!(
                "checkout script {} does not exist",
                script.display()
            )));
        }
        Ok(())
    }

    /// CMVC client directory, falling back to the default install location
    pub fn client_path(&self) -> PathBuf {
        self.cmvc_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CMVC_PATH))
    }

    /// Impersonated login, if a non-blank one is set
    pub fn become_user(&self) -> Option<&str> {
        self.become_user.as_deref().filter(|u| !u.trim().is_empty())
    }

    /// Custom TrackView filter, if a non-blank one is set
    pub fn where_clause(&self) -> Option<&str> {
        self.track_view_where_clause
            .as_deref()
            .filter(|c| !c.trim().is_empty())
    }
}

fn deserialize_releases<'de, D: Deserializer<'de>>(d: D) -> Result<ReleaseSet, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Releases {
        Joined(String),
        List(Vec<String>),
    }

    Ok(match Releases::deserialize(d)? {
        Releases::Joined(value) => ReleaseSet::parse(&value),
        Releases::List(values) => values.into_iter().collect(),
    })
}
