use anyhow::{Result, anyhow};
use log::debug;
use regex::Regex;
use serde::Serialize;
use std::{fmt, path::PathBuf, str::FromStr, sync::LazyLock};

use crate::constants::DEPENDENCY_PATTERN;

static DEPENDENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DEPENDENCY_PATTERN).unwrap_or_else(|e| panic!("dependency regex: {e}"))
});

/// A repository pinned to a tag, e.g. `OpenZeppelin/openzeppelin-contracts@v4.9.3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DependencySpec {
    /// `owner/repo`
    pub name: String,
    /// Tag as written, including any leading `v`
    pub version: String,
    /// `owner/repo@version`, the key of the cached tree
    pub path: String,
}

impl DependencySpec {
    pub fn parse(s: &str) -> Result<Self> {
        if !DEPENDENCY_RE.is_match(s) {
            return Err(anyhow!(
                "Bad dependency format '{}', try [user]/[repo]@[version] with a semantic version",
                s
            ));
        }
        let (name, version) = s
            .split_once('@')
            .ok_or_else(|| anyhow!("Bad dependency format '{}': missing '@'", s))?;

        debug!("Parsed dependency {} at {}", name, version);
        Ok(Self { name: name.to_string(), version: version.to_string(), path: s.to_string() })
    }

    /// Relative location of the cached tree: `owner/repo@version`.
    pub fn cache_key(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }

    pub fn clone_url(&self) -> String {
        format!("https://github.com/{}.git", self.name)
    }
}

impl FromStr for DependencySpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DependencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
