use crate::errors::{RefsweepError, Result};
use git2::Repository;
use regex::Regex;
use std::fmt;
use std::path::Path;

/// Environment variables consulted, in order, when no repository is given explicitly
pub const REPOSITORY_ENV_VARS: [&str; 2] = ["REFSWEEP_REPOSITORY", "GITHUB_REPOSITORY"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse an `owner/name` pair
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || RefsweepError::InvalidRepository(value.to_string());

        let (owner, name) = value.trim().split_once('/').ok_or_else(invalid)?;
        let is_segment = |s: &str| !s.is_empty() && !s.contains(['/', ' ', '\t']);
        if !is_segment(owner) || !is_segment(name) {
            return Err(invalid());
        }

        Ok(Self::new(owner, name))
    }

    /// Extract the repository from a GitHub remote url (ssh, scp-like or https)
    pub fn from_remote_url(url: &str) -> Result<Self> {
        let re = Regex::new(
            r"^(?:[a-z+]+://)?(?:[^@/]+@)?github\.com[:/](?P<owner>[^/]+)/(?P<name>[^/]+?)(?:\.git)?/?$",
        )
        .map_err(|e| RefsweepError::InvalidRepository(e.to_string()))?;

        let caps = re
            .captures(url.trim())
            .ok_or_else(|| RefsweepError::InvalidRepository(url.to_string()))?;

        Ok(Self::new(&caps["owner"], &caps["name"]))
    }

    /// Read the `origin` remote of the git repository containing `workdir`
    pub fn from_git_remote(workdir: impl AsRef<Path>) -> Result<Self> {
        let repository = Repository::discover(workdir)?;
        let remote = repository.find_remote("origin")?;
        let url = remote
            .url()
            .ok_or_else(|| RefsweepError::Git("origin remote url is not valid utf-8".to_string()))?;

        log::debug!("Resolving repository from origin remote: {}", url);
        Self::from_remote_url(url)
    }

    /// Resolve the repository to operate on
    ///
    /// An explicit value wins, then the environment, then the `origin` remote of `workdir`
    pub fn resolve(explicit: Option<&str>, workdir: impl AsRef<Path>) -> Result<Self> {
        Self::resolve_with(explicit, |key| std::env::var(key).ok(), workdir)
    }

    fn resolve_with(
        explicit: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
        workdir: impl AsRef<Path>,
    ) -> Result<Self> {
        if let Some(value) = explicit {
            return Self::parse(value);
        }

        for key in REPOSITORY_ENV_VARS {
            if let Some(value) = env(key).filter(|v| !v.trim().is_empty()) {
                log::debug!("Using repository from {}: {}", key, value);
                return Self::parse(&value);
            }
        }

        Self::from_git_remote(workdir)
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
