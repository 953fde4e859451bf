use crate::errors::{RefsweepError, Result};
use crate::github::queries::{
    delete_ref_request, parse_response, repository_metadata_request, DeleteRefData, GraphQlRequest,
    RepositoryMetadataData,
};
use crate::github::types::{branch_ref, GitRef, RefTarget, RepositoryMetadata, BRANCH_REF_PREFIX};
use crate::repo::RepoId;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::Barrier;

#[async_trait]
pub trait GitHubClient: Send + Sync {
    async fn is_available(&self) -> Result<bool>;

    /// Look up the repository together with the two given qualified refs
    ///
    /// `None` when the repository itself cannot be seen
    async fn repository_metadata(
        &self,
        repo: &RepoId,
        base_ref: &str,
        target_ref: &str,
    ) -> Result<Option<RepositoryMetadata>>;

    async fn delete_ref(&self, ref_id: &str) -> Result<()>;
}

/// Talks to the GraphQL API through `gh api graphql`, reusing the credentials of the gh CLI
#[derive(Debug, Clone)]
pub struct GhCliClient {
    program: String,
    args: Vec<String>,
}

impl GhCliClient {
    pub fn new() -> Self {
        Self::with_program("gh")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self::with_command(program, Vec::<String>::new())
    }

    /// Run gh as `program args...`, e.g. through a wrapper
    pub fn with_command<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    async fn run_graphql(&self, request: &GraphQlRequest) -> Result<Vec<u8>> {
        let body = serde_json::to_vec(request)?;

        let mut child = self
            .command()
            .args(["api", "graphql", "--input", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => RefsweepError::GitHubCliNotFound,
                _ => RefsweepError::GitHubCli(format!("Failed to execute gh command: {}", e)),
            })?;

        // stdin is closed when dropped at the end of this block
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(&body).await {
                // gh exited without reading its input, its exit status tells why
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    log::debug!("gh closed its input early: {}", e);
                }
                result => result?,
            }
        }

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RefsweepError::GitHubCli(stderr.trim().to_string()));
        }

        Ok(output.stdout)
    }
}

impl Default for GhCliClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitHubClient for GhCliClient {
    async fn is_available(&self) -> Result<bool> {
        match self.command().arg("--version").output().await {
            Ok(output) => Ok(output.status.success()),
            Err(_) => Ok(false),
        }
    }

    async fn repository_metadata(
        &self,
        repo: &RepoId,
        base_ref: &str,
        target_ref: &str,
    ) -> Result<Option<RepositoryMetadata>> {
        log::trace!("Querying {} for {} and {}", repo, base_ref, target_ref);

        let request = repository_metadata_request(repo, base_ref, target_ref);
        let stdout = self.run_graphql(&request).await?;
        let data = parse_response::<RepositoryMetadataData>(&stdout)?;

        Ok(data.and_then(|d| d.repository))
    }

    async fn delete_ref(&self, ref_id: &str) -> Result<()> {
        log::trace!("Deleting ref {}", ref_id);

        let stdout = self.run_graphql(&delete_ref_request(ref_id)).await?;
        parse_response::<DeleteRefData>(&stdout)?;

        Ok(())
    }
}

pub struct MockGitHubClient {
    pub available: bool,
    /// Qualified ref name to ref id
    pub refs: HashMap<String, String>,
    pub failing_refs: HashSet<String>,
    pub failing_deletes: HashSet<String>,
    pub missing_repository: bool,
    pub barrier: Option<Arc<Barrier>>,
    pub metadata_queries: Mutex<Vec<(RepoId, String, String)>>,
    pub deleted_refs: Mutex<Vec<String>>,
}

impl MockGitHubClient {
    pub fn new() -> Self {
        Self {
            available: true,
            refs: HashMap::new(),
            failing_refs: HashSet::new(),
            failing_deletes: HashSet::new(),
            missing_repository: false,
            barrier: None,
            metadata_queries: Mutex::new(Vec::new()),
            deleted_refs: Mutex::new(Vec::new()),
        }
    }

    pub fn with_branch(mut self, branch: &str, ref_id: &str) -> Self {
        self.refs.insert(branch_ref(branch), ref_id.to_string());
        self
    }

    /// Lookups of this branch fail with a transport error
    pub fn with_failing_branch(mut self, branch: &str) -> Self {
        self.failing_refs.insert(branch_ref(branch));
        self
    }

    /// Deleting this ref id fails with a transport error
    pub fn with_failing_delete(mut self, ref_id: &str) -> Self {
        self.failing_deletes.insert(ref_id.to_string());
        self
    }

    /// Lookups answer as if the repository could not be seen
    pub fn with_missing_repository(mut self) -> Self {
        self.missing_repository = true;
        self
    }

    /// Every lookup waits on `barrier` once it has been recorded
    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub fn set_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn get_metadata_queries(&self) -> Vec<(RepoId, String, String)> {
        self.metadata_queries.lock().unwrap().clone()
    }

    pub fn get_deleted_refs(&self) -> Vec<String> {
        self.deleted_refs.lock().unwrap().clone()
    }

    fn lookup(&self, qualified_name: &str) -> Option<GitRef> {
        self.refs.get(qualified_name).map(|id| GitRef {
            id: id.clone(),
            name: qualified_name
                .strip_prefix(BRANCH_REF_PREFIX)
                .unwrap_or(qualified_name)
                .to_string(),
            target: Some(RefTarget {
                oid: "0".repeat(40),
            }),
        })
    }
}

impl Default for MockGitHubClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitHubClient for MockGitHubClient {
    async fn is_available(&self) -> Result<bool> {
        Ok(self.available)
    }

    async fn repository_metadata(
        &self,
        repo: &RepoId,
        base_ref: &str,
        target_ref: &str,
    ) -> Result<Option<RepositoryMetadata>> {
        self.metadata_queries.lock().unwrap().push((
            repo.clone(),
            base_ref.to_string(),
            target_ref.to_string(),
        ));

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }

        if self.failing_refs.contains(base_ref) {
            return Err(RefsweepError::GitHubCli(format!(
                "Could not resolve to a Ref with the name '{}'",
                base_ref
            )));
        }

        if self.missing_repository {
            return Ok(None);
        }

        Ok(Some(RepositoryMetadata {
            id: format!("R_{}", repo.name),
            base_ref: self.lookup(base_ref),
            target_ref: self.lookup(target_ref),
        }))
    }

    async fn delete_ref(&self, ref_id: &str) -> Result<()> {
        if self.failing_deletes.contains(ref_id) {
            return Err(RefsweepError::GitHubCli(format!(
                "Could not delete ref '{}'",
                ref_id
            )));
        }

        self.deleted_refs.lock().unwrap().push(ref_id.to_string());
        Ok(())
    }
}
