use clap::Args;
use refsweep::errors::{RefsweepError, Result};
use refsweep::github::{GhCliClient, GitHubClient};
use refsweep::{delete_branches, wait_for_github_to_be_ready, RepoId};

#[derive(Debug, Args)]
pub struct Delete {
    /// Repository as <owner>/<name>, defaults to $REFSWEEP_REPOSITORY, $GITHUB_REPOSITORY or the origin remote
    #[arg(long)]
    pub repo: Option<String>,

    /// Wait for GitHub to reflect the deletions before exiting
    #[arg(long)]
    pub wait: bool,

    /// Branches to delete, without the refs/heads/ prefix
    #[arg(required = true)]
    pub branches: Vec<String>,
}

impl Delete {
    pub async fn execute(&self) -> Result<()> {
        let repo = RepoId::resolve(self.repo.as_deref(), ".")?;
        let client = GhCliClient::new();

        if !client.is_available().await? {
            return Err(RefsweepError::GitHubCliNotFound);
        }

        log::info!("Deleting {} branch(es) from {}", self.branches.len(), repo);
        delete_branches(&client, &repo, &self.branches).await?;

        if self.wait {
            wait_for_github_to_be_ready().await;
        }

        Ok(())
    }
}
