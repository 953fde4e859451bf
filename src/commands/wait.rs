use clap::Args;
use refsweep::errors::Result;
use refsweep::{wait_for_github_to_be_ready, GITHUB_READY_DELAY};

#[derive(Debug, Args)]
pub struct Wait {}

impl Wait {
    pub async fn execute(&self) -> Result<()> {
        log::info!("Waiting {:?} for GitHub to catch up", GITHUB_READY_DELAY);
        wait_for_github_to_be_ready().await;
        Ok(())
    }
}
