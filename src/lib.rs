//! Branch cleanup and consistency helpers for integration tests running against GitHub

pub mod cleanup;
pub mod errors;
pub mod github;
pub mod repo;

pub use cleanup::{delete_branches, wait_for_github_to_be_ready, GITHUB_READY_DELAY};
pub use errors::{RefsweepError, Result};
pub use repo::RepoId;
