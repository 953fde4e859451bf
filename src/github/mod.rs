pub mod cli;
pub mod queries;
pub mod types;


pub use cli::{GhCliClient, GitHubClient, MockGitHubClient};
pub use types::{branch_ref, GitRef, RefTarget, RepositoryMetadata, BRANCH_REF_PREFIX};
