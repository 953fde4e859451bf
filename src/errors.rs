use thiserror::Error;

#[derive(Error, Debug)]
pub enum RefsweepError {
    #[error("Git operation failed: {0}")]
    Git(String),

    #[error("GitHub CLI operation failed: {0}")]
    GitHubCli(String),

    #[error("GitHub CLI not found")]
    GitHubCliNotFound,

    #[error("GraphQL request failed: {0}")]
    GraphQl(String),

    #[error("Invalid repository '{0}', expected <owner>/<name>")]
    InvalidRepository(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<git2::Error> for RefsweepError {
    fn from(error: git2::Error) -> Self {
        RefsweepError::Git(error.message().to_string())
    }
}

pub type Result<T> = std::result::Result<T, RefsweepError>;
