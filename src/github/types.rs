use serde::Deserialize;

/// Namespace of branch references
pub const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Fully qualified reference of a branch, `feature-x` becomes `refs/heads/feature-x`
pub fn branch_ref(branch: &str) -> String {
    format!("{}{}", BRANCH_REF_PREFIX, branch)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryMetadata {
    pub id: String,
    pub base_ref: Option<GitRef>,
    pub target_ref: Option<GitRef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GitRef {
    pub id: String,
    pub name: String,
    pub target: Option<RefTarget>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RefTarget {
    pub oid: String,
}
