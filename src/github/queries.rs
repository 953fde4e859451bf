// GraphQL documents and payloads sent through `gh api graphql`

use crate::errors::{RefsweepError, Result};
use crate::github::types::RepositoryMetadata;
use crate::repo::RepoId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const REPOSITORY_METADATA_QUERY: &str = r#"
query RepositoryMetadata($owner: String!, $repo: String!, $baseRef: String!, $targetRef: String!) {
  repository(owner: $owner, name: $repo) {
    id
    baseRef: ref(qualifiedName: $baseRef) {
      id
      name
      target {
        oid
      }
    }
    targetRef: ref(qualifiedName: $targetRef) {
      id
      name
      target {
        oid
      }
    }
  }
}
"#;

pub const DELETE_REF_MUTATION: &str = r#"
mutation DeleteRef($input: DeleteRefInput!) {
  deleteRef(input: $input) {
    clientMutationId
  }
}
"#;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest {
    pub query: &'static str,
    pub variables: Value,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryMetadataData {
    pub repository: Option<RepositoryMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRefData {
    pub delete_ref: Option<DeleteRefPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRefPayload {
    pub client_mutation_id: Option<String>,
}

pub fn repository_metadata_request(repo: &RepoId, base_ref: &str, target_ref: &str) -> GraphQlRequest {
    GraphQlRequest {
        query: REPOSITORY_METADATA_QUERY,
        variables: json!({
            "owner": repo.owner,
            "repo": repo.name,
            "baseRef": base_ref,
            "targetRef": target_ref,
        }),
    }
}

pub fn delete_ref_request(ref_id: &str) -> GraphQlRequest {
    GraphQlRequest {
        query: DELETE_REF_MUTATION,
        variables: json!({
            "input": {
                "refId": ref_id,
            },
        }),
    }
}

/// Decode a GraphQL response body, turning reported errors into `GraphQl`
pub fn parse_response<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>> {
    let response: GraphQlResponse<T> = serde_json::from_slice(body)?;

    if !response.errors.is_empty() {
        let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(RefsweepError::GraphQl(messages.join("; ")));
    }

    Ok(response.data)
}
