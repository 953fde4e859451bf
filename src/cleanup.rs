//! Helpers for integration tests running against a live GitHub repository

use crate::errors::Result;
use crate::github::{branch_ref, GitHubClient};
use crate::repo::RepoId;
use futures::future::try_join_all;
use std::time::Duration;

/// How long GitHub may take before a change to a repository shows up in the API
pub const GITHUB_READY_DELAY: Duration = Duration::from_millis(5000);

/// Delete the given branches concurrently
///
/// Branches that cannot be found are reported with a warning and skipped.
/// The first failing API call fails the whole batch; deletions already sent are kept.
pub async fn delete_branches<C, S>(client: &C, repo: &RepoId, branches: &[S]) -> Result<()>
where
    C: GitHubClient + ?Sized,
    S: AsRef<str>,
{
    try_join_all(
        branches
            .iter()
            .map(|branch| delete_branch(client, repo, branch.as_ref())),
    )
    .await?;

    Ok(())
}

async fn delete_branch<C>(client: &C, repo: &RepoId, branch: &str) -> Result<()>
where
    C: GitHubClient + ?Sized,
{
    log::debug!("Deleting branch {}", branch);

    let qualified = branch_ref(branch);
    let metadata = client
        .repository_metadata(repo, &qualified, &qualified)
        .await?;

    let Some(ref_id) = metadata.and_then(|m| m.base_ref).map(|r| r.id) else {
        log::warn!("Branch {} not found", branch);
        return Ok(());
    };

    client.delete_ref(&ref_id).await?;

    log::debug!("Deleted branch {}", branch);
    Ok(())
}

/// Give GitHub time to reflect recent changes in its API before asserting on them
pub async fn wait_for_github_to_be_ready() {
    tokio::time::sleep(GITHUB_READY_DELAY).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RefsweepError;
    use crate::github::MockGitHubClient;
    use log::{Level, Log, Metadata, Record};
    use std::cell::RefCell;
    use std::sync::{Arc, Once};
    use tokio::sync::Barrier;

    thread_local! {
        static CAPTURED: RefCell<Vec<(Level, String)>> = RefCell::new(Vec::new());
    }

    // Tests run on current-thread runtimes, so each test only sees its own records
    struct CaptureLogger;

    impl Log for CaptureLogger {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &Record<'_>) {
            CAPTURED.with(|c| {
                c.borrow_mut()
                    .push((record.level(), record.args().to_string()))
            });
        }

        fn flush(&self) {}
    }

    fn capture_logs() {
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            log::set_boxed_logger(Box::new(CaptureLogger)).unwrap();
            log::set_max_level(log::LevelFilter::Trace);
        });
        CAPTURED.with(|c| c.borrow_mut().clear());
    }

    fn warnings() -> Vec<String> {
        CAPTURED.with(|c| {
            c.borrow()
                .iter()
                .filter(|(level, _)| *level == Level::Warn)
                .map(|(_, msg)| msg.clone())
                .collect()
        })
    }

    fn repo() -> RepoId {
        RepoId::new("octo", "sandbox")
    }

    #[tokio::test]
    async fn test_delete_existing_branch() {
        capture_logs();
        let client = MockGitHubClient::new().with_branch("feature-x", "REF_1");

        delete_branches(&client, &repo(), &["feature-x"]).await.unwrap();

        let queries = client.get_metadata_queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].0, repo());
        assert_eq!(queries[0].1, "refs/heads/feature-x");
        assert_eq!(queries[0].2, "refs/heads/feature-x");
        assert_eq!(client.get_deleted_refs(), vec!["REF_1".to_string()]);
        assert!(warnings().is_empty());
    }

    #[tokio::test]
    async fn test_missing_branch_is_skipped_with_warning() {
        capture_logs();
        let client = MockGitHubClient::new();

        delete_branches(&client, &repo(), &["gone"]).await.unwrap();

        assert_eq!(client.get_metadata_queries().len(), 1);
        assert!(client.get_deleted_refs().is_empty());
        assert_eq!(warnings(), vec!["Branch gone not found".to_string()]);
    }

    #[tokio::test]
    async fn test_mixed_batch() {
        capture_logs();
        let client = MockGitHubClient::new()
            .with_branch("a", "REF_A")
            .with_branch("c", "REF_C");
        let branches = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        delete_branches(&client, &repo(), &branches).await.unwrap();

        let mut deleted = client.get_deleted_refs();
        deleted.sort();
        assert_eq!(deleted, vec!["REF_A".to_string(), "REF_C".to_string()]);
        assert_eq!(client.get_metadata_queries().len(), 3);
        assert_eq!(warnings(), vec!["Branch b not found".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let client = MockGitHubClient::new();
        let branches: [&str; 0] = [];

        delete_branches(&client, &repo(), &branches).await.unwrap();

        assert!(client.get_metadata_queries().is_empty());
        assert!(client.get_deleted_refs().is_empty());
    }

    #[tokio::test]
    async fn test_lookups_are_issued_concurrently() {
        // Each lookup blocks until all of them have started, so sequential dispatch never finishes
        let branches = ["one", "two", "three", "four"];
        let client = branches
            .iter()
            .fold(
                MockGitHubClient::new().with_barrier(Arc::new(Barrier::new(branches.len()))),
                |client, branch| client.with_branch(branch, &format!("REF_{}", branch)),
            );

        tokio::time::timeout(
            Duration::from_secs(5),
            delete_branches(&client, &repo(), &branches),
        )
        .await
        .expect("lookups were not dispatched concurrently")
        .unwrap();

        assert_eq!(client.get_metadata_queries().len(), branches.len());
        assert_eq!(client.get_deleted_refs().len(), branches.len());
    }

    #[tokio::test]
    async fn test_failing_lookup_fails_the_batch() {
        let client = MockGitHubClient::new()
            .with_branch("ok", "REF_OK")
            .with_failing_branch("broken");

        let result = delete_branches(&client, &repo(), &["ok", "broken"]).await;

        assert!(matches!(result, Err(RefsweepError::GitHubCli(_))));
    }

    #[tokio::test]
    async fn test_failing_delete_fails_the_batch() {
        let client = MockGitHubClient::new()
            .with_branch("a", "REF_A")
            .with_failing_delete("REF_A");

        let result = delete_branches(&client, &repo(), &["a"]).await;

        assert!(matches!(result, Err(RefsweepError::GitHubCli(_))));
        let queries = client.get_metadata_queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].1, "refs/heads/a");
        assert!(client.get_deleted_refs().is_empty());
    }

    #[tokio::test]
    async fn test_invisible_repository_is_skipped_with_warning() {
        capture_logs();
        let client = MockGitHubClient::new()
            .with_branch("feature-x", "REF_1")
            .with_missing_repository();

        delete_branches(&client, &repo(), &["feature-x"]).await.unwrap();

        assert_eq!(client.get_metadata_queries().len(), 1);
        assert!(client.get_deleted_refs().is_empty());
        assert_eq!(warnings(), vec!["Branch feature-x not found".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_github_to_be_ready() {
        let start = tokio::time::Instant::now();

        wait_for_github_to_be_ready().await;

        assert!(start.elapsed() >= Duration::from_millis(5000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_is_not_done_early() {
        let wait = tokio::spawn(wait_for_github_to_be_ready());

        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert!(!wait.is_finished());

        wait.await.unwrap();
    }
}
