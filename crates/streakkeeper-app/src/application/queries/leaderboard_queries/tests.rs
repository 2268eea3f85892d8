use super::*;
use async_trait::async_trait;
use mockall::mock;
use mockall::predicate::eq;
use std::collections::HashMap;
use std::time::Duration;

use streakkeeper_domain::shared::DomainError;
use streakkeeper_domain::streak::{StatisticsLookup, UserStatistics};

mock! {
    pub StatsSource {}

    #[async_trait]
    impl UserStatisticsSource for StatsSource {
        async fn fetch_user_statistics(
            &self,
            identity: &Identity,
        ) -> Result<StatisticsLookup, DomainError>;
    }
}

fn id(s: &str) -> Identity {
    Identity::from_string(s)
}

fn found(streak: u64, total: u64) -> Result<StatisticsLookup, DomainError> {
    Ok(StatisticsLookup::Found(UserStatistics::new(streak, streak, total)))
}

/// Mock answering from a fixed table; identities not in the table fail with a transport error
fn source_with(table: Vec<(&str, Result<StatisticsLookup, DomainError>)>) -> MockStatsSource {
    let mut mock = MockStatsSource::new();
    for (identity, response) in table {
        let mut response = Some(response);
        mock.expect_fetch_user_statistics()
            .with(eq(id(identity)))
            .times(1)
            .returning(move |_| {
                response
                    .take()
                    .unwrap_or_else(|| Err(DomainError::Transport("called twice".to_string())))
            });
    }
    mock
}

fn queries(source: MockStatsSource) -> LeaderboardQueries {
    LeaderboardQueries::new(Arc::new(source))
}

fn ranking(entries: &[LeaderboardEntry]) -> Vec<(usize, &str, u64, u64, bool)> {
    entries
        .iter()
        .map(|e| (e.rank, e.identity.as_str(), e.streak, e.total, e.is_current_actor))
        .collect()
}

#[tokio::test]
async fn test_orders_by_streak_then_total() {
    let queries = queries(source_with(vec![
        ("A", found(5, 10)),
        ("B", found(5, 20)),
        ("C", found(8, 1)),
    ]));

    let entries = queries
        .compute_leaderboard(&[id("A"), id("B"), id("C")], None)
        .await;

    assert_eq!(
        ranking(&entries),
        vec![
            (1, "C", 8, 1, false),
            (2, "B", 5, 20, false),
            (3, "A", 5, 10, false),
        ]
    );
}

#[tokio::test]
async fn test_actor_alone_is_ranked_first() {
    let queries = queries(source_with(vec![("U", found(3, 3))]));

    let entries = queries.compute_leaderboard(&[], Some(&id("U"))).await;

    assert_eq!(ranking(&entries), vec![(1, "U", 3, 3, true)]);
}

#[tokio::test]
async fn test_actor_among_candidates_uses_live_statistics() {
    // A is fetched exactly once even though it is both candidate and actor
    let queries = queries(source_with(vec![("A", found(4, 4))]));

    let entries = queries.compute_leaderboard(&[id("A")], Some(&id("A"))).await;

    assert_eq!(ranking(&entries), vec![(1, "A", 4, 4, true)]);
}

#[tokio::test]
async fn test_transport_failure_drops_only_that_identity() {
    let queries = queries(source_with(vec![
        ("A", found(1, 1)),
        ("B", Err(DomainError::Transport("timeout".to_string()))),
    ]));

    let entries = queries.compute_leaderboard(&[id("A"), id("B")], None).await;

    assert_eq!(ranking(&entries), vec![(1, "A", 1, 1, false)]);
}

#[tokio::test]
async fn test_empty_input_makes_no_lookups() {
    let mut mock = MockStatsSource::new();
    mock.expect_fetch_user_statistics().never();

    let entries = queries(mock).compute_leaderboard(&[], None).await;

    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_not_found_is_ranked_with_zero_statistics() {
    let queries = queries(source_with(vec![
        ("A", Ok(StatisticsLookup::NotFound)),
        ("B", found(2, 9)),
    ]));

    let entries = queries.compute_leaderboard(&[id("A"), id("B")], None).await;

    assert_eq!(
        ranking(&entries),
        vec![(1, "B", 2, 9, false), (2, "A", 0, 0, false)]
    );
}

#[tokio::test]
async fn test_all_failures_yield_empty_leaderboard() {
    let queries = queries(source_with(vec![
        ("A", Err(DomainError::Transport("reset".to_string()))),
        ("B", Err(DomainError::Deserialization("bad tuple".to_string()))),
        ("C", Err(DomainError::Validation("bad checksum".to_string()))),
    ]));

    let entries = queries
        .compute_leaderboard(&[id("A"), id("B"), id("C")], Some(&id("C")))
        .await;

    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_failed_actor_lookup_flags_nobody() {
    let queries = queries(source_with(vec![
        ("A", found(1, 1)),
        ("U", Err(DomainError::Transport("timeout".to_string()))),
    ]));

    let entries = queries.compute_leaderboard(&[id("A")], Some(&id("U"))).await;

    assert_eq!(ranking(&entries), vec![(1, "A", 1, 1, false)]);
}

#[tokio::test]
async fn test_duplicate_candidates_are_fetched_once() {
    let queries = queries(source_with(vec![("A", found(2, 2)), ("B", found(1, 1))]));

    let entries = queries
        .compute_leaderboard(&[id("A"), id("B"), id("A"), id("B")], None)
        .await;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].identity, id("A"));
}

#[tokio::test]
async fn test_ranks_are_dense_and_actor_flag_unique() {
    let queries = queries(source_with(vec![
        ("A", found(3, 3)),
        ("B", found(3, 3)),
        ("U", found(3, 3)),
        ("D", found(0, 0)),
    ]));

    let entries = queries
        .compute_leaderboard(&[id("A"), id("B"), id("U"), id("D")], Some(&id("U")))
        .await;

    let ranks: Vec<usize> = entries.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
    assert_eq!(entries.iter().filter(|e| e.is_current_actor).count(), 1);
    // Ties keep working-set order
    assert_eq!(
        ranking(&entries),
        vec![
            (1, "A", 3, 3, false),
            (2, "B", 3, 3, false),
            (3, "U", 3, 3, true),
            (4, "D", 0, 0, false),
        ]
    );
}

#[tokio::test]
async fn test_session_supplies_the_actor() {
    let queries = queries(source_with(vec![("A", found(1, 5)), ("U", found(2, 2))]));
    let session = WalletSession::connected(id("U")).unwrap();

    let entries = queries.compute_for_session(&[id("A")], &session).await;

    assert_eq!(
        ranking(&entries),
        vec![(1, "U", 2, 2, true), (2, "A", 1, 5, false)]
    );
}

#[tokio::test]
async fn test_disconnected_session_has_no_actor() {
    let queries = queries(source_with(vec![("A", found(1, 5))]));

    let entries = queries
        .compute_for_session(&[id("A")], &WalletSession::default())
        .await;

    assert_eq!(ranking(&entries), vec![(1, "A", 1, 5, false)]);
}

/// Answers after a per-identity delay so completion order differs from issue order
struct DelayedSource {
    delays_ms: HashMap<&'static str, u64>,
}

#[async_trait]
impl UserStatisticsSource for DelayedSource {
    async fn fetch_user_statistics(
        &self,
        identity: &Identity,
    ) -> Result<StatisticsLookup, DomainError> {
        let delay = self.delays_ms.get(identity.as_str()).copied().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        found(1, 1)
    }
}

#[tokio::test(start_paused = true)]
async fn test_ties_follow_issue_order_not_completion_order() {
    let source = DelayedSource {
        delays_ms: HashMap::from([("A", 300), ("B", 200), ("C", 100)]),
    };
    let queries = LeaderboardQueries::new(Arc::new(source));
    let started = tokio::time::Instant::now();

    let entries = queries
        .compute_leaderboard(&[id("A"), id("B"), id("C")], None)
        .await;

    let order: Vec<&str> = entries.iter().map(|e| e.identity.as_str()).collect();
    assert_eq!(order, vec!["A", "B", "C"]);
    // Lookups overlap: total wait is the slowest lookup, not the sum
    assert!(started.elapsed() < Duration::from_millis(600));
}

#[tokio::test]
async fn test_repeated_calls_are_deterministic() {
    let mut mock = MockStatsSource::new();
    mock.expect_fetch_user_statistics()
        .returning(|identity| match identity.as_str() {
            "A" => found(5, 10),
            "B" => found(5, 20),
            _ => found(8, 1),
        });
    let queries = queries(mock);
    let candidates = [id("A"), id("B"), id("C")];

    let first = queries.compute_leaderboard(&candidates, None).await;
    let second = queries.compute_leaderboard(&candidates, None).await;

    assert_eq!(first, second);
}
