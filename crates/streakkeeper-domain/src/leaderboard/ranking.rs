use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;

use crate::shared::Identity;
use crate::streak::UserStatistics;

/// One row of the rendered leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub identity: Identity,
    pub streak: u64,
    pub total: u64,
    pub is_current_actor: bool,
}

/// An identity whose statistics were fetched, before ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankCandidate {
    pub identity: Identity,
    pub statistics: UserStatistics,
}

impl RankCandidate {
    pub fn new(identity: Identity, statistics: UserStatistics) -> Self {
        Self {
            identity,
            statistics,
        }
    }
}

/// Deduplicate candidates and append the current actor when absent.
///
/// First occurrence wins, so the returned order is the order in which
/// identities were first supplied.
pub fn build_working_set(candidates: &[Identity], current_actor: Option<&Identity>) -> Vec<Identity> {
    let mut seen = HashSet::new();
    let mut working_set = Vec::with_capacity(candidates.len() + 1);

    for identity in candidates.iter().chain(current_actor) {
        if identity.is_empty() {
            continue;
        }
        if seen.insert(identity.clone()) {
            working_set.push(identity.clone());
        }
    }

    working_set
}

/// Sort by streak then total (both descending) and assign dense 1-based ranks.
///
/// The sort is stable: entries with equal streak and total keep their input
/// order and receive consecutive ranks.
pub fn rank_entries(
    candidates: Vec<RankCandidate>,
    current_actor: Option<&Identity>,
) -> Vec<LeaderboardEntry> {
    let mut candidates = candidates;
    candidates.sort_by_key(|c| {
        (
            Reverse(c.statistics.current_streak),
            Reverse(c.statistics.total_checkins),
        )
    });

    candidates
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| LeaderboardEntry {
            rank: index + 1,
            is_current_actor: current_actor == Some(&candidate.identity),
            streak: candidate.statistics.current_streak,
            total: candidate.statistics.total_checkins,
            identity: candidate.identity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identity {
        Identity::from_string(s)
    }

    fn candidate(s: &str, streak: u64, total: u64) -> RankCandidate {
        RankCandidate::new(id(s), UserStatistics::new(streak, streak, total))
    }

    #[test]
    fn test_working_set_removes_duplicates_keeping_first_position() {
        let set = build_working_set(&[id("B"), id("A"), id("B"), id("C"), id("A")], None);
        assert_eq!(set, vec![id("B"), id("A"), id("C")]);
    }

    #[test]
    fn test_working_set_appends_new_actor() {
        let actor = id("U");
        let set = build_working_set(&[id("A")], Some(&actor));
        assert_eq!(set, vec![id("A"), id("U")]);
    }

    #[test]
    fn test_working_set_does_not_duplicate_actor_already_in_candidates() {
        let actor = id("A");
        let set = build_working_set(&[id("A"), id("B")], Some(&actor));
        assert_eq!(set, vec![id("A"), id("B")]);
    }

    #[test]
    fn test_working_set_skips_blank_identities() {
        let set = build_working_set(&[id(""), id("A"), id("   ")], None);
        assert_eq!(set, vec![id("A")]);
    }

    #[test]
    fn test_working_set_empty() {
        assert!(build_working_set(&[], None).is_empty());
    }

    #[test]
    fn test_rank_by_streak_then_total() {
        let entries = rank_entries(
            vec![candidate("A", 5, 10), candidate("B", 5, 20), candidate("C", 8, 1)],
            None,
        );

        let order: Vec<(&str, usize, u64, u64)> = entries
            .iter()
            .map(|e| (e.identity.as_str(), e.rank, e.streak, e.total))
            .collect();
        assert_eq!(order, vec![("C", 1, 8, 1), ("B", 2, 5, 20), ("A", 3, 5, 10)]);
        assert!(entries.iter().all(|e| !e.is_current_actor));
    }

    #[test]
    fn test_full_ties_keep_input_order_with_distinct_ranks() {
        let entries = rank_entries(
            vec![candidate("X", 2, 2), candidate("Y", 2, 2), candidate("Z", 2, 2)],
            None,
        );

        let order: Vec<(&str, usize)> = entries
            .iter()
            .map(|e| (e.identity.as_str(), e.rank))
            .collect();
        assert_eq!(order, vec![("X", 1), ("Y", 2), ("Z", 3)]);
    }

    #[test]
    fn test_current_actor_flag_set_once() {
        let actor = id("B");
        let entries = rank_entries(
            vec![candidate("A", 1, 1), candidate("B", 3, 3)],
            Some(&actor),
        );

        let flagged: Vec<&LeaderboardEntry> = entries.iter().filter(|e| e.is_current_actor).collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].identity, actor);
        assert_eq!(flagged[0].rank, 1);
    }

    #[test]
    fn test_zero_statistics_rank_last() {
        let entries = rank_entries(
            vec![candidate("Zero", 0, 0), candidate("Active", 1, 1)],
            None,
        );

        assert_eq!(entries[0].identity.as_str(), "Active");
        assert_eq!(entries[1].identity.as_str(), "Zero");
        assert_eq!(entries[1].rank, 2);
    }

    #[test]
    fn test_ranks_are_dense() {
        let entries = rank_entries(
            (0..12)
                .map(|i| candidate(&format!("P{}", i), (i % 4) as u64, (i % 3) as u64))
                .collect(),
            None,
        );

        let ranks: Vec<usize> = entries.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, (1..=12).collect::<Vec<_>>());

        for pair in entries.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(a.streak > b.streak || (a.streak == b.streak && a.total >= b.total));
        }
    }

    #[test]
    fn test_empty_candidates_rank_to_empty() {
        assert!(rank_entries(Vec::new(), None).is_empty());
    }
}
