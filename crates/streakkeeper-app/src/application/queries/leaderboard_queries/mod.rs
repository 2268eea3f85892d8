use futures::future::join_all;
use log::{debug, info, warn};
use std::sync::Arc;
use tracing::instrument;

use streakkeeper_domain::leaderboard::{
    build_working_set, rank_entries, LeaderboardEntry, RankCandidate,
};
use streakkeeper_domain::session::WalletSession;
use streakkeeper_domain::shared::{DomainError, Identity};
use streakkeeper_domain::streak::{StatisticsLookup, UserStatisticsSource};

#[cfg(test)]
mod tests;

/// Builds the streak leaderboard from live ledger statistics
pub struct LeaderboardQueries {
    statistics_source: Arc<dyn UserStatisticsSource>,
}

impl LeaderboardQueries {
    pub fn new(statistics_source: Arc<dyn UserStatisticsSource>) -> Self {
        Self { statistics_source }
    }

    /// Rank the candidates plus the current actor by current streak, then
    /// total check-ins.
    ///
    /// All lookups run concurrently. An identity whose lookup fails is left
    /// out of the result; an identity the ledger has never seen is ranked
    /// with zero statistics. Never fails: with nothing to rank the result is
    /// empty.
    #[instrument(skip(self, candidates), fields(candidate_count = candidates.len()))]
    pub async fn compute_leaderboard(
        &self,
        candidates: &[Identity],
        current_actor: Option<&Identity>,
    ) -> Vec<LeaderboardEntry> {
        let working_set = build_working_set(candidates, current_actor);
        if working_set.is_empty() {
            debug!("[leaderboard] nothing to rank");
            return Vec::new();
        }

        let results = self.fetch_statistics(&working_set).await;
        Self::rank_fetched(results, current_actor)
    }

    /// Look up every identity concurrently. Results come back in input
    /// order regardless of completion order.
    pub async fn fetch_statistics(
        &self,
        identities: &[Identity],
    ) -> Vec<(Identity, Result<StatisticsLookup, DomainError>)> {
        let lookups = identities.iter().map(|identity| async move {
            let result = self.statistics_source.fetch_user_statistics(identity).await;
            (identity.clone(), result)
        });
        join_all(lookups).await
    }

    /// Rank fetched results, leaving out every identity whose lookup failed
    pub fn rank_fetched(
        results: Vec<(Identity, Result<StatisticsLookup, DomainError>)>,
        current_actor: Option<&Identity>,
    ) -> Vec<LeaderboardEntry> {
        let attempted = results.len();
        let mut fetched = Vec::with_capacity(attempted);
        for (identity, result) in results {
            match result {
                Ok(lookup) => fetched.push(RankCandidate::new(identity, lookup.into_statistics())),
                Err(e) => warn!(
                    "[leaderboard] dropping {}: {}",
                    identity,
                    e.format_with_code()
                ),
            }
        }

        if fetched.is_empty() && attempted > 0 {
            warn!(
                "[leaderboard] all {} lookups failed, leaderboard is empty",
                attempted
            );
        }

        let entries = rank_entries(fetched, current_actor);
        info!(
            "[leaderboard] ranked {} of {} identities",
            entries.len(),
            attempted
        );

        entries
    }

    /// Same as [`compute_leaderboard`](Self::compute_leaderboard) with the
    /// actor taken from the wallet session
    pub async fn compute_for_session(
        &self,
        candidates: &[Identity],
        session: &WalletSession,
    ) -> Vec<LeaderboardEntry> {
        self.compute_leaderboard(candidates, session.current_actor())
            .await
    }
}
