use log::{info, warn};
use std::sync::Arc;
use tracing::instrument;

use streakkeeper_domain::dashboard::{DashboardEvent, DashboardPhase};
use streakkeeper_domain::leaderboard::build_working_set;
use streakkeeper_domain::session::WalletSession;
use streakkeeper_domain::shared::{DomainError, Identity};
use streakkeeper_domain::streak::UserStatisticsSource;

use crate::application::dtos::{DashboardSnapshotDto, LeaderboardSnapshotDto, UserStatsDto};
use crate::application::queries::LeaderboardQueries;

/// Streak statistics, milestone progress and the leaderboard for one user
pub struct DashboardService {
    statistics_source: Arc<dyn UserStatisticsSource>,
    leaderboard: LeaderboardQueries,
    candidates: Vec<Identity>,
}

impl DashboardService {
    pub fn new(statistics_source: Arc<dyn UserStatisticsSource>, candidates: Vec<Identity>) -> Self {
        Self {
            leaderboard: LeaderboardQueries::new(statistics_source.clone()),
            statistics_source,
            candidates,
        }
    }

    pub fn candidates(&self) -> &[Identity] {
        &self.candidates
    }

    /// Statistics and NFT milestone progress for one address.
    /// An address the ledger has never seen reports zeros.
    pub async fn get_user_stats(&self, identity: &Identity) -> Result<UserStatsDto, DomainError> {
        let lookup = self.statistics_source.fetch_user_statistics(identity).await?;
        Ok(UserStatsDto::from_lookup(identity, lookup))
    }

    pub async fn get_leaderboard(&self, session: &WalletSession) -> LeaderboardSnapshotDto {
        let entries = self
            .leaderboard
            .compute_for_session(&self.candidates, session)
            .await;

        LeaderboardSnapshotDto::new(session.current_actor().map(ToString::to_string), entries)
    }

    /// Load the actor's statistics and the leaderboard, then leave the
    /// loading phase. A failed statistics lookup still ends in `Ready`.
    #[instrument(skip(self, phase), fields(phase = phase.name()))]
    pub async fn load(&self, phase: DashboardPhase) -> Result<DashboardSnapshotDto, DomainError> {
        let actor = match phase.actor() {
            Some(actor) if phase.is_loading() => actor.clone(),
            _ => {
                return Err(DomainError::InvalidTransition(format!(
                    "dashboard data can only be loaded while loading_data, not {}",
                    phase.name()
                )))
            }
        };

        // One lookup per identity: the stats card and the actor's row share a snapshot
        let working_set = build_working_set(&self.candidates, Some(&actor));
        let results = self.leaderboard.fetch_statistics(&working_set).await;
        let actor_lookup = results
            .iter()
            .find(|(identity, _)| identity == &actor)
            .and_then(|(_, result)| result.as_ref().ok().copied());
        let entries = LeaderboardQueries::rank_fetched(results, Some(&actor));
        let leaderboard = LeaderboardSnapshotDto::new(Some(actor.to_string()), entries);

        let (event, stats) = match actor_lookup {
            Some(lookup) => (
                DashboardEvent::DataLoaded,
                Some(UserStatsDto::from_lookup(&actor, lookup)),
            ),
            None => {
                warn!("[leaderboard] statistics for {} unavailable", actor);
                (DashboardEvent::LoadFailed, None)
            }
        };

        let phase = phase.apply(event)?;
        info!(
            "[leaderboard] dashboard {} for {} ({} ranked)",
            phase.name(),
            actor,
            leaderboard.entries.len()
        );

        Ok(DashboardSnapshotDto {
            phase,
            stats,
            leaderboard,
        })
    }

    /// Open the dashboard for whatever the wallet session currently holds
    pub async fn open(&self, session: &WalletSession) -> Result<DashboardSnapshotDto, DomainError> {
        match session.current_actor() {
            Some(actor) => {
                let phase =
                    DashboardPhase::Idle.apply(DashboardEvent::SessionRestored(actor.clone()))?;
                self.load(phase).await
            }
            None => Ok(DashboardSnapshotDto {
                phase: DashboardPhase::Idle,
                stats: None,
                leaderboard: self.get_leaderboard(session).await,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
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

    fn service(mock: MockStatsSource, candidates: &[&str]) -> DashboardService {
        DashboardService::new(Arc::new(mock), candidates.iter().map(|c| id(c)).collect())
    }

    #[tokio::test]
    async fn test_user_stats_include_progress() {
        let mut mock = MockStatsSource::new();
        mock.expect_fetch_user_statistics()
            .returning(|_| Ok(StatisticsLookup::Found(UserStatistics::new(5, 9, 30))));

        let stats = service(mock, &[]).get_user_stats(&id("U")).await.unwrap();

        assert_eq!(stats.current_streak, 5);
        assert_eq!(stats.max_streak, 9);
        assert!(stats.registered);
        assert_eq!(stats.progress.percentage, 71);
        assert!(!stats.progress.completed);
    }

    #[tokio::test]
    async fn test_unknown_user_reports_zero() {
        let mut mock = MockStatsSource::new();
        mock.expect_fetch_user_statistics()
            .returning(|_| Ok(StatisticsLookup::NotFound));

        let stats = service(mock, &[]).get_user_stats(&id("U")).await.unwrap();

        assert!(!stats.registered);
        assert_eq!(stats.total_checkins, 0);
        assert_eq!(stats.progress.percentage, 0);
    }

    #[tokio::test]
    async fn test_open_with_session_reaches_ready() {
        let mut mock = MockStatsSource::new();
        mock.expect_fetch_user_statistics().returning(|identity| {
            if identity.as_str() == "U" {
                Ok(StatisticsLookup::Found(UserStatistics::new(7, 7, 7)))
            } else {
                Ok(StatisticsLookup::Found(UserStatistics::new(1, 1, 1)))
            }
        });
        let session = WalletSession::connected(id("U")).unwrap();

        let snapshot = service(mock, &["A"]).open(&session).await.unwrap();

        assert_eq!(
            snapshot.phase,
            DashboardPhase::Ready {
                actor: id("U"),
                last_tx: None
            }
        );
        assert!(snapshot.stats.as_ref().unwrap().progress.completed);
        assert_eq!(snapshot.leaderboard.current_actor.as_deref(), Some("U"));
        assert_eq!(snapshot.leaderboard.actor_entry().unwrap().rank, 1);
    }

    #[tokio::test]
    async fn test_failed_stats_still_ready_without_stats() {
        let mut mock = MockStatsSource::new();
        mock.expect_fetch_user_statistics().returning(|identity| {
            if identity.as_str() == "U" {
                Err(DomainError::Transport("timeout".to_string()))
            } else {
                Ok(StatisticsLookup::NotFound)
            }
        });

        let phase = DashboardPhase::LoadingData { actor: id("U") };
        let snapshot = service(mock, &["A"]).load(phase).await.unwrap();

        assert!(matches!(snapshot.phase, DashboardPhase::Ready { .. }));
        assert!(snapshot.stats.is_none());
        assert_eq!(snapshot.leaderboard.entries.len(), 1);
    }

    #[tokio::test]
    async fn test_load_fetches_actor_once() {
        let mut mock = MockStatsSource::new();
        mock.expect_fetch_user_statistics()
            .withf(|identity| identity.as_str() == "U")
            .times(1)
            .returning(|_| Ok(StatisticsLookup::Found(UserStatistics::new(3, 4, 9))));
        mock.expect_fetch_user_statistics()
            .withf(|identity| identity.as_str() == "A")
            .times(1)
            .returning(|_| Ok(StatisticsLookup::Found(UserStatistics::new(1, 1, 1))));

        let phase = DashboardPhase::LoadingData { actor: id("U") };
        let snapshot = service(mock, &["A", "U"]).load(phase).await.unwrap();

        let stats = snapshot.stats.unwrap();
        let row = snapshot.leaderboard.actor_entry().unwrap();
        assert_eq!(row.streak, stats.current_streak);
        assert_eq!(row.total, stats.total_checkins);
        assert_eq!(row.rank, 1);
        assert_eq!(snapshot.leaderboard.entries.len(), 2);
    }

    #[tokio::test]
    async fn test_open_without_session_shows_leaderboard_only() {
        let mut mock = MockStatsSource::new();
        mock.expect_fetch_user_statistics()
            .returning(|_| Ok(StatisticsLookup::NotFound));

        let snapshot = service(mock, &["A", "B"])
            .open(&WalletSession::default())
            .await
            .unwrap();

        assert_eq!(snapshot.phase, DashboardPhase::Idle);
        assert!(snapshot.stats.is_none());
        assert!(snapshot.leaderboard.actor_entry().is_none());
        assert_eq!(snapshot.leaderboard.entries.len(), 2);
    }

    #[tokio::test]
    async fn test_load_outside_loading_phase_rejected() {
        let mut mock = MockStatsSource::new();
        mock.expect_fetch_user_statistics().never();

        let result = service(mock, &[]).load(DashboardPhase::Idle).await;

        assert!(matches!(result, Err(DomainError::InvalidTransition(_))));
    }
}
