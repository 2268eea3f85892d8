use log::{info, warn};
use std::future::Future;
use std::time::Duration;

use streakkeeper_domain::session::WalletSession;
use streakkeeper_domain::shared::Identity;

use super::emit;
use crate::application::services::DashboardService;
use crate::presentation::bootstrap::Services;
use crate::presentation::error::CommandError;
use crate::presentation::render::{render_dashboard, render_leaderboard, render_stats};

fn session_for(actor: Option<&str>) -> Result<WalletSession, CommandError> {
    match actor {
        Some(actor) => Ok(WalletSession::connected(Identity::from_string(actor))?),
        None => Ok(WalletSession::default()),
    }
}

/// Rank the configured participants once
pub async fn show_leaderboard(
    services: &Services,
    actor: Option<&str>,
    json: bool,
) -> Result<(), CommandError> {
    let session = session_for(actor)?;
    let snapshot = services.dashboard.get_leaderboard(&session).await;
    emit(&snapshot, json, render_leaderboard)
}

/// Re-rank every `every` until interrupted
pub async fn watch_leaderboard(
    services: &Services,
    actor: Option<&str>,
    every: Duration,
    json: bool,
) -> Result<(), CommandError> {
    if every.is_zero() {
        return Err(CommandError::validation("refresh interval must be positive"));
    }
    let session = session_for(actor)?;
    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("[leaderboard] cannot listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    refresh_until(&services.dashboard, &session, every, json, interrupted).await
}

/// Refresh loop stopped by `shutdown`. The shutdown future lives across
/// iterations so it also fires while a refresh is in flight.
async fn refresh_until<F>(
    dashboard: &DashboardService,
    session: &WalletSession,
    every: Duration,
    json: bool,
    shutdown: F,
) -> Result<(), CommandError>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = interval.tick() => {
                let snapshot = tokio::select! {
                    _ = &mut shutdown => break,
                    snapshot = dashboard.get_leaderboard(session) => snapshot,
                };
                emit(&snapshot, json, render_leaderboard)?;
                if !json {
                    println!();
                }
            }
        }
    }

    info!("[leaderboard] refresh stopped");
    Ok(())
}

pub async fn show_stats(services: &Services, address: &str, json: bool) -> Result<(), CommandError> {
    let identity = Identity::from_string(address);
    if identity.is_empty() {
        return Err(CommandError::validation("address must not be empty"));
    }
    let stats = services.dashboard.get_user_stats(&identity).await?;
    emit(&stats, json, render_stats)
}

/// Statistics, progress and leaderboard as the dashboard shows them
pub async fn show_dashboard(
    services: &Services,
    actor: Option<&str>,
    json: bool,
) -> Result<(), CommandError> {
    let session = session_for(actor)?;
    let snapshot = services.dashboard.open(&session).await?;
    emit(&snapshot, json, render_dashboard)
}
