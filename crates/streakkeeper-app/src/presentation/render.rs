use std::fmt::Write;

use crate::application::dtos::{
    AlertReportDto, DashboardSnapshotDto, LeaderboardSnapshotDto, StoryDto, StreakProgressDto,
    UserStatsDto,
};

const PROGRESS_BAR_WIDTH: usize = 20;

pub fn render_leaderboard(snapshot: &LeaderboardSnapshotDto) -> String {
    if snapshot.entries.is_empty() {
        return "Live Leaderboard\nNo participants yet.\n".to_string();
    }

    let mut out = String::from("Live Leaderboard\n");
    let _ = writeln!(out, "{:<6}{:<22}{:>8}{:>8}", "Rank", "User", "Streak", "Total");

    for entry in &snapshot.entries {
        let user = if entry.is_current_actor {
            format!("{} (You)", entry.short_address)
        } else {
            entry.short_address.clone()
        };
        let _ = writeln!(
            out,
            "{:<6}{:<22}{:>8}{:>8}",
            format!("#{}", entry.rank),
            user,
            entry.streak,
            entry.total
        );
    }

    out
}

pub fn render_progress(progress: &StreakProgressDto) -> String {
    let filled = (progress.percentage as usize * PROGRESS_BAR_WIDTH / 100).min(PROGRESS_BAR_WIDTH);
    format!(
        "[{}{}] {}% of {} days\n{}",
        "#".repeat(filled),
        "-".repeat(PROGRESS_BAR_WIDTH - filled),
        progress.percentage,
        progress.target,
        progress.message
    )
}

pub fn render_stats(stats: &UserStatsDto) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Address:         {}", stats.address);
    if !stats.registered {
        let _ = writeln!(out, "No check-ins recorded yet.");
    }
    let _ = writeln!(out, "Current streak:  {}", stats.current_streak);
    let _ = writeln!(out, "Best streak:     {}", stats.max_streak);
    let _ = writeln!(out, "Total check-ins: {}", stats.total_checkins);
    let _ = writeln!(out, "{}", render_progress(&stats.progress));
    out
}

pub fn render_dashboard(snapshot: &DashboardSnapshotDto) -> String {
    let mut out = String::new();
    match &snapshot.stats {
        Some(stats) => out.push_str(&render_stats(stats)),
        None if snapshot.phase.actor().is_some() => {
            out.push_str("Streak statistics are unavailable right now.\n")
        }
        None => out.push_str("Connect a wallet to see your streak.\n"),
    }
    out.push('\n');
    out.push_str(&render_leaderboard(&snapshot.leaderboard));
    out
}

pub fn render_story(story: &StoryDto) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", story.content);
    if !story.last_word.is_empty() {
        let _ = writeln!(out, "\nLast word: {}", story.last_word);
    }
    if !story.contributors.is_empty() {
        let names: Vec<&str> = story
            .contributors
            .iter()
            .map(|c| c.short_address.as_str())
            .collect();
        let _ = writeln!(out, "Contributors: {}", names.join(", "));
    }
    out
}

pub fn render_alert_report(report: &AlertReportDto) -> String {
    format!(
        "{} check-in alert(s): {} sent, {} failed, {} skipped",
        report.alerts, report.sent, report.failed, report.skipped
    )
}
