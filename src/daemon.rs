//! Background daemon for periodic refresh and sync.
//!
//! Runs a fixed-interval loop so feeds stay current without system
//! scheduler configuration. Overlap protection lives in the refresher
//! and sync client themselves; the daemon just ticks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::interval;
use tracing::{error, info, warn};

use crate::app::AppContext;
use crate::refresh::RefreshStatus;

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Update interval in seconds (default: 3600 = 1 hour)
    pub update_interval_secs: u64,
    /// Whether to run an update immediately on start
    pub update_on_start: bool,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            update_interval_secs: 3600,
            update_on_start: true,
        }
    }
}

impl DaemonConfig {
    /// Parse interval string like "1h", "30m", "6h", "1d"
    pub fn parse_interval(s: &str) -> Result<u64, String> {
        let s = s.trim().to_lowercase();

        if let Some(hours) = s.strip_suffix('h') {
            hours
                .parse::<u64>()
                .map(|h| h * 3600)
                .map_err(|_| format!("Invalid hours: {}", hours))
        } else if let Some(minutes) = s.strip_suffix('m') {
            minutes
                .parse::<u64>()
                .map(|m| m * 60)
                .map_err(|_| format!("Invalid minutes: {}", minutes))
        } else if let Some(days) = s.strip_suffix('d') {
            days.parse::<u64>()
                .map(|d| d * 86400)
                .map_err(|_| format!("Invalid days: {}", days))
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.parse::<u64>()
                .map_err(|_| format!("Invalid seconds: {}", secs))
        } else {
            s.parse::<u64>()
                .map_err(|_| format!("Invalid interval: {}. Use format like '1h', '30m', '1d'", s))
        }
    }

    /// Format interval for display
    pub fn format_interval(secs: u64) -> String {
        if secs >= 86400 && secs % 86400 == 0 {
            format!("{}d", secs / 86400)
        } else if secs >= 3600 && secs % 3600 == 0 {
            format!("{}h", secs / 3600)
        } else if secs >= 60 && secs % 60 == 0 {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }
}

pub struct Daemon {
    ctx: Arc<AppContext>,
    config: DaemonConfig,
    running: Arc<AtomicBool>,
}

impl Daemon {
    pub fn new(ctx: Arc<AppContext>, config: DaemonConfig) -> Self {
        Self {
            ctx,
            config,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub async fn run(&self) -> crate::app::Result<()> {
        let running = self.running.clone();

        #[cfg(unix)]
        {
            let running_clone = running.clone();
            tokio::spawn(async move {
                let sigterm =
                    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate());
                let sigint =
                    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt());
                match (sigterm, sigint) {
                    (Ok(mut term), Ok(mut int)) => {
                        tokio::select! {
                            _ = term.recv() => {},
                            _ = int.recv() => {},
                        }
                    }
                    _ => {
                        let _ = tokio::signal::ctrl_c().await;
                    }
                }
                running_clone.store(false, Ordering::SeqCst);
            });
        }

        #[cfg(not(unix))]
        {
            let running_clone = running.clone();
            tokio::spawn(async move {
                let _ = tokio::signal::ctrl_c().await;
                running_clone.store(false, Ordering::SeqCst);
            });
        }

        info!(
            interval = %DaemonConfig::format_interval(self.config.update_interval_secs),
            "daemon started"
        );

        if self.config.update_on_start {
            self.run_update().await;
        }

        let mut timer = interval(Duration::from_secs(self.config.update_interval_secs));
        timer.tick().await; // Skip the first immediate tick

        while self.running.load(Ordering::SeqCst) {
            timer.tick().await;

            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            self.run_update().await;
        }

        info!("daemon shutting down");
        Ok(())
    }

    /// One refresh cycle plus a sync pass when an endpoint is configured.
    async fn run_update(&self) {
        if !self.ctx.settings.refresh_enabled {
            info!("refresh disabled in settings, skipping tick");
            return;
        }

        let start = Utc::now();

        match self.ctx.refresher.refresh(self.ctx.store.clone()).await {
            Ok(RefreshStatus::Completed(outcome)) => {
                for issue in &outcome.issues {
                    warn!(source = %issue.source_id, error = %issue.message, "source failed");
                }
                let elapsed = Utc::now().signed_duration_since(start);
                info!(
                    new_items = outcome.new_items,
                    errors = outcome.issues.len(),
                    secs = elapsed.num_milliseconds() as f64 / 1000.0,
                    "refresh complete"
                );
            }
            Ok(RefreshStatus::Skipped) => {
                info!("refresh already in flight, skipping tick");
            }
            Ok(RefreshStatus::Stale { run_id }) => {
                warn!(run_id, "refresh results arrived stale, discarded");
            }
            Err(e) => {
                error!("refresh failed: {}", e);
            }
        }

        if let Some(sync) = &self.ctx.sync {
            match sync.run(self.ctx.store.as_ref()).await {
                Ok(summary) => {
                    info!(
                        accepted = summary.accepted,
                        skipped = summary.skipped,
                        cursor = %summary.cursor,
                        "sync complete"
                    );
                }
                Err(e) => {
                    error!("sync failed: {}", e);
                }
            }
        }
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interval() {
        assert_eq!(DaemonConfig::parse_interval("1h").unwrap(), 3600);
        assert_eq!(DaemonConfig::parse_interval("30m").unwrap(), 1800);
        assert_eq!(DaemonConfig::parse_interval("1d").unwrap(), 86400);
        assert_eq!(DaemonConfig::parse_interval("60s").unwrap(), 60);
        assert_eq!(DaemonConfig::parse_interval("3600").unwrap(), 3600);
        assert_eq!(DaemonConfig::parse_interval("6h").unwrap(), 21600);
        assert!(DaemonConfig::parse_interval("invalid").is_err());
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(DaemonConfig::format_interval(3600), "1h");
        assert_eq!(DaemonConfig::format_interval(1800), "30m");
        assert_eq!(DaemonConfig::format_interval(86400), "1d");
        assert_eq!(DaemonConfig::format_interval(90), "90s");
        assert_eq!(DaemonConfig::format_interval(7200), "2h");
    }
}
