// src/pipeline/watch.rs

//! Periodic polling loop.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use crate::pipeline::poll::PollCoordinator;

/// Summary of a watch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WatchStats {
    pub cycles: usize,
    pub failures: usize,
}

/// Refresh the coordinator every `interval` until `shutdown` resolves.
///
/// The first cycle starts immediately. A failed cycle is logged and the
/// loop waits for the next tick. A cycle still in flight when `shutdown`
/// resolves is dropped without committing anything.
pub async fn run_watch(
    coordinator: &PollCoordinator,
    interval: Duration,
    shutdown: impl Future<Output = ()>,
) -> WatchStats {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut stats = WatchStats::default();
    futures::pin_mut!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        tokio::select! {
            _ = &mut shutdown => {
                log::info!("Shutdown requested during poll cycle");
                break;
            }
            result = coordinator.refresh() => {
                stats.cycles += 1;
                if let Err(e) = result {
                    stats.failures += 1;
                    log::error!("Recall poll failed, retrying in {:?}: {}", interval, e);
                }
            }
        }
    }

    log::info!(
        "Watch stopped after {} cycle(s), {} failed",
        stats.cycles,
        stats.failures
    );
    stats
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::AppError;
    use crate::models::PollConfig;
    use crate::pipeline::known_ids::KnownIdCache;
    use crate::pipeline::testing::{FakeSource, page_of};

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_shutdown() {
        let source = Arc::new(FakeSource::new(|_| Ok(page_of(3, [3, 2, 1]))));
        let coordinator = PollCoordinator::new(
            source.clone(),
            PollConfig::default(),
            KnownIdCache::new(10).shared(),
        );

        let stats = run_watch(
            &coordinator,
            Duration::from_secs(60),
            time::sleep(Duration::from_secs(150)),
        )
        .await;

        // Ticks at 0s, 60s and 120s.
        assert_eq!(stats.cycles, 3);
        assert_eq!(stats.failures, 0);
        assert_eq!(source.request_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_stop_the_loop() {
        let source = Arc::new(FakeSource::new(|_| Err(AppError::Remote { status: 502 })));
        let coordinator = PollCoordinator::new(
            source,
            PollConfig::default(),
            KnownIdCache::new(10).shared(),
        );

        let stats = run_watch(
            &coordinator,
            Duration::from_secs(10),
            time::sleep(Duration::from_secs(25)),
        )
        .await;

        assert_eq!(stats.cycles, 3);
        assert_eq!(stats.failures, 3);
        assert!(!coordinator.state().await.available());
    }
}
