//! Feed polling.
//!
//! A [`Poller`] owns the novelty state and the timer task.  Each timer tick
//! spawns one poll cycle (fetch → filter → notify) as its own task, so a slow
//! cycle never delays the next tick.  Overlapping cycles share the novelty
//! filter; its check-and-record step runs under one short lock, but the
//! order in which overlapping cycles finish is not defined.
//!
//! Every feed or delivery failure ends the cycle with a log line.  Nothing
//! is retried before the next regular tick.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::notify::Notifier;
use crate::novelty::{Novelty, NoveltyFilter};
use crate::source::DataSource;
use crate::supervisor;

/// How a single poll cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The newest item was new and has been delivered.
    Announced(String),
    /// The newest item was already announced.
    Unchanged,
    /// The feed had no items.
    EmptyFeed,
    /// The newest item has no link.
    MissingLink,
    /// The feed could not be fetched or parsed.
    FetchFailed,
    /// The item was recorded as announced but delivery failed.  It will not
    /// be retried.
    DeliveryFailed(String),
}

struct PollCycle {
    source: Arc<dyn DataSource>,
    notifier: Notifier,
    novelty: Mutex<NoveltyFilter>,
}

impl PollCycle {
    async fn run(&self) -> CycleOutcome {
        tracing::info!("🔄 Checking RSS feed...");

        let items = match self.source.fetch().await {
            Ok(items) => items,
            Err(e) => {
                tracing::error!("❌ Error while checking RSS feed {}: {e}", self.source.name());
                return CycleOutcome::FetchFailed;
            }
        };

        // Feed order is trusted: the first item is the newest.
        let Some(latest) = items.first() else {
            tracing::warn!("⚠️ No items found in RSS feed");
            return CycleOutcome::EmptyFeed;
        };

        // Recorded before delivery: at most one attempt per link.
        let verdict = self
            .novelty
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .claim(latest);

        let link = match verdict {
            Novelty::NoLink => {
                tracing::warn!("⚠️ Item without link, skipped");
                return CycleOutcome::MissingLink;
            }
            Novelty::Seen => {
                tracing::info!("ℹ️ No new item");
                return CycleOutcome::Unchanged;
            }
            Novelty::New(link) => link,
        };

        let title = latest.title.as_deref().unwrap_or_default();
        match self.notifier.notify(latest, &link).await {
            Ok(()) => {
                tracing::info!("✅ New item sent: {title}");
                CycleOutcome::Announced(link)
            }
            Err(e) => {
                tracing::error!("❌ Failed to send {link}: {e}");
                CycleOutcome::DeliveryFailed(link)
            }
        }
    }
}

pub struct Poller {
    cycle: Arc<PollCycle>,
    interval: Duration,
    timer: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new(source: Arc<dyn DataSource>, notifier: Notifier, interval: Duration) -> Self {
        Self {
            cycle: Arc::new(PollCycle {
                source,
                notifier,
                novelty: Mutex::new(NoveltyFilter::new()),
            }),
            interval,
            timer: None,
        }
    }

    /// Run one poll cycle right now, outside the timer.
    pub async fn poll_once(&self) -> CycleOutcome {
        self.cycle.run().await
    }

    /// Start the timer: one cycle immediately, then one per interval.
    ///
    /// Calling `start` on a running poller does nothing.
    pub fn start(&mut self) {
        if self.timer.is_some() {
            return;
        }

        let cycle = Arc::clone(&self.cycle);
        let interval = self.interval;

        self.timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                let cycle = Arc::clone(&cycle);
                supervisor::spawn_guarded("poll cycle", async move {
                    cycle.run().await;
                });
            }
        }));
    }

    /// Stop the timer.  A cycle already in flight runs to completion.
    pub fn stop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn last_announced(&self) -> String {
        self.cycle
            .novelty
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last_announced()
            .to_string()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}
