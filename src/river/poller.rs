//! Periodic fetch scheduling and source switching.
//!
//! The [`Poller`] owns the [`RiverState`] and the repeating timer. Fetches run
//! in spawned tasks and report back as [`AppEvent::RiverFetched`]; the event
//! loop hands each completion to [`Poller::apply_fetch`], so every state
//! transition happens on the loop's thread.

use super::fetcher::{fetch_river, FetchError};
use super::model::RiverPayload;
use super::state::{ApplyOutcome, FetchTag, RiverState};
use crate::app::AppEvent;
use crate::util::catch_task_panic;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Shortest accepted poll period.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// What the refresh gate did with a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// The reader is at the top; a fetch was issued.
    Fetched(FetchTag),
    /// The reader has scrolled away; this tick was dropped.
    Skipped,
}

pub struct Poller {
    client: reqwest::Client,
    event_tx: mpsc::Sender<AppEvent>,
    state: RiverState,
    ticker: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new(client: reqwest::Client, event_tx: mpsc::Sender<AppEvent>) -> Self {
        Self {
            client,
            event_tx,
            state: RiverState::new(String::new()),
            ticker: None,
        }
    }

    pub fn state(&self) -> &RiverState {
        &self.state
    }

    /// Whether the poll timer is armed.
    pub fn is_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Make `initial_source` active, fetch it immediately, and arm the timer.
    ///
    /// The immediate fetch bypasses the refresh gate. Returns `None` without
    /// doing anything if the poller is already running.
    pub fn initialize(
        &mut self,
        initial_source: impl Into<String>,
        poll_interval: Duration,
    ) -> Option<FetchTag> {
        if self.ticker.is_some() {
            tracing::warn!(
                source = %self.state.source_key(),
                "Poller already initialized, ignoring"
            );
            return None;
        }

        self.state.switch_source(initial_source);
        let tag = self.fetch();
        self.arm(poll_interval);
        Some(tag)
    }

    fn arm(&mut self, poll_interval: Duration) {
        let period = poll_interval.max(MIN_POLL_INTERVAL);
        tracing::info!(
            source = %self.state.source_key(),
            period_secs = period.as_secs(),
            "Poll timer armed"
        );
        self.ticker = Some(spawn_ticker(period, self.event_tx.clone()));
    }

    /// Decide whether a timer tick fetches.
    ///
    /// Any scroll away from the top drops the tick. Nothing is queued and the
    /// timer keeps its cadence.
    pub fn refresh_gate(&mut self, scroll_offset: usize) -> GateDecision {
        if scroll_offset > 0 {
            tracing::debug!(scroll_offset, "Reader scrolled away, skipping poll");
            return GateDecision::Skipped;
        }
        GateDecision::Fetched(self.fetch())
    }

    /// Issue a fetch against the current source.
    pub fn fetch(&mut self) -> FetchTag {
        let tag = self.state.begin_fetch();
        tracing::debug!(
            source = %tag.source,
            epoch = tag.epoch,
            seq = tag.seq,
            "Issuing river fetch"
        );

        let client = self.client.clone();
        let tx = self.event_tx.clone();
        let task_tag = tag.clone();
        tokio::spawn(async move {
            let result = match catch_task_panic(fetch_river(&client, &task_tag.source)).await {
                Ok(result) => result,
                Err(panic_msg) => {
                    tracing::error!(
                        source = %task_tag.source,
                        error = %panic_msg,
                        "River fetch task panicked"
                    );
                    Err(FetchError::Aborted(panic_msg))
                }
            };
            if let Err(e) = tx
                .send(AppEvent::RiverFetched {
                    tag: task_tag,
                    result,
                })
                .await
            {
                tracing::warn!(error = %e, event = "RiverFetched", "Channel send failed (receiver dropped)");
            }
        });
        tag
    }

    /// Clear the river and fetch `new_source` straight away.
    ///
    /// Fetches still outstanding for the previous source are not cancelled;
    /// their results are discarded when they arrive.
    pub fn change_source(&mut self, new_source: impl Into<String>) -> FetchTag {
        let new_source = new_source.into();
        tracing::info!(
            from = %self.state.source_key(),
            to = %new_source,
            "Switching river source"
        );
        self.state.switch_source(new_source);
        self.fetch()
    }

    /// Apply a completed fetch to the owned state.
    pub fn apply_fetch(
        &mut self,
        tag: &FetchTag,
        result: Result<RiverPayload, FetchError>,
    ) -> ApplyOutcome {
        let outcome = match result {
            Ok(payload) => self.state.apply(tag, Ok(payload)),
            Err(e) => {
                let outcome = self.state.apply(tag, Err(&e));
                if outcome == ApplyOutcome::Failed {
                    tracing::warn!(source = %tag.source, error = %e, "River fetch failed");
                }
                outcome
            }
        };

        match &outcome {
            ApplyOutcome::Applied => tracing::info!(
                source = %tag.source,
                seq = tag.seq,
                feeds = self.state.feeds().len(),
                "River updated"
            ),
            ApplyOutcome::Discarded(reason) => tracing::debug!(
                source = %tag.source,
                epoch = tag.epoch,
                seq = tag.seq,
                reason = ?reason,
                "Discarding stale river fetch"
            ),
            ApplyOutcome::Failed => {}
        }
        outcome
    }

    /// Disarm the poll timer. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
            tracing::debug!("Poll timer stopped");
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawn a task that sends [`AppEvent::PollTick`] every `period`.
///
/// The first tick fires one full period after the call. Ticks missed while
/// the receiver is busy are skipped rather than bunched. The task ends when
/// the receiver is dropped.
pub fn spawn_ticker(period: Duration, tx: mpsc::Sender<AppEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if tx.send(AppEvent::PollTick).await.is_err() {
                tracing::debug!("Poll ticker exiting (receiver dropped)");
                break;
            }
        }
    })
}
