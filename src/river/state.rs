//! The single owned state of the river controller.
//!
//! All mutation goes through `&mut self` on the event-loop thread, so each
//! method here is one atomic transition. Fetch completions arrive with the
//! [`FetchTag`] they were issued under and are discarded when the tag no
//! longer describes the current source (see [`RiverState::apply`]).

use super::fetcher::FetchError;
use super::model::{Feed, RiverPayload};
use std::sync::Arc;

/// Window title used when the river carries no title.
pub const FALLBACK_TITLE: &str = "River";

/// Identifies one outstanding fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTag {
    /// Source the request was sent to.
    pub source: String,
    /// Source generation at issue time; bumped by every source change.
    pub epoch: u64,
    /// Monotonic request number, never reused.
    pub seq: u64,
}

/// Where the controller is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing fetched for the current source (or every attempt failed).
    Idle,
    /// At least one fetch for the current source is outstanding.
    Fetching,
    /// A fetch for the current source has succeeded; data is trusted until overwritten.
    Populated,
}

/// Why a completed fetch was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// The active source changed after the request was issued.
    SourceChanged,
    /// A newer request for the same source was already applied.
    Superseded,
}

/// Result of feeding a fetch completion into the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Feeds (and metadata, when present) were replaced.
    Applied,
    /// The fetch failed; state is unchanged.
    Failed,
    /// The completion was stale and ignored.
    Discarded(StaleReason),
}

#[derive(Debug, Clone)]
pub struct RiverState {
    feeds: Arc<Vec<Feed>>,
    source_key: String,
    title: Option<String>,
    description: Option<String>,
    epoch: u64,
    next_seq: u64,
    applied_seq: Option<u64>,
    in_flight: usize,
    populated: bool,
}

impl RiverState {
    pub fn new(source_key: impl Into<String>) -> Self {
        Self {
            feeds: Arc::new(Vec::new()),
            source_key: source_key.into(),
            title: None,
            description: None,
            epoch: 0,
            next_seq: 0,
            applied_seq: None,
            in_flight: 0,
            populated: false,
        }
    }

    /// Feeds in server order. Cheap to clone.
    pub fn feeds(&self) -> &Arc<Vec<Feed>> {
        &self.feeds
    }

    pub fn source_key(&self) -> &str {
        &self.source_key
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn phase(&self) -> Phase {
        if self.in_flight > 0 {
            Phase::Fetching
        } else if self.populated {
            Phase::Populated
        } else {
            Phase::Idle
        }
    }

    /// Window title derived from the river metadata.
    ///
    /// `"{title} | {description}"`, `"{title}"`, or [`FALLBACK_TITLE`].
    pub fn document_title(&self) -> String {
        match (self.title(), self.description()) {
            (Some(title), Some(description)) => format!("{} | {}", title, description),
            (Some(title), None) => title.to_string(),
            (None, _) => FALLBACK_TITLE.to_string(),
        }
    }

    /// Record a new outstanding fetch against the current source.
    pub fn begin_fetch(&mut self) -> FetchTag {
        self.next_seq = self.next_seq.wrapping_add(1);
        self.in_flight += 1;
        FetchTag {
            source: self.source_key.clone(),
            epoch: self.epoch,
            seq: self.next_seq,
        }
    }

    /// Clear displayed data and make `source_key` the active source.
    ///
    /// Outstanding fetches for the previous source become stale.
    pub fn switch_source(&mut self, source_key: impl Into<String>) {
        self.feeds = Arc::new(Vec::new());
        self.title = None;
        self.description = None;
        self.source_key = source_key.into();
        self.epoch = self.epoch.wrapping_add(1);
        self.applied_seq = None;
        self.in_flight = 0;
        self.populated = false;
    }

    /// Apply a completed fetch.
    ///
    /// A success replaces `feeds` wholesale; `title` and `description` are
    /// replaced only when the payload carries metadata. A failure leaves the
    /// state untouched. Completions for another source or epoch, and
    /// successes older than one already applied, are discarded.
    pub fn apply(
        &mut self,
        tag: &FetchTag,
        result: Result<RiverPayload, &FetchError>,
    ) -> ApplyOutcome {
        if tag.source != self.source_key || tag.epoch != self.epoch {
            return ApplyOutcome::Discarded(StaleReason::SourceChanged);
        }

        self.in_flight = self.in_flight.saturating_sub(1);

        let payload = match result {
            Ok(payload) => payload,
            Err(_) => return ApplyOutcome::Failed,
        };

        if self.applied_seq.is_some_and(|applied| tag.seq < applied) {
            return ApplyOutcome::Discarded(StaleReason::Superseded);
        }

        self.feeds = Arc::new(payload.updated_feeds.updated_feed);
        if let Some(metadata) = payload.metadata {
            self.title = metadata.title;
            self.description = metadata.description;
        }
        self.applied_seq = Some(tag.seq);
        self.populated = true;
        ApplyOutcome::Applied
    }
}
