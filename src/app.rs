use crate::config::Config;
use crate::river::{
    ApplyOutcome, FetchError, FetchTag, GateDecision, Poller, RiverPayload, FALLBACK_TITLE,
};
use crate::util::markup_to_text;
use anyhow::Result;
use reqwest::redirect::Policy;
use std::borrow::Cow;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Maximum scroll offset for the river panel (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

/// How long a status message stays on screen.
const STATUS_TTL: Duration = Duration::from_secs(3);

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Create a custom redirect policy with loop detection and limited hops.
///
/// - Limits redirects to 3 hops maximum
/// - Detects redirect loops (same URL appearing twice in chain)
/// - Logs redirect chain for debugging
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        if attempt.previous().iter().any(|prev| prev.as_str() == url.as_str()) {
            return attempt.error("Redirect loop detected");
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// HTTP client shared by every river fetch.
pub fn build_http_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .redirect(create_redirect_policy())
        .user_agent(concat!("riffle/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .build()?;
    Ok(client)
}

// ============================================================================
// Event Types
// ============================================================================

/// Events from background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// The poll timer fired.
    PollTick,
    /// A river fetch finished, successfully or not.
    ///
    /// `tag` identifies the source and generation the fetch was issued
    /// under, so results for a superseded source can be dropped.
    RiverFetched {
        tag: FetchTag,
        result: Result<RiverPayload, FetchError>,
    },
}

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    /// Configured river URLs, in menu order.
    pub sources: Vec<String>,
    /// Index into `sources` of the river being shown.
    pub active_source: usize,
    /// Label for the river panel.
    pub mount: String,
    poll_interval: Duration,
    pub poller: Poller,

    /// Lines scrolled in the river panel. Anything above zero closes the
    /// refresh gate.
    pub scroll_offset: usize,
    /// Visible lines in the river panel (excluding borders).
    /// Updated during rendering to enable scroll clamping in input handlers.
    pub river_visible_lines: usize,
    /// Inner width of the river panel from the last render.
    pub river_viewport_width: usize,
    /// Wrapped line count of the river from the last render.
    pub river_line_count: usize,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    /// Set when state changes; the loop renders and clears it.
    pub needs_redraw: bool,
    /// Window title last pushed to the terminal.
    shown_title: Option<String>,
}

impl App {
    pub fn new(config: &Config, event_tx: mpsc::Sender<AppEvent>) -> Result<Self> {
        let client = build_http_client()?;
        Ok(Self::with_client(config, client, event_tx))
    }

    pub fn with_client(
        config: &Config,
        client: reqwest::Client,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            sources: config.sources.clone(),
            active_source: 0,
            mount: config.mount.clone(),
            poll_interval: config.poll_interval(),
            poller: Poller::new(client, event_tx),
            scroll_offset: 0,
            river_visible_lines: 0,
            river_viewport_width: 0,
            river_line_count: 0,
            status_message: None,
            needs_redraw: true,
            shown_title: None,
        }
    }

    /// Show the first source and start polling.
    pub fn start(&mut self) {
        match self.sources.get(self.active_source).cloned() {
            Some(source) => {
                self.poller.initialize(source, self.poll_interval);
            }
            None => {
                tracing::warn!("No sources configured, nothing to poll");
                self.set_status("No sources configured");
            }
        }
    }

    /// Whether the source menu is shown.
    pub fn has_source_menu(&self) -> bool {
        self.sources.len() > 1
    }

    /// Handle a poll timer tick through the scroll-aware gate.
    pub fn on_poll_tick(&mut self) -> GateDecision {
        self.poller.refresh_gate(self.scroll_offset)
    }

    /// Handle a finished fetch.
    ///
    /// Failures are logged by the poller and never shown; the river keeps
    /// its last good data until a later fetch succeeds.
    pub fn on_river_fetched(
        &mut self,
        tag: FetchTag,
        result: Result<RiverPayload, FetchError>,
    ) -> ApplyOutcome {
        let outcome = self.poller.apply_fetch(&tag, result);
        if outcome == ApplyOutcome::Applied {
            self.needs_redraw = true;
            self.clamp_river_scroll();
        }
        outcome
    }

    /// The window title, when it differs from the one last returned.
    ///
    /// Metadata comes from the network, so the title is flattened to plain
    /// text with control characters and escape sequences removed before it
    /// can reach the terminal.
    pub fn take_title_update(&mut self) -> Option<String> {
        let mut title = markup_to_text(&self.poller.state().document_title());
        if title.is_empty() {
            title = FALLBACK_TITLE.to_string();
        }
        if self.shown_title.as_deref() == Some(title.as_str()) {
            return None;
        }
        self.shown_title = Some(title.clone());
        Some(title)
    }

    // ------------------------------------------------------------------------
    // Source switching
    // ------------------------------------------------------------------------

    /// Switch to the source at `index`.
    ///
    /// Returns false (and does nothing) when `index` is out of range or
    /// already active.
    pub fn select_source(&mut self, index: usize) -> bool {
        let Some(source) = self.sources.get(index).cloned() else {
            return false;
        };
        if index == self.active_source {
            return false;
        }
        self.active_source = index;
        self.scroll_offset = 0;
        self.poller.change_source(source);
        self.needs_redraw = true;
        true
    }

    pub fn next_source(&mut self) -> bool {
        let count = self.sources.len();
        if count < 2 {
            return false;
        }
        self.select_source((self.active_source + 1) % count)
    }

    pub fn prev_source(&mut self) -> bool {
        let count = self.sources.len();
        if count < 2 {
            return false;
        }
        self.select_source((self.active_source + count - 1) % count)
    }

    // ------------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------------

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(lines);
        self.clamp_river_scroll();
    }

    /// Back to the top, which reopens the refresh gate.
    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = MAX_SCROLL;
        self.clamp_river_scroll();
    }

    /// Lines moved by a page scroll.
    pub fn page_size(&self) -> usize {
        (self.river_visible_lines / 2).max(1)
    }

    /// Clamp scroll offset to valid range based on content and viewport size.
    ///
    /// Call this after scrolling or when content/viewport size changes
    /// (e.g., terminal resize, new river applied).
    pub fn clamp_scroll(&mut self, content_lines: usize, visible_lines: usize) {
        let max_scroll = content_lines.saturating_sub(visible_lines);
        self.scroll_offset = self.scroll_offset.min(max_scroll).min(MAX_SCROLL);
    }

    /// Clamp using the line count and viewport from the last render.
    pub fn clamp_river_scroll(&mut self) {
        self.clamp_scroll(self.river_line_count, self.river_visible_lines);
    }

    // ------------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired.
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}
