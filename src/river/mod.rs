//! The river controller: wire types, fetching, state, scheduling and the
//! view projection.
//!
//! Dependency order, leaves first:
//!
//! - [`when`] normalizes feed timestamps
//! - [`view`] projects state into a renderable tree (pure)
//! - [`state`] is the single owned [`RiverState`] and its transitions
//! - [`poller`] drives fetches on a timer, behind the scroll-aware gate
//!
//! ```no_run
//! # async fn demo() {
//! use riffle::app::AppEvent;
//! use riffle::river::Poller;
//! use std::time::Duration;
//! use tokio::sync::mpsc;
//!
//! let (tx, mut rx) = mpsc::channel(16);
//! let mut poller = Poller::new(reqwest::Client::new(), tx);
//! poller.initialize("http://localhost:1337/river.js", Duration::from_secs(60));
//!
//! while let Some(event) = rx.recv().await {
//!     match event {
//!         AppEvent::PollTick => {
//!             poller.refresh_gate(0);
//!         }
//!         AppEvent::RiverFetched { tag, result } => {
//!             poller.apply_fetch(&tag, result);
//!         }
//!     }
//! }
//! # }
//! ```

mod fetcher;
pub mod model;
mod payload;
pub mod poller;
pub mod state;
pub mod view;
pub mod when;

pub use fetcher::{fetch_river, FetchError};
pub use model::{Feed, Item, Metadata, RiverPayload};
pub use payload::{decode, PayloadError};
pub use poller::{spawn_ticker, GateDecision, Poller};
pub use state::{ApplyOutcome, FetchTag, Phase, RiverState, StaleReason, FALLBACK_TITLE};
pub use view::{favicon_url, project, project_in, FeedView, ItemView, RiverView};
pub use when::{parse_when, When};
