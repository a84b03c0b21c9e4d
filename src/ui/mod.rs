//! Terminal user interface.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Key to command mapping
//! - `events` - Background event processing
//! - `render` - Layout and render dispatch
//! - `header` - River title bar
//! - `sources` - Source menu tabs
//! - `river` - Scrollable river panel
//! - `status` - Status bar

mod events;
mod header;
mod input;
mod loop_runner;
mod render;
mod river;
mod sources;
mod status;

pub use loop_runner::{run, Action};
