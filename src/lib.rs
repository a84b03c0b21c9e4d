//! riffle: a terminal viewer for an aggregated river of RSS/Atom items.
//!
//! The [`river`] module holds the polling controller and the pure view
//! projection; [`ui`] draws it with ratatui.

pub mod app;
pub mod config;
pub mod dump;
pub mod river;
pub mod ui;
pub mod util;
