//! Small helpers shared by the river controller and the terminal UI.
//!
//! - **Source URL validation**: scheme and host checks for configured rivers
//! - **Text**: column-aware truncation and flattening of feed markup
//! - **Tasks**: panic capture for spawned work
//!
//! ```
//! use riffle::util::{display_width, markup_to_text, truncate_to_width};
//!
//! let text = markup_to_text("<b>Hello</b> 世界");
//! assert_eq!(display_width(&text), 10);
//! assert_eq!(truncate_to_width(&text, 7), "Hello …");
//! ```

mod task;
mod text;
mod url_validator;

pub use task::catch_task_panic;
pub use text::{display_width, markup_to_text, truncate_to_width};
pub use url_validator::{validate_source_url, UrlValidationError};
