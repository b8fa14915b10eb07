//! Aurora Navigation
//!
//! Address bar input resolution and the session's visit history.
//!
//! Input resolution:
//! 1. `http://` / `https://` input is used as typed
//! 2. `about:`, `file://` and `data:` pass through
//! 3. Anything else gets the default scheme prefixed

mod address;
mod error;
mod history;
mod input;

pub use address::AddressBar;
pub use error::NavigationError;
pub use history::HistoryStore;
pub use input::{DefaultScheme, InputResolver};

pub type Result<T> = std::result::Result<T, NavigationError>;
