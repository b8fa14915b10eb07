//! Aurora Tab Management
//!
//! Every tab owns one [`BrowsingContext`]: a profile configuration plus an
//! engine view. The [`TabRegistry`] keeps them in display order and always
//! holds at least one, with exactly one active.
//!
//! The engine itself is a collaborator behind the [`Engine`] and [`WebView`]
//! traits. Views report back through a [`ViewEventSink`] instead of
//! callbacks, so every event carries the id of the context it belongs to.

mod context;
mod engine;
mod error;
mod profile;
mod registry;
mod state;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use context::{BrowsingContext, ContextId};
pub use engine::{view_event_channel, ContextEvent, Engine, ViewEvent, ViewEventSink, WebView};
pub use error::TabError;
pub use profile::{CookiePolicy, ProfileConfig, ProfilePolicy};
pub use registry::{TabEntry, TabRegistry};
pub use state::LoadState;

pub type Result<T> = std::result::Result<T, TabError>;
