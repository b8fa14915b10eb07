//! Load State Machine
//!
//! ```text
//! Idle
//!   ↓ navigate / load started
//! Loading ←──────────────┐
//!   ↓ load finished      │ navigate, reload,
//! Loaded | Failed ───────┘ back, forward
//! ```
//!
//! Transitions are driven by engine events. There is no timeout or retry.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    /// Nothing requested yet
    #[default]
    Idle,
    /// A load is in flight
    Loading,
    /// The last load finished successfully
    Loaded,
    /// The last load was reported as failed
    Failed,
}

impl LoadState {
    pub fn can_transition_to(&self, target: LoadState) -> bool {
        match (self, target) {
            // Any navigation re-enters Loading, including a new load while
            // one is already running.
            (_, LoadState::Loading) => true,
            (LoadState::Loading, LoadState::Loaded) => true,
            (LoadState::Loading, LoadState::Failed) => true,
            _ => false,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoadState::Idle => "idle",
            LoadState::Loading => "loading",
            LoadState::Loaded => "loaded",
            LoadState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
