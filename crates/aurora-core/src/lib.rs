//! Aurora Core
//!
//! The shell window: tabs, address bar, downloads dialog and visit history
//! wired together. The embedded engine and the OS save dialog stay behind
//! the [`Engine`] and [`FilePicker`] traits.

mod config;
mod error;
mod shell;

pub use config::Config;
pub use error::CoreError;
pub use shell::{ShellWindow, ToolbarAction, APP_NAME};

// Re-export core components
pub use aurora_download::{
    DownloadError, DownloadEvent, DownloadEventSink, DownloadHandle, DownloadId, DownloadRecord,
    DownloadStatus, DownloadTracker, FilePicker, HandleEvent,
};
pub use aurora_navigation::{AddressBar, DefaultScheme, HistoryStore, InputResolver, NavigationError};
pub use aurora_storage::{JsonFile, StorageError};
pub use aurora_tabs::{
    BrowsingContext, ContextEvent, ContextId, CookiePolicy, Engine, LoadState, ProfileConfig,
    ProfilePolicy, TabError, TabRegistry, ViewEvent, ViewEventSink, WebView,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
