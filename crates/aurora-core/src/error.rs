//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] aurora_storage::StorageError),

    #[error("Tab error: {0}")]
    Tab(#[from] aurora_tabs::TabError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] aurora_navigation::NavigationError),

    #[error("Download error: {0}")]
    Download(#[from] aurora_download::DownloadError),
}
