//! Aurora Download Tracking
//!
//! The engine performs the transfer. This crate decides whether to accept a
//! requested download, asks where to save it and keeps one
//! [`DownloadRecord`] per accepted download for the downloads dialog.

mod download;
mod error;
mod handle;
mod tracker;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use download::{DownloadId, DownloadRecord, DownloadStatus};
pub use error::DownloadError;
pub use handle::{
    download_event_channel, DownloadEvent, DownloadEventSink, DownloadHandle, FilePicker,
    HandleEvent,
};
pub use tracker::DownloadTracker;

pub type Result<T> = std::result::Result<T, DownloadError>;
