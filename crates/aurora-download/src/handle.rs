//! Engine and OS collaborators for downloads

use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::download::DownloadId;

/// The engine's side of one requested download.
///
/// The request has to be accepted or cancelled before the engine's
/// download callback returns.
pub trait DownloadHandle {
    fn id(&self) -> DownloadId;
    fn url(&self) -> String;
    fn suggested_file_name(&self) -> String;
    fn set_destination(&mut self, directory: &Path, file_name: &str);
    fn accept(&mut self);
    fn cancel(&mut self);
    /// Route this download's progress and completion to `events`.
    fn subscribe(&mut self, events: DownloadEventSink);
}

/// The OS save dialog.
pub trait FilePicker {
    /// `None` when the user cancels.
    fn choose_save_path(&mut self, suggested: &Path) -> Option<PathBuf>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    Progress { received: u64, total: Option<u64> },
    Finished,
    Failed(String),
}

/// A download event tagged with its handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleEvent {
    pub download_id: DownloadId,
    pub event: DownloadEvent,
}

#[derive(Debug, Clone)]
pub struct DownloadEventSink {
    download_id: DownloadId,
    tx: mpsc::UnboundedSender<HandleEvent>,
}

impl DownloadEventSink {
    pub fn new(download_id: DownloadId, tx: mpsc::UnboundedSender<HandleEvent>) -> Self {
        Self { download_id, tx }
    }

    pub fn download_id(&self) -> DownloadId {
        self.download_id
    }

    pub fn emit(&self, event: DownloadEvent) -> bool {
        self.tx
            .send(HandleEvent {
                download_id: self.download_id,
                event,
            })
            .is_ok()
    }

    pub fn progress(&self, received: u64, total: Option<u64>) -> bool {
        self.emit(DownloadEvent::Progress { received, total })
    }

    pub fn finished(&self) -> bool {
        self.emit(DownloadEvent::Finished)
    }

    pub fn failed(&self, reason: impl Into<String>) -> bool {
        self.emit(DownloadEvent::Failed(reason.into()))
    }
}

pub fn download_event_channel() -> (
    mpsc::UnboundedSender<HandleEvent>,
    mpsc::UnboundedReceiver<HandleEvent>,
) {
    mpsc::unbounded_channel()
}
