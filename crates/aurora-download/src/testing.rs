//! Scripted collaborators for download tests

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::download::DownloadId;
use crate::handle::{DownloadEventSink, DownloadHandle, FilePicker};

/// A download handle that records what the tracker did with it.
#[derive(Debug)]
pub struct FakeDownload {
    id: DownloadId,
    url: String,
    suggested: String,
    destination: Option<(PathBuf, String)>,
    accepted: bool,
    cancelled: bool,
    sink: Option<DownloadEventSink>,
}

impl FakeDownload {
    pub fn new(id: u64, url: &str, suggested: &str) -> Self {
        Self {
            id: DownloadId(id),
            url: url.to_string(),
            suggested: suggested.to_string(),
            destination: None,
            accepted: false,
            cancelled: false,
            sink: None,
        }
    }

    pub fn accepted(&self) -> bool {
        self.accepted
    }

    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn destination(&self) -> Option<(PathBuf, String)> {
        self.destination.clone()
    }

    /// The sink the tracker subscribed, for emitting engine events by hand.
    pub fn sink(&self) -> Option<DownloadEventSink> {
        self.sink.clone()
    }
}

impl DownloadHandle for FakeDownload {
    fn id(&self) -> DownloadId {
        self.id
    }

    fn url(&self) -> String {
        self.url.clone()
    }

    fn suggested_file_name(&self) -> String {
        self.suggested.clone()
    }

    fn set_destination(&mut self, directory: &Path, file_name: &str) {
        self.destination = Some((directory.to_path_buf(), file_name.to_string()));
    }

    fn accept(&mut self) {
        self.accepted = true;
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }

    fn subscribe(&mut self, events: DownloadEventSink) {
        self.sink = Some(events);
    }
}

#[derive(Default)]
struct PickerScript {
    answers: VecDeque<Option<PathBuf>>,
    suggestions: Vec<PathBuf>,
}

/// A save dialog that replays queued answers. With nothing queued it behaves
/// like the user pressing cancel.
#[derive(Clone, Default)]
pub struct ScriptedPicker {
    script: Arc<Mutex<PickerScript>>,
}

impl ScriptedPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(&self, path: Option<PathBuf>) {
        self.script.lock().answers.push_back(path);
    }

    /// Paths the dialog was opened with, in order.
    pub fn suggestions(&self) -> Vec<PathBuf> {
        self.script.lock().suggestions.clone()
    }
}

impl FilePicker for ScriptedPicker {
    fn choose_save_path(&mut self, suggested: &Path) -> Option<PathBuf> {
        let mut script = self.script.lock();
        script.suggestions.push(suggested.to_path_buf());
        script.answers.pop_front().flatten()
    }
}
