//! Download tracker

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::download::{DownloadId, DownloadRecord, DownloadStatus};
use crate::error::DownloadError;
use crate::handle::{DownloadEvent, DownloadEventSink, DownloadHandle, FilePicker, HandleEvent};
use crate::Result;

pub struct DownloadTracker {
    picker: Box<dyn FilePicker>,
    /// Directory offered in the save dialog
    download_dir: PathBuf,
    events: mpsc::UnboundedSender<HandleEvent>,
    /// Table rows in the order downloads were accepted
    records: Vec<DownloadRecord>,
    rows: HashMap<DownloadId, usize>,
}

impl DownloadTracker {
    pub fn new(
        picker: Box<dyn FilePicker>,
        download_dir: PathBuf,
        events: mpsc::UnboundedSender<HandleEvent>,
    ) -> Self {
        Self {
            picker,
            download_dir,
            events,
            records: Vec::new(),
            rows: HashMap::new(),
        }
    }

    /// Decide on a download the engine is asking about.
    ///
    /// Runs inside the engine's callback: the handle is accepted or cancelled
    /// before this returns. Returns the id when a record was created.
    pub fn on_download_requested(&mut self, handle: &mut dyn DownloadHandle) -> Option<DownloadId> {
        let id = handle.id();
        let suggested = self
            .download_dir
            .join(sanitize_file_name(&handle.suggested_file_name()));

        let Some(path) = self.picker.choose_save_path(&suggested) else {
            handle.cancel();
            tracing::info!(download_id = %id, "Download rejected by user");
            return None;
        };

        let file_name = sanitize_file_name(
            &path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.download_dir.clone());

        handle.set_destination(&directory, &file_name);
        handle.accept();
        handle.subscribe(DownloadEventSink::new(id, self.events.clone()));

        let record = DownloadRecord::new(id, handle.url(), directory.join(&file_name));

        tracing::info!(
            download_id = %id,
            url = %record.url,
            path = %record.file_path.display(),
            "Accepted download"
        );

        if self.rows.insert(id, self.records.len()).is_some() {
            tracing::warn!(download_id = %id, "Engine reused a download id");
        }
        self.records.push(record);

        Some(id)
    }

    pub fn on_progress(&mut self, id: DownloadId, received: u64, total: Option<u64>) {
        let Some(record) = self.active_record_mut(id) else {
            return;
        };

        record.bytes_received = received;
        if total.is_some() {
            record.bytes_total = total;
        }
    }

    /// Mark a download completed. The received byte count stays at whatever
    /// the last progress event reported.
    pub fn on_finished(&mut self, id: DownloadId) {
        let Some(record) = self.active_record_mut(id) else {
            return;
        };

        record.status = DownloadStatus::Completed;
        record.completed_at = Some(chrono::Utc::now());

        tracing::info!(
            download_id = %id,
            bytes = record.bytes_received,
            "Completed download"
        );
    }

    pub fn on_failed(&mut self, id: DownloadId, reason: &str) {
        let Some(record) = self.active_record_mut(id) else {
            return;
        };

        record.status = DownloadStatus::Failed;
        record.error = Some(reason.to_string());
        record.completed_at = Some(chrono::Utc::now());

        tracing::warn!(download_id = %id, reason = %reason, "Download failed");
    }

    pub fn apply(&mut self, event: &HandleEvent) {
        match &event.event {
            DownloadEvent::Progress { received, total } => {
                self.on_progress(event.download_id, *received, *total)
            }
            DownloadEvent::Finished => self.on_finished(event.download_id),
            DownloadEvent::Failed(reason) => self.on_failed(event.download_id, reason),
        }
    }

    pub fn get(&self, id: DownloadId) -> Result<&DownloadRecord> {
        self.rows
            .get(&id)
            .and_then(|&row| self.records.get(row))
            .ok_or_else(|| DownloadError::NotFound(id.to_string()))
    }

    /// Every accepted download, in table order
    pub fn records(&self) -> &[DownloadRecord] {
        &self.records
    }

    pub fn active_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_active()).count()
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    fn active_record_mut(&mut self, id: DownloadId) -> Option<&mut DownloadRecord> {
        let Some(&row) = self.rows.get(&id) else {
            tracing::debug!(download_id = %id, "Event for unknown download");
            return None;
        };

        let record = self.records.get_mut(row)?;
        if record.status.is_terminal() {
            tracing::debug!(download_id = %id, status = %record.status, "Event after download ended");
            return None;
        }
        Some(record)
    }
}

fn sanitize_file_name(file_name: &str) -> String {
    let name = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("download")
        .trim();

    if name.is_empty() {
        "download".to_string()
    } else {
        name.to_string()
    }
}
