//! Download record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Engine-assigned identity of a download handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DownloadId(pub u64);

impl std::fmt::Display for DownloadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "download-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    /// Transfer in progress
    Downloading,
    /// The engine reported the download finished
    Completed,
    /// The engine reported the download interrupted
    Failed,
}

impl DownloadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadStatus::Downloading => "downloading",
            DownloadStatus::Completed => "completed",
            DownloadStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, DownloadStatus::Downloading)
    }
}

impl std::fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the downloads table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub id: DownloadId,
    pub url: String,
    pub file_name: String,
    pub file_path: PathBuf,
    pub bytes_received: u64,
    /// `None` until the engine knows the size
    pub bytes_total: Option<u64>,
    pub status: DownloadStatus,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl DownloadRecord {
    pub fn new(id: DownloadId, url: String, file_path: PathBuf) -> Self {
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "download".to_string());

        Self {
            id,
            url,
            file_name,
            file_path,
            bytes_received: 0,
            bytes_total: None,
            status: DownloadStatus::Downloading,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Download progress as a percentage (0-100)
    pub fn progress(&self) -> f64 {
        match self.bytes_total {
            Some(total) if total > 0 => {
                (self.bytes_received as f64 / total as f64 * 100.0).min(100.0)
            }
            _ => 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record() {
        let record = DownloadRecord::new(
            DownloadId(7),
            "https://example.com/file.pdf".to_string(),
            PathBuf::from("/downloads/file.pdf"),
        );

        assert_eq!(record.file_name, "file.pdf");
        assert_eq!(record.status, DownloadStatus::Downloading);
        assert_eq!(record.bytes_received, 0);
        assert!(record.completed_at.is_none());
        assert!(record.is_active());
    }

    #[test]
    fn test_progress() {
        let mut record = DownloadRecord::new(
            DownloadId(1),
            "https://example.com/file.zip".to_string(),
            PathBuf::from("/downloads/file.zip"),
        );
        assert_eq!(record.progress(), 0.0);

        record.bytes_total = Some(1000);
        record.bytes_received = 500;
        assert!((record.progress() - 50.0).abs() < 0.01);

        record.bytes_received = 1500;
        assert_eq!(record.progress(), 100.0);
    }
}
