//! Single-slot upload status.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadStatus {
    pub kind: StatusKind,
    pub message: String,
}

impl UploadStatus {
    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

/// Holds the one status line shown under the upload box.
///
/// Every report replaces the previous one; there is no history.
#[derive(Debug, Clone, Default)]
pub struct UploadStatusReporter {
    current: Option<UploadStatus>,
}

impl UploadStatusReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, message: impl Into<String>, kind: StatusKind) {
        let status = UploadStatus {
            kind,
            message: message.into(),
        };
        match kind {
            StatusKind::Success => tracing::info!("Upload status: {}", status.message),
            StatusKind::Error => tracing::warn!("Upload status: {}", status.message),
        }
        self.current = Some(status);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.report(message, StatusKind::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.report(message, StatusKind::Error);
    }

    pub fn current(&self) -> Option<&UploadStatus> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
