//! Uploaded file handling and pre-parse validation.

use std::path::Path;

use crate::error::IngestError;

/// A file picked or dropped by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    name: String,
    size_bytes: u64,
    raw_text: String,
}

impl UploadedFile {
    /// Build from raw bytes. Invalid UTF-8 is replaced, like a browser text read.
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            name: name.into(),
            size_bytes: bytes.len() as u64,
            raw_text: String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let raw_text = text.into();
        Self {
            name: name.into(),
            size_bytes: raw_text.len() as u64,
            raw_text,
        }
    }

    /// Describe a file whose reported size differs from its text, as a picker does
    /// before the contents are read.
    pub fn with_reported_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    /// Read a file from disk.
    ///
    /// Type and size are checked from metadata before the contents are read,
    /// so an oversized file is never loaded.
    ///
    /// # Errors
    /// Validation errors as in [`validate_upload`], or `Read` on I/O failure.
    pub async fn from_path(path: &Path, max_bytes: u64) -> Result<Self, IngestError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| IngestError::Read(e.to_string()))?;

        validate_upload(&name, metadata.len(), max_bytes)?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| IngestError::Read(e.to_string()))?;

        tracing::debug!("Read {} ({} bytes)", name, bytes.len());
        Ok(Self::from_bytes(name, &bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }
}

/// Check name and size against upload rules.
///
/// # Errors
/// `InvalidFileType` unless the name ends in `.csv` (any case),
/// `FileTooLarge` when `size_bytes` exceeds `max_bytes`.
pub fn validate_upload(name: &str, size_bytes: u64, max_bytes: u64) -> Result<(), IngestError> {
    if !name.to_lowercase().ends_with(".csv") {
        return Err(IngestError::InvalidFileType(name.to_string()));
    }

    if size_bytes > max_bytes {
        return Err(IngestError::file_too_large(size_bytes, max_bytes));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlcast_core::config::DEFAULT_MAX_UPLOAD_BYTES;

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn accepts_csv_any_case() {
        assert!(validate_upload("data.csv", 10, DEFAULT_MAX_UPLOAD_BYTES).is_ok());
        assert!(validate_upload("DATA.CSV", 10, DEFAULT_MAX_UPLOAD_BYTES).is_ok());
        assert!(validate_upload("Weather.Csv", 10, DEFAULT_MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn rejects_other_extensions() {
        for name in ["data.txt", "data.csv.bak", "csv", "data"] {
            let err = validate_upload(name, 10, DEFAULT_MAX_UPLOAD_BYTES).unwrap_err();
            assert!(matches!(err, IngestError::InvalidFileType(_)), "{name}");
        }
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(validate_upload("a.csv", 5 * MIB, DEFAULT_MAX_UPLOAD_BYTES).is_ok());
        let err = validate_upload("a.csv", 5 * MIB + 1, DEFAULT_MAX_UPLOAD_BYTES).unwrap_err();
        assert!(matches!(err, IngestError::FileTooLarge { .. }));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let file = UploadedFile::from_bytes("a.csv", b"a,b\n\xff,2\n");
        assert_eq!(file.size_bytes(), 9);
        assert!(file.raw_text().contains('\u{FFFD}'));
    }

    #[tokio::test]
    async fn from_path_reads_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("obs.csv");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let file = UploadedFile::from_path(&path, 5 * MIB).await.unwrap();
        assert_eq!(file.name(), "obs.csv");
        assert_eq!(file.size_bytes(), 8);
        assert_eq!(file.raw_text(), "a,b\n1,2\n");
    }

    #[tokio::test]
    async fn from_path_rejects_oversize_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.csv");
        std::fs::write(&path, vec![b'x'; 64]).unwrap();

        let err = UploadedFile::from_path(&path, 32).await.unwrap_err();
        assert!(matches!(err, IngestError::FileTooLarge { size_bytes: 64, .. }));
    }

    #[tokio::test]
    async fn from_path_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = UploadedFile::from_path(&dir.path().join("nope.csv"), MIB)
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Read(_)));
    }
}
