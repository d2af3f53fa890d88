use mlcast_core::{AppError, UploadError};
use mlcast_ingest::IngestError;

impl From<IngestError> for AppError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::InvalidFileType(name) => AppError::Upload(UploadError::Rejected(name)),
            IngestError::FileTooLarge { .. } => {
                AppError::Upload(UploadError::Rejected(e.to_string()))
            }
            IngestError::Parse(p) => AppError::Upload(UploadError::ParseFailed(p.to_string())),
            IngestError::Read(s) => AppError::Upload(UploadError::ReadFailed(s)),
        }
    }
}
