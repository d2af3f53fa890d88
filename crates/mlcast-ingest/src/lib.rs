//! CSV ingest for the forecast dashboard.
//!
//! Validates an uploaded file, parses a short preview, and tracks the
//! process/analyze/clear lifecycle as a pure state machine.

pub mod actions;
pub mod csv;
pub mod error;
pub mod file;
pub mod session;
pub mod status;

pub use actions::{
    ActionKind, ActionOutcome, ActionRunner, ActionTicket, InsightNote, SimulatedRunner,
    StatsUpdate,
};
pub use csv::{parse_preview, CsvTable, PREVIEW_ROW_LIMIT};
pub use error::{IngestError, ParseError};
pub use file::{validate_upload, UploadedFile};
pub use session::{CsvIngestSession, SessionEffect, SessionEvent, SessionPhase};
pub use status::{StatusKind, UploadStatus, UploadStatusReporter};
