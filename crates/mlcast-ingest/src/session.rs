//! CSV ingest session state machine.
//!
//! `handle` takes one event, updates the session, and returns the effects a
//! renderer or driver should carry out. The session never performs I/O:
//! `StartAction` asks the driver to run an action and report back with
//! `ActionCompleted` or `ActionFailed`.

use mlcast_core::config::DEFAULT_MAX_UPLOAD_BYTES;
use mlcast_core::ActionState;

use crate::actions::{ActionKind, ActionOutcome, ActionTicket, InsightNote, StatsUpdate};
use crate::csv::{parse_preview, CsvTable};
use crate::error::IngestError;
use crate::file::{validate_upload, UploadedFile};
use crate::status::{UploadStatus, UploadStatusReporter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Empty,
    Previewing,
    Processed,
    Analyzed,
}

#[derive(Debug)]
pub enum SessionEvent {
    /// A file was picked or dropped.
    FileSelected(UploadedFile),
    /// Reading a file failed before it could be selected.
    FileRejected(IngestError),
    ProcessRequested,
    AnalyzeRequested,
    ActionCompleted {
        ticket: ActionTicket,
        outcome: ActionOutcome,
    },
    ActionFailed {
        ticket: ActionTicket,
        message: String,
    },
    Clear,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    ShowStatus(UploadStatus),
    ClearStatus,
    ShowPreview(CsvTable),
    HidePreview,
    ShowActions,
    HideActions,
    ResetInput,
    StartAction(ActionTicket),
    ActionRejected(ActionKind),
    /// The in-flight action settled; the UI re-enables its buttons.
    ActionFinished(ActionKind),
    ReplaceInsight(InsightNote),
    AppendInsight(InsightNote),
    UpdateStats(StatsUpdate),
}

#[derive(Debug)]
pub struct CsvIngestSession {
    phase: SessionPhase,
    file: Option<UploadedFile>,
    table: Option<CsvTable>,
    status: UploadStatusReporter,
    action_state: ActionState,
    in_flight: Option<ActionTicket>,
    epoch: u64,
    max_bytes: u64,
}

impl Default for CsvIngestSession {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

impl CsvIngestSession {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            phase: SessionPhase::Empty,
            file: None,
            table: None,
            status: UploadStatusReporter::new(),
            action_state: ActionState::Idle,
            in_flight: None,
            epoch: 0,
            max_bytes,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    pub fn table(&self) -> Option<&CsvTable> {
        self.table.as_ref()
    }

    pub fn status(&self) -> Option<&UploadStatus> {
        self.status.current()
    }

    pub fn in_flight(&self) -> Option<ActionTicket> {
        self.in_flight
    }

    /// True while process or analyze is running; the UI disables both buttons.
    pub fn is_busy(&self) -> bool {
        self.action_state.is_busy()
    }

    pub fn handle(&mut self, event: SessionEvent) -> Vec<SessionEffect> {
        match event {
            SessionEvent::FileSelected(file) => self.on_file(file),
            SessionEvent::FileRejected(err) => self.fail(&err),
            SessionEvent::ProcessRequested => self.on_request(ActionKind::Process),
            SessionEvent::AnalyzeRequested => self.on_request(ActionKind::Analyze),
            SessionEvent::ActionCompleted { ticket, outcome } => self.on_completed(ticket, outcome),
            SessionEvent::ActionFailed { ticket, message } => self.on_failed(ticket, &message),
            SessionEvent::Clear => self.on_clear(),
        }
    }

    fn on_file(&mut self, file: UploadedFile) -> Vec<SessionEffect> {
        if let Err(err) = validate_upload(file.name(), file.size_bytes(), self.max_bytes) {
            return self.fail(&err);
        }

        let table = match parse_preview(file.raw_text()) {
            Ok(table) => table,
            Err(err) => return self.fail(&IngestError::from(err)),
        };

        tracing::info!(
            "Loaded CSV {} ({} columns, {} preview rows)",
            file.name(),
            table.column_count(),
            table.row_count()
        );

        // A new load supersedes any action started on the previous file.
        self.epoch += 1;
        self.in_flight = None;
        self.action_state = ActionState::Idle;

        self.status.success(format!(
            "Successfully loaded CSV: {} ({} bytes)",
            file.name(),
            file.size_bytes()
        ));
        self.file = Some(file);
        self.table = Some(table.clone());
        self.phase = SessionPhase::Previewing;

        vec![
            self.status_effect(),
            SessionEffect::ShowPreview(table),
            SessionEffect::ShowActions,
        ]
    }

    fn fail(&mut self, err: &IngestError) -> Vec<SessionEffect> {
        self.status.error(err.to_string());
        vec![self.status_effect()]
    }

    fn on_request(&mut self, kind: ActionKind) -> Vec<SessionEffect> {
        let allowed = match kind {
            ActionKind::Process => self.action_state.can_start_process(),
            ActionKind::Analyze => self.action_state.can_start_analyze(),
        };

        if self.table.is_none() || !allowed {
            tracing::warn!(
                "Rejected {} request (phase {:?}, busy {})",
                kind.label(),
                self.phase,
                self.is_busy()
            );
            return vec![SessionEffect::ActionRejected(kind)];
        }

        self.action_state = match kind {
            ActionKind::Process => ActionState::BusyProcess,
            ActionKind::Analyze => ActionState::BusyAnalyze,
        };
        let ticket = ActionTicket {
            kind,
            epoch: self.epoch,
        };
        self.in_flight = Some(ticket);
        tracing::debug!("Starting {} (epoch {})", kind.label(), self.epoch);

        vec![SessionEffect::StartAction(ticket)]
    }

    fn take_ticket(&mut self, ticket: ActionTicket) -> bool {
        if self.in_flight != Some(ticket) {
            tracing::debug!(
                "Dropping stale {} result (epoch {}, current {})",
                ticket.kind.label(),
                ticket.epoch,
                self.epoch
            );
            return false;
        }
        self.in_flight = None;
        self.action_state = self.action_state.on_action_done();
        true
    }

    fn on_completed(&mut self, ticket: ActionTicket, outcome: ActionOutcome) -> Vec<SessionEffect> {
        if !self.take_ticket(ticket) {
            return Vec::new();
        }

        self.status.success(outcome.status_message);
        let mut effects = vec![
            SessionEffect::ActionFinished(ticket.kind),
            self.status_effect(),
        ];

        match ticket.kind {
            ActionKind::Process => {
                self.phase = SessionPhase::Processed;
                effects.push(SessionEffect::ReplaceInsight(outcome.insight));
                if let Some(stats) = outcome.stats {
                    effects.push(SessionEffect::UpdateStats(stats));
                }
            }
            ActionKind::Analyze => {
                self.phase = SessionPhase::Analyzed;
                effects.push(SessionEffect::AppendInsight(outcome.insight));
            }
        }

        effects
    }

    fn on_failed(&mut self, ticket: ActionTicket, message: &str) -> Vec<SessionEffect> {
        if !self.take_ticket(ticket) {
            return Vec::new();
        }
        tracing::error!("CSV {} failed: {}", ticket.kind.label(), message);
        self.status
            .error(format!("Error during CSV {}: {}", ticket.kind.label(), message));
        vec![
            SessionEffect::ActionFinished(ticket.kind),
            self.status_effect(),
        ]
    }

    fn on_clear(&mut self) -> Vec<SessionEffect> {
        self.epoch += 1;
        self.file = None;
        self.table = None;
        self.status.clear();
        self.in_flight = None;
        self.action_state = ActionState::Idle;
        self.phase = SessionPhase::Empty;
        tracing::debug!("CSV session cleared");

        vec![
            SessionEffect::ClearStatus,
            SessionEffect::HidePreview,
            SessionEffect::HideActions,
            SessionEffect::ResetInput,
        ]
    }

    fn status_effect(&self) -> SessionEffect {
        match self.status.current() {
            Some(status) => SessionEffect::ShowStatus(status.clone()),
            None => SessionEffect::ClearStatus,
        }
    }
}
