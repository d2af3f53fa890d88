//! CSV ingest backend: drives the session and runs process/analyze actions.
//! Actions run on the runtime and report back as session events over mpsc.

use std::path::Path;
use std::sync::Arc;

use mlcast_core::AppError;
use mlcast_ingest::{
    ActionRunner, ActionTicket, CsvIngestSession, SessionEffect, SessionEvent, UploadedFile,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub struct IngestService<R> {
    session: CsvIngestSession,
    runner: Arc<R>,
    runtime: Handle,
    max_bytes: u64,
    cancel: Option<CancellationToken>,
    tx: mpsc::UnboundedSender<SessionEvent>,
    rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl<R: ActionRunner> IngestService<R> {
    pub fn new(runner: R, max_bytes: u64, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session: CsvIngestSession::new(max_bytes),
            runner: Arc::new(runner),
            runtime,
            max_bytes,
            cancel: None,
            tx,
            rx,
        }
    }

    pub fn session(&self) -> &CsvIngestSession {
        &self.session
    }

    /// Feed one event through the session and start any requested action.
    pub fn dispatch(&mut self, event: SessionEvent) -> Vec<SessionEffect> {
        let effects = self.session.handle(event);

        for effect in &effects {
            if let SessionEffect::StartAction(ticket) = effect {
                self.spawn_action(*ticket);
            }
        }

        // Clear or a new load dropped the in-flight action.
        if self.session.in_flight().is_none() {
            if let Some(token) = self.cancel.take() {
                token.cancel();
            }
        }

        effects
    }

    /// Read a file from disk and select it.
    pub async fn load_path(&mut self, path: &Path) -> Vec<SessionEffect> {
        let event = match UploadedFile::from_path(path, self.max_bytes).await {
            Ok(file) => SessionEvent::FileSelected(file),
            Err(e) => {
                let app_error = AppError::from(e.clone());
                tracing::warn!(
                    "Could not load {}: {} ({})",
                    path.display(),
                    app_error,
                    app_error.user_message()
                );
                SessionEvent::FileRejected(e)
            }
        };
        self.dispatch(event)
    }

    /// Apply one finished action, if any has reported back.
    pub fn try_recv(&mut self) -> Option<Vec<SessionEffect>> {
        let event = self.rx.try_recv().ok()?;
        Some(self.dispatch(event))
    }

    /// Wait for the in-flight action to report back. `None` when idle.
    ///
    /// A stale report yields an empty effect list.
    pub async fn next_completion(&mut self) -> Option<Vec<SessionEffect>> {
        self.session.in_flight()?;
        let event = self.rx.recv().await?;
        Some(self.dispatch(event))
    }

    fn spawn_action(&mut self, ticket: ActionTicket) {
        let Some(table) = self.session.table().cloned() else {
            tracing::error!("Action {} started without a table", ticket.kind.label());
            return;
        };

        let token = CancellationToken::new();
        if let Some(previous) = self.cancel.replace(token.clone()) {
            previous.cancel();
        }

        let runner = Arc::clone(&self.runner);
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let event = tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("CSV {} cancelled", ticket.kind.label());
                    return;
                }
                result = runner.run(ticket, table) => match result {
                    Ok(outcome) => SessionEvent::ActionCompleted { ticket, outcome },
                    Err(message) => SessionEvent::ActionFailed { ticket, message },
                },
            };
            if tx.send(event).is_err() {
                tracing::error!("Ingest receiver dropped");
            }
        });
    }
}
