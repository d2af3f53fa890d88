//! Forecast backend: async fetching with latest-wins delivery.
//! Network work runs on the runtime; results come back over an mpsc channel.

use std::future::Future;
use std::sync::Arc;

use mlcast_weather::{ForecastClient, ForecastError, ForecastResult};
use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Anything that can produce a forecast for a location.
pub trait ForecastSource: Send + Sync + 'static {
    fn fetch(
        &self,
        location: &str,
    ) -> impl Future<Output = Result<ForecastResult, ForecastError>> + Send;
}

impl ForecastSource for ForecastClient {
    async fn fetch(&self, location: &str) -> Result<ForecastResult, ForecastError> {
        self.fetch_forecast(location).await
    }
}

/// A finished fetch, tagged with the request that produced it.
#[derive(Debug)]
pub struct ForecastUpdate {
    pub generation: u64,
    pub location: String,
    pub result: Result<ForecastResult, ForecastError>,
}

#[derive(Debug, Default)]
struct InFlight {
    generation: u64,
    token: Option<CancellationToken>,
}

pub struct ForecastService<S> {
    source: Arc<S>,
    runtime: Handle,
    state: Arc<Mutex<InFlight>>,
    tx: mpsc::UnboundedSender<ForecastUpdate>,
    rx: mpsc::UnboundedReceiver<ForecastUpdate>,
}

impl<S: ForecastSource> ForecastService<S> {
    pub fn new(source: S, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source: Arc::new(source),
            runtime,
            state: Arc::new(Mutex::new(InFlight::default())),
            tx,
            rx,
        }
    }

    /// Start fetching `location`, cancelling whatever was in flight.
    ///
    /// Returns the generation tag of the new request.
    ///
    /// # Errors
    /// `InvalidInput` for a blank location; nothing is cancelled or sent.
    pub fn request(&self, location: &str) -> Result<u64, ForecastError> {
        let location = location.trim();
        if location.is_empty() {
            tracing::warn!("Ignoring forecast request with empty location");
            return Err(ForecastError::InvalidInput);
        }

        let token = CancellationToken::new();
        let generation = {
            let mut state = self.state.lock();
            if let Some(previous) = state.token.replace(token.clone()) {
                previous.cancel();
            }
            state.generation += 1;
            state.generation
        };
        tracing::debug!("Forecast request {} for {}", generation, location);

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let tx = self.tx.clone();
        let location = location.to_string();

        self.runtime.spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("Forecast request {} cancelled", generation);
                    return;
                }
                result = source.fetch(&location) => result,
            };

            let mut state = state.lock();
            if state.generation != generation {
                tracing::debug!("Dropping superseded forecast {}", generation);
                return;
            }
            if tx
                .send(ForecastUpdate {
                    generation,
                    location,
                    result,
                })
                .is_err()
            {
                tracing::error!("Forecast receiver dropped");
            }
            state.token = None;
        });

        Ok(generation)
    }

    pub fn current_generation(&self) -> u64 {
        self.state.lock().generation
    }

    /// True until the latest request has delivered its update.
    pub fn is_pending(&self) -> bool {
        self.state.lock().token.is_some()
    }

    /// Cancel the in-flight request, if any.
    pub fn cancel(&self) {
        if let Some(token) = self.state.lock().token.take() {
            token.cancel();
        }
    }

    /// Next current update without waiting. Superseded updates are skipped.
    pub fn try_recv(&mut self) -> Option<ForecastUpdate> {
        while let Ok(update) = self.rx.try_recv() {
            if self.is_current(&update) {
                return Some(update);
            }
            tracing::debug!("Discarding stale forecast {}", update.generation);
        }
        None
    }

    /// Wait for the latest request to finish. `None` when nothing is pending.
    pub async fn recv(&mut self) -> Option<ForecastUpdate> {
        loop {
            if let Some(update) = self.try_recv() {
                return Some(update);
            }
            if !self.is_pending() {
                return None;
            }
            let update = self.rx.recv().await?;
            if self.is_current(&update) {
                return Some(update);
            }
            tracing::debug!("Discarding stale forecast {}", update.generation);
        }
    }

    fn is_current(&self, update: &ForecastUpdate) -> bool {
        update.generation == self.current_generation()
    }
}
