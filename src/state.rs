use crate::error::Result;
use crate::schema::AnalysisResult;
use log::{debug, warn};
use std::future::Future;
use std::time::Duration;

/// Cadence of the cosmetic progress ticker.
pub const TICK_INTERVAL: Duration = Duration::from_millis(180);

/// How long the bar is shown at 100 before the result replaces it.
pub const RESULT_DISPLAY_DELAY: Duration = Duration::from_millis(500);

const TICK_STEP: u8 = 2;
const TICK_CEILING: u8 = 90;
const PROGRESS_DONE: u8 = 100;

/// The single active application state. Owned by [`AppController`];
/// replaced wholesale on every transition.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Upload,
    Analyzing { progress: u8 },
    Result(AnalysisResult),
    Error(String),
}

#[derive(Debug)]
pub enum Event {
    FileSubmitted,
    Tick,
    RequestSucceeded {
        generation: u64,
        result: AnalysisResult,
    },
    RequestFailed {
        generation: u64,
        message: String,
    },
    DisplayDelayElapsed,
    Reset,
}

/// Finite-state controller for one analysis session.
///
/// The progress ticker and the real request run independently; the
/// transition to `Result` happens only after the request has resolved AND
/// progress has been forced to 100, so the bar never completes out of
/// order. A reset bumps the generation counter, which makes any completion
/// event from an abandoned request a discard rather than a stale update.
pub struct AppController {
    state: AppState,
    pending: Option<AnalysisResult>,
    generation: u64,
}

impl AppController {
    pub fn new() -> Self {
        Self {
            state: AppState::Upload,
            pending: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Token identifying the current session; completion events carrying an
    /// older token are ignored.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn dispatch(&mut self, event: Event) -> &AppState {
        match event {
            Event::FileSubmitted => {
                // Transition table enforces single-flight: submitting while
                // a request is active is a no-op.
                if matches!(self.state, AppState::Upload) {
                    self.state = AppState::Analyzing { progress: 0 };
                }
            }
            Event::Tick => {
                if let AppState::Analyzing { progress } = self.state {
                    if self.pending.is_none() && progress < TICK_CEILING {
                        self.state = AppState::Analyzing {
                            progress: (progress + TICK_STEP).min(TICK_CEILING),
                        };
                    }
                }
            }
            Event::RequestSucceeded { generation, result } => {
                if generation != self.generation {
                    warn!("Discarding analysis result from an abandoned request");
                } else if matches!(self.state, AppState::Analyzing { .. }) {
                    self.pending = Some(result);
                    self.state = AppState::Analyzing {
                        progress: PROGRESS_DONE,
                    };
                }
            }
            Event::RequestFailed {
                generation,
                message,
            } => {
                if generation != self.generation {
                    warn!("Discarding analysis failure from an abandoned request");
                } else if matches!(self.state, AppState::Analyzing { .. }) {
                    self.pending = None;
                    self.state = AppState::Error(message);
                }
            }
            Event::DisplayDelayElapsed => {
                if matches!(self.state, AppState::Analyzing { .. }) {
                    if let Some(result) = self.pending.take() {
                        self.state = AppState::Result(result);
                    }
                }
            }
            Event::Reset => {
                // Also legal while Analyzing: interest in the in-flight
                // request is discarded, the request itself is abandoned.
                self.pending = None;
                self.generation += 1;
                self.state = AppState::Upload;
            }
        }
        &self.state
    }

    /// Drives a full analysis session: enters `Analyzing(0)`, races the
    /// cosmetic ticker against `request`, and applies the display delay on
    /// success. The ticker is dropped the moment the request settles.
    ///
    /// Generic over the request future so callers compose ingestion and the
    /// client however they like (and tests can drive it without a network).
    pub async fn run_analysis<F>(&mut self, request: F) -> &AppState
    where
        F: Future<Output = Result<AnalysisResult>>,
    {
        self.dispatch(Event::FileSubmitted);
        if !matches!(self.state, AppState::Analyzing { .. }) {
            return &self.state;
        }

        let generation = self.generation;
        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.tick().await; // first tick resolves immediately

        tokio::pin!(request);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.dispatch(Event::Tick);
                }
                outcome = &mut request => {
                    match outcome {
                        Ok(result) => {
                            self.dispatch(Event::RequestSucceeded { generation, result });
                        }
                        Err(e) => {
                            debug!("Analysis request failed: {}", e);
                            self.dispatch(Event::RequestFailed {
                                generation,
                                message: e.to_string(),
                            });
                        }
                    }
                    break;
                }
            }
        }

        if self.pending.is_some() {
            tokio::time::sleep(RESULT_DISPLAY_DELAY).await;
            self.dispatch(Event::DisplayDelayElapsed);
        }

        &self.state
    }
}

impl Default for AppController {
    fn default() -> Self {
        Self::new()
    }
}
