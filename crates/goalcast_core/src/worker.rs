//! Background worker for running engine calls without blocking an
//! interactive caller.
//!
//! The worker is a thin transport around the same pure core
//! ([`run_request`]): requests are correlated by an opaque id, waited on with
//! a bounded timeout, and on any transport failure the caller runs the exact
//! same function inline. There is no cooperative cancellation; a started
//! computation runs to completion even if its caller stopped waiting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

use crate::error::DispatchError;
use crate::model::{
    Goal, MonteCarloConfig, ProjectionPoint, RiskAnalysisResult, Scenario, SimulationResult,
    TimeBasedAnalysisResult,
};
use crate::{monte_carlo, projection, risk, scenario, time_series};

/// Default bounded wait before falling back to inline execution.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Request sent to the background worker.
#[derive(Debug, Clone)]
pub enum EngineRequest {
    Projection {
        goal: Goal,
        current_net_worth: f64,
    },
    Scenarios {
        goal: Goal,
        current_net_worth: f64,
        scenarios: Option<Vec<Scenario>>,
    },
    MonteCarlo {
        goal: Goal,
        current_net_worth: f64,
        config: MonteCarloConfig,
    },
    Risk {
        projection: Vec<ProjectionPoint>,
        risk_free_rate: f64,
    },
    TimeSeries {
        projection: Vec<ProjectionPoint>,
    },
}

/// Response from the background worker (large payloads boxed to keep the
/// enum small).
#[derive(Debug)]
pub enum EngineResponse {
    Projection(Vec<ProjectionPoint>),
    Scenarios(FxHashMap<String, Vec<ProjectionPoint>>),
    MonteCarlo(Box<SimulationResult>),
    Risk(Box<RiskAnalysisResult>),
    TimeSeries(Box<TimeBasedAnalysisResult>),
}

/// Execute a work request. This is the single shared core: the worker thread
/// and the inline fallback both call it, so the two paths cannot drift. Every
/// request produces a response; shutdown is an internal worker message, not a
/// request.
#[must_use]
pub fn run_request(request: &EngineRequest) -> EngineResponse {
    match request {
        EngineRequest::Projection {
            goal,
            current_net_worth,
        } => EngineResponse::Projection(projection::generate(goal, *current_net_worth)),
        EngineRequest::Scenarios {
            goal,
            current_net_worth,
            scenarios,
        } => EngineResponse::Scenarios(scenario::run_scenarios(
            goal,
            *current_net_worth,
            scenarios.as_deref(),
        )),
        EngineRequest::MonteCarlo {
            goal,
            current_net_worth,
            config,
        } => EngineResponse::MonteCarlo(Box::new(monte_carlo::simulate(
            goal,
            *current_net_worth,
            config,
        ))),
        EngineRequest::Risk {
            projection,
            risk_free_rate,
        } => EngineResponse::Risk(Box::new(risk::analyze(projection, *risk_free_rate))),
        EngineRequest::TimeSeries { projection } => {
            EngineResponse::TimeSeries(Box::new(time_series::analyze(projection)))
        }
    }
}

/// Internal channel message; exit is only reachable through
/// [`EngineWorker::shutdown`].
enum WorkerMessage {
    Run(u64, EngineRequest),
    Exit,
}

/// Background worker that runs engine requests on a separate thread.
pub struct EngineWorker {
    request_tx: Sender<WorkerMessage>,
    response_rx: Receiver<(u64, EngineResponse)>,
    next_id: AtomicU64,
    timeout: Duration,
    thread: Option<JoinHandle<()>>,
}

impl EngineWorker {
    /// Spawn a worker with the default dispatch timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_DISPATCH_TIMEOUT)
    }

    /// Spawn a worker with a custom dispatch timeout.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let (request_tx, request_rx) = channel::<WorkerMessage>();
        let (response_tx, response_rx) = channel();

        let thread = thread::spawn(move || {
            while let Ok(message) = request_rx.recv() {
                match message {
                    WorkerMessage::Run(id, request) => {
                        if response_tx.send((id, run_request(&request))).is_err() {
                            break;
                        }
                    }
                    WorkerMessage::Exit => break,
                }
            }
        });

        Self {
            request_tx,
            response_rx,
            next_id: AtomicU64::new(0),
            timeout,
            thread: Some(thread),
        }
    }

    /// Dispatch a request to the worker, waiting up to the configured
    /// timeout. Transport failures (timeout, dead worker) degrade gracefully
    /// to running the same pure function inline, so a result is always
    /// produced.
    #[must_use]
    pub fn dispatch(&self, request: EngineRequest) -> EngineResponse {
        match self.try_dispatch(request.clone()) {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(%error, "worker dispatch failed, running inline");
                run_request(&request)
            }
        }
    }

    /// Dispatch without the inline fallback, surfacing transport failures.
    pub fn try_dispatch(&self, request: EngineRequest) -> Result<EngineResponse, DispatchError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.request_tx
            .send(WorkerMessage::Run(id, request))
            .map_err(|_| DispatchError::Disconnected)?;

        let deadline = Instant::now() + self.timeout;
        loop {
            let remaining = deadline
                .checked_duration_since(Instant::now())
                .ok_or(DispatchError::Timeout(self.timeout))?;
            match self.response_rx.recv_timeout(remaining) {
                Ok((response_id, response)) if response_id == id => return Ok(response),
                Ok((stale_id, _)) => {
                    // Response to an earlier request that already timed out.
                    tracing::debug!(stale_id, "dropping stale worker response");
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(DispatchError::Timeout(self.timeout));
                }
                Err(RecvTimeoutError::Disconnected) => return Err(DispatchError::Disconnected),
            }
        }
    }

    /// Ask the worker thread to exit after the current request.
    pub fn shutdown(&self) {
        let _ = self.request_tx.send(WorkerMessage::Exit);
    }
}

impl Default for EngineWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EngineWorker {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
