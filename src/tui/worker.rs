//! Background worker for backend requests.
//!
//! Runs one [`Job`] against the terminology service without blocking the
//! TUI main loop. Progress and the final result come back over a channel
//! that the UI polls every frame.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::application::{run_job, DashboardError, Job, JobKind, JobOutcome, ReportStep};
use crate::ports::{ApiError, TerminologyApi};

/// Updates from the request worker.
#[derive(Debug)]
pub enum RequestProgress {
    /// Report generation moved to the next request
    Step(ReportStep),
    /// Job finished
    Finished(Result<JobOutcome, DashboardError>),
}

/// Handle to a running request worker.
pub struct RequestWorkerHandle {
    kind: JobKind,
    progress_rx: Receiver<RequestProgress>,
    _handle: JoinHandle<()>,
}

impl RequestWorkerHandle {
    #[must_use]
    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// Try to receive the next progress update (non-blocking).
    ///
    /// A worker that exits without reporting is turned into a failed job.
    #[must_use]
    pub fn try_recv(&self) -> Option<RequestProgress> {
        match self.progress_rx.try_recv() {
            Ok(progress) => Some(progress),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(RequestProgress::Finished(Err(DashboardError::Api(
                ApiError::Http("request worker stopped unexpectedly".to_string()),
            )))),
        }
    }
}

/// Spawns backend requests on a background thread.
pub struct RequestWorker;

impl RequestWorker {
    /// Spawn a background request.
    ///
    /// Returns a handle to receive progress updates.
    pub fn spawn(api: Arc<dyn TerminologyApi>, job: Job) -> RequestWorkerHandle {
        let kind = job.kind();
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_with_progress(api.as_ref(), job, &tx);
        });

        RequestWorkerHandle {
            kind,
            progress_rx: rx,
            _handle: handle,
        }
    }

    fn run_with_progress(api: &dyn TerminologyApi, job: Job, tx: &Sender<RequestProgress>) {
        let kind = job.kind();
        tracing::debug!(job = ?kind, "Request started");

        let result = run_job(api, job, &mut |step| {
            let _ = tx.send(RequestProgress::Step(step));
        });

        // The UI may have left the dashboard; a closed channel is fine.
        let _ = tx.send(RequestProgress::Finished(result));
    }
}
