//! Job lifecycle state machine and its polling task.
//!
//! Every submission advances a generation counter. The poll task for a job
//! carries the generation it was armed with, and its outcomes are applied
//! only while that generation is still current. A new submission, a reset,
//! or a shutdown advances the generation and cancels the task's token, so a
//! poll that is already in flight can never write into a newer job.
//!
//! Polls are strictly serialized: each tick awaits its status call before
//! the next tick is awaited, and missed ticks are delayed rather than
//! bunched up, so at most one status call is outstanding per job.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use vidlate_core::error::JobError;
use vidlate_core::job::{Job, JobId, JobState};
use vidlate_core::language::{self, DEFAULT_LANGUAGE_CODE};
use vidlate_core::proxy::{StatusProxy, SubmissionProxy};
use vidlate_core::status::{JobStatus, StatusSnapshot};
use vidlate_core::upload::{UploadRequest, VideoFile};

use crate::events::JobEvent;

/// Fixed delay between status polls (and before the first one).
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Broadcast channel capacity for job notifications.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// How long [`JobController::shutdown`] waits for the poll task to exit.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Owns the client-visible state of at most one job at a time.
///
/// Dropping the controller cancels any running poll task.
pub struct JobController {
    shared: Arc<Shared>,
    /// Master cancellation token; poll tasks run on child tokens.
    cancel: CancellationToken,
}

/// State reachable from both the controller and its poll task.
struct Shared {
    submission: Arc<dyn SubmissionProxy>,
    status: Arc<dyn StatusProxy>,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<JobState>,
    event_tx: broadcast::Sender<JobEvent>,
}

/// Mutable controller state. Only touched while holding [`Shared::inner`].
struct Inner {
    state: JobState,
    job: Option<Job>,
    generation: u64,
    poller: Option<Poller>,
    selected_file: Option<VideoFile>,
    selected_language: String,
}

/// Handle to the poll task of the current job.
struct Poller {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// What a single poll outcome did to the controller.
#[derive(Debug, PartialEq, Eq)]
enum PollOutcome {
    /// The outcome belonged to a job that is no longer current; dropped.
    Stale,
    /// The job is still running; keep polling.
    Continue(JobEvent),
    /// The job reached a terminal state; stop polling.
    Settled(JobEvent),
}

impl JobController {
    /// Create an idle controller with the default language selected.
    pub fn new(submission: Arc<dyn SubmissionProxy>, status: Arc<dyn StatusProxy>) -> Self {
        let (state_tx, _) = watch::channel(JobState::Idle);
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            shared: Arc::new(Shared {
                submission,
                status,
                inner: Mutex::new(Inner::new()),
                state_tx,
                event_tx,
            }),
            cancel: CancellationToken::new(),
        }
    }

    /// Create a controller whose submission and status calls go to the same
    /// backend client.
    pub fn with_backend<B>(backend: Arc<B>) -> Self
    where
        B: SubmissionProxy + StatusProxy + 'static,
    {
        Self::new(backend.clone(), backend)
    }

    /// Subscribe to job notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.shared.event_tx.subscribe()
    }

    /// Watch the lifecycle state.
    pub fn watch_state(&self) -> watch::Receiver<JobState> {
        self.shared.state_tx.subscribe()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> JobState {
        self.shared.state_tx.borrow().clone()
    }

    /// The job accepted by the backend, if any.
    pub async fn job(&self) -> Option<Job> {
        self.shared.inner.lock().await.job.clone()
    }

    /// Choose (or clear) the video to submit next.
    pub async fn select_file(&self, file: Option<VideoFile>) {
        self.shared.inner.lock().await.selected_file = file;
    }

    /// Choose the target language for the next submission.
    pub async fn select_language(&self, code: &str) -> Result<(), JobError> {
        if !language::is_supported(code) {
            return Err(JobError::Validation(format!(
                "Unsupported target language: {code}"
            )));
        }
        self.shared.inner.lock().await.selected_language = code.to_string();
        Ok(())
    }

    /// Currently selected target language code.
    pub async fn selected_language(&self) -> String {
        self.shared.inner.lock().await.selected_language.clone()
    }

    /// Submit the selected file and language.
    ///
    /// Without a selected file this fails with [`JobError::Validation`]
    /// before any network call and leaves the state untouched. Otherwise any
    /// previous job is discarded, the state moves to `Uploading`, and the
    /// Submission Proxy is called once. On success the state moves to
    /// `Processing` and polling is armed; on failure it moves to `Error`.
    ///
    /// Returns [`JobError::Superseded`] if another submission, a reset or a
    /// shutdown happened while the upload was in flight; the outcome is then
    /// discarded.
    pub async fn submit(&self) -> Result<JobId, JobError> {
        if self.cancel.is_cancelled() {
            return Err(JobError::Closed);
        }

        let (generation, request) = {
            let mut inner = self.shared.inner.lock().await;
            let request = match UploadRequest::validated(
                inner.selected_file.clone(),
                &inner.selected_language,
            ) {
                Ok(request) => request,
                Err(e) => {
                    tracing::warn!(error = %e, "Submission rejected");
                    self.shared.notify(JobEvent::ValidationFailed {
                        message: e.to_string(),
                    });
                    return Err(e);
                }
            };

            inner.disarm();
            inner.generation += 1;
            inner.job = None;
            inner.state = JobState::Uploading;
            self.shared.publish_state(&inner);
            (inner.generation, request)
        };

        tracing::info!(
            generation,
            file_name = %request.file.file_name,
            bytes = request.file.len(),
            target_language = %request.target_language,
            "Uploading video"
        );
        self.shared.notify(JobEvent::Uploading {
            file_name: request.file.file_name.clone(),
            target_language: request.target_language.clone(),
        });

        let outcome = tokio::select! {
            _ = self.cancel.cancelled() => return Err(JobError::Closed),
            result = self.shared.submission.submit(&request) => result,
        };

        let mut inner = self.shared.inner.lock().await;
        if inner.generation != generation {
            tracing::debug!(generation, "Discarding outcome of superseded upload");
            return Err(JobError::Superseded);
        }

        match outcome {
            Ok(job_id) => {
                inner.job = Some(Job::new(job_id.clone(), request.target_language));
                inner.state = JobState::Processing;
                inner.poller = Some(self.spawn_poller(generation, job_id.clone()));
                self.shared.publish_state(&inner);

                tracing::info!(job_id = %job_id, generation, "Job submitted, polling armed");
                self.shared.notify(JobEvent::Submitted {
                    job_id: job_id.clone(),
                });
                Ok(job_id)
            }
            Err(e) => {
                inner.state = JobState::Error {
                    message: e.to_string(),
                };
                self.shared.publish_state(&inner);

                tracing::error!(error = %e, generation, "Upload failed");
                self.shared.notify(JobEvent::Failed {
                    job_id: None,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// Abandon the current job and return to `Idle`.
    ///
    /// The file and language selection are kept.
    pub async fn reset(&self) {
        let mut inner = self.shared.inner.lock().await;
        inner.disarm();
        inner.generation += 1;
        inner.job = None;
        inner.state = JobState::Idle;
        self.shared.publish_state(&inner);
        tracing::debug!(generation = inner.generation, "Job controller reset");
    }

    /// Tear the controller down.
    ///
    /// Stops polling immediately and discards any in-flight outcome. The
    /// last observed state is left as-is. Further submissions fail with
    /// [`JobError::Closed`].
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down job controller");
        self.cancel.cancel();

        let poller = {
            let mut inner = self.shared.inner.lock().await;
            inner.generation += 1;
            inner.poller.take()
        };

        if let Some(poller) = poller {
            poller.cancel.cancel();
            let _ = tokio::time::timeout(SHUTDOWN_GRACE, poller.handle).await;
        }

        tracing::info!("Job controller shut down");
    }

    /// Wait until no upload or poll is outstanding and return the state.
    ///
    /// Returns early with the current state if the controller is shut down.
    pub async fn wait_until_settled(&self) -> JobState {
        let mut rx = self.shared.state_tx.subscribe();
        let settled = tokio::select! {
            _ = self.cancel.cancelled() => None,
            result = rx.wait_for(|state| !state.is_busy()) => result.ok().map(|state| state.clone()),
        };
        settled.unwrap_or_else(|| self.state())
    }

    /// Spawn the poll task for `job_id` on a child of the master token.
    fn spawn_poller(&self, generation: u64, job_id: JobId) -> Poller {
        let cancel = self.cancel.child_token();
        let task_cancel = cancel.clone();
        let shared = Arc::clone(&self.shared);

        let handle = tokio::spawn(async move {
            run_poll_loop(shared, generation, job_id, task_cancel).await;
        });

        Poller { cancel, handle }
    }
}

impl Drop for JobController {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl Shared {
    fn notify(&self, event: JobEvent) {
        // Only fails when nobody is subscribed.
        let _ = self.event_tx.send(event);
    }

    fn publish_state(&self, inner: &Inner) {
        self.state_tx.send_replace(inner.state.clone());
    }

    /// Apply one poll outcome and publish whatever it changed.
    async fn apply_poll(
        &self,
        generation: u64,
        outcome: Result<StatusSnapshot, JobError>,
    ) -> PollOutcome {
        let mut inner = self.inner.lock().await;
        let applied = inner.apply_poll(generation, outcome);

        match &applied {
            PollOutcome::Stale => {}
            PollOutcome::Continue(event) => self.notify(event.clone()),
            PollOutcome::Settled(event) => {
                self.publish_state(&inner);
                self.notify(event.clone());
            }
        }

        applied
    }
}

impl Inner {
    fn new() -> Self {
        Self {
            state: JobState::Idle,
            job: None,
            generation: 0,
            poller: None,
            selected_file: None,
            selected_language: DEFAULT_LANGUAGE_CODE.to_string(),
        }
    }

    /// Cancel the poll task, if any. Its in-flight outcome is discarded by
    /// the generation check once the caller advances the generation.
    fn disarm(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.cancel.cancel();
        }
    }

    fn apply_poll(
        &mut self,
        generation: u64,
        outcome: Result<StatusSnapshot, JobError>,
    ) -> PollOutcome {
        if generation != self.generation || self.state != JobState::Processing {
            return PollOutcome::Stale;
        }
        let Some(job_id) = self.job.as_ref().map(|job| job.id.clone()) else {
            return PollOutcome::Stale;
        };

        let snapshot = match outcome {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "Status check failed");
                return self.settle_with_error(job_id, e);
            }
        };

        match snapshot.classify() {
            JobStatus::Completed { result } => {
                tracing::info!(job_id = %job_id, result_len = result.len(), "Job completed");
                self.state = JobState::Completed {
                    result: result.clone(),
                };
                self.poller = None;
                PollOutcome::Settled(JobEvent::Completed { job_id, result })
            }
            JobStatus::Failed { error } => {
                let err = JobError::reported(error.as_deref());
                tracing::warn!(job_id = %job_id, error = %err, "Backend reported job failure");
                self.settle_with_error(job_id, err)
            }
            JobStatus::InProgress { status } => {
                tracing::debug!(job_id = %job_id, status = %status, "Job still processing");
                PollOutcome::Continue(JobEvent::StillProcessing {
                    job_id,
                    status: Some(status),
                })
            }
            JobStatus::AwaitingResult => {
                tracing::warn!(job_id = %job_id, "Job reported completed without a result");
                PollOutcome::Continue(JobEvent::StillProcessing {
                    job_id,
                    status: snapshot.status,
                })
            }
            JobStatus::Unrecognized { status } => {
                tracing::warn!(
                    job_id = %job_id,
                    status = status.as_deref().unwrap_or("<missing>"),
                    "Unrecognized job status, treating as still processing"
                );
                PollOutcome::Continue(JobEvent::StillProcessing { job_id, status })
            }
        }
    }

    fn settle_with_error(&mut self, job_id: JobId, err: JobError) -> PollOutcome {
        let message = err.to_string();
        self.state = JobState::Error {
            message: message.clone(),
        };
        self.poller = None;
        PollOutcome::Settled(JobEvent::Failed {
            job_id: Some(job_id),
            message,
        })
    }
}

/// Poll the status of one job until it settles, goes stale, or is cancelled.
///
/// The first poll fires one [`POLL_INTERVAL`] after arming.
async fn run_poll_loop(
    shared: Arc<Shared>,
    generation: u64,
    job_id: JobId,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + POLL_INTERVAL, POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::debug!(job_id = %job_id, generation, "Poll loop started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            _ = cancel.cancelled() => break,
            result = shared.status.fetch_status(&job_id) => result,
        };

        match shared.apply_poll(generation, outcome).await {
            PollOutcome::Continue(_) => {}
            PollOutcome::Settled(_) | PollOutcome::Stale => break,
        }
    }

    tracing::debug!(job_id = %job_id, generation, "Poll loop exited");
}
