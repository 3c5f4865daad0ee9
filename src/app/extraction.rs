use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::knowledge::{JobStatus, KnowledgeApi};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum ExtractionEvent {
    Progress(String),
    Completed,
    Failed(String),
}

#[derive(Clone, Copy, Debug)]
pub(super) struct ExtractionPolicy {
    pub(super) poll_interval: Duration,
    /// Wait used when the backend hands out no job id to poll.
    pub(super) fallback_delay: Duration,
    pub(super) max_polls: u32,
}

impl Default for ExtractionPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            fallback_delay: Duration::from_secs(5),
            max_polls: 150,
        }
    }
}

pub(super) fn run_extraction(
    api: &dyn KnowledgeApi,
    limit: usize,
    policy: ExtractionPolicy,
    mut emit: impl FnMut(ExtractionEvent),
) -> ExtractionEvent {
    let ack = match api.trigger_bulk_extraction(limit) {
        Ok(ack) => ack,
        Err(error) => return ExtractionEvent::Failed(error.to_string()),
    };
    if !ack.message.is_empty() {
        emit(ExtractionEvent::Progress(ack.message.clone()));
    }

    let Some(job_id) = ack.job_id else {
        warn!(
            "extraction acknowledged without a job id; assuming completion after {:?}",
            policy.fallback_delay
        );
        thread::sleep(policy.fallback_delay);
        return ExtractionEvent::Completed;
    };

    info!("polling extraction job {job_id}");
    let mut last_progress = None;
    for _ in 0..policy.max_polls {
        thread::sleep(policy.poll_interval);

        let job = match api.extraction_status(&job_id) {
            Ok(job) => job,
            Err(error) => return ExtractionEvent::Failed(error.to_string()),
        };

        if let Some(message) = job.progress_message
            && last_progress.as_ref() != Some(&message)
        {
            emit(ExtractionEvent::Progress(message.clone()));
            last_progress = Some(message);
        }

        match job.status {
            JobStatus::Completed => {
                info!("extraction job {job_id} completed");
                return ExtractionEvent::Completed;
            }
            JobStatus::Failed => {
                let message = job
                    .error_message
                    .unwrap_or_else(|| "extraction failed".to_owned());
                warn!("extraction job {job_id} failed: {message}");
                return ExtractionEvent::Failed(message);
            }
            JobStatus::Pending | JobStatus::Running => {}
        }
    }

    ExtractionEvent::Failed(format!(
        "extraction job {job_id} did not finish after {} status checks",
        policy.max_polls
    ))
}

pub(super) struct ExtractionTask {
    rx: Receiver<ExtractionEvent>,
    progress: Option<String>,
}

impl ExtractionTask {
    pub(super) fn spawn(
        api: Arc<dyn KnowledgeApi>,
        limit: usize,
        policy: ExtractionPolicy,
    ) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let progress_tx = tx.clone();
            let outcome = run_extraction(api.as_ref(), limit, policy, |event| {
                let _ = progress_tx.send(event);
            });
            let _ = tx.send(outcome);
        });

        Self { rx, progress: None }
    }

    pub(super) fn progress(&self) -> Option<&str> {
        self.progress.as_deref()
    }

    pub(super) fn poll(&mut self) -> Option<Result<(), String>> {
        loop {
            match self.rx.try_recv() {
                Ok(ExtractionEvent::Progress(message)) => self.progress = Some(message),
                Ok(ExtractionEvent::Completed) => return Some(Ok(())),
                Ok(ExtractionEvent::Failed(message)) => return Some(Err(message)),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    return Some(Err("Extraction worker disconnected".to_owned()));
                }
            }
        }
    }
}
