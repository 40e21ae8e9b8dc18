//! In-memory transcription job registry and poll orchestration.
//!
//! The registry owns every job record for the lifetime of the process.
//! A job is created in `processing` when submission succeeds and
//! transitions exactly once to `completed` (carrying the caption file) or
//! `error` (carrying the provider's message); terminal states never
//! change again. Completion detection is client-driven: no background
//! pollers exist, the client re-polls until a terminal state appears.

use std::collections::HashMap;

use caption_core::{segment_words, ApiError, CaptionFile, JobStatus};
use caption_provider::{ProviderStatus, TranscriptSource, TranscriptionProvider};
use parking_lot::RwLock;
use tracing::{info, warn};

/// Lifecycle state of one registry entry.
#[derive(Debug, Clone)]
pub enum JobState {
    /// Submitted; provider result not yet seen.
    Processing,
    /// Terminal: captions cached, provider never re-queried.
    Completed(CaptionFile),
    /// Terminal: provider reported a transcription failure.
    Error(String),
}

impl JobState {
    /// Wire-level status tag for this state.
    #[must_use]
    pub fn status(&self) -> JobStatus {
        match self {
            Self::Processing => JobStatus::Processing,
            Self::Completed(_) => JobStatus::Completed,
            Self::Error(_) => JobStatus::Error,
        }
    }
}

/// One tracked transcription job.
#[derive(Debug, Clone)]
pub struct JobRecord {
    /// What was sent to the provider.
    pub source: TranscriptSource,
    /// Requested caption language tag.
    pub language: String,
    /// Current lifecycle state.
    pub state: JobState,
}

/// Process-wide job map, keyed by the provider-assigned job id.
///
/// Guarded by a lock because the server runs handlers on a multi-threaded
/// executor; two polls for the same job may race, and only the first
/// terminal transition wins.
#[derive(Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<String, JobRecord>>,
}

impl JobRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly submitted job in `processing` state.
    pub fn insert(&self, job_id: impl Into<String>, source: TranscriptSource, language: impl Into<String>) {
        let job_id = job_id.into();
        info!(job_id = %job_id, "job registered");
        let _ = self.jobs.write().insert(
            job_id,
            JobRecord {
                source,
                language: language.into(),
                state: JobState::Processing,
            },
        );
    }

    /// Current state of a job, if known.
    #[must_use]
    pub fn state(&self, job_id: &str) -> Option<JobState> {
        self.jobs.read().get(job_id).map(|r| r.state.clone())
    }

    /// Wire-level status of a job, if known.
    #[must_use]
    pub fn status(&self, job_id: &str) -> Option<JobStatus> {
        self.jobs.read().get(job_id).map(|r| r.state.status())
    }

    /// Requested language of a job, if known.
    #[must_use]
    pub fn language(&self, job_id: &str) -> Option<String> {
        self.jobs.read().get(job_id).map(|r| r.language.clone())
    }

    /// Number of jobs still in `processing`.
    #[must_use]
    pub fn active_jobs(&self) -> usize {
        self.jobs
            .read()
            .values()
            .filter(|r| matches!(r.state, JobState::Processing))
            .count()
    }

    /// Transition a job to `completed`, caching its caption file.
    ///
    /// A no-op if the job is unknown or already terminal (the losing side
    /// of a poll race lands here).
    pub fn complete(&self, job_id: &str, captions: CaptionFile) {
        let mut jobs = self.jobs.write();
        match jobs.get_mut(job_id) {
            Some(record) if matches!(record.state, JobState::Processing) => {
                info!(job_id = %job_id, segments = captions.segments.len(), "job completed");
                record.state = JobState::Completed(captions);
            }
            Some(_) => warn!(job_id = %job_id, "ignoring transition on terminal job"),
            None => warn!(job_id = %job_id, "ignoring transition on unknown job"),
        }
    }

    /// Transition a job to `error` with the provider's message.
    ///
    /// Same no-op rules as [`JobRegistry::complete`].
    pub fn fail(&self, job_id: &str, error: impl Into<String>) {
        let mut jobs = self.jobs.write();
        match jobs.get_mut(job_id) {
            Some(record) if matches!(record.state, JobState::Processing) => {
                let error = error.into();
                warn!(job_id = %job_id, error = %error, "job failed");
                record.state = JobState::Error(error);
            }
            Some(_) => warn!(job_id = %job_id, "ignoring transition on terminal job"),
            None => warn!(job_id = %job_id, "ignoring transition on unknown job"),
        }
    }
}

/// Outcome of one poll, ready for marshaling into the wire response.
#[derive(Debug, Clone)]
pub enum PollOutcome {
    /// Provider is still working; poll again later.
    Processing,
    /// Captions available (freshly built or cached).
    Completed(CaptionFile),
    /// Transcription failed, or the provider call itself failed.
    Error(String),
}

/// Poll a job once, advancing the registry if the provider is done.
///
/// Unknown ids fail with `NotFound`. Terminal jobs return the cached
/// result without contacting the provider. For in-flight jobs the
/// provider is queried once: completion runs the segmenter over the full
/// word list and caches the caption file; a provider-reported failure is
/// terminal. A transport-level provider failure is absorbed into an
/// `Error` outcome without transitioning the job, so polling never fails
/// the caller and a later poll can still succeed.
pub async fn poll_job(
    registry: &JobRegistry,
    provider: &dyn TranscriptionProvider,
    job_id: &str,
) -> Result<PollOutcome, ApiError> {
    let (language, state) = {
        let jobs = registry.jobs.read();
        let record = jobs
            .get(job_id)
            .ok_or_else(|| ApiError::not_found(format!("transcription job '{job_id}' not found")))?;
        (record.language.clone(), record.state.clone())
    };

    match state {
        JobState::Completed(captions) => return Ok(PollOutcome::Completed(captions)),
        JobState::Error(error) => return Ok(PollOutcome::Error(error)),
        JobState::Processing => {}
    }

    match provider.get_status(job_id).await {
        Ok(ProviderStatus::Processing) => Ok(PollOutcome::Processing),
        Ok(ProviderStatus::Completed { words }) => {
            let captions = CaptionFile::new(segment_words(&words), language);
            registry.complete(job_id, captions.clone());
            Ok(PollOutcome::Completed(captions))
        }
        Ok(ProviderStatus::Failed { error }) => {
            registry.fail(job_id, error.clone());
            Ok(PollOutcome::Error(error))
        }
        Err(e) => {
            // Absorbed: the job stays in processing, the caller sees an
            // error-status body and may re-poll.
            warn!(job_id = %job_id, error = %e, "provider status check failed");
            Ok(PollOutcome::Error(format!(
                "error checking transcription status: {e}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caption_core::Word;
    use caption_provider::{ProviderError, ProviderResult, TranscriptionConfig};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Provider whose `get_status` answers are scripted in order.
    struct ScriptedProvider {
        responses: Mutex<VecDeque<ProviderResult<ProviderStatus>>>,
        status_calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<ProviderResult<ProviderStatus>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                status_calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.status_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl TranscriptionProvider for ScriptedProvider {
        async fn submit(
            &self,
            _source: &TranscriptSource,
            _config: &TranscriptionConfig,
        ) -> ProviderResult<String> {
            Ok("job-1".into())
        }

        async fn get_status(&self, _job_id: &str) -> ProviderResult<ProviderStatus> {
            let _ = self.status_calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unscripted get_status call")
        }
    }

    fn remote(url: &str) -> TranscriptSource {
        TranscriptSource::RemoteUrl(url.into())
    }

    fn registry_with(job_id: &str) -> JobRegistry {
        let registry = JobRegistry::new();
        registry.insert(job_id, remote("https://example.com/a.mp4"), "en");
        registry
    }

    #[tokio::test]
    async fn unknown_job_is_not_found() {
        let registry = JobRegistry::new();
        let provider = ScriptedProvider::new(vec![]);
        let err = poll_job(&registry, &provider, "missing").await.unwrap_err();
        assert_eq!(err.code(), caption_core::errors::NOT_FOUND);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn processing_poll_does_not_mutate() {
        let registry = registry_with("job-1");
        let provider = ScriptedProvider::new(vec![Ok(ProviderStatus::Processing)]);
        let outcome = poll_job(&registry, &provider, "job-1").await.unwrap();
        assert!(matches!(outcome, PollOutcome::Processing));
        assert_eq!(registry.status("job-1"), Some(JobStatus::Processing));
        assert_eq!(registry.active_jobs(), 1);
    }

    #[tokio::test]
    async fn completed_poll_caches_captions() {
        let registry = registry_with("job-1");
        let words = vec![Word::new("Hello", 0, 500), Word::new("world.", 500, 1000)];
        let provider = ScriptedProvider::new(vec![Ok(ProviderStatus::Completed { words })]);

        let outcome = poll_job(&registry, &provider, "job-1").await.unwrap();
        let PollOutcome::Completed(captions) = outcome else {
            panic!("expected completed outcome");
        };
        assert_eq!(captions.segments.len(), 1);
        assert_eq!(captions.segments[0].text, "Hello world.");
        assert_eq!(captions.language, "en");
        assert_eq!(registry.status("job-1"), Some(JobStatus::Completed));
    }

    #[tokio::test]
    async fn terminal_job_is_not_requeried() {
        let registry = registry_with("job-1");
        let words = vec![Word::new("Done.", 0, 400)];
        let provider = ScriptedProvider::new(vec![Ok(ProviderStatus::Completed { words })]);

        let first = poll_job(&registry, &provider, "job-1").await.unwrap();
        let second = poll_job(&registry, &provider, "job-1").await.unwrap();
        assert_eq!(provider.calls(), 1);

        let (PollOutcome::Completed(a), PollOutcome::Completed(b)) = (first, second) else {
            panic!("expected completed outcomes");
        };
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn provider_failure_is_terminal() {
        let registry = registry_with("job-1");
        let provider = ScriptedProvider::new(vec![Ok(ProviderStatus::Failed {
            error: "audio unreadable".into(),
        })]);

        let outcome = poll_job(&registry, &provider, "job-1").await.unwrap();
        let PollOutcome::Error(message) = outcome else {
            panic!("expected error outcome");
        };
        assert_eq!(message, "audio unreadable");
        assert_eq!(registry.status("job-1"), Some(JobStatus::Error));

        // Cached on the next poll, no further provider calls.
        let again = poll_job(&registry, &provider, "job-1").await.unwrap();
        assert!(matches!(again, PollOutcome::Error(_)));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn transport_error_is_absorbed_and_recoverable() {
        let registry = registry_with("job-1");
        let words = vec![Word::new("ok.", 0, 300)];
        let provider = ScriptedProvider::new(vec![
            Err(ProviderError::Api {
                status: 503,
                message: "upstream briefly down".into(),
            }),
            Ok(ProviderStatus::Completed { words }),
        ]);

        // First poll surfaces the failure but leaves the job in processing.
        let outcome = poll_job(&registry, &provider, "job-1").await.unwrap();
        let PollOutcome::Error(message) = outcome else {
            panic!("expected error outcome");
        };
        assert!(message.contains("upstream briefly down"));
        assert_eq!(registry.status("job-1"), Some(JobStatus::Processing));

        // A later poll recovers.
        let outcome = poll_job(&registry, &provider, "job-1").await.unwrap();
        assert!(matches!(outcome, PollOutcome::Completed(_)));
        assert_eq!(registry.status("job-1"), Some(JobStatus::Completed));
    }

    #[tokio::test]
    async fn caption_language_follows_request() {
        let registry = JobRegistry::new();
        registry.insert("job-1", remote("https://example.com/a.mp4"), "es");
        let provider = ScriptedProvider::new(vec![Ok(ProviderStatus::Completed {
            words: vec![Word::new("Hola.", 0, 400)],
        })]);
        let PollOutcome::Completed(captions) =
            poll_job(&registry, &provider, "job-1").await.unwrap()
        else {
            panic!("expected completed outcome");
        };
        assert_eq!(captions.language, "es");
    }

    #[test]
    fn terminal_transitions_are_sticky() {
        let registry = registry_with("job-1");
        registry.complete("job-1", CaptionFile::new(vec![], "en"));
        assert_eq!(registry.status("job-1"), Some(JobStatus::Completed));

        // Neither a second completion nor a failure may overwrite it.
        registry.fail("job-1", "late failure");
        assert_eq!(registry.status("job-1"), Some(JobStatus::Completed));
        registry.complete("job-1", CaptionFile::new(vec![], "de"));
        let Some(JobState::Completed(captions)) = registry.state("job-1") else {
            panic!("expected completed state");
        };
        assert_eq!(captions.language, "en");
    }

    #[test]
    fn transitions_on_unknown_jobs_are_ignored() {
        let registry = JobRegistry::new();
        registry.complete("nope", CaptionFile::new(vec![], "en"));
        registry.fail("nope", "whatever");
        assert!(registry.status("nope").is_none());
    }

    #[test]
    fn active_jobs_counts_processing_only() {
        let registry = JobRegistry::new();
        registry.insert("a", remote("https://example.com/a.mp4"), "en");
        registry.insert("b", remote("https://example.com/b.mp4"), "en");
        registry.insert("c", remote("https://example.com/c.mp4"), "en");
        assert_eq!(registry.active_jobs(), 3);
        registry.complete("a", CaptionFile::new(vec![], "en"));
        registry.fail("b", "bad");
        assert_eq!(registry.active_jobs(), 1);
    }

    #[test]
    fn empty_word_list_yields_empty_caption_file() {
        let registry = registry_with("job-1");
        registry.complete("job-1", CaptionFile::new(segment_words(&[]), "en"));
        let Some(JobState::Completed(captions)) = registry.state("job-1") else {
            panic!("expected completed state");
        };
        assert!(captions.segments.is_empty());
    }
}
