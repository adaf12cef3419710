use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use quiz_core::{AnswerOutcome, Question, Quiz, QuizProgress, SessionState};
use quiz_source::QuestionSource;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::fetch::fetch_with_backoff;
use crate::config::SessionConfig;
use crate::error::SessionError;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One quiz flow: fetch a batch of questions, then collect one answer per question.
///
/// The state starts as `Loading`. `start` spawns the fetch on the current Tokio
/// runtime, which moves the state to `Error` or `Ready` exactly once. Retries
/// after rate limiting stay invisible to observers.
///
/// Dropping the session (or calling `shutdown`) aborts the fetch, including a
/// pending retry timer.
pub struct QuizSession {
    source: Arc<dyn QuestionSource>,
    config: SessionConfig,
    state: Arc<watch::Sender<SessionState>>,
    fetch_task: Mutex<Option<JoinHandle<()>>>,
}

impl QuizSession {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            source,
            config: SessionConfig::default(),
            state: Arc::new(state),
            fetch_task: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Launch the fetch sequence.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` on a second call and
    /// `SessionError::NoRuntime` when called outside a Tokio runtime.
    pub fn start(&self) -> Result<(), SessionError> {
        let mut slot = self
            .fetch_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(SessionError::AlreadyStarted);
        }
        let runtime = Handle::try_current()?;

        self.state.send_replace(SessionState::Loading);

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let SessionConfig { query, backoff } = *self.config();

        *slot = Some(runtime.spawn(async move {
            let next = match fetch_with_backoff(source.as_ref(), &query, &backoff).await {
                Ok(questions) => {
                    tracing::info!(count = questions.len(), "quiz ready");
                    ready_state(&questions)
                }
                Err(err) => {
                    tracing::warn!(error = %err, "quiz fetch failed");
                    SessionState::Error(format!("Error fetching data: {err}"))
                }
            };
            state.send_replace(next);
        }));

        Ok(())
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.fetch_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Wait until the state leaves `Loading` and return it.
    ///
    /// Never resolves after `shutdown` interrupted the fetch.
    pub async fn settled(&self) -> SessionState {
        let mut receiver = self.state.subscribe();
        match receiver.wait_for(|state| !state.is_loading()).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    /// Record the first answer for question `index` and report its correctness.
    ///
    /// Returns `None` without touching the state when the session is not ready,
    /// the index is out of range, the question is already answered, or the
    /// answer is blank.
    pub fn select_answer(&self, index: usize, answer: &str) -> Option<AnswerOutcome> {
        let mut outcome = None;
        self.state.send_if_modified(|state| match state.select(index, answer) {
            Ok(recorded) => {
                outcome = Some(recorded);
                true
            }
            Err(err) => {
                tracing::debug!(index, error = %err, "selection ignored");
                false
            }
        });
        outcome
    }

    /// Score summary while the session is ready.
    #[must_use]
    pub fn progress(&self) -> Option<QuizProgress> {
        self.state.borrow().quiz().map(Quiz::progress)
    }

    /// Cancel the in-flight fetch or pending retry, if any.
    pub fn shutdown(&self) {
        let slot = self
            .fetch_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = slot.as_ref() {
            if !task.is_finished() {
                tracing::debug!("aborting pending quiz fetch");
            }
            task.abort();
        }
    }
}

fn ready_state(questions: &[Question]) -> SessionState {
    let mut rng = rand::rng();
    SessionState::Ready(Quiz::from_questions(questions, &mut rng))
}

impl Drop for QuizSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("config", &self.config)
            .field("state", &*self.state.borrow())
            .field("started", &self.is_started())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
