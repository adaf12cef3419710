use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::{Question, SessionState};
use quiz_source::{QuestionSource, ScriptedSource, SourceError, TriviaQuery};
use services::{BackoffPolicy, QuizSession, SessionConfig};
use tokio::task::JoinHandle;
use tokio::time::Instant;

fn france() -> Question {
    Question::new(
        "What is the capital of France?",
        "Paris",
        ["London", "Rome", "Berlin"],
    )
    .unwrap()
}

fn germany() -> Question {
    Question::new(
        "What is the capital of Germany?",
        "Berlin",
        ["Munich", "Frankfurt", "Hamburg"],
    )
    .unwrap()
}

/// Collect every state observed until the session settles.
fn record_transitions(session: &QuizSession) -> JoinHandle<Vec<SessionState>> {
    let mut receiver = session.subscribe();
    tokio::spawn(async move {
        let mut seen = vec![receiver.borrow_and_update().clone()];
        while receiver.changed().await.is_ok() {
            let state = receiver.borrow_and_update().clone();
            let settled = !state.is_loading();
            seen.push(state);
            if settled {
                break;
            }
        }
        seen
    })
}

/// Source whose requests never complete.
struct HangingSource;

#[async_trait]
impl QuestionSource for HangingSource {
    async fn fetch(&self, _query: &TriviaQuery) -> Result<Vec<Question>, SourceError> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn loading_immediately_after_start() {
    let session = QuizSession::new(Arc::new(ScriptedSource::new([Ok(vec![france()])])));
    session.start().unwrap();
    assert_eq!(session.state(), SessionState::Loading);
}

#[tokio::test]
async fn network_failure_surfaces_detail() {
    let source = ScriptedSource::new([Err(SourceError::Network("Failed to fetch".into()))]);
    let session = QuizSession::new(Arc::new(source));
    session.start().unwrap();

    let state = session.settled().await;
    let message = state.error_message().unwrap();
    assert!(message.starts_with("Error fetching data"));
    assert!(message.contains("Failed to fetch"));
}

#[tokio::test]
async fn http_error_embeds_status_code() {
    let source = ScriptedSource::new([Err(SourceError::HttpStatus(500))]);
    let session = QuizSession::new(Arc::new(source.clone()));
    session.start().unwrap();

    let state = session.settled().await;
    assert!(state.error_message().unwrap().contains("500"));
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn malformed_body_is_a_terminal_error() {
    let source = ScriptedSource::new([Err(SourceError::Malformed("expected value".into()))]);
    let session = QuizSession::new(Arc::new(source));
    session.start().unwrap();

    let state = session.settled().await;
    assert!(state.error_message().unwrap().contains("expected value"));
}

#[tokio::test]
async fn empty_batch_is_ready_with_no_questions() {
    let session = QuizSession::new(Arc::new(ScriptedSource::new([Ok(Vec::new())])));
    session.start().unwrap();

    let state = session.settled().await;
    let quiz = state.quiz().unwrap();
    assert!(quiz.is_empty());
    assert!(quiz.selections().is_empty());
}

#[tokio::test(start_paused = true)]
async fn rate_limit_then_success_reaches_ready_after_delay() {
    let source = ScriptedSource::new([Err(SourceError::RateLimited), Ok(vec![germany()])]);
    let session = QuizSession::new(Arc::new(source.clone()));
    let transitions = record_transitions(&session);
    let started = Instant::now();
    session.start().unwrap();

    tokio::time::sleep(Duration::from_millis(999)).await;
    assert!(session.state().is_loading());
    assert_eq!(source.calls(), 1);

    let state = session.settled().await;
    assert!(started.elapsed() >= Duration::from_secs(1));
    assert_eq!(source.calls(), 2);

    let quiz = state.quiz().unwrap();
    assert_eq!(quiz.len(), 1);
    assert_eq!(quiz.questions()[0].prompt(), "What is the capital of Germany?");

    let seen = transitions.await.unwrap();
    assert!(seen.iter().all(|state| state.error_message().is_none()));
    assert!(seen.last().unwrap().is_ready());
}

#[tokio::test(start_paused = true)]
async fn unlimited_backoff_keeps_waiting() {
    let mut script = vec![Err(SourceError::RateLimited); 8];
    script.push(Ok(vec![france()]));
    let source = ScriptedSource::new(script);
    let config = SessionConfig::default().with_backoff(BackoffPolicy::unlimited());
    let session = QuizSession::new(Arc::new(source.clone())).with_config(config);
    let started = Instant::now();
    session.start().unwrap();

    let state = session.settled().await;
    assert!(state.is_ready());
    assert_eq!(source.calls(), 9);
    assert!(started.elapsed() >= Duration::from_secs(255));
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_become_an_error() {
    let source = ScriptedSource::new(vec![Err(SourceError::RateLimited); 4]);
    let config = SessionConfig::default()
        .with_backoff(BackoffPolicy::default().with_max_retries(Some(3)));
    let session = QuizSession::new(Arc::new(source.clone())).with_config(config);
    session.start().unwrap();

    let state = session.settled().await;
    let message = state.error_message().unwrap();
    assert!(message.contains("429"), "unexpected message: {message}");
    assert_eq!(source.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn dropping_session_cancels_pending_retry() {
    let source = ScriptedSource::new([Err(SourceError::RateLimited), Ok(vec![france()])]);
    let session = QuizSession::new(Arc::new(source.clone()));
    session.start().unwrap();

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(source.calls(), 1);
    drop(session);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_leaves_state_loading() {
    let source = ScriptedSource::new([Err(SourceError::RateLimited), Ok(vec![france()])]);
    let session = QuizSession::new(Arc::new(source.clone()));
    session.start().unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;
    session.shutdown();
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert!(session.state().is_loading());
    assert_eq!(source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_aborts_in_flight_request() {
    let session = QuizSession::new(Arc::new(HangingSource));
    session.start().unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    session.shutdown();
    assert!(session.state().is_loading());
    assert!(session.is_started());
}

#[tokio::test]
async fn options_are_permutations_of_answers() {
    let batch = vec![
        france(),
        germany(),
        Question::new("The sun is a star.", "True", ["False"]).unwrap(),
        Question::new("Only one answer", "Yes", Vec::<String>::new()).unwrap(),
    ];
    let session = QuizSession::new(Arc::new(ScriptedSource::new([Ok(batch.clone())])));
    session.start().unwrap();

    let state = session.settled().await;
    let quiz = state.quiz().unwrap();
    assert_eq!(quiz.len(), batch.len());

    for (question, displayed) in batch.iter().zip(quiz.questions()) {
        let expected: HashSet<&str> = question
            .incorrect_answers()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(question.correct_answer()))
            .collect();
        let actual: HashSet<&str> = displayed.options().iter().map(String::as_str).collect();

        assert_eq!(displayed.options().len(), expected.len());
        assert_eq!(actual, expected);
    }
}

#[tokio::test]
async fn first_selection_wins() {
    let session = QuizSession::new(Arc::new(ScriptedSource::new([Ok(vec![france()])])));
    session.start().unwrap();
    session.settled().await;

    let first = session.select_answer(0, "London").unwrap();
    assert!(!first.is_correct);
    assert_eq!(first.correct_answer, "Paris");

    assert_eq!(session.select_answer(0, "Paris"), None);

    let state = session.state();
    assert!(state.is_ready());
    let selections: Vec<_> = state.quiz().unwrap().selections().iter().collect();
    assert_eq!(selections, vec![(0, "London")]);
}

#[tokio::test]
async fn correct_answer_is_marked_correct() {
    let session = QuizSession::new(Arc::new(ScriptedSource::new([Ok(vec![
        france(),
        germany(),
    ])])));
    session.start().unwrap();
    session.settled().await;

    assert!(session.select_answer(0, "Paris").unwrap().is_correct);
    assert!(!session.select_answer(1, "Munich").unwrap().is_correct);
    assert_eq!(session.select_answer(2, "Paris"), None);
    assert_eq!(session.select_answer(1, ""), None);

    let progress = session.progress().unwrap();
    assert_eq!(progress.total, 2);
    assert_eq!(progress.answered, 2);
    assert_eq!(progress.correct, 1);
    assert!(progress.is_complete);
}

#[tokio::test]
async fn encoded_answers_compare_decoded() {
    let question = Question::new(
        "Which physicist&#039;s laws describe motion?",
        "Newton&#039;s",
        ["Einstein&#039;s", "Bohr &amp; Heisenberg"],
    )
    .unwrap();
    let session = QuizSession::new(Arc::new(ScriptedSource::new([Ok(vec![question])])));
    session.start().unwrap();

    let state = session.settled().await;
    let displayed = &state.quiz().unwrap().questions()[0];
    assert_eq!(displayed.prompt(), "Which physicist's laws describe motion?");
    assert!(displayed.options().iter().any(|o| o == "Bohr & Heisenberg"));

    let outcome = session.select_answer(0, "Newton's").unwrap();
    assert!(outcome.is_correct);
}

#[tokio::test]
async fn fetches_the_fixed_batch() {
    let source = ScriptedSource::new([Ok(vec![france()])]);
    let session = QuizSession::new(Arc::new(source.clone()));
    session.start().unwrap();
    session.settled().await;

    assert_eq!(source.queries(), vec![TriviaQuery::default()]);
}
