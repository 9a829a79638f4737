mod common;

use common::mock_asr::MockRecognizer;
use common::mock_tts::MockTts;

use saarthi::asr::{RecognitionError, SessionParams, Transcript, Utterance};
use saarthi::camera::DeviceCamera;
use saarthi::intent::Intent;
use saarthi::modes::{ModeCoordinator, ModeRequest};
use saarthi::voice_loop::{SessionOutcome, VoiceCommandLoop, RETRY_PROMPT, WELCOME_PROMPT};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::Receiver;

fn heard(text: &str) -> Result<Utterance, RecognitionError> {
    Ok(Utterance::new(vec![Transcript {
        text: text.to_string(),
        confidence: 0.9,
    }]))
}

fn build_loop(
    tts: Arc<MockTts>,
    script: Vec<Result<Utterance, RecognitionError>>,
    settle: Duration,
) -> (VoiceCommandLoop, Receiver<ModeRequest>) {
    let (tx, rx) = tokio::sync::mpsc::channel(8);
    let vloop = VoiceCommandLoop::new(
        tts,
        Box::new(MockRecognizer::new(script)),
        SessionParams::default(),
        settle,
        tx,
    );
    (vloop, rx)
}

#[tokio::test]
async fn test_navigation_command_dispatches() {
    let tts = Arc::new(MockTts::new());
    let (mut vloop, mut rx) = build_loop(
        tts.clone(),
        vec![heard("navigation please")],
        Duration::ZERO,
    );

    let outcome = vloop.listen_once().await;

    assert_eq!(outcome, SessionOutcome::Dispatched(Intent::BlindNavigation));
    assert_eq!(
        rx.try_recv().unwrap(),
        ModeRequest::Activate(Intent::BlindNavigation)
    );
    // A matched command never triggers the retry prompt
    assert!(!tts.was_spoken(RETRY_PROMPT));
}

#[tokio::test]
async fn test_unrecognized_speaks_retry_exactly_once() {
    let tts = Arc::new(MockTts::new());
    let (mut vloop, mut rx) = build_loop(tts.clone(), vec![heard("hello there")], Duration::ZERO);

    let outcome = vloop.listen_once().await;

    assert_eq!(outcome, SessionOutcome::RetryPrompted);
    assert_eq!(tts.times_spoken(RETRY_PROMPT), 1);
    assert!(rx.try_recv().is_err(), "no mode request for an unmatched command");
}

#[tokio::test]
async fn test_empty_results_speak_retry() {
    let tts = Arc::new(MockTts::new());
    let (mut vloop, _rx) = build_loop(tts.clone(), vec![Ok(Utterance::default())], Duration::ZERO);

    let outcome = vloop.listen_once().await;

    assert_eq!(outcome, SessionOutcome::RetryPrompted);
    assert_eq!(tts.times_spoken(RETRY_PROMPT), 1);
}

#[tokio::test]
async fn test_recognition_error_restarts_without_retry_prompt() {
    let tts = Arc::new(MockTts::new());
    let (mut vloop, _rx) = build_loop(
        tts.clone(),
        vec![Err(RecognitionError::NetworkTimeout)],
        Duration::ZERO,
    );

    let outcome = vloop.listen_once().await;

    assert_eq!(
        outcome,
        SessionOutcome::Failed(RecognitionError::NetworkTimeout)
    );
    assert_eq!(RecognitionError::NetworkTimeout.to_string(), "Network timeout");
    // The error path surfaces a message but never speaks
    assert!(tts.get_spoken().is_empty());
}

#[tokio::test]
async fn test_retry_then_match_sequence() {
    let tts = Arc::new(MockTts::new());
    let (mut vloop, mut rx) = build_loop(
        tts.clone(),
        vec![heard("hello there"), heard("currency detection")],
        Duration::ZERO,
    );

    assert_eq!(vloop.listen_once().await, SessionOutcome::RetryPrompted);
    assert_eq!(
        vloop.listen_once().await,
        SessionOutcome::Dispatched(Intent::CurrencyDetection)
    );

    assert_eq!(tts.times_spoken(RETRY_PROMPT), 1);
    assert_eq!(
        rx.try_recv().unwrap(),
        ModeRequest::Activate(Intent::CurrencyDetection)
    );
}

#[tokio::test]
async fn test_overlapping_keywords_resolve_by_priority() {
    let tts = Arc::new(MockTts::new());
    let (tx, _rx) = tokio::sync::mpsc::channel(8);
    let mut vloop = VoiceCommandLoop::new(
        tts,
        Box::new(MockRecognizer::with_phrase("blind reading", 0.9)),
        SessionParams::default(),
        Duration::ZERO,
        tx,
    );

    // "blind" outranks "reading" in the fixed priority order
    assert_eq!(
        vloop.listen_once().await,
        SessionOutcome::Dispatched(Intent::BlindNavigation)
    );
}

#[tokio::test]
async fn test_synthesis_failure_does_not_stall_the_loop() {
    let tts = Arc::new(MockTts::new());
    tts.set_should_fail(true);

    let (mut vloop, _rx) = build_loop(tts.clone(), vec![heard("hello there")], Duration::ZERO);

    // Welcome prompt fails but start() still resolves
    vloop.start().await;

    // Retry prompt fails too; the session still reaches its outcome
    assert_eq!(vloop.listen_once().await, SessionOutcome::RetryPrompted);
}

#[tokio::test]
async fn test_run_stops_when_coordinator_is_gone() {
    let tts = Arc::new(MockTts::new());
    let (vloop, rx) = build_loop(tts.clone(), vec![heard("navigation")], Duration::ZERO);
    drop(rx);

    // The first dispatch hits the closed channel and ends the loop
    vloop.run().await;

    assert!(tts.was_spoken(WELCOME_PROMPT));
}

#[tokio::test]
async fn test_run_settles_between_sessions() {
    let tts = Arc::new(MockTts::new());
    let settle = Duration::from_millis(100);
    let recognizer =
        MockRecognizer::new(vec![Err(RecognitionError::Network), heard("navigation")]);
    let sessions = recognizer.session_count();

    let (tx, rx) = tokio::sync::mpsc::channel(8);
    let vloop = VoiceCommandLoop::new(
        tts.clone(),
        Box::new(recognizer),
        SessionParams::default(),
        settle,
        tx,
    );
    drop(rx);

    let started = Instant::now();
    vloop.run().await;

    // Exactly one restart after the failed session, separated by the
    // settling delay
    assert_eq!(*sessions.lock().unwrap(), 2);
    assert!(started.elapsed() >= settle);
    // Welcome only: the error path stays silent
    assert_eq!(tts.get_spoken(), vec![WELCOME_PROMPT.to_string()]);
}

#[tokio::test]
async fn test_coordinator_announces_activation() {
    let dir = tempfile::tempdir().unwrap();
    let node = dir.path().join("video0");
    std::fs::write(&node, b"").unwrap();

    let tts = Arc::new(MockTts::new());
    let camera = DeviceCamera::new(&node);
    let (tx, coordinator) = ModeCoordinator::new(tts.clone(), camera);

    tx.send(ModeRequest::Activate(Intent::ReadingMode))
        .await
        .unwrap();
    drop(tx);
    coordinator.run().await;

    assert!(tts.was_spoken("Reading mode activated"));
}

#[tokio::test]
async fn test_coordinator_speaks_camera_failure() {
    let tts = Arc::new(MockTts::new());
    let camera = DeviceCamera::new("/dev/video-does-not-exist");
    let (tx, coordinator) = ModeCoordinator::new(tts.clone(), camera);

    tx.send(ModeRequest::Activate(Intent::BlindNavigation))
        .await
        .unwrap();
    drop(tx);
    coordinator.run().await;

    assert!(tts.was_spoken("Error starting Blind Navigation"));
    assert!(!tts.was_spoken("Camera is now streaming"));
}

#[tokio::test]
async fn test_mode_switch_replaces_active_mode() {
    let dir = tempfile::tempdir().unwrap();
    let node = dir.path().join("video0");
    std::fs::write(&node, b"").unwrap();

    let tts = Arc::new(MockTts::new());
    let camera = DeviceCamera::new(&node);
    let (tx, coordinator) = ModeCoordinator::new(tts.clone(), camera);

    tx.send(ModeRequest::Activate(Intent::BlindNavigation))
        .await
        .unwrap();
    tx.send(ModeRequest::Activate(Intent::CurrencyDetection))
        .await
        .unwrap();
    drop(tx);
    coordinator.run().await;

    assert!(tts.was_spoken("Blind Navigation mode activated"));
    assert!(tts.was_spoken("Currency Detection mode activated"));
}
