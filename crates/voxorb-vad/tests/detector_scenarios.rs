//! Scenario tests for the voice activity detector
//!
//! Covers:
//! - Debounce timing (voice-start at the first tick past min_duration)
//! - Silence hysteresis timing (voice-end at the first tick past max_silence)
//! - Start-candidate cancellation by below-threshold samples
//! - The silence-countdown coupling during brief above-threshold reprieves
//! - Continuous level signal bounds and per-tick emission
//! - Never-above-threshold noise sequences

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use voxorb_vad::{EventKind, VadConfig, VadEvent, VoiceActivityDetector};

// ─── Helpers ─────────────────────────────────────────────────────────

fn timed_config() -> VadConfig {
    VadConfig {
        threshold: 0.1,
        min_duration_ms: 100,
        max_silence_ms: 200,
        sensitivity: 1.0,
        smoothing: 0.0,
    }
}

fn recording_detector(config: VadConfig) -> (VoiceActivityDetector, Arc<Mutex<Vec<VadEvent>>>) {
    let mut detector = VoiceActivityDetector::new(config);
    let events = Arc::new(Mutex::new(Vec::new()));
    for kind in [
        EventKind::VoiceStart,
        EventKind::VoiceEnd,
        EventKind::VoiceLevel,
        EventKind::Error,
    ] {
        let sink = events.clone();
        detector.on(kind, move |event| {
            sink.lock().unwrap().push(event.clone());
        });
    }
    (detector, events)
}

fn transitions(events: &[VadEvent]) -> Vec<VadEvent> {
    events
        .iter()
        .filter(|e| !matches!(e, VadEvent::VoiceLevel { .. }))
        .cloned()
        .collect()
}

struct Session {
    detector: VoiceActivityDetector,
    events: Arc<Mutex<Vec<VadEvent>>>,
    t0: Instant,
}

impl Session {
    fn start(config: VadConfig) -> Self {
        let (mut detector, events) = recording_detector(config);
        detector.attach_source(Box::new(SilentSource));
        let t0 = Instant::now();
        detector.start(t0).unwrap();
        Self {
            detector,
            events,
            t0,
        }
    }

    fn feed(&mut self, raw: f32, at_ms: u64) {
        self.detector
            .process_sample(raw, self.t0 + Duration::from_millis(at_ms));
    }

    fn recorded(&self) -> Vec<VadEvent> {
        self.events.lock().unwrap().clone()
    }
}

struct SilentSource;

impl voxorb_vad::LevelSource for SilentSource {
    fn level(&self) -> f32 {
        0.0
    }
}

// ─── Timed transition scenarios ──────────────────────────────────────

#[test]
fn voice_start_fires_at_first_tick_past_min_duration() {
    let mut session = Session::start(timed_config());

    session.feed(0.5, 0);
    session.feed(0.5, 50);
    assert!(!session.detector.is_voice_detected());

    session.feed(0.5, 100);
    assert!(session.detector.is_voice_detected());

    assert_eq!(
        transitions(&session.recorded()),
        vec![VadEvent::VoiceStart { timestamp_ms: 100 }]
    );
}

#[test]
fn voice_end_fires_at_first_tick_past_max_silence() {
    let mut session = Session::start(timed_config());

    session.feed(0.5, 0);
    session.feed(0.5, 50);
    session.feed(0.5, 100);

    session.feed(0.0, 150);
    session.feed(0.0, 250);
    session.feed(0.0, 350);

    assert_eq!(
        transitions(&session.recorded()),
        vec![
            VadEvent::VoiceStart { timestamp_ms: 100 },
            VadEvent::VoiceEnd {
                timestamp_ms: 350,
                duration_ms: 250,
            },
        ]
    );
}

#[test]
fn below_threshold_resets_the_pending_start() {
    let mut session = Session::start(timed_config());

    session.feed(0.5, 0);
    session.feed(0.0, 50);
    session.feed(0.5, 60);
    session.feed(0.5, 100);
    assert!(
        !session.detector.is_voice_detected(),
        "candidate restarted at t=60, debounce not met at t=100"
    );

    session.feed(0.5, 160);
    assert_eq!(
        transitions(&session.recorded()),
        vec![VadEvent::VoiceStart { timestamp_ms: 160 }]
    );
}

#[test]
fn short_silence_produces_no_voice_end_in_its_window() {
    let mut session = Session::start(timed_config());

    session.feed(0.5, 0);
    session.feed(0.5, 100);

    // 150 ms of silence, shorter than the 200 ms hysteresis.
    session.feed(0.0, 150);
    session.feed(0.0, 250);
    session.feed(0.5, 300);

    let ends: Vec<_> = transitions(&session.recorded())
        .into_iter()
        .filter(|e| matches!(e, VadEvent::VoiceEnd { .. }))
        .collect();
    assert!(ends.is_empty(), "no voice-end during the short silence window");
    assert!(session.detector.is_voice_detected());
}

#[test]
fn silence_countdown_survives_a_brief_reprieve() {
    // Once the silence countdown is running, a return above threshold does
    // not cancel it: the countdown matures and voice ends, and only a fresh
    // full debounce brings voice back.
    let mut session = Session::start(timed_config());

    session.feed(0.5, 0);
    session.feed(0.5, 100);
    assert!(session.detector.is_voice_detected());

    session.feed(0.0, 150); // countdown starts
    session.feed(0.5, 200); // reprieve, countdown keeps running
    session.feed(0.0, 250);
    session.feed(0.5, 310); // resumed speech, countdown still running
    session.feed(0.5, 360); // countdown matured at 150+200

    assert!(!session.detector.is_voice_detected());

    session.feed(0.5, 400); // fresh start candidate began at 400
    session.feed(0.5, 500);

    assert_eq!(
        transitions(&session.recorded()),
        vec![
            VadEvent::VoiceStart { timestamp_ms: 100 },
            VadEvent::VoiceEnd {
                timestamp_ms: 360,
                duration_ms: 260,
            },
            VadEvent::VoiceStart { timestamp_ms: 500 },
        ]
    );
}

// ─── Continuous level signal ─────────────────────────────────────────

#[test]
fn voice_level_fires_exactly_once_per_tick() {
    let mut session = Session::start(timed_config());

    session.feed(0.5, 0);
    session.feed(0.5, 50);
    session.feed(0.5, 100); // verdict changes on this tick
    session.feed(0.0, 150);

    let levels: Vec<_> = session
        .recorded()
        .into_iter()
        .filter(|e| matches!(e, VadEvent::VoiceLevel { .. }))
        .collect();
    assert_eq!(levels.len(), 4);
}

#[test]
fn smoothed_level_stays_within_gained_input_bounds() {
    use rand::Rng;

    let config = VadConfig::default(); // sensitivity 0.6, smoothing 0.85
    let sensitivity = config.sensitivity;
    let mut session = Session::start(config);

    let mut rng = rand::thread_rng();
    let mut max_gained: f32 = 0.0;
    for tick in 0..500u64 {
        let raw: f32 = rng.gen();
        max_gained = max_gained.max(raw * sensitivity);
        session.feed(raw, tick * 16);

        let (_, smoothed) = session.detector.levels();
        assert!(smoothed >= 0.0, "smoothed level went negative: {smoothed}");
        assert!(
            smoothed <= max_gained + 1e-6,
            "smoothed level {smoothed} exceeded max gained input {max_gained}"
        );
    }
}

#[test]
fn sub_threshold_noise_never_starts_voice() {
    use rand::Rng;

    let config = VadConfig::default();
    let ceiling = config.threshold / config.sensitivity;
    let mut session = Session::start(config);

    let mut rng = rand::thread_rng();
    for tick in 0..1000u64 {
        let raw = rng.gen::<f32>() * ceiling * 0.99;
        session.feed(raw, tick * 16);
        assert!(!session.detector.is_voice_detected());
    }

    let starts: Vec<_> = transitions(&session.recorded());
    assert!(starts.is_empty(), "unexpected transitions: {starts:?}");
}

// ─── Smoothing convergence ───────────────────────────────────────────

#[test]
fn constant_input_converges_and_then_debounces() {
    // With smoothing enabled the level crosses the threshold some ticks in;
    // the debounce is measured from that crossing, not from t=0.
    let config = VadConfig {
        threshold: 0.1,
        min_duration_ms: 100,
        max_silence_ms: 200,
        sensitivity: 1.0,
        smoothing: 0.9,
    };
    let mut session = Session::start(config);

    let mut crossed_at = None;
    let mut started_at = None;
    for tick in 0..40u64 {
        let at_ms = tick * 16;
        session.feed(0.5, at_ms);
        let (_, smoothed) = session.detector.levels();
        if crossed_at.is_none() && smoothed > 0.1 {
            crossed_at = Some(at_ms);
        }
        if started_at.is_none() && session.detector.is_voice_detected() {
            started_at = Some(at_ms);
        }
    }

    let crossed_at = crossed_at.expect("level should cross threshold");
    let started_at = started_at.expect("voice should start");
    assert!(
        started_at >= crossed_at + 100,
        "start at {started_at} must wait out the debounce from crossing at {crossed_at}"
    );
}
