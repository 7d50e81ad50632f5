use std::time::Instant;

use crate::config::{VadConfig, VadConfigPatch};
use crate::error::VadError;
use crate::registry::EventRegistry;
use crate::source::LevelSource;
use crate::types::{EventKind, VadEvent, VadMetrics};

/// Debounced voice-presence detection over a continuously sampled energy
/// signal.
///
/// The detector is cadence-agnostic: every duration comparison uses the
/// caller-supplied `Instant`, never tick counts, so it behaves identically
/// at 60 Hz, 30 Hz, or under a virtual clock in tests.
///
/// Entering the voice state requires the smoothed level to stay above
/// `threshold` for `min_duration_ms` (debounce). Leaving it requires the
/// level to stay below for `max_silence_ms` (hysteresis). A continuous
/// `VoiceLevel` event is emitted for every processed sample, independent of
/// the discrete verdict.
pub struct VoiceActivityDetector {
    config: VadConfig,
    registry: EventRegistry,
    metrics: VadMetrics,
    source: Option<Box<dyn LevelSource>>,

    active: bool,
    voice_detected: bool,
    raw_level: f32,
    smoothed_level: f32,

    voice_start_candidate: Option<Instant>,
    silence_candidate: Option<Instant>,
    voice_started_at: Option<Instant>,
    epoch: Option<Instant>,
}

impl VoiceActivityDetector {
    pub fn new(config: VadConfig) -> Self {
        Self {
            config,
            registry: EventRegistry::new(),
            metrics: VadMetrics::default(),
            source: None,
            active: false,
            voice_detected: false,
            raw_level: 0.0,
            smoothed_level: 0.0,
            voice_start_candidate: None,
            silence_candidate: None,
            voice_started_at: None,
            epoch: None,
        }
    }

    /// Merge a partial configuration update. Takes effect on the next
    /// processed sample; never requires a restart.
    pub fn configure(&mut self, patch: VadConfigPatch) {
        self.config.merge(patch);
    }

    pub fn config(&self) -> &VadConfig {
        &self.config
    }

    /// Register a listener for one event kind. Listeners run synchronously
    /// in registration order; a panicking listener is isolated and logged.
    pub fn on<F>(&mut self, kind: EventKind, listener: F)
    where
        F: FnMut(&VadEvent) + Send + 'static,
    {
        self.registry.on(kind, listener);
    }

    /// Attach the energy supply. Replaces any previously attached source.
    pub fn attach_source(&mut self, source: Box<dyn LevelSource>) {
        self.source = Some(source);
    }

    pub fn is_connected(&self) -> bool {
        self.source.is_some()
    }

    /// Begin a detection session.
    ///
    /// Fails with [`VadError::NotConnected`] when no source is attached.
    /// Resets all hysteresis state and levels. Idempotent while active:
    /// a second call neither resets state nor errors.
    pub fn start(&mut self, now: Instant) -> Result<(), VadError> {
        if self.source.is_none() {
            return Err(VadError::NotConnected);
        }
        if self.active {
            return Ok(());
        }

        self.voice_detected = false;
        self.raw_level = 0.0;
        self.smoothed_level = 0.0;
        self.voice_start_candidate = None;
        self.silence_candidate = None;
        self.voice_started_at = None;
        self.metrics = VadMetrics::default();
        self.epoch = Some(now);
        self.active = true;

        tracing::debug!(config = ?self.config, "voice detection started");
        Ok(())
    }

    /// Halt the analysis session. If voice is currently detected, one final
    /// `VoiceEnd` is emitted synchronously before `active` drops, so
    /// consumers never observe an inactive detector that still claims
    /// voice. Idempotent.
    pub fn stop(&mut self, now: Instant) {
        if !self.active {
            return;
        }
        if self.voice_detected {
            self.finish_voice(now);
        }
        self.voice_start_candidate = None;
        self.silence_candidate = None;
        self.active = false;

        tracing::debug!(
            samples = self.metrics.samples_processed,
            segments = self.metrics.voice_segments,
            "voice detection stopped"
        );
    }

    /// Release the audio source. Implies [`stop`](Self::stop).
    pub fn disconnect(&mut self, now: Instant) {
        self.stop(now);
        self.source = None;
    }

    /// One analysis step: read the attached source and process its level.
    /// No-op while inactive.
    pub fn tick(&mut self, now: Instant) {
        if !self.active {
            return;
        }
        let raw = match &self.source {
            Some(source) => source.level(),
            None => return,
        };
        self.process_sample(raw, now);
    }

    /// Core state machine, invoked once per tick while active.
    ///
    /// Out-of-range and non-finite input is clamped into [0, 1]; this
    /// method never fails.
    pub fn process_sample(&mut self, raw: f32, now: Instant) {
        if !self.active {
            return;
        }

        let raw = if raw.is_finite() {
            raw.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let gained = raw * self.config.sensitivity;
        self.smoothed_level =
            self.smoothed_level * self.config.smoothing + gained * (1.0 - self.config.smoothing);
        self.raw_level = raw;

        self.metrics.samples_processed += 1;
        self.metrics.last_raw = raw;
        self.metrics.last_smoothed = self.smoothed_level;

        let timestamp_ms = self.timestamp_ms(now);
        self.registry.emit(&VadEvent::VoiceLevel {
            raw,
            smoothed: self.smoothed_level,
            timestamp_ms,
        });

        let above = self.smoothed_level > self.config.threshold;

        if above {
            if !self.voice_detected {
                match self.voice_start_candidate {
                    None => self.voice_start_candidate = Some(now),
                    Some(candidate) => {
                        if now.saturating_duration_since(candidate) >= self.config.min_duration() {
                            self.voice_detected = true;
                            self.voice_start_candidate = None;
                            // A silence countdown left over from the previous
                            // voice period is cleared only here.
                            self.silence_candidate = None;
                            self.voice_started_at = Some(now);
                            self.metrics.voice_segments += 1;

                            let timestamp_ms = self.timestamp_ms(now);
                            self.registry.emit(&VadEvent::VoiceStart { timestamp_ms });
                        }
                    }
                }
            }
            // While voice is detected, an above-threshold sample does NOT
            // clear a running silence countdown.
        } else if self.voice_detected {
            if self.silence_candidate.is_none() {
                self.silence_candidate = Some(now);
            }
        } else {
            // Below threshold before the debounce elapsed: the pending
            // start is cancelled outright.
            self.voice_start_candidate = None;
        }

        if self.voice_detected {
            if let Some(candidate) = self.silence_candidate {
                if now.saturating_duration_since(candidate) >= self.config.max_silence() {
                    self.finish_voice(now);
                }
            }
        }
    }

    /// Surface a runtime/acquisition failure to `Error` listeners.
    pub fn report_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%message, "detector error reported");
        self.registry.emit(&VadEvent::Error { message });
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_voice_detected(&self) -> bool {
        self.voice_detected
    }

    /// Last raw sample and its exponential moving average.
    pub fn levels(&self) -> (f32, f32) {
        (self.raw_level, self.smoothed_level)
    }

    pub fn metrics(&self) -> &VadMetrics {
        &self.metrics
    }

    fn finish_voice(&mut self, now: Instant) {
        self.voice_detected = false;
        self.voice_start_candidate = None;
        self.silence_candidate = None;

        let duration_ms = self
            .voice_started_at
            .take()
            .map(|started| now.saturating_duration_since(started).as_millis() as u64)
            .unwrap_or(0);
        self.metrics.total_voice_ms += duration_ms;

        let timestamp_ms = self.timestamp_ms(now);
        self.registry.emit(&VadEvent::VoiceEnd {
            timestamp_ms,
            duration_ms,
        });
    }

    fn timestamp_ms(&self, now: Instant) -> u64 {
        self.epoch
            .map(|epoch| now.saturating_duration_since(epoch).as_millis() as u64)
            .unwrap_or(0)
    }
}

impl Default for VoiceActivityDetector {
    fn default() -> Self {
        Self::new(VadConfig::default())
    }
}
