/// Events emitted by the detector.
///
/// Timestamps are milliseconds since the current session's `start()`.
#[derive(Debug, Clone, PartialEq)]
pub enum VadEvent {
    VoiceStart {
        timestamp_ms: u64,
    },
    VoiceEnd {
        timestamp_ms: u64,
        duration_ms: u64,
    },
    /// Continuous level signal, emitted once per processed sample
    /// regardless of the discrete voice verdict.
    VoiceLevel {
        raw: f32,
        smoothed: f32,
        timestamp_ms: u64,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    VoiceStart,
    VoiceEnd,
    VoiceLevel,
    Error,
}

impl VadEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            VadEvent::VoiceStart { .. } => EventKind::VoiceStart,
            VadEvent::VoiceEnd { .. } => EventKind::VoiceEnd,
            VadEvent::VoiceLevel { .. } => EventKind::VoiceLevel,
            VadEvent::Error { .. } => EventKind::Error,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VadMetrics {
    pub samples_processed: u64,

    pub voice_segments: u64,

    pub total_voice_ms: u64,

    pub last_raw: f32,

    pub last_smoothed: f32,
}
