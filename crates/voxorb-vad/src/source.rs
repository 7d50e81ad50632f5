/// The energy supply seam between the detector and its environment.
///
/// Implementations report the most recent normalized energy sample in
/// [0, 1]. The detector polls this once per tick; how the level is
/// produced (microphone RMS, FFT band average, a scripted sequence in
/// tests) is the implementor's business.
pub trait LevelSource: Send {
    /// Latest normalized energy level in [0, 1].
    fn level(&self) -> f32;
}
