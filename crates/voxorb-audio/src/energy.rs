//! RMS energy extraction for capture buffers.
//!
//! The detector consumes a normalized scalar in [0, 1]; these helpers turn
//! one callback buffer into that scalar. Frequency-domain weighting is
//! deliberately not done here.

/// Root-mean-square of a float buffer, clamped into [0, 1].
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt().clamp(0.0, 1.0)
}

/// RMS of a signed 16-bit buffer, normalized against full scale.
pub fn rms_i16(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: i64 = samples
        .iter()
        .map(|&sample| {
            let s = sample as i64;
            s * s
        })
        .sum();
    let mean_square = sum_squares as f64 / samples.len() as f64;
    ((mean_square.sqrt() / 32768.0) as f32).clamp(0.0, 1.0)
}

/// RMS of an unsigned 16-bit buffer, re-centered around the midpoint.
pub fn rms_u16(samples: &[u16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples
        .iter()
        .map(|&sample| {
            let s = (sample as f64 - 32768.0) / 32768.0;
            s * s
        })
        .sum();
    ((sum_squares / samples.len() as f64).sqrt() as f32).clamp(0.0, 1.0)
}
