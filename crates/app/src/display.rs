use voxorb_animation::AnimatedPlayer;

/// Player that renders control calls into the log stream.
///
/// Stands in for a graphical orb in the CLI demo: transitions land at
/// info level, the per-tick speed/opacity stream at trace level.
pub struct TracePlayer;

impl AnimatedPlayer for TracePlayer {
    fn play(&mut self) {
        tracing::info!("orb: play");
    }

    fn pause(&mut self) {
        tracing::info!("orb: pause");
    }

    fn stop(&mut self) {
        tracing::info!("orb: stop");
    }

    fn set_speed(&mut self, speed: f32) {
        tracing::trace!(speed, "orb: speed");
    }

    fn set_opacity(&mut self, opacity: f32) {
        tracing::trace!(opacity, "orb: opacity");
    }

    fn set_loop(&mut self, looping: bool) {
        tracing::info!(looping, "orb: loop");
    }
}
