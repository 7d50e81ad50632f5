/// The animation playback surface, supplied by the host.
///
/// This is an external collaborator: the controller normalizes and clamps
/// values before forwarding, and the player renders however it likes
/// (canvas, terminal, a recording stub in tests).
pub trait AnimatedPlayer: Send {
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
    fn set_speed(&mut self, speed: f32);
    fn set_opacity(&mut self, opacity: f32);
    fn set_loop(&mut self, looping: bool);
}
