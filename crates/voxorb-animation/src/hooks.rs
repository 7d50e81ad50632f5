/// Optional callback slots, one per controller event.
///
/// Slots are checked directly by name; there is no string-keyed event
/// lookup. Each hook fires synchronously right after the corresponding
/// state change is applied to the player.
#[derive(Default)]
pub struct ControllerHooks {
    pub on_play: Option<Box<dyn FnMut() + Send>>,
    pub on_pause: Option<Box<dyn FnMut() + Send>>,
    pub on_stop: Option<Box<dyn FnMut() + Send>>,
    pub on_speed_change: Option<Box<dyn FnMut(f32) + Send>>,
    pub on_loop_change: Option<Box<dyn FnMut(bool) + Send>>,
    pub on_opacity_change: Option<Box<dyn FnMut(f32) + Send>>,
    pub on_voice_change: Option<Box<dyn FnMut(f32) + Send>>,
}
