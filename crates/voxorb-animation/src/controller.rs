use crate::error::ControllerError;
use crate::hooks::ControllerHooks;
use crate::player::AnimatedPlayer;

/// Clamp ranges for player-facing values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerLimits {
    pub min_speed: f32,
    pub max_speed: f32,
    /// Opacity bounds applied to voice-derived opacity updates.
    pub min_opacity: f32,
    pub max_opacity: f32,
    pub min_voice_level: f32,
    pub max_voice_level: f32,
}

impl Default for ControllerLimits {
    fn default() -> Self {
        Self {
            min_speed: 0.1,
            max_speed: 3.0,
            min_opacity: 0.2,
            max_opacity: 1.0,
            min_voice_level: 0.1,
            max_voice_level: 3.0,
        }
    }
}

/// Normalized playback control over an [`AnimatedPlayer`].
///
/// Every control operation is a failure-returning no-op until a player is
/// attached. State-changing operations invoke the matching
/// [`ControllerHooks`] slot synchronously after forwarding to the player.
pub struct AnimationController {
    player: Option<Box<dyn AnimatedPlayer + Send>>,
    limits: ControllerLimits,
    hooks: ControllerHooks,
    speed: f32,
    opacity: f32,
    looping: bool,
    playing: bool,
}

impl AnimationController {
    pub fn new(limits: ControllerLimits) -> Self {
        Self {
            player: None,
            limits,
            hooks: ControllerHooks::default(),
            speed: 1.0,
            opacity: 1.0,
            looping: true,
            playing: false,
        }
    }

    /// Attach the playback surface; the controller is ready afterwards.
    pub fn attach_player(&mut self, player: Box<dyn AnimatedPlayer + Send>) {
        self.player = Some(player);
    }

    pub fn is_ready(&self) -> bool {
        self.player.is_some()
    }

    pub fn hooks_mut(&mut self) -> &mut ControllerHooks {
        &mut self.hooks
    }

    pub fn limits(&self) -> ControllerLimits {
        self.limits
    }

    pub fn play(&mut self) -> Result<(), ControllerError> {
        self.player_mut()?.play();
        self.playing = true;
        if let Some(hook) = self.hooks.on_play.as_mut() {
            hook();
        }
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), ControllerError> {
        self.player_mut()?.pause();
        self.playing = false;
        if let Some(hook) = self.hooks.on_pause.as_mut() {
            hook();
        }
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), ControllerError> {
        self.player_mut()?.stop();
        self.playing = false;
        if let Some(hook) = self.hooks.on_stop.as_mut() {
            hook();
        }
        Ok(())
    }

    pub fn set_speed(&mut self, speed: f32) -> Result<(), ControllerError> {
        let clamped = speed.clamp(self.limits.min_speed, self.limits.max_speed);
        self.player_mut()?.set_speed(clamped);
        self.speed = clamped;
        if let Some(hook) = self.hooks.on_speed_change.as_mut() {
            hook(clamped);
        }
        Ok(())
    }

    pub fn set_opacity(&mut self, opacity: f32) -> Result<(), ControllerError> {
        let clamped = opacity.clamp(0.0, 1.0);
        self.player_mut()?.set_opacity(clamped);
        self.opacity = clamped;
        if let Some(hook) = self.hooks.on_opacity_change.as_mut() {
            hook(clamped);
        }
        Ok(())
    }

    pub fn set_loop(&mut self, looping: bool) -> Result<(), ControllerError> {
        self.player_mut()?.set_loop(looping);
        self.looping = looping;
        if let Some(hook) = self.hooks.on_loop_change.as_mut() {
            hook(looping);
        }
        Ok(())
    }

    /// Apply a voice level as one atomic visual update: the clamped level
    /// becomes the playback speed, and half the level (bounded by the
    /// opacity limits) becomes the opacity.
    pub fn set_voice_level(&mut self, level: f32) -> Result<(), ControllerError> {
        if self.player.is_none() {
            return Err(ControllerError::NotReady);
        }

        let clamped = level.clamp(self.limits.min_voice_level, self.limits.max_voice_level);
        self.set_speed(clamped)?;
        let opacity = (clamped / 2.0).clamp(self.limits.min_opacity, self.limits.max_opacity);
        self.set_opacity(opacity)?;

        if let Some(hook) = self.hooks.on_voice_change.as_mut() {
            hook(clamped);
        }
        Ok(())
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    fn player_mut(&mut self) -> Result<&mut (dyn AnimatedPlayer + Send), ControllerError> {
        match self.player.as_deref_mut() {
            Some(player) => Ok(player),
            None => {
                tracing::trace!("controller operation before a player was attached");
                Err(ControllerError::NotReady)
            }
        }
    }
}

impl Default for AnimationController {
    fn default() -> Self {
        Self::new(ControllerLimits::default())
    }
}
