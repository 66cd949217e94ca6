use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeState {
    #[default]
    NotFading,
    Fading { elapsed: Duration },
}

/// Result of advancing the fade by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeStep {
    Idle,
    Running,
    /// Fade reached its duration; the source should be disabled now.
    Finished,
}

/// Linear fade-out of the frozen frame.
#[derive(Debug, Default)]
pub struct FadeController {
    state: FadeState,
}

impl FadeController {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> FadeState {
        self.state
    }

    #[inline]
    pub fn is_fading(&self) -> bool {
        matches!(self.state, FadeState::Fading { .. })
    }

    /// Start (or restart) from full opacity.
    pub fn begin(&mut self) {
        self.state = FadeState::Fading {
            elapsed: Duration::ZERO,
        };
    }

    pub fn cancel(&mut self) {
        self.state = FadeState::NotFading;
    }

    pub fn tick(&mut self, dt: Duration, fade_duration: Duration) -> FadeStep {
        let FadeState::Fading { elapsed } = &mut self.state else {
            return FadeStep::Idle;
        };

        *elapsed += dt;
        if *elapsed >= fade_duration {
            self.state = FadeState::NotFading;
            FadeStep::Finished
        } else {
            FadeStep::Running
        }
    }

    /// Fading and not yet at the end of the ramp.
    #[inline]
    pub fn in_progress(&self, fade_duration: Duration) -> bool {
        matches!(self.state, FadeState::Fading { elapsed } if elapsed < fade_duration)
    }

    /// `(fade - elapsed) / fade` while in progress, otherwise 1.0.
    pub fn opacity(&self, fade_duration: Duration) -> f32 {
        match self.state {
            FadeState::Fading { elapsed } if elapsed < fade_duration => {
                let total = fade_duration.as_secs_f64();
                ((total - elapsed.as_secs_f64()) / total) as f32
            }
            _ => 1.0,
        }
    }
}
