use std::time::Duration;

use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{FreezeAction, FreezeConfig, FreezeSettings};
use crate::error::FreezeError;
use crate::fade::{FadeController, FadeStep};
use crate::frame::{BlendParams, FrameSize, MaskEdges};
use crate::host_events::{HotkeyEvent, LifecycleEvent};
use crate::ring::FrameRingBuffer;
use crate::schedule::{DelayedActionScheduler, PendingAction};
use crate::selector::{next_frame, Direction, FreezeMode};
use crate::services::{FilterHost, FrameRenderer, SourceControl};

/// Read-only view of the engine state for hosts and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreezeStatus {
    pub target: Option<FrameSize>,
    pub frames_loaded: usize,
    pub buffered: usize,
    pub current_frame: usize,
    pub direction: Direction,
    pub fading: bool,
    pub opacity: f32,
    pub pending: PendingAction,
    pub active_duration: Duration,
}

/// Freeze-frame filter instance.
///
/// The host drives it from a single thread:
/// - `tick` once per frame period (timers, state machine, frame selection)
/// - `render` one or more times per period (capture + draw)
/// - `on_lifecycle` / `on_hotkey` when the host reports events
/// - `update` whenever settings change
/// - `teardown` once before dropping, to release captured frames
///
/// Frames live in a ring buffer; the display window covers its newest
/// `frames_loaded` entries, so recycled storage from an earlier capture cycle
/// is never shown.
pub struct FreezeEngine<H> {
    cfg: FreezeConfig,
    frames: FrameRingBuffer<H>,
    scheduler: DelayedActionScheduler,
    fade: FadeController,
    rng: StdRng,

    target: Option<FrameSize>,
    captured_this_tick: bool,

    frames_loaded: usize,
    current_frame: usize,
    direction: Direction,

    active_duration: Duration,
    last_refresh: Duration,
}

impl<H> FreezeEngine<H> {
    pub fn new(cfg: FreezeConfig) -> Self {
        info!(
            target: "freeze",
            "engine.create capacity={} mode={:?}",
            cfg.capacity,
            cfg.mode
        );

        Self {
            frames: FrameRingBuffer::new(cfg.capacity),
            cfg,
            scheduler: DelayedActionScheduler::new(),
            fade: FadeController::new(),
            rng: StdRng::from_entropy(),
            target: None,
            captured_this_tick: false,
            frames_loaded: 0,
            current_frame: 0,
            direction: Direction::Forward,
            active_duration: Duration::ZERO,
            last_refresh: Duration::ZERO,
        }
    }

    pub fn from_settings(settings: &FreezeSettings) -> Self {
        Self::new(settings.resolve())
    }

    /// Reproducible random mode.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[inline]
    pub fn config(&self) -> &FreezeConfig {
        &self.cfg
    }

    #[inline]
    pub fn frames(&self) -> &FrameRingBuffer<H> {
        &self.frames
    }

    #[inline]
    pub fn frames_loaded(&self) -> usize {
        self.frames_loaded
    }

    #[inline]
    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn is_fading(&self) -> bool {
        self.fade.is_fading()
    }

    #[inline]
    pub fn pending_action(&self) -> PendingAction {
        self.scheduler.pending()
    }

    pub fn snapshot(&self) -> FreezeStatus {
        FreezeStatus {
            target: self.target,
            frames_loaded: self.frames_loaded,
            buffered: self.frames.len(),
            current_frame: self.current_frame,
            direction: self.direction,
            fading: self.fade.is_fading(),
            opacity: self.fade.opacity(self.cfg.fade_duration),
            pending: self.scheduler.pending(),
            active_duration: self.active_duration,
        }
    }

    /// Apply a new configuration snapshot.
    ///
    /// A smaller capacity evicts the oldest frames right away.
    pub fn update<R>(&mut self, cfg: FreezeConfig, renderer: &mut R)
    where
        R: FrameRenderer<Handle = H> + ?Sized,
    {
        info!(
            target: "freeze",
            "engine.update capacity={} mode={:?} fade_ms={} mask={}",
            cfg.capacity,
            cfg.mode,
            cfg.fade_duration.as_millis(),
            cfg.mask_enabled
        );

        self.frames
            .set_capacity(cfg.capacity, |h| renderer.release_frame(h));
        self.frames_loaded = self.frames_loaded.min(self.frames.len());
        self.current_frame = self.current_frame.min(self.frames_loaded.saturating_sub(1));
        self.cfg = cfg;
    }

    /// Run `action` now, or park it behind its configured delay.
    pub fn request_action<S>(&mut self, action: FreezeAction, source: &mut S)
    where
        S: SourceControl + ?Sized,
    {
        if let Some(action) = self.scheduler.request(action, &self.cfg) {
            self.apply_action(action, source);
        }
    }

    pub fn apply_action<S>(&mut self, action: FreezeAction, source: &mut S)
    where
        S: SourceControl + ?Sized,
    {
        match action {
            FreezeAction::None => {}
            FreezeAction::Enable => {
                if !source.is_enabled() {
                    info!(target: "freeze", "engine.enable");
                    source.set_enabled(true);
                }
            }
            FreezeAction::Disable => {
                if source.is_enabled() {
                    self.fade_or_disable(source);
                }
            }
        }
    }

    pub fn on_lifecycle<S>(&mut self, event: LifecycleEvent, source: &mut S)
    where
        S: SourceControl + ?Sized,
    {
        let actions = self.cfg.actions;
        let action = match event {
            LifecycleEvent::Activate => actions.activate,
            LifecycleEvent::Deactivate => actions.deactivate,
            LifecycleEvent::Show => actions.show,
            LifecycleEvent::Hide => actions.hide,
        };

        debug!(target: "freeze", "engine.lifecycle event={:?} action={:?}", event, action);
        self.request_action(action, source);
    }

    /// Hotkey press handler. Releases are ignored.
    ///
    /// Returns whether the press was consumed.
    pub fn on_hotkey<S>(&mut self, event: HotkeyEvent, pressed: bool, source: &mut S) -> bool
    where
        S: SourceControl + ?Sized,
    {
        if !pressed {
            return false;
        }

        let enabled = source.is_enabled();
        let fading = self.fade.is_fading();

        match event {
            HotkeyEvent::Enable => {
                if enabled && !fading {
                    return false;
                }
                if fading {
                    info!(target: "freeze", "fade.cancel");
                    self.fade.cancel();
                }
                if !enabled {
                    self.request_action(FreezeAction::Enable, source);
                }
                true
            }
            HotkeyEvent::Disable => {
                if !enabled || fading {
                    return false;
                }
                self.request_action(FreezeAction::Disable, source);
                true
            }
        }
    }

    /// Advance timers and pick the frame for the coming period.
    pub fn tick<C>(&mut self, dt: Duration, host: &mut C)
    where
        C: FilterHost<Handle = H> + ?Sized,
    {
        if let Some(action) = self.scheduler.tick(dt, &self.cfg) {
            self.apply_action(action, host);
        }

        if host.is_enabled() && self.fade.tick(dt, self.cfg.fade_duration) == FadeStep::Finished {
            info!(target: "freeze", "fade.finish");
            host.set_enabled(false);
        }

        if host.is_enabled() {
            self.advance_active_timers(dt, host);
        } else {
            self.restart_capture_cycle();
            self.active_duration = Duration::ZERO;
            self.last_refresh = Duration::ZERO;
            self.fade.cancel();
        }

        self.target = host.target_size().filter(FrameSize::is_valid);
        if let Some(size) = self.target {
            if self.frames.invalidate(size, |h| host.release_frame(h)) {
                self.restart_capture_cycle();
            }
        }

        self.captured_this_tick = false;

        if self.target.is_none() {
            trace!(target: "freeze", "tick.target_invalid");
            return;
        }

        let (index, direction) = next_frame(
            self.cfg.mode,
            self.frames_loaded,
            self.current_frame,
            self.direction,
            &mut self.rng,
        );
        self.current_frame = index;
        self.direction = direction;
    }

    /// Capture the live frame if this period still needs one, then draw.
    pub fn render<C>(&mut self, host: &mut C)
    where
        C: FilterHost<Handle = H> + ?Sized,
    {
        let Some(size) = self.target else {
            host.skip_to_pass_through();
            return;
        };

        if !self.captured_this_tick && self.frames_loaded < self.cfg.capacity {
            self.capture(size, host);
        }

        self.draw(host);
    }

    /// Release every captured frame. Call once before dropping the engine.
    pub fn teardown<R>(&mut self, renderer: &mut R)
    where
        R: FrameRenderer<Handle = H> + ?Sized,
    {
        info!(target: "freeze", "engine.teardown frames={}", self.frames.len());
        self.frames.teardown(|h| renderer.release_frame(h));
        self.restart_capture_cycle();
        self.target = None;
    }

    /// Compositing parameters for the current state.
    pub fn blend_params(&self) -> BlendParams {
        BlendParams {
            opacity: self.fade.opacity(self.cfg.fade_duration),
            mask: if self.cfg.mask_enabled {
                self.cfg.mask
            } else {
                MaskEdges::NONE
            },
            feathering: self.cfg.feathering,
        }
    }

    fn fade_or_disable<S>(&mut self, source: &mut S)
    where
        S: SourceControl + ?Sized,
    {
        if self.cfg.fade_duration.is_zero() {
            info!(target: "freeze", "engine.disable");
            source.set_enabled(false);
        } else {
            info!(
                target: "freeze",
                "fade.begin duration_ms={}",
                self.cfg.fade_duration.as_millis()
            );
            self.fade.begin();
        }
    }

    fn advance_active_timers<S>(&mut self, dt: Duration, source: &mut S)
    where
        S: SourceControl + ?Sized,
    {
        self.active_duration += dt;

        let cap = self.cfg.duration_cap;
        if !cap.is_zero() && self.active_duration > cap {
            // a fade already underway keeps its progress
            if self.cfg.fade_duration.is_zero() || !self.fade.is_fading() {
                debug!(target: "freeze", "engine.duration_cap reached");
                self.fade_or_disable(source);
            }
            return;
        }

        let refresh = self.cfg.refresh_interval;
        if !refresh.is_zero()
            && self.active_duration > self.last_refresh
            && self.active_duration - self.last_refresh >= refresh
        {
            debug!(
                target: "freeze",
                "engine.refresh at_ms={}",
                self.active_duration.as_millis()
            );
            self.restart_capture_cycle();
            self.last_refresh = self.active_duration;
        }
    }

    fn capture<R>(&mut self, size: FrameSize, renderer: &mut R)
    where
        R: FrameRenderer<Handle = H> + ?Sized,
    {
        // one attempt per tick, a failed one is retried next tick
        self.captured_this_tick = true;

        let reuse = self.frames.take_recyclable();
        match renderer.capture_frame(size, reuse) {
            Ok(handle) => {
                self.frames.capture(handle, |h| renderer.release_frame(h));
                self.frames_loaded = (self.frames_loaded + 1).min(self.frames.len());
                trace!(
                    target: "freeze",
                    "capture.ok loaded={} buffered={}",
                    self.frames_loaded,
                    self.frames.len()
                );

                if self.cfg.mode == FreezeMode::BackAndForth {
                    self.rewind_to_newest();
                }
            }
            Err(failure) => {
                if let Some(slot) = failure.slot {
                    self.frames.restore_front(slot);
                }
                let err = FreezeError::Capture(failure.reason);
                warn!(
                    target: "freeze",
                    "capture.failed size={}x{} {}",
                    size.width,
                    size.height,
                    err
                );
            }
        }
    }

    /// Forget the loaded window; the next renders capture from scratch.
    fn restart_capture_cycle(&mut self) {
        self.frames_loaded = 0;
        self.current_frame = 0;
    }

    /// Back-and-forth playback restarts from the newest capture, heading back.
    fn rewind_to_newest(&mut self) {
        self.current_frame = self.frames_loaded.saturating_sub(1);
        self.direction = Direction::Backward;
    }

    fn draw<R>(&mut self, renderer: &mut R)
    where
        R: FrameRenderer<Handle = H> + ?Sized,
    {
        let loaded = self.frames_loaded.min(self.frames.len());
        let fading = self.fade.in_progress(self.cfg.fade_duration);

        // live frame underneath: masked or fading frames only partly cover it
        if self.cfg.mask_enabled || fading || loaded == 0 {
            renderer.skip_to_pass_through();
        }
        if loaded == 0 {
            return;
        }

        let index = self.current_frame.min(loaded - 1);
        let position = self.frames.len() - loaded + index;
        let params = self.blend_params();

        match self.frames.get(position) {
            Ok(handle) => renderer.draw_frame(handle, &params),
            Err(e) => warn!(target: "freeze", "draw.skip {e}"),
        }
    }
}

impl<H> Drop for FreezeEngine<H> {
    fn drop(&mut self) {
        if !self.frames.is_empty() {
            warn!(
                target: "freeze",
                "engine.drop frames={} were never released (missing teardown)",
                self.frames.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Switch {
        enabled: bool,
        toggles: usize,
    }

    impl SourceControl for Switch {
        fn is_enabled(&self) -> bool {
            self.enabled
        }

        fn set_enabled(&mut self, enabled: bool) {
            self.enabled = enabled;
            self.toggles += 1;
        }
    }

    fn engine(cfg: FreezeConfig) -> FreezeEngine<u32> {
        FreezeEngine::new(cfg).with_rng_seed(1)
    }

    fn with_fade(ms: u64) -> FreezeConfig {
        FreezeConfig {
            fade_duration: Duration::from_millis(ms),
            ..FreezeConfig::default()
        }
    }

    #[test]
    fn enable_only_when_disabled() {
        let mut e = engine(FreezeConfig::default());
        let mut src = Switch::default();

        e.apply_action(FreezeAction::Enable, &mut src);
        e.apply_action(FreezeAction::Enable, &mut src);
        assert!(src.enabled);
        assert_eq!(src.toggles, 1);
    }

    #[test]
    fn disable_with_fade_starts_fading() {
        let mut e = engine(with_fade(300));
        let mut src = Switch {
            enabled: true,
            ..Switch::default()
        };

        e.apply_action(FreezeAction::Disable, &mut src);
        assert!(src.enabled);
        assert!(e.is_fading());
    }

    #[test]
    fn disable_without_fade_is_immediate() {
        let mut e = engine(FreezeConfig::default());
        let mut src = Switch {
            enabled: true,
            ..Switch::default()
        };

        e.apply_action(FreezeAction::Disable, &mut src);
        assert!(!src.enabled);
        assert!(!e.is_fading());
    }

    #[test]
    fn hotkey_release_is_ignored() {
        let mut e = engine(FreezeConfig::default());
        let mut src = Switch::default();
        assert!(!e.on_hotkey(HotkeyEvent::Enable, false, &mut src));
        assert!(!src.enabled);
    }

    #[test]
    fn enable_hotkey_cancels_fade() {
        let mut e = engine(with_fade(300));
        let mut src = Switch {
            enabled: true,
            ..Switch::default()
        };

        assert!(!e.on_hotkey(HotkeyEvent::Enable, true, &mut src));

        e.apply_action(FreezeAction::Disable, &mut src);
        assert!(e.on_hotkey(HotkeyEvent::Enable, true, &mut src));
        assert!(!e.is_fading());
        assert!(src.enabled);
        assert_eq!(src.toggles, 0);
    }

    #[test]
    fn disable_hotkey_ignored_while_fading_or_disabled() {
        let mut e = engine(with_fade(300));
        let mut src = Switch::default();
        assert!(!e.on_hotkey(HotkeyEvent::Disable, true, &mut src));

        src.enabled = true;
        assert!(e.on_hotkey(HotkeyEvent::Disable, true, &mut src));
        assert!(e.is_fading());
        assert!(!e.on_hotkey(HotkeyEvent::Disable, true, &mut src));
    }

    #[test]
    fn lifecycle_events_use_configured_actions() {
        let mut cfg = FreezeConfig::default();
        cfg.actions.show = FreezeAction::Enable;
        cfg.actions.hide = FreezeAction::Disable;
        let mut e = engine(cfg);
        let mut src = Switch::default();

        e.on_lifecycle(LifecycleEvent::Activate, &mut src);
        assert!(!src.enabled);
        e.on_lifecycle(LifecycleEvent::Show, &mut src);
        assert!(src.enabled);
        e.on_lifecycle(LifecycleEvent::Hide, &mut src);
        assert!(!src.enabled);
    }

    #[test]
    fn mask_params_only_when_mask_enabled() {
        let mut cfg = FreezeConfig::default();
        cfg.mask = MaskEdges {
            left: 0.1,
            right: 0.2,
            top: 0.3,
            bottom: 0.4,
        };
        let e = engine(cfg.clone());
        assert_eq!(e.blend_params().mask, MaskEdges::NONE);

        cfg.mask_enabled = true;
        let e = engine(cfg);
        let p = e.blend_params();
        assert_eq!(p.mask.top, 0.3);
        assert_eq!(p.opacity, 1.0);
        assert!((p.feathering - 0.02).abs() < 1e-6);
    }
}
