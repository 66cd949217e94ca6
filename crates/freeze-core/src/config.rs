use std::fs;
use std::io;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FreezeError, FreezeResult};
use crate::frame::MaskEdges;
use crate::selector::FreezeMode;

/// What a lifecycle event or hotkey asks the filter to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreezeAction {
    #[default]
    None,
    Enable,
    Disable,
}

pub const MAX_FRAMES: i64 = 100;
pub const MAX_FADE_MS: u32 = 10_000;
pub const MAX_TIMER_MS: u32 = 100_000;
pub const MAX_FEATHERING_PERCENT: f64 = 10.0;

/// Filter settings as the host stores them: milliseconds and percentages.
///
/// Use [`FreezeSettings::resolve`] to get the normalized [`FreezeConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreezeSettings {
    #[serde(default = "default_frames")]
    pub frames: i64,

    #[serde(default)]
    pub freeze_mode: FreezeMode,

    /// Cap on how long a freeze lasts (ms), 0 = unlimited.
    #[serde(default)]
    pub duration: u32,

    #[serde(default)]
    pub refresh_interval: u32,

    #[serde(default)]
    pub fade_duration: u32,

    #[serde(default)]
    pub start_delay: u32,

    #[serde(default)]
    pub end_delay: u32,

    #[serde(default)]
    pub activate_action: FreezeAction,
    #[serde(default)]
    pub deactivate_action: FreezeAction,
    #[serde(default)]
    pub show_action: FreezeAction,
    #[serde(default)]
    pub hide_action: FreezeAction,

    #[serde(default)]
    pub mask: bool,

    /// Mask edges and feathering are percentages.
    #[serde(default)]
    pub mask_left: f64,
    #[serde(default)]
    pub mask_right: f64,
    #[serde(default)]
    pub mask_top: f64,
    #[serde(default)]
    pub mask_bottom: f64,

    #[serde(default = "default_feathering")]
    pub feathering: f64,
}

fn default_frames() -> i64 {
    1
}
fn default_feathering() -> f64 {
    2.0
}

impl Default for FreezeSettings {
    fn default() -> Self {
        Self {
            frames: default_frames(),
            freeze_mode: FreezeMode::default(),
            duration: 0,
            refresh_interval: 0,
            fade_duration: 0,
            start_delay: 0,
            end_delay: 0,
            activate_action: FreezeAction::None,
            deactivate_action: FreezeAction::None,
            show_action: FreezeAction::None,
            hide_action: FreezeAction::None,
            mask: false,
            mask_left: 0.0,
            mask_right: 0.0,
            mask_top: 0.0,
            mask_bottom: 0.0,
            feathering: default_feathering(),
        }
    }
}

impl FreezeSettings {
    pub fn from_toml_str(s: &str) -> FreezeResult<Self> {
        toml::from_str(s).map_err(|e| FreezeError::Config(format!("parse: {e}")))
    }

    /// Missing file yields defaults; an unreadable or malformed one is an error.
    pub fn load_or_default(path: &str) -> FreezeResult<Self> {
        match fs::read_to_string(path) {
            Ok(s) => toml::from_str(&s)
                .map_err(|e| FreezeError::Config(format!("parse {}: {}", path, e))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(FreezeError::Io {
                path: path.to_string(),
                source,
            }),
        }
    }

    pub fn to_toml_string(&self) -> FreezeResult<String> {
        toml::to_string_pretty(self).map_err(|e| FreezeError::Config(format!("serialize: {e}")))
    }

    /// Clamp to the host's ranges and convert to engine units.
    pub fn resolve(&self) -> FreezeConfig {
        let ms = |v: u32, max: u32| Duration::from_millis(u64::from(v.min(max)));

        FreezeConfig {
            capacity: self.frames.clamp(1, MAX_FRAMES) as usize,
            mode: self.freeze_mode,
            duration_cap: ms(self.duration, MAX_TIMER_MS),
            refresh_interval: ms(self.refresh_interval, MAX_TIMER_MS),
            fade_duration: ms(self.fade_duration, MAX_FADE_MS),
            start_delay: ms(self.start_delay, MAX_TIMER_MS),
            end_delay: ms(self.end_delay, MAX_TIMER_MS),
            actions: LifecycleActions {
                activate: self.activate_action,
                deactivate: self.deactivate_action,
                show: self.show_action,
                hide: self.hide_action,
            },
            mask_enabled: self.mask,
            mask: MaskEdges {
                left: percent(self.mask_left, 100.0),
                right: percent(self.mask_right, 100.0),
                top: percent(self.mask_top, 100.0),
                bottom: percent(self.mask_bottom, 100.0),
            },
            feathering: percent(self.feathering, MAX_FEATHERING_PERCENT),
        }
    }
}

fn percent(v: f64, max: f64) -> f32 {
    if v.is_nan() {
        return 0.0;
    }
    (v.clamp(0.0, max) / 100.0) as f32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LifecycleActions {
    pub activate: FreezeAction,
    pub deactivate: FreezeAction,
    pub show: FreezeAction,
    pub hide: FreezeAction,
}

/// Immutable engine configuration snapshot.
///
/// Zero durations disable the corresponding feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FreezeConfig {
    pub capacity: usize,
    pub mode: FreezeMode,
    pub duration_cap: Duration,
    pub refresh_interval: Duration,
    pub fade_duration: Duration,
    pub start_delay: Duration,
    pub end_delay: Duration,
    pub actions: LifecycleActions,
    pub mask_enabled: bool,
    pub mask: MaskEdges,
    pub feathering: f32,
}

impl FreezeConfig {
    /// Delay gating `action`, zero when it applies immediately.
    #[inline]
    pub fn delay_for(&self, action: FreezeAction) -> Duration {
        match action {
            FreezeAction::Enable => self.start_delay,
            FreezeAction::Disable => self.end_delay,
            FreezeAction::None => Duration::ZERO,
        }
    }
}

impl Default for FreezeConfig {
    fn default() -> Self {
        FreezeSettings::default().resolve()
    }
}
