pub mod config;
pub mod engine;
pub mod error;
pub mod fade;
pub mod frame;
pub mod host_events;
pub mod ring;
pub mod schedule;
pub mod selector;
pub mod services;

pub use crate::config::{FreezeAction, FreezeConfig, FreezeSettings, LifecycleActions};
pub use crate::engine::{FreezeEngine, FreezeStatus};
pub use crate::error::{FreezeError, FreezeResult};
pub use crate::fade::{FadeController, FadeState, FadeStep};
pub use crate::frame::{BlendParams, FrameSize, MaskEdges};
pub use crate::host_events::{HotkeyEvent, LifecycleEvent, DISABLE_HOTKEY, ENABLE_HOTKEY};
pub use crate::ring::FrameRingBuffer;
pub use crate::schedule::{DelayedActionScheduler, PendingAction};
pub use crate::selector::{next_frame, Direction, FreezeMode};
pub use crate::services::{CaptureFailure, FilterHost, FrameRenderer, SourceControl, TargetQuery};
