use freeze_core::{FrameSize, LifecycleEvent, DISABLE_HOTKEY, ENABLE_HOTKEY};

/// Something the simulated host does at a given frame.
#[derive(Debug, Clone, Copy)]
pub enum Cue {
    Lifecycle(LifecycleEvent),
    /// Hotkey press by its registered name.
    Hotkey(&'static str),
    Resize(FrameSize),
    DropTarget,
}

/// Scripted session, sorted by frame index.
pub fn default_script() -> Vec<(u64, Cue)> {
    vec![
        (10, Cue::Lifecycle(LifecycleEvent::Show)),
        (90, Cue::Resize(FrameSize::new(1280, 720))),
        (120, Cue::DropTarget),
        (125, Cue::Resize(FrameSize::new(1280, 720))),
        (200, Cue::Hotkey(DISABLE_HOTKEY)),
        (230, Cue::Hotkey(ENABLE_HOTKEY)),
        (300, Cue::Lifecycle(LifecycleEvent::Hide)),
    ]
}
