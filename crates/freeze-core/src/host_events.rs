/// Hotkey pair names the host registers on the filter's parent source.
pub const ENABLE_HOTKEY: &str = "Freeze.Enable";
pub const DISABLE_HOTKEY: &str = "Freeze.Disable";

/// Source lifecycle notifications from the host.
/// Each one maps to a configured [`FreezeAction`](crate::config::FreezeAction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Activate,
    Deactivate,
    Show,
    Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyEvent {
    Enable,
    Disable,
}

impl HotkeyEvent {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            ENABLE_HOTKEY => Some(HotkeyEvent::Enable),
            DISABLE_HOTKEY => Some(HotkeyEvent::Disable),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HotkeyEvent::Enable => ENABLE_HOTKEY,
            HotkeyEvent::Disable => DISABLE_HOTKEY,
        }
    }
}
