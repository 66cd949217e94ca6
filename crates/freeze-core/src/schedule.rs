use std::time::Duration;

use log::debug;

use crate::config::{FreezeAction, FreezeConfig};

/// The single deferred action, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingAction {
    #[default]
    None,
    Enable { elapsed: Duration },
    Disable { elapsed: Duration },
}

impl PendingAction {
    #[inline]
    pub fn action(&self) -> FreezeAction {
        match self {
            PendingAction::None => FreezeAction::None,
            PendingAction::Enable { .. } => FreezeAction::Enable,
            PendingAction::Disable { .. } => FreezeAction::Disable,
        }
    }
}

/// Holds at most one enable/disable action behind its configured delay.
///
/// A new request always replaces whatever was pending.
#[derive(Debug, Default)]
pub struct DelayedActionScheduler {
    pending: PendingAction,
}

impl DelayedActionScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn pending(&self) -> PendingAction {
        self.pending
    }

    /// Defer `action` if it has a delay configured.
    ///
    /// Returns the action when it must be applied right away.
    pub fn request(&mut self, action: FreezeAction, cfg: &FreezeConfig) -> Option<FreezeAction> {
        if action == FreezeAction::None {
            return None;
        }

        if cfg.delay_for(action).is_zero() {
            return Some(action);
        }

        let replaced = self.pending.action();
        self.pending = match action {
            FreezeAction::Enable => PendingAction::Enable {
                elapsed: Duration::ZERO,
            },
            FreezeAction::Disable => PendingAction::Disable {
                elapsed: Duration::ZERO,
            },
            FreezeAction::None => PendingAction::None,
        };
        debug!(
            target: "freeze",
            "schedule.defer action={:?} replaced={:?} delay_ms={}",
            action,
            replaced,
            cfg.delay_for(action).as_millis()
        );
        None
    }

    /// Advance the pending action; returns it once its delay has elapsed.
    pub fn tick(&mut self, dt: Duration, cfg: &FreezeConfig) -> Option<FreezeAction> {
        let (action, elapsed) = match &mut self.pending {
            PendingAction::None => return None,
            PendingAction::Enable { elapsed } => (FreezeAction::Enable, elapsed),
            PendingAction::Disable { elapsed } => (FreezeAction::Disable, elapsed),
        };

        *elapsed += dt;
        if *elapsed < cfg.delay_for(action) {
            return None;
        }

        debug!(target: "freeze", "schedule.fire action={:?}", action);
        self.pending = PendingAction::None;
        Some(action)
    }
}
