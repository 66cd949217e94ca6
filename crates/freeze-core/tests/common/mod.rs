#![allow(dead_code)]

use std::collections::BTreeSet;
use std::time::Duration;

use freeze_core::{BlendParams, CaptureFailure, FrameRenderer, FrameSize, SourceControl, TargetQuery};

pub const FRAME: Duration = Duration::from_millis(33);

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Capture { id: u64, size: FrameSize, reused: Option<u64> },
    Release(u64),
    Draw { id: u64, params: BlendParams },
    PassThrough,
}

/// Host double: counts handles, records every renderer call.
pub struct MockHost {
    pub enabled: bool,
    pub target: Option<FrameSize>,
    pub fail_captures: usize,
    pub calls: Vec<Call>,
    pub live: BTreeSet<u64>,
    next_id: u64,
}

impl MockHost {
    pub fn new(enabled: bool) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            enabled,
            target: Some(FrameSize::new(640, 360)),
            fail_captures: 0,
            calls: Vec::new(),
            live: BTreeSet::new(),
            next_id: 1,
        }
    }

    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    pub fn captures(&self) -> Vec<u64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Capture { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn draws(&self) -> Vec<(u64, BlendParams)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Draw { id, params } => Some((*id, *params)),
                _ => None,
            })
            .collect()
    }

    pub fn last_draw(&self) -> Option<u64> {
        self.draws().last().map(|(id, _)| *id)
    }

    pub fn released(&self) -> Vec<u64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Release(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn passed_through(&self) -> bool {
        self.calls.contains(&Call::PassThrough)
    }
}

impl FrameRenderer for MockHost {
    type Handle = u64;

    fn capture_frame(
        &mut self,
        size: FrameSize,
        reuse: Option<u64>,
    ) -> Result<u64, CaptureFailure<u64>> {
        if self.fail_captures > 0 {
            self.fail_captures -= 1;
            return Err(CaptureFailure::new(reuse, "offscreen pass unavailable"));
        }

        // reused slots become a new capture with a fresh id
        if let Some(old) = reuse {
            self.live.remove(&old);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(id);
        self.calls.push(Call::Capture { id, size, reused: reuse });
        Ok(id)
    }

    fn release_frame(&mut self, handle: u64) {
        assert!(self.live.remove(&handle), "double release of {handle}");
        self.calls.push(Call::Release(handle));
    }

    fn draw_frame(&mut self, handle: &u64, params: &BlendParams) {
        assert!(self.live.contains(handle), "draw of released frame {handle}");
        self.calls.push(Call::Draw { id: *handle, params: *params });
    }

    fn skip_to_pass_through(&mut self) {
        self.calls.push(Call::PassThrough);
    }
}

impl TargetQuery for MockHost {
    fn target_size(&self) -> Option<FrameSize> {
        self.target
    }
}

impl SourceControl for MockHost {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
