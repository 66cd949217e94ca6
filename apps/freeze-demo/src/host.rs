use std::collections::HashSet;

use freeze_core::{BlendParams, CaptureFailure, FrameRenderer, FrameSize, SourceControl, TargetQuery};
use log::{debug, trace};

/// Stand-in for an offscreen render target.
#[derive(Debug)]
pub struct VirtualFrame {
    pub id: u64,
    pub size: FrameSize,
    /// Host frame index the content was rendered at.
    pub rendered_at: u64,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HostStats {
    pub allocated: u64,
    pub recycled: u64,
    pub released: u64,
    pub frozen_draws: u64,
    pub pass_through: u64,
}

/// Headless host: a source that is either frozen or live, and a target of some size.
pub struct VirtualHost {
    pub enabled: bool,
    pub target: Option<FrameSize>,
    pub frame_index: u64,
    pub stats: HostStats,

    live: HashSet<u64>,
    next_id: u64,
}

impl VirtualHost {
    pub fn new(target: FrameSize) -> Self {
        Self {
            enabled: false,
            target: Some(target),
            frame_index: 0,
            stats: HostStats::default(),
            live: HashSet::new(),
            next_id: 1,
        }
    }

    #[inline]
    pub fn live_frames(&self) -> usize {
        self.live.len()
    }
}

impl FrameRenderer for VirtualHost {
    type Handle = VirtualFrame;

    fn capture_frame(
        &mut self,
        size: FrameSize,
        reuse: Option<VirtualFrame>,
    ) -> Result<VirtualFrame, CaptureFailure<VirtualFrame>> {
        let frame = match reuse {
            Some(mut frame) if frame.size == size => {
                self.stats.recycled += 1;
                frame.rendered_at = self.frame_index;
                frame
            }
            Some(frame) => {
                return Err(CaptureFailure::new(
                    Some(frame),
                    format!("recycled target has the wrong size {}x{}", size.width, size.height),
                ))
            }
            None => {
                let id = self.next_id;
                self.next_id += 1;
                self.live.insert(id);
                self.stats.allocated += 1;
                VirtualFrame {
                    id,
                    size,
                    rendered_at: self.frame_index,
                }
            }
        };

        trace!(target: "demo", "host.capture id={} at={}", frame.id, frame.rendered_at);
        Ok(frame)
    }

    fn release_frame(&mut self, handle: VirtualFrame) {
        debug!(target: "demo", "host.release id={}", handle.id);
        self.live.remove(&handle.id);
        self.stats.released += 1;
    }

    fn draw_frame(&mut self, handle: &VirtualFrame, params: &BlendParams) {
        self.stats.frozen_draws += 1;
        trace!(
            target: "demo",
            "host.draw id={} from={} opacity={:.2} feathering={:.3}",
            handle.id,
            handle.rendered_at,
            params.opacity,
            params.feathering
        );
    }

    fn skip_to_pass_through(&mut self) {
        self.stats.pass_through += 1;
    }
}

impl TargetQuery for VirtualHost {
    fn target_size(&self) -> Option<FrameSize> {
        self.target
    }
}

impl SourceControl for VirtualHost {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
