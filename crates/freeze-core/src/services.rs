use crate::frame::{BlendParams, FrameSize};

/// A capture that did not produce a frame.
///
/// Hands the reused slot (if any) back so its ownership is never lost.
#[derive(Debug)]
pub struct CaptureFailure<H> {
    pub slot: Option<H>,
    pub reason: String,
}

impl<H> CaptureFailure<H> {
    pub fn new(slot: Option<H>, reason: impl Into<String>) -> Self {
        Self {
            slot,
            reason: reason.into(),
        }
    }
}

/// Graphics side of the filter (no implementation here).
///
/// Handles are opaque to the engine: it only decides when they are created,
/// kept, drawn and released.
pub trait FrameRenderer {
    type Handle;

    /// Render the live upstream source into an offscreen target of `size`.
    ///
    /// `reuse` is an evicted frame whose storage may be recycled.
    fn capture_frame(
        &mut self,
        size: FrameSize,
        reuse: Option<Self::Handle>,
    ) -> Result<Self::Handle, CaptureFailure<Self::Handle>>;

    fn release_frame(&mut self, handle: Self::Handle);

    fn draw_frame(&mut self, handle: &Self::Handle, params: &BlendParams);

    /// Render the live frame unmodified for this period.
    fn skip_to_pass_through(&mut self);
}

pub trait TargetQuery {
    /// `None` when the filter has no target yet.
    fn target_size(&self) -> Option<FrameSize>;
}

pub trait SourceControl {
    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
}

/// Everything the engine needs from its host during tick and render.
pub trait FilterHost: FrameRenderer + TargetQuery + SourceControl {}

impl<T: FrameRenderer + TargetQuery + SourceControl> FilterHost for T {}
