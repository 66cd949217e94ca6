/// Geometry of the filter target, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Zero-area targets cannot be captured.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width != 0 && self.height != 0
    }
}

/// Soft-edged rectangular crop, each edge a fraction in [0, 1].
///
/// `1.0` on an edge means "no masking from that side".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskEdges {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl MaskEdges {
    pub const NONE: MaskEdges = MaskEdges {
        left: 1.0,
        right: 1.0,
        top: 1.0,
        bottom: 1.0,
    };
}

impl Default for MaskEdges {
    fn default() -> Self {
        Self::NONE
    }
}

/// Parameters for compositing a captured frame over the live output.
///
/// Passed to the renderer unmodified; the blend pass owns their interpretation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendParams {
    pub opacity: f32,
    pub mask: MaskEdges,
    pub feathering: f32,
}

impl Default for BlendParams {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            mask: MaskEdges::NONE,
            feathering: 0.0,
        }
    }
}
