use std::collections::VecDeque;

use log::{debug, trace};

use crate::error::{FreezeError, FreezeResult};
use crate::frame::FrameSize;

/// Capacity-bounded FIFO of captured frames, oldest first.
///
/// The buffer owns its handles between capture and eviction. Releasing a
/// handle is delegated to the caller through a `release` callback, so the
/// eviction policy stays independent of how resources are freed.
pub struct FrameRingBuffer<H> {
    frames: VecDeque<H>,
    capacity: usize,
    geometry: Option<FrameSize>,
}

impl<H> FrameRingBuffer<H> {
    /// Capacity below 1 is coerced to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
            geometry: None,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.frames.len() >= self.capacity
    }

    /// Geometry every held frame was captured at.
    #[inline]
    pub fn geometry(&self) -> Option<FrameSize> {
        self.geometry
    }

    /// Shrinking evicts from the front until the new capacity holds.
    pub fn set_capacity(&mut self, capacity: usize, release: impl FnMut(H)) {
        self.capacity = capacity.max(1);
        self.evict_overflow(release);
    }

    /// Append a freshly captured frame, evicting the oldest past capacity.
    pub fn capture(&mut self, handle: H, release: impl FnMut(H)) {
        self.frames.push_back(handle);
        self.evict_overflow(release);
    }

    /// Pop the oldest frame for reuse, only when the buffer is full.
    pub fn take_recyclable(&mut self) -> Option<H> {
        if self.is_full() {
            self.frames.pop_front()
        } else {
            None
        }
    }

    /// Give back a slot taken with [`take_recyclable`](Self::take_recyclable)
    /// that was not used.
    pub fn restore_front(&mut self, handle: H) {
        self.frames.push_front(handle);
    }

    /// Drop everything if the target geometry changed.
    ///
    /// Returns `true` when a reset happened.
    pub fn invalidate(&mut self, size: FrameSize, release: impl FnMut(H)) -> bool {
        if self.geometry == Some(size) {
            return false;
        }

        debug!(
            target: "freeze",
            "ring.invalidate from={:?} to={}x{} released={}",
            self.geometry,
            size.width,
            size.height,
            self.frames.len()
        );

        self.geometry = Some(size);
        self.release_all(release);
        true
    }

    /// Frame at logical position `index`, 0 being the oldest.
    pub fn get(&self, index: usize) -> FreezeResult<&H> {
        self.frames.get(index).ok_or(FreezeError::IndexOutOfRange {
            index,
            len: self.frames.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &H> {
        self.frames.iter()
    }

    /// Release every held frame. Geometry is forgotten as well.
    pub fn teardown(&mut self, release: impl FnMut(H)) {
        self.release_all(release);
        self.geometry = None;
    }

    fn release_all(&mut self, release: impl FnMut(H)) {
        self.frames.drain(..).for_each(release);
    }

    fn evict_overflow(&mut self, mut release: impl FnMut(H)) {
        while self.frames.len() > self.capacity {
            if let Some(old) = self.frames.pop_front() {
                trace!(target: "freeze", "ring.evict len={}", self.frames.len());
                release(old);
            }
        }
    }
}

impl<H> Default for FrameRingBuffer<H> {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(buf: &FrameRingBuffer<u32>) -> Vec<u32> {
        buf.iter().copied().collect()
    }

    #[test]
    fn keeps_most_recent_captures() {
        let mut released = Vec::new();
        let mut buf = FrameRingBuffer::new(3);

        for id in 1..=5 {
            buf.capture(id, |h| released.push(h));
        }

        assert_eq!(collect(&buf), vec![3, 4, 5]);
        assert_eq!(released, vec![1, 2]);
    }

    #[test]
    fn zero_capacity_is_one() {
        let buf: FrameRingBuffer<u32> = FrameRingBuffer::new(0);
        assert_eq!(buf.capacity(), 1);
    }

    #[test]
    fn invalidate_on_new_geometry_releases_everything() {
        let mut released = Vec::new();
        let mut buf = FrameRingBuffer::new(4);
        assert!(buf.invalidate(FrameSize::new(640, 480), |h| released.push(h)));

        buf.capture(1, |h| released.push(h));
        buf.capture(2, |h| released.push(h));

        assert!(!buf.invalidate(FrameSize::new(640, 480), |h| released.push(h)));
        assert_eq!(buf.len(), 2);

        assert!(buf.invalidate(FrameSize::new(1280, 720), |h| released.push(h)));
        assert!(buf.is_empty());
        assert_eq!(released, vec![1, 2]);

        buf.capture(3, |h| released.push(h));
        assert_eq!(collect(&buf), vec![3]);
        assert_eq!(buf.geometry(), Some(FrameSize::new(1280, 720)));
    }

    #[test]
    fn get_past_end_is_an_error() {
        let mut buf = FrameRingBuffer::new(2);
        buf.capture(7u32, |_| {});

        assert_eq!(*buf.get(0).unwrap(), 7);
        match buf.get(1) {
            Err(FreezeError::IndexOutOfRange { index: 1, len: 1 }) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn shrinking_capacity_evicts_oldest() {
        let mut released = Vec::new();
        let mut buf = FrameRingBuffer::new(4);
        for id in 0..4 {
            buf.capture(id, |_| {});
        }

        buf.set_capacity(2, |h| released.push(h));
        assert_eq!(collect(&buf), vec![2, 3]);
        assert_eq!(released, vec![0, 1]);
    }

    #[test]
    fn recyclable_only_when_full() {
        let mut buf = FrameRingBuffer::new(2);
        buf.capture(1u32, |_| {});
        assert_eq!(buf.take_recyclable(), None);

        buf.capture(2, |_| {});
        let slot = buf.take_recyclable();
        assert_eq!(slot, Some(1));
        assert_eq!(buf.len(), 1);

        buf.restore_front(1);
        assert_eq!(collect(&buf), vec![1, 2]);
    }

    #[test]
    fn teardown_releases_all() {
        let mut released = Vec::new();
        let mut buf = FrameRingBuffer::new(3);
        buf.invalidate(FrameSize::new(8, 8), |_| {});
        buf.capture(1u32, |_| {});
        buf.capture(2, |_| {});

        buf.teardown(|h| released.push(h));
        assert!(buf.is_empty());
        assert_eq!(buf.geometry(), None);
        assert_eq!(released, vec![1, 2]);
    }
}
