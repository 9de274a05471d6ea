//! Fixed-capacity corner history, smoothing and the instability metric.

use fingerframe_core::{CanvasSize, Point, Quad};

/// Upper bound on the configurable history capacity.
pub const MAX_HISTORY: usize = 8;

/// Ring buffer of the most recent valid corner sets.
///
/// Storage is a fixed array; pushing past `capacity` overwrites the oldest
/// entry.
#[derive(Clone, Debug)]
pub struct CornerHistory {
    slots: [Quad; MAX_HISTORY],
    capacity: usize,
    /// Index of the oldest entry.
    head: usize,
    len: usize,
}

impl CornerHistory {
    /// `capacity` is clamped into `1..=MAX_HISTORY`.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: [Quad::new([Point::origin(); 4]); MAX_HISTORY],
            capacity: capacity.clamp(1, MAX_HISTORY),
            head: 0,
            len: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, quad: Quad) {
        if self.len < self.capacity {
            let idx = (self.head + self.len) % self.capacity;
            self.slots[idx] = quad;
            self.len += 1;
        } else {
            self.slots[self.head] = quad;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Quad> + '_ {
        (0..self.len).map(move |i| &self.slots[(self.head + i) % self.capacity])
    }

    /// Corner-wise mean of every retained entry.
    pub fn smoothed(&self) -> Option<Quad> {
        Quad::mean(self.iter())
    }

    /// Mean corner displacement, in `canvas` pixels, between the older
    /// window (all but the newest entry) and the newer window (all but the
    /// oldest entry).
    ///
    /// `None` until two entries are available.
    pub fn instability_px(&self, canvas: CanvasSize) -> Option<f32> {
        if self.len < 2 {
            return None;
        }
        let older = Quad::mean(self.iter().take(self.len - 1))?;
        let newer = Quad::mean(self.iter().skip(1))?;
        Some(older.mean_displacement_px(&newer, canvas))
    }
}
