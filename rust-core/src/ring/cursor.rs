//! Ring cursor model
//!
//! Pure index arithmetic shared by every buffer: write and read cursors, the
//! logical `available` count, and frame/hop accounting. No data moves here;
//! the storage adapter does the copying once a plan has been accepted.

use std::ops::Range;

use crate::error::{FramingError, Result};

/// Split `len` slots starting at `start` of a `slots`-long ring into two linear runs
///
/// The second run is empty unless the span crosses the end of the ring.
pub fn split_runs(slots: usize, start: usize, len: usize) -> (Range<usize>, Range<usize>) {
    debug_assert!(start < slots && len <= slots);
    let first = len.min(slots - start);
    (start..start + first, 0..len - first)
}

/// Resolve an `offset`/`count` sub-range of a `len`-unit source block
///
/// `count == 0` selects everything from `offset` to the end of the block.
pub fn resolve_span(len: usize, offset: usize, count: usize) -> Result<Range<usize>> {
    let out_of_range = || FramingError::Range { offset, count, len };
    if offset > len {
        return Err(out_of_range());
    }
    let count = if count == 0 { len - offset } else { count };
    let end = offset.checked_add(count).ok_or_else(out_of_range)?;
    if end > len {
        return Err(FramingError::Range { offset, count, len });
    }
    Ok(offset..end)
}

/// A read accepted by [`RingCursor::plan_read`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadPlan {
    /// Ring slot of the first unit in the window
    pub start: usize,

    /// Number of overlapping frames covered by the window
    pub frames: usize,

    /// Length of the contiguous window in units: `(frames - 1) * hop + frame`
    pub window_len: usize,

    /// Units released when the plan is committed
    pub consumed_units: usize,
}

/// Cursor state of a framing ring
#[derive(Debug, Clone)]
pub struct RingCursor {
    /// Maximum number of available units
    capacity: usize,

    /// Physical ring length (capacity plus reserved slots)
    slots: usize,

    frame_size: usize,
    hop_size: usize,
    min_frames: usize,
    keep_frames: usize,

    write_cursor: usize,
    read_cursor: usize,
    available: usize,
}

impl RingCursor {
    /// Create a cursor model whose ring is exactly `capacity` slots long
    pub fn new(
        capacity: usize,
        frame_size: usize,
        hop_size: usize,
        min_frames: usize,
        keep_frames: usize,
    ) -> Result<Self> {
        Self::with_reserve(capacity, frame_size, hop_size, min_frames, keep_frames, 0)
    }

    /// Create a cursor model with `reserve` extra ring slots
    ///
    /// Reserved slots are never reported as writable space. They hold data the
    /// writer has stored past the write cursor but not yet committed.
    pub fn with_reserve(
        capacity: usize,
        frame_size: usize,
        hop_size: usize,
        min_frames: usize,
        keep_frames: usize,
        reserve: usize,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(FramingError::config("Capacity must be non-zero."));
        }
        if frame_size == 0 {
            return Err(FramingError::config("Frame size must be non-zero."));
        }
        if frame_size > capacity {
            return Err(FramingError::config(format!(
                "Frame size ({}) cannot be larger than capacity ({}).",
                frame_size, capacity
            )));
        }
        if hop_size == 0 {
            return Err(FramingError::config("Hop size must be non-zero."));
        }
        if min_frames == 0 {
            return Err(FramingError::config("Minimum frame count must be at least 1."));
        }

        let slots = capacity
            .checked_add(reserve)
            .ok_or_else(|| FramingError::config("Capacity plus reserved slots overflows."))?;

        Ok(Self {
            capacity,
            slots,
            frame_size,
            hop_size,
            min_frames,
            keep_frames,
            write_cursor: 0,
            read_cursor: 0,
            available: 0,
        })
    }

    /// Number of whole frames that can currently be read
    pub fn available_frames(&self) -> usize {
        if self.available < self.frame_size {
            return 0;
        }
        1 + (self.available - self.frame_size) / self.hop_size
    }

    /// True once at least `min_frames` frames are readable
    pub fn ready(&self) -> bool {
        self.available_frames() >= self.min_frames
    }

    pub fn available_units(&self) -> usize {
        self.available
    }

    pub fn available_space(&self) -> usize {
        self.capacity - self.available
    }

    pub fn is_full(&self) -> bool {
        self.available_space() == 0
    }

    pub fn is_empty(&self) -> bool {
        self.available == 0
    }

    pub fn can_write(&self, units: usize) -> bool {
        units <= self.available_space()
    }

    /// Commit `units` already copied at the write cursor
    pub fn commit_write(&mut self, units: usize) {
        debug_assert!(self.can_write(units));
        self.write_cursor = self.slot_after(self.write_cursor, units);
        self.available += units;
    }

    /// Validate a read of `num_frames` frames (`0` = every available frame)
    ///
    /// Returns `None` when the ring is not primed to `min_frames`, when a
    /// strict request asks for more frames than are available, or when the
    /// hops to release are not all buffered yet (only possible if `hop > frame`).
    pub fn plan_read(&self, num_frames: usize) -> Option<ReadPlan> {
        let available_frames = self.available_frames();
        if available_frames < self.min_frames {
            return None;
        }
        if num_frames > 0 && available_frames < num_frames {
            return None;
        }

        let frames = if num_frames > 0 { num_frames } else { available_frames };
        let window_len = (frames - 1) * self.hop_size + self.frame_size;

        // A hop larger than the frame must be fully buffered before it is
        // released, or the next frame would start off the hop grid.
        let consumed_units = frames
            .saturating_sub(self.keep_frames)
            .saturating_mul(self.hop_size);
        if consumed_units > self.available {
            return None;
        }

        Some(ReadPlan {
            start: self.read_cursor,
            frames,
            window_len,
            consumed_units,
        })
    }

    /// Release the units of a plan produced by [`plan_read`](Self::plan_read)
    pub fn commit_read(&mut self, plan: &ReadPlan) {
        debug_assert!(plan.consumed_units <= self.available);
        self.read_cursor = self.slot_after(self.read_cursor, plan.consumed_units);
        self.available -= plan.consumed_units;
    }

    /// Filler units that make the ring ready after exactly one more hop
    pub fn prime_units(&self) -> usize {
        (self.min_frames - 1)
            .saturating_mul(self.hop_size)
            .saturating_add(self.frame_size)
            .saturating_sub(self.hop_size)
    }

    /// Reset both cursors and drop all available units
    pub fn clear(&mut self) {
        self.write_cursor = 0;
        self.read_cursor = 0;
        self.available = 0;
    }

    /// Ring slot `units` positions after `slot`
    pub fn slot_after(&self, slot: usize, units: usize) -> usize {
        let step = units % self.slots;
        if slot >= self.slots - step {
            slot - (self.slots - step)
        } else {
            slot + step
        }
    }

    /// Split a span of `len` slots starting at `start` into at most two linear runs
    pub fn runs(&self, start: usize, len: usize) -> (Range<usize>, Range<usize>) {
        split_runs(self.slots, start, len)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    pub fn min_frames(&self) -> usize {
        self.min_frames
    }

    pub fn keep_frames(&self) -> usize {
        self.keep_frames
    }

    pub fn write_cursor(&self) -> usize {
        self.write_cursor
    }

    pub fn read_cursor(&self) -> usize {
        self.read_cursor
    }
}
