//! Channel-major ring storage
//!
//! One contiguous ring per channel, addressed in atomic units. A unit is a
//! single sample for flat buffers, or `unit_width` consecutive elements for
//! feature-vector buffers. Every copy is split into at most two linear runs
//! when it crosses the end of the ring.

use super::cursor::split_runs;
use crate::error::{FramingError, Result};

/// Per-channel ring storage
#[derive(Debug, Clone)]
pub struct ChannelStorage<T> {
    /// One ring per channel, `slots * unit_width` elements each
    channels: Vec<Vec<T>>,

    /// Ring length in units
    slots: usize,

    /// Elements per unit
    unit_width: usize,
}

impl<T: Copy + Default> ChannelStorage<T> {
    /// Allocate zeroed (default-valued) rings
    ///
    /// # Errors
    /// `InvalidConfiguration` if a ring of `slots * unit_width` elements
    /// cannot be addressed.
    pub fn new(num_channels: usize, slots: usize, unit_width: usize) -> Result<Self> {
        let ring_len = slots
            .checked_mul(unit_width)
            .filter(|&len| {
                len.checked_mul(std::mem::size_of::<T>())
                    .map_or(false, |bytes| bytes <= isize::MAX as usize)
            })
            .ok_or_else(|| {
                FramingError::config(format!(
                    "Ring of {} slots x {} elements per unit is too large.",
                    slots, unit_width
                ))
            })?;

        Ok(Self {
            channels: (0..num_channels).map(|_| vec![T::default(); ring_len]).collect(),
            slots,
            unit_width,
        })
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn unit_width(&self) -> usize {
        self.unit_width
    }

    /// Raw ring contents of one channel
    pub fn channel(&self, channel: usize) -> &[T] {
        &self.channels[channel]
    }

    /// Check that a block carries one entry per channel
    pub fn check_channel_count(&self, got: usize) -> Result<()> {
        if got != self.channels.len() {
            return Err(FramingError::shape(format!(
                "Input channel count ({}) does not match buffer channels ({}).",
                got,
                self.channels.len()
            )));
        }
        Ok(())
    }

    /// Check a `[channel][unit]` block of flat samples and return its length in units
    pub fn check_flat_block<S: AsRef<[T]>>(&self, block: &[S]) -> Result<usize> {
        self.check_channel_count(block.len())?;
        let len = block.first().map_or(0, |ch| ch.as_ref().len());
        for (c, ch) in block.iter().enumerate().skip(1) {
            if ch.as_ref().len() != len {
                return Err(FramingError::shape(format!(
                    "Input channels have inconsistent lengths (channel 0: {}, channel {}: {}).",
                    len,
                    c,
                    ch.as_ref().len()
                )));
            }
        }
        Ok(len)
    }

    /// Check that a single unit has the buffer's unit width
    pub fn check_unit(&self, unit: &[T], channel: usize, index: usize) -> Result<()> {
        if unit.len() != self.unit_width {
            return Err(FramingError::shape(format!(
                "Unit width mismatch at channel {}, index {}: expected {}, got {}.",
                channel,
                index,
                self.unit_width,
                unit.len()
            )));
        }
        Ok(())
    }

    /// Copy whole units from `src` into `channel`, starting at ring slot `slot`
    pub fn write_units(&mut self, channel: usize, slot: usize, src: &[T]) {
        let w = self.unit_width;
        debug_assert_eq!(src.len() % w, 0);
        let (head, tail) = split_runs(self.slots, slot, src.len() / w);
        let split = head.len() * w;

        let ring = &mut self.channels[channel];
        ring[head.start * w..head.end * w].copy_from_slice(&src[..split]);
        ring[tail.start * w..tail.end * w].copy_from_slice(&src[split..]);
    }

    /// Copy whole units out of `channel` into `dst`, starting at ring slot `slot`
    pub fn read_units(&self, channel: usize, slot: usize, dst: &mut [T]) {
        let w = self.unit_width;
        debug_assert_eq!(dst.len() % w, 0);
        let (head, tail) = split_runs(self.slots, slot, dst.len() / w);
        let split = head.len() * w;

        let ring = &self.channels[channel];
        dst[..split].copy_from_slice(&ring[head.start * w..head.end * w]);
        dst[split..].copy_from_slice(&ring[tail.start * w..tail.end * w]);
    }

    /// Mutable view of `units` units of `channel` starting at `slot`, as two runs
    pub fn runs_mut(&mut self, channel: usize, slot: usize, units: usize) -> (&mut [T], &mut [T]) {
        let w = self.unit_width;
        let (head, tail) = split_runs(self.slots, slot, units);
        let ring = &mut self.channels[channel];

        // The tail run always lies before the head run in memory.
        let (low, high) = ring.split_at_mut(head.start * w);
        (
            &mut high[..head.len() * w],
            &mut low[tail.start * w..tail.end * w],
        )
    }

    /// Set `units` units of every channel to `value`, starting at `slot`
    pub fn fill_units(&mut self, slot: usize, units: usize, value: T) {
        for channel in 0..self.channels.len() {
            let (head, tail) = self.runs_mut(channel, slot, units);
            head.fill(value);
            tail.fill(value);
        }
    }

    /// Set every element of every ring to `value`
    pub fn fill(&mut self, value: T) {
        for ring in self.channels.iter_mut() {
            ring.fill(value);
        }
    }
}
