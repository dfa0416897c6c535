//! Python bindings for the overlap-add splice buffer

use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray2};
use pyo3::prelude::*;

use crate::ola::{CrossfadeCurve, OlaConfig, OlaRingBuffer, SpliceMode};

/// Crossfade curve enum exposed to Python
#[pyclass(name = "CrossfadeCurve")]
#[derive(Clone)]
pub enum PyCrossfadeCurve {
    EnergyPreserving,
    EqualPowerSine,
    Linear,
}

impl From<PyCrossfadeCurve> for CrossfadeCurve {
    fn from(py_curve: PyCrossfadeCurve) -> Self {
        match py_curve {
            PyCrossfadeCurve::EnergyPreserving => CrossfadeCurve::EnergyPreserving,
            PyCrossfadeCurve::EqualPowerSine => CrossfadeCurve::EqualPowerSine,
            PyCrossfadeCurve::Linear => CrossfadeCurve::Linear,
        }
    }
}

/// Overlap-add splice buffer over `(channels, samples)` float64 arrays
#[pyclass(name = "OlaRingBuffer")]
pub struct PyOlaRingBuffer {
    buffer: OlaRingBuffer<f64>,
}

#[pymethods]
impl PyOlaRingBuffer {
    /// Create a new splice buffer
    ///
    /// Args:
    ///     num_channels: Number of channels
    ///     capacity: Resolved samples storable per channel
    ///     frame_size: Samples per output frame
    ///     overlap_size: Crossfade width in samples
    ///     min_frames: Frames required before a read succeeds
    ///     keep_frames: Frames retained after each read
    ///     relaxed: Accept blocks of only `overlap_size` samples
    ///     curve: Crossfade curve
    #[new]
    #[pyo3(signature = (
        num_channels,
        capacity,
        frame_size,
        overlap_size,
        min_frames=1,
        keep_frames=0,
        relaxed=false,
        curve=PyCrossfadeCurve::EnergyPreserving
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        num_channels: usize,
        capacity: usize,
        frame_size: usize,
        overlap_size: usize,
        min_frames: usize,
        keep_frames: usize,
        relaxed: bool,
        curve: PyCrossfadeCurve,
    ) -> PyResult<Self> {
        let splice_mode = if relaxed {
            SpliceMode::Relaxed
        } else {
            SpliceMode::Strict
        };
        let config = OlaConfig::new(num_channels, capacity, frame_size, overlap_size)
            .with_min_frames(min_frames)
            .with_keep_frames(keep_frames)
            .with_splice_mode(splice_mode)
            .with_curve(curve.into());

        Ok(Self {
            buffer: OlaRingBuffer::new(config)?,
        })
    }

    /// Splice a `(channels, samples)` block onto the buffer
    ///
    /// Returns:
    ///     False if the block is too short or its net advance does not fit
    fn write(&mut self, data: PyReadonlyArray2<f64>) -> PyResult<bool> {
        let rows: Vec<Vec<f64>> = data.as_array().outer_iter().map(|row| row.to_vec()).collect();
        Ok(self.buffer.write(&rows)?)
    }

    /// Read contiguous frames
    ///
    /// Args:
    ///     num_frames: Frames to read (0 = every available frame)
    ///
    /// Returns:
    ///     `(channels, samples)` array, or None if not enough frames are available
    #[pyo3(signature = (num_frames=1))]
    fn read<'py>(&mut self, py: Python<'py>, num_frames: usize) -> Option<&'py PyArray2<f64>> {
        self.buffer
            .read_array(num_frames)
            .map(|window| window.into_pyarray(py))
    }

    /// Silence the pending tail so the next write fades in from zero
    fn prime_with_silence(&mut self) {
        self.buffer.prime_with_silence();
    }

    /// Load filler samples, then silence the pending tail
    fn prime(&mut self, fill: f64) -> bool {
        self.buffer.prime(fill)
    }

    fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Get the fade-in gain table
    fn crossfade_table<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_slice(py, self.buffer.crossfade_table())
    }

    fn available_frames(&self) -> usize {
        self.buffer.available_frames()
    }

    fn available_samples(&self) -> usize {
        self.buffer.available_units()
    }

    fn available_space(&self) -> usize {
        self.buffer.available_space()
    }

    fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    fn is_full(&self) -> bool {
        self.buffer.is_full()
    }

    fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn ready(&self) -> bool {
        self.buffer.ready()
    }

    fn num_channels(&self) -> usize {
        self.buffer.num_channels()
    }

    fn frame_size(&self) -> usize {
        self.buffer.frame_size()
    }

    fn overlap_size(&self) -> usize {
        self.buffer.overlap_size()
    }

    fn min_frames(&self) -> usize {
        self.buffer.min_frames()
    }

    fn keep_frames(&self) -> usize {
        self.buffer.keep_frames()
    }
}
