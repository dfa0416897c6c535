//! Python bindings for the framing ring buffer

use numpy::{IntoPyArray, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::prelude::*;

use crate::framing::{FramingConfig, FramingRingBuffer};

/// Framing ring buffer over `(channels, samples)` float64 arrays
#[pyclass(name = "FramingRingBuffer")]
pub struct PyFramingRingBuffer {
    buffer: FramingRingBuffer<f64>,
}

#[pymethods]
impl PyFramingRingBuffer {
    /// Create a new framing buffer
    ///
    /// Args:
    ///     num_channels: Number of channels
    ///     capacity: Samples storable per channel
    ///     frame_size: Samples per frame
    ///     hop_size: Samples between frame starts
    ///     min_frames: Frames required before a read succeeds
    ///     keep_frames: Frames retained after each read
    #[new]
    #[pyo3(signature = (num_channels, capacity, frame_size, hop_size, min_frames=1, keep_frames=0))]
    fn new(
        num_channels: usize,
        capacity: usize,
        frame_size: usize,
        hop_size: usize,
        min_frames: usize,
        keep_frames: usize,
    ) -> PyResult<Self> {
        let config = FramingConfig::new(num_channels, capacity, frame_size, hop_size)
            .with_min_frames(min_frames)
            .with_keep_frames(keep_frames);

        Ok(Self {
            buffer: FramingRingBuffer::new(config)?,
        })
    }

    /// Write a `(channels, samples)` block
    ///
    /// Args:
    ///     data: Input block
    ///     offset: First sample of the block to write
    ///     count: Samples to write (0 = through the end of the block)
    ///
    /// Returns:
    ///     False if the samples do not fit
    #[pyo3(signature = (data, offset=0, count=0))]
    fn write(&mut self, data: PyReadonlyArray2<f64>, offset: usize, count: usize) -> PyResult<bool> {
        Ok(self.buffer.write_view(data.as_array(), offset, count)?)
    }

    /// Write one sample per channel
    fn push(&mut self, samples: PyReadonlyArray1<f64>) -> PyResult<bool> {
        let samples = samples.as_array().to_vec();
        Ok(self.buffer.push(&samples)?)
    }

    /// Read overlapping frames as one contiguous window
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

    /// Load filler so the next hop makes the buffer ready
    fn prime(&mut self, fill: f64) -> bool {
        self.buffer.prime(fill)
    }

    fn clear(&mut self) {
        self.buffer.clear();
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

    fn hop_size(&self) -> usize {
        self.buffer.hop_size()
    }

    fn min_frames(&self) -> usize {
        self.buffer.min_frames()
    }

    fn keep_frames(&self) -> usize {
        self.buffer.keep_frames()
    }
}
