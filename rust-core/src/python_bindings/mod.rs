//! PyO3 bindings for Python integration

use pyo3::exceptions::{PyIndexError, PyValueError};
use pyo3::prelude::*;

use crate::error::FramingError;

mod framing_bindings;
mod ola_bindings;

impl From<FramingError> for PyErr {
    fn from(err: FramingError) -> Self {
        match err {
            FramingError::Range { .. } => PyIndexError::new_err(err.to_string()),
            FramingError::InvalidConfiguration(_) | FramingError::ShapeMismatch(_) => {
                PyValueError::new_err(err.to_string())
            }
        }
    }
}

/// Python module definition
#[pymodule]
fn frame_ring(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<framing_bindings::PyFramingRingBuffer>()?;
    m.add_class::<ola_bindings::PyOlaRingBuffer>()?;
    m.add_class::<ola_bindings::PyCrossfadeCurve>()?;

    Ok(())
}
