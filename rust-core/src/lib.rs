//! Frame Ring - Multi-Channel Framing and Overlap-Add Ring Buffers
//!
//! Turns irregular sample blocks into fixed-size, overlapping frames for
//! block-based DSP, and splices processed blocks back into a continuous
//! stream with crossfades. Optional Python bindings behind the `python` feature.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod error;
pub mod framing;
pub mod ola;
pub mod ring;

#[cfg(feature = "python")]
pub mod python_bindings;

pub use error::{FramingError, Result};
pub use framing::{FeatureRingBuffer, FramingConfig, FramingRingBuffer};
pub use ola::{CrossfadeCurve, OlaConfig, OlaRingBuffer, Sample, SpliceMode};
