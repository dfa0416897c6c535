//! Overlap-add splice buffer: crossfaded writes, contiguous frame reads

pub mod config;
pub mod crossfade;
pub mod splice_buffer;

pub use config::{OlaConfig, SpliceMode};
pub use crossfade::{generate_crossfade, CrossfadeCurve, Sample};
pub use splice_buffer::OlaRingBuffer;
