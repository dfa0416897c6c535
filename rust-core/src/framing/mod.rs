//! Framing ring buffers: irregular blocks in, overlapping fixed-size frames out

pub mod config;
pub mod sample_buffer;
pub mod feature_buffer;

pub use config::FramingConfig;
pub use sample_buffer::FramingRingBuffer;
pub use feature_buffer::FeatureRingBuffer;
