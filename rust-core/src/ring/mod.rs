//! Ring index engine and channel-major storage shared by every buffer

pub mod cursor;
pub mod storage;

pub use cursor::{resolve_span, split_runs, ReadPlan, RingCursor};
pub use storage::ChannelStorage;
