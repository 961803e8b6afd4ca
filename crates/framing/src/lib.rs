use core_types::Sentence;

pub mod config;
pub mod sentence;
pub mod state;
pub mod stream;

pub use config::{ChecksumMode, ConfigError, FramerConfig, OverflowPolicy, TerminatorMode};
pub use sentence::{FramerStats, SentenceFramer};
pub use state::FramingState;
pub use stream::StreamFramer;

/// Trait for converting a stream of bytes into discrete sentences.
pub trait Framer: Send {
    /// Ingest new bytes and return any complete sentences found.
    ///
    /// # Arguments
    /// * `bytes` - The new chunk of data read from transport.
    /// * `timestamp_us` - The timestamp associated with this chunk.
    fn push(&mut self, bytes: &[u8], timestamp_us: u64) -> Vec<Sentence>;

    /// Drop any partially accumulated sentence and return to scanning for `$`.
    fn reset(&mut self);

    /// Get the name of the framer.
    fn name(&self) -> &'static str;
}
