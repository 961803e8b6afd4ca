//! Bounded framing buffer.
//!
//! [`StreamFramer`] owns a fixed-size byte buffer allocated once at
//! construction. Appending never allocates and never grows the buffer:
//! noise before a `$` is discarded, a sentence is accumulated until its
//! terminator, and a candidate that outgrows the buffer saturates it.
//!
//! The framer never recovers on its own. While [`FramingState::Ready`] or
//! [`FramingState::Saturated`], further bytes are refused and counted; the
//! caller drains a ready sentence with [`StreamFramer::take_sentence`] and
//! recovers from saturation with [`StreamFramer::reset`].

use core_types::{Sentence, SOM};

use crate::config::{ConfigError, FramerConfig, TerminatorMode, DEFAULT_CAPACITY};
use crate::state::FramingState;

/// Fixed-capacity `$`-to-terminator sentence buffer with an explicit [`FramingState`].
pub struct StreamFramer {
    buf: Box<[u8]>,
    len: usize,
    state: FramingState,
    terminator: TerminatorMode,
    discarded: u64,
    rejected: u64,
}

impl StreamFramer {
    /// Build a framer from a configuration. Only `capacity` and `terminator`
    /// matter here; the remaining fields drive [`SentenceFramer`](crate::SentenceFramer).
    pub fn new(config: &FramerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config.capacity, config.terminator))
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, ConfigError> {
        Self::new(&FramerConfig::default().with_capacity(capacity))
    }

    fn build(capacity: usize, terminator: TerminatorMode) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
            state: FramingState::Idle,
            terminator,
            discarded: 0,
            rejected: 0,
        }
    }

    /// Return to Idle. The buffer is kept; counters are not cleared.
    pub fn reset(&mut self) {
        self.len = 0;
        self.state = FramingState::Idle;
    }

    /// Feed one byte and return the resulting state.
    #[inline]
    pub fn append(&mut self, byte: u8) -> FramingState {
        match self.state {
            FramingState::Idle => {
                if byte == SOM {
                    self.buf[0] = byte;
                    self.len = 1;
                    self.state = if self.len == self.buf.len() {
                        FramingState::Saturated
                    } else {
                        FramingState::Accumulating
                    };
                } else {
                    self.discarded += 1;
                }
            }
            FramingState::Accumulating => {
                // len < capacity holds in Accumulating
                self.buf[self.len] = byte;
                self.len += 1;
                if self.completes_sentence(byte) {
                    self.state = FramingState::Ready;
                } else if self.len == self.buf.len() {
                    self.state = FramingState::Saturated;
                }
            }
            FramingState::Ready | FramingState::Saturated => {
                self.rejected += 1;
            }
        }
        self.state
    }

    /// Feed a chunk; identical to calling [`append`](Self::append) for each byte.
    pub fn append_slice(&mut self, bytes: &[u8]) -> FramingState {
        for &b in bytes {
            self.append(b);
        }
        self.state
    }

    /// Feed bytes until the framer becomes Ready or Saturated, or the input
    /// runs out. Returns how many bytes were consumed; the rest are untouched.
    pub fn fill(&mut self, bytes: &[u8]) -> usize {
        for (i, &b) in bytes.iter().enumerate() {
            if self.append(b).is_blocked() {
                return i + 1;
            }
        }
        bytes.len()
    }

    fn completes_sentence(&self, byte: u8) -> bool {
        if byte != b'\n' {
            return false;
        }
        match self.terminator {
            TerminatorMode::Lf => true,
            TerminatorMode::CrLf => self.len >= 2 && self.buf[self.len - 2] == b'\r',
        }
    }

    /// The completed sentence, while Ready.
    pub fn sentence(&self) -> Option<&[u8]> {
        match self.state {
            FramingState::Ready => Some(self.pending()),
            _ => None,
        }
    }

    /// Hand the completed sentence to the caller and return to Idle.
    /// Does nothing outside of Ready.
    pub fn take_sentence(&mut self) -> Option<Sentence> {
        let bytes = self.sentence()?.to_vec();
        self.reset();
        Some(Sentence::new(bytes, 0))
    }

    /// Bytes retained so far, whatever the state.
    pub fn pending(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn state(&self) -> FramingState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn available(&self) -> usize {
        self.buf.len() - self.len
    }

    /// Bytes dropped while Idle (noise before a `$`).
    pub fn discarded_bytes(&self) -> u64 {
        self.discarded
    }

    /// Bytes refused while Ready or Saturated.
    pub fn rejected_bytes(&self) -> u64 {
        self.rejected
    }
}

impl Default for StreamFramer {
    fn default() -> Self {
        Self::build(DEFAULT_CAPACITY, TerminatorMode::default())
    }
}

impl std::fmt::Debug for StreamFramer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamFramer")
            .field("state", &self.state)
            .field("len", &self.len)
            .field("capacity", &self.buf.len())
            .field("terminator", &self.terminator)
            .finish()
    }
}
