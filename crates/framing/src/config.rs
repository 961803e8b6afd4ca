//! Framer configuration.
//!
//! Every field has a protocol-conventional default, so a partial JSON
//! document (or none at all) yields a working configuration:
//!
//! ```
//! use framing::{FramerConfig, TerminatorMode};
//!
//! let config = FramerConfig::from_json(r#"{ "capacity": 96, "terminator": "lf" }"#).unwrap();
//! assert_eq!(config.capacity, 96);
//! assert_eq!(config.terminator, TerminatorMode::Lf);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default buffer capacity in bytes.
///
/// NMEA 0183 caps a sentence at 82 characters including CRLF; proprietary
/// sentences from some receivers run longer, so leave headroom.
pub const DEFAULT_CAPACITY: usize = 128;

/// Largest capacity accepted by [`FramerConfig::validate`].
pub const MAX_CAPACITY: usize = 65_535;

/// What completes a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminatorMode {
    /// LF immediately preceded by CR.
    #[default]
    CrLf,
    /// Any LF.
    Lf,
}

/// What the sentence framer does when the buffer saturates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Drop the oversized candidate and scan on for the next `$`.
    #[default]
    Resync,
    /// Stay saturated until the caller resets the framer.
    Hold,
}

/// Checksum screening applied to completed sentences before they are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecksumMode {
    /// Emit every sentence; the decoder owns checksum validation.
    #[default]
    Ignore,
    /// Drop sentences whose `*HH` suffix is present but wrong or malformed.
    VerifyIfPresent,
    /// Drop sentences without a valid `*HH` suffix.
    Required,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid framer capacity: 0 bytes cannot hold a sentence. Use at least 1 (default {}).", DEFAULT_CAPACITY)]
    ZeroCapacity,

    #[error("Invalid framer capacity: {capacity} bytes exceeds the maximum of {max}. Lower the capacity.")]
    CapacityTooLarge { capacity: usize, max: usize },

    #[error("Failed to parse framer configuration: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramerConfig {
    /// Maximum sentence length in bytes, SOM and terminator included.
    pub capacity: usize,
    pub terminator: TerminatorMode,
    pub overflow: OverflowPolicy,
    pub checksum: ChecksumMode,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            terminator: TerminatorMode::default(),
            overflow: OverflowPolicy::default(),
            checksum: ChecksumMode::default(),
        }
    }
}

impl FramerConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_terminator(mut self, terminator: TerminatorMode) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn with_checksum(mut self, checksum: ChecksumMode) -> Self {
        self.checksum = checksum;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.capacity > MAX_CAPACITY {
            return Err(ConfigError::CapacityTooLarge {
                capacity: self.capacity,
                max: MAX_CAPACITY,
            });
        }
        Ok(())
    }

    /// Parse a JSON document and validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FramerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
