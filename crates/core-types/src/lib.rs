use serde::{Deserialize, Serialize};

pub mod sentence;
pub use sentence::{ChecksumStatus, Sentence, SOM};

use std::borrow::Cow;

/// Lightweight value wrapper to avoid serde_json allocations for common types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
}

impl From<bool> for Value { fn from(v: bool) -> Self { Value::Bool(v) } }
impl From<u32> for Value { fn from(v: u32) -> Self { Value::I64(v as i64) } }
impl From<f64> for Value { fn from(v: f64) -> Self { Value::F64(v) } }
impl From<f32> for Value { fn from(v: f32) -> Self { Value::F64(v as f64) } }
impl From<String> for Value { fn from(v: String) -> Self { Value::String(v) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Value::String(v.to_string()) } }

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => f.write_str("-"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v:.6}"),
            Value::String(v) => f.write_str(v),
        }
    }
}

/// A semantic interpretation of a framed sentence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecodedEvent {
    /// Timestamp inherited from the sentence.
    pub timestamp_us: u64,
    /// Protocol name (e.g., "NMEA").
    pub protocol: Cow<'static, str>,
    /// Short human-readable summary (e.g., "GGA").
    pub summary: Cow<'static, str>,
    /// Structured key-value pairs, kept as a Vec since events carry only a few.
    pub fields: Vec<(Cow<'static, str>, Value)>,
}

impl DecodedEvent {
    pub fn new(timestamp_us: u64, protocol: &'static str, summary: impl Into<Cow<'static, str>>) -> Self {
        Self {
            timestamp_us,
            protocol: Cow::Borrowed(protocol),
            summary: summary.into(),
            fields: Vec::with_capacity(8),
        }
    }

    pub fn push_field<V: Into<Value>>(&mut self, key: &'static str, value: V) {
        self.fields.push((Cow::Borrowed(key), value.into()));
    }

    pub fn get_field(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Resets the event data without deallocating the fields vector.
    pub fn clear(&mut self) {
        self.timestamp_us = 0;
        self.protocol = Cow::Borrowed("");
        self.summary = Cow::Borrowed("");
        self.fields.clear();
    }
}

/// Trait for turning framed sentences into structured events.
pub trait Decoder: Send {
    /// Attempt to decode a sentence.
    /// Returns None if the sentence does not pass the protocol's validation.
    fn ingest(&mut self, sentence: &Sentence) -> Option<DecodedEvent>;

    /// Attempt to decode a sentence into an existing DecodedEvent buffer.
    /// Returns true if successful, false otherwise.
    ///
    /// Implementations should call `output.clear()` before populating.
    fn ingest_into(&mut self, sentence: &Sentence, output: &mut DecodedEvent) -> bool {
        if let Some(event) = self.ingest(sentence) {
            *output = event;
            true
        } else {
            false
        }
    }

    /// Short unique id of this decoder (e.g., "nmea").
    fn id(&self) -> &'static str;

    /// Human-readable name (e.g., "NMEA 0183").
    fn name(&self) -> &'static str;
}
