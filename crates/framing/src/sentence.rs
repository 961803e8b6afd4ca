use core_types::{ChecksumStatus, Sentence};
use serde::{Deserialize, Serialize};

use crate::config::{ChecksumMode, ConfigError, FramerConfig, OverflowPolicy};
use crate::state::FramingState;
use crate::stream::StreamFramer;
use crate::Framer;

/// Running totals kept by a [`SentenceFramer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramerStats {
    /// Sentences emitted.
    pub sentences: u64,
    /// Candidates dropped because they outgrew the buffer.
    pub overflows: u64,
    /// Bytes dropped while scanning for `$`.
    pub discarded_bytes: u64,
    /// Bytes refused while the framer was held saturated.
    pub rejected_bytes: u64,
    /// Completed sentences dropped by checksum screening.
    pub checksum_rejections: u64,
}

/// Drives a [`StreamFramer`] over transport chunks.
///
/// Completed sentences are drained as soon as they are ready and stamped with
/// the timestamp of the chunk in which their `$` arrived. Saturation is
/// handled according to the configured [`OverflowPolicy`].
pub struct SentenceFramer {
    framer: StreamFramer,
    overflow: OverflowPolicy,
    checksum: ChecksumMode,
    // Timestamp of the chunk that carried the SOM of the sentence in progress.
    start_timestamp_us: Option<u64>,
    overflows: u64,
    sentences: u64,
    checksum_rejections: u64,
}

impl SentenceFramer {
    pub fn new(config: FramerConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            framer: StreamFramer::new(&config)?,
            overflow: config.overflow,
            checksum: config.checksum,
            start_timestamp_us: None,
            overflows: 0,
            sentences: 0,
            checksum_rejections: 0,
        })
    }

    pub fn state(&self) -> FramingState {
        self.framer.state()
    }

    pub fn inner(&self) -> &StreamFramer {
        &self.framer
    }

    pub fn stats(&self) -> FramerStats {
        FramerStats {
            sentences: self.sentences,
            overflows: self.overflows,
            discarded_bytes: self.framer.discarded_bytes(),
            rejected_bytes: self.framer.rejected_bytes(),
            checksum_rejections: self.checksum_rejections,
        }
    }

    /// Like [`Framer::push`], but appends to `out` and stops as soon as the
    /// framer is held saturated. Returns how many bytes were consumed; under
    /// [`OverflowPolicy::Resync`] that is always all of them.
    ///
    /// Callers running with [`OverflowPolicy::Hold`] inspect the candidate,
    /// call [`Framer::reset`] and push the remaining bytes again.
    pub fn push_into(&mut self, bytes: &[u8], timestamp_us: u64, out: &mut Vec<Sentence>) -> usize {
        let mut rest = bytes;

        while !rest.is_empty() {
            if self.framer.state() == FramingState::Saturated {
                break;
            }

            let armed = self.framer.state() != FramingState::Idle;
            let consumed = self.framer.fill(rest);
            rest = &rest[consumed..];

            if !armed && self.framer.state() != FramingState::Idle {
                self.start_timestamp_us = Some(timestamp_us);
            }

            match self.framer.state() {
                FramingState::Ready => {
                    let ts = self.start_timestamp_us.take().unwrap_or(timestamp_us);
                    let Some(mut sentence) = self.framer.take_sentence() else {
                        continue;
                    };
                    sentence.timestamp_us = ts;
                    if self.accepts(&sentence) {
                        log::trace!("Framed {} byte sentence", sentence.len());
                        self.sentences += 1;
                        out.push(sentence);
                    } else {
                        self.checksum_rejections += 1;
                    }
                }
                FramingState::Saturated => {
                    self.overflows += 1;
                    log::warn!(
                        "Sentence exceeded {} bytes without a terminator ({:?})",
                        self.framer.capacity(),
                        self.overflow
                    );
                    if self.overflow == OverflowPolicy::Resync {
                        self.framer.reset();
                        self.start_timestamp_us = None;
                    }
                }
                FramingState::Idle | FramingState::Accumulating => {}
            }
        }

        bytes.len() - rest.len()
    }

    fn accepts(&self, sentence: &Sentence) -> bool {
        match (self.checksum, sentence.checksum_status()) {
            (ChecksumMode::Ignore, _) => true,
            (_, ChecksumStatus::Valid) => true,
            (ChecksumMode::VerifyIfPresent, ChecksumStatus::Absent) => true,
            (_, status) => {
                log::debug!(
                    "Dropping sentence with checksum {:?}: {}",
                    status,
                    String::from_utf8_lossy(sentence.body())
                );
                false
            }
        }
    }
}

impl Default for SentenceFramer {
    fn default() -> Self {
        Self {
            framer: StreamFramer::default(),
            overflow: OverflowPolicy::default(),
            checksum: ChecksumMode::default(),
            start_timestamp_us: None,
            overflows: 0,
            sentences: 0,
            checksum_rejections: 0,
        }
    }
}

impl Framer for SentenceFramer {
    fn push(&mut self, bytes: &[u8], timestamp_us: u64) -> Vec<Sentence> {
        let mut sentences = Vec::new();
        let consumed = self.push_into(bytes, timestamp_us, &mut sentences);
        // Held by OverflowPolicy::Hold; count what we refuse.
        self.framer.append_slice(&bytes[consumed..]);
        sentences
    }

    fn reset(&mut self) {
        self.framer.reset();
        self.start_timestamp_us = None;
    }

    fn name(&self) -> &'static str {
        "NMEA 0183"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerminatorMode;

    const GGA: &[u8] = b"$GPGGA,092750.000,5321.6802,N,00630.3372,W,1,8,1.03,61.7,M,55.2,M,,*76\r\n";
    const RMC: &[u8] = b"$GPRMC,092750.000,A,5321.6802,N,00630.3372,W,0.02,31.66,280511,,,A*43\r\n";

    #[test]
    fn test_single_chunk_two_sentences() {
        let mut framer = SentenceFramer::default();
        let input = [GGA, RMC].concat();
        let sentences = framer.push(&input, 100);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].bytes, GGA);
        assert_eq!(sentences[1].bytes, RMC);
        assert_eq!(sentences[1].timestamp_us, 100);
        assert_eq!(framer.stats().sentences, 2);
    }

    #[test]
    fn test_split_keeps_start_timestamp() {
        let mut framer = SentenceFramer::default();
        let f1 = framer.push(&GGA[..20], 100);
        assert!(f1.is_empty());

        let f2 = framer.push(&GGA[20..], 200);
        assert_eq!(f2.len(), 1);
        assert_eq!(f2[0].bytes, GGA);
        assert_eq!(f2[0].timestamp_us, 100);
    }

    #[test]
    fn test_sentence_starting_mid_chunk_gets_that_chunk_timestamp() {
        let mut framer = SentenceFramer::default();
        let mut first = GGA.to_vec();
        first.extend_from_slice(&RMC[..10]);

        let f1 = framer.push(&first, 100);
        assert_eq!(f1.len(), 1);
        let f2 = framer.push(&RMC[10..], 200);
        assert_eq!(f2[0].bytes, RMC);
        assert_eq!(f2[0].timestamp_us, 100);
    }

    #[test]
    fn test_noise_between_sentences() {
        let mut framer = SentenceFramer::default();
        let input = [&b"\x00\xffjunk"[..], GGA, b"\r\n\r\n", RMC].concat();
        let sentences = framer.push(&input, 1);
        assert_eq!(sentences.len(), 2);
        assert_eq!(framer.stats().discarded_bytes, 10);
    }

    #[test]
    fn test_overflow_resyncs_on_next_som() {
        let config = FramerConfig::default().with_capacity(16);
        let mut framer = SentenceFramer::new(config).unwrap();
        let input = [&b"$THIS,IS,FAR,TOO,LONG,FOR,THE,BUFFER"[..], b"$GPTXT,1\r\n"].concat();

        let sentences = framer.push(&input, 5);
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].bytes, b"$GPTXT,1\r\n");
        assert_eq!(framer.stats().overflows, 1);
        assert_eq!(framer.state(), FramingState::Idle);
    }

    #[test]
    fn test_overflow_hold_waits_for_reset() {
        let config = FramerConfig::default()
            .with_capacity(8)
            .with_overflow(OverflowPolicy::Hold);
        let mut framer = SentenceFramer::new(config).unwrap();

        let sentences = framer.push(b"$TOOLONGSENTENCE\r\n$A\r\n", 0);
        assert!(sentences.is_empty());
        assert_eq!(framer.state(), FramingState::Saturated);
        assert_eq!(framer.stats().overflows, 1);
        assert_eq!(framer.stats().rejected_bytes, 14);

        assert!(framer.push(b"$A\r\n", 1).is_empty());
        assert_eq!(framer.stats().overflows, 1);

        framer.reset();
        let sentences = framer.push(b"$A\r\n", 2);
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].timestamp_us, 2);
    }

    #[test]
    fn test_push_into_stops_at_held_overflow() {
        let config = FramerConfig::default()
            .with_capacity(8)
            .with_overflow(OverflowPolicy::Hold);
        let mut framer = SentenceFramer::new(config).unwrap();
        let input = b"$TOOLONGSENTENCE\r\n$A\r\n";
        let mut sentences = Vec::new();

        let consumed = framer.push_into(input, 0, &mut sentences);
        assert_eq!(consumed, 8);
        assert_eq!(framer.inner().pending(), b"$TOOLONG");
        assert_eq!(framer.push_into(&input[consumed..], 0, &mut sentences), 0);

        framer.reset();
        let rest = &input[consumed..];
        assert_eq!(framer.push_into(rest, 1, &mut sentences), rest.len());
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].bytes, b"$A\r\n");
        assert_eq!(framer.stats().rejected_bytes, 0);
        assert_eq!(framer.stats().discarded_bytes, 10);
    }

    #[test]
    fn test_push_into_consumes_everything_under_resync() {
        let mut framer = SentenceFramer::new(FramerConfig::default().with_capacity(8)).unwrap();
        let input = b"$TOOLONGSENTENCE\r\n$A\r\n";
        let mut sentences = Vec::new();
        assert_eq!(framer.push_into(input, 0, &mut sentences), input.len());
        assert_eq!(sentences.len(), 1);
    }

    #[test]
    fn test_checksum_verify_if_present() {
        let config = FramerConfig::default().with_checksum(ChecksumMode::VerifyIfPresent);
        let mut framer = SentenceFramer::new(config).unwrap();
        let input = [GGA, b"$GPGGA,BadChecksum*FF\r\n", b"$GPTXT,plain\r\n"].concat();

        let sentences = framer.push(&input, 0);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[1].bytes, b"$GPTXT,plain\r\n");
        assert_eq!(framer.stats().checksum_rejections, 1);
    }

    #[test]
    fn test_checksum_required() {
        let config = FramerConfig::default().with_checksum(ChecksumMode::Required);
        let mut framer = SentenceFramer::new(config).unwrap();
        let input = [GGA, b"$GPTXT,plain\r\n"].concat();

        let sentences = framer.push(&input, 0);
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].bytes, GGA);
        assert_eq!(framer.stats().checksum_rejections, 1);
    }

    #[test]
    fn test_lf_terminator() {
        let config = FramerConfig::default().with_terminator(TerminatorMode::Lf);
        let mut framer = SentenceFramer::new(config).unwrap();
        let sentences = framer.push(b"$A,1\n$B,2\n", 0);
        assert_eq!(sentences.len(), 2);
    }

    #[test]
    fn test_reset_drops_partial() {
        let mut framer = SentenceFramer::default();
        framer.push(b"$GPGGA,0927", 100);
        framer.reset();
        let sentences = framer.push(b"50.000\r\n$GPTXT,1\r\n", 200);
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].bytes, b"$GPTXT,1\r\n");
        assert_eq!(sentences[0].timestamp_us, 200);
    }
}
