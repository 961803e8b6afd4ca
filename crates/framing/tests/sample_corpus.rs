//! End-to-end framing tests over a recorded receiver session.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use core_types::{ChecksumStatus, SOM};
use framing::{Framer, FramerConfig, FramingState, SentenceFramer, StreamFramer};
use proptest::prelude::*;

const SAMPLE_DATA: [&str; 12] = [
    "$GPGGA,092750.000,5321.6802,N,00630.3372,W,1,8,1.03,61.7,M,55.2,M,,*76\r\n",
    "$GPGSA,A,3,10,07,05,02,29,04,08,13,,,,,1.72,1.03,1.38*0A\r\n",
    "$GPGSV,3,1,11,10,63,137,17,07,61,098,15,05,59,290,20,08,54,157,30*70\r\n",
    "$GPGSV,3,2,11,02,39,223,19,13,28,070,17,26,23,252,,04,14,186,14*79\r\n",
    "$GPGSV,3,3,11,29,09,301,24,16,09,020,,36,,,*76\r\n",
    "$GPRMC,092750.000,A,5321.6802,N,00630.3372,W,0.02,31.66,280511,,,A*43\r\n",
    "$GPGGA,092751.000,5321.6802,N,00630.3371,W,1,8,1.03,61.7,M,55.3,M,,*75\r\n",
    "$GPGSA,A,3,10,07,05,02,29,04,08,13,,,,,1.72,1.03,1.38*0A\r\n",
    "$GPGSV,3,1,11,10,63,137,17,07,61,098,15,05,59,290,20,08,54,157,30*70\r\n",
    "$GPGSV,3,2,11,02,39,223,16,13,28,070,17,26,23,252,,04,14,186,15*77\r\n",
    "$GPGSV,3,3,11,29,09,301,24,16,09,020,,36,,,*76\r\n",
    "$GPRMC,092751.000,A,5321.6802,N,00630.3371,W,0.06,31.66,280511,,,A*45\r\n",
];

fn session() -> Vec<u8> {
    SAMPLE_DATA.concat().into_bytes()
}

#[test]
fn test_unterminated_sentences_are_fully_retained() {
    let mut framer = StreamFramer::default();
    for nmea in SAMPLE_DATA {
        framer.reset();
        let stripped = &nmea.as_bytes()[..nmea.len() - 2];
        framer.append_slice(stripped);
        assert_eq!(framer.len(), stripped.len(), "{nmea}");
        assert_eq!(framer.state(), FramingState::Accumulating, "{nmea}");
    }
}

#[test]
fn test_terminated_sentences_become_ready() {
    let mut framer = StreamFramer::default();
    for nmea in SAMPLE_DATA {
        assert_eq!(framer.append_slice(nmea.as_bytes()), FramingState::Ready);
        let sentence = framer.take_sentence().unwrap();
        assert_eq!(sentence.as_str(), Some(nmea));
        assert_eq!(sentence.checksum_status(), ChecksumStatus::Valid);
    }
}

#[test]
fn test_whole_session_in_one_push() {
    let mut framer = SentenceFramer::default();
    let sentences = framer.push(&session(), 42);
    let texts: Vec<_> = sentences.iter().map(|s| s.as_str().unwrap()).collect();
    assert_eq!(texts, SAMPLE_DATA);
    assert!(sentences.iter().all(|s| s.timestamp_us == 42));
}

#[test]
fn test_session_behind_line_noise() {
    let mut framer = SentenceFramer::default();
    let mut input = b"\r\n5321.6802,N,0063*7".to_vec();
    input.extend_from_slice(&session());
    let sentences = framer.push(&input, 0);
    assert_eq!(sentences.len(), SAMPLE_DATA.len());
    assert_eq!(framer.stats().discarded_bytes, 20);
}

#[test]
fn test_small_capacity_skips_only_long_sentences() {
    let config = FramerConfig::default().with_capacity(64);
    let mut framer = SentenceFramer::new(config).unwrap();
    let sentences = framer.push(&session(), 0);

    let fitting: Vec<_> = SAMPLE_DATA.iter().filter(|s| s.len() <= 64).collect();
    assert_eq!(sentences.len(), fitting.len());
    assert_eq!(
        framer.stats().overflows,
        (SAMPLE_DATA.len() - fitting.len()) as u64
    );
}

proptest! {
    #[test]
    fn prop_chunking_does_not_change_output(chunk in 1usize..80) {
        let mut framer = SentenceFramer::default();
        let mut sentences = Vec::new();
        for (i, piece) in session().chunks(chunk).enumerate() {
            sentences.extend(framer.push(piece, i as u64));
        }
        let texts: Vec<_> = sentences.iter().map(|s| s.as_str().unwrap().to_string()).collect();
        prop_assert_eq!(texts, SAMPLE_DATA.to_vec());
    }

    #[test]
    fn prop_without_som_nothing_is_retained(bytes in proptest::collection::vec(any::<u8>().prop_filter("no SOM", |b| *b != SOM), 0..512)) {
        let mut framer = StreamFramer::default();
        framer.append_slice(&bytes);
        prop_assert_eq!(framer.len(), 0);
        prop_assert_eq!(framer.available(), framer.capacity());
    }

    #[test]
    fn prop_streaming_matches_batch(
        payload in proptest::collection::vec(any::<u8>().prop_filter("no LF", |b| *b != b'\n'), 0..127),
        split in any::<prop::sample::Index>(),
    ) {
        let mut input = vec![SOM];
        input.extend_from_slice(&payload);

        let mut batch = StreamFramer::default();
        batch.append_slice(&input);

        let mut bytewise = StreamFramer::default();
        for &b in &input {
            bytewise.append(b);
        }

        let at = split.index(input.len());
        let mut chunked = StreamFramer::default();
        chunked.append_slice(&input[..at]);
        chunked.append_slice(&input[at..]);

        prop_assert_eq!(batch.len(), input.len());
        prop_assert_eq!(bytewise.len(), input.len());
        prop_assert_eq!(chunked.len(), input.len());
        prop_assert_eq!(batch.pending(), bytewise.pending());
        prop_assert_eq!(batch.state(), chunked.state());
    }

    #[test]
    fn prop_reset_restores_capacity(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let mut framer = StreamFramer::default();
        framer.append_slice(&bytes);
        framer.reset();
        prop_assert_eq!(framer.len(), 0);
        prop_assert_eq!(framer.available(), framer.capacity());
        prop_assert_eq!(framer.state(), FramingState::Idle);
    }
}
