//! Entry point for `nmea-stream`.
//!
//! Reads a receiver capture (file or stdin) as if it were the serial
//! transport, frames it into sentences and optionally decodes them. All
//! protocol work lives in the library crates; `main.rs` owns only process
//! setup (logging, argument parsing, I/O).

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use core_types::{DecodedEvent, Decoder};
use dec_nmea::NmeaDecoder;
use framing::{Framer, FramerConfig, FramerStats, FramingState, SentenceFramer};

const SAMPLE_SESSION: &[u8] = b"$GPGGA,092750.000,5321.6802,N,00630.3372,W,1,8,1.03,61.7,M,55.2,M,,*76\r\n\
$GPGSA,A,3,10,07,05,02,29,04,08,13,,,,,1.72,1.03,1.38*0A\r\n\
$GPGSV,3,1,11,10,63,137,17,07,61,098,15,05,59,290,20,08,54,157,30*70\r\n\
$GPRMC,092750.000,A,5321.6802,N,00630.3372,W,0.02,31.66,280511,,,A*43\r\n";

/// Frame (and decode) NMEA 0183 sentences from a raw receiver byte stream.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Frame a capture and print one sentence per line.
    Frame {
        /// Capture file to read; stdin when omitted.
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// JSON framer configuration.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the framer capacity in bytes.
        #[arg(long)]
        capacity: Option<usize>,
        /// Read size, mimicking transport chunking.
        #[arg(long, default_value_t = 64)]
        chunk: usize,
        /// Decode sentences and print positions.
        #[arg(short, long)]
        decode: bool,
    },
    /// Measure framing throughput on a built-in sample session.
    Bench {
        #[arg(short = 'n', long, default_value_t = 1_000_000)]
        iterations: u64,
    },
}

fn main() -> Result<()> {
    // Initialise env_logger; set RUST_LOG to control verbosity.
    env_logger::init();

    match Cli::parse().mode {
        Mode::Frame {
            input,
            config,
            capacity,
            chunk,
            decode,
        } => {
            let config = load_config(config.as_ref(), capacity)?;
            let reader: Box<dyn Read> = match &input {
                Some(path) => Box::new(
                    File::open(path)
                        .with_context(|| format!("Failed to open capture {}", path.display()))?,
                ),
                None => Box::new(io::stdin().lock()),
            };
            let out = BufWriter::new(io::stdout().lock());
            frame(reader, out, config, chunk.max(1), decode)?;
            Ok(())
        }
        Mode::Bench { iterations } => bench(iterations),
    }
}

fn load_config(path: Option<&PathBuf>, capacity: Option<usize>) -> Result<FramerConfig> {
    let mut config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            FramerConfig::from_json(&json)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => FramerConfig::default(),
    };
    if let Some(capacity) = capacity {
        config.capacity = capacity;
    }
    config.validate()?;
    log::debug!("Framer config: {config:?}");
    Ok(config)
}

/// Frame everything `reader` yields into `out`. Under `OverflowPolicy::Hold`
/// this is the caller that releases the framer: the held candidate is logged,
/// the framer reset and the rest of the chunk framed again.
fn frame<R: Read, W: Write>(
    mut reader: R,
    mut out: W,
    config: FramerConfig,
    chunk: usize,
    decode: bool,
) -> Result<FramerStats> {
    let mut framer = SentenceFramer::new(config)?;
    let mut decoder = NmeaDecoder::new();
    let mut event = DecodedEvent::new(0, "", "");
    let mut buf = vec![0u8; chunk];
    let mut sentences = Vec::new();
    let start = Instant::now();

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("Failed to read input"),
        };
        let timestamp_us = start.elapsed().as_micros() as u64;

        let mut rest = &buf[..n];
        loop {
            let consumed = framer.push_into(rest, timestamp_us, &mut sentences);
            rest = &rest[consumed..];
            if framer.state() == FramingState::Saturated {
                log::warn!(
                    "Framer {}, dropping {}",
                    framer.state(),
                    String::from_utf8_lossy(framer.inner().pending())
                );
                framer.reset();
            }
            if rest.is_empty() {
                break;
            }
        }

        for sentence in sentences.drain(..) {
            writeln!(out, "{}", String::from_utf8_lossy(sentence.body()))?;
            if decode && decoder.ingest_into(&sentence, &mut event) {
                let fields: Vec<String> = event
                    .fields
                    .iter()
                    .skip(1)
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect();
                writeln!(out, "  {} {}", event.summary, fields.join(" "))?;
            }
        }
    }
    out.flush()?;

    let stats = framer.stats();
    log::info!(
        "{} sentences, {} overflows, {} noise bytes, {} rejected bytes, {} checksum rejections",
        stats.sentences,
        stats.overflows,
        stats.discarded_bytes,
        stats.rejected_bytes,
        stats.checksum_rejections
    );
    Ok(stats)
}

fn bench(iterations: u64) -> Result<()> {
    log::info!("Framing {} copies of the sample session", iterations);

    let mut framer = SentenceFramer::new(FramerConfig::default())?;

    // Warmup
    for _ in 0..1000 {
        framer.push(SAMPLE_SESSION, 0);
    }

    let start = Instant::now();
    let mut count = 0u64;
    for i in 0..iterations {
        count += framer.push(SAMPLE_SESSION, i).len() as u64;
    }
    let duration = start.elapsed();
    let total_bytes = iterations * SAMPLE_SESSION.len() as u64;

    println!("Sentences: {}", count);
    println!("Duration: {:.2?}", duration);
    println!(
        "Throughput: {:.2} MB/s, {:.2} sentences/sec",
        total_bytes as f64 / duration.as_secs_f64() / 1e6,
        count as f64 / duration.as_secs_f64()
    );
    Ok(())
}
