use std::borrow::Cow;

use core_types::{DecodedEvent, Decoder, Sentence};
use geo_angle::{FormatOptions, GeoAngleFormat, Latitude, Longitude};
use nmea::{Nmea, SentenceType};

/// Hands framed sentences to the `nmea` grammar and reports positions as
/// validated [`Latitude`] / [`Longitude`] values.
pub struct NmeaDecoder {
    parser: Nmea,
}

impl NmeaDecoder {
    pub fn new() -> Self {
        Self {
            parser: Nmea::default(),
        }
    }

    fn push_position(&self, output: &mut DecodedEvent) {
        let (Some(lat), Some(lon)) = (self.parser.latitude, self.parser.longitude) else {
            return;
        };
        match (Latitude::from_degrees(lat), Longitude::from_degrees(lon)) {
            (Ok(lat), Ok(lon)) => {
                output.push_field("latitude", lat.degrees());
                output.push_field("longitude", lon.degrees());
                output.push_field(
                    "latitude_dmm",
                    lat.render(GeoAngleFormat::Dmm, FormatOptions::Compact),
                );
                output.push_field(
                    "longitude_dmm",
                    lon.render(GeoAngleFormat::Dmm, FormatOptions::Compact),
                );
            }
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("Receiver reported an impossible position: {e}");
            }
        }
    }
}

impl Default for NmeaDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for NmeaDecoder {
    fn ingest(&mut self, sentence: &Sentence) -> Option<DecodedEvent> {
        let mut event = DecodedEvent::new(0, "", "");
        if self.ingest_into(sentence, &mut event) {
            Some(event)
        } else {
            None
        }
    }

    fn ingest_into(&mut self, sentence: &Sentence, output: &mut DecodedEvent) -> bool {
        // NMEA is ASCII; the grammar expects no line terminator.
        let Ok(text) = std::str::from_utf8(sentence.body()) else {
            return false;
        };

        let sentence_type = match self.parser.parse(text) {
            Ok(sentence_type) => sentence_type,
            Err(e) => {
                log::debug!("Not a decodable NMEA sentence ({e:?}): {text}");
                return false;
            }
        };

        output.clear();
        output.timestamp_us = sentence.timestamp_us;
        output.protocol = Cow::Borrowed("NMEA");

        let type_str = match sentence_type {
            SentenceType::GGA => "GGA",
            SentenceType::RMC => "RMC",
            SentenceType::GSA => "GSA",
            SentenceType::GSV => "GSV",
            SentenceType::VTG => "VTG",
            SentenceType::GLL => "GLL",
            SentenceType::TXT => "TXT",
            _ => "OTHER",
        };
        output.summary = Cow::Borrowed(type_str);
        output.push_field("type", type_str);

        match sentence_type {
            SentenceType::GGA => {
                self.push_position(output);
                if let Some(alt) = self.parser.altitude {
                    output.push_field("altitude", alt);
                }
                if let Some(satellites) = self.parser.num_of_fix_satellites {
                    output.push_field("satellites", satellites);
                }
            }
            SentenceType::RMC | SentenceType::GLL => self.push_position(output),
            _ => {}
        }

        true
    }

    fn id(&self) -> &'static str {
        "nmea"
    }

    fn name(&self) -> &'static str {
        "NMEA 0183"
    }
}
