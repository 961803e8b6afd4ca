//! Range-checked geographic angles.
//!
//! [`Latitude`] and [`Longitude`] hold a signed angle in radians with a
//! degrees mirror, and can never exist outside their legal range. Both read
//! and write the textual encodings used by NMEA 0183 receivers and by people:
//!
//! | Format | Compact | Verbose |
//! |---|---|---|
//! | DMM | `5321.6802,N` | `53° 21.68022'` |
//! | DMS | `532140.8132,N` | `53° 21' 40.8132" N` |
//!
//! ```
//! use geo_angle::{FormatOptions, GeoAngleFormat, Latitude};
//!
//! let lat = Latitude::parse("5321.6802,N", GeoAngleFormat::Dmm, FormatOptions::Compact).unwrap();
//! assert!((lat.degrees() - 53.361337).abs() < 1e-4);
//! assert_eq!(lat.render(GeoAngleFormat::Dmm, FormatOptions::Compact), "5321.6802,N");
//! ```

pub mod angle;
pub mod error;
pub mod format;
mod parse;

pub use angle::{AngleKind, GeoAngle, Latitude, LatitudeKind, Longitude, LongitudeKind};
pub use error::{AngleUnit, GeoAngleError, ParseError};
pub use format::{DmmComponents, DmsComponents, FormatOptions, GeoAngleFormat, Sign, MAX_DECIMALS};
