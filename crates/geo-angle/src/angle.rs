use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{AngleUnit, GeoAngleError};
use crate::format::{
    self, DmmComponents, DmsComponents, FormatOptions, GeoAngleFormat, Sign,
    DMM_COMPACT_DECIMALS, DMM_VERBOSE_DECIMALS, DMS_DECIMALS,
};
use crate::parse;

/// The legal domain and textual conventions of one kind of angle.
pub trait AngleKind: Copy + Default + PartialEq + Send + Sync + 'static {
    /// Lowercase name used in error messages.
    const NAME: &'static str;
    const LIMIT_DEGREES: f64;
    const LIMIT_RADIANS: f64;
    /// Hemisphere letter for values ≥ 0.
    const POSITIVE: char;
    /// Hemisphere letter for values < 0.
    const NEGATIVE: char;
    /// Zero-padded width of the degrees in compact encodings.
    const DEGREE_DIGITS: usize;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatitudeKind;

impl AngleKind for LatitudeKind {
    const NAME: &'static str = "latitude";
    const LIMIT_DEGREES: f64 = 90.0;
    const LIMIT_RADIANS: f64 = FRAC_PI_2;
    const POSITIVE: char = 'N';
    const NEGATIVE: char = 'S';
    const DEGREE_DIGITS: usize = 2;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LongitudeKind;

impl AngleKind for LongitudeKind {
    const NAME: &'static str = "longitude";
    const LIMIT_DEGREES: f64 = 180.0;
    const LIMIT_RADIANS: f64 = PI;
    const POSITIVE: char = 'E';
    const NEGATIVE: char = 'W';
    const DEGREE_DIGITS: usize = 3;
}

pub type Latitude = GeoAngle<LatitudeKind>;
pub type Longitude = GeoAngle<LongitudeKind>;

/// A signed angle that is always inside the range of its kind `K`.
///
/// The canonical value is in radians; the degrees view is kept alongside so
/// values entered in degrees read back unchanged.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct GeoAngle<K: AngleKind> {
    radians: f64,
    degrees: f64,
    kind: PhantomData<K>,
}

impl<K: AngleKind> GeoAngle<K> {
    pub fn from_degrees(degrees: f64) -> Result<Self, GeoAngleError> {
        check::<K>(degrees, K::LIMIT_DEGREES, AngleUnit::Degrees)?;
        Ok(Self {
            radians: degrees.to_radians().clamp(-K::LIMIT_RADIANS, K::LIMIT_RADIANS),
            degrees,
            kind: PhantomData,
        })
    }

    pub fn from_radians(radians: f64) -> Result<Self, GeoAngleError> {
        check::<K>(radians, K::LIMIT_RADIANS, AngleUnit::Radians)?;
        Ok(Self {
            radians,
            degrees: radians.to_degrees().clamp(-K::LIMIT_DEGREES, K::LIMIT_DEGREES),
            kind: PhantomData,
        })
    }

    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    pub fn radians(&self) -> f64 {
        self.radians
    }

    /// Replace the value. On error `self` is left untouched.
    pub fn set_degrees(&mut self, degrees: f64) -> Result<(), GeoAngleError> {
        *self = Self::from_degrees(degrees)?;
        Ok(())
    }

    /// Replace the value. On error `self` is left untouched.
    pub fn set_radians(&mut self, radians: f64) -> Result<(), GeoAngleError> {
        *self = Self::from_radians(radians)?;
        Ok(())
    }

    pub fn sign(&self) -> Sign {
        Sign::of(self.degrees)
    }

    pub fn hemisphere(&self) -> char {
        match self.sign() {
            Sign::Positive => K::POSITIVE,
            Sign::Negative => K::NEGATIVE,
        }
    }

    /// Parse `text` in the given encoding, then validate the range.
    pub fn parse(
        text: &str,
        format: GeoAngleFormat,
        options: FormatOptions,
    ) -> Result<Self, GeoAngleError> {
        let degrees = parse::parse_degrees::<K>(text, format, options)?;
        Self::from_degrees(degrees)
    }

    /// Degrees and decimal minutes, minutes rounded to `decimals` places
    /// (at most [`MAX_DECIMALS`](crate::MAX_DECIMALS)).
    pub fn to_dmm(&self, decimals: u32) -> DmmComponents {
        DmmComponents::from_degrees(self.degrees, decimals)
    }

    /// Degrees, minutes and decimal seconds, seconds rounded to `decimals` places
    /// (at most [`MAX_DECIMALS`](crate::MAX_DECIMALS)).
    pub fn to_dms(&self, decimals: u32) -> DmsComponents {
        DmsComponents::from_degrees(self.degrees, decimals)
    }

    pub fn render(&self, format: GeoAngleFormat, options: FormatOptions) -> String {
        match (format, options) {
            (GeoAngleFormat::Dmm, FormatOptions::Compact) => {
                format::dmm_compact::<K>(&self.to_dmm(DMM_COMPACT_DECIMALS))
            }
            (GeoAngleFormat::Dmm, FormatOptions::Verbose) => {
                format::dmm_verbose(&self.to_dmm(DMM_VERBOSE_DECIMALS))
            }
            (GeoAngleFormat::Dms, FormatOptions::Compact) => {
                format::dms_compact::<K>(&self.to_dms(DMS_DECIMALS))
            }
            (GeoAngleFormat::Dms, FormatOptions::Verbose) => {
                format::dms_verbose::<K>(&self.to_dms(DMS_DECIMALS))
            }
        }
    }
}

fn check<K: AngleKind>(value: f64, limit: f64, unit: AngleUnit) -> Result<(), GeoAngleError> {
    if value.is_finite() && (-limit..=limit).contains(&value) {
        Ok(())
    } else {
        Err(GeoAngleError::OutOfRange {
            kind: K::NAME,
            value,
            limit,
            unit,
        })
    }
}

impl<K: AngleKind> TryFrom<f64> for GeoAngle<K> {
    type Error = GeoAngleError;

    /// Treats the number as degrees.
    fn try_from(degrees: f64) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees)
    }
}

impl<K: AngleKind> From<GeoAngle<K>> for f64 {
    fn from(angle: GeoAngle<K>) -> f64 {
        angle.degrees
    }
}

impl<K: AngleKind> fmt::Display for GeoAngle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(GeoAngleFormat::Dms, FormatOptions::Verbose))
    }
}

impl<K: AngleKind> fmt::Debug for GeoAngle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}°)", K::NAME, self.degrees)
    }
}

impl<K: AngleKind> Serialize for GeoAngle<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.degrees)
    }
}

impl<'de, K: AngleKind> Deserialize<'de> for GeoAngle<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let degrees = f64::deserialize(deserializer)?;
        Self::from_degrees(degrees).map_err(serde::de::Error::custom)
    }
}
