//! Decomposition of angles into degrees/minutes/seconds and their text forms.

use crate::angle::AngleKind;

/// Minute decimals in `DDMM.MMMM,H`.
pub const DMM_COMPACT_DECIMALS: u32 = 4;
/// Maximum minute decimals in `D° MM.MMMMMM'`.
pub const DMM_VERBOSE_DECIMALS: u32 = 6;
/// Second decimals in both DMS encodings.
pub const DMS_DECIMALS: u32 = 4;
/// Finest precision the component split honours; larger requests are clamped.
/// At 9 places a full circle of seconds still fits an f64 mantissa exactly.
pub const MAX_DECIMALS: u32 = 9;

/// Degrees-decimal-minutes or degrees-minutes-decimal-seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoAngleFormat {
    Dmm,
    Dms,
}

/// NMEA field layout (`5321.6802,N`) or human-readable (`53° 21.68022'`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatOptions {
    Compact,
    Verbose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// Zero (including -0.0) is positive.
    pub fn of(value: f64) -> Self {
        if value < 0.0 {
            Sign::Negative
        } else {
            Sign::Positive
        }
    }

    pub fn apply(self, magnitude: f64) -> f64 {
        match self {
            Sign::Positive => magnitude,
            Sign::Negative => -magnitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DmmComponents {
    pub sign: Sign,
    pub whole_degrees: u32,
    pub decimal_minutes: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DmsComponents {
    pub sign: Sign,
    pub whole_degrees: u32,
    pub whole_minutes: u32,
    pub decimal_seconds: f64,
}

impl DmmComponents {
    /// Split `degrees`, rounding the minutes to `decimals` places. A carry out
    /// of the minutes goes into the degrees, so minutes are always < 60.
    /// `decimals` is clamped to [`MAX_DECIMALS`].
    pub fn from_degrees(degrees: f64, decimals: u32) -> Self {
        let scale = 10u64.pow(decimals.min(MAX_DECIMALS));
        let ticks = (degrees.abs() * 60.0 * scale as f64).round() as u64;
        let per_degree = 60 * scale;
        Self {
            sign: Sign::of(degrees),
            whole_degrees: (ticks / per_degree) as u32,
            decimal_minutes: (ticks % per_degree) as f64 / scale as f64,
        }
    }

    pub fn to_degrees(&self) -> f64 {
        self.sign
            .apply(self.whole_degrees as f64 + self.decimal_minutes / 60.0)
    }
}

impl DmsComponents {
    /// Split `degrees`, rounding the seconds to `decimals` places with carry.
    /// `decimals` is clamped to [`MAX_DECIMALS`].
    pub fn from_degrees(degrees: f64, decimals: u32) -> Self {
        let scale = 10u64.pow(decimals.min(MAX_DECIMALS));
        let ticks = (degrees.abs() * 3600.0 * scale as f64).round() as u64;
        let per_minute = 60 * scale;
        let per_degree = 60 * per_minute;
        let rem = ticks % per_degree;
        Self {
            sign: Sign::of(degrees),
            whole_degrees: (ticks / per_degree) as u32,
            whole_minutes: (rem / per_minute) as u32,
            decimal_seconds: (rem % per_minute) as f64 / scale as f64,
        }
    }

    pub fn to_degrees(&self) -> f64 {
        self.sign.apply(
            self.whole_degrees as f64
                + self.whole_minutes as f64 / 60.0
                + self.decimal_seconds / 3600.0,
        )
    }
}

fn hemisphere<K: AngleKind>(sign: Sign) -> char {
    match sign {
        Sign::Positive => K::POSITIVE,
        Sign::Negative => K::NEGATIVE,
    }
}

/// Fixed decimals with trailing zeros (and a bare point) removed.
fn trimmed(value: f64, decimals: u32) -> String {
    let s = format!("{:.*}", decimals as usize, value);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// `DDMM.MMMM,H`
pub(crate) fn dmm_compact<K: AngleKind>(dmm: &DmmComponents) -> String {
    format!(
        "{:0width$}{:07.4},{}",
        dmm.whole_degrees,
        dmm.decimal_minutes,
        hemisphere::<K>(dmm.sign),
        width = K::DEGREE_DIGITS
    )
}

/// `±D° MM.MMMMMM'`
pub(crate) fn dmm_verbose(dmm: &DmmComponents) -> String {
    let sign = if dmm.sign == Sign::Negative { "-" } else { "" };
    format!(
        "{sign}{}° {}'",
        dmm.whole_degrees,
        trimmed(dmm.decimal_minutes, DMM_VERBOSE_DECIMALS)
    )
}

/// `DDMMSS.SSSS,H`
pub(crate) fn dms_compact<K: AngleKind>(dms: &DmsComponents) -> String {
    format!(
        "{:0width$}{:02}{:07.4},{}",
        dms.whole_degrees,
        dms.whole_minutes,
        dms.decimal_seconds,
        hemisphere::<K>(dms.sign),
        width = K::DEGREE_DIGITS
    )
}

/// `D° MM' SS.SSSS" H`
pub(crate) fn dms_verbose<K: AngleKind>(dms: &DmsComponents) -> String {
    format!(
        "{}° {}' {}\" {}",
        dms.whole_degrees,
        dms.whole_minutes,
        trimmed(dms.decimal_seconds, DMS_DECIMALS),
        hemisphere::<K>(dms.sign)
    )
}
