use thiserror::Error;

/// Unit an out-of-range value was expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleUnit {
    Degrees,
    Radians,
}

impl std::fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AngleUnit::Degrees => f.write_str("°"),
            AngleUnit::Radians => f.write_str(" rad"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoAngleError {
    /// Value outside the legal domain of the angle kind. Never clamped.
    #[error("{kind} out of range: {value}{unit} is outside ±{limit}{unit}")]
    OutOfRange {
        kind: &'static str,
        value: f64,
        limit: f64,
        unit: AngleUnit,
    },

    /// Text could not be decomposed under the requested format.
    #[error("Failed to parse coordinate: {0}")]
    Parse(#[from] ParseError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("missing hemisphere letter")]
    MissingHemisphere,

    #[error("hemisphere {found:?} is neither {positive} nor {negative}")]
    InvalidHemisphere {
        found: String,
        positive: char,
        negative: char,
    },

    #[error("a sign is not allowed in this format, use the hemisphere letter")]
    UnexpectedSign,

    #[error("minutes {0} must be below 60")]
    MinutesOutOfRange(f64),

    #[error("seconds {0} must be below 60")]
    SecondsOutOfRange(f64),

    #[error("{0}")]
    Malformed(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_display() {
        let err = GeoAngleError::OutOfRange {
            kind: "latitude",
            value: 91.0,
            limit: 90.0,
            unit: AngleUnit::Degrees,
        };
        assert_eq!(err.to_string(), "latitude out of range: 91° is outside ±90°");
    }

    #[test]
    fn test_parse_error_wraps() {
        let err: GeoAngleError = ParseError::MissingHemisphere.into();
        assert_eq!(
            err.to_string(),
            "Failed to parse coordinate: missing hemisphere letter"
        );
    }
}
