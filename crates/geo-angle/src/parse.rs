use crate::angle::AngleKind;
use crate::error::ParseError;
use crate::format::{DmmComponents, DmsComponents, FormatOptions, GeoAngleFormat, Sign};

/// Decompose `text` and return signed degrees. Range is not checked here.
pub(crate) fn parse_degrees<K: AngleKind>(
    text: &str,
    format: GeoAngleFormat,
    options: FormatOptions,
) -> Result<f64, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::Empty);
    }
    match (format, options) {
        (GeoAngleFormat::Dmm, FormatOptions::Compact) => dmm_compact::<K>(text),
        (GeoAngleFormat::Dmm, FormatOptions::Verbose) => dmm_verbose(text),
        (GeoAngleFormat::Dms, FormatOptions::Compact) => dms_compact::<K>(text),
        (GeoAngleFormat::Dms, FormatOptions::Verbose) => dms_verbose::<K>(text),
    }
}

/// `DDMM.MMMM,H`, any number of degree digits.
fn dmm_compact<K: AngleKind>(text: &str) -> Result<f64, ParseError> {
    let (number, sign) = split_compact::<K>(text)?;
    let int_len = integer_digits(number)?;
    if int_len < 3 {
        return Err(ParseError::Malformed(
            "expected degree digits followed by two minute digits",
        ));
    }
    let components = DmmComponents {
        sign,
        whole_degrees: whole(&number[..int_len - 2])?,
        decimal_minutes: minutes(decimal(&number[int_len - 2..])?)?,
    };
    Ok(components.to_degrees())
}

/// `DDMMSS.SSSS,H`, any number of degree digits.
fn dms_compact<K: AngleKind>(text: &str) -> Result<f64, ParseError> {
    let (number, sign) = split_compact::<K>(text)?;
    let int_len = integer_digits(number)?;
    if int_len < 5 {
        return Err(ParseError::Malformed(
            "expected degree digits followed by two minute and two second digits",
        ));
    }
    let whole_minutes = whole(&number[int_len - 4..int_len - 2])?;
    minutes(whole_minutes as f64)?;
    let components = DmsComponents {
        sign,
        whole_degrees: whole(&number[..int_len - 4])?,
        whole_minutes,
        decimal_seconds: seconds(decimal(&number[int_len - 2..])?)?,
    };
    Ok(components.to_degrees())
}

/// `±D° MM.MMMMMM'`
fn dmm_verbose(text: &str) -> Result<f64, ParseError> {
    let (sign, rest) = match text.as_bytes()[0] {
        b'-' => (Sign::Negative, &text[1..]),
        b'+' => (Sign::Positive, &text[1..]),
        _ => (Sign::Positive, text),
    };
    let (degrees, rest) = rest
        .split_once('°')
        .ok_or(ParseError::Malformed("missing degree symbol"))?;
    let minutes_text = rest
        .trim()
        .strip_suffix('\'')
        .ok_or(ParseError::Malformed("missing minute mark"))?;
    let components = DmmComponents {
        sign,
        whole_degrees: whole(degrees.trim())?,
        decimal_minutes: minutes(decimal(minutes_text.trim())?)?,
    };
    Ok(components.to_degrees())
}

/// `D° MM' SS.SSSS" H`
fn dms_verbose<K: AngleKind>(text: &str) -> Result<f64, ParseError> {
    if text.starts_with(['-', '+']) {
        return Err(ParseError::UnexpectedSign);
    }
    let (degrees, rest) = text
        .split_once('°')
        .ok_or(ParseError::Malformed("missing degree symbol"))?;
    let (minutes_text, rest) = rest
        .split_once('\'')
        .ok_or(ParseError::Malformed("missing minute mark"))?;
    let (seconds_text, rest) = rest
        .split_once('"')
        .ok_or(ParseError::Malformed("missing second mark"))?;
    let sign = hemisphere::<K>(rest.trim())?;

    let whole_minutes = whole(minutes_text.trim())?;
    minutes(whole_minutes as f64)?;
    let components = DmsComponents {
        sign,
        whole_degrees: whole(degrees.trim())?,
        whole_minutes,
        decimal_seconds: seconds(decimal(seconds_text.trim())?)?,
    };
    Ok(components.to_degrees())
}

fn split_compact<K: AngleKind>(text: &str) -> Result<(&str, Sign), ParseError> {
    let (number, letter) = text.split_once(',').ok_or(ParseError::MissingHemisphere)?;
    let number = number.trim();
    if number.starts_with(['-', '+']) {
        return Err(ParseError::UnexpectedSign);
    }
    Ok((number, hemisphere::<K>(letter.trim())?))
}

fn hemisphere<K: AngleKind>(letter: &str) -> Result<Sign, ParseError> {
    let mut chars = letter.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Err(ParseError::MissingHemisphere),
        (Some(c), None) if c.eq_ignore_ascii_case(&K::POSITIVE) => Ok(Sign::Positive),
        (Some(c), None) if c.eq_ignore_ascii_case(&K::NEGATIVE) => Ok(Sign::Negative),
        _ => Err(ParseError::InvalidHemisphere {
            found: letter.to_string(),
            positive: K::POSITIVE,
            negative: K::NEGATIVE,
        }),
    }
}

/// Length of the integer part of a plain decimal number.
fn integer_digits(number: &str) -> Result<usize, ParseError> {
    decimal(number)?;
    Ok(number.find('.').unwrap_or(number.len()))
}

fn whole(digits: &str) -> Result<u32, ParseError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidNumber(digits.to_string()));
    }
    digits
        .parse()
        .map_err(|_| ParseError::InvalidNumber(digits.to_string()))
}

/// Digits with at most one decimal point; no sign, exponent or `inf`.
fn decimal(text: &str) -> Result<f64, ParseError> {
    let (int, frac) = text.split_once('.').unwrap_or((text, ""));
    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if int.is_empty() || !digits_only(int) || !digits_only(frac) {
        return Err(ParseError::InvalidNumber(text.to_string()));
    }
    text.parse()
        .map_err(|_| ParseError::InvalidNumber(text.to_string()))
}

fn minutes(value: f64) -> Result<f64, ParseError> {
    if value < 60.0 {
        Ok(value)
    } else {
        Err(ParseError::MinutesOutOfRange(value))
    }
}

fn seconds(value: f64) -> Result<f64, ParseError> {
    if value < 60.0 {
        Ok(value)
    } else {
        Err(ParseError::SecondsOutOfRange(value))
    }
}
