//! Exact rational arithmetic for charges, mass dimensions and coefficients.
//!
//! Rationals travel as strings (`"-1/2"`, `"3"`) so that JSON and YAML
//! documents stay readable; plain integers are accepted on input.

use serde::{Deserialize, Deserializer, Serializer};

use crate::errors::{ErrorInfo, ModelError};

/// Exact rational number used throughout the engine.
pub type Rational = num_rational::Rational64;

fn parse_error(text: &str, reason: &str) -> ModelError {
    ModelError::Serde(
        ErrorInfo::new("rational-parse", format!("cannot parse '{text}' as a rational"))
            .with_context("input", text)
            .with_context("reason", reason),
    )
}

/// Parses `p`, `p/q` or a finite decimal such as `0.5` or `-1.25`.
pub fn parse_rational(text: &str) -> Result<Rational, ModelError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(parse_error(text, "empty"));
    }
    if let Some((num, den)) = trimmed.split_once('/') {
        let num: i64 = num
            .trim()
            .parse()
            .map_err(|_| parse_error(text, "numerator"))?;
        let den: i64 = den
            .trim()
            .parse()
            .map_err(|_| parse_error(text, "denominator"))?;
        if den == 0 {
            return Err(parse_error(text, "zero denominator"));
        }
        return Ok(Rational::new(num, den));
    }
    if let Some((whole, frac)) = trimmed.split_once('.') {
        let negative = whole.starts_with('-');
        let digits = whole.trim_start_matches(['-', '+']);
        if frac.is_empty() || !frac.chars().all(|c| c.is_ascii_digit()) || frac.len() > 12 {
            return Err(parse_error(text, "fraction digits"));
        }
        let whole: i64 = if digits.is_empty() {
            0
        } else {
            digits.parse().map_err(|_| parse_error(text, "integer part"))?
        };
        let scale = 10_i64.pow(frac.len() as u32);
        let frac: i64 = frac.parse().map_err(|_| parse_error(text, "fraction"))?;
        let magnitude = whole
            .checked_mul(scale)
            .and_then(|value| value.checked_add(frac))
            .ok_or_else(|| parse_error(text, "overflow"))?;
        let value = Rational::new(magnitude, scale);
        return Ok(if negative { -value } else { value });
    }
    trimmed
        .parse::<i64>()
        .map(Rational::from_integer)
        .map_err(|_| parse_error(text, "integer"))
}

/// Formats a rational as `p` when integral and `p/q` otherwise.
pub fn format_rational(value: &Rational) -> String {
    if value.is_integer() {
        value.numer().to_string()
    } else {
        format!("{}/{}", value.numer(), value.denom())
    }
}

type Wide = num_rational::Ratio<i128>;

fn widen(value: Rational) -> Wide {
    Wide::new_raw(i128::from(*value.numer()), i128::from(*value.denom()))
}

fn narrow(value: Wide, operation: &str) -> Result<Rational, ModelError> {
    match (i64::try_from(*value.numer()), i64::try_from(*value.denom())) {
        (Ok(numer), Ok(denom)) => Ok(Rational::new_raw(numer, denom)),
        _ => Err(ModelError::InvalidRepresentation(
            ErrorInfo::new("rational-overflow", "rational arithmetic left the 64-bit range")
                .with_context("operation", operation)
                .with_context("computed", format!("{}/{}", value.numer(), value.denom()))
                .with_hint("use charges with smaller numerators and denominators"),
        )),
    }
}

/// `a + b`, failing instead of wrapping when the result leaves `i64`.
pub fn checked_add(a: Rational, b: Rational) -> Result<Rational, ModelError> {
    narrow(widen(a) + widen(b), "add")
}

/// `a - b`, failing when the result leaves `i64`.
pub fn checked_sub(a: Rational, b: Rational) -> Result<Rational, ModelError> {
    narrow(widen(a) - widen(b), "sub")
}

/// `a * b`, failing when the result leaves `i64`.
pub fn checked_mul(a: Rational, b: Rational) -> Result<Rational, ModelError> {
    narrow(widen(a) * widen(b), "mul")
}

/// Sum of `values` with [`checked_add`].
pub fn checked_sum<I>(values: I) -> Result<Rational, ModelError>
where
    I: IntoIterator<Item = Rational>,
{
    values
        .into_iter()
        .try_fold(Rational::from_integer(0), checked_add)
}

/// Product of `values` with [`checked_mul`].
pub fn checked_product<I>(values: I) -> Result<Rational, ModelError>
where
    I: IntoIterator<Item = Rational>,
{
    values
        .into_iter()
        .try_fold(Rational::from_integer(1), checked_mul)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RationalRepr {
    Int(i64),
    Text(String),
}

impl RationalRepr {
    fn into_rational<E: serde::de::Error>(self) -> Result<Rational, E> {
        match self {
            RationalRepr::Int(value) => Ok(Rational::from_integer(value)),
            RationalRepr::Text(text) => parse_rational(&text).map_err(E::custom),
        }
    }
}

/// `#[serde(with = "...")]` adapter for a single [`Rational`].
pub mod serde_str {
    use super::*;

    /// Serializes the rational as its string form.
    pub fn serialize<S: Serializer>(value: &Rational, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_rational(value))
    }

    /// Deserializes from a string or an integer.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rational, D::Error> {
        RationalRepr::deserialize(deserializer)?.into_rational()
    }
}

/// `#[serde(with = "...")]` adapter for an optional [`Rational`].
pub mod serde_opt {
    use super::*;

    /// Serializes `Some` as a string and `None` as null.
    pub fn serialize<S: Serializer>(
        value: &Option<Rational>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_some(&format_rational(value)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes from null, a string or an integer.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Rational>, D::Error> {
        Option::<RationalRepr>::deserialize(deserializer)?
            .map(RationalRepr::into_rational)
            .transpose()
    }
}

/// `#[serde(with = "...")]` adapter for string keyed maps of rationals.
pub mod serde_map {
    use std::collections::BTreeMap;

    use serde::ser::SerializeMap;

    use super::*;

    /// Serializes every value in string form.
    pub fn serialize<S: Serializer>(
        value: &BTreeMap<String, Rational>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(value.len()))?;
        for (key, entry) in value {
            map.serialize_entry(key, &format_rational(entry))?;
        }
        map.end()
    }

    /// Deserializes values given as strings or integers.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, Rational>, D::Error> {
        BTreeMap::<String, RationalRepr>::deserialize(deserializer)?
            .into_iter()
            .map(|(key, value)| value.into_rational().map(|value| (key, value)))
            .collect()
    }
}
