// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signed durations with Go-style text representation.
//!
//! Configuration timeouts are written as `15s`, `1h30m` or `250ms` and a
//! validator has to be able to reject negative values such as `-1s`, which
//! `std::time::Duration` cannot represent. [`Duration`] is a signed count of
//! nanoseconds that parses and prints that syntax.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;
use thiserror::Error;

const NANOS_PER_MICRO: i64 = 1_000;
const NANOS_PER_MILLI: i64 = 1_000_000;
const NANOS_PER_SEC: i64 = 1_000_000_000;
const NANOS_PER_MIN: i64 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MIN;

/// Error returned when a duration string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid duration {input:?}: {reason}")]
pub struct ParseDurationError {
    input: String,
    reason: &'static str,
}

impl ParseDurationError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// A signed span of time with nanosecond precision.
///
/// # Examples
///
/// ```
/// use layercfg::domain::Duration;
///
/// let d: Duration = "1h30m".parse().unwrap();
/// assert_eq!(d, Duration::from_mins(90));
/// assert_eq!(d.to_string(), "1h30m0s");
///
/// let negative: Duration = "-1.5s".parse().unwrap();
/// assert!(negative.is_negative());
/// assert_eq!(negative.to_string(), "-1.5s");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(i64);

impl Duration {
    /// The zero duration.
    pub const ZERO: Duration = Duration(0);

    /// Creates a duration from nanoseconds.
    pub const fn from_nanos(nanos: i64) -> Self {
        Duration(nanos)
    }

    /// Creates a duration from milliseconds.
    pub const fn from_millis(millis: i64) -> Self {
        Duration(millis.saturating_mul(NANOS_PER_MILLI))
    }

    /// Creates a duration from seconds.
    pub const fn from_secs(secs: i64) -> Self {
        Duration(secs.saturating_mul(NANOS_PER_SEC))
    }

    /// Creates a duration from minutes.
    pub const fn from_mins(mins: i64) -> Self {
        Duration(mins.saturating_mul(NANOS_PER_MIN))
    }

    /// Creates a duration from hours.
    pub const fn from_hours(hours: i64) -> Self {
        Duration(hours.saturating_mul(NANOS_PER_HOUR))
    }

    /// Returns the duration in nanoseconds.
    pub const fn as_nanos(&self) -> i64 {
        self.0
    }

    /// Returns the whole number of seconds, truncated toward zero.
    pub const fn as_secs(&self) -> i64 {
        self.0 / NANOS_PER_SEC
    }

    /// Returns `true` if the duration is exactly zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the duration is strictly negative.
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Converts to a `std::time::Duration`, or `None` if negative.
    ///
    /// ```
    /// use layercfg::domain::Duration;
    ///
    /// assert_eq!(Duration::from_secs(2).to_std(), Some(std::time::Duration::from_secs(2)));
    /// assert_eq!(Duration::from_secs(-2).to_std(), None);
    /// ```
    pub fn to_std(&self) -> Option<std::time::Duration> {
        u64::try_from(self.0).ok().map(std::time::Duration::from_nanos)
    }
}

impl From<std::time::Duration> for Duration {
    /// Saturates at the largest representable duration.
    fn from(d: std::time::Duration) -> Self {
        Duration(i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Self::Output {
        Duration(self.0.saturating_neg())
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Self::Output {
        Duration(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Self::Output {
        Duration(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<i64> for Duration {
    type Output = Duration;

    fn mul(self, rhs: i64) -> Self::Output {
        Duration(self.0.saturating_mul(rhs))
    }
}

/// Formats `value / scale` with the fractional part trimmed of trailing zeros.
fn write_scaled(out: &mut String, value: u64, scale: u64) {
    let whole = value / scale;
    let frac = value % scale;
    out.push_str(&whole.to_string());
    if frac != 0 {
        let width = scale.to_string().len() - 1;
        let digits = format!("{:0width$}", frac, width = width);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("0s");
        }

        let mut out = String::new();
        if self.0 < 0 {
            out.push('-');
        }
        let mut rest = self.0.unsigned_abs();

        if rest < NANOS_PER_SEC as u64 {
            let (scale, unit) = if rest < NANOS_PER_MICRO as u64 {
                (1, "ns")
            } else if rest < NANOS_PER_MILLI as u64 {
                (NANOS_PER_MICRO as u64, "µs")
            } else {
                (NANOS_PER_MILLI as u64, "ms")
            };
            write_scaled(&mut out, rest, scale);
            out.push_str(unit);
            return f.write_str(&out);
        }

        let hours = rest / NANOS_PER_HOUR as u64;
        rest %= NANOS_PER_HOUR as u64;
        let mins = rest / NANOS_PER_MIN as u64;
        rest %= NANOS_PER_MIN as u64;

        if hours > 0 {
            out.push_str(&format!("{}h", hours));
        }
        if hours > 0 || mins > 0 {
            out.push_str(&format!("{}m", mins));
        }
        write_scaled(&mut out, rest, NANOS_PER_SEC as u64);
        out.push('s');
        f.write_str(&out)
    }
}

fn unit_scale(unit: &str) -> Option<u128> {
    let nanos = match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => NANOS_PER_MICRO,
        "ms" => NANOS_PER_MILLI,
        "s" => NANOS_PER_SEC,
        "m" => NANOS_PER_MIN,
        "h" => NANOS_PER_HOUR,
        _ => return None,
    };
    Some(nanos as u128)
}

impl FromStr for Duration {
    type Err = ParseDurationError;

    /// Parses a sequence of decimal numbers, each with an optional fraction and
    /// a mandatory unit suffix (`ns`, `us`/`µs`, `ms`, `s`, `m`, `h`), with an
    /// optional leading sign. A bare `0` is accepted.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let s = input.trim();
        let (negative, mut rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        if rest == "0" {
            return Ok(Duration::ZERO);
        }
        if rest.is_empty() {
            return Err(ParseDurationError::new(input, "empty duration"));
        }

        let limit = if negative {
            i64::MAX as u128 + 1
        } else {
            i64::MAX as u128
        };
        let mut total: u128 = 0;

        while !rest.is_empty() {
            let int_end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            let int_part = &rest[..int_end];
            rest = &rest[int_end..];

            let mut frac_part = "";
            if let Some(after_dot) = rest.strip_prefix('.') {
                let frac_end = after_dot
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(after_dot.len());
                frac_part = &after_dot[..frac_end];
                rest = &after_dot[frac_end..];
            }
            if int_part.is_empty() && frac_part.is_empty() {
                return Err(ParseDurationError::new(input, "expected a number"));
            }

            let unit_end = rest
                .find(|c: char| c == '.' || c.is_ascii_digit())
                .unwrap_or(rest.len());
            let unit = &rest[..unit_end];
            rest = &rest[unit_end..];
            if unit.is_empty() {
                return Err(ParseDurationError::new(input, "missing unit"));
            }
            let scale =
                unit_scale(unit).ok_or_else(|| ParseDurationError::new(input, "unknown unit"))?;

            let whole: u128 = if int_part.is_empty() {
                0
            } else {
                int_part
                    .parse()
                    .map_err(|_| ParseDurationError::new(input, "value out of range"))?
            };
            let mut value = whole
                .checked_mul(scale)
                .ok_or_else(|| ParseDurationError::new(input, "value out of range"))?;

            if !frac_part.is_empty() {
                // digits beyond nanosecond precision cannot change the result
                let digits = &frac_part[..frac_part.len().min(18)];
                let frac: u128 = digits
                    .parse()
                    .map_err(|_| ParseDurationError::new(input, "invalid fraction"))?;
                value = value
                    .checked_add(frac * scale / 10u128.pow(digits.len() as u32))
                    .ok_or_else(|| ParseDurationError::new(input, "value out of range"))?;
            }

            total = total
                .checked_add(value)
                .filter(|t| *t <= limit)
                .ok_or_else(|| ParseDurationError::new(input, "value out of range"))?;
        }

        let nanos = if negative {
            (total as i128).wrapping_neg() as i64
        } else {
            total as i64
        };
        Ok(Duration(nanos))
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct DurationVisitor;

impl<'de> Visitor<'de> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a duration string such as \"30s\" or an integer number of nanoseconds")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Duration, E> {
        Ok(Duration::from_nanos(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Duration, E> {
        i64::try_from(v)
            .map(Duration::from_nanos)
            .map_err(|_| E::custom("duration out of range"))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
        if !v.trim().is_empty() && v.trim().bytes().all(|b| b.is_ascii_digit() || b == b'-') {
            return v
                .trim()
                .parse::<i64>()
                .map(Duration::from_nanos)
                .map_err(E::custom);
        }
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DurationVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_units() {
        assert_eq!("15s".parse::<Duration>().unwrap(), Duration::from_secs(15));
        assert_eq!("10m".parse::<Duration>().unwrap(), Duration::from_mins(10));
        assert_eq!("1h".parse::<Duration>().unwrap(), Duration::from_hours(1));
        assert_eq!("250ms".parse::<Duration>().unwrap(), Duration::from_millis(250));
        assert_eq!("7us".parse::<Duration>().unwrap(), Duration::from_nanos(7_000));
        assert_eq!("7µs".parse::<Duration>().unwrap(), Duration::from_nanos(7_000));
        assert_eq!("42ns".parse::<Duration>().unwrap(), Duration::from_nanos(42));
    }

    #[test]
    fn test_parse_compound_and_fraction() {
        assert_eq!(
            "1h30m".parse::<Duration>().unwrap(),
            Duration::from_mins(90)
        );
        assert_eq!(
            "1.5s".parse::<Duration>().unwrap(),
            Duration::from_millis(1500)
        );
        assert_eq!(
            ".5m".parse::<Duration>().unwrap(),
            Duration::from_secs(30)
        );
        assert_eq!(
            "2h45m30.5s".parse::<Duration>().unwrap(),
            Duration::from_hours(2) + Duration::from_mins(45) + Duration::from_millis(30_500)
        );
    }

    #[test]
    fn test_parse_signs() {
        assert_eq!("-1s".parse::<Duration>().unwrap(), Duration::from_secs(-1));
        assert_eq!("+1s".parse::<Duration>().unwrap(), Duration::from_secs(1));
        assert_eq!("0".parse::<Duration>().unwrap(), Duration::ZERO);
        assert_eq!("-0".parse::<Duration>().unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<Duration>().is_err());
        assert!("30".parse::<Duration>().is_err());
        assert!("3x".parse::<Duration>().is_err());
        assert!("s".parse::<Duration>().is_err());
        assert!("1h-2m".parse::<Duration>().is_err());
        assert!("9999999999999h".parse::<Duration>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Duration::ZERO.to_string(), "0s");
        assert_eq!(Duration::from_secs(15).to_string(), "15s");
        assert_eq!(Duration::from_hours(1).to_string(), "1h0m0s");
        assert_eq!(Duration::from_mins(10).to_string(), "10m0s");
        assert_eq!(Duration::from_millis(1500).to_string(), "1.5s");
        assert_eq!(Duration::from_millis(100).to_string(), "100ms");
        assert_eq!(Duration::from_nanos(1_500).to_string(), "1.5µs");
        assert_eq!(Duration::from_nanos(3).to_string(), "3ns");
        assert_eq!(Duration::from_secs(-1).to_string(), "-1s");
    }

    #[test]
    fn test_ordering() {
        assert!(Duration::from_secs(1) < Duration::from_secs(30));
        assert!(Duration::from_secs(-1) < Duration::ZERO);
    }

    #[test]
    fn test_std_conversion() {
        let d = Duration::from(std::time::Duration::from_millis(1200));
        assert_eq!(d, Duration::from_millis(1200));
        assert_eq!(d.to_std(), Some(std::time::Duration::from_millis(1200)));
        assert_eq!((-d).to_std(), None);
    }

    #[test]
    fn test_extremes() {
        let max = Duration::from_nanos(i64::MAX);
        assert_eq!(max.to_string().parse::<Duration>().unwrap(), max);
        let min = Duration::from_nanos(i64::MIN);
        assert_eq!(min.to_string().parse::<Duration>().unwrap(), min);
    }

    #[test]
    fn test_fraction_overflowing_whole_part_is_rejected() {
        // whole part times the unit sits just below u128::MAX
        let input = "340282366920938463463374607431768211.999us";
        let err = input.parse::<Duration>().unwrap_err();
        assert!(err.to_string().contains("value out of range"));
        assert!("-340282366920938463463374607431768211.999us"
            .parse::<Duration>()
            .is_err());
    }
}
