//! Schedule interval parsing

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Unit of a schedule interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl Unit {
    fn seconds(self) -> u64 {
        match self {
            Unit::Seconds => 1,
            Unit::Minutes => 60,
            Unit::Hours => 3600,
            Unit::Days => 86400,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Unit::Seconds => "seconds",
            Unit::Minutes => "minutes",
            Unit::Hours => "hours",
            Unit::Days => "days",
        };
        write!(f, "{}", name)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum IntervalError {
    #[error(
        "unit too long, must be a single character of seconds (s), minutes (m), hours (h) or days (d), got {0:?}"
    )]
    UnitTooLong(String),

    #[error("unit must be one of seconds (s), minutes (m), hours (h) or days (d), got {0:?}")]
    UnrecognizedUnit(String),

    #[error("interval {0:?} has no numeric magnitude")]
    MissingMagnitude(String),

    #[error("interval magnitude {0:?} is out of range")]
    MagnitudeOutOfRange(String),

    #[error("interval magnitude must be greater than zero")]
    ZeroMagnitude,
}

/// A parsed schedule interval such as "30m": positive magnitude plus unit.
/// Built once at startup and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalSpec {
    pub magnitude: u64,
    pub unit: Unit,
}

impl IntervalSpec {
    /// Parse an interval string: a run of digits and a single unit
    /// character. Any other characters are skipped during accumulation.
    pub fn parse(input: &str) -> Result<Self, IntervalError> {
        let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
        let unit: String = input.chars().filter(|c| c.is_alphabetic()).collect();

        if unit.len() > 1 {
            return Err(IntervalError::UnitTooLong(unit));
        }

        let unit = match unit.as_str() {
            "s" => Unit::Seconds,
            "m" => Unit::Minutes,
            "h" => Unit::Hours,
            "d" => Unit::Days,
            _ => return Err(IntervalError::UnrecognizedUnit(unit)),
        };

        if digits.is_empty() {
            return Err(IntervalError::MissingMagnitude(input.to_string()));
        }

        let magnitude: u64 = digits
            .parse()
            .map_err(|_| IntervalError::MagnitudeOutOfRange(digits.clone()))?;

        if magnitude == 0 {
            return Err(IntervalError::ZeroMagnitude);
        }

        Ok(Self { magnitude, unit })
    }

    pub fn to_duration(&self) -> Duration {
        Duration::from_secs(self.magnitude.saturating_mul(self.unit.seconds()))
    }
}

impl fmt::Display for IntervalSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minutes() {
        assert_eq!(
            IntervalSpec::parse("30m").unwrap(),
            IntervalSpec {
                magnitude: 30,
                unit: Unit::Minutes
            }
        );
    }

    #[test]
    fn test_parse_all_units() {
        assert_eq!(IntervalSpec::parse("10s").unwrap().unit, Unit::Seconds);
        assert_eq!(IntervalSpec::parse("5h").unwrap().unit, Unit::Hours);
        assert_eq!(IntervalSpec::parse("2d").unwrap().unit, Unit::Days);
    }

    #[test]
    fn test_unit_too_long() {
        assert_eq!(
            IntervalSpec::parse("5mm"),
            Err(IntervalError::UnitTooLong("mm".to_string()))
        );
    }

    #[test]
    fn test_unrecognized_unit() {
        assert_eq!(
            IntervalSpec::parse("10x"),
            Err(IntervalError::UnrecognizedUnit("x".to_string()))
        );
    }

    #[test]
    fn test_missing_unit() {
        assert_eq!(
            IntervalSpec::parse("30"),
            Err(IntervalError::UnrecognizedUnit(String::new()))
        );
    }

    #[test]
    fn test_missing_magnitude() {
        assert_eq!(
            IntervalSpec::parse("m"),
            Err(IntervalError::MissingMagnitude("m".to_string()))
        );
    }

    #[test]
    fn test_zero_magnitude() {
        assert_eq!(IntervalSpec::parse("0s"), Err(IntervalError::ZeroMagnitude));
    }

    #[test]
    fn test_stray_characters_are_skipped() {
        // Accumulation quirk: whitespace and punctuation never fail parsing
        assert_eq!(
            IntervalSpec::parse("30 m").unwrap(),
            IntervalSpec {
                magnitude: 30,
                unit: Unit::Minutes
            }
        );
    }

    #[test]
    fn test_to_duration() {
        assert_eq!(
            IntervalSpec::parse("30m").unwrap().to_duration(),
            Duration::from_secs(1800)
        );
        assert_eq!(
            IntervalSpec::parse("2d").unwrap().to_duration(),
            Duration::from_secs(172_800)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(IntervalSpec::parse("30m").unwrap().to_string(), "30 minutes");
    }
}
