//! Spawn interval settings and the catch-up spawn schedule.

use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::clock::take_whole_periods;

/// Message shown to the user when the interval field is unusable.
pub const INVALID_INTERVAL_MESSAGE: &str =
    "Please enter a valid spawn interval (number greater than 0).";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid spawn interval {input:?}")]
    InvalidInterval { input: String },
}

impl From<SettingsError> for JsValue {
    fn from(err: SettingsError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum IntervalUnit {
    #[default]
    Seconds,
    Minutes,
}

impl IntervalUnit {
    /// Map the `<select>` value. Only exactly `"minutes"` is special; anything else counts as seconds.
    pub fn from_select(value: &str) -> Self {
        if value == "minutes" {
            Self::Minutes
        } else {
            Self::Seconds
        }
    }

    fn ms(self) -> u64 {
        match self {
            Self::Seconds => 1_000,
            Self::Minutes => 60_000,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnInterval {
    pub value: u64,
    pub unit: IntervalUnit,
}

impl SpawnInterval {
    /// Parse the input field the way a browser integer prefix parse reads it:
    /// leading whitespace and sign, then digits, trailing text ignored.
    pub fn parse(value: &str, unit: &str) -> Result<Self, SettingsError> {
        let invalid = || SettingsError::InvalidInterval {
            input: value.to_string(),
        };
        let n = parse_int_prefix(value).ok_or_else(invalid)?;
        if n <= 0 {
            return Err(invalid());
        }
        let unit = IntervalUnit::from_select(unit);
        // Reject values whose millisecond length would overflow.
        (n as u64).checked_mul(unit.ms()).ok_or_else(invalid)?;
        Ok(Self {
            value: n as u64,
            unit,
        })
    }

    pub fn as_ms(&self) -> u64 {
        self.value * self.unit.ms()
    }
}

fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (neg, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let mut n: i64 = 0;
    for b in digits[..end].bytes() {
        n = n.checked_mul(10)?.checked_add((b - b'0') as i64)?;
    }
    Some(if neg { -n } else { n })
}

// --- Spawn schedule -----------------------------------------------------------

/// Tracks the elapsed time of the last spawn boundary.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpawnSchedule {
    last_spawn_ms: f64,
}

impl SpawnSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart counting from `elapsed_ms` (called whenever the timer starts).
    pub fn rebase(&mut self, elapsed_ms: f64) {
        self.last_spawn_ms = elapsed_ms;
    }

    pub fn reset(&mut self) {
        self.last_spawn_ms = 0.0;
    }

    pub fn last_spawn_ms(&self) -> f64 {
        self.last_spawn_ms
    }

    /// Number of whole intervals passed since the last spawn boundary. The
    /// boundary advances by exactly that many intervals so leftover time carries over.
    pub fn due(&mut self, elapsed_ms: f64, interval_ms: u64) -> u32 {
        take_whole_periods(&mut self.last_spawn_ms, elapsed_ms, interval_ms as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_integer_prefix() {
        let iv = SpawnInterval::parse("  5s", "seconds").unwrap();
        assert_eq!(iv.value, 5);
        assert_eq!(iv.as_ms(), 5_000);
        let iv = SpawnInterval::parse("+2", "minutes").unwrap();
        assert_eq!(iv.as_ms(), 120_000);
        assert_eq!(SpawnInterval::parse("1.9", "seconds").unwrap().value, 1);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for bad in ["", "abc", "0", "-3", "  ", "+", "-", "0x10"] {
            assert!(
                SpawnInterval::parse(bad, "seconds").is_err(),
                "'{bad}' should be rejected"
            );
        }
        let err = SpawnInterval::parse("99999999999999999999", "seconds").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidInterval { .. }));
    }

    #[test]
    fn test_unknown_unit_is_seconds() {
        assert_eq!(IntervalUnit::from_select("hours"), IntervalUnit::Seconds);
        assert_eq!(IntervalUnit::from_select("minutes"), IntervalUnit::Minutes);
        assert_eq!(IntervalUnit::from_select("Minutes"), IntervalUnit::Seconds);
        assert_eq!(IntervalUnit::from_select(" minutes"), IntervalUnit::Seconds);
    }

    #[test]
    fn test_unit_match_is_exact() {
        assert_eq!(SpawnInterval::parse("2", "Minutes").unwrap().as_ms(), 2_000);
        assert_eq!(SpawnInterval::parse("2", "minutes").unwrap().as_ms(), 120_000);
    }

    #[test]
    fn test_schedule_due_counts_and_carries_remainder() {
        let mut s = SpawnSchedule::new();
        assert_eq!(s.due(999.0, 1_000), 0);
        assert_eq!(s.due(1_000.0, 1_000), 1);
        assert_eq!(s.last_spawn_ms(), 1_000.0);
        // A long gap spawns several at once
        assert_eq!(s.due(4_500.0, 1_000), 3);
        assert_eq!(s.last_spawn_ms(), 4_000.0);
        assert_eq!(s.due(4_900.0, 1_000), 0);
        assert_eq!(s.due(5_000.0, 1_000), 1);
    }

    #[test]
    fn test_schedule_rebase_and_reset() {
        let mut s = SpawnSchedule::new();
        s.rebase(7_300.0);
        assert_eq!(s.due(8_000.0, 1_000), 0);
        assert_eq!(s.due(8_300.0, 1_000), 1);
        s.reset();
        assert_eq!(s.last_spawn_ms(), 0.0);
        assert_eq!(s.due(100.0, 0), 0);
    }
}
