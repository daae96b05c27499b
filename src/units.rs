//! Unit conversion utilities.
//!
//! Configuration files express times and link speeds together with a unit.
//! Everything inside the generator works in nanoseconds and MB/s, so values
//! are normalised here once, when the configuration is read.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur while parsing or converting units
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitError {
    #[error("Unknown time unit: {0}")]
    UnknownTimeUnit(String),

    #[error("Unknown speed unit: {0}")]
    UnknownSpeedUnit(String),

    #[error("Value {value} {unit} does not fit in 64 bits once converted")]
    Overflow { value: u64, unit: String },
}

/// Time units accepted in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    #[serde(rename = "ns")]
    Ns,
    #[serde(rename = "us")]
    Us,
    #[serde(rename = "ms")]
    Ms,
    #[serde(rename = "s")]
    S,
}

impl TimeUnit {
    /// Number of nanoseconds in one unit
    pub fn nanoseconds(self) -> u64 {
        match self {
            TimeUnit::Ns => 1,
            TimeUnit::Us => 1_000,
            TimeUnit::Ms => 1_000_000,
            TimeUnit::S => 1_000_000_000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Ns => "ns",
            TimeUnit::Us => "us",
            TimeUnit::Ms => "ms",
            TimeUnit::S => "s",
        }
    }
}

impl FromStr for TimeUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ns" => Ok(TimeUnit::Ns),
            "us" => Ok(TimeUnit::Us),
            "ms" => Ok(TimeUnit::Ms),
            "s" => Ok(TimeUnit::S),
            other => Err(UnitError::UnknownTimeUnit(other.to_string())),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Speed units accepted in configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedUnit {
    #[serde(rename = "KB/s")]
    KbS,
    #[serde(rename = "MB/s")]
    MbS,
    #[serde(rename = "GB/s")]
    GbS,
}

impl SpeedUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            SpeedUnit::KbS => "KB/s",
            SpeedUnit::MbS => "MB/s",
            SpeedUnit::GbS => "GB/s",
        }
    }
}

impl FromStr for SpeedUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "KB/s" => Ok(SpeedUnit::KbS),
            "MB/s" => Ok(SpeedUnit::MbS),
            "GB/s" => Ok(SpeedUnit::GbS),
            other => Err(UnitError::UnknownSpeedUnit(other.to_string())),
        }
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a time value to nanoseconds
///
/// # Examples
/// ```
/// use ttnetgen::units::{to_nanoseconds, TimeUnit};
///
/// assert_eq!(to_nanoseconds(5, TimeUnit::Us), Ok(5_000));
/// assert_eq!(to_nanoseconds(2, TimeUnit::S), Ok(2_000_000_000));
/// ```
pub fn to_nanoseconds(value: u64, unit: TimeUnit) -> Result<u64, UnitError> {
    value
        .checked_mul(unit.nanoseconds())
        .ok_or_else(|| UnitError::Overflow { value, unit: unit.to_string() })
}

/// Convert a speed value to MB/s
///
/// KB/s values are truncated towards zero, so anything below 1000 KB/s
/// becomes 0 MB/s. Callers that need a positive speed must check it.
///
/// # Examples
/// ```
/// use ttnetgen::units::{to_megabytes_per_second, SpeedUnit};
///
/// assert_eq!(to_megabytes_per_second(1500, SpeedUnit::KbS), Ok(1));
/// assert_eq!(to_megabytes_per_second(100, SpeedUnit::MbS), Ok(100));
/// assert_eq!(to_megabytes_per_second(1, SpeedUnit::GbS), Ok(1000));
/// ```
pub fn to_megabytes_per_second(value: u64, unit: SpeedUnit) -> Result<u64, UnitError> {
    match unit {
        SpeedUnit::KbS => Ok(value / 1000),
        SpeedUnit::MbS => Ok(value),
        SpeedUnit::GbS => value
            .checked_mul(1000)
            .ok_or_else(|| UnitError::Overflow { value, unit: unit.to_string() }),
    }
}
