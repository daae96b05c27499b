//! Network-wide settings recorded alongside the topology.
//!
//! None of these values change how the graph or the paths are built; they
//! are carried through to the output document for the downstream scheduler.

use serde::Serialize;

use crate::paths::PathMode;

/// Errors raised when a setting is out of range
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("Self-healing period must be positive")]
    ZeroPeriod,

    #[error("Self-healing time {time} ns must be positive and below the period {period} ns")]
    InvalidReservation { period: u64, time: u64 },
}

/// Periodic bandwidth reservation for the self-healing protocol, in ns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelfHealingProtocol {
    period: u64,
    time: u64,
}

impl SelfHealingProtocol {
    pub fn new(period: u64, time: u64) -> Result<Self, SettingsError> {
        if period == 0 {
            return Err(SettingsError::ZeroPeriod);
        }
        if time == 0 || time >= period {
            return Err(SettingsError::InvalidReservation { period, time });
        }
        Ok(Self { period, time })
    }

    pub fn period(&self) -> u64 {
        self.period
    }

    pub fn time(&self) -> u64 {
        self.time
    }
}

/// Settings that shape one generation run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkSettings {
    /// Minimum residence time of a frame in a switch, in ns
    pub minimum_time_switch: u64,
    pub self_healing: Option<SelfHealingProtocol>,
    pub path_mode: PathMode,
    /// Upper bound on all-simple paths per ordered pair
    pub max_paths_per_pair: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_healing_bounds() {
        let protocol = SelfHealingProtocol::new(10_000, 500).unwrap();
        assert_eq!(protocol.period(), 10_000);
        assert_eq!(protocol.time(), 500);

        assert_eq!(SelfHealingProtocol::new(0, 0), Err(SettingsError::ZeroPeriod));
        assert!(SelfHealingProtocol::new(100, 0).is_err());
        assert!(SelfHealingProtocol::new(100, 100).is_err());
    }

    #[test]
    fn test_default_settings() {
        let settings = NetworkSettings::default();
        assert_eq!(settings.path_mode, PathMode::Shortest);
        assert!(settings.self_healing.is_none());
        assert!(settings.max_paths_per_pair.is_none());
    }
}
