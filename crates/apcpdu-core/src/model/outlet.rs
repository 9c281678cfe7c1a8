// ── Outlet identity and power state ──

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Width of the `sPDUOutletCtlName` field on the device.
pub const MAX_OUTLET_NAME_LEN: usize = 20;

/// A 1-based outlet number.
///
/// The upper bound is not known until the device reports its outlet
/// count; out-of-range indices surface as `CoreError::NoSuchObject`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutletIndex(NonZeroU32);

impl OutletIndex {
    pub const fn new(index: u32) -> Option<Self> {
        match NonZeroU32::new(index) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for OutletIndex {
    type Error = CoreError;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        Self::new(index).ok_or_else(|| CoreError::Validation {
            field: "outlet".into(),
            reason: "outlet numbers start at 1".into(),
        })
    }
}

impl FromStr for OutletIndex {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u32 = s.trim().parse().map_err(|_| CoreError::Validation {
            field: "outlet".into(),
            reason: format!("expected a positive integer, got '{s}'"),
        })?;
        Self::try_from(n)
    }
}

impl fmt::Display for OutletIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── PowerState ───────────────────────────────────────────────────

/// The raw `sPDUOutletCtl` code reported by the device.
///
/// Kept as the coded integer: besides on/off, devices report transitional
/// and delayed states, and newer firmware may add more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PowerState(i32);

impl PowerState {
    pub const ON: Self = Self(1);
    pub const OFF: Self = Self(2);
    pub const REBOOT: Self = Self(3);
    pub const UNKNOWN: Self = Self(4);
    pub const ON_WITH_DELAY: Self = Self(5);
    pub const OFF_WITH_DELAY: Self = Self(6);
    pub const REBOOT_WITH_DELAY: Self = Self(7);

    pub const fn from_code(code: i32) -> Self {
        Self(code)
    }

    pub const fn code(self) -> i32 {
        self.0
    }

    pub fn is_on(self) -> bool {
        self == Self::ON
    }

    pub fn is_off(self) -> bool {
        self == Self::OFF
    }

    /// Short name for known codes.
    pub fn label(self) -> Option<&'static str> {
        match self.0 {
            1 => Some("on"),
            2 => Some("off"),
            3 => Some("reboot"),
            4 => Some("unknown"),
            5 => Some("on-with-delay"),
            6 => Some("off-with-delay"),
            7 => Some("reboot-with-delay"),
            _ => None,
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => f.write_str(label),
            None => write!(f, "state {}", self.0),
        }
    }
}

// ── PowerCommand ─────────────────────────────────────────────────

/// Requested outlet power change.
///
/// `true`/`false` map to the on/off codes; a raw integer is written
/// unchanged so extended codes (reboot, delayed on/off) stay reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCommand {
    On,
    Off,
    Raw(i32),
}

impl PowerCommand {
    pub const fn code(self) -> i32 {
        match self {
            Self::On => 1,
            Self::Off => 2,
            Self::Raw(code) => code,
        }
    }

    /// Local check performed before anything is sent to the device.
    pub fn validate(self) -> Result<Self, CoreError> {
        match self {
            Self::Raw(code) if code < 0 => Err(CoreError::Validation {
                field: "state".into(),
                reason: format!("power state codes are non-negative, got {code}"),
            }),
            other => Ok(other),
        }
    }
}

impl From<bool> for PowerCommand {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

impl From<i32> for PowerCommand {
    fn from(code: i32) -> Self {
        Self::Raw(code)
    }
}

impl FromStr for PowerCommand {
    type Err = CoreError;

    /// Accepts `on`, `off`, `true`, `false`, or a non-negative integer code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" | "true" => Ok(Self::On),
            "off" | "false" => Ok(Self::Off),
            other => other
                .parse::<i32>()
                .map_err(|_| CoreError::Validation {
                    field: "state".into(),
                    reason: format!("expected on, off, true, false or an integer code, got '{s}'"),
                })
                .map(Self::Raw)
                .and_then(Self::validate),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn outlet_index_rejects_zero() {
        assert!(OutletIndex::new(0).is_none());
        assert!(matches!(
            OutletIndex::try_from(0),
            Err(CoreError::Validation { .. })
        ));
        assert_eq!("14".parse::<OutletIndex>().unwrap().get(), 14);
        assert!("-1".parse::<OutletIndex>().is_err());
    }

    #[test]
    fn bool_maps_to_on_off_codes() {
        assert_eq!(PowerCommand::from(true).code(), 1);
        assert_eq!(PowerCommand::from(false).code(), 2);
        assert_eq!(PowerCommand::from(3).code(), 3);
    }

    #[test]
    fn command_parsing() {
        assert_eq!("ON".parse::<PowerCommand>().unwrap(), PowerCommand::On);
        assert_eq!("false".parse::<PowerCommand>().unwrap(), PowerCommand::Off);
        assert_eq!("5".parse::<PowerCommand>().unwrap(), PowerCommand::Raw(5));
        assert!(matches!(
            "toggle".parse::<PowerCommand>(),
            Err(CoreError::Validation { .. })
        ));
        assert!(matches!(
            "-2".parse::<PowerCommand>(),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn power_state_keeps_extended_codes() {
        let state = PowerState::from_code(7);
        assert!(!state.is_on() && !state.is_off());
        assert_eq!(state.to_string(), "reboot-with-delay");
        assert_eq!(PowerState::from_code(42).to_string(), "state 42");
    }
}
