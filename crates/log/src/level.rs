//! Severity levels
//!
//! Lower numeric value means more severe. A message passes a threshold when it
//! is at least as severe as the threshold, i.e. `message <= threshold`
//! numerically. [`Severity::Off`] is only meaningful as a threshold.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::VlogError;

/// Log severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Severity {
    /// Threshold that lets nothing through
    Off = 0,
    /// System is unusable
    Emer = 1,
    /// Error conditions
    Err = 2,
    /// Warning conditions
    Warn = 3,
    /// Informational messages
    Info = 4,
    /// Debug-level messages
    Dbg = 5,
}

impl Severity {
    /// Number of severities, `Off` included
    pub const COUNT: usize = 6;

    /// All severities from most to least severe
    pub const ALL: [Severity; Self::COUNT] = [
        Severity::Off,
        Severity::Emer,
        Severity::Err,
        Severity::Warn,
        Severity::Info,
        Severity::Dbg,
    ];

    /// Severities a message can actually carry
    pub const MESSAGE_LEVELS: [Severity; Self::COUNT - 1] = [
        Severity::Emer,
        Severity::Err,
        Severity::Warn,
        Severity::Info,
        Severity::Dbg,
    ];

    /// Canonical upper-case name used in rendered lines
    pub const fn name(self) -> &'static str {
        match self {
            Severity::Off => "OFF",
            Severity::Emer => "EMER",
            Severity::Err => "ERR",
            Severity::Warn => "WARN",
            Severity::Info => "INFO",
            Severity::Dbg => "DBG",
        }
    }

    /// Case-insensitive lookup by name
    ///
    /// Accepts the canonical names plus `emergency`, `error`, `warning` and
    /// `debug`. Returns `None` when nothing matches.
    pub fn from_name(name: &str) -> Option<Self> {
        const ALIASES: [(&str, Severity); 4] = [
            ("emergency", Severity::Emer),
            ("error", Severity::Err),
            ("warning", Severity::Warn),
            ("debug", Severity::Dbg),
        ];

        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(name))
            .or_else(|| {
                ALIASES
                    .into_iter()
                    .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
                    .map(|(_, level)| level)
            })
    }

    /// Raw encoding stored in the gating tables
    #[inline(always)]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a raw table value
    pub const fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Severity::Off),
            1 => Some(Severity::Emer),
            2 => Some(Severity::Err),
            3 => Some(Severity::Warn),
            4 => Some(Severity::Info),
            5 => Some(Severity::Dbg),
            _ => None,
        }
    }

    /// Whether a message at `self` passes `threshold`
    #[inline(always)]
    pub const fn passes(self, threshold: Severity) -> bool {
        self as u8 <= threshold as u8
    }

    /// The less severe of two thresholds
    pub const fn least_severe(self, other: Severity) -> Severity {
        if self as u8 >= other as u8 { self } else { other }
    }

    /// syslog(3) priority (`LOG_EMERG` .. `LOG_DEBUG`)
    pub const fn syslog_priority(self) -> u8 {
        match self {
            Severity::Off | Severity::Emer => 0,
            Severity::Err => 3,
            Severity::Warn => 4,
            Severity::Info => 6,
            Severity::Dbg => 7,
        }
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Severity::Err,
            tracing::Level::WARN => Severity::Warn,
            tracing::Level::INFO => Severity::Info,
            _ => Severity::Dbg,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Severity {
    type Err = VlogError;

    fn from_str(s: &str) -> Result<Self, VlogError> {
        Self::from_name(s).ok_or_else(|| VlogError::UnknownLevel(s.to_string()))
    }
}
