//! Output facilities and write-side selectors

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::VlogError;

/// Output destination category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Facility {
    /// Standard error (or standard output, see `ConsoleTarget`)
    Console = 0,
    /// Local system log socket
    Syslog = 1,
    /// Log file configured with `Vlog::set_log_file`
    File = 2,
}

impl Facility {
    /// Number of concrete facilities
    pub const COUNT: usize = 3;

    /// All facilities in dispatch order
    pub const ALL: [Facility; Self::COUNT] = [Facility::Console, Facility::Syslog, Facility::File];

    /// Lower-case facility name
    pub const fn name(self) -> &'static str {
        match self {
            Facility::Console => "console",
            Facility::Syslog => "syslog",
            Facility::File => "file",
        }
    }

    /// Case-insensitive lookup by name, `None` when nothing matches
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|facility| facility.name().eq_ignore_ascii_case(name))
    }

    /// Position in per-module threshold rows
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Facility {
    type Err = VlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| VlogError::UnknownFacility(s.to_string()))
    }
}

/// Write-side selector: every value, or one concrete value
///
/// Used by `Vlog::set_levels` for both the module and the facility axis. A
/// selector is never a call-site identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selector<T> {
    /// Fan out to every concrete value
    Any,
    /// Exactly this value
    One(T),
}

impl<T> Selector<T> {
    /// Whether the selector covers `value`
    pub fn matches(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        match self {
            Selector::Any => true,
            Selector::One(selected) => selected == value,
        }
    }

    /// Map the concrete value, keeping `Any`
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Selector<U> {
        match self {
            Selector::Any => Selector::Any,
            Selector::One(value) => Selector::One(f(value)),
        }
    }
}

impl<T> From<T> for Selector<T> {
    fn from(value: T) -> Self {
        Selector::One(value)
    }
}

impl Selector<Facility> {
    /// Parse `any` or a facility name
    pub fn parse(s: &str) -> Result<Self, VlogError> {
        if s.eq_ignore_ascii_case("any") {
            Ok(Selector::Any)
        } else {
            s.parse().map(Selector::One)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Any => f.write_str("any"),
            Selector::One(value) => value.fmt(f),
        }
    }
}
