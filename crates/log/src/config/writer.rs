//! Console writer configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::VlogError;

/// Stream the console facility writes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTarget {
    /// Write to stderr
    #[default]
    Stderr,
    /// Write to stdout
    Stdout,
}

impl ConsoleTarget {
    /// Lower-case stream name
    pub const fn name(self) -> &'static str {
        match self {
            ConsoleTarget::Stderr => "stderr",
            ConsoleTarget::Stdout => "stdout",
        }
    }
}

impl fmt::Display for ConsoleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConsoleTarget {
    type Err = VlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stderr" => Ok(ConsoleTarget::Stderr),
            "stdout" => Ok(ConsoleTarget::Stdout),
            _ => Err(VlogError::Config(format!("unknown console target '{s}'"))),
        }
    }
}
