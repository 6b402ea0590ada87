//! Threshold specs: `[module:][facility:]level`
//!
//! A spec is a colon-separated list of words, each classified by what it
//! names: a severity, a facility (or `any`), otherwise a module. Exactly one
//! severity is required; a missing facility or module means "every one".
//!
//! | spec | effect |
//! |---|---|
//! | `info` | every module, every facility |
//! | `console:warn` | every module, console only |
//! | `netdev:dbg` | `netdev`, every facility |
//! | `netdev:file:dbg` | `netdev`, file only |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::VlogError;
use crate::facility::{Facility, Selector};
use crate::level::Severity;

/// Parsed threshold assignment
///
/// The module stays a name until it is applied to a context, which resolves
/// it against its registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LevelSpec {
    /// Module name, or every module
    pub module: Selector<String>,
    /// Facility, or every facility
    pub facility: Selector<Facility>,
    /// Threshold to assign
    pub level: Severity,
}

impl LevelSpec {
    /// Assign `level` to every module on every facility
    pub const fn everywhere(level: Severity) -> Self {
        Self {
            module: Selector::Any,
            facility: Selector::Any,
            level,
        }
    }

    /// Parse a comma-separated list of specs, skipping empty entries
    pub fn parse_list(list: &str) -> Result<Vec<Self>, VlogError> {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl FromStr for LevelSpec {
    type Err = VlogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| VlogError::InvalidLevelSpec {
            spec: s.to_string(),
            reason: reason.to_string(),
        };

        let mut module = None;
        let mut facility = None;
        let mut level = None;

        for word in s.trim().split(':').map(str::trim) {
            if word.is_empty() {
                return Err(invalid("empty word"));
            }
            if let Some(parsed) = Severity::from_name(word) {
                if level.replace(parsed).is_some() {
                    return Err(invalid("more than one level"));
                }
            } else if let Ok(parsed) = Selector::<Facility>::parse(word) {
                if facility.replace(parsed).is_some() {
                    return Err(invalid("more than one facility"));
                }
            } else if module.replace(word.to_string()).is_some() {
                return Err(invalid("more than one module, or an unknown level"));
            }
        }

        Ok(Self {
            module: module.map_or(Selector::Any, Selector::One),
            facility: facility.unwrap_or(Selector::Any),
            level: level.ok_or_else(|| invalid("missing level"))?,
        })
    }
}

impl fmt::Display for LevelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Selector::One(module) = &self.module {
            write!(f, "{module}:")?;
        }
        write!(f, "{}:{}", self.facility, self.level.name().to_ascii_lowercase())
    }
}

impl TryFrom<String> for LevelSpec {
    type Error = VlogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LevelSpec> for String {
    fn from(spec: LevelSpec) -> Self {
        spec.to_string()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("info", Selector::Any, Selector::Any, Severity::Info)]
    #[case("console:warn", Selector::Any, Selector::One(Facility::Console), Severity::Warn)]
    #[case("netdev:dbg", Selector::One("netdev"), Selector::Any, Severity::Dbg)]
    #[case("netdev:file:dbg", Selector::One("netdev"), Selector::One(Facility::File), Severity::Dbg)]
    #[case("DBG:File:netdev", Selector::One("netdev"), Selector::One(Facility::File), Severity::Dbg)]
    #[case("any:off", Selector::Any, Selector::Any, Severity::Off)]
    #[case(" bridge : syslog : error ", Selector::One("bridge"), Selector::One(Facility::Syslog), Severity::Err)]
    fn test_parse(
        #[case] input: &str,
        #[case] module: Selector<&str>,
        #[case] facility: Selector<Facility>,
        #[case] level: Severity,
    ) {
        let spec: LevelSpec = input.parse().unwrap();
        assert_eq!(spec.module, module.map(str::to_string));
        assert_eq!(spec.facility, facility);
        assert_eq!(spec.level, level);
    }

    #[rstest]
    #[case("")]
    #[case("netdev")]
    #[case("netdev:file")]
    #[case("info:warn")]
    #[case("console:file:info")]
    #[case("netdev:bridge:info")]
    #[case("netdev::info")]
    fn test_parse_rejects(#[case] input: &str) {
        assert!(matches!(
            input.parse::<LevelSpec>(),
            Err(VlogError::InvalidLevelSpec { .. })
        ));
    }

    #[test]
    fn test_display_is_canonical() {
        let spec: LevelSpec = "DBG:netdev".parse().unwrap();
        assert_eq!(spec.to_string(), "netdev:any:dbg");
        assert_eq!(spec.to_string().parse::<LevelSpec>().unwrap(), spec);
        assert_eq!(LevelSpec::everywhere(Severity::Warn).to_string(), "any:warn");
    }

    #[test]
    fn test_parse_list() {
        let specs = LevelSpec::parse_list("info, netdev:file:dbg,,console:off").unwrap();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[1].level, Severity::Dbg);
        assert!(LevelSpec::parse_list("info,bogus:spec").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let spec: LevelSpec = "netdev:file:dbg".parse().unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#""netdev:file:dbg""#);
        assert_eq!(serde_json::from_str::<LevelSpec>(&json).unwrap(), spec);
    }
}
