//! Logical modules
//!
//! The module set is closed: it is fixed when a `Vlog` context is built and
//! never grows afterwards. Identities are dense indices in declaration order,
//! so applications can name them as constants:
//!
//! ```rust
//! use vlog::Module;
//!
//! const NETDEV: Module = Module::from_raw(0);
//! const OFPROTO: Module = Module::from_raw(1);
//! # let _ = (NETDEV, OFPROTO);
//! ```

use std::fmt;

use crate::core::{VlogError, VlogResult};
use crate::facility::{Facility, Selector};
use crate::level::Severity;

/// Identity of a registered module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Module(u16);

impl Module {
    /// Module at `index` in the registry's declaration order
    pub const fn from_raw(index: u16) -> Self {
        Self(index)
    }

    /// Declaration-order index
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module#{}", self.0)
    }
}

/// Closed set of module names
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    names: Vec<Box<str>>,
}

impl ModuleRegistry {
    /// Build a registry from names in declaration order
    ///
    /// # Errors
    ///
    /// [`VlogError::EmptyModuleName`] for an empty name,
    /// [`VlogError::DuplicateModule`] when two names collide case-insensitively,
    /// [`VlogError::Config`] for a name that level specs read as a level or
    /// facility (`file`, `info`, `any`, ...) and when there are more than
    /// `u16::MAX` modules.
    pub fn new<I, S>(names: I) -> VlogResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::default();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(VlogError::EmptyModuleName);
            }
            if is_reserved(name) {
                return Err(VlogError::Config(format!(
                    "module name `{name}` is reserved for a level or facility"
                )));
            }
            if registry.lookup(name).is_some() {
                return Err(VlogError::DuplicateModule(name.to_string()));
            }
            if registry.names.len() >= usize::from(u16::MAX) {
                return Err(VlogError::Config("too many log modules".to_string()));
            }
            registry.names.push(name.into());
        }
        Ok(registry)
    }

    /// Case-insensitive lookup, `None` when the name is not registered
    pub fn lookup(&self, name: &str) -> Option<Module> {
        self.names
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(name))
            .map(|index| Module(index as u16))
    }

    /// Name of a registered module
    ///
    /// Panics when `module` is not part of this registry.
    pub fn name(&self, module: Module) -> &str {
        self.check(module);
        &self.names[module.index()]
    }

    /// Number of registered modules
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no module is registered
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Every registered module in declaration order
    pub fn iter(&self) -> impl Iterator<Item = Module> + '_ {
        (0..self.names.len()).map(|index| Module(index as u16))
    }

    /// Assert that `module` belongs to this registry
    #[inline(always)]
    pub(crate) fn check(&self, module: Module) {
        assert!(
            module.index() < self.names.len(),
            "log module {module} is outside the registry ({} modules)",
            self.names.len()
        );
    }
}

/// Words a level spec never reads as a module
fn is_reserved(name: &str) -> bool {
    Severity::from_name(name).is_some() || Selector::<Facility>::parse(name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order_indices() {
        let registry = ModuleRegistry::new(["netdev", "ofproto", "bridge"]).unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.lookup("ofproto"), Some(Module::from_raw(1)));
        assert_eq!(registry.name(Module::from_raw(2)), "bridge");
        assert_eq!(registry.iter().count(), 3);
    }

    #[test]
    fn test_lookup_ignores_case() {
        let registry = ModuleRegistry::new(["NetDev"]).unwrap();
        assert_eq!(registry.lookup("netdev"), Some(Module::from_raw(0)));
        assert_eq!(registry.lookup("NETDEV"), Some(Module::from_raw(0)));
        assert_eq!(registry.lookup("bridge"), None);
    }

    #[test]
    fn test_rejects_duplicates_and_empty_names() {
        assert!(matches!(
            ModuleRegistry::new(["a", "A"]),
            Err(VlogError::DuplicateModule(name)) if name == "A"
        ));
        assert!(matches!(
            ModuleRegistry::new(["a", "  "]),
            Err(VlogError::EmptyModuleName)
        ));
    }

    #[test]
    fn test_rejects_reserved_names() {
        for name in ["file", "Console", "syslog", "any", "info", "DBG", "warning", "off"] {
            assert!(
                matches!(
                    ModuleRegistry::new(["netdev", name]),
                    Err(VlogError::Config(reason)) if reason.contains("reserved")
                ),
                "{name} should be rejected"
            );
        }
        assert!(ModuleRegistry::new(["filesystem", "information"]).is_ok());
    }

    #[test]
    #[should_panic(expected = "outside the registry")]
    fn test_foreign_module_panics() {
        let registry = ModuleRegistry::new(["only"]).unwrap();
        let _ = registry.name(Module::from_raw(5));
    }
}
