//! Module registry.
//!
//! Holds the valid descriptors of one installer run, keyed by name, and
//! reports requirements that name unregistered modules. Ordering and cycle
//! handling of `requiredModules` belong to the scheduler, not here.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::descriptor::Descriptor;
use crate::error::{RegistryError, RegistryResult};

/// A `requiredModules` entry that names no registered module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmetRequirement {
    /// The module declaring the requirement.
    pub module: String,
    /// The name it requires.
    pub required: String,
}

impl From<UnmetRequirement> for RegistryError {
    fn from(unmet: UnmetRequirement) -> Self {
        Self::MissingRequirement {
            module: unmet.module,
            required: unmet.required,
        }
    }
}

/// Registry of module descriptors for one run.
///
/// Iteration follows registration order.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    modules: Vec<Descriptor>,
    by_name: HashMap<String, usize>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidDescriptor`] for the invalid
    /// sentinel and [`RegistryError::AlreadyRegistered`] if a module with
    /// the same name is already present.
    pub fn register(&mut self, descriptor: Descriptor) -> RegistryResult<()> {
        if !descriptor.is_valid() {
            return Err(RegistryError::InvalidDescriptor {
                directory: descriptor.directory().to_path_buf(),
            });
        }
        if self.by_name.contains_key(descriptor.name()) {
            return Err(RegistryError::AlreadyRegistered(descriptor.name().to_owned()));
        }

        info!(
            module = %descriptor.name(),
            module_type = %descriptor.module_type(),
            interface = %descriptor.interface(),
            "Registered module"
        );
        self.by_name
            .insert(descriptor.name().to_owned(), self.modules.len());
        self.modules.push(descriptor);
        Ok(())
    }

    /// Look up a module by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Descriptor> {
        self.by_name.get(name).and_then(|&i| self.modules.get(i))
    }

    /// Whether a module with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of registered modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Registered descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.modules.iter()
    }

    /// All requirements naming unregistered modules.
    ///
    /// Reported in registration order, once per module and missing name
    /// even if the name is listed more than once.
    #[must_use]
    pub fn missing_requirements(&self) -> Vec<UnmetRequirement> {
        let mut unmet = Vec::new();
        for module in &self.modules {
            let mut seen = HashSet::new();
            for required in module.required_modules() {
                if !self.contains(required) && seen.insert(required.as_str()) {
                    debug!(
                        module = %module.name(),
                        required = %required,
                        "Unmet module requirement"
                    );
                    unmet.push(UnmetRequirement {
                        module: module.name().to_owned(),
                        required: required.clone(),
                    });
                }
            }
        }
        unmet
    }

    /// Check that every requirement names a registered module.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingRequirement`] for the first unmet
    /// requirement.
    pub fn check_requirements(&self) -> RegistryResult<()> {
        match self.missing_requirements().into_iter().next() {
            Some(unmet) => Err(unmet.into()),
            None => Ok(()),
        }
    }
}

impl<'a> IntoIterator for &'a ModuleRegistry {
    type Item = &'a Descriptor;
    type IntoIter = std::slice::Iter<'a, Descriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::factory::DescriptorData;

    fn descriptor(name: &str, required: &[&str]) -> Descriptor {
        let mut data: DescriptorData =
            serde_yaml::from_str("interface: qtplugin\nload: plugin\n").unwrap();
        data.insert("name".into(), name.into());
        data.insert(
            "requiredModules".into(),
            serde_yaml::to_value(required).unwrap(),
        );
        Descriptor::from_descriptor_data(&data, Some(Path::new("/modules")))
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ModuleRegistry::new();
        assert!(registry.is_empty());
        registry.register(descriptor("welcome", &[])).unwrap();
        registry.register(descriptor("locale", &[])).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("welcome"));
        assert_eq!(registry.get("locale").unwrap().name(), "locale");
        assert!(registry.get("users").is_none());

        let names: Vec<_> = registry.iter().map(Descriptor::name).collect();
        assert_eq!(names, ["welcome", "locale"]);
    }

    #[test]
    fn test_rejects_invalid_descriptor() {
        let mut registry = ModuleRegistry::new();
        let err = registry.register(Descriptor::default()).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidDescriptor { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_rejects_duplicate_name() {
        let mut registry = ModuleRegistry::new();
        registry.register(descriptor("users", &[])).unwrap();
        let err = registry.register(descriptor("users", &[])).unwrap_err();
        assert_eq!(err, RegistryError::AlreadyRegistered("users".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_missing_requirements() {
        let mut registry = ModuleRegistry::new();
        registry.register(descriptor("welcome", &[])).unwrap();
        registry
            .register(descriptor("partition", &["welcome", "locale", "locale"]))
            .unwrap();
        registry.register(descriptor("users", &["keyboard"])).unwrap();

        let unmet = registry.missing_requirements();
        assert_eq!(
            unmet,
            [
                UnmetRequirement {
                    module: "partition".into(),
                    required: "locale".into(),
                },
                UnmetRequirement {
                    module: "users".into(),
                    required: "keyboard".into(),
                },
            ]
        );
        assert_eq!(
            registry.check_requirements().unwrap_err(),
            RegistryError::MissingRequirement {
                module: "partition".into(),
                required: "locale".into(),
            }
        );
    }

    #[test]
    fn test_requirements_satisfied_regardless_of_order() {
        let mut registry = ModuleRegistry::new();
        registry.register(descriptor("summary", &["users"])).unwrap();
        registry.register(descriptor("users", &[])).unwrap();
        assert!(registry.missing_requirements().is_empty());
        assert!(registry.check_requirements().is_ok());
    }
}
