//! Building descriptors from loosely-typed configuration records.
//!
//! The record is whatever the YAML parser produced for a `module.desc`
//! file. Every field is extracted with an explicit shape and default;
//! anything unexpected rejects the whole record. There is no partially
//! valid descriptor.

use std::path::Path;

use serde_yaml::Value;
use tracing::{debug, warn};

use crate::descriptor::{Descriptor, InterfaceSettings};
use crate::error::{DescriptorError, DescriptorResult};
use crate::module_type::{INTERFACE_NAMES, Interface, ModuleType, TYPE_NAMES};

/// A raw `module.desc` record.
pub type DescriptorData = serde_yaml::Mapping;

/// Timeout applied to process modules that do not set one.
pub const DEFAULT_TIMEOUT_SECS: u32 = 30;

/// Recognized keys of a `module.desc` record.
pub mod keys {
    /// Module name.
    pub const NAME: &str = "name";
    /// `job` or `view`.
    pub const TYPE: &str = "type";
    /// Interface name.
    pub const INTERFACE: &str = "interface";
    /// Emergency flag.
    pub const EMERGENCY: &str = "emergency";
    /// Set to `true` when the module has no configuration file.
    pub const NO_CONFIG: &str = "noconfig";
    /// Sequence of module names this module depends on.
    pub const REQUIRED_MODULES: &str = "requiredModules";
    /// Shared library short name (native plugins).
    pub const LOAD: &str = "load";
    /// Entry script (scripted jobs).
    pub const SCRIPT: &str = "script";
    /// Shell command (process jobs).
    pub const COMMAND: &str = "command";
    /// Command timeout in seconds (process jobs).
    pub const TIMEOUT: &str = "timeout";
    /// Run the command in the target root (process jobs).
    pub const CHROOT: &str = "chroot";
}

impl Descriptor {
    /// Build a descriptor from a configuration record.
    ///
    /// Never fails: a record that breaks any rule yields the invalid
    /// sentinel, and the reason is logged at `debug` level. Callers decide
    /// whether an invalid module is skipped or fatal.
    ///
    /// `directory` is the directory holding the `module.desc`; pass `None`
    /// and call [`set_directory`](Self::set_directory) later if it is not
    /// known yet.
    #[must_use]
    pub fn from_descriptor_data(data: &DescriptorData, directory: Option<&Path>) -> Self {
        match Self::try_from_descriptor_data(data, directory) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                debug!(
                    directory = %directory.unwrap_or(Path::new("")).display(),
                    error = %e,
                    "Rejected module descriptor"
                );
                Self::default()
            },
        }
    }

    /// Build a descriptor, reporting why the record was rejected.
    ///
    /// # Errors
    ///
    /// Returns the first [`DescriptorError`] encountered, in the order:
    /// name, type, interface, type/interface pair, interface-specific
    /// fields, optional fields.
    pub fn try_from_descriptor_data(
        data: &DescriptorData,
        directory: Option<&Path>,
    ) -> DescriptorResult<Self> {
        let name = required_string(data, keys::NAME)?;

        // Older descriptors predate `type`; they were all jobs.
        let module_type = match optional_string(data, keys::TYPE)? {
            None => ModuleType::Job,
            Some(raw) => TYPE_NAMES
                .find(raw)
                .ok_or_else(|| DescriptorError::UnknownType(raw.to_owned()))?,
        };

        let interface = match optional_string(data, keys::INTERFACE)? {
            None => return Err(DescriptorError::MissingField(keys::INTERFACE)),
            Some(raw) => INTERFACE_NAMES
                .find(raw)
                .ok_or_else(|| DescriptorError::UnknownInterface(raw.to_owned()))?,
        };

        if !module_type.supports(interface) {
            return Err(DescriptorError::IncompatibleInterface {
                module_type,
                interface,
            });
        }

        let settings = match interface {
            Interface::NativePlugin => InterfaceSettings::NativePlugin {
                load: required_string(data, keys::LOAD)?.to_owned(),
            },
            Interface::Scripted => InterfaceSettings::Scripted {
                script: required_string(data, keys::SCRIPT)?.to_owned(),
            },
            Interface::ProcessCommand => InterfaceSettings::ProcessCommand {
                command: required_string(data, keys::COMMAND)?.to_owned(),
                timeout_secs: optional_timeout(data)?.unwrap_or(DEFAULT_TIMEOUT_SECS),
                chroot: optional_bool(data, keys::CHROOT)?.unwrap_or(false),
            },
            Interface::ScriptedView => InterfaceSettings::ScriptedView,
        };

        let is_emergency = optional_bool(data, keys::EMERGENCY)?.unwrap_or(false);
        let has_config = !optional_bool(data, keys::NO_CONFIG)?.unwrap_or(false);
        let required_modules = optional_string_list(data, keys::REQUIRED_MODULES)?;

        if interface.is_deprecated() {
            warn!(
                module = %name,
                interface = %interface,
                "Module uses a deprecated interface"
            );
        }

        Ok(Self {
            valid: true,
            name: name.to_owned(),
            module_type,
            interface,
            is_emergency,
            has_config,
            directory: directory.map(Path::to_path_buf).unwrap_or_default(),
            required_modules,
            settings,
        })
    }
}

/// Look up `key`, treating an explicit `null` like a missing key.
fn lookup<'a>(data: &'a DescriptorData, key: &str) -> Option<&'a Value> {
    data.get(key).filter(|value| !value.is_null())
}

fn optional_string<'a>(
    data: &'a DescriptorData,
    key: &'static str,
) -> DescriptorResult<Option<&'a str>> {
    match lookup(data, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(DescriptorError::WrongShape {
            key,
            expected: "a string",
        }),
    }
}

fn required_string<'a>(
    data: &'a DescriptorData,
    key: &'static str,
) -> DescriptorResult<&'a str> {
    let value = optional_string(data, key)?.ok_or(DescriptorError::MissingField(key))?;
    if value.trim().is_empty() {
        return Err(DescriptorError::EmptyField(key));
    }
    Ok(value)
}

fn optional_bool(data: &DescriptorData, key: &'static str) -> DescriptorResult<Option<bool>> {
    match lookup(data, key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(DescriptorError::WrongShape {
            key,
            expected: "a boolean",
        }),
    }
}

fn optional_string_list(
    data: &DescriptorData,
    key: &'static str,
) -> DescriptorResult<Vec<String>> {
    let wrong_shape = DescriptorError::WrongShape {
        key,
        expected: "a list of strings",
    };
    match lookup(data, key) {
        None => Ok(Vec::new()),
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                _ => Err(wrong_shape.clone()),
            })
            .collect(),
        Some(_) => Err(wrong_shape),
    }
}

fn optional_timeout(data: &DescriptorData) -> DescriptorResult<Option<u32>> {
    let Some(value) = lookup(data, keys::TIMEOUT) else {
        return Ok(None);
    };
    let Value::Number(number) = value else {
        return Err(DescriptorError::WrongShape {
            key: keys::TIMEOUT,
            expected: "an integer",
        });
    };
    if number.is_f64() {
        return Err(DescriptorError::WrongShape {
            key: keys::TIMEOUT,
            expected: "an integer",
        });
    }
    match number.as_u64().and_then(|secs| u32::try_from(secs).ok()) {
        Some(secs) if secs > 0 => Ok(Some(secs)),
        _ => Err(DescriptorError::InvalidTimeout(number.to_string())),
    }
}
