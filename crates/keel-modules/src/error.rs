//! Error types for descriptor parsing, file loading, and the registry.

use std::path::PathBuf;

use thiserror::Error;

use crate::module_type::{Interface, ModuleType};

/// Why a configuration record did not produce a valid descriptor.
///
/// [`Descriptor::from_descriptor_data`](crate::Descriptor::from_descriptor_data)
/// collapses all of these into the invalid sentinel; they are only visible
/// through [`Descriptor::try_from_descriptor_data`](crate::Descriptor::try_from_descriptor_data).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// A required key is absent (or `null`).
    #[error("missing required key '{0}'")]
    MissingField(&'static str),

    /// A required string is empty or whitespace.
    #[error("key '{0}' must not be empty")]
    EmptyField(&'static str),

    /// A key holds a value of the wrong kind.
    #[error("key '{key}' must be {expected}")]
    WrongShape {
        /// The offending key.
        key: &'static str,
        /// What the key should have held.
        expected: &'static str,
    },

    /// `type` names no known module type.
    #[error("unknown module type '{0}'")]
    UnknownType(String),

    /// `interface` names no known interface.
    #[error("unknown module interface '{0}'")]
    UnknownInterface(String),

    /// The interface is not available for the module type.
    #[error("interface '{interface}' is not available for {module_type} modules")]
    IncompatibleInterface {
        /// Declared module type.
        module_type: ModuleType,
        /// Declared interface.
        interface: Interface,
    },

    /// `timeout` is zero, negative, or too large.
    #[error("timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(String),

    /// The directory of a descriptor can only be supplied once.
    #[error("descriptor directory is already set to {0}")]
    DirectoryAlreadySet(PathBuf),
}

/// Result type for descriptor construction.
pub type DescriptorResult<T> = Result<T, DescriptorError>;

/// Failure to read a descriptor file from disk.
///
/// A file that parses but describes an invalid module is *not* a load
/// error; it yields an invalid descriptor.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the descriptor file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML.
    #[error("failed to parse {path}: {source}")]
    Yaml {
        /// Path of the descriptor file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The YAML document is not a key-value mapping.
    #[error("{path} does not contain a mapping at the top level")]
    NotAMapping {
        /// Path of the descriptor file.
        path: PathBuf,
    },
}

/// Result type for descriptor file loading.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors from [`ModuleRegistry`](crate::ModuleRegistry) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Only valid descriptors can be registered.
    #[error("refusing to register invalid module descriptor from {directory}")]
    InvalidDescriptor {
        /// Directory of the rejected descriptor.
        directory: PathBuf,
    },

    /// A module with this name is already registered.
    #[error("module already registered: {0}")]
    AlreadyRegistered(String),

    /// A module names a requirement that is not registered.
    #[error("module '{module}' requires '{required}', which is not registered")]
    MissingRequirement {
        /// The module declaring the requirement.
        module: String,
        /// The missing module name.
        required: String,
    },
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
