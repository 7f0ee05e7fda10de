//! Prelude module - commonly used types for convenient import.
//!
//! Use `use keel_modules::prelude::*;` to import all essential types.

// Errors
pub use crate::{DescriptorError, DescriptorResult, LoadError, LoadResult, RegistryError};

// Descriptors
pub use crate::{Descriptor, DescriptorData, Interface, ModuleType};

// Name tables
pub use crate::{INTERFACE_NAMES, NamedEnum, TYPE_NAMES};

// Loading and registration
pub use crate::{ModuleRegistry, load_descriptor, try_load_descriptor};
