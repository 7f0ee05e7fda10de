//! Keel Modules - Module descriptors for the Keel installer.
//!
//! Every installer module ships a `module.desc` file saying what it is and
//! how to run it. This crate turns that loosely-typed record into a
//! [`Descriptor`]: a validated, immutable value that loaders can dispatch
//! on without checking anything again.
//!
//! This crate provides:
//! - [`NamedEnumTable`]: the string vocabulary for enum-valued fields
//! - [`ModuleType`] and [`Interface`], and which pairs of them are legal
//! - [`Descriptor`] and [`Descriptor::from_descriptor_data`]
//! - Reading a single `module.desc` from disk ([`load_descriptor`])
//! - A [`ModuleRegistry`] that enforces unique names and reports unmet
//!   `requiredModules`
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//!
//! use keel_modules::prelude::*;
//!
//! let data: DescriptorData = serde_yaml::from_str(
//!     "name: welcome\ntype: view\ninterface: qtplugin\nload: welcome\n",
//! )
//! .unwrap();
//!
//! let directory = Path::new("/usr/lib/keel/modules/welcome");
//! let descriptor = Descriptor::from_descriptor_data(&data, Some(directory));
//! assert!(descriptor.is_valid());
//! assert_eq!(descriptor.module_type(), ModuleType::View);
//! assert_eq!(descriptor.load(), Some("welcome"));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

pub mod error;
pub mod factory;
pub mod loader;
pub mod module_type;
pub mod named_enum;
pub mod registry;

mod descriptor;

pub use descriptor::Descriptor;
pub use error::{
    DescriptorError, DescriptorResult, LoadError, LoadResult, RegistryError, RegistryResult,
};
pub use factory::{DEFAULT_TIMEOUT_SECS, DescriptorData, keys};
pub use loader::{
    DESCRIPTOR_FILE_NAME, descriptor_location, load_descriptor, read_descriptor_data,
    try_load_descriptor,
};
pub use module_type::{
    INTERFACE_NAMES, Interface, ModuleType, TYPE_NAMES, VALID_COMBINATIONS, is_valid_combination,
};
pub use named_enum::{NamedEnum, NamedEnumTable, UnknownName};
pub use registry::{ModuleRegistry, UnmetRequirement};
