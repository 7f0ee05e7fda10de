//! Reading a single `module.desc` file from disk.
//!
//! Finding module directories is the caller's job; this only reads the
//! file it is pointed at.

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use tracing::{debug, warn};

use crate::descriptor::Descriptor;
use crate::error::{DescriptorResult, LoadError, LoadResult};
use crate::factory::DescriptorData;

/// Standard descriptor file name inside a module directory.
pub const DESCRIPTOR_FILE_NAME: &str = "module.desc";

/// Split `path` into the descriptor file and the module directory.
///
/// `path` may name the module directory or the descriptor file itself.
#[must_use]
pub fn descriptor_location(path: &Path) -> (PathBuf, PathBuf) {
    if path.is_dir() {
        return (path.join(DESCRIPTOR_FILE_NAME), path.to_path_buf());
    }
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    (path.to_path_buf(), directory)
}

/// Read and parse a descriptor file into a raw record.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file cannot be read, is not YAML, or
/// its top-level document is not a mapping.
pub fn read_descriptor_data(path: &Path) -> LoadResult<DescriptorData> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value = serde_yaml::from_str(&content).map_err(|source| LoadError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Mapping(data) => Ok(data),
        _ => Err(LoadError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Load the descriptor for one module, keeping the rejection reason.
///
/// The outer result reports file problems; the inner one reports a file
/// that parses but describes an invalid module. The module directory
/// becomes the descriptor's directory.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file cannot be read or parsed.
pub fn try_load_descriptor(path: &Path) -> LoadResult<DescriptorResult<Descriptor>> {
    let (file, directory) = descriptor_location(path);
    let data = read_descriptor_data(&file)?;

    let descriptor = Descriptor::try_from_descriptor_data(&data, Some(&directory));
    if let Ok(descriptor) = &descriptor {
        debug!(
            path = %file.display(),
            module = %descriptor.name(),
            "Loaded module descriptor"
        );
    }
    Ok(descriptor)
}

/// Load the descriptor for one module.
///
/// A file that parses but describes an invalid module yields an invalid
/// descriptor, not an error; a warning names the offending file.
///
/// # Errors
///
/// Returns a [`LoadError`] if the file cannot be read or parsed.
pub fn load_descriptor(path: &Path) -> LoadResult<Descriptor> {
    match try_load_descriptor(path)? {
        Ok(descriptor) => Ok(descriptor),
        Err(e) => {
            let (file, _) = descriptor_location(path);
            warn!(path = %file.display(), error = %e, "Invalid module descriptor");
            Ok(Descriptor::default())
        },
    }
}
