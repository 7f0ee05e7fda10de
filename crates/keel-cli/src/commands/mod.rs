//! Subcommand implementations.

pub(crate) mod check;
pub(crate) mod inspect;

use std::path::{Path, PathBuf};

use keel_modules::{Descriptor, descriptor_location, try_load_descriptor};
use serde_json::json;
use tracing::warn;

/// Outcome of reading one module path.
#[derive(Debug)]
pub(crate) enum Loaded {
    /// The module's descriptor is valid.
    Valid(Descriptor),
    /// The file could not be read or describes an invalid module.
    Invalid {
        /// The `module.desc` that was read.
        file: PathBuf,
        /// Why it was rejected.
        reason: String,
    },
}

impl Loaded {
    pub(crate) fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Valid(descriptor) => json!({ "valid": true, "descriptor": descriptor }),
            Self::Invalid { file, reason } => json!({
                "valid": false,
                "file": file.display().to_string(),
                "reason": reason,
            }),
        }
    }
}

/// Read the module at `path`, keeping the reason when it is rejected.
pub(crate) fn load(path: &Path) -> Loaded {
    let (file, _) = descriptor_location(path);
    let reason = match try_load_descriptor(path) {
        Ok(Ok(descriptor)) => return Loaded::Valid(descriptor),
        Ok(Err(e)) => {
            warn!(path = %file.display(), error = %e, "Invalid module descriptor");
            e.to_string()
        },
        Err(e) => {
            warn!(path = %file.display(), error = %e, "Failed to read module descriptor");
            e.to_string()
        },
    };
    Loaded::Invalid { file, reason }
}
