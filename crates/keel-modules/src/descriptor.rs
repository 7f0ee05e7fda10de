//! The validated, immutable view of one module's `module.desc`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{DescriptorError, DescriptorResult};
use crate::factory::{DEFAULT_TIMEOUT_SECS, keys};
use crate::module_type::{Interface, ModuleType};

/// Fields that only exist for one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InterfaceSettings {
    /// Held by invalid descriptors.
    Unset,
    NativePlugin {
        load: String,
    },
    Scripted {
        script: String,
    },
    ProcessCommand {
        command: String,
        timeout_secs: u32,
        chroot: bool,
    },
    ScriptedView,
}

/// Metadata for one installer module.
///
/// Built by [`Descriptor::from_descriptor_data`]. A descriptor is either
/// valid, in which case every accessor is meaningful, or the invalid
/// sentinel returned by [`Descriptor::default`] and by a failed parse.
/// Check [`is_valid`](Self::is_valid) before acting on anything else.
///
/// Only the directory can change after construction, and only once; see
/// [`set_directory`](Self::set_directory).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub(crate) valid: bool,
    pub(crate) name: String,
    pub(crate) module_type: ModuleType,
    pub(crate) interface: Interface,
    pub(crate) is_emergency: bool,
    pub(crate) has_config: bool,
    pub(crate) directory: PathBuf,
    pub(crate) required_modules: Vec<String>,
    pub(crate) settings: InterfaceSettings,
}

impl Default for Descriptor {
    /// An invalid, empty descriptor.
    fn default() -> Self {
        Self {
            valid: false,
            name: String::new(),
            module_type: ModuleType::Job,
            interface: Interface::NativePlugin,
            is_emergency: false,
            has_config: true,
            directory: PathBuf::new(),
            required_modules: Vec::new(),
            settings: InterfaceSettings::Unset,
        }
    }
}

impl Descriptor {
    /// Whether every check passed while building this descriptor.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The module's name, unique within one run.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Job or view.
    #[must_use]
    pub fn module_type(&self) -> ModuleType {
        self.module_type
    }

    /// How the module is invoked; decides which loader handles it.
    #[must_use]
    pub fn interface(&self) -> Interface {
        self.interface
    }

    /// Whether the job must run even after the installation has failed.
    #[must_use]
    pub fn is_emergency(&self) -> bool {
        self.is_emergency
    }

    /// Whether a per-instance configuration file is expected.
    #[must_use]
    pub fn has_config(&self) -> bool {
        self.has_config
    }

    /// The directory containing the module's `module.desc`.
    ///
    /// Relative paths in the descriptor are resolved against it. Empty when
    /// no directory has been supplied yet.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Supply the directory when it was not known at parse time.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::DirectoryAlreadySet`] if the descriptor
    /// already has a directory. The existing value is kept.
    pub fn set_directory(&mut self, directory: impl Into<PathBuf>) -> DescriptorResult<()> {
        if !self.directory.as_os_str().is_empty() {
            return Err(DescriptorError::DirectoryAlreadySet(self.directory.clone()));
        }
        self.directory = directory.into();
        Ok(())
    }

    /// Names of modules that must be loaded (and, for jobs, succeed) first.
    ///
    /// Order and duplicates are exactly as written in the configuration.
    #[must_use]
    pub fn required_modules(&self) -> &[String] {
        &self.required_modules
    }

    /// Short name of the shared library, without extension.
    ///
    /// Only set for [`Interface::NativePlugin`].
    #[must_use]
    pub fn load(&self) -> Option<&str> {
        match &self.settings {
            InterfaceSettings::NativePlugin { load } => Some(load),
            _ => None,
        }
    }

    /// The command passed to the shell.
    ///
    /// Only set for [`Interface::ProcessCommand`].
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        match &self.settings {
            InterfaceSettings::ProcessCommand { command, .. } => Some(command),
            _ => None,
        }
    }

    /// Command timeout in seconds; 30 unless configured.
    #[must_use]
    pub fn timeout_seconds(&self) -> u32 {
        match &self.settings {
            InterfaceSettings::ProcessCommand { timeout_secs, .. } => *timeout_secs,
            _ => DEFAULT_TIMEOUT_SECS,
        }
    }

    /// [`timeout_seconds`](Self::timeout_seconds) as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_seconds()))
    }

    /// Whether the command runs inside the target system rather than the host.
    #[must_use]
    pub fn chroot(&self) -> bool {
        match &self.settings {
            InterfaceSettings::ProcessCommand { chroot, .. } => *chroot,
            _ => false,
        }
    }

    /// Entry script as written in the descriptor.
    ///
    /// Only set for [`Interface::Scripted`].
    #[must_use]
    pub fn script(&self) -> Option<&str> {
        match &self.settings {
            InterfaceSettings::Scripted { script } => Some(script),
            _ => None,
        }
    }

    /// Entry script resolved against [`directory`](Self::directory).
    #[must_use]
    pub fn script_path(&self) -> Option<PathBuf> {
        self.script().map(|script| self.directory.join(script))
    }
}

/// Serializes with the `module.desc` vocabulary, plus `directory`.
impl Serialize for Descriptor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(keys::NAME, &self.name)?;
        map.serialize_entry(keys::TYPE, &self.module_type)?;
        map.serialize_entry(keys::INTERFACE, &self.interface)?;
        match &self.settings {
            InterfaceSettings::NativePlugin { load } => {
                map.serialize_entry(keys::LOAD, load)?;
            },
            InterfaceSettings::Scripted { script } => {
                map.serialize_entry(keys::SCRIPT, script)?;
            },
            InterfaceSettings::ProcessCommand {
                command,
                timeout_secs,
                chroot,
            } => {
                map.serialize_entry(keys::COMMAND, command)?;
                map.serialize_entry(keys::TIMEOUT, timeout_secs)?;
                map.serialize_entry(keys::CHROOT, chroot)?;
            },
            InterfaceSettings::Unset | InterfaceSettings::ScriptedView => {},
        }
        map.serialize_entry(keys::EMERGENCY, &self.is_emergency)?;
        map.serialize_entry(keys::NO_CONFIG, &!self.has_config)?;
        map.serialize_entry(keys::REQUIRED_MODULES, &self.required_modules)?;
        map.serialize_entry("directory", &self.directory.to_string_lossy())?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process_descriptor() -> Descriptor {
        Descriptor {
            valid: true,
            name: "dummyprocess".into(),
            module_type: ModuleType::Job,
            interface: Interface::ProcessCommand,
            is_emergency: false,
            has_config: false,
            directory: PathBuf::from("/usr/lib/keel/modules/dummyprocess"),
            required_modules: vec![],
            settings: InterfaceSettings::ProcessCommand {
                command: "/bin/sh -c \"touch ~/keel-dummy\"".into(),
                timeout_secs: 5,
                chroot: true,
            },
        }
    }

    #[test]
    fn test_default_is_invalid() {
        let d = Descriptor::default();
        assert!(!d.is_valid());
        assert!(d.name().is_empty());
        assert!(d.has_config());
        assert!(d.load().is_none());
        assert!(d.script().is_none());
        assert!(d.command().is_none());
        assert_eq!(d.timeout_seconds(), 30);
        assert!(!d.chroot());
    }

    #[test]
    fn test_process_accessors() {
        let d = process_descriptor();
        assert_eq!(d.command(), Some("/bin/sh -c \"touch ~/keel-dummy\""));
        assert_eq!(d.timeout_seconds(), 5);
        assert_eq!(d.timeout(), Duration::from_secs(5));
        assert!(d.chroot());
        assert!(d.load().is_none());
        assert!(d.script_path().is_none());
    }

    #[test]
    fn test_set_directory_once() {
        let mut d = Descriptor::default();
        d.set_directory("/a/b").unwrap();
        assert_eq!(d.directory(), Path::new("/a/b"));

        let err = d.set_directory("/c").unwrap_err();
        assert_eq!(err, DescriptorError::DirectoryAlreadySet(PathBuf::from("/a/b")));
        assert_eq!(d.directory(), Path::new("/a/b"));
    }

    #[test]
    fn test_set_directory_rejected_when_parsed_with_one() {
        let mut d = process_descriptor();
        assert!(d.set_directory("/elsewhere").is_err());
    }

    #[test]
    fn test_script_path_resolves_against_directory() {
        let d = Descriptor {
            valid: true,
            name: "bootloader".into(),
            interface: Interface::Scripted,
            directory: PathBuf::from("/a/b"),
            settings: InterfaceSettings::Scripted {
                script: "main.py".into(),
            },
            ..Descriptor::default()
        };
        assert_eq!(d.script(), Some("main.py"));
        assert_eq!(d.script_path(), Some(PathBuf::from("/a/b/main.py")));
    }

    #[test]
    fn test_serialize_uses_descriptor_keys() {
        let json = serde_json::to_value(process_descriptor()).unwrap();
        assert_eq!(json["name"], "dummyprocess");
        assert_eq!(json["type"], "job");
        assert_eq!(json["interface"], "process");
        assert_eq!(json["timeout"], 5);
        assert_eq!(json["chroot"], true);
        assert_eq!(json["noconfig"], true);
        assert_eq!(json["directory"], "/usr/lib/keel/modules/dummyprocess");
        assert!(json.get("load").is_none());
        assert!(json.get("script").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_serialize_non_utf8_directory() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut d = process_descriptor();
        d.directory = PathBuf::from(OsStr::from_bytes(b"/tmp/mod\xff"));

        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["directory"], "/tmp/mod\u{fffd}");
        assert_eq!(json["name"], "dummyprocess");
    }

    #[test]
    fn test_descriptor_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Descriptor>();
        assert_send_sync::<crate::named_enum::NamedEnumTable<Interface>>();
        assert_send_sync::<crate::named_enum::NamedEnumTable<ModuleType>>();
    }

    #[test]
    fn test_descriptors_built_on_several_threads() {
        let handles: Vec<_> = ["welcome", "locale", "users"]
            .into_iter()
            .map(|name| {
                std::thread::spawn(move || {
                    let data: crate::factory::DescriptorData = serde_yaml::from_str(&format!(
                        "name: {name}\ntype: view\ninterface: qtplugin\nload: {name}\n"
                    ))
                    .unwrap();
                    Descriptor::from_descriptor_data(&data, None)
                })
            })
            .collect();

        for (handle, name) in handles.into_iter().zip(["welcome", "locale", "users"]) {
            let d = handle.join().unwrap();
            assert!(d.is_valid());
            assert_eq!(d.name(), name);
            assert_eq!(d.interface().to_string(), "qtplugin");
        }
    }
}
