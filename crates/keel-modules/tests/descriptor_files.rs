//! Loading `module.desc` files from module directories on disk.

use std::fs;
use std::path::{Path, PathBuf};

use keel_modules::prelude::*;
use keel_modules::{DESCRIPTOR_FILE_NAME, RegistryResult};

/// Write `contents` as `<root>/<name>/module.desc` and return the module directory.
fn write_module(root: &Path, name: &str, contents: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(DESCRIPTOR_FILE_NAME), contents).unwrap();
    dir
}

const WELCOME: &str = r"
type: view
name: welcome
interface: qtplugin
load: libkeel_viewmodule_welcome
";

const UNPACKFS: &str = r#"
---
type: "job"
name: "unpackfs"
interface: "python"
script: "main.py"
requiredModules:
  - partition
  - mount
"#;

const DUMMYPROCESS: &str = r#"
type: job
name: dummyprocess
interface: process
chroot: true
command: "/bin/sh -c \"touch ~/keel-dummyprocess\""
timeout: 5
noconfig: true
"#;

const PRESERVEFILES: &str = r"
type: job
name: preservefiles
interface: qtplugin
load: libkeel_job_preservefiles
emergency: true
";

const NOTESQML: &str = r"
type: view
name: notesqml
interface: pythonqt
";

#[test]
fn test_load_from_directory() {
    let root = tempfile::tempdir().unwrap();
    let dir = write_module(root.path(), "welcome", WELCOME);

    let d = load_descriptor(&dir).unwrap();
    assert!(d.is_valid());
    assert_eq!(d.name(), "welcome");
    assert_eq!(d.module_type(), ModuleType::View);
    assert_eq!(d.interface(), Interface::NativePlugin);
    assert_eq!(d.load(), Some("libkeel_viewmodule_welcome"));
    assert_eq!(d.directory(), dir);
}

#[test]
fn test_load_from_file_path() {
    let root = tempfile::tempdir().unwrap();
    let dir = write_module(root.path(), "unpackfs", UNPACKFS);

    let d = load_descriptor(&dir.join(DESCRIPTOR_FILE_NAME)).unwrap();
    assert!(d.is_valid());
    assert_eq!(d.interface(), Interface::Scripted);
    assert_eq!(d.directory(), dir);
    assert_eq!(d.script_path(), Some(dir.join("main.py")));
    assert_eq!(d.required_modules(), ["partition", "mount"]);
}

#[test]
fn test_process_module_file() {
    let root = tempfile::tempdir().unwrap();
    let dir = write_module(root.path(), "dummyprocess", DUMMYPROCESS);

    let d = load_descriptor(&dir).unwrap();
    assert!(d.is_valid());
    assert_eq!(d.command(), Some("/bin/sh -c \"touch ~/keel-dummyprocess\""));
    assert_eq!(d.timeout_seconds(), 5);
    assert!(d.chroot());
    assert!(!d.has_config());
}

#[test]
fn test_emergency_and_scripted_view_files() {
    let root = tempfile::tempdir().unwrap();
    let preserve = load_descriptor(&write_module(root.path(), "preservefiles", PRESERVEFILES))
        .unwrap();
    assert!(preserve.is_emergency());

    let notes = load_descriptor(&write_module(root.path(), "notesqml", NOTESQML)).unwrap();
    assert!(notes.is_valid());
    assert_eq!(notes.interface(), Interface::ScriptedView);
}

#[test]
fn test_invalid_module_is_not_a_load_error() {
    let root = tempfile::tempdir().unwrap();
    let dir = write_module(
        root.path(),
        "broken",
        "type: view\nname: broken\ninterface: process\ncommand: ls\n",
    );

    let d = load_descriptor(&dir).unwrap();
    assert!(!d.is_valid());
}

#[test]
fn test_detailed_reason_from_raw_data() {
    let root = tempfile::tempdir().unwrap();
    let dir = write_module(root.path(), "broken", "name: broken\ninterface: python\n");

    let data = keel_modules::read_descriptor_data(&dir.join(DESCRIPTOR_FILE_NAME)).unwrap();
    let err = Descriptor::try_from_descriptor_data(&data, Some(&dir)).unwrap_err();
    assert_eq!(err, DescriptorError::MissingField("script"));
}

#[test]
fn test_missing_descriptor_file() {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("empty");
    fs::create_dir_all(&dir).unwrap();

    let err = load_descriptor(&dir).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err.to_string().contains(DESCRIPTOR_FILE_NAME));
}

#[test]
fn test_registry_over_loaded_modules() -> RegistryResult<()> {
    let root = tempfile::tempdir().unwrap();
    let mut registry = ModuleRegistry::new();
    let mut skipped = 0_usize;

    for (name, contents) in [
        ("welcome", WELCOME),
        ("unpackfs", UNPACKFS),
        ("dummyprocess", DUMMYPROCESS),
        ("broken", "name: broken\ntype: job\ninterface: pythonqt\n"),
    ] {
        let d = load_descriptor(&write_module(root.path(), name, contents)).unwrap();
        if d.is_valid() {
            registry.register(d)?;
        } else {
            skipped = skipped.checked_add(1).unwrap();
        }
    }

    assert_eq!(registry.len(), 3);
    assert_eq!(skipped, 1);

    let missing: Vec<_> = registry
        .missing_requirements()
        .into_iter()
        .map(|unmet| unmet.required)
        .collect();
    assert_eq!(missing, ["partition", "mount"]);
    assert!(matches!(
        registry.check_requirements(),
        Err(RegistryError::MissingRequirement { .. })
    ));
    Ok(())
}
