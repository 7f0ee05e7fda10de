//! `keel inspect`: show what each module's descriptor says.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use keel_modules::{Descriptor, Interface};

use super::{Loaded, load};
use crate::OutputFormat;

/// Inspect every path. Returns `false` if any module is invalid.
pub(crate) fn run_inspect(paths: &[PathBuf], format: OutputFormat) -> Result<bool> {
    let results: Vec<(&PathBuf, Loaded)> =
        paths.iter().map(|path| (path, load(path))).collect();
    let all_valid = results
        .iter()
        .all(|(_, loaded)| matches!(loaded, Loaded::Valid(_)));

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = results.iter().map(|(_, loaded)| loaded.to_json()).collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        },
        OutputFormat::Pretty => {
            for (path, loaded) in &results {
                match loaded {
                    Loaded::Valid(descriptor) => print_descriptor(descriptor),
                    Loaded::Invalid { reason, .. } => {
                        println!("{} {}", "INVALID".red().bold(), path.display());
                        println!("  {reason}");
                    },
                }
                println!();
            }
        },
    }

    Ok(all_valid)
}

fn print_descriptor(descriptor: &Descriptor) {
    println!(
        "{} {} ({} / {})",
        "OK".green().bold(),
        descriptor.name().bold(),
        descriptor.module_type(),
        descriptor.interface()
    );
    for (label, value) in details(descriptor) {
        println!("  {:<10} {value}", format!("{label}:").dimmed());
    }
    if descriptor.interface().is_deprecated() {
        println!(
            "  {}",
            format!("interface '{}' is deprecated", descriptor.interface()).yellow()
        );
    }
}

/// Label/value pairs worth showing for a valid descriptor.
fn details(descriptor: &Descriptor) -> Vec<(&'static str, String)> {
    let mut lines = vec![("directory", descriptor.directory().display().to_string())];

    match descriptor.interface() {
        Interface::NativePlugin => {
            if let Some(load) = descriptor.load() {
                lines.push(("load", load.to_owned()));
            }
        },
        Interface::Scripted => {
            if let Some(script) = descriptor.script_path() {
                lines.push(("script", script.display().to_string()));
            }
        },
        Interface::ProcessCommand => {
            if let Some(command) = descriptor.command() {
                lines.push(("command", command.to_owned()));
            }
            lines.push(("timeout", format!("{}s", descriptor.timeout_seconds())));
            lines.push(("chroot", descriptor.chroot().to_string()));
        },
        Interface::ScriptedView => {},
    }

    if !descriptor.required_modules().is_empty() {
        lines.push(("requires", descriptor.required_modules().join(", ")));
    }
    if descriptor.is_emergency() {
        lines.push(("emergency", "yes".to_owned()));
    }
    if !descriptor.has_config() {
        lines.push(("config", "none".to_owned()));
    }
    lines
}
