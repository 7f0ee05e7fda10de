//! `keel check`: register modules together and verify requirements.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use keel_modules::{ModuleRegistry, UnmetRequirement};
use serde_json::json;
use tracing::warn;

use super::{Loaded, load};
use crate::OutputFormat;

/// Summary of one `check` run.
#[derive(Debug, Default)]
pub(crate) struct CheckReport {
    pub(crate) registered: Vec<String>,
    /// Invalid or unreadable modules.
    pub(crate) skipped: Vec<(PathBuf, String)>,
    /// Valid modules the registry refused, e.g. duplicate names.
    pub(crate) conflicts: Vec<(PathBuf, String)>,
    pub(crate) unmet: Vec<UnmetRequirement>,
}

impl CheckReport {
    /// Invalid modules are skipped; only conflicts and unmet requirements
    /// fail the check.
    pub(crate) fn passed(&self) -> bool {
        self.conflicts.is_empty() && self.unmet.is_empty()
    }
}

/// Load all paths into one registry.
pub(crate) fn build_report(paths: &[PathBuf]) -> CheckReport {
    let mut registry = ModuleRegistry::new();
    let mut report = CheckReport::default();

    for path in paths {
        match load(path) {
            Loaded::Valid(descriptor) => {
                let name = descriptor.name().to_owned();
                match registry.register(descriptor) {
                    Ok(()) => report.registered.push(name),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Module not registered");
                        report.conflicts.push((path.clone(), e.to_string()));
                    },
                }
            },
            Loaded::Invalid { file, reason } => report.skipped.push((file, reason)),
        }
    }

    report.unmet = registry.missing_requirements();
    report
}

/// Check every path. Returns `false` if the set of modules is inconsistent.
pub(crate) fn run_check(paths: &[PathBuf], format: OutputFormat) -> Result<bool> {
    let report = build_report(paths);

    match format {
        OutputFormat::Json => {
            let skipped: Vec<_> = report.skipped.iter().map(path_reason).collect();
            let conflicts: Vec<_> = report.conflicts.iter().map(path_reason).collect();
            let unmet: Vec<_> = report
                .unmet
                .iter()
                .map(|u| json!({ "module": u.module, "required": u.required }))
                .collect();
            let doc = json!({
                "passed": report.passed(),
                "registered": report.registered,
                "skipped": skipped,
                "conflicts": conflicts,
                "unmet": unmet,
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        },
        OutputFormat::Pretty => {
            println!(
                "{} {} module(s) registered",
                "OK".green().bold(),
                report.registered.len()
            );
            for (path, reason) in &report.skipped {
                println!("{} {}: {reason}", "SKIP".yellow().bold(), path.display());
            }
            for (path, reason) in &report.conflicts {
                println!("{} {}: {reason}", "FAIL".red().bold(), path.display());
            }
            for u in &report.unmet {
                println!(
                    "{} '{}' requires '{}', which is not available",
                    "FAIL".red().bold(),
                    u.module,
                    u.required
                );
            }
        },
    }

    Ok(report.passed())
}

fn path_reason((path, reason): &(PathBuf, String)) -> serde_json::Value {
    json!({ "path": path.display().to_string(), "reason": reason })
}
