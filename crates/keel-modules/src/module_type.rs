//! Module kinds, execution interfaces, and which pairs of them are legal.

use crate::named_enum::declare_named_enum;

declare_named_enum! {
    /// What a module contributes to an installation.
    ///
    /// A job module is a single unit of work. A view module has a UI (one or
    /// more pages) and zero or more jobs that run once the user proceeds.
    pub enum ModuleType in TYPE_NAMES {
        /// Performs work with no user-facing page.
        Job => "job",
        /// Presents interactive pages and may own jobs.
        View => "view",
    }
}

declare_named_enum! {
    /// The mechanism through which a module's logic is invoked.
    ///
    /// Not every interface is available for every [`ModuleType`]; see
    /// [`is_valid_combination`].
    pub enum Interface in INTERFACE_NAMES {
        /// A compiled shared library exposing a factory entry point.
        NativePlugin => "qtplugin",
        /// An interpreter script with a single entry file.
        Scripted => "python",
        /// One shell command. Kept for older module trees only.
        ProcessCommand => "process",
        /// A view rendered through the embedded interpreter UI binding.
        ScriptedView => "pythonqt",
    }
}

/// Every legal `(type, interface)` pair.
pub const VALID_COMBINATIONS: [(ModuleType, Interface); 5] = [
    (ModuleType::Job, Interface::NativePlugin),
    (ModuleType::Job, Interface::Scripted),
    (ModuleType::Job, Interface::ProcessCommand),
    (ModuleType::View, Interface::NativePlugin),
    (ModuleType::View, Interface::ScriptedView),
];

/// Whether a module of `module_type` may be driven through `interface`.
///
/// The match is exhaustive over both enumerations: adding a variant to
/// either one fails to compile until its legality is decided here.
#[must_use]
pub const fn is_valid_combination(module_type: ModuleType, interface: Interface) -> bool {
    match (module_type, interface) {
        (
            ModuleType::Job,
            Interface::NativePlugin | Interface::Scripted | Interface::ProcessCommand,
        )
        | (ModuleType::View, Interface::NativePlugin | Interface::ScriptedView) => true,
        (ModuleType::Job, Interface::ScriptedView)
        | (ModuleType::View, Interface::Scripted | Interface::ProcessCommand) => false,
    }
}

impl ModuleType {
    /// Whether this kind of module may use `interface`.
    #[must_use]
    pub const fn supports(self, interface: Interface) -> bool {
        is_valid_combination(self, interface)
    }
}

impl Interface {
    /// Interfaces that still load but should not be used by new modules.
    #[must_use]
    pub const fn is_deprecated(self) -> bool {
        matches!(self, Self::ProcessCommand)
    }
}
