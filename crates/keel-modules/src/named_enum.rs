//! Bidirectional tables between closed enumerations and their names.
//!
//! Configuration files spell enum-valued fields as lowercase strings
//! (`type: view`, `interface: qtplugin`). A [`NamedEnumTable`] is the one
//! place where such a string is turned into a value, and where an
//! unrecognized string is detected. Tables are `static` and never change
//! after compilation, so they can be read from any thread.
//!
//! Enumerations are declared through [`declare_named_enum!`], which emits
//! the enum, its table, and an exhaustive `name()` from the same list of
//! variants. A variant without a name cannot be written.

/// A string in a configuration file that matches no known enum name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} name: '{name}'")]
pub struct UnknownName {
    /// Human-readable name of the enumeration that was searched.
    pub kind: &'static str,
    /// The string that failed to match.
    pub name: String,
}

impl UnknownName {
    /// Create a new lookup failure for `kind`.
    #[must_use]
    pub fn new(kind: &'static str, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// An enumeration with a canonical name for every value.
pub trait NamedEnum: Copy + Eq + 'static {
    /// The process-wide table for this enumeration.
    fn table() -> &'static NamedEnumTable<Self>;

    /// The canonical name of `self`.
    fn name(self) -> &'static str;
}

/// Fixed mapping between the values of `E` and their canonical names.
#[derive(Debug)]
pub struct NamedEnumTable<E: 'static> {
    kind: &'static str,
    entries: &'static [(&'static str, E)],
}

impl<E: 'static> NamedEnumTable<E> {
    /// Build a table from `(name, value)` pairs.
    #[must_use]
    pub const fn new(kind: &'static str, entries: &'static [(&'static str, E)]) -> Self {
        Self { kind, entries }
    }

    /// Name of the enumeration this table describes, used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// All canonical names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }
}

impl<E: NamedEnum> NamedEnumTable<E> {
    /// Look up the value whose canonical name is exactly `name`.
    ///
    /// Matching is case-sensitive. Returns `None` for unknown names.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<E> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|&(_, value)| value)
    }

    /// Like [`find`](Self::find), with the failure spelled out.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownName`] when `name` matches no entry.
    pub fn parse(&self, name: &str) -> Result<E, UnknownName> {
        self.find(name)
            .ok_or_else(|| UnknownName::new(self.kind, name))
    }

    /// The canonical name of `value`.
    #[must_use]
    pub fn name_of(&self, value: E) -> &'static str {
        value.name()
    }

    /// All values, in declaration order.
    pub fn values(&self) -> impl Iterator<Item = E> + '_ {
        self.entries.iter().map(|&(_, value)| value)
    }
}

/// Declare a fieldless enum together with its [`NamedEnumTable`].
///
/// ```ignore
/// declare_named_enum! {
///     /// Colours.
///     pub enum Colour in COLOUR_NAMES {
///         /// Red.
///         Red => "red",
///         /// Green.
///         Green => "green",
///     }
/// }
/// ```
///
/// The generated enum implements [`NamedEnum`], `Display`, `FromStr`, and
/// serde's `Serialize`/`Deserialize` through its canonical names.
macro_rules! declare_named_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident in $table:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $text:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        #[doc = concat!("Canonical names of [`", stringify!($name), "`] values.")]
        $vis static $table: $crate::named_enum::NamedEnumTable<$name> =
            $crate::named_enum::NamedEnumTable::new(
                stringify!($name),
                &[$(($text, $name::$variant)),+],
            );

        impl $crate::named_enum::NamedEnum for $name {
            fn table() -> &'static $crate::named_enum::NamedEnumTable<Self> {
                &$table
            }

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::named_enum::NamedEnum::name(*self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::named_enum::UnknownName;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                $table.parse(s)
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.serialize_str($crate::named_enum::NamedEnum::name(*self))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let s = <::std::string::String as ::serde::Deserialize>::deserialize(deserializer)?;
                $table.parse(&s).map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use declare_named_enum;

#[cfg(test)]
mod tests {
    use super::*;

    declare_named_enum! {
        /// Test enumeration.
        enum Colour in COLOUR_NAMES {
            Red => "red",
            Green => "green",
            Blue => "blue",
        }
    }

    #[test]
    fn test_find_known_names() {
        assert_eq!(COLOUR_NAMES.find("red"), Some(Colour::Red));
        assert_eq!(COLOUR_NAMES.find("blue"), Some(Colour::Blue));
    }

    #[test]
    fn test_find_is_case_sensitive() {
        assert_eq!(COLOUR_NAMES.find("Red"), None);
        assert_eq!(COLOUR_NAMES.find("RED"), None);
        assert_eq!(COLOUR_NAMES.find(" red"), None);
    }

    #[test]
    fn test_find_unknown_name() {
        assert_eq!(COLOUR_NAMES.find("purple"), None);
        assert_eq!(COLOUR_NAMES.find(""), None);
    }

    #[test]
    fn test_every_value_round_trips() {
        for value in COLOUR_NAMES.values() {
            assert_eq!(COLOUR_NAMES.find(COLOUR_NAMES.name_of(value)), Some(value));
        }
        assert_eq!(COLOUR_NAMES.values().count(), 3);
    }

    #[test]
    fn test_names_in_declaration_order() {
        let names: Vec<_> = COLOUR_NAMES.names().collect();
        assert_eq!(names, ["red", "green", "blue"]);
    }

    #[test]
    fn test_parse_reports_kind() {
        let err = COLOUR_NAMES.parse("mauve").unwrap_err();
        assert_eq!(err.kind, "Colour");
        assert_eq!(err.name, "mauve");
        assert_eq!(err.to_string(), "unknown Colour name: 'mauve'");
    }

    #[test]
    fn test_display_and_from_str() {
        assert_eq!(Colour::Green.to_string(), "green");
        assert_eq!("green".parse::<Colour>().unwrap(), Colour::Green);
        assert!("Green".parse::<Colour>().is_err());
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_string(&Colour::Blue).unwrap();
        assert_eq!(json, "\"blue\"");
        let parsed: Colour = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(parsed, Colour::Red);
        assert!(serde_json::from_str::<Colour>("\"teal\"").is_err());
    }

    #[test]
    fn test_table_accessible_through_trait() {
        assert!(std::ptr::eq(Colour::table(), &COLOUR_NAMES));
        assert_eq!(Colour::table().kind(), "Colour");
    }
}
