//! The fixed enumeration of parser and serializer tunables.

use std::fmt;
use std::str::FromStr;

/// What an option applies to.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum OptionArea {
    Parser,
    Serializer,
}

/// The type of an option value.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum OptionValueKind {
    Bool,
    Integer,
    String,
    Iri,
}

/// A parser or serializer tunable.
///
/// Each option declares the area it applies to and its value kind; setting
/// an option outside of its area is an [`UnsupportedOptionError`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
#[non_exhaustive]
pub enum SyntaxOption {
    /// Look for `rdf:RDF` anywhere in the document (RDF/XML).
    Scanning,
    /// Downgrade `rdf:bagID` from error to warning (RDF/XML).
    AllowBagId,
    /// Treat unknown `rdf:parseType` values as `Literal` (RDF/XML).
    AllowOtherParseTypes,
    /// Type collection nodes with `rdf:List` (RDF/XML).
    AllowRdfTypeRdfList,
    /// Make non-NFC literals fatal instead of a warning (RDF/XML).
    NonNfcFatal,
    /// Lowercase `xml:lang` values (RDF/XML). Defaults to on.
    NormalizeLanguage,
    /// Skip expensive validations on trusted input (all parsers).
    Lenient,
}

impl SyntaxOption {
    pub const ALL: [Self; 7] = [
        Self::Scanning,
        Self::AllowBagId,
        Self::AllowOtherParseTypes,
        Self::AllowRdfTypeRdfList,
        Self::NonNfcFatal,
        Self::NormalizeLanguage,
        Self::Lenient,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Scanning => "scanForRDF",
            Self::AllowBagId => "allowBagID",
            Self::AllowOtherParseTypes => "allowOtherParsetypes",
            Self::AllowRdfTypeRdfList => "allowRdfTypeRdfList",
            Self::NonNfcFatal => "nonNfcFatal",
            Self::NormalizeLanguage => "normalizeLanguage",
            Self::Lenient => "lenient",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Scanning => "Scan for rdf:RDF in XML content",
            Self::AllowBagId => "Allow rdf:bagID with a warning",
            Self::AllowOtherParseTypes => "Allow unknown rdf:parseType values",
            Self::AllowRdfTypeRdfList => "Generate rdf:type rdf:List for collections",
            Self::NonNfcFatal => "Make non-NFC literals fatal",
            Self::NormalizeLanguage => "Normalize xml:lang values to lowercase",
            Self::Lenient => "Skip expensive validations",
        }
    }

    pub const fn area(self) -> OptionArea {
        // every current option tunes parsing
        OptionArea::Parser
    }

    pub const fn value_kind(self) -> OptionValueKind {
        OptionValueKind::Bool
    }

    /// The default value of the option.
    pub const fn default_value(self) -> bool {
        matches!(self, Self::NormalizeLanguage)
    }

    /// Parses a string into a value of the option kind.
    pub fn parse_value(self, value: &str) -> Result<bool, UnsupportedOptionError> {
        match value {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(UnsupportedOptionError::bad_value(self, value)),
        }
    }
}

impl fmt::Display for SyntaxOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SyntaxOption {
    type Err = UnsupportedOptionError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|option| option.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnsupportedOptionError {
                message: format!("'{name}' is not a known option"),
            })
    }
}

/// Error raised when setting an unknown option, a wrongly-typed value, or an
/// option on an object it does not apply to.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct UnsupportedOptionError {
    message: String,
}

impl UnsupportedOptionError {
    pub(crate) fn wrong_area(option: SyntaxOption, area: OptionArea) -> Self {
        Self {
            message: format!("the option '{option}' does not apply to {area:?} objects"),
        }
    }

    fn bad_value(option: SyntaxOption, value: &str) -> Self {
        Self {
            message: format!("'{value}' is not a valid value for the option '{option}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_round_trip_through_names() {
        for option in SyntaxOption::ALL {
            assert_eq!(option.name().parse::<SyntaxOption>().unwrap(), option);
        }
        assert!("frobnicate".parse::<SyntaxOption>().is_err());
    }

    #[test]
    fn boolean_values() {
        assert!(SyntaxOption::Scanning.parse_value("yes").unwrap());
        assert!(!SyntaxOption::Scanning.parse_value("0").unwrap());
        assert!(SyntaxOption::Scanning.parse_value("maybe").is_err());
    }
}
