//! Input positions, attached to syntax errors and log messages.

use std::fmt;

/// Where in an input something happened.
///
/// Every coordinate is optional; parsers fill in what they know. Lines and
/// columns are 1-based, the byte offset is 0-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locator {
    /// The file name, when parsing from a file.
    pub file: Option<String>,
    /// The base or retrieval IRI of the input.
    pub iri: Option<String>,
    pub line: Option<u64>,
    /// Counted in characters, not bytes.
    pub column: Option<u64>,
    pub byte: Option<u64>,
}

impl Locator {
    /// A locator that carries no information at all.
    pub const UNKNOWN: Self = Self {
        file: None,
        iri: None,
        line: None,
        column: None,
        byte: None,
    };

    pub fn for_file(file: impl Into<String>) -> Self {
        Self {
            file: Some(file.into()),
            ..Self::default()
        }
    }

    /// Builds a locator from in-document coordinates.
    pub fn at(line: u64, column: u64, byte: u64) -> Self {
        Self {
            file: None,
            iri: None,
            line: Some(line),
            column: Some(column),
            byte: Some(byte),
        }
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }

    /// Fills the file name in if the locator does not have one yet.
    pub fn or_file(mut self, file: impl Into<String>) -> Self {
        if self.file.is_none() {
            self.file = Some(file.into());
        }
        self
    }
}

impl fmt::Display for Locator {
    /// The classic `file:line:column` prefix. Coordinates without a file are
    /// spelled out, a fully unknown locator prints as `<input>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.file.as_ref().or(self.iri.as_ref()), self.line) {
            (Some(name), Some(line)) => {
                write!(f, "{name}:{line}")?;
                if let Some(column) = self.column {
                    write!(f, ":{column}")?;
                }
                Ok(())
            }
            (Some(name), None) => f.write_str(name),
            (None, Some(line)) => {
                write!(f, "line {line}")?;
                if let Some(column) = self.column {
                    write!(f, ", column {column}")?;
                }
                Ok(())
            }
            (None, None) => f.write_str("<input>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(Locator::UNKNOWN.to_string(), "<input>");
        assert_eq!(Locator::at(3, 7, 120).to_string(), "line 3, column 7");
        assert_eq!(
            Locator::at(3, 7, 120).or_file("feed.rss").to_string(),
            "feed.rss:3:7"
        );
        assert_eq!(Locator::for_file("a.nt").to_string(), "a.nt");
    }
}
