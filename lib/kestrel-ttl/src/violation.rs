//! Errors of the terse-syntax parsers, pinned to an input position.

use kestrel_model::Locator;
use std::fmt;
use std::io;

/// A rule of the syntax was broken.
///
/// The [`Locator`] points at the place where the parser noticed the
/// problem: the start of the offending token, or the end of the input.
#[derive(Debug)]
pub struct TtlSyntaxError {
    locator: Locator,
    message: String,
}

impl TtlSyntaxError {
    pub(crate) fn new(locator: Locator, message: impl Into<String>) -> Self {
        Self {
            locator,
            message: message.into(),
        }
    }

    /// Where the problem was noticed.
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for TtlSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.locator.is_unknown() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.locator, self.message)
        }
    }
}

impl std::error::Error for TtlSyntaxError {}

impl From<TtlSyntaxError> for io::Error {
    fn from(error: TtlSyntaxError) -> Self {
        Self::new(io::ErrorKind::InvalidData, error)
    }
}

/// What can interrupt a parse: the input source, or the input itself.
#[derive(Debug, thiserror::Error)]
pub enum TtlParseError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Syntax(#[from] TtlSyntaxError),
}

impl From<TtlParseError> for io::Error {
    fn from(error: TtlParseError) -> Self {
        match error {
            TtlParseError::Io(error) => error,
            TtlParseError::Syntax(error) => error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_the_position_when_known() {
        let error = TtlSyntaxError::new(Locator::at(2, 5, 17), "unexpected ';'");
        assert_eq!(error.to_string(), "line 2, column 5: unexpected ';'");
        let error = TtlSyntaxError::new(Locator::UNKNOWN, "unexpected ';'");
        assert_eq!(error.to_string(), "unexpected ';'");
    }
}
