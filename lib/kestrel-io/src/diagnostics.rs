//! The log channel shared by every parser and serializer: a diagnostic is a
//! severity, a [`Locator`] and a message, delivered to a registered handler.

use kestrel_model::Locator;
use std::fmt;

/// How bad a [`Diagnostic`] is, coarsest to finest.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub enum Severity {
    /// Diagnostic information, parsing is unaffected.
    Info,
    /// Surprising but interpretable content.
    Warning,
    /// The offending statement or element is dropped, parsing continues.
    Error,
    /// Parsing cannot continue.
    Fatal,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One message of the log channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub locator: Locator,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, locator: Locator, message: impl Into<String>) -> Self {
        Self {
            severity,
            locator,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, Locator::UNKNOWN, message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.locator, self.severity, self.message)
    }
}

/// The callback diagnostics are delivered to.
pub type DiagnosticHandler = Box<dyn FnMut(&Diagnostic)>;

/// The default handler: one line per diagnostic on standard error.
#[allow(clippy::print_stderr)]
pub fn default_diagnostic_handler() -> DiagnosticHandler {
    Box::new(|diagnostic| eprintln!("{diagnostic}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let d = Diagnostic::new(
            Severity::Error,
            Locator::at(3, 7, 42).or_file("feed.rss"),
            "unexpected element",
        );
        assert_eq!(d.to_string(), "feed.rss:3:7: error: unexpected element");
    }

    #[test]
    fn display_without_coordinates() {
        let d = Diagnostic::warning("something odd");
        assert_eq!(d.to_string(), "<input>: warning: something odd");
    }
}
