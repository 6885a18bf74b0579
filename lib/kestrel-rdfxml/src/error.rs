use kestrel_iri::IriParseError;
use kestrel_model::Locator;
use oxilangtag::LanguageTagParseError;
use quick_xml::encoding::EncodingError;
use quick_xml::escape::EscapeError;
use quick_xml::events::attributes::AttrError;
use std::fmt;
use std::io;
use std::sync::Arc;

/// Error returned during RDF/XML parsing.
#[derive(Debug, thiserror::Error)]
pub enum RdfXmlParseError {
    /// I/O error during parsing (file not found...).
    #[error(transparent)]
    Io(#[from] io::Error),
    /// An error in the file syntax.
    #[error(transparent)]
    Syntax(#[from] RdfXmlSyntaxError),
}

impl From<RdfXmlParseError> for io::Error {
    #[inline]
    fn from(error: RdfXmlParseError) -> Self {
        match error {
            RdfXmlParseError::Io(error) => error,
            RdfXmlParseError::Syntax(error) => error.into(),
        }
    }
}

#[doc(hidden)]
impl From<quick_xml::Error> for RdfXmlParseError {
    #[inline]
    fn from(error: quick_xml::Error) -> Self {
        // quick-xml wraps I/O problems in an Arc, unwrap them back out
        if let quick_xml::Error::Io(error) = error {
            Self::Io(Arc::try_unwrap(error).unwrap_or_else(|e| io::Error::new(e.kind(), e)))
        } else {
            Self::Syntax(RdfXmlSyntaxError::from_kind(ErrorKind::Xml(error)))
        }
    }
}

/// The quick-xml sub-errors all funnel through [`quick_xml::Error`].
macro_rules! xml_sub_error {
    ($($source:ty),+) => {$(
        #[doc(hidden)]
        impl From<$source> for RdfXmlParseError {
            fn from(error: $source) -> Self {
                quick_xml::Error::from(error).into()
            }
        }
    )+};
}

xml_sub_error!(EncodingError, EscapeError, AttrError);

/// An error in the syntax of the parsed file, with the position the reader
/// had reached when it was noticed.
#[derive(Debug)]
pub struct RdfXmlSyntaxError {
    kind: ErrorKind,
    locator: Locator,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ErrorKind {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error("the IRI '{iri}' is not usable: {error}")]
    InvalidIri {
        iri: String,
        #[source]
        error: IriParseError,
    },
    #[error("the language tag '{tag}' is not usable: {error}")]
    InvalidLanguageTag {
        tag: String,
        #[source]
        error: LanguageTagParseError,
    },
    #[error("{0}")]
    Msg(String),
}

impl RdfXmlSyntaxError {
    pub(crate) fn from_kind(kind: ErrorKind) -> Self {
        Self {
            kind,
            locator: Locator::UNKNOWN,
        }
    }

    /// Builds an error from a printable error message.
    pub(crate) fn msg(msg: impl Into<String>) -> Self {
        Self::from_kind(ErrorKind::Msg(msg.into()))
    }

    pub(crate) fn invalid_iri(iri: String, error: IriParseError) -> Self {
        Self::from_kind(ErrorKind::InvalidIri { iri, error })
    }

    pub(crate) fn invalid_language_tag(tag: String, error: LanguageTagParseError) -> Self {
        Self::from_kind(ErrorKind::InvalidLanguageTag { tag, error })
    }

    /// Fills the byte offset in, when nothing more precise is known yet.
    pub(crate) fn located_at_byte(mut self, byte: u64) -> Self {
        if self.locator.is_unknown() {
            self.locator.byte = Some(byte);
        }
        self
    }

    /// Where the reader was when the error was noticed.
    pub fn locator(&self) -> &Locator {
        &self.locator
    }
}

impl fmt::Display for RdfXmlSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)?;
        if let Some(byte) = self.locator.byte {
            write!(f, " (around byte {byte})")?;
        }
        Ok(())
    }
}

impl std::error::Error for RdfXmlSyntaxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

impl From<RdfXmlSyntaxError> for io::Error {
    #[inline]
    fn from(error: RdfXmlSyntaxError) -> Self {
        let RdfXmlSyntaxError { kind, locator } = error;
        match kind {
            ErrorKind::Xml(quick_xml::Error::Io(inner)) => {
                Arc::try_unwrap(inner).unwrap_or_else(|e| Self::new(e.kind(), e))
            }
            kind => Self::new(
                io::ErrorKind::InvalidData,
                RdfXmlSyntaxError { kind, locator }.to_string(),
            ),
        }
    }
}
