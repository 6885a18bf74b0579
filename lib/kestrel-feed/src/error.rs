use quick_xml::encoding::EncodingError;
use quick_xml::escape::EscapeError;
use quick_xml::events::attributes::AttrError;
use std::io;
use std::sync::Arc;

/// Error returned during feed parsing.
#[derive(Debug, thiserror::Error)]
pub enum FeedParseError {
    /// I/O error during parsing (file not found...).
    #[error(transparent)]
    Io(#[from] io::Error),
    /// An error in the file syntax.
    #[error(transparent)]
    Syntax(#[from] FeedSyntaxError),
}

impl From<FeedParseError> for io::Error {
    #[inline]
    fn from(error: FeedParseError) -> Self {
        match error {
            FeedParseError::Io(error) => error,
            FeedParseError::Syntax(error) => Self::new(io::ErrorKind::InvalidData, error),
        }
    }
}

#[doc(hidden)]
impl From<quick_xml::Error> for FeedParseError {
    #[inline]
    fn from(error: quick_xml::Error) -> Self {
        match error {
            quick_xml::Error::Io(error) => {
                Self::Io(Arc::try_unwrap(error).unwrap_or_else(|e| io::Error::new(e.kind(), e)))
            }
            _ => Self::Syntax(FeedSyntaxError::msg(error.to_string())),
        }
    }
}

#[doc(hidden)]
impl From<EncodingError> for FeedParseError {
    fn from(error: EncodingError) -> Self {
        quick_xml::Error::from(error).into()
    }
}

#[doc(hidden)]
impl From<EscapeError> for FeedParseError {
    fn from(error: EscapeError) -> Self {
        quick_xml::Error::from(error).into()
    }
}

#[doc(hidden)]
impl From<AttrError> for FeedParseError {
    fn from(error: AttrError) -> Self {
        quick_xml::Error::from(error).into()
    }
}

/// An error in the syntax of the parsed feed.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct FeedSyntaxError {
    message: String,
}

impl FeedSyntaxError {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
