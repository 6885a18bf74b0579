use std::io;

/// Error returned during RDF parsing.
#[derive(Debug, thiserror::Error)]
pub enum RdfParseError {
    /// I/O error during parsing (file not found...).
    #[error(transparent)]
    Io(#[from] io::Error),
    /// An error in the file syntax.
    #[error(transparent)]
    Syntax(#[from] RdfSyntaxError),
}

impl From<RdfParseError> for io::Error {
    #[inline]
    fn from(error: RdfParseError) -> Self {
        match error {
            RdfParseError::Io(error) => error,
            RdfParseError::Syntax(error) => error.into(),
        }
    }
}

#[doc(hidden)]
impl From<kestrel_ttl::TtlParseError> for RdfParseError {
    #[inline]
    fn from(error: kestrel_ttl::TtlParseError) -> Self {
        match error {
            kestrel_ttl::TtlParseError::Io(error) => Self::Io(error),
            kestrel_ttl::TtlParseError::Syntax(error) => Self::Syntax(error.into()),
        }
    }
}

#[doc(hidden)]
impl From<kestrel_rdfxml::RdfXmlParseError> for RdfParseError {
    #[inline]
    fn from(error: kestrel_rdfxml::RdfXmlParseError) -> Self {
        match error {
            kestrel_rdfxml::RdfXmlParseError::Io(error) => Self::Io(error),
            kestrel_rdfxml::RdfXmlParseError::Syntax(error) => Self::Syntax(error.into()),
        }
    }
}

#[doc(hidden)]
impl From<kestrel_feed::FeedParseError> for RdfParseError {
    #[inline]
    fn from(error: kestrel_feed::FeedParseError) -> Self {
        match error {
            kestrel_feed::FeedParseError::Io(error) => Self::Io(error),
            kestrel_feed::FeedParseError::Syntax(error) => Self::Syntax(error.into()),
        }
    }
}

/// An error in the syntax of the parsed file.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct RdfSyntaxError(#[from] RdfErrorKind);

#[derive(Debug, thiserror::Error)]
enum RdfErrorKind {
    #[error(transparent)]
    Turtle(#[from] kestrel_ttl::TtlSyntaxError),
    #[error(transparent)]
    RdfXml(#[from] kestrel_rdfxml::RdfXmlSyntaxError),
    #[error(transparent)]
    Feed(#[from] kestrel_feed::FeedSyntaxError),
    #[error("{0}")]
    Msg(&'static str),
}

impl RdfSyntaxError {
    pub(crate) const fn msg(msg: &'static str) -> Self {
        Self(RdfErrorKind::Msg(msg))
    }
}

impl From<kestrel_ttl::TtlSyntaxError> for RdfSyntaxError {
    #[inline]
    fn from(error: kestrel_ttl::TtlSyntaxError) -> Self {
        Self(RdfErrorKind::Turtle(error))
    }
}

impl From<kestrel_rdfxml::RdfXmlSyntaxError> for RdfSyntaxError {
    #[inline]
    fn from(error: kestrel_rdfxml::RdfXmlSyntaxError) -> Self {
        Self(RdfErrorKind::RdfXml(error))
    }
}

impl From<kestrel_feed::FeedSyntaxError> for RdfSyntaxError {
    #[inline]
    fn from(error: kestrel_feed::FeedSyntaxError) -> Self {
        Self(RdfErrorKind::Feed(error))
    }
}

impl From<RdfSyntaxError> for io::Error {
    #[inline]
    fn from(error: RdfSyntaxError) -> Self {
        match error.0 {
            RdfErrorKind::Turtle(error) => error.into(),
            RdfErrorKind::RdfXml(error) => error.into(),
            RdfErrorKind::Feed(error) => Self::new(io::ErrorKind::InvalidData, error),
            RdfErrorKind::Msg(msg) => Self::new(io::ErrorKind::InvalidData, msg),
        }
    }
}
