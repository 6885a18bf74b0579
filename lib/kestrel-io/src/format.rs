use std::fmt;
use std::str::FromStr;

/// The registry of concrete RDF syntaxes this toolkit speaks.
///
/// The enumeration is non exhaustive: syntaxes may be added over time.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
#[non_exhaustive]
pub enum RdfSyntax {
    /// [N-Triples](https://www.w3.org/TR/n-triples/)
    NTriples,
    /// [RDF/XML](https://www.w3.org/TR/rdf-syntax-grammar/)
    RdfXml,
    /// RSS and Atom feeds, read tag-soup style
    Rss,
    /// [TriG](https://www.w3.org/TR/trig/)
    TriG,
    /// [Turtle](https://www.w3.org/TR/turtle/)
    Turtle,
}

impl RdfSyntax {
    /// Every registered syntax, in registry order (which also breaks ties
    /// when guessing).
    pub const ALL: [Self; 5] = [
        Self::NTriples,
        Self::RdfXml,
        Self::Rss,
        Self::TriG,
        Self::Turtle,
    ];

    /// The canonical identifier in the
    /// [W3C file format registry](https://www.w3.org/ns/formats/).
    ///
    /// ```
    /// use kestrel_io::RdfSyntax;
    ///
    /// assert_eq!(RdfSyntax::Turtle.iri(), "http://www.w3.org/ns/formats/Turtle");
    /// ```
    #[inline]
    pub const fn iri(self) -> &'static str {
        match self {
            Self::NTriples => "http://www.w3.org/ns/formats/N-Triples",
            Self::RdfXml => "http://www.w3.org/ns/formats/RDF_XML",
            Self::Rss => "http://purl.org/rss/1.0/",
            Self::TriG => "http://www.w3.org/ns/formats/TriG",
            Self::Turtle => "http://www.w3.org/ns/formats/Turtle",
        }
    }

    /// The canonical [IANA media type](https://tools.ietf.org/html/rfc2046).
    ///
    /// ```
    /// use kestrel_io::RdfSyntax;
    ///
    /// assert_eq!(RdfSyntax::Turtle.media_type(), "text/turtle");
    /// ```
    #[inline]
    pub const fn media_type(self) -> &'static str {
        match self {
            Self::NTriples => "application/n-triples",
            Self::RdfXml => "application/rdf+xml",
            Self::Rss => "application/rss+xml",
            Self::TriG => "application/trig",
            Self::Turtle => "text/turtle",
        }
    }

    /// The usual file extension, without the dot.
    ///
    /// ```
    /// use kestrel_io::RdfSyntax;
    ///
    /// assert_eq!(RdfSyntax::Turtle.file_extension(), "ttl");
    /// ```
    #[inline]
    pub const fn file_extension(self) -> &'static str {
        match self {
            Self::NTriples => "nt",
            Self::RdfXml => "rdf",
            Self::Rss => "rss",
            Self::TriG => "trig",
            Self::Turtle => "ttl",
        }
    }

    /// The human-readable name.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NTriples => "N-Triples",
            Self::RdfXml => "RDF/XML",
            Self::Rss => "RSS Tag Soup",
            Self::TriG => "TriG",
            Self::Turtle => "Turtle",
        }
    }

    /// Whether the syntax can name graphs, i.e. represents
    /// [RDF datasets](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-dataset)
    /// rather than single graphs.
    ///
    /// ```
    /// use kestrel_io::RdfSyntax;
    ///
    /// assert!(RdfSyntax::TriG.supports_datasets());
    /// assert!(!RdfSyntax::Turtle.supports_datasets());
    /// ```
    #[inline]
    pub const fn supports_datasets(self) -> bool {
        matches!(self, Self::TriG)
    }

    /// Whether a serializer exists for the syntax. Currently all of them
    /// have one.
    #[inline]
    pub const fn supports_serialization(self) -> bool {
        true
    }

    /// Finds the syntax a media type announces, alias-aware: plain
    /// `application/xml` counts as RDF/XML, `text/plain` as N-Triples, and
    /// the `x-` prefix and a `charset` parameter (UTF-8 spellings only) are
    /// tolerated.
    ///
    /// ```
    /// use kestrel_io::RdfSyntax;
    ///
    /// assert_eq!(
    ///     RdfSyntax::from_media_type("application/x-turtle; charset=utf-8"),
    ///     Some(RdfSyntax::Turtle)
    /// );
    /// assert_eq!(RdfSyntax::from_media_type("image/png"), None);
    /// ```
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let (essence, parameters) = match media_type.split_once(';') {
            Some((essence, parameters)) => (essence, parameters),
            None => (media_type, ""),
        };
        for parameter in parameters.split(';') {
            if let Some((key, value)) = parameter.split_once('=') {
                if key.trim().eq_ignore_ascii_case("charset")
                    && !matches!(
                        value.trim().to_ascii_lowercase().as_str(),
                        "utf-8" | "utf8" | "ascii"
                    )
                {
                    return None; // only UTF-8 input is supported
                }
            }
        }
        let (kind, subtype) = essence.split_once('/')?;
        let kind = kind.trim().to_ascii_lowercase();
        if kind != "application" && kind != "text" {
            return None;
        }
        let subtype = subtype.trim().to_ascii_lowercase();
        let subtype = subtype.strip_prefix("x-").unwrap_or(&subtype);
        Some(match subtype {
            "n-triples" | "ntriples" | "plain" => Self::NTriples,
            "rdf+xml" | "xml" => Self::RdfXml,
            "rss" | "rss+xml" | "atom+xml" => Self::Rss,
            "trig" => Self::TriG,
            "turtle" => Self::Turtle,
            _ => return None,
        })
    }

    /// Finds the syntax a file extension suggests, alias-aware.
    ///
    /// ```
    /// use kestrel_io::RdfSyntax;
    ///
    /// assert_eq!(RdfSyntax::from_extension("ttl"), Some(RdfSyntax::Turtle));
    /// assert_eq!(RdfSyntax::from_extension("owl"), Some(RdfSyntax::RdfXml));
    /// ```
    pub fn from_extension(extension: &str) -> Option<Self> {
        Some(match extension.to_ascii_lowercase().as_str() {
            "nt" | "txt" => Self::NTriples,
            "rdf" | "owl" | "xml" => Self::RdfXml,
            "rss" | "atom" => Self::Rss,
            "trig" => Self::TriG,
            "ttl" | "turtle" => Self::Turtle,
            _ => return None,
        })
    }
}

impl fmt::Display for RdfSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned by [`RdfSyntax::from_str`] on unknown syntax names.
#[derive(Debug, Clone, thiserror::Error)]
#[error("'{0}' is not a known RDF syntax name")]
pub struct UnknownSyntaxError(String);

impl FromStr for RdfSyntax {
    type Err = UnknownSyntaxError;

    /// Parses a syntax from its short name, e.g. `ntriples` or `turtle`.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ok(match name.to_ascii_lowercase().as_str() {
            "n-triples" | "ntriples" => Self::NTriples,
            "rdf/xml" | "rdfxml" => Self::RdfXml,
            "rss" | "rss-tag-soup" => Self::Rss,
            "trig" => Self::TriG,
            "ttl" | "turtle" => Self::Turtle,
            _ => return Err(UnknownSyntaxError(name.to_owned())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_lookup() {
        assert_eq!(RdfSyntax::from_media_type("foo/bar"), None);
        assert_eq!(RdfSyntax::from_media_type("text/csv"), None);
        assert_eq!(
            RdfSyntax::from_media_type("text/turtle"),
            Some(RdfSyntax::Turtle)
        );
        assert_eq!(
            RdfSyntax::from_media_type("application/x-turtle"),
            Some(RdfSyntax::Turtle)
        );
        assert_eq!(
            RdfSyntax::from_media_type("text/turtle; charset=utf-8"),
            Some(RdfSyntax::Turtle)
        );
        assert_eq!(
            RdfSyntax::from_media_type("text/turtle; charset=latin-1"),
            None
        );
        assert_eq!(
            RdfSyntax::from_media_type("application/rdf+xml"),
            Some(RdfSyntax::RdfXml)
        );
        assert_eq!(
            RdfSyntax::from_media_type("application/rss+xml"),
            Some(RdfSyntax::Rss)
        );
    }

    #[test]
    fn name_round_trip() {
        for syntax in RdfSyntax::ALL {
            let spelled = match syntax {
                RdfSyntax::NTriples => "ntriples",
                RdfSyntax::RdfXml => "rdfxml",
                RdfSyntax::Rss => "rss",
                RdfSyntax::TriG => "trig",
                RdfSyntax::Turtle => "turtle",
            };
            assert_eq!(spelled.parse::<RdfSyntax>().ok(), Some(syntax));
        }
        assert!("dot".parse::<RdfSyntax>().is_err());
    }
}
