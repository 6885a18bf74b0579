//! Utilities to write RDF graphs and datasets.

use crate::format::RdfSyntax;
use crate::options::{OptionArea, SyntaxOption, UnsupportedOptionError};
use kestrel_feed::{Rss10Serializer, WriterRss10Serializer};
use kestrel_iri::IriParseError;
use kestrel_model::{QuadRef, TripleRef};
use kestrel_rdfxml::{RdfXmlSerializer, WriterRdfXmlSerializer};
use kestrel_ttl::ntriples::WriterNTriplesSerializer;
use kestrel_ttl::trig::WriterTriGSerializer;
use kestrel_ttl::turtle::WriterTurtleSerializer;
use kestrel_ttl::{NTriplesSerializer, TriGSerializer, TurtleSerializer};
use std::io;
use std::io::Write;

/// The serializer side of the unified front end: pick a syntax, feed
/// quads, get bytes.
///
/// The supported syntaxes:
/// * [N-Triples](https://www.w3.org/TR/n-triples/) ([`RdfSyntax::NTriples`])
/// * [RDF/XML](https://www.w3.org/TR/rdf-syntax-grammar/) ([`RdfSyntax::RdfXml`])
/// * RSS 1.0 ([`RdfSyntax::Rss`])
/// * [TriG](https://www.w3.org/TR/trig/) ([`RdfSyntax::TriG`])
/// * [Turtle](https://www.w3.org/TR/turtle/) ([`RdfSyntax::Turtle`])
///
/// ```
/// use kestrel_io::{RdfSerializer, RdfSyntax};
/// use kestrel_model::{NamedNode, Quad};
///
/// let mut serializer = RdfSerializer::from_syntax(RdfSyntax::NTriples).for_writer(Vec::new());
/// serializer.serialize_quad(
///     &Quad {
///         subject: NamedNode::new("http://example.com/s")?.into(),
///         predicate: NamedNode::new("http://example.com/p")?,
///         object: NamedNode::new("http://example.com/o")?.into(),
///         graph_name: kestrel_model::GraphName::DefaultGraph,
///     }
/// )?;
/// assert_eq!(
///     serializer.finish()?,
///     b"<http://example.com/s> <http://example.com/p> <http://example.com/o> .\n"
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[must_use]
pub struct RdfSerializer {
    inner: RdfSerializerKind,
}

enum RdfSerializerKind {
    NTriples(NTriplesSerializer),
    RdfXml(RdfXmlSerializer),
    Rss(Rss10Serializer),
    TriG(TriGSerializer),
    Turtle(TurtleSerializer),
}

impl RdfSerializer {
    /// Picks the concrete serializer for `syntax`.
    #[inline]
    pub fn from_syntax(syntax: RdfSyntax) -> Self {
        Self {
            inner: match syntax {
                RdfSyntax::NTriples => RdfSerializerKind::NTriples(NTriplesSerializer::new()),
                RdfSyntax::RdfXml => RdfSerializerKind::RdfXml(RdfXmlSerializer::new()),
                RdfSyntax::Rss => RdfSerializerKind::Rss(Rss10Serializer::new()),
                RdfSyntax::TriG => RdfSerializerKind::TriG(TriGSerializer::new()),
                RdfSyntax::Turtle => RdfSerializerKind::Turtle(TurtleSerializer::new()),
            },
        }
    }

    /// The syntax the serializer writes.
    pub fn syntax(&self) -> RdfSyntax {
        match self.inner {
            RdfSerializerKind::NTriples(_) => RdfSyntax::NTriples,
            RdfSerializerKind::RdfXml(_) => RdfSyntax::RdfXml,
            RdfSerializerKind::Rss(_) => RdfSyntax::Rss,
            RdfSerializerKind::TriG(_) => RdfSyntax::TriG,
            RdfSerializerKind::Turtle(_) => RdfSyntax::Turtle,
        }
    }

    /// Declares a namespace prefix, for the syntaxes that write prefixes.
    #[inline]
    pub fn with_prefix(
        mut self,
        prefix_name: impl Into<String>,
        prefix_iri: impl Into<String>,
    ) -> Result<Self, IriParseError> {
        self.inner = match self.inner {
            RdfSerializerKind::NTriples(s) => RdfSerializerKind::NTriples(s),
            RdfSerializerKind::RdfXml(s) => {
                RdfSerializerKind::RdfXml(s.with_prefix(prefix_name, prefix_iri)?)
            }
            RdfSerializerKind::Rss(s) => RdfSerializerKind::Rss(s),
            RdfSerializerKind::TriG(s) => {
                RdfSerializerKind::TriG(s.with_prefix(prefix_name, prefix_iri)?)
            }
            RdfSerializerKind::Turtle(s) => {
                RdfSerializerKind::Turtle(s.with_prefix(prefix_name, prefix_iri)?)
            }
        };
        Ok(self)
    }

    /// Sets a boolean tunable.
    ///
    /// Every current option applies to parsers only, so this checks the
    /// option area and reports a mismatch.
    pub fn with_option(
        self,
        option: SyntaxOption,
        _value: bool,
    ) -> Result<Self, UnsupportedOptionError> {
        match option.area() {
            OptionArea::Serializer => Ok(self),
            OptionArea::Parser => Err(UnsupportedOptionError::wrong_area(
                option,
                OptionArea::Serializer,
            )),
        }
    }

    /// Serializes to a [`Write`] implementation.
    pub fn for_writer<W: Write>(self, writer: W) -> WriterQuadSerializer<W> {
        WriterQuadSerializer {
            inner: match self.inner {
                RdfSerializerKind::NTriples(s) => {
                    WriterQuadSerializerKind::NTriples(s.for_writer(writer))
                }
                RdfSerializerKind::RdfXml(s) => {
                    WriterQuadSerializerKind::RdfXml(s.for_writer(writer))
                }
                RdfSerializerKind::Rss(s) => WriterQuadSerializerKind::Rss(s.for_writer(writer)),
                RdfSerializerKind::TriG(s) => WriterQuadSerializerKind::TriG(s.for_writer(writer)),
                RdfSerializerKind::Turtle(s) => {
                    WriterQuadSerializerKind::Turtle(s.for_writer(writer))
                }
            },
        }
    }
}

/// Serializes quads to a [`Write`] implementation.
///
/// Can be built using [`RdfSerializer::for_writer`].
///
/// The graph name of the quads is dropped by the syntaxes that only
/// represent triples.
#[must_use]
pub struct WriterQuadSerializer<W: Write> {
    inner: WriterQuadSerializerKind<W>,
}

enum WriterQuadSerializerKind<W: Write> {
    NTriples(WriterNTriplesSerializer<W>),
    RdfXml(WriterRdfXmlSerializer<W>),
    Rss(WriterRss10Serializer<W>),
    TriG(WriterTriGSerializer<W>),
    Turtle(WriterTurtleSerializer<W>),
}

impl<W: Write> WriterQuadSerializer<W> {
    /// Serializes an extra quad.
    pub fn serialize_quad<'a>(&mut self, quad: impl Into<QuadRef<'a>>) -> io::Result<()> {
        let quad = quad.into();
        match &mut self.inner {
            WriterQuadSerializerKind::NTriples(serializer) => {
                serializer.serialize_triple(triple_of(quad))
            }
            WriterQuadSerializerKind::RdfXml(serializer) => {
                serializer.serialize_triple(triple_of(quad))
            }
            WriterQuadSerializerKind::Rss(serializer) => {
                serializer.serialize_triple(triple_of(quad))
            }
            WriterQuadSerializerKind::TriG(serializer) => serializer.serialize_quad(quad),
            WriterQuadSerializerKind::Turtle(serializer) => {
                serializer.serialize_triple(triple_of(quad))
            }
        }
    }

    /// Serializes an extra triple in the default graph.
    pub fn serialize_triple<'a>(&mut self, triple: impl Into<TripleRef<'a>>) -> io::Result<()> {
        self.serialize_quad(QuadRef::from(triple.into()))
    }

    /// Ends the write process and returns the underlying [`Write`].
    pub fn finish(self) -> io::Result<W> {
        match self.inner {
            WriterQuadSerializerKind::NTriples(serializer) => Ok(serializer.finish()),
            WriterQuadSerializerKind::RdfXml(serializer) => serializer.finish(),
            WriterQuadSerializerKind::Rss(serializer) => serializer.finish(),
            WriterQuadSerializerKind::TriG(serializer) => serializer.finish(),
            WriterQuadSerializerKind::Turtle(serializer) => serializer.finish(),
        }
    }
}

fn triple_of(quad: QuadRef<'_>) -> TripleRef<'_> {
    TripleRef {
        subject: quad.subject,
        predicate: quad.predicate,
        object: quad.object,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_model::{GraphName, NamedNode, Quad};

    #[test]
    fn graph_names_are_dropped_by_triple_syntaxes() {
        let quad = Quad::new(
            NamedNode::new_unchecked("http://ex/s"),
            NamedNode::new_unchecked("http://ex/p"),
            NamedNode::new_unchecked("http://ex/o"),
            NamedNode::new_unchecked("http://ex/g"),
        );
        let mut serializer = RdfSerializer::from_syntax(RdfSyntax::NTriples).for_writer(Vec::new());
        serializer.serialize_quad(quad.as_ref()).unwrap();
        assert_eq!(
            serializer.finish().unwrap(),
            b"<http://ex/s> <http://ex/p> <http://ex/o> .\n"
        );

        let mut serializer = RdfSerializer::from_syntax(RdfSyntax::TriG).for_writer(Vec::new());
        serializer.serialize_quad(quad.as_ref()).unwrap();
        let out = String::from_utf8(serializer.finish().unwrap()).unwrap();
        assert!(out.contains("<http://ex/g> {"));
    }

    #[test]
    fn turtle_keeps_default_graph_only() {
        let quad = Quad::new(
            NamedNode::new_unchecked("http://ex/s"),
            NamedNode::new_unchecked("http://ex/p"),
            NamedNode::new_unchecked("http://ex/o"),
            GraphName::DefaultGraph,
        );
        let mut serializer = RdfSerializer::from_syntax(RdfSyntax::Turtle).for_writer(Vec::new());
        serializer.serialize_quad(quad.as_ref()).unwrap();
        assert_eq!(
            String::from_utf8(serializer.finish().unwrap()).unwrap(),
            "<http://ex/s> <http://ex/p> <http://ex/o> .\n"
        );
    }
}
