//! [TriG](https://www.w3.org/TR/trig/), parsed by [`TriGParser`] and written
//! by [`TriGSerializer`].

use crate::reader::{ReaderDriver, SliceDriver, TtlReader};
use crate::terse::TurtleGrammar;
use crate::violation::{TtlParseError, TtlSyntaxError};
use crate::writer::TerseWriter;
use kestrel_iri::{Iri, IriParseError};
use kestrel_model::{Quad, QuadRef};
use std::collections::{BTreeMap, HashMap};
use std::io::{self, Read, Write};

/// A [TriG](https://www.w3.org/TR/trig/) streaming parser: Turtle plus
/// named graph blocks.
///
/// ```
/// use kestrel_ttl::TriGParser;
///
/// let file = r#"@prefix ex: <http://example.com/> .
/// ex:g { ex:s ex:p ex:o . }"#;
///
/// let statements = TriGParser::new()
///     .for_slice(file)
///     .collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(statements.len(), 1);
/// assert_eq!(statements[0].graph_name.to_string(), "<http://example.com/g>");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Default, Clone)]
#[must_use]
pub struct TriGParser {
    lenient: bool,
    base: Option<Iri<String>>,
    prefixes: HashMap<String, String>,
}

impl TriGParser {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Skips IRI and language tag validation on trusted input.
    #[inline]
    pub fn lenient(mut self) -> Self {
        self.lenient = true;
        self
    }

    #[inline]
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Result<Self, IriParseError> {
        let base = Iri::parse(base_iri.into())?;
        self.base = Some(base);
        Ok(self)
    }

    /// Declares a prefix up front, as if the file opened with `@prefix`.
    #[inline]
    pub fn with_prefix(
        mut self,
        prefix_name: impl Into<String>,
        prefix_iri: impl Into<String>,
    ) -> Result<Self, IriParseError> {
        self.prefixes.insert(
            prefix_name.into(),
            Iri::parse(prefix_iri.into())?.into_inner(),
        );
        Ok(self)
    }

    fn grammar(self) -> TurtleGrammar {
        TurtleGrammar::new(true, self.lenient, self.base, self.prefixes)
    }

    /// Parses from a [`Read`] implementation.
    pub fn for_reader<R: Read>(self, input: R) -> ReaderTriGParser<R> {
        ReaderTriGParser {
            inner: ReaderDriver {
                reader: TtlReader::new(self.grammar()),
                input,
            },
        }
    }

    /// Parses from a byte slice.
    pub fn for_slice(self, slice: &(impl AsRef<[u8]> + ?Sized)) -> SliceTriGParser {
        SliceTriGParser {
            inner: SliceDriver::new(self.grammar(), slice.as_ref()),
        }
    }

    /// Builds the push-based form of the parser, fed chunk by chunk.
    pub fn chunked(self) -> ChunkedTriGParser {
        ChunkedTriGParser {
            reader: TtlReader::new(self.grammar()),
        }
    }
}

/// Parses TriG from a [`Read`] implementation.
///
/// Built by [`TriGParser::for_reader`].
#[must_use]
pub struct ReaderTriGParser<R: Read> {
    inner: ReaderDriver<R, TurtleGrammar>,
}

impl<R: Read> ReaderTriGParser<R> {
    /// The prefixes declared so far in the file.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.reader.grammar.prefixes()
    }

    /// The base IRI in scope, if any.
    pub fn base_iri(&self) -> Option<&str> {
        self.inner.reader.grammar.base()
    }
}

impl<R: Read> Iterator for ReaderTriGParser<R> {
    type Item = Result<Quad, TtlParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Parses TriG from a byte slice.
///
/// Built by [`TriGParser::for_slice`].
#[must_use]
pub struct SliceTriGParser {
    inner: SliceDriver<TurtleGrammar>,
}

impl Iterator for SliceTriGParser {
    type Item = Result<Quad, TtlSyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// The push-based form: feed chunks in, pull statements out.
///
/// Built by [`TriGParser::chunked`].
#[must_use]
pub struct ChunkedTriGParser {
    reader: TtlReader<TurtleGrammar>,
}

impl ChunkedTriGParser {
    /// Pushes one chunk of bytes.
    pub fn parse_chunk(&mut self, chunk: &[u8]) {
        self.reader.parse_chunk(chunk);
    }

    /// Announces the end of the input.
    pub fn end(&mut self) {
        self.reader.end();
    }

    /// True once everything has been parsed and pulled.
    pub fn is_finished(&self) -> bool {
        self.reader.is_finished()
    }

    /// The next parsed statement, or `None` when the buffered input is
    /// exhausted.
    pub fn next_statement(&mut self) -> Option<Result<Quad, TtlSyntaxError>> {
        self.reader.next_statement()
    }

    /// The prefixes declared so far in the file.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.reader.grammar.prefixes()
    }
}

/// A [TriG](https://www.w3.org/TR/trig/) serializer.
///
/// ```
/// use kestrel_model::{vocab::rdf, NamedNodeRef, QuadRef};
/// use kestrel_ttl::TriGSerializer;
///
/// let mut serializer = TriGSerializer::new()
///     .with_prefix("dc", "http://purl.org/dc/elements/1.1/")?
///     .for_writer(Vec::new());
/// serializer.serialize_quad(QuadRef::new(
///     NamedNodeRef::new_unchecked("http://example.com/book/1"),
///     rdf::TYPE,
///     NamedNodeRef::new_unchecked("http://purl.org/dc/dcmitype/Text"),
///     NamedNodeRef::new_unchecked("http://example.com/graph"),
/// ))?;
/// assert_eq!(
///     String::from_utf8(serializer.finish()?)?,
///     "@prefix dc: <http://purl.org/dc/elements/1.1/> .\n\
///      <http://example.com/graph> {\n\
///      \t<http://example.com/book/1> a <http://purl.org/dc/dcmitype/Text> .\n\
///      }\n"
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Default, Clone)]
#[must_use]
pub struct TriGSerializer {
    prefixes: BTreeMap<String, String>,
}

impl TriGSerializer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_prefix(
        mut self,
        prefix_name: impl Into<String>,
        prefix_iri: impl Into<String>,
    ) -> Result<Self, IriParseError> {
        let namespace = Iri::parse(prefix_iri.into())?.into_inner();
        self.prefixes.insert(namespace, prefix_name.into());
        Ok(self)
    }

    /// Writes TriG to a [`Write`] implementation.
    pub fn for_writer<W: Write>(self, writer: W) -> WriterTriGSerializer<W> {
        WriterTriGSerializer {
            writer,
            engine: TerseWriter::new(self.prefixes),
        }
    }
}

/// Writes TriG to a [`Write`] implementation.
///
/// Built by [`TriGSerializer::for_writer`].
#[must_use]
pub struct WriterTriGSerializer<W: Write> {
    writer: W,
    engine: TerseWriter,
}

impl<W: Write> WriterTriGSerializer<W> {
    /// Buffers one statement; it reaches the output once its subject block
    /// is complete.
    pub fn serialize_quad<'a>(&mut self, q: impl Into<QuadRef<'a>>) -> io::Result<()> {
        self.engine.add(q.into(), &mut self.writer)
    }

    /// Flushes the last block and hands the underlying [`Write`] back.
    pub fn finish(mut self) -> io::Result<W> {
        self.engine.finish(&mut self.writer)?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_model::{BlankNode, GraphName, Literal, NamedNode, Quad};

    #[test]
    fn graph_blocks_in_both_spellings() {
        let file = r#"@prefix ex: <http://example.com/> .
ex:s ex:p ex:o .
ex:g { ex:s ex:p "in graph" . }
GRAPH ex:g2 { ex:s2 ex:p2 ex:o2 . }"#;
        let statements = TriGParser::new()
            .for_slice(file)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(statements.len(), 3);
        assert!(statements[0].graph_name.is_default_graph());
        assert_eq!(
            statements[1].graph_name.to_string(),
            "<http://example.com/g>"
        );
        assert_eq!(
            statements[2].graph_name.to_string(),
            "<http://example.com/g2>"
        );
    }

    #[test]
    fn serializer_groups_subjects_and_graphs() {
        let s = NamedNode::new_unchecked("http://ex/s");
        let p = NamedNode::new_unchecked("http://ex/p");
        let g = NamedNode::new_unchecked("http://ex/g");
        let mut serializer = TriGSerializer::new().for_writer(Vec::new());
        serializer
            .serialize_quad(
                Quad::new(
                    s.clone(),
                    p.clone(),
                    Literal::new_simple_literal("a"),
                    GraphName::DefaultGraph,
                )
                .as_ref(),
            )
            .unwrap();
        serializer
            .serialize_quad(
                Quad::new(
                    s.clone(),
                    p.clone(),
                    Literal::new_simple_literal("b"),
                    GraphName::DefaultGraph,
                )
                .as_ref(),
            )
            .unwrap();
        serializer
            .serialize_quad(
                Quad::new(s.clone(), p.clone(), BlankNode::new_unchecked("x"), g).as_ref(),
            )
            .unwrap();
        let out = String::from_utf8(serializer.finish().unwrap()).unwrap();
        assert_eq!(
            out,
            "<http://ex/s> <http://ex/p> \"a\" , \"b\" .\n\
             <http://ex/g> {\n\
             \t<http://ex/s> <http://ex/p> _:x .\n\
             }\n"
        );
    }

    #[test]
    fn round_trip_through_the_parser() {
        let statement = Quad::new(
            NamedNode::new_unchecked("http://ex/s"),
            NamedNode::new_unchecked("http://ex/p"),
            Literal::new_simple_literal("o"),
            NamedNode::new_unchecked("http://ex/g"),
        );
        let mut serializer = TriGSerializer::new()
            .with_prefix("ex", "http://ex/")
            .unwrap()
            .for_writer(Vec::new());
        serializer.serialize_quad(statement.as_ref()).unwrap();
        let bytes = serializer.finish().unwrap();
        let parsed = TriGParser::new()
            .for_slice(&bytes)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(parsed, vec![statement]);
    }
}
