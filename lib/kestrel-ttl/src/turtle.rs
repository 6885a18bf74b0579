//! [Turtle](https://www.w3.org/TR/turtle/), parsed by [`TurtleParser`] and
//! written by [`TurtleSerializer`].

use crate::reader::{ReaderDriver, SliceDriver, TtlReader};
use crate::terse::TurtleGrammar;
use crate::violation::{TtlParseError, TtlSyntaxError};
use crate::writer::TerseWriter;
use kestrel_iri::{Iri, IriParseError};
use kestrel_model::{GraphNameRef, Quad, Triple, TripleRef};
use std::collections::{BTreeMap, HashMap};
use std::io::{self, Read, Write};

/// A [Turtle](https://www.w3.org/TR/turtle/) streaming parser.
///
/// ```
/// use kestrel_ttl::TurtleParser;
///
/// let file = r#"@base <http://example.com/> .
/// @prefix dc: <http://purl.org/dc/elements/1.1/> .
/// <book/1> dc:title "Moby-Dick" ;
///     dc:creator "Herman Melville" ."#;
///
/// let statements = TurtleParser::new()
///     .for_slice(file)
///     .collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(statements.len(), 2);
/// assert_eq!(
///     statements[0].subject.to_string(),
///     "<http://example.com/book/1>"
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Default, Clone)]
#[must_use]
pub struct TurtleParser {
    lenient: bool,
    base: Option<Iri<String>>,
    prefixes: HashMap<String, String>,
}

impl TurtleParser {
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
        TurtleGrammar::new(false, self.lenient, self.base, self.prefixes)
    }

    /// Parses from a [`Read`] implementation.
    pub fn for_reader<R: Read>(self, input: R) -> ReaderTurtleParser<R> {
        ReaderTurtleParser {
            inner: ReaderDriver {
                reader: TtlReader::new(self.grammar()),
                input,
            },
        }
    }

    /// Parses from a byte slice.
    pub fn for_slice(self, slice: &(impl AsRef<[u8]> + ?Sized)) -> SliceTurtleParser {
        SliceTurtleParser {
            inner: SliceDriver::new(self.grammar(), slice.as_ref()),
        }
    }

    /// Builds the push-based form of the parser, fed chunk by chunk.
    pub fn chunked(self) -> ChunkedTurtleParser {
        ChunkedTurtleParser {
            reader: TtlReader::new(self.grammar()),
        }
    }
}

/// Parses Turtle from a [`Read`] implementation.
///
/// Built by [`TurtleParser::for_reader`].
#[must_use]
pub struct ReaderTurtleParser<R: Read> {
    inner: ReaderDriver<R, TurtleGrammar>,
}

impl<R: Read> ReaderTurtleParser<R> {
    /// The prefixes declared so far in the file.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.reader.grammar.prefixes()
    }

    /// The base IRI in scope, if any.
    pub fn base_iri(&self) -> Option<&str> {
        self.inner.reader.grammar.base()
    }
}

impl<R: Read> Iterator for ReaderTurtleParser<R> {
    type Item = Result<Triple, TtlParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.inner.next()?.map(Triple::from))
    }
}

/// Parses Turtle from a byte slice.
///
/// Built by [`TurtleParser::for_slice`].
#[must_use]
pub struct SliceTurtleParser {
    inner: SliceDriver<TurtleGrammar>,
}

impl Iterator for SliceTurtleParser {
    type Item = Result<Triple, TtlSyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.inner.next()?.map(Triple::from))
    }
}

/// The push-based form: feed chunks in, pull statements out.
///
/// Built by [`TurtleParser::chunked`].
#[must_use]
pub struct ChunkedTurtleParser {
    reader: TtlReader<TurtleGrammar>,
}

impl ChunkedTurtleParser {
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
    pub fn next_statement(&mut self) -> Option<Result<Triple, TtlSyntaxError>> {
        Some(self.reader.next_statement()?.map(Triple::from))
    }

    /// The prefixes declared so far in the file.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.reader.grammar.prefixes()
    }
}

/// A [Turtle](https://www.w3.org/TR/turtle/) serializer.
///
/// Statements are grouped by subject, the objects of one predicate are
/// joined with `,`, and `rdf:type` is written as `a`.
///
/// ```
/// use kestrel_model::{vocab::rdf, NamedNodeRef, TripleRef};
/// use kestrel_ttl::TurtleSerializer;
///
/// let mut serializer = TurtleSerializer::new()
///     .with_prefix("dc", "http://purl.org/dc/elements/1.1/")?
///     .for_writer(Vec::new());
/// serializer.serialize_triple(TripleRef::new(
///     NamedNodeRef::new_unchecked("http://example.com/book/1"),
///     rdf::TYPE,
///     NamedNodeRef::new_unchecked("http://purl.org/dc/dcmitype/Text"),
/// ))?;
/// assert_eq!(
///     String::from_utf8(serializer.finish()?)?,
///     "@prefix dc: <http://purl.org/dc/elements/1.1/> .\n\
///      <http://example.com/book/1> a <http://purl.org/dc/dcmitype/Text> .\n"
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Default, Clone)]
#[must_use]
pub struct TurtleSerializer {
    prefixes: BTreeMap<String, String>,
}

impl TurtleSerializer {
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

    /// Writes Turtle to a [`Write`] implementation.
    pub fn for_writer<W: Write>(self, writer: W) -> WriterTurtleSerializer<W> {
        WriterTurtleSerializer {
            writer,
            engine: TerseWriter::new(self.prefixes),
        }
    }
}

/// Writes Turtle to a [`Write`] implementation.
///
/// Built by [`TurtleSerializer::for_writer`].
#[must_use]
pub struct WriterTurtleSerializer<W: Write> {
    writer: W,
    engine: TerseWriter,
}

impl<W: Write> WriterTurtleSerializer<W> {
    /// Buffers one statement; it reaches the output once its subject block
    /// is complete.
    pub fn serialize_triple<'a>(&mut self, t: impl Into<TripleRef<'a>>) -> io::Result<()> {
        self.engine
            .add(t.into().in_graph(GraphNameRef::DefaultGraph), &mut self.writer)
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
    use kestrel_model::vocab::rdf;
    use kestrel_model::NamedNode;

    #[test]
    fn predicate_and_object_lists() {
        let file = r#"@prefix ex: <http://ex/> .
ex:s ex:p ex:o1 , ex:o2 ;
     a ex:Class ."#;
        let statements = TurtleParser::new()
            .for_slice(file)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[2].predicate, rdf::TYPE);
    }

    #[test]
    fn blank_node_property_lists() {
        let file = r#"@prefix ex: <http://ex/> .
ex:s ex:knows [ ex:name "Alice" ; ex:age 42 ] ."#;
        let statements = TurtleParser::new()
            .for_slice(file)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(statements.len(), 3);
        // the anonymous node ties the inner statements to the subject
        assert_eq!(
            statements[0].object.to_string(),
            statements[1].subject.to_string()
        );
        assert_eq!(
            statements[2].object.to_string(),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn collections() {
        let file = r#"@prefix ex: <http://ex/> . ex:s ex:p ( "a" "b" "c" ) ."#;
        let statements = TurtleParser::new()
            .for_slice(file)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        // the linking statement, three rdf:first and three rdf:rest
        assert_eq!(statements.len(), 7);
        assert_eq!(
            statements
                .iter()
                .filter(|t| t.predicate == rdf::FIRST)
                .count(),
            3
        );
        assert_eq!(
            statements
                .iter()
                .filter(|t| t.predicate == rdf::REST)
                .count(),
            3
        );
        assert_eq!(
            statements
                .iter()
                .filter(|t| t.object == rdf::NIL.into_owned().into())
                .count(),
            1
        );
    }

    #[test]
    fn base_resolution() {
        let file = "@base <http://example.com/dir/> . <foo> <bar> <../baz> .";
        let statements = TurtleParser::new()
            .for_slice(file)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(
            statements[0].to_string(),
            "<http://example.com/dir/foo> <http://example.com/dir/bar> <http://example.com/baz>"
        );
    }

    #[test]
    fn base_from_the_builder() {
        let statements = TurtleParser::new()
            .with_base_iri("http://example.com/base/")
            .unwrap()
            .for_slice("<s> <p> <o> .")
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(
            statements[0].subject.to_string(),
            "<http://example.com/base/s>"
        );
    }

    #[test]
    fn undeclared_prefixes_are_reported() {
        assert!(TurtleParser::new()
            .for_slice("ex:s ex:p ex:o .")
            .any(|outcome| outcome.is_err()));
    }

    #[test]
    fn long_strings_and_comments() {
        let file = "# a comment\n<http://ex/s> <http://ex/p> \"\"\"multi\nline\"\"\" .";
        let statements = TurtleParser::new()
            .for_slice(file)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(statements[0].object.to_string(), "\"multi\\nline\"");
    }

    #[test]
    fn serializer_groups_and_round_trips() {
        let statements = vec![
            Triple::new(
                NamedNode::new_unchecked("http://ex/s"),
                rdf::TYPE,
                NamedNode::new_unchecked("http://ex/Class"),
            ),
            Triple::new(
                NamedNode::new_unchecked("http://ex/s"),
                NamedNode::new_unchecked("http://ex/p"),
                NamedNode::new_unchecked("http://ex/o"),
            ),
        ];
        let mut serializer = TurtleSerializer::new()
            .with_prefix("ex", "http://ex/")
            .unwrap()
            .for_writer(Vec::new());
        for statement in &statements {
            serializer.serialize_triple(statement.as_ref()).unwrap();
        }
        let bytes = serializer.finish().unwrap();
        assert_eq!(
            String::from_utf8(bytes.clone()).unwrap(),
            "@prefix ex: <http://ex/> .\nex:s a ex:Class ;\n\tex:p ex:o .\n"
        );
        let parsed = TurtleParser::new()
            .for_slice(&bytes)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(parsed, statements);
    }

    #[test]
    fn chunk_boundaries_are_invisible() {
        let mut parser = TurtleParser::new().chunked();
        parser.parse_chunk(b"@prefix ex: <http://e");
        parser.parse_chunk(b"x/> . ex:s ex:p \"spl");
        parser.parse_chunk(b"it\" .");
        parser.end();
        let mut statements = Vec::new();
        while let Some(outcome) = parser.next_statement() {
            statements.push(outcome.unwrap());
        }
        assert!(parser.is_finished());
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].object.to_string(), "\"split\"");
    }
}
