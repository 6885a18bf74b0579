//! [N-Triples](https://www.w3.org/TR/n-triples/): the line-oriented syntax,
//! parsed by [`NTriplesParser`] and written by [`NTriplesSerializer`].

use crate::reader::{Grammar, Outcomes, ReaderDriver, SliceDriver, TtlReader};
use crate::scanner::{Lexeme, Mark, TerseScanner};
use crate::violation::{TtlParseError, TtlSyntaxError};
use kestrel_iri::Iri;
use kestrel_model::vocab::rdf;
use kestrel_model::{
    BlankNode, Literal, Locator, NamedNode, NamedOrBlankNode, Term, Triple, TripleRef,
};
use oxilangtag::LanguageTag;
use std::borrow::Cow;
use std::io::{self, Read, Write};

/// An [N-Triples](https://www.w3.org/TR/n-triples/) streaming parser.
///
/// One statement per line; a broken line is reported and skipped, the lines
/// after it are still parsed.
///
/// ```
/// use kestrel_ttl::NTriplesParser;
///
/// let file = "<http://example.com/book/1> <http://purl.org/dc/elements/1.1/title> \"Moby-Dick\" .\n\
///     _:whale <http://purl.org/dc/elements/1.1/subject> \"cetology\"@en .";
/// let statements = NTriplesParser::new()
///     .for_slice(file)
///     .collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(statements.len(), 2);
/// assert_eq!(statements[1].object.to_string(), "\"cetology\"@en");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Default, Clone)]
#[must_use]
pub struct NTriplesParser {
    lenient: bool,
}

impl NTriplesParser {
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

    /// Parses from a [`Read`] implementation.
    pub fn for_reader<R: Read>(self, input: R) -> ReaderNTriplesParser<R> {
        ReaderNTriplesParser {
            inner: ReaderDriver {
                reader: TtlReader::new(NTriplesGrammar::new(self.lenient)),
                input,
            },
        }
    }

    /// Parses from a byte slice.
    pub fn for_slice(self, slice: &(impl AsRef<[u8]> + ?Sized)) -> SliceNTriplesParser {
        SliceNTriplesParser {
            inner: SliceDriver::new(NTriplesGrammar::new(self.lenient), slice.as_ref()),
        }
    }

    /// Builds the push-based form of the parser, fed chunk by chunk.
    ///
    /// ```
    /// use kestrel_ttl::NTriplesParser;
    ///
    /// // the chunk boundary may fall in the middle of anything
    /// let chunks: [&[u8]; 3] = [
    ///     b"<http://example.com/book/1> <http://purl.org",
    ///     b"/dc/elements/1.1/title> \"Moby-",
    ///     b"Dick\" .\n",
    /// ];
    ///
    /// let mut parser = NTriplesParser::new().chunked();
    /// let mut titles = 0;
    /// for chunk in chunks {
    ///     parser.parse_chunk(chunk);
    ///     while let Some(statement) = parser.next_statement() {
    ///         if statement?.predicate.as_str().ends_with("title") {
    ///             titles += 1;
    ///         }
    ///     }
    /// }
    /// parser.end();
    /// while let Some(statement) = parser.next_statement() {
    ///     statement?;
    /// }
    /// assert!(parser.is_finished());
    /// assert_eq!(titles, 1);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn chunked(self) -> ChunkedNTriplesParser {
        ChunkedNTriplesParser {
            reader: TtlReader::new(NTriplesGrammar::new(self.lenient)),
        }
    }
}

/// Parses N-Triples from a [`Read`] implementation.
///
/// Built by [`NTriplesParser::for_reader`].
#[must_use]
pub struct ReaderNTriplesParser<R: Read> {
    inner: ReaderDriver<R, NTriplesGrammar>,
}

impl<R: Read> Iterator for ReaderNTriplesParser<R> {
    type Item = Result<Triple, TtlParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Parses N-Triples from a byte slice.
///
/// Built by [`NTriplesParser::for_slice`].
#[must_use]
pub struct SliceNTriplesParser {
    inner: SliceDriver<NTriplesGrammar>,
}

impl Iterator for SliceNTriplesParser {
    type Item = Result<Triple, TtlSyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// The push-based form: feed chunks in, pull statements out.
///
/// Built by [`NTriplesParser::chunked`].
#[must_use]
pub struct ChunkedNTriplesParser {
    reader: TtlReader<NTriplesGrammar>,
}

impl ChunkedNTriplesParser {
    /// Pushes one chunk of bytes. Never blocks and never reads anything.
    pub fn parse_chunk(&mut self, chunk: &[u8]) {
        self.reader.parse_chunk(chunk);
    }

    /// Announces the end of the input, releasing whatever was held back
    /// waiting for more bytes.
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
        self.reader.next_statement()
    }
}

/// What the statement machine is waiting for.
enum Stage {
    Subject,
    Predicate,
    Object,
    /// A literal value waiting for `@lang`, `^^`, or nothing.
    Annotation(String),
    /// A literal value after `^^`, waiting for the datatype IRI.
    Datatype(String),
    /// The statement is complete, only the `.` is missing.
    Terminator,
}

/// The N-Triples statement machine.
///
/// There is no rule stack: the grammar is regular, and the line discipline
/// is enforced by comparing the line numbers the reader stamps on lexemes.
struct NTriplesGrammar {
    lenient: bool,
    stage: Stage,
    subject: Option<NamedOrBlankNode>,
    predicate: Option<NamedNode>,
    /// The statement, complete but not yet terminated by `.`.
    ready: Option<Triple>,
    /// The line the in-progress statement started on.
    statement_line: u64,
    /// The line of the last terminating `.`, to catch a second statement on
    /// the same line.
    finished_line: Option<u64>,
    /// When set, everything on this line is discarded (error recovery).
    skip_line: Option<u64>,
}

impl NTriplesGrammar {
    fn new(lenient: bool) -> Self {
        Self {
            lenient,
            stage: Stage::Subject,
            subject: None,
            predicate: None,
            ready: None,
            statement_line: 0,
            finished_line: None,
            skip_line: None,
        }
    }

    fn clear(&mut self) {
        self.stage = Stage::Subject;
        self.subject = None;
        self.predicate = None;
        self.ready = None;
    }

    fn give_up(&mut self, at: &Locator, out: &mut Outcomes<Triple>, message: &str) {
        out.complain(at, message);
        self.abandon(at);
    }

    /// Drops the statement in progress and skips the rest of its line; the
    /// complaint was already made.
    fn abandon(&mut self, at: &Locator) {
        self.clear();
        self.skip_line = at.line;
    }

    /// Validates an IRI lexeme into a term; N-Triples has no base, so the
    /// reference must already be absolute.
    fn iri_term(
        &self,
        iri: Cow<'_, str>,
        at: &Locator,
        out: &mut Outcomes<Triple>,
    ) -> Option<NamedNode> {
        if !self.lenient {
            if let Err(error) = Iri::parse(iri.as_ref()) {
                out.complain(at, error.to_string());
                return None;
            }
        }
        Some(NamedNode::new_unchecked(iri.into_owned()))
    }

    fn complete(&mut self, object: impl Into<Term>) {
        if let (Some(subject), Some(predicate)) = (self.subject.take(), self.predicate.take()) {
            self.ready = Some(Triple::new(subject, predicate, object));
        }
        self.stage = Stage::Terminator;
    }
}

impl Grammar for NTriplesGrammar {
    type Output = Triple;

    fn scanner(&self) -> TerseScanner {
        TerseScanner {
            turtle_strings: false,
        }
    }

    fn feed(&mut self, lexeme: Lexeme<'_>, at: &Locator, out: &mut Outcomes<Triple>) {
        let line = at.line.unwrap_or(self.statement_line);
        if self.skip_line == Some(line) {
            return;
        }
        self.skip_line = None;

        // the line discipline: a statement cannot continue past its line
        if !matches!(self.stage, Stage::Subject) && line != self.statement_line {
            if let Stage::Annotation(value) = std::mem::replace(&mut self.stage, Stage::Subject) {
                self.complete(Literal::new_simple_literal(value));
            }
            if let Some(statement) = self.ready.take() {
                out.emit(statement);
            }
            out.complain(at, "the statement was not terminated with '.' on its line");
            self.clear();
        }

        match std::mem::replace(&mut self.stage, Stage::Subject) {
            Stage::Subject => {
                if self.finished_line == Some(line) {
                    out.complain(at, "a line can hold only one statement");
                }
                match lexeme {
                    Lexeme::Iri(iri) => match self.iri_term(iri, at, out) {
                        Some(term) => {
                            self.subject = Some(term.into());
                            self.statement_line = line;
                            self.stage = Stage::Predicate;
                        }
                        None => self.abandon(at),
                    },
                    Lexeme::BlankLabel(label) => {
                        self.subject = Some(BlankNode::new_unchecked(label).into());
                        self.statement_line = line;
                        self.stage = Stage::Predicate;
                    }
                    _ => self.give_up(at, out, "a subject must be an IRI or a blank node"),
                }
            }
            Stage::Predicate => match lexeme {
                Lexeme::Iri(iri) => match self.iri_term(iri, at, out) {
                    Some(term) => {
                        self.predicate = Some(term);
                        self.stage = Stage::Object;
                    }
                    None => self.abandon(at),
                },
                _ => self.give_up(at, out, "a predicate must be an IRI"),
            },
            Stage::Object => match lexeme {
                Lexeme::Iri(iri) => match self.iri_term(iri, at, out) {
                    Some(term) => self.complete(term),
                    None => self.abandon(at),
                },
                Lexeme::BlankLabel(label) => self.complete(BlankNode::new_unchecked(label)),
                Lexeme::Text(value) => self.stage = Stage::Annotation(value),
                _ => self.give_up(at, out, "an object must be an IRI, a blank node or a literal"),
            },
            Stage::Annotation(value) => match lexeme {
                Lexeme::At(tag) => {
                    if !self.lenient {
                        if let Err(error) = LanguageTag::parse(tag) {
                            out.complain(at, error.to_string());
                            self.abandon(at);
                            return;
                        }
                    }
                    self.complete(Literal::new_language_tagged_literal_unchecked(
                        value,
                        tag.to_ascii_lowercase(),
                    ));
                }
                Lexeme::Mark(Mark::DoubleCaret) => self.stage = Stage::Datatype(value),
                other => {
                    self.complete(Literal::new_simple_literal(value));
                    self.feed(other, at, out);
                }
            },
            Stage::Datatype(value) => match lexeme {
                Lexeme::Iri(iri) => {
                    if !self.lenient && iri.as_ref() == rdf::LANG_STRING.as_str() {
                        out.complain(
                            at,
                            "rdf:langString literals must use a language tag, not a datatype",
                        );
                    }
                    match self.iri_term(iri, at, out) {
                        Some(datatype) => {
                            self.complete(Literal::new_typed_literal(value, datatype));
                        }
                        None => self.abandon(at),
                    }
                }
                _ => self.give_up(at, out, "a datatype must be an IRI"),
            },
            Stage::Terminator => {
                if matches!(lexeme, Lexeme::Mark(Mark::Dot)) {
                    if let Some(statement) = self.ready.take() {
                        out.emit(statement);
                    }
                    self.finished_line = Some(line);
                } else {
                    out.complain(at, "a statement must be terminated with '.'");
                    if let Some(statement) = self.ready.take() {
                        out.emit(statement);
                    }
                    self.feed(lexeme, at, out);
                }
            }
        }
    }

    fn flush(&mut self, at: &Locator, out: &mut Outcomes<Triple>) {
        match std::mem::replace(&mut self.stage, Stage::Subject) {
            Stage::Subject => (),
            Stage::Annotation(value) => {
                self.complete(Literal::new_simple_literal(value));
                out.complain(at, "the last statement is missing its '.'");
                if let Some(statement) = self.ready.take() {
                    out.emit(statement);
                }
            }
            Stage::Terminator => {
                out.complain(at, "the last statement is missing its '.'");
                if let Some(statement) = self.ready.take() {
                    out.emit(statement);
                }
            }
            Stage::Predicate | Stage::Object | Stage::Datatype(_) => {
                out.complain(at, "the input ends in the middle of a statement");
            }
        }
        self.clear();
    }

    fn reset_after_error(&mut self, at: &Locator) {
        self.clear();
        self.skip_line = at.line;
    }
}

/// A [canonical](https://www.w3.org/TR/n-triples/#canonical-ntriples)
/// N-Triples serializer.
///
/// ```
/// use kestrel_model::{LiteralRef, NamedNodeRef, TripleRef};
/// use kestrel_ttl::NTriplesSerializer;
///
/// let mut serializer = NTriplesSerializer::new().for_writer(Vec::new());
/// serializer.serialize_triple(TripleRef::new(
///     NamedNodeRef::new_unchecked("http://example.com/book/1"),
///     NamedNodeRef::new_unchecked("http://purl.org/dc/elements/1.1/title"),
///     LiteralRef::new_simple_literal("Moby-Dick"),
/// ))?;
/// assert_eq!(
///     serializer.finish(),
///     b"<http://example.com/book/1> <http://purl.org/dc/elements/1.1/title> \"Moby-Dick\" .\n"
/// );
/// # std::io::Result::Ok(())
/// ```
#[derive(Default, Clone)]
#[must_use]
pub struct NTriplesSerializer;

impl NTriplesSerializer {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Writes N-Triples to a [`Write`] implementation.
    #[allow(clippy::unused_self)]
    pub fn for_writer<W: Write>(self, writer: W) -> WriterNTriplesSerializer<W> {
        WriterNTriplesSerializer { writer }
    }
}

/// Writes N-Triples to a [`Write`] implementation.
///
/// Built by [`NTriplesSerializer::for_writer`].
#[must_use]
pub struct WriterNTriplesSerializer<W: Write> {
    writer: W,
}

impl<W: Write> WriterNTriplesSerializer<W> {
    /// Writes one statement as one line.
    pub fn serialize_triple<'a>(&mut self, t: impl Into<TripleRef<'a>>) -> io::Result<()> {
        let t = t.into();
        writeln!(self.writer, "{} {} {} .", t.subject, t.predicate, t.object)
    }

    /// Ends the output and hands the underlying [`Write`] back.
    pub fn finish(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_model::{BlankNodeRef, LiteralRef, NamedNodeRef};

    #[test]
    fn statements_of_every_object_kind() {
        let input = "\
_:a <http://ex/p> \"x\"@en .
<http://ex/s> <http://ex/p> \"1\"^^<http://www.w3.org/2001/XMLSchema#integer> .
<http://ex/s> <http://ex/p> _:a .";
        let statements = NTriplesParser::new()
            .for_slice(input)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].subject.to_string(), "_:a");
        assert_eq!(statements[0].object.to_string(), "\"x\"@en");
        assert_eq!(
            statements[1].object.to_string(),
            "\"1\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
        assert_eq!(statements[2].object.to_string(), "_:a");
    }

    #[test]
    fn a_broken_line_does_not_take_the_next_one_down() {
        let input = "<http://ex/s> <http://ex/p> \n<http://ex/s2> <http://ex/p2> <http://ex/o2> .";
        let (mut parsed, mut violations) = (0, 0);
        for outcome in NTriplesParser::new().for_slice(input) {
            match outcome {
                Ok(_) => parsed += 1,
                Err(_) => violations += 1,
            }
        }
        assert_eq!(parsed, 1);
        assert_eq!(violations, 1);
    }

    #[test]
    fn violations_carry_their_position() {
        let input = "<http://ex/s> <http://ex/p> <http://ex/o> .\n<http://ex/s> nonsense .";
        let violation = NTriplesParser::new()
            .for_slice(input)
            .filter_map(Result::err)
            .next()
            .unwrap();
        assert_eq!(violation.locator().line, Some(2));
        assert_eq!(violation.locator().column, Some(15));
    }

    #[test]
    fn two_statements_on_one_line_are_reported() {
        let input = "<http://ex/s> <http://ex/p> <http://ex/o> . <http://ex/s> <http://ex/p> <http://ex/o2> .";
        let outcomes: Vec<_> = NTriplesParser::new().for_slice(input).collect();
        assert_eq!(outcomes.iter().filter(|o| o.is_err()).count(), 1);
        assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 2);
    }

    #[test]
    fn round_trip() {
        let statements = vec![
            Triple::new(
                BlankNodeRef::new_unchecked("a"),
                NamedNodeRef::new_unchecked("http://ex/p"),
                LiteralRef::new_language_tagged_literal_unchecked("x", "en"),
            ),
            Triple::new(
                NamedNodeRef::new_unchecked("http://ex/s"),
                NamedNodeRef::new_unchecked("http://ex/p"),
                LiteralRef::new_simple_literal("a\nb\t\"c\""),
            ),
        ];
        let mut serializer = NTriplesSerializer::new().for_writer(Vec::new());
        for statement in &statements {
            serializer.serialize_triple(statement.as_ref()).unwrap();
        }
        let bytes = serializer.finish();
        let parsed = NTriplesParser::new()
            .for_slice(&bytes)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(parsed, statements);
    }
}
