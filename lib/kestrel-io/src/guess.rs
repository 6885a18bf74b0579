//! Syntax auto-detection: media type, file suffix and content sniffing.

use crate::error::{RdfParseError, RdfSyntaxError};
use crate::format::RdfSyntax;
use crate::parser::{RdfParser, ReaderQuadParser};
use kestrel_iri::{Iri, IriParseError};
use kestrel_model::Quad;
use std::io::{Chain, Cursor, Read};

/// How many bytes of the input are buffered for content sniffing.
const SNIFF_WINDOW: usize = 4096;

/// A parser that picks the concrete syntax by itself.
///
/// On the first read it scores every registered syntax using the media type
/// (if known), the file name suffix (if known) and a scan of the head of the
/// content, then hands over to the real parser. A one-shot dispatcher: after
/// the choice it behaves exactly like the chosen parser.
///
/// ```
/// use kestrel_io::{GuessParser, RdfSyntax};
///
/// let file = "@prefix ex: <http://example.com/> . ex:s ex:p ex:o .";
///
/// let mut parser = GuessParser::new().for_reader(file.as_bytes());
/// let quads = (&mut parser).collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(parser.syntax(), Some(RdfSyntax::Turtle));
/// assert_eq!(quads.len(), 1);
/// # Result::<_, kestrel_io::RdfParseError>::Ok(())
/// ```
#[derive(Default)]
#[must_use]
pub struct GuessParser {
    media_type: Option<String>,
    file_name: Option<String>,
    base: Option<Iri<String>>,
    lenient: bool,
}

impl GuessParser {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provides the Content-Type the input was retrieved with.
    #[inline]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Provides the file name or retrieval IRI, whose suffix takes part in
    /// the scoring.
    #[inline]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    #[inline]
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Result<Self, IriParseError> {
        let base = Iri::parse(base_iri.into())?;
        self.base = Some(base);
        Ok(self)
    }

    /// Assumes the file is valid to make parsing faster.
    #[inline]
    pub fn lenient(mut self) -> Self {
        self.lenient = true;
        self
    }

    /// Buffers the head of `reader`, picks the syntax and parses.
    pub fn for_reader<R: Read>(self, mut reader: R) -> ReaderGuessParser<R> {
        let mut head = Vec::with_capacity(SNIFF_WINDOW);
        while head.len() < SNIFF_WINDOW {
            let mut chunk = [0; 512];
            match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(read) => head.extend_from_slice(&chunk[..read]),
                Err(e) => {
                    return ReaderGuessParser {
                        inner: None,
                        error: Some(e.into()),
                        syntax: None,
                    };
                }
            }
        }
        let Some(syntax) = self.guess(&head) else {
            return ReaderGuessParser {
                inner: None,
                error: Some(
                    RdfSyntaxError::msg("Unable to guess the RDF syntax of the input").into(),
                ),
                syntax: None,
            };
        };
        let mut parser = RdfParser::from_syntax(syntax);
        if self.lenient {
            parser = parser.lenient();
        }
        if let Some(base) = &self.base {
            match parser.with_base_iri(base.as_str()) {
                Ok(p) => parser = p,
                Err(e) => {
                    return ReaderGuessParser {
                        inner: None,
                        error: Some(RdfParseError::Io(std::io::Error::new(
                            std::io::ErrorKind::InvalidInput,
                            e,
                        ))),
                        syntax: Some(syntax),
                    };
                }
            }
        }
        ReaderGuessParser {
            inner: Some(parser.for_reader(Cursor::new(head).chain(reader))),
            error: None,
            syntax: Some(syntax),
        }
    }

    /// Scores every registered syntax and returns the best match.
    pub fn guess(&self, head: &[u8]) -> Option<RdfSyntax> {
        let mut best = None;
        let mut best_score = 0;
        for syntax in RdfSyntax::ALL {
            let score = self.score(syntax, head);
            if score > best_score {
                best = Some(syntax);
                best_score = score;
            }
        }
        best.or_else(|| {
            // no signal at all: an N-Triples-looking plain text default
            head.iter()
                .all(|b| b.is_ascii())
                .then_some(RdfSyntax::NTriples)
        })
    }

    fn score(&self, syntax: RdfSyntax, head: &[u8]) -> u32 {
        let mut score = content_score(syntax, head);
        if let Some(media_type) = &self.media_type {
            if RdfSyntax::from_media_type(media_type) == Some(syntax) {
                score += 8;
            }
        }
        if let Some(file_name) = &self.file_name {
            if let Some(extension) = file_name.rsplit('.').next() {
                if RdfSyntax::from_extension(extension) == Some(syntax) {
                    score += 2;
                }
            }
        }
        score
    }
}

fn content_score(syntax: RdfSyntax, head: &[u8]) -> u32 {
    let head = String::from_utf8_lossy(head);
    let mut score = 0;
    // XML markers would also match IRIs in terse syntaxes, so the XML-based
    // scores require a document that actually starts with a tag
    let looks_like_xml = head.trim_start().starts_with('<')
        && (head.contains("<?xml") || head.contains("xmlns") || head.contains("</"));
    match syntax {
        RdfSyntax::RdfXml if looks_like_xml => {
            if head.contains("<rdf:RDF") {
                score += 8;
            }
            if head.contains("xmlns:rdf") {
                score += 4;
            }
            if head.contains("<rdf:Description") {
                score += 4;
            }
            if head.starts_with("<?xml") {
                score += 1;
            }
        }
        RdfSyntax::Rss if looks_like_xml => {
            if head.contains("<rss") || head.contains("<feed") {
                score += 8;
            }
            if head.contains("<channel") {
                score += 4;
            }
            if head.contains("http://purl.org/rss/1.0/") {
                score += 4;
            }
            if head.contains("<item") {
                score += 2;
            }
        }
        RdfSyntax::RdfXml | RdfSyntax::Rss => (),
        RdfSyntax::Turtle => score += turtle_markers(&head),
        RdfSyntax::TriG => {
            // a Turtle-family document with graph blocks is TriG
            if head.contains('{') {
                score += turtle_markers(&head) + 4;
            }
            if head.contains("GRAPH ") {
                score += 4;
            }
        }
        RdfSyntax::NTriples => {
            if let Some(line) = head.lines().find(|l| !l.trim().is_empty()) {
                let line = line.trim();
                if (line.starts_with('<') || line.starts_with("_:"))
                    && line.ends_with('.')
                    && !head.contains("@prefix")
                {
                    score += 4;
                }
            }
        }
    }
    score
}

fn turtle_markers(head: &str) -> u32 {
    let mut score = 0;
    if head.contains("@prefix") || head.contains("PREFIX ") {
        score += 8;
    }
    if head.contains("@base") || head.contains("BASE ") {
        score += 2;
    }
    score
}

/// Parses quads from a [`Read`] implementation after the syntax has been
/// guessed. Can be built using [`GuessParser::for_reader`].
#[must_use]
pub struct ReaderGuessParser<R: Read> {
    inner: Option<ReaderQuadParser<Chain<Cursor<Vec<u8>>, R>>>,
    error: Option<RdfParseError>,
    syntax: Option<RdfSyntax>,
}

impl<R: Read> ReaderGuessParser<R> {
    /// The guessed syntax, if the guess already happened and succeeded.
    pub fn syntax(&self) -> Option<RdfSyntax> {
        self.syntax
    }
}

impl<R: Read> Iterator for ReaderGuessParser<R> {
    type Item = Result<Quad, RdfParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(error) = self.error.take() {
            return Some(Err(error));
        }
        self.inner.as_mut()?.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_from_content() {
        let guesser = GuessParser::new();
        assert_eq!(
            guesser.guess(b"@prefix ex: <http://ex/> .\nex:s ex:p ex:o ."),
            Some(RdfSyntax::Turtle)
        );
        assert_eq!(
            guesser.guess(b"@prefix ex: <http://ex/> .\nex:g { ex:s ex:p ex:o . }"),
            Some(RdfSyntax::TriG)
        );
        assert_eq!(
            guesser.guess(b"<?xml version=\"1.0\"?>\n<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\"/>"),
            Some(RdfSyntax::RdfXml)
        );
        assert_eq!(
            guesser.guess(b"<?xml version=\"1.0\"?>\n<rss version=\"2.0\"><channel/></rss>"),
            Some(RdfSyntax::Rss)
        );
        assert_eq!(
            guesser.guess(b"<http://ex/s> <http://ex/p> \"o\" ."),
            Some(RdfSyntax::NTriples)
        );
    }

    #[test]
    fn media_type_dominates_ambiguous_content() {
        let guesser = GuessParser::new().with_media_type("text/turtle");
        assert_eq!(guesser.guess(b"<http://ex/s> <http://ex/p> <http://ex/o> ."), Some(RdfSyntax::Turtle));
    }

    #[test]
    fn suffix_is_a_weak_signal() {
        let guesser = GuessParser::new().with_file_name("data.rdf");
        assert_eq!(guesser.guess(b""), Some(RdfSyntax::RdfXml));
    }

    #[test]
    fn parses_after_guessing() {
        let file = "<http://ex/s> <http://ex/p> <http://ex/o> .";
        let mut parser = GuessParser::new().for_reader(file.as_bytes());
        let quads = (&mut parser).collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(parser.syntax(), Some(RdfSyntax::NTriples));
        assert_eq!(quads.len(), 1);
    }
}
