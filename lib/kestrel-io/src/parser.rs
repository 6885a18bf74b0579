//! Utilities to read RDF graphs and datasets.

use crate::diagnostics::Diagnostic;
use crate::error::{RdfParseError, RdfSyntaxError};
use crate::format::RdfSyntax;
use crate::options::{SyntaxOption, UnsupportedOptionError};
use kestrel_feed::{FeedParser, ReaderFeedParser};
use kestrel_iri::IriParseError;
use kestrel_model::{
    BlankNode, GraphName, NamedOrBlankNode, Quad, Term, Triple,
};
use kestrel_rdfxml::{RdfXmlParser, ReaderRdfXmlParser};
use kestrel_ttl::ntriples::ReaderNTriplesParser;
use kestrel_ttl::trig::ReaderTriGParser;
use kestrel_ttl::turtle::ReaderTurtleParser;
use kestrel_ttl::{NTriplesParser, TriGParser, TurtleParser};
use std::collections::HashMap;
use std::io::Read;

/// The parser side of the unified front end: pick a syntax, feed bytes,
/// get quads.
///
/// The supported syntaxes:
/// * [N-Triples](https://www.w3.org/TR/n-triples/) ([`RdfSyntax::NTriples`])
/// * [RDF/XML](https://www.w3.org/TR/rdf-syntax-grammar/) ([`RdfSyntax::RdfXml`])
/// * RSS/Atom feeds ([`RdfSyntax::Rss`])
/// * [TriG](https://www.w3.org/TR/trig/) ([`RdfSyntax::TriG`])
/// * [Turtle](https://www.w3.org/TR/turtle/) ([`RdfSyntax::Turtle`])
///
/// Note the useful options:
/// - [`with_base_iri`](Self::with_base_iri) to resolve the relative IRIs,
/// - [`rename_blank_nodes`](Self::rename_blank_nodes) to rename the blank
///   nodes to auto-generated ids to avoid conflicts when merging RDF graphs
///   together,
/// - [`without_named_graphs`](Self::without_named_graphs) to parse a single
///   graph,
/// - [`lenient`](Self::lenient) to skip some validations if the file is
///   already known to be valid.
///
/// ```
/// use kestrel_io::{RdfParser, RdfSyntax};
///
/// let file = "<http://example.com/s> <http://example.com/p> <http://example.com/o> .";
///
/// let parser = RdfParser::from_syntax(RdfSyntax::NTriples);
/// let quads = parser
///     .for_reader(file.as_bytes())
///     .collect::<Result<Vec<_>, _>>()?;
///
/// assert_eq!(quads.len(), 1);
/// assert_eq!(quads[0].subject.to_string(), "<http://example.com/s>");
/// # std::io::Result::Ok(())
/// ```
#[must_use]
pub struct RdfParser {
    inner: RdfParserKind,
    default_graph: GraphName,
    without_named_graphs: bool,
    rename_blank_nodes: bool,
    options: Vec<(SyntaxOption, bool)>,
}

enum RdfParserKind {
    NTriples(NTriplesParser),
    RdfXml(RdfXmlParser),
    Rss(FeedParser),
    TriG(TriGParser),
    Turtle(TurtleParser),
}

impl RdfParser {
    /// Picks the concrete parser for `syntax`.
    #[inline]
    pub fn from_syntax(syntax: RdfSyntax) -> Self {
        Self {
            inner: match syntax {
                RdfSyntax::NTriples => RdfParserKind::NTriples(NTriplesParser::new()),
                RdfSyntax::RdfXml => RdfParserKind::RdfXml(RdfXmlParser::new()),
                RdfSyntax::Rss => RdfParserKind::Rss(FeedParser::new()),
                RdfSyntax::TriG => RdfParserKind::TriG(TriGParser::new()),
                RdfSyntax::Turtle => RdfParserKind::Turtle(TurtleParser::new()),
            },
            default_graph: GraphName::DefaultGraph,
            without_named_graphs: false,
            rename_blank_nodes: false,
            options: Vec::new(),
        }
    }

    /// The syntax the parser reads.
    pub fn syntax(&self) -> RdfSyntax {
        match self.inner {
            RdfParserKind::NTriples(_) => RdfSyntax::NTriples,
            RdfParserKind::RdfXml(_) => RdfSyntax::RdfXml,
            RdfParserKind::Rss(_) => RdfSyntax::Rss,
            RdfParserKind::TriG(_) => RdfSyntax::TriG,
            RdfParserKind::Turtle(_) => RdfSyntax::Turtle,
        }
    }

    /// The base IRI the relative references of the input resolve against.
    ///
    /// ```
    /// use kestrel_io::{RdfParser, RdfSyntax};
    ///
    /// let file = "</s> </p> </o> .";
    ///
    /// let quads = RdfParser::from_syntax(RdfSyntax::Turtle)
    ///     .with_base_iri("http://example.com")?
    ///     .for_reader(file.as_bytes())
    ///     .collect::<Result<Vec<_>, _>>()?;
    ///
    /// assert_eq!(quads.len(), 1);
    /// assert_eq!(quads[0].subject.to_string(), "<http://example.com/s>");
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    #[inline]
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Result<Self, IriParseError> {
        self.inner = match self.inner {
            RdfParserKind::NTriples(p) => RdfParserKind::NTriples(p),
            RdfParserKind::RdfXml(p) => RdfParserKind::RdfXml(p.with_base_iri(base_iri)?),
            RdfParserKind::Rss(p) => RdfParserKind::Rss(p.with_base_iri(base_iri)?),
            RdfParserKind::TriG(p) => RdfParserKind::TriG(p.with_base_iri(base_iri)?),
            RdfParserKind::Turtle(p) => RdfParserKind::Turtle(p.with_base_iri(base_iri)?),
        };
        Ok(self)
    }

    /// Statements of the default graph come out under this graph name
    /// instead.
    #[inline]
    pub fn with_default_graph(mut self, default_graph: impl Into<GraphName>) -> Self {
        self.default_graph = default_graph.into();
        self
    }

    /// Makes any named graph in the input an error.
    #[inline]
    pub fn without_named_graphs(mut self) -> Self {
        self.without_named_graphs = true;
        self
    }

    /// Replaces the document's blank node labels with fresh ids, so that
    /// merging several inputs cannot collide them.
    #[inline]
    pub fn rename_blank_nodes(mut self) -> Self {
        self.rename_blank_nodes = true;
        self
    }

    /// Trusts the input and skips the expensive validations.
    #[inline]
    pub fn lenient(mut self) -> Self {
        self.inner = match self.inner {
            RdfParserKind::NTriples(p) => RdfParserKind::NTriples(p.lenient()),
            RdfParserKind::RdfXml(p) => RdfParserKind::RdfXml(p.lenient()),
            RdfParserKind::Rss(p) => RdfParserKind::Rss(p),
            RdfParserKind::TriG(p) => RdfParserKind::TriG(p.lenient()),
            RdfParserKind::Turtle(p) => RdfParserKind::Turtle(p.lenient()),
        };
        self
    }

    /// Sets a boolean tunable.
    ///
    /// Options only affect the syntaxes they were designed for; setting one
    /// on a parser of another syntax is accepted and ignored, but setting a
    /// serializer option on a parser is an error.
    pub fn with_option(
        mut self,
        option: SyntaxOption,
        value: bool,
    ) -> Result<Self, UnsupportedOptionError> {
        self.options.push((option, value));
        if option == SyntaxOption::Lenient {
            return Ok(if value { self.lenient() } else { self });
        }
        self.inner = match self.inner {
            RdfParserKind::RdfXml(p) => RdfParserKind::RdfXml(match (option, value) {
                (SyntaxOption::Scanning, true) => p.scanning(),
                (SyntaxOption::AllowBagId, true) => p.allow_bag_id(),
                (SyntaxOption::AllowOtherParseTypes, true) => p.allow_other_parse_types(),
                (SyntaxOption::AllowRdfTypeRdfList, true) => p.allow_rdf_type_rdf_list(),
                (SyntaxOption::NonNfcFatal, true) => p.non_nfc_fatal(),
                (SyntaxOption::NormalizeLanguage, false) => p.without_language_normalization(),
                _ => p,
            }),
            inner => inner,
        };
        Ok(self)
    }

    /// The current value of a tunable: the last value it was set to, or its
    /// default.
    pub fn option(&self, option: SyntaxOption) -> bool {
        self.options
            .iter()
            .rev()
            .find(|(o, _)| *o == option)
            .map_or_else(|| option.default_value(), |(_, v)| *v)
    }

    /// Registers a callback receiving the recoverable oddities of the input
    /// as [`Diagnostic`]s.
    pub fn with_diagnostic_handler(
        mut self,
        mut handler: impl FnMut(&Diagnostic) + 'static,
    ) -> Self {
        self.inner = match self.inner {
            RdfParserKind::RdfXml(p) => RdfParserKind::RdfXml(
                p.with_warning_handler(move |message| handler(&Diagnostic::warning(message))),
            ),
            RdfParserKind::Rss(p) => RdfParserKind::Rss(
                p.with_warning_handler(move |message| handler(&Diagnostic::warning(message))),
            ),
            inner => inner,
        };
        self
    }

    /// Parses from a [`Read`] implementation and returns an iterator of quads.
    pub fn for_reader<R: Read>(self, reader: R) -> ReaderQuadParser<R> {
        ReaderQuadParser {
            inner: match self.inner {
                RdfParserKind::NTriples(p) => {
                    ReaderQuadParserKind::NTriples(p.for_reader(reader))
                }
                RdfParserKind::RdfXml(p) => ReaderQuadParserKind::RdfXml(p.for_reader(reader)),
                RdfParserKind::Rss(p) => ReaderQuadParserKind::Rss(p.for_reader(reader)),
                RdfParserKind::TriG(p) => ReaderQuadParserKind::TriG(p.for_reader(reader)),
                RdfParserKind::Turtle(p) => ReaderQuadParserKind::Turtle(p.for_reader(reader)),
            },
            mapper: QuadMapper {
                default_graph: self.default_graph,
                without_named_graphs: self.without_named_graphs,
                blank_node_map: self.rename_blank_nodes.then(HashMap::new),
            },
        }
    }

    /// Parses from a byte slice.
    pub fn for_slice(self, slice: &[u8]) -> ReaderQuadParser<&[u8]> {
        self.for_reader(slice)
    }
}

/// Parses quads from a [`Read`] implementation.
///
/// Can be built using [`RdfParser::for_reader`].
#[must_use]
pub struct ReaderQuadParser<R: Read> {
    inner: ReaderQuadParserKind<R>,
    mapper: QuadMapper,
}

enum ReaderQuadParserKind<R: Read> {
    NTriples(ReaderNTriplesParser<R>),
    RdfXml(ReaderRdfXmlParser<R>),
    Rss(ReaderFeedParser<R>),
    TriG(ReaderTriGParser<R>),
    Turtle(ReaderTurtleParser<R>),
}

impl<R: Read> Iterator for ReaderQuadParser<R> {
    type Item = Result<Quad, RdfParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(match &mut self.inner {
            ReaderQuadParserKind::NTriples(parser) => match parser.next()? {
                Ok(triple) => Ok(self.mapper.map_triple(triple)),
                Err(e) => Err(e.into()),
            },
            ReaderQuadParserKind::RdfXml(parser) => match parser.next()? {
                Ok(triple) => Ok(self.mapper.map_triple(triple)),
                Err(e) => Err(e.into()),
            },
            ReaderQuadParserKind::Rss(parser) => match parser.next()? {
                Ok(triple) => Ok(self.mapper.map_triple(triple)),
                Err(e) => Err(e.into()),
            },
            ReaderQuadParserKind::TriG(parser) => match parser.next()? {
                Ok(quad) => self.mapper.map_quad(quad),
                Err(e) => Err(e.into()),
            },
            ReaderQuadParserKind::Turtle(parser) => match parser.next()? {
                Ok(triple) => Ok(self.mapper.map_triple(triple)),
                Err(e) => Err(e.into()),
            },
        })
    }
}

impl<R: Read> ReaderQuadParser<R> {
    /// The prefixes declared so far in the file, for the syntaxes that have
    /// prefix declarations.
    pub fn prefixes(&self) -> Vec<(&str, &str)> {
        match &self.inner {
            ReaderQuadParserKind::TriG(parser) => parser.prefixes().collect(),
            ReaderQuadParserKind::Turtle(parser) => parser.prefixes().collect(),
            _ => Vec::new(),
        }
    }

    /// The base IRI in scope, if any.
    pub fn base_iri(&self) -> Option<&str> {
        match &self.inner {
            ReaderQuadParserKind::TriG(parser) => parser.base_iri(),
            ReaderQuadParserKind::Turtle(parser) => parser.base_iri(),
            _ => None,
        }
    }
}

/// Applies the default-graph mapping, the named-graph restriction and the
/// blank node renaming.
struct QuadMapper {
    default_graph: GraphName,
    without_named_graphs: bool,
    /// `Some` when blank nodes should be renamed.
    blank_node_map: Option<HashMap<String, BlankNode>>,
}

impl QuadMapper {
    fn map_blank_node(&mut self, node: BlankNode) -> BlankNode {
        match &mut self.blank_node_map {
            Some(map) => map
                .entry(node.as_str().to_owned())
                .or_insert_with(BlankNode::default)
                .clone(),
            None => node,
        }
    }

    fn map_subject(&mut self, node: NamedOrBlankNode) -> NamedOrBlankNode {
        match node {
            NamedOrBlankNode::NamedNode(node) => node.into(),
            NamedOrBlankNode::BlankNode(node) => self.map_blank_node(node).into(),
        }
    }

    fn map_term(&mut self, term: Term) -> Term {
        match term {
            Term::NamedNode(node) => node.into(),
            Term::BlankNode(node) => self.map_blank_node(node).into(),
            Term::Literal(literal) => literal.into(),
        }
    }

    fn map_triple(&mut self, triple: Triple) -> Quad {
        Quad {
            subject: self.map_subject(triple.subject),
            predicate: triple.predicate,
            object: self.map_term(triple.object),
            graph_name: self.default_graph.clone(),
        }
    }

    fn map_quad(&mut self, quad: Quad) -> Result<Quad, RdfParseError> {
        Ok(match quad.graph_name {
            GraphName::DefaultGraph => Quad {
                subject: self.map_subject(quad.subject),
                predicate: quad.predicate,
                object: self.map_term(quad.object),
                graph_name: self.default_graph.clone(),
            },
            graph_name => {
                if self.without_named_graphs {
                    return Err(RdfSyntaxError::msg("Named graphs are not allowed").into());
                }
                Quad {
                    subject: self.map_subject(quad.subject),
                    predicate: quad.predicate,
                    object: self.map_term(quad.object),
                    graph_name: match graph_name {
                        GraphName::NamedNode(node) => node.into(),
                        GraphName::BlankNode(node) => self.map_blank_node(node).into(),
                        GraphName::DefaultGraph => GraphName::DefaultGraph,
                    },
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_model::NamedNode;

    #[test]
    fn options_are_recorded() {
        let parser = RdfParser::from_syntax(RdfSyntax::RdfXml)
            .with_option(SyntaxOption::Scanning, true)
            .unwrap();
        assert!(parser.option(SyntaxOption::Scanning));
        assert!(!parser.option(SyntaxOption::AllowBagId));
        assert!(parser.option(SyntaxOption::NormalizeLanguage)); // default on
    }

    #[test]
    fn dispatches_by_syntax() {
        let turtle = "@prefix ex: <http://ex/> . ex:s ex:p ex:o .";
        let quads = RdfParser::from_syntax(RdfSyntax::Turtle)
            .for_slice(turtle.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(quads.len(), 1);

        let rdfxml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex/"><rdf:Description rdf:about="http://ex/s"><ex:p>o</ex:p></rdf:Description></rdf:RDF>"#;
        let quads = RdfParser::from_syntax(RdfSyntax::RdfXml)
            .for_slice(rdfxml.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(quads.len(), 1);
    }

    #[test]
    fn named_graphs_can_be_rejected() {
        let trig = "<http://ex/g> { <http://ex/s> <http://ex/p> <http://ex/o> . }";
        assert!(RdfParser::from_syntax(RdfSyntax::TriG)
            .without_named_graphs()
            .for_slice(trig.as_bytes())
            .any(|r| r.is_err()));
    }

    #[test]
    fn default_graph_can_be_replaced() {
        let g = NamedNode::new_unchecked("http://ex/g");
        let quads = RdfParser::from_syntax(RdfSyntax::NTriples)
            .with_default_graph(g.clone())
            .for_slice(b"<http://ex/s> <http://ex/p> <http://ex/o> .")
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(quads[0].graph_name, g.into());
    }

    #[test]
    fn blank_nodes_can_be_renamed() {
        let input = b"_:a <http://ex/p> _:a .";
        let quads = RdfParser::from_syntax(RdfSyntax::NTriples)
            .rename_blank_nodes()
            .for_slice(input)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        // both occurrences are renamed consistently, away from "a"
        assert_ne!(quads[0].subject.to_string(), "_:a");
        assert_eq!(
            quads[0].subject.to_string(),
            quads[0].object.to_string()
        );
    }
}
