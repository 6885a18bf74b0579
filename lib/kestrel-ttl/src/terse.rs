//! The shared grammar of Turtle and TriG.

use crate::reader::{Grammar, Outcomes};
use crate::scanner::{Lexeme, Mark, NumberKind, TerseScanner};
use kestrel_iri::Iri;
use kestrel_model::vocab::{rdf, xsd};
use kestrel_model::{
    BlankNode, GraphName, Literal, Locator, NamedNode, NamedOrBlankNode, Quad, Term,
};
use oxilangtag::LanguageTag;
use std::borrow::Cow;
use std::collections::HashMap;

/// The rule stack entries.
enum TurtleState {
    ExpectDot,
    BaseExpectIri,
    PrefixExpectPrefix,
    PrefixExpectIri {
        name: String,
    },
    /// A subject term or, in TriG, a graph label.
    TriplesOrGraph,
    /// `[` was read at the top level: an anonymous graph label or a subject
    /// blank node property list.
    WrappedGraphBlankNodePropertyListCurrent,
    /// A term that is a graph label if `{` follows, a subject otherwise.
    WrappedGraphOrPredicateObjectList {
        term: NamedOrBlankNode,
    },
    /// After `GRAPH name`, expects `{`.
    WrappedGraph,
    /// Inside `{ }`, expects triples or the closing `}`.
    WrappedGraphContent,
    /// After triples inside `{ }`, expects `.` or `}`.
    WrappedGraphPossibleEnd,
    /// After `GRAPH`, expects the graph label.
    GraphName,
    /// A subject with no graph-label ambiguity.
    Triples,
    TriplesBlankNodePropertyListCurrent,
    SubjectBlankNodePropertyListEnd,
    SubjectBlankNodePropertyListAfter,
    SubjectCollectionBeginning,
    SubjectCollectionPossibleEnd,
    /// Pops the current subject and forwards the lexeme.
    SubjectEnd,
    PredicateObjectList,
    PredicateObjectListEnd,
    PredicateObjectListPossibleContinuation,
    ObjectsListEnd,
    Object,
    ObjectBlankNodePropertyListCurrent,
    ObjectBlankNodePropertyListEnd,
    ObjectCollectionBeginning,
    ObjectCollectionPossibleEnd,
    LiteralPossibleSuffix {
        value: String,
    },
    LiteralExpectDatatype {
        value: String,
    },
}

/// The Turtle/TriG automaton. TriG is Turtle plus graph blocks, switched on
/// with `with_graph_name`.
pub(crate) struct TurtleGrammar {
    stack: Vec<TurtleState>,
    cur_subject: Vec<NamedOrBlankNode>,
    cur_predicate: Vec<NamedNode>,
    cur_graph: GraphName,
    base: Option<Iri<String>>,
    prefixes: HashMap<String, String>,
    with_graph_name: bool,
    lenient: bool,
    /// Error recovery: discard lexemes until the next `.`.
    recovering: bool,
}

impl TurtleGrammar {
    pub fn new(
        with_graph_name: bool,
        lenient: bool,
        base: Option<Iri<String>>,
        prefixes: HashMap<String, String>,
    ) -> Self {
        Self {
            stack: Vec::new(),
            cur_subject: Vec::new(),
            cur_predicate: Vec::new(),
            cur_graph: GraphName::DefaultGraph,
            base,
            prefixes,
            with_graph_name,
            lenient,
            recovering: false,
        }
    }

    /// The prefixes declared so far.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes
            .iter()
            .map(|(name, iri)| (name.as_str(), iri.as_str()))
    }

    /// The base IRI in scope, if any.
    pub fn base(&self) -> Option<&str> {
        self.base.as_ref().map(Iri::as_str)
    }

    fn bail(&mut self, at: &Locator, out: &mut Outcomes<Quad>, message: impl Into<String>) {
        out.complain(at, message);
        self.stack.clear();
        self.cur_subject.clear();
        self.cur_predicate.clear();
        self.cur_graph = GraphName::DefaultGraph;
        self.recovering = true;
    }

    /// Resolves and validates a raw `<...>` reference into a term.
    fn iri_node(
        &self,
        raw: Cow<'_, str>,
        at: &Locator,
        out: &mut Outcomes<Quad>,
    ) -> Option<NamedNode> {
        if let Some(base) = &self.base {
            return if self.lenient {
                Some(NamedNode::new_unchecked(
                    base.resolve_unchecked(&raw).into_inner(),
                ))
            } else {
                match base.resolve(&raw) {
                    Ok(iri) => Some(NamedNode::new_unchecked(iri.into_inner())),
                    Err(error) => {
                        out.complain(at, error.to_string());
                        None
                    }
                }
            };
        }
        if !self.lenient {
            if let Err(error) = Iri::parse(raw.as_ref()) {
                out.complain(at, error.to_string());
                return None;
            }
        }
        Some(NamedNode::new_unchecked(raw.into_owned()))
    }

    /// Expands a prefixed name against the declared prefixes.
    fn expand(
        &self,
        prefix: &str,
        local: &str,
        needs_check: bool,
        at: &Locator,
        out: &mut Outcomes<Quad>,
    ) -> Option<NamedNode> {
        let Some(namespace) = self.prefixes.get(prefix) else {
            out.complain(at, format!("the prefix '{prefix}:' has not been declared"));
            return None;
        };
        let iri = format!("{namespace}{local}");
        if needs_check && !self.lenient {
            if let Err(error) = Iri::parse(iri.as_str()) {
                out.complain(at, error.to_string());
                return None;
            }
        }
        Some(NamedNode::new_unchecked(iri))
    }

    /// A term from either kind of name lexeme; `None` on a non-name lexeme
    /// or an unusable one (already complained about).
    fn name_term(
        &self,
        lexeme: &mut Option<Lexeme<'_>>,
        at: &Locator,
        out: &mut Outcomes<Quad>,
    ) -> Result<Option<NamedNode>, ()> {
        match lexeme.take() {
            Some(Lexeme::Iri(raw)) => Ok(self.iri_node(raw, at, out)),
            Some(Lexeme::Prefixed {
                prefix,
                local,
                needs_check,
            }) => Ok(self.expand(prefix, &local, needs_check, at, out)),
            other => {
                *lexeme = other;
                Err(())
            }
        }
    }

    fn emit_object(&mut self, out: &mut Outcomes<Quad>, object: impl Into<Term>) {
        if let (Some(subject), Some(predicate)) =
            (self.cur_subject.last(), self.cur_predicate.last())
        {
            out.emit(Quad::new(
                subject.clone(),
                predicate.clone(),
                object,
                self.cur_graph.clone(),
            ));
        }
    }

    fn emit_list_link(&mut self, out: &mut Outcomes<Quad>, head: NamedOrBlankNode, rest: Term) {
        out.emit(Quad::new(
            head,
            rdf::REST.into_owned(),
            rest,
            self.cur_graph.clone(),
        ));
    }

    fn literal_for_number(lexical: &str, kind: NumberKind) -> Literal {
        Literal::new_typed_literal(
            lexical,
            match kind {
                NumberKind::Integer => xsd::INTEGER,
                NumberKind::Decimal => xsd::DECIMAL,
                NumberKind::Double => xsd::DOUBLE,
            },
        )
    }
}

impl Grammar for TurtleGrammar {
    type Output = Quad;

    fn scanner(&self) -> TerseScanner {
        TerseScanner {
            turtle_strings: true,
        }
    }

    #[allow(clippy::too_many_lines)]
    fn feed(&mut self, lexeme: Lexeme<'_>, at: &Locator, out: &mut Outcomes<Quad>) {
        if self.recovering {
            if matches!(lexeme, Lexeme::Mark(Mark::Dot)) {
                self.recovering = false;
            }
            return;
        }
        let Some(state) = self.stack.pop() else {
            // [1g] trigDoc ::= (directive | block)*
            self.cur_graph = GraphName::DefaultGraph;
            match lexeme {
                Lexeme::At("prefix") => {
                    self.stack.push(TurtleState::ExpectDot);
                    self.stack.push(TurtleState::PrefixExpectPrefix);
                }
                Lexeme::At("base") => {
                    self.stack.push(TurtleState::ExpectDot);
                    self.stack.push(TurtleState::BaseExpectIri);
                }
                Lexeme::Word(w) if w.eq_ignore_ascii_case("prefix") => {
                    self.stack.push(TurtleState::PrefixExpectPrefix);
                }
                Lexeme::Word(w) if w.eq_ignore_ascii_case("base") => {
                    self.stack.push(TurtleState::BaseExpectIri);
                }
                Lexeme::Word(w) if self.with_graph_name && w.eq_ignore_ascii_case("graph") => {
                    self.stack.push(TurtleState::GraphName);
                }
                Lexeme::Mark(Mark::OpenBrace) if self.with_graph_name => {
                    self.stack.push(TurtleState::WrappedGraphContent);
                }
                Lexeme::At(_) => {
                    self.bail(at, out, "a language tag cannot start a statement");
                }
                other => {
                    self.stack.push(TurtleState::ExpectDot);
                    self.stack.push(TurtleState::TriplesOrGraph);
                    self.feed(other, at, out);
                }
            }
            return;
        };
        match state {
            // [5] base / [5s] sparqlBase
            TurtleState::BaseExpectIri => match lexeme {
                Lexeme::Iri(raw) => match self.iri_node(raw, at, out) {
                    Some(iri) => self.base = Some(Iri::parse_unchecked(iri.into_string())),
                    None => self.bail(at, out, "the base IRI is not usable"),
                },
                _ => self.bail(at, out, "the base directive needs an IRI"),
            },
            // [4] prefixID / [6s] sparqlPrefix
            TurtleState::PrefixExpectPrefix => match lexeme {
                Lexeme::Prefixed { prefix, local, .. } if local.is_empty() => {
                    self.stack.push(TurtleState::PrefixExpectIri {
                        name: prefix.to_owned(),
                    });
                }
                _ => self.bail(at, out, "the prefix directive needs a name like 'ex:'"),
            },
            TurtleState::PrefixExpectIri { name } => match lexeme {
                Lexeme::Iri(raw) => match self.iri_node(raw, at, out) {
                    Some(iri) => {
                        self.prefixes.insert(name, iri.into_string());
                    }
                    None => self.bail(at, out, "the prefix IRI is not usable"),
                },
                _ => self.bail(at, out, "the prefix declaration needs an IRI"),
            },
            TurtleState::ExpectDot => {
                if !matches!(lexeme, Lexeme::Mark(Mark::Dot)) {
                    out.complain(at, "a statement must be closed with '.'");
                    self.feed(lexeme, at, out);
                }
            }
            TurtleState::TriplesOrGraph => {
                let mut holder = Some(lexeme);
                match self.name_term(&mut holder, at, out) {
                    Ok(Some(term)) => {
                        self.stack
                            .push(TurtleState::WrappedGraphOrPredicateObjectList {
                                term: term.into(),
                            });
                    }
                    Ok(None) => self.bail(at, out, "the subject is not usable"),
                    Err(()) => match holder.take() {
                        Some(Lexeme::BlankLabel(label)) => {
                            self.stack
                                .push(TurtleState::WrappedGraphOrPredicateObjectList {
                                    term: BlankNode::new_unchecked(label).into(),
                                });
                        }
                        Some(Lexeme::Mark(Mark::OpenBracket)) => {
                            self.stack
                                .push(TurtleState::WrappedGraphBlankNodePropertyListCurrent);
                        }
                        Some(Lexeme::Mark(Mark::OpenParen)) => {
                            self.stack.push(TurtleState::SubjectCollectionBeginning);
                        }
                        _ => self.bail(at, out, "this cannot start a statement"),
                    },
                }
            }
            TurtleState::WrappedGraphOrPredicateObjectList { term } => {
                if self.with_graph_name && matches!(lexeme, Lexeme::Mark(Mark::OpenBrace)) {
                    self.cur_graph = term.into();
                    // a graph block replaces the pending top-level dot
                    if matches!(self.stack.last(), Some(TurtleState::ExpectDot)) {
                        self.stack.pop();
                    }
                    self.stack.push(TurtleState::WrappedGraphContent);
                } else {
                    self.cur_subject.push(term);
                    self.stack.push(TurtleState::SubjectEnd);
                    self.stack.push(TurtleState::PredicateObjectList);
                    self.feed(lexeme, at, out);
                }
            }
            TurtleState::WrappedGraphBlankNodePropertyListCurrent => {
                if matches!(lexeme, Lexeme::Mark(Mark::CloseBracket)) {
                    self.stack
                        .push(TurtleState::WrappedGraphOrPredicateObjectList {
                            term: BlankNode::default().into(),
                        });
                } else {
                    self.cur_subject.push(BlankNode::default().into());
                    self.stack.push(TurtleState::SubjectBlankNodePropertyListEnd);
                    self.stack.push(TurtleState::PredicateObjectList);
                    self.feed(lexeme, at, out);
                }
            }
            TurtleState::WrappedGraph => {
                if matches!(lexeme, Lexeme::Mark(Mark::OpenBrace)) {
                    self.stack.push(TurtleState::WrappedGraphContent);
                } else {
                    self.bail(at, out, "a graph name must be followed by '{'");
                }
            }
            TurtleState::WrappedGraphContent => {
                if !matches!(lexeme, Lexeme::Mark(Mark::CloseBrace)) {
                    self.stack.push(TurtleState::WrappedGraphPossibleEnd);
                    self.stack.push(TurtleState::Triples);
                    self.feed(lexeme, at, out);
                }
            }
            TurtleState::WrappedGraphPossibleEnd => match lexeme {
                Lexeme::Mark(Mark::CloseBrace) => (),
                Lexeme::Mark(Mark::Dot) => {
                    self.stack.push(TurtleState::WrappedGraphContent);
                }
                _ => self.bail(
                    at,
                    out,
                    "a graph block closes with '}', its triples are separated by '.'",
                ),
            },
            TurtleState::GraphName => {
                let mut holder = Some(lexeme);
                match self.name_term(&mut holder, at, out) {
                    Ok(Some(term)) => {
                        self.cur_graph = term.into();
                        self.stack.push(TurtleState::WrappedGraph);
                    }
                    Ok(None) => self.bail(at, out, "the graph name is not usable"),
                    Err(()) => match holder.take() {
                        Some(Lexeme::BlankLabel(label)) => {
                            self.cur_graph = BlankNode::new_unchecked(label).into();
                            self.stack.push(TurtleState::WrappedGraph);
                        }
                        _ => self.bail(at, out, "this cannot name a graph"),
                    },
                }
            }
            TurtleState::Triples => {
                let mut holder = Some(lexeme);
                match self.name_term(&mut holder, at, out) {
                    Ok(Some(term)) => {
                        self.cur_subject.push(term.into());
                        self.stack.push(TurtleState::SubjectEnd);
                        self.stack.push(TurtleState::PredicateObjectList);
                    }
                    Ok(None) => self.bail(at, out, "the subject is not usable"),
                    Err(()) => match holder.take() {
                        Some(Lexeme::BlankLabel(label)) => {
                            self.cur_subject.push(BlankNode::new_unchecked(label).into());
                            self.stack.push(TurtleState::SubjectEnd);
                            self.stack.push(TurtleState::PredicateObjectList);
                        }
                        Some(Lexeme::Mark(Mark::OpenBracket)) => {
                            self.cur_subject.push(BlankNode::default().into());
                            self.stack
                                .push(TurtleState::TriplesBlankNodePropertyListCurrent);
                        }
                        Some(Lexeme::Mark(Mark::OpenParen)) => {
                            self.stack.push(TurtleState::SubjectCollectionBeginning);
                        }
                        _ => self.bail(at, out, "this cannot start a triple"),
                    },
                }
            }
            TurtleState::TriplesBlankNodePropertyListCurrent => {
                if matches!(lexeme, Lexeme::Mark(Mark::CloseBracket)) {
                    self.stack.push(TurtleState::SubjectEnd);
                    self.stack.push(TurtleState::PredicateObjectList);
                } else {
                    self.stack.push(TurtleState::SubjectBlankNodePropertyListEnd);
                    self.stack.push(TurtleState::PredicateObjectList);
                    self.feed(lexeme, at, out);
                }
            }
            TurtleState::SubjectBlankNodePropertyListEnd => {
                if matches!(lexeme, Lexeme::Mark(Mark::CloseBracket)) {
                    self.stack
                        .push(TurtleState::SubjectBlankNodePropertyListAfter);
                } else {
                    self.bail(at, out, "a blank node property list closes with ']'");
                }
            }
            TurtleState::SubjectBlankNodePropertyListAfter => match lexeme {
                Lexeme::Mark(Mark::Dot | Mark::CloseBrace) => {
                    self.cur_subject.pop();
                    self.feed(lexeme, at, out);
                }
                other => {
                    self.stack.push(TurtleState::SubjectEnd);
                    self.stack.push(TurtleState::PredicateObjectList);
                    self.feed(other, at, out);
                }
            },
            // [15] collection, as a subject
            TurtleState::SubjectCollectionBeginning => {
                if matches!(lexeme, Lexeme::Mark(Mark::CloseParen)) {
                    // the empty collection is rdf:nil
                    self.cur_subject.push(rdf::NIL.into_owned().into());
                    self.stack.push(TurtleState::SubjectEnd);
                    self.stack.push(TurtleState::PredicateObjectList);
                } else {
                    let root = BlankNode::default();
                    // the root stays below the rolling list node, it becomes
                    // the statement subject once the list closes
                    self.cur_subject.push(root.clone().into());
                    self.cur_subject.push(root.into());
                    self.cur_predicate.push(rdf::FIRST.into_owned());
                    self.stack.push(TurtleState::SubjectCollectionPossibleEnd);
                    self.stack.push(TurtleState::Object);
                    self.feed(lexeme, at, out);
                }
            }
            TurtleState::SubjectCollectionPossibleEnd => {
                if matches!(lexeme, Lexeme::Mark(Mark::CloseParen)) {
                    if let Some(tail) = self.cur_subject.pop() {
                        self.emit_list_link(out, tail, rdf::NIL.into_owned().into());
                    }
                    self.cur_predicate.pop();
                    self.stack.push(TurtleState::SubjectEnd);
                    self.stack.push(TurtleState::PredicateObjectList);
                } else {
                    let next = BlankNode::default();
                    if let Some(tail) = self.cur_subject.pop() {
                        self.emit_list_link(out, tail, next.clone().into());
                    }
                    self.cur_subject.push(next.into());
                    self.stack.push(TurtleState::SubjectCollectionPossibleEnd);
                    self.stack.push(TurtleState::Object);
                    self.feed(lexeme, at, out);
                }
            }
            TurtleState::SubjectEnd => {
                self.cur_subject.pop();
                self.feed(lexeme, at, out);
            }
            // [7] predicateObjectList, [9] verb
            TurtleState::PredicateObjectList => {
                if matches!(lexeme, Lexeme::Word("a")) {
                    self.cur_predicate.push(rdf::TYPE.into_owned());
                } else {
                    let mut holder = Some(lexeme);
                    match self.name_term(&mut holder, at, out) {
                        Ok(Some(term)) => self.cur_predicate.push(term),
                        Ok(None) => {
                            self.bail(at, out, "the predicate is not usable");
                            return;
                        }
                        Err(()) => {
                            self.bail(at, out, "a predicate must be an IRI or 'a'");
                            return;
                        }
                    }
                }
                self.stack.push(TurtleState::PredicateObjectListEnd);
                self.stack.push(TurtleState::ObjectsListEnd);
                self.stack.push(TurtleState::Object);
            }
            TurtleState::PredicateObjectListEnd => {
                if matches!(lexeme, Lexeme::Mark(Mark::Semicolon)) {
                    self.stack
                        .push(TurtleState::PredicateObjectListPossibleContinuation);
                } else {
                    self.feed(lexeme, at, out);
                }
            }
            TurtleState::PredicateObjectListPossibleContinuation => match lexeme {
                Lexeme::Mark(Mark::Semicolon) => {
                    self.stack
                        .push(TurtleState::PredicateObjectListPossibleContinuation);
                }
                Lexeme::Mark(Mark::Dot | Mark::CloseBrace | Mark::CloseBracket) => {
                    self.feed(lexeme, at, out);
                }
                other => {
                    self.stack.push(TurtleState::PredicateObjectList);
                    self.feed(other, at, out);
                }
            },
            // [8] objectList
            TurtleState::ObjectsListEnd => {
                if matches!(lexeme, Lexeme::Mark(Mark::Comma)) {
                    self.stack.push(TurtleState::ObjectsListEnd);
                    self.stack.push(TurtleState::Object);
                } else {
                    self.cur_predicate.pop();
                    self.feed(lexeme, at, out);
                }
            }
            // [12] object
            TurtleState::Object => match lexeme {
                Lexeme::Iri(raw) => match self.iri_node(raw, at, out) {
                    Some(term) => self.emit_object(out, term),
                    None => self.bail(at, out, "the object is not usable"),
                },
                Lexeme::Prefixed {
                    prefix,
                    local,
                    needs_check,
                } => match self.expand(prefix, &local, needs_check, at, out) {
                    Some(term) => self.emit_object(out, term),
                    None => self.bail(at, out, "the object is not usable"),
                },
                Lexeme::BlankLabel(label) => {
                    self.emit_object(out, BlankNode::new_unchecked(label));
                }
                Lexeme::Text(value) => {
                    self.stack.push(TurtleState::LiteralPossibleSuffix { value });
                }
                Lexeme::Number { lexical, kind } => {
                    self.emit_object(out, Self::literal_for_number(lexical, kind));
                }
                Lexeme::Word(w @ ("true" | "false")) => {
                    self.emit_object(out, Literal::new_typed_literal(w, xsd::BOOLEAN));
                }
                Lexeme::Mark(Mark::OpenBracket) => {
                    let node = BlankNode::default();
                    self.emit_object(out, node.clone());
                    self.cur_subject.push(node.into());
                    self.stack
                        .push(TurtleState::ObjectBlankNodePropertyListCurrent);
                }
                Lexeme::Mark(Mark::OpenParen) => {
                    self.stack.push(TurtleState::ObjectCollectionBeginning);
                }
                _ => self.bail(at, out, "this cannot be an object"),
            },
            TurtleState::ObjectBlankNodePropertyListCurrent => {
                if matches!(lexeme, Lexeme::Mark(Mark::CloseBracket)) {
                    self.cur_subject.pop();
                } else {
                    self.stack.push(TurtleState::ObjectBlankNodePropertyListEnd);
                    self.stack.push(TurtleState::PredicateObjectList);
                    self.feed(lexeme, at, out);
                }
            }
            TurtleState::ObjectBlankNodePropertyListEnd => {
                if matches!(lexeme, Lexeme::Mark(Mark::CloseBracket)) {
                    self.cur_subject.pop();
                } else {
                    self.bail(at, out, "a blank node property list closes with ']'");
                }
            }
            // [15] collection, as an object
            TurtleState::ObjectCollectionBeginning => {
                if matches!(lexeme, Lexeme::Mark(Mark::CloseParen)) {
                    self.emit_object(out, rdf::NIL.into_owned());
                } else {
                    let root = BlankNode::default();
                    self.emit_object(out, root.clone());
                    self.cur_subject.push(root.into());
                    self.cur_predicate.push(rdf::FIRST.into_owned());
                    self.stack.push(TurtleState::ObjectCollectionPossibleEnd);
                    self.stack.push(TurtleState::Object);
                    self.feed(lexeme, at, out);
                }
            }
            TurtleState::ObjectCollectionPossibleEnd => {
                if matches!(lexeme, Lexeme::Mark(Mark::CloseParen)) {
                    if let Some(tail) = self.cur_subject.pop() {
                        self.emit_list_link(out, tail, rdf::NIL.into_owned().into());
                    }
                    self.cur_predicate.pop();
                } else {
                    let next = BlankNode::default();
                    if let Some(tail) = self.cur_subject.pop() {
                        self.emit_list_link(out, tail, next.clone().into());
                    }
                    self.cur_subject.push(next.into());
                    self.stack.push(TurtleState::ObjectCollectionPossibleEnd);
                    self.stack.push(TurtleState::Object);
                    self.feed(lexeme, at, out);
                }
            }
            TurtleState::LiteralPossibleSuffix { value } => match lexeme {
                Lexeme::At(tag) => {
                    if !self.lenient {
                        if let Err(error) = LanguageTag::parse(tag) {
                            self.bail(at, out, error.to_string());
                            return;
                        }
                    }
                    self.emit_object(
                        out,
                        Literal::new_language_tagged_literal_unchecked(
                            value,
                            tag.to_ascii_lowercase(),
                        ),
                    );
                }
                Lexeme::Mark(Mark::DoubleCaret) => {
                    self.stack.push(TurtleState::LiteralExpectDatatype { value });
                }
                other => {
                    self.emit_object(out, Literal::new_simple_literal(value));
                    self.feed(other, at, out);
                }
            },
            TurtleState::LiteralExpectDatatype { value } => {
                let mut holder = Some(lexeme);
                match self.name_term(&mut holder, at, out) {
                    Ok(Some(datatype)) => {
                        self.emit_object(out, Literal::new_typed_literal(value, datatype));
                    }
                    Ok(None) => self.bail(at, out, "the datatype is not usable"),
                    Err(()) => self.bail(at, out, "a datatype must be an IRI"),
                }
            }
        }
    }

    fn flush(&mut self, at: &Locator, out: &mut Outcomes<Quad>) {
        if !self.stack.is_empty() && !self.recovering {
            out.complain(at, "the input ends in the middle of a statement");
        }
        self.stack.clear();
        self.recovering = false;
    }

    fn reset_after_error(&mut self, at: &Locator) {
        let _ = at;
        self.stack.clear();
        self.cur_subject.clear();
        self.cur_predicate.clear();
        self.cur_graph = GraphName::DefaultGraph;
        self.recovering = true;
    }
}
