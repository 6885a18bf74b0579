//! The shared Turtle/TriG writing engine.
//!
//! Statements are buffered per subject and written as one block when the
//! subject (or graph) changes, which lets the writer group the objects of a
//! predicate even when they do not arrive back to back.

use kestrel_model::vocab::rdf;
use kestrel_model::{
    write_quoted_literal, GraphName, NamedNode, NamedNodeRef, NamedOrBlankNode,
    NamedOrBlankNodeRef, QuadRef, Term, TermRef,
};
use std::collections::BTreeMap;
use std::io::{self, Write};

pub(crate) struct TerseWriter {
    /// namespace IRI → prefix name, iterated in a stable order.
    prefixes: BTreeMap<String, String>,
    preamble_written: bool,
    graph: GraphName,
    subject: Option<NamedOrBlankNode>,
    /// The pending block of the current subject, objects grouped per
    /// predicate in first-seen order.
    block: Vec<(NamedNode, Vec<Term>)>,
}

impl TerseWriter {
    pub fn new(prefixes: BTreeMap<String, String>) -> Self {
        Self {
            prefixes,
            preamble_written: false,
            graph: GraphName::DefaultGraph,
            subject: None,
            block: Vec::new(),
        }
    }

    /// Buffers one statement, flushing the previous block when the subject
    /// or the graph changes.
    pub fn add<W: Write>(&mut self, quad: QuadRef<'_>, w: &mut W) -> io::Result<()> {
        if !self.preamble_written {
            self.preamble_written = true;
            for (namespace, name) in &self.prefixes {
                writeln!(w, "@prefix {name}: <{namespace}> .")?;
            }
        }
        let same_graph = self.graph.as_ref() == quad.graph_name;
        let same_subject =
            same_graph && self.subject.as_ref().map(NamedOrBlankNode::as_ref) == Some(quad.subject);
        if !same_subject {
            self.write_block(w)?;
            if !same_graph {
                if !self.graph.is_default_graph() {
                    writeln!(w, "}}")?;
                }
                self.graph = quad.graph_name.into_owned();
                if let Some(term) = Self::graph_label_term(&self.graph) {
                    let mut label = String::new();
                    self.append_term(&mut label, term.into());
                    writeln!(w, "{label} {{")?;
                }
            }
            self.subject = Some(quad.subject.into_owned());
        }
        let predicate = quad.predicate.into_owned();
        let object = quad.object.into_owned();
        match self.block.iter_mut().find(|(p, _)| *p == predicate) {
            Some((_, objects)) => objects.push(object),
            None => self.block.push((predicate, vec![object])),
        }
        Ok(())
    }

    /// Flushes the pending block and closes an open graph block.
    pub fn finish<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        if !self.preamble_written {
            self.preamble_written = true;
            for (namespace, name) in &self.prefixes {
                writeln!(w, "@prefix {name}: <{namespace}> .")?;
            }
        }
        self.write_block(w)?;
        if !self.graph.is_default_graph() {
            writeln!(w, "}}")?;
            self.graph = GraphName::DefaultGraph;
        }
        Ok(())
    }

    fn write_block<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        let Some(subject) = self.subject.take() else {
            return Ok(());
        };
        if self.block.is_empty() {
            return Ok(());
        }
        let pad = if self.graph.is_default_graph() { "" } else { "\t" };
        let mut text = String::new();
        text.push_str(pad);
        self.append_term(&mut text, subject.as_ref().into());
        for (nth, (predicate, objects)) in self.block.iter().enumerate() {
            if nth == 0 {
                text.push(' ');
            } else {
                text.push_str(" ;\n");
                text.push_str(pad);
                text.push('\t');
            }
            self.append_predicate(&mut text, predicate.as_ref());
            for (mth, object) in objects.iter().enumerate() {
                text.push_str(if mth == 0 { " " } else { " , " });
                self.append_term(&mut text, object.as_ref());
            }
        }
        text.push_str(" .");
        writeln!(w, "{text}")?;
        self.block.clear();
        Ok(())
    }

    /// `a` for `rdf:type`, the usual spelling otherwise.
    fn append_predicate(&self, out: &mut String, predicate: NamedNodeRef<'_>) {
        if predicate == rdf::TYPE {
            out.push('a');
        } else {
            self.append_named(out, predicate);
        }
    }

    fn append_term(&self, out: &mut String, term: TermRef<'_>) {
        match term {
            TermRef::NamedNode(node) => self.append_named(out, node),
            TermRef::BlankNode(node) => {
                out.push_str("_:");
                out.push_str(node.as_str());
            }
            TermRef::Literal(literal) => {
                let _ = write_quoted_literal(literal.value(), out);
                if let Some(language) = literal.language() {
                    out.push('@');
                    out.push_str(language);
                } else if !literal.is_plain() {
                    out.push_str("^^");
                    self.append_named(out, literal.datatype());
                }
            }
        }
    }

    /// Compresses against the declared prefixes when the remainder is a
    /// local name that needs no escaping.
    fn append_named(&self, out: &mut String, node: NamedNodeRef<'_>) {
        let iri = node.as_str();
        for (namespace, name) in &self.prefixes {
            if let Some(local) = iri.strip_prefix(namespace.as_str()) {
                if is_unescaped_local(local) {
                    out.push_str(name);
                    out.push(':');
                    out.push_str(local);
                    return;
                }
            }
        }
        out.push('<');
        out.push_str(iri);
        out.push('>');
    }

    /// The graph label position allows IRIs and blank nodes only.
    fn graph_label_term(graph: &GraphName) -> Option<NamedOrBlankNodeRef<'_>> {
        match graph {
            GraphName::NamedNode(node) => Some(node.into()),
            GraphName::BlankNode(node) => Some(node.into()),
            GraphName::DefaultGraph => None,
        }
    }
}

/// A conservative subset of `PN_LOCAL`: what can be written after a prefix
/// without any escaping.
fn is_unescaped_local(local: &str) -> bool {
    if local.ends_with('.') {
        return false;
    }
    let mut chars = local.chars();
    match chars.next() {
        None => return true, // an empty local name is fine
        Some(first) if first.is_ascii_alphanumeric() || first == '_' => (),
        Some(_) => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
