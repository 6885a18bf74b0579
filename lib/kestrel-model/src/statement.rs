//! Statements and the position-constrained term unions.

use crate::term::{BlankNode, BlankNodeRef, Literal, LiteralRef, NamedNode, NamedNodeRef};
use std::fmt;

/// Generates the whole owned/borrowed plumbing of a term union: the
/// variant-wise `as_ref`/`into_owned`, the `Display` delegation, the
/// reference conversions and the member `From`s.
macro_rules! term_union {
    (
        $owned:ident / $borrowed:ident {
            $($variant:ident($member:ident, $member_ref:ident)),+
            $(; unit $unit:ident => $unit_text:literal)?
        }
    ) => {
        impl $owned {
            pub fn as_ref(&self) -> $borrowed<'_> {
                match self {
                    $(Self::$variant(inner) => $borrowed::$variant(inner.as_ref()),)+
                    $(Self::$unit => $borrowed::$unit,)?
                }
            }
        }

        impl $borrowed<'_> {
            pub fn into_owned(self) -> $owned {
                match self {
                    $(Self::$variant(inner) => $owned::$variant(inner.into_owned()),)+
                    $(Self::$unit => $owned::$unit,)?
                }
            }
        }

        impl fmt::Display for $borrowed<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$variant(inner) => inner.fmt(f),)+
                    $(Self::$unit => f.write_str($unit_text),)?
                }
            }
        }

        impl fmt::Display for $owned {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.as_ref().fmt(f)
            }
        }

        impl<'a> From<&'a $owned> for $borrowed<'a> {
            #[inline]
            fn from(term: &'a $owned) -> Self {
                term.as_ref()
            }
        }

        impl From<$borrowed<'_>> for $owned {
            #[inline]
            fn from(term: $borrowed<'_>) -> Self {
                term.into_owned()
            }
        }

        $(
            impl From<$member> for $owned {
                #[inline]
                fn from(term: $member) -> Self {
                    Self::$variant(term)
                }
            }

            impl From<$member_ref<'_>> for $owned {
                #[inline]
                fn from(term: $member_ref<'_>) -> Self {
                    Self::$variant(term.into_owned())
                }
            }

            impl<'a> From<$member_ref<'a>> for $borrowed<'a> {
                #[inline]
                fn from(term: $member_ref<'a>) -> Self {
                    Self::$variant(term)
                }
            }

            impl<'a> From<&'a $member> for $borrowed<'a> {
                #[inline]
                fn from(term: &'a $member) -> Self {
                    Self::$variant(term.as_ref())
                }
            }
        )+
    };
}

/// Widens one union into a bigger one, variant by variant.
macro_rules! union_widening {
    ($from:ident / $from_ref:ident => $to:ident / $to_ref:ident { $($variant:ident),+ }) => {
        impl From<$from> for $to {
            fn from(term: $from) -> Self {
                match term {
                    $($from::$variant(inner) => Self::$variant(inner),)+
                }
            }
        }

        impl<'a> From<$from_ref<'a>> for $to_ref<'a> {
            fn from(term: $from_ref<'a>) -> Self {
                match term {
                    $($from_ref::$variant(inner) => Self::$variant(inner),)+
                }
            }
        }
    };
}

/// The terms allowed in subject position: an IRI or a blank node.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum NamedOrBlankNode {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
}

/// The borrowed form of [`NamedOrBlankNode`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum NamedOrBlankNodeRef<'a> {
    NamedNode(NamedNodeRef<'a>),
    BlankNode(BlankNodeRef<'a>),
}

term_union!(NamedOrBlankNode / NamedOrBlankNodeRef {
    NamedNode(NamedNode, NamedNodeRef),
    BlankNode(BlankNode, BlankNodeRef)
});

impl NamedOrBlankNode {
    #[inline]
    pub fn is_named_node(&self) -> bool {
        self.as_ref().is_named_node()
    }

    #[inline]
    pub fn is_blank_node(&self) -> bool {
        self.as_ref().is_blank_node()
    }
}

impl NamedOrBlankNodeRef<'_> {
    #[inline]
    pub fn is_named_node(&self) -> bool {
        matches!(self, Self::NamedNode(_))
    }

    #[inline]
    pub fn is_blank_node(&self) -> bool {
        matches!(self, Self::BlankNode(_))
    }
}

/// Any RDF [term](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-term): the
/// object position allows all three kinds.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Term {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
}

/// The borrowed form of [`Term`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TermRef<'a> {
    NamedNode(NamedNodeRef<'a>),
    BlankNode(BlankNodeRef<'a>),
    Literal(LiteralRef<'a>),
}

term_union!(Term / TermRef {
    NamedNode(NamedNode, NamedNodeRef),
    BlankNode(BlankNode, BlankNodeRef),
    Literal(Literal, LiteralRef)
});

union_widening!(NamedOrBlankNode / NamedOrBlankNodeRef => Term / TermRef {
    NamedNode, BlankNode
});

impl Term {
    #[inline]
    pub fn is_named_node(&self) -> bool {
        matches!(self, Self::NamedNode(_))
    }

    #[inline]
    pub fn is_blank_node(&self) -> bool {
        matches!(self, Self::BlankNode(_))
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

impl TermRef<'_> {
    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

impl From<NamedOrBlankNodeRef<'_>> for Term {
    #[inline]
    fn from(term: NamedOrBlankNodeRef<'_>) -> Self {
        term.into_owned().into()
    }
}

impl<'a> From<&'a NamedOrBlankNode> for TermRef<'a> {
    #[inline]
    fn from(term: &'a NamedOrBlankNode) -> Self {
        term.as_ref().into()
    }
}

impl TryFrom<Term> for NamedOrBlankNode {
    type Error = TryFromTermError;

    fn try_from(term: Term) -> Result<Self, Self::Error> {
        match term {
            Term::NamedNode(inner) => Ok(Self::NamedNode(inner)),
            Term::BlankNode(inner) => Ok(Self::BlankNode(inner)),
            Term::Literal(_) => Err(TryFromTermError {
                term,
                target: "NamedOrBlankNode",
            }),
        }
    }
}

impl TryFrom<Term> for NamedNode {
    type Error = TryFromTermError;

    fn try_from(term: Term) -> Result<Self, Self::Error> {
        if let Term::NamedNode(inner) = term {
            Ok(inner)
        } else {
            Err(TryFromTermError {
                term,
                target: "NamedNode",
            })
        }
    }
}

/// Error of a failed narrowing conversion out of [`Term`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("{term} can not be converted to a {target}")]
pub struct TryFromTermError {
    term: Term,
    target: &'static str,
}

impl TryFromTermError {
    /// Gives the unconverted term back.
    #[inline]
    pub fn into_term(self) -> Term {
        self.term
    }
}

/// The name slot of a quad: a graph term, or the default graph.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Default)]
pub enum GraphName {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    #[default]
    DefaultGraph,
}

/// The borrowed form of [`GraphName`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub enum GraphNameRef<'a> {
    NamedNode(NamedNodeRef<'a>),
    BlankNode(BlankNodeRef<'a>),
    #[default]
    DefaultGraph,
}

term_union!(GraphName / GraphNameRef {
    NamedNode(NamedNode, NamedNodeRef),
    BlankNode(BlankNode, BlankNodeRef)
    ; unit DefaultGraph => "DEFAULT"
});

union_widening!(NamedOrBlankNode / NamedOrBlankNodeRef => GraphName / GraphNameRef {
    NamedNode, BlankNode
});

impl GraphName {
    #[inline]
    pub fn is_default_graph(&self) -> bool {
        matches!(self, Self::DefaultGraph)
    }
}

impl GraphNameRef<'_> {
    #[inline]
    pub fn is_default_graph(&self) -> bool {
        matches!(self, Self::DefaultGraph)
    }
}

/// One RDF [triple](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-triple),
/// with the per-position constraints in the types.
///
/// ```
/// use kestrel_model::{NamedNode, Literal, Triple};
///
/// let statement = Triple::new(
///     NamedNode::new_unchecked("http://example.com/book/1"),
///     NamedNode::new_unchecked("http://purl.org/dc/elements/1.1/title"),
///     Literal::new_simple_literal("Moby-Dick"),
/// );
/// assert_eq!(
///     statement.to_string(),
///     "<http://example.com/book/1> <http://purl.org/dc/elements/1.1/title> \"Moby-Dick\""
/// );
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Triple {
    pub subject: NamedOrBlankNode,
    pub predicate: NamedNode,
    pub object: Term,
}

impl Triple {
    #[inline]
    pub fn new(
        subject: impl Into<NamedOrBlankNode>,
        predicate: impl Into<NamedNode>,
        object: impl Into<Term>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Places the triple in a graph, turning it into a quad.
    #[inline]
    pub fn in_graph(self, graph_name: impl Into<GraphName>) -> Quad {
        Quad {
            subject: self.subject,
            predicate: self.predicate,
            object: self.object,
            graph_name: graph_name.into(),
        }
    }

    pub fn as_ref(&self) -> TripleRef<'_> {
        TripleRef::new(&self.subject, &self.predicate, &self.object)
    }
}

impl fmt::Display for Triple {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt(f)
    }
}

/// The borrowed form of [`Triple`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct TripleRef<'a> {
    pub subject: NamedOrBlankNodeRef<'a>,
    pub predicate: NamedNodeRef<'a>,
    pub object: TermRef<'a>,
}

impl<'a> TripleRef<'a> {
    #[inline]
    pub fn new(
        subject: impl Into<NamedOrBlankNodeRef<'a>>,
        predicate: impl Into<NamedNodeRef<'a>>,
        object: impl Into<TermRef<'a>>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    #[inline]
    pub fn in_graph(self, graph_name: impl Into<GraphNameRef<'a>>) -> QuadRef<'a> {
        QuadRef {
            subject: self.subject,
            predicate: self.predicate,
            object: self.object,
            graph_name: graph_name.into(),
        }
    }

    pub fn into_owned(self) -> Triple {
        Triple::new(self.subject, self.predicate, self.object)
    }
}

impl fmt::Display for TripleRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

impl<'a> From<&'a Triple> for TripleRef<'a> {
    #[inline]
    fn from(statement: &'a Triple) -> Self {
        statement.as_ref()
    }
}

impl From<TripleRef<'_>> for Triple {
    #[inline]
    fn from(statement: TripleRef<'_>) -> Self {
        statement.into_owned()
    }
}

/// One statement of an RDF dataset: a triple and the graph it belongs to.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Quad {
    pub subject: NamedOrBlankNode,
    pub predicate: NamedNode,
    pub object: Term,
    pub graph_name: GraphName,
}

impl Quad {
    #[inline]
    pub fn new(
        subject: impl Into<NamedOrBlankNode>,
        predicate: impl Into<NamedNode>,
        object: impl Into<Term>,
        graph_name: impl Into<GraphName>,
    ) -> Self {
        Triple::new(subject, predicate, object).in_graph(graph_name)
    }

    pub fn as_ref(&self) -> QuadRef<'_> {
        QuadRef::new(
            &self.subject,
            &self.predicate,
            &self.object,
            &self.graph_name,
        )
    }
}

impl fmt::Display for Quad {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt(f)
    }
}

impl From<Triple> for Quad {
    /// Places the triple in the default graph.
    #[inline]
    fn from(statement: Triple) -> Self {
        statement.in_graph(GraphName::DefaultGraph)
    }
}

impl From<Quad> for Triple {
    /// Drops the graph name.
    #[inline]
    fn from(statement: Quad) -> Self {
        Self {
            subject: statement.subject,
            predicate: statement.predicate,
            object: statement.object,
        }
    }
}

/// The borrowed form of [`Quad`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct QuadRef<'a> {
    pub subject: NamedOrBlankNodeRef<'a>,
    pub predicate: NamedNodeRef<'a>,
    pub object: TermRef<'a>,
    pub graph_name: GraphNameRef<'a>,
}

impl<'a> QuadRef<'a> {
    #[inline]
    pub fn new(
        subject: impl Into<NamedOrBlankNodeRef<'a>>,
        predicate: impl Into<NamedNodeRef<'a>>,
        object: impl Into<TermRef<'a>>,
        graph_name: impl Into<GraphNameRef<'a>>,
    ) -> Self {
        TripleRef::new(subject, predicate, object).in_graph(graph_name)
    }

    pub fn into_owned(self) -> Quad {
        Quad::new(self.subject, self.predicate, self.object, self.graph_name)
    }
}

impl fmt::Display for QuadRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if !self.graph_name.is_default_graph() {
            write!(f, " {}", self.graph_name)?;
        }
        Ok(())
    }
}

impl<'a> From<TripleRef<'a>> for QuadRef<'a> {
    #[inline]
    fn from(statement: TripleRef<'a>) -> Self {
        statement.in_graph(GraphNameRef::DefaultGraph)
    }
}

impl<'a> From<&'a Quad> for QuadRef<'a> {
    #[inline]
    fn from(statement: &'a Quad) -> Self {
        statement.as_ref()
    }
}

impl From<QuadRef<'_>> for Quad {
    #[inline]
    fn from(statement: QuadRef<'_>) -> Self {
        statement.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_display_hides_the_default_graph() {
        let s = NamedNode::new_unchecked("http://ex/s");
        let p = NamedNode::new_unchecked("http://ex/p");
        let o = NamedNode::new_unchecked("http://ex/o");
        let statement = Triple::new(s, p, o);
        assert_eq!(
            Quad::from(statement.clone()).to_string(),
            "<http://ex/s> <http://ex/p> <http://ex/o>"
        );
        assert_eq!(
            statement
                .in_graph(NamedNode::new_unchecked("http://ex/g"))
                .to_string(),
            "<http://ex/s> <http://ex/p> <http://ex/o> <http://ex/g>"
        );
    }

    #[test]
    fn literal_objects_are_rejected_as_subjects() {
        let term = Term::from(Literal::new_simple_literal("x"));
        let error = NamedOrBlankNode::try_from(term).unwrap_err();
        assert_eq!(error.into_term().to_string(), "\"x\"");
    }
}
