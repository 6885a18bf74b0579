#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]

mod interning;
mod locator;
mod statement;
mod term;
pub mod vocab;

pub use crate::interning::{InternedIri, UriInterner};
pub use crate::locator::Locator;
pub use crate::statement::{
    GraphName, GraphNameRef, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef, Term, TermRef,
    Triple, TripleRef, TryFromTermError,
};
pub use crate::term::{
    write_quoted_literal, BlankNode, BlankNodeIdParseError, BlankNodeRef, Literal, LiteralRef,
    NamedNode, NamedNodeRef,
};
pub use kestrel_iri::IriParseError;
pub use oxilangtag::LanguageTagParseError;
