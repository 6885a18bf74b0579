//! The three RDF term kinds, each as an owned/borrowed pair.

use crate::vocab::{rdf, xsd};
use kestrel_iri::{Iri, IriParseError};
use oxilangtag::{LanguageTag, LanguageTagParseError};
use rand::random;
use std::fmt;
use std::fmt::Write;

/// Wires an owned term type and its `…Ref` counterpart together: reference
/// conversions, cross equality and the shared `Display`.
macro_rules! owned_borrowed_pair {
    ($owned:ident, $borrowed:ident) => {
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

        impl PartialEq<$owned> for $borrowed<'_> {
            #[inline]
            fn eq(&self, other: &$owned) -> bool {
                *self == other.as_ref()
            }
        }

        impl PartialEq<$borrowed<'_>> for $owned {
            #[inline]
            fn eq(&self, other: &$borrowed<'_>) -> bool {
                self.as_ref() == *other
            }
        }

        impl fmt::Display for $owned {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.as_ref().fmt(f)
            }
        }
    };
}

/// String equality in both directions, for a type with an `as_str` view.
macro_rules! str_equality {
    ($($ty:ty),+) => {$(
        impl PartialEq<str> for $ty {
            #[inline]
            fn eq(&self, other: &str) -> bool {
                self.as_str() == other
            }
        }

        impl PartialEq<$ty> for str {
            #[inline]
            fn eq(&self, other: &$ty) -> bool {
                self == other.as_str()
            }
        }

        impl PartialEq<&str> for $ty {
            #[inline]
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    )+};
}

/// An owned RDF [IRI](https://www.w3.org/TR/rdf11-concepts/#dfn-iri) term.
///
/// Formats in the N-Triples / Turtle / SPARQL way:
/// ```
/// use kestrel_model::NamedNode;
///
/// let node = NamedNode::new("http://purl.org/dc/elements/1.1/title")?;
/// assert_eq!(node.to_string(), "<http://purl.org/dc/elements/1.1/title>");
/// # Result::<_, kestrel_model::IriParseError>::Ok(())
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash)]
pub struct NamedNode {
    iri: String,
}

impl NamedNode {
    /// Validates `iri` and builds the term.
    pub fn new(iri: impl Into<String>) -> Result<Self, IriParseError> {
        Ok(Self {
            iri: Iri::parse(iri.into())?.into_inner(),
        })
    }

    /// Builds the term without checking that `iri` is a valid IRI; the
    /// caller vouches for it.
    #[inline]
    pub fn new_unchecked(iri: impl Into<String>) -> Self {
        Self { iri: iri.into() }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.iri
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.iri
    }

    #[inline]
    pub fn as_ref(&self) -> NamedNodeRef<'_> {
        NamedNodeRef { iri: &self.iri }
    }
}

/// A borrowed RDF [IRI](https://www.w3.org/TR/rdf11-concepts/#dfn-iri) term.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Copy, Hash)]
pub struct NamedNodeRef<'a> {
    iri: &'a str,
}

impl<'a> NamedNodeRef<'a> {
    /// Validates `iri` and builds the term.
    pub fn new(iri: &'a str) -> Result<Self, IriParseError> {
        Iri::parse(iri)?;
        Ok(Self { iri })
    }

    /// Builds the term without checking `iri`; usable in constants.
    #[inline]
    pub const fn new_unchecked(iri: &'a str) -> Self {
        Self { iri }
    }

    #[inline]
    pub const fn as_str(self) -> &'a str {
        self.iri
    }

    #[inline]
    pub fn into_owned(self) -> NamedNode {
        NamedNode {
            iri: self.iri.to_owned(),
        }
    }
}

impl fmt::Display for NamedNodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.iri)
    }
}

owned_borrowed_pair!(NamedNode, NamedNodeRef);
str_equality!(NamedNode, NamedNodeRef<'_>);

/// An owned [blank node](https://www.w3.org/TR/rdf11-concepts/#dfn-blank-node)
/// term.
///
/// [`BlankNode::default()`] mints a fresh node with a random 128-bit
/// identifier; [`BlankNode::new()`] wraps an identifier taken from a
/// document.
///
/// ```
/// use kestrel_model::BlankNode;
///
/// assert_eq!(BlankNode::new("r1")?.to_string(), "_:r1");
/// # Result::<_, kestrel_model::BlankNodeIdParseError>::Ok(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct BlankNode {
    id: String,
}

impl BlankNode {
    /// Validates `id` against the N-Triples / Turtle / SPARQL label grammar
    /// and builds the node.
    pub fn new(id: impl Into<String>) -> Result<Self, BlankNodeIdParseError> {
        let id = id.into();
        validate_blank_node_identifier(&id)?;
        Ok(Self { id })
    }

    /// Builds the node without checking the identifier; the caller vouches
    /// for it.
    #[inline]
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.id
    }

    #[inline]
    pub fn as_ref(&self) -> BlankNodeRef<'_> {
        BlankNodeRef { id: &self.id }
    }
}

impl Default for BlankNode {
    /// Mints a blank node with a fresh random identifier.
    ///
    /// The `b` prefix keeps the identifier a valid XML NCName, so the node
    /// can be written as an `rdf:nodeID` too.
    fn default() -> Self {
        Self {
            id: format!("b{:032x}", random::<u128>()),
        }
    }
}

/// A borrowed RDF [blank node](https://www.w3.org/TR/rdf11-concepts/#dfn-blank-node).
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct BlankNodeRef<'a> {
    id: &'a str,
}

impl<'a> BlankNodeRef<'a> {
    pub fn new(id: &'a str) -> Result<Self, BlankNodeIdParseError> {
        validate_blank_node_identifier(id)?;
        Ok(Self { id })
    }

    #[inline]
    pub const fn new_unchecked(id: &'a str) -> Self {
        Self { id }
    }

    #[inline]
    pub const fn as_str(self) -> &'a str {
        self.id
    }

    #[inline]
    pub fn into_owned(self) -> BlankNode {
        BlankNode {
            id: self.id.to_owned(),
        }
    }
}

impl fmt::Display for BlankNodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.id)
    }
}

owned_borrowed_pair!(BlankNode, BlankNodeRef);
str_equality!(BlankNode, BlankNodeRef<'_>);

/// The `BLANK_NODE_LABEL` production: a name-ish first character (digits
/// allowed), name characters and inner dots afterwards.
fn validate_blank_node_identifier(id: &str) -> Result<(), BlankNodeIdParseError> {
    let mut chars = id.chars();
    let first = chars.next().ok_or(BlankNodeIdParseError)?;
    if !(first.is_ascii_digit() || is_name_start(first)) {
        return Err(BlankNodeIdParseError);
    }
    let mut previous = first;
    for c in chars {
        if !(is_name_body(c) || c == '.') {
            return Err(BlankNodeIdParseError);
        }
        previous = c;
    }
    if previous == '.' {
        return Err(BlankNodeIdParseError);
    }
    Ok(())
}

fn is_name_start(c: char) -> bool {
    c == '_'
        || c == ':'
        || c.is_ascii_alphabetic()
        || matches!(u32::from(c),
            0xC0..=0xD6
            | 0xD8..=0xF6
            | 0xF8..=0x2FF
            | 0x370..=0x37D
            | 0x37F..=0x1FFF
            | 0x200C..=0x200D
            | 0x2070..=0x218F
            | 0x2C00..=0x2FEF
            | 0x3001..=0xD7FF
            | 0xF900..=0xFDCF
            | 0xFDF0..=0xFFFD
            | 0x10000..=0xEFFFF)
}

fn is_name_body(c: char) -> bool {
    c == '-'
        || c.is_ascii_digit()
        || is_name_start(c)
        || matches!(u32::from(c), 0xB7 | 0x300..=0x36F | 0x203F..=0x2040)
}

/// Error returned when a blank node identifier is invalid.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("the blank node identifier is invalid")]
pub struct BlankNodeIdParseError;

/// How a literal lexical form is annotated.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
enum Annotation {
    /// A simple literal, implicitly an `xsd:string`.
    Plain,
    /// A language-tagged string; the tag is lowercase BCP47.
    Tagged(String),
    Typed(NamedNode),
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
enum AnnotationRef<'a> {
    Plain,
    Tagged(&'a str),
    Typed(NamedNodeRef<'a>),
}

/// An owned RDF [literal](https://www.w3.org/TR/rdf11-concepts/#dfn-literal):
/// a lexical form with either a language tag or a datatype.
///
/// ```
/// use kestrel_model::{vocab::xsd, Literal};
///
/// assert_eq!(Literal::new_simple_literal("10°").to_string(), "\"10°\"");
/// assert_eq!(
///     Literal::new_typed_literal("10", xsd::INTEGER).to_string(),
///     "\"10\"^^<http://www.w3.org/2001/XMLSchema#integer>"
/// );
/// assert_eq!(
///     Literal::new_language_tagged_literal("grün", "DE")?.to_string(),
///     "\"grün\"@de"
/// );
/// # Result::<_, kestrel_model::LanguageTagParseError>::Ok(())
/// ```
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Literal {
    value: String,
    annotation: Annotation,
}

impl Literal {
    #[inline]
    pub fn new_simple_literal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            annotation: Annotation::Plain,
        }
    }

    /// Builds a datatyped literal. An `xsd:string` datatype collapses into a
    /// simple literal so both spellings compare equal.
    pub fn new_typed_literal(value: impl Into<String>, datatype: impl Into<NamedNode>) -> Self {
        let datatype = datatype.into();
        Self {
            value: value.into(),
            annotation: if datatype == xsd::STRING {
                Annotation::Plain
            } else {
                Annotation::Typed(datatype)
            },
        }
    }

    /// Builds a language-tagged string, validating the tag and lowercasing
    /// it.
    pub fn new_language_tagged_literal(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, LanguageTagParseError> {
        let mut language = language.into();
        language.make_ascii_lowercase();
        LanguageTag::parse(language.as_str())?;
        Ok(Self::new_language_tagged_literal_unchecked(value, language))
    }

    /// Builds a language-tagged string trusting the caller that `language`
    /// is a valid lowercase [BCP47](https://tools.ietf.org/html/bcp47) tag.
    #[inline]
    pub fn new_language_tagged_literal_unchecked(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            value: value.into(),
            annotation: Annotation::Tagged(language.into()),
        }
    }

    /// The [lexical form](https://www.w3.org/TR/rdf11-concepts/#dfn-lexical-form).
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Extracts the lexical form.
    #[inline]
    pub fn into_value(self) -> String {
        self.value
    }

    /// The language tag, for language-tagged strings only.
    pub fn language(&self) -> Option<&str> {
        match &self.annotation {
            Annotation::Tagged(language) => Some(language),
            _ => None,
        }
    }

    /// The datatype IRI; simple literals report `xsd:string` and tagged
    /// strings `rdf:langString`.
    #[inline]
    pub fn datatype(&self) -> NamedNodeRef<'_> {
        self.as_ref().datatype()
    }

    /// True when the literal can be written without a datatype annotation.
    #[inline]
    pub fn is_plain(&self) -> bool {
        !matches!(self.annotation, Annotation::Typed(_))
    }

    #[inline]
    pub fn as_ref(&self) -> LiteralRef<'_> {
        LiteralRef {
            value: &self.value,
            annotation: match &self.annotation {
                Annotation::Plain => AnnotationRef::Plain,
                Annotation::Tagged(language) => AnnotationRef::Tagged(language),
                Annotation::Typed(datatype) => AnnotationRef::Typed(datatype.as_ref()),
            },
        }
    }
}

impl From<&str> for Literal {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new_simple_literal(value)
    }
}

impl From<String> for Literal {
    #[inline]
    fn from(value: String) -> Self {
        Self::new_simple_literal(value)
    }
}

/// A borrowed RDF [literal](https://www.w3.org/TR/rdf11-concepts/#dfn-literal).
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct LiteralRef<'a> {
    value: &'a str,
    annotation: AnnotationRef<'a>,
}

impl<'a> LiteralRef<'a> {
    #[inline]
    pub const fn new_simple_literal(value: &'a str) -> Self {
        Self {
            value,
            annotation: AnnotationRef::Plain,
        }
    }

    pub fn new_typed_literal(value: &'a str, datatype: impl Into<NamedNodeRef<'a>>) -> Self {
        let datatype = datatype.into();
        Self {
            value,
            annotation: if datatype == xsd::STRING {
                AnnotationRef::Plain
            } else {
                AnnotationRef::Typed(datatype)
            },
        }
    }

    #[inline]
    pub const fn new_language_tagged_literal_unchecked(value: &'a str, language: &'a str) -> Self {
        Self {
            value,
            annotation: AnnotationRef::Tagged(language),
        }
    }

    #[inline]
    pub const fn value(self) -> &'a str {
        self.value
    }

    pub const fn language(self) -> Option<&'a str> {
        match self.annotation {
            AnnotationRef::Tagged(language) => Some(language),
            _ => None,
        }
    }

    pub const fn datatype(self) -> NamedNodeRef<'a> {
        match self.annotation {
            AnnotationRef::Plain => xsd::STRING,
            AnnotationRef::Tagged(_) => rdf::LANG_STRING,
            AnnotationRef::Typed(datatype) => datatype,
        }
    }

    #[inline]
    pub const fn is_plain(self) -> bool {
        !matches!(self.annotation, AnnotationRef::Typed(_))
    }

    pub fn into_owned(self) -> Literal {
        Literal {
            value: self.value.to_owned(),
            annotation: match self.annotation {
                AnnotationRef::Plain => Annotation::Plain,
                AnnotationRef::Tagged(language) => Annotation::Tagged(language.to_owned()),
                AnnotationRef::Typed(datatype) => Annotation::Typed(datatype.into_owned()),
            },
        }
    }
}

impl fmt::Display for LiteralRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_quoted_literal(self.value, f)?;
        match self.annotation {
            AnnotationRef::Plain => Ok(()),
            AnnotationRef::Tagged(language) => write!(f, "@{language}"),
            AnnotationRef::Typed(datatype) => write!(f, "^^{datatype}"),
        }
    }
}

impl<'a> From<&'a str> for LiteralRef<'a> {
    #[inline]
    fn from(value: &'a str) -> Self {
        Self::new_simple_literal(value)
    }
}

owned_borrowed_pair!(Literal, LiteralRef);

/// Writes `value` between double quotes with the N-Triples escape set:
/// named escapes for the usual control characters and the delimiters,
/// `\uXXXX` for the remaining control characters, everything else verbatim.
pub fn write_quoted_literal(value: &str, f: &mut impl Write) -> fmt::Result {
    f.write_char('"')?;
    for c in value.chars() {
        if let Some(escaped) = named_escape(c) {
            f.write_str(escaped)?;
        } else if c < ' ' || c == '\u{7F}' {
            write!(f, "\\u{:04X}", u32::from(c))?;
        } else {
            f.write_char(c)?;
        }
    }
    f.write_char('"')
}

fn named_escape(c: char) -> Option<&'static str> {
    Some(match c {
        '\u{8}' => "\\b",
        '\t' => "\\t",
        '\n' => "\\n",
        '\u{C}' => "\\f",
        '\r' => "\\r",
        '"' => "\\\"",
        '\\' => "\\\\",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_blank_nodes_are_ncnames_and_distinct() {
        let a = BlankNode::default();
        let b = BlankNode::default();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with('b'));
        assert_eq!(a.as_str().len(), 33);
    }

    #[test]
    fn blank_node_identifier_grammar() {
        assert!(BlankNode::new("a").is_ok());
        assert!(BlankNode::new("0x").is_ok());
        assert!(BlankNode::new("a.b").is_ok());
        assert!(BlankNode::new("").is_err());
        assert!(BlankNode::new("a b").is_err());
        assert!(BlankNode::new("ends.").is_err());
        assert!(BlankNode::new("-a").is_err());
    }

    #[test]
    fn xsd_string_collapses_to_plain() {
        assert_eq!(
            Literal::new_typed_literal("x", xsd::STRING),
            Literal::new_simple_literal("x")
        );
        assert!(Literal::new_typed_literal("x", xsd::STRING).is_plain());
    }

    #[test]
    fn language_tags_are_validated_and_lowercased() {
        let l = Literal::new_language_tagged_literal("x", "en-US").unwrap();
        assert_eq!(l.language(), Some("en-us"));
        assert_eq!(l.datatype(), rdf::LANG_STRING);
        assert!(Literal::new_language_tagged_literal("x", "not a tag").is_err());
    }

    #[test]
    fn escaping_covers_controls_and_delimiters() {
        assert_eq!(
            Literal::new_simple_literal("a\"b\\c\u{1}\td").to_string(),
            "\"a\\\"b\\\\c\\u0001\\td\""
        );
    }
}
