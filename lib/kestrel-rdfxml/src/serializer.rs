use crate::utils::{is_name_char, is_name_start_char};
use kestrel_iri::{Iri, IriParseError};
use kestrel_model::vocab::rdf;
use kestrel_model::{NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, TermRef, TripleRef};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::BTreeMap;
use std::io;
use std::io::Write;

/// A [RDF/XML](https://www.w3.org/TR/rdf-syntax-grammar/) streaming
/// serializer.
///
/// Statements with the same subject share one description element, and a
/// leading `rdf:type` statement turns it into a typed node element. Since
/// the async machinery of an event queue is not needed here, events go to
/// the underlying writer as soon as they are complete.
///
/// ```
/// use kestrel_model::{LiteralRef, NamedNodeRef, TripleRef};
/// use kestrel_rdfxml::RdfXmlSerializer;
///
/// let mut serializer = RdfXmlSerializer::new()
///     .with_prefix("dc", "http://purl.org/dc/elements/1.1/")?
///     .for_writer(Vec::new());
/// serializer.serialize_triple(TripleRef::new(
///     NamedNodeRef::new_unchecked("http://example.com/book/1"),
///     NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
///     NamedNodeRef::new_unchecked("http://purl.org/dc/dcmitype/Text"),
/// ))?;
/// serializer.serialize_triple(TripleRef::new(
///     NamedNodeRef::new_unchecked("http://example.com/book/1"),
///     NamedNodeRef::new_unchecked("http://purl.org/dc/elements/1.1/title"),
///     LiteralRef::new_language_tagged_literal_unchecked("Moby-Dick", "en"),
/// ))?;
/// assert_eq!(
///     String::from_utf8(serializer.finish()?)?,
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
///      <rdf:RDF xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\">\n\
///      \t<ns1:Text xmlns:ns1=\"http://purl.org/dc/dcmitype/\" rdf:about=\"http://example.com/book/1\">\n\
///      \t\t<dc:title xml:lang=\"en\">Moby-Dick</dc:title>\n\
///      \t</ns1:Text>\n\
///      </rdf:RDF>"
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Default, Clone)]
#[must_use]
pub struct RdfXmlSerializer {
    prefixes: BTreeMap<String, String>,
}

impl RdfXmlSerializer {
    /// Builds a new [`RdfXmlSerializer`].
    #[inline]
    pub fn new() -> Self {
        Self {
            prefixes: BTreeMap::new(),
        }
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

    /// Serializes to a [`Write`] implementation, with tab indentation.
    pub fn for_writer<W: Write>(mut self, writer: W) -> WriterRdfXmlSerializer<W> {
        self.prefixes
            .insert("http://www.w3.org/1999/02/22-rdf-syntax-ns#".into(), "rdf".into());
        WriterRdfXmlSerializer {
            writer: Writer::new_with_indent(writer, b'\t', 1),
            prefixes: self.prefixes,
            started: false,
            open_tag: None,
            current_subject: None,
            fresh_prefix_counter: 0,
        }
    }
}

/// Serializes RDF/XML to a [`Write`] implementation.
///
/// Can be built using [`RdfXmlSerializer::for_writer`].
#[must_use]
pub struct WriterRdfXmlSerializer<W: Write> {
    writer: Writer<W>,
    prefixes: BTreeMap<String, String>,
    started: bool,
    /// The element name to close when the current description ends.
    open_tag: Option<String>,
    current_subject: Option<NamedOrBlankNode>,
    /// Counter for the `nsN` prefixes minted for undeclared namespaces.
    fresh_prefix_counter: usize,
}

impl<W: Write> WriterRdfXmlSerializer<W> {
    /// Serializes an extra triple.
    pub fn serialize_triple<'a>(&mut self, t: impl Into<TripleRef<'a>>) -> io::Result<()> {
        let triple = t.into();
        if !self.started {
            self.started = true;
            self.write_preamble()?;
        }

        if self.current_subject.as_ref().map(NamedOrBlankNode::as_ref) != Some(triple.subject) {
            self.close_description()?;
            // a leading rdf:type with an IRI object becomes the element name
            let type_object = if triple.predicate == rdf::TYPE {
                match triple.object {
                    TermRef::NamedNode(class) => Some(class),
                    _ => None,
                }
            } else {
                None
            };
            let (tag, minted) = match type_object {
                Some(class) => self.element_name(class),
                None => ("rdf:Description".to_owned(), None),
            };
            let mut open = BytesStart::new(tag.as_str());
            if let Some((attribute, namespace)) = minted {
                open.push_attribute((attribute.as_str(), namespace));
            }
            match triple.subject {
                NamedOrBlankNodeRef::NamedNode(node) => {
                    open.push_attribute(("rdf:about", node.as_str()));
                }
                NamedOrBlankNodeRef::BlankNode(node) => {
                    open.push_attribute(("rdf:nodeID", node.as_str()));
                }
            }
            self.writer.write_event(Event::Start(open))?;
            self.open_tag = Some(tag);
            self.current_subject = Some(triple.subject.into_owned());
            if type_object.is_some() {
                return Ok(()); // the element name carries the whole statement
            }
        }

        let (tag, minted) = self.element_name(triple.predicate);
        let mut property = BytesStart::new(tag.as_str());
        if let Some((attribute, namespace)) = minted {
            property.push_attribute((attribute.as_str(), namespace));
        }
        match triple.object {
            TermRef::NamedNode(node) => {
                property.push_attribute(("rdf:resource", node.as_str()));
                self.writer.write_event(Event::Empty(property))?;
            }
            TermRef::BlankNode(node) => {
                property.push_attribute(("rdf:nodeID", node.as_str()));
                self.writer.write_event(Event::Empty(property))?;
            }
            TermRef::Literal(literal) => {
                if let Some(language) = literal.language() {
                    property.push_attribute(("xml:lang", language));
                } else if !literal.is_plain() {
                    property.push_attribute(("rdf:datatype", literal.datatype().as_str()));
                }
                self.writer.write_event(Event::Start(property))?;
                self.writer
                    .write_event(Event::Text(BytesText::new(literal.value())))?;
                self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
            }
        }
        Ok(())
    }

    /// Ends the document and returns the underlying [`Write`].
    pub fn finish(mut self) -> io::Result<W> {
        if !self.started {
            self.write_preamble()?;
        }
        self.close_description()?;
        self.writer.write_event(Event::End(BytesEnd::new("rdf:RDF")))?;
        Ok(self.writer.into_inner())
    }

    fn write_preamble(&mut self) -> io::Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut root = BytesStart::new("rdf:RDF");
        for (namespace, name) in &self.prefixes {
            root.push_attribute((format!("xmlns:{name}").as_str(), namespace.as_str()));
        }
        self.writer.write_event(Event::Start(root))?;
        Ok(())
    }

    fn close_description(&mut self) -> io::Result<()> {
        if let Some(tag) = self.open_tag.take() {
            self.writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
        self.current_subject = None;
        Ok(())
    }

    /// Turns an IRI into an XML element name: a declared prefix when one
    /// matches, a freshly minted `nsN` prefix otherwise. The second value is
    /// the `xmlns:...` attribute to put on the element when a prefix had to
    /// be minted.
    fn element_name<'a>(
        &mut self,
        iri: NamedNodeRef<'a>,
    ) -> (String, Option<(String, &'a str)>) {
        let iri = iri.as_str();
        let split_at = local_name_start(iri);
        let (namespace, local) = iri.split_at(split_at);
        if let Some(name) = self.prefixes.get(namespace) {
            let tag = if name.is_empty() {
                local.to_owned()
            } else {
                format!("{name}:{local}")
            };
            return (tag, None);
        }
        // mint a prefix for this one element; an IRI ending outside an XML
        // name keeps the usual RDF/XML limitation of an empty local part
        self.fresh_prefix_counter += 1;
        let minted = format!("ns{}", self.fresh_prefix_counter);
        let tag = format!("{minted}:{local}");
        (tag, Some((format!("xmlns:{minted}"), namespace)))
    }
}

/// Where the longest XML-name-shaped suffix of `iri` starts.
///
/// This is where the namespace/local split happens when writing a qname.
fn local_name_start(iri: &str) -> usize {
    let mut start = iri.len();
    for (position, c) in iri.char_indices().rev() {
        if c == ':' || !is_name_char(c) {
            break;
        }
        if is_name_start_char(c) {
            start = position;
        }
    }
    start
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_model::BlankNodeRef;

    #[test]
    fn local_name_splits() {
        assert_eq!(local_name_start("http://purl.org/dc/elements/1.1/title"), 32);
        assert_eq!(local_name_start("http://www.w3.org/2004/02/skos/core#Concept"), 36);
        assert_eq!(local_name_start("urn:isbn:0451450523"), 19); // digits cannot start a name
        assert_eq!(local_name_start("http://example.com/"), 19);
    }

    #[test]
    fn blank_nodes_round_as_node_ids() {
        let mut serializer = RdfXmlSerializer::new().for_writer(Vec::new());
        serializer
            .serialize_triple(TripleRef::new(
                BlankNodeRef::new_unchecked("a"),
                NamedNodeRef::new_unchecked("http://example.com/p"),
                BlankNodeRef::new_unchecked("b"),
            ))
            .unwrap();
        let out = String::from_utf8(serializer.finish().unwrap()).unwrap();
        assert!(out.contains("rdf:nodeID=\"a\""));
        assert!(out.contains("rdf:nodeID=\"b\""));
    }

    #[test]
    fn undeclared_namespaces_get_minted_prefixes() {
        let mut serializer = RdfXmlSerializer::new().for_writer(Vec::new());
        serializer
            .serialize_triple(TripleRef::new(
                NamedNodeRef::new_unchecked("http://example.com/s"),
                NamedNodeRef::new_unchecked("http://example.com/vocab#p"),
                NamedNodeRef::new_unchecked("http://example.com/o"),
            ))
            .unwrap();
        let out = String::from_utf8(serializer.finish().unwrap()).unwrap();
        assert!(out.contains("<ns1:p xmlns:ns1=\"http://example.com/vocab#\""));
    }
}
