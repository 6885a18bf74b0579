use crate::error::{RdfXmlParseError, RdfXmlSyntaxError};
use crate::utils::{is_nc_name, is_utf8, is_whitespace};
use kestrel_iri::{Iri, IriParseError};
use kestrel_model::vocab::rdf;
use kestrel_model::{BlankNode, Literal, NamedNode, NamedOrBlankNode, Term, Triple};
use oxilangtag::LanguageTag;
use quick_xml::escape::unescape_with;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::name::{LocalName, QName, ResolveResult};
use quick_xml::{NsReader, Writer};
use std::collections::{HashMap, HashSet};
use std::io::{BufReader, Read};
use std::str;
use unicode_normalization::is_nfc;

const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// The local part of an IRI in the RDF namespace.
fn rdf_local(iri: &str) -> Option<&str> {
    iri.strip_prefix(RDF_NS)
}

/// Core syntax terms that can never name a node element.
fn forbidden_node_element(iri: &str) -> bool {
    matches!(
        rdf_local(iri),
        Some(
            "RDF" | "ID" | "about" | "bagID" | "parseType" | "resource" | "nodeID" | "datatype"
                | "aboutEach" | "aboutEachPrefix" | "li"
        )
    )
}

/// Core syntax terms that can never name a property element (`rdf:li` is
/// handled separately, it expands to a container membership property).
fn forbidden_property_element(iri: &str) -> bool {
    matches!(
        rdf_local(iri),
        Some(
            "RDF" | "ID" | "about" | "bagID" | "parseType" | "resource" | "nodeID" | "datatype"
                | "aboutEach" | "aboutEachPrefix" | "Description"
        )
    )
}

/// Attribute names with no meaning that must not be silently treated as
/// property attributes.
fn forbidden_attribute(iri: &str) -> bool {
    matches!(
        rdf_local(iri),
        Some("aboutEach" | "aboutEachPrefix" | "li" | "RDF" | "Description")
    )
}

/// A [RDF/XML](https://www.w3.org/TR/rdf-syntax-grammar/) streaming parser.
///
/// The parser is a pushdown machine over XML events: each open element adds
/// an [`ElementFrame`] carrying the production it belongs to, its scoped
/// `xml:base`/`xml:lang` and the identifiers it contributes; each close pops
/// the frame and emits whatever the production produces. Besides the frame
/// stack, only the set of seen `rdf:ID` values and the DTD entities are
/// kept in memory.
///
/// ```
/// use kestrel_rdfxml::RdfXmlParser;
///
/// let file = br#"<?xml version="1.0"?>
/// <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
///          xmlns:dc="http://purl.org/dc/elements/1.1/">
///   <rdf:Description rdf:about="http://example.com/book/1">
///     <dc:title>Moby-Dick</dc:title>
///     <dc:creator>Herman Melville</dc:creator>
///   </rdf:Description>
/// </rdf:RDF>"#;
///
/// let statements = RdfXmlParser::new()
///     .for_reader(file.as_ref())
///     .collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(statements.len(), 2);
/// assert_eq!(statements[0].object.to_string(), "\"Moby-Dick\"");
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Default)]
#[must_use]
pub struct RdfXmlParser {
    lenient: bool,
    base: Option<Iri<String>>,
    scanning: bool,
    allow_bag_id: bool,
    allow_other_parse_types: bool,
    allow_rdf_type_rdf_list: bool,
    non_nfc_fatal: bool,
    no_language_normalization: bool,
    warning_handler: Option<Box<dyn FnMut(String)>>,
}

impl RdfXmlParser {
    /// Builds a new [`RdfXmlParser`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assumes the file is valid to make parsing faster.
    ///
    /// It will skip some validations. If the file is actually invalid, the
    /// parser may emit broken RDF.
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

    /// Looks for an `rdf:RDF` element anywhere in the document instead of
    /// requiring RDF content at the top level.
    ///
    /// This allows extracting RDF islands embedded in other XML dialects.
    #[inline]
    pub fn scanning(mut self) -> Self {
        self.scanning = true;
        self
    }

    /// Downgrades the long-removed `rdf:bagID` attribute from an error to a
    /// warning. The construct is ignored either way.
    #[inline]
    pub fn allow_bag_id(mut self) -> Self {
        self.allow_bag_id = true;
        self
    }

    /// Treats unknown `rdf:parseType` values like `parseType="Literal"`
    /// instead of warning and skipping their content.
    #[inline]
    pub fn allow_other_parse_types(mut self) -> Self {
        self.allow_other_parse_types = true;
        self
    }

    /// Emits an `rdf:type rdf:List` triple for each node of a
    /// `parseType="Collection"` list.
    #[inline]
    pub fn allow_rdf_type_rdf_list(mut self) -> Self {
        self.allow_rdf_type_rdf_list = true;
        self
    }

    /// Makes literals that are not in Unicode Normalization Form C a syntax
    /// error instead of a warning.
    #[inline]
    pub fn non_nfc_fatal(mut self) -> Self {
        self.non_nfc_fatal = true;
        self
    }

    /// Keeps `xml:lang` values as written instead of lowercasing them.
    #[inline]
    pub fn without_language_normalization(mut self) -> Self {
        self.no_language_normalization = true;
        self
    }

    /// Sets a callback invoked for each recoverable oddity in the file
    /// (ignored `rdf:bagID`, unknown `parseType`, mixed content, NFC
    /// violations when they are not fatal...).
    #[inline]
    pub fn with_warning_handler(mut self, handler: impl FnMut(String) + 'static) -> Self {
        self.warning_handler = Some(Box::new(handler));
        self
    }

    /// Parses a RDF/XML file from a [`Read`] implementation.
    pub fn for_reader<R: Read>(self, reader: R) -> ReaderRdfXmlParser<R> {
        let mut xml = NsReader::from_reader(BufReader::new(reader));
        xml.config_mut().expand_empty_elements = true;
        ReaderRdfXmlParser {
            queue: Vec::new(),
            machine: RdfXmlMachine {
                xml,
                frames: Vec::new(),
                doc_base: self.base,
                entities: HashMap::new(),
                literal_depth: 0,
                skipping_depth: 0,
                seen_ids: HashSet::new(),
                recovered: Vec::new(),
                finished: false,
                lenient: self.lenient,
                scanning: self.scanning,
                allow_bag_id: self.allow_bag_id,
                allow_other_parse_types: self.allow_other_parse_types,
                allow_rdf_type_rdf_list: self.allow_rdf_type_rdf_list,
                non_nfc_fatal: self.non_nfc_fatal,
                no_language_normalization: self.no_language_normalization,
                warning_handler: self.warning_handler,
            },
            buffer: Vec::new(),
        }
    }

    /// Parses a RDF/XML file from a byte slice.
    pub fn for_slice<'a>(
        self,
        slice: &'a (impl AsRef<[u8]> + ?Sized),
    ) -> ReaderRdfXmlParser<&'a [u8]> {
        self.for_reader(slice.as_ref())
    }
}

/// Parses a RDF/XML file from a [`Read`] implementation.
///
/// Can be built using [`RdfXmlParser::for_reader`].
#[must_use]
pub struct ReaderRdfXmlParser<R: Read> {
    queue: Vec<Triple>,
    machine: RdfXmlMachine<BufReader<R>>,
    buffer: Vec<u8>,
}

impl<R: Read> Iterator for ReaderRdfXmlParser<R> {
    type Item = Result<Triple, RdfXmlParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if !self.queue.is_empty() {
                return Some(Ok(self.queue.remove(0)));
            }
            if let Some(error) = self.machine.recovered.pop() {
                return Some(Err(error.located_at_byte(self.buffer_position()).into()));
            }
            if self.machine.finished {
                return None;
            }
            let position = self.buffer_position();
            self.buffer.clear();
            let outcome = match self.machine.xml.read_event_into(&mut self.buffer) {
                Ok(event) => self.machine.handle_event(event, &mut self.queue),
                Err(e) => Err(e.into()),
            };
            if let Err(e) = outcome {
                return Some(Err(match e {
                    RdfXmlParseError::Syntax(e) => e.located_at_byte(position).into(),
                    e => e,
                }));
            }
        }
    }
}

impl<R: Read> ReaderRdfXmlParser<R> {
    /// The current byte position in the input data.
    pub fn buffer_position(&self) -> u64 {
        self.machine.xml.buffer_position()
    }
}

/// The grammar production an open element belongs to.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum Production {
    /// Outside of RDF content; only exists when `scanning` walks through
    /// foreign wrapper elements.
    Outside,
    /// Inside `rdf:RDF`: zero or more node elements.
    NodeElementList,
    /// A node element: zero or more property elements.
    NodeElement,
    /// A property element waiting for its object.
    Property,
    /// `parseType="Collection"`: child node elements form an RDF list.
    CollectionProperty,
    /// `parseType="Literal"` (or an unknown parseType): raw XML capture.
    LiteralProperty,
}

/// A property element object: a nested node or accumulated text.
#[derive(Debug)]
enum NodeOrText {
    Node(NamedOrBlankNode),
    Text(String),
}

/// One open element, with the slots the grammar needs.
struct ElementFrame {
    production: Production,
    /// The in-scope `xml:base`, already resolved against the parent scope.
    base: Option<Iri<String>>,
    /// The in-scope `xml:lang`.
    language: Option<String>,
    /// Node elements: the node this element stands for.
    /// Property elements: the statement subject.
    subject: Option<NamedOrBlankNode>,
    /// Property elements: the predicate.
    predicate: Option<NamedNode>,
    /// Property elements: the object gathered so far.
    object: Option<NodeOrText>,
    /// `rdf:ID` on a property element: reify the statement under this name.
    reify_as: Option<NamedNode>,
    /// `rdf:datatype` on a property element.
    datatype: Option<NamedNode>,
    /// Node elements: the `rdf:li` ordinal counter.
    li_counter: u64,
    /// Collection properties: the member nodes in document order.
    members: Vec<NamedOrBlankNode>,
    /// Literal properties: the XML capture.
    capture: Option<Writer<Vec<u8>>>,
    /// Literal properties: false when unknown parseType content is dropped.
    emit_literal: bool,
}

impl ElementFrame {
    fn new(production: Production, base: Option<Iri<String>>, language: Option<String>) -> Self {
        Self {
            production,
            base,
            language,
            subject: None,
            predicate: None,
            object: None,
            reify_as: None,
            datatype: None,
            li_counter: 0,
            members: Vec::new(),
            capture: None,
            emit_literal: false,
        }
    }
}

/// The RDF-specific attributes of one element, extracted into their slots
/// and already resolved against the element scope.
#[derive(Default)]
struct AttributeSlots {
    base: Option<Iri<String>>,
    language: Option<String>,
    id: Option<NamedNode>,
    node_id: Option<BlankNode>,
    about: Option<NamedNode>,
    resource: Option<NamedNode>,
    datatype: Option<NamedNode>,
    parse_type: Option<String>,
    type_attr: Option<NamedNode>,
    /// Everything else: property attributes.
    properties: Vec<(NamedNode, String)>,
}

struct RdfXmlMachine<T> {
    xml: NsReader<T>,
    frames: Vec<ElementFrame>,
    doc_base: Option<Iri<String>>,
    entities: HashMap<String, String>,
    literal_depth: usize,
    /// Depth of a subtree being discarded, 0 when not skipping.
    skipping_depth: usize,
    seen_ids: HashSet<String>,
    /// Recoverable errors waiting to be handed to the caller.
    recovered: Vec<RdfXmlSyntaxError>,
    finished: bool,
    lenient: bool,
    scanning: bool,
    allow_bag_id: bool,
    allow_other_parse_types: bool,
    allow_rdf_type_rdf_list: bool,
    non_nfc_fatal: bool,
    no_language_normalization: bool,
    warning_handler: Option<Box<dyn FnMut(String)>>,
}

impl<T> RdfXmlMachine<T> {
    fn handle_event(
        &mut self,
        event: Event<'_>,
        results: &mut Vec<Triple>,
    ) -> Result<(), RdfXmlParseError> {
        match event {
            Event::Start(event) => self.open_element(&event, results),
            Event::End(event) => self.close_element(&event, results),
            Event::Empty(_) => Err(RdfXmlSyntaxError::msg(
                "the expand_empty_elements option must be enabled",
            )
            .into()),
            Event::Text(event) => {
                let all_whitespace = event.iter().copied().all(is_whitespace);
                let text = event.decode()?.into_owned();
                self.handle_text(text, all_whitespace)
            }
            Event::CData(event) => {
                let text = self.xml.decoder().decode(event.as_ref())?.into_owned();
                let all_whitespace = text.bytes().all(is_whitespace);
                self.handle_text(text, all_whitespace)
            }
            Event::GeneralRef(event) => {
                let name = self.xml.decoder().decode(event.as_ref())?.into_owned();
                let text = self.resolve_general_ref(&name)?;
                let all_whitespace = text.bytes().all(is_whitespace);
                self.handle_text(text, all_whitespace)
            }
            Event::Comment(_) | Event::PI(_) => Ok(()),
            Event::Decl(decl) => {
                if let Some(encoding) = decl.encoding() {
                    if !is_utf8(&encoding?) {
                        return Err(RdfXmlSyntaxError::msg(
                            "only UTF-8 input is supported",
                        )
                        .into());
                    }
                }
                Ok(())
            }
            Event::DocType(event) => {
                let text = self.xml.decoder().decode(event.as_ref())?.into_owned();
                self.read_entity_declarations(&text)
            }
            Event::Eof => {
                self.finished = true;
                Ok(())
            }
        }
    }

    /// Pulls `<!ENTITY name "value">` declarations out of the DTD.
    fn read_entity_declarations(&mut self, doctype: &str) -> Result<(), RdfXmlParseError> {
        for chunk in doctype.split('<').skip(1) {
            let Some(declaration) = chunk.strip_prefix("!ENTITY") else {
                continue;
            };
            let declaration = declaration.trim_start();
            let declaration = declaration.strip_prefix('%').unwrap_or(declaration);
            let (name, rest) = declaration
                .trim_start()
                .split_once(|c: char| c.is_ascii_whitespace())
                .ok_or_else(|| {
                    RdfXmlSyntaxError::msg("an <!ENTITY> declaration needs a name and a value")
                })?;
            let rest = rest.trim_start();
            let Some(rest) = rest.strip_prefix('"') else {
                return Err(
                    RdfXmlSyntaxError::msg("an <!ENTITY> value must be double-quoted").into(),
                );
            };
            let Some((value, rest)) = rest.split_once('"') else {
                return Err(
                    RdfXmlSyntaxError::msg("an <!ENTITY> value must be double-quoted").into(),
                );
            };
            if rest.trim_start().strip_prefix('>').is_none() {
                return Err(RdfXmlSyntaxError::msg("an <!ENTITY> declaration must end with '>'")
                    .into());
            }
            // entity values may reference earlier entities
            let value = unescape_with(value, |e| self.entity(e))?.into_owned();
            self.entities.insert(name.to_owned(), value);
        }
        Ok(())
    }

    fn open_element(
        &mut self,
        event: &BytesStart<'_>,
        results: &mut Vec<Triple>,
    ) -> Result<(), RdfXmlParseError> {
        if self.skipping_depth > 0 {
            self.skipping_depth += 1;
            return Ok(());
        }
        if let Some(frame) = self.frames.last_mut() {
            if frame.production == Production::LiteralProperty {
                // raw capture of foreign markup
                let name = self.xml.decoder().decode(event.name().as_ref())?.into_owned();
                let mut copy = BytesStart::new(name);
                for attribute in event.attributes() {
                    copy.push_attribute(attribute?);
                }
                if let Some(capture) = &mut frame.capture {
                    capture.write_event(Event::Start(copy))?;
                }
                self.literal_depth += 1;
                return Ok(());
            }
        }

        let name = self.qualified_name(event.name())?;
        let Some(slots) = self.collect_attributes(event)? else {
            self.skipping_depth = 1;
            return Ok(());
        };

        match self.frames.last().map(|f| f.production) {
            // the document level: rdf:RDF, a bare node element, or (when
            // scanning) arbitrary XML to walk through
            None | Some(Production::Outside) => {
                if rdf_local(&name) == Some("RDF") {
                    self.frames.push(ElementFrame::new(
                        Production::NodeElementList,
                        slots.base,
                        slots.language,
                    ));
                } else if self.scanning {
                    self.frames.push(ElementFrame::new(
                        Production::Outside,
                        slots.base,
                        slots.language,
                    ));
                } else if forbidden_node_element(&name) {
                    return Err(RdfXmlSyntaxError::msg(format!(
                        "{name} cannot be used as a node element"
                    ))
                    .into());
                } else {
                    self.open_node_element(name, slots, results)?;
                }
            }
            Some(
                Production::NodeElementList | Production::Property | Production::CollectionProperty,
            ) => {
                if forbidden_node_element(&name) {
                    self.recover(RdfXmlSyntaxError::msg(format!(
                        "{name} cannot be used as a node element"
                    )));
                    return Ok(());
                }
                self.open_node_element(name, slots, results)?;
            }
            Some(Production::NodeElement) => self.open_property_element(name, slots, results)?,
            Some(Production::LiteralProperty) => {
                // handled above; reaching this means the stack is corrupt
                return Err(RdfXmlSyntaxError::msg("the XML element nesting is not balanced")
                    .into());
            }
        }
        Ok(())
    }

    /// Builds a node element frame: resolves the subject, emits the type and
    /// property-attribute triples.
    fn open_node_element(
        &mut self,
        name: String,
        slots: AttributeSlots,
        results: &mut Vec<Triple>,
    ) -> Result<(), RdfXmlParseError> {
        // exactly one way to name the node
        let named = [
            slots.id.is_some(),
            slots.node_id.is_some(),
            slots.about.is_some(),
        ]
        .into_iter()
        .filter(|p| *p)
        .count();
        if named > 1 {
            self.recover(RdfXmlSyntaxError::msg(
                "rdf:ID, rdf:nodeID and rdf:about are mutually exclusive",
            ));
            return Ok(());
        }
        if slots.resource.is_some() {
            self.recover(RdfXmlSyntaxError::msg(
                "rdf:resource cannot be used on a node element",
            ));
            return Ok(());
        }
        let subject: NamedOrBlankNode = if let Some(id) = slots.id {
            id.into()
        } else if let Some(node_id) = slots.node_id {
            node_id.into()
        } else if let Some(about) = slots.about {
            about.into()
        } else {
            BlankNode::default().into()
        };

        // the rdf:type triples come first, then the property attributes
        if rdf_local(&name) != Some("Description") {
            results.push(Triple::new(
                subject.clone(),
                rdf::TYPE,
                NamedNode::new_unchecked(name),
            ));
        }
        if let Some(type_attr) = slots.type_attr {
            results.push(Triple::new(subject.clone(), rdf::TYPE, type_attr));
        }
        self.property_attribute_triples(&subject, slots.properties, &slots.language, results);

        let mut frame = ElementFrame::new(Production::NodeElement, slots.base, slots.language);
        frame.subject = Some(subject);
        self.frames.push(frame);
        Ok(())
    }

    /// Builds a property element frame according to its `rdf:parseType`.
    fn open_property_element(
        &mut self,
        name: String,
        slots: AttributeSlots,
        results: &mut Vec<Triple>,
    ) -> Result<(), RdfXmlParseError> {
        let subject = match self.frames.last_mut() {
            Some(parent) => {
                let Some(subject) = parent.subject.clone() else {
                    return Err(RdfXmlSyntaxError::msg(
                        "a property element needs an enclosing node element",
                    )
                    .into());
                };
                // rdf:li expands to the next container membership property
                if rdf_local(&name) == Some("li") {
                    parent.li_counter += 1;
                }
                subject
            }
            None => {
                return Err(RdfXmlSyntaxError::msg(
                    "a property element needs an enclosing node element",
                )
                .into());
            }
        };
        let predicate = if rdf_local(&name) == Some("li") {
            let ordinal = self.frames.last().map_or(0, |f| f.li_counter);
            rdf::member(ordinal)
        } else if forbidden_property_element(&name) {
            self.recover(RdfXmlSyntaxError::msg(format!(
                "{name} cannot be used as a property element"
            )));
            return Ok(());
        } else {
            NamedNode::new_unchecked(name)
        };

        let mut frame = match slots.parse_type.as_deref() {
            None => {
                let mut frame =
                    ElementFrame::new(Production::Property, slots.base, slots.language);
                if slots.resource.is_some()
                    || slots.node_id.is_some()
                    || !slots.properties.is_empty()
                {
                    // an inline object node
                    let object: NamedOrBlankNode = match (slots.resource, slots.node_id) {
                        (Some(_), Some(_)) => {
                            self.recover(RdfXmlSyntaxError::msg(
                                "rdf:resource and rdf:nodeID are mutually exclusive",
                            ));
                            return Ok(());
                        }
                        (Some(resource), None) => resource.into(),
                        (None, Some(node_id)) => node_id.into(),
                        (None, None) => BlankNode::default().into(),
                    };
                    if let Some(type_attr) = slots.type_attr {
                        results.push(Triple::new(object.clone(), rdf::TYPE, type_attr));
                    }
                    self.property_attribute_triples(
                        &object,
                        slots.properties,
                        &frame.language,
                        results,
                    );
                    frame.object = Some(NodeOrText::Node(object));
                }
                frame.datatype = slots.datatype;
                frame
            }
            Some("Resource") => {
                // as if the element contained an anonymous node element
                let object = BlankNode::default();
                let statement = Triple::new(subject.clone(), predicate.clone(), object.clone());
                results.push(statement.clone());
                if let Some(reify_as) = &slots.id {
                    self.reify(statement, reify_as.clone(), results);
                }
                let mut frame =
                    ElementFrame::new(Production::NodeElement, slots.base, slots.language);
                frame.subject = Some(object.into());
                self.frames.push(frame);
                return Ok(());
            }
            Some("Collection") => {
                ElementFrame::new(Production::CollectionProperty, slots.base, slots.language)
            }
            Some("Literal") => {
                let mut frame =
                    ElementFrame::new(Production::LiteralProperty, slots.base, slots.language);
                frame.capture = Some(Writer::new(Vec::new()));
                frame.emit_literal = true;
                frame
            }
            Some(other) => {
                let mut frame =
                    ElementFrame::new(Production::LiteralProperty, slots.base, slots.language);
                frame.capture = Some(Writer::new(Vec::new()));
                frame.emit_literal = self.allow_other_parse_types;
                if !self.allow_other_parse_types {
                    self.warn(format!(
                        "unknown rdf:parseType=\"{other}\", the content of {predicate} is skipped"
                    ));
                }
                frame
            }
        };
        frame.subject = Some(subject);
        frame.predicate = Some(predicate);
        frame.reify_as = slots.id;
        self.frames.push(frame);
        Ok(())
    }

    fn close_element(
        &mut self,
        event: &BytesEnd<'_>,
        results: &mut Vec<Triple>,
    ) -> Result<(), RdfXmlParseError> {
        if self.skipping_depth > 0 {
            self.skipping_depth -= 1;
            return Ok(());
        }
        if self.literal_depth > 0 {
            if let Some(frame) = self.frames.last_mut() {
                if frame.production == Production::LiteralProperty {
                    let name = self.xml.decoder().decode(event.name().as_ref())?.into_owned();
                    if let Some(capture) = &mut frame.capture {
                        capture.write_event(Event::End(BytesEnd::new(name)))?;
                    }
                    self.literal_depth -= 1;
                    return Ok(());
                }
            }
        }
        let Some(frame) = self.frames.pop() else {
            return Ok(());
        };
        match frame.production {
            Production::Outside | Production::NodeElementList => Ok(()),
            Production::NodeElement => {
                self.attach_child_node(frame);
                Ok(())
            }
            Production::Property => self.finish_property(frame, results),
            Production::CollectionProperty => {
                self.finish_collection(frame, results);
                Ok(())
            }
            Production::LiteralProperty => self.finish_literal(frame, results),
        }
    }

    /// A closing node element hands its subject to the enclosing property.
    fn attach_child_node(&mut self, frame: ElementFrame) {
        let Some(node) = frame.subject else {
            return;
        };
        let mut dropped_text = None;
        match self.frames.last_mut() {
            Some(parent) if parent.production == Production::Property => {
                if let Some(NodeOrText::Text(text)) = parent.object.take() {
                    dropped_text = Some(text);
                }
                parent.object = Some(NodeOrText::Node(node));
            }
            Some(parent) if parent.production == Production::CollectionProperty => {
                parent.members.push(node);
            }
            _ => (),
        }
        if let Some(text) = dropped_text {
            self.warn(format!(
                "mixed content is not allowed in a property element, '{}' is dropped",
                text.trim()
            ));
        }
    }

    /// A closing property element emits its statement.
    fn finish_property(
        &mut self,
        frame: ElementFrame,
        results: &mut Vec<Triple>,
    ) -> Result<(), RdfXmlParseError> {
        let (Some(subject), Some(predicate)) = (frame.subject, frame.predicate) else {
            return Ok(());
        };
        let object: Term = match frame.object {
            Some(NodeOrText::Node(node)) => node.into(),
            Some(NodeOrText::Text(text)) => {
                self.check_nfc(&text)?;
                self.literal(text, frame.language, frame.datatype).into()
            }
            None => self.literal(String::new(), frame.language, frame.datatype).into(),
        };
        let statement = Triple::new(subject, predicate, object);
        results.push(statement.clone());
        if let Some(reify_as) = frame.reify_as {
            self.reify(statement, reify_as, results);
        }
        Ok(())
    }

    /// Lowers a `parseType="Collection"` frame into the `rdf:first` /
    /// `rdf:rest` chain, in list order, the head linked to the property
    /// last.
    fn finish_collection(&mut self, frame: ElementFrame, results: &mut Vec<Triple>) {
        let (Some(subject), Some(predicate)) = (frame.subject, frame.predicate) else {
            return;
        };
        let cells: Vec<BlankNode> = frame.members.iter().map(|_| BlankNode::default()).collect();
        for (index, (cell, member)) in cells.iter().zip(frame.members).enumerate() {
            if self.allow_rdf_type_rdf_list {
                results.push(Triple::new(cell.clone(), rdf::TYPE, rdf::LIST));
            }
            results.push(Triple::new(cell.clone(), rdf::FIRST, member));
            let rest: Term = match cells.get(index + 1) {
                Some(next) => next.clone().into(),
                None => rdf::NIL.into_owned().into(),
            };
            results.push(Triple::new(cell.clone(), rdf::REST, rest));
        }
        let head: NamedOrBlankNode = match cells.first() {
            Some(first) => first.clone().into(),
            None => rdf::NIL.into_owned().into(),
        };
        let statement = Triple::new(subject, predicate, head);
        results.push(statement.clone());
        if let Some(reify_as) = frame.reify_as {
            self.reify(statement, reify_as, results);
        }
    }

    /// A closing `parseType="Literal"` emits the captured XML.
    fn finish_literal(
        &mut self,
        frame: ElementFrame,
        results: &mut Vec<Triple>,
    ) -> Result<(), RdfXmlParseError> {
        if !frame.emit_literal {
            return Ok(());
        }
        let (Some(subject), Some(predicate)) = (frame.subject, frame.predicate) else {
            return Ok(());
        };
        let xml = frame.capture.map(Writer::into_inner).unwrap_or_default();
        if xml.is_empty() {
            return Err(RdfXmlSyntaxError::msg(format!(
                "no XML content found for the rdf:XMLLiteral value of {predicate}"
            ))
            .into());
        }
        let Ok(xml) = str::from_utf8(&xml) else {
            return Err(RdfXmlSyntaxError::msg("the XML literal is not valid UTF-8").into());
        };
        let statement = Triple::new(
            subject,
            predicate,
            Literal::new_typed_literal(xml, rdf::XML_LITERAL),
        );
        results.push(statement.clone());
        if let Some(reify_as) = frame.reify_as {
            self.reify(statement, reify_as, results);
        }
        Ok(())
    }

    fn handle_text(&mut self, text: String, all_whitespace: bool) -> Result<(), RdfXmlParseError> {
        if self.skipping_depth > 0 {
            return Ok(());
        }
        let mut mixed_content = false;
        match self.frames.last_mut() {
            Some(frame) if frame.production == Production::Property => {
                if !all_whitespace {
                    match &mut frame.object {
                        Some(NodeOrText::Node(_)) => mixed_content = true,
                        // adjacent text and entity reference events are one value
                        Some(NodeOrText::Text(existing)) => existing.push_str(&text),
                        None => frame.object = Some(NodeOrText::Text(text.clone())),
                    }
                }
            }
            Some(frame) if frame.production == Production::LiteralProperty => {
                if let Some(capture) = &mut frame.capture {
                    capture.write_event(Event::Text(quick_xml::events::BytesText::new(&text)))?;
                }
            }
            _ if all_whitespace => (),
            _ => {
                return Err(
                    RdfXmlSyntaxError::msg(format!("unexpected text content: '{text}'")).into(),
                );
            }
        }
        if mixed_content {
            self.warn(format!(
                "mixed content is not allowed in a property element, '{}' is dropped",
                text.trim()
            ));
        }
        Ok(())
    }

    /// Extracts and resolves the RDF attributes of one element.
    ///
    /// `Ok(None)` means a recoverable problem was registered and the whole
    /// element subtree must be skipped.
    fn collect_attributes(
        &mut self,
        event: &BytesStart<'_>,
    ) -> Result<Option<AttributeSlots>, RdfXmlParseError> {
        let (scope_base, scope_language) = match self.frames.last() {
            Some(frame) => (frame.base.clone(), frame.language.clone()),
            None => (self.doc_base.clone(), None),
        };
        let mut slots = AttributeSlots {
            base: scope_base,
            language: scope_language,
            ..AttributeSlots::default()
        };
        // raw values first: xml:base must win before IRIs are resolved,
        // whatever the attribute order
        let mut raw: Vec<(String, String)> = Vec::new();
        for attribute in event.attributes() {
            let attribute = attribute?;
            if attribute.key.as_ref().starts_with(b"xml") {
                match attribute.key.as_ref() {
                    b"xml:lang" => {
                        let mut tag = self.attribute_value(&attribute)?;
                        if !self.no_language_normalization {
                            tag.make_ascii_lowercase();
                        }
                        if !self.lenient {
                            if let Err(error) = LanguageTag::parse(tag.as_str()) {
                                return Err(
                                    RdfXmlSyntaxError::invalid_language_tag(tag, error).into()
                                );
                            }
                        }
                        slots.language = Some(tag);
                    }
                    b"xml:base" => {
                        let value = self.attribute_value(&attribute)?;
                        // xml:base itself may be relative to the outer base
                        slots.base = Some(match &slots.base {
                            Some(outer) => outer.resolve(&value).map_err(|error| {
                                RdfXmlSyntaxError::invalid_iri(value.clone(), error)
                            })?,
                            None if self.lenient => Iri::parse_unchecked(value),
                            None => Iri::parse(value.clone()).map_err(|error| {
                                RdfXmlSyntaxError::invalid_iri(value, error)
                            })?,
                        });
                    }
                    _ => (), // other xml: and xmlns attributes carry no RDF
                }
                continue;
            }
            let name = self.qualified_attribute_name(attribute.key)?;
            let value = self.attribute_value(&attribute)?;
            raw.push((name, value));
        }

        for (name, value) in raw {
            match rdf_local(&name) {
                Some("ID") => {
                    if !is_nc_name(&value) {
                        self.recover(RdfXmlSyntaxError::msg(format!(
                            "'{value}' is not a valid rdf:ID"
                        )));
                        return Ok(None);
                    }
                    let iri = self.resolve_iri(&slots.base, format!("#{value}"))?;
                    if !self.seen_ids.insert(iri.as_str().to_owned()) {
                        // reported, but the element is still parsed with the
                        // resolved subject
                        self.recovered.push(RdfXmlSyntaxError::msg(format!(
                            "the rdf:ID {iri} was already used"
                        )));
                    }
                    slots.id = Some(iri);
                }
                Some("nodeID") => {
                    if !is_nc_name(&value) {
                        self.recover(RdfXmlSyntaxError::msg(format!(
                            "'{value}' is not a valid rdf:nodeID"
                        )));
                        return Ok(None);
                    }
                    slots.node_id = Some(BlankNode::new_unchecked(value));
                }
                Some("about") => slots.about = Some(self.resolve_iri(&slots.base, value)?),
                Some("resource") => slots.resource = Some(self.resolve_iri(&slots.base, value)?),
                Some("datatype") => slots.datatype = Some(self.resolve_iri(&slots.base, value)?),
                Some("parseType") => slots.parse_type = Some(value),
                Some("type") => slots.type_attr = Some(self.resolve_iri(&slots.base, value)?),
                Some("bagID") => {
                    if !is_nc_name(&value) {
                        self.recover(RdfXmlSyntaxError::msg(format!(
                            "'{value}' is not a valid rdf:bagID"
                        )));
                        return Ok(None);
                    }
                    if self.allow_bag_id {
                        self.warn(format!(
                            "rdf:bagID=\"{value}\" is ignored: the construct was removed from RDF"
                        ));
                    } else {
                        self.recover(RdfXmlSyntaxError::msg(
                            "rdf:bagID is not supported, it was removed from RDF",
                        ));
                        return Ok(None);
                    }
                }
                Some(_) if forbidden_attribute(&name) => {
                    self.recover(RdfXmlSyntaxError::msg(format!(
                        "{name} cannot be used as an attribute"
                    )));
                    return Ok(None);
                }
                _ => {
                    self.check_nfc(&value)?;
                    let predicate = self.checked_iri(name)?;
                    slots.properties.push((predicate, value));
                }
            }
        }
        Ok(Some(slots))
    }

    fn property_attribute_triples(
        &mut self,
        subject: &NamedOrBlankNode,
        properties: Vec<(NamedNode, String)>,
        language: &Option<String>,
        results: &mut Vec<Triple>,
    ) {
        for (predicate, value) in properties {
            let object = match language {
                Some(language) => {
                    Literal::new_language_tagged_literal_unchecked(value, language.clone())
                }
                None => Literal::new_simple_literal(value),
            };
            results.push(Triple::new(subject.clone(), predicate, object));
        }
    }

    fn literal(
        &self,
        value: String,
        language: Option<String>,
        datatype: Option<NamedNode>,
    ) -> Literal {
        if let Some(datatype) = datatype {
            Literal::new_typed_literal(value, datatype)
        } else if let Some(language) = language {
            Literal::new_language_tagged_literal_unchecked(value, language)
        } else {
            Literal::new_simple_literal(value)
        }
    }

    /// The four reification triples, right after the reified statement.
    fn reify(&mut self, statement: Triple, name: NamedNode, results: &mut Vec<Triple>) {
        results.push(Triple::new(name.clone(), rdf::TYPE, rdf::STATEMENT));
        results.push(Triple::new(
            name.clone(),
            rdf::SUBJECT,
            Term::from(statement.subject),
        ));
        results.push(Triple::new(name.clone(), rdf::PREDICATE, statement.predicate));
        results.push(Triple::new(name, rdf::OBJECT, statement.object));
    }

    fn qualified_name(&self, qname: QName<'_>) -> Result<String, RdfXmlParseError> {
        let (namespace, local) = self.xml.resolve_element(qname);
        self.expand_qualified(namespace, local)
    }

    fn qualified_attribute_name(&self, qname: QName<'_>) -> Result<String, RdfXmlParseError> {
        let (namespace, local) = self.xml.resolve_attribute(qname);
        self.expand_qualified(namespace, local)
    }

    fn expand_qualified(
        &self,
        namespace: ResolveResult<'_>,
        local: LocalName<'_>,
    ) -> Result<String, RdfXmlParseError> {
        match namespace {
            ResolveResult::Bound(namespace) => {
                let mut joined =
                    Vec::with_capacity(namespace.as_ref().len() + local.as_ref().len());
                joined.extend_from_slice(namespace.as_ref());
                joined.extend_from_slice(local.as_ref());
                let joined = self.xml.decoder().decode(&joined)?;
                Ok(unescape_with(&joined, |e| self.entity(e))?.into_owned())
            }
            ResolveResult::Unbound => {
                Err(RdfXmlSyntaxError::msg("RDF/XML requires XML namespaces").into())
            }
            ResolveResult::Unknown(prefix) => Err(RdfXmlSyntaxError::msg(format!(
                "the namespace prefix '{}' is not declared",
                self.xml.decoder().decode(&prefix)?
            ))
            .into()),
        }
    }

    fn attribute_value(&self, attribute: &Attribute<'_>) -> Result<String, RdfXmlParseError> {
        Ok(attribute
            .decode_and_unescape_value_with(self.xml.decoder(), |e| self.entity(e))?
            .into_owned())
    }

    fn resolve_iri(
        &self,
        base: &Option<Iri<String>>,
        reference: String,
    ) -> Result<NamedNode, RdfXmlSyntaxError> {
        match base {
            Some(base) => {
                let resolved = if self.lenient {
                    base.resolve_unchecked(&reference)
                } else {
                    base.resolve(&reference)
                        .map_err(|error| RdfXmlSyntaxError::invalid_iri(reference, error))?
                };
                Ok(NamedNode::new_unchecked(resolved.into_inner()))
            }
            None => self.checked_iri(reference),
        }
    }

    fn checked_iri(&self, iri: String) -> Result<NamedNode, RdfXmlSyntaxError> {
        if !self.lenient {
            if let Err(error) = Iri::parse(iri.as_str()) {
                return Err(RdfXmlSyntaxError::invalid_iri(iri, error));
            }
        }
        Ok(NamedNode::new_unchecked(iri))
    }

    fn entity(&self, name: &str) -> Option<&str> {
        self.entities.get(name).map(String::as_str)
    }

    /// A general entity reference event: a character reference, a
    /// predefined XML entity, or a `<!ENTITY>` from the DTD.
    fn resolve_general_ref(&self, name: &str) -> Result<String, RdfXmlSyntaxError> {
        Ok(match name {
            "amp" => "&".to_owned(),
            "lt" => "<".to_owned(),
            "gt" => ">".to_owned(),
            "quot" => "\"".to_owned(),
            "apos" => "'".to_owned(),
            _ => {
                if let Some(code_point) = name.strip_prefix('#') {
                    let value = if let Some(hex) = code_point.strip_prefix('x') {
                        u32::from_str_radix(hex, 16)
                    } else {
                        code_point.parse()
                    }
                    .map_err(|_| {
                        RdfXmlSyntaxError::msg(format!("invalid character reference '&{name};'"))
                    })?;
                    char::from_u32(value)
                        .ok_or_else(|| {
                            RdfXmlSyntaxError::msg(format!(
                                "invalid character reference '&{name};'"
                            ))
                        })?
                        .to_string()
                } else if let Some(value) = self.entities.get(name) {
                    value.clone()
                } else {
                    return Err(RdfXmlSyntaxError::msg(format!("unknown entity '&{name};'")));
                }
            }
        })
    }

    fn check_nfc(&mut self, value: &str) -> Result<(), RdfXmlSyntaxError> {
        if is_nfc(value) {
            Ok(())
        } else if self.non_nfc_fatal {
            Err(RdfXmlSyntaxError::msg(
                "the literal value is not in Unicode Normalization Form C",
            ))
        } else {
            self.warn("a literal value is not in Unicode Normalization Form C".to_owned());
            Ok(())
        }
    }

    /// Registers a recoverable error; the caller discards the subtree.
    fn recover(&mut self, error: RdfXmlSyntaxError) {
        self.recovered.push(error);
        self.skipping_depth = 1;
    }

    fn warn(&mut self, message: String) {
        if let Some(handler) = &mut self.warning_handler {
            handler(message);
        }
    }
}
