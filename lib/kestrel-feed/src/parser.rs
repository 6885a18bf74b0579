use crate::error::{FeedParseError, FeedSyntaxError};
use crate::model::{
    FeedBlock, FeedField, FeedItem, FeedModel, FeedNamespace, FeedNodeKind, FeedValue,
    ATOM_TO_RSS,
};
use kestrel_iri::{Iri, IriParseError};
use kestrel_model::vocab::rdf;
use kestrel_model::{BlankNode, Literal, NamedNode, NamedOrBlankNode, Term, Triple};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::io::{BufReader, Read};
use std::vec;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::OffsetDateTime;

/// A tag-soup parser for the common syndication dialects.
///
/// The whole feed is read into a typed-node model ([`FeedModel`]), an uplift
/// pass normalizes dates and mirrors Atom fields onto their RSS
/// equivalents, and the model is then lowered to RDF triples using the RSS
/// 1.0 vocabulary.
///
/// ```
/// use kestrel_feed::FeedParser;
///
/// let file = br#"<?xml version="1.0"?>
/// <rss version="2.0"><channel>
///   <title>My feed</title>
///   <link>http://example.com/</link>
///   <item><title>First post</title><link>http://example.com/1</link></item>
/// </channel></rss>"#;
///
/// let triples = FeedParser::new()
///     .for_reader(file.as_ref())
///     .collect::<Result<Vec<_>, _>>()?;
/// assert!(triples
///     .iter()
///     .any(|t| t.predicate.as_str() == "http://purl.org/rss/1.0/title"));
/// # Result::<_, kestrel_feed::FeedParseError>::Ok(())
/// ```
#[derive(Default)]
#[must_use]
pub struct FeedParser {
    base: Option<Iri<String>>,
    warning_handler: Option<Box<dyn FnMut(String)>>,
}

impl FeedParser {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Result<Self, IriParseError> {
        let base = Iri::parse(base_iri.into())?;
        self.base = Some(base);
        Ok(self)
    }

    /// Sets a callback invoked for each unknown element or oddity in the
    /// feed. Unknown content is skipped, never fatal.
    #[inline]
    pub fn with_warning_handler(mut self, handler: impl FnMut(String) + 'static) -> Self {
        self.warning_handler = Some(Box::new(handler));
        self
    }

    /// Parses a feed from a [`Read`] implementation and iterates over the
    /// produced triples.
    pub fn for_reader<R: Read>(self, reader: R) -> ReaderFeedParser<R> {
        ReaderFeedParser {
            start: Some((self, reader)),
            results: Vec::new().into_iter(),
            error: None,
        }
    }

    /// Parses a feed into its typed-node model, after the uplift pass.
    pub fn parse_model<R: Read>(mut self, reader: R) -> Result<FeedModel, FeedParseError> {
        let mut model = FeedReader {
            reader: {
                let mut reader = NsReader::from_reader(BufReader::new(reader));
                reader.config_mut().expand_empty_elements = true;
                reader
            },
            stack: Vec::new(),
            model: FeedModel::default(),
            base: self.base.take(),
            warning_handler: self.warning_handler.take(),
        }
        .parse()?;
        uplift(&mut model);
        Ok(model)
    }
}

/// Iterator over the triples of a feed.
///
/// Can be built using [`FeedParser::for_reader`].
#[must_use]
pub struct ReaderFeedParser<R: Read> {
    start: Option<(FeedParser, R)>,
    results: vec::IntoIter<Triple>,
    error: Option<FeedParseError>,
}

impl<R: Read> Iterator for ReaderFeedParser<R> {
    type Item = Result<Triple, FeedParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((parser, reader)) = self.start.take() {
            match parser.parse_model(reader) {
                Ok(model) => self.results = lower(&model).into_iter(),
                Err(e) => self.error = Some(e),
            }
        }
        if let Some(error) = self.error.take() {
            return Some(Err(error));
        }
        self.results.next().map(Ok)
    }
}

enum FrameKind {
    /// `<rss>`, `<rdf:RDF>`, `<rdf:Seq>`, `<items>`... no model content.
    Structural,
    /// `<skipHours>`/`<skipDays>` and everything below them.
    Ignored,
    Container(FeedItem),
    Block(FeedBlock),
    Field {
        field: FeedField,
        text: String,
        uri_attr: Option<NamedNode>,
        language: Option<String>,
    },
    Unknown,
}

struct Frame {
    kind: FrameKind,
    base: Option<Iri<String>>,
}

struct FeedReader<R> {
    reader: NsReader<R>,
    stack: Vec<Frame>,
    model: FeedModel,
    base: Option<Iri<String>>,
    warning_handler: Option<Box<dyn FnMut(String)>>,
}

impl<R: std::io::BufRead> FeedReader<R> {
    fn parse(mut self) -> Result<FeedModel, FeedParseError> {
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            match self.reader.read_event_into(&mut buffer)? {
                Event::Start(event) => self.parse_start_event(&event)?,
                Event::End(_) => self.parse_end_event(),
                Event::Text(event) => {
                    let text = event.decode()?;
                    self.append_text(&text);
                }
                Event::CData(event) => {
                    let text = self.reader.decoder().decode(event.as_ref())?.into_owned();
                    self.append_text(&text);
                }
                Event::GeneralRef(event) => {
                    let name = self.reader.decoder().decode(event.as_ref())?.into_owned();
                    match resolve_entity(&name) {
                        Some(text) => self.append_text(&text),
                        None => self.warn(format!("Unknown entity '&{name};' is ignored")),
                    }
                }
                Event::Empty(_) => {
                    return Err(FeedSyntaxError::msg(
                        "The expand_empty_elements option must be enabled",
                    )
                    .into());
                }
                Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => (),
                Event::Eof => break,
            }
        }
        Ok(self.model)
    }

    #[allow(clippy::too_many_lines)]
    fn parse_start_event(&mut self, event: &BytesStart<'_>) -> Result<(), FeedParseError> {
        let (ns, local) = self.reader.resolve_element(event.name());
        let namespace = match ns {
            ResolveResult::Bound(ns) => {
                let uri = self.reader.decoder().decode(ns.as_ref())?.into_owned();
                FeedNamespace::from_uri(&uri)
            }
            ResolveResult::Unbound => Some(FeedNamespace::None),
            ResolveResult::Unknown(_) => None,
        };
        let local = self.reader.decoder().decode(local.as_ref())?.into_owned();

        // scoped xml:base, rdf:about, and field attributes
        let parent_base = self
            .stack
            .last()
            .and_then(|f| f.base.clone())
            .or_else(|| self.base.clone());
        let mut base = parent_base.clone();
        let mut about = None;
        let mut attributes = Vec::new();
        for attribute in event.attributes() {
            let attribute = attribute?;
            let value = attribute
                .decode_and_unescape_value_with(self.reader.decoder(), |_| None)?
                .into_owned();
            if attribute.key.as_ref() == b"xml:base" {
                base = Some(match &parent_base {
                    Some(parent) => parent
                        .resolve(&value)
                        .map_err(|e| FeedSyntaxError::msg(e.to_string()))?,
                    None => Iri::parse(value.clone())
                        .map_err(|e| FeedSyntaxError::msg(e.to_string()))?,
                });
                continue;
            }
            let (attr_ns, attr_local) = self.reader.resolve_attribute(attribute.key);
            let attr_ns = match attr_ns {
                ResolveResult::Bound(ns) => FeedNamespace::from_uri(
                    &self.reader.decoder().decode(ns.as_ref())?,
                ),
                ResolveResult::Unbound => Some(FeedNamespace::None),
                ResolveResult::Unknown(_) => None,
            };
            let attr_local = self.reader.decoder().decode(attr_local.as_ref())?.into_owned();
            if attr_ns == Some(FeedNamespace::Rdf) && attr_local == "about" {
                about = Some(self.resolve_iri(&base, &value)?);
            } else {
                attributes.push((attr_ns, attr_local, value));
            }
        }

        if matches!(
            self.stack.last(),
            Some(Frame {
                kind: FrameKind::Ignored | FrameKind::Unknown,
                ..
            })
        ) {
            self.push(FrameKind::Ignored, base);
            return Ok(());
        }

        let in_container = self
            .stack
            .iter()
            .any(|f| matches!(f.kind, FrameKind::Container(_)));

        let kind = match (namespace, local.as_str()) {
            (Some(FeedNamespace::Rdf), "RDF" | "Seq" | "li")
            | (Some(FeedNamespace::None), "rss")
            | (
                Some(
                    FeedNamespace::Rss10
                    | FeedNamespace::Rss09
                    | FeedNamespace::Rss11
                    | FeedNamespace::None,
                ),
                "items",
            ) => FrameKind::Structural,
            (_, "skipHours" | "skipDays") => FrameKind::Ignored,
            (_, "channel") | (Some(FeedNamespace::Atom03 | FeedNamespace::Atom10), "feed") => {
                let mut item = FeedItem::new(FeedNodeKind::Channel);
                if let Some(about) = about {
                    item.subject = about.into();
                }
                FrameKind::Container(item)
            }
            (_, "item") | (Some(FeedNamespace::Atom03 | FeedNamespace::Atom10), "entry") => {
                let mut item = FeedItem::new(FeedNodeKind::Item);
                if let Some(about) = about {
                    item.subject = about.into();
                }
                FrameKind::Container(item)
            }
            (
                Some(
                    FeedNamespace::Rss10
                    | FeedNamespace::Rss09
                    | FeedNamespace::Rss091
                    | FeedNamespace::None,
                )
                | None,
                "image",
            ) if !self.in_field() => {
                let mut item = FeedItem::new(FeedNodeKind::Image);
                if let Some(about) = about {
                    item.subject = about.into();
                }
                FrameKind::Container(item)
            }
            (_, "textinput" | "textInput") => {
                let mut item = FeedItem::new(FeedNodeKind::TextInput);
                if let Some(about) = about {
                    item.subject = about.into();
                }
                FrameKind::Container(item)
            }
            (_, "enclosure") => {
                FrameKind::Block(self.block_from_attributes(FeedNodeKind::Enclosure, attributes)?)
            }
            (_, "category") if in_container => {
                FrameKind::Block(self.block_from_attributes(FeedNodeKind::Category, attributes)?)
            }
            (Some(FeedNamespace::Atom03 | FeedNamespace::Atom10), "author" | "contributor") => {
                FrameKind::Block(FeedBlock {
                    kind: FeedNodeKind::Author,
                    fields: Vec::new(),
                })
            }
            (Some(FeedNamespace::Atom03 | FeedNamespace::Atom10), "link") => {
                FrameKind::Block(self.block_from_attributes(FeedNodeKind::Link, attributes)?)
            }
            (Some(FeedNamespace::Itunes), "owner") => FrameKind::Block(FeedBlock {
                kind: FeedNodeKind::Owner,
                fields: Vec::new(),
            }),
            // dc:source and atom:source stay plain fields
            (
                Some(
                    FeedNamespace::None
                    | FeedNamespace::Rss10
                    | FeedNamespace::Rss09
                    | FeedNamespace::Rss091
                    | FeedNamespace::Rss11,
                ),
                "source",
            ) if in_container => {
                FrameKind::Block(self.block_from_attributes(FeedNodeKind::Source, attributes)?)
            }
            // elements in foreign namespaces never map to the core fields
            _ => match namespace.and_then(|ns| FeedField::from_element(Some(ns), &local)) {
                Some(field) => {
                    // a resource reference may come from an attribute
                    let mut uri_attr = None;
                    let mut language = None;
                    for (attr_ns, attr_local, value) in attributes {
                        match (attr_ns, attr_local.as_str()) {
                            (Some(FeedNamespace::Rdf), "resource")
                            | (Some(FeedNamespace::Atom10 | FeedNamespace::None), "href") => {
                                uri_attr = Some(self.resolve_iri(&base, &value)?);
                            }
                            (_, "lang") => language = Some(value.to_ascii_lowercase()),
                            _ => (),
                        }
                    }
                    FrameKind::Field {
                        field,
                        text: String::new(),
                        uri_attr,
                        language,
                    }
                }
                None => {
                    self.warn(format!("Unknown element '{local}' is ignored"));
                    FrameKind::Unknown
                }
            },
        };
        self.push(kind, base);
        Ok(())
    }

    fn parse_end_event(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame.kind {
            FrameKind::Field {
                field,
                text,
                uri_attr,
                language,
            } => {
                let value = if let Some(uri) = uri_attr {
                    FeedValue::Uri(uri)
                } else if field.is_uri_value() {
                    let text = text.trim().to_owned();
                    match self.resolve_iri(&frame.base, &text) {
                        Ok(uri) => FeedValue::Uri(uri),
                        Err(_) => FeedValue::text(text, language),
                    }
                } else {
                    FeedValue::text(text, language)
                };
                self.attach_field(field, value);
            }
            FrameKind::Block(block) => {
                if let Some(item) = self.innermost_container() {
                    item.blocks.push(block);
                } else {
                    self.warn("A metadata block outside of any container is ignored".to_owned());
                }
            }
            FrameKind::Container(item) => match item.kind {
                FeedNodeKind::Channel => {
                    if self.model.channel.is_none() {
                        self.model.channel = Some(item);
                    }
                }
                FeedNodeKind::Image => {
                    if self.model.image.is_none() {
                        self.model.image = Some(item);
                    }
                }
                FeedNodeKind::TextInput => {
                    if self.model.text_input.is_none() {
                        self.model.text_input = Some(item);
                    }
                }
                _ => self.model.items.push(item),
            },
            FrameKind::Structural | FrameKind::Ignored | FrameKind::Unknown => (),
        }
    }

    fn append_text(&mut self, text: &str) {
        if let Some(Frame {
            kind: FrameKind::Field { text: buffer, .. },
            ..
        }) = self.stack.last_mut()
        {
            buffer.push_str(text);
        } else if let Some(Frame {
            kind: FrameKind::Block(block),
            ..
        }) = self.stack.last_mut()
        {
            // block cdata, e.g. the name of an RSS category
            if !text.trim().is_empty() {
                block
                    .fields
                    .push((FeedField::AtomTerm, FeedValue::text(text.trim(), None)));
            }
        }
    }

    fn block_from_attributes(
        &mut self,
        kind: FeedNodeKind,
        attributes: Vec<(Option<FeedNamespace>, String, String)>,
    ) -> Result<FeedBlock, FeedParseError> {
        let mut fields = Vec::new();
        for (_, local, value) in attributes {
            let field = match (kind, local.as_str()) {
                (FeedNodeKind::Enclosure, "url") => Some((FeedField::EnclosureUrl, true)),
                (FeedNodeKind::Enclosure, "length") => Some((FeedField::Length, false)),
                (FeedNodeKind::Enclosure, "type") => Some((FeedField::Type, false)),
                (FeedNodeKind::Category, "term") => Some((FeedField::AtomTerm, false)),
                (FeedNodeKind::Category, "label") => Some((FeedField::AtomLabel, false)),
                (FeedNodeKind::Category, "scheme" | "domain") => {
                    Some((FeedField::AtomScheme, true))
                }
                (FeedNodeKind::Link, "href") => Some((FeedField::AtomHref, true)),
                (FeedNodeKind::Link, "rel") => Some((FeedField::AtomRel, false)),
                (FeedNodeKind::Link, "type") => Some((FeedField::AtomType, false)),
                (FeedNodeKind::Link, "hreflang") => Some((FeedField::AtomHrefLang, false)),
                (FeedNodeKind::Link, "length") => Some((FeedField::AtomLength, false)),
                (FeedNodeKind::Link, "title") => Some((FeedField::AtomLabel, false)),
                (FeedNodeKind::Source, "url") => Some((FeedField::Url, true)),
                _ => None,
            };
            if let Some((field, is_uri)) = field {
                let value = if is_uri {
                    match self.resolve_iri(&None, &value) {
                        Ok(uri) => FeedValue::Uri(uri),
                        Err(_) => FeedValue::text(value, None),
                    }
                } else {
                    FeedValue::text(value, None)
                };
                fields.push((field, value));
            }
        }
        Ok(FeedBlock { kind, fields })
    }

    fn attach_field(&mut self, field: FeedField, value: FeedValue) {
        for frame in self.stack.iter_mut().rev() {
            match &mut frame.kind {
                FrameKind::Block(block) => {
                    block.fields.push((field, value));
                    return;
                }
                FrameKind::Container(item) => {
                    item.fields.push((field, value));
                    return;
                }
                _ => (),
            }
        }
        self.warn(format!(
            "Field '{}' outside of any container is ignored",
            field.local_name()
        ));
    }

    fn innermost_container(&mut self) -> Option<&mut FeedItem> {
        self.stack.iter_mut().rev().find_map(|f| {
            if let FrameKind::Container(item) = &mut f.kind {
                Some(item)
            } else {
                None
            }
        })
    }

    fn in_field(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Frame {
                kind: FrameKind::Field { .. },
                ..
            })
        )
    }

    fn push(&mut self, kind: FrameKind, base: Option<Iri<String>>) {
        self.stack.push(Frame { kind, base });
    }

    fn resolve_iri(
        &self,
        base: &Option<Iri<String>>,
        value: &str,
    ) -> Result<NamedNode, FeedParseError> {
        Ok(NamedNode::new_unchecked(match base {
            Some(base) => base
                .resolve(value)
                .map_err(|e| FeedSyntaxError::msg(e.to_string()))?
                .into_inner(),
            None => Iri::parse(value.to_owned())
                .map_err(|e| FeedSyntaxError::msg(e.to_string()))?
                .into_inner(),
        }))
    }

    fn warn(&mut self, message: String) {
        if let Some(handler) = &mut self.warning_handler {
            handler(message);
        }
    }
}

/// Resolves the predefined XML entities and character references; feeds
/// cannot define custom ones.
fn resolve_entity(name: &str) -> Option<String> {
    Some(match name {
        "amp" => "&".to_owned(),
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "quot" => "\"".to_owned(),
        "apos" => "'".to_owned(),
        _ => {
            let code_point = name.strip_prefix('#')?;
            let value = if let Some(hex) = code_point.strip_prefix('x') {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                code_point.parse().ok()?
            };
            char::from_u32(value)?.to_string()
        }
    })
}

/// The post-ingestion pass: ISO 8601 dates and Atom → RSS field mirroring.
fn uplift(model: &mut FeedModel) {
    for item in model_items_mut(model) {
        for (field, value) in &mut item.fields {
            if field.is_date_value() {
                if let FeedValue::Text { value, .. } = value {
                    if let Some(normalized) = normalize_date(value) {
                        *value = normalized;
                    }
                }
            }
        }
        for (from, to) in ATOM_TO_RSS {
            if item.has_field(from) && !item.has_field(to) {
                let copies: Vec<FeedValue> = item.values(from).cloned().collect();
                for value in copies {
                    if to == FeedField::Link && !matches!(value, FeedValue::Uri(_)) {
                        continue;
                    }
                    item.fields.push((to, value));
                }
            }
        }
        // dialects without rdf:about identify nodes by their guid or link
        if matches!(item.subject, NamedOrBlankNode::BlankNode(_)) {
            let identifier = item
                .values(FeedField::Guid)
                .chain(item.values(FeedField::Link))
                .find_map(|value| {
                    if let FeedValue::Uri(uri) = value {
                        Some(uri.clone())
                    } else {
                        None
                    }
                });
            if let Some(identifier) = identifier {
                item.subject = identifier.into();
            }
        }
    }
}

fn model_items_mut(model: &mut FeedModel) -> impl Iterator<Item = &mut FeedItem> {
    model
        .channel
        .iter_mut()
        .chain(model.image.iter_mut())
        .chain(model.text_input.iter_mut())
        .chain(model.items.iter_mut())
}

/// Rewrites an RFC 2822 date to RFC 3339; RFC 3339 input is passed through
/// unchanged, anything unparseable is kept as-is.
fn normalize_date(value: &str) -> Option<String> {
    let value = value.trim();
    if OffsetDateTime::parse(value, &Rfc3339).is_ok() {
        return None;
    }
    let parsed = OffsetDateTime::parse(value, &Rfc2822).ok()?;
    parsed.format(&Rfc3339).ok()
}

/// Lowers the typed-node model to RDF triples.
pub(crate) fn lower(model: &FeedModel) -> Vec<Triple> {
    let mut results = Vec::new();
    let Some(channel) = &model.channel else {
        return results;
    };
    lower_item(channel, &mut results);
    if let Some(image) = &model.image {
        results.push(Triple::new(
            channel.subject.clone(),
            FeedField::Image.uri(),
            Term::from(image.subject.clone()),
        ));
    }
    if let Some(text_input) = &model.text_input {
        results.push(Triple::new(
            channel.subject.clone(),
            FeedField::TextInput.uri(),
            Term::from(text_input.subject.clone()),
        ));
    }
    if !model.items.is_empty() {
        let seq = BlankNode::default();
        results.push(Triple::new(
            channel.subject.clone(),
            FeedField::Items.uri(),
            seq.clone(),
        ));
        results.push(Triple::new(seq.clone(), rdf::TYPE, rdf::SEQ));
        for (i, item) in model.items.iter().enumerate() {
            results.push(Triple::new(
                seq.clone(),
                rdf::member(i as u64 + 1),
                Term::from(item.subject.clone()),
            ));
        }
    }
    if let Some(image) = &model.image {
        lower_item(image, &mut results);
    }
    if let Some(text_input) = &model.text_input {
        lower_item(text_input, &mut results);
    }
    for item in &model.items {
        lower_item(item, &mut results);
    }
    results
}

fn lower_item(item: &FeedItem, results: &mut Vec<Triple>) {
    results.push(Triple::new(
        item.subject.clone(),
        rdf::TYPE,
        item.kind.class_uri(),
    ));
    for (field, value) in &item.fields {
        results.push(Triple::new(
            item.subject.clone(),
            field.uri(),
            lower_value(value),
        ));
    }
    for block in &item.blocks {
        let node = BlankNode::default();
        if let Some(predicate) = block.kind.block_predicate() {
            results.push(Triple::new(
                item.subject.clone(),
                predicate.uri(),
                node.clone(),
            ));
        }
        results.push(Triple::new(node.clone(), rdf::TYPE, block.kind.class_uri()));
        for (field, value) in &block.fields {
            results.push(Triple::new(node.clone(), field.uri(), lower_value(value)));
        }
    }
    results.extend_from_slice(&item.extra_triples);
}

fn lower_value(value: &FeedValue) -> Term {
    match value {
        FeedValue::Uri(uri) => uri.clone().into(),
        FeedValue::Text { value, language } => match language {
            Some(language) => {
                Literal::new_language_tagged_literal_unchecked(value.clone(), language.clone())
                    .into()
            }
            None => Literal::new_simple_literal(value.clone()).into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triples(file: &str) -> Vec<Triple> {
        FeedParser::new()
            .for_reader(file.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn rss20_channel_and_items() {
        let results = triples(
            r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Feed</title>
  <link>http://example.com/</link>
  <description>About</description>
  <pubDate>Tue, 10 Jun 2003 04:00:00 GMT</pubDate>
  <item><title>One</title><link>http://example.com/1</link></item>
  <item><title>Two</title><link>http://example.com/2</link></item>
</channel></rss>"#,
        );
        let channel_type = results
            .iter()
            .find(|t| {
                t.predicate == rdf::TYPE
                    && t.object.to_string() == "<http://purl.org/rss/1.0/channel>"
            })
            .expect("channel type triple");
        // the items list is an rdf:Seq hanging off the channel
        let items = results
            .iter()
            .find(|t| t.predicate.as_str() == "http://purl.org/rss/1.0/items")
            .expect("items triple");
        assert_eq!(items.subject, channel_type.subject);
        assert!(results
            .iter()
            .any(|t| t.predicate.as_str() == "http://www.w3.org/1999/02/22-rdf-syntax-ns#_2"));
        // the RFC 2822 date was uplifted to ISO 8601
        assert!(results.iter().any(|t| {
            t.predicate.as_str() == "http://purl.org/rss/1.0/modules/rss091#pubDate"
                && t.object.to_string().contains("2003-06-10T04:00:00Z")
        }));
    }

    #[test]
    fn rss10_about_identifies_nodes() {
        let results = triples(
            r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns="http://purl.org/rss/1.0/">
  <channel rdf:about="http://example.com/feed">
    <title>Feed</title>
    <items><rdf:Seq><rdf:li rdf:resource="http://example.com/1"/></rdf:Seq></items>
  </channel>
  <item rdf:about="http://example.com/1"><title>One</title></item>
</rdf:RDF>"#,
        );
        assert!(results
            .iter()
            .any(|t| t.subject.to_string() == "<http://example.com/feed>"));
        assert!(results
            .iter()
            .any(|t| t.subject.to_string() == "<http://example.com/1>"));
    }

    #[test]
    fn atom_feed_is_unified() {
        let results = triples(
            r#"<?xml version="1.0"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom feed</title>
  <updated>2003-12-13T18:30:02Z</updated>
  <entry>
    <title>Entry</title>
    <link href="http://example.com/1"/>
    <summary>Hello</summary>
  </entry>
</feed>"#,
        );
        // atom:title is mirrored to rss:title by the uplift pass
        assert!(results.iter().any(|t| {
            t.predicate.as_str() == "http://purl.org/rss/1.0/title"
                && t.object.to_string() == "\"Atom feed\""
        }));
        // the atom link is a typed block node
        assert!(results
            .iter()
            .any(|t| t.object.to_string() == "<http://www.w3.org/2005/Atom#Link>"));
    }

    #[test]
    fn enclosures_become_blocks() {
        let results = triples(
            r#"<rss version="2.0"><channel><title>F</title>
<item>
  <title>With media</title>
  <enclosure url="http://example.com/a.mp3" length="1234" type="audio/mpeg"/>
</item>
</channel></rss>"#,
        );
        let enclosure_link = results
            .iter()
            .find(|t| t.predicate.as_str() == "http://purl.oclc.org/net/rss_2.0/enc#enclosure")
            .expect("enclosure link triple");
        assert!(enclosure_link.object.is_blank_node());
        assert!(results.iter().any(|t| {
            t.predicate.as_str() == "http://purl.oclc.org/net/rss_2.0/enc#url"
                && t.object.to_string() == "<http://example.com/a.mp3>"
        }));
        assert!(results.iter().any(|t| {
            t.predicate.as_str() == "http://purl.oclc.org/net/rss_2.0/enc#length"
                && t.object.to_string() == "\"1234\""
        }));
    }

    #[test]
    fn unknown_elements_are_warned_about() {
        use std::cell::RefCell;
        use std::rc::Rc;
        let warnings = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&warnings);
        let _ = FeedParser::new()
            .with_warning_handler(move |w| sink.borrow_mut().push(w))
            .for_reader(
                r#"<rss version="2.0"><channel><title>F</title><frobnicate>x</frobnicate></channel></rss>"#
                    .as_bytes(),
            )
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(warnings.borrow().len(), 1);
        assert!(warnings.borrow()[0].contains("frobnicate"));
    }
}
