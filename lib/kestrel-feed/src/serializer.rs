use crate::model::FeedNamespace;
use kestrel_model::vocab::rdf;
use kestrel_model::{NamedOrBlankNode, NamedOrBlankNodeRef, Term, TermRef, Triple, TripleRef};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::HashMap;
use std::io;
use std::io::Write;

const RSS_CHANNEL_CLASS: &str = "http://purl.org/rss/1.0/channel";
const RSS_IMAGE_CLASS: &str = "http://purl.org/rss/1.0/image";
const RSS_TEXTINPUT_CLASS: &str = "http://purl.org/rss/1.0/textinput";
const RSS_ITEMS: &str = "http://purl.org/rss/1.0/items";
const RSS_IMAGE: &str = "http://purl.org/rss/1.0/image";
const RSS_TEXTINPUT: &str = "http://purl.org/rss/1.0/textinput";

/// An [RSS 1.0](https://web.resource.org/rss/1.0/spec) serializer.
///
/// The statement stream is reassembled into the channel / items structure:
/// the subject typed `rss:channel` becomes the `<channel>` element, the
/// members of its `rss:items` sequence become `<item>` elements, and the
/// remaining subjects are written as plain RDF descriptions.
///
/// Since the whole graph is needed to find the channel, the triples are
/// buffered and only written by [`WriterRss10Serializer::finish`].
#[derive(Default, Clone)]
#[must_use]
pub struct Rss10Serializer;

impl Rss10Serializer {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Serializes an RSS 1.0 document to a [`Write`] implementation.
    #[allow(clippy::unused_self)]
    pub fn for_writer<W: Write>(self, writer: W) -> WriterRss10Serializer<W> {
        WriterRss10Serializer {
            writer,
            triples: Vec::new(),
        }
    }
}

/// Serializes an RSS 1.0 document to a [`Write`] implementation.
///
/// Can be built using [`Rss10Serializer::for_writer`].
#[must_use]
pub struct WriterRss10Serializer<W: Write> {
    writer: W,
    triples: Vec<Triple>,
}

impl<W: Write> WriterRss10Serializer<W> {
    /// Buffers an extra triple.
    pub fn serialize_triple<'a>(&mut self, t: impl Into<TripleRef<'a>>) -> io::Result<()> {
        self.triples.push(t.into().into_owned());
        Ok(())
    }

    /// Writes the document and returns the underlying [`Write`].
    pub fn finish(mut self) -> io::Result<W> {
        let mut writer = Writer::new_with_indent(&mut self.writer, b'\t', 1);

        // triples grouped by subject, in first-seen order
        let mut order: Vec<NamedOrBlankNode> = Vec::new();
        let mut by_subject: HashMap<String, Vec<&Triple>> = HashMap::new();
        for triple in &self.triples {
            let key = triple.subject.to_string();
            by_subject.entry(key).or_insert_with(|| {
                order.push(triple.subject.clone());
                Vec::new()
            });
            by_subject
                .get_mut(&triple.subject.to_string())
                .expect("just inserted")
                .push(triple);
        }

        let type_of = |triples: &[&Triple]| -> Option<String> {
            triples.iter().find_map(|t| {
                if t.predicate == rdf::TYPE {
                    if let Term::NamedNode(class) = &t.object {
                        return Some(class.as_str().to_owned());
                    }
                }
                None
            })
        };

        let channel = order.iter().find(|subject| {
            by_subject
                .get(&subject.to_string())
                .is_some_and(|ts| type_of(ts).as_deref() == Some(RSS_CHANNEL_CLASS))
        });

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut rdf_open = BytesStart::new("rdf:RDF");
        rdf_open.push_attribute(("xmlns", FeedNamespace::Rss10.uri()));
        rdf_open.push_attribute(("xmlns:rdf", FeedNamespace::Rdf.uri()));
        rdf_open.push_attribute(("xmlns:dc", FeedNamespace::DublinCore.uri()));
        rdf_open.push_attribute(("xmlns:content", FeedNamespace::Content.uri()));
        rdf_open.push_attribute(("xmlns:enc", FeedNamespace::Rss20Enclosure.uri()));
        rdf_open.push_attribute(("xmlns:rss091", FeedNamespace::Rss091.uri()));
        writer.write_event(Event::Start(rdf_open))?;

        let mut written = Vec::new();
        let mut item_order = Vec::new();
        if let Some(channel) = channel {
            let triples = &by_subject[&channel.to_string()];
            item_order = items_in_sequence_order(triples, &by_subject);
            Self::write_node(
                &mut writer,
                "channel",
                channel.as_ref(),
                triples,
                Some(&item_order),
                |t| {
                    // the items sequence gets its dedicated markup
                    t.predicate.as_str() != RSS_ITEMS
                },
            )?;
            written.push(channel.to_string());
            if let Some(seq) = sequence_subject(triples) {
                written.push(seq.to_string());
            }

            // the image and textinput nodes referenced from the channel
            for (predicate, tag, class) in [
                (RSS_IMAGE, "image", RSS_IMAGE_CLASS),
                (RSS_TEXTINPUT, "textinput", RSS_TEXTINPUT_CLASS),
            ] {
                for t in triples.iter().filter(|t| t.predicate.as_str() == predicate) {
                    if let Ok(node) = NamedOrBlankNode::try_from(t.object.clone()) {
                        if let Some(node_triples) = by_subject.get(&node.to_string()) {
                            if type_of(node_triples).as_deref() == Some(class) {
                                Self::write_node(
                                    &mut writer,
                                    tag,
                                    node.as_ref(),
                                    node_triples,
                                    None,
                                    |_| true,
                                )?;
                                written.push(node.to_string());
                            }
                        }
                    }
                }
            }

            for item in &item_order {
                if let Some(item_triples) = by_subject.get(&item.to_string()) {
                    Self::write_node(
                        &mut writer,
                        "item",
                        item.as_ref(),
                        item_triples,
                        None,
                        |_| true,
                    )?;
                    written.push(item.to_string());
                }
            }
        }

        // whatever is left (metadata blocks, unknown subjects)
        for subject in &order {
            let key = subject.to_string();
            if written.contains(&key) {
                continue;
            }
            let triples = &by_subject[&key];
            Self::write_node(
                &mut writer,
                "rdf:Description",
                subject.as_ref(),
                triples,
                None,
                |_| true,
            )?;
        }

        writer.write_event(Event::End(BytesEnd::new("rdf:RDF")))?;
        drop(writer);
        Ok(self.writer)
    }

    fn write_node<W2: Write>(
        writer: &mut Writer<W2>,
        tag: &str,
        subject: NamedOrBlankNodeRef<'_>,
        triples: &[&Triple],
        items_seq: Option<&[NamedOrBlankNode]>,
        keep: impl Fn(&Triple) -> bool,
    ) -> io::Result<()> {
        let mut open = BytesStart::new(tag);
        match subject {
            NamedOrBlankNodeRef::NamedNode(node) => {
                open.push_attribute(("rdf:about", node.as_str()));
            }
            NamedOrBlankNodeRef::BlankNode(node) => {
                open.push_attribute(("rdf:nodeID", node.as_str()));
            }
        }
        writer.write_event(Event::Start(open))?;

        for triple in triples {
            if triple.predicate == rdf::TYPE && tag != "rdf:Description" {
                continue; // implied by the element name
            }
            if !keep(triple) {
                continue;
            }
            let Some(qname) = predicate_qname(triple.predicate.as_str()) else {
                continue; // not expressible with the declared namespaces
            };
            let mut property = BytesStart::new(&*qname);
            match triple.object.as_ref() {
                TermRef::NamedNode(node) => {
                    property.push_attribute(("rdf:resource", node.as_str()));
                    writer.write_event(Event::Empty(property))?;
                }
                TermRef::BlankNode(node) => {
                    property.push_attribute(("rdf:nodeID", node.as_str()));
                    writer.write_event(Event::Empty(property))?;
                }
                TermRef::Literal(literal) => {
                    if let Some(language) = literal.language() {
                        property.push_attribute(("xml:lang", language));
                    }
                    writer.write_event(Event::Start(property))?;
                    writer.write_event(Event::Text(BytesText::new(literal.value())))?;
                    writer.write_event(Event::End(BytesEnd::new(&*qname)))?;
                }
            }
        }

        // the items sequence of the channel
        if let Some(members) = items_seq {
            if !members.is_empty() {
                writer.write_event(Event::Start(BytesStart::new("items")))?;
                writer.write_event(Event::Start(BytesStart::new("rdf:Seq")))?;
                for member in members {
                    let mut li = BytesStart::new("rdf:li");
                    match member.as_ref() {
                        NamedOrBlankNodeRef::NamedNode(node) => {
                            li.push_attribute(("rdf:resource", node.as_str()));
                        }
                        NamedOrBlankNodeRef::BlankNode(node) => {
                            li.push_attribute(("rdf:nodeID", node.as_str()));
                        }
                    }
                    writer.write_event(Event::Empty(li))?;
                }
                writer.write_event(Event::End(BytesEnd::new("rdf:Seq")))?;
                writer.write_event(Event::End(BytesEnd::new("items")))?;
            }
        }

        writer.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }
}

/// The members of the channel items sequence, in `rdf:_n` order.
fn items_in_sequence_order(
    channel_triples: &[&Triple],
    by_subject: &HashMap<String, Vec<&Triple>>,
) -> Vec<NamedOrBlankNode> {
    let Some(seq) = channel_triples
        .iter()
        .find(|t| t.predicate.as_str() == RSS_ITEMS)
        .and_then(|t| NamedOrBlankNode::try_from(t.object.clone()).ok())
    else {
        return Vec::new();
    };
    let Some(seq_triples) = by_subject.get(&seq.to_string()) else {
        return Vec::new();
    };
    let mut members: Vec<(u64, NamedOrBlankNode)> = seq_triples
        .iter()
        .filter_map(|t| {
            let n = t
                .predicate
                .as_str()
                .strip_prefix("http://www.w3.org/1999/02/22-rdf-syntax-ns#_")?
                .parse()
                .ok()?;
            Some((n, NamedOrBlankNode::try_from(t.object.clone()).ok()?))
        })
        .collect();
    members.sort_by_key(|(n, _)| *n);
    members.into_iter().map(|(_, m)| m).collect()
}

/// The node holding the channel items sequence, if any.
fn sequence_subject(channel_triples: &[&Triple]) -> Option<NamedOrBlankNode> {
    channel_triples
        .iter()
        .find(|t| t.predicate.as_str() == RSS_ITEMS)
        .and_then(|t| NamedOrBlankNode::try_from(t.object.clone()).ok())
}

fn predicate_qname(predicate: &str) -> Option<String> {
    for namespace in [
        FeedNamespace::Rss10,
        FeedNamespace::Rss091,
        FeedNamespace::DublinCore,
        FeedNamespace::Content,
        FeedNamespace::Rss20Enclosure,
    ] {
        if let Some(local) = predicate.strip_prefix(namespace.predicate_base()) {
            if local.is_empty() || local.contains('/') || local.contains('#') {
                continue;
            }
            return Some(if namespace.prefix().is_empty() {
                local.to_owned()
            } else {
                format!("{}:{local}", namespace.prefix())
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::FeedParser;

    #[test]
    fn rewrites_a_feed_as_rss10() {
        let feed = br#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>News</title>
  <link>http://example.com/</link>
  <description>About</description>
  <item><title>One</title><link>http://example.com/1</link></item>
  <item><title>Two</title><link>http://example.com/2</link></item>
</channel></rss>"#;
        let triples = FeedParser::new()
            .for_reader(feed.as_ref())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        let mut serializer = Rss10Serializer::new().for_writer(Vec::new());
        for t in &triples {
            serializer.serialize_triple(t.as_ref()).unwrap();
        }
        let out = String::from_utf8(serializer.finish().unwrap()).unwrap();

        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(out.contains("<channel rdf:about=\"http://example.com/\">"));
        assert!(out.contains("<title>News</title>"));
        assert!(out.contains("<rdf:Seq>"));
        assert!(out.contains("<rdf:li rdf:resource=\"http://example.com/1\"/>"));
        assert!(out.contains("<item rdf:about=\"http://example.com/2\">"));

        // the output is itself a well-formed feed
        let reparsed = FeedParser::new()
            .for_reader(out.as_bytes())
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert!(reparsed.iter().any(|t| {
            t.predicate.as_str() == "http://purl.org/rss/1.0/title"
                && t.object.to_string() == "\"News\""
        }));
    }
}
