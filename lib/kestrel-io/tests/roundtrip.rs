use kestrel_io::{GuessParser, RdfParser, RdfSerializer, RdfSyntax};
use kestrel_model::{BlankNode, Literal, NamedNode, Quad, Triple};
use std::collections::HashSet;
use std::fs;
use std::io::Write;

fn sample_triples() -> Vec<Triple> {
    vec![
        Triple::new(
            NamedNode::new_unchecked("http://example.com/s"),
            NamedNode::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
            NamedNode::new_unchecked("http://example.com/Class"),
        ),
        Triple::new(
            NamedNode::new_unchecked("http://example.com/s"),
            NamedNode::new_unchecked("http://example.com/name"),
            Literal::new_language_tagged_literal_unchecked("émile", "fr"),
        ),
        Triple::new(
            BlankNode::new_unchecked("b0"),
            NamedNode::new_unchecked("http://example.com/value"),
            Literal::new_typed_literal(
                "12",
                NamedNode::new_unchecked("http://www.w3.org/2001/XMLSchema#integer"),
            ),
        ),
    ]
}

/// Statements compared as a multiset, with blank node identity erased.
fn fingerprint(quads: &[Quad]) -> HashSet<String> {
    quads
        .iter()
        .map(|q| {
            let mut s = q.to_string();
            for (i, token) in s
                .clone()
                .split_whitespace()
                .filter(|t| t.starts_with("_:"))
                .enumerate()
            {
                s = s.replace(token, &format!("_:bn{i}"));
            }
            s
        })
        .collect()
}

#[test]
fn round_trip_through_every_rdf_syntax() {
    let triples = sample_triples();
    for syntax in [
        RdfSyntax::NTriples,
        RdfSyntax::Turtle,
        RdfSyntax::TriG,
        RdfSyntax::RdfXml,
    ] {
        let mut serializer = RdfSerializer::from_syntax(syntax).for_writer(Vec::new());
        for t in &triples {
            serializer.serialize_triple(t.as_ref()).unwrap();
        }
        let bytes = serializer.finish().unwrap();
        let parsed = RdfParser::from_syntax(syntax)
            .for_slice(&bytes)
            .collect::<Result<Vec<_>, _>>()
            .unwrap_or_else(|e| panic!("parsing back {syntax} failed: {e}"));
        let original: Vec<Quad> = triples.iter().cloned().map(Quad::from).collect();
        assert_eq!(
            fingerprint(&parsed),
            fingerprint(&original),
            "round trip through {syntax}"
        );
    }
}

#[test]
fn guess_parser_dispatches_serialized_outputs() {
    let triples = sample_triples();
    for syntax in [RdfSyntax::NTriples, RdfSyntax::Turtle, RdfSyntax::RdfXml] {
        let mut serializer = RdfSerializer::from_syntax(syntax)
            .with_prefix("ex", "http://example.com/")
            .unwrap()
            .for_writer(Vec::new());
        for t in &triples {
            serializer.serialize_triple(t.as_ref()).unwrap();
        }
        let bytes = serializer.finish().unwrap();
        let mut parser = GuessParser::new().for_reader(bytes.as_slice());
        let parsed = (&mut parser).collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(parsed.len(), triples.len(), "guessed from {syntax} output");
    }
}

#[test]
fn parse_from_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.ttl");
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(b"@prefix ex: <http://example.com/> . ex:s ex:p ex:o .")
        .unwrap();
    drop(file);

    let quads = RdfParser::from_syntax(RdfSyntax::Turtle)
        .for_reader(fs::File::open(&path).unwrap())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(quads.len(), 1);

    // and through the guess parser, using the suffix as a hint
    let mut parser = GuessParser::new()
        .with_file_name(path.to_string_lossy())
        .for_reader(fs::File::open(&path).unwrap());
    let quads = (&mut parser).collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(parser.syntax(), Some(RdfSyntax::Turtle));
    assert_eq!(quads.len(), 1);
}

#[test]
fn feed_to_turtle_conversion() {
    let feed = br#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>News</title>
  <link>http://example.com/</link>
  <item><title>One</title><link>http://example.com/1</link></item>
</channel></rss>"#;
    let quads = RdfParser::from_syntax(RdfSyntax::Rss)
        .for_slice(feed)
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert!(!quads.is_empty());

    let mut serializer = RdfSerializer::from_syntax(RdfSyntax::Turtle).for_writer(Vec::new());
    for quad in &quads {
        serializer.serialize_quad(quad.as_ref()).unwrap();
    }
    let out = String::from_utf8(serializer.finish().unwrap()).unwrap();
    assert!(out.contains("<http://purl.org/rss/1.0/title> \"News\""));
}
