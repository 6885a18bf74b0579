use kestrel_model::vocab::rdf;
use kestrel_model::{NamedNode, Term, Triple};
use kestrel_rdfxml::RdfXmlParser;
use std::cell::RefCell;
use std::rc::Rc;

fn parse(file: &str) -> Vec<Triple> {
    RdfXmlParser::new()
        .for_reader(file.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

#[test]
fn default_namespaced_property() {
    let triples = parse(
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"><rdf:Description rdf:about="http://ex/s"><p xmlns="http://ex/">o</p></rdf:Description></rdf:RDF>"#,
    );
    assert_eq!(triples.len(), 1);
    assert_eq!(
        triples[0].to_string(),
        "<http://ex/s> <http://ex/p> \"o\""
    );
}

#[test]
fn typed_node_and_property_attributes() {
    let triples = parse(
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex/">
  <ex:Person rdf:about="http://ex/alice" ex:name="Alice"/>
</rdf:RDF>"#,
    );
    assert_eq!(triples.len(), 2);
    // the rdf:type triple must come before the property attribute triples
    assert_eq!(triples[0].predicate, rdf::TYPE);
    assert_eq!(triples[1].object.to_string(), "\"Alice\"");
}

#[test]
fn rdf_id_resolution_and_duplicates() {
    let file = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex/">
  <rdf:Description rdf:ID="x"><ex:p>1</ex:p></rdf:Description>
  <rdf:Description rdf:ID="x"><ex:p>2</ex:p></rdf:Description>
</rdf:RDF>"#;
    let mut triples = Vec::new();
    let mut errors = 0;
    for result in RdfXmlParser::new()
        .with_base_iri("http://host/doc")
        .unwrap()
        .for_reader(file.as_bytes())
    {
        match result {
            Ok(t) => triples.push(t),
            Err(_) => errors += 1,
        }
    }
    // the second rdf:ID="x" is an error but parsing continues
    assert_eq!(errors, 1);
    assert_eq!(triples.len(), 2);
    assert_eq!(triples[0].subject.to_string(), "<http://host/doc#x>");
    assert_eq!(triples[1].subject.to_string(), "<http://host/doc#x>");
}

#[test]
fn li_expansion_is_gapless() {
    let triples = parse(
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
  <rdf:Seq rdf:about="http://ex/seq">
    <rdf:li>a</rdf:li>
    <rdf:li>b</rdf:li>
    <rdf:li>c</rdf:li>
  </rdf:Seq>
</rdf:RDF>"#,
    );
    let members: Vec<_> = triples
        .iter()
        .filter(|t| t.predicate != rdf::TYPE)
        .collect();
    assert_eq!(members.len(), 3);
    for (i, t) in members.iter().enumerate() {
        assert_eq!(
            t.predicate.as_str(),
            format!(
                "http://www.w3.org/1999/02/22-rdf-syntax-ns#_{}",
                i + 1
            )
        );
    }
}

#[test]
fn parse_type_collection_lowering() {
    let triples = parse(
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex/">
  <rdf:Description rdf:about="http://ex/s">
    <ex:p rdf:parseType="Collection">
      <rdf:Description rdf:about="http://ex/a"/>
      <rdf:Description rdf:about="http://ex/b"/>
      <rdf:Description rdf:about="http://ex/c"/>
    </ex:p>
  </rdf:Description>
</rdf:RDF>"#,
    );
    // 3 rdf:first + 3 rdf:rest (the last one to rdf:nil) + the linking triple
    assert_eq!(triples.len(), 7);
    assert_eq!(
        triples.iter().filter(|t| t.predicate == rdf::FIRST).count(),
        3
    );
    assert_eq!(
        triples.iter().filter(|t| t.predicate == rdf::REST).count(),
        3
    );
    assert_eq!(
        triples
            .iter()
            .filter(|t| t.object == Term::from(rdf::NIL.into_owned()))
            .count(),
        1
    );
    let link = triples.last().unwrap();
    assert_eq!(link.subject.to_string(), "<http://ex/s>");
    assert_eq!(link.predicate.as_str(), "http://ex/p");
}

#[test]
fn parse_type_collection_with_rdf_list_types() {
    let file = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex/">
  <rdf:Description rdf:about="http://ex/s">
    <ex:p rdf:parseType="Collection">
      <rdf:Description rdf:about="http://ex/a"/>
    </ex:p>
  </rdf:Description>
</rdf:RDF>"#;
    let triples = RdfXmlParser::new()
        .allow_rdf_type_rdf_list()
        .for_reader(file.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert!(triples
        .iter()
        .any(|t| t.predicate == rdf::TYPE && t.object == Term::from(rdf::LIST.into_owned())));
}

#[test]
fn reification_on_property_element() {
    // rdf:ID resolves against the base, so one is required
    let file = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex/">
  <rdf:Description rdf:about="http://ex/s">
    <ex:p rdf:ID="st">o</ex:p>
  </rdf:Description>
</rdf:RDF>"#;
    let triples = RdfXmlParser::new()
        .with_base_iri("http://host/doc")
        .unwrap()
        .for_reader(file.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(triples.len(), 5);
    assert_eq!(triples[1].subject.to_string(), "<http://host/doc#st>");
    assert_eq!(triples[0].to_string(), "<http://ex/s> <http://ex/p> \"o\"");
    assert_eq!(triples[1].predicate, rdf::TYPE);
    assert_eq!(
        triples[1].object,
        Term::from(rdf::STATEMENT.into_owned())
    );
    assert_eq!(triples[2].predicate, rdf::SUBJECT);
    assert_eq!(triples[3].predicate, rdf::PREDICATE);
    assert_eq!(triples[4].predicate, rdf::OBJECT);
}

#[test]
fn parse_type_literal_keeps_markup() {
    let triples = parse(
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex/">
  <rdf:Description rdf:about="http://ex/s">
    <ex:p rdf:parseType="Literal"><b>bold</b> move</ex:p>
  </rdf:Description>
</rdf:RDF>"#,
    );
    assert_eq!(triples.len(), 1);
    let Term::Literal(literal) = &triples[0].object else {
        panic!("expected a literal");
    };
    assert_eq!(literal.value(), "<b>bold</b> move");
    assert_eq!(literal.datatype(), rdf::XML_LITERAL);
}

#[test]
fn parse_type_resource_creates_anonymous_node() {
    let triples = parse(
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex/">
  <rdf:Description rdf:about="http://ex/s">
    <ex:p rdf:parseType="Resource"><ex:q>v</ex:q></ex:p>
  </rdf:Description>
</rdf:RDF>"#,
    );
    assert_eq!(triples.len(), 2);
    assert!(triples[0].object.is_blank_node());
    assert_eq!(triples[1].subject.to_string(), triples[0].object.to_string());
}

#[test]
fn unknown_parse_type_is_skipped_with_a_warning() {
    let warnings = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&warnings);
    let file = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex/">
  <rdf:Description rdf:about="http://ex/s">
    <ex:p rdf:parseType="Strange">ignored</ex:p>
  </rdf:Description>
</rdf:RDF>"#;
    let triples = RdfXmlParser::new()
        .with_warning_handler(move |w| sink.borrow_mut().push(w))
        .for_reader(file.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert!(triples.is_empty());
    assert_eq!(warnings.borrow().len(), 1);
}

#[test]
fn bag_id_is_an_error_by_default() {
    let file = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex/">
  <rdf:Description rdf:about="http://ex/s" rdf:bagID="b"><ex:p>o</ex:p></rdf:Description>
</rdf:RDF>"#;
    assert!(RdfXmlParser::new()
        .for_reader(file.as_bytes())
        .any(|r| r.is_err()));
    // with the opt-in the construct is only warned about and ignored
    let warnings = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&warnings);
    let triples = RdfXmlParser::new()
        .allow_bag_id()
        .with_warning_handler(move |w| sink.borrow_mut().push(w))
        .for_reader(file.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(triples.len(), 1);
    assert_eq!(warnings.borrow().len(), 1);
}

#[test]
fn forbidden_terms_are_rejected() {
    for file in [
        // rdf:li as a node element
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"><rdf:li/></rdf:RDF>"#,
        // rdf:Description as a property element
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"><rdf:Description rdf:about="http://ex/s"><rdf:Description>o</rdf:Description></rdf:Description></rdf:RDF>"#,
        // rdf:aboutEach attribute
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"><rdf:Description rdf:aboutEach="http://ex/s"/></rdf:RDF>"#,
    ] {
        assert!(
            RdfXmlParser::new()
                .for_reader(file.as_bytes())
                .any(|r| r.is_err()),
            "{file} should be rejected"
        );
    }
}

#[test]
fn multiple_subject_attributes_are_rejected() {
    let file = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"><rdf:Description rdf:about="http://ex/s" rdf:nodeID="n"/></rdf:RDF>"#;
    assert!(RdfXmlParser::new()
        .for_reader(file.as_bytes())
        .any(|r| r.is_err()));
}

#[test]
fn xml_base_is_scoped_per_element() {
    let triples = parse(
        r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex/" xml:base="http://host/a/">
  <rdf:Description rdf:about="one"><ex:p rdf:resource="two"/></rdf:Description>
  <rdf:Description rdf:about="three" xml:base="http://other/"><ex:p rdf:resource="four"/></rdf:Description>
</rdf:RDF>"#,
    );
    assert_eq!(triples[0].subject.to_string(), "<http://host/a/one>");
    assert_eq!(triples[0].object.to_string(), "<http://host/a/two>");
    assert_eq!(triples[1].subject.to_string(), "<http://other/three>");
    assert_eq!(triples[1].object.to_string(), "<http://other/four>");
}

#[test]
fn scanning_finds_rdf_inside_other_xml() {
    let file = r#"<html xmlns="http://www.w3.org/1999/xhtml"><head>
  <rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex/">
    <rdf:Description rdf:about="http://ex/s"><ex:p>o</ex:p></rdf:Description>
  </rdf:RDF>
</head></html>"#;
    let triples = RdfXmlParser::new()
        .scanning()
        .for_reader(file.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(triples.len(), 1);
}

#[test]
fn entities_are_resolved() {
    let triples = parse(
        r#"<?xml version="1.0"?>
<!DOCTYPE rdf:RDF [<!ENTITY ex "http://ex/">]>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="&ex;">
  <rdf:Description rdf:about="&ex;s"><ex:p>o</ex:p></rdf:Description>
</rdf:RDF>"#,
    );
    assert_eq!(triples[0].to_string(), "<http://ex/s> <http://ex/p> \"o\"");
}

#[test]
fn non_nfc_literals_are_reported() {
    // "é" written as "e" followed by a combining acute accent is not NFC
    let file = "<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\" xmlns:ex=\"http://ex/\">\
<rdf:Description rdf:about=\"http://ex/s\"><ex:p>e\u{0301}</ex:p></rdf:Description></rdf:RDF>";

    // a warning by default, the literal is kept
    let warnings = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&warnings);
    let triples = RdfXmlParser::new()
        .with_warning_handler(move |w| sink.borrow_mut().push(w))
        .for_reader(file.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(triples.len(), 1);
    assert_eq!(warnings.borrow().len(), 1);

    // fatal when asked to
    assert!(RdfXmlParser::new()
        .non_nfc_fatal()
        .for_reader(file.as_bytes())
        .any(|r| r.is_err()));
}

#[test]
fn non_utf8_encodings_are_rejected() {
    let file = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"/>"#;
    assert!(RdfXmlParser::new()
        .for_reader(file.as_bytes())
        .any(|r| r.is_err()));
}

#[test]
fn round_trip_through_serializer() {
    use kestrel_rdfxml::RdfXmlSerializer;

    let original = vec![
        Triple::new(
            NamedNode::new_unchecked("http://ex/s"),
            rdf::TYPE,
            NamedNode::new_unchecked("http://ex/Class"),
        ),
        Triple::new(
            NamedNode::new_unchecked("http://ex/s"),
            NamedNode::new_unchecked("http://ex/p"),
            NamedNode::new_unchecked("http://ex/o"),
        ),
    ];
    let mut serializer = RdfXmlSerializer::new()
        .with_prefix("ex", "http://ex/")
        .unwrap()
        .for_writer(Vec::new());
    for t in &original {
        serializer.serialize_triple(t.as_ref()).unwrap();
    }
    let bytes = serializer.finish().unwrap();
    let parsed = RdfXmlParser::new()
        .for_reader(bytes.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(parsed, original);
}
