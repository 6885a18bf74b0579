//! [`NamedNodeRef`](super::NamedNodeRef) constants for the base
//! vocabularies.

/// Declares the namespace IRI and the term constants of one vocabulary.
macro_rules! vocabulary {
    ($ns:literal : $($(#[$doc:meta])* $name:ident => $local:literal),+ $(,)?) => {
        /// The IRI of the namespace itself.
        pub const NAMESPACE: &str = $ns;
        $(
            $(#[$doc])*
            pub const $name: NamedNodeRef<'_> =
                NamedNodeRef::new_unchecked(concat!($ns, $local));
        )+
    };
}

pub mod rdf {
    //! The [RDF](https://www.w3.org/TR/rdf11-concepts/) vocabulary.
    use crate::term::NamedNodeRef;
    use crate::NamedNode;

    vocabulary!("http://www.w3.org/1999/02/22-rdf-syntax-ns#":
        /// Containers of alternatives.
        ALT => "Alt",
        /// Unordered containers.
        BAG => "Bag",
        /// The head of the subject list.
        FIRST => "first",
        /// The datatype of language-tagged strings.
        LANG_STRING => "langString",
        /// Lists.
        LIST => "List",
        /// The empty list.
        NIL => "nil",
        /// What a reified statement says.
        OBJECT => "object",
        /// The property of a reified statement.
        PREDICATE => "predicate",
        /// Properties.
        PROPERTY => "Property",
        /// The tail of the subject list.
        REST => "rest",
        /// Ordered containers.
        SEQ => "Seq",
        /// Reified statements.
        STATEMENT => "Statement",
        /// What a reified statement speaks about.
        SUBJECT => "subject",
        /// Class membership.
        TYPE => "type",
        /// Structured values.
        VALUE => "value",
        /// Embedded XML content.
        XML_LITERAL => "XMLLiteral",
    );

    /// The `rdf:_n` container membership property.
    pub fn member(n: u64) -> NamedNode {
        NamedNode::new_unchecked(format!("{NAMESPACE}_{n}"))
    }
}

pub mod rdfs {
    //! The [RDF Schema](https://www.w3.org/TR/rdf-schema/) vocabulary.
    use crate::term::NamedNodeRef;

    vocabulary!("http://www.w3.org/2000/01/rdf-schema#":
        /// Classes.
        CLASS => "Class",
        /// A longer description of the subject.
        COMMENT => "comment",
        /// A short human-readable name of the subject.
        LABEL => "label",
        /// Container membership, generalizing over `rdf:_n`.
        MEMBER => "member",
        /// Where to read more about the subject.
        SEE_ALSO => "seeAlso",
    );
}

pub mod xsd {
    //! The [XML Schema datatype](https://www.w3.org/TR/xmlschema11-2/)
    //! vocabulary.
    use crate::term::NamedNodeRef;

    vocabulary!("http://www.w3.org/2001/XMLSchema#":
        /// `true` or `false`.
        BOOLEAN => "boolean",
        /// Calendar dates.
        DATE => "date",
        /// Timestamps, with or without a timezone.
        DATE_TIME => "dateTime",
        /// Base-10 numbers of arbitrary precision.
        DECIMAL => "decimal",
        /// IEEE 754 binary64 numbers.
        DOUBLE => "double",
        /// Whole numbers of arbitrary size.
        INTEGER => "integer",
        /// Character strings, the implicit datatype of plain literals.
        STRING => "string",
    );
}
