//! The typed-node model every syndication dialect is normalized into.

use kestrel_model::{BlankNode, NamedNode, NamedOrBlankNode, Triple};

/// Namespaces used by the supported feed dialects.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum FeedNamespace {
    /// RSS 0.92 / 2.0, no namespace at all
    None,
    Rss10,
    Rss091,
    /// The old Netscape RSS 0.9 namespace, folded into RSS 1.0
    Rss09,
    Rss11,
    Rss20Enclosure,
    Atom03,
    Atom10,
    DublinCore,
    Content,
    Itunes,
    Rdf,
}

impl FeedNamespace {
    pub const fn uri(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Rss10 => "http://purl.org/rss/1.0/",
            Self::Rss091 => "http://purl.org/rss/1.0/modules/rss091#",
            Self::Rss09 => "http://my.netscape.com/rdf/simple/0.9/",
            Self::Rss11 => "http://purl.org/net/rss1.1#",
            Self::Rss20Enclosure => "http://purl.oclc.org/net/rss_2.0/enc#",
            Self::Atom03 => "http://purl.org/atom/ns#",
            Self::Atom10 => "http://www.w3.org/2005/Atom",
            Self::DublinCore => "http://purl.org/dc/elements/1.1/",
            Self::Content => "http://purl.org/rss/1.0/modules/content/",
            Self::Itunes => "http://www.itunes.com/dtds/podcast-1.0.dtd",
            Self::Rdf => "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
        }
    }

    /// The base of the RDF predicate IRIs minted in this namespace.
    ///
    /// The Atom and iTunes XML namespaces have no trailing separator, one is
    /// added so that predicate IRIs stay well-formed.
    pub const fn predicate_base(self) -> &'static str {
        match self {
            Self::Atom10 => "http://www.w3.org/2005/Atom#",
            Self::Itunes => "http://www.itunes.com/dtds/podcast-1.0.dtd#",
            _ => self.uri(),
        }
    }

    pub const fn prefix(self) -> &'static str {
        match self {
            Self::None | Self::Rss10 | Self::Rss09 | Self::Rss11 => "",
            Self::Rss091 => "rss091",
            Self::Rss20Enclosure => "enc",
            Self::Atom03 | Self::Atom10 => "atom",
            Self::DublinCore => "dc",
            Self::Content => "content",
            Self::Itunes => "itunes",
            Self::Rdf => "rdf",
        }
    }

    /// Maps an XML namespace IRI to the dialect it belongs to.
    pub fn from_uri(uri: &str) -> Option<Self> {
        // a few feeds forget the trailing separator
        let uri = uri.trim_end_matches('/');
        Some(match uri {
            "http://purl.org/rss/1.0" => Self::Rss10,
            "http://purl.org/rss/1.0/modules/rss091#" => Self::Rss091,
            "http://my.netscape.com/rdf/simple/0.9" => Self::Rss09,
            "http://purl.org/net/rss1.1#" => Self::Rss11,
            "http://purl.oclc.org/net/rss_2.0/enc#" => Self::Rss20Enclosure,
            "http://purl.org/atom/ns#" => Self::Atom03,
            "http://www.w3.org/2005/Atom" => Self::Atom10,
            "http://purl.org/dc/elements/1.1" => Self::DublinCore,
            "http://purl.org/rss/1.0/modules/content" => Self::Content,
            "http://www.itunes.com/dtds/podcast-1.0.dtd" => Self::Itunes,
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#" => Self::Rdf,
            _ => return None,
        })
    }
}

/// The kinds of typed nodes a feed is made of.
///
/// `Channel`, `Image`, `TextInput` and `Item` are the RSS 1.0 containers;
/// the others come from RSS 2.0 and Atom and either turn into metadata
/// blocks (`Enclosure`, `Category`, `Source`, `Author`, `Link`, `Owner`) or
/// are ignored containers (`SkipHours`, `SkipDays`).
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum FeedNodeKind {
    Channel,
    Image,
    TextInput,
    Item,
    Author,
    Link,
    Owner,
    SkipHours,
    SkipDays,
    Enclosure,
    Category,
    Source,
}

impl FeedNodeKind {
    /// The RDF class IRI this node kind is lowered to.
    pub fn class_uri(self) -> NamedNode {
        let (ns, name) = match self {
            Self::Channel => (FeedNamespace::Rss10, "channel"),
            Self::Image => (FeedNamespace::Rss10, "image"),
            Self::TextInput => (FeedNamespace::Rss10, "textinput"),
            Self::Item => (FeedNamespace::Rss10, "item"),
            Self::Author => (FeedNamespace::Atom10, "Person"),
            Self::Link => (FeedNamespace::Atom10, "Link"),
            Self::Owner => (FeedNamespace::Itunes, "owner"),
            Self::SkipHours => (FeedNamespace::Rss091, "skipHours"),
            Self::SkipDays => (FeedNamespace::Rss091, "skipDays"),
            Self::Enclosure => (FeedNamespace::Rss20Enclosure, "Enclosure"),
            Self::Category => (FeedNamespace::Atom10, "Category"),
            Self::Source => (FeedNamespace::Rss10, "source"),
        };
        NamedNode::new_unchecked(format!("{}{name}", ns.predicate_base()))
    }

    /// True for the node kinds stored as metadata blocks of an item instead
    /// of top-level containers.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Self::Enclosure | Self::Category | Self::Source | Self::Author | Self::Link | Self::Owner
        )
    }

    /// The predicate linking an item to a block of this kind.
    pub fn block_predicate(self) -> Option<FeedField> {
        Some(match self {
            Self::Enclosure => FeedField::Enclosure,
            Self::Category => FeedField::AtomCategory,
            Self::Author => FeedField::AtomAuthor,
            Self::Link => FeedField::AtomLink,
            Self::Owner => FeedField::ItunesOwner,
            Self::Source => FeedField::Source,
            _ => return None,
        })
    }
}

/// The unified field set all dialects are mapped onto.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum FeedField {
    // RSS core
    Title,
    Link,
    Description,
    Url,
    Name,
    Language,
    Rating,
    Copyright,
    PubDate,
    LastBuildDate,
    Docs,
    ManagingEditor,
    WebMaster,
    Cloud,
    Ttl,
    Width,
    Height,
    Hour,
    Day,
    Generator,
    Source,
    Author,
    Guid,
    Enclosure,
    EnclosureUrl,
    Length,
    Type,
    Category,
    Comments,
    Items,
    Image,
    TextInput,
    // Atom 0.3
    AtomCopyright,
    AtomCreated,
    AtomIssued,
    AtomModified,
    AtomTagline,
    // Atom 1.0
    AtomId,
    AtomTitle,
    AtomUpdated,
    AtomAuthor,
    AtomCategory,
    AtomContent,
    AtomContributor,
    AtomEmail,
    AtomGenerator,
    AtomIcon,
    AtomLink,
    AtomLogo,
    AtomName,
    AtomPublished,
    AtomRights,
    AtomSource,
    AtomSubtitle,
    AtomSummary,
    AtomUri,
    // Atom attributes stored in blocks
    AtomLabel,
    AtomScheme,
    AtomTerm,
    AtomHref,
    AtomRel,
    AtomType,
    AtomHrefLang,
    AtomLength,
    // Dublin Core
    DcTitle,
    DcContributor,
    DcCreator,
    DcPublisher,
    DcSubject,
    DcDescription,
    DcDate,
    DcType,
    DcFormat,
    DcIdentifier,
    DcLanguage,
    DcRelation,
    DcSource,
    DcCoverage,
    DcRights,
    // Modules
    ContentEncoded,
    ItunesAuthor,
    ItunesSubtitle,
    ItunesSummary,
    ItunesKeywords,
    ItunesExplicit,
    ItunesImage,
    ItunesName,
    ItunesOwner,
    ItunesBlock,
    ItunesCategory,
    ItunesEmail,
}

impl FeedField {
    pub const fn namespace(self) -> FeedNamespace {
        match self {
            Self::Title
            | Self::Link
            | Self::Description
            | Self::Url
            | Self::Name
            | Self::Source
            | Self::Items
            | Self::Image
            | Self::TextInput => FeedNamespace::Rss10,
            Self::Language
            | Self::Rating
            | Self::Copyright
            | Self::PubDate
            | Self::LastBuildDate
            | Self::Docs
            | Self::ManagingEditor
            | Self::WebMaster
            | Self::Cloud
            | Self::Ttl
            | Self::Width
            | Self::Height
            | Self::Hour
            | Self::Day
            | Self::Generator
            | Self::Author
            | Self::Guid
            | Self::Comments
            | Self::Category => FeedNamespace::Rss091,
            Self::Enclosure | Self::EnclosureUrl | Self::Length | Self::Type => {
                FeedNamespace::Rss20Enclosure
            }
            Self::AtomCopyright
            | Self::AtomCreated
            | Self::AtomIssued
            | Self::AtomModified
            | Self::AtomTagline => FeedNamespace::Atom03,
            Self::AtomId
            | Self::AtomTitle
            | Self::AtomUpdated
            | Self::AtomAuthor
            | Self::AtomCategory
            | Self::AtomContent
            | Self::AtomContributor
            | Self::AtomEmail
            | Self::AtomGenerator
            | Self::AtomIcon
            | Self::AtomLink
            | Self::AtomLogo
            | Self::AtomName
            | Self::AtomPublished
            | Self::AtomRights
            | Self::AtomSource
            | Self::AtomSubtitle
            | Self::AtomSummary
            | Self::AtomUri
            | Self::AtomLabel
            | Self::AtomScheme
            | Self::AtomTerm
            | Self::AtomHref
            | Self::AtomRel
            | Self::AtomType
            | Self::AtomHrefLang
            | Self::AtomLength => FeedNamespace::Atom10,
            Self::DcTitle
            | Self::DcContributor
            | Self::DcCreator
            | Self::DcPublisher
            | Self::DcSubject
            | Self::DcDescription
            | Self::DcDate
            | Self::DcType
            | Self::DcFormat
            | Self::DcIdentifier
            | Self::DcLanguage
            | Self::DcRelation
            | Self::DcSource
            | Self::DcCoverage
            | Self::DcRights => FeedNamespace::DublinCore,
            Self::ContentEncoded => FeedNamespace::Content,
            Self::ItunesAuthor
            | Self::ItunesSubtitle
            | Self::ItunesSummary
            | Self::ItunesKeywords
            | Self::ItunesExplicit
            | Self::ItunesImage
            | Self::ItunesName
            | Self::ItunesOwner
            | Self::ItunesBlock
            | Self::ItunesCategory
            | Self::ItunesEmail => FeedNamespace::Itunes,
        }
    }

    pub const fn local_name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Link => "link",
            Self::Description => "description",
            Self::Url => "url",
            Self::Name => "name",
            Self::Language => "language",
            Self::Rating => "rating",
            Self::Copyright => "copyright",
            Self::PubDate => "pubDate",
            Self::LastBuildDate => "lastBuildDate",
            Self::Docs => "docs",
            Self::ManagingEditor => "managingEditor",
            Self::WebMaster => "webMaster",
            Self::Cloud => "cloud",
            Self::Ttl => "ttl",
            Self::Width => "width",
            Self::Height => "height",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Generator => "generator",
            Self::Source => "source",
            Self::Author => "author",
            Self::Guid => "guid",
            Self::Enclosure => "enclosure",
            Self::EnclosureUrl => "url",
            Self::Length => "length",
            Self::Type => "type",
            Self::Category => "category",
            Self::Comments => "comments",
            Self::Items => "items",
            Self::Image => "image",
            Self::TextInput => "textinput",
            Self::AtomCopyright => "copyright",
            Self::AtomCreated => "created",
            Self::AtomIssued => "issued",
            Self::AtomModified => "modified",
            Self::AtomTagline => "tagline",
            Self::AtomId => "id",
            Self::AtomTitle => "title",
            Self::AtomUpdated => "updated",
            Self::AtomAuthor => "author",
            Self::AtomCategory => "category",
            Self::AtomContent => "content",
            Self::AtomContributor => "contributor",
            Self::AtomEmail => "email",
            Self::AtomGenerator => "generator",
            Self::AtomIcon => "icon",
            Self::AtomLink => "link",
            Self::AtomLogo => "logo",
            Self::AtomName => "name",
            Self::AtomPublished => "published",
            Self::AtomRights => "rights",
            Self::AtomSource => "source",
            Self::AtomSubtitle => "subtitle",
            Self::AtomSummary => "summary",
            Self::AtomUri => "uri",
            Self::AtomLabel => "label",
            Self::AtomScheme => "scheme",
            Self::AtomTerm => "term",
            Self::AtomHref => "href",
            Self::AtomRel => "rel",
            Self::AtomType => "type",
            Self::AtomHrefLang => "hreflang",
            Self::AtomLength => "length",
            Self::DcTitle => "title",
            Self::DcContributor => "contributor",
            Self::DcCreator => "creator",
            Self::DcPublisher => "publisher",
            Self::DcSubject => "subject",
            Self::DcDescription => "description",
            Self::DcDate => "date",
            Self::DcType => "type",
            Self::DcFormat => "format",
            Self::DcIdentifier => "identifier",
            Self::DcLanguage => "language",
            Self::DcRelation => "relation",
            Self::DcSource => "source",
            Self::DcCoverage => "coverage",
            Self::DcRights => "rights",
            Self::ContentEncoded => "encoded",
            Self::ItunesAuthor => "author",
            Self::ItunesSubtitle => "subtitle",
            Self::ItunesSummary => "summary",
            Self::ItunesKeywords => "keywords",
            Self::ItunesExplicit => "explicit",
            Self::ItunesImage => "image",
            Self::ItunesName => "name",
            Self::ItunesOwner => "owner",
            Self::ItunesBlock => "block",
            Self::ItunesCategory => "category",
            Self::ItunesEmail => "email",
        }
    }

    /// The predicate IRI this field is lowered to.
    pub fn uri(self) -> NamedNode {
        NamedNode::new_unchecked(format!(
            "{}{}",
            self.namespace().predicate_base(),
            self.local_name()
        ))
    }

    /// True when the field value is a resource reference rather than text.
    pub const fn is_uri_value(self) -> bool {
        matches!(
            self,
            Self::Link
                | Self::Url
                | Self::EnclosureUrl
                | Self::Docs
                | Self::Guid
                | Self::Comments
                | Self::AtomId
                | Self::AtomIcon
                | Self::AtomLogo
                | Self::AtomUri
                | Self::AtomHref
                | Self::ItunesImage
        )
    }

    /// True when the field holds a date that should be uplifted to ISO 8601.
    pub const fn is_date_value(self) -> bool {
        matches!(
            self,
            Self::PubDate
                | Self::LastBuildDate
                | Self::DcDate
                | Self::AtomCreated
                | Self::AtomIssued
                | Self::AtomModified
                | Self::AtomUpdated
                | Self::AtomPublished
        )
    }

    /// Resolves a namespaced element name against the unified field set.
    ///
    /// The per-namespace overrides make e.g. `<title>` in an Atom document a
    /// different field than `<title>` in an RSS one.
    pub fn from_element(namespace: Option<FeedNamespace>, local: &str) -> Option<Self> {
        Some(match namespace {
            // RSS in all its variants shares the core field set
            None
            | Some(
                FeedNamespace::None
                | FeedNamespace::Rss10
                | FeedNamespace::Rss09
                | FeedNamespace::Rss091
                | FeedNamespace::Rss11,
            ) => match local {
                "title" => Self::Title,
                "link" => Self::Link,
                "description" => Self::Description,
                "url" => Self::Url,
                "name" => Self::Name,
                "language" => Self::Language,
                "rating" => Self::Rating,
                "copyright" => Self::Copyright,
                "pubDate" => Self::PubDate,
                "lastBuildDate" => Self::LastBuildDate,
                "docs" => Self::Docs,
                "managingEditor" => Self::ManagingEditor,
                "webMaster" => Self::WebMaster,
                "cloud" => Self::Cloud,
                "ttl" => Self::Ttl,
                "width" => Self::Width,
                "height" => Self::Height,
                "hour" => Self::Hour,
                "day" => Self::Day,
                "generator" => Self::Generator,
                "author" => Self::Author,
                "guid" => Self::Guid,
                "length" => Self::Length,
                "type" => Self::Type,
                "comments" => Self::Comments,
                "items" => Self::Items,
                _ => return None,
            },
            Some(FeedNamespace::Rss20Enclosure) => match local {
                "enclosure" => Self::Enclosure,
                "length" => Self::Length,
                "type" => Self::Type,
                _ => return None,
            },
            Some(FeedNamespace::Atom03) => match local {
                "copyright" => Self::AtomCopyright,
                "created" => Self::AtomCreated,
                "issued" => Self::AtomIssued,
                "modified" => Self::AtomModified,
                "tagline" => Self::AtomTagline,
                "title" => Self::AtomTitle,
                "id" => Self::AtomId,
                "summary" => Self::AtomSummary,
                "content" => Self::AtomContent,
                "name" => Self::AtomName,
                "url" => Self::AtomUri,
                "email" => Self::AtomEmail,
                _ => return None,
            },
            Some(FeedNamespace::Atom10) => match local {
                "id" => Self::AtomId,
                "title" => Self::AtomTitle,
                "updated" => Self::AtomUpdated,
                "content" => Self::AtomContent,
                "contributor" => Self::AtomContributor,
                "email" => Self::AtomEmail,
                "generator" => Self::AtomGenerator,
                "icon" => Self::AtomIcon,
                "logo" => Self::AtomLogo,
                "name" => Self::AtomName,
                "published" => Self::AtomPublished,
                "rights" => Self::AtomRights,
                "source" => Self::AtomSource,
                "subtitle" => Self::AtomSubtitle,
                "summary" => Self::AtomSummary,
                "uri" => Self::AtomUri,
                _ => return None,
            },
            Some(FeedNamespace::DublinCore) => match local {
                "title" => Self::DcTitle,
                "contributor" => Self::DcContributor,
                "creator" => Self::DcCreator,
                "publisher" => Self::DcPublisher,
                "subject" => Self::DcSubject,
                "description" => Self::DcDescription,
                "date" => Self::DcDate,
                "type" => Self::DcType,
                "format" => Self::DcFormat,
                "identifier" => Self::DcIdentifier,
                "language" => Self::DcLanguage,
                "relation" => Self::DcRelation,
                "source" => Self::DcSource,
                "coverage" => Self::DcCoverage,
                "rights" => Self::DcRights,
                _ => return None,
            },
            Some(FeedNamespace::Content) => match local {
                "encoded" => Self::ContentEncoded,
                _ => return None,
            },
            Some(FeedNamespace::Itunes) => match local {
                "author" => Self::ItunesAuthor,
                "subtitle" => Self::ItunesSubtitle,
                "summary" => Self::ItunesSummary,
                "keywords" => Self::ItunesKeywords,
                "explicit" => Self::ItunesExplicit,
                "image" => Self::ItunesImage,
                "name" => Self::ItunesName,
                "block" => Self::ItunesBlock,
                "email" => Self::ItunesEmail,
                _ => return None,
            },
            Some(FeedNamespace::Rdf) => return None,
        })
    }
}

/// The field pairs applied by the uplift pass, in order: the Atom clones of
/// RSS fields first, then the Atom 0.3 names folded into their 1.0
/// equivalents.
pub const ATOM_TO_RSS: [(FeedField, FeedField); 8] = [
    // atom clone of rss fields
    (FeedField::AtomSummary, FeedField::Description),
    (FeedField::AtomId, FeedField::Link),
    (FeedField::AtomUpdated, FeedField::DcDate),
    (FeedField::AtomRights, FeedField::DcRights),
    (FeedField::AtomTitle, FeedField::Title),
    (FeedField::AtomSummary, FeedField::ContentEncoded),
    // atom 0.3 to atom 1.0
    (FeedField::AtomCopyright, FeedField::AtomRights),
    (FeedField::AtomTagline, FeedField::AtomSubtitle),
];

/// One value of a field: either a resource reference or a possibly
/// language-tagged string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedValue {
    Uri(NamedNode),
    Text {
        value: String,
        language: Option<String>,
    },
}

impl FeedValue {
    pub fn text(value: impl Into<String>, language: Option<String>) -> Self {
        Self::Text {
            value: value.into(),
            language,
        }
    }
}

/// A metadata block attached to an item: an enclosure, a category, a person
/// or a link, with its attribute slots.
#[derive(Debug, Clone)]
pub struct FeedBlock {
    pub kind: FeedNodeKind,
    pub fields: Vec<(FeedField, FeedValue)>,
}

/// An instance of a typed node.
///
/// Each item has exactly one kind; multiple values of the same field keep
/// their document order.
#[derive(Debug, Clone)]
pub struct FeedItem {
    pub kind: FeedNodeKind,
    /// The node identity: the `rdf:about` IRI for RSS 1.0 feeds, a fresh
    /// blank node otherwise.
    pub subject: NamedOrBlankNode,
    pub fields: Vec<(FeedField, FeedValue)>,
    pub blocks: Vec<FeedBlock>,
    /// Statements about this item that do not fit the known field set.
    pub extra_triples: Vec<Triple>,
}

impl FeedItem {
    pub fn new(kind: FeedNodeKind) -> Self {
        Self {
            kind,
            subject: BlankNode::default().into(),
            fields: Vec::new(),
            blocks: Vec::new(),
            extra_triples: Vec::new(),
        }
    }

    pub fn values(&self, field: FeedField) -> impl Iterator<Item = &FeedValue> {
        self.fields
            .iter()
            .filter(move |(f, _)| *f == field)
            .map(|(_, v)| v)
    }

    pub fn has_field(&self, field: FeedField) -> bool {
        self.fields.iter().any(|(f, _)| *f == field)
    }
}

/// A whole feed: the channel-level nodes plus the ordered item list.
#[derive(Debug, Clone, Default)]
pub struct FeedModel {
    pub channel: Option<FeedItem>,
    pub image: Option<FeedItem>,
    pub text_input: Option<FeedItem>,
    pub items: Vec<FeedItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_lookup_is_namespace_sensitive() {
        assert_eq!(
            FeedField::from_element(None, "title"),
            Some(FeedField::Title)
        );
        assert_eq!(
            FeedField::from_element(Some(FeedNamespace::Rss10), "title"),
            Some(FeedField::Title)
        );
        assert_eq!(
            FeedField::from_element(Some(FeedNamespace::Atom10), "title"),
            Some(FeedField::AtomTitle)
        );
        assert_eq!(
            FeedField::from_element(Some(FeedNamespace::DublinCore), "date"),
            Some(FeedField::DcDate)
        );
        assert_eq!(FeedField::from_element(None, "unknown"), None);
    }

    #[test]
    fn field_uris_use_the_owning_namespace() {
        assert_eq!(
            FeedField::Title.uri().as_str(),
            "http://purl.org/rss/1.0/title"
        );
        assert_eq!(
            FeedField::ContentEncoded.uri().as_str(),
            "http://purl.org/rss/1.0/modules/content/encoded"
        );
        assert_eq!(
            FeedField::DcDate.uri().as_str(),
            "http://purl.org/dc/elements/1.1/date"
        );
    }

    #[test]
    fn rss09_is_folded_into_rss10() {
        assert_eq!(
            FeedNamespace::from_uri("http://my.netscape.com/rdf/simple/0.9/"),
            Some(FeedNamespace::Rss09)
        );
        assert_eq!(
            FeedField::from_element(Some(FeedNamespace::Rss09), "title"),
            Some(FeedField::Title)
        );
    }
}
