#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]

mod error;
mod parser;
mod serializer;
mod utils;

pub use crate::error::{RdfXmlParseError, RdfXmlSyntaxError};
pub use crate::parser::{RdfXmlParser, ReaderRdfXmlParser};
pub use crate::serializer::{RdfXmlSerializer, WriterRdfXmlSerializer};
