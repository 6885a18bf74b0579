#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]

mod error;
mod model;
mod parser;
mod serializer;

pub use crate::error::{FeedParseError, FeedSyntaxError};
pub use crate::model::{
    FeedBlock, FeedField, FeedItem, FeedModel, FeedNamespace, FeedNodeKind, FeedValue,
};
pub use crate::parser::{FeedParser, ReaderFeedParser};
pub use crate::serializer::{Rss10Serializer, WriterRss10Serializer};
