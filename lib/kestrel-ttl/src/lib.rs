#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]

pub mod ntriples;
mod reader;
mod scanner;
mod terse;
pub mod trig;
pub mod turtle;
mod violation;
mod writer;

pub use crate::ntriples::{NTriplesParser, NTriplesSerializer};
pub use crate::trig::{TriGParser, TriGSerializer};
pub use crate::turtle::{TurtleParser, TurtleSerializer};
pub use crate::violation::{TtlParseError, TtlSyntaxError};
