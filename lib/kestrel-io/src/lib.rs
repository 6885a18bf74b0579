#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]

mod diagnostics;
mod error;
mod format;
mod guess;
mod options;
mod parser;
mod serializer;
mod world;

pub use crate::diagnostics::{
    default_diagnostic_handler, Diagnostic, DiagnosticHandler, Severity,
};
pub use kestrel_model::Locator;
pub use crate::error::{RdfParseError, RdfSyntaxError};
pub use crate::format::{RdfSyntax, UnknownSyntaxError};
pub use crate::guess::{GuessParser, ReaderGuessParser};
pub use crate::options::{OptionArea, OptionValueKind, SyntaxOption, UnsupportedOptionError};
pub use crate::parser::{RdfParser, ReaderQuadParser};
pub use crate::serializer::{RdfSerializer, WriterQuadSerializer};
pub use crate::world::World;
pub use kestrel_iri::IriParseError;
