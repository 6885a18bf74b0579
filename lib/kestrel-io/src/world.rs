//! The per-embedder handle owning everything that would otherwise be
//! process-wide state.

use crate::diagnostics::{default_diagnostic_handler, Diagnostic, DiagnosticHandler};
use crate::format::RdfSyntax;
use crate::guess::GuessParser;
use crate::parser::RdfParser;
use crate::serializer::RdfSerializer;
use kestrel_iri::IriParseError;
use kestrel_model::{InternedIri, UriInterner};

/// The toolkit entry point: the registry of syntaxes, the IRI interner and
/// the diagnostics sink.
///
/// Separate worlds are fully independent; nothing is shared behind their
/// back. A world is not synchronized: embedders sharing one between threads
/// must guard it themselves.
///
/// ```
/// use kestrel_io::{RdfSyntax, World};
///
/// let mut world = World::new();
/// let a = world.intern("http://example.com/s")?;
/// let b = world.intern("http://example.com/s")?;
/// assert!(a.shares_storage_with(&b));
///
/// let parser = world.parser(RdfSyntax::Turtle);
/// assert_eq!(parser.syntax(), RdfSyntax::Turtle);
/// # Result::<_, kestrel_io::IriParseError>::Ok(())
/// ```
pub struct World {
    interner: UriInterner,
    diagnostics: DiagnosticHandler,
}

impl World {
    pub fn new() -> Self {
        Self {
            interner: UriInterner::new(),
            diagnostics: default_diagnostic_handler(),
        }
    }

    /// The syntaxes this toolkit can parse and serialize.
    pub fn syntaxes(&self) -> impl Iterator<Item = RdfSyntax> {
        RdfSyntax::ALL.into_iter()
    }

    /// Interns an IRI: equal IRIs interned through the same world share
    /// storage and compare in O(1).
    pub fn intern(&mut self, iri: &str) -> Result<InternedIri, IriParseError> {
        self.interner.intern(iri)
    }

    /// The world interner, for direct use.
    pub fn interner(&mut self) -> &mut UriInterner {
        &mut self.interner
    }

    /// Replaces the diagnostics sink. The default one writes
    /// `file:line:col: severity: message` lines to standard error.
    pub fn set_diagnostic_handler(&mut self, handler: impl FnMut(&Diagnostic) + 'static) {
        self.diagnostics = Box::new(handler);
    }

    /// Delivers a diagnostic to the registered handler.
    pub fn emit(&mut self, diagnostic: &Diagnostic) {
        (self.diagnostics)(diagnostic);
    }

    /// Builds a parser for the given syntax.
    #[allow(clippy::unused_self)]
    pub fn parser(&self, syntax: RdfSyntax) -> RdfParser {
        RdfParser::from_syntax(syntax)
    }

    /// Builds a parser that guesses the syntax from the input.
    #[allow(clippy::unused_self)]
    pub fn guess_parser(&self) -> GuessParser {
        GuessParser::new()
    }

    /// Builds a serializer for the given syntax.
    #[allow(clippy::unused_self)]
    pub fn serializer(&self, syntax: RdfSyntax) -> RdfSerializer {
        RdfSerializer::from_syntax(syntax)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn worlds_are_independent() {
        let mut first = World::new();
        let mut second = World::new();
        let a = first.intern("http://example.com/x").unwrap();
        let b = second.intern("http://example.com/x").unwrap();
        assert!(!a.shares_storage_with(&b));
        assert_eq!(a, b); // still equal by value
    }

    #[test]
    fn diagnostics_reach_the_registered_handler() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut world = World::new();
        world.set_diagnostic_handler(move |d| sink.borrow_mut().push(d.clone()));
        world.emit(&Diagnostic::warning("odd input"));
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].severity, Severity::Warning);
    }
}
