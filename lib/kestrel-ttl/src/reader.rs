//! Chunk-fed parsing: a byte buffer with a position cursor, driving the
//! scanner and a grammar.
//!
//! This is the `parse_chunk(bytes, is_end)` side of the crate: input is
//! pushed in with [`TtlReader::parse_chunk`], the end of the input is
//! announced with [`TtlReader::end`], and statements are pulled with
//! [`TtlReader::next_statement`]. Nothing suspends inside a chunk.

use crate::scanner::{Scan, TerseScanner};
use crate::violation::{TtlParseError, TtlSyntaxError};
use kestrel_model::Locator;
use memchr::memchr2;
use std::collections::VecDeque;
use std::io::{self, Read};

/// How many bytes [`TtlReader::read_from`] asks for at a time.
const READ_STEP: usize = 8192;
/// Cap on the bytes buffered while waiting for a token to complete.
const MAX_BUFFERED: usize = 4096 * 4096;

/// A grammar automaton over the terse lexemes.
///
/// Unlike the scanner, a grammar is stateful: it keeps its rule stack and
/// in-progress statement parts in itself and pushes finished statements and
/// recoverable violations into the [`Outcomes`].
pub(crate) trait Grammar {
    type Output;

    /// The scanner configuration this grammar wants.
    fn scanner(&self) -> TerseScanner;

    fn feed(
        &mut self,
        lexeme: crate::scanner::Lexeme<'_>,
        at: &Locator,
        out: &mut Outcomes<Self::Output>,
    );

    /// The input is over; flush whatever is pending.
    fn flush(&mut self, at: &Locator, out: &mut Outcomes<Self::Output>);

    /// A scanning error happened at `at`; drop the statement in progress
    /// and arrange to resynchronize.
    fn reset_after_error(&mut self, at: &Locator);
}

/// The two output queues of a grammar.
pub(crate) struct Outcomes<T> {
    statements: VecDeque<T>,
    violations: VecDeque<TtlSyntaxError>,
}

impl<T> Outcomes<T> {
    fn new() -> Self {
        Self {
            statements: VecDeque::new(),
            violations: VecDeque::new(),
        }
    }

    pub fn emit(&mut self, statement: T) {
        self.statements.push_back(statement);
    }

    pub fn complain(&mut self, at: &Locator, message: impl Into<String>) {
        self.violations
            .push_back(TtlSyntaxError::new(at.clone(), message));
    }

    fn is_empty(&self) -> bool {
        self.statements.is_empty() && self.violations.is_empty()
    }
}

/// The push-based parser core shared by every terse syntax.
pub(crate) struct TtlReader<G: Grammar> {
    pub(crate) grammar: G,
    out: Outcomes<G::Output>,
    bytes: Vec<u8>,
    /// Index of the first unconsumed byte in `bytes`.
    start: usize,
    line: u64,
    column: u64,
    byte: u64,
    at_end: bool,
    flushed: bool,
}

impl<G: Grammar> TtlReader<G> {
    pub fn new(grammar: G) -> Self {
        Self {
            grammar,
            out: Outcomes::new(),
            bytes: Vec::new(),
            start: 0,
            line: 1,
            column: 1,
            byte: 0,
            at_end: false,
            flushed: false,
        }
    }

    /// Pushes a chunk of input. May be called any number of times.
    pub fn parse_chunk(&mut self, chunk: &[u8]) {
        self.compact();
        self.bytes.extend_from_slice(chunk);
    }

    /// Announces that no more chunks will come.
    pub fn end(&mut self) {
        self.at_end = true;
    }

    /// True once the whole input has been consumed and everything produced
    /// has been pulled out.
    pub fn is_finished(&self) -> bool {
        self.flushed && self.out.is_empty()
    }

    /// Pulls one chunk of input from `input`. Reading zero bytes counts as
    /// the end of the input.
    pub fn read_from(&mut self, input: &mut impl Read) -> io::Result<()> {
        self.compact();
        if self.bytes.len() >= MAX_BUFFERED {
            return Err(io::Error::new(
                io::ErrorKind::OutOfMemory,
                format!("a single token does not fit the {MAX_BUFFERED} byte buffer"),
            ));
        }
        let filled = self.bytes.len();
        self.bytes.resize(filled + READ_STEP, 0);
        let read = input.read(&mut self.bytes[filled..])?;
        self.bytes.truncate(filled + read);
        if read == 0 {
            self.at_end = true;
        }
        Ok(())
    }

    /// The next statement or violation, or `None` when more input is needed
    /// (or everything is finished, see [`TtlReader::is_finished`]).
    pub fn next_statement(&mut self) -> Option<Result<G::Output, TtlSyntaxError>> {
        loop {
            if let Some(violation) = self.out.violations.pop_front() {
                return Some(Err(violation));
            }
            if let Some(statement) = self.out.statements.pop_front() {
                return Some(Ok(statement));
            }
            if !self.step() {
                return None;
            }
        }
    }

    /// Tries to make one unit of progress. False when more input is needed
    /// or everything is done.
    fn step(&mut self) -> bool {
        if self.flushed {
            return false;
        }
        if !self.skip_insignificant() {
            return false;
        }
        if self.start >= self.bytes.len() {
            if self.at_end {
                let here = self.here();
                self.grammar.flush(&here, &mut self.out);
                self.flushed = true;
                return true;
            }
            return false;
        }
        let scan = self
            .grammar
            .scanner()
            .scan(&self.bytes[self.start..], self.at_end);
        match scan {
            Scan::Lexeme { consumed, lexeme } => {
                let here = self.here();
                self.grammar.feed(lexeme, &here, &mut self.out);
                self.advance(consumed);
                true
            }
            Scan::Trouble { consumed, message } => {
                let here = self.here();
                self.out.complain(&here, message);
                self.grammar.reset_after_error(&here);
                let remaining = self.bytes.len() - self.start;
                self.advance(consumed.clamp(1, remaining));
                true
            }
            Scan::Incomplete => {
                if self.at_end {
                    // the scanner gave up on a truncated token
                    let here = self.here();
                    self.out.complain(&here, "unexpected end of input");
                    let remaining = self.bytes.len() - self.start;
                    self.advance(remaining);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Consumes whitespace and comments. False when the buffer ends inside
    /// a comment and more input is needed to find its end.
    fn skip_insignificant(&mut self) -> bool {
        loop {
            match self.bytes.get(self.start) {
                Some(b' ' | b'\t' | b'\r' | b'\n') => self.advance(1),
                Some(b'#') => {
                    match memchr2(b'\n', b'\r', &self.bytes[self.start..]) {
                        Some(to_newline) => self.advance(to_newline),
                        None if self.at_end => {
                            let rest = self.bytes.len() - self.start;
                            self.advance(rest);
                        }
                        None => return false,
                    }
                }
                _ => return true,
            }
        }
    }

    fn here(&self) -> Locator {
        Locator::at(self.line, self.column, self.byte)
    }

    /// Consumes `n` bytes, keeping the line/column/byte cursor in step.
    /// Lines are counted at `\n`; columns count characters, not bytes.
    fn advance(&mut self, n: usize) {
        for &b in &self.bytes[self.start..self.start + n] {
            self.byte += 1;
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else if b != b'\r' && b & 0xC0 != 0x80 {
                self.column += 1;
            }
        }
        self.start += n;
    }

    /// Drops the already consumed prefix of the buffer.
    fn compact(&mut self) {
        if self.start > 0 {
            self.bytes.drain(..self.start);
            self.start = 0;
        }
    }
}

/// Iterator over the statements of a [`Read`] implementation.
pub(crate) struct ReaderDriver<R: Read, G: Grammar> {
    pub(crate) reader: TtlReader<G>,
    pub(crate) input: R,
}

impl<R: Read, G: Grammar> Iterator for ReaderDriver<R, G> {
    type Item = Result<G::Output, TtlParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(outcome) = self.reader.next_statement() {
                return Some(outcome.map_err(TtlParseError::from));
            }
            if self.reader.is_finished() {
                return None;
            }
            if let Err(e) = self.reader.read_from(&mut self.input) {
                return Some(Err(TtlParseError::Io(e)));
            }
        }
    }
}

/// Iterator over the statements of an in-memory slice.
pub(crate) struct SliceDriver<G: Grammar> {
    pub(crate) reader: TtlReader<G>,
}

impl<G: Grammar> SliceDriver<G> {
    pub fn new(grammar: G, slice: &[u8]) -> Self {
        let mut reader = TtlReader::new(grammar);
        reader.parse_chunk(slice);
        reader.end();
        Self { reader }
    }
}

impl<G: Grammar> Iterator for SliceDriver<G> {
    type Item = Result<G::Output, TtlSyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next_statement()
    }
}
