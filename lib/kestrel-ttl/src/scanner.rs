//! The lexical scanner shared by N-Triples, Turtle and TriG.
//!
//! The scanner works on a byte window and never looks at parser state: it
//! returns raw lexemes (IRI references are neither resolved nor validated
//! here, that is grammar business) together with how many bytes they took.

use std::borrow::Cow;
use std::fmt;
use std::str;

/// Punctuation lexemes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum Mark {
    Dot,
    Comma,
    Semicolon,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    DoubleCaret,
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dot => ".",
            Self::Comma => ",",
            Self::Semicolon => ";",
            Self::OpenParen => "(",
            Self::CloseParen => ")",
            Self::OpenBracket => "[",
            Self::CloseBracket => "]",
            Self::OpenBrace => "{",
            Self::CloseBrace => "}",
            Self::DoubleCaret => "^^",
        })
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum NumberKind {
    Integer,
    Decimal,
    Double,
}

/// One lexeme of the terse syntaxes.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Lexeme<'a> {
    /// The body of a `<...>` reference, escapes applied, possibly relative.
    Iri(Cow<'a, str>),
    /// `prefix:local`; `needs_check` is set when the local part contains
    /// characters that may not form a valid IRI after expansion.
    Prefixed {
        prefix: &'a str,
        local: Cow<'a, str>,
        needs_check: bool,
    },
    /// The label of `_:label`.
    BlankLabel(&'a str),
    /// A quoted string, escapes applied.
    Text(String),
    Number {
        lexical: &'a str,
        kind: NumberKind,
    },
    /// The word after `@`: a language tag or the `prefix`/`base` directives.
    At(&'a str),
    /// A bare word: `a`, `true`, `false`, `PREFIX`, `BASE`, `GRAPH`.
    Word(&'a str),
    Mark(Mark),
}

/// The outcome of one scanning attempt.
#[derive(Debug)]
pub(crate) enum Scan<'a> {
    Lexeme {
        consumed: usize,
        lexeme: Lexeme<'a>,
    },
    /// A malformed token; `consumed` bytes should be dropped.
    Trouble {
        consumed: usize,
        message: String,
    },
    /// The window ends in the middle of a token, more bytes are needed.
    Incomplete,
}

fn trouble<'a>(consumed: usize, message: impl Into<String>) -> Scan<'a> {
    Scan::Trouble {
        consumed,
        message: message.into(),
    }
}

#[derive(Clone, Copy)]
pub(crate) struct TerseScanner {
    /// Turtle-family extras: `'...'` strings and triple-quoted long strings.
    pub turtle_strings: bool,
}

impl TerseScanner {
    /// Scans the lexeme at the start of `input`, which must not begin with
    /// whitespace or a comment.
    pub fn scan<'a>(&self, input: &'a [u8], at_end: bool) -> Scan<'a> {
        let Some(&first) = input.first() else {
            return Scan::Incomplete;
        };
        match first {
            b'<' => scan_iri_ref(input, at_end),
            b'"' => self.scan_text(input, at_end, b'"'),
            b'\'' if self.turtle_strings => self.scan_text(input, at_end, b'\''),
            b'\'' => trouble(1, "single-quoted strings are not allowed here"),
            b'_' => scan_blank_label(input, at_end),
            b'@' => scan_at_word(input, at_end),
            b'^' => match input.get(1) {
                Some(b'^') => lexeme(2, Lexeme::Mark(Mark::DoubleCaret)),
                Some(_) => trouble(1, "'^' must be doubled as '^^'"),
                None if at_end => trouble(1, "'^' must be doubled as '^^'"),
                None => Scan::Incomplete,
            },
            b'.' => match input.get(1) {
                Some(d) if d.is_ascii_digit() => scan_number(input, at_end),
                Some(_) => lexeme(1, Lexeme::Mark(Mark::Dot)),
                None if at_end => lexeme(1, Lexeme::Mark(Mark::Dot)),
                None => Scan::Incomplete,
            },
            b',' => lexeme(1, Lexeme::Mark(Mark::Comma)),
            b';' => lexeme(1, Lexeme::Mark(Mark::Semicolon)),
            b'(' => lexeme(1, Lexeme::Mark(Mark::OpenParen)),
            b')' => lexeme(1, Lexeme::Mark(Mark::CloseParen)),
            b'[' => lexeme(1, Lexeme::Mark(Mark::OpenBracket)),
            b']' => lexeme(1, Lexeme::Mark(Mark::CloseBracket)),
            b'{' => lexeme(1, Lexeme::Mark(Mark::OpenBrace)),
            b'}' => lexeme(1, Lexeme::Mark(Mark::CloseBrace)),
            b'0'..=b'9' | b'+' | b'-' => scan_number(input, at_end),
            _ => scan_prefixed_or_word(input, at_end),
        }
    }

    fn scan_text<'a>(&self, input: &'a [u8], at_end: bool, quote: u8) -> Scan<'a> {
        if self.turtle_strings && input.get(1) == Some(&quote) {
            return match input.get(2) {
                Some(&b) if b == quote => scan_long_text(input, at_end, quote),
                Some(_) => lexeme(2, Lexeme::Text(String::new())),
                None if at_end => lexeme(2, Lexeme::Text(String::new())),
                None => Scan::Incomplete,
            };
        }
        scan_short_text(input, at_end, quote)
    }
}

fn lexeme(consumed: usize, lexeme: Lexeme<'_>) -> Scan<'_> {
    Scan::Lexeme { consumed, lexeme }
}

// [18] IRIREF ::= '<' ([^#x00-#x20<>"{}|^`\] | UCHAR)* '>'
fn scan_iri_ref<'a>(input: &'a [u8], at_end: bool) -> Scan<'a> {
    let mut buffer: Option<Vec<u8>> = None;
    let mut plain_from = 1;
    let mut i = 1;
    loop {
        let Some(&b) = input.get(i) else {
            return if at_end {
                trouble(input.len(), "unterminated IRI reference")
            } else {
                Scan::Incomplete
            };
        };
        match b {
            b'>' => {
                let consumed = i + 1;
                return match buffer.take() {
                    Some(mut bytes) => {
                        bytes.extend_from_slice(&input[plain_from..i]);
                        match String::from_utf8(bytes) {
                            Ok(s) => lexeme(consumed, Lexeme::Iri(Cow::Owned(s))),
                            Err(_) => trouble(consumed, "the IRI is not valid UTF-8"),
                        }
                    }
                    None => match str::from_utf8(&input[1..i]) {
                        Ok(s) => lexeme(consumed, Lexeme::Iri(Cow::Borrowed(s))),
                        Err(_) => trouble(consumed, "the IRI is not valid UTF-8"),
                    },
                };
            }
            b'\\' => {
                let bytes = buffer.get_or_insert_with(Vec::new);
                bytes.extend_from_slice(&input[plain_from..i]);
                match decode_escape(input, i, false) {
                    Ok(Some((c, width))) => {
                        let mut utf8 = [0; 4];
                        bytes.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
                        i += width;
                        plain_from = i;
                    }
                    Ok(None) if at_end => return trouble(input.len(), "unterminated escape"),
                    Ok(None) => return Scan::Incomplete,
                    Err(message) => return Scan::Trouble {
                        consumed: i + 2,
                        message,
                    },
                }
            }
            b'\0'..=b' ' => return trouble(i + 1, "whitespace is not allowed inside an IRI"),
            _ => i += 1,
        }
    }
}

// [22] STRING_LITERAL_QUOTE, [23] STRING_LITERAL_SINGLE_QUOTE
fn scan_short_text<'a>(input: &'a [u8], at_end: bool, quote: u8) -> Scan<'a> {
    let mut text = String::new();
    let mut i = 1;
    loop {
        let Some(&b) = input.get(i) else {
            return if at_end {
                trouble(input.len(), "unterminated string")
            } else {
                Scan::Incomplete
            };
        };
        if b == quote {
            return lexeme(i + 1, Lexeme::Text(text));
        }
        match b {
            b'\n' | b'\r' => return trouble(i, "a string must stay on one line"),
            b'\\' => match decode_escape(input, i, true) {
                Ok(Some((c, width))) => {
                    text.push(c);
                    i += width;
                }
                Ok(None) if at_end => return trouble(input.len(), "unterminated escape"),
                Ok(None) => return Scan::Incomplete,
                Err(message) => return Scan::Trouble {
                    consumed: i + 2,
                    message,
                },
            },
            _ => match next_char(input, i) {
                Some(Ok((c, width))) => {
                    text.push(c);
                    i += width;
                }
                Some(Err(message)) => return Scan::Trouble {
                    consumed: i + 1,
                    message,
                },
                None if at_end => return trouble(input.len(), "truncated UTF-8 character"),
                None => return Scan::Incomplete,
            },
        }
    }
}

// [24] STRING_LITERAL_LONG_QUOTE, [25] STRING_LITERAL_LONG_SINGLE_QUOTE
fn scan_long_text<'a>(input: &'a [u8], at_end: bool, quote: u8) -> Scan<'a> {
    let mut text = String::new();
    let mut i = 3;
    loop {
        let Some(&b) = input.get(i) else {
            return if at_end {
                trouble(input.len(), "unterminated long string")
            } else {
                Scan::Incomplete
            };
        };
        if b == quote {
            let mut run = 1;
            while input.get(i + run) == Some(&quote) {
                run += 1;
            }
            if i + run == input.len() && !at_end {
                return Scan::Incomplete; // the quote run may continue
            }
            if run >= 3 {
                // all but the closing three belong to the content
                for _ in 0..run - 3 {
                    text.push(char::from(quote));
                }
                return lexeme(i + run, Lexeme::Text(text));
            }
            for _ in 0..run {
                text.push(char::from(quote));
            }
            i += run;
            continue;
        }
        match b {
            b'\\' => match decode_escape(input, i, true) {
                Ok(Some((c, width))) => {
                    text.push(c);
                    i += width;
                }
                Ok(None) if at_end => return trouble(input.len(), "unterminated escape"),
                Ok(None) => return Scan::Incomplete,
                Err(message) => return Scan::Trouble {
                    consumed: i + 2,
                    message,
                },
            },
            _ => match next_char(input, i) {
                Some(Ok((c, width))) => {
                    text.push(c);
                    i += width;
                }
                Some(Err(message)) => return Scan::Trouble {
                    consumed: i + 1,
                    message,
                },
                None if at_end => return trouble(input.len(), "truncated UTF-8 character"),
                None => return Scan::Incomplete,
            },
        }
    }
}

// [141s] BLANK_NODE_LABEL ::= '_:' (PN_CHARS_U | [0-9]) ((PN_CHARS | '.')* PN_CHARS)?
fn scan_blank_label<'a>(input: &'a [u8], at_end: bool) -> Scan<'a> {
    match input.get(1) {
        Some(b':') => (),
        Some(_) => return trouble(1, "'_' must start a '_:' blank node label"),
        None if at_end => return trouble(1, "'_' must start a '_:' blank node label"),
        None => return Scan::Incomplete,
    }
    let mut i = 2;
    let mut end = 2; // end of the label, trailing dots excluded
    loop {
        match next_char(input, i) {
            None if at_end => break,
            None => return Scan::Incomplete,
            Some(Err(message)) => return Scan::Trouble {
                consumed: i + 1,
                message,
            },
            Some(Ok((c, width))) => {
                let accepted = if i == 2 {
                    is_pn_chars_u(c) || c.is_ascii_digit()
                } else {
                    is_pn_chars(c) || c == '.'
                };
                if !accepted {
                    break;
                }
                i += width;
                if c != '.' {
                    end = i;
                }
            }
        }
    }
    if end == 2 {
        return trouble(2, "a blank node label cannot be empty");
    }
    match str::from_utf8(&input[2..end]) {
        Ok(label) => lexeme(end, Lexeme::BlankLabel(label)),
        Err(_) => trouble(end, "the blank node label is not valid UTF-8"),
    }
}

// '@' followed by a language tag or a directive word; validation is left to
// the grammar, which knows which one it expects.
fn scan_at_word<'a>(input: &'a [u8], at_end: bool) -> Scan<'a> {
    let mut i = 1;
    while let Some(&b) = input.get(i) {
        if b.is_ascii_alphanumeric() || b == b'-' {
            i += 1;
        } else {
            break;
        }
    }
    if i == input.len() && !at_end {
        return Scan::Incomplete;
    }
    if i == 1 {
        return trouble(1, "'@' must be followed by a language tag or directive");
    }
    match str::from_utf8(&input[1..i]) {
        Ok(word) => lexeme(i, Lexeme::At(word)),
        Err(_) => trouble(i, "the language tag is not valid UTF-8"),
    }
}

// [19] INTEGER, [20] DECIMAL, [21] DOUBLE
fn scan_number<'a>(input: &'a [u8], at_end: bool) -> Scan<'a> {
    let mut i = 0;
    if matches!(input.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let whole = count_digits(input, i);
    i += whole;
    let mut kind = NumberKind::Integer;
    if input.get(i) == Some(&b'.') {
        if i + 1 == input.len() && !at_end {
            return Scan::Incomplete; // fraction digits may follow
        }
        let fraction = count_digits(input, i + 1);
        if fraction > 0 {
            kind = NumberKind::Decimal;
            i += 1 + fraction;
        }
    }
    if matches!(input.get(i), Some(b'e' | b'E')) && (whole > 0 || kind == NumberKind::Decimal) {
        let mut j = i + 1;
        if matches!(input.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        if j >= input.len() && !at_end {
            return Scan::Incomplete;
        }
        let exponent = count_digits(input, j);
        if exponent == 0 {
            return trouble(j, "an exponent needs at least one digit");
        }
        i = j + exponent;
        kind = NumberKind::Double;
    }
    if i == input.len() && !at_end {
        return Scan::Incomplete; // more digits may follow
    }
    if whole == 0 && kind == NumberKind::Integer {
        return trouble(i.max(1), "a number needs at least one digit");
    }
    match str::from_utf8(&input[..i]) {
        Ok(lexical) => lexeme(i, Lexeme::Number { lexical, kind }),
        Err(_) => trouble(i, "the number is not valid UTF-8"),
    }
}

fn count_digits(input: &[u8], from: usize) -> usize {
    input[from.min(input.len())..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count()
}

// [139s] PNAME_NS, [140s] PNAME_LN, or a bare keyword
fn scan_prefixed_or_word<'a>(input: &'a [u8], at_end: bool) -> Scan<'a> {
    let mut i = 0;
    let mut end = 0; // word end, trailing dots excluded
    loop {
        match next_char(input, i) {
            None if at_end => break,
            None => return Scan::Incomplete,
            Some(Err(message)) => return Scan::Trouble {
                consumed: i + 1,
                message,
            },
            Some(Ok((':', _))) => {
                if i != end {
                    return trouble(i, "a prefix cannot end with '.'");
                }
                return scan_local(input, i, at_end);
            }
            Some(Ok((c, width))) => {
                let accepted = if i == 0 {
                    is_pn_chars_base(c)
                } else {
                    is_pn_chars(c) || c == '.'
                };
                if !accepted {
                    break;
                }
                i += width;
                if c != '.' {
                    end = i;
                }
            }
        }
    }
    if end == 0 {
        return trouble(1, unexpected_byte(input.first().copied()));
    }
    match str::from_utf8(&input[..end]) {
        Ok(word) => lexeme(end, Lexeme::Word(word)),
        Err(_) => trouble(end, "the keyword is not valid UTF-8"),
    }
}

fn unexpected_byte(b: Option<u8>) -> String {
    match b {
        Some(b) if b.is_ascii_graphic() => format!("unexpected character '{}'", char::from(b)),
        Some(b) => format!("unexpected byte 0x{b:02X}"),
        None => "unexpected end of input".to_owned(),
    }
}

// [168s] PN_LOCAL, with '%XX' kept verbatim and '\x' escapes applied
fn scan_local<'a>(input: &'a [u8], colon: usize, at_end: bool) -> Scan<'a> {
    let Ok(prefix) = str::from_utf8(&input[..colon]) else {
        return trouble(colon + 1, "the prefix is not valid UTF-8");
    };
    let start = colon + 1;
    let mut i = start;
    let mut end = start; // local end, trailing dots excluded
    let mut has_escapes = false;
    let mut needs_check = false;
    loop {
        match input.get(i) {
            None if at_end => break,
            None => return Scan::Incomplete,
            Some(b'%') => {
                if i + 2 >= input.len() && !at_end {
                    return Scan::Incomplete;
                }
                let valid = matches!(
                    (input.get(i + 1), input.get(i + 2)),
                    (Some(a), Some(b)) if a.is_ascii_hexdigit() && b.is_ascii_hexdigit()
                );
                if !valid {
                    return trouble(i + 1, "'%' must be followed by two hexadecimal digits");
                }
                i += 3;
                end = i;
            }
            Some(b'\\') => {
                let Some(&escaped) = input.get(i + 1) else {
                    return if at_end {
                        trouble(input.len(), "unterminated escape")
                    } else {
                        Scan::Incomplete
                    };
                };
                match escaped {
                    b'_' | b'~' | b'.' | b'-' | b'!' | b'$' | b'&' | b'\'' | b'(' | b')'
                    | b'*' | b'+' | b',' | b';' | b'=' => (),
                    b'/' | b'?' | b'#' | b'@' | b'%' => needs_check = true,
                    other => {
                        return trouble(
                            i + 2,
                            format!("'{}' cannot be escaped in a local name", char::from(other)),
                        );
                    }
                }
                has_escapes = true;
                i += 2;
                end = i;
            }
            Some(_) => match next_char(input, i) {
                Some(Ok((c, width))) => {
                    let accepted = if i == start {
                        is_pn_chars_u(c) || c == ':' || c.is_ascii_digit()
                    } else {
                        is_pn_chars(c) || c == ':' || c == '.'
                    };
                    if !accepted {
                        break;
                    }
                    needs_check |= c == ':' || may_break_iri(c);
                    i += width;
                    if c != '.' {
                        end = i;
                    }
                }
                Some(Err(message)) => return Scan::Trouble {
                    consumed: i + 1,
                    message,
                },
                None if at_end => return trouble(input.len(), "truncated UTF-8 character"),
                None => return Scan::Incomplete,
            },
        }
    }
    let local = if has_escapes {
        let mut bytes = Vec::with_capacity(end - start);
        let mut j = start;
        while j < end {
            if input[j] == b'\\' {
                bytes.push(input[j + 1]);
                j += 2;
            } else {
                bytes.push(input[j]);
                j += 1;
            }
        }
        match String::from_utf8(bytes) {
            Ok(s) => Cow::Owned(s),
            Err(_) => return trouble(end, "the local name is not valid UTF-8"),
        }
    } else {
        match str::from_utf8(&input[start..end]) {
            Ok(s) => Cow::Borrowed(s),
            Err(_) => return trouble(end, "the local name is not valid UTF-8"),
        }
    };
    lexeme(
        end,
        Lexeme::Prefixed {
            prefix,
            local,
            needs_check,
        },
    )
}

/// Decodes the escape starting at the `\` on position `i`: `\u`/`\U`
/// character escapes always, the string escapes only when `string_escapes`
/// is set. `Ok(None)` means the window is too short.
fn decode_escape(
    input: &[u8],
    i: usize,
    string_escapes: bool,
) -> Result<Option<(char, usize)>, String> {
    let Some(&kind) = input.get(i + 1) else {
        return Ok(None);
    };
    let digits = match kind {
        b'u' => 4,
        b'U' => 8,
        _ if string_escapes => {
            let c = match kind {
                b't' => '\t',
                b'b' => '\u{8}',
                b'n' => '\n',
                b'r' => '\r',
                b'f' => '\u{C}',
                b'"' => '"',
                b'\'' => '\'',
                b'\\' => '\\',
                other => return Err(format!("unknown escape '\\{}'", char::from(other))),
            };
            return Ok(Some((c, 2)));
        }
        other => return Err(format!("'\\{}' is not allowed here", char::from(other))),
    };
    if input.len() < i + 2 + digits {
        return Ok(None);
    }
    let mut value: u32 = 0;
    for &digit in &input[i + 2..i + 2 + digits] {
        let nibble = match digit {
            b'0'..=b'9' => digit - b'0',
            b'a'..=b'f' => digit - b'a' + 10,
            b'A'..=b'F' => digit - b'A' + 10,
            _ => {
                return Err(format!(
                    "'{}' is not a hexadecimal digit",
                    char::from(digit)
                ));
            }
        };
        value = (value << 4) | u32::from(nibble);
    }
    match char::from_u32(value) {
        Some(c) => Ok(Some((c, digits + 2))),
        None => Err(format!("U+{value:X} is not a Unicode scalar value")),
    }
}

/// Decodes the UTF-8 character starting at `i`. `None` means the window
/// ends in the middle of the character.
fn next_char(input: &[u8], i: usize) -> Option<Result<(char, usize), String>> {
    let b = *input.get(i)?;
    if b < 0x80 {
        return Some(Ok((char::from(b), 1)));
    }
    let width = match b {
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return Some(Err(format!("invalid UTF-8 start byte 0x{b:02X}"))),
    };
    if input.len() < i + width {
        return None;
    }
    match str::from_utf8(&input[i..i + width]) {
        Ok(s) => Some(Ok((s.chars().next().unwrap_or('\u{FFFD}'), width))),
        Err(_) => Some(Err("invalid UTF-8 sequence".to_owned())),
    }
}

// [163s] PN_CHARS_BASE
pub(crate) fn is_pn_chars_base(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(u32::from(c),
            0xC0..=0xD6
            | 0xD8..=0xF6
            | 0xF8..=0x2FF
            | 0x370..=0x37D
            | 0x37F..=0x1FFF
            | 0x200C..=0x200D
            | 0x2070..=0x218F
            | 0x2C00..=0x2FEF
            | 0x3001..=0xD7FF
            | 0xF900..=0xFDCF
            | 0xFDF0..=0xFFFD
            | 0x10000..=0xEFFFF)
}

// [164s] PN_CHARS_U
pub(crate) fn is_pn_chars_u(c: char) -> bool {
    c == '_' || is_pn_chars_base(c)
}

// [166s] PN_CHARS
pub(crate) fn is_pn_chars(c: char) -> bool {
    c == '-'
        || c.is_ascii_digit()
        || is_pn_chars_u(c)
        || matches!(u32::from(c), 0xB7 | 0x300..=0x36F | 0x203F..=0x2040)
}

/// Unicode specials and noncharacters: allowed in prefixed names but not in
/// IRIs, so an expansion containing them must be re-validated.
fn may_break_iri(c: char) -> bool {
    let c = u32::from(c);
    (0xFFF0..=0xFFFD).contains(&c) || c & 0xFFFE == 0xFFFE
}

#[cfg(test)]
mod tests {
    use super::*;

    const TURTLE: TerseScanner = TerseScanner {
        turtle_strings: true,
    };

    fn one(input: &str) -> Lexeme<'_> {
        match TURTLE.scan(input.as_bytes(), true) {
            Scan::Lexeme { lexeme, .. } => lexeme,
            other => panic!("expected a lexeme, got {other:?}"),
        }
    }

    #[test]
    fn iri_references() {
        assert_eq!(one("<http://ex/a> ."), Lexeme::Iri(Cow::Borrowed("http://ex/a")));
        assert_eq!(
            one("<http://ex/\\u00E9>"),
            Lexeme::Iri(Cow::Owned("http://ex/é".to_owned()))
        );
    }

    #[test]
    fn strings_and_escapes() {
        assert_eq!(one(r#""a\tb""#), Lexeme::Text("a\tb".to_owned()));
        assert_eq!(one("'x'"), Lexeme::Text("x".to_owned()));
        assert_eq!(
            one("\"\"\"two\nlines\"\"\""),
            Lexeme::Text("two\nlines".to_owned())
        );
        assert_eq!(one("\"\"\"a\"\"quote\"\"\""), Lexeme::Text("a\"\"quote".to_owned()));
        assert!(matches!(
            TURTLE.scan(b"\"broken\nline\"", true),
            Scan::Trouble { .. }
        ));
    }

    #[test]
    fn prefixed_names() {
        assert_eq!(
            one("ex:alice "),
            Lexeme::Prefixed {
                prefix: "ex",
                local: Cow::Borrowed("alice"),
                needs_check: false,
            }
        );
        // trailing dot stays outside of the local name
        assert_eq!(
            one("ex:alice."),
            Lexeme::Prefixed {
                prefix: "ex",
                local: Cow::Borrowed("alice"),
                needs_check: false,
            }
        );
        assert_eq!(
            one(r"ex:a\,b "),
            Lexeme::Prefixed {
                prefix: "ex",
                local: Cow::Owned("a,b".to_owned()),
                needs_check: false,
            }
        );
    }

    #[test]
    fn numbers() {
        assert!(matches!(
            one("42 "),
            Lexeme::Number { lexical: "42", kind: NumberKind::Integer }
        ));
        assert!(matches!(
            one("-3.14 "),
            Lexeme::Number { lexical: "-3.14", kind: NumberKind::Decimal }
        ));
        assert!(matches!(
            one("1e6 "),
            Lexeme::Number { lexical: "1e6", kind: NumberKind::Double }
        ));
        // a dot with no digit after it terminates the statement instead
        assert!(matches!(one("5. "), Lexeme::Number { lexical: "5", .. }));
    }

    #[test]
    fn incomplete_windows_ask_for_more() {
        assert!(matches!(TURTLE.scan(b"<http://unfinished", false), Scan::Incomplete));
        assert!(matches!(TURTLE.scan(b"\"partial", false), Scan::Incomplete));
        assert!(matches!(TURTLE.scan(b"123", false), Scan::Incomplete));
        assert!(matches!(TURTLE.scan(b"word", false), Scan::Incomplete));
    }
}
