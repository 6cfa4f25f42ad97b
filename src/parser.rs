//! Grammar-driven syntax tree construction.
//!
//! [`Parser`] consumes the token stream and builds a [`Node`] tree whose
//! variants mirror the grammar one-to-one. The tree is immutable once built
//! and owns its children exclusively; the normalizer walks it afterwards.
//!
//! Because `-` and `_` are bare-key characters while `.`, `:`, and `+` are
//! punctuators, several scalar literals arrive split across tokens
//! (`3.14` → `3` `.` `14`, `5e+22` → `5e` `+` `22`, `07:32:00` →
//! `07` `:` `32` `:` `00`). The parser reassembles those lexemes before
//! classifying and converting them.

use crate::datetime::parse_offset_date_time;
use crate::error::{Error, Result};
use crate::tokenizer::{Token, TokenKind, Tokenizer};
use chrono::{DateTime, FixedOffset};

/// A syntax tree node; one variant per grammar production.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    RootTable {
        elements: Vec<Node>,
    },
    /// One or more dot-separated key segments, each a `Bare` or `String`
    /// node, in source order.
    Key {
        segments: Vec<Node>,
    },
    KeyValuePair {
        key: Box<Node>,
        value: Box<Node>,
    },
    /// `[key]` header plus the key-value pairs up to the next header.
    Table {
        key: Box<Node>,
        elements: Vec<Node>,
    },
    /// `[[key]]` header plus the key-value pairs up to the next header.
    ArrayTable {
        key: Box<Node>,
        elements: Vec<Node>,
    },
    InlineTable {
        elements: Vec<Node>,
    },
    Array {
        elements: Vec<Node>,
    },
    Bare(String),
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    OffsetDateTime(DateTime<FixedOffset>),
    LocalDateTime(crate::LocalDateTime),
    LocalDate(crate::LocalDate),
    LocalTime(crate::LocalTime),
}

pub(crate) struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Parser {
            tokenizer: Tokenizer::new(input),
        }
    }

    /// Parses a whole document into a `RootTable` node.
    ///
    /// A document is a sequence of newline-separated entries: key-value
    /// pairs, `[table]` headers, `[[array-table]]` headers, and blank or
    /// comment-only lines. Pairs following a header become that header's
    /// elements; pairs before the first header belong to the root.
    pub fn parse(mut self) -> Result<Node> {
        let mut elements: Vec<Node> = Vec::new();
        loop {
            self.tokenizer.take(&[TokenKind::Whitespace])?;
            let token = self.tokenizer.peek()?;
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Newline => {
                    self.tokenizer.next_token()?;
                }
                TokenKind::Comment => {
                    self.tokenizer.next_token()?;
                    self.line_break()?;
                }
                TokenKind::LeftSquareBracket => {
                    self.tokenizer.next_token()?;
                    let header = self.table_header()?;
                    self.end_of_line()?;
                    elements.push(header);
                }
                TokenKind::Bare | TokenKind::String => {
                    let pair = self.key_value_pair()?;
                    self.end_of_line()?;
                    match elements.last_mut() {
                        Some(Node::Table { elements: body, .. })
                        | Some(Node::ArrayTable { elements: body, .. }) => body.push(pair),
                        _ => elements.push(pair),
                    }
                }
                kind => {
                    return Err(Error::decode(format!(
                        "expected a key-value pair or table header, found {kind:?}"
                    )));
                }
            }
        }
        Ok(Node::RootTable { elements })
    }

    /// Consumes the newline (or end of input) terminating the current line.
    fn line_break(&mut self) -> Result<()> {
        let token = self.tokenizer.next_token()?;
        match token.kind {
            TokenKind::Newline | TokenKind::Eof => Ok(()),
            kind => Err(Error::decode(format!(
                "expected end of line, found {kind:?}"
            ))),
        }
    }

    /// Consumes optional trailing whitespace and a comment, then the line
    /// terminator.
    fn end_of_line(&mut self) -> Result<()> {
        self.tokenizer.take(&[TokenKind::Whitespace])?;
        self.tokenizer.take(&[TokenKind::Comment])?;
        self.line_break()
    }

    /// Parses a `[key]` or `[[key]]` header; the first `[` has been
    /// consumed.
    fn table_header(&mut self) -> Result<Node> {
        let is_array_table = self.tokenizer.take(&[TokenKind::LeftSquareBracket])?;
        let key = Box::new(self.key()?);
        self.tokenizer.expect(TokenKind::RightSquareBracket)?;
        if is_array_table {
            self.tokenizer.expect(TokenKind::RightSquareBracket)?;
        }
        Ok(if is_array_table {
            Node::ArrayTable {
                key,
                elements: Vec::new(),
            }
        } else {
            Node::Table {
                key,
                elements: Vec::new(),
            }
        })
    }

    fn key_value_pair(&mut self) -> Result<Node> {
        let key = self.key()?;
        self.tokenizer.expect(TokenKind::Equals)?;
        self.tokenizer.take(&[TokenKind::Whitespace])?;
        let value = self.value()?;
        Ok(Node::KeyValuePair {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    /// Parses a dotted key. Whitespace is permitted around the dots.
    fn key(&mut self) -> Result<Node> {
        let mut segments = Vec::new();
        loop {
            self.tokenizer.take(&[TokenKind::Whitespace])?;
            let token = self.tokenizer.next_token()?;
            segments.push(key_segment(token)?);
            self.tokenizer.take(&[TokenKind::Whitespace])?;
            if !self.tokenizer.take(&[TokenKind::Period])? {
                break;
            }
        }
        Ok(Node::Key { segments })
    }

    fn value(&mut self) -> Result<Node> {
        let token = self.tokenizer.next_token()?;
        match token.kind {
            TokenKind::String => Ok(Node::String(token.value)),
            TokenKind::LeftSquareBracket => self.array(),
            TokenKind::LeftCurlyBracket => self.inline_table(),
            TokenKind::Plus => {
                let digits = self.tokenizer.expect(TokenKind::Bare)?;
                self.number("+", digits.value)
            }
            TokenKind::Bare => self.scalar(token.value),
            kind => Err(Error::decode(format!("expected a value, found {kind:?}"))),
        }
    }

    /// Classifies an unsigned bare lexeme in value position: boolean,
    /// temporal, or numeric.
    fn scalar(&mut self, lexeme: String) -> Result<Node> {
        match lexeme.as_str() {
            "true" => return Ok(Node::Boolean(true)),
            "false" => return Ok(Node::Boolean(false)),
            _ => {}
        }
        if starts_with_full_date(&lexeme) {
            return self.date_time(lexeme);
        }
        if lexeme.len() == 2
            && lexeme.bytes().all(|b| b.is_ascii_digit())
            && self.tokenizer.peek()?.kind == TokenKind::Colon
        {
            return self.time_suffix(lexeme);
        }
        self.number("", lexeme)
    }

    /// Continues a value whose first lexeme opens with a `YYYY-MM-DD`
    /// calendar date.
    fn date_time(&mut self, mut lexeme: String) -> Result<Node> {
        if lexeme.len() == 10 {
            // A plain local date, unless a space-separated clock time
            // follows on the same line.
            if self.tokenizer.take(&[TokenKind::Whitespace])? {
                let follow = self.tokenizer.peek()?;
                if follow.kind == TokenKind::Bare
                    && follow.value.len() == 2
                    && follow.value.bytes().all(|b| b.is_ascii_digit())
                {
                    self.tokenizer.next_token()?;
                    lexeme.push(' ');
                    lexeme.push_str(&follow.value);
                    return self.time_suffix(lexeme);
                }
            }
            return Ok(Node::LocalDate(lexeme.parse()?));
        }
        if !matches!(lexeme.as_bytes().get(10), Some(b'T' | b't')) {
            return Err(Error::decode(format!("invalid date-time \"{lexeme}\"")));
        }
        self.time_suffix(lexeme)
    }

    /// Assembles the rest of a clock time (and a possible zone offset)
    /// starting after the hour digits, then classifies the full lexeme.
    ///
    /// `:` and `+` are punctuators and `-` hides inside bare lexemes, so
    /// the pieces arrive as: `MM`, `SS` (possibly carrying `Z` or a
    /// negative offset hour), an optional fraction, an optional positive
    /// offset hour, and an optional offset minute.
    fn time_suffix(&mut self, mut lexeme: String) -> Result<Node> {
        self.tokenizer.expect(TokenKind::Colon)?;
        lexeme.push(':');
        lexeme.push_str(&self.tokenizer.expect(TokenKind::Bare)?.value);
        self.tokenizer.expect(TokenKind::Colon)?;
        lexeme.push(':');
        lexeme.push_str(&self.tokenizer.expect(TokenKind::Bare)?.value);
        if self.tokenizer.take(&[TokenKind::Period])? {
            lexeme.push('.');
            lexeme.push_str(&self.tokenizer.expect(TokenKind::Bare)?.value);
        }
        if self.tokenizer.take(&[TokenKind::Plus])? {
            lexeme.push('+');
            lexeme.push_str(&self.tokenizer.expect(TokenKind::Bare)?.value);
        }
        if self.tokenizer.take(&[TokenKind::Colon])? {
            lexeme.push(':');
            lexeme.push_str(&self.tokenizer.expect(TokenKind::Bare)?.value);
        }
        temporal(lexeme)
    }

    /// Reassembles and parses an integer or float. `sign` is `"+"` when the
    /// leading plus arrived as its own token, otherwise empty (`-` is part
    /// of the bare lexeme already).
    fn number(&mut self, sign: &str, first: String) -> Result<Node> {
        let mut lexeme = String::with_capacity(sign.len() + first.len());
        lexeme.push_str(sign);
        lexeme.push_str(&first);
        if self.tokenizer.take(&[TokenKind::Period])? {
            lexeme.push('.');
            lexeme.push_str(&self.tokenizer.expect(TokenKind::Bare)?.value);
        }
        // A positive exponent sign is its own token; stitch it back on.
        if (lexeme.ends_with('e') || lexeme.ends_with('E'))
            && self.tokenizer.take(&[TokenKind::Plus])?
        {
            lexeme.push('+');
            lexeme.push_str(&self.tokenizer.expect(TokenKind::Bare)?.value);
        }
        parse_number(&lexeme)
    }

    /// Parses the elements of an array; the `[` has been consumed.
    /// Newlines, comments, and a trailing comma are all permitted inside.
    fn array(&mut self) -> Result<Node> {
        let mut elements = Vec::new();
        loop {
            self.skip_array_trivia()?;
            if self.tokenizer.take(&[TokenKind::RightSquareBracket])? {
                break;
            }
            elements.push(self.value()?);
            self.skip_array_trivia()?;
            if !self.tokenizer.take(&[TokenKind::Comma])? {
                self.tokenizer.expect(TokenKind::RightSquareBracket)?;
                break;
            }
        }
        Ok(Node::Array { elements })
    }

    fn skip_array_trivia(&mut self) -> Result<()> {
        while self.tokenizer.take(&[
            TokenKind::Whitespace,
            TokenKind::Newline,
            TokenKind::Comment,
        ])? {}
        Ok(())
    }

    /// Parses the entries of an inline table; the `{` has been consumed.
    /// Everything stays on one line and a trailing comma is not allowed.
    fn inline_table(&mut self) -> Result<Node> {
        self.tokenizer.take(&[TokenKind::Whitespace])?;
        let mut elements = Vec::new();
        if self.tokenizer.take(&[TokenKind::RightCurlyBracket])? {
            return Ok(Node::InlineTable { elements });
        }
        loop {
            elements.push(self.key_value_pair()?);
            self.tokenizer.take(&[TokenKind::Whitespace])?;
            if self.tokenizer.take(&[TokenKind::Comma])? {
                continue;
            }
            self.tokenizer.expect(TokenKind::RightCurlyBracket)?;
            break;
        }
        Ok(Node::InlineTable { elements })
    }
}

fn key_segment(token: Token) -> Result<Node> {
    match token.kind {
        TokenKind::Bare => Ok(Node::Bare(token.value)),
        TokenKind::String if !token.multiline => Ok(Node::String(token.value)),
        TokenKind::String => Err(Error::decode("multiline strings cannot be used as keys")),
        kind => Err(Error::decode(format!("expected a key, found {kind:?}"))),
    }
}

/// `true` if `s` opens with a complete `YYYY-MM-DD` shape.
fn starts_with_full_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit)
}

/// Classifies a fully assembled temporal lexeme into one of the four
/// temporal node kinds and validates it.
fn temporal(lexeme: String) -> Result<Node> {
    if starts_with_full_date(&lexeme) {
        let time = &lexeme[11..];
        if time.ends_with(['Z', 'z']) || time.contains(['+', '-']) {
            Ok(Node::OffsetDateTime(parse_offset_date_time(&lexeme)?))
        } else {
            Ok(Node::LocalDateTime(lexeme.parse()?))
        }
    } else {
        Ok(Node::LocalTime(lexeme.parse()?))
    }
}

/// `true` if `s` is nonempty, made of `radix` digits and `_`, with at
/// least one digit.
fn is_digit_run(s: &str, radix: u32) -> bool {
    !s.is_empty() && s.chars().all(|c| c == '_' || c.is_digit(radix)) && s.chars().any(|c| c != '_')
}

fn parse_radix_digits(digits: &str, radix: u32, lexeme: &str) -> Result<i64> {
    if !is_digit_run(digits, radix) {
        return Err(Error::decode(format!("invalid value \"{lexeme}\"")));
    }
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    i64::from_str_radix(&cleaned, radix)
        .map_err(|_| Error::decode(format!("integer \"{lexeme}\" is out of range")))
}

fn parse_float(lexeme: &str, unsigned: &str) -> Result<Node> {
    let invalid = || Error::decode(format!("invalid value \"{lexeme}\""));

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], Some(&unsigned[at + 1..])),
        None => (unsigned, None),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (mantissa, None),
    };

    if !is_digit_run(int_part, 10) {
        return Err(invalid());
    }
    if let Some(frac) = frac_part {
        if !is_digit_run(frac, 10) {
            return Err(invalid());
        }
    }
    if let Some(exp) = exponent {
        let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        if !is_digit_run(digits, 10) {
            return Err(invalid());
        }
    }

    let cleaned: String = lexeme.chars().filter(|c| *c != '_').collect();
    cleaned
        .parse::<f64>()
        .map(Node::Float)
        .map_err(|_| invalid())
}

/// Parses a fully assembled numeric lexeme: decimal, hex, octal, or binary
/// integer with optional `_` separators, or a float including `inf`/`nan`,
/// with an optional leading sign throughout.
fn parse_number(lexeme: &str) -> Result<Node> {
    let unsigned = lexeme.strip_prefix(['+', '-']).unwrap_or(lexeme);
    let negative = lexeme.starts_with('-');

    match unsigned {
        "inf" => {
            return Ok(Node::Float(if negative {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            }));
        }
        "nan" => return Ok(Node::Float(f64::NAN)),
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = unsigned.strip_prefix(prefix) {
            let value = parse_radix_digits(digits, radix, lexeme)?;
            return Ok(Node::Integer(if negative { -value } else { value }));
        }
    }

    if unsigned.contains(['.', 'e', 'E']) {
        return parse_float(lexeme, unsigned);
    }

    if !is_digit_run(unsigned, 10) {
        return Err(Error::decode(format!("invalid value \"{lexeme}\"")));
    }
    let cleaned: String = lexeme.chars().filter(|c| *c != '_').collect();
    cleaned
        .parse::<i64>()
        .map(Node::Integer)
        .map_err(|_| Error::decode(format!("integer \"{lexeme}\" is out of range")))
}
