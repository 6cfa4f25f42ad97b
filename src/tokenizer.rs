//! Lexical scanning.
//!
//! [`Tokenizer`] produces one [`Token`] at a time on demand; tokens are never
//! buffered beyond the single-token lookahead of [`Tokenizer::peek`]. The
//! cursor underneath normalizes CRLF pairs to a single `'\n'` so every rule
//! above it can reason about `'\n'` alone.

use crate::error::{Error, Result};

/// Bare keys are made of ASCII letters, digits, `-`, and `_`.
fn is_bare(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Whitespace means tab (U+0009) or space (U+0020); newlines are their own
/// token.
fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_control_character(c: char) -> bool {
    ('\u{0}'..'\u{20}').contains(&c) || c == '\u{7f}'
}

fn is_control_character_other_than_tab(c: char) -> bool {
    is_control_character(c) && c != '\t'
}

fn punctuator_kind(c: char) -> Option<TokenKind> {
    match c {
        '\n' => Some(TokenKind::Newline),
        '=' => Some(TokenKind::Equals),
        '.' => Some(TokenKind::Period),
        ',' => Some(TokenKind::Comma),
        ':' => Some(TokenKind::Colon),
        '+' => Some(TokenKind::Plus),
        '{' => Some(TokenKind::LeftCurlyBracket),
        '}' => Some(TokenKind::RightCurlyBracket),
        '[' => Some(TokenKind::LeftSquareBracket),
        ']' => Some(TokenKind::RightSquareBracket),
        _ => None,
    }
}

/// Compact escape sequences available in basic strings:
/// `\b \t \n \f \r \" \\`.
fn short_escape(c: char) -> Option<char> {
    match c {
        'b' => Some('\u{8}'),
        't' => Some('\t'),
        'n' => Some('\n'),
        'f' => Some('\u{c}'),
        'r' => Some('\r'),
        '"' => Some('"'),
        '\\' => Some('\\'),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Newline,
    Equals,
    Period,
    Comma,
    Colon,
    Plus,
    LeftCurlyBracket,
    RightCurlyBracket,
    LeftSquareBracket,
    RightSquareBracket,
    Whitespace,
    Comment,
    Bare,
    String,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// For `Bare`, `Whitespace`, and `Comment` this is the raw input slice;
    /// for `String` it is the decoded content with escapes applied.
    pub value: String,
    pub multiline: bool,
}

impl Token {
    fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Token {
            kind,
            value: value.into(),
            multiline: false,
        }
    }
}

/// Character cursor over the input text.
///
/// Positions are byte offsets. A CRLF pair advances the position by two bytes
/// but is observed as a single `'\n'`, so snapshot/restore through [`pos`]
/// and [`set_pos`] stays transparent to the substitution.
///
/// [`pos`]: Cursor::pos
/// [`set_pos`]: Cursor::set_pos
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Cursor { input, pos: 0 }
    }

    fn pos(&self) -> usize {
        self.pos
    }

    fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Returns the current character without consuming it, or `None` at the
    /// end of input.
    fn peek(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        let c = chars.next()?;
        if c == '\r' && chars.next() == Some('\n') {
            return Some('\n');
        }
        Some(c)
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        if c == '\n' && self.input[self.pos..].starts_with("\r\n") {
            self.pos += 2;
        } else {
            self.pos += c.len_utf8();
        }
        Some(c)
    }

    /// Consumes the current character iff it is one of `candidates`.
    fn take(&mut self, candidates: &[char]) -> bool {
        match self.peek() {
            Some(c) if candidates.contains(&c) => {
                self.next();
                true
            }
            _ => false,
        }
    }
}

pub(crate) struct Tokenizer<'a> {
    input: &'a str,
    cursor: Cursor<'a>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Tokenizer {
            input,
            cursor: Cursor::new(input),
        }
    }

    /// Returns the next token without consuming it.
    ///
    /// Snapshot → scan → restore. The position is restored on the error path
    /// too, so a failed lookahead leaves the tokenizer exactly where it was
    /// before the probe.
    pub fn peek(&mut self) -> Result<Token> {
        let pos = self.cursor.pos();
        let token = self.next_token();
        self.cursor.set_pos(pos);
        token
    }

    /// Consumes the next token iff its kind is one of `kinds`.
    pub fn take(&mut self, kinds: &[TokenKind]) -> Result<bool> {
        if kinds.contains(&self.peek()?.kind) {
            self.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consumes the next token, which must have the given kind.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        let token = self.next_token()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(Error::decode(format!(
                "expected {kind:?}, found {:?}",
                token.kind
            )))
        }
    }

    /// Advances past and returns the next token.
    ///
    /// At the end of input this yields `Eof` tokens indefinitely; `Eof`
    /// inside a string or escape sequence is a decode error instead.
    pub fn next_token(&mut self) -> Result<Token> {
        let start = self.cursor.pos();
        let Some(c) = self.cursor.next() else {
            return Ok(Token::new(TokenKind::Eof, ""));
        };
        if let Some(kind) = punctuator_kind(c) {
            return Ok(Token::new(kind, c));
        }
        if is_bare(c) {
            return Ok(self.scan_bare(start));
        }
        match c {
            ' ' | '\t' => Ok(self.scan_whitespace(start)),
            '#' => Ok(self.scan_comment(start)),
            '\'' => self.scan_string('\''),
            '"' => self.scan_string('"'),
            _ => Err(Error::decode(format!("unexpected character {c:?}"))),
        }
    }

    fn scan_bare(&mut self, start: usize) -> Token {
        while self.cursor.peek().is_some_and(is_bare) {
            self.cursor.next();
        }
        Token::new(TokenKind::Bare, &self.input[start..self.cursor.pos()])
    }

    fn scan_whitespace(&mut self, start: usize) -> Token {
        while self.cursor.peek().is_some_and(is_whitespace) {
            self.cursor.next();
        }
        Token::new(TokenKind::Whitespace, &self.input[start..self.cursor.pos()])
    }

    /// Control characters other than tab are not permitted in comments. The
    /// scan stops in front of one and leaves it in place; the next token
    /// fetch then rejects it (a newline simply becomes the next token).
    fn scan_comment(&mut self, start: usize) -> Token {
        loop {
            match self.cursor.peek() {
                Some(c) if !is_control_character_other_than_tab(c) => {
                    self.cursor.next();
                }
                _ => {
                    return Token::new(TokenKind::Comment, &self.input[start..self.cursor.pos()]);
                }
            }
        }
    }

    /// Scans a literal (`'`) or basic (`"`) string whose opening delimiter
    /// has already been consumed.
    fn scan_string(&mut self, delimiter: char) -> Result<Token> {
        let mut multiline = false;
        if self.cursor.take(&[delimiter]) {
            if !self.cursor.take(&[delimiter]) {
                return Ok(Token::new(TokenKind::String, ""));
            }
            multiline = true;
        }

        // A newline immediately following the opening delimiter is trimmed.
        if multiline {
            self.cursor.take(&['\n']);
        }

        let mut value = String::new();
        loop {
            let Some(c) = self.cursor.next() else {
                return Err(Error::decode("unterminated string"));
            };
            match c {
                '\n' => {
                    if !multiline {
                        return Err(Error::decode("newline in single-line string"));
                    }
                    value.push('\n');
                }
                c if c == delimiter => {
                    if multiline {
                        // One or two delimiters are literal content; the
                        // third closes the string, with up to two extra
                        // delimiters re-emitted as trailing content.
                        if !self.cursor.take(&[delimiter]) {
                            value.push(delimiter);
                            continue;
                        }
                        if !self.cursor.take(&[delimiter]) {
                            value.push(delimiter);
                            value.push(delimiter);
                            continue;
                        }
                        if self.cursor.take(&[delimiter]) {
                            value.push(delimiter);
                        }
                        if self.cursor.take(&[delimiter]) {
                            value.push(delimiter);
                        }
                    }
                    break;
                }
                c if is_control_character_other_than_tab(c) => {
                    return Err(Error::decode(format!("control character {c:?} in string")));
                }
                '\\' if delimiter == '"' => self.scan_escape(&mut value, multiline)?,
                c => value.push(c),
            }
        }

        Ok(Token {
            kind: TokenKind::String,
            value,
            multiline,
        })
    }

    fn scan_escape(&mut self, value: &mut String, multiline: bool) -> Result<()> {
        let Some(c) = self.cursor.next() else {
            return Err(Error::decode("unterminated escape sequence"));
        };
        if let Some(escaped) = short_escape(c) {
            value.push(escaped);
            return Ok(());
        }
        match c {
            'u' => value.push(self.scan_unicode_escape(4)?),
            'U' => value.push(self.scan_unicode_escape(8)?),
            // Line-ending backslash: an unescaped `\` before whitespace and
            // a line break swallows everything up to the next
            // non-whitespace character.
            ' ' | '\t' | '\n' if multiline => {
                while self.cursor.take(&[' ', '\t', '\n']) {}
            }
            _ => {
                return Err(Error::decode(format!("invalid escape sequence \\{c}")));
            }
        }
        Ok(())
    }

    /// Reads `digits` hex digits and converts them to a char. The code
    /// point must be a Unicode scalar value: surrogates and anything above
    /// U+10FFFF are rejected.
    fn scan_unicode_escape(&mut self, digits: u32) -> Result<char> {
        let mut code_point: u32 = 0;
        for _ in 0..digits {
            let digit = self
                .cursor
                .next()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| Error::decode("invalid unicode escape sequence"))?;
            code_point = code_point * 16 + digit;
        }
        char::from_u32(code_point).ok_or_else(|| {
            Error::decode(format!("\\u{code_point:08x} is not a unicode scalar value"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut tokenizer = Tokenizer::new(input);
        let mut out = Vec::new();
        loop {
            let token = tokenizer.next_token().expect("token");
            let done = token.kind == TokenKind::Eof;
            out.push(token);
            if done {
                return out;
            }
        }
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokens(input).into_iter().map(|t| t.kind).collect()
    }

    fn single_string(input: &str) -> Token {
        let mut tokenizer = Tokenizer::new(input);
        let token = tokenizer.next_token().expect("string token");
        assert_eq!(token.kind, TokenKind::String);
        token
    }

    #[test]
    fn punctuators_and_bare() {
        assert_eq!(
            kinds("key = [1, 2]"),
            vec![
                TokenKind::Bare,
                TokenKind::Whitespace,
                TokenKind::Equals,
                TokenKind::Whitespace,
                TokenKind::LeftSquareBracket,
                TokenKind::Bare,
                TokenKind::Comma,
                TokenKind::Whitespace,
                TokenKind::Bare,
                TokenKind::RightSquareBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn bare_lexeme_covers_digits_hyphen_underscore() {
        let token = &tokens("1979-05-27_x")[0];
        assert_eq!(token.kind, TokenKind::Bare);
        assert_eq!(token.value, "1979-05-27_x");
    }

    #[test]
    fn crlf_is_a_single_newline() {
        assert_eq!(
            kinds("a\r\nb"),
            vec![
                TokenKind::Bare,
                TokenKind::Newline,
                TokenKind::Bare,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lone_carriage_return_is_rejected() {
        let mut tokenizer = Tokenizer::new("a\rb");
        assert_eq!(tokenizer.next_token().unwrap().kind, TokenKind::Bare);
        assert!(tokenizer.next_token().is_err());
    }

    #[test]
    fn comment_runs_to_end_of_line() {
        let stream = tokens("# note\tstill comment\nx");
        assert_eq!(stream[0].kind, TokenKind::Comment);
        assert_eq!(stream[0].value, "# note\tstill comment");
        assert_eq!(stream[1].kind, TokenKind::Newline);
    }

    #[test]
    fn comment_stops_in_front_of_control_character() {
        let mut tokenizer = Tokenizer::new("# ok\u{1}rest");
        let comment = tokenizer.next_token().unwrap();
        assert_eq!(comment.kind, TokenKind::Comment);
        assert_eq!(comment.value, "# ok");
        // The control character is still there; fetching the next token
        // raises the decode error.
        assert!(tokenizer.next_token().is_err());
    }

    #[test]
    fn empty_strings() {
        assert_eq!(single_string("\"\"").value, "");
        assert_eq!(single_string("''").value, "");
    }

    #[test]
    fn literal_string_has_no_escapes() {
        assert_eq!(single_string(r"'C:\Users\n'").value, r"C:\Users\n");
    }

    #[test]
    fn short_escapes_decode() {
        assert_eq!(
            single_string(r#""a\tb\nc\\d\"e\bf\rg\fh""#).value,
            "a\tb\nc\\d\"e\u{8}f\rg\u{c}h"
        );
    }

    #[test]
    fn unknown_escape_is_an_error() {
        let mut tokenizer = Tokenizer::new(r#""a\xb""#);
        assert!(tokenizer.next_token().is_err());
    }

    #[test]
    fn unicode_escapes_decode() {
        assert_eq!(single_string(r#""\u0041""#).value, "A");
        assert_eq!(single_string(r#""\U0001F600""#).value, "😀");
    }

    #[test]
    fn unicode_escape_beyond_max_scalar_is_rejected() {
        let mut tokenizer = Tokenizer::new(r#""\U00110000""#);
        assert!(tokenizer.next_token().is_err());
    }

    #[test]
    fn unicode_escape_surrogate_is_rejected() {
        let mut tokenizer = Tokenizer::new(r#""\uD800""#);
        assert!(tokenizer.next_token().is_err());
    }

    #[test]
    fn newline_in_single_line_string_is_rejected() {
        let mut tokenizer = Tokenizer::new("\"a\nb\"");
        assert!(tokenizer.next_token().is_err());
        let mut tokenizer = Tokenizer::new("'a\nb'");
        assert!(tokenizer.next_token().is_err());
    }

    #[test]
    fn multiline_trims_first_newline_only() {
        let token = single_string("\"\"\"\nabc\n\"\"\"");
        assert!(token.multiline);
        assert_eq!(token.value, "abc\n");
    }

    #[test]
    fn multiline_crlf_trim() {
        let token = single_string("\"\"\"\r\nabc\"\"\"");
        assert_eq!(token.value, "abc");
    }

    #[test]
    fn multiline_embedded_delimiters_are_content() {
        assert_eq!(single_string(r#""""a""b""""#).value, r#"a""b"#);
        assert_eq!(single_string(r#"'''a'b'''"#).value, "a'b");
    }

    #[test]
    fn multiline_trailing_delimiters_are_re_emitted() {
        // Five closing quotes: three close the string, two are content.
        assert_eq!(single_string(r#""""a""""""#).value, r#"a"""#);
        // Six quotes total is the empty multiline string.
        assert_eq!(single_string(r#""""""""#).value, "");
    }

    #[test]
    fn line_ending_backslash_swallows_whitespace() {
        let token = single_string("\"\"\"a\\\n   \n\t b\"\"\"");
        assert_eq!(token.value, "ab");
    }

    #[test]
    fn control_character_in_string_is_rejected() {
        let mut tokenizer = Tokenizer::new("\"a\u{7f}\"");
        assert!(tokenizer.next_token().is_err());
    }

    #[test]
    fn eof_inside_string_is_an_error() {
        let mut tokenizer = Tokenizer::new("\"abc");
        assert!(tokenizer.next_token().is_err());
        let mut tokenizer = Tokenizer::new(r#""ab\"#);
        assert!(tokenizer.next_token().is_err());
    }

    #[test]
    fn eof_token_repeats() {
        let mut tokenizer = Tokenizer::new("");
        assert_eq!(tokenizer.next_token().unwrap().kind, TokenKind::Eof);
        assert_eq!(tokenizer.next_token().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut tokenizer = Tokenizer::new("a b");
        assert_eq!(tokenizer.peek().unwrap().value, "a");
        assert_eq!(tokenizer.peek().unwrap().value, "a");
        assert_eq!(tokenizer.next_token().unwrap().value, "a");
    }

    #[test]
    fn peek_restores_position_on_error() {
        let mut tokenizer = Tokenizer::new("\"unterminated");
        assert!(tokenizer.peek().is_err());
        // The failed probe must not have moved the cursor: the same error
        // comes back from a real fetch.
        assert!(tokenizer.next_token().is_err());
    }

    #[test]
    fn take_and_expect() {
        let mut tokenizer = Tokenizer::new("= x");
        assert!(!tokenizer.take(&[TokenKind::Bare]).unwrap());
        assert!(tokenizer.take(&[TokenKind::Equals]).unwrap());
        assert!(tokenizer.take(&[TokenKind::Whitespace]).unwrap());
        let token = tokenizer.expect(TokenKind::Bare).unwrap();
        assert_eq!(token.value, "x");
        assert!(tokenizer.expect(TokenKind::Newline).is_err());
    }

    #[test]
    fn unexpected_character_is_rejected() {
        let mut tokenizer = Tokenizer::new("@");
        assert!(tokenizer.next_token().is_err());
    }
}
