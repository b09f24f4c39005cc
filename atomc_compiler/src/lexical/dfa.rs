//! Byte-level tokenizer automaton
//!
//! A single deterministic automaton advanced one byte per transition and
//! restarted from [`State::Start`] for every token. The end of the buffer is
//! read as a NUL byte, so every accumulating state sees a terminator and
//! finishes (or rejects) its token the same way it would before a real NUL.
//! States that leave an accumulation step back one byte so the next token
//! starts at the byte that ended this one.

use super::error::LexerError;
use crate::config::compile_time::lexical::{
    MAX_IDENTIFIER_LENGTH, MAX_STRING_SIZE, MAX_TOKEN_COUNT,
};
use crate::tokens::{keyword_kind, Token, TokenKind};
use crate::utils::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Word,

    // Numbers
    Decimal,
    LeadingZero,
    Octal,
    /// `0` followed by `8` or `9`: only valid if it turns into a real
    BadOctal,
    HexPrefix,
    Hex,
    Fraction,
    FractionDigits,
    Exponent,
    ExponentSign,
    ExponentDigits,

    // Operators
    Slash,
    Ampersand,
    Pipe,
    Bang,
    Equals,
    Less,
    Greater,

    // Comments
    LineComment,
    BlockComment,
    BlockCommentStar,

    // Literals
    CharStart,
    CharEscape,
    CharEnd,
    StringBody,
    StringEscape,
}

/// Byte value of the escape `\c`, for the fixed escape set
fn escape_value(c: u8) -> Option<u8> {
    match c {
        b'a' => Some(0x07),
        b'b' => Some(0x08),
        b't' => Some(b'\t'),
        b'n' => Some(b'\n'),
        b'v' => Some(0x0B),
        b'f' => Some(0x0C),
        b'r' => Some(b'\r'),
        b'0' => Some(0),
        b'?' | b'"' | b'\'' | b'\\' => Some(c),
        _ => None,
    }
}

fn is_word_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

struct Scanner<'a> {
    source: &'a [u8],
    pos: usize,
    line: u32,
    /// Offset of the first byte of the token being scanned
    start: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a [u8], pos: usize, line: u32) -> Self {
        Self {
            source,
            pos,
            line,
            start: pos,
        }
    }

    /// Read one byte; the end of the buffer reads as NUL
    fn bump(&mut self) -> u8 {
        let byte = self.source.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        byte
    }

    fn push_back(&mut self) {
        self.pos -= 1;
    }

    /// True once the byte just read was the virtual NUL past the buffer
    fn at_eof(&self) -> bool {
        self.pos > self.source.len()
    }

    fn end_offset(&self) -> usize {
        self.pos.min(self.source.len())
    }

    fn span(&self) -> Span {
        let end = self.end_offset();
        Span::new(self.start.min(end), end)
    }

    fn simple(&self, kind: TokenKind) -> Result<Token, LexerError> {
        Ok(Token::simple(kind, self.line, self.span()))
    }

    fn malformed(&self, text: &[u8]) -> LexerError {
        LexerError::MalformedNumber {
            text: String::from_utf8_lossy(text).into_owned(),
            line: self.line,
            offset: self.start,
        }
    }

    fn integer(&self, text: &[u8], digits: &[u8], radix: u32) -> Result<Token, LexerError> {
        let digits = String::from_utf8_lossy(digits);
        i64::from_str_radix(&digits, radix)
            .map(|value| Token::int(value, self.line, self.span()))
            .map_err(|_| self.malformed(text))
    }

    fn real(&self, text: &[u8]) -> Result<Token, LexerError> {
        match String::from_utf8_lossy(text).parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Token::real(value, self.line, self.span())),
            _ => Err(self.malformed(text)),
        }
    }

    fn word(&self, text: &[u8]) -> Result<Token, LexerError> {
        if text.len() > MAX_IDENTIFIER_LENGTH {
            return Err(LexerError::IdentifierTooLong {
                length: text.len(),
                line: self.line,
                offset: self.start,
            });
        }
        let word = String::from_utf8_lossy(text);
        match keyword_kind(&word) {
            Some(kind) => self.simple(kind),
            None => Ok(Token::identifier(word.into_owned(), self.line, self.span())),
        }
    }

    fn scan(&mut self) -> Result<Token, LexerError> {
        let mut state = State::Start;
        let mut text: Vec<u8> = Vec::new();
        let mut char_value = 0u8;

        loop {
            let c = self.bump();

            match state {
                State::Start => {
                    self.start = self.pos - 1;
                    match c {
                        b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                            text.push(c);
                            state = State::Word;
                        }
                        0 => {
                            self.push_back();
                            return self.simple(TokenKind::End);
                        }
                        b'+' => return self.simple(TokenKind::Add),
                        b'-' => return self.simple(TokenKind::Sub),
                        b'*' => return self.simple(TokenKind::Mul),
                        b'.' => return self.simple(TokenKind::Dot),
                        b',' => return self.simple(TokenKind::Comma),
                        b';' => return self.simple(TokenKind::Semicolon),
                        b'(' => return self.simple(TokenKind::Lpar),
                        b')' => return self.simple(TokenKind::Rpar),
                        b'[' => return self.simple(TokenKind::Lbracket),
                        b']' => return self.simple(TokenKind::Rbracket),
                        b'{' => return self.simple(TokenKind::Lacc),
                        b'}' => return self.simple(TokenKind::Racc),
                        b'&' => state = State::Ampersand,
                        b'|' => state = State::Pipe,
                        b'!' => state = State::Bang,
                        b'=' => state = State::Equals,
                        b'<' => state = State::Less,
                        b'>' => state = State::Greater,
                        b'/' => state = State::Slash,
                        b' ' | b'\t' | b'\r' => {}
                        b'\n' => self.line += 1,
                        b'0' => {
                            text.push(c);
                            state = State::LeadingZero;
                        }
                        b'1'..=b'9' => {
                            text.push(c);
                            state = State::Decimal;
                        }
                        b'\'' => state = State::CharStart,
                        b'"' => state = State::StringBody,
                        _ => {
                            self.push_back();
                            return Err(LexerError::InvalidCharacter {
                                byte: c,
                                line: self.line,
                                offset: self.start,
                            });
                        }
                    }
                }

                State::Word => {
                    if is_word_byte(c) {
                        text.push(c);
                    } else {
                        self.push_back();
                        return self.word(&text);
                    }
                }

                State::Decimal => match c {
                    b'0'..=b'9' => text.push(c),
                    b'.' => {
                        text.push(c);
                        state = State::Fraction;
                    }
                    b'e' | b'E' => {
                        text.push(c);
                        state = State::Exponent;
                    }
                    _ => {
                        self.push_back();
                        return self.integer(&text, &text, 10);
                    }
                },

                State::LeadingZero => match c {
                    b'x' | b'X' => {
                        text.push(c);
                        state = State::HexPrefix;
                    }
                    b'0'..=b'7' => {
                        text.push(c);
                        state = State::Octal;
                    }
                    b'8' | b'9' => {
                        text.push(c);
                        state = State::BadOctal;
                    }
                    b'e' | b'E' => {
                        text.push(c);
                        state = State::Exponent;
                    }
                    b'.' => {
                        text.push(c);
                        state = State::Fraction;
                    }
                    _ => {
                        self.push_back();
                        return Ok(Token::int(0, self.line, self.span()));
                    }
                },

                State::Octal => match c {
                    b'0'..=b'7' => text.push(c),
                    b'8' | b'9' => {
                        text.push(c);
                        state = State::BadOctal;
                    }
                    b'e' | b'E' => {
                        text.push(c);
                        state = State::Exponent;
                    }
                    b'.' => {
                        text.push(c);
                        state = State::Fraction;
                    }
                    _ => {
                        self.push_back();
                        return self.integer(&text, &text[1..], 8);
                    }
                },

                State::BadOctal => match c {
                    b'0'..=b'9' => text.push(c),
                    b'.' => {
                        text.push(c);
                        state = State::Fraction;
                    }
                    b'e' | b'E' => {
                        text.push(c);
                        state = State::Exponent;
                    }
                    _ => {
                        self.push_back();
                        return Err(self.malformed(&text));
                    }
                },

                State::HexPrefix => {
                    if c.is_ascii_hexdigit() {
                        text.push(c);
                        state = State::Hex;
                    } else {
                        self.push_back();
                        return Err(self.malformed(&text));
                    }
                }

                State::Hex => {
                    if c.is_ascii_hexdigit() {
                        text.push(c);
                    } else {
                        self.push_back();
                        return self.integer(&text, &text[2..], 16);
                    }
                }

                State::Fraction => {
                    if c.is_ascii_digit() {
                        text.push(c);
                        state = State::FractionDigits;
                    } else {
                        self.push_back();
                        return Err(self.malformed(&text));
                    }
                }

                State::FractionDigits => match c {
                    b'0'..=b'9' => text.push(c),
                    b'e' | b'E' => {
                        text.push(c);
                        state = State::Exponent;
                    }
                    _ => {
                        self.push_back();
                        return self.real(&text);
                    }
                },

                State::Exponent => match c {
                    b'+' | b'-' => {
                        text.push(c);
                        state = State::ExponentSign;
                    }
                    b'0'..=b'9' => {
                        text.push(c);
                        state = State::ExponentDigits;
                    }
                    _ => {
                        self.push_back();
                        return Err(self.malformed(&text));
                    }
                },

                State::ExponentSign => {
                    if c.is_ascii_digit() {
                        text.push(c);
                        state = State::ExponentDigits;
                    } else {
                        self.push_back();
                        return Err(self.malformed(&text));
                    }
                }

                State::ExponentDigits => {
                    if c.is_ascii_digit() {
                        text.push(c);
                    } else {
                        self.push_back();
                        return self.real(&text);
                    }
                }

                State::Slash => match c {
                    b'*' => state = State::BlockComment,
                    b'/' => state = State::LineComment,
                    _ => {
                        self.push_back();
                        return self.simple(TokenKind::Div);
                    }
                },

                State::Ampersand | State::Pipe => {
                    let (operator, kind) = if state == State::Ampersand {
                        (b'&', TokenKind::And)
                    } else {
                        (b'|', TokenKind::Or)
                    };
                    if c == operator {
                        return self.simple(kind);
                    }
                    self.push_back();
                    return Err(LexerError::IncompleteOperator {
                        operator: operator as char,
                        line: self.line,
                        offset: self.start,
                    });
                }

                State::Bang | State::Equals | State::Less | State::Greater => {
                    let (single, double) = match state {
                        State::Bang => (TokenKind::Not, TokenKind::NotEq),
                        State::Equals => (TokenKind::Assign, TokenKind::Equal),
                        State::Less => (TokenKind::Less, TokenKind::LessEq),
                        _ => (TokenKind::Greater, TokenKind::GreaterEq),
                    };
                    if c == b'=' {
                        return self.simple(double);
                    }
                    self.push_back();
                    return self.simple(single);
                }

                State::LineComment => {
                    // The newline itself is left for Start to count
                    if c == b'\n' || c == 0 {
                        self.push_back();
                        state = State::Start;
                    }
                }

                State::BlockComment => {
                    if self.at_eof() {
                        return Err(LexerError::UnterminatedComment {
                            line: self.line,
                            offset: self.start,
                        });
                    }
                    match c {
                        b'*' => state = State::BlockCommentStar,
                        b'\n' => self.line += 1,
                        _ => {}
                    }
                }

                State::BlockCommentStar => {
                    if self.at_eof() {
                        return Err(LexerError::UnterminatedComment {
                            line: self.line,
                            offset: self.start,
                        });
                    }
                    match c {
                        b'*' => {}
                        b'/' => state = State::Start,
                        b'\n' => {
                            self.line += 1;
                            state = State::BlockComment;
                        }
                        _ => state = State::BlockComment,
                    }
                }

                State::CharStart => {
                    if self.at_eof() {
                        return Err(LexerError::InvalidCharLiteral {
                            line: self.line,
                            offset: self.start,
                        });
                    }
                    match c {
                        b'\\' => state = State::CharEscape,
                        b'\n' => {
                            self.line += 1;
                            return Err(LexerError::InvalidCharLiteral {
                                line: self.line,
                                offset: self.start,
                            });
                        }
                        _ => {
                            char_value = c;
                            state = State::CharEnd;
                        }
                    }
                }

                State::CharEscape => {
                    if self.at_eof() {
                        return Err(LexerError::InvalidCharLiteral {
                            line: self.line,
                            offset: self.start,
                        });
                    }
                    match escape_value(c) {
                        Some(value) => {
                            char_value = value;
                            state = State::CharEnd;
                        }
                        None => {
                            self.push_back();
                            return Err(LexerError::InvalidEscape {
                                escape: c,
                                line: self.line,
                                offset: self.start,
                            });
                        }
                    }
                }

                State::CharEnd => {
                    if c == b'\'' {
                        return Ok(Token::char(char_value, self.line, self.span()));
                    }
                    self.push_back();
                    return Err(LexerError::InvalidCharLiteral {
                        line: self.line,
                        offset: self.start,
                    });
                }

                State::StringBody => {
                    if self.at_eof() {
                        return Err(LexerError::UnterminatedString {
                            line: self.line,
                            offset: self.start,
                        });
                    }
                    match c {
                        b'\\' => state = State::StringEscape,
                        b'"' => {
                            let value = String::from_utf8_lossy(&text).into_owned();
                            return Ok(Token::string(value, self.line, self.span()));
                        }
                        b'\n' => {
                            self.line += 1;
                            return Err(LexerError::UnterminatedString {
                                line: self.line,
                                offset: self.start,
                            });
                        }
                        _ => text.push(c),
                    }
                    if text.len() > MAX_STRING_SIZE {
                        return Err(LexerError::StringTooLarge {
                            size: text.len(),
                            line: self.line,
                            offset: self.start,
                        });
                    }
                }

                State::StringEscape => {
                    if self.at_eof() {
                        return Err(LexerError::UnterminatedString {
                            line: self.line,
                            offset: self.start,
                        });
                    }
                    match escape_value(c) {
                        Some(value) => {
                            text.push(value);
                            state = State::StringBody;
                        }
                        None => {
                            self.push_back();
                            return Err(LexerError::InvalidEscape {
                                escape: c,
                                line: self.line,
                                offset: self.start,
                            });
                        }
                    }
                }
            }
        }
    }
}

/// Scan one token starting at `*pos`, advancing `*pos` and `*line`.
///
/// Lexically invalid input yields an `Error` token. Keep calling until the
/// `End` token is returned; once at the end, further calls return `End`.
pub fn next_token(source: &[u8], pos: &mut usize, line: &mut u32) -> Token {
    let mut scanner = Scanner::new(source, *pos, *line);
    let result = scanner.scan();
    *pos = scanner.end_offset();
    *line = scanner.line;

    match result {
        Ok(token) => token,
        Err(_) => Token::simple(TokenKind::Error, scanner.line, scanner.span()),
    }
}

/// Tokenizer over a whole buffer.
///
/// Yields tokens up to and including the first `End` or `Error`.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: u32,
    emitted: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a [u8]) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            emitted: 0,
            finished: false,
        }
    }

    /// Scan the next token, reporting why input was rejected
    pub fn next_result(&mut self) -> Result<Token, LexerError> {
        if self.emitted >= MAX_TOKEN_COUNT {
            self.finished = true;
            return Err(LexerError::TokenLimitExceeded {
                line: self.line,
                offset: self.pos,
            });
        }

        let mut scanner = Scanner::new(self.source, self.pos, self.line);
        let result = scanner.scan();
        self.pos = scanner.end_offset();
        self.line = scanner.line;
        self.emitted += 1;

        match &result {
            Ok(token) if token.is_end() => self.finished = true,
            Err(_) => self.finished = true,
            Ok(_) => {}
        }
        result
    }

    /// Collect every token through `End`, stopping at the first lexical error
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_result()?;
            let done = token.is_end();
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Every token scanned before the first lexical error, and that error
    pub fn tokenize_partial(mut self) -> (Vec<Token>, Option<LexerError>) {
        let mut tokens = Vec::new();
        loop {
            match self.next_result() {
                Ok(token) => {
                    let done = token.is_end();
                    tokens.push(token);
                    if done {
                        return (tokens, None);
                    }
                }
                Err(error) => return (tokens, Some(error)),
            }
        }
    }

    /// Current line counter
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Byte offset of the next unread byte
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        match self.next_result() {
            Ok(token) => Some(token),
            Err(error) => Some(Token::simple(
                TokenKind::Error,
                error.line(),
                Span::new(error.offset().min(self.pos), self.pos),
            )),
        }
    }
}
