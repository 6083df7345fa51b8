//! Forward-only token cursor over a JSON document.

use seqwire_common::{Result, error::Error};

use crate::token::TokenKind;

/// The cursor primitives consumed by the seqwire core and by element codecs.
///
/// A `TokenReader` is a stateful, forward-only pointer into a serialized
/// document. The core never owns the cursor; it only advances it. The
/// contract mirrors the grammar of an array-structured format:
///
/// - [`peek`](TokenReader::peek) classifies the next token without consuming
///   it, making the null-vs-array discrimination a non-exceptional branch.
/// - [`begin_array`](TokenReader::begin_array) /
///   [`end_array`](TokenReader::end_array) consume the array markers and
///   maintain nesting state.
/// - [`has_next`](TokenReader::has_next) reports whether another element
///   precedes the current container's close marker.
/// - [`skip_value`](TokenReader::skip_value) structurally discards one
///   complete value (nested containers included) without materializing it.
///
/// Implementations are not required to be thread-safe; callers must not
/// share one cursor between two live consumers.
pub trait TokenReader {
    /// Classifies the next value token without consuming it.
    ///
    /// Separator tokens (commas, and the colon after a member name) are not
    /// observable through `peek`; the cursor normalizes past them while
    /// enforcing the format's separator discipline.
    fn peek(&mut self) -> Result<TokenKind>;

    /// Consumes the opening marker of an array.
    ///
    /// Fails with an invalid-format error when the next token is not the
    /// start of an array.
    fn begin_array(&mut self) -> Result<()>;

    /// Consumes the closing marker of the current array.
    fn end_array(&mut self) -> Result<()>;

    /// Consumes the opening marker of an object.
    fn begin_object(&mut self) -> Result<()>;

    /// Consumes the closing marker of the current object.
    fn end_object(&mut self) -> Result<()>;

    /// Returns `true` if another element precedes the close marker of the
    /// current container.
    fn has_next(&mut self) -> Result<bool>;

    /// Consumes a `null` token.
    fn next_null(&mut self) -> Result<()>;

    /// Consumes and returns a boolean token.
    fn next_bool(&mut self) -> Result<bool>;

    /// Consumes and returns a number token as a signed integer.
    fn next_i64(&mut self) -> Result<i64>;

    /// Consumes and returns a number token as a double.
    fn next_f64(&mut self) -> Result<f64>;

    /// Consumes and returns a string token, with escapes resolved.
    fn next_str(&mut self) -> Result<String>;

    /// Consumes and returns the next member name of the current object,
    /// including the name/value separator that follows it.
    fn next_name(&mut self) -> Result<String>;

    /// Structurally discards exactly one complete value, without decoding
    /// it: literals are consumed in place, strings are scanned past, and
    /// nested containers are traversed to their close markers.
    fn skip_value(&mut self) -> Result<()>;
}

/// Tracks the separator discipline of the container the cursor is inside.
#[derive(Debug)]
enum Scope {
    Array { seen_value: bool },
    Object { seen_entry: bool, expect_value: bool },
}

/// A forward-only token cursor over an in-memory JSON document.
///
/// The reader enforces comma/colon discipline through a container scope
/// stack and caches at most one classified token (the `peek` result). It
/// never backtracks and offers no random access.
pub struct JsonReader<'a> {
    input: &'a [u8],
    pos: usize,
    stack: Vec<Scope>,
    peeked: Option<TokenKind>,
}

impl<'a> JsonReader<'a> {
    /// Creates a cursor positioned at the start of `input`.
    pub fn new(input: &'a [u8]) -> JsonReader<'a> {
        JsonReader {
            input,
            pos: 0,
            stack: Vec::new(),
            peeked: None,
        }
    }

    /// Current byte offset of the cursor, for diagnostics.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn skip_ws(&mut self) {
        while let Some(&b) = self.input.get(self.pos) {
            if b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn cur(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn malformed(&self, message: impl Into<String>) -> Error {
        Error::invalid_format(format!("json at offset {}", self.pos), message)
    }

    /// Consumes any separator owed at the current position and verifies the
    /// separator discipline of the enclosing container.
    fn advance_to_token(&mut self) -> Result<()> {
        #[derive(Clone, Copy)]
        enum Position {
            Value,
            ArrayContinuation,
            ObjectName { seen_entry: bool },
        }

        self.skip_ws();
        let position = match self.stack.last() {
            Some(Scope::Array { seen_value: true }) => Position::ArrayContinuation,
            Some(Scope::Object {
                seen_entry,
                expect_value: false,
            }) => Position::ObjectName {
                seen_entry: *seen_entry,
            },
            _ => Position::Value,
        };
        match position {
            Position::Value => {}
            Position::ArrayContinuation => match self.cur() {
                None => return Err(self.malformed("unterminated array")),
                Some(b']') => {}
                Some(b',') => {
                    self.pos += 1;
                    self.skip_ws();
                    match self.cur() {
                        Some(b']') | Some(b'}') => {
                            return Err(self.malformed("trailing comma"));
                        }
                        None => return Err(self.malformed("unterminated array")),
                        _ => {}
                    }
                }
                Some(_) => return Err(self.malformed("expected ',' or ']'")),
            },
            Position::ObjectName { seen_entry } => match self.cur() {
                None => return Err(self.malformed("unterminated object")),
                Some(b'}') => {}
                Some(b',') if seen_entry => {
                    self.pos += 1;
                    self.skip_ws();
                    if self.cur() != Some(b'"') {
                        return Err(self.malformed("expected member name after ','"));
                    }
                }
                Some(b'"') if !seen_entry => {}
                Some(_) => {
                    let message = if seen_entry {
                        "expected ',' or '}'"
                    } else {
                        "expected member name or '}'"
                    };
                    return Err(self.malformed(message));
                }
            },
        }
        Ok(())
    }

    fn classify(&self) -> Result<TokenKind> {
        let kind = match self.cur() {
            None => TokenKind::Eof,
            Some(b'[') => TokenKind::BeginArray,
            Some(b']') => TokenKind::EndArray,
            Some(b'{') => TokenKind::BeginObject,
            Some(b'}') => TokenKind::EndObject,
            Some(b'"') => TokenKind::String,
            Some(b'n') => TokenKind::Null,
            Some(b't') | Some(b'f') => TokenKind::Bool,
            Some(b'-') | Some(b'0'..=b'9') => TokenKind::Number,
            Some(_) => return Err(self.malformed("unrecognized token")),
        };
        Ok(kind)
    }

    /// Marks one complete value as consumed within the enclosing container.
    fn value_consumed(&mut self) {
        self.peeked = None;
        match self.stack.last_mut() {
            Some(Scope::Array { seen_value }) => *seen_value = true,
            Some(Scope::Object {
                seen_entry,
                expect_value,
            }) => {
                *seen_entry = true;
                *expect_value = false;
            }
            None => {}
        }
    }

    fn expect_kind(&mut self, expected: TokenKind, what: &str) -> Result<()> {
        let kind = self.peek()?;
        if kind != expected {
            return Err(self.malformed(format!("expected {what}, found {kind:?}")));
        }
        Ok(())
    }

    fn expect_literal(&mut self, literal: &[u8]) -> Result<()> {
        let end = self.pos + literal.len();
        if self.input.get(self.pos..end) != Some(literal) {
            return Err(self.malformed("malformed literal"));
        }
        self.pos = end;
        Ok(())
    }

    /// Scans the maximal number run at the cursor and returns it as text.
    fn scan_number(&mut self) -> Result<&'a str> {
        let input = self.input;
        let start = self.pos;
        while let Some(b) = self.cur() {
            match b {
                b'-' | b'+' | b'.' | b'e' | b'E' | b'0'..=b'9' => self.pos += 1,
                _ => break,
            }
        }
        std::str::from_utf8(&input[start..self.pos])
            .map_err(|_| Error::invalid_format(format!("json at offset {start}"), "bad number"))
    }

    /// Consumes a string token, resolving escapes.
    fn read_string(&mut self) -> Result<String> {
        if self.cur() != Some(b'"') {
            return Err(self.malformed("expected string"));
        }
        self.pos += 1;
        let mut out = Vec::new();
        loop {
            let b = self
                .cur()
                .ok_or_else(|| self.malformed("unterminated string"))?;
            self.pos += 1;
            match b {
                b'"' => break,
                b'\\' => {
                    let esc = self
                        .cur()
                        .ok_or_else(|| self.malformed("unterminated escape"))?;
                    self.pos += 1;
                    match esc {
                        b'"' => out.push(b'"'),
                        b'\\' => out.push(b'\\'),
                        b'/' => out.push(b'/'),
                        b'b' => out.push(0x08),
                        b'f' => out.push(0x0c),
                        b'n' => out.push(b'\n'),
                        b'r' => out.push(b'\r'),
                        b't' => out.push(b'\t'),
                        b'u' => {
                            let ch = self.read_unicode_escape()?;
                            let mut buf = [0u8; 4];
                            out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                        }
                        _ => return Err(self.malformed("invalid escape")),
                    }
                }
                0x00..=0x1f => return Err(self.malformed("unescaped control character")),
                _ => out.push(b),
            }
        }
        String::from_utf8(out).map_err(|_| self.malformed("invalid utf-8 in string"))
    }

    fn read_hex4(&mut self) -> Result<u32> {
        let input = self.input;
        let end = self.pos + 4;
        let digits = input
            .get(self.pos..end)
            .ok_or_else(|| self.malformed("truncated unicode escape"))?;
        let text = std::str::from_utf8(digits)
            .map_err(|_| self.malformed("malformed unicode escape"))?;
        let value =
            u32::from_str_radix(text, 16).map_err(|_| self.malformed("malformed unicode escape"))?;
        self.pos = end;
        Ok(value)
    }

    fn read_unicode_escape(&mut self) -> Result<char> {
        let first = self.read_hex4()?;
        let code = if (0xd800..=0xdbff).contains(&first) {
            // High surrogate; a low surrogate escape must follow.
            if self.input.get(self.pos..self.pos + 2) != Some(b"\\u") {
                return Err(self.malformed("unpaired surrogate"));
            }
            self.pos += 2;
            let second = self.read_hex4()?;
            if !(0xdc00..=0xdfff).contains(&second) {
                return Err(self.malformed("unpaired surrogate"));
            }
            0x10000 + ((first - 0xd800) << 10) + (second - 0xdc00)
        } else if (0xdc00..=0xdfff).contains(&first) {
            return Err(self.malformed("unpaired surrogate"));
        } else {
            first
        };
        char::from_u32(code).ok_or_else(|| self.malformed("invalid unicode escape"))
    }
}

impl TokenReader for JsonReader<'_> {
    fn peek(&mut self) -> Result<TokenKind> {
        if let Some(kind) = self.peeked {
            return Ok(kind);
        }
        self.advance_to_token()?;
        let kind = self.classify()?;
        self.peeked = Some(kind);
        Ok(kind)
    }

    fn begin_array(&mut self) -> Result<()> {
        self.expect_kind(TokenKind::BeginArray, "'['")?;
        self.pos += 1;
        self.peeked = None;
        self.stack.push(Scope::Array { seen_value: false });
        Ok(())
    }

    fn end_array(&mut self) -> Result<()> {
        if !matches!(self.stack.last(), Some(Scope::Array { .. })) {
            return Err(Error::invalid_operation("end_array outside of an array"));
        }
        self.expect_kind(TokenKind::EndArray, "']'")?;
        self.pos += 1;
        self.stack.pop();
        self.value_consumed();
        Ok(())
    }

    fn begin_object(&mut self) -> Result<()> {
        self.expect_kind(TokenKind::BeginObject, "'{'")?;
        self.pos += 1;
        self.peeked = None;
        self.stack.push(Scope::Object {
            seen_entry: false,
            expect_value: false,
        });
        Ok(())
    }

    fn end_object(&mut self) -> Result<()> {
        if !matches!(self.stack.last(), Some(Scope::Object { .. })) {
            return Err(Error::invalid_operation("end_object outside of an object"));
        }
        self.expect_kind(TokenKind::EndObject, "'}'")?;
        self.pos += 1;
        self.stack.pop();
        self.value_consumed();
        Ok(())
    }

    fn has_next(&mut self) -> Result<bool> {
        let more = !matches!(
            self.peek()?,
            TokenKind::EndArray | TokenKind::EndObject | TokenKind::Eof
        );
        Ok(more)
    }

    fn next_null(&mut self) -> Result<()> {
        self.expect_kind(TokenKind::Null, "null")?;
        self.expect_literal(b"null")?;
        self.value_consumed();
        Ok(())
    }

    fn next_bool(&mut self) -> Result<bool> {
        self.expect_kind(TokenKind::Bool, "a boolean")?;
        let value = if self.cur() == Some(b't') {
            self.expect_literal(b"true")?;
            true
        } else {
            self.expect_literal(b"false")?;
            false
        };
        self.value_consumed();
        Ok(value)
    }

    fn next_i64(&mut self) -> Result<i64> {
        self.expect_kind(TokenKind::Number, "a number")?;
        let text = self.scan_number()?;
        let value = text
            .parse::<i64>()
            .map_err(|_| Error::invalid_format("json number", format!("'{text}' is not an i64")))?;
        self.value_consumed();
        Ok(value)
    }

    fn next_f64(&mut self) -> Result<f64> {
        self.expect_kind(TokenKind::Number, "a number")?;
        let text = self.scan_number()?;
        let value = text
            .parse::<f64>()
            .map_err(|_| Error::invalid_format("json number", format!("'{text}' is not an f64")))?;
        self.value_consumed();
        Ok(value)
    }

    fn next_str(&mut self) -> Result<String> {
        self.expect_kind(TokenKind::String, "a string")?;
        let value = self.read_string()?;
        self.value_consumed();
        Ok(value)
    }

    fn next_name(&mut self) -> Result<String> {
        match self.stack.last() {
            Some(Scope::Object {
                expect_value: false,
                ..
            }) => {}
            _ => return Err(Error::invalid_operation("next_name outside of an object")),
        }
        self.expect_kind(TokenKind::String, "a member name")?;
        let name = self.read_string()?;
        self.peeked = None;
        self.skip_ws();
        if self.cur() != Some(b':') {
            return Err(self.malformed("expected ':' after member name"));
        }
        self.pos += 1;
        if let Some(Scope::Object { expect_value, .. }) = self.stack.last_mut() {
            *expect_value = true;
        }
        Ok(name)
    }

    fn skip_value(&mut self) -> Result<()> {
        match self.peek()? {
            TokenKind::Null => self.next_null(),
            TokenKind::Bool => self.next_bool().map(|_| ()),
            TokenKind::Number => {
                let text = self.scan_number()?;
                text.parse::<f64>().map_err(|_| {
                    Error::invalid_format("json number", format!("'{text}' is not a number"))
                })?;
                self.value_consumed();
                Ok(())
            }
            TokenKind::String => self.next_str().map(|_| ()),
            TokenKind::BeginArray => {
                self.begin_array()?;
                while self.has_next()? {
                    self.skip_value()?;
                }
                self.end_array()
            }
            TokenKind::BeginObject => {
                self.begin_object()?;
                while self.has_next()? {
                    self.next_name()?;
                    self.skip_value()?;
                }
                self.end_object()
            }
            TokenKind::EndArray | TokenKind::EndObject | TokenKind::Eof => {
                Err(Error::invalid_operation("skip_value at a close marker"))
            }
        }
    }
}
