//! Content stream tokenizer.
//!
//! Splits decoded page content bytes into [`Operation`]s, each holding the
//! operands that preceded its operator. Only the syntax needed to walk text
//! is modelled: numbers, strings, names, arrays and dictionaries. Comments
//! and inline image data are skipped.

use crate::error::BackendError;

/// A content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Integer or real number.
    Number(f64),
    /// Name without the leading `/`.
    Name(String),
    /// Literal `(...)` or hex `<...>` string, as raw bytes.
    String(Vec<u8>),
    Array(Vec<Operand>),
    /// `<< ... >>` dictionary (marked-content properties).
    Dictionary(Vec<(String, Operand)>),
    Boolean(bool),
    Null,
}

impl Operand {
    /// The numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Operand::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// An operator with its operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub operator: String,
    pub operands: Vec<Operand>,
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | 0x0C | 0x00)
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(b) = self.peek() {
            if is_whitespace(b) {
                self.pos += 1;
            } else if b == b'%' {
                while self.peek().is_some_and(|b| b != b'\n' && b != b'\r') {
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
    }

    /// Read one operand, or `None` when the next token is a keyword.
    fn operand(&mut self) -> Result<Option<Operand>, BackendError> {
        let Some(b) = self.peek() else {
            return Ok(None);
        };
        let operand = match b {
            b'(' => Operand::String(self.literal_string()?),
            b'<' if self.peek_at(1) == Some(b'<') => Operand::Dictionary(self.dictionary()?),
            b'<' => Operand::String(self.hex_string()?),
            b'[' => {
                self.pos += 1;
                Operand::Array(self.array()?)
            }
            b'/' => Operand::Name(self.name()),
            b'0'..=b'9' | b'+' | b'-' | b'.' => self.number()?,
            _ => return Ok(None),
        };
        Ok(Some(operand))
    }

    fn literal_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut out = Vec::new();
        let mut depth = 1u32;

        while let Some(b) = self.peek() {
            self.pos += 1;
            match b {
                b'(' => {
                    depth += 1;
                    out.push(b);
                }
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(out);
                    }
                    out.push(b);
                }
                b'\\' => self.escape(&mut out)?,
                _ => out.push(b),
            }
        }

        Err(BackendError::Content("unterminated literal string".to_string()))
    }

    fn escape(&mut self, out: &mut Vec<u8>) -> Result<(), BackendError> {
        let Some(b) = self.peek() else {
            return Err(BackendError::Content(
                "unterminated escape in literal string".to_string(),
            ));
        };
        self.pos += 1;
        match b {
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            // Line continuation.
            b'\r' => {
                if self.peek() == Some(b'\n') {
                    self.pos += 1;
                }
            }
            b'\n' => {}
            b'0'..=b'7' => {
                let mut value = u32::from(b - b'0');
                for _ in 0..2 {
                    match self.peek() {
                        Some(d @ b'0'..=b'7') => {
                            value = value * 8 + u32::from(d - b'0');
                            self.pos += 1;
                        }
                        _ => break,
                    }
                }
                out.push((value & 0xFF) as u8);
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn hex_string(&mut self) -> Result<Vec<u8>, BackendError> {
        self.pos += 1;
        let mut nibbles = Vec::new();

        loop {
            let Some(b) = self.peek() else {
                return Err(BackendError::Content("unterminated hex string".to_string()));
            };
            self.pos += 1;
            if b == b'>' {
                break;
            }
            if is_whitespace(b) {
                continue;
            }
            let value = hex_value(b).ok_or_else(|| {
                BackendError::Content(format!("invalid hex digit: {:?}", b as char))
            })?;
            nibbles.push(value);
        }

        if nibbles.len() % 2 != 0 {
            nibbles.push(0);
        }
        Ok(nibbles.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
    }

    fn array(&mut self) -> Result<Vec<Operand>, BackendError> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match self.peek() {
                None => return Err(BackendError::Content("unterminated array".to_string())),
                Some(b']') => {
                    self.pos += 1;
                    return Ok(items);
                }
                Some(_) => {
                    let item = match self.operand()? {
                        Some(operand) => operand,
                        None => self.bare_keyword()?,
                    };
                    items.push(item);
                }
            }
        }
    }

    fn dictionary(&mut self) -> Result<Vec<(String, Operand)>, BackendError> {
        self.pos += 2;
        let mut entries = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            match (self.peek(), self.peek_at(1)) {
                (None, _) => {
                    return Err(BackendError::Content("unterminated dictionary".to_string()));
                }
                (Some(b'>'), Some(b'>')) => {
                    self.pos += 2;
                    return Ok(entries);
                }
                (Some(b'/'), _) => {
                    let key = self.name();
                    self.skip_whitespace_and_comments();
                    let value = match self.operand()? {
                        Some(operand) => operand,
                        None => self.bare_keyword()?,
                    };
                    entries.push((key, value));
                }
                _ => {
                    return Err(BackendError::Content(
                        "expected name key in dictionary".to_string(),
                    ));
                }
            }
        }
    }

    /// A keyword inside an array or dictionary: `true`, `false`, `null`, or
    /// anything else kept as a name.
    fn bare_keyword(&mut self) -> Result<Operand, BackendError> {
        let keyword = self.keyword();
        if keyword.is_empty() {
            let b = self.peek().unwrap_or_default();
            return Err(BackendError::Content(format!(
                "unexpected byte 0x{b:02X} at offset {}",
                self.pos
            )));
        }
        Ok(match keyword.as_str() {
            "true" => Operand::Boolean(true),
            "false" => Operand::Boolean(false),
            "null" => Operand::Null,
            _ => Operand::Name(keyword),
        })
    }

    fn name(&mut self) -> String {
        self.pos += 1;
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| !is_whitespace(b) && !is_delimiter(b))
        {
            self.pos += 1;
        }

        let raw = &self.input[start..self.pos];
        let mut name = Vec::with_capacity(raw.len());
        let mut i = 0;
        while i < raw.len() {
            if raw[i] == b'#' && i + 2 < raw.len() {
                if let (Some(hi), Some(lo)) = (hex_value(raw[i + 1]), hex_value(raw[i + 2])) {
                    name.push((hi << 4) | lo);
                    i += 3;
                    continue;
                }
            }
            name.push(raw[i]);
            i += 1;
        }
        String::from_utf8_lossy(&name).into_owned()
    }

    fn number(&mut self) -> Result<Operand, BackendError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        let mut seen_dot = false;
        while let Some(b) = self.peek() {
            match b {
                b'.' if !seen_dot => seen_dot = true,
                b'0'..=b'9' => {}
                _ => break,
            }
            self.pos += 1;
        }

        let token = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| BackendError::Content("invalid number token".to_string()))?;
        match token {
            "+" | "-" | "." | "+." | "-." => Ok(Operand::Number(0.0)),
            _ => token
                .parse()
                .map(Operand::Number)
                .map_err(|_| BackendError::Content(format!("invalid number: {token}"))),
        }
    }

    fn keyword(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || matches!(b, b'*' | b'\'' | b'"'))
        {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    /// Skip inline image data up to and including the `EI` keyword.
    fn skip_inline_image(&mut self) {
        while self.pos < self.input.len() {
            let at_ei = self.peek() == Some(b'E')
                && self.peek_at(1) == Some(b'I')
                && (self.pos == 0 || is_whitespace(self.input[self.pos - 1]))
                && self
                    .peek_at(2)
                    .is_none_or(|b| is_whitespace(b) || is_delimiter(b));
            if at_ei {
                self.pos += 2;
                return;
            }
            self.pos += 1;
        }
    }
}

/// Tokenize content stream bytes into operations.
///
/// # Errors
///
/// Returns [`BackendError::Content`] for malformed strings, arrays or
/// dictionaries.
pub fn tokenize(input: &[u8]) -> Result<Vec<Operation>, BackendError> {
    let mut lexer = Lexer::new(input);
    let mut operations = Vec::new();
    let mut operands = Vec::new();

    loop {
        lexer.skip_whitespace_and_comments();
        let Some(b) = lexer.peek() else {
            break;
        };

        if let Some(operand) = lexer.operand()? {
            operands.push(operand);
            continue;
        }

        match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'*' | b'\'' | b'"' => {
                let keyword = lexer.keyword();
                match keyword.as_str() {
                    "true" => operands.push(Operand::Boolean(true)),
                    "false" => operands.push(Operand::Boolean(false)),
                    "null" => operands.push(Operand::Null),
                    "BI" => {
                        operands.clear();
                        lexer.skip_inline_image();
                    }
                    _ => operations.push(Operation {
                        operator: keyword,
                        operands: std::mem::take(&mut operands),
                    }),
                }
            }
            b']' => {
                return Err(BackendError::Content(
                    "unexpected ']' outside array".to_string(),
                ));
            }
            _ => lexer.pos += 1,
        }
    }

    Ok(operations)
}
