//! Tokenizer for canonicalised expression text.
use super::ExpressionError;

/// A lexical token, tagged with its byte offset in the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal
    Number(f64),

    /// Lower-case identifier: a function, constant, `x` or `mod`
    Ident(String),

    /// `+`
    Plus,

    /// `-`
    Minus,

    /// `*`
    Star,

    /// `/`
    Slash,

    /// `%`
    Percent,

    /// `^`
    Caret,

    /// `(`
    LParen,

    /// `)`
    RParen,

    /// `,`
    Comma,
}
impl Token {
    /// Short human-readable description for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Token::Number(v) => format!("number {}", crate::value::format_number(*v)),
            Token::Ident(name) => format!("\"{name}\""),
            Token::Plus => "\"+\"".to_string(),
            Token::Minus => "\"-\"".to_string(),
            Token::Star => "\"*\"".to_string(),
            Token::Slash => "\"/\"".to_string(),
            Token::Percent => "\"%\"".to_string(),
            Token::Caret => "\"^\"".to_string(),
            Token::LParen => "\"(\"".to_string(),
            Token::RParen => "\")\"".to_string(),
            Token::Comma => "\",\"".to_string(),
        }
    }
}

/// Splits `source` into `(offset, token)` pairs.
///
/// Input is expected to be canonical: lower case, ASCII only.
///
/// # Errors
/// Returns an error for characters outside the expression alphabet or malformed numbers.
pub fn tokenize(source: &str) -> Result<Vec<(usize, Token)>, ExpressionError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;

        let token = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                pos += 1;
                continue;
            }

            b'0'..=b'9' | b'.' => {
                pos = scan_number(bytes, pos);
                let text = &source[start..pos];
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ExpressionError::MalformedNumber(text.to_string()))?;
                Token::Number(value)
            }

            b'a'..=b'z' | b'_' => {
                while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                    pos += 1;
                }
                Token::Ident(source[start..pos].to_string())
            }

            b'+' => single(&mut pos, Token::Plus),
            b'-' => single(&mut pos, Token::Minus),
            b'*' => single(&mut pos, Token::Star),
            b'/' => single(&mut pos, Token::Slash),
            b'%' => single(&mut pos, Token::Percent),
            b'^' => single(&mut pos, Token::Caret),
            b'(' => single(&mut pos, Token::LParen),
            b')' => single(&mut pos, Token::RParen),
            b',' => single(&mut pos, Token::Comma),

            _ => {
                let ch = source[start..].chars().next().unwrap_or('?');
                return Err(ExpressionError::UnsupportedCharacter(ch));
            }
        };

        tokens.push((start, token));
    }

    Ok(tokens)
}

fn single(pos: &mut usize, token: Token) -> Token {
    *pos += 1;
    token
}

/// Digits with at most one decimal point, then an exponent if digits follow the `e`.
fn scan_number(bytes: &[u8], mut pos: usize) -> usize {
    let digits = |pos: &mut usize| {
        while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
            *pos += 1;
        }
    };

    digits(&mut pos);
    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        digits(&mut pos);
    }

    if pos < bytes.len() && bytes[pos] == b'e' {
        let mut probe = pos + 1;
        if probe < bytes.len() && matches!(bytes[probe], b'+' | b'-') {
            probe += 1;
        }
        if probe < bytes.len() && bytes[probe].is_ascii_digit() {
            pos = probe;
            digits(&mut pos);
        }
    }

    pos
}
