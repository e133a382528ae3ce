use crate::error::{AsmError, ErrorCode, SourcePos};
use crate::Result;

/// Token kinds produced by [`lex`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    Ident,
    Reg,
    Number,
    Colon,
    Comma,
    Eol,
    Eof,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: SourcePos,
}

fn is_register(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some('R') | Some('r') => {}
        _ => return false,
    }
    let tail = &text[1..];
    !tail.is_empty()
        && tail.bytes().all(|b| b.is_ascii_digit())
        && tail.parse::<u32>().map(|v| v <= 15).unwrap_or(false)
}

fn is_identifier(text: &str) -> bool {
    let mut bytes = text.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Turns source text into a token stream ending in `Eof`.
///
/// Whitespace and `\r` are skipped, `;` comments run to end of line and
/// `\n` emits an `Eol` token. Identifiers and register names are
/// uppercased on emit; number tokens keep their spelling for the parser
/// to interpret.
pub fn lex(source: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut line = 1u32;
    let mut col = 1u32;
    let mut i = 0usize;

    let token = |kind, text: &str, line, col| Token {
        kind,
        text: text.to_string(),
        pos: SourcePos { line, col },
    };

    while i < chars.len() {
        let ch = chars[i];

        if ch == '\n' {
            tokens.push(token(TokenKind::Eol, "\n", line, col));
            i += 1;
            line += 1;
            col = 1;
            continue;
        }

        if ch == ';' {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
                col += 1;
            }
            continue;
        }

        if ch == ' ' || ch == '\t' || ch == '\r' {
            i += 1;
            col += 1;
            continue;
        }

        if ch == ':' {
            tokens.push(token(TokenKind::Colon, ":", line, col));
            i += 1;
            col += 1;
            continue;
        }

        if ch == ',' {
            tokens.push(token(TokenKind::Comma, ",", line, col));
            i += 1;
            col += 1;
            continue;
        }

        let starts_number = ch.is_ascii_digit()
            || (ch == '-' && i + 1 < chars.len() && chars[i + 1].is_ascii_digit());
        if starts_number {
            let start_i = i;
            let start_col = col;
            i += 1;
            col += 1;
            while i < chars.len() && chars[i].is_alphanumeric() {
                i += 1;
                col += 1;
            }
            let text: String = chars[start_i..i].iter().collect();
            tokens.push(token(TokenKind::Number, &text, line, start_col));
            continue;
        }

        if ch.is_alphabetic() || ch == '_' {
            let start_i = i;
            let start_col = col;
            i += 1;
            col += 1;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
                col += 1;
            }
            let text: String = chars[start_i..i].iter().collect();
            if is_register(&text) {
                tokens.push(token(TokenKind::Reg, &text.to_uppercase(), line, start_col));
            } else if !is_identifier(&text) {
                return Err(AsmError::new(
                    SourcePos { line, col: start_col },
                    ErrorCode::BadIdent,
                    format!("invalid identifier: {}", text),
                ));
            } else {
                tokens.push(token(TokenKind::Ident, &text.to_uppercase(), line, start_col));
            }
            continue;
        }

        return Err(AsmError::new(
            SourcePos { line, col },
            ErrorCode::BadChar,
            format!("unexpected character: {:?}", ch),
        ));
    }

    tokens.push(token(TokenKind::Eof, "", line, col));
    Ok(tokens)
}
