use std::error::Error as StdError;
use std::fmt;

/// Line/column position of a token in the source (both 1-based).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SourcePos {
    pub line: u32,
    pub col: u32,
}

/// Machine-readable code carried by every assembly diagnostic.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ErrorCode {
    BadChar,
    BadIdent,
    BadNumber,
    UnknownMnemonic,
    BadOperand,
    BadReg,
    TrailingTokens,
    Arity,
    FieldNonzero,
    DupLabel,
    UndefLabel,
    Range,
    Internal,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            ErrorCode::BadChar => "E_BAD_CHAR",
            ErrorCode::BadIdent => "E_BAD_IDENT",
            ErrorCode::BadNumber => "E_BAD_NUMBER",
            ErrorCode::UnknownMnemonic => "E_UNKNOWN_MNEMONIC",
            ErrorCode::BadOperand => "E_BAD_OPERAND",
            ErrorCode::BadReg => "E_BAD_REG",
            ErrorCode::TrailingTokens => "E_TRAILING_TOKENS",
            ErrorCode::Arity => "E_ARITY",
            ErrorCode::FieldNonzero => "E_FIELD_NONZERO",
            ErrorCode::DupLabel => "E_DUP_LABEL",
            ErrorCode::UndefLabel => "E_UNDEF_LABEL",
            ErrorCode::Range => "E_RANGE",
            ErrorCode::Internal => "E_INTERNAL",
        })
    }
}

/// A positioned assembly error.
///
/// Renders as `file:line:col: CODE: message`, with an optional
/// `  hint: ...` second line. The path is attached late, by whoever
/// knows the file name (see [`AsmError::with_path`]).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AsmError {
    pub pos: SourcePos,
    pub code: ErrorCode,
    pub message: String,
    hint: Option<String>,
    path: Option<String>,
}

impl AsmError {
    pub fn new<M: Into<String>>(pos: SourcePos, code: ErrorCode, message: M) -> AsmError {
        AsmError {
            pos,
            code,
            message: message.into(),
            hint: None,
            path: None,
        }
    }

    pub fn with_hint<H: Into<String>>(mut self, hint: H) -> AsmError {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_path(mut self, path: &str) -> AsmError {
        self.path = Some(path.to_string());
        self
    }
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.path.as_ref().map(String::as_str).unwrap_or("<input>"),
            self.pos.line,
            self.pos.col,
            self.code,
            self.message
        )?;
        if let Some(hint) = &self.hint {
            write!(f, "\n  hint: {}", hint)?;
        }
        Ok(())
    }
}

impl StdError for AsmError {}
