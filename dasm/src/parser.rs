use matches::debug_assert_matches;

use dcpu::spec_for_mnemonic;
use util::parse_int;

use crate::error::{AsmError, ErrorCode, SourcePos};
use crate::lexer::{Token, TokenKind};
use crate::Result;

/// An instruction operand: register, number or label reference, each
/// with its source position.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Operand {
    Register { index: u8, pos: SourcePos },
    Number { value: i64, pos: SourcePos },
    LabelRef { name: String, pos: SourcePos },
}

impl Operand {
    pub fn pos(&self) -> SourcePos {
        match *self {
            Operand::Register { pos, .. } => pos,
            Operand::Number { pos, .. } => pos,
            Operand::LabelRef { pos, .. } => pos,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Instruction {
    pub mnemonic: String,
    pub operands: Vec<Operand>,
    pub pos: SourcePos,
}

/// One physical source line. Empty lines are preserved as entries with
/// neither label nor instruction.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Line {
    pub label: Option<String>,
    pub label_pos: Option<SourcePos>,
    pub instr: Option<Instruction>,
}

struct TokenStream<'t> {
    tokens: &'t [Token],
    i: usize,
}

impl<'t> TokenStream<'t> {
    fn peek(&self) -> &'t Token {
        &self.tokens[self.i]
    }

    fn pop(&mut self) -> &'t Token {
        let token = &self.tokens[self.i];
        self.i += 1;
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.i += 1;
            true
        } else {
            false
        }
    }
}

/// Parses a token stream into a line list.
///
/// Grammar per physical line:
/// `[label ":"] [mnemonic [operand ("," operand)*]] (EOL | EOF)`.
pub fn parse(tokens: &[Token]) -> Result<Vec<Line>> {
    let mut ts = TokenStream { tokens, i: 0 };
    let mut lines = Vec::new();

    loop {
        if ts.peek().kind == TokenKind::Eof {
            break;
        }

        if ts.eat(TokenKind::Eol) {
            lines.push(Line {
                label: None,
                label_pos: None,
                instr: None,
            });
            continue;
        }

        let mut label = None;
        let mut label_pos = None;

        if ts.peek().kind == TokenKind::Ident {
            let ident = ts.pop();
            if ts.eat(TokenKind::Colon) {
                debug_assert_matches!(ident.kind, TokenKind::Ident);
                label = Some(ident.text.clone());
                label_pos = Some(ident.pos);
            } else {
                ts.i -= 1; // rewind: the identifier is a mnemonic
            }
        }

        let mut instr = None;
        if ts.peek().kind == TokenKind::Ident {
            let m = ts.pop();
            if spec_for_mnemonic(&m.text).is_none() {
                return Err(AsmError::new(
                    m.pos,
                    ErrorCode::UnknownMnemonic,
                    format!("unknown mnemonic: {}", m.text),
                ));
            }
            let mut operands = Vec::new();
            if ts.peek().kind != TokenKind::Eol && ts.peek().kind != TokenKind::Eof {
                operands.push(parse_operand(&mut ts)?);
                while ts.eat(TokenKind::Comma) {
                    operands.push(parse_operand(&mut ts)?);
                }
            }
            instr = Some(Instruction {
                mnemonic: m.text.clone(),
                operands,
                pos: m.pos,
            });
        }

        match ts.peek().kind {
            TokenKind::Eol => {
                ts.pop();
            }
            TokenKind::Eof => {}
            _ => {
                let bad = ts.peek();
                return Err(AsmError::new(
                    bad.pos,
                    ErrorCode::TrailingTokens,
                    format!("unexpected token: {:?} ({})", bad.kind, bad.text),
                ));
            }
        }

        lines.push(Line {
            label,
            label_pos,
            instr,
        });
    }

    Ok(lines)
}

fn parse_operand(ts: &mut TokenStream) -> Result<Operand> {
    let token = ts.peek();
    match token.kind {
        TokenKind::Reg => {
            let token = ts.pop();
            // The lexer only classifies R0..R15 as registers.
            let index = token.text[1..].parse::<u8>().map_err(|_| {
                AsmError::new(token.pos, ErrorCode::Internal, "unparsable register token")
            })?;
            Ok(Operand::Register {
                index,
                pos: token.pos,
            })
        }
        TokenKind::Number => {
            let token = ts.pop();
            let value = parse_int(&token.text).map_err(|_| {
                AsmError::new(
                    token.pos,
                    ErrorCode::BadNumber,
                    format!("invalid number: {}", token.text),
                )
            })?;
            Ok(Operand::Number {
                value,
                pos: token.pos,
            })
        }
        TokenKind::Ident => {
            let token = ts.pop();
            Ok(Operand::LabelRef {
                name: token.text.clone(),
                pos: token.pos,
            })
        }
        _ => Err(AsmError::new(
            token.pos,
            ErrorCode::BadOperand,
            format!("expected register, number or label, got {:?}", token.kind),
        )),
    }
}
