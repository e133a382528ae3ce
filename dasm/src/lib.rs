//! Two-pass assembler for the [dcpu](../dcpu/index.html) teaching
//! processor.
//!
//! [`assemble`] and [`assemble_addressed`] accept a program in the
//! textual assembly language and return the flat binary (8 bytes per
//! instruction, in source order, no header) together with the symbol
//! table built in pass 1.
//!
//! # Assembly language
//!
//! One instruction per line, with optional label and comment:
//!
//! ```text
//! ; compute 5 + 10 and park it at 0x0200
//!         mov_ri  r1, 5
//!         mov_ri  r2, 10
//!         add     r3, r1, r2
//!         store8_abs 0x0200, r3
//! done:   halt
//! ```
//!
//! Mnemonics and identifiers are case-insensitive and normalized to
//! uppercase. Registers are written `R0`..`R15` (any case); `SP` and
//! `FP` are not registers and cannot be named in source. Numeric
//! literals are decimal or `0x` hexadecimal with an optional sign. A
//! label may stand anywhere a number may; it resolves to the absolute
//! address `base + 8 * instructions_before_it`.
//!
//! Mnemonic quick reference (see the `dcpu` ISA table for semantics):
//!
//! Mnemonic     | Syntax
//! -------------|----------------------------
//! `HALT`       | `HALT`
//! `MOV_RI`     | `MOV_RI rd, value`
//! `MOV_RR`     | `MOV_RR rd, ra`
//! `ADD`        | `ADD rd, ra, rb`
//! `SUB`        | `SUB rd, ra, rb`
//! `CMP`        | `CMP ra, rb`
//! `LOAD8_ABS`  | `LOAD8_ABS rd, addr`
//! `STORE8_ABS` | `STORE8_ABS addr, ra`
//! `JMP_ABS`    | `JMP_ABS target`
//! `JMP_REL`    | `JMP_REL offset`
//! `JZ_ABS`     | `JZ_ABS target`
//! `JZ_REL`     | `JZ_REL offset`
//! `PUSH8`      | `PUSH8 ra`
//! `POP8`       | `POP8 rd`
//! `CALL_ABS`   | `CALL_ABS target`
//! `RET`        | `RET`
//!
//! Errors carry a position and an `E_*` code and render as
//! `file:line:col: CODE: message`.

mod emit;
mod error;
mod lexer;
mod parser;
mod symbols;


pub use crate::emit::assemble_to_bytes;
pub use crate::error::{AsmError, ErrorCode, SourcePos};
pub use crate::lexer::{lex, Token, TokenKind};
pub use crate::parser::{parse, Instruction, Line, Operand};
pub use crate::symbols::{build_symbol_table, SymbolTable};

pub type Result<T> = std::result::Result<T, AsmError>;

/// Output of a successful assembly.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AssembleResult {
    pub binary: Vec<u8>,
    pub symbols: SymbolTable,
}

/// Assembles `source` with labels resolved relative to address 0.
pub fn assemble(source: &str) -> Result<AssembleResult> {
    assemble_addressed(source, 0)
}

/// Assembles `source` with labels resolved relative to `base`.
///
/// `base` only affects label values; the emitted bytes for label-free
/// programs are identical for every base.
pub fn assemble_addressed(source: &str, base: i64) -> Result<AssembleResult> {
    let tokens = lex(source)?;
    let lines = parse(&tokens)?;
    let symbols = build_symbol_table(&lines, base)?;
    let binary = assemble_to_bytes(&lines, &symbols)?;
    Ok(AssembleResult { binary, symbols })
}
