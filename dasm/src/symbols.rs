use std::collections::HashMap;

use dcpu::constants::INSTR_BYTES;

use crate::error::{AsmError, ErrorCode, SourcePos};
use crate::parser::Line;
use crate::Result;

/// Uppercased label name → absolute address (`base` + offset).
pub type SymbolTable = HashMap<String, i64>;

/// First pass: bind every label to the address of the next instruction.
pub fn build_symbol_table(lines: &[Line], base: i64) -> Result<SymbolTable> {
    let mut pc = base;
    let mut symbols = SymbolTable::new();

    for line in lines {
        if let Some(label) = &line.label {
            if symbols.contains_key(label) {
                let pos = line.label_pos.unwrap_or(SourcePos { line: 1, col: 1 });
                return Err(AsmError::new(
                    pos,
                    ErrorCode::DupLabel,
                    format!("duplicate label: {}", label),
                ));
            }
            symbols.insert(label.clone(), pc);
        }
        if line.instr.is_some() {
            pc += INSTR_BYTES as i64;
        }
    }

    Ok(symbols)
}
