use dcpu::{encode_instr, spec_for_mnemonic, InstrSpec, OperandKind, INSTR_BYTES};

use crate::error::{AsmError, ErrorCode, SourcePos};
use crate::parser::{Line, Operand};
use crate::symbols::SymbolTable;
use crate::Result;

/// Second pass: resolve operands against each instruction's schema and
/// emit the flat byte stream.
pub fn assemble_to_bytes(lines: &[Line], symbols: &SymbolTable) -> Result<Vec<u8>> {
    let mut out = Vec::new();

    for line in lines {
        let instr = match &line.instr {
            Some(instr) => instr,
            None => continue,
        };

        // The parser only admits known mnemonics.
        let spec = spec_for_mnemonic(&instr.mnemonic).ok_or_else(|| {
            AsmError::new(
                instr.pos,
                ErrorCode::Internal,
                format!("no spec for mnemonic: {}", instr.mnemonic),
            )
        })?;

        if instr.operands.len() != spec.schema.len() {
            return Err(AsmError::new(
                instr.pos,
                ErrorCode::Arity,
                format!(
                    "{} expects {} operand(s), got {}",
                    instr.mnemonic,
                    spec.schema.len(),
                    instr.operands.len()
                ),
            ));
        }

        let mut rd = 0i64;
        let mut ra = 0i64;
        let mut rb = 0i64;
        let mut imm = 0i64;

        for (kind, operand) in spec.schema.iter().zip(&instr.operands) {
            match kind {
                OperandKind::Rd => rd = expect_reg(operand)?,
                OperandKind::Ra => ra = expect_reg(operand)?,
                OperandKind::Rb => rb = expect_reg(operand)?,
                OperandKind::Imm32 | OperandKind::AddrAbs | OperandKind::AddrRel => {
                    imm = resolve_imm32(operand, symbols)?
                }
            }
        }

        let word = encode_with_spec(spec, instr.pos, rd, ra, rb, imm)?;
        out.extend_from_slice(&word);
    }

    Ok(out)
}

/// Enforces the spec's must-be-zero fields, then packs the word.
///
/// The table's schemas never route an operand into a must-be-zero slot,
/// so source text cannot trip these checks; they guard callers that
/// fill fields by hand.
fn encode_with_spec(
    spec: &InstrSpec,
    pos: SourcePos,
    rd: i64,
    ra: i64,
    rb: i64,
    imm: i64,
) -> Result<[u8; INSTR_BYTES]> {
    if spec.rd_must_be_zero() && rd != 0 {
        return Err(field_nonzero(pos, "rd"));
    }
    if spec.ra_must_be_zero() && ra != 0 {
        return Err(field_nonzero(pos, "ra"));
    }
    if spec.rb_must_be_zero() && rb != 0 {
        return Err(field_nonzero(pos, "rb"));
    }
    if spec.imm_must_be_zero() && imm != 0 {
        return Err(field_nonzero(pos, "imm32"));
    }

    encode_instr(spec.opcode as i64, rd, ra, rb, imm)
        .map_err(|err| AsmError::new(pos, ErrorCode::Range, err.to_string()))
}

fn field_nonzero(pos: SourcePos, field: &str) -> AsmError {
    AsmError::new(
        pos,
        ErrorCode::FieldNonzero,
        format!("{} must be zero for this instruction", field),
    )
}

fn expect_reg(operand: &Operand) -> Result<i64> {
    match operand {
        Operand::Register { index, pos } => {
            if *index > 15 {
                Err(
                    AsmError::new(*pos, ErrorCode::BadReg, format!("register out of range: R{}", index))
                        .with_hint("valid registers are R0 through R15"),
                )
            } else {
                Ok(i64::from(*index))
            }
        }
        other => Err(AsmError::new(
            other.pos(),
            ErrorCode::BadOperand,
            "expected a register operand",
        )),
    }
}

fn resolve_imm32(operand: &Operand, symbols: &SymbolTable) -> Result<i64> {
    let value = match operand {
        Operand::Number { value, .. } => *value,
        Operand::LabelRef { name, pos } => *symbols.get(name).ok_or_else(|| {
            AsmError::new(*pos, ErrorCode::UndefLabel, format!("undefined label: {}", name))
        })?,
        Operand::Register { pos, .. } => {
            return Err(AsmError::new(
                *pos,
                ErrorCode::BadOperand,
                "expected a number or label operand",
            ))
        }
    };
    Ok(normalize_imm32(value))
}

/// Literals above `i32::MAX` that still fit 32 bits denote their two's
/// complement bit pattern, so `0x80000000` assembles to the negative
/// immediate with the same encoding.
fn normalize_imm32(value: i64) -> i64 {
    if value > i64::from(i32::max_value()) && value <= i64::from(u32::max_value()) {
        i64::from(value as u32 as i32)
    } else {
        value
    }
}
