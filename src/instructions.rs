use std::error::Error as StdError;
use std::fmt;

use byteorder::ByteOrder;
use num_derive::{FromPrimitive, ToPrimitive};
use util::Endian;

use crate::constants::INSTR_BYTES;

use self::OperandKind::*;

// Instruction word layout (8 bytes, imm32 little-endian):
//
//          +--------+------+------+------+---------------------+
//          | byte 0 |   1  |   2  |   3  |        4..7         |
//          +--------+------+------+------+---------------------+
//          | opcode |  rd  |  ra  |  rb  |     imm32 (i32)     |
//          +--------+------+------+------+---------------------+

/// Processor instruction set.
///
/// The discriminant of each variant is the opcode byte. Gaps between the
/// groups are reserved; executing a reserved opcode faults.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive)]
pub enum Opcode {
    /// Stops the processor. All other fields must be zero.
    HALT = 0x00,
    /// Writes the sign-extended immediate to the `rd` selectee.
    MOV_RI = 0x01,
    /// Copies the `ra` selectee to the `rd` selectee.
    MOV_RR = 0x02,
    /// `Rd = (Ra + Rb) mod 2^64`, updates `Z`.
    ADD = 0x10,
    /// `Rd = (Ra - Rb) mod 2^64`, updates `Z`.
    SUB = 0x11,
    /// Updates `Z` from `(Ra - Rb) mod 2^64` without writing a register.
    CMP = 0x12,
    /// `Rd = zext(mem[imm32])`.
    LOAD8_ABS = 0x20,
    /// `mem[imm32] = Ra & 0xFF`.
    STORE8_ABS = 0x21,
    /// `PC = imm32`.
    JMP_ABS = 0x30,
    /// `PC = PC + imm32`.
    JMP_REL = 0x31,
    /// `PC = imm32` if `Z` is set.
    JZ_ABS = 0x32,
    /// `PC = PC + imm32` if `Z` is set.
    JZ_REL = 0x33,
    /// `mem[SP] = Ra & 0xFF; SP -= 1`.
    PUSH8 = 0x40,
    /// `SP += 1; Rd = zext(mem[SP])`.
    POP8 = 0x41,
    /// Pushes the 8-byte return address, then `PC = imm32 & 0xFFFF`.
    CALL_ABS = 0x42,
    /// Pops the 8-byte return address into `PC`.
    RET = 0x43,
}

macro_rules! impl_enum_display {
    ($e:ty) => {
        impl std::fmt::Display for $e {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                std::fmt::Debug::fmt(self, f)
            }
        }
    };
}

impl_enum_display!(Opcode);

/// Operand slot kinds used by instruction schemas.
///
/// `AddrAbs` and `AddrRel` both land in the `imm32` field at encode time;
/// the absolute/relative distinction only matters to the processor.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OperandKind {
    Rd,
    Ra,
    Rb,
    Imm32,
    AddrAbs,
    AddrRel,
}

/// `zeroed` bit for a `rd` field that must be zero in the encoding.
pub const Z_RD: u8 = 1 << 0;
/// `zeroed` bit for a `ra` field that must be zero in the encoding.
pub const Z_RA: u8 = 1 << 1;
/// `zeroed` bit for a `rb` field that must be zero in the encoding.
pub const Z_RB: u8 = 1 << 2;
/// `zeroed` bit for an `imm32` field that must be zero in the encoding.
pub const Z_IMM: u8 = 1 << 3;

/// Encoding schema and field constraints for one mnemonic.
///
/// The assembler fills fields from `schema` in operand order and rejects
/// any instruction whose `zeroed` fields end up non-zero; the processor
/// re-checks the same constraints at execution time.
#[derive(Clone, Copy, Debug)]
pub struct InstrSpec {
    pub opcode: Opcode,
    pub mnemonic: &'static str,
    pub schema: &'static [OperandKind],
    pub zeroed: u8,
}

impl InstrSpec {
    pub fn rd_must_be_zero(&self) -> bool {
        self.zeroed & Z_RD != 0
    }

    pub fn ra_must_be_zero(&self) -> bool {
        self.zeroed & Z_RA != 0
    }

    pub fn rb_must_be_zero(&self) -> bool {
        self.zeroed & Z_RB != 0
    }

    pub fn imm_must_be_zero(&self) -> bool {
        self.zeroed & Z_IMM != 0
    }
}

/// The authoritative mnemonic table shared by assembler and emulator.
pub const INSTRUCTIONS: [InstrSpec; 16] = [
    InstrSpec { opcode: Opcode::HALT, mnemonic: "HALT", schema: &[], zeroed: Z_RD | Z_RA | Z_RB | Z_IMM },
    InstrSpec { opcode: Opcode::MOV_RI, mnemonic: "MOV_RI", schema: &[Rd, Imm32], zeroed: Z_RA | Z_RB },
    InstrSpec { opcode: Opcode::MOV_RR, mnemonic: "MOV_RR", schema: &[Rd, Ra], zeroed: Z_RB | Z_IMM },
    InstrSpec { opcode: Opcode::ADD, mnemonic: "ADD", schema: &[Rd, Ra, Rb], zeroed: Z_IMM },
    InstrSpec { opcode: Opcode::SUB, mnemonic: "SUB", schema: &[Rd, Ra, Rb], zeroed: Z_IMM },
    InstrSpec { opcode: Opcode::CMP, mnemonic: "CMP", schema: &[Ra, Rb], zeroed: Z_RD | Z_IMM },
    InstrSpec { opcode: Opcode::LOAD8_ABS, mnemonic: "LOAD8_ABS", schema: &[Rd, AddrAbs], zeroed: Z_RA | Z_RB },
    InstrSpec { opcode: Opcode::STORE8_ABS, mnemonic: "STORE8_ABS", schema: &[AddrAbs, Ra], zeroed: Z_RD | Z_RB },
    InstrSpec { opcode: Opcode::JMP_ABS, mnemonic: "JMP_ABS", schema: &[AddrAbs], zeroed: Z_RD | Z_RA | Z_RB },
    InstrSpec { opcode: Opcode::JMP_REL, mnemonic: "JMP_REL", schema: &[AddrRel], zeroed: Z_RD | Z_RA | Z_RB },
    InstrSpec { opcode: Opcode::JZ_ABS, mnemonic: "JZ_ABS", schema: &[AddrAbs], zeroed: Z_RD | Z_RA | Z_RB },
    InstrSpec { opcode: Opcode::JZ_REL, mnemonic: "JZ_REL", schema: &[AddrRel], zeroed: Z_RD | Z_RA | Z_RB },
    InstrSpec { opcode: Opcode::PUSH8, mnemonic: "PUSH8", schema: &[Ra], zeroed: Z_RD | Z_RB | Z_IMM },
    InstrSpec { opcode: Opcode::POP8, mnemonic: "POP8", schema: &[Rd], zeroed: Z_RA | Z_RB | Z_IMM },
    InstrSpec { opcode: Opcode::CALL_ABS, mnemonic: "CALL_ABS", schema: &[AddrAbs], zeroed: Z_RD | Z_RA | Z_RB },
    InstrSpec { opcode: Opcode::RET, mnemonic: "RET", schema: &[], zeroed: Z_RD | Z_RA | Z_RB | Z_IMM },
];

/// Looks up the spec for an (uppercased) mnemonic.
///
/// # Examples
/// ```
/// use dcpu::{spec_for_mnemonic, Opcode};
///
/// assert_eq!(spec_for_mnemonic("ADD").unwrap().opcode, Opcode::ADD);
/// assert_eq!(spec_for_mnemonic("RET").unwrap().schema.len(), 0);
/// assert!(spec_for_mnemonic("NOP").is_none());
/// ```
pub fn spec_for_mnemonic(mnemonic: &str) -> Option<&'static InstrSpec> {
    INSTRUCTIONS.iter().find(|spec| spec.mnemonic == mnemonic)
}

/// Looks up the spec for an opcode byte.
///
/// # Examples
/// ```
/// use dcpu::spec_for_opcode;
///
/// assert_eq!(spec_for_opcode(0x42).unwrap().mnemonic, "CALL_ABS");
/// assert!(spec_for_opcode(0x44).is_none());
/// ```
pub fn spec_for_opcode(opcode: u8) -> Option<&'static InstrSpec> {
    INSTRUCTIONS.iter().find(|spec| spec.opcode as u8 == opcode)
}

/// Error type for [`encode_instr`]: a field does not fit its slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EncodeError {
    FieldRange { field: &'static str, value: i64 },
    ImmRange { value: i64 },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EncodeError::FieldRange { field, value } => {
                write!(f, "{} out of u8 range: {}", field, value)
            }
            EncodeError::ImmRange { value } => write!(f, "imm32 out of range: {}", value),
        }
    }
}

impl StdError for EncodeError {}

fn pack_u8(field: &'static str, value: i64) -> Result<u8, EncodeError> {
    if value < 0 || value > 0xFF {
        Err(EncodeError::FieldRange { field, value })
    } else {
        Ok(value as u8)
    }
}

/// Packs one instruction word: `[opcode, rd, ra, rb, imm32 LE]`.
///
/// # Errors
/// Returns an error if `opcode`, `rd`, `ra` or `rb` does not fit in a
/// byte, or if `imm32` lies outside the signed 32-bit range.
///
/// # Examples
/// ```
/// use dcpu::{encode_instr, Opcode};
///
/// assert_eq!(
///     encode_instr(Opcode::MOV_RI as i64, 1, 0, 0, 0x0200),
///     Ok([0x01, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00])
/// );
/// ```
///
/// Out-of-range fields are rejected rather than truncated:
/// ```
/// use dcpu::{encode_instr, Opcode};
///
/// assert!(encode_instr(Opcode::MOV_RI as i64, 256, 0, 0, 0).is_err());
/// assert!(encode_instr(Opcode::MOV_RI as i64, 1, 0, 0, 1 << 31).is_err());
/// ```
pub fn encode_instr(
    opcode: i64,
    rd: i64,
    ra: i64,
    rb: i64,
    imm32: i64,
) -> Result<[u8; INSTR_BYTES], EncodeError> {
    let mut word = [0u8; INSTR_BYTES];
    word[0] = pack_u8("opcode", opcode)?;
    word[1] = pack_u8("rd", rd)?;
    word[2] = pack_u8("ra", ra)?;
    word[3] = pack_u8("rb", rb)?;

    if imm32 < i64::from(i32::min_value()) || imm32 > i64::from(i32::max_value()) {
        return Err(EncodeError::ImmRange { value: imm32 });
    }
    Endian::write_i32(&mut word[4..8], imm32 as i32);

    Ok(word)
}

/// A decoded instruction word. `imm32` is sign-extended from the
/// little-endian 32-bit field.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DecodedInstr {
    pub opcode: u8,
    pub rd: u8,
    pub ra: u8,
    pub rb: u8,
    pub imm32: i32,
}

/// Unpacks exactly one 8-byte instruction word.
///
/// # Panics
/// In debug builds, panics if `word` is not exactly 8 bytes.
///
/// # Examples
/// ```
/// use dcpu::{decode_instr, encode_instr, Opcode};
///
/// let word = encode_instr(Opcode::ADD as i64, 3, 1, 2, 0).unwrap();
/// let ins = decode_instr(&word);
/// assert_eq!(ins.opcode, Opcode::ADD as u8);
/// assert_eq!((ins.rd, ins.ra, ins.rb), (3, 1, 2));
/// ```
///
/// The immediate is sign-extended from its 32-bit field:
/// ```
/// use dcpu::decode_instr;
///
/// let ins = decode_instr(&[0x01, 0x01, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]);
/// assert_eq!(ins.imm32, -1);
/// ```
pub fn decode_instr(word: &[u8]) -> DecodedInstr {
    debug_assert_eq!(word.len(), INSTR_BYTES);
    DecodedInstr {
        opcode: word[0],
        rd: word[1],
        ra: word[2],
        rb: word[3],
        imm32: Endian::read_i32(&word[4..8]),
    }
}
