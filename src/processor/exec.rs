use byteorder::ByteOrder;
use num_traits::FromPrimitive;
use util::Endian;

use crate::constants::{INSTR_BYTES, MEM_LAST, REG_INDEX_MAX, SEL_FP, SEL_SP};
use crate::instructions::{DecodedInstr, Opcode};
use crate::memory::{Memory, OutOfRange};

use super::{FaultCode, Processor};

/// Control-flow effect of a successfully executed instruction.
pub(super) enum Flow {
    /// Default PC update (`PC += 8`, validated by the caller).
    Next,
    /// `PC` is overwritten with an already-authorized value.
    Jump(u64),
    /// Normal halt; PC unchanged.
    Halt,
}

/// A fault detected during dispatch. The caller folds it into the halt
/// record together with the decoded instruction fields.
pub(super) struct Trap {
    pub code: FaultCode,
    pub message: &'static str,
}

impl From<OutOfRange> for Trap {
    fn from(_: OutOfRange) -> Trap {
        trap(FaultCode::MemOob, "memory access out of range")
    }
}

type Exec = Result<Flow, Trap>;

fn trap(code: FaultCode, message: &'static str) -> Trap {
    Trap { code, message }
}

fn encoding(ok: bool, message: &'static str) -> Result<(), Trap> {
    if ok {
        Ok(())
    } else {
        Err(trap(FaultCode::IllegalEncoding, message))
    }
}

fn gp_index(value: u8, message: &'static str) -> Result<usize, Trap> {
    if value > REG_INDEX_MAX {
        Err(trap(FaultCode::RegOob, message))
    } else {
        Ok(value as usize)
    }
}

fn pointer_in_range(value: u64, message: &'static str) -> Result<(), Trap> {
    if value > MEM_LAST {
        Err(trap(FaultCode::MemOob, message))
    } else {
        Ok(())
    }
}

/// Validates a `rd`/`ra` byte of the two MOV opcodes: either the SP/FP
/// selector (whose current value must be a valid address) or a general
/// register index.
fn check_selectee(cpu: &Processor, sel: u8, message: &'static str) -> Result<(), Trap> {
    match sel {
        SEL_SP => pointer_in_range(cpu.sp, "SP out of memory range"),
        SEL_FP => pointer_in_range(cpu.fp, "FP out of memory range"),
        _ => gp_index(sel, message).map(|_| ()),
    }
}

fn read_selectee(cpu: &Processor, sel: u8, message: &'static str) -> Result<u64, Trap> {
    check_selectee(cpu, sel, message)?;
    Ok(match sel {
        SEL_SP => cpu.sp,
        SEL_FP => cpu.fp,
        _ => cpu.regs[sel as usize],
    })
}

fn write_selectee(cpu: &mut Processor, sel: u8, value: u64, message: &'static str) -> Result<(), Trap> {
    check_selectee(cpu, sel, message)?;
    match sel {
        SEL_SP => cpu.sp = value,
        SEL_FP => cpu.fp = value,
        _ => cpu.regs[sel as usize] = value,
    }
    Ok(())
}

/// Validates an absolute data address carried in `imm32`.
fn data_addr(imm32: i32) -> Result<u64, Trap> {
    if imm32 < 0 || imm32 as i64 > MEM_LAST as i64 {
        Err(trap(FaultCode::MemOob, "address out of memory range"))
    } else {
        Ok(imm32 as u64)
    }
}

/// Executes one decoded instruction against `cpu` and `mem`.
///
/// Per-opcode check order is contractual: field-zero, register-range,
/// immediate-range, then the semantic effect. The first failing check
/// produces the trap; nothing is mutated before all checks pass.
pub(super) fn dispatch(cpu: &mut Processor, mem: &mut Memory, ins: &DecodedInstr) -> Result<Flow, Trap> {
    let opcode = match Opcode::from_u8(ins.opcode) {
        Some(opcode) => opcode,
        None => return Err(trap(FaultCode::IllegalOpcode, "opcode not defined")),
    };

    match opcode {
        Opcode::HALT => halt(ins),
        Opcode::MOV_RI => mov_ri(cpu, ins),
        Opcode::MOV_RR => mov_rr(cpu, ins),
        Opcode::ADD => alu(cpu, ins, u64::wrapping_add, "ADD requires imm32=0"),
        Opcode::SUB => alu(cpu, ins, u64::wrapping_sub, "SUB requires imm32=0"),
        Opcode::CMP => cmp(cpu, ins),
        Opcode::LOAD8_ABS => load8_abs(cpu, mem, ins),
        Opcode::STORE8_ABS => store8_abs(cpu, mem, ins),
        Opcode::JMP_ABS => jump(cpu, ins, false, false, "JMP_ABS requires rd=0, ra=0, rb=0"),
        Opcode::JMP_REL => jump(cpu, ins, true, false, "JMP_REL requires rd=0, ra=0, rb=0"),
        Opcode::JZ_ABS => jump(cpu, ins, false, true, "JZ_ABS requires rd=0, ra=0, rb=0"),
        Opcode::JZ_REL => jump(cpu, ins, true, true, "JZ_REL requires rd=0, ra=0, rb=0"),
        Opcode::PUSH8 => push8(cpu, mem, ins),
        Opcode::POP8 => pop8(cpu, mem, ins),
        Opcode::CALL_ABS => call_abs(cpu, mem, ins),
        Opcode::RET => ret(cpu, mem, ins),
    }
}

fn halt(ins: &DecodedInstr) -> Exec {
    encoding(
        ins.rd == 0 && ins.ra == 0 && ins.rb == 0 && ins.imm32 == 0,
        "HALT requires all fields zero",
    )?;
    Ok(Flow::Halt)
}

fn mov_ri(cpu: &mut Processor, ins: &DecodedInstr) -> Exec {
    encoding(ins.ra == 0 && ins.rb == 0, "MOV_RI requires ra=0, rb=0")?;
    // Sign-extend, then mask to register width.
    let value = ins.imm32 as i64 as u64;
    write_selectee(cpu, ins.rd, value, "rd out of range")?;
    Ok(Flow::Next)
}

fn mov_rr(cpu: &mut Processor, ins: &DecodedInstr) -> Exec {
    encoding(ins.rb == 0 && ins.imm32 == 0, "MOV_RR requires rb=0, imm32=0")?;
    check_selectee(cpu, ins.rd, "rd out of range")?;
    let value = read_selectee(cpu, ins.ra, "ra out of range")?;
    write_selectee(cpu, ins.rd, value, "rd out of range")?;
    Ok(Flow::Next)
}

fn alu(cpu: &mut Processor, ins: &DecodedInstr, op: fn(u64, u64) -> u64, message: &'static str) -> Exec {
    encoding(ins.imm32 == 0, message)?;
    let rd = gp_index(ins.rd, "rd out of range")?;
    let ra = gp_index(ins.ra, "ra out of range")?;
    let rb = gp_index(ins.rb, "rb out of range")?;
    let result = op(cpu.regs[ra], cpu.regs[rb]);
    cpu.regs[rd] = result;
    cpu.z = result == 0;
    Ok(Flow::Next)
}

fn cmp(cpu: &mut Processor, ins: &DecodedInstr) -> Exec {
    encoding(ins.rd == 0 && ins.imm32 == 0, "CMP requires rd=0, imm32=0")?;
    let ra = gp_index(ins.ra, "ra out of range")?;
    let rb = gp_index(ins.rb, "rb out of range")?;
    cpu.z = cpu.regs[ra].wrapping_sub(cpu.regs[rb]) == 0;
    Ok(Flow::Next)
}

fn load8_abs(cpu: &mut Processor, mem: &Memory, ins: &DecodedInstr) -> Exec {
    encoding(ins.ra == 0 && ins.rb == 0, "LOAD8_ABS requires ra=0, rb=0")?;
    let rd = gp_index(ins.rd, "rd out of range")?;
    let addr = data_addr(ins.imm32)?;
    cpu.regs[rd] = u64::from(mem.read_u8(addr)?);
    Ok(Flow::Next)
}

fn store8_abs(cpu: &Processor, mem: &mut Memory, ins: &DecodedInstr) -> Exec {
    encoding(ins.rd == 0 && ins.rb == 0, "STORE8_ABS requires rd=0, rb=0")?;
    let ra = gp_index(ins.ra, "ra out of range")?;
    let addr = data_addr(ins.imm32)?;
    mem.write_u8(addr, cpu.regs[ra])?;
    Ok(Flow::Next)
}

/// Common body of the four branch opcodes. The target is validated even
/// when a conditional branch will not be taken.
fn jump(cpu: &Processor, ins: &DecodedInstr, relative: bool, conditional: bool, message: &'static str) -> Exec {
    encoding(ins.rd == 0 && ins.ra == 0 && ins.rb == 0, message)?;

    let target = if relative {
        cpu.pc as i64 + i64::from(ins.imm32)
    } else {
        i64::from(ins.imm32)
    };

    if target < 0 || target + (INSTR_BYTES as i64 - 1) > MEM_LAST as i64 {
        return Err(trap(FaultCode::PcOob, "jump target out of range"));
    }
    if target % INSTR_BYTES as i64 != 0 {
        return Err(trap(FaultCode::Misaligned, "jump target not 8-byte aligned"));
    }

    if conditional && !cpu.z {
        Ok(Flow::Next)
    } else {
        Ok(Flow::Jump(target as u64))
    }
}

fn push8(cpu: &mut Processor, mem: &mut Memory, ins: &DecodedInstr) -> Exec {
    encoding(
        ins.rd == 0 && ins.rb == 0 && ins.imm32 == 0,
        "PUSH8 requires rd=0, rb=0, imm32=0",
    )?;
    let ra = gp_index(ins.ra, "ra out of range")?;
    pointer_in_range(cpu.sp, "SP out of memory range")?;
    if cpu.sp == 0 {
        return Err(trap(FaultCode::MemOob, "SP underflow"));
    }
    mem.write_u8(cpu.sp, cpu.regs[ra])?;
    cpu.sp -= 1;
    Ok(Flow::Next)
}

fn pop8(cpu: &mut Processor, mem: &Memory, ins: &DecodedInstr) -> Exec {
    encoding(
        ins.ra == 0 && ins.rb == 0 && ins.imm32 == 0,
        "POP8 requires ra=0, rb=0, imm32=0",
    )?;
    let rd = gp_index(ins.rd, "rd out of range")?;
    if cpu.sp >= MEM_LAST {
        return Err(trap(FaultCode::MemOob, "SP overflow"));
    }
    cpu.sp += 1;
    cpu.regs[rd] = u64::from(mem.read_u8(cpu.sp)?);
    Ok(Flow::Next)
}

fn call_abs(cpu: &mut Processor, mem: &mut Memory, ins: &DecodedInstr) -> Exec {
    encoding(
        ins.rd == 0 && ins.ra == 0 && ins.rb == 0,
        "CALL_ABS requires rd=0, ra=0, rb=0",
    )?;
    // The return address PC+8 must itself be fetchable.
    if cpu.pc + 15 > MEM_LAST {
        return Err(trap(FaultCode::PcOob, "return PC out of fetch range"));
    }

    let base = (cpu.sp as i64).wrapping_sub(7);
    if base.rem_euclid(8) != 0 {
        return Err(trap(FaultCode::Misaligned, "stack slot not 8-byte aligned"));
    }
    if base < 0 || base + 7 > MEM_LAST as i64 {
        return Err(trap(FaultCode::MemOob, "stack slot out of memory range"));
    }
    let base = base as u64;

    let mut slot = [0u8; 8];
    Endian::write_u64(&mut slot, cpu.pc + INSTR_BYTES as u64);
    for (i, byte) in slot.iter().enumerate() {
        mem.write_u8(base + i as u64, u64::from(*byte))?;
    }
    cpu.sp = base.wrapping_sub(1);

    // The target is taken modulo the address space; the next fetch
    // enforces bounds and alignment.
    Ok(Flow::Jump(ins.imm32 as u64 & 0xFFFF))
}

fn ret(cpu: &mut Processor, mem: &Memory, ins: &DecodedInstr) -> Exec {
    encoding(
        ins.rd == 0 && ins.ra == 0 && ins.rb == 0 && ins.imm32 == 0,
        "RET requires all fields zero",
    )?;
    if cpu.pc + 15 > MEM_LAST {
        return Err(trap(FaultCode::PcOob, "return PC out of fetch range"));
    }

    let base = (cpu.sp as i64).wrapping_add(1);
    if base.rem_euclid(8) != 0 {
        return Err(trap(FaultCode::Misaligned, "stack slot not 8-byte aligned"));
    }
    if base < 0 || base + 7 > MEM_LAST as i64 {
        return Err(trap(FaultCode::MemOob, "stack slot out of memory range"));
    }
    let base = base as u64;

    let new_pc = Endian::read_u64(mem.read_slice(base, 8)?);
    cpu.sp = base + 7;

    // No alignment or bounds check on the popped PC; the next fetch
    // enforces both.
    Ok(Flow::Jump(new_pc))
}
