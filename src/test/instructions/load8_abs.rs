use super::*;

#[test]
fn loads_a_byte() {
    let (cpu, _) = exec(instr(Opcode::LOAD8_ABS, 2, 0, 0, 0x0200), |_, mem| {
        mem.write_u8(0x0200, 5).unwrap();
    });
    assert_eq!(cpu.register(2), 5);
    assert_eq!(cpu.program_counter(), 8);
}

#[test]
fn zero_extends() {
    let (cpu, _) = exec(instr(Opcode::LOAD8_ABS, 2, 0, 0, 0x0200), |_, mem| {
        mem.write_u8(0x0200, 0xFF).unwrap();
    });
    assert_eq!(cpu.register(2), 0xFF);
}

#[test]
fn overwrites_previous_value() {
    let (cpu, _) = exec(instr(Opcode::LOAD8_ABS, 2, 0, 0, 0x0200), |cpu, _| {
        *cpu.register_mut(2) = u64::max_value();
    });
    assert_eq!(cpu.register(2), 0);
}

#[test]
fn address_past_end_faults() {
    exec_faults!(instr(Opcode::LOAD8_ABS, 1, 0, 0, 0x1_0000), MemOob);
}

#[test]
fn negative_address_faults() {
    exec_faults!(instr(Opcode::LOAD8_ABS, 1, 0, 0, -1), MemOob);
}

#[test]
fn last_byte_is_addressable() {
    let (cpu, _) = exec(instr(Opcode::LOAD8_ABS, 1, 0, 0, 0xFFFF), |_, mem| {
        mem.write_u8(0xFFFF, 0xAA).unwrap();
    });
    assert_eq!(cpu.register(1), 0xAA);
}

#[test]
fn nonzero_ra_is_illegal() {
    exec_faults!(instr(Opcode::LOAD8_ABS, 1, 2, 0, 0x0200), IllegalEncoding);
}

#[test]
fn rejects_sp_selector() {
    exec_faults!(instr(Opcode::LOAD8_ABS, SEL_SP, 0, 0, 0x0200), RegOob);
}
