use super::*;

#[test]
fn stores_the_low_byte() {
    let (_, mem) = exec(instr(Opcode::STORE8_ABS, 0, 1, 0, 0x0200), |cpu, _| {
        *cpu.register_mut(1) = 5;
    });
    assert_eq!(mem.read_u8(0x0200), Ok(5));
}

#[test]
fn truncates_to_eight_bits() {
    let (_, mem) = exec(instr(Opcode::STORE8_ABS, 0, 1, 0, 0x0200), |cpu, _| {
        *cpu.register_mut(1) = 0x1234_56FF;
    });
    assert_eq!(mem.read_u8(0x0200), Ok(0xFF));
}

#[test]
fn address_past_end_faults() {
    exec_faults!(instr(Opcode::STORE8_ABS, 0, 1, 0, 0x1_0000), MemOob);
}

#[test]
fn negative_address_faults() {
    exec_faults!(instr(Opcode::STORE8_ABS, 0, 1, 0, -8), MemOob);
}

#[test]
fn nonzero_rd_is_illegal() {
    exec_faults!(instr(Opcode::STORE8_ABS, 2, 1, 0, 0x0200), IllegalEncoding);
}

#[test]
fn rejects_fp_selector() {
    exec_faults!(instr(Opcode::STORE8_ABS, 0, SEL_FP, 0, 0x0200), RegOob);
}
