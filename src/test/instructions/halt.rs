use super::*;

#[test]
fn halts_normally_with_pc_unchanged() {
    let (cpu, _) = exec(instr(Opcode::HALT, 0, 0, 0, 0), |_, _| {});
    assert!(cpu.is_halted());
    assert_eq!(cpu.halt_reason(), HaltReason::Normal);
    assert_eq!(cpu.program_counter(), 0);
    assert_eq!(cpu.fault(), None);
}

#[test]
fn nonzero_rd_is_illegal() {
    exec_faults!(instr(Opcode::HALT, 1, 0, 0, 0), IllegalEncoding);
}

#[test]
fn nonzero_imm_is_illegal() {
    exec_faults!(instr(Opcode::HALT, 0, 0, 0, 1), IllegalEncoding);
}

#[test]
fn high_imm_byte_is_illegal() {
    // Raw word 00 00 00 00 00 00 00 01: imm32 = 0x01000000.
    let (cpu, _) = exec([0, 0, 0, 0, 0, 0, 0, 1], |_, _| {});
    assert_eq!(fault_code(&cpu), FaultCode::IllegalEncoding);
    assert_eq!(cpu.fault().unwrap().imm32, 0x0100_0000);
}
