use super::*;

#[test]
fn writes_at_sp_then_decrements() {
    let (cpu, mem) = exec(instr(Opcode::PUSH8, 0, 1, 0, 0), |cpu, _| {
        *cpu.register_mut(1) = 0xAB;
    });
    assert_eq!(mem.read_u8(STACK_RESET), Ok(0xAB));
    assert_eq!(cpu.stack_pointer(), STACK_RESET - 1);
    assert_eq!(cpu.halt_reason(), HaltReason::None);
}

#[test]
fn pushes_only_the_low_byte() {
    let (_, mem) = exec(instr(Opcode::PUSH8, 0, 1, 0, 0), |cpu, _| {
        *cpu.register_mut(1) = 0x1234;
    });
    assert_eq!(mem.read_u8(STACK_RESET), Ok(0x34));
}

#[test]
fn sp_zero_faults() {
    let (cpu, _) = exec(instr(Opcode::PUSH8, 0, 1, 0, 0), |cpu, _| {
        cpu.set_stack_pointer(0);
    });
    assert_eq!(fault_code(&cpu), FaultCode::MemOob);
}

#[test]
fn parked_sp_faults() {
    let (cpu, _) = exec(instr(Opcode::PUSH8, 0, 1, 0, 0), |cpu, _| {
        cpu.set_stack_pointer(0x1_0000);
    });
    assert_eq!(fault_code(&cpu), FaultCode::MemOob);
}

#[test]
fn rejects_sp_selector() {
    exec_faults!(instr(Opcode::PUSH8, 0, SEL_SP, 0, 0), RegOob);
}

#[test]
fn nonzero_rd_is_illegal() {
    exec_faults!(instr(Opcode::PUSH8, 1, 1, 0, 0), IllegalEncoding);
}

#[test]
fn nonzero_imm_is_illegal() {
    exec_faults!(instr(Opcode::PUSH8, 0, 1, 0, 1), IllegalEncoding);
}
