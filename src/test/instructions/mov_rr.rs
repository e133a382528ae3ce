use super::*;

#[test]
fn copies_register() {
    let (cpu, _) = exec(instr(Opcode::MOV_RR, 2, 1, 0, 0), |cpu, _| {
        *cpu.register_mut(1) = 0x1234_5678_9ABC_DEF0;
    });
    assert_eq!(cpu.register(2), 0x1234_5678_9ABC_DEF0);
    assert_eq!(cpu.register(1), 0x1234_5678_9ABC_DEF0);
}

#[test]
fn reads_and_writes_sp_and_fp() {
    let (cpu, _) = run_program(
        0x0100,
        &[
            instr(Opcode::MOV_RI, 1, 0, 0, 0x9000),
            instr(Opcode::MOV_RR, SEL_SP, 1, 0, 0),
            instr(Opcode::MOV_RR, 2, SEL_SP, 0, 0),
            instr(Opcode::MOV_RR, 3, SEL_FP, 0, 0),
            instr(Opcode::HALT, 0, 0, 0, 0),
        ],
    );
    assert_normal_halt(&cpu);
    assert_eq!(cpu.stack_pointer(), 0x9000);
    assert_eq!(cpu.register(2), 0x9000);
    assert_eq!(cpu.register(3), STACK_RESET);
}

#[test]
fn same_register_is_a_no_op() {
    let (cpu, _) = exec(instr(Opcode::MOV_RR, 1, 1, 0, 0), |cpu, _| {
        *cpu.register_mut(1) = 7;
    });
    assert_eq!(cpu.register(1), 7);
    assert_eq!(cpu.halt_reason(), HaltReason::None);
}

#[test]
fn sp_to_sp_is_a_no_op() {
    let (cpu, _) = exec(instr(Opcode::MOV_RR, SEL_SP, SEL_SP, 0, 0), |_, _| {});
    assert_eq!(cpu.stack_pointer(), STACK_RESET);
    assert_eq!(cpu.halt_reason(), HaltReason::None);
}

#[test]
fn reading_parked_sp_faults() {
    let (cpu, _) = exec(instr(Opcode::MOV_RR, 1, SEL_SP, 0, 0), |cpu, _| {
        cpu.set_stack_pointer(0x1_0000);
    });
    assert_eq!(fault_code(&cpu), FaultCode::MemOob);
}

#[test]
fn ra_past_selectors_faults() {
    exec_faults!(instr(Opcode::MOV_RR, 1, 0x12, 0, 0), RegOob);
}

#[test]
fn rd_past_selectors_faults() {
    exec_faults!(instr(Opcode::MOV_RR, 0x12, 1, 0, 0), RegOob);
}

#[test]
fn nonzero_rb_is_illegal() {
    exec_faults!(instr(Opcode::MOV_RR, 1, 2, 3, 0), IllegalEncoding);
}

#[test]
fn nonzero_imm_is_illegal() {
    exec_faults!(instr(Opcode::MOV_RR, 1, 2, 0, 1), IllegalEncoding);
}
