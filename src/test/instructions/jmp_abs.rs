use super::*;

#[test]
fn jumps_to_the_target() {
    let (cpu, _) = exec(instr(Opcode::JMP_ABS, 0, 0, 0, 0x0020), |_, _| {});
    assert_eq!(cpu.program_counter(), 0x0020);
    assert!(!cpu.is_halted());
}

#[test]
fn last_instruction_slot_is_reachable() {
    let (cpu, _) = exec(instr(Opcode::JMP_ABS, 0, 0, 0, 0xFFF8), |_, _| {});
    assert_eq!(cpu.program_counter(), 0xFFF8);
}

#[test]
fn misaligned_target_faults() {
    exec_faults!(instr(Opcode::JMP_ABS, 0, 0, 0, 0x0003), Misaligned);
}

#[test]
fn target_past_end_faults() {
    exec_faults!(instr(Opcode::JMP_ABS, 0, 0, 0, 0xFFF9), PcOob);
    exec_faults!(instr(Opcode::JMP_ABS, 0, 0, 0, 0x1_0000), PcOob);
}

#[test]
fn negative_target_faults() {
    exec_faults!(instr(Opcode::JMP_ABS, 0, 0, 0, -8), PcOob);
}

#[test]
fn bounds_check_precedes_alignment() {
    // 0x10001 is both out of range and misaligned.
    exec_faults!(instr(Opcode::JMP_ABS, 0, 0, 0, 0x1_0001), PcOob);
}

#[test]
fn nonzero_register_fields_are_illegal() {
    exec_faults!(instr(Opcode::JMP_ABS, 1, 0, 0, 0x0020), IllegalEncoding);
    exec_faults!(instr(Opcode::JMP_ABS, 0, 1, 0, 0x0020), IllegalEncoding);
    exec_faults!(instr(Opcode::JMP_ABS, 0, 0, 1, 0x0020), IllegalEncoding);
}

#[test]
fn tight_loop_runs_within_budget() {
    // JMP_ABS to itself never halts; the driver's budget stops it.
    let (mut cpu, mut mem) = boot(0, &[instr(Opcode::JMP_ABS, 0, 0, 0, 0)]);
    for _ in 0..100 {
        cpu.step(&mut mem);
    }
    assert!(!cpu.is_halted());
    assert_eq!(cpu.program_counter(), 0);
}
