use super::*;

#[test]
fn writes_register() {
    let (cpu, _) = exec(instr(Opcode::MOV_RI, 1, 0, 0, 5), |_, _| {});
    assert_eq!(cpu.register(1), 5);
    assert_eq!(cpu.program_counter(), 8);
    assert!(!cpu.zero_flag());
}

#[test]
fn sign_extends_then_masks() {
    // 0x80000000 as an i32 is negative; the register sees the
    // sign-extended 64-bit pattern.
    let (cpu, _) = exec(instr(Opcode::MOV_RI, 1, 0, 0, i32::min_value()), |_, _| {});
    assert_eq!(cpu.register(1), 0xFFFF_FFFF_8000_0000);
}

#[test]
fn negative_one_fills_the_register() {
    let (cpu, _) = exec(instr(Opcode::MOV_RI, 1, 0, 0, -1), |_, _| {});
    assert_eq!(cpu.register(1), u64::max_value());
}

#[test]
fn does_not_touch_zero_flag() {
    let (cpu, _) = exec(instr(Opcode::MOV_RI, 1, 0, 0, 0), |_, _| {});
    assert!(!cpu.zero_flag());
    assert_eq!(cpu.register(1), 0);
}

#[test]
fn sp_selector_writes_stack_pointer() {
    let (cpu, _) = exec(instr(Opcode::MOV_RI, SEL_SP, 0, 0, 0xFF00), |_, _| {});
    assert_eq!(cpu.stack_pointer(), 0xFF00);
    assert_eq!(cpu.halt_reason(), HaltReason::None);
}

#[test]
fn fp_selector_writes_frame_pointer() {
    let (cpu, _) = exec(instr(Opcode::MOV_RI, SEL_FP, 0, 0, 0x9000), |_, _| {});
    assert_eq!(cpu.frame_pointer(), 0x9000);
}

#[test]
fn write_to_parked_sp_faults() {
    // The pointer's current value is validated before the write.
    let (cpu, _) = exec(instr(Opcode::MOV_RI, SEL_SP, 0, 0, 5), |cpu, _| {
        cpu.set_stack_pointer(0x1_0000);
    });
    assert_eq!(fault_code(&cpu), FaultCode::MemOob);
}

#[test]
fn rd_past_selectors_faults() {
    exec_faults!(instr(Opcode::MOV_RI, 0x12, 0, 0, 5), RegOob);
    exec_faults!(instr(Opcode::MOV_RI, 0xFF, 0, 0, 5), RegOob);
}

#[test]
fn nonzero_ra_is_illegal() {
    exec_faults!(instr(Opcode::MOV_RI, 1, 2, 0, 5), IllegalEncoding);
}

#[test]
fn nonzero_rb_is_illegal() {
    exec_faults!(instr(Opcode::MOV_RI, 1, 0, 2, 5), IllegalEncoding);
}
