use super::*;

#[test]
fn pushes_return_address_and_jumps() {
    let (cpu, mem) = exec_at(0x0100, instr(Opcode::CALL_ABS, 0, 0, 0, 0x0200), |_, _| {});
    assert_eq!(cpu.program_counter(), 0x0200);
    assert_eq!(cpu.stack_pointer(), STACK_RESET - 8);
    // The 8 bytes below the old SP hold 0x0108 little-endian: low byte
    // at the lowest address.
    assert_eq!(
        mem.read_slice(STACK_RESET - 7, 8).unwrap(),
        &[0x08, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
    );
}

#[test]
fn target_is_taken_modulo_the_address_space() {
    // No target validation on CALL itself; the next fetch faults.
    let (mut cpu, mut mem) = boot(0x0100, &[instr(Opcode::CALL_ABS, 0, 0, 0, 0x0203)]);
    cpu.step(&mut mem);
    assert_eq!(cpu.program_counter(), 0x0203);
    assert!(!cpu.is_halted());
    cpu.step(&mut mem);
    assert_eq!(fault_code(&cpu), FaultCode::Misaligned);
}

#[test]
fn unaligned_stack_slot_faults() {
    // SP = 0xFDFA gives base = 0xFDF3, which is not 8-byte aligned.
    let (cpu, _) = exec_at(0x0100, instr(Opcode::CALL_ABS, 0, 0, 0, 0x0200), |cpu, _| {
        cpu.set_stack_pointer(0xFDFA);
    });
    assert_eq!(fault_code(&cpu), FaultCode::Misaligned);
    assert_eq!(cpu.stack_pointer(), 0xFDFA);
}

#[test]
fn stack_slot_past_end_faults() {
    let (cpu, _) = exec_at(0x0100, instr(Opcode::CALL_ABS, 0, 0, 0, 0x0200), |cpu, _| {
        cpu.set_stack_pointer(0x1_0007);
    });
    assert_eq!(fault_code(&cpu), FaultCode::MemOob);
}

#[test]
fn stack_slot_below_zero_faults() {
    // SP = 3 gives base = -4: the alignment check fires first.
    let (cpu, _) = exec_at(0x0100, instr(Opcode::CALL_ABS, 0, 0, 0, 0x0200), |cpu, _| {
        cpu.set_stack_pointer(3);
    });
    assert_eq!(fault_code(&cpu), FaultCode::Misaligned);
}

#[test]
fn caller_too_close_to_end_faults() {
    // PC + 15 exceeds the address space: the return address would not
    // be fetchable.
    let (cpu, _) = exec_at(0xFFF8, instr(Opcode::CALL_ABS, 0, 0, 0, 0x0200), |_, _| {});
    assert_eq!(fault_code(&cpu), FaultCode::PcOob);
}

#[test]
fn nonzero_register_fields_are_illegal() {
    exec_faults!(instr(Opcode::CALL_ABS, 1, 0, 0, 0x0200), IllegalEncoding);
    exec_faults!(instr(Opcode::CALL_ABS, 0, 1, 0, 0x0200), IllegalEncoding);
}
