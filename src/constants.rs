/// Size of one encoded instruction word in bytes.
pub const INSTR_BYTES: usize = 8;

/// Size of the flat address space in bytes.
pub const MEM_SIZE: usize = 0x1_0000;

/// Highest valid byte address.
pub const MEM_LAST: u64 = 0xFFFF;

/// Number of general purpose registers.
pub const REGISTER_COUNT: usize = 16;

/// Highest general purpose register index.
pub const REG_INDEX_MAX: u8 = 15;

/// Selector byte denoting the stack pointer in a `rd`/`ra` slot.
pub const SEL_SP: u8 = 0x10;

/// Selector byte denoting the frame pointer in a `rd`/`ra` slot.
pub const SEL_FP: u8 = 0x11;

/// Reset value of SP and FP. `STACK_RESET - 7` is 8-byte aligned, so the
/// first call finds an aligned return-address slot.
pub const STACK_RESET: u64 = 0xFDFF;
