//! Core of the DCPU-64 toolchain: the bit-exact instruction encoding
//! shared with the assembler, the 64 KiB flat memory and the
//! fault-precise processor.
//!
//! A run owns one `(Processor, Memory)` pair. The driver loads a flat
//! binary with [`Memory::load`], points the processor at it and calls
//! [`Processor::step`] in a loop until the halt record is set (or an
//! external step budget runs out).

pub mod constants;
pub mod instructions;
pub mod memory;
pub mod processor;

pub use crate::constants::*;
pub use crate::instructions::*;
pub use crate::memory::{Memory, OutOfRange};
pub use crate::processor::{FaultCode, FaultInfo, HaltReason, Processor};

/// Width of a general purpose register value.
pub type Word = u64;
