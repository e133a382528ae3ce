//! Driver for running DCPU-64 flat binaries: the step loop with a
//! budget, plus the inspection helpers (trace, hexdump, register dump)
//! used by the command line interface.

use std::error::Error as StdError;
use std::fmt;

use dcpu::{decode_instr, Memory, OutOfRange, Processor, HaltReason, INSTR_BYTES, MEM_LAST};

/// Why [`run_program`] stopped.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RunOutcome {
    /// `HALT` executed; process exit code 0.
    Normal,
    /// The processor faulted; process exit code 1.
    Fault,
    /// The step budget ran out first; process exit code 2.
    BudgetExceeded,
}

pub struct RunResult {
    pub outcome: RunOutcome,
    pub processor: Processor,
    pub memory: Memory,
    pub steps: u64,
}

/// Loads `program` at `start`, points a fresh processor there and steps
/// until it halts or the budget runs out.
///
/// With `trace` set, each step prints the raw word and its decoded
/// fields before executing.
pub fn run_program(
    program: &[u8],
    start: u64,
    max_steps: u64,
    trace: bool,
) -> Result<RunResult, OutOfRange> {
    let mut memory = Memory::blank();
    memory.load(start, program)?;

    let mut processor = Processor::new();
    processor.set_program_counter(start);

    let mut steps = 0u64;
    while !processor.is_halted() && steps < max_steps {
        if trace {
            print_trace(steps, &processor, &memory);
        }
        processor.step(&mut memory);
        steps += 1;
    }

    let outcome = match processor.halt_reason() {
        HaltReason::Normal => RunOutcome::Normal,
        HaltReason::Fault => RunOutcome::Fault,
        HaltReason::None => RunOutcome::BudgetExceeded,
    };

    Ok(RunResult {
        outcome,
        processor,
        memory,
        steps,
    })
}

fn print_trace(steps: u64, processor: &Processor, memory: &Memory) {
    let pc = processor.program_counter();
    match memory.read_slice(pc, INSTR_BYTES) {
        Ok(raw) => {
            let ins = decode_instr(raw);
            let raw_hex = raw
                .iter()
                .map(|b| format!("{:02X}", b))
                .collect::<Vec<_>>()
                .join(" ");
            println!(
                "{:06} PC={:04X}  {}   opc=0x{:02X} rd={} ra={} rb={} imm32={}  Z={}",
                steps,
                pc,
                raw_hex,
                ins.opcode,
                ins.rd,
                ins.ra,
                ins.rb,
                ins.imm32,
                processor.zero_flag() as u8
            );
        }
        Err(err) => println!("{:06} PC={:04X}  <fetch failed: {}>", steps, pc, err),
    }
}

/// Classic 16-byte-wide hexdump with an ASCII gutter; addresses are
/// labelled starting at `start_addr`.
pub fn hexdump(blob: &[u8], start_addr: u64) -> String {
    const WIDTH: usize = 16;
    let mut lines = Vec::new();
    for (i, chunk) in blob.chunks(WIDTH).enumerate() {
        let hex_part = chunk
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");
        let ascii_part: String = chunk
            .iter()
            .map(|&b| if (0x20..=0x7E).contains(&b) { b as char } else { '.' })
            .collect();
        lines.push(format!(
            "{:04X}  {:<width$}  {}",
            start_addr as usize + i * WIDTH,
            hex_part,
            ascii_part,
            width = WIDTH * 3
        ));
    }
    lines.join("\n")
}

/// Registers as 16-digit hex, four per row, followed by PC/SP/FP/Z.
pub fn dump_regs(processor: &Processor) -> String {
    let mut lines = Vec::new();
    for (row, chunk) in processor.registers().chunks(4).enumerate() {
        let cells = chunk
            .iter()
            .enumerate()
            .map(|(j, value)| format!("R{:02}={:016X}", row * 4 + j, value))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(cells);
    }
    lines.push(format!(
        "PC={:04X}  SP={:04X}  FP={:04X}  Z={}",
        processor.program_counter(),
        processor.stack_pointer(),
        processor.frame_pointer(),
        processor.zero_flag() as u8
    ));
    lines.join("\n")
}

/// Error for a malformed `--hex` program string.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParseHexError {
    reason: &'static str,
}

impl fmt::Display for ParseHexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.reason)
    }
}

impl StdError for ParseHexError {}

/// Parses a program given as a hex string; whitespace is ignored.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, ParseHexError> {
    let digits: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(ParseHexError {
            reason: "hex string has odd length (missing a nibble)",
        });
    }
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks(2) {
        let hi = pair[0].to_digit(16);
        let lo = pair[1].to_digit(16);
        match (hi, lo) {
            (Some(hi), Some(lo)) => bytes.push((hi * 16 + lo) as u8),
            _ => {
                return Err(ParseHexError {
                    reason: "hex string contains a non-hex digit",
                })
            }
        }
    }
    Ok(bytes)
}

/// Validates a `--dump-mem ADDR SIZE` request against the address space.
pub fn check_dump_range(addr: u64, size: u64) -> Result<(), String> {
    if size == 0 {
        return Err("SIZE must be > 0".to_string());
    }
    let end = addr.checked_add(size - 1);
    if addr > MEM_LAST || end.map_or(true, |end| end > MEM_LAST) {
        return Err("dump range out of memory bounds".to_string());
    }
    Ok(())
}
