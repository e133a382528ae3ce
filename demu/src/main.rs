#[macro_use]
extern crate clap;

use std::fs;
use std::process;

use clap::{Arg, ArgGroup, ArgMatches, SubCommand};

use demu::{check_dump_range, dump_regs, hexdump, parse_hex, run_program, RunOutcome};

fn main() {
    let matches = app_from_crate!()
        .setting(clap::AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("run")
                .about("Run a flat binary program in the 64 KiB memory")
                .arg(
                    Arg::with_name("bin")
                        .long("bin")
                        .takes_value(true)
                        .value_name("FILE")
                        .help("Raw binary program file"),
                )
                .arg(
                    Arg::with_name("hex")
                        .long("hex")
                        .takes_value(true)
                        .value_name("BYTES")
                        .help("Program bytes as a hex string (spaces allowed)"),
                )
                .group(ArgGroup::with_name("program").args(&["bin", "hex"]).required(true))
                .arg(
                    Arg::with_name("start")
                        .long("start")
                        .takes_value(true)
                        .value_name("ADDR")
                        .default_value("0x0000")
                        .help("Load address and initial PC"),
                )
                .arg(
                    Arg::with_name("max-steps")
                        .long("max-steps")
                        .takes_value(true)
                        .value_name("N")
                        .default_value("100000")
                        .help("Stop after N steps to avoid infinite loops"),
                )
                .arg(
                    Arg::with_name("trace")
                        .long("trace")
                        .help("Print a trace line for each executed instruction"),
                )
                .arg(
                    Arg::with_name("dump-regs")
                        .long("dump-regs")
                        .help("Print the registers at the end"),
                )
                .arg(
                    Arg::with_name("dump-mem")
                        .long("dump-mem")
                        .takes_value(true)
                        .number_of_values(2)
                        .value_names(&["ADDR", "SIZE"])
                        .help("Dump a memory range at the end (dec or hex)"),
                ),
        )
        .subcommand(
            SubCommand::with_name("hexdump")
                .about("Hexdump a binary file")
                .arg(
                    Arg::with_name("bin")
                        .long("bin")
                        .takes_value(true)
                        .value_name("FILE")
                        .required(true)
                        .help("Raw binary program file"),
                )
                .arg(
                    Arg::with_name("start")
                        .long("start")
                        .takes_value(true)
                        .value_name("ADDR")
                        .default_value("0x0000")
                        .help("Address label for the first byte"),
                ),
        )
        .get_matches();

    let code = match matches.subcommand() {
        ("run", Some(sub)) => cmd_run(sub),
        ("hexdump", Some(sub)) => cmd_hexdump(sub),
        _ => unreachable!(),
    };
    process::exit(code);
}

fn parse_arg(matches: &ArgMatches, name: &str) -> Result<u64, String> {
    let text = matches.value_of(name).unwrap();
    match util::parse_int(&text.to_lowercase()) {
        Ok(value) if value >= 0 => Ok(value as u64),
        _ => Err(format!("--{}: invalid value: {}", name, text)),
    }
}

fn cmd_run(matches: &ArgMatches) -> i32 {
    let program = if let Some(path) = matches.value_of("bin") {
        match fs::read(path) {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => {
                eprintln!("{}: program file is empty", path);
                return 2;
            }
            Err(err) => {
                eprintln!("{}: {}", path, err);
                return 2;
            }
        }
    } else {
        match parse_hex(matches.value_of("hex").unwrap()) {
            Ok(bytes) => bytes,
            Err(err) => {
                eprintln!("--hex: {}", err);
                return 2;
            }
        }
    };

    let start = match parse_arg(matches, "start") {
        Ok(start) => start,
        Err(err) => {
            eprintln!("{}", err);
            return 2;
        }
    };
    let max_steps = match parse_arg(matches, "max-steps") {
        Ok(max_steps) => max_steps,
        Err(err) => {
            eprintln!("{}", err);
            return 2;
        }
    };

    let dump_mem = match matches.values_of("dump-mem") {
        Some(values) => {
            let args: Vec<&str> = values.collect();
            let addr = util::parse_int(&args[0].to_lowercase());
            let size = util::parse_int(&args[1].to_lowercase());
            match (addr, size) {
                (Ok(addr), Ok(size)) if addr >= 0 && size >= 0 => {
                    let (addr, size) = (addr as u64, size as u64);
                    if let Err(err) = check_dump_range(addr, size) {
                        eprintln!("--dump-mem: {}", err);
                        return 2;
                    }
                    Some((addr, size))
                }
                _ => {
                    eprintln!("--dump-mem: invalid ADDR/SIZE");
                    return 2;
                }
            }
        }
        None => None,
    };

    let result = match run_program(
        &program,
        start,
        max_steps,
        matches.is_present("trace"),
    ) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("cannot load program: {}", err);
            return 2;
        }
    };

    let cpu = &result.processor;
    match result.outcome {
        RunOutcome::Normal => {
            println!(
                "[HALT] Normal. PC=0x{:04X} steps={} Z={}",
                cpu.program_counter(),
                result.steps,
                cpu.zero_flag() as u8
            );
        }
        RunOutcome::Fault => {
            println!("[HALT] Fault.");
            if let Some(fault) = cpu.fault() {
                println!(
                    "  code={} pc=0x{:04X} opcode=0x{:02X} rd={} ra={} rb={} imm32={} msg={:?}",
                    fault.code,
                    fault.pc,
                    fault.opcode,
                    fault.rd,
                    fault.ra,
                    fault.rb,
                    fault.imm32,
                    fault.message
                );
            }
        }
        RunOutcome::BudgetExceeded => {
            println!("[STOP] Max steps exceeded ({}).", max_steps);
        }
    }

    if matches.is_present("dump-regs") {
        println!("\n[REGS]\n{}", dump_regs(cpu));
    }
    if let Some((addr, size)) = dump_mem {
        // The range was validated up front.
        if let Ok(blob) = result.memory.read_slice(addr, size as usize) {
            println!(
                "\n[MEM 0x{:04X}..0x{:04X}]\n{}",
                addr,
                addr + size - 1,
                hexdump(blob, addr)
            );
        }
    }

    match result.outcome {
        RunOutcome::Normal => 0,
        RunOutcome::Fault => 1,
        RunOutcome::BudgetExceeded => 2,
    }
}

fn cmd_hexdump(matches: &ArgMatches) -> i32 {
    let path = matches.value_of("bin").unwrap();
    let blob = match fs::read(path) {
        Ok(blob) => blob,
        Err(err) => {
            eprintln!("{}: {}", path, err);
            return 2;
        }
    };
    let start = match parse_arg(matches, "start") {
        Ok(start) => start,
        Err(err) => {
            eprintln!("{}", err);
            return 2;
        }
    };
    println!("{}", hexdump(&blob, start));
    0
}
