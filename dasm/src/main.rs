#[macro_use]
extern crate clap;

use std::fs;
use std::path::Path;
use std::process;

use clap::Arg;

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUT")
                .help("Input assembly file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .value_name("OUTPUT")
                .required(true)
                .help("Output binary file"),
        )
        .arg(
            Arg::with_name("base")
                .long("base")
                .takes_value(true)
                .value_name("ADDR")
                .default_value("0x0000")
                .help("Base load address for label resolution (decimal or hex)"),
        )
        .get_matches();

    let input = matches.value_of("INPUT").unwrap();
    let output = matches.value_of("output").unwrap();
    let base_arg = matches.value_of("base").unwrap();

    process::exit(run(input, output, base_arg));
}

fn run(input: &str, output: &str, base_arg: &str) -> i32 {
    let base = match util::parse_int(&base_arg.to_lowercase()) {
        Ok(base) => base,
        Err(err) => {
            eprintln!("--base: {}", err);
            return 2;
        }
    };

    let text = match fs::read_to_string(input) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("{}: E_NOFILE: {}", input, err);
            return 2;
        }
    };

    let result = match dasm::assemble_addressed(&text, base) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("{}", err.with_path(input));
            return 2;
        }
    };

    if let Some(parent) = Path::new(output).parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(err) = fs::create_dir_all(parent) {
                eprintln!("{}: cannot create output directory: {}", parent.display(), err);
                return 2;
            }
        }
    }

    if let Err(err) = fs::write(output, &result.binary) {
        eprintln!("{}: cannot write output: {}", output, err);
        return 2;
    }

    0
}
