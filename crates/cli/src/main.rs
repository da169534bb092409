//! ls8 CLI: load and run LS-8 machine-code programs.

use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use ls8_executor::{Cpu, Program};

/// LS-8 microcomputer emulator
#[derive(Parser)]
#[command(name = "ls8")]
#[command(version = "0.1.0")]
#[command(about = "Run LS-8 machine-code programs", long_about = None)]
struct Cli {
    /// Path to the .ls8 program file
    program: PathBuf,

    /// Print a machine-state trace line before each instruction
    #[arg(long)]
    trace: bool,

    /// Maximum instructions to execute
    #[arg(long, value_name = "NUM", default_value = "1000000")]
    max_steps: u64,

    /// Write the collected execution trace as JSON
    #[arg(long, value_name = "PATH")]
    trace_out: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let program = match Program::from_file(&cli.program) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let mut cpu = Cpu::new();
    if cli.trace || cli.trace_out.is_some() {
        cpu.enable_tracing();
    }
    if let Err(e) = cpu.load_program(program.bytes()) {
        eprintln!("error: {e}");
        process::exit(1);
    }

    let mut stdout = io::stdout();
    let mut steps = 0u64;
    while !cpu.is_halted() {
        if steps >= cli.max_steps {
            eprintln!("error: reached max steps limit ({})", cli.max_steps);
            process::exit(1);
        }

        let row = match cpu.step() {
            Ok(row) => row,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        };
        steps += 1;

        if cli.trace {
            if let Some(row) = row {
                eprintln!("{row}");
            }
        }

        // Stream PRN output as it is produced.
        let out = cpu.take_output();
        if !out.is_empty() {
            if let Err(e) = stdout.write_all(&out) {
                eprintln!("error: failed to write output: {e}");
                process::exit(1);
            }
        }
    }

    if let Some(path) = &cli.trace_out {
        let trace = cpu.take_trace().unwrap_or_default();
        let json = match serde_json::to_string_pretty(&trace) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("error: failed to encode trace: {e}");
                process::exit(1);
            }
        };
        if let Err(e) = fs::write(path, json) {
            eprintln!("error: failed to write trace {}: {e}", path.display());
            process::exit(1);
        }
    }
}
