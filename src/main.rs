use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

use sim68k::{error, Emulator, CARRY, DATA_BASE, EXTEND, NEGATIVE, OVERFLOW, ZERO};

/// sim68k is an instruction-level simulator for a subset of M68K assembly.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide a `.a68` file to run
    path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble and run a `.a68` file, printing the final machine state
    Run {
        /// `.a68` file to run
        name: PathBuf,
        /// Stop after this many steps even if the program has not finished
        #[arg(short, long, default_value_t = 100_000)]
        limit: usize,
        /// Print every executed source line
        #[arg(short, long)]
        trace: bool,
    },
    /// Assemble a `.a68` file without running it
    Check {
        /// File to check
        name: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new() //
                .context_lines(sim68k::DIAGNOSTIC_CONTEXT_LINES)
                .build(),
        )
    }))?;

    if let Some(command) = args.command {
        match command {
            Command::Run { name, limit, trace } => run(&name, limit, trace),
            Command::Check { name } => {
                file_message(MsgColor::Green, "Checking", &name);
                let contents = fs::read_to_string(&name).into_diagnostic()?;
                let program = sim68k::assemble(&contents);
                if let Some(exception) = program.exception {
                    return Err(error::exception_report(&exception, &contents));
                }
                message(MsgColor::Green, "Success", "no errors found!");
                Ok(())
            }
        }
    } else if let Some(path) = args.path {
        run(&path, 100_000, false)
    } else {
        println!("\n~ sim68k v{VERSION} ~");
        println!("{}", LOGO.truecolor(255, 183, 197).bold());
        println!("{SHORT_INFO}");
        std::process::exit(0);
    }
}

fn run(name: &PathBuf, limit: usize, trace: bool) -> Result<()> {
    file_message(MsgColor::Green, "Assembling", name);
    let contents = fs::read_to_string(name).into_diagnostic()?;
    let mut emulator = Emulator::new(&contents);

    if let Some(exception) = emulator.exception() {
        return Err(error::exception_report(exception, &contents));
    }

    message(MsgColor::Green, "Running", "assembled program");
    let mut steps = 0;
    while steps < limit && !emulator.step() {
        steps += 1;
        if trace {
            println!("{:>6}  {}", format!("{steps}").cyan(), emulator.last_instruction());
        }
    }
    if steps == limit {
        message(MsgColor::Red, "Stopped", "step limit reached");
    }

    for error in emulator.errors() {
        println!("{:?}", error::runtime_error_report(error, &contents));
    }

    print_state(&emulator);

    if let Some(exception) = emulator.exception() {
        return Err(error::exception_report(exception, &contents));
    }
    file_message(MsgColor::Green, "Completed", name);
    Ok(())
}

fn print_state(emulator: &Emulator) {
    let registers = emulator.registers();
    for n in 0..8 {
        println!(
            "{}  {}",
            format!("d{n} {:08x}", registers[DATA_BASE + n]).green(),
            format!("a{n} {:08x}", registers[n]).cyan(),
        );
    }
    let ccr = emulator.ccr();
    let flag = |bit: u8, name: &str| if ccr & bit != 0 { name.to_uppercase() } else { name.to_lowercase() };
    println!(
        "pc {:08x}  ccr {}{}{}{}{}",
        emulator.pc(),
        flag(EXTEND, "x"),
        flag(NEGATIVE, "n"),
        flag(ZERO, "z"),
        flag(OVERFLOW, "v"),
        flag(CARRY, "c"),
    );

    let mut cells: Vec<(u32, u8)> = emulator
        .memory()
        .cells()
        .iter()
        .map(|(address, value)| (*address, *value))
        .collect();
    if cells.is_empty() {
        return;
    }
    cells.sort_unstable();
    println!("{}", "memory".bold());
    for (address, value) in cells {
        println!("  {address:08x}  {value:02x}");
    }
}

#[allow(unused)]
enum MsgColor {
    Green,
    Cyan,
    Red,
}

fn file_message(color: MsgColor, left: &str, right: &PathBuf) {
    let right = format!("target {}", right.to_str().unwrap());
    message(color, left, &right);
}

fn message<S>(color: MsgColor, left: S, right: S)
where
    S: Colorize + std::fmt::Display,
{
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
        MsgColor::Red => left.red(),
    };
    println!("{left:>12} {right}");
}

const LOGO: &str = r#"
          _            ____  ___  __
    _____(_)___ ___   / ___//(_ )/ /__
   / ___/ / __ `__ \ / __ \/ _  \/ //_/
  (__  ) / / / / / // /_/ / (_) / ,<
 /____/_/_/ /_/ /_/ \____/\___//_/|_|"#;

const SHORT_INFO: &str = r"
Welcome to sim68k, an instruction-level emulator for a teaching subset
of the Motorola 68000. Please use `-h` or `--help` to access the usage
instructions and documentation.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");
