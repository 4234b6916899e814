//! mipsim CLI: assemble a MIPS source file and run it on the pipelined
//! processor model.
//!
//! Only argument parsing exits non-zero. IO failures are reported and the
//! run continues with whatever is left: an unopenable input yields an empty
//! text segment, an unwritable output is skipped.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use mipsim_assembler::Assembler;
use mipsim_executor::{Executor, RunLimit};
use mipsim_isa::DataSegment;

/// Pipelined MIPS processor simulator
#[derive(Parser)]
#[command(name = "mipsim")]
#[command(version)]
#[command(about = "Assemble a MIPS program and simulate it cycle by cycle", long_about = None)]
struct Cli {
    /// Input assembly file
    #[arg(short, long, value_name = "PATH")]
    input: PathBuf,

    /// Termination policy
    #[arg(long, value_enum)]
    mode: Mode,

    /// Execution count N for the chosen mode
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    number: u32,

    /// Where to write the assembled text image
    #[arg(long, value_name = "PATH", default_value = "instruction-image.bin")]
    image_out: PathBuf,

    /// Where to write the execution report
    #[arg(long, value_name = "PATH", default_value = "resource-utilization.json")]
    report_out: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Stop once N instructions have been fetched
    Instruction,
    /// Stop once N cycles have completed
    Cycle,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Mode::Instruction => "instruction",
            Mode::Cycle => "cycle",
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    println!(
        "[mipsim]: input ASM -- {}, mode -- {}, number -- {}",
        cli.input.display(),
        cli.mode.as_str(),
        cli.number
    );

    let assembler = match Assembler::from_path(&cli.input) {
        Ok(assembler) => assembler,
        Err(e) => {
            eprintln!("[mipsim]: ERROR -- {e}");
            Assembler::new()
        }
    };

    let text = assembler.text_segment();
    if let (Some(first), Some(last)) = (text.first_address(), text.last_address()) {
        println!("[mipsim]: assembler -- text segment [{first:#010x}, {last:#010x}]");
    }

    if let Err(e) = dump_image(&assembler, &cli.image_out) {
        eprintln!(
            "[mipsim]: ERROR -- cannot write text image {}: {e}",
            cli.image_out.display()
        );
    }

    let text = assembler.into_text_segment();
    let mut data = DataSegment::new(0x0000_0000);

    let limit = match cli.mode {
        Mode::Instruction => RunLimit::Instructions(cli.number),
        Mode::Cycle => RunLimit::Cycles(cli.number),
    };

    let mut executor = Executor::new(&text, &mut data);
    let stdout = io::stdout();
    if let Err(e) = executor.run(limit, &mut stdout.lock()) {
        eprintln!("[mipsim]: ERROR -- trace stream: {e}");
    }

    match serde_json::to_string_pretty(&executor.report()) {
        Ok(json) => {
            if let Err(e) = fs::write(&cli.report_out, json + "\n") {
                eprintln!(
                    "[mipsim]: ERROR -- cannot write report {}: {e}",
                    cli.report_out.display()
                );
            }
        }
        Err(e) => eprintln!("[mipsim]: ERROR -- cannot serialize report: {e}"),
    }
}

fn dump_image(assembler: &Assembler, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    assembler.dump_image(&mut out)?;
    out.flush()
}
