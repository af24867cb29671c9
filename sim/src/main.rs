use anyhow::Result;
use binutils::{clap, verbose};
use clap::{error::ErrorKind, Parser};
use lc2k_sim::{mem_diff, Object, PipeSim, MEM_SIZE};

// Pipeline simulator for LC-2K machine code
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None,
    styles = binutils::get_styles(),
    arg_required_else_help = true,
)]
struct Args {
    /// Path to the machine-code file, one decimal word per line
    input: String,

    /// Give up after this many cycles if the machine has not halted
    #[arg(long, value_name = "N")]
    max_cycles: Option<u64>,

    /// Do not print the machine state before every cycle
    #[arg(long)]
    no_trace: bool,

    /// Print the data-memory words changed by the run to stderr
    #[arg(long)]
    diff: bool,

    #[command(flatten)]
    verbose: verbose::Verbosity,
}

fn parse_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(1)
        }
    }
}

fn main() -> Result<()> {
    let args = parse_args();
    binutils::logging_setup(
        binutils::verbose_level_to_trace(args.verbose.log_level()),
        None::<&std::fs::File>,
    );

    let obj = Object::load(&args.input)?;
    print!("{obj}");

    let mut pipe = PipeSim::new(&obj.words, !args.no_trace);
    let cycles = pipe.run(args.max_cycles)?;

    println!("machine halted");
    println!("total of {} cycles executed", cycles);
    println!("final state of machine:");
    pipe.print_state();

    let stats = pipe.stats();
    tracing::debug!(
        "{} cycles, {} stalls, {} squashes",
        cycles,
        stats.stalls,
        stats.squashes
    );

    if args.diff {
        use std::io::IsTerminal;
        let mut init = obj.words;
        init.resize(MEM_SIZE, 0);
        mem_diff(&init, pipe.data_mem(), std::io::stderr().is_terminal());
    }
    Ok(())
}
