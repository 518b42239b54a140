//! Usage: vmm-rust [-v...] [--seed N] <page-size> <number-of-memory-frames>
//!                 <replacement-policy> <allocation-policy> <trace-file>

use clap::{Arg, ArgMatches, Command};
use std::process;

use vmm_rust::config::{parse_num_frames, parse_page_size, parse_seed};
use vmm_rust::{read_trace_file, AllocationPolicy, Mmu, ReplacementPolicy, SimConfig, VmmError};

struct CliArgs {
    config: SimConfig,
    trace_file: String,
    verbosity: u64,
}

fn build_cli() -> Command<'static> {
    Command::new("vmm-rust")
        .about("Virtual memory paging simulator")
        .arg(
            Arg::new("page_size")
                .help("page size in bytes")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("num_frames")
                .help("number of physical frames")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::new("replacement")
                .help("replacement policy: FIFO, LRU, Random or Optimal")
                .required(true)
                .index(3),
        )
        .arg(
            Arg::new("allocation")
                .help("allocation policy: Global or Local")
                .required(true)
                .index(4),
        )
        .arg(
            Arg::new("trace_file")
                .help("trace file, one <pid>,<address> per line")
                .required(true)
                .index(5),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("seed for the Random policy")
                .takes_value(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("log faults (-v) and hits too (-vv) to stderr")
                .multiple_occurrences(true),
        )
}

// clap has already rejected a missing positional
fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches.value_of(name).unwrap_or_default()
}

fn parse_args(actual_args: &[String]) -> Result<CliArgs, VmmError> {
    let matches = build_cli().get_matches_from(actual_args);

    let value = |name| required(&matches, name);

    let page_size = parse_page_size(value("page_size"))?;
    let num_frames = parse_num_frames(value("num_frames"))?;
    let replacement: ReplacementPolicy = value("replacement").parse()?;
    let allocation: AllocationPolicy = value("allocation").parse()?;

    let mut config = SimConfig::new(page_size, num_frames, replacement, allocation)?;
    if let Some(seed) = matches.value_of("seed") {
        config = config.with_seed(parse_seed(seed)?);
    }

    Ok(CliArgs {
        config,
        trace_file: value("trace_file").to_string(),
        verbosity: matches.occurrences_of("verbose"),
    })
}

fn init_logging(verbosity: u64) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(args: &CliArgs) -> Result<(), VmmError> {
    let trace = read_trace_file(&args.trace_file)?;

    let mut mmu = Mmu::new(args.config.clone());
    let stats = mmu.simulate(trace)?;

    print!("{}", stats.summary(&args.config));
    Ok(())
}

fn main() {
    let args = std::env::args().collect::<Vec<String>>();

    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    init_logging(args.verbosity);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
