//! HyperRAM controller simulator CLI.
//!
//! This binary drives the controller model against a behavioural HyperRAM part. It performs:
//! 1. **Timeline:** Print the step table a configuration produces.
//! 2. **Read / Write:** Run single bus transactions and report data and timing.
//! 3. **Round trip:** Write a pattern across a range of words, read it back, and verify.
//! 4. **Config:** Print the effective configuration as JSON.
//!
//! Log verbosity follows `RUST_LOG` (e.g. `RUST_LOG=hyperram_core=debug`).

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hyperram_core::common::constants::BUS_BYTE_LANES;
use hyperram_core::config::ControllerConfig;
use hyperram_core::controller::{BusRequest, HyperRamController};
use hyperram_core::device::HyperRamDevice;
use hyperram_core::sim::{Simulator, Transaction};

#[derive(Parser, Debug)]
#[command(
    name = "hyperram-sim",
    author,
    version,
    about = "Cycle-accurate HyperBus/HyperRAM controller simulator",
    long_about = "Run bus transactions through a cycle-accurate HyperRAM controller model.\n\nExamples:\n  hyperram-sim timeline --width 16\n  hyperram-sim write 0x40 0xdeadbeef\n  hyperram-sim read 0x40 --trace read.jsonl\n  hyperram-sim roundtrip --count 64 --stats"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// JSON configuration file (defaults apply when omitted).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the DQ width (8 or 16).
    #[arg(short, long, global = true)]
    width: Option<u32>,

    /// Override the controller latency.
    #[arg(short, long, global = true)]
    latency: Option<u32>,

    /// Latency the simulated part was configured with (defaults to the controller's).
    #[arg(long, global = true)]
    device_latency: Option<u32>,

    /// Write a per-cycle pin trace as JSON lines.
    #[arg(short, long, global = true)]
    trace: Option<PathBuf>,

    /// Print controller statistics when done.
    #[arg(long, global = true)]
    stats: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the timeline step table.
    Timeline,

    /// Read one bus word.
    Read {
        /// Word address.
        #[arg(value_parser = parse_u32)]
        adr: u32,
    },

    /// Write one bus word.
    Write {
        /// Word address.
        #[arg(value_parser = parse_u32)]
        adr: u32,

        /// Data to write.
        #[arg(value_parser = parse_u32)]
        data: u32,

        /// Byte selects (bit n enables byte lane n; at most 0xf).
        #[arg(long, default_value = "0xf", value_parser = parse_sel)]
        sel: u8,
    },

    /// Write a pattern, read it back, and compare.
    Roundtrip {
        /// First word address.
        #[arg(long, default_value = "0", value_parser = parse_u32)]
        start: u32,

        /// Number of words.
        #[arg(long, default_value_t = 16)]
        count: u32,

        /// Address increment between words.
        #[arg(long, default_value = "2", value_parser = parse_u32)]
        stride: u32,
    },

    /// Print the effective configuration as JSON.
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(message) = run(&cli) {
        error!("{message}");
        eprintln!("Error: {message}");
        process::exit(1);
    }
}

/// Dispatches the selected subcommand.
fn run(cli: &Cli) -> Result<(), String> {
    let config = load_config(&cli.global)?;

    match &cli.command {
        Commands::Config => {
            let text = serde_json::to_string_pretty(&config).map_err(|e| e.to_string())?;
            println!("{text}");
            Ok(())
        }
        Commands::Timeline => {
            let controller = HyperRamController::new(&config).map_err(|e| e.to_string())?;
            print!("{}", controller.timeline());
            Ok(())
        }
        Commands::Read { adr } => {
            let mut sim = build_simulator(&cli.global, &config)?;
            let txn = sim.execute(BusRequest::read(*adr));
            println!(
                "read  adr={:#010x} data={:#010x}",
                adr,
                txn.read_data.unwrap_or_default()
            );
            report_timing(&txn);
            finish(&cli.global, &sim)
        }
        Commands::Write { adr, data, sel } => {
            let mut sim = build_simulator(&cli.global, &config)?;
            let txn = sim.execute(BusRequest::write_masked(*adr, *data, *sel));
            println!("write adr={adr:#010x} data={data:#010x} sel={sel:#06b}");
            report_timing(&txn);
            finish(&cli.global, &sim)
        }
        Commands::Roundtrip {
            start,
            count,
            stride,
        } => {
            let mut sim = build_simulator(&cli.global, &config)?;
            let errors = roundtrip(&mut sim, *start, *count, *stride);
            finish(&cli.global, &sim)?;
            if errors == 0 {
                println!("roundtrip: {count} words OK");
                Ok(())
            } else {
                Err(format!("roundtrip: {errors} of {count} words mismatched"))
            }
        }
    }
}

/// Loads the configuration file (if any) and applies command-line overrides.
fn load_config(args: &GlobalArgs) -> Result<ControllerConfig, String> {
    let mut config = match &args.config {
        Some(path) => ControllerConfig::from_file(path)
            .map_err(|e| format!("{}: {e}", path.display()))?,
        None => ControllerConfig::default(),
    };
    if let Some(width) = args.width {
        config.data_width = width;
    }
    if let Some(latency) = args.latency {
        config.latency = latency;
    }
    Ok(config)
}

/// Builds a simulator, optionally with a part whose latency differs from the controller's.
fn build_simulator(
    args: &GlobalArgs,
    config: &ControllerConfig,
) -> Result<Simulator, String> {
    let controller = HyperRamController::new(config).map_err(|e| e.to_string())?;
    let device_latency = args
        .device_latency
        .unwrap_or_else(|| controller.params().latency());
    if device_latency != controller.params().latency() {
        info!(
            controller = controller.params().latency(),
            device = device_latency,
            "latency mismatch; read data will not be meaningful"
        );
    }
    let device = HyperRamDevice::new(controller.width(), device_latency);
    let mut sim = Simulator::new(controller, device);
    if args.trace.is_some() {
        sim.enable_trace();
    }
    Ok(sim)
}

/// Writes `count` words of a deterministic pattern and reads them back.
///
/// # Returns
///
/// The number of mismatched words.
fn roundtrip(sim: &mut Simulator, start: u32, count: u32, stride: u32) -> u32 {
    let pattern = |i: u32| i.wrapping_mul(0x9E37_79B9) ^ 0xA5A5_5A5A;
    let addresses = || (0..count).map(|i| (i, start.wrapping_add(i.wrapping_mul(stride))));

    for (i, adr) in addresses() {
        sim.write(adr, pattern(i));
    }
    let mut errors = 0;
    for (i, adr) in addresses() {
        let got = sim.read(adr);
        let want = pattern(i);
        if got != want {
            eprintln!("  mismatch adr={adr:#010x} want={want:#010x} got={got:#010x}");
            errors += 1;
        }
    }
    errors
}

fn report_timing(txn: &Transaction) {
    println!(
        "  issued @{}  triggered @{}  ack @{}  (wait {} + {} cycles)",
        txn.issue_cycle,
        txn.trigger_cycle,
        txn.ack_cycle,
        txn.alignment_wait(),
        txn.ack_latency()
    );
}

/// Writes the trace and prints statistics as requested.
fn finish(args: &GlobalArgs, sim: &Simulator) -> Result<(), String> {
    if let (Some(path), Some(trace)) = (&args.trace, sim.trace()) {
        let lines = trace.to_json_lines().map_err(|e| e.to_string())?;
        fs::write(path, lines).map_err(|e| format!("{}: {e}", path.display()))?;
        info!(path = %path.display(), samples = trace.samples().len(), "trace written");
    }
    if args.stats {
        sim.stats().print();
    }
    Ok(())
}

/// Parses a decimal, `0x` hexadecimal, or `0b` binary integer.
fn parse_u32(s: &str) -> Result<u32, String> {
    let digits = s.replace('_', "");
    let parsed = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if let Some(bin) = digits.strip_prefix("0b") {
        u32::from_str_radix(bin, 2)
    } else {
        digits.parse()
    };
    parsed.map_err(|e| format!("invalid number '{s}': {e}"))
}

/// Parses a byte-select mask; only the four bus byte lanes may be set.
fn parse_sel(s: &str) -> Result<u8, String> {
    let value = parse_u32(s)?;
    if value >> BUS_BYTE_LANES != 0 {
        return Err(format!("byte select {value:#x} exceeds 0xf"));
    }
    u8::try_from(value).map_err(|e| e.to_string())
}
