//! ddrgen: compile Ingenic DDR configuration binaries from the command line.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use ddr_compiler::{DdrcStrategy, Dialect};
use ddr_core::DdrType;
use tracing_subscriber::EnvFilter;

use commands::Selection;

#[derive(Parser)]
#[command(name = "ddrgen", version, about = "Ingenic DDR configuration compiler")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog entries
    List {
        #[command(subcommand)]
        what: ListAction,
    },
    /// Show a chip's catalog entry and derived PHY parameters
    Show {
        /// Chip name (e.g., M14D1G1664A_DDR2)
        chip: String,
        /// Extra catalog file merged over the built-in one
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// DDR frequency in Hz for the derived parameters, whole MHz only
        #[arg(long, default_value_t = 400_000_000)]
        freq: u32,
        /// Output format (text, toml)
        #[arg(long)]
        format: Option<String>,
    },
    /// Compile a processor/chip pair into a 324-byte binary
    Compile {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
        /// Report format (text, json)
        #[arg(long)]
        report: Option<String>,
    },
    /// Compile and compare against a captured reference binary
    Compare {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Reference binary
        #[arg(long)]
        reference: PathBuf,
        /// Report format (text, json)
        #[arg(long)]
        report: Option<String>,
    },
    /// Check the framing and checksum of a calibration binary
    Validate {
        /// Binary to check
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum ListAction {
    /// List known processors
    Processors {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// List known DDR chips
    Chips {
        /// Only chips of this technology (ddr2, ddr3, lpddr, lpddr2, lpddr3)
        #[arg(long = "type")]
        ddr_type: Option<DdrType>,
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct SelectionArgs {
    /// Processor name (e.g., t31x)
    #[arg(long)]
    processor: String,
    /// Chip name (default: the processor's usual chip)
    #[arg(long)]
    chip: Option<String>,
    /// Output dialect (calibration, registers)
    #[arg(long, default_value_t = Dialect::default())]
    dialect: Dialect,
    /// DDRC timing strategy (config-only, vendor-timing, legacy)
    #[arg(long, default_value_t = DdrcStrategy::default())]
    strategy: DdrcStrategy,
    /// Extra catalog file merged over the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// DDR frequency in Hz, whole MHz only (default: the processor's)
    #[arg(long)]
    freq: Option<u32>,
}

impl From<SelectionArgs> for Selection {
    fn from(args: SelectionArgs) -> Self {
        Selection {
            processor: args.processor,
            chip: args.chip,
            dialect: args.dialect,
            strategy: args.strategy,
            catalog: args.catalog,
            freq: args.freq,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::List { what } => match what {
            ListAction::Processors { catalog } => commands::list::processors(catalog.as_deref()),
            ListAction::Chips { ddr_type, catalog } => {
                commands::list::chips(ddr_type, catalog.as_deref())
            }
        },

        Commands::Show {
            chip,
            catalog,
            freq,
            format,
        } => commands::show::run(&chip, catalog.as_deref(), freq, format.as_deref()),

        Commands::Compile {
            selection,
            output,
            report,
        } => commands::compile::run(&selection.into(), &output, report.as_deref()),

        Commands::Compare {
            selection,
            reference,
            report,
        } => commands::compare::run(&selection.into(), &reference, report.as_deref()),

        Commands::Validate { file } => commands::validate::run(&file),
    }
}
