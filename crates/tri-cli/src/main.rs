use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::{
    catalog::{self, BuildArgs, DigestArgs, SelectArgs},
    graph::{self, CanonArgs, EnumerateArgs, TracesArgs},
    modes::{self, ModesArgs},
};
use tracing_subscriber::EnvFilter;
use tri_core::EngineConfig;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "tri", about = "Trivalent particle graph catalogs")]
struct Cli {
    /// YAML or TOML engine configuration.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the trace vector of a graph.
    Traces(TracesArgs),
    /// Print the canonical form, identity and automorphism count of a graph.
    Canon(CanonArgs),
    /// List distinct graphs over a vertex range.
    Enumerate(EnumerateArgs),
    /// Generate a prime catalog up to a vertex count.
    Build(BuildArgs),
    /// Query a catalog.
    Select(SelectArgs),
    /// List stored graphs sharing a graph's traces.
    Phase(ModesArgs),
    /// List prime combinations reproducing a graph's traces.
    Factor(ModesArgs),
    /// Print the SHA-256 digest of a catalog's identities.
    Digest(DigestArgs),
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    match cli.command {
        Command::Traces(args) => graph::traces(&args),
        Command::Canon(args) => graph::canon(&args),
        Command::Enumerate(args) => graph::enumerate(&args, &config),
        Command::Build(args) => catalog::build(&args, &config),
        Command::Select(args) => catalog::select(&args, &config),
        Command::Phase(args) => modes::phase(&args, &config),
        Command::Factor(args) => modes::factor(&args, &config),
        Command::Digest(args) => catalog::digest(&args, &config),
    }
}
