use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use tri_catalog::{
    calc_primes, export_csv, export_csv_path, Bounds, CatalogOpts, Selector, Workspace,
};
use tri_core::EngineConfig;
use tri_graph::parse_graph;

use super::with_catalog;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Highest vertex count to generate.
    #[arg(long)]
    pub to: usize,
    /// Catalog file to create or extend; the workspace catalog is used when absent.
    #[arg(long)]
    pub db: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Catalog file; the workspace catalog is used when absent.
    #[arg(long)]
    pub db: Option<PathBuf>,
    /// Workspace catalog level; defaults to the configured prime level.
    #[arg(long)]
    pub level: Option<usize>,
    /// Fewest vertices.
    #[arg(long, default_value_t = 1)]
    pub min_verts: usize,
    /// Most vertices.
    #[arg(long)]
    pub max_verts: Option<usize>,
    /// Fewest connected parts.
    #[arg(long, default_value_t = 1)]
    pub min_parts: usize,
    /// Most connected parts.
    #[arg(long)]
    pub max_parts: Option<usize>,
    /// Fewest positive edge units.
    #[arg(long, default_value_t = 0)]
    pub min_pos_edges: usize,
    /// Most positive edge units.
    #[arg(long)]
    pub max_pos_edges: Option<usize>,
    /// Fewest negative edge units.
    #[arg(long, default_value_t = 0)]
    pub min_neg_edges: usize,
    /// Most negative edge units.
    #[arg(long)]
    pub max_neg_edges: Option<usize>,
    /// Fewest positive loop units.
    #[arg(long, default_value_t = 0)]
    pub min_pos_loops: usize,
    /// Most positive loop units.
    #[arg(long)]
    pub max_pos_loops: Option<usize>,
    /// Fewest negative loop units.
    #[arg(long, default_value_t = 0)]
    pub min_neg_loops: usize,
    /// Most negative loop units.
    #[arg(long)]
    pub max_neg_loops: Option<usize>,
    /// Match the traces of this graph.
    #[arg(long)]
    pub traces_of: Option<String>,
    /// Search prime combinations for `--traces-of`.
    #[arg(long)]
    pub factor: bool,
    /// Vertex budget for `--factor`; defaults to the target's length.
    #[arg(long)]
    pub factor_budget: Option<usize>,
    /// Keep only prime trace entries.
    #[arg(long)]
    pub primes: bool,
    /// Keep one representative per trace entry.
    #[arg(long)]
    pub unique: bool,
    /// Keep only graphs without positive loops.
    #[arg(long)]
    pub bosons: bool,
    /// Write CSV here instead of printing graphs.
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Label column for CSV output.
    #[arg(long, default_value = "select")]
    pub label: String,
}

#[derive(Args, Debug)]
pub struct DigestArgs {
    /// Catalog file; the workspace catalog is used when absent.
    #[arg(long)]
    pub db: Option<PathBuf>,
    /// Workspace catalog level; defaults to the configured prime level.
    #[arg(long)]
    pub level: Option<usize>,
}

pub fn build(args: &BuildArgs, config: &EngineConfig) -> Result<(), Box<dyn Error>> {
    let reports = match &args.db {
        Some(path) => {
            let mut opts = CatalogOpts::at(path).primes(true);
            if !path.exists() {
                opts = opts.trace_count(config.trace_count);
            }
            let mut catalog = opts.open()?;
            let workspace = Workspace::open(config.clone())?;
            let reports = workspace.install(|| calc_primes(&mut catalog, args.to))?;
            catalog.close()?;
            reports
        }
        None => {
            let mut workspace = Workspace::open(config.clone())?;
            let catalog = workspace.prime_catalog(args.to)?;
            let mut reports = Vec::new();
            for verts in 1..=args.to {
                reports.push((verts, catalog.count_traces(verts)?, catalog.count_primes(verts)?));
            }
            workspace.close()?;
            for (verts, traces, primes) in reports {
                println!("{verts}\ttraces={traces}\tprimes={primes}");
            }
            return Ok(());
        }
    };
    for report in reports {
        println!(
            "{}\tsigned={}\tinserted={}\ttraces={}\tprimes={}{}",
            report.verts,
            report.signed,
            report.inserted,
            report.traces,
            report.primes,
            if report.skipped { "\t(present)" } else { "" }
        );
    }
    Ok(())
}

fn selector(args: &SelectArgs) -> Result<Selector, Box<dyn Error>> {
    let ceiling = Bounds::ceiling();
    let mut builder = Selector::builder()
        .verts(args.min_verts, args.max_verts.unwrap_or(ceiling.verts))
        .parts(args.min_parts, args.max_parts.unwrap_or(ceiling.parts))
        .pos_edges(args.min_pos_edges, args.max_pos_edges.unwrap_or(ceiling.pos_edges))
        .neg_edges(args.min_neg_edges, args.max_neg_edges.unwrap_or(ceiling.neg_edges))
        .pos_loops(args.min_pos_loops, args.max_pos_loops.unwrap_or(ceiling.pos_loops))
        .neg_loops(args.min_neg_loops, args.max_neg_loops.unwrap_or(ceiling.neg_loops))
        .factor(args.factor)
        .primes(args.primes)
        .unique_traces(args.unique)
        .bosons(args.bosons);
    if let Some(budget) = args.factor_budget {
        builder = builder.factor_budget(budget);
    }
    if let Some(text) = &args.traces_of {
        builder = builder.traces(parse_graph(text)?.traces(None)?);
    }
    Ok(builder.build())
}

pub fn select(args: &SelectArgs, config: &EngineConfig) -> Result<(), Box<dyn Error>> {
    let selector = selector(args)?;
    let level = args.level.unwrap_or(config.default_prime_level);
    with_catalog(args.db.as_ref(), level, config, |catalog| {
        if args.factor {
            for (idx, graph) in catalog.select(&selector)?.iter().enumerate() {
                println!("{}\t{graph}", idx + 1);
            }
            return Ok(());
        }
        let rows = match &args.csv {
            Some(path) => export_csv_path(catalog, &selector, &args.label, path)?,
            None => export_csv(catalog, &selector, &args.label, std::io::stdout().lock())?,
        };
        tracing::info!(rows, "selection written");
        Ok(())
    })
}

pub fn digest(args: &DigestArgs, config: &EngineConfig) -> Result<(), Box<dyn Error>> {
    let level = args.level.unwrap_or(config.default_prime_level);
    let digest = with_catalog(args.db.as_ref(), level, config, |catalog| Ok(catalog.digest()?))?;
    println!("{digest}");
    Ok(())
}
