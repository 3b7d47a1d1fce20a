use std::error::Error;
use std::io::{self, Write};

use clap::{Args, ValueEnum};
use tri_aut::{canonicalize, CanonOpts, CanonicalStreamExt};
use tri_core::{EngineConfig, TriError};
use tri_graph::{parse_graph, Graph, PureEnumerator, SignFanout, SignMode, SignPermuter};

#[derive(Args, Debug)]
pub struct TracesArgs {
    /// Graph in text notation, e.g. "1-2-3-1".
    pub graph: String,
    /// Number of traces; defaults to the vertex count.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct CanonArgs {
    /// Graph in text notation.
    pub graph: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Signs {
    /// Loops and edges.
    Vertex,
    /// Edges only.
    Edge,
}

#[derive(Args, Debug)]
pub struct EnumerateArgs {
    /// Smallest vertex count.
    #[arg(long, default_value_t = 1)]
    pub from: usize,
    /// Largest vertex count.
    #[arg(long)]
    pub to: usize,
    /// Fan out signs before deduplicating.
    #[arg(long, value_enum)]
    pub signs: Option<Signs>,
    /// Vary bundles by negative count instead of per unit.
    #[arg(long)]
    pub by_count: bool,
}

pub fn traces(args: &TracesArgs) -> Result<(), Box<dyn Error>> {
    let graph = parse_graph(&args.graph)?;
    println!("{}", graph.traces(args.count)?);
    Ok(())
}

pub fn canon(args: &CanonArgs) -> Result<(), Box<dyn Error>> {
    let graph = parse_graph(&args.graph)?;
    let labeling = canonicalize(&graph, &CanonOpts::default())?;
    let canonical = graph.permuted(&labeling.labeling)?;
    println!("graph: {canonical}");
    println!("uid: {}", labeling.form.uid());
    println!("automorphisms: {}", labeling.automorphisms);
    Ok(())
}

pub fn enumerate(args: &EnumerateArgs, config: &EngineConfig) -> Result<(), Box<dyn Error>> {
    if args.to > config.max_vertices {
        return Err(Box::new(TriError::too_many_vertices(args.to, config.max_vertices)));
    }
    let fanout = if args.by_count {
        SignFanout::ByCount
    } else {
        SignFanout::PerUnit
    };
    let pure = PureEnumerator::new(args.from, args.to)?.dedup_canonical();
    let graphs: Box<dyn Iterator<Item = Graph>> = match args.signs {
        None => Box::new(pure),
        Some(signs) => {
            let mode = match signs {
                Signs::Vertex => SignMode::Vertex,
                Signs::Edge => SignMode::Edge,
            };
            Box::new(
                pure.flat_map(move |graph| SignPermuter::with_fanout(&graph, mode, fanout))
                    .dedup_canonical(),
            )
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut count = 0usize;
    for graph in graphs {
        count += 1;
        writeln!(out, "{count}\t{}\t{graph}", graph.num_verts())?;
    }
    tracing::info!(count, from = args.from, to = args.to, "enumeration finished");
    Ok(())
}
