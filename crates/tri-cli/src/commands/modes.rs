use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use tri_core::EngineConfig;
use tri_graph::parse_graph;

use super::with_catalog;

#[derive(Args, Debug)]
pub struct ModesArgs {
    /// Graph in text notation.
    pub graph: String,
    /// Prime catalog file; the workspace catalog is used when absent.
    #[arg(long)]
    pub db: Option<PathBuf>,
}

pub fn phase(args: &ModesArgs, config: &EngineConfig) -> Result<(), Box<dyn Error>> {
    let target = parse_graph(&args.graph)?;
    let phases = with_catalog(args.db.as_ref(), target.num_verts(), config, |catalog| {
        Ok(catalog.phase_modes(&target)?)
    })?;
    println!("traces {}", target.traces(None)?);
    for (idx, phase) in phases.iter().enumerate() {
        println!("{}\t{phase}", idx + 1);
    }
    Ok(())
}

pub fn factor(args: &ModesArgs, config: &EngineConfig) -> Result<(), Box<dyn Error>> {
    let target = parse_graph(&args.graph)?;
    let lines = with_catalog(args.db.as_ref(), target.num_verts(), config, |catalog| {
        let mut lines = Vec::new();
        for factorization in catalog.prime_modes(&target)? {
            let mut parts = Vec::new();
            for run in &factorization.runs {
                let rep = catalog.representative(run.traces_id)?;
                parts.push(format!("{}x({rep})", run.count));
            }
            lines.push(parts.join(" + "));
        }
        Ok(lines)
    })?;
    println!("traces {}", target.traces(None)?);
    for (idx, line) in lines.iter().enumerate() {
        println!("{}\t{line}", idx + 1);
    }
    Ok(())
}
