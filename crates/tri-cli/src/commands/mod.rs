use std::error::Error;
use std::path::PathBuf;

use tri_catalog::{Catalog, CatalogOpts, Workspace};
use tri_core::EngineConfig;

pub mod catalog;
pub mod graph;
pub mod modes;

/// Runs `op` on the catalog at `db`, or on the workspace prime catalog
/// generated up to `level` when no file is given.
pub fn with_catalog<R>(
    db: Option<&PathBuf>,
    level: usize,
    config: &EngineConfig,
    op: impl FnOnce(&Catalog) -> Result<R, Box<dyn Error>>,
) -> Result<R, Box<dyn Error>> {
    match db {
        Some(path) => {
            let mut catalog = CatalogOpts::at(path).read_only(true).open()?;
            let result = op(&catalog);
            catalog.close()?;
            result
        }
        None => {
            let mut workspace = Workspace::open(config.clone())?;
            let result = op(workspace.prime_catalog(level)?);
            workspace.close()?;
            result
        }
    }
}
