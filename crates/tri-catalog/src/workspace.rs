use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};
use tri_core::errors::{ErrorInfo, TriError};
use tri_core::EngineConfig;
use tri_graph::Graph;

use crate::catalog::{Catalog, CatalogOpts};
use crate::factor::Factorization;
use crate::generate::{calc_primes, LevelReport};

/// Caller-owned session holding the default prime catalog and the worker
/// pool used to generate it.
///
/// Levels already generated are served from the open catalog; a request for a
/// higher level generates only the missing ones.
pub struct Workspace {
    config: EngineConfig,
    pool: rayon::ThreadPool,
    primes: Option<Catalog>,
    level: usize,
    closed: bool,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("config", &self.config)
            .field("level", &self.level)
            .field("closed", &self.closed)
            .finish()
    }
}

fn workspace_closed() -> TriError {
    TriError::ClosedCatalog(ErrorInfo::new("workspace.closed", "workspace has been closed"))
}

impl Workspace {
    /// Validates the configuration and builds the worker pool. No catalog is
    /// opened until one is requested.
    pub fn open(config: EngineConfig) -> Result<Self, TriError> {
        let config = config.validated()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads.unwrap_or(0))
            .build()
            .map_err(|err| {
                TriError::Storage(
                    ErrorInfo::new("workspace.thread_pool", err.to_string())
                        .with_context("threads", format!("{:?}", config.threads)),
                )
            })?;
        Ok(Self {
            config,
            pool,
            primes: None,
            level: 0,
            closed: false,
        })
    }

    /// The configuration in effect.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Highest level served so far.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Runs `op` on the workspace pool.
    pub fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        self.pool.install(op)
    }

    /// Prime catalog complete up to the configured default level.
    pub fn default_prime_catalog(&mut self) -> Result<&Catalog, TriError> {
        self.prime_catalog(self.config.default_prime_level)
    }

    /// Prime catalog complete up to at least `level` vertices.
    pub fn prime_catalog(&mut self, level: usize) -> Result<&Catalog, TriError> {
        if self.closed {
            return Err(workspace_closed());
        }
        if level > self.config.max_vertices {
            return Err(TriError::too_many_vertices(level, self.config.max_vertices));
        }
        if self.primes.is_some() && self.level >= level {
            debug!(level, cached = self.level, "prime catalog served from cache");
            return self.primes.as_ref().ok_or_else(workspace_closed);
        }

        match self.config.default_catalog_path() {
            None => self.extend_in_memory(level)?,
            Some(path) => self.extend_durable(path, level)?,
        };
        self.primes.as_ref().ok_or_else(workspace_closed)
    }

    fn extend_in_memory(&mut self, level: usize) -> Result<Vec<LevelReport>, TriError> {
        if self.primes.is_none() {
            let opts = CatalogOpts::in_memory()
                .primes(true)
                .trace_count(self.config.trace_count);
            self.primes = Some(Catalog::open(&opts)?);
        }
        let pool = &self.pool;
        let catalog = self.primes.as_mut().ok_or_else(workspace_closed)?;
        let reports = pool.install(|| calc_primes(catalog, level))?;
        self.level = self.level.max(level);
        Ok(reports)
    }

    fn extend_durable(&mut self, path: PathBuf, level: usize) -> Result<Vec<LevelReport>, TriError> {
        if let Some(mut stale) = self.primes.take() {
            stale.close()?;
        }

        if path.exists() {
            let catalog = CatalogOpts::at(&path).read_only(true).primes(true).open()?;
            let complete = complete_level(&catalog)?;
            if complete >= level {
                debug!(path = %path.display(), complete, "durable prime catalog reused");
                self.primes = Some(catalog);
                self.level = complete;
                return Ok(Vec::new());
            }
            warn!(
                path = %path.display(),
                complete,
                requested = level,
                "prime catalog incomplete; generating missing levels"
            );
        }

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|err| {
                TriError::Storage(
                    ErrorInfo::new("workspace.catalog_dir", err.to_string())
                        .with_context("path", dir.display().to_string()),
                )
            })?;
        }
        let mut opts = CatalogOpts::at(&path).primes(true);
        if !path.exists() {
            opts = opts.trace_count(self.config.trace_count);
        }
        let mut writer = opts.open()?;
        let pool = &self.pool;
        let reports = pool.install(|| calc_primes(&mut writer, level))?;
        writer.close()?;

        let catalog = CatalogOpts::at(&path).read_only(true).primes(true).open()?;
        self.level = complete_level(&catalog)?;
        self.primes = Some(catalog);
        Ok(reports)
    }

    /// Stored graphs sharing the traces of `graph`.
    pub fn phase_modes(&mut self, graph: &Graph) -> Result<Vec<Graph>, TriError> {
        self.prime_catalog(graph.num_verts())?.phase_modes(graph)
    }

    /// Prime combinations reproducing the traces of `graph`.
    pub fn prime_modes(&mut self, graph: &Graph) -> Result<Vec<Factorization>, TriError> {
        self.prime_catalog(graph.num_verts())?.prime_modes(graph)
    }

    /// Closes the default catalog. Later requests fail with
    /// [`TriError::ClosedCatalog`].
    pub fn close(&mut self) -> Result<(), TriError> {
        self.closed = true;
        if let Some(mut catalog) = self.primes.take() {
            catalog.close()?;
        }
        debug!("workspace closed");
        Ok(())
    }
}

// Largest `k` such that every level `1..=k` has trace entries.
fn complete_level(catalog: &Catalog) -> Result<usize, TriError> {
    let mut level = 0;
    while level < catalog.max_level()? && catalog.count_traces(level + 1)? > 0 {
        level += 1;
    }
    Ok(level)
}
