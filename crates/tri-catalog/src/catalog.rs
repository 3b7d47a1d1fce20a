use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::debug;
use tri_aut::{canonical_form, canonicalize, uid_digest, CanonOpts, CanonicalForm, GraphUid};
use tri_core::errors::{ErrorInfo, TriError};
use tri_core::MAX_TRACES;
use tri_graph::{Graph, GraphInfo, Traces};

use crate::factor::{Factorization, Factorizer, PrimeFactor, TracesId};
use crate::schema::{init_schema, load_meta, storage, store_meta, CatalogMeta, SCHEMA_VERSION};
use crate::selector::Selector;

/// Trace length stored by new catalogs unless overridden.
pub const DEFAULT_TRACE_COUNT: usize = 12;

/// How to open a [`Catalog`].
///
/// Defaults: in memory, read-write, no prime tracking and
/// [`DEFAULT_TRACE_COUNT`] stored traces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOpts {
    /// Backing file; `None` keeps the catalog in memory.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Open without write access. The file must already exist.
    #[serde(default)]
    pub read_only: bool,
    /// Create as, or require, a prime catalog.
    #[serde(default)]
    pub need_primes: bool,
    /// Minimum stored trace length.
    #[serde(default)]
    pub trace_count: Option<usize>,
}

impl CatalogOpts {
    /// Ephemeral catalog.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Durable catalog at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Sets read-only mode.
    pub fn read_only(mut self, on: bool) -> Self {
        self.read_only = on;
        self
    }

    /// Sets prime tracking.
    pub fn primes(mut self, on: bool) -> Self {
        self.need_primes = on;
        self
    }

    /// Sets the stored trace length.
    pub fn trace_count(mut self, count: usize) -> Self {
        self.trace_count = Some(count);
        self
    }

    /// Opens the catalog.
    pub fn open(&self) -> Result<Catalog, TriError> {
        Catalog::open(self)
    }
}

/// One stored graph with its trace entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Canonical identity.
    pub uid: GraphUid,
    /// Trace entry the graph belongs to.
    pub traces_id: TracesId,
    /// Census used by selectors.
    pub info: GraphInfo,
    /// Stored traces, at least `info.verts` long.
    pub traces: Traces,
    /// Prime flag of the trace entry.
    pub is_prime: bool,
    /// Whether this graph is the representative of its trace entry.
    pub is_representative: bool,
}

impl CatalogEntry {
    /// Vertex count.
    pub fn verts(&self) -> usize {
        self.info.verts
    }

    /// The graph in canonical labeling.
    pub fn graph(&self) -> Result<Graph, TriError> {
        CanonicalForm::from_uid(&self.uid).to_graph()
    }

    /// Traces of length `len`, recomputed when longer than the stored vector.
    pub fn traces_to(&self, len: usize) -> Result<Traces, TriError> {
        if len <= self.traces.len() {
            return Ok(self.traces.truncated(len));
        }
        self.graph()?.traces(Some(len))
    }
}

/// Outcome of a bulk insert.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertStats {
    /// Graphs stored for the first time.
    pub inserted: usize,
    /// Graphs whose isomorphism class was already present.
    pub existing: usize,
}

struct PrimeCache {
    max_verts: usize,
    len: usize,
    factorizer: Factorizer,
}

struct EntryRow {
    uid: Vec<u8>,
    traces_id: i64,
    counts: [i64; 6],
    trace_json: String,
    is_prime: bool,
    is_representative: bool,
}

/// Deduplicating store of canonical graphs indexed by vertex count and traces.
///
/// Graphs are keyed by [`GraphUid`]. Graphs sharing the first `N` traces at
/// vertex count `N` share a trace entry, which carries the prime flag and the
/// representative (first inserted) graph.
pub struct Catalog {
    conn: Option<Connection>,
    meta: CatalogMeta,
    read_only: bool,
    path: Option<PathBuf>,
    prime_cache: Option<PrimeCache>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("path", &self.path)
            .field("meta", &self.meta)
            .field("read_only", &self.read_only)
            .field("closed", &self.conn.is_none())
            .finish()
    }
}

fn closed() -> TriError {
    TriError::ClosedCatalog(ErrorInfo::new("catalog.closed", "catalog has been closed"))
}

fn sql_int(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn trace_key(traces: &Traces, verts: usize) -> Result<Vec<u8>, TriError> {
    bincode::serialize(&traces.as_slice()[..verts.min(traces.len())])
        .map_err(|err| TriError::Serde(ErrorInfo::new("catalog.trace_key", err.to_string())))
}

fn parse_traces(json: &str) -> Result<Traces, TriError> {
    serde_json::from_str(json)
        .map_err(|err| TriError::Serde(ErrorInfo::new("catalog.trace_json", err.to_string())))
}

impl Catalog {
    /// Opens or creates a catalog.
    pub fn open(opts: &CatalogOpts) -> Result<Self, TriError> {
        let conn = match (&opts.path, opts.read_only) {
            (None, true) => {
                return Err(TriError::Storage(
                    ErrorInfo::new("catalog.read_only", "an in-memory catalog cannot be read-only")
                        .with_hint("give a path or open read-write"),
                ))
            }
            (None, false) => {
                Connection::open_in_memory().map_err(|err| storage("catalog.open", err))?
            }
            (Some(path), true) => {
                if !path.exists() {
                    return Err(TriError::Storage(
                        ErrorInfo::new("catalog.missing", "catalog file does not exist")
                            .with_context("path", path.display().to_string()),
                    ));
                }
                Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
                    .map_err(|err| open_error(path, err))?
            }
            (Some(path), false) => Connection::open(path).map_err(|err| open_error(path, err))?,
        };

        let meta = match load_meta(&conn)? {
            Some(meta) => {
                check_meta(&meta, opts)?;
                meta
            }
            None if opts.read_only => {
                return Err(TriError::storage(
                    "catalog.uninitialized",
                    "read-only catalog has no schema",
                ))
            }
            None => {
                let trace_count = opts.trace_count.unwrap_or(DEFAULT_TRACE_COUNT);
                if trace_count > MAX_TRACES {
                    return Err(TriError::Capacity(
                        ErrorInfo::new("catalog.trace_count", "trace count above the supported maximum")
                            .with_context("trace_count", trace_count.to_string())
                            .with_context("limit", MAX_TRACES.to_string()),
                    ));
                }
                init_schema(&conn)?;
                let meta = CatalogMeta {
                    version: SCHEMA_VERSION,
                    trace_count,
                    is_prime: opts.need_primes,
                };
                store_meta(&conn, &meta)?;
                meta
            }
        };

        debug!(
            path = ?opts.path,
            read_only = opts.read_only,
            is_prime = meta.is_prime,
            trace_count = meta.trace_count,
            "catalog opened"
        );
        Ok(Self {
            conn: Some(conn),
            meta,
            read_only: opts.read_only,
            path: opts.path.clone(),
            prime_cache: None,
        })
    }

    /// Properties fixed at creation.
    pub fn meta(&self) -> &CatalogMeta {
        &self.meta
    }

    /// Backing file, if durable.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether writes are rejected.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether [`Catalog::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// Releases the underlying storage. Later operations fail with
    /// [`TriError::ClosedCatalog`].
    pub fn close(&mut self) -> Result<(), TriError> {
        self.prime_cache = None;
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, err)| storage("catalog.close", err))?;
            debug!(path = ?self.path, "catalog closed");
        }
        Ok(())
    }

    fn conn(&self) -> Result<&Connection, TriError> {
        self.conn.as_ref().ok_or_else(closed)
    }

    fn ensure_writable(&self) -> Result<(), TriError> {
        self.conn()?;
        if self.read_only {
            return Err(TriError::Storage(
                ErrorInfo::new("catalog.read_only", "catalog was opened read-only")
                    .with_context("path", format!("{:?}", self.path)),
            ));
        }
        Ok(())
    }

    /// Stores the isomorphism class of `graph`.
    ///
    /// Returns `true` when newly inserted and `false` when an isomorphic graph
    /// was already present.
    pub fn insert(&mut self, graph: &Graph) -> Result<bool, TriError> {
        self.ensure_writable()?;
        let uid = canonicalize(graph, &CanonOpts::default())?.form.uid();
        self.insert_with_uid(&uid, graph)
    }

    /// Inserts every graph inside one transaction.
    ///
    /// Graphs inserted before an error stay committed.
    pub fn insert_all<I>(&mut self, graphs: I) -> Result<InsertStats, TriError>
    where
        I: IntoIterator<Item = Graph>,
    {
        self.insert_canonical(graphs.into_iter().map(|graph| (canonical_form(&graph).uid(), graph)))
    }

    /// Inserts graphs paired with their canonical identities inside one
    /// transaction.
    pub(crate) fn insert_canonical<I>(&mut self, items: I) -> Result<InsertStats, TriError>
    where
        I: IntoIterator<Item = (GraphUid, Graph)>,
    {
        self.ensure_writable()?;
        self.conn()?
            .execute_batch("BEGIN")
            .map_err(|err| storage("catalog.begin", err))?;
        let mut stats = InsertStats::default();
        let outcome = items.into_iter().try_for_each(|(uid, graph)| {
            if self.insert_with_uid(&uid, &graph)? {
                stats.inserted += 1;
            } else {
                stats.existing += 1;
            }
            Ok::<(), TriError>(())
        });
        self.conn()?
            .execute_batch("COMMIT")
            .map_err(|err| storage("catalog.commit", err))?;
        outcome.map(|()| stats)
    }

    /// Inserts a graph whose canonical identity is already known.
    fn insert_with_uid(&mut self, uid: &GraphUid, graph: &Graph) -> Result<bool, TriError> {
        self.ensure_writable()?;
        if self.contains(uid)? {
            return Ok(false);
        }

        let n = graph.num_verts();
        let traces = graph.traces(Some(n.max(self.meta.trace_count)))?;
        let key = trace_key(&traces, n)?;
        let existing = self.find_trace_entry(n, &key)?;
        let prime = match existing {
            Some(_) => false,
            None => self.meta.is_prime && !self.reducible(n, &traces.truncated(n))?,
        };
        let trace_json = serde_json::to_string(&traces)
            .map_err(|err| TriError::Serde(ErrorInfo::new("catalog.trace_json", err.to_string())))?;
        let info = graph.info();

        let conn = self.conn.as_mut().ok_or_else(closed)?;
        let sp = conn.savepoint().map_err(|err| storage("catalog.insert", err))?;
        let traces_id = match existing {
            Some(id) => id,
            None => {
                sp.execute(
                    "INSERT INTO traces(num_verts, trace_key, trace_json, rep_uid, is_prime)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![sql_int(n), key, trace_json, uid.as_bytes(), prime],
                )
                .map_err(|err| storage("catalog.insert", err))?;
                sp.last_insert_rowid()
            }
        };
        sp.execute(
            "INSERT INTO graphs(uid, traces_id, num_verts, num_parts, pos_edges, neg_edges, pos_loops, neg_loops)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                uid.as_bytes(),
                traces_id,
                sql_int(info.verts),
                sql_int(info.parts),
                sql_int(info.pos_edges),
                sql_int(info.neg_edges),
                sql_int(info.pos_loops),
                sql_int(info.neg_loops),
            ],
        )
        .map_err(|err| storage("catalog.insert", err))?;
        sp.commit().map_err(|err| storage("catalog.insert", err))?;

        if prime && matches!(&self.prime_cache, Some(cache) if n <= cache.max_verts) {
            self.prime_cache = None;
        }
        Ok(true)
    }

    /// Whether an isomorphic graph is stored.
    pub fn contains(&self, uid: &GraphUid) -> Result<bool, TriError> {
        let hit: Option<i64> = self
            .conn()?
            .query_row("SELECT id FROM graphs WHERE uid = ?1", params![uid.as_bytes()], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|err| storage("catalog.lookup", err))?;
        Ok(hit.is_some())
    }

    fn find_trace_entry(&self, verts: usize, key: &[u8]) -> Result<Option<i64>, TriError> {
        self.conn()?
            .query_row(
                "SELECT id FROM traces WHERE num_verts = ?1 AND trace_key = ?2",
                params![sql_int(verts), key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| storage("catalog.lookup", err))
    }

    fn reducible(&mut self, verts: usize, target: &Traces) -> Result<bool, TriError> {
        if verts < 2 {
            return Ok(false);
        }
        let max_verts = verts - 1;
        let fresh = matches!(
            &self.prime_cache,
            Some(cache) if cache.max_verts == max_verts && cache.len == verts
        );
        if !fresh {
            let primes = self.load_primes(max_verts, verts)?;
            self.prime_cache = Some(PrimeCache {
                max_verts,
                len: verts,
                factorizer: Factorizer::new(primes),
            });
        }
        match &self.prime_cache {
            Some(cache) => cache.factorizer.has_factorization(target, verts),
            None => Ok(false),
        }
    }

    /// Prime trace entries with at most `max_verts` vertices, traces cut or
    /// extended to `len`.
    pub fn load_primes(&self, max_verts: usize, len: usize) -> Result<Vec<PrimeFactor>, TriError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, num_verts, trace_json, rep_uid FROM traces
                 WHERE is_prime = 1 AND num_verts <= ?1
                 ORDER BY num_verts, id",
            )
            .map_err(|err| storage("catalog.primes", err))?;
        let rows = stmt
            .query_map(params![sql_int(max_verts)], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Vec<u8>>(3)?,
                ))
            })
            .map_err(|err| storage("catalog.primes", err))?;

        let mut primes = Vec::new();
        for row in rows {
            let (id, verts, json, rep) = row.map_err(|err| storage("catalog.primes", err))?;
            let stored = parse_traces(&json)?;
            let traces = if stored.len() >= len {
                stored.truncated(len)
            } else {
                let uid = GraphUid::from_bytes(&rep)?;
                CanonicalForm::from_uid(&uid).to_graph()?.traces(Some(len))?
            };
            primes.push(PrimeFactor {
                id: TracesId::from_raw(id),
                verts: verts.max(0) as usize,
                traces,
            });
        }
        Ok(primes)
    }

    /// Representative graph of a trace entry.
    pub fn representative(&self, id: TracesId) -> Result<Graph, TriError> {
        let rep: Option<Vec<u8>> = self
            .conn()?
            .query_row(
                "SELECT rep_uid FROM traces WHERE id = ?1",
                params![id.as_raw()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| storage("catalog.lookup", err))?;
        let rep = rep.ok_or_else(|| {
            TriError::Storage(
                ErrorInfo::new("catalog.trace_entry", "unknown trace entry")
                    .with_context("traces_id", id.as_raw().to_string()),
            )
        })?;
        let uid = GraphUid::from_bytes(&rep)?;
        CanonicalForm::from_uid(&uid).to_graph()
    }

    fn count(&self, sql: &str, verts: Option<usize>) -> Result<usize, TriError> {
        let conn = self.conn()?;
        let value: i64 = match verts {
            Some(verts) => conn.query_row(sql, params![sql_int(verts)], |row| row.get::<_, i64>(0)),
            None => conn.query_row(sql, [], |row| row.get::<_, i64>(0)),
        }
        .map_err(|err| storage("catalog.count", err))?;
        Ok(value.max(0) as usize)
    }

    /// Distinct trace vectors stored at a vertex count.
    pub fn count_traces(&self, verts: usize) -> Result<usize, TriError> {
        self.count("SELECT COUNT(*) FROM traces WHERE num_verts = ?1", Some(verts))
    }

    /// Prime trace entries at a vertex count.
    pub fn count_primes(&self, verts: usize) -> Result<usize, TriError> {
        self.count(
            "SELECT COUNT(*) FROM traces WHERE num_verts = ?1 AND is_prime = 1",
            Some(verts),
        )
    }

    /// Graphs stored at a vertex count.
    pub fn count_graphs(&self, verts: usize) -> Result<usize, TriError> {
        self.count("SELECT COUNT(*) FROM graphs WHERE num_verts = ?1", Some(verts))
    }

    /// Total number of stored graphs.
    pub fn count_entries(&self) -> Result<usize, TriError> {
        self.count("SELECT COUNT(*) FROM graphs", None)
    }

    /// Highest vertex count with any trace entry, or 0 when empty.
    pub fn max_level(&self) -> Result<usize, TriError> {
        self.count("SELECT COALESCE(MAX(num_verts), 0) FROM traces", None)
    }

    /// Graphs matching the selector.
    ///
    /// In factor mode each result is the disjoint union of the representatives
    /// of one prime combination.
    pub fn select(&self, selector: &Selector) -> Result<Vec<Graph>, TriError> {
        selector.validate()?;
        if selector.factor {
            return self.select_factorizations(selector);
        }
        self.select_entries(selector)?
            .iter()
            .map(CatalogEntry::graph)
            .collect()
    }

    /// Stored entries matching the selector, ordered by vertex count, trace
    /// entry and insertion.
    pub fn select_entries(&self, selector: &Selector) -> Result<Vec<CatalogEntry>, TriError> {
        selector.validate()?;
        if selector.factor {
            return Err(TriError::Structural(
                ErrorInfo::new("selector.factor", "factor mode yields combinations, not entries")
                    .with_hint("use select or factorizations"),
            ));
        }
        let conn = self.conn()?;
        if selector.is_contradictory() {
            return Ok(Vec::new());
        }
        let (trace_verts, key) = match &selector.traces {
            Some(target) => (Some(sql_int(target.len())), Some(trace_key(target, target.len())?)),
            None => (None, None),
        };
        let (lo, hi) = (&selector.min, &selector.max);

        let mut stmt = conn
            .prepare(
                "SELECT g.uid, g.traces_id, g.num_parts, g.num_verts, g.pos_edges, g.neg_edges,
                        g.pos_loops, g.neg_loops, t.trace_json, t.is_prime, t.rep_uid = g.uid
                 FROM graphs g JOIN traces t ON t.id = g.traces_id
                 WHERE g.num_parts BETWEEN ?1 AND ?2
                   AND g.num_verts BETWEEN ?3 AND ?4
                   AND g.pos_edges BETWEEN ?5 AND ?6
                   AND g.neg_edges BETWEEN ?7 AND ?8
                   AND g.pos_loops BETWEEN ?9 AND ?10
                   AND g.neg_loops BETWEEN ?11 AND ?12
                   AND (?13 = 0 OR t.is_prime = 1)
                   AND (?14 = 0 OR t.rep_uid = g.uid)
                   AND (?15 = 0 OR g.pos_loops = 0)
                   AND (?16 IS NULL OR (t.num_verts = ?16 AND t.trace_key = ?17))
                 ORDER BY g.num_verts, g.traces_id, g.id",
            )
            .map_err(|err| storage("catalog.select", err))?;
        let rows = stmt
            .query_map(
                params![
                    sql_int(lo.parts),
                    sql_int(hi.parts),
                    sql_int(lo.verts),
                    sql_int(hi.verts),
                    sql_int(lo.pos_edges),
                    sql_int(hi.pos_edges),
                    sql_int(lo.neg_edges),
                    sql_int(hi.neg_edges),
                    sql_int(lo.pos_loops),
                    sql_int(hi.pos_loops),
                    sql_int(lo.neg_loops),
                    sql_int(hi.neg_loops),
                    selector.primes,
                    selector.unique_traces,
                    selector.bosons,
                    trace_verts,
                    key,
                ],
                |row| {
                    Ok(EntryRow {
                        uid: row.get(0)?,
                        traces_id: row.get(1)?,
                        counts: [
                            row.get(2)?,
                            row.get(3)?,
                            row.get(4)?,
                            row.get(5)?,
                            row.get(6)?,
                            row.get(7)?,
                        ],
                        trace_json: row.get(8)?,
                        is_prime: row.get(9)?,
                        is_representative: row.get(10)?,
                    })
                },
            )
            .map_err(|err| storage("catalog.select", err))?;

        let mut entries = Vec::new();
        for row in rows {
            let row = row.map_err(|err| storage("catalog.select", err))?;
            let [parts, verts, pos_edges, neg_edges, pos_loops, neg_loops] =
                row.counts.map(|value| value.max(0) as usize);
            entries.push(CatalogEntry {
                uid: GraphUid::from_bytes(&row.uid)?,
                traces_id: TracesId::from_raw(row.traces_id),
                info: GraphInfo {
                    parts,
                    verts,
                    pos_edges,
                    neg_edges,
                    pos_loops,
                    neg_loops,
                },
                traces: parse_traces(&row.trace_json)?,
                is_prime: row.is_prime,
                is_representative: row.is_representative,
            });
        }
        Ok(entries)
    }

    /// Every multiset of primes whose vertex counts sum to `budget` and whose
    /// traces sum to `target`.
    pub fn factorizations(&self, target: &Traces, budget: usize) -> Result<Vec<Factorization>, TriError> {
        self.conn()?;
        if !self.meta.is_prime {
            return Err(TriError::Storage(
                ErrorInfo::new("catalog.not_prime", "catalog does not track primes")
                    .with_hint("open with CatalogOpts::primes(true) and generate with calc_primes"),
            ));
        }
        let primes = self.load_primes(budget, target.len())?;
        Factorizer::new(primes).factorize(target, budget)
    }

    fn select_factorizations(&self, selector: &Selector) -> Result<Vec<Graph>, TriError> {
        let Some(target) = &selector.traces else {
            return Ok(Vec::new());
        };
        let budget = selector
            .factor_budget
            .map_or(target.len(), |budget| budget.min(target.len()));

        let mut reps: HashMap<TracesId, Graph> = HashMap::new();
        let mut graphs = Vec::new();
        for factorization in self.factorizations(target, budget)? {
            let mut parts = Vec::with_capacity(factorization.len());
            for run in &factorization.runs {
                let rep = match reps.get(&run.traces_id) {
                    Some(rep) => rep.clone(),
                    None => {
                        let rep = self.representative(run.traces_id)?;
                        reps.insert(run.traces_id, rep.clone());
                        rep
                    }
                };
                parts.extend(std::iter::repeat(rep).take(run.count));
            }
            let graph = Graph::concat_all(parts.iter())?;
            if selector.selects(&graph.info()) {
                graphs.push(graph);
            }
        }
        Ok(graphs)
    }

    /// Stored graphs sharing the traces of `graph`: its degeneracy set.
    pub fn phase_modes(&self, graph: &Graph) -> Result<Vec<Graph>, TriError> {
        let selector = Selector::builder().traces(graph.traces(None)?).build();
        self.select(&selector)
    }

    /// Prime combinations reproducing the traces of `graph`.
    pub fn prime_modes(&self, graph: &Graph) -> Result<Vec<Factorization>, TriError> {
        self.factorizations(&graph.traces(None)?, graph.num_verts())
    }

    /// All stored identities in byte order.
    pub fn uids(&self) -> Result<Vec<GraphUid>, TriError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT uid FROM graphs ORDER BY uid")
            .map_err(|err| storage("catalog.uids", err))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, Vec<u8>>(0))
            .map_err(|err| storage("catalog.uids", err))?;
        let mut uids = Vec::new();
        for row in rows {
            let raw = row.map_err(|err| storage("catalog.uids", err))?;
            uids.push(GraphUid::from_bytes(&raw)?);
        }
        Ok(uids)
    }

    /// SHA-256 over every stored identity in byte order.
    pub fn digest(&self) -> Result<String, TriError> {
        Ok(uid_digest(&self.uids()?))
    }
}

fn open_error(path: &Path, err: rusqlite::Error) -> TriError {
    TriError::Storage(
        ErrorInfo::new("catalog.open", err.to_string()).with_context("path", path.display().to_string()),
    )
}

fn check_meta(meta: &CatalogMeta, opts: &CatalogOpts) -> Result<(), TriError> {
    if meta.version != SCHEMA_VERSION {
        return Err(TriError::Storage(
            ErrorInfo::new("catalog.version", "catalog schema version mismatch")
                .with_context("found", meta.version.to_string())
                .with_context("expected", SCHEMA_VERSION.to_string()),
        ));
    }
    if let Some(wanted) = opts.trace_count {
        if wanted > meta.trace_count {
            return Err(TriError::Storage(
                ErrorInfo::new("catalog.trace_count", "catalog stores fewer traces than requested")
                    .with_context("stored", meta.trace_count.to_string())
                    .with_context("requested", wanted.to_string()),
            ));
        }
    }
    if opts.need_primes && !meta.is_prime {
        return Err(TriError::Storage(
            ErrorInfo::new("catalog.not_prime", "catalog does not track primes")
                .with_context("path", format!("{:?}", opts.path)),
        ));
    }
    Ok(())
}
