//! Deduplicating graph catalogs on SQLite, prime generation and
//! factorization search.

pub mod catalog;
pub mod export;
pub mod factor;
pub mod generate;
pub mod schema;
pub mod selector;
pub mod workspace;

pub use catalog::{Catalog, CatalogEntry, CatalogOpts, InsertStats, DEFAULT_TRACE_COUNT};
pub use export::{export_csv, export_csv_path, export_json, export_records, ExportRecord};
pub use factor::{FactorRun, Factorization, Factorizer, PrimeFactor, TracesId};
pub use generate::{calc_primes, LevelReport};
pub use schema::{CatalogMeta, SCHEMA_VERSION};
pub use selector::{Bounds, Selector, SelectorBuilder};
pub use workspace::Workspace;
