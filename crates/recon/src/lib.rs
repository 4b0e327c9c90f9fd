//! Bank sheet vs wallet reconciliation engine.
//!
//! Pure engine crate: receives decoded tables, returns matches, uniques,
//! and statistics. No CLI or IO dependencies.

pub mod columns;
pub mod engine;
pub mod error;
pub mod model;
pub mod rules;
pub mod summary;
pub mod table;

pub use columns::ColumnMap;
pub use engine::reconcile;
pub use error::ReconError;
pub use model::{MatchRecord, ReconcileResult, SetLabel, Statistics, UniqueRecord};
pub use rules::MatchKind;
pub use table::{Cell, Table};
