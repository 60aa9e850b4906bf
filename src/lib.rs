//! Hierarchical financial aggregation for multi-facility health program
//! reports.
//!
//! The pipeline is pure and in-memory: the remote data source hands over one
//! `Facility` forest per facility, each is normalized against the canonical
//! template (shape validated, category totals rolled up bottom-up), and the
//! compiler merges all of them into a flattened, depth-annotated
//! `CompiledReport` with one consolidated total per row. The presentation
//! layer renders that sequence directly.
//!
//! ```
//! use report_compiler::{compile, empty_financial_template, normalize_facility, Facility};
//!
//! let template = empty_financial_template();
//! let facilities: Vec<Facility> = Vec::new(); // from the remote data source
//! let normalized: Vec<Facility> = facilities
//!     .iter()
//!     .map(|f| normalize_facility(&template, f))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! let report = compile(&template, &normalized);
//! assert_eq!(report.rows.len(), 24);
//! ```

pub mod compile;
pub mod reconcile;
pub mod rollup;
pub mod schema;
pub mod template;

pub use compile::{compile, compute_total_row, find_row_by_id, RowIndex};
pub use reconcile::{normalize_facility, reconcile_with_template, ReconcileError};
pub use rollup::calculate_hierarchical_totals;
pub use schema::{CompiledReport, Facility, FinancialRow, RenderRow};
pub use template::empty_financial_template;
