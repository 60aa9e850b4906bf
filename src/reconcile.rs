//! Ingestion boundary: validate incoming facility data against the template.
//!
//! The remote source is trusted for leaf values but not for shape. Rather
//! than letting a malformed tree surface as mysteriously blank cells deep in
//! rendering, every facility payload is reconciled here first: ids must exist
//! in the template, category/leaf flags must agree, and nesting must match.
//! Rows *missing* from a facility are fine — incomplete data degrades to
//! blank cells downstream, not to an error.

use crate::rollup::calculate_hierarchical_totals;
use crate::schema::{Facility, FinancialRow};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Structural mismatch between a facility payload and the template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("row '{id}' does not exist in the reporting template")]
    UnknownRow { id: String },
    #[error("row '{id}' appears more than once in the facility data")]
    DuplicateRow { id: String },
    #[error("row '{id}' disagrees with the template on category vs leaf")]
    ShapeMismatch { id: String },
    #[error("row '{id}' is nested under a different parent than the template expects")]
    MisplacedRow { id: String },
}

/// Validate a facility forest against the template and re-shape it to the
/// template's ordering and nesting.
///
/// The output contains exactly the template rows the facility supplied, in
/// template order, with the facility's values and the template's identity
/// fields. Rows the facility did not supply are left out, so downstream
/// lookups still see them as absent.
pub fn reconcile_with_template(
    template: &[FinancialRow],
    rows: &[FinancialRow],
) -> Result<Vec<FinancialRow>, ReconcileError> {
    let mut flat = Vec::new();
    flatten(rows, None, &mut flat);

    let mut supplied: HashMap<String, FlatRow> = HashMap::new();
    for (id, row) in flat {
        if supplied.insert(id.clone(), row).is_some() {
            return Err(ReconcileError::DuplicateRow { id });
        }
    }

    let mut flat = Vec::new();
    flatten(template, None, &mut flat);
    let expected: HashMap<String, FlatRow> = flat.into_iter().collect();

    for (id, row) in &supplied {
        let node = expected
            .get(id)
            .ok_or_else(|| ReconcileError::UnknownRow { id: id.clone() })?;
        if node.is_category != row.is_category {
            return Err(ReconcileError::ShapeMismatch { id: id.clone() });
        }
        if node.parent != row.parent {
            return Err(ReconcileError::MisplacedRow { id: id.clone() });
        }
    }

    let missing = expected.len() - supplied.len();
    if missing > 0 {
        debug!(missing, "facility data lacks some template rows");
    }

    Ok(rebuild(template, &supplied))
}

/// Reconcile and roll up one facility: the normalization step every payload
/// goes through before compilation.
pub fn normalize_facility(
    template: &[FinancialRow],
    facility: &Facility,
) -> Result<Facility, ReconcileError> {
    let rows = reconcile_with_template(template, &facility.rows)?;
    debug!(facility = %facility.name, rows = rows.len(), "normalized facility report");
    Ok(Facility {
        name: facility.name.clone(),
        rows: calculate_hierarchical_totals(&rows),
    })
}

struct FlatRow {
    is_category: bool,
    parent: Option<String>,
    q1: Option<f64>,
    q2: Option<f64>,
    q3: Option<f64>,
    q4: Option<f64>,
    cumulative_balance: Option<f64>,
}

fn flatten(rows: &[FinancialRow], parent: Option<&str>, out: &mut Vec<(String, FlatRow)>) {
    for row in rows {
        let flat = FlatRow {
            is_category: row.is_category,
            parent: parent.map(|p| p.to_string()),
            q1: row.q1,
            q2: row.q2,
            q3: row.q3,
            q4: row.q4,
            cumulative_balance: row.cumulative_balance,
        };
        out.push((row.id.clone(), flat));
        flatten(&row.children, Some(&row.id), out);
    }
}

fn rebuild(template: &[FinancialRow], supplied: &HashMap<String, FlatRow>) -> Vec<FinancialRow> {
    template
        .iter()
        .filter_map(|node| {
            let flat = supplied.get(&node.id)?;
            Some(FinancialRow {
                q1: flat.q1,
                q2: flat.q2,
                q3: flat.q3,
                q4: flat.q4,
                cumulative_balance: flat.cumulative_balance,
                children: rebuild(&node.children, supplied),
                ..node.clone()
            })
        })
        .collect()
}
