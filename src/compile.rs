//! Cross-facility compilation: merge N normalized facility trees into one
//! flattened, depth-annotated render sequence with a consolidated total per
//! row.
//!
//! The template is the authority on shape and ordering; facility trees are
//! only consulted per row id. Every facility passed in here is expected to
//! have gone through `normalize_facility` already, so category values are
//! internally consistent and the compiler only sums, never re-rolls.

use crate::schema::{CompiledReport, Facility, FinancialRow, RenderRow};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Pre-order depth-first search for a row id within one facility's forest.
///
/// Returns the first match, or `None` when the facility has no such row —
/// incomplete facility data is legitimate and must not abort anything.
pub fn find_row_by_id<'a>(rows: &'a [FinancialRow], id: &str) -> Option<&'a FinancialRow> {
    for row in rows {
        if row.id == id {
            return Some(row);
        }
        if let Some(found) = find_row_by_id(&row.children, id) {
            return Some(found);
        }
    }
    None
}

/// Flat id-to-row map over one facility's forest, built once per compilation
/// so that per-row lookups stop re-walking the tree. Observable behavior is
/// identical to `find_row_by_id`: on a duplicated id the first row in
/// pre-order wins.
pub struct RowIndex<'a> {
    by_id: HashMap<&'a str, &'a FinancialRow>,
}

impl<'a> RowIndex<'a> {
    pub fn build(rows: &'a [FinancialRow]) -> Self {
        let mut by_id = HashMap::new();
        index_rows(rows, &mut by_id);
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a FinancialRow> {
        self.by_id.get(id).copied()
    }
}

fn index_rows<'a>(rows: &'a [FinancialRow], out: &mut HashMap<&'a str, &'a FinancialRow>) {
    for row in rows {
        out.entry(row.id.as_str()).or_insert(row);
        index_rows(&row.children, out);
    }
}

/// Sum one row id across facilities into a synthetic display-only total row.
///
/// Facilities lacking the id contribute nothing; returns `None` when no
/// facility has it at all. Identity fields come from the first facility that
/// does. A field of the total is absent only when no contributing facility
/// carries that field, otherwise absent values count as zero in the sum.
pub fn compute_total_row(facilities: &[Facility], id: &str) -> Option<FinancialRow> {
    let matches: Vec<&FinancialRow> = facilities
        .iter()
        .filter_map(|f| find_row_by_id(&f.rows, id))
        .collect();
    total_from_matches(&matches)
}

fn total_from_matches(matches: &[&FinancialRow]) -> Option<FinancialRow> {
    let first = matches.first()?;
    Some(FinancialRow {
        q1: sum_present(matches, |r| r.q1),
        q2: sum_present(matches, |r| r.q2),
        q3: sum_present(matches, |r| r.q3),
        q4: sum_present(matches, |r| r.q4),
        cumulative_balance: sum_present(matches, |r| r.cumulative_balance),
        ..first.display_only()
    })
}

fn sum_present(rows: &[&FinancialRow], get: fn(&FinancialRow) -> Option<f64>) -> Option<f64> {
    let mut acc = None;
    for row in rows {
        if let Some(v) = get(row) {
            *acc.get_or_insert(0.0) += v;
        }
    }
    acc
}

/// Walk the template pre-order and emit one `RenderRow` per template node:
/// the row's per-facility display cells plus its consolidated total.
///
/// Parents are emitted before their children (display order), and the output
/// row count equals the template node count regardless of how many
/// facilities were supplied — zero facilities just means every cell and
/// total is absent.
pub fn compile(template: &[FinancialRow], facilities: &[Facility]) -> CompiledReport {
    if facilities.is_empty() {
        warn!("compiling report with no facility data, all cells will be blank");
    }

    let indexes: Vec<(&str, RowIndex)> = facilities
        .iter()
        .map(|f| (f.name.as_str(), RowIndex::build(&f.rows)))
        .collect();

    let mut rows = Vec::new();
    emit(template, 0, &indexes, &mut rows);
    debug!(
        facilities = facilities.len(),
        rows = rows.len(),
        "compiled cross-facility report"
    );

    CompiledReport {
        facilities: facilities.iter().map(|f| f.name.clone()).collect(),
        rows,
    }
}

fn emit(
    template: &[FinancialRow],
    depth: usize,
    indexes: &[(&str, RowIndex)],
    out: &mut Vec<RenderRow>,
) {
    for node in template {
        let mut per_facility = HashMap::new();
        let mut matches = Vec::new();
        for (name, index) in indexes {
            if let Some(row) = index.get(&node.id) {
                per_facility.insert(name.to_string(), row.display_only());
                matches.push(row);
            }
        }

        out.push(RenderRow {
            id: node.id.clone(),
            title: node.title.clone(),
            is_category: node.is_category,
            depth,
            per_facility,
            total: total_from_matches(&matches),
        });

        emit(&node.children, depth + 1, indexes, out);
    }
}
