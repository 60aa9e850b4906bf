//! Bottom-up recomputation of category totals within one facility's tree.

use crate::schema::FinancialRow;

/// Recompute every category row's fields as the sum of its direct children,
/// post-order, so nested categories resolve before their parents.
///
/// Returns a new forest; the input is never mutated. Leaf rows pass through
/// unchanged, absent markers included. Absent child fields count as zero in
/// the sum, and a category with no children totals to zero. Running this
/// twice over an already-consistent forest yields the same forest.
pub fn calculate_hierarchical_totals(rows: &[FinancialRow]) -> Vec<FinancialRow> {
    rows.iter().map(roll_up).collect()
}

fn roll_up(row: &FinancialRow) -> FinancialRow {
    if !row.is_category {
        return row.clone();
    }

    let children = calculate_hierarchical_totals(&row.children);
    FinancialRow {
        q1: Some(sum_field(&children, |r| r.q1)),
        q2: Some(sum_field(&children, |r| r.q2)),
        q3: Some(sum_field(&children, |r| r.q3)),
        q4: Some(sum_field(&children, |r| r.q4)),
        cumulative_balance: Some(sum_field(&children, |r| r.cumulative_balance)),
        children,
        ..row.clone()
    }
}

fn sum_field(rows: &[FinancialRow], get: fn(&FinancialRow) -> Option<f64>) -> f64 {
    rows.iter().map(|r| get(r).unwrap_or(0.0)).sum()
}
