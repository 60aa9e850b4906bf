//! Core data model for facility financial reports.
//!
//! A report is a forest of `FinancialRow` nodes: category rows group other
//! rows and carry derived totals, leaf rows carry the figures a facility
//! actually reported. The same row ids appear in every facility's tree, which
//! is what makes cross-facility consolidation a per-id join.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One line item in a facility's financial report tree.
///
/// Numeric fields are `Option<f64>` throughout: `None` means "not reported"
/// and renders as a placeholder. It is never collapsed into `0.0` in the
/// stored model, even though it counts as zero inside a sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRow {
    pub id: String,
    pub title: String,
    /// True for grouping rows whose values are derived from their children.
    #[serde(default)]
    pub is_category: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q3: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q4: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumulative_balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FinancialRow>,
}

impl FinancialRow {
    /// A grouping row. Its numeric fields start absent; the roll-up pass is
    /// what fills them in.
    pub fn category(id: &str, title: &str, children: Vec<FinancialRow>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            is_category: true,
            q1: None,
            q2: None,
            q3: None,
            q4: None,
            cumulative_balance: None,
            children,
        }
    }

    /// A leaf row with no figures yet.
    pub fn leaf(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            is_category: false,
            q1: None,
            q2: None,
            q3: None,
            q4: None,
            cumulative_balance: None,
            children: Vec::new(),
        }
    }

    /// Copy of this row with `children` dropped, for display cells and
    /// synthesized total rows. These are not tree nodes and never feed back
    /// into aggregation.
    pub fn display_only(&self) -> Self {
        Self {
            children: Vec::new(),
            ..self.clone()
        }
    }
}

/// One facility's named report forest, as handed over by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub name: String,
    #[serde(default)]
    pub rows: Vec<FinancialRow>,
}

impl Facility {
    pub fn new(name: &str, rows: Vec<FinancialRow>) -> Self {
        Self {
            name: name.to_string(),
            rows,
        }
    }
}

/// One row of the consolidated report, flattened for tabular display.
///
/// `per_facility` maps facility name to that facility's display copy of the
/// row; a facility missing from the map simply has no data for this id and
/// renders as a blank cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRow {
    pub id: String,
    pub title: String,
    pub is_category: bool,
    /// Nesting depth in the template, 0 for top-level rows. Used for
    /// indentation only.
    pub depth: usize,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub per_facility: HashMap<String, FinancialRow>,
    /// Cross-facility sum for this id, absent when no facility has the row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<FinancialRow>,
}

/// The full consolidated view: facility column order plus one `RenderRow`
/// per template node, in template pre-order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledReport {
    pub facilities: Vec<String>,
    pub rows: Vec<RenderRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_values_serialize_as_omitted() {
        let mut row = FinancialRow::leaf("user-fees", "User fees");
        row.q1 = Some(0.0);

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["q1"], 0.0);
        // None must disappear from the wire, not become 0 or null
        assert!(json.get("q2").is_none());
        assert!(json.get("cumulative_balance").is_none());
        assert!(json.get("children").is_none());
    }

    #[test]
    fn test_deserialize_sparse_source_payload() {
        // The data source sends raw leaf values with no roll-ups and no
        // empty-field padding.
        let row: FinancialRow = serde_json::from_value(serde_json::json!({
            "id": "receipts",
            "title": "Receipts",
            "is_category": true,
            "children": [
                { "id": "user-fees", "title": "User fees", "q1": 1200.5 }
            ]
        }))
        .unwrap();

        assert!(row.is_category);
        assert_eq!(row.children.len(), 1);
        assert_eq!(row.children[0].q1, Some(1200.5));
        assert_eq!(row.children[0].q2, None);
        assert!(!row.children[0].is_category);
    }

    #[test]
    fn test_display_only_drops_children() {
        let cat = FinancialRow::category(
            "expenditures",
            "Expenditures",
            vec![FinancialRow::leaf("utilities", "Utilities")],
        );
        let cell = cat.display_only();
        assert!(cell.children.is_empty());
        assert_eq!(cell.id, "expenditures");
        assert!(cell.is_category);
    }

    #[test]
    fn test_round_trip_keeps_zero_and_absent_distinct() {
        let mut row = FinancialRow::leaf("drugs-and-consumables", "Drugs and consumables");
        row.q3 = Some(0.0);

        let back: FinancialRow =
            serde_json::from_str(&serde_json::to_string(&row).unwrap()).unwrap();
        assert_eq!(back.q3, Some(0.0));
        assert_eq!(back.q4, None);
        assert_eq!(back, row);
    }
}
