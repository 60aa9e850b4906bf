//! Canonical reporting template for health facility financial statements.
//!
//! Every facility's report must conform to this shape: same ids, same
//! nesting, same ordering. Only leaf values vary by facility. The template is
//! rebuilt fresh per request; nothing here is cached or mutated.

use crate::schema::FinancialRow;

/// The canonical, empty line-item forest.
///
/// Deterministic: every call returns the same ids, hierarchy, and ordering,
/// with all numeric fields absent. Serves both as the authoritative shape for
/// reconciliation/compilation and as the starting structure when a facility
/// has no data yet.
pub fn empty_financial_template() -> Vec<FinancialRow> {
    vec![
        FinancialRow::category(
            "receipts",
            "A. Receipts",
            vec![
                FinancialRow::category(
                    "government-grants",
                    "Government grants",
                    vec![
                        FinancialRow::leaf(
                            "central-government-transfers",
                            "Central government transfers",
                        ),
                        FinancialRow::leaf("district-transfers", "District transfers"),
                    ],
                ),
                FinancialRow::category(
                    "donor-grants",
                    "Donor grants",
                    vec![
                        FinancialRow::leaf("global-fund", "Global Fund"),
                        FinancialRow::leaf(
                            "other-development-partners",
                            "Other development partners",
                        ),
                    ],
                ),
                FinancialRow::category(
                    "internally-generated-funds",
                    "Internally generated funds",
                    vec![
                        FinancialRow::leaf("user-fees", "User fees"),
                        FinancialRow::leaf(
                            "insurance-reimbursements",
                            "Insurance reimbursements",
                        ),
                    ],
                ),
                FinancialRow::leaf("other-receipts", "Other receipts"),
            ],
        ),
        FinancialRow::category(
            "expenditures",
            "B. Expenditures",
            vec![
                FinancialRow::category(
                    "compensation-of-employees",
                    "Compensation of employees",
                    vec![
                        FinancialRow::leaf("salaries-and-wages", "Salaries and wages"),
                        FinancialRow::leaf("staff-allowances", "Staff allowances"),
                    ],
                ),
                FinancialRow::category(
                    "goods-and-services",
                    "Use of goods and services",
                    vec![
                        FinancialRow::category(
                            "medical-supplies",
                            "Medical supplies",
                            vec![
                                FinancialRow::leaf(
                                    "drugs-and-consumables",
                                    "Drugs and consumables",
                                ),
                                FinancialRow::leaf("laboratory-supplies", "Laboratory supplies"),
                            ],
                        ),
                        FinancialRow::leaf("office-supplies", "Office supplies"),
                        FinancialRow::leaf("utilities", "Utilities"),
                        FinancialRow::leaf("maintenance", "Maintenance"),
                        FinancialRow::leaf("transport-and-fuel", "Transport and fuel"),
                    ],
                ),
                FinancialRow::leaf("transfers-to-other-units", "Transfers to other units"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_ids(rows: &[FinancialRow], out: &mut Vec<String>) {
        for row in rows {
            out.push(row.id.clone());
            collect_ids(&row.children, out);
        }
    }

    #[test]
    fn test_template_is_deterministic() {
        assert_eq!(empty_financial_template(), empty_financial_template());
    }

    #[test]
    fn test_template_ids_are_unique() {
        let mut ids = Vec::new();
        collect_ids(&empty_financial_template(), &mut ids);
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total, "template must not repeat ids");
    }

    #[test]
    fn test_template_starts_with_no_values() {
        fn assert_empty(rows: &[FinancialRow]) {
            for row in rows {
                assert_eq!(row.q1, None, "row '{}' must start absent", row.id);
                assert_eq!(row.q2, None);
                assert_eq!(row.q3, None);
                assert_eq!(row.q4, None);
                assert_eq!(row.cumulative_balance, None);
                assert_empty(&row.children);
            }
        }
        assert_empty(&empty_financial_template());
    }

    #[test]
    fn test_leaves_have_no_children_and_categories_do() {
        fn check(rows: &[FinancialRow]) {
            for row in rows {
                if row.is_category {
                    assert!(
                        !row.children.is_empty(),
                        "category '{}' must group something",
                        row.id
                    );
                } else {
                    assert!(row.children.is_empty(), "leaf '{}' must not nest", row.id);
                }
                check(&row.children);
            }
        }
        check(&empty_financial_template());
    }
}
