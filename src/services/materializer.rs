//! Expense materialization
//!
//! Turns a selected transaction into the expense request submitted to the
//! destination. Pure: no I/O, no clock.

use crate::config::CategoryMap;
use crate::error::{SyncError, SyncResult};
use crate::models::{CategoryId, ExpenseRequest, Money, Transaction};

/// Builds expense requests for one destination group
#[derive(Debug, Clone)]
pub struct ExpenseMaterializer<'a> {
    category_map: &'a CategoryMap,
    group_id: u64,
    minor_unit_scale: i64,
}

impl<'a> ExpenseMaterializer<'a> {
    pub fn new(category_map: &'a CategoryMap, group_id: u64, minor_unit_scale: i64) -> Self {
        Self {
            category_map,
            group_id,
            minor_unit_scale,
        }
    }

    /// Build the expense request for `txn`
    ///
    /// Fails with `MissingRequiredField` when the transaction has no category
    /// name, since that is the expense's display name.
    pub fn materialize(
        &self,
        txn: &Transaction,
        category_id: Option<&CategoryId>,
    ) -> SyncResult<ExpenseRequest> {
        let name = txn
            .category_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| SyncError::missing_field(txn.id.as_str(), "category_name"))?;

        let amount = Money::from_minor_units(txn.amount, self.minor_unit_scale).abs();

        Ok(ExpenseRequest {
            source_id: txn.id.clone(),
            amount,
            name: name.to_string(),
            description: describe(txn, amount),
            date: txn.date,
            group_id: self.group_id,
            category_id: category_id.and_then(|id| self.category_map.lookup(id)),
        })
    }
}

/// Fixed-format description; the only link back to the source transaction
fn describe(txn: &Transaction, amount: Money) -> String {
    format!(
        "ID: {}\nCategory: {}\nPayee: {}\nMemo: {}\nAmount: {}\n",
        txn.id,
        txn.category_name.as_deref().unwrap_or_default(),
        txn.payee_name.as_deref().unwrap_or_default(),
        txn.memo.as_deref().unwrap_or_default(),
        amount.to_decimal_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClearingStatus, TransactionId};
    use chrono::NaiveDate;

    fn groceries() -> Transaction {
        Transaction {
            id: TransactionId::from("t1"),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            amount: -4250,
            cleared: ClearingStatus::Cleared,
            category_id: Some(CategoryId::from("groceries")),
            category_name: Some("Groceries".into()),
            payee_name: Some("Market".into()),
            memo: None,
            deleted: false,
        }
    }

    fn map() -> CategoryMap {
        [(CategoryId::from("groceries"), 12)].into_iter().collect()
    }

    #[test]
    fn test_groceries_scenario() {
        let map = map();
        let materializer = ExpenseMaterializer::new(&map, 5600408, 1000);
        let txn = groceries();

        let request = materializer
            .materialize(&txn, txn.category_id.as_ref())
            .unwrap();

        assert_eq!(request.amount, Money::from_cents(425));
        assert_eq!(request.amount.to_decimal_string(), "4.25");
        assert_eq!(request.name, "Groceries");
        assert_eq!(request.group_id, 5600408);
        assert_eq!(request.category_id, Some(12));
        assert_eq!(request.date, txn.date);
        assert_eq!(request.source_id, txn.id);
    }

    #[test]
    fn test_description_format() {
        let map = CategoryMap::default();
        let materializer = ExpenseMaterializer::new(&map, 1, 1000);
        let request = materializer.materialize(&groceries(), None).unwrap();

        assert_eq!(
            request.description,
            "ID: t1\nCategory: Groceries\nPayee: Market\nMemo: \nAmount: 4.25\n"
        );
    }

    #[test]
    fn test_missing_category_name() {
        let map = CategoryMap::default();
        let materializer = ExpenseMaterializer::new(&map, 1, 1000);
        let mut txn = groceries();
        txn.category_name = None;

        let err = materializer.materialize(&txn, None).unwrap_err();
        assert!(matches!(
            err,
            SyncError::MissingRequiredField {
                field: "category_name",
                ..
            }
        ));
    }

    #[test]
    fn test_unmapped_category_submits_without_one() {
        let map = CategoryMap::default();
        let materializer = ExpenseMaterializer::new(&map, 1, 1000);
        let txn = groceries();

        let request = materializer
            .materialize(&txn, txn.category_id.as_ref())
            .unwrap();
        assert_eq!(request.category_id, None);
    }

    #[test]
    fn test_scale_is_configurable() {
        let map = CategoryMap::default();
        let materializer = ExpenseMaterializer::new(&map, 1, 100);
        let request = materializer.materialize(&groceries(), None).unwrap();
        assert_eq!(request.amount.to_decimal_string(), "42.50");
    }
}
