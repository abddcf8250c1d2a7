//! Expense records sent to the expense-splitting service

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::TransactionId;
use super::money::Money;

/// A request to create one equally-split group expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRequest {
    /// Source transaction this expense was derived from
    pub source_id: TransactionId,

    /// Positive amount in major units
    pub amount: Money,

    /// Display name (the source category name)
    pub name: String,

    /// Multi-line description embedding the source id and metadata
    pub description: String,

    /// Date of the source transaction
    pub date: NaiveDate,

    /// Destination group
    pub group_id: u64,

    /// Destination category, if the source category is mapped
    pub category_id: Option<u32>,
}

/// The destination's acknowledgement of a created expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedExpense {
    /// Destination-side expense id, when the service returns one
    pub id: Option<u64>,
}
