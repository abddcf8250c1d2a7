//! Expense and sync report display formatting
//!
//! Plain-text rendering of what a run did (or would do, in dry-run mode).

use crate::models::ExpenseRequest;
use crate::services::SyncReport;

/// Format a single expense for display
pub fn format_expense_row(expense: &ExpenseRequest) -> String {
    let category = expense
        .category_id
        .map(|id| format!("cat {}", id))
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{} {:24} {:>10}  {:8} {}",
        expense.date.format("%Y-%m-%d"),
        truncate(&expense.name, 24),
        expense.amount.to_decimal_string(),
        category,
        expense.source_id
    )
}

/// Format a list of expenses with a header
pub fn format_expense_list(expenses: &[&ExpenseRequest]) -> String {
    if expenses.is_empty() {
        return "No expenses.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:10} {:24} {:>10}  {:8} {}\n",
        "Date", "Name", "Amount", "Category", "Source"
    ));
    output.push_str(&"-".repeat(72));
    output.push('\n');

    for expense in expenses {
        output.push_str(&format_expense_row(expense));
        output.push('\n');
    }

    output
}

/// Format the summary of a sync run
pub fn format_sync_report(report: &SyncReport) -> String {
    let mut output = String::new();

    let last_sync = report
        .previous_watermark
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "never".to_string());
    output.push_str(&format!("Last Sync Date: {}\n", last_sync));
    output.push_str(&format!(
        "Window:         since {}\n",
        report.since.format("%Y-%m-%d")
    ));
    output.push_str(&format!(
        "Transactions:   {} fetched, {} selected\n",
        report.fetched, report.selected
    ));
    output.push('\n');

    if report.dry_run {
        output.push_str("Dry run - expenses that would be created:\n");
        let planned: Vec<&ExpenseRequest> = report.planned.iter().collect();
        output.push_str(&format_expense_list(&planned));
    } else {
        output.push_str("Created expenses:\n");
        let submitted: Vec<&ExpenseRequest> =
            report.submitted.iter().map(|s| &s.request).collect();
        output.push_str(&format_expense_list(&submitted));
    }

    if !report.already_synced.is_empty() {
        output.push_str(&format!(
            "\n{} already synced, skipped\n",
            report.already_synced.len()
        ));
    }

    if !report.skipped.is_empty() {
        output.push_str("\nSkipped:\n");
        for item in &report.skipped {
            output.push_str(&format!("  {}: {}\n", item.transaction_id, item.reason));
        }
    }

    if !report.failed.is_empty() {
        output.push_str("\nFailed:\n");
        for item in &report.failed {
            output.push_str(&format!("  {}: {}\n", item.transaction_id, item.error));
        }
    }

    if !report.unrecorded.is_empty() {
        output.push_str(&format!(
            "\n{} created but missing from the ledger; check for duplicates\n",
            report.unrecorded.len()
        ));
    }

    match report.committed_watermark {
        Some(date) => output.push_str(&format!("\nWatermark:      {}\n", date.format("%Y-%m-%d"))),
        None => output.push_str("\nWatermark:      unchanged\n"),
    }

    output
}

/// Truncate a string to a maximum number of characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionId};
    use crate::services::sync::{FailedItem, SubmittedExpense};
    use chrono::NaiveDate;

    fn expense(id: &str, name: &str) -> ExpenseRequest {
        ExpenseRequest {
            source_id: TransactionId::from(id),
            amount: Money::from_cents(425),
            name: name.into(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            group_id: 1,
            category_id: Some(12),
        }
    }

    fn report(dry_run: bool) -> SyncReport {
        SyncReport {
            dry_run,
            previous_watermark: None,
            since: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            fetched: 3,
            selected: 1,
            planned: Vec::new(),
            submitted: Vec::new(),
            already_synced: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
            unrecorded: Vec::new(),
            committed_watermark: None,
        }
    }

    #[test]
    fn test_expense_row() {
        let row = format_expense_row(&expense("t1", "Groceries"));
        assert!(row.starts_with("2024-03-01 Groceries"));
        assert!(row.contains("4.25"));
        assert!(row.contains("cat 12"));
        assert!(row.ends_with("t1"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_expense_list(&[]), "No expenses.\n");
    }

    #[test]
    fn test_long_names_truncated() {
        assert_eq!(truncate("Cabin Improvements and Repairs", 10), "Cabin I...");
        assert_eq!(truncate("Short", 10), "Short");
    }

    #[test]
    fn test_dry_run_report() {
        let mut report = report(true);
        report.planned.push(expense("t1", "Groceries"));

        let text = format_sync_report(&report);
        assert!(text.contains("Last Sync Date: never"));
        assert!(text.contains("Dry run"));
        assert!(text.contains("Groceries"));
        assert!(text.contains("Watermark:      unchanged"));
    }

    #[test]
    fn test_commit_report_with_failures() {
        let mut report = report(false);
        report.submitted.push(SubmittedExpense {
            request: expense("t1", "Groceries"),
            expense_id: Some(1),
        });
        report.failed.push(FailedItem {
            transaction_id: TransactionId::from("t2"),
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
            error: "Destination API error: 422".into(),
        });
        report.committed_watermark = NaiveDate::from_ymd_opt(2024, 3, 2);

        let text = format_sync_report(&report);
        assert!(text.contains("Created expenses:"));
        assert!(text.contains("t2: Destination API error: 422"));
        assert!(text.contains("Watermark:      2024-03-02"));
    }
}
