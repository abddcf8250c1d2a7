//! Sync orchestration
//!
//! One run: read watermark, fetch (through the cache), select, materialize,
//! submit or log each expense, then commit the new watermark. Per-item
//! failures are recorded and the run continues; failures to fetch or to
//! commit the watermark abort the run.

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use super::materializer::ExpenseMaterializer;
use super::selector::TransactionSelector;
use crate::clients::{BudgetSource, ExpenseSink};
use crate::config::WatermarkPolicy;
use crate::error::SyncResult;
use crate::models::{ExpenseRequest, TransactionId};
use crate::storage::{LedgerEntry, SubmissionLedger, WatermarkStore};

/// Start of the window when no watermark has been committed yet
pub fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Per-run options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Log instead of submitting, and never commit the watermark
    pub dry_run: bool,
    pub watermark_policy: WatermarkPolicy,
    /// The run's calendar day; the watermark target on full success
    pub today: NaiveDate,
}

/// An expense that was created in the destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedExpense {
    pub request: ExpenseRequest,
    pub expense_id: Option<u64>,
}

/// A selected transaction that could not be turned into an expense
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub transaction_id: TransactionId,
    pub reason: String,
}

/// A submission the destination rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    pub transaction_id: TransactionId,
    pub date: NaiveDate,
    pub error: String,
}

/// Outcome of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub dry_run: bool,
    pub previous_watermark: Option<NaiveDate>,
    /// First day of the fetched window
    pub since: NaiveDate,
    pub fetched: usize,
    pub selected: usize,
    /// Expenses a dry run would have created
    pub planned: Vec<ExpenseRequest>,
    pub submitted: Vec<SubmittedExpense>,
    /// Selected transactions found in the ledger
    pub already_synced: Vec<TransactionId>,
    pub skipped: Vec<SkippedItem>,
    pub failed: Vec<FailedItem>,
    /// Submitted but not written to the ledger
    pub unrecorded: Vec<TransactionId>,
    pub committed_watermark: Option<NaiveDate>,
}

impl SyncReport {
    fn new(dry_run: bool, previous_watermark: Option<NaiveDate>, since: NaiveDate) -> Self {
        Self {
            dry_run,
            previous_watermark,
            since,
            fetched: 0,
            selected: 0,
            planned: Vec::new(),
            submitted: Vec::new(),
            already_synced: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
            unrecorded: Vec::new(),
            committed_watermark: None,
        }
    }

    /// True when every selected transaction was handled
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty() && self.unrecorded.is_empty()
    }
}

/// Where the watermark goes after a committing run
///
/// Never moves backwards past `previous`.
pub fn next_watermark(
    previous: Option<NaiveDate>,
    today: NaiveDate,
    failed: &[FailedItem],
    policy: WatermarkPolicy,
) -> NaiveDate {
    let candidate = match policy {
        WatermarkPolicy::BestEffort => today,
        WatermarkPolicy::AtLeastOnce => failed
            .iter()
            .map(|item| item.date)
            .min()
            .map_or(today, |earliest| earliest.min(today)),
    };

    match previous {
        Some(previous) => candidate.max(previous),
        None => candidate,
    }
}

/// Drives one sync run against the injected collaborators
pub struct SyncService<'a> {
    source: &'a dyn BudgetSource,
    sink: &'a dyn ExpenseSink,
    watermark: &'a dyn WatermarkStore,
    ledger: &'a dyn SubmissionLedger,
    selector: &'a TransactionSelector,
    materializer: &'a ExpenseMaterializer<'a>,
}

impl<'a> SyncService<'a> {
    pub fn new(
        source: &'a dyn BudgetSource,
        sink: &'a dyn ExpenseSink,
        watermark: &'a dyn WatermarkStore,
        ledger: &'a dyn SubmissionLedger,
        selector: &'a TransactionSelector,
        materializer: &'a ExpenseMaterializer<'a>,
    ) -> Self {
        Self {
            source,
            sink,
            watermark,
            ledger,
            selector,
            materializer,
        }
    }

    /// Run one sync pass
    pub fn run(&self, options: &SyncOptions) -> SyncResult<SyncReport> {
        let previous = self.watermark.read();
        let since = previous.unwrap_or_else(epoch);
        info!(since = %since, dry_run = options.dry_run, "starting sync");

        let mut report = SyncReport::new(options.dry_run, previous, since);

        let transactions = self.source.list_transactions_since(since)?;
        let index = self.source.list_category_groups()?;
        report.fetched = transactions.len();
        debug!(
            transactions = transactions.len(),
            categories = index.len(),
            "fetched source data"
        );

        let mut ledger_available = true;

        for selected in self.selector.select(&transactions, &index) {
            report.selected += 1;
            let txn = selected.transaction;

            if self.ledger.contains(&txn.id) {
                debug!(transaction_id = %txn.id, "already synced, skipping");
                report.already_synced.push(txn.id.clone());
                continue;
            }

            let request = match self.materializer.materialize(txn, selected.category_id) {
                Ok(request) => request,
                Err(e) if !e.is_per_item() => return Err(e),
                Err(e) => {
                    warn!(transaction_id = %txn.id, error = %e, "skipping transaction");
                    report.skipped.push(SkippedItem {
                        transaction_id: txn.id.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if request.category_id.is_none() {
                debug!(transaction_id = %txn.id, "no destination category mapped");
            }

            if options.dry_run {
                info!(
                    name = %request.name,
                    amount = %request.amount.to_decimal_string(),
                    transaction_id = %txn.id,
                    "will create expense"
                );
                report.planned.push(request);
                continue;
            }

            // Without a ledger a created expense cannot be remembered, so stop creating
            if !ledger_available {
                report.failed.push(FailedItem {
                    transaction_id: txn.id.clone(),
                    date: txn.date,
                    error: "not submitted: ledger unavailable".to_string(),
                });
                continue;
            }

            match self.sink.create_expense(&request) {
                Ok(created) => {
                    info!(
                        name = %request.name,
                        amount = %request.amount.to_decimal_string(),
                        expense_id = ?created.id,
                        "created expense"
                    );
                    let entry =
                        LedgerEntry::new(txn.id.clone(), txn.date, created.id, request.amount);
                    if let Err(e) = self.record_with_retry(&entry) {
                        error!(transaction_id = %txn.id, error = %e, "expense created but not recorded in ledger");
                        report.unrecorded.push(txn.id.clone());
                        ledger_available = false;
                    }
                    report.submitted.push(SubmittedExpense {
                        request,
                        expense_id: created.id,
                    });
                }
                Err(e) => {
                    error!(transaction_id = %txn.id, error = %e, "could not create expense");
                    report.failed.push(FailedItem {
                        transaction_id: txn.id.clone(),
                        date: txn.date,
                        error: e.to_string(),
                    });
                }
            }
        }

        if !options.dry_run {
            let target = next_watermark(
                previous,
                options.today,
                &report.failed,
                options.watermark_policy,
            );
            self.watermark.commit(target)?;
            info!(watermark = %target, "committed watermark");
            report.committed_watermark = Some(target);
        }

        Ok(report)
    }

    /// Record a created expense, retrying once on failure
    fn record_with_retry(&self, entry: &LedgerEntry) -> SyncResult<()> {
        match self.ledger.record(entry) {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(transaction_id = %entry.transaction_id, error = %e, "ledger write failed, retrying");
                self.ledger.record(entry)
            }
        }
    }
}
