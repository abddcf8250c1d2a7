//! Sync command
//!
//! Wires the real clients, file-backed state and settings into one run.

use chrono::Local;
use tracing::{debug, warn};

use crate::clients::{BudgetSource, CachedBudgetSource, SplitwiseClient, YnabClient};
use crate::config::{CategoryMap, Credentials, Settings, SyncPaths};
use crate::display::format_sync_report;
use crate::error::{SyncError, SyncResult};
use crate::services::{
    ExpenseMaterializer, SyncOptions, SyncReport, SyncService, TransactionSelector,
};
use crate::storage::Storage;

/// Run one sync pass and print its report
pub fn handle_sync_command(
    paths: &SyncPaths,
    settings: &Settings,
    credentials: Credentials,
    dry_run: bool,
) -> SyncResult<SyncReport> {
    if dry_run {
        println!("Dry run... Printing values");
    }

    let Credentials {
        ynab_token,
        budget_id,
        splitwise_key,
        splitwise_group_id,
    } = credentials;

    let group_id = splitwise_group_id
        .or(settings.splitwise_group_id)
        .ok_or_else(|| {
            SyncError::Config(format!(
                "No Splitwise group configured; set SPLITWISE_GROUP_ID or splitwise_group_id in {}",
                paths.settings_file().display()
            ))
        })?;

    let category_map = CategoryMap::load(paths.category_map_file())?;
    let storage = Storage::new(paths.clone())?;

    let ynab = YnabClient::new(ynab_token, budget_id.as_str())?;
    let source: Box<dyn BudgetSource> = if settings.cache_enabled {
        Box::new(CachedBudgetSource::new(
            ynab,
            storage.response_cache(),
            budget_id.as_str(),
        ))
    } else {
        Box::new(ynab)
    };
    let splitwise = SplitwiseClient::new(splitwise_key)?;

    let selector =
        TransactionSelector::new(settings.shared_category_group_name.as_str(), &settings.memo_marker);
    let materializer =
        ExpenseMaterializer::new(&category_map, group_id, settings.minor_unit_scale);

    let service = SyncService::new(
        source.as_ref(),
        &splitwise,
        &storage.watermark,
        &storage.ledger,
        &selector,
        &materializer,
    );

    let report = service.run(&SyncOptions {
        dry_run,
        watermark_policy: settings.watermark_policy,
        today: Local::now().date_naive(),
    })?;

    if let Some(watermark) = report.committed_watermark {
        match storage.ledger.compact(watermark) {
            Ok(0) => {}
            Ok(removed) => debug!(removed, "compacted ledger"),
            Err(e) => warn!(error = %e, "ledger compaction failed"),
        }
    }

    print!("{}", format_sync_report(&report));
    Ok(report)
}
