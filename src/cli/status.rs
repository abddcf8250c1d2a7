//! Status and config commands

use crate::config::{CategoryMap, Settings, SyncPaths};
use crate::error::SyncResult;
use crate::storage::{FileCacheStore, FileLedger, FileWatermarkStore, WatermarkStore};

/// Show the sync state: watermark, ledger size, cached responses
pub fn handle_status_command(paths: &SyncPaths) -> SyncResult<()> {
    let watermark = FileWatermarkStore::new(paths.watermark_file()).read();
    let ledger = FileLedger::open(paths.ledger_file())?;
    let cache = FileCacheStore::new(paths.cache_dir());

    println!("Sync Status");
    println!("===========");
    match watermark {
        Some(date) => println!("Last Sync Date:   {}", date.format("%Y-%m-%d")),
        None => println!("Last Sync Date:   never"),
    }
    println!("Synced expenses:  {}", ledger.len());
    println!("Cached responses: {}", cache.entry_count());

    Ok(())
}

/// Show paths and effective settings
pub fn handle_config_command(paths: &SyncPaths, settings: &Settings) -> SyncResult<()> {
    let category_map = CategoryMap::load(paths.category_map_file())?;

    println!("ynab-splitwise-sync Configuration");
    println!("=================================");
    println!("Base directory:   {}", paths.base_dir().display());
    println!("Settings file:    {}", paths.settings_file().display());
    println!("Watermark file:   {}", paths.watermark_file().display());
    println!("Category map:     {}", paths.category_map_file().display());
    println!("Ledger:           {}", paths.ledger_file().display());
    println!("Cache directory:  {}", paths.cache_dir().display());
    println!();
    println!("Settings:");
    match settings.splitwise_group_id {
        Some(id) => println!("  Splitwise group:       {}", id),
        None => println!("  Splitwise group:       (not set)"),
    }
    println!("  Shared category group: {}", settings.shared_category_group_name);
    println!("  Memo marker:           {}", settings.memo_marker);
    println!("  Minor unit scale:      {}", settings.minor_unit_scale);
    println!("  Watermark policy:      {:?}", settings.watermark_policy);
    println!("  Cache enabled:         {}", settings.cache_enabled);
    println!("  Mapped categories:     {}", category_map.len());

    Ok(())
}
