//! Day-cached decorator over a [`BudgetSource`]
//!
//! At most one upstream call per distinct query per day, however many times
//! the job runs that day.

use chrono::NaiveDate;

use super::BudgetSource;
use crate::error::SyncResult;
use crate::models::{CategoryGroupIndex, Transaction};
use crate::storage::cache::{CacheStore, QueryKey, ResponseCache};

const TRANSACTIONS: &str = "transactions";
const CATEGORY_GROUPS: &str = "grouped_categories";

/// A budget source whose reads go through a [`ResponseCache`]
pub struct CachedBudgetSource<S: BudgetSource, C: CacheStore> {
    inner: S,
    cache: ResponseCache<C>,
    /// Account scope for cache keys (the budget id)
    scope: String,
}

impl<S: BudgetSource, C: CacheStore> CachedBudgetSource<S, C> {
    pub fn new(inner: S, cache: ResponseCache<C>, scope: impl Into<String>) -> Self {
        Self {
            inner,
            cache,
            scope: scope.into(),
        }
    }

    pub fn cache(&self) -> &ResponseCache<C> {
        &self.cache
    }
}

impl<S: BudgetSource, C: CacheStore> BudgetSource for CachedBudgetSource<S, C> {
    fn list_transactions_since(&self, since: NaiveDate) -> SyncResult<Vec<Transaction>> {
        let query = QueryKey::new(TRANSACTIONS, self.scope.as_str())
            .with_params(since.format("%Y-%m-%d").to_string());
        self.cache
            .get_or_fetch(&query, || self.inner.list_transactions_since(since))
    }

    fn list_category_groups(&self) -> SyncResult<CategoryGroupIndex> {
        let query = QueryKey::new(CATEGORY_GROUPS, self.scope.as_str());
        self.cache
            .get_or_fetch(&query, || self.inner.list_category_groups())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::models::{ClearingStatus, TransactionId};
    use crate::storage::cache::InMemoryCacheStore;
    use std::cell::Cell;

    struct CountingSource {
        transaction_calls: Cell<u32>,
        group_calls: Cell<u32>,
        fail: bool,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                transaction_calls: Cell::new(0),
                group_calls: Cell::new(0),
                fail: false,
            }
        }
    }

    impl BudgetSource for CountingSource {
        fn list_transactions_since(&self, since: NaiveDate) -> SyncResult<Vec<Transaction>> {
            self.transaction_calls.set(self.transaction_calls.get() + 1);
            if self.fail {
                return Err(SyncError::Source("down".into()));
            }
            Ok(vec![Transaction {
                id: TransactionId::from("t1"),
                date: since,
                amount: -1000,
                cleared: ClearingStatus::Cleared,
                category_id: None,
                category_name: Some("Groceries".into()),
                payee_name: None,
                memo: None,
                deleted: false,
            }])
        }

        fn list_category_groups(&self) -> SyncResult<CategoryGroupIndex> {
            self.group_calls.set(self.group_calls.get() + 1);
            let mut index = CategoryGroupIndex::new();
            index.insert("c1".into(), "Shared");
            Ok(index)
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_repeated_reads_hit_upstream_once() {
        let inner = CountingSource::new();
        let source = CachedBudgetSource::new(
            &inner,
            ResponseCache::with_period(InMemoryCacheStore::new(), day(10)),
            "budget-1",
        );

        let first = source.list_transactions_since(day(1)).unwrap();
        let second = source.list_transactions_since(day(1)).unwrap();
        source.list_category_groups().unwrap();
        let groups = source.list_category_groups().unwrap();

        assert_eq!(first, second);
        assert_eq!(groups.group_name(&"c1".into()), Some("Shared"));
        assert_eq!(inner.transaction_calls.get(), 1);
        assert_eq!(inner.group_calls.get(), 1);
        assert_eq!(
            source.cache().store().keys(),
            vec![
                "grouped_categories_budget-1_2024-03-10".to_string(),
                "transactions_budget-1_2024-03-01_2024-03-10".to_string(),
            ]
        );
    }

    #[test]
    fn test_upstream_failure_is_not_cached() {
        let mut inner = CountingSource::new();
        inner.fail = true;
        let source = CachedBudgetSource::new(
            &inner,
            ResponseCache::with_period(InMemoryCacheStore::new(), day(10)),
            "budget-1",
        );

        assert!(source.list_transactions_since(day(1)).is_err());
        assert!(source.list_transactions_since(day(1)).is_err());
        assert_eq!(inner.transaction_calls.get(), 2);
    }
}
