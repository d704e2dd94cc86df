//! Ledger Engine
//!
//! Entry point for the API layer. The engine owns an injected
//! [`LedgerStore`] and [`CacheClient`], reads one snapshot per request and
//! runs the pure settlement components over it.
//!
//! # Request Flow
//!
//! ```text
//! compute_*:   snapshot (cache → store) → aggregate → net / summarize / share
//! settle_*:    authorize actor → SettlementExecutor → invalidate snapshot
//! *_expense:   validate → create / replace / delete rows → invalidate snapshot
//! ```
//!
//! # Critical Invariants
//!
//! 1. Derived reports are recomputed on every call; only raw rows are cached
//! 2. Every write invalidates the affected group's cached snapshot
//! 3. Only an expense's payer may settle another member's entry for it
//!
//! CRITICAL: All money values are i64 (cents)

use crate::cache::{CacheClient, NoopCache};
use crate::engine::config::LedgerConfig;
use crate::engine::error::LedgerError;
use crate::models::expense::Expense;
use crate::models::ledger_entry::LedgerEntry;
use crate::settlement::{
    aggregate_transactions, flatten, net_debts, summarize_balances, BalanceSummary, NetDebt,
    OwedRecord, SettlementExecutor, SettlementOutcome,
};
use crate::shares::{compute_shares_with_floor, Share};
use crate::split::{SplitMethod, SplitPlan};
use crate::store::{EntryFilter, LedgerStore};
use tracing::{debug, info, warn};

fn snapshot_key(group_id: &str) -> String {
    format!("ledger:group:{}", group_id)
}

/// Ledger facade over an injected store and cache
///
/// # Example
/// ```
/// use settlement_ledger_core::store::InMemoryLedgerStore;
/// use settlement_ledger_core::{Expense, LedgerEngine};
///
/// let engine = LedgerEngine::new(InMemoryLedgerStore::new());
/// let expense = Expense::new("trip".into(), "A".into(), 30_000, "Cabin")
///     .with_member("A", 10_000)
///     .with_member("B", 10_000)
///     .with_member("C", 10_000);
/// engine.create_expense(&expense).unwrap();
///
/// let records = engine.compute_owed_records("trip").unwrap();
/// assert_eq!(records.len(), 2);
/// assert!(records.iter().all(|r| r.amount == 10_000));
///
/// // Only the payer may settle B's entry
/// assert!(engine.settle_entry("C", &expense.id, "B").is_err());
/// let entry = engine.settle_entry("A", &expense.id, "B").unwrap();
/// assert!(entry.is_settled());
/// ```
pub struct LedgerEngine<S: LedgerStore, C: CacheClient = NoopCache> {
    store: S,
    cache: C,
    config: LedgerConfig,
}

impl<S: LedgerStore> LedgerEngine<S> {
    /// Engine without a cache and with default configuration
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: NoopCache,
            config: LedgerConfig::default(),
        }
    }
}

impl<S: LedgerStore, C: CacheClient> LedgerEngine<S, C> {
    /// Engine reading snapshots through `cache`
    ///
    /// # Errors
    /// Returns `Validation` if the config is out of range
    pub fn with_cache(store: S, cache: C, config: LedgerConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        Ok(Self {
            store,
            cache,
            config,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ========================================================================
    // Snapshot
    // ========================================================================

    /// All rows of a group, served from the cache when possible
    pub fn group_snapshot(&self, group_id: &str) -> Result<Vec<LedgerEntry>, LedgerError> {
        let key = snapshot_key(group_id);

        if let Some(cached) = self.cache.get(&key) {
            match serde_json::from_str::<Vec<LedgerEntry>>(&cached) {
                Ok(entries) => {
                    debug!(group_id, rows = entries.len(), "snapshot cache hit");
                    return Ok(entries);
                }
                Err(err) => {
                    warn!(group_id, error = %err, "dropping unreadable cached snapshot");
                    self.cache.invalidate(&key);
                }
            }
        }

        debug!(group_id, "snapshot cache miss");
        let entries = self.store.list_group_entries(group_id)?;
        match serde_json::to_string(&entries) {
            Ok(json) => self.cache.set(&key, json, self.config.snapshot_cache_ttl()),
            Err(err) => warn!(group_id, error = %err, "snapshot not cached"),
        }
        Ok(entries)
    }

    fn invalidate_group(&self, group_id: &str) {
        self.cache.invalidate(&snapshot_key(group_id));
    }

    // ========================================================================
    // Reports
    // ========================================================================

    /// Who still owes whom, per debtor, after pairwise netting
    pub fn compute_owed_records(&self, group_id: &str) -> Result<Vec<OwedRecord>, LedgerError> {
        let entries = self.group_snapshot(group_id)?;
        let flows = aggregate_transactions(&entries);
        let records = net_debts(&flows);
        debug!(
            group_id,
            rows = entries.len(),
            flows = flows.len(),
            records = records.len(),
            "computed owed records"
        );
        Ok(records)
    }

    /// Owed records flattened into one list of directed debts
    pub fn compute_net_debts(&self, group_id: &str) -> Result<Vec<NetDebt>, LedgerError> {
        Ok(flatten(&self.compute_owed_records(group_id)?))
    }

    pub fn compute_balance_summary(&self, group_id: &str) -> Result<Vec<BalanceSummary>, LedgerError> {
        let entries = self.group_snapshot(group_id)?;
        let summaries = summarize_balances(&aggregate_transactions(&entries));
        debug!(group_id, users = summaries.len(), "computed balance summary");
        Ok(summaries)
    }

    pub fn compute_shares(&self, group_id: &str) -> Result<Vec<Share>, LedgerError> {
        let entries = self.group_snapshot(group_id)?;
        Ok(compute_shares_with_floor(&entries, self.config.share_opacity_floor))
    }

    /// Draft an allocation of `total` among `members`
    ///
    /// `method` is the wire name (`equal`, `percentage`, `fraction`, `custom`).
    pub fn plan_split<M: AsRef<str>>(
        &self,
        total: i64,
        method: &str,
        members: &[M],
    ) -> Result<SplitPlan, LedgerError> {
        let method: SplitMethod = method.parse()?;
        Ok(SplitPlan::new(total, method, members)?)
    }

    // ========================================================================
    // Expense writes
    // ========================================================================

    /// Validate an expense and write one row per member
    ///
    /// An expense id that already has rows is rejected; use
    /// [`update_expense`](Self::update_expense) to change an existing expense.
    pub fn create_expense(&self, expense: &Expense) -> Result<Vec<LedgerEntry>, LedgerError> {
        if let Err(err) = expense.validate() {
            warn!(expense_id = %expense.id, error = %err, "expense rejected");
            return Err(err.into());
        }
        if !self.store.list_expense_entries(&expense.id)?.is_empty() {
            warn!(expense_id = %expense.id, "expense already recorded");
            return Err(LedgerError::validation("id", &expense.id));
        }

        let entries = expense.ledger_entries();
        self.store.create_entries(entries.clone())?;
        self.invalidate_group(&expense.group_id);

        info!(
            expense_id = %expense.id,
            group_id = %expense.group_id,
            paid_by = %expense.paid_by,
            amount = expense.amount,
            members = entries.len(),
            "expense recorded"
        );
        Ok(entries)
    }

    /// Replace an existing expense's rows with freshly built ones
    ///
    /// Rows are recreated, so any settlement progress on the old rows is
    /// discarded.
    pub fn update_expense(&self, expense: &Expense) -> Result<Vec<LedgerEntry>, LedgerError> {
        if let Err(err) = expense.validate() {
            warn!(expense_id = %expense.id, error = %err, "expense update rejected");
            return Err(err.into());
        }

        let existing = self.store.list_expense_entries(&expense.id)?;
        let previous_group = existing
            .first()
            .map(|entry| entry.group_id().to_string())
            .ok_or_else(|| LedgerError::not_found("expense", &expense.id))?;

        let entries = expense.ledger_entries();
        let replaced = self
            .store
            .replace_entries(&EntryFilter::for_expense(&expense.id), entries.clone())?;
        self.invalidate_group(&previous_group);
        if previous_group != expense.group_id {
            self.invalidate_group(&expense.group_id);
        }

        info!(
            expense_id = %expense.id,
            replaced,
            members = entries.len(),
            "expense updated"
        );
        Ok(entries)
    }

    /// Remove every row of an expense, returning how many were deleted
    pub fn delete_expense(&self, expense_id: &str) -> Result<usize, LedgerError> {
        let existing = self.store.list_expense_entries(expense_id)?;
        let group_id = existing
            .first()
            .map(|entry| entry.group_id().to_string())
            .ok_or_else(|| LedgerError::not_found("expense", expense_id))?;

        let removed = self.store.delete_entries(&EntryFilter::for_expense(expense_id))?;
        self.invalidate_group(&group_id);

        info!(expense_id, group_id = %group_id, removed, "expense deleted");
        Ok(removed)
    }

    // ========================================================================
    // Settlement
    // ========================================================================

    fn executor(&self) -> SettlementExecutor<'_, S> {
        SettlementExecutor::new(&self.store).with_conflict_retries(self.config.conflict_retries)
    }

    /// Settle `member_id`'s entry for an expense on behalf of `actor`
    ///
    /// # Errors
    /// - `NotFound` if the expense or the member's entry does not exist
    /// - `Forbidden` if `actor` did not pay the expense
    /// - `Conflict` if a concurrent write survived every retry
    pub fn settle_entry(
        &self,
        actor: &str,
        expense_id: &str,
        member_id: &str,
    ) -> Result<LedgerEntry, LedgerError> {
        let entries = self.store.list_expense_entries(expense_id)?;
        let first = entries
            .first()
            .ok_or_else(|| LedgerError::not_found("expense", expense_id))?;

        if first.creditor_id() != actor {
            warn!(actor, expense_id, member_id, "settlement by non-payer refused");
            return Err(LedgerError::forbidden(
                actor,
                format!("only the payer of expense {} may settle its entries", expense_id),
            ));
        }
        let group_id = first.group_id().to_string();

        let entry = self.executor().settle_one(expense_id, member_id)?;
        self.invalidate_group(&group_id);
        Ok(entry)
    }

    /// Settle everything `a` and `b` owe each other in a group
    ///
    /// Only `a` or `b` may request it. Both directions are settled in full,
    /// so the requester also settles its own debts on expenses the other user
    /// paid. Unlike [`settle_entry`](Self::settle_entry), this is not limited
    /// to the payer: either party may close out the pair.
    pub fn settle_between_users(
        &self,
        actor: &str,
        group_id: &str,
        a: &str,
        b: &str,
    ) -> Result<SettlementOutcome, LedgerError> {
        if a == b {
            return Err(LedgerError::validation("user_id", b));
        }
        if actor != a && actor != b {
            warn!(actor, group_id, a, b, "settlement by outsider refused");
            return Err(LedgerError::forbidden(
                actor,
                format!("only {} or {} may settle between them", a, b),
            ));
        }

        let outcome = self.executor().settle_all_between_users(group_id, a, b)?;
        if !outcome.is_empty() {
            self.invalidate_group(group_id);
        }
        Ok(outcome)
    }
}
