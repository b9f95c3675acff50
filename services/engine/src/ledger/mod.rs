//! The balance store: a single non-negative subunit balance with one logical
//! writer, mirrored to durable storage after every mutation.
//!
//! The in-memory value is authoritative for the session; persistence is
//! best-effort. Concurrent stores sharing the same backing file are not
//! reconciled (documented design gap).

pub mod storage;

use shared::{SubunitAmount, BALANCE_STORAGE_KEY, LOADING_STORAGE_KEY};
use storage::BalanceStorage;

pub struct BalanceStore<S: BalanceStorage> {
    balance: u64,
    loading: bool,
    storage: S,
}

impl<S: BalanceStorage> BalanceStore<S> {
    /// Open the store, rehydrating the balance from durable storage.
    ///
    /// Absent, non-numeric, or negative stored values normalize to zero and
    /// the stored value is rewritten to "0".
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            balance: 0,
            loading: false,
            storage,
        };

        let raw = store
            .storage
            .read(BALANCE_STORAGE_KEY)
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to read stored balance, treating as absent");
                None
            });

        store.balance = match raw.as_deref().map(str::parse::<u64>) {
            Some(Ok(value)) => value,
            Some(Err(_)) => {
                tracing::warn!(stored = ?raw, "Invalid stored balance, resetting to 0");
                store.persist_balance_value(0);
                0
            }
            None => {
                store.persist_balance_value(0);
                0
            }
        };

        store.loading = matches!(
            store.storage.read(LOADING_STORAGE_KEY),
            Ok(Some(ref v)) if v == "true"
        );

        store
    }

    pub fn balance(&self) -> SubunitAmount {
        SubunitAmount::new(self.balance)
    }

    /// Replace the balance. Negative values clamp to zero with a warning.
    pub fn set_balance(&mut self, value: i64) {
        if value < 0 {
            tracing::warn!(value, "Attempted to set negative balance, setting to 0 instead");
            self.balance = 0;
        } else {
            self.balance = value as u64;
        }
        self.persist_balance_value(self.balance);
    }

    /// Add to the balance, saturating at the type maximum.
    pub fn credit(&mut self, amount: SubunitAmount) {
        self.balance = self.balance.saturating_add(amount.as_u64());
        self.persist_balance_value(self.balance);
    }

    /// Subtract from the balance, clamping at zero.
    pub fn debit(&mut self, amount: SubunitAmount) {
        self.balance = self.balance.saturating_sub(amount.as_u64());
        self.persist_balance_value(self.balance);
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        if let Err(e) = self
            .storage
            .write(LOADING_STORAGE_KEY, if loading { "true" } else { "false" })
        {
            tracing::warn!(error = %e, "Failed to persist loading flag");
        }
    }

    fn persist_balance_value(&mut self, value: u64) {
        if let Err(e) = self.storage.write(BALANCE_STORAGE_KEY, &value.to_string()) {
            // In-memory value stays authoritative for the session.
            tracing::warn!(error = %e, "Failed to persist balance");
        }
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::storage::MemoryStorage;
    use super::*;

    #[test]
    fn test_set_balance_clamps_negative() {
        let mut store = BalanceStore::open(MemoryStorage::new());
        store.set_balance(-500);
        assert_eq!(store.balance(), SubunitAmount::ZERO);
        assert_eq!(
            store.storage().get(BALANCE_STORAGE_KEY).map(String::as_str),
            Some("0")
        );

        store.set_balance(1_000_000_000);
        assert_eq!(store.balance().as_u64(), 1_000_000_000);
        assert_eq!(
            store.storage().get(BALANCE_STORAGE_KEY).map(String::as_str),
            Some("1000000000")
        );
    }

    #[test]
    fn test_open_rehydrates_valid_balance() {
        let storage = MemoryStorage::with_entry(BALANCE_STORAGE_KEY, "250000000");
        let store = BalanceStore::open(storage);
        assert_eq!(store.balance().as_u64(), 250_000_000);
    }

    #[test]
    fn test_open_normalizes_corrupt_balance() {
        for bad in ["abc", "-100", "1.5", ""] {
            let storage = MemoryStorage::with_entry(BALANCE_STORAGE_KEY, bad);
            let store = BalanceStore::open(storage);
            assert_eq!(store.balance(), SubunitAmount::ZERO, "input: {:?}", bad);
            assert_eq!(
                store.storage().get(BALANCE_STORAGE_KEY).map(String::as_str),
                Some("0"),
                "input: {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_open_absent_balance_writes_zero() {
        let store = BalanceStore::open(MemoryStorage::new());
        assert_eq!(store.balance(), SubunitAmount::ZERO);
        assert_eq!(
            store.storage().get(BALANCE_STORAGE_KEY).map(String::as_str),
            Some("0")
        );
    }

    #[test]
    fn test_debit_clamps_at_zero() {
        let mut store = BalanceStore::open(MemoryStorage::new());
        store.set_balance(100);
        store.debit(SubunitAmount::new(250));
        assert_eq!(store.balance(), SubunitAmount::ZERO);
    }

    #[test]
    fn test_persistence_failure_keeps_memory_authoritative() {
        let mut storage = MemoryStorage::new();
        storage.fail_writes = true;
        let mut store = BalanceStore::open(storage);
        store.set_balance(777);
        assert_eq!(store.balance().as_u64(), 777);
    }

    #[test]
    fn test_loading_flag_round_trip() {
        let mut store = BalanceStore::open(MemoryStorage::new());
        assert!(!store.is_loading());
        store.set_loading(true);
        assert!(store.is_loading());
        assert_eq!(
            store.storage().get(LOADING_STORAGE_KEY).map(String::as_str),
            Some("true")
        );
    }
}
