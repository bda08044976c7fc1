//! Player accounts. The bot only reads balances and registers players;
//! anything that changes a balance lives outside this crate.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use chipbot_engine::PlayerId;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

/// Chips a freshly registered player starts with.
pub const STARTING_BALANCE: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account {
    pub balance: u32,
    pub experience: u32,
    pub level: u32,
    pub wins: u32,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            balance: STARTING_BALANCE,
            experience: 0,
            level: 1,
            wins: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Created,
    AlreadyRegistered,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("player store is unavailable")]
    Unavailable,
    #[error("player store lock poisoned")]
    Poisoned,
}

pub trait PlayerStore {
    /// Creates an account with the default balance. Registering twice is a
    /// no-op that reports [`Registration::AlreadyRegistered`].
    fn register(&self, id: PlayerId) -> Result<Registration, StoreError>;

    fn account(&self, id: PlayerId) -> Result<Option<Account>, StoreError>;
}

impl<S: PlayerStore + ?Sized> PlayerStore for Box<S> {
    fn register(&self, id: PlayerId) -> Result<Registration, StoreError> {
        (**self).register(id)
    }

    fn account(&self, id: PlayerId) -> Result<Option<Account>, StoreError> {
        (**self).account(id)
    }
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS players (
    uid TEXT PRIMARY KEY,
    balance INTEGER NOT NULL DEFAULT 1000,
    experience INTEGER NOT NULL DEFAULT 0,
    level INTEGER NOT NULL DEFAULT 1,
    wins INTEGER NOT NULL DEFAULT 0
)";

/// Accounts in a SQLite `players` table keyed by the player's id.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(SCHEMA, [])?;
        Ok(Self { conn })
    }
}

impl PlayerStore for SqliteStore {
    fn register(&self, id: PlayerId) -> Result<Registration, StoreError> {
        let inserted = self.conn.execute(
            "INSERT INTO players (uid) VALUES (?1) ON CONFLICT(uid) DO NOTHING",
            params![id.0.to_string()],
        )?;
        Ok(if inserted == 0 {
            Registration::AlreadyRegistered
        } else {
            tracing::info!(player = %id, "player registered");
            Registration::Created
        })
    }

    fn account(&self, id: PlayerId) -> Result<Option<Account>, StoreError> {
        let account = self
            .conn
            .query_row(
                "SELECT balance, experience, level, wins FROM players WHERE uid = ?1",
                params![id.0.to_string()],
                |row| {
                    Ok(Account {
                        balance: row.get(0)?,
                        experience: row.get(1)?,
                        level: row.get(2)?,
                        wins: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(account)
    }
}

/// Accounts held in memory. Can be switched offline to exercise failure
/// handling.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: Mutex<HashMap<PlayerId, Account>>,
    offline: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, id: PlayerId, account: Account) -> Self {
        if let Ok(mut accounts) = self.accounts.lock() {
            accounts.insert(id, account);
        }
        self
    }

    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut flag) = self.offline.lock() {
            *flag = offline;
        }
    }

    fn accounts(&self) -> Result<std::sync::MutexGuard<'_, HashMap<PlayerId, Account>>, StoreError> {
        if *self.offline.lock().map_err(|_| StoreError::Poisoned)? {
            return Err(StoreError::Unavailable);
        }
        self.accounts.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl PlayerStore for MemoryStore {
    fn register(&self, id: PlayerId) -> Result<Registration, StoreError> {
        let mut accounts = self.accounts()?;
        if accounts.contains_key(&id) {
            return Ok(Registration::AlreadyRegistered);
        }
        accounts.insert(id, Account::default());
        Ok(Registration::Created)
    }

    fn account(&self, id: PlayerId) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts()?.get(&id).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_registration(store: &dyn PlayerStore) {
        let id = PlayerId(42);
        assert_eq!(store.account(id).unwrap(), None);
        assert_eq!(store.register(id).unwrap(), Registration::Created);
        assert_eq!(store.register(id).unwrap(), Registration::AlreadyRegistered);
        assert_eq!(store.account(id).unwrap(), Some(Account::default()));
    }

    #[test]
    fn sqlite_registration_is_idempotent() {
        check_registration(&SqliteStore::in_memory().unwrap());
    }

    #[test]
    fn memory_registration_is_idempotent() {
        check_registration(&MemoryStore::new());
    }

    #[test]
    fn sqlite_accounts_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.db");
        SqliteStore::open(&path).unwrap().register(PlayerId(7)).unwrap();

        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.register(PlayerId(7)).unwrap(), Registration::AlreadyRegistered);
        assert_eq!(store.account(PlayerId(7)).unwrap().unwrap().balance, STARTING_BALANCE);
    }

    #[test]
    fn offline_memory_store_fails_every_call() {
        let store = MemoryStore::new().with_account(PlayerId(1), Account::default());
        store.set_offline(true);
        assert!(matches!(store.account(PlayerId(1)), Err(StoreError::Unavailable)));
        assert!(matches!(store.register(PlayerId(2)), Err(StoreError::Unavailable)));
        store.set_offline(false);
        assert!(store.account(PlayerId(1)).unwrap().is_some());
    }
}
