pub(crate) mod error;
pub(crate) mod file_token_store;
pub(crate) mod memory_token_store;
pub(crate) mod persisted_session;

pub use error::{Result as StorageResult, StorageError};
pub use file_token_store::FileTokenStore;
pub use memory_token_store::MemoryTokenStore;
pub use persisted_session::PersistedSession;

/// Independent entries kept in durable client storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Token,
    /// Last-known display name
    Username,
    /// Last-known user id
    UserId,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [StorageKey::Token, StorageKey::Username, StorageKey::UserId];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::Username => "username",
            Self::UserId => "userId",
        }
    }
}

/// Durable string storage for the session token and its identity hints.
///
/// Access is synchronous and safe to repeat. Each entry is read and written
/// on its own; `write` and `clear` are conveniences over the three keys.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: StorageKey) -> StorageResult<Option<String>>;

    fn set(&self, key: StorageKey, value: &str) -> StorageResult<()>;

    /// Removing a missing entry is not an error.
    fn remove(&self, key: StorageKey) -> StorageResult<()>;

    fn read_token(&self) -> StorageResult<Option<String>> {
        self.get(StorageKey::Token)
    }

    fn read_username(&self) -> StorageResult<Option<String>> {
        self.get(StorageKey::Username)
    }

    fn read_user_id(&self) -> StorageResult<Option<String>> {
        self.get(StorageKey::UserId)
    }

    fn write(&self, session: &PersistedSession) -> StorageResult<()> {
        self.set(StorageKey::Token, &session.token)?;
        self.set(StorageKey::Username, &session.username)?;
        self.set(StorageKey::UserId, &session.user_id)
    }

    /// Erase every entry, attempting all three even if one fails.
    fn clear(&self) -> StorageResult<()> {
        let mut first_error = None;
        for key in StorageKey::ALL {
            if let Err(e) = self.remove(key) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
