//INFO: Token store - the single persisted bearer token
//NOTE: No expiry tracking and no validation of the token's shape

use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

use crate::crypto::TokenCipher;
use crate::database::queries::{get_item, remove_item, set_item};
use crate::database::Database;

//INFO: Well-known storage key for the Google access token
pub const ACCESS_TOKEN_KEY: &str = "google_access_token";

//INFO: Whole-value store for one token
//NOTE: Every write is a total overwrite, so there are no partial updates to race on
pub trait TokenStore {
    fn write(&self, token: &str) -> Result<()>;
    fn read(&self) -> Result<Option<String>>;
    //NOTE: Must succeed on an already-empty store
    fn clear(&self) -> Result<()>;
}

impl<T: TokenStore + ?Sized> TokenStore for &T {
    fn write(&self, token: &str) -> Result<()> {
        (**self).write(token)
    }

    fn read(&self) -> Result<Option<String>> {
        (**self).read()
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

//INFO: Durable store backed by the local_storage table, encrypted at rest
pub struct DatabaseTokenStore {
    database: Arc<Database>,
    cipher: TokenCipher,
}

impl DatabaseTokenStore {
    pub fn new(database: Arc<Database>, cipher: TokenCipher) -> Self {
        Self { database, cipher }
    }
}

impl TokenStore for DatabaseTokenStore {
    fn write(&self, token: &str) -> Result<()> {
        let encrypted = self.cipher.encrypt(token)?;
        let connection = self.database.connection.lock();
        set_item(&connection, ACCESS_TOKEN_KEY, &encrypted)
    }

    //NOTE: A value the current key can't decrypt is dropped, so the store reads as empty
    fn read(&self) -> Result<Option<String>> {
        let connection = self.database.connection.lock();
        let Some(encrypted) = get_item(&connection, ACCESS_TOKEN_KEY)? else {
            return Ok(None);
        };

        match self.cipher.decrypt(&encrypted) {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                warn!("Discarding unreadable stored token: {:#}", e);
                remove_item(&connection, ACCESS_TOKEN_KEY)?;
                Ok(None)
            }
        }
    }

    fn clear(&self) -> Result<()> {
        let connection = self.database.connection.lock();
        remove_item(&connection, ACCESS_TOKEN_KEY)
    }
}


#[cfg(test)]
mod tests {
    use super::testing::MemoryTokenStore;
    use super::*;

    fn database_store() -> (tempfile::TempDir, DatabaseTokenStore) {
        let directory = tempfile::tempdir().unwrap();
        let database = Arc::new(Database::open(directory.path()).unwrap());
        let cipher = TokenCipher::load_or_create(&directory.path().join(".key")).unwrap();
        (directory, DatabaseTokenStore::new(database, cipher))
    }

    fn exercise(store: &dyn TokenStore) {
        assert_eq!(store.read().unwrap(), None);

        store.write("abc123").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("abc123"));

        store.write("").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some(""));

        store.write("replacement").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("replacement"));

        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);

        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_memory_store_lifecycle() {
        exercise(&MemoryTokenStore::new());
    }

    #[test]
    fn test_database_store_lifecycle() {
        let (_directory, store) = database_store();
        exercise(&store);
    }

    #[test]
    fn test_database_store_encrypts_at_rest() {
        let (_directory, store) = database_store();
        store.write("ya29.plain").unwrap();

        let raw = {
            let connection = store.database.connection.lock();
            get_item(&connection, ACCESS_TOKEN_KEY).unwrap().unwrap()
        };
        assert!(!raw.contains("ya29.plain"));
    }

    #[test]
    fn test_undecryptable_token_reads_as_empty() {
        let directory = tempfile::tempdir().unwrap();
        let database = Arc::new(Database::open(directory.path()).unwrap());

        DatabaseTokenStore::new(database.clone(), TokenCipher::from_key([1u8; 32]))
            .write("old-key-token")
            .unwrap();

        let store = DatabaseTokenStore::new(database, TokenCipher::from_key([2u8; 32]));
        assert_eq!(store.read().unwrap(), None);

        let remaining = {
            let connection = store.database.connection.lock();
            get_item(&connection, ACCESS_TOKEN_KEY).unwrap()
        };
        assert_eq!(remaining, None);
        store.clear().unwrap();
    }

    #[test]
    fn test_database_store_survives_reopen() {
        let directory = tempfile::tempdir().unwrap();
        let key_path = directory.path().join(".key");
        {
            let database = Arc::new(Database::open(directory.path()).unwrap());
            let store =
                DatabaseTokenStore::new(database, TokenCipher::load_or_create(&key_path).unwrap());
            store.write("durable").unwrap();
        }

        let database = Arc::new(Database::open(directory.path()).unwrap());
        let store =
            DatabaseTokenStore::new(database, TokenCipher::load_or_create(&key_path).unwrap());
        assert_eq!(store.read().unwrap().as_deref(), Some("durable"));
    }

    #[test]
    fn test_clear_from_any_prior_state() {
        for prior in [None, Some("a"), Some("b")] {
            let store = MemoryTokenStore::new();
            if let Some(token) = prior {
                store.write(token).unwrap();
            }
            store.clear().unwrap();
            assert_eq!(store.read().unwrap(), None);
        }
    }
}
