use log::debug;

use crate::config::StoreConfig;
use crate::error::{AuthError, AuthResult, Result};
use crate::ids::IdAllocator;
use crate::record::{FixedStr, UserRecord};
use crate::storage::{self, LoadSummary};
use crate::table::FixedHashTable;

/// A credential table bound to its record file.
///
/// Opening loads the file, [`register`](Self::register) and
/// [`login`](Self::login) apply the account rules against the in-memory
/// table, and [`save`](Self::save) writes the whole table back.
pub struct UserStore {
    config: StoreConfig,
    table: FixedHashTable,
    ids: IdAllocator,
}

impl UserStore {
    pub fn open(config: StoreConfig) -> Result<Self> {
        let mut table = FixedHashTable::new();
        let mut ids = IdAllocator::new();
        let LoadSummary { inserted, .. } = storage::load_all(&mut table, &mut ids, &config.path)?;
        debug!("opened {} with {inserted} users", config.path.display());
        Ok(Self { config, table, ids })
    }

    /// Creates an account and returns its id.
    ///
    /// The id counter only moves forward when the insert succeeded.
    pub fn register<U, P>(&mut self, username: U, password: P) -> AuthResult<i32>
    where
        U: AsRef<[u8]>,
        P: AsRef<[u8]>,
    {
        let username = FixedStr::new(username);
        if self.table.contains(username.as_bytes()) {
            return Err(AuthError::UsernameTaken);
        }

        let password = FixedStr::new(password);
        let min = self.config.min_password_len;
        if password.len() < min {
            return Err(AuthError::PasswordTooShort { min });
        }

        let id = self.ids.current();
        self.table.insert(id, username.as_bytes(), password.as_bytes())?;
        self.ids.advance();
        debug!("registered {username} with id {id}");
        Ok(id)
    }

    /// Checks a username and password pair against the stored record.
    pub fn login<U, P>(&self, username: U, password: P) -> AuthResult<&UserRecord>
    where
        U: AsRef<[u8]>,
        P: AsRef<[u8]>,
    {
        let user = self.table.find(username).ok_or(AuthError::UserNotFound)?;
        if *user.password() != FixedStr::new(password) {
            return Err(AuthError::IncorrectPassword);
        }
        Ok(user)
    }

    /// Rewrites the record file with the current table.
    pub fn save(&self) -> Result<usize> {
        storage::save_all(&self.table, &self.config.path)
    }

    pub fn table(&self) -> &FixedHashTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut FixedHashTable {
        &mut self.table
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;
    use tempfile::tempdir;

    fn open_in(dir: &tempfile::TempDir) -> UserStore {
        UserStore::open(StoreConfig::new(dir.path().join("users.dat"))).unwrap()
    }

    #[test]
    fn test_register_and_login() {
        let dir = tempdir().unwrap();
        let mut store = open_in(&dir);

        assert_eq!(store.register("alice", "pass1").unwrap(), 1);
        assert_eq!(store.register("bob", "pass2").unwrap(), 2);
        assert_eq!(store.ids().current(), 3);

        let alice = store.login("alice", "pass1").unwrap();
        assert_eq!(alice.id(), 1);
        assert!(matches!(
            store.login("alice", "wrong"),
            Err(AuthError::IncorrectPassword)
        ));
        assert!(matches!(
            store.login("carol", "pass3"),
            Err(AuthError::UserNotFound)
        ));
    }

    #[test]
    fn test_register_rejects_taken_username() {
        let dir = tempdir().unwrap();
        let mut store = open_in(&dir);
        store.register("alice", "pass1").unwrap();

        assert!(matches!(
            store.register("alice", "other"),
            Err(AuthError::UsernameTaken)
        ));
        // an over-long name collides with its truncated form
        let long = "n".repeat(60);
        store.register(&long, "pass1").unwrap();
        assert!(matches!(
            store.register(&long[..49], "pass1"),
            Err(AuthError::UsernameTaken)
        ));
        assert_eq!(store.ids().current(), 3);
    }

    #[test]
    fn test_register_rejects_short_password() {
        let dir = tempdir().unwrap();
        let mut store = open_in(&dir);

        assert!(matches!(
            store.register("alice", "abc"),
            Err(AuthError::PasswordTooShort { min: 4 })
        ));
        assert!(store.table().is_empty());
        assert_eq!(store.ids().current(), 1);
        assert_eq!(store.register("alice", "abcd").unwrap(), 1);
    }

    #[test]
    fn test_failed_insert_keeps_id() {
        let dir = tempdir().unwrap();
        let mut store = open_in(&dir);

        store.table_mut().set_fail_inserts(true);
        assert!(matches!(
            store.register("alice", "pass1"),
            Err(AuthError::Table(TableError::InjectedFailure))
        ));
        assert_eq!(store.ids().current(), 1);

        store.table_mut().set_fail_inserts(false);
        assert_eq!(store.register("alice", "pass1").unwrap(), 1);
    }

    #[test]
    fn test_sessions_share_the_file() {
        let dir = tempdir().unwrap();
        {
            let mut store = open_in(&dir);
            store.register("alice", "pass1").unwrap();
            store.register("bob", "pass2").unwrap();
            assert_eq!(store.save().unwrap(), 2);
        }
        {
            let mut store = open_in(&dir);
            assert_eq!(store.login("bob", "pass2").unwrap().id(), 2);
            assert_eq!(store.register("carol", "pass3").unwrap(), 3);
            store.save().unwrap();
        }
        let store = open_in(&dir);
        assert_eq!(store.table().len(), 3);
        assert_eq!(store.ids().current(), 4);
    }

    #[test]
    fn test_custom_min_password_len() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("users.dat")).with_min_password_len(8);
        let mut store = UserStore::open(config).unwrap();
        assert!(matches!(
            store.register("alice", "pass1"),
            Err(AuthError::PasswordTooShort { min: 8 })
        ));
        assert!(store.register("alice", "longpass").is_ok());
        assert_eq!(store.config().min_password_len, 8);
    }
}
