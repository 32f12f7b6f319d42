use std::path::{Path, PathBuf};

/// Record file used when no path is configured.
pub const DEFAULT_STORE_PATH: &str = "users.dat";

/// Shortest password accepted at registration.
pub const DEFAULT_MIN_PASSWORD_LEN: usize = 4;

/// Settings for a [`crate::UserStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub min_password_len: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_PATH),
            min_password_len: DEFAULT_MIN_PASSWORD_LEN,
        }
    }
}

impl StoreConfig {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::default().with_path(path)
    }

    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_min_password_len(mut self, min_password_len: usize) -> Self {
        self.min_password_len = min_password_len;
        self
    }
}
