use std::io;
use thiserror::Error;

/// Errors that can occur when working with the credential table
#[derive(Error, Debug)]
pub enum TableError {
    /// IO errors when reading/writing the record file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Decoding errors when converting bytes back to a record
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Every slot is occupied, nothing can be relocated
    #[error("Table capacity exceeded")]
    TableFull,

    /// Insert refused by the fault switch
    #[error("Injected insert failure")]
    InjectedFailure,
}

pub type Result<T> = std::result::Result<T, TableError>;

/// Errors reported by the registration and login rules of [`crate::UserStore`]
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Username already exists")]
    UsernameTaken,

    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("User not found")]
    UserNotFound,

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error(transparent)]
    Table(#[from] TableError),
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;

impl From<String> for TableError {
    fn from(msg: String) -> Self {
        TableError::Decoding(msg)
    }
}
