use std::io;
use thiserror::Error;
use crate::ledger::Category;

/// Simplifies the return signature for everything that touches the store
pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the user. The `Display` text is what gets shown in place of an alert box.
#[derive(Debug, Error)]
pub(crate) enum Error {
    /// Empty name or non-numeric amount on transaction entry
    #[error("Enter valid {0}!")]
    InvalidEntry(Category),

    #[error("Invalid credentials!")]
    InvalidCredentials,

    /// Session flag is not set or there is no user record
    #[error("Please log in first.")]
    NotLoggedIn,

    #[error("No user record found. Please sign up first.")]
    NoUser,

    /// A stored value could not be decoded as the JSON we expect under its key
    #[error("Stored value under '{key}' is malformed: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store file {path} is malformed: {source}")]
    CorruptStore {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("{0}")]
    Parse(String),
}
