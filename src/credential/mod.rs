use log::{info, warn};
use serde::{Deserialize, Serialize};
use crate::common::{Error, Result};
use crate::store::{get_json, set_json, KeyValueStore, LOGGED_IN_KEY, USER_KEY};

/// The one account this tracker knows about. Signing up again replaces it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub(crate) struct User {
    pub(crate) username: String,
    pub(crate) email: String,
    /// Stored as typed, see `password_matches`
    pub(crate) password: String,
}

/// Overwrite the stored user record. Never fails on an existing account.
pub(crate) fn signup<S: KeyValueStore>(store: &mut S, username: &str, email: &str, password: &str) -> Result<User> {
    if let Some(existing) = current_user(store)? {
        warn!("Replacing existing account '{}'", existing.username);
    }

    let user = User {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    };
    set_json(store, USER_KEY, &user)?;
    info!("Signed up '{}'", user.username);
    Ok(user)
}

/// Set the session flag if email and password match the stored user. State is untouched on failure.
pub(crate) fn login<S: KeyValueStore>(store: &mut S, email: &str, password: &str) -> Result<User> {
    match current_user(store)? {
        Some(user) if user.email == email && password_matches(&user.password, password) => {
            store.set_item(LOGGED_IN_KEY, "true")?;
            info!("'{}' logged in", user.username);
            Ok(user)
        }
        _ => {
            warn!("Failed login attempt for '{email}'");
            Err(Error::InvalidCredentials)
        }
    }
}

pub(crate) fn logout<S: KeyValueStore>(store: &mut S) -> Result<()> {
    store.set_item(LOGGED_IN_KEY, "false")?;
    info!("Logged out");
    Ok(())
}

pub(crate) fn is_logged_in<S: KeyValueStore>(store: &S) -> bool {
    store.get_item(LOGGED_IN_KEY).as_deref() == Some("true")
}

pub(crate) fn current_user<S: KeyValueStore>(store: &S) -> Result<Option<User>> {
    get_json(store, USER_KEY)
}

/// Entry guard for everything behind the dashboard. Needs both the session flag and a user record.
pub(crate) fn require_session<S: KeyValueStore>(store: &S) -> Result<User> {
    if !is_logged_in(store) {
        return Err(Error::NotLoggedIn);
    }

    current_user(store)?.ok_or(Error::NotLoggedIn)
}

/// NOT FOR PRODUCTION: plaintext comparison against a plaintext stored password.
/// There is no hashing, salting or constant-time comparison here.
fn password_matches(stored: &str, supplied: &str) -> bool {
    stored == supplied
}
