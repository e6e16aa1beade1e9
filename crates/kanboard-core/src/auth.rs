//! Credential check and token issuance
//!
//! `login` confirms a username/password pair against the accounts collection
//! and hands back a fresh random token. The token is not stored anywhere and
//! nothing in the service checks it later; it is an acknowledgement only.

use tracing::info;

use crate::error::{KanboardError, Result};
use crate::models::{Account, Token};
use crate::store::Store;

/// Username of the account created on first start
pub const SEED_USERNAME: &str = "sid";

/// Placeholder password of the seeded account
pub const SEED_PASSWORD: &str = "123";

/// Login and account seeding
pub struct AuthManager<'a> {
    store: &'a mut Store,
}

impl<'a> AuthManager<'a> {
    pub fn new(store: &'a mut Store) -> Self {
        Self { store }
    }

    /// Check credentials and issue a token.
    ///
    /// A wrong username and a wrong password fail the same way.
    pub fn login(&self, username: &str, password: &str) -> Result<Token> {
        if username.is_empty() || password.is_empty() {
            return Err(KanboardError::invalid_argument(
                "No username or password in request",
            ));
        }

        if !self
            .store
            .any(|account: &Account| account.matches(username, password))
        {
            return Err(KanboardError::AuthenticationFailed);
        }

        Ok(Token::issue(username))
    }

    /// Insert the default account unless one with its username exists.
    ///
    /// Returns `true` when an account was inserted. Safe to run on every
    /// start.
    pub fn seed_default_account(&mut self) -> Result<bool> {
        if self
            .store
            .any(|account: &Account| account.username == SEED_USERNAME)
        {
            return Ok(false);
        }

        self.store
            .append(Account::new(SEED_USERNAME, SEED_PASSWORD))?;
        info!("Seeded default account '{}'", SEED_USERNAME);
        Ok(true)
    }
}
