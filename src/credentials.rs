//! Username/password checks for the login action.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::AuthError;
use crate::crypto::{Argon2Hasher, PasswordHasher};

/// Decides whether a username/password pair may log in.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// `Ok(false)` for unknown users and wrong passwords alike.
    async fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError>;
}

#[async_trait]
impl<T: CredentialVerifier + ?Sized> CredentialVerifier for Arc<T> {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        (**self).verify(username, password).await
    }
}

/// A fixed allow-list of users, stored as password hashes.
pub struct StaticCredentials<H: PasswordHasher = Argon2Hasher> {
    users: HashMap<String, String>,
    hasher: H,
}

impl<H: PasswordHasher> std::fmt::Debug for StaticCredentials<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut usernames: Vec<_> = self.users.keys().collect();
        usernames.sort();
        f.debug_struct("StaticCredentials")
            .field("users", &usernames)
            .finish_non_exhaustive()
    }
}

impl<H: PasswordHasher> StaticCredentials<H> {
    /// Hashes each plaintext password with `hasher`.
    pub fn new<I, U, P>(users: I, hasher: H) -> Result<Self, AuthError>
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: AsRef<str>,
    {
        let users = users
            .into_iter()
            .map(|(username, password)| Ok((username.into(), hasher.hash(password.as_ref())?)))
            .collect::<Result<HashMap<_, _>, AuthError>>()?;

        Ok(Self { users, hasher })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl StaticCredentials {
    /// The demo users: `admin/admin`, `user1/user1` and `user2/user2`.
    pub fn demo() -> Result<Self, AuthError> {
        Self::new(
            [("admin", "admin"), ("user1", "user1"), ("user2", "user2")],
            Argon2Hasher::default(),
        )
    }
}

#[async_trait]
impl<H: PasswordHasher> CredentialVerifier for StaticCredentials<H> {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        match self.users.get(username) {
            Some(hash) => self.hasher.verify(password, hash),
            None => Ok(false),
        }
    }
}
