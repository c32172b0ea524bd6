//! Static user directory checked by the login endpoint.
//!
//! # Key invariants
//! - Passwords are only ever held as bcrypt hashes.
//! - Loaded once at startup and read-only afterwards.
//! - Unknown usernames still cost one bcrypt verification, so response time
//!   does not reveal which accounts exist.
use crate::config::UserEntry;
use std::collections::HashMap;

/// Accounts installed when no users are configured and demo users are enabled.
pub const DEMO_USERS: &[(&str, &str)] = &[("student", "student123"), ("assistant", "assistant123")];

const DUMMY_PASSWORD: &str = "blueprints-dummy-password";

#[derive(Clone)]
pub struct UserDirectory {
    users: HashMap<String, String>,
    /// Hashed at the cost the real entries use; absent for an empty directory.
    dummy_hash: Option<String>,
}

impl std::fmt::Debug for UserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.users.keys().collect();
        names.sort();
        f.debug_struct("UserDirectory").field("users", &names).finish()
    }
}

impl UserDirectory {
    /// Build a directory from pre-hashed entries.
    pub fn from_entries(entries: &[UserEntry]) -> Result<Self, bcrypt::BcryptError> {
        let users = entries
            .iter()
            .map(|entry| (entry.username.clone(), entry.password_hash.clone()))
            .collect();
        let dummy_hash = match entries.first() {
            Some(entry) => {
                let cost = hash_cost(&entry.password_hash).unwrap_or(bcrypt::DEFAULT_COST);
                Some(bcrypt::hash(DUMMY_PASSWORD, cost)?)
            }
            None => None,
        };
        Ok(Self { users, dummy_hash })
    }

    /// Hash plaintext credentials at `cost`. Intended for demo accounts and tests.
    pub fn from_plaintext(
        credentials: &[(&str, &str)],
        cost: u32,
    ) -> Result<Self, bcrypt::BcryptError> {
        let mut users = HashMap::with_capacity(credentials.len());
        for (username, password) in credentials {
            users.insert((*username).to_string(), bcrypt::hash(*password, cost)?);
        }
        let dummy_hash = if users.is_empty() {
            None
        } else {
            Some(bcrypt::hash(DUMMY_PASSWORD, cost)?)
        };
        Ok(Self { users, dummy_hash })
    }

    pub fn demo() -> Result<Self, bcrypt::BcryptError> {
        Self::from_plaintext(DEMO_USERS, bcrypt::DEFAULT_COST)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Check a username/password pair. Blocking: bcrypt is CPU-bound.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        match self.users.get(username) {
            Some(hash) => match bcrypt::verify(password, hash) {
                Ok(valid) => valid,
                Err(err) => {
                    tracing::warn!(username, error = %err, "stored password hash is unusable");
                    false
                }
            },
            None => {
                if let Some(dummy) = &self.dummy_hash {
                    let _ = bcrypt::verify(password, dummy);
                }
                false
            }
        }
    }
}

/// Cost factor encoded in a modular-crypt bcrypt hash (`$2b$12$...`).
fn hash_cost(hash: &str) -> Option<u32> {
    hash.split('$').nth(2)?.parse().ok()
}
