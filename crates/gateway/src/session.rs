//! Injectable session storage.
//!
//! Credentials are persisted in two independent key-value scopes, one
//! durable and one session-scoped, under fixed keys. Either scope can be
//! cleared without affecting the other; reads consult the durable scope
//! first. Logout clears both. There is no TTL.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::models::{Session, UserProfile, keys};

/// A single key-value credential scope.
pub trait SessionScope: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;
    /// Write a value, replacing any existing one.
    fn set(&self, key: &str, value: &str);
    /// Remove a value if present.
    fn clear(&self, key: &str);
}

/// In-memory scope backed by a `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct MemoryScope {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionScope for MemoryScope {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn clear(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Dual-scope credential store with dual-write and either-read semantics.
#[derive(Clone)]
pub struct SessionStore {
    durable: Arc<dyn SessionScope>,
    scoped: Arc<dyn SessionScope>,
}

impl SessionStore {
    /// Compose a store from a durable and a session-scoped scope.
    #[must_use]
    pub fn new(durable: Arc<dyn SessionScope>, scoped: Arc<dyn SessionScope>) -> Self {
        Self { durable, scoped }
    }

    /// A store backed by two independent in-memory scopes.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryScope::new()), Arc::new(MemoryScope::new()))
    }

    /// Persist a session to both scopes.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be serialized.
    pub fn store_session(&self, session: &Session) -> Result<(), serde_json::Error> {
        let profile = serde_json::to_string(&session.user)?;
        for scope in [&self.durable, &self.scoped] {
            scope.set(keys::TOKEN, &session.token);
            scope.set(keys::USER, &profile);
        }
        Ok(())
    }

    /// Read the stored token, durable scope first.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.durable
            .get(keys::TOKEN)
            .or_else(|| self.scoped.get(keys::TOKEN))
    }

    /// Read the stored profile, durable scope first.
    ///
    /// A profile that fails to deserialize reads as absent.
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        let raw = self
            .durable
            .get(keys::USER)
            .or_else(|| self.scoped.get(keys::USER))?;
        serde_json::from_str(&raw).ok()
    }

    /// Clear credentials from both scopes.
    pub fn clear_all(&self) {
        for scope in [&self.durable, &self.scoped] {
            scope.clear(keys::TOKEN);
            scope.clear(keys::USER);
        }
    }

    /// The durable scope.
    #[must_use]
    pub fn durable(&self) -> &dyn SessionScope {
        self.durable.as_ref()
    }

    /// The session-scoped scope.
    #[must_use]
    pub fn scoped(&self) -> &dyn SessionScope {
        self.scoped.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            token: "tok-0123456789abcdef".to_string(),
            user: UserProfile {
                id: "u1".to_string(),
                name: "Pat Reader".to_string(),
                email: "pat@example.com".to_string(),
            },
        }
    }

    #[test]
    fn test_dual_write_visible_via_either_scope() {
        let store = SessionStore::in_memory();
        store.store_session(&session()).unwrap();

        assert_eq!(
            store.durable().get(keys::TOKEN).as_deref(),
            Some("tok-0123456789abcdef")
        );
        assert_eq!(
            store.scoped().get(keys::TOKEN).as_deref(),
            Some("tok-0123456789abcdef")
        );
    }

    #[test]
    fn test_clearing_one_scope_leaves_the_other_readable() {
        let store = SessionStore::in_memory();
        store.store_session(&session()).unwrap();

        store.durable().clear(keys::TOKEN);
        store.durable().clear(keys::USER);

        assert_eq!(store.token().as_deref(), Some("tok-0123456789abcdef"));
        assert_eq!(store.user().unwrap().email, "pat@example.com");
    }

    #[test]
    fn test_clear_all_empties_both_scopes() {
        let store = SessionStore::in_memory();
        store.store_session(&session()).unwrap();

        store.clear_all();

        assert!(store.token().is_none());
        assert!(store.user().is_none());
        assert!(store.durable().get(keys::TOKEN).is_none());
        assert!(store.scoped().get(keys::TOKEN).is_none());
    }

    #[test]
    fn test_profile_roundtrip() {
        let store = SessionStore::in_memory();
        store.store_session(&session()).unwrap();

        let user = store.user().unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.name, "Pat Reader");
    }

    #[test]
    fn test_corrupt_profile_reads_as_absent() {
        let store = SessionStore::in_memory();
        store.durable().set(keys::USER, "{not json");
        assert!(store.user().is_none());
    }

    #[test]
    fn test_durable_scope_read_first() {
        let store = SessionStore::in_memory();
        store.durable().set(keys::TOKEN, "durable-token");
        store.scoped().set(keys::TOKEN, "scoped-token");
        assert_eq!(store.token().as_deref(), Some("durable-token"));
    }
}
