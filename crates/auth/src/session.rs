//! Read-through session over the credential store.

use std::sync::Arc;

use campus_core::{StudentId, TeacherId};

use crate::{ClaimBag, CredentialStore, MemoryCredentialStore, Principal, Role, StoreError};

/// Identity and lifecycle of the signed-in user.
///
/// Holds no identity of its own: every accessor re-reads the store and
/// re-decodes the credential. A logout performed through any handle (or
/// directly on the store) is visible to every other handle on its next call.
#[derive(Debug, Clone)]
pub struct Session {
    store: Arc<dyn CredentialStore>,
}

impl Session {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Session backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialStore::new()))
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// The stored credential, if non-empty.
    pub fn credential(&self) -> Option<String> {
        self.store.load().filter(|c| !c.is_empty())
    }

    fn claims(&self) -> Option<ClaimBag> {
        crate::claims::decode(self.credential().as_deref())
    }

    /// True when a credential is stored and its claims decode.
    pub fn is_authenticated(&self) -> bool {
        self.claims().is_some()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.claims()?.subject_id()
    }

    pub fn student_id(&self) -> Option<StudentId> {
        self.user_id().map(StudentId::new)
    }

    pub fn teacher_id(&self) -> Option<TeacherId> {
        self.user_id().map(TeacherId::new)
    }

    pub fn role(&self) -> Option<Role> {
        self.claims()?.role()
    }

    pub fn display_name(&self) -> Option<String> {
        self.claims()?.display_name()
    }

    /// All identity fields from a single decoding.
    pub fn principal(&self) -> Option<Principal> {
        self.claims().map(|claims| Principal::from_claims(&claims))
    }

    /// Persist a credential obtained from the login endpoint.
    pub fn login(&self, credential: &str) -> Result<(), StoreError> {
        self.store.save(credential)?;
        tracing::info!(role = ?self.role(), "session started");
        Ok(())
    }

    pub fn logout(&self) -> Result<(), StoreError> {
        self.store.clear()?;
        tracing::info!("session ended");
        Ok(())
    }
}
