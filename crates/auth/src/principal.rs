use serde::Serialize;

use crate::{ClaimBag, Role};

/// Identity derived from one decoding of the credential.
///
/// A snapshot: it is produced on demand and never stored, so it cannot go
/// stale behind the store's back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub user_id: Option<i64>,
    pub role: Option<Role>,
    pub display_name: Option<String>,
}

impl Principal {
    pub fn from_claims(claims: &ClaimBag) -> Self {
        Self {
            user_id: claims.subject_id(),
            role: claims.role(),
            display_name: claims.display_name(),
        }
    }
}
