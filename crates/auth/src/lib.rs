//! `campus-auth`: client-side session and route authorization.
//!
//! The bearer credential is opaque to the client except for its payload
//! segment, which is decoded into claims on every access. Nothing here talks to
//! the network: credentials arrive from the login flow already issued.

pub mod authorize;
pub mod claims;
pub mod principal;
pub mod roles;
pub mod routes;
pub mod session;
pub mod store;

pub use authorize::{authorize, AccessGuard, AuthzError, Navigator, RecordingNavigator};
pub use claims::{decode, ClaimBag};
pub use principal::Principal;
pub use roles::{Role, UnknownRole};
pub use routes::{Route, ENTRY_POINT};
pub use session::Session;
pub use store::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, StoreError, CREDENTIAL_KEY,
};
