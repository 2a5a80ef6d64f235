//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Every record the portal lists, edits, or deletes is addressed by its id on
/// the wire (`PUT /{Resource}/{id}`, `DELETE /{Resource}/{id}`).
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy
        + Eq
        + core::hash::Hash
        + core::fmt::Debug
        + core::fmt::Display
        + Send
        + Sync
        + 'static;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
