//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Stock locations, shipping methods and zones are entities: two records with
/// the same id are the same record even if their attributes differ.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
