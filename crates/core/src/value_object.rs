//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attributes: two
/// `Money { amount: 500, currency: "USD" }` values are interchangeable, while
/// two stock locations with equal names are still different locations.
///
/// To "modify" a value object, build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
