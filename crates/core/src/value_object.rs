//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two amounts of
/// 7.00, or two recommendations with the same strategy, confidence and text,
/// are interchangeable. Entities (items, bids, claims) instead carry an id and
/// keep their identity across status changes.
///
/// To "modify" a value object, build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
