//! `shipforge-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod address;
pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod measure;
pub mod money;
pub mod value_object;

pub use address::Address;
pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{
    AggregateId, LineItemId, OrderId, ShipmentId, ShippingCategoryId, ShippingMethodId,
    StockLocationId, VariantId, ZoneId,
};
pub use measure::Weight;
pub use money::Money;
pub use value_object::ValueObject;
