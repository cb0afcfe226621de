//! Stock allocation: turn an order into packages, split them, and price them.
//!
//! The pipeline is
//! `Allocator` (which location supplies which unit) →
//! package building per location →
//! `SplitterChain` →
//! `Estimator` (shipping rates per package).
//! `Coordinator` drives it; `Shipment` is what a chosen package becomes.

pub mod allocator;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod estimator;
pub mod order;
pub mod package;
pub mod prioritizer;
pub mod shipment;
pub mod splitter;

pub use allocator::{Allocator, LineAllocation};
pub use config::{AllocationConfig, ConfigError};
pub use coordinator::{Allocation, Coordinator};
pub use error::{AllocationError, Shortfall};
pub use estimator::Estimator;
pub use order::{LineItem, MAX_LINE_QUANTITY, OrderRequest};
pub use package::{ContentItem, Package};
pub use prioritizer::{Prioritizer, RankedLocation, SupplyTier};
pub use shipment::{Shipment, ShipmentState};
pub use splitter::{
    BackorderedSplitter, ShippingCategorySplitter, Splitter, SplitterChain, WeightSplitter,
};
