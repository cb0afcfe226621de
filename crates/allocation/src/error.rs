use serde::{Deserialize, Serialize};
use thiserror::Error;

use shipforge_core::{DomainError, LineItemId, ShippingMethodId, VariantId};

/// Quantity of a line item no location can supply (on hand or by backorder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub line_item_id: LineItemId,
    pub variant_id: VariantId,
    pub requested: u32,
    pub unfulfilled: u32,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("invalid order: {0}")]
    InvalidOrder(DomainError),

    #[error("insufficient stock for {} line item(s)", .shortfalls.len())]
    InsufficientStock { shortfalls: Vec<Shortfall> },

    #[error("shipping method {0} is not offered for this shipment")]
    UnknownShippingMethod(ShippingMethodId),

    #[error("invalid shipment state: {0}")]
    InvalidState(String),

    #[error("stock ledger rejected the change: {0}")]
    Stock(DomainError),
}
