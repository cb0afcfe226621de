use serde::{Deserialize, Serialize};

use shipforge_core::{DomainError, DomainResult, LineItemId, ShipmentId, VariantId};

/// Lifecycle of a single inventory unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryUnitState {
    OnHand,
    Backordered,
    Shipped,
    Returned,
}

/// One physical unit of a variant allocated to an order line.
///
/// Units are identified by their line item and their ordinal within it, which
/// keeps repeated allocation runs over the same order comparable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryUnit {
    pub variant_id: VariantId,
    pub line_item_id: LineItemId,
    pub ordinal: u32,
    pub state: InventoryUnitState,
    #[serde(default)]
    pub shipment_id: Option<ShipmentId>,
}

impl InventoryUnit {
    pub fn new(
        variant_id: VariantId,
        line_item_id: LineItemId,
        ordinal: u32,
        state: InventoryUnitState,
    ) -> Self {
        Self {
            variant_id,
            line_item_id,
            ordinal,
            state,
            shipment_id: None,
        }
    }

    pub fn is_backordered(&self) -> bool {
        self.state == InventoryUnitState::Backordered
    }

    pub fn is_on_hand(&self) -> bool {
        self.state == InventoryUnitState::OnHand
    }

    /// Stock arrived for a backordered unit.
    pub fn fill_backorder(&mut self) -> DomainResult<()> {
        self.transition(InventoryUnitState::Backordered, InventoryUnitState::OnHand)
    }

    pub fn ship(&mut self) -> DomainResult<()> {
        self.transition(InventoryUnitState::OnHand, InventoryUnitState::Shipped)
    }

    pub fn mark_returned(&mut self) -> DomainResult<()> {
        self.transition(InventoryUnitState::Shipped, InventoryUnitState::Returned)
    }

    fn transition(&mut self, from: InventoryUnitState, to: InventoryUnitState) -> DomainResult<()> {
        if self.state != from {
            return Err(DomainError::invariant(format!(
                "inventory unit cannot move from {:?} to {:?}",
                self.state, to
            )));
        }
        self.state = to;
        Ok(())
    }
}
