//! Decides which location supplies each unit of a line item.

use serde::{Deserialize, Serialize};

use shipforge_core::{LineItemId, StockLocationId, VariantId};
use shipforge_inventory::{OnHand, StockSnapshot};

use crate::order::LineItem;
use crate::prioritizer::Prioritizer;

/// Where the units of one line item come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAllocation {
    pub line_item_id: LineItemId,
    pub variant_id: VariantId,
    pub requested: u32,
    /// On-hand units per location, in the order they were taken.
    pub on_hand: Vec<(StockLocationId, u32)>,
    /// Backordered units per location.
    pub backordered: Vec<(StockLocationId, u32)>,
    /// Units nobody can supply.
    pub unfulfilled: u32,
}

impl LineAllocation {
    fn new(line: &LineItem) -> Self {
        Self {
            line_item_id: line.id,
            variant_id: line.variant_id,
            requested: line.quantity,
            on_hand: Vec::new(),
            backordered: Vec::new(),
            unfulfilled: line.quantity,
        }
    }

    pub fn allocated(&self) -> u32 {
        self.requested - self.unfulfilled
    }

    pub fn is_complete(&self) -> bool {
        self.unfulfilled == 0
    }
}

/// Consumes a private copy of the snapshot, so successive lines for the same
/// variant see what earlier lines already took.
#[derive(Debug, Clone)]
pub struct Allocator {
    working: StockSnapshot,
}

impl Allocator {
    pub fn new(snapshot: &StockSnapshot) -> Self {
        Self {
            working: snapshot.clone(),
        }
    }

    /// Stock left after everything allocated so far.
    pub fn remaining(&self) -> &StockSnapshot {
        &self.working
    }

    pub fn allocate_line(&mut self, line: &LineItem) -> LineAllocation {
        let mut allocation = LineAllocation::new(line);
        let ranked = Prioritizer::new(&self.working).rank(line.variant_id, line.quantity);

        if let Some(first) = ranked.first().filter(|r| r.on_hand == OnHand::Unlimited) {
            allocation.on_hand.push((first.stock_location_id, line.quantity));
            allocation.unfulfilled = 0;
            return allocation;
        }

        for location in &ranked {
            if allocation.unfulfilled == 0 {
                break;
            }
            let taken = self.working.take_on_hand(
                location.stock_location_id,
                line.variant_id,
                allocation.unfulfilled,
            );
            if taken > 0 {
                allocation.on_hand.push((location.stock_location_id, taken));
                allocation.unfulfilled -= taken;
            }
        }

        if allocation.unfulfilled > 0 {
            if let Some(location) = ranked.iter().find(|r| r.backorderable) {
                let booked = self.working.take_backordered(
                    location.stock_location_id,
                    line.variant_id,
                    allocation.unfulfilled,
                );
                match booked {
                    Ok(()) => {
                        allocation
                            .backordered
                            .push((location.stock_location_id, allocation.unfulfilled));
                        allocation.unfulfilled = 0;
                    }
                    Err(err) => {
                        tracing::warn!(
                            line_item = %line.id,
                            location = %location.stock_location_id,
                            error = %err,
                            "backorder rejected"
                        );
                    }
                }
            }
        }

        allocation
    }
}
