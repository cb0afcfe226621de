//! How many units of a variant can be supplied.

use shipforge_core::{StockLocationId, VariantId};

use crate::snapshot::StockSnapshot;

/// On-hand total for a variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OnHand {
    /// The variant is not inventory-tracked.
    Unlimited,
    Count(i64),
}

impl OnHand {
    pub fn covers(self, required: u32) -> bool {
        match self {
            OnHand::Unlimited => true,
            OnHand::Count(n) => n >= i64::from(required),
        }
    }
}

/// Answers "how many units of variant V are available (at location L)".
///
/// Only active locations count. Unknown variants are treated as tracked with
/// nothing on hand.
#[derive(Debug, Clone, Copy)]
pub struct Quantifier<'a> {
    snapshot: &'a StockSnapshot,
    variant_id: VariantId,
    location_id: Option<StockLocationId>,
}

impl<'a> Quantifier<'a> {
    pub fn new(snapshot: &'a StockSnapshot, variant_id: VariantId) -> Self {
        Self {
            snapshot,
            variant_id,
            location_id: None,
        }
    }

    /// Restrict the quantifier to a single location.
    pub fn at(mut self, location_id: StockLocationId) -> Self {
        self.location_id = Some(location_id);
        self
    }

    fn tracked(&self) -> bool {
        self.snapshot
            .variant(self.variant_id)
            .is_none_or(|v| v.track_inventory)
    }

    fn levels(&self) -> impl Iterator<Item = crate::snapshot::StockLevel> + '_ {
        self.snapshot
            .stocking_locations(self.variant_id)
            .into_iter()
            .filter(move |(loc, _)| self.location_id.is_none_or(|id| id == loc.id))
            .map(|(_, level)| level)
    }

    /// Sum of positive on-hand counts.
    pub fn total_on_hand(&self) -> OnHand {
        if !self.tracked() {
            return OnHand::Unlimited;
        }
        OnHand::Count(
            self.levels()
                .map(|l| l.available_on_hand())
                .fold(0i64, i64::saturating_add),
        )
    }

    pub fn is_backorderable(&self) -> bool {
        self.levels().any(|l| l.backorderable)
    }

    pub fn can_supply(&self, required: u32) -> bool {
        self.is_backorderable() || self.total_on_hand().covers(required)
    }
}
