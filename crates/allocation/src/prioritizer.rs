//! Ranks stock locations for a requested variant.

use shipforge_core::{StockLocationId, VariantId};
use shipforge_inventory::{OnHand, Quantifier, StockSnapshot};

/// How well a location can serve a request; lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SupplyTier {
    /// Everything requested is on hand.
    FullOnHand,
    /// Some units on hand.
    PartialOnHand,
    /// Nothing on hand, but backorders are accepted.
    BackorderOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedLocation {
    pub stock_location_id: StockLocationId,
    pub tier: SupplyTier,
    pub on_hand: OnHand,
    pub backorderable: bool,
}

/// Orders candidate locations, preferring sufficient on-hand stock over
/// partial stock over backorder; ties go to location priority.
#[derive(Debug, Clone, Copy)]
pub struct Prioritizer<'a> {
    snapshot: &'a StockSnapshot,
}

impl<'a> Prioritizer<'a> {
    pub fn new(snapshot: &'a StockSnapshot) -> Self {
        Self { snapshot }
    }

    /// Locations able to contribute to `required` units of `variant_id`.
    ///
    /// Locations with nothing on hand that refuse backorders are left out.
    pub fn rank(&self, variant_id: VariantId, required: u32) -> Vec<RankedLocation> {
        // Already in location priority order; the stable sort keeps it within a tier.
        let mut ranked: Vec<RankedLocation> = self
            .snapshot
            .stocking_locations(variant_id)
            .into_iter()
            .filter_map(|(location, _)| {
                let quantifier = Quantifier::new(self.snapshot, variant_id).at(location.id);
                let on_hand = quantifier.total_on_hand();
                let backorderable = quantifier.is_backorderable();
                let tier = match on_hand {
                    OnHand::Unlimited => SupplyTier::FullOnHand,
                    OnHand::Count(n) if n >= i64::from(required) && n > 0 => SupplyTier::FullOnHand,
                    OnHand::Count(n) if n > 0 => SupplyTier::PartialOnHand,
                    OnHand::Count(_) if backorderable => SupplyTier::BackorderOnly,
                    OnHand::Count(_) => return None,
                };
                Some(RankedLocation {
                    stock_location_id: location.id,
                    tier,
                    on_hand,
                    backorderable,
                })
            })
            .collect();
        ranked.sort_by_key(|r| r.tier);
        ranked
    }
}
