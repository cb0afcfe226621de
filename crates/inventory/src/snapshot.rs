//! In-memory snapshot of stock counts, read once at the start of an allocation run.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use shipforge_core::{DomainError, DomainResult, StockLocationId, VariantId};

use crate::location::StockLocation;
use crate::variant::Variant;

/// Stock level of one variant at one location.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub count_on_hand: i64,
    pub backorderable: bool,
}

impl StockLevel {
    pub fn available_on_hand(&self) -> i64 {
        self.count_on_hand.max(0)
    }
}

/// Point-in-time view of locations, variants and stock levels.
///
/// Allocation works on a clone of the snapshot and consumes it as units are
/// assigned, so two lines for the same variant never book the same unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockSnapshot {
    locations: BTreeMap<StockLocationId, StockLocation>,
    variants: BTreeMap<VariantId, Variant>,
    levels: BTreeMap<(StockLocationId, VariantId), StockLevel>,
}

impl StockSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_location(&mut self, location: StockLocation) {
        self.locations.insert(location.id, location);
    }

    pub fn add_variant(&mut self, variant: Variant) {
        self.variants.insert(variant.id, variant);
    }

    /// Record the stock level of `variant_id` at `location_id`.
    ///
    /// Both must already be known, and a negative count requires the item to
    /// be backorderable.
    pub fn set_level(
        &mut self,
        location_id: StockLocationId,
        variant_id: VariantId,
        level: StockLevel,
    ) -> DomainResult<()> {
        if !self.locations.contains_key(&location_id) {
            return Err(DomainError::not_found(format!("stock location {location_id}")));
        }
        if !self.variants.contains_key(&variant_id) {
            return Err(DomainError::not_found(format!("variant {variant_id}")));
        }
        if level.count_on_hand < 0 && !level.backorderable {
            return Err(DomainError::invariant(
                "stock cannot go negative unless backorderable",
            ));
        }
        self.levels.insert((location_id, variant_id), level);
        Ok(())
    }

    pub fn location(&self, id: StockLocationId) -> Option<&StockLocation> {
        self.locations.get(&id)
    }

    pub fn variant(&self, id: VariantId) -> Option<&Variant> {
        self.variants.get(&id)
    }

    pub fn level(&self, location_id: StockLocationId, variant_id: VariantId) -> Option<StockLevel> {
        self.levels.get(&(location_id, variant_id)).copied()
    }

    /// Active locations in priority order.
    pub fn active_locations(&self) -> Vec<&StockLocation> {
        let mut active: Vec<&StockLocation> =
            self.locations.values().filter(|l| l.active).collect();
        active.sort_by(|a, b| a.priority_key().cmp(&b.priority_key()));
        active
    }

    /// Active locations that carry a stock item for `variant_id`, in priority order.
    pub fn stocking_locations(&self, variant_id: VariantId) -> Vec<(&StockLocation, StockLevel)> {
        self.active_locations()
            .into_iter()
            .filter_map(|loc| self.level(loc.id, variant_id).map(|level| (loc, level)))
            .collect()
    }

    /// Consume up to `quantity` on-hand units; returns how many were taken.
    pub fn take_on_hand(
        &mut self,
        location_id: StockLocationId,
        variant_id: VariantId,
        quantity: u32,
    ) -> u32 {
        let Some(level) = self.levels.get_mut(&(location_id, variant_id)) else {
            return 0;
        };
        let available = u32::try_from(level.available_on_hand()).unwrap_or(u32::MAX);
        let taken = available.min(quantity);
        level.count_on_hand -= i64::from(taken);
        taken
    }

    /// Book `quantity` units as backordered, driving the count below zero.
    pub fn take_backordered(
        &mut self,
        location_id: StockLocationId,
        variant_id: VariantId,
        quantity: u32,
    ) -> DomainResult<()> {
        let level = self
            .levels
            .get_mut(&(location_id, variant_id))
            .ok_or_else(|| DomainError::not_found(format!("stock item at {location_id}")))?;
        if !level.backorderable {
            return Err(DomainError::invariant(
                "stock cannot go negative unless backorderable",
            ));
        }
        level.count_on_hand = level
            .count_on_hand
            .checked_sub(i64::from(quantity))
            .ok_or_else(|| DomainError::invariant("count_on_hand overflow"))?;
        Ok(())
    }
}

/// Flat, serializable form of a snapshot (what a persistence layer hands over).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecords {
    #[serde(default)]
    pub locations: Vec<StockLocation>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub stock_items: Vec<StockItemRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItemRecord {
    pub stock_location_id: StockLocationId,
    pub variant_id: VariantId,
    pub count_on_hand: i64,
    #[serde(default)]
    pub backorderable: bool,
}

impl SnapshotRecords {
    pub fn into_snapshot(self) -> DomainResult<StockSnapshot> {
        let mut snapshot = StockSnapshot::new();
        for location in self.locations {
            snapshot.add_location(location);
        }
        for variant in self.variants {
            snapshot.add_variant(variant);
        }
        for item in self.stock_items {
            snapshot.set_level(
                item.stock_location_id,
                item.variant_id,
                StockLevel {
                    count_on_hand: item.count_on_hand,
                    backorderable: item.backorderable,
                },
            )?;
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shipforge_core::{ShippingCategoryId, Weight};

    fn loc(n: u128, name: &str, position: i32) -> StockLocation {
        StockLocation::new(StockLocationId::from_u128(n), name).with_position(position)
    }

    fn variant(n: u128) -> Variant {
        Variant::new(
            VariantId::from_u128(n),
            format!("SKU-{n}"),
            Weight::from_grams(100),
            ShippingCategoryId::from_u128(1),
        )
    }

    fn level(count_on_hand: i64, backorderable: bool) -> StockLevel {
        StockLevel {
            count_on_hand,
            backorderable,
        }
    }

    #[test]
    fn active_locations_follow_position_then_name() {
        let mut snap = StockSnapshot::new();
        snap.add_location(loc(1, "west", 2));
        snap.add_location(loc(2, "east", 1));
        snap.add_location(loc(3, "central", 1));
        snap.add_location(loc(4, "closed", 0).deactivated());

        let names: Vec<&str> = snap.active_locations().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["central", "east", "west"]);
    }

    #[test]
    fn set_level_rejects_unknown_references_and_illegal_negative() {
        let mut snap = StockSnapshot::new();
        snap.add_location(loc(1, "main", 0));
        snap.add_variant(variant(10));

        assert!(matches!(
            snap.set_level(StockLocationId::from_u128(9), VariantId::from_u128(10), level(1, false)),
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            snap.set_level(StockLocationId::from_u128(1), VariantId::from_u128(10), level(-1, false)),
            Err(DomainError::InvariantViolation(_))
        ));
        assert!(snap
            .set_level(StockLocationId::from_u128(1), VariantId::from_u128(10), level(-1, true))
            .is_ok());
    }

    #[test]
    fn take_on_hand_never_takes_more_than_available() {
        let mut snap = StockSnapshot::new();
        snap.add_location(loc(1, "main", 0));
        snap.add_variant(variant(10));
        let (l, v) = (StockLocationId::from_u128(1), VariantId::from_u128(10));
        snap.set_level(l, v, level(2, true)).unwrap();

        assert_eq!(snap.take_on_hand(l, v, 5), 2);
        assert_eq!(snap.take_on_hand(l, v, 5), 0);
        snap.take_backordered(l, v, 3).unwrap();
        assert_eq!(snap.level(l, v).unwrap().count_on_hand, -3);
    }

    #[test]
    fn take_backordered_rejects_overflow() {
        let mut snap = StockSnapshot::new();
        snap.add_location(loc(1, "main", 0));
        snap.add_variant(variant(10));
        let (l, v) = (StockLocationId::from_u128(1), VariantId::from_u128(10));
        snap.set_level(l, v, level(i64::MIN, true)).unwrap();

        assert!(matches!(
            snap.take_backordered(l, v, 1),
            Err(DomainError::InvariantViolation(msg)) if msg.contains("overflow")
        ));
        assert_eq!(snap.level(l, v).unwrap().count_on_hand, i64::MIN);
    }

    #[test]
    fn records_deserialize_into_snapshot() {
        let json = serde_json::json!({
            "locations": [{ "id": StockLocationId::from_u128(1), "name": "main" }],
            "variants": [{
                "id": VariantId::from_u128(10),
                "sku": "TSHIRT",
                "weight": 250,
                "shipping_category_id": ShippingCategoryId::from_u128(1)
            }],
            "stock_items": [{
                "stock_location_id": StockLocationId::from_u128(1),
                "variant_id": VariantId::from_u128(10),
                "count_on_hand": 4
            }]
        });
        let records: SnapshotRecords = serde_json::from_value(json).unwrap();
        let snap = records.into_snapshot().unwrap();

        let location = snap.location(StockLocationId::from_u128(1)).unwrap();
        assert!(location.active);
        assert!(snap.variant(VariantId::from_u128(10)).unwrap().track_inventory);
        assert_eq!(
            snap.level(StockLocationId::from_u128(1), VariantId::from_u128(10)),
            Some(level(4, false))
        );
    }
}
