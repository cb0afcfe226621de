use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use shipforge_core::{DomainResult, Money, ShippingCategoryId, StockLocationId, Weight};
use shipforge_inventory::{InventoryUnit, InventoryUnitState, Variant};
use shipforge_shipping::{PackageMetrics, ShippingRate};

/// One inventory unit inside a package, with what splitting and pricing need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub inventory_unit: InventoryUnit,
    pub variant: Variant,
    /// Unit price of the owning line item.
    pub price: Money,
}

impl ContentItem {
    pub fn state(&self) -> InventoryUnitState {
        self.inventory_unit.state
    }

    pub fn weight(&self) -> Weight {
        self.variant.weight
    }

    pub fn shipping_category_id(&self) -> ShippingCategoryId {
        self.variant.shipping_category_id
    }
}

/// Transient grouping of units destined for one shipment from one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub stock_location_id: StockLocationId,
    pub contents: Vec<ContentItem>,
    #[serde(default)]
    pub shipping_rates: Vec<ShippingRate>,
}

impl Package {
    pub fn new(stock_location_id: StockLocationId) -> Self {
        Self::with_contents(stock_location_id, Vec::new())
    }

    pub fn with_contents(stock_location_id: StockLocationId, contents: Vec<ContentItem>) -> Self {
        Self {
            stock_location_id,
            contents,
            shipping_rates: Vec::new(),
        }
    }

    pub fn add(&mut self, item: ContentItem) {
        self.contents.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Total number of units.
    pub fn quantity(&self) -> u32 {
        u32::try_from(self.contents.len()).unwrap_or(u32::MAX)
    }

    pub fn quantity_in(&self, state: InventoryUnitState) -> u32 {
        let n = self.contents.iter().filter(|c| c.state() == state).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    }

    pub fn on_hand(&self) -> impl Iterator<Item = &ContentItem> {
        self.contents.iter().filter(|c| c.inventory_unit.is_on_hand())
    }

    pub fn backordered(&self) -> impl Iterator<Item = &ContentItem> {
        self.contents.iter().filter(|c| c.inventory_unit.is_backordered())
    }

    pub fn weight(&self) -> Weight {
        self.contents.iter().map(ContentItem::weight).sum()
    }

    pub fn shipping_categories(&self) -> BTreeSet<ShippingCategoryId> {
        self.contents.iter().map(ContentItem::shipping_category_id).collect()
    }

    pub fn item_total(&self, currency: &str) -> DomainResult<Money> {
        self.contents
            .iter()
            .try_fold(Money::zero(currency), |total, item| total.checked_add(&item.price))
    }

    pub fn metrics(&self, currency: &str) -> DomainResult<PackageMetrics> {
        Ok(PackageMetrics {
            item_total: self.item_total(currency)?,
            quantity: self.quantity(),
            weight: self.weight(),
        })
    }

    pub fn selected_rate(&self) -> Option<&ShippingRate> {
        self.shipping_rates.iter().find(|r| r.selected)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use shipforge_core::{LineItemId, VariantId};

    pub fn item(
        variant_n: u128,
        category: u128,
        grams: u64,
        state: InventoryUnitState,
        ordinal: u32,
    ) -> ContentItem {
        let variant = Variant::new(
            VariantId::from_u128(variant_n),
            format!("SKU-{variant_n}"),
            Weight::from_grams(grams),
            ShippingCategoryId::from_u128(category),
        );
        let line_item_id = LineItemId::from_u128(variant_n);
        ContentItem {
            inventory_unit: InventoryUnit::new(variant.id, line_item_id, ordinal, state),
            variant,
            price: Money::new(1000, "USD"),
        }
    }

    pub fn package(contents: Vec<ContentItem>) -> Package {
        Package::with_contents(StockLocationId::from_u128(1), contents)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use InventoryUnitState::{Backordered, OnHand};

    #[test]
    fn aggregates_over_contents() {
        let p = package(vec![
            item(1, 10, 200, OnHand, 0),
            item(1, 10, 200, Backordered, 1),
            item(2, 11, 50, OnHand, 0),
        ]);

        assert_eq!(p.quantity(), 3);
        assert_eq!(p.quantity_in(Backordered), 1);
        assert_eq!(p.on_hand().count(), 2);
        assert_eq!(p.backordered().count(), 1);
        assert_eq!(p.weight(), Weight::from_grams(450));
        assert_eq!(p.shipping_categories().len(), 2);
        assert_eq!(p.item_total("USD").unwrap(), Money::new(3000, "USD"));
    }

    #[test]
    fn empty_package_has_zero_total() {
        let p = Package::new(StockLocationId::from_u128(1));
        assert!(p.is_empty());
        let m = p.metrics("EUR").unwrap();
        assert_eq!(m.item_total, Money::zero("EUR"));
        assert_eq!(m.quantity, 0);
    }
}
