//! Prices packages against the shipping catalog.

use shipforge_shipping::{RateQuery, ShippingCatalog, ShippingRate};
use shipforge_inventory::StockSnapshot;

use crate::order::OrderRequest;
use crate::package::Package;

/// Produces the sorted, selected rate list for a package.
#[derive(Debug, Clone, Copy)]
pub struct Estimator<'a> {
    catalog: &'a ShippingCatalog,
    snapshot: &'a StockSnapshot,
}

impl<'a> Estimator<'a> {
    pub fn new(catalog: &'a ShippingCatalog, snapshot: &'a StockSnapshot) -> Self {
        Self { catalog, snapshot }
    }

    /// Rates cheapest first (ties by method position, name, id) with the first
    /// one selected. An empty list means there is no way to ship the package.
    pub fn shipping_rates(
        &self,
        package: &Package,
        order: &OrderRequest,
        frontend_only: bool,
    ) -> Vec<ShippingRate> {
        let destination = order.ship_address.as_ref().or_else(|| {
            self.snapshot
                .location(package.stock_location_id)
                .and_then(|l| l.address.as_ref())
        });
        let categories = package.shipping_categories();
        let query = RateQuery {
            stock_location_id: package.stock_location_id,
            shipping_categories: &categories,
            destination,
            currency: &order.currency,
            frontend_only,
        };

        let metrics = match package.metrics(&order.currency) {
            Ok(metrics) => metrics,
            Err(err) => {
                tracing::warn!(error = %err, "cannot total package contents");
                return Vec::new();
            }
        };

        let mut priced = Vec::new();
        for method in self.catalog.eligible_methods(&query) {
            match method.calculator.compute(&metrics) {
                Ok(cost) => priced.push((method, ShippingRate::new(method.id, method.name.clone(), cost))),
                Err(err) => tracing::warn!(
                    shipping_method = %method.id,
                    calculator = method.calculator.name(),
                    error = %err,
                    "skipping shipping method"
                ),
            }
        }

        priced.sort_by(|(ma, ra), (mb, rb)| {
            ra.cost
                .amount
                .cmp(&rb.cost.amount)
                .then(ma.position.cmp(&mb.position))
                .then_with(|| ma.name.cmp(&mb.name))
                .then(ma.id.cmp(&mb.id))
        });

        let mut rates: Vec<ShippingRate> = priced.into_iter().map(|(_, rate)| rate).collect();
        match rates.first_mut() {
            Some(cheapest) => cheapest.selected = true,
            None => tracing::debug!(
                stock_location = %package.stock_location_id,
                units = package.quantity(),
                "no shipping options"
            ),
        }
        rates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::fixtures::{item, package};
    use shipforge_core::{
        Address, LineItemId, OrderId, ShippingCategoryId, ShippingMethodId, StockLocationId,
        VariantId, ZoneId,
    };
    use shipforge_inventory::{InventoryUnitState::OnHand, StockLocation};
    use shipforge_shipping::{Calculator, DisplayOn, ShippingMethod, Zone};

    fn test_catalog() -> ShippingCatalog {
        let zone = ZoneId::from_u128(1);
        let cat = ShippingCategoryId::from_u128(10);
        ShippingCatalog::new()
            .with_zone(Zone::new(zone, "US").with_country("US"))
            .with_method(
                ShippingMethod::new(ShippingMethodId::from_u128(1), "Express", Calculator::FlatRate { amount: 2500 })
                    .with_zone(zone)
                    .with_category(cat),
            )
            .with_method(
                ShippingMethod::new(ShippingMethodId::from_u128(2), "Ground", Calculator::PerItem { amount: 300 })
                    .with_zone(zone)
                    .with_category(cat),
            )
            .with_method(
                ShippingMethod::new(ShippingMethodId::from_u128(3), "Courier", Calculator::FlatRate { amount: 100 })
                    .with_zone(zone)
                    .with_category(cat)
                    .with_display_on(DisplayOn::BackEnd),
            )
    }

    fn test_order() -> OrderRequest {
        OrderRequest::new(OrderId::from_u128(1), "R1", "USD")
            .ship_to(Address::new("US"))
            .with_line(LineItemId::from_u128(1), VariantId::from_u128(1), 2, 1000)
    }

    fn two_units() -> Package {
        package(vec![item(1, 10, 100, OnHand, 0), item(1, 10, 100, OnHand, 1)])
    }

    #[test]
    fn cheapest_rate_is_selected_first() {
        let catalog = test_catalog();
        let snap = StockSnapshot::new();
        let rates = Estimator::new(&catalog, &snap).shipping_rates(&two_units(), &test_order(), true);

        let names: Vec<&str> = rates.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Ground", "Express"]);
        assert!(rates[0].selected);
        assert!(!rates[1].selected);
        assert_eq!(rates[0].cost.amount, 600);
    }

    #[test]
    fn back_end_methods_appear_when_not_frontend_only() {
        let catalog = test_catalog();
        let snap = StockSnapshot::new();
        let rates = Estimator::new(&catalog, &snap).shipping_rates(&two_units(), &test_order(), false);
        assert_eq!(rates.len(), 3);
        assert_eq!(rates[0].name, "Courier");
    }

    #[test]
    fn equal_costs_fall_back_to_position() {
        let zone = ZoneId::from_u128(1);
        let cat = ShippingCategoryId::from_u128(10);
        let catalog = ShippingCatalog::new()
            .with_zone(Zone::new(zone, "US").with_country("US"))
            .with_method(
                ShippingMethod::new(ShippingMethodId::from_u128(1), "A", Calculator::FlatRate { amount: 500 })
                    .with_zone(zone)
                    .with_category(cat)
                    .with_position(2),
            )
            .with_method(
                ShippingMethod::new(ShippingMethodId::from_u128(2), "B", Calculator::FlatRate { amount: 500 })
                    .with_zone(zone)
                    .with_category(cat)
                    .with_position(1),
            );
        let snap = StockSnapshot::new();
        let rates = Estimator::new(&catalog, &snap).shipping_rates(&two_units(), &test_order(), true);
        assert_eq!(rates[0].name, "B");
    }

    #[test]
    fn destination_falls_back_to_stock_location_address() {
        let catalog = test_catalog();
        let mut snap = StockSnapshot::new();
        snap.add_location(
            StockLocation::new(StockLocationId::from_u128(1), "main").with_address(Address::new("US")),
        );
        let mut order = test_order();
        order.ship_address = None;

        let rates = Estimator::new(&catalog, &snap).shipping_rates(&two_units(), &order, true);
        assert_eq!(rates.len(), 2);
    }

    #[test]
    fn no_matching_zone_yields_no_rates() {
        let catalog = test_catalog();
        let snap = StockSnapshot::new();
        let order = test_order().ship_to(Address::new("DE"));
        assert!(Estimator::new(&catalog, &snap)
            .shipping_rates(&two_units(), &order, true)
            .is_empty());
    }

    #[test]
    fn estimating_twice_is_stable() {
        let catalog = test_catalog();
        let snap = StockSnapshot::new();
        let estimator = Estimator::new(&catalog, &snap);
        let p = two_units();
        assert_eq!(
            estimator.shipping_rates(&p, &test_order(), false),
            estimator.shipping_rates(&p, &test_order(), false)
        );
    }
}
