//! Drives an allocation run from order to priced packages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use shipforge_core::{DomainError, StockLocationId};
use shipforge_inventory::{InventoryUnit, InventoryUnitState, StockSnapshot};
use shipforge_shipping::ShippingCatalog;

use crate::allocator::{Allocator, LineAllocation};
use crate::config::AllocationConfig;
use crate::error::{AllocationError, Shortfall};
use crate::estimator::Estimator;
use crate::order::{LineItem, OrderRequest};
use crate::package::{ContentItem, Package};
use crate::shipment::Shipment;
use crate::splitter::SplitterChain;

/// Result of one allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub packages: Vec<Package>,
    /// Empty when every requested unit was placed in a package.
    pub shortfalls: Vec<Shortfall>,
}

impl Allocation {
    pub fn is_complete(&self) -> bool {
        self.shortfalls.is_empty()
    }

    pub fn unit_count(&self) -> usize {
        self.packages.iter().map(|p| p.contents.len()).sum()
    }
}

#[derive(Debug)]
pub struct Coordinator<'a> {
    snapshot: &'a StockSnapshot,
    catalog: &'a ShippingCatalog,
    config: &'a AllocationConfig,
    splitters: SplitterChain,
}

impl<'a> Coordinator<'a> {
    pub fn new(
        snapshot: &'a StockSnapshot,
        catalog: &'a ShippingCatalog,
        config: &'a AllocationConfig,
    ) -> Self {
        Self {
            snapshot,
            catalog,
            config,
            splitters: SplitterChain::from_config(config),
        }
    }

    /// Allocate every line, split the packages and price them.
    ///
    /// Units that cannot be supplied are reported as shortfalls rather than
    /// failing the run, so a caller can still show a partial quote.
    pub fn allocate(&self, order: &OrderRequest) -> Result<Allocation, AllocationError> {
        order.validate().map_err(AllocationError::InvalidOrder)?;
        if let Some(line) = order
            .line_items
            .iter()
            .find(|l| self.snapshot.variant(l.variant_id).is_none())
        {
            return Err(AllocationError::InvalidOrder(DomainError::not_found(format!(
                "variant {}",
                line.variant_id
            ))));
        }

        tracing::info!(
            order = %order.number,
            lines = order.line_items.len(),
            units = order.total_quantity(),
            splitters = ?self.splitters.names(),
            "allocating order"
        );

        let mut allocator = Allocator::new(self.snapshot);
        let mut packages = PackageBuilder::new(self.snapshot);
        let mut shortfalls = Vec::new();

        for line in &order.line_items {
            let allocation = allocator.allocate_line(line);
            packages.add_line(line, &allocation);
            if !allocation.is_complete() {
                tracing::warn!(
                    order = %order.number,
                    line_item = %line.id,
                    variant = %line.variant_id,
                    requested = allocation.requested,
                    unfulfilled = allocation.unfulfilled,
                    "insufficient stock"
                );
                shortfalls.push(Shortfall {
                    line_item_id: line.id,
                    variant_id: line.variant_id,
                    requested: allocation.requested,
                    unfulfilled: allocation.unfulfilled,
                });
            }
        }

        let estimator = Estimator::new(self.catalog, self.snapshot);
        let packages: Vec<Package> = self
            .splitters
            .run(packages.finish())
            .into_iter()
            .map(|mut package| {
                package.shipping_rates =
                    estimator.shipping_rates(&package, order, self.config.frontend_only);
                package
            })
            .collect();

        tracing::info!(
            order = %order.number,
            packages = packages.len(),
            shortfalls = shortfalls.len(),
            "allocation finished"
        );

        Ok(Allocation {
            packages,
            shortfalls,
        })
    }

    /// Turn a complete allocation into shipments numbered `<order>-1`, `<order>-2`, ...
    pub fn shipments(&self, order: &OrderRequest) -> Result<Vec<Shipment>, AllocationError> {
        let allocation = self.allocate(order)?;
        if !allocation.is_complete() {
            return Err(AllocationError::InsufficientStock {
                shortfalls: allocation.shortfalls,
            });
        }

        Ok(allocation
            .packages
            .into_iter()
            .enumerate()
            .map(|(i, package)| {
                let mut shipment =
                    Shipment::from_package(package, order.id, format!("{}-{}", order.number, i + 1));
                shipment.update_state(order.paid);
                shipment
            })
            .collect())
    }
}

/// One package per stock location, kept in location priority order.
struct PackageBuilder<'a> {
    snapshot: &'a StockSnapshot,
    packages: Vec<Package>,
    index: BTreeMap<StockLocationId, usize>,
}

impl<'a> PackageBuilder<'a> {
    fn new(snapshot: &'a StockSnapshot) -> Self {
        let packages: Vec<Package> = snapshot
            .active_locations()
            .into_iter()
            .map(|l| Package::new(l.id))
            .collect();
        let index = packages
            .iter()
            .enumerate()
            .map(|(i, p)| (p.stock_location_id, i))
            .collect();
        Self {
            snapshot,
            packages,
            index,
        }
    }

    fn add_line(&mut self, line: &LineItem, allocation: &LineAllocation) {
        let Some(variant) = self.snapshot.variant(line.variant_id) else {
            return;
        };
        let mut ordinal = 0u32;
        let placements = allocation
            .on_hand
            .iter()
            .map(|&(loc, n)| (loc, n, InventoryUnitState::OnHand))
            .chain(
                allocation
                    .backordered
                    .iter()
                    .map(|&(loc, n)| (loc, n, InventoryUnitState::Backordered)),
            );

        for (location_id, quantity, state) in placements {
            let Some(&slot) = self.index.get(&location_id) else {
                continue;
            };
            for _ in 0..quantity {
                self.packages[slot].add(ContentItem {
                    inventory_unit: InventoryUnit::new(variant.id, line.id, ordinal, state),
                    variant: variant.clone(),
                    price: line.price.clone(),
                });
                ordinal += 1;
            }
        }
    }

    fn finish(self) -> Vec<Package> {
        self.packages.into_iter().filter(|p| !p.is_empty()).collect()
    }
}
