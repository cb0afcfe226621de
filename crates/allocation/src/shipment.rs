//! Shipments: packages an order has committed to.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shipforge_core::{
    Money, OrderId, ShipmentId, ShippingMethodId, StockLocationId, VariantId,
};
use shipforge_inventory::{InventoryUnit, StockEnvelope, StockLedger};
use shipforge_shipping::ShippingRate;

use crate::error::AllocationError;
use crate::package::Package;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentState {
    Pending,
    Ready,
    Shipped,
    Canceled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: ShipmentId,
    pub number: String,
    pub order_id: OrderId,
    pub stock_location_id: StockLocationId,
    pub inventory_units: Vec<InventoryUnit>,
    pub shipping_rates: Vec<ShippingRate>,
    pub state: ShipmentState,
    /// Set once the units have been unstocked from the ledger.
    #[serde(default)]
    pub finalized: bool,
}

impl Shipment {
    pub fn from_package(package: Package, order_id: OrderId, number: impl Into<String>) -> Self {
        let id = ShipmentId::new();
        let inventory_units = package
            .contents
            .into_iter()
            .map(|item| {
                let mut unit = item.inventory_unit;
                unit.shipment_id = Some(id);
                unit
            })
            .collect();
        Self {
            id,
            number: number.into(),
            order_id,
            stock_location_id: package.stock_location_id,
            inventory_units,
            shipping_rates: package.shipping_rates,
            state: ShipmentState::Pending,
            finalized: false,
        }
    }

    pub fn selected_rate(&self) -> Option<&ShippingRate> {
        self.shipping_rates.iter().find(|r| r.selected)
    }

    /// Cost of the selected rate, if any.
    pub fn cost(&self) -> Option<&Money> {
        self.selected_rate().map(|r| &r.cost)
    }

    /// Switch the selected rate to the one for `method_id`.
    pub fn select_shipping_rate(&mut self, method_id: ShippingMethodId) -> Result<(), AllocationError> {
        if !self.shipping_rates.iter().any(|r| r.shipping_method_id == method_id) {
            return Err(AllocationError::UnknownShippingMethod(method_id));
        }
        for rate in &mut self.shipping_rates {
            rate.selected = rate.shipping_method_id == method_id;
        }
        Ok(())
    }

    pub fn is_backordered(&self) -> bool {
        self.inventory_units.iter().any(InventoryUnit::is_backordered)
    }

    /// State the shipment should be in given the order's payment status.
    /// Shipped and canceled shipments stay where they are.
    pub fn determine_state(&self, paid: bool) -> ShipmentState {
        match self.state {
            ShipmentState::Shipped | ShipmentState::Canceled => self.state,
            _ if self.is_backordered() || !paid => ShipmentState::Pending,
            _ => ShipmentState::Ready,
        }
    }

    pub fn update_state(&mut self, paid: bool) -> ShipmentState {
        self.state = self.determine_state(paid);
        self.state
    }

    /// Unstock every unit from the shipment's location.
    ///
    /// All variants are checked before anything is written, so a rejected
    /// finalize leaves the ledger untouched.
    pub fn finalize(
        &mut self,
        ledger: &mut StockLedger,
        occurred_at: DateTime<Utc>,
    ) -> Result<Vec<StockEnvelope>, AllocationError> {
        if self.finalized {
            return Err(AllocationError::InvalidState(format!(
                "shipment {} is already finalized",
                self.number
            )));
        }
        if self.state == ShipmentState::Canceled {
            return Err(AllocationError::InvalidState(format!(
                "shipment {} is canceled",
                self.number
            )));
        }

        let quantities = self.quantities_by_variant();
        for (&variant_id, &quantity) in &quantities {
            ledger
                .can_unstock(self.stock_location_id, variant_id, quantity)
                .map_err(AllocationError::Stock)?;
        }

        let mut envelopes = Vec::new();
        for (variant_id, quantity) in quantities {
            envelopes.extend(
                ledger
                    .unstock(self.stock_location_id, variant_id, quantity, occurred_at)
                    .map_err(AllocationError::Stock)?,
            );
        }
        self.finalized = true;
        tracing::info!(shipment = %self.number, movements = envelopes.len(), "shipment finalized");
        Ok(envelopes)
    }

    /// Mark a ready shipment and all its units as shipped.
    pub fn ship(&mut self) -> Result<(), AllocationError> {
        if self.state != ShipmentState::Ready {
            return Err(AllocationError::InvalidState(format!(
                "shipment {} is {:?}, not ready",
                self.number, self.state
            )));
        }
        for unit in &mut self.inventory_units {
            unit.ship().map_err(|err| AllocationError::InvalidState(err.to_string()))?;
        }
        self.state = ShipmentState::Shipped;
        Ok(())
    }

    /// Cancel the shipment, putting finalized stock back.
    pub fn cancel(
        &mut self,
        ledger: &mut StockLedger,
        occurred_at: DateTime<Utc>,
    ) -> Result<Vec<StockEnvelope>, AllocationError> {
        if matches!(self.state, ShipmentState::Shipped | ShipmentState::Canceled) {
            return Err(AllocationError::InvalidState(format!(
                "shipment {} is {:?} and cannot be canceled",
                self.number, self.state
            )));
        }

        let mut envelopes = Vec::new();
        if self.finalized {
            for (variant_id, quantity) in self.quantities_by_variant() {
                envelopes.extend(
                    ledger
                        .restock(self.stock_location_id, variant_id, quantity, occurred_at)
                        .map_err(AllocationError::Stock)?,
                );
            }
            self.finalized = false;
        }
        self.state = ShipmentState::Canceled;
        Ok(envelopes)
    }

    /// Stock arrived: move every backordered unit on hand and re-derive the state.
    pub fn fill_backorders(&mut self, paid: bool) -> Result<ShipmentState, AllocationError> {
        for unit in self.inventory_units.iter_mut().filter(|u| u.is_backordered()) {
            unit.fill_backorder().map_err(|err| AllocationError::InvalidState(err.to_string()))?;
        }
        Ok(self.update_state(paid))
    }

    fn quantities_by_variant(&self) -> BTreeMap<VariantId, u32> {
        let mut quantities = BTreeMap::new();
        for unit in &self.inventory_units {
            *quantities.entry(unit.variant_id).or_insert(0u32) += 1;
        }
        quantities
    }
}
