use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use shipforge_core::{
    Address, DomainError, DomainResult, ShippingCategoryId, StockLocationId, ZoneId,
};

use crate::category::ShippingCategory;
use crate::method::ShippingMethod;
use crate::zone::Zone;

/// Everything needed to decide which methods may carry a package.
#[derive(Debug, Clone, Copy)]
pub struct RateQuery<'a> {
    pub stock_location_id: StockLocationId,
    pub shipping_categories: &'a BTreeSet<ShippingCategoryId>,
    pub destination: Option<&'a Address>,
    pub currency: &'a str,
    pub frontend_only: bool,
}

/// Configured zones, categories and methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingCatalog {
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub categories: Vec<ShippingCategory>,
    #[serde(default)]
    pub methods: Vec<ShippingMethod>,
}

impl ShippingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zones.push(zone);
        self
    }

    pub fn with_category(mut self, category: ShippingCategory) -> Self {
        self.categories.push(category);
        self
    }

    pub fn with_method(mut self, method: ShippingMethod) -> Self {
        self.methods.push(method);
        self
    }

    /// Zones containing `address`.
    pub fn zones_for(&self, address: &Address) -> BTreeSet<ZoneId> {
        self.zones
            .iter()
            .filter(|z| z.contains(address))
            .map(|z| z.id)
            .collect()
    }

    /// Methods allowed to carry the described package, in configuration order.
    ///
    /// Without a destination no zone can match, so nothing is eligible.
    pub fn eligible_methods(&self, query: &RateQuery<'_>) -> Vec<&ShippingMethod> {
        let Some(destination) = query.destination else {
            return Vec::new();
        };
        let zones = self.zones_for(destination);

        self.methods
            .iter()
            .filter(|m| m.covers_categories(query.shipping_categories))
            .filter(|m| m.available_to_location(query.stock_location_id))
            .filter(|m| !m.zone_ids.is_disjoint(&zones))
            .filter(|m| m.accepts_currency(query.currency))
            .filter(|m| m.displayable(query.frontend_only))
            .collect()
    }

    /// Reject dangling references and unusable methods.
    pub fn validate(&self) -> DomainResult<()> {
        let zone_ids: BTreeSet<ZoneId> = self.zones.iter().map(|z| z.id).collect();
        let category_ids: BTreeSet<ShippingCategoryId> = self.categories.iter().map(|c| c.id).collect();
        let mut method_ids = BTreeSet::new();

        for method in &self.methods {
            if !method_ids.insert(method.id) {
                return Err(DomainError::conflict(format!("duplicate shipping method {}", method.id)));
            }
            if method.name.trim().is_empty() {
                return Err(DomainError::validation("shipping method name cannot be empty"));
            }
            if method.zone_ids.is_empty() {
                return Err(DomainError::validation(format!(
                    "shipping method {} has no zones",
                    method.name
                )));
            }
            if method.shipping_category_ids.is_empty() {
                return Err(DomainError::validation(format!(
                    "shipping method {} has no shipping categories",
                    method.name
                )));
            }
            if let Some(missing) = method.zone_ids.iter().find(|z| !zone_ids.contains(z)) {
                return Err(DomainError::not_found(format!("zone {missing}")));
            }
            // Categories are optional in the catalog; only check when declared.
            if !category_ids.is_empty() {
                if let Some(missing) = method
                    .shipping_category_ids
                    .iter()
                    .find(|c| !category_ids.contains(c))
                {
                    return Err(DomainError::not_found(format!("shipping category {missing}")));
                }
            }
            method
                .calculator
                .validate()
                .map_err(|e| DomainError::validation(format!("{}: {e}", method.name)))?;
        }
        Ok(())
    }
}
