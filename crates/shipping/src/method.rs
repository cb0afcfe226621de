use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use shipforge_core::{Entity, ShippingCategoryId, ShippingMethodId, StockLocationId, ZoneId};

use crate::calculator::Calculator;

/// Where a shipping method may be offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayOn {
    #[default]
    Both,
    FrontEnd,
    BackEnd,
}

/// A carrier service (e.g. "UPS Ground") with its pricing rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub id: ShippingMethodId,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    /// Tie-break when two methods cost the same; lower wins.
    #[serde(default)]
    pub position: i32,
    pub zone_ids: BTreeSet<ZoneId>,
    pub shipping_category_ids: BTreeSet<ShippingCategoryId>,
    pub calculator: Calculator,
    #[serde(default)]
    pub display_on: DisplayOn,
    #[serde(default = "default_available_to_all")]
    pub available_to_all_locations: bool,
    /// Only consulted when `available_to_all_locations` is false.
    #[serde(default)]
    pub stock_location_ids: BTreeSet<StockLocationId>,
    /// Restrict the method to orders in this currency.
    #[serde(default)]
    pub currency: Option<String>,
}

fn default_available_to_all() -> bool {
    true
}

impl ShippingMethod {
    pub fn new(id: ShippingMethodId, name: impl Into<String>, calculator: Calculator) -> Self {
        Self {
            id,
            name: name.into(),
            code: None,
            position: 0,
            zone_ids: BTreeSet::new(),
            shipping_category_ids: BTreeSet::new(),
            calculator,
            display_on: DisplayOn::Both,
            available_to_all_locations: true,
            stock_location_ids: BTreeSet::new(),
            currency: None,
        }
    }

    pub fn with_zone(mut self, zone_id: ZoneId) -> Self {
        self.zone_ids.insert(zone_id);
        self
    }

    pub fn with_category(mut self, category_id: ShippingCategoryId) -> Self {
        self.shipping_category_ids.insert(category_id);
        self
    }

    pub fn with_position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    pub fn with_display_on(mut self, display_on: DisplayOn) -> Self {
        self.display_on = display_on;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Limit the method to the given stock locations.
    pub fn only_at(mut self, locations: impl IntoIterator<Item = StockLocationId>) -> Self {
        self.available_to_all_locations = false;
        self.stock_location_ids = locations.into_iter().collect();
        self
    }

    /// A method can carry a package only if it handles every category in it.
    pub fn covers_categories(&self, categories: &BTreeSet<ShippingCategoryId>) -> bool {
        !categories.is_empty() && categories.is_subset(&self.shipping_category_ids)
    }

    pub fn available_to_location(&self, location_id: StockLocationId) -> bool {
        self.available_to_all_locations || self.stock_location_ids.contains(&location_id)
    }

    pub fn displayable(&self, frontend_only: bool) -> bool {
        !(frontend_only && self.display_on == DisplayOn::BackEnd)
    }

    pub fn accepts_currency(&self, currency: &str) -> bool {
        self.currency
            .as_deref()
            .is_none_or(|c| c.eq_ignore_ascii_case(currency))
    }
}

impl Entity for ShippingMethod {
    type Id = ShippingMethodId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
