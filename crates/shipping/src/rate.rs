use serde::{Deserialize, Serialize};

use shipforge_core::{Money, ShippingMethodId};

/// Price option for shipping one package with one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRate {
    pub shipping_method_id: ShippingMethodId,
    pub name: String,
    pub cost: Money,
    /// The rate the shipment will use unless someone picks another.
    #[serde(default)]
    pub selected: bool,
}

impl ShippingRate {
    pub fn new(shipping_method_id: ShippingMethodId, name: impl Into<String>, cost: Money) -> Self {
        Self {
            shipping_method_id,
            name: name.into(),
            cost,
            selected: false,
        }
    }
}
