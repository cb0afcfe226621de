use serde::{Deserialize, Serialize};

use shipforge_core::{ShippingCategoryId, VariantId, Weight};

/// The stock-relevant view of a purchasable variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub sku: String,
    /// Weight of a single unit.
    #[serde(default)]
    pub weight: Weight,
    pub shipping_category_id: ShippingCategoryId,
    /// Untracked variants (digital goods, made-to-order) never run out.
    #[serde(default = "default_track_inventory")]
    pub track_inventory: bool,
}

fn default_track_inventory() -> bool {
    true
}

impl Variant {
    pub fn new(
        id: VariantId,
        sku: impl Into<String>,
        weight: Weight,
        shipping_category_id: ShippingCategoryId,
    ) -> Self {
        Self {
            id,
            sku: sku.into(),
            weight,
            shipping_category_id,
            track_inventory: true,
        }
    }

    pub fn untracked(mut self) -> Self {
        self.track_inventory = false;
        self
    }
}
