use serde::{Deserialize, Serialize};

use shipforge_core::{Entity, ShippingCategoryId};

/// Groups variants that ship the same way (e.g. "default", "oversized", "hazmat").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingCategory {
    pub id: ShippingCategoryId,
    pub name: String,
}

impl Entity for ShippingCategory {
    type Id = ShippingCategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
