use serde::{Deserialize, Serialize};

use shipforge_core::{Address, Entity, StockLocationId};

/// A place inventory is held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLocation {
    pub id: StockLocationId,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Priority weight; lower positions are preferred.
    #[serde(default)]
    pub position: i32,
    /// Whether stock items created at this location accept backorders.
    #[serde(default)]
    pub backorderable_default: bool,
    #[serde(default)]
    pub address: Option<Address>,
}

fn default_active() -> bool {
    true
}

impl StockLocation {
    pub fn new(id: StockLocationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
            position: 0,
            backorderable_default: false,
            address: None,
        }
    }

    pub fn with_position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    pub fn with_backorderable_default(mut self, backorderable: bool) -> Self {
        self.backorderable_default = backorderable;
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.active = false;
        self
    }

    /// Ordering key used wherever locations are listed "in priority order".
    pub fn priority_key(&self) -> (i32, &str, StockLocationId) {
        (self.position, self.name.as_str(), self.id)
    }
}

impl Entity for StockLocation {
    type Id = StockLocationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
