//! Inventory domain module.
//!
//! Stock locations, variants, event-sourced stock items and the read-only
//! snapshot an allocation run works from. Pure domain logic (no IO).

pub mod location;
pub mod quantifier;
pub mod snapshot;
pub mod stock_item;
pub mod stock_ledger;
pub mod unit;
pub mod variant;

pub use location::StockLocation;
pub use quantifier::{OnHand, Quantifier};
pub use snapshot::{SnapshotRecords, StockItemRecord, StockLevel, StockSnapshot};
pub use stock_item::{
    AdjustStock, BackorderableChanged, CreateStockItem, SetBackorderable, StockAdjusted,
    StockItem, StockItemCommand, StockItemCreated, StockItemEvent, StockItemId,
};
pub use stock_ledger::{StockEnvelope, StockLedger};
pub use unit::{InventoryUnit, InventoryUnitState};
pub use variant::Variant;
