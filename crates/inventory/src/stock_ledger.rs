//! Stock ledger: owns stock item aggregates and records their event streams.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use shipforge_core::{
    Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult, ExpectedVersion,
    StockLocationId, VariantId,
};
use shipforge_events::EventEnvelope;

use crate::location::StockLocation;
use crate::snapshot::{StockLevel, StockSnapshot};
use crate::stock_item::{
    AdjustStock, CreateStockItem, SetBackorderable, StockItem, StockItemCommand, StockItemEvent,
    StockItemId,
};
use crate::variant::Variant;

pub type StockEnvelope = EventEnvelope<StockItemEvent>;

const AGGREGATE_TYPE: &str = "stock_item";

/// In-memory system of record for stock.
///
/// Every change goes through `StockItem::handle` and is journaled as an
/// envelope; callers persist the journal however they like.
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    locations: BTreeMap<StockLocationId, StockLocation>,
    variants: BTreeMap<VariantId, Variant>,
    items: BTreeMap<StockItemId, StockItem>,
    index: BTreeMap<(StockLocationId, VariantId), StockItemId>,
    journal: Vec<StockEnvelope>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_location(&mut self, location: StockLocation) {
        self.locations.insert(location.id, location);
    }

    pub fn register_variant(&mut self, variant: Variant) {
        self.variants.insert(variant.id, variant);
    }

    pub fn journal(&self) -> &[StockEnvelope] {
        &self.journal
    }

    pub fn stock_item(&self, location_id: StockLocationId, variant_id: VariantId) -> Option<&StockItem> {
        self.index
            .get(&(location_id, variant_id))
            .and_then(|id| self.items.get(id))
    }

    /// Create the stock item for a location/variant pair, inheriting the
    /// location's `backorderable_default`.
    pub fn create_stock_item(
        &mut self,
        location_id: StockLocationId,
        variant_id: VariantId,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<StockItemId> {
        let location = self
            .locations
            .get(&location_id)
            .ok_or_else(|| DomainError::not_found(format!("stock location {location_id}")))?;
        if !self.variants.contains_key(&variant_id) {
            return Err(DomainError::not_found(format!("variant {variant_id}")));
        }
        if self.index.contains_key(&(location_id, variant_id)) {
            return Err(DomainError::conflict("stock item already exists"));
        }

        let item_id = StockItemId::new(AggregateId::new());
        let command = StockItemCommand::CreateStockItem(CreateStockItem {
            item_id,
            stock_location_id: location_id,
            variant_id,
            backorderable: location.backorderable_default,
            occurred_at,
        });
        self.items.insert(item_id, StockItem::empty(item_id));
        if let Err(err) = self.execute(item_id, &command, ExpectedVersion::Exact(0)) {
            self.items.remove(&item_id);
            return Err(err);
        }
        self.index.insert((location_id, variant_id), item_id);
        Ok(item_id)
    }

    /// Run a command against one stock item and journal the resulting events.
    pub fn execute(
        &mut self,
        item_id: StockItemId,
        command: &StockItemCommand,
        expected: ExpectedVersion,
    ) -> DomainResult<Vec<StockEnvelope>> {
        let item = self
            .items
            .get_mut(&item_id)
            .ok_or_else(|| DomainError::not_found(format!("stock item {item_id}")))?;
        expected.check(item.version())?;

        let events = item.handle(command)?;
        let mut envelopes = Vec::with_capacity(events.len());
        for event in events {
            item.apply(&event);
            tracing::debug!(
                stock_item = %item_id,
                version = item.version(),
                count_on_hand = item.count_on_hand(),
                "stock item event applied"
            );
            envelopes.push(EventEnvelope::wrap(item_id.0, AGGREGATE_TYPE, item.version(), event));
        }
        self.journal.extend(envelopes.iter().cloned());
        Ok(envelopes)
    }

    /// Add `quantity` units at a location.
    pub fn restock(
        &mut self,
        location_id: StockLocationId,
        variant_id: VariantId,
        quantity: u32,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Vec<StockEnvelope>> {
        self.adjust(location_id, variant_id, i64::from(quantity), occurred_at)
    }

    /// Remove `quantity` units at a location.
    ///
    /// Untracked variants are never unstocked.
    pub fn unstock(
        &mut self,
        location_id: StockLocationId,
        variant_id: VariantId,
        quantity: u32,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Vec<StockEnvelope>> {
        self.adjust(location_id, variant_id, -i64::from(quantity), occurred_at)
    }

    /// Check whether `quantity` units could be unstocked without breaking the
    /// negative-count rule. Nothing is changed.
    pub fn can_unstock(
        &self,
        location_id: StockLocationId,
        variant_id: VariantId,
        quantity: u32,
    ) -> DomainResult<()> {
        let tracked = self
            .variants
            .get(&variant_id)
            .ok_or_else(|| DomainError::not_found(format!("variant {variant_id}")))?
            .track_inventory;
        if !tracked || quantity == 0 {
            return Ok(());
        }
        let item_id = self.item_id(location_id, variant_id)?;
        let item = self
            .items
            .get(&item_id)
            .ok_or_else(|| DomainError::not_found(format!("stock item {item_id}")))?;
        let remaining = item
            .count_on_hand()
            .checked_sub(i64::from(quantity))
            .ok_or_else(|| DomainError::invariant("count_on_hand overflow"))?;
        if remaining < 0 && !item.is_backorderable() {
            return Err(DomainError::invariant(
                "stock cannot go negative unless backorderable",
            ));
        }
        Ok(())
    }

    pub fn set_backorderable(
        &mut self,
        location_id: StockLocationId,
        variant_id: VariantId,
        backorderable: bool,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Vec<StockEnvelope>> {
        let item_id = self.item_id(location_id, variant_id)?;
        let command = StockItemCommand::SetBackorderable(SetBackorderable {
            item_id,
            backorderable,
            occurred_at,
        });
        self.execute(item_id, &command, ExpectedVersion::Any)
    }

    fn adjust(
        &mut self,
        location_id: StockLocationId,
        variant_id: VariantId,
        delta: i64,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Vec<StockEnvelope>> {
        let tracked = self
            .variants
            .get(&variant_id)
            .ok_or_else(|| DomainError::not_found(format!("variant {variant_id}")))?
            .track_inventory;
        if !tracked || delta == 0 {
            return Ok(Vec::new());
        }

        let item_id = self.item_id(location_id, variant_id)?;
        let command = StockItemCommand::AdjustStock(AdjustStock {
            item_id,
            delta,
            occurred_at,
        });
        self.execute(item_id, &command, ExpectedVersion::Any)
    }

    fn item_id(&self, location_id: StockLocationId, variant_id: VariantId) -> DomainResult<StockItemId> {
        self.index
            .get(&(location_id, variant_id))
            .copied()
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "stock item for variant {variant_id} at location {location_id}"
                ))
            })
    }

    /// Read the current state into a snapshot for an allocation run.
    pub fn snapshot(&self) -> StockSnapshot {
        let mut snapshot = StockSnapshot::new();
        for location in self.locations.values() {
            snapshot.add_location(location.clone());
        }
        for variant in self.variants.values() {
            snapshot.add_variant(variant.clone());
        }
        for item in self.items.values() {
            if let (Some(location_id), Some(variant_id)) = (item.stock_location_id(), item.variant_id()) {
                // Backorders may be switched off while an item is still
                // negative; it then has nothing to offer, and nothing to book.
                let mut count_on_hand = item.count_on_hand();
                if count_on_hand < 0 && !item.is_backorderable() {
                    tracing::debug!(
                        stock_item = %item.id_typed(),
                        count_on_hand,
                        "outstanding backorders on a non-backorderable item; reading as empty"
                    );
                    count_on_hand = 0;
                }
                let level = StockLevel {
                    count_on_hand,
                    backorderable: item.is_backorderable(),
                };
                if let Err(err) = snapshot.set_level(location_id, variant_id, level) {
                    tracing::warn!(stock_item = %item.id_typed(), error = %err, "skipping stock item in snapshot");
                }
            }
        }
        snapshot
    }
}
