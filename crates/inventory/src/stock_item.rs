use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shipforge_core::{
    Aggregate, AggregateId, AggregateRoot, DomainError, StockLocationId, VariantId,
};
use shipforge_events::Event;

/// Stock item identifier (one per location/variant pair).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockItemId(pub AggregateId);

impl StockItemId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for StockItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: StockItem.
///
/// Tracks how many units of a variant a location holds. `count_on_hand` only
/// drops below zero when the item accepts backorders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockItem {
    id: StockItemId,
    stock_location_id: Option<StockLocationId>,
    variant_id: Option<VariantId>,
    count_on_hand: i64,
    backorderable: bool,
    version: u64,
    created: bool,
}

impl StockItem {
    /// Create an empty, not-yet-created aggregate instance for rehydration.
    pub fn empty(id: StockItemId) -> Self {
        Self {
            id,
            stock_location_id: None,
            variant_id: None,
            count_on_hand: 0,
            backorderable: false,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> StockItemId {
        self.id
    }

    pub fn stock_location_id(&self) -> Option<StockLocationId> {
        self.stock_location_id
    }

    pub fn variant_id(&self) -> Option<VariantId> {
        self.variant_id
    }

    pub fn count_on_hand(&self) -> i64 {
        self.count_on_hand
    }

    pub fn is_backorderable(&self) -> bool {
        self.backorderable
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Units that can leave the building right now.
    pub fn available_on_hand(&self) -> i64 {
        self.count_on_hand.max(0)
    }
}

impl AggregateRoot for StockItem {
    type Id = StockItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateStockItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStockItem {
    pub item_id: StockItemId,
    pub stock_location_id: StockLocationId,
    pub variant_id: VariantId,
    pub backorderable: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AdjustStock (positive = restock, negative = unstock).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustStock {
    pub item_id: StockItemId,
    pub delta: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetBackorderable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetBackorderable {
    pub item_id: StockItemId,
    pub backorderable: bool,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockItemCommand {
    CreateStockItem(CreateStockItem),
    AdjustStock(AdjustStock),
    SetBackorderable(SetBackorderable),
}

/// Event: StockItemCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItemCreated {
    pub item_id: StockItemId,
    pub stock_location_id: StockLocationId,
    pub variant_id: VariantId,
    pub backorderable: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockAdjusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjusted {
    pub item_id: StockItemId,
    pub delta: i64,
    /// Resulting count, so read models need not replay the whole stream.
    pub count_on_hand: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: BackorderableChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackorderableChanged {
    pub item_id: StockItemId,
    pub backorderable: bool,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockItemEvent {
    StockItemCreated(StockItemCreated),
    StockAdjusted(StockAdjusted),
    BackorderableChanged(BackorderableChanged),
}

impl Event for StockItemEvent {
    fn event_type(&self) -> &'static str {
        match self {
            StockItemEvent::StockItemCreated(_) => "inventory.stock_item.created",
            StockItemEvent::StockAdjusted(_) => "inventory.stock_item.adjusted",
            StockItemEvent::BackorderableChanged(_) => "inventory.stock_item.backorderable_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StockItemEvent::StockItemCreated(e) => e.occurred_at,
            StockItemEvent::StockAdjusted(e) => e.occurred_at,
            StockItemEvent::BackorderableChanged(e) => e.occurred_at,
        }
    }
}

impl Aggregate for StockItem {
    type Command = StockItemCommand;
    type Event = StockItemEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            StockItemEvent::StockItemCreated(e) => {
                self.id = e.item_id;
                self.stock_location_id = Some(e.stock_location_id);
                self.variant_id = Some(e.variant_id);
                self.backorderable = e.backorderable;
                self.count_on_hand = 0;
                self.created = true;
            }
            StockItemEvent::StockAdjusted(e) => {
                self.count_on_hand += e.delta;
            }
            StockItemEvent::BackorderableChanged(e) => {
                self.backorderable = e.backorderable;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            StockItemCommand::CreateStockItem(cmd) => self.handle_create(cmd),
            StockItemCommand::AdjustStock(cmd) => self.handle_adjust(cmd),
            StockItemCommand::SetBackorderable(cmd) => self.handle_set_backorderable(cmd),
        }
    }
}

impl StockItem {
    fn ensure_item_id(&self, item_id: StockItemId) -> Result<(), DomainError> {
        if self.id != item_id {
            return Err(DomainError::invariant("item_id mismatch"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateStockItem) -> Result<Vec<StockItemEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("stock item already exists"));
        }
        self.ensure_item_id(cmd.item_id)?;

        Ok(vec![StockItemEvent::StockItemCreated(StockItemCreated {
            item_id: cmd.item_id,
            stock_location_id: cmd.stock_location_id,
            variant_id: cmd.variant_id,
            backorderable: cmd.backorderable,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_adjust(&self, cmd: &AdjustStock) -> Result<Vec<StockItemEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found(format!("stock item {}", cmd.item_id)));
        }
        self.ensure_item_id(cmd.item_id)?;

        if cmd.delta == 0 {
            return Err(DomainError::validation("delta cannot be zero"));
        }

        let new_count = self
            .count_on_hand
            .checked_add(cmd.delta)
            .ok_or_else(|| DomainError::invariant("count_on_hand overflow"))?;

        if cmd.delta < 0 && new_count < 0 && !self.backorderable {
            return Err(DomainError::invariant(
                "stock cannot go negative unless backorderable",
            ));
        }

        Ok(vec![StockItemEvent::StockAdjusted(StockAdjusted {
            item_id: cmd.item_id,
            delta: cmd.delta,
            count_on_hand: new_count,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_set_backorderable(
        &self,
        cmd: &SetBackorderable,
    ) -> Result<Vec<StockItemEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found(format!("stock item {}", cmd.item_id)));
        }
        self.ensure_item_id(cmd.item_id)?;

        // Already in the requested state: nothing happened.
        if self.backorderable == cmd.backorderable {
            return Ok(Vec::new());
        }

        Ok(vec![StockItemEvent::BackorderableChanged(BackorderableChanged {
            item_id: cmd.item_id,
            backorderable: cmd.backorderable,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_item_id() -> StockItemId {
        StockItemId::new(AggregateId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn created(item_id: StockItemId, backorderable: bool) -> StockItem {
        let mut item = StockItem::empty(item_id);
        let events = item
            .handle(&StockItemCommand::CreateStockItem(CreateStockItem {
                item_id,
                stock_location_id: StockLocationId::from_u128(1),
                variant_id: VariantId::from_u128(2),
                backorderable,
                occurred_at: test_time(),
            }))
            .unwrap();
        for e in &events {
            item.apply(e);
        }
        item
    }

    fn adjust(item_id: StockItemId, delta: i64) -> StockItemCommand {
        StockItemCommand::AdjustStock(AdjustStock {
            item_id,
            delta,
            occurred_at: test_time(),
        })
    }

    #[test]
    fn create_emits_created_event() {
        let item_id = test_item_id();
        let item = created(item_id, true);

        assert!(item.is_created());
        assert!(item.is_backorderable());
        assert_eq!(item.count_on_hand(), 0);
        assert_eq!(item.version(), 1);
        assert_eq!(item.stock_location_id(), Some(StockLocationId::from_u128(1)));
    }

    #[test]
    fn creating_twice_is_a_conflict() {
        let item_id = test_item_id();
        let item = created(item_id, false);
        let err = item
            .handle(&StockItemCommand::CreateStockItem(CreateStockItem {
                item_id,
                stock_location_id: StockLocationId::from_u128(1),
                variant_id: VariantId::from_u128(2),
                backorderable: false,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn adjust_on_missing_item_is_not_found() {
        let item_id = test_item_id();
        let item = StockItem::empty(item_id);
        let err = item.handle(&adjust(item_id, 5)).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn unstock_below_zero_requires_backorderable() {
        let item_id = test_item_id();
        let mut item = created(item_id, false);
        for e in item.handle(&adjust(item_id, 2)).unwrap() {
            item.apply(&e);
        }

        let err = item.handle(&adjust(item_id, -3)).unwrap_err();
        match err {
            DomainError::InvariantViolation(msg)
                if msg.contains("stock cannot go negative unless backorderable") => {}
            other => panic!("expected invariant violation, got {other:?}"),
        }

        let backorderable_id = test_item_id();
        let mut backorderable = created(backorderable_id, true);
        for e in backorderable.handle(&adjust(backorderable_id, -3)).unwrap() {
            backorderable.apply(&e);
        }
        assert_eq!(backorderable.count_on_hand(), -3);
        assert_eq!(backorderable.available_on_hand(), 0);
    }

    #[test]
    fn restock_is_allowed_while_negative_even_after_disabling_backorders() {
        let item_id = test_item_id();
        let mut item = created(item_id, true);
        for e in item.handle(&adjust(item_id, -2)).unwrap() {
            item.apply(&e);
        }
        let off = StockItemCommand::SetBackorderable(SetBackorderable {
            item_id,
            backorderable: false,
            occurred_at: test_time(),
        });
        for e in item.handle(&off).unwrap() {
            item.apply(&e);
        }
        assert!(!item.is_backorderable());

        let events = item.handle(&adjust(item_id, 1)).unwrap();
        match &events[0] {
            StockItemEvent::StockAdjusted(e) => assert_eq!(e.count_on_hand, -1),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn setting_same_backorderable_flag_emits_nothing() {
        let item_id = test_item_id();
        let item = created(item_id, true);
        let events = item
            .handle(&StockItemCommand::SetBackorderable(SetBackorderable {
                item_id,
                backorderable: true,
                occurred_at: test_time(),
            }))
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn zero_delta_is_rejected() {
        let item_id = test_item_id();
        let item = created(item_id, false);
        assert!(matches!(
            item.handle(&adjust(item_id, 0)),
            Err(DomainError::Validation(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: whatever sequence of adjustments is attempted, a
        /// non-backorderable item never ends up with negative stock.
        #[test]
        fn non_backorderable_never_goes_negative(
            deltas in prop::collection::vec(-20i64..20i64, 1..40)
        ) {
            let item_id = test_item_id();
            let mut item = created(item_id, false);

            for delta in deltas {
                if let Ok(events) = item.handle(&adjust(item_id, delta)) {
                    for e in &events {
                        item.apply(e);
                    }
                }
                prop_assert!(item.count_on_hand() >= 0);
            }
        }
    }
}
