use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use shipforge_core::{Address, DomainError, DomainResult, LineItemId, Money, OrderId, VariantId};

/// Largest quantity a single line may request; every unit becomes a package entry.
pub const MAX_LINE_QUANTITY: u32 = 10_000;

/// A requested quantity of one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: LineItemId,
    pub variant_id: VariantId,
    pub quantity: u32,
    /// Unit price, in the order currency.
    pub price: Money,
}

/// The order-side input of an allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub id: OrderId,
    pub number: String,
    pub currency: String,
    #[serde(default)]
    pub ship_address: Option<Address>,
    pub line_items: Vec<LineItem>,
    /// Whether payment has been captured; decides pending vs ready shipments.
    #[serde(default)]
    pub paid: bool,
}

impl OrderRequest {
    pub fn new(id: OrderId, number: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            id,
            number: number.into(),
            currency: currency.into(),
            ship_address: None,
            line_items: Vec::new(),
            paid: false,
        }
    }

    pub fn ship_to(mut self, address: Address) -> Self {
        self.ship_address = Some(address);
        self
    }

    pub fn with_line(mut self, id: LineItemId, variant_id: VariantId, quantity: u32, unit_price: i64) -> Self {
        let price = Money::new(unit_price, self.currency.clone());
        self.line_items.push(LineItem {
            id,
            variant_id,
            quantity,
            price,
        });
        self
    }

    pub fn mark_paid(mut self) -> Self {
        self.paid = true;
        self
    }

    pub fn total_quantity(&self) -> u64 {
        self.line_items.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.line_items.is_empty() {
            return Err(DomainError::validation("order has no line items"));
        }
        let mut seen = BTreeSet::new();
        for line in &self.line_items {
            if !seen.insert(line.id) {
                return Err(DomainError::conflict(format!("duplicate line item {}", line.id)));
            }
            if line.quantity == 0 {
                return Err(DomainError::validation("quantity must be positive"));
            }
            if line.quantity > MAX_LINE_QUANTITY {
                return Err(DomainError::validation(format!(
                    "quantity {} exceeds the per-line limit of {MAX_LINE_QUANTITY}",
                    line.quantity
                )));
            }
            if line.price.amount < 0 {
                return Err(DomainError::validation("price cannot be negative"));
            }
            if line.price.currency != self.currency {
                return Err(DomainError::validation(format!(
                    "line item {} is priced in {}, order is in {}",
                    line.id, line.price.currency, self.currency
                )));
            }
        }
        Ok(())
    }
}
