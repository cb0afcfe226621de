//! Shipping cost calculators.
//!
//! Amounts are in minor units of the package currency.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shipforge_core::{Money, Weight};

/// What a calculator needs to know about a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetrics {
    /// Sum of unit prices of everything in the package.
    pub item_total: Money,
    /// Number of units.
    pub quantity: u32,
    pub weight: Weight,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("invalid calculator preference: {0}")]
    InvalidPreference(String),

    #[error("shipping cost overflow")]
    Overflow,
}

/// Calculator attached to a shipping method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Calculator {
    /// Same price for every package.
    FlatRate { amount: i64 },
    /// Percentage of the item total, in basis points (1000 = 10%), rounded half-up.
    FlatPercentItemTotal { percent_bps: u32 },
    /// `first_item` for the first unit of every group of `max_items`
    /// (or only the very first unit when `max_items` is 0), `additional_item`
    /// for the rest.
    FlexiRate {
        first_item: i64,
        additional_item: i64,
        #[serde(default)]
        max_items: u32,
    },
    /// Fixed amount per unit.
    PerItem { amount: i64 },
    /// `normal_amount` below `minimal_amount` of item total, `discount_amount` at or above.
    PriceSack {
        minimal_amount: i64,
        normal_amount: i64,
        discount_amount: i64,
    },
}

impl Calculator {
    pub fn validate(&self) -> Result<(), CalculatorError> {
        let negative = match self {
            Calculator::FlatRate { amount } | Calculator::PerItem { amount } => *amount < 0,
            Calculator::FlatPercentItemTotal { .. } => false,
            Calculator::FlexiRate {
                first_item,
                additional_item,
                ..
            } => *first_item < 0 || *additional_item < 0,
            Calculator::PriceSack {
                minimal_amount,
                normal_amount,
                discount_amount,
            } => *minimal_amount < 0 || *normal_amount < 0 || *discount_amount < 0,
        };
        if negative {
            return Err(CalculatorError::InvalidPreference(format!(
                "{} amounts must not be negative",
                self.name()
            )));
        }
        Ok(())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Calculator::FlatRate { .. } => "flat_rate",
            Calculator::FlatPercentItemTotal { .. } => "flat_percent_item_total",
            Calculator::FlexiRate { .. } => "flexi_rate",
            Calculator::PerItem { .. } => "per_item",
            Calculator::PriceSack { .. } => "price_sack",
        }
    }

    /// Cost of shipping the package, in the package currency.
    pub fn compute(&self, package: &PackageMetrics) -> Result<Money, CalculatorError> {
        self.validate()?;
        let currency = package.item_total.currency.clone();
        let quantity = i64::from(package.quantity);

        let amount = match self {
            Calculator::FlatRate { amount } => *amount,
            Calculator::FlatPercentItemTotal { percent_bps } => {
                let total = i128::from(package.item_total.amount.max(0));
                let scaled = (total * i128::from(*percent_bps) + 5_000) / 10_000;
                i64::try_from(scaled).map_err(|_| CalculatorError::Overflow)?
            }
            Calculator::FlexiRate {
                first_item,
                additional_item,
                max_items,
            } => flexi_rate(package.quantity, *first_item, *additional_item, *max_items)?,
            Calculator::PerItem { amount } => {
                amount.checked_mul(quantity).ok_or(CalculatorError::Overflow)?
            }
            Calculator::PriceSack {
                minimal_amount,
                normal_amount,
                discount_amount,
            } => {
                if package.item_total.amount < *minimal_amount {
                    *normal_amount
                } else {
                    *discount_amount
                }
            }
        };

        Ok(Money::new(amount, currency))
    }
}

fn flexi_rate(
    quantity: u32,
    first_item: i64,
    additional_item: i64,
    max_items: u32,
) -> Result<i64, CalculatorError> {
    if quantity == 0 {
        return Ok(0);
    }
    let firsts = if max_items == 0 {
        1
    } else {
        quantity.div_ceil(max_items)
    };
    let additional = quantity - firsts;

    let first_cost = first_item
        .checked_mul(i64::from(firsts))
        .ok_or(CalculatorError::Overflow)?;
    let additional_cost = additional_item
        .checked_mul(i64::from(additional))
        .ok_or(CalculatorError::Overflow)?;
    first_cost
        .checked_add(additional_cost)
        .ok_or(CalculatorError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn metrics(item_total: i64, quantity: u32) -> PackageMetrics {
        PackageMetrics {
            item_total: Money::new(item_total, "USD"),
            quantity,
            weight: Weight::ZERO,
        }
    }

    #[test]
    fn flat_rate_ignores_contents() {
        let calc = Calculator::FlatRate { amount: 500 };
        assert_eq!(calc.compute(&metrics(10, 1)).unwrap(), Money::new(500, "USD"));
        assert_eq!(calc.compute(&metrics(99_999, 40)).unwrap(), Money::new(500, "USD"));
    }

    #[test]
    fn flat_percent_rounds_half_up() {
        let calc = Calculator::FlatPercentItemTotal { percent_bps: 1000 };
        assert_eq!(calc.compute(&metrics(1005, 1)).unwrap().amount, 101);
        assert_eq!(calc.compute(&metrics(1004, 1)).unwrap().amount, 100);
    }

    #[test]
    fn flexi_rate_without_cap_charges_first_item_once() {
        let calc = Calculator::FlexiRate {
            first_item: 1000,
            additional_item: 200,
            max_items: 0,
        };
        assert_eq!(calc.compute(&metrics(0, 0)).unwrap().amount, 0);
        assert_eq!(calc.compute(&metrics(0, 1)).unwrap().amount, 1000);
        assert_eq!(calc.compute(&metrics(0, 4)).unwrap().amount, 1600);
    }

    #[test]
    fn flexi_rate_with_cap_restarts_every_group() {
        let calc = Calculator::FlexiRate {
            first_item: 1000,
            additional_item: 200,
            max_items: 3,
        };
        // units 0 and 3 start a group: 2 × 1000 + 3 × 200
        assert_eq!(calc.compute(&metrics(0, 5)).unwrap().amount, 2600);
    }

    #[test]
    fn per_item_multiplies() {
        let calc = Calculator::PerItem { amount: 250 };
        assert_eq!(calc.compute(&metrics(0, 3)).unwrap().amount, 750);
    }

    #[test]
    fn price_sack_discounts_at_threshold() {
        let calc = Calculator::PriceSack {
            minimal_amount: 5000,
            normal_amount: 800,
            discount_amount: 0,
        };
        assert_eq!(calc.compute(&metrics(4999, 1)).unwrap().amount, 800);
        assert_eq!(calc.compute(&metrics(5000, 1)).unwrap().amount, 0);
    }

    #[test]
    fn negative_preferences_are_rejected() {
        let calc = Calculator::FlatRate { amount: -1 };
        assert!(matches!(
            calc.compute(&metrics(0, 1)),
            Err(CalculatorError::InvalidPreference(_))
        ));
    }

    #[test]
    fn per_item_overflow_is_reported() {
        let calc = Calculator::PerItem { amount: i64::MAX };
        assert_eq!(calc.compute(&metrics(0, 2)), Err(CalculatorError::Overflow));
    }

    #[test]
    fn calculator_json_is_tagged() {
        let calc: Calculator =
            serde_json::from_str(r#"{"type":"flexi_rate","first_item":500,"additional_item":100}"#)
                .unwrap();
        assert_eq!(
            calc,
            Calculator::FlexiRate {
                first_item: 500,
                additional_item: 100,
                max_items: 0
            }
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the closed form matches charging unit by unit.
        #[test]
        fn flexi_rate_matches_unit_by_unit_pricing(
            quantity in 0u32..60,
            first in 0i64..10_000,
            additional in 0i64..10_000,
            max_items in 0u32..8,
        ) {
            let mut expected = 0i64;
            for i in 0..quantity {
                let starts_group = (max_items == 0 && i == 0) || (max_items > 0 && i % max_items == 0);
                expected += if starts_group { first } else { additional };
            }
            prop_assert_eq!(flexi_rate(quantity, first, additional, max_items).unwrap(), expected);
        }
    }
}
