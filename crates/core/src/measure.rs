//! Physical measurements.

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Weight in whole grams.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weight(u64);

impl ValueObject for Weight {}

impl Weight {
    pub const ZERO: Weight = Weight(0);

    pub fn from_grams(grams: u64) -> Self {
        Self(grams)
    }

    pub fn from_kilograms(kg: u64) -> Self {
        Self(kg.saturating_mul(1000))
    }

    pub fn grams(self) -> u64 {
        self.0
    }

    pub fn saturating_add(self, other: Weight) -> Weight {
        Weight(self.0.saturating_add(other.0))
    }
}

impl core::iter::Sum for Weight {
    fn sum<I: Iterator<Item = Weight>>(iter: I) -> Self {
        iter.fold(Weight::ZERO, Weight::saturating_add)
    }
}

impl core::fmt::Display for Weight {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}g", self.0)
    }
}
