//! Shipping configuration: zones, categories, methods, calculators and rates.
//!
//! Everything here is plain data plus pure functions; the estimator that
//! turns packages into rates lives with allocation.

pub mod calculator;
pub mod catalog;
pub mod category;
pub mod method;
pub mod rate;
pub mod zone;

pub use calculator::{Calculator, CalculatorError, PackageMetrics};
pub use catalog::{RateQuery, ShippingCatalog};
pub use category::ShippingCategory;
pub use method::{DisplayOn, ShippingMethod};
pub use rate::ShippingRate;
pub use zone::{Zone, ZoneMember};
