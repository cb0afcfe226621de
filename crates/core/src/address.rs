//! Postal address subset needed for zone matching.

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Destination or origin address.
///
/// Only the parts that participate in zone membership are modelled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    /// ISO 3166-1 alpha-2 country code (e.g. "US").
    pub country: String,
    /// Subdivision code within the country (e.g. "NY"), if known.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zipcode: Option<String>,
}

impl ValueObject for Address {}

impl Address {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            state: None,
            zipcode: None,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn in_country(&self, country: &str) -> bool {
        self.country.eq_ignore_ascii_case(country)
    }

    pub fn in_state(&self, country: &str, state: &str) -> bool {
        self.in_country(country)
            && self
                .state
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(state))
    }
}
