use serde::{Deserialize, Serialize};

use shipforge_core::{Address, Entity, ZoneId};

/// One member of a zone: a whole country or one of its states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZoneMember {
    Country { country: String },
    State { country: String, state: String },
}

impl ZoneMember {
    pub fn contains(&self, address: &Address) -> bool {
        match self {
            ZoneMember::Country { country } => address.in_country(country),
            ZoneMember::State { country, state } => address.in_state(country, state),
        }
    }
}

/// A geographic region shipping methods are offered in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    #[serde(default)]
    pub members: Vec<ZoneMember>,
}

impl Zone {
    pub fn new(id: ZoneId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.members.push(ZoneMember::Country {
            country: country.into(),
        });
        self
    }

    pub fn with_state(mut self, country: impl Into<String>, state: impl Into<String>) -> Self {
        self.members.push(ZoneMember::State {
            country: country.into(),
            state: state.into(),
        });
        self
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.members.iter().any(|m| m.contains(address))
    }
}

impl Entity for Zone {
    type Id = ZoneId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_member_requires_matching_country_and_state() {
        let zone = Zone::new(ZoneId::from_u128(1), "east coast")
            .with_state("US", "NY")
            .with_state("US", "MA");

        assert!(zone.contains(&Address::new("US").with_state("ny")));
        assert!(!zone.contains(&Address::new("US").with_state("CA")));
        assert!(!zone.contains(&Address::new("US")));
        assert!(!zone.contains(&Address::new("CA").with_state("NY")));
    }

    #[test]
    fn country_member_matches_any_state() {
        let zone = Zone::new(ZoneId::from_u128(2), "north america")
            .with_country("US")
            .with_country("CA");
        assert!(zone.contains(&Address::new("ca")));
        assert!(zone.contains(&Address::new("US").with_state("TX")));
        assert!(!zone.contains(&Address::new("MX")));
    }

    #[test]
    fn members_use_tagged_json() {
        let member: ZoneMember =
            serde_json::from_str(r#"{"kind":"state","country":"US","state":"NY"}"#).unwrap();
        assert_eq!(
            member,
            ZoneMember::State {
                country: "US".into(),
                state: "NY".into()
            }
        );
    }
}
