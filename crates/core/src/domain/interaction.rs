use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::product::ProductId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    View,
    Cart,
    Purchase,
    Search,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "VIEW",
            Self::Cart => "CART",
            Self::Purchase => "PURCHASE",
            Self::Search => "SEARCH",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "VIEW" => Some(Self::View),
            "CART" => Some(Self::Cart),
            "PURCHASE" => Some(Self::Purchase),
            "SEARCH" => Some(Self::Search),
            _ => None,
        }
    }
}

/// One append-only entry of the interaction log. `product_id` is present
/// for VIEW/CART/PURCHASE and absent for SEARCH; `query_text` is the
/// opposite.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: i64,
    pub user: String,
    pub product_id: Option<ProductId>,
    pub event_type: EventType,
    pub query_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An interaction about to be appended; id and timestamp are assigned by
/// the log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewInteraction {
    pub user: String,
    pub product_id: Option<ProductId>,
    pub event_type: EventType,
    pub query_text: Option<String>,
}

impl NewInteraction {
    pub fn view(user: impl Into<String>, product_id: ProductId) -> Self {
        Self {
            user: user.into(),
            product_id: Some(product_id),
            event_type: EventType::View,
            query_text: None,
        }
    }

    pub fn cart(user: impl Into<String>, product_id: ProductId) -> Self {
        Self {
            user: user.into(),
            product_id: Some(product_id),
            event_type: EventType::Cart,
            query_text: None,
        }
    }

    pub fn purchase(user: impl Into<String>, product_id: ProductId) -> Self {
        Self {
            user: user.into(),
            product_id: Some(product_id),
            event_type: EventType::Purchase,
            query_text: None,
        }
    }

    pub fn search(user: impl Into<String>, query_text: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            product_id: None,
            event_type: EventType::Search,
            query_text: Some(query_text.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EventType;

    #[test]
    fn event_type_round_trips_through_storage_form() {
        for event in [EventType::View, EventType::Cart, EventType::Purchase, EventType::Search] {
            assert_eq!(EventType::parse(event.as_str()), Some(event));
        }
        assert_eq!(EventType::parse("CLICK"), None);
    }
}
