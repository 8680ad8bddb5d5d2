//! Deterministic core of the Shopmind catalog assistant.
//!
//! Everything in this crate is synchronous, side-effect-free, and
//! reproducible: parsing a query twice yields the same intent, and
//! retrieving against the same catalog snapshot yields the same ranked
//! list. AI-facing orchestration lives in `shopmind-agent` and is never
//! allowed to change what this crate computed, only to restyle it.

pub mod config;
pub mod domain;
pub mod errors;
pub mod intent;
pub mod retrieval;
pub mod summary;

pub use config::{AppConfig, ConfigError, LoadOptions, LogFormat};
pub use domain::interaction::{EventType, Interaction, NewInteraction};
pub use domain::product::{Product, ProductId};
pub use domain::review::{NewReview, Review, ReviewId};
pub use errors::{ApplicationError, DomainError};
pub use intent::{IntentParser, PriceDirection, QueryIntent};
pub use retrieval::{retrieve, RetrievalMode, CHAT_RESULT_LIMIT, SEARCH_RESULT_LIMIT};
pub use summary::basic_review_summary;
