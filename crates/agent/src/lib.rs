//! AI-facing orchestration for the Shopmind catalog assistant.
//!
//! Every operation here follows the same discipline:
//! 1. Compute the answer deterministically from the catalog first
//!    (`shopmind-core` parsing and retrieval).
//! 2. Optionally hand that already-computed answer to the AI backend for
//!    restyling or ranking.
//! 3. Fall back to the deterministic answer, with a visible notice, when
//!    the backend returns nothing.
//!
//! # Key Types
//!
//! - `TextGenerator` - the single AI capability; empty text on failure,
//!   never an error (see `llm`)
//! - `ChatResponder` - grounded chat replies and deterministic search
//! - `RecommendationEngine` - behavioral ranking with popularity fallback
//! - `ReviewSummarizer` / `DescriptionGenerator` - per-product content
//!
//! # Trust Boundary
//!
//! The AI is never a data source. It reorders or rewords products the
//! deterministic core already selected; it cannot add products, and its
//! silence is always survivable.

pub mod chat;
pub mod describe;
pub mod llm;
pub mod recommend;
pub mod summarize;

pub use chat::{ChatResponder, AI_BUSY_NOTICE, NO_MATCH_REPLY};
pub use describe::DescriptionGenerator;
pub use llm::{generate_json, GeminiClient, NoopGenerator, TextGenerator};
pub use recommend::{RecommendationEngine, RECOMMENDATION_LIMIT};
pub use summarize::{ReviewSummarizer, AI_QUOTA_NOTICE};
