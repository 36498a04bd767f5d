//! `foodsaver-ai`
//!
//! **Responsibility:** the surplus recommendation engine.
//!
//! This crate is intentionally **not** part of the entity model:
//! - It must not depend on inventory entities (items, bids, claims).
//! - It must not mutate anything; `recommend` is a pure function of its input
//!   and the evaluation date.
//! - It emits **recommendations**, which callers attach to items.

pub mod engine;
pub mod recommendation;

pub use engine::{
    RecommendationInput, RecommendationPolicy, Recommender, RuleBasedRecommender,
    days_until_expiry, recommend,
};
pub use recommendation::{Recommendation, Strategy, UrgencyLevel};
