//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, enums, errors)
//! - `survey` - Schema documents, normalization, and answer rules
//! - `session` - Recorded answers and per-session progress

pub mod foundation;
pub mod session;
pub mod survey;
