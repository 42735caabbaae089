//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - LLM providers (OpenAI, mock)
//! - `memory` - In-memory response recorder
//! - `postgres` - PostgreSQL response recorder
//! - `schema` - Schema document loading from disk

pub mod ai;
pub mod memory;
pub mod postgres;
pub mod schema;

pub use ai::{MockAIProvider, OpenAIConfig, OpenAIProvider};
pub use memory::InMemoryResponseRecorder;
pub use postgres::PostgresResponseRecorder;
pub use schema::load_schema;
