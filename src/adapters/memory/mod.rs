//! In-memory adapters.

mod in_memory_recorder;

pub use in_memory_recorder::InMemoryResponseRecorder;
