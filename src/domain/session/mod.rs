//! Session domain module.
//!
//! A session groups every question/answer pair of one survey run and
//! tracks its progress.

mod response;
mod summary;

pub use response::{AnsweredQuestion, StoredResponse};
pub use summary::SessionSummary;
