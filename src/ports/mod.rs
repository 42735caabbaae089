//! Ports - Interfaces to external collaborators.
//!
//! - `AIProvider` - chat-completion calls answering survey questions
//! - `ResponseRecorder` - durable storage of answers and session progress

mod ai_provider;
mod response_recorder;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use response_recorder::ResponseRecorder;
