//! Advisor plumbing: HTTP client, prompt context and response validation

pub mod client;
pub mod context;
pub mod parser;

pub use client::{ApiFormat, LlmClient};
pub use context::AdvisoryRequest;
pub use parser::{parse_sequence, SequenceRules};
