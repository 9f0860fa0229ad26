//! LLM integration module

pub mod analyzer;
pub mod client;
pub mod jitter;
pub mod prompts;
pub mod response;

pub use analyzer::{Judge, OpenAiJudge};
