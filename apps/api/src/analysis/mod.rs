pub mod fallback;
pub mod handlers;
pub mod prompts;
pub mod provider;
pub mod scoring;
