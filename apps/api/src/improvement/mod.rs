pub mod handlers;
pub mod prompts;
pub mod resume_parser;
pub mod rewrite;
pub mod suggestions;
