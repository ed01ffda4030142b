//! Test doubles for the `TextGeneration` seam.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionOptions, LlmError, TextGeneration};

enum Reply {
    Text(String),
    Failure(fn() -> LlmError),
}

/// Returns one canned reply (or failure) for every call and records what it was asked.
pub struct StubLlm {
    reply: Reply,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
    last_options: Mutex<Option<CompletionOptions>>,
}

impl StubLlm {
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(Reply::Text(text.into()))
    }

    pub fn failing(make_error: fn() -> LlmError) -> Self {
        Self::with_reply(Reply::Failure(make_error))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
            last_options: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }

    pub fn last_options(&self) -> Option<CompletionOptions> {
        self.last_options.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGeneration for StubLlm {
    async fn complete(&self, prompt: &str, options: &CompletionOptions) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        *self.last_options.lock().unwrap() = Some(options.clone());

        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Failure(make_error) => Err(make_error()),
        }
    }
}

pub fn test_options() -> CompletionOptions {
    CompletionOptions {
        model: "test-model".to_string(),
        temperature: 0.2,
        max_tokens: 500,
    }
}
