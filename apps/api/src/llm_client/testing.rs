//! Scripted `TextGenerator` for tests. Replies are chosen by matching a
//! needle against the prompt, so pipelines stay deterministic.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{GenerationConfig, LlmError, TextGenerator};

pub const STUB_MODEL: &str = "stub-model";

struct Rule {
    needle: String,
    reply: Result<String, LlmError>,
    delay: Option<Duration>,
}

pub struct ScriptedGenerator {
    rules: Vec<Rule>,
    fallback: Result<String, LlmError>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            fallback: Err(LlmError::EmptyContent),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Replies with `reply` to any prompt containing `needle`. First match wins.
    pub fn on(mut self, needle: &str, reply: &str) -> Self {
        self.rules.push(Rule {
            needle: needle.to_string(),
            reply: Ok(reply.to_string()),
            delay: None,
        });
        self
    }

    pub fn fail_on(mut self, needle: &str, err: LlmError) -> Self {
        self.rules.push(Rule {
            needle: needle.to_string(),
            reply: Err(err),
            delay: None,
        });
        self
    }

    /// Like `on`, but the reply only arrives after `delay`.
    pub fn slow_on(mut self, needle: &str, reply: &str, delay: Duration) -> Self {
        self.rules.push(Rule {
            needle: needle.to_string(),
            reply: Ok(reply.to_string()),
            delay: Some(delay),
        });
        self
    }

    pub fn otherwise(mut self, reply: Result<String, LlmError>) -> Self {
        self.fallback = reply;
        self
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _config: &GenerationConfig) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        let rule = self.rules.iter().find(|r| prompt.contains(&r.needle));
        match rule {
            Some(rule) => {
                if let Some(delay) = rule.delay {
                    tokio::time::sleep(delay).await;
                }
                rule.reply.clone()
            }
            None => self.fallback.clone(),
        }
    }

    fn model(&self) -> &str {
        STUB_MODEL
    }
}
