//! OpenAI-compatible chat-completions generator.

use std::env;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use ureq::Agent;

use visaid_core::diagram::{DiagramMarkup, DiagramType};

use super::{GenerateError, MarkupGenerator, prompt};
use crate::config::GeneratorConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage; 2],
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Generates markup by asking a chat-completions endpoint.
///
/// The API key is read from the environment on every call, so a generator
/// can be built before the key is available.
#[derive(Debug, Clone)]
pub struct ChatGenerator {
    config: GeneratorConfig,
    agent: Agent,
}

impl ChatGenerator {
    pub fn new(config: &GeneratorConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(config.timeout()))
            .build()
            .into();
        Self {
            config: config.clone(),
            agent,
        }
    }

    fn api_key(&self) -> Result<String, GenerateError> {
        let name = self.config.api_key_env();
        env::var(name)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GenerateError::MissingApiKey(name.to_string()))
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.endpoint().trim_end_matches('/')
        )
    }
}

impl MarkupGenerator for ChatGenerator {
    fn generate(
        &self,
        diagram_type: DiagramType,
        prompt: &str,
    ) -> Result<DiagramMarkup, GenerateError> {
        let api_key = self.api_key()?;
        let request = build_request(&self.config, diagram_type, prompt);

        info!(
            model = self.config.model(),
            diagram_type = diagram_type.tag();
            "Requesting diagram markup"
        );

        let mut response = self
            .agent
            .post(&self.completions_url())
            .header("Authorization", &format!("Bearer {api_key}"))
            .send_json(&request)?;
        let response: ChatResponse = response.body_mut().read_json()?;

        let markup = extract_markup(response)?;
        debug!(chars = markup.as_str().len(); "Markup received");
        Ok(markup)
    }
}

fn build_request<'a>(
    config: &'a GeneratorConfig,
    diagram_type: DiagramType,
    prompt: &str,
) -> ChatRequest<'a> {
    ChatRequest {
        model: config.model(),
        temperature: config.temperature(),
        messages: [
            ChatMessage {
                role: "system".to_string(),
                content: prompt::system_message(diagram_type),
            },
            ChatMessage {
                role: "user".to_string(),
                content: prompt::user_message(prompt),
            },
        ],
    }
}

fn extract_markup(response: ChatResponse) -> Result<DiagramMarkup, GenerateError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(GenerateError::EmptyResponse)?;

    let markup = prompt::strip_fences(&content);
    if markup.is_empty() {
        return Err(GenerateError::EmptyResponse);
    }
    Ok(DiagramMarkup::new(markup))
}
