//! Generative answer source, invoked only on a FAQ miss
//!
//! The knowledge base never calls this itself; the assistant pipeline falls
//! through to it when `lookup` reports no match, and substitutes a fixed
//! apology when the model cannot be reached.

use std::time::Duration;

use crate::config::LlmConfig;
use crate::{Error, Result};

/// Apology used when the generative fallback is unreachable
pub const APOLOGY: &str = "I apologize, but I'm having trouble connecting right now. \
Please try again in a moment.";

/// Response from the chat completions API
#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(serde::Deserialize)]
struct ChatMessage {
    content: String,
}

/// Chat-completion client used as the generative answer source
pub struct ChatClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    system_prompt: String,
    max_tokens: u32,
    temperature: f32,
    max_retries: u32,
}

impl ChatClient {
    /// Create a new chat client
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing or the HTTP client cannot be
    /// built
    pub fn new(api_key: String, llm: &LlmConfig) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::Config(
                "OpenAI API key required for the generative fallback".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(llm.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: llm.model.clone(),
            system_prompt: llm.system_prompt.clone(),
            max_tokens: llm.max_tokens,
            temperature: llm.temperature,
            max_retries: llm.max_retries,
        })
    }

    /// Generate an answer for a question that missed the FAQ base
    ///
    /// Retries a small fixed number of times on transport failure.
    ///
    /// # Errors
    ///
    /// Returns error when every attempt fails
    pub async fn answer(&self, question: &str) -> Result<String> {
        let mut last_error: Option<Error> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tracing::debug!(attempt, "retrying generative answer");
            }
            match self.request(question).await {
                Ok(answer) => return Ok(answer),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "generative answer attempt failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::Answer("no attempts were made".to_string())))
    }

    /// One chat-completions request
    async fn request(&self, question: &str) -> Result<String> {
        #[derive(serde::Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<RequestMessage<'a>>,
            max_tokens: u32,
            temperature: f32,
        }

        #[derive(serde::Serialize)]
        struct RequestMessage<'a> {
            role: &'a str,
            content: &'a str,
        }

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                RequestMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                RequestMessage {
                    role: "user",
                    content: question,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Answer(format!("chat API error {status}: {body}")));
        }

        let result: ChatResponse = response.json().await?;

        result
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| Error::Answer("chat API returned no choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_api_key() {
        let result = ChatClient::new(String::new(), &LlmConfig::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn response_parsing_extracts_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  Hello!  "}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content.trim(), "Hello!");
    }
}
