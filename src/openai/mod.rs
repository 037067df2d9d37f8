mod request;
mod response;

use self::{
    request::{ChatCompletionRequest, Message, ResponseFormat},
    response::ChatCompletionResponse,
};
use crate::{
    error::Result,
    http::{HttpClient, ResponseHandler, USER_AGENT_NAME},
};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::de::DeserializeOwned;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const MAX_TOKENS: u32 = 2500;
const EMPTY_CONTENT: &str = "{}";

/// Produces JSON text answering a prompt.
pub trait TextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Generates from `prompt` and parses the answer into `T`.
pub async fn generate_json<G, T>(generator: &G, prompt: &str) -> Result<T>
where
    G: TextGenerator,
    T: DeserializeOwned,
{
    let content = generator.generate(prompt).await?;

    serde_json::from_str::<T>(&content).map_err(|err| {
        log::error!("Unexpected completion content: {}", content);
        err.into()
    })
}

pub struct OpenAiClient {
    http: HttpClient,
    api_key: String,
    model: String,
    api_base: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        OpenAiClient {
            http: HttpClient::new(),
            api_key: api_key.into(),
            model: model.into(),
            api_base: OPENAI_API_BASE.to_owned(),
        }
    }

    #[cfg(test)]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

impl TextGenerator for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let uri = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        log::debug!("requesting completion from {} with {}", uri, self.model);

        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .http
            .post(&uri)
            .bearer_auth(&self.api_key)
            .header(USER_AGENT, USER_AGENT_NAME)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_string(&request)?)
            .send()
            .await?
            .handle()
            .await?;

        let completion = serde_json::from_str::<ChatCompletionResponse>(&response)?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_else(|| EMPTY_CONTENT.to_owned()))
    }
}
