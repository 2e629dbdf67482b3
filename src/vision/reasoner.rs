// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hazard reasoning capability via a VLM sidecar
//!
//! The reasoner sends the evidence image and the jurisdiction-specific
//! inspection prompt to a vision-language model served behind an
//! OpenAI-compatible API, and returns the raw narrative text.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::vision::image_utils::DecodedImage;

// --- OpenAI-compatible serde structs ---

#[derive(serde::Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(serde::Serialize)]
struct ChatMessage {
    role: String,
    content: serde_json::Value,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Vision-language reasoning capability.
///
/// The returned narrative is unbounded free text with no structural
/// guarantees; an empty string is a valid output. Unavailability must
/// surface as `Err`, never as empty text.
#[async_trait]
pub trait Reasoner: Send + Sync {
    async fn reason(&self, image: &DecodedImage, prompt: &str) -> Result<String>;
}

/// Client for a VLM sidecar service exposing an OpenAI-compatible API
pub struct VlmReasoner {
    client: Client,
    endpoint: String,
    model_name: String,
}

impl VlmReasoner {
    /// Create a new VLM reasoner client
    pub fn new(endpoint: &str, model_name: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(120)).build()?;

        let endpoint = endpoint.trim_end_matches('/').to_string();
        info!(
            "VLM reasoner configured: endpoint={}, model={}",
            endpoint, model_name
        );

        Ok(Self {
            client,
            endpoint,
            model_name: model_name.to_string(),
        })
    }

    /// Get the model name
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Check if the VLM sidecar is healthy
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.endpoint))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!("VLM health check failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl Reasoner for VlmReasoner {
    async fn reason(&self, image: &DecodedImage, prompt: &str) -> Result<String> {
        let data_url = format!(
            "data:image/{};base64,{}",
            image.format_extension(),
            image.base64
        );

        let request = ChatRequest {
            model: self.model_name.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: serde_json::json!([
                    {"type": "text", "text": prompt},
                    {"type": "image_url", "image_url": {"url": data_url}}
                ]),
            }],
            max_tokens: 512,
            temperature: 0.2,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.endpoint))
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let chat_response: ChatResponse = response.json().await?;
        let narrative = chat_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(narrative)
    }
}
