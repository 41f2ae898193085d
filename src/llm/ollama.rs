//! Ollama / llama.cpp 客户端（`POST {base}/api/generate`，非流式）
//!
//! 请求体：{"model", "prompt", "stream": false, "options": {"num_predict"}}；
//! 响应取 `response` 字段并 trim。404 -> NotFound，其它非 2xx -> Http，连接失败 -> Unreachable。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::llm::{LlmClient, LlmError};

pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const LLAMA_CPP_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// 本地模型服务客户端
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    num_predict: u32,
    provider: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, model: &str, num_predict: u32, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "LLM http client build failed, using defaults without timeout");
                Client::new()
            });
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            num_predict,
            provider: "ollama".to_string(),
        }
    }

    /// 标记后端名（llama.cpp 走同一协议）
    pub fn with_provider(mut self, provider: &str) -> Self {
        self.provider = provider.to_string();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {"num_predict": self.num_predict}
        });

        let resp = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::Unreachable
                } else {
                    LlmError::Other(e.to_string())
                }
            })?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LlmError::NotFound);
        }
        if status != StatusCode::OK {
            return Err(LlmError::Http(status.as_u16()));
        }

        let data: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Other(e.to_string()))?;
        Ok(data.response.trim().to_string())
    }

    fn provider(&self) -> &str {
        &self.provider
    }
}
