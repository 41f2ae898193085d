//! OpenAI 兼容 API 客户端
//!
//! 通过 async_openai 调用任意 OpenAI 兼容端点（可配置 base_url）；prompt 作为单条 user 消息发送。

use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI 兼容客户端：持有 Client 与 model 名，取首条 choice 的 content
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    pub fn new(base_url: Option<&str>, model: &str, api_key: Option<&str>) -> Self {
        let api_key = api_key
            .map(String::from)
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .unwrap_or_else(|| "sk-placeholder".to_string());

        let config = OpenAIConfig::new()
            .with_api_base(base_url.unwrap_or(OPENAI_BASE_URL))
            .with_api_key(api_key);

        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }
}

/// 传输层错误按状态映射，与本地后端的前缀一致；API 错误体只保留 code 判断模型不存在
fn map_openai_error(e: OpenAIError) -> LlmError {
    match e {
        OpenAIError::Reqwest(err) if err.is_connect() => LlmError::Unreachable,
        OpenAIError::Reqwest(err) => match err.status() {
            Some(status) if status.as_u16() == 404 => LlmError::NotFound,
            Some(status) => LlmError::Http(status.as_u16()),
            None => LlmError::Other(err.to_string()),
        },
        OpenAIError::ApiError(api) if api.code.as_deref() == Some("model_not_found") => {
            LlmError::NotFound
        }
        other => LlmError::Other(other.to_string()),
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt.to_string())
            .build()
            .map_err(map_openai_error)?;
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![ChatCompletionRequestMessage::User(user)])
            .build()
            .map_err(map_openai_error)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(content.trim().to_string())
    }

    fn provider(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::error::ApiError;

    #[tokio::test]
    async fn test_unreachable_server_is_described() {
        let client = OpenAiClient::new(Some("http://127.0.0.1:9"), "m", Some("k"));
        assert_eq!(client.generate_text("hi").await, "LLM server unreachable.");
    }

    #[test]
    fn test_api_errors() {
        let missing = OpenAIError::ApiError(ApiError {
            message: "The model `m` does not exist".into(),
            r#type: Some("invalid_request_error".into()),
            param: None,
            code: Some("model_not_found".into()),
        });
        assert_eq!(map_openai_error(missing), LlmError::NotFound);

        let invalid = map_openai_error(OpenAIError::InvalidArgument("bad".into()));
        assert_eq!(invalid.to_string(), "LLM error: invalid args: bad");
    }
}
