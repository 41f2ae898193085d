//! LLM 客户端抽象
//!
//! 所有后端（Ollama / llama.cpp / OpenAI 兼容 / Mock）实现 LlmClient：
//! generate 返回 Result，供 Planner 判断失败并回退；generate_text 永不失败，
//! 把错误转为带固定前缀的可读字符串，供技能直接返回给用户。

use async_trait::async_trait;
use thiserror::Error;

/// 模型调用错误；Display 即对外展示的文字
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("No LLM configured")]
    NotConfigured,

    #[error("LLM server not found or model unavailable.")]
    NotFound,

    #[error("LLM error: HTTP {0}")]
    Http(u16),

    #[error("LLM server unreachable.")]
    Unreachable,

    #[error("LLM error: {0}")]
    Other(String),
}

/// LLM 客户端 trait：单轮 prompt -> 文本
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;

    /// 不抛错的版本：失败时返回错误描述（如 "LLM server unreachable."）
    async fn generate_text(&self, prompt: &str) -> String {
        match self.generate(prompt).await {
            Ok(text) => text,
            Err(e) => e.to_string(),
        }
    }

    /// 后端名（日志用）
    fn provider(&self) -> &str {
        "unknown"
    }
}

/// 未配置后端时使用：所有调用返回 NotConfigured
#[derive(Debug, Default)]
pub struct UnconfiguredClient;

#[async_trait]
impl LlmClient for UnconfiguredClient {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::NotConfigured)
    }

    fn provider(&self) -> &str {
        "none"
    }
}
