//! Mock LLM 客户端（用于测试，无需模型服务）
//!
//! 按顺序返回预置回复，队列耗尽后重复最后一条；也可固定返回某个错误。收到的 prompt 会被记录。

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError};

/// Mock 客户端：脚本化回复
#[derive(Debug, Default)]
pub struct MockLlmClient {
    replies: Mutex<VecDeque<String>>,
    last: Mutex<Option<String>>,
    error: Option<LlmError>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlmClient {
    /// 每次调用依次返回 replies 中的一条
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// 每次调用都返回同一条回复
    pub fn replying(reply: impl Into<String>) -> Self {
        Self::with_replies([reply.into()])
    }

    /// 每次调用都失败
    pub fn failing(error: LlmError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// 已收到的 prompt（按调用顺序）
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Some(err) = &self.error {
            return Err(err.clone());
        }

        let next = self.replies.lock().ok().and_then(|mut q| q.pop_front());
        let mut last = self
            .last
            .lock()
            .map_err(|e| LlmError::Other(e.to_string()))?;
        match next {
            Some(reply) => {
                *last = Some(reply.clone());
                Ok(reply)
            }
            None => Ok(last.clone().unwrap_or_default()),
        }
    }

    fn provider(&self) -> &str {
        "mock"
    }
}
