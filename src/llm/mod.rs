//! LLM 层：客户端抽象与实现（Ollama / llama.cpp / OpenAI 兼容 / Mock）

pub mod mock;
pub mod ollama;
pub mod openai;
pub mod traits;

use std::sync::Arc;

use crate::config::AppConfig;

pub use mock::MockLlmClient;
pub use ollama::{OllamaClient, LLAMA_CPP_BASE_URL, OLLAMA_BASE_URL};
pub use openai::{OpenAiClient, OPENAI_BASE_URL};
pub use traits::{LlmClient, LlmError, UnconfiguredClient};

/// 按 [llm].provider 创建客户端；未知 provider 返回 UnconfiguredClient（调用时得到 "No LLM configured"）
pub fn create_llm_from_config(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    let provider = cfg.llm.provider.to_lowercase();
    let base = cfg.llm.base_url.as_deref();

    match provider.as_str() {
        "ollama" | "llama.cpp" => {
            let default_base = if provider == "ollama" {
                OLLAMA_BASE_URL
            } else {
                LLAMA_CPP_BASE_URL
            };
            let url = base.unwrap_or(default_base);
            tracing::info!("Using {} LLM ({}) at {}", provider, cfg.llm.model, url);
            Arc::new(
                OllamaClient::new(url, &cfg.llm.model, cfg.llm.num_predict, cfg.llm.timeout_secs)
                    .with_provider(&provider),
            )
        }
        "openai" => {
            tracing::info!("Using OpenAI LLM ({})", cfg.llm.model);
            Arc::new(OpenAiClient::new(base, &cfg.llm.model, None))
        }
        other => {
            tracing::warn!(provider = %other, "Unknown LLM provider, model calls will report 'No LLM configured'");
            Arc::new(UnconfiguredClient)
        }
    }
}
