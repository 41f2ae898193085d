//! summarize / codegen：把输入包进固定 prompt 交给 LLM

use std::sync::Arc;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError};
use crate::skills::Skill;

pub struct SummarizeSkill {
    llm: Arc<dyn LlmClient>,
}

impl SummarizeSkill {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Skill for SummarizeSkill {
    fn name(&self) -> &str {
        "summarize"
    }

    fn description(&self) -> &str {
        "Summarize the given content with the language model."
    }

    async fn execute(&self, input: &str) -> Result<String, String> {
        let prompt = format!("Summarize the following: {}", input);
        Ok(self.llm.generate_text(&prompt).await.trim().to_string())
    }
}

pub struct CodegenSkill {
    llm: Arc<dyn LlmClient>,
}

impl CodegenSkill {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Skill for CodegenSkill {
    fn name(&self) -> &str {
        "codegen"
    }

    fn description(&self) -> &str {
        "Generate code for the given request with the language model."
    }

    async fn execute(&self, input: &str) -> Result<String, String> {
        let prompt = format!("Write code for: {}", input);
        match self.llm.generate(&prompt).await {
            Ok(code) if code.trim().is_empty() => Ok("No code generated".to_string()),
            Ok(code) => Ok(code),
            Err(LlmError::Http(status)) => Err(format!("Codegen error: HTTP {}", status)),
            Err(e) => Err(format!("Codegen error: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;

    #[tokio::test]
    async fn test_summarize_prompt_and_trim() {
        let llm = Arc::new(MockLlmClient::replying("  short version \n"));
        let skill = SummarizeSkill::new(llm.clone());
        assert_eq!(skill.execute("long text").await.unwrap(), "short version");
        assert_eq!(llm.prompts(), vec!["Summarize the following: long text"]);
    }

    #[tokio::test]
    async fn test_summarize_degrades_to_description() {
        let skill = SummarizeSkill::new(Arc::new(MockLlmClient::failing(LlmError::Unreachable)));
        assert_eq!(skill.execute("x").await.unwrap(), "LLM server unreachable.");
    }

    #[tokio::test]
    async fn test_codegen_outcomes() {
        let llm = Arc::new(MockLlmClient::replying("fn main() {}"));
        let skill = CodegenSkill::new(llm.clone());
        assert_eq!(skill.execute("hello world").await.unwrap(), "fn main() {}");
        assert_eq!(llm.prompts(), vec!["Write code for: hello world"]);

        let empty = CodegenSkill::new(Arc::new(MockLlmClient::replying("")));
        assert_eq!(empty.execute("x").await.unwrap(), "No code generated");

        let failing = CodegenSkill::new(Arc::new(MockLlmClient::failing(LlmError::Http(503))));
        assert_eq!(failing.execute("x").await.unwrap_err(), "Codegen error: HTTP 503");
    }
}
