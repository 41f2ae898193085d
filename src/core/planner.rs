//! Planner：让 LLM 挑选技能序列，并按顺序执行
//!
//! generate_plan 把 LLM 回复按逗号切分，只保留与可用技能名完全一致（区分大小写）的项，
//! 保留重复与顺序；LLM 调用失败时回退为 ["local_search"]。
//! execute_plan 对每个技能都传入原始 query（技能之间不串联输出），每一步包在独立的故障边界里。

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;

use crate::core::Agent;
use crate::llm::LlmClient;

/// LLM 不可用时的默认计划
pub const FALLBACK_SKILL: &str = "local_search";

/// 生成规划 prompt；技能列表按 `['a', 'b']` 形式嵌入
pub fn plan_prompt(query: &str, available: &[String]) -> String {
    let names = available
        .iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Given the query '{}' and available skills [{}], suggest a sequence of skills to execute.",
        query, names
    )
}

/// 解析 LLM 回复：逗号切分、trim、过滤未知名
pub fn parse_plan(output: &str, available: &[String]) -> Vec<String> {
    output
        .split(',')
        .map(str::trim)
        .filter(|name| available.iter().any(|a| a == name))
        .map(String::from)
        .collect()
}

/// Planner：持有 LLM
pub struct Planner {
    llm: Arc<dyn LlmClient>,
}

impl Planner {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn generate_plan(&self, query: &str, available: &[String]) -> Vec<String> {
        let prompt = plan_prompt(query, available);
        match self.llm.generate(&prompt).await {
            Ok(output) => {
                let plan = parse_plan(&output, available);
                tracing::debug!(steps = plan.len(), "plan parsed");
                plan
            }
            Err(e) => {
                tracing::warn!(error = %e, "planner LLM call failed, falling back to {}", FALLBACK_SKILL);
                vec![FALLBACK_SKILL.to_string()]
            }
        }
    }

    /// 顺序执行计划，每步输出一行，以 '\n' 连接；空计划返回空串
    pub async fn execute_plan(&self, agent: &Agent, query: &str, plan: &[String]) -> String {
        let mut results = Vec::with_capacity(plan.len());
        for skill_name in plan {
            let Some(skill) = agent.skill(skill_name) else {
                results.push(format!("Skill {} not found", skill_name));
                continue;
            };

            let start = Instant::now();
            let outcome = AssertUnwindSafe(skill.execute(query)).catch_unwind().await;
            let (text, status) = match outcome {
                Ok(Ok(output)) => (output, "ok"),
                Ok(Err(e)) => (e, "error"),
                Err(panic) => (panic_message(panic.as_ref()), "panic"),
            };

            let audit = serde_json::json!({
                "event": "skill_audit",
                "agent": agent.name(),
                "skill": skill_name,
                "outcome": status,
                "duration_ms": start.elapsed().as_millis() as u64,
            });
            tracing::info!(audit = %audit.to_string(), "skill");

            results.push(format!("Skill {}: {}", skill_name, text));
        }
        results.join("\n")
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("Skill panicked: {}", detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, MockLlmClient};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_keeps_order_and_duplicates() {
        let available = names(&["codegen", "summarize", "local_search"]);
        let plan = parse_plan(" summarize, codegen ,Codegen, bogus, summarize", &available);
        assert_eq!(plan, names(&["summarize", "codegen", "summarize"]));
        assert!(parse_plan("", &available).is_empty());
    }

    #[test]
    fn test_prompt_embeds_query_and_names() {
        let prompt = plan_prompt("find notes", &names(&["a", "b"]));
        assert_eq!(
            prompt,
            "Given the query 'find notes' and available skills ['a', 'b'], suggest a sequence of skills to execute."
        );
    }

    #[tokio::test]
    async fn test_fallback_on_llm_failure() {
        let planner = Planner::new(Arc::new(MockLlmClient::failing(LlmError::Unreachable)));
        for (query, available) in [("q", names(&["codegen"])), ("", Vec::new())] {
            assert_eq!(
                planner.generate_plan(query, &available).await,
                vec!["local_search".to_string()]
            );
        }
    }

    #[tokio::test]
    async fn test_generate_plan_uses_llm_reply() {
        let llm = Arc::new(MockLlmClient::replying("codegen, summarize"));
        let planner = Planner::new(llm.clone());
        let plan = planner
            .generate_plan("build it", &names(&["summarize", "codegen"]))
            .await;
        assert_eq!(plan, names(&["codegen", "summarize"]));
        assert!(llm.prompts()[0].contains("'build it'"));
    }
}
