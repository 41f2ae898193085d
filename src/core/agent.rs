//! Agent：一组具名技能 + LLM + Planner
//!
//! 技能按注册顺序保存，名称唯一（重名在构建时拒绝）；run 交给 Planner 规划并执行。

use std::sync::Arc;

use crate::core::{AgentError, Planner};
use crate::llm::LlmClient;
use crate::skills::Skill;

/// 技能为空时 run 的固定回复
pub const NO_SKILLS: &str = "No skills available";

pub struct Agent {
    name: String,
    skills: Vec<Arc<dyn Skill>>,
    llm: Arc<dyn LlmClient>,
    planner: Planner,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("skills", &self.skill_names())
            .field("llm", &self.llm.provider())
            .finish()
    }
}

impl Agent {
    /// 构建 Agent；同名技能出现两次时返回 DuplicateSkill
    pub fn new(
        name: impl Into<String>,
        skills: Vec<Arc<dyn Skill>>,
        llm: Arc<dyn LlmClient>,
    ) -> Result<Self, AgentError> {
        let name = name.into();
        let mut seen = std::collections::HashSet::new();
        for skill in &skills {
            if !seen.insert(skill.name().to_string()) {
                return Err(AgentError::DuplicateSkill {
                    agent: name,
                    skill: skill.name().to_string(),
                });
            }
        }
        Ok(Self {
            name,
            skills,
            planner: Planner::new(llm.clone()),
            llm,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn skill(&self, name: &str) -> Option<&Arc<dyn Skill>> {
        self.skills.iter().find(|s| s.name() == name)
    }

    /// 技能名（注册顺序）
    pub fn skill_names(&self) -> Vec<String> {
        self.skills.iter().map(|s| s.name().to_string()).collect()
    }

    pub fn llm(&self) -> &Arc<dyn LlmClient> {
        &self.llm
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub async fn run(&self, query: &str) -> String {
        if self.skills.is_empty() {
            return NO_SKILLS.to_string();
        }
        let available = self.skill_names();
        let plan = self.planner.generate_plan(query, &available).await;
        tracing::debug!(agent = %self.name, plan = ?plan, "executing plan");
        self.planner.execute_plan(self, query, &plan).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, MockLlmClient};
    use crate::skills::FnSkill;

    fn echo(name: &'static str) -> Arc<dyn Skill> {
        Arc::new(FnSkill::new(name, move |input: String| async move {
            Ok(format!("{} handled {}", name, input))
        }))
    }

    fn failing(name: &'static str) -> Arc<dyn Skill> {
        Arc::new(FnSkill::new(name, |_input: String| async move {
            Err("Local search error: disk on fire".to_string())
        }))
    }

    fn panicking(name: &'static str) -> Arc<dyn Skill> {
        Arc::new(FnSkill::new(name, |_input: String| async move {
            if true {
                panic!("boom");
            }
            Ok(String::new())
        }))
    }

    #[tokio::test]
    async fn test_no_skills() {
        let agent = Agent::new("empty", vec![], Arc::new(MockLlmClient::replying("a"))).unwrap();
        for q in ["", "anything", "No skills available"] {
            assert_eq!(agent.run(q).await, "No skills available");
        }
    }

    #[test]
    fn test_duplicate_skill_rejected() {
        let err = Agent::new(
            "dup",
            vec![echo("a"), echo("a")],
            Arc::new(MockLlmClient::default()),
        )
        .unwrap_err();
        assert!(matches!(err, AgentError::DuplicateSkill { ref skill, .. } if skill == "a"));
    }

    #[tokio::test]
    async fn test_run_executes_plan_with_original_query() {
        let llm = Arc::new(MockLlmClient::replying("b, a, b"));
        let agent = Agent::new("worker", vec![echo("a"), echo("b")], llm).unwrap();
        assert_eq!(
            agent.run("q1").await,
            "Skill b: b handled q1\nSkill a: a handled q1\nSkill b: b handled q1"
        );
    }

    #[tokio::test]
    async fn test_missing_skill_reported_inline() {
        let agent = Agent::new("worker", vec![echo("a")], Arc::new(MockLlmClient::default())).unwrap();
        let plan = vec!["ghost".to_string(), "a".to_string()];
        let out = agent.planner().execute_plan(&agent, "q", &plan).await;
        assert_eq!(out, "Skill ghost not found\nSkill a: a handled q");
        assert_eq!(agent.planner().execute_plan(&agent, "q", &[]).await, "");
    }

    #[tokio::test]
    async fn test_fallback_plan_against_agent_without_local_search() {
        let agent = Agent::new(
            "worker",
            vec![echo("a")],
            Arc::new(MockLlmClient::failing(LlmError::Unreachable)),
        )
        .unwrap();
        assert_eq!(agent.run("q").await, "Skill local_search not found");
    }

    #[tokio::test]
    async fn test_failing_and_panicking_skills_do_not_abort_plan() {
        let llm = Arc::new(MockLlmClient::replying("bad, boom, ok"));
        let agent = Agent::new(
            "worker",
            vec![failing("bad"), panicking("boom"), echo("ok")],
            llm,
        )
        .unwrap();
        let out = agent.run("q").await;
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Skill bad: Local search error: disk on fire");
        assert_eq!(lines[1], "Skill boom: Skill panicked: boom");
        assert_eq!(lines[2], "Skill ok: ok handled q");
    }
}
