//! Agent 构建器：把技能标识（内置名或清单路径）解析为 Agent
//!
//! 配置中的 [[agents]] 与命令行 --skill 共用同一套解析逻辑。

use std::sync::Arc;

use crate::config::{AgentEntry, AppConfig};
use crate::core::{Agent, AgentError};
use crate::llm::LlmClient;
use crate::skills::{load_skill, SkillRegistry};

/// 未指定名字时的默认 Agent 名
pub const DEFAULT_AGENT: &str = "default_agent";

pub struct AgentBuilder {
    registry: SkillRegistry,
    llm: Arc<dyn LlmClient>,
}

impl AgentBuilder {
    pub fn new(registry: SkillRegistry, llm: Arc<dyn LlmClient>) -> Self {
        Self { registry, llm }
    }

    /// 使用内置技能注册表
    pub fn from_config(cfg: &AppConfig, llm: Arc<dyn LlmClient>) -> Self {
        Self::new(SkillRegistry::builtin(cfg, llm.clone()), llm)
    }

    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    /// 构建单个 Agent；identifiers 为空时装入全部内置技能
    pub fn build_agent(&self, name: &str, identifiers: &[String]) -> Result<Agent, AgentError> {
        let skills = if identifiers.is_empty() {
            self.registry.all()
        } else {
            identifiers
                .iter()
                .map(|id| load_skill(id, &self.registry))
                .collect::<Result<Vec<_>, _>>()?
        };
        Agent::new(name, skills, self.llm.clone())
    }

    /// 按 [[agents]] 构建；为空时返回一个装有全部内置技能的默认 Agent
    pub fn build_agents(&self, entries: &[AgentEntry]) -> Result<Vec<Agent>, AgentError> {
        if entries.is_empty() {
            return Ok(vec![self.build_agent(DEFAULT_AGENT, &[])?]);
        }
        entries
            .iter()
            .map(|entry| {
                if entry.name.trim().is_empty() {
                    return Err(AgentError::Config("agent entry without a name".to_string()));
                }
                self.build_agent(&entry.name, &entry.skills)
            })
            .collect()
    }
}
