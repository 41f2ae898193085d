//! 技能注册表
//!
//! 所有技能实现 Skill trait（name / description / execute），由 SkillRegistry 按名注册与查找。
//! 内置技能：codegen、local_search、summarize、web_scrape。

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::llm::LlmClient;
use crate::skills::{CodegenSkill, LocalSearchSkill, SummarizeSkill, WebScrapeSkill};

/// 技能 trait：名称、描述、异步执行（单输入单输出）
///
/// 失败以 Err(描述) 返回，编排层会原样拼成 "Skill <name>: <描述>"。
#[async_trait]
pub trait Skill: Send + Sync {
    /// 技能名称（Agent 内唯一，也是 plan 中的标识）
    fn name(&self) -> &str;

    /// 技能描述
    fn description(&self) -> &str {
        ""
    }

    async fn execute(&self, input: &str) -> Result<String, String>;
}

/// 以闭包实现的技能，适合临时注册或测试
pub struct FnSkill<F> {
    name: String,
    description: String,
    func: F,
}

impl<F, Fut> FnSkill<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, String>> + Send + 'static,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            func,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[async_trait]
impl<F, Fut> Skill for FnSkill<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, String>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn execute(&self, input: &str) -> Result<String, String> {
        (self.func)(input.to_string()).await
    }
}

/// 技能注册表：按名称存储 Arc<dyn Skill>，支持 register / get / names；
/// 另记录插件技能的超时，供 load_skill 构建清单技能时使用
pub struct SkillRegistry {
    skills: HashMap<String, Arc<dyn Skill>>,
    plugin_timeout_secs: u64,
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self {
            skills: HashMap::new(),
            plugin_timeout_secs: 30,
        }
    }
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册全部内置技能；summarize / codegen 共用传入的 LLM
    pub fn builtin(cfg: &AppConfig, llm: Arc<dyn LlmClient>) -> Self {
        let search_root = cfg
            .app
            .search_root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| std::path::PathBuf::from("."));

        let mut registry = Self::new().with_plugin_timeout(cfg.skills.plugin_timeout_secs);
        registry.register(CodegenSkill::new(llm.clone()));
        registry.register(LocalSearchSkill::new(search_root));
        registry.register(SummarizeSkill::new(llm));
        registry.register(WebScrapeSkill::new(
            cfg.skills.web_timeout_secs,
            cfg.skills.max_scrape_chars,
        ));
        registry
    }

    pub fn with_plugin_timeout(mut self, secs: u64) -> Self {
        self.plugin_timeout_secs = secs;
        self
    }

    pub fn plugin_timeout_secs(&self) -> u64 {
        self.plugin_timeout_secs
    }

    pub fn register(&mut self, skill: impl Skill + 'static) {
        let name = skill.name().to_string();
        self.skills.insert(name, Arc::new(skill));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Skill>> {
        self.skills.get(name).cloned()
    }

    /// 已注册技能名（字典序）
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.skills.keys().cloned().collect();
        names.sort();
        names
    }

    /// 返回 (name, description) 列表，字典序
    pub fn descriptions(&self) -> Vec<(String, String)> {
        self.names()
            .into_iter()
            .filter_map(|name| {
                let desc = self.skills.get(&name)?.description().to_string();
                Some((name, desc))
            })
            .collect()
    }

    /// 所有内置技能实例（字典序）
    pub fn all(&self) -> Vec<Arc<dyn Skill>> {
        self.names()
            .iter()
            .filter_map(|name| self.get(name))
            .collect()
    }
}
