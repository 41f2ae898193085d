//! AgentFlow - Rust 智能体编排工具
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: Planner、Agent、Swarm（延迟打分调度）、Fabric（lead + 知识图谱）、错误类型
//! - **llm**: LLM 客户端抽象与实现（Ollama / llama.cpp / OpenAI 兼容 / Mock）
//! - **memory**: SQLite 键值存储
//! - **observability**: 日志初始化
//! - **skills**: 技能系统（内置技能、清单插件、加载器）

pub mod config;
pub mod core;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod skills;

pub use crate::core::{Agent, AgentBuilder, AgentError, Fabric, Planner, SkillLoadError, Swarm};
pub use crate::memory::KvStore;
pub use crate::skills::{load_skill, Skill, SkillRegistry};
