//! 错误类型
//!
//! 编排层只有少数几处会以 Err 向上抛出：Agent 构建（重名技能、技能加载）与配置；
//! 技能加载失败单独用 SkillLoadError 表示。其余故障（网络、模型、技能执行）一律降级为字符串结果。

use thiserror::Error;

/// Agent / Swarm / Fabric 构建与持久化过程中可能出现的错误
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Duplicate skill '{skill}' in agent '{agent}'")]
    DuplicateSkill { agent: String, skill: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error(transparent)]
    SkillLoad(#[from] SkillLoadError),
}

/// 动态加载技能失败（内置名不存在、清单文件无法解析或不含可用技能）
#[derive(Error, Debug)]
pub enum SkillLoadError {
    #[error("Failed to load skill {0}: not a file and not a built-in skill")]
    NotFound(String),

    #[error("Failed to load skill {path}: {reason}")]
    InvalidManifest { path: String, reason: String },

    #[error("Failed to load skill {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load skill {0}: manifest contains no runnable skill")]
    NoSkillInManifest(String),
}
