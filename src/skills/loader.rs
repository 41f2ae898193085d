//! 技能加载器
//!
//! `load_skill(identifier, registry)`：
//! - identifier 是已存在的文件：按 TOML 清单解析，返回第一个可运行的 [[skill]]（PluginSkill）
//! - 否则按内置技能名在 registry 中查找
//!
//! 不缓存，每次调用都重新读取清单。
//!
//! 清单示例：
//! ```toml
//! [[skill]]
//! name = "wordcount"
//! description = "Count words"
//! program = "wc"
//! args = ["-w"]
//! stdin = true
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::core::SkillLoadError;
use crate::skills::{PluginEntry, PluginSkill, Skill, SkillRegistry};

#[derive(Debug, Deserialize)]
struct SkillManifest {
    #[serde(default)]
    skill: Vec<PluginEntry>,
}

/// 解析清单文本，返回第一个可运行条目
fn first_runnable(path: &str, content: &str) -> Result<PluginEntry, SkillLoadError> {
    let manifest: SkillManifest =
        toml::from_str(content).map_err(|e| SkillLoadError::InvalidManifest {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
    manifest
        .skill
        .into_iter()
        .find(PluginEntry::is_runnable)
        .ok_or_else(|| SkillLoadError::NoSkillInManifest(path.to_string()))
}

/// 从清单文件加载技能
pub fn load_manifest(path: &Path, timeout_secs: u64) -> Result<PluginSkill, SkillLoadError> {
    let shown = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| SkillLoadError::Io {
        path: shown.clone(),
        source,
    })?;
    let entry = first_runnable(&shown, &content)?;
    tracing::debug!(skill = %entry.name, manifest = %shown, "Loaded plugin skill");
    Ok(PluginSkill::new(entry, timeout_secs))
}

/// 按文件路径或内置名加载技能
pub fn load_skill(
    identifier: &str,
    registry: &SkillRegistry,
) -> Result<Arc<dyn Skill>, SkillLoadError> {
    let path = Path::new(identifier);
    if path.is_file() {
        let skill = load_manifest(path, registry.plugin_timeout_secs())?;
        return Ok(Arc::new(skill));
    }
    registry
        .get(identifier)
        .ok_or_else(|| SkillLoadError::NotFound(identifier.to_string()))
}
