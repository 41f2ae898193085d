//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `AGENTFLOW__*` 覆盖（双下划线表示嵌套，如 `AGENTFLOW__LLM__PROVIDER=openai`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub skills: SkillsSection,
    /// [[agents]]：Swarm / Fabric 的成员定义
    #[serde(default)]
    pub agents: Vec<AgentEntry>,
}

/// [app] 段：应用名、键值库路径、本地搜索根目录
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    pub name: Option<String>,
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// local_search 的搜索目录，未设置时用当前目录
    pub search_root: Option<PathBuf>,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: None,
            store_path: default_store_path(),
            search_root: None,
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("agentflow_memory.db")
}

/// [llm] 段：后端选择、模型、生成长度与超时
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSection {
    /// 后端：ollama / llama.cpp / openai；其它值视为未配置
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub base_url: Option<String>,
    /// Ollama options.num_predict
    #[serde(default = "default_num_predict")]
    pub num_predict: u32,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: None,
            num_predict: default_num_predict(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "ollama".to_string()
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_num_predict() -> u32 {
    100
}

fn default_llm_timeout_secs() -> u64 {
    60
}

/// [skills] 段：web_scrape 超时与截断长度、插件技能超时
#[derive(Debug, Clone, Deserialize)]
pub struct SkillsSection {
    #[serde(default = "default_web_timeout_secs")]
    pub web_timeout_secs: u64,
    #[serde(default = "default_max_scrape_chars")]
    pub max_scrape_chars: usize,
    #[serde(default = "default_plugin_timeout_secs")]
    pub plugin_timeout_secs: u64,
}

impl Default for SkillsSection {
    fn default() -> Self {
        Self {
            web_timeout_secs: default_web_timeout_secs(),
            max_scrape_chars: default_max_scrape_chars(),
            plugin_timeout_secs: default_plugin_timeout_secs(),
        }
    }
}

fn default_web_timeout_secs() -> u64 {
    15
}

fn default_max_scrape_chars() -> usize {
    1000
}

fn default_plugin_timeout_secs() -> u64 {
    30
}

/// [[agents]] 条目：Agent 名与技能标识（内置名或清单文件路径）
#[derive(Debug, Clone, Deserialize)]
pub struct AgentEntry {
    pub name: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// 从 config 目录加载配置，环境变量 AGENTFLOW__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 AGENTFLOW__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("AGENTFLOW")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
