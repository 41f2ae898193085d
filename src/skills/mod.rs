//! 技能系统
//!
//! 技能（Skill）是具名的单输入单输出能力单元。来源有两种：
//! - 内置注册表：codegen、local_search、summarize、web_scrape
//! - 清单文件：TOML 中的 [[skill]]，以外部程序实现（PluginSkill）

mod loader;
mod local_search;
mod plugin;
mod registry;
mod summarize;
mod web_scrape;

pub use loader::{load_manifest, load_skill};
pub use local_search::LocalSearchSkill;
pub use plugin::{PluginEntry, PluginSkill};
pub use registry::{FnSkill, Skill, SkillRegistry};
pub use summarize::{CodegenSkill, SummarizeSkill};
pub use web_scrape::WebScrapeSkill;
