//! 核心编排层：错误、Planner、Agent、Swarm、Fabric 与构建器

pub mod agent;
pub mod builder;
pub mod error;
pub mod fabric;
pub mod planner;
pub mod swarm;

pub use agent::{Agent, NO_SKILLS};
pub use builder::{AgentBuilder, DEFAULT_AGENT};
pub use error::{AgentError, SkillLoadError};
pub use fabric::{connections_key, Fabric};
pub use planner::{parse_plan, plan_prompt, Planner, FALLBACK_SKILL};
pub use swarm::{score_key, updated_score, Swarm, DEFAULT_SCORE, NO_AGENTS};
