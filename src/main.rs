//! AgentFlow 命令行入口
//!
//! 初始化日志、加载配置、打开键值库，然后按子命令运行单个 Agent / Swarm / Fabric。

use std::path::PathBuf;

use agentflow::config::{load_config, AppConfig};
use agentflow::core::{connections_key, score_key, AgentBuilder, Fabric, Swarm, DEFAULT_AGENT};
use agentflow::llm::create_llm_from_config;
use agentflow::memory::KvStore;
use agentflow::observability;
use anyhow::Context;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "agentflow", version, about = "Skill planning, swarm and fabric agent orchestration")]
struct Cli {
    /// 额外的配置文件（覆盖 config/default.toml）
    #[arg(long, env = "AGENTFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// 键值库路径（覆盖 [app].store_path）
    #[arg(long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "List built-in skills")]
    Skills,
    #[command(about = "Run a single agent built from the given skills")]
    Run {
        /// 内置技能名或清单文件路径，可重复；为空时使用全部内置技能
        #[arg(long = "skill")]
        skills: Vec<String>,
        query: String,
    },
    #[command(about = "Run the configured agents as a latency-scored swarm")]
    Swarm { name: String, query: String },
    #[command(about = "Run the configured agents as a fabric led by the first agent")]
    Fabric { query: String },
    #[command(about = "Show the persisted swarm score and fabric connections of an agent")]
    Score { agent: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cli = Cli::parse();
    let cfg = load_config(cli.config.clone()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });
    let store_path = cli.store.clone().unwrap_or_else(|| cfg.app.store_path.clone());

    let llm = create_llm_from_config(&cfg);
    let builder = AgentBuilder::from_config(&cfg, llm);

    match cli.command {
        Commands::Skills => {
            for (name, description) in builder.registry().descriptions() {
                println!("- {}: {}", name, description);
            }
        }
        Commands::Run { skills, query } => {
            let agent = builder
                .build_agent(DEFAULT_AGENT, &skills)
                .context("Failed to build agent")?;
            println!("{}", agent.run(&query).await);
        }
        Commands::Swarm { name, query } => {
            let store = KvStore::open(&store_path).context("Failed to open store")?;
            let agents = builder
                .build_agents(&cfg.agents)
                .context("Failed to build agents")?;
            let mut swarm = Swarm::new(name, agents, store);
            println!("{}", swarm.run(&query).await);
        }
        Commands::Fabric { query } => {
            let store = KvStore::open(&store_path).context("Failed to open store")?;
            let agents = builder
                .build_agents(&cfg.agents)
                .context("Failed to build agents")?;
            let mut fabric = Fabric::new(agents, store);
            println!("{}", fabric.run(&query).await);
        }
        Commands::Score { agent } => {
            let store = KvStore::open(&store_path).context("Failed to open store")?;
            let score = store.get(&score_key(&agent))?;
            let edges = store.get(&connections_key(&agent))?;
            println!("score: {}", score.as_deref().unwrap_or("(none)"));
            println!("connections: {}", edges.as_deref().unwrap_or("(none)"));
        }
    }

    Ok(())
}
