//! Swarm：按延迟打分的 Agent 池，每次只运行当前分数最高的一个
//!
//! 分数持久化在键值库 `swarm_score_<agent>`，每次 run 开始时重新读取（不跨调用缓存）。
//! 选中 Agent 运行耗时 t 秒后：reward = 1/(t+1)，score' = 0.9*score + 0.1*reward。
//! 同分时取最早注册的 Agent。多进程共享同一库时分数更新是后写者胜。

use std::collections::HashMap;
use std::time::Instant;

use crate::core::Agent;
use crate::memory::KvStore;

/// 新 Agent 的初始分数
pub const DEFAULT_SCORE: f64 = 1.0;
/// EMA 衰减系数
pub const SCORE_DECAY: f64 = 0.9;
/// 池为空时 run 的固定回复
pub const NO_AGENTS: &str = "No agents available";

pub fn score_key(agent_name: &str) -> String {
    format!("swarm_score_{}", agent_name)
}

/// 一次 EMA 更新
pub fn updated_score(score: f64, elapsed_secs: f64) -> f64 {
    let reward = 1.0 / (elapsed_secs + 1.0);
    SCORE_DECAY * score + (1.0 - SCORE_DECAY) * reward
}

pub struct Swarm {
    name: String,
    agents: Vec<Agent>,
    scores: HashMap<String, f64>,
    store: KvStore,
}

impl Swarm {
    pub fn new(name: impl Into<String>, agents: Vec<Agent>, store: KvStore) -> Self {
        let mut swarm = Self {
            name: name.into(),
            agents: Vec::new(),
            scores: HashMap::new(),
            store,
        };
        for agent in agents {
            swarm.add_agent(agent);
        }
        swarm
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 加入 Agent；同名 Agent 原位替换（保留注册顺序），内存分数重置为 1.0
    pub fn add_agent(&mut self, agent: Agent) {
        let name = agent.name().to_string();
        match self.agents.iter().position(|a| a.name() == name) {
            Some(idx) => self.agents[idx] = agent,
            None => self.agents.push(agent),
        }
        self.scores.insert(name, DEFAULT_SCORE);
    }

    pub fn agent_names(&self) -> Vec<String> {
        self.agents.iter().map(|a| a.name().to_string()).collect()
    }

    /// 内存中的分数（最近一次 run 之后的值）
    pub fn score(&self, agent_name: &str) -> Option<f64> {
        self.scores.get(agent_name).copied()
    }

    /// 从键值库刷新分数；缺失或无法解析的条目保留内存值
    fn refresh_scores(&mut self) {
        for agent in &self.agents {
            let key = score_key(agent.name());
            match self.store.get(&key) {
                Ok(Some(raw)) => match raw.trim().parse::<f64>() {
                    Ok(score) if score.is_finite() => {
                        self.scores.insert(agent.name().to_string(), score);
                    }
                    _ => tracing::warn!(key = %key, value = %raw, "ignoring unparsable swarm score"),
                },
                Ok(None) => {}
                Err(e) => tracing::warn!(key = %key, error = %e, "failed to load swarm score"),
            }
        }
    }

    /// 最高分 Agent 的下标；严格大于才替换，故同分取最早注册者
    fn select_best(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, agent) in self.agents.iter().enumerate() {
            let score = self.score(agent.name()).unwrap_or(DEFAULT_SCORE);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((idx, score)),
            }
        }
        best.map(|(idx, _)| idx)
    }

    pub async fn run(&mut self, query: &str) -> String {
        self.refresh_scores();
        let Some(idx) = self.select_best() else {
            return NO_AGENTS.to_string();
        };

        let agent = &self.agents[idx];
        let agent_name = agent.name().to_string();
        let score = self.score(&agent_name).unwrap_or(DEFAULT_SCORE);
        tracing::info!(swarm = %self.name, agent = %agent_name, score, "swarm selected agent");

        let start = Instant::now();
        let result = agent.run(query).await;
        let elapsed = start.elapsed().as_secs_f64();

        let new_score = updated_score(score, elapsed);
        self.scores.insert(agent_name.clone(), new_score);
        if let Err(e) = self.store.put(&score_key(&agent_name), &new_score.to_string()) {
            tracing::warn!(agent = %agent_name, error = %e, "failed to persist swarm score");
        }
        tracing::info!(
            swarm = %self.name,
            agent = %agent_name,
            elapsed_secs = elapsed,
            score = new_score,
            "swarm score updated"
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;
    use crate::skills::{FnSkill, Skill};
    use std::sync::Arc;

    fn agent(name: &'static str) -> Agent {
        let skill: Arc<dyn Skill> = Arc::new(FnSkill::new("work", move |_q: String| async move {
            Ok(format!("done by {}", name))
        }));
        Agent::new(name, vec![skill], Arc::new(MockLlmClient::replying("work"))).unwrap()
    }

    #[test]
    fn test_updated_score_formula() {
        assert!((updated_score(1.0, 0.0) - 1.0).abs() < 1e-12);
        assert!((updated_score(5.0, 1.0) - (4.5 + 0.05)).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_selects_highest_persisted_score() {
        let store = KvStore::open_in_memory().unwrap();
        store.put(&score_key("slow"), "1.0").unwrap();
        store.put(&score_key("fast"), "5.0").unwrap();

        let mut swarm = Swarm::new("s", vec![agent("slow"), agent("fast")], store.clone());
        let out = swarm.run("q").await;
        assert_eq!(out, "Skill work: done by fast");

        let persisted: f64 = store.get(&score_key("fast")).unwrap().unwrap().parse().unwrap();
        assert!(persisted < 5.0 && persisted > 4.5);
        assert_eq!(store.get(&score_key("slow")).unwrap().as_deref(), Some("1.0"));
    }

    #[tokio::test]
    async fn test_tie_goes_to_first_registered() {
        let store = KvStore::open_in_memory().unwrap();
        let mut swarm = Swarm::new("s", vec![agent("first"), agent("second")], store);
        assert_eq!(swarm.run("q").await, "Skill work: done by first");
    }

    #[tokio::test]
    async fn test_score_converges_toward_one() {
        let store = KvStore::open_in_memory().unwrap();
        store.put(&score_key("only"), "0.0").unwrap();
        let mut swarm = Swarm::new("s", vec![agent("only")], store.clone());

        for _ in 0..50 {
            swarm.run("q").await;
            assert!(swarm.score("only").unwrap() <= 1.0);
        }
        let score = swarm.score("only").unwrap();
        assert!(score > 0.98, "score {score} did not approach 1.0");

        let persisted: f64 = store.get(&score_key("only")).unwrap().unwrap().parse().unwrap();
        assert!((persisted - score).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_unparsable_score_keeps_default_and_empty_swarm() {
        let store = KvStore::open_in_memory().unwrap();
        store.put(&score_key("a"), "not-a-number").unwrap();
        let mut swarm = Swarm::new("s", vec![agent("a")], store);
        swarm.run("q").await;
        let score = swarm.score("a").unwrap();
        assert!(score <= 1.0 && score > 0.9);

        let mut empty = Swarm::new("e", vec![], KvStore::open_in_memory().unwrap());
        assert_eq!(empty.run("q").await, "No agents available");
    }

    #[test]
    fn test_add_agent_resets_score_and_keeps_order() {
        let mut swarm = Swarm::new("s", vec![agent("a"), agent("b")], KvStore::open_in_memory().unwrap());
        swarm.scores.insert("a".into(), 3.0);
        swarm.add_agent(agent("a"));
        assert_eq!(swarm.score("a"), Some(1.0));
        assert_eq!(swarm.agent_names(), vec!["a", "b"]);
    }
}
