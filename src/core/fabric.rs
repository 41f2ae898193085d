//! Fabric：始终由首个注册的 Agent（lead）处理查询，并把其它 Agent 记为 lead 的连接
//!
//! 连接以逗号拼接存于 `fabric_connections_<lead>`。每次 run 先从库中重载 lead 的连接，
//! 再为每个非 lead Agent 追加一条边（不去重）并写回。其它 Agent 从不被调用。

use std::collections::HashMap;

use crate::core::{Agent, NO_AGENTS};
use crate::memory::KvStore;

pub fn connections_key(agent_name: &str) -> String {
    format!("fabric_connections_{}", agent_name)
}

pub struct Fabric {
    agents: Vec<Agent>,
    knowledge_graph: HashMap<String, Vec<String>>,
    store: KvStore,
}

impl Fabric {
    pub fn new(agents: Vec<Agent>, store: KvStore) -> Self {
        Self {
            agents,
            knowledge_graph: HashMap::new(),
            store,
        }
    }

    pub fn lead(&self) -> Option<&Agent> {
        self.agents.first()
    }

    /// 某 Agent 的出边（内存视图）
    pub fn connections(&self, agent_name: &str) -> &[String] {
        self.knowledge_graph
            .get(agent_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn reload_connections(&mut self, lead: &str) {
        match self.store.get(&connections_key(lead)) {
            Ok(Some(raw)) if !raw.is_empty() => {
                let edges = raw.split(',').map(String::from).collect();
                self.knowledge_graph.insert(lead.to_string(), edges);
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(agent = %lead, error = %e, "failed to load fabric connections"),
        }
    }

    pub async fn run(&mut self, query: &str) -> String {
        let Some(lead_name) = self.lead().map(|a| a.name().to_string()) else {
            return NO_AGENTS.to_string();
        };
        self.reload_connections(&lead_name);

        let result = self.agents[0].run(query).await;

        let others: Vec<String> = self
            .agents
            .iter()
            .skip(1)
            .map(|a| a.name().to_string())
            .collect();
        if !others.is_empty() {
            let edges = self.knowledge_graph.entry(lead_name.clone()).or_default();
            edges.extend(others);
            let joined = edges.join(",");
            tracing::debug!(lead = %lead_name, edges = edges.len(), "fabric connections updated");
            if let Err(e) = self.store.put(&connections_key(&lead_name), &joined) {
                tracing::warn!(lead = %lead_name, error = %e, "failed to persist fabric connections");
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlmClient;
    use crate::skills::{FnSkill, Skill};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_agent(name: &'static str, calls: Arc<AtomicUsize>) -> Agent {
        let skill: Arc<dyn Skill> = Arc::new(FnSkill::new("work", move |q: String| {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(format!("{} answered {}", name, q))
            }
        }));
        Agent::new(name, vec![skill], Arc::new(MockLlmClient::replying("work"))).unwrap()
    }

    #[tokio::test]
    async fn test_lead_runs_and_edges_persist() {
        let store = KvStore::open_in_memory().unwrap();
        let (a, b, c) = (
            Arc::new(AtomicUsize::new(0)),
            Arc::new(AtomicUsize::new(0)),
            Arc::new(AtomicUsize::new(0)),
        );
        let mut fabric = Fabric::new(
            vec![
                counting_agent("A", a.clone()),
                counting_agent("B", b.clone()),
                counting_agent("C", c.clone()),
            ],
            store.clone(),
        );

        let out = fabric.run("q").await;
        assert_eq!(out, "Skill work: A answered q");
        assert_eq!(store.get(&connections_key("A")).unwrap().as_deref(), Some("B,C"));
        assert_eq!(fabric.connections("A"), ["B", "C"]);
        assert_eq!(a.load(Ordering::SeqCst), 1);
        assert_eq!(b.load(Ordering::SeqCst), 0);
        assert_eq!(c.load(Ordering::SeqCst), 0);

        // 第二次 run 追加，不去重
        fabric.run("q").await;
        assert_eq!(
            store.get(&connections_key("A")).unwrap().as_deref(),
            Some("B,C,B,C")
        );
    }

    #[tokio::test]
    async fn test_reloads_edges_from_store() {
        let store = KvStore::open_in_memory().unwrap();
        store.put(&connections_key("A"), "X").unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let mut fabric = Fabric::new(
            vec![counting_agent("A", calls.clone()), counting_agent("B", calls)],
            store.clone(),
        );
        fabric.run("q").await;
        assert_eq!(store.get(&connections_key("A")).unwrap().as_deref(), Some("X,B"));
    }

    #[tokio::test]
    async fn test_single_agent_and_empty_fabric() {
        let store = KvStore::open_in_memory().unwrap();
        let mut solo = Fabric::new(
            vec![counting_agent("A", Arc::new(AtomicUsize::new(0)))],
            store.clone(),
        );
        assert_eq!(solo.run("q").await, "Skill work: A answered q");
        assert_eq!(store.get(&connections_key("A")).unwrap(), None);

        let mut empty = Fabric::new(vec![], store);
        assert_eq!(empty.run("q").await, "No agents available");
    }
}
