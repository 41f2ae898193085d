//! 插件技能：由清单文件 [[skill]] 描述，运行「程序 + 参数模板」实现动态扩展
//!
//! 参数模板中 {{input}} 替换为技能输入；stdin = true 时同时把输入写入子进程标准输入。
//! 执行时无 shell，直接 exec program + substituted args，带超时与日志。

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::skills::Skill;

/// 清单中的单个 [[skill]] 表
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub stdin: bool,
}

impl PluginEntry {
    /// name 与 program 均非空才可运行
    pub fn is_runnable(&self) -> bool {
        !self.name.trim().is_empty() && !self.program.trim().is_empty()
    }
}

/// 从清单条目构建的插件技能
pub struct PluginSkill {
    entry: PluginEntry,
    timeout_secs: u64,
}

impl PluginSkill {
    pub fn new(entry: PluginEntry, timeout_secs: u64) -> Self {
        Self {
            entry,
            timeout_secs,
        }
    }

    fn substitute(&self, input: &str) -> Vec<String> {
        self.entry
            .args
            .iter()
            .map(|tpl| tpl.replace("{{input}}", input))
            .collect()
    }

    async fn run(&self, input: &str) -> Result<String, String> {
        let args = self.substitute(input);
        tracing::info!(skill = %self.entry.name, program = %self.entry.program, "plugin skill invoke");

        let mut child = Command::new(&self.entry.program)
            .args(&args)
            .stdin(if self.entry.stdin {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("spawn failed: {}", e))?;

        // 输入在独立任务中写入，与读取 stdout 并行，避免大输入时管道互相阻塞
        let feeder = child.stdin.take().map(|mut stdin| {
            let bytes = input.as_bytes().to_vec();
            let skill = self.entry.name.clone();
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(&bytes).await {
                    tracing::debug!(skill = %skill, error = %e, "plugin stdin write stopped");
                }
            })
        });

        let timeout = Duration::from_secs(self.timeout_secs);
        let waited = tokio::time::timeout(timeout, child.wait_with_output()).await;
        if let Some(feeder) = feeder {
            feeder.abort();
        }
        let output = waited
            .map_err(|_| format!("timeout after {}s", self.timeout_secs))?
            .map_err(|e| format!("wait failed: {}", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "exit {:?}: {}",
                output.status.code(),
                stderr.trim()
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl Skill for PluginSkill {
    fn name(&self) -> &str {
        &self.entry.name
    }

    fn description(&self) -> &str {
        &self.entry.description
    }

    async fn execute(&self, input: &str) -> Result<String, String> {
        self.run(input)
            .await
            .map_err(|e| format!("Plugin {} error: {}", self.entry.name, e))
    }
}
