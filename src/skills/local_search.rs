//! local_search：在搜索根目录（非递归）下查找文件名包含查询串的文件
//!
//! 查询串先转义再拼成 `*<query>*`，避免用户输入中的 `[`、`?` 被当作通配符。

use std::path::PathBuf;

use async_trait::async_trait;
use glob::{glob_with, MatchOptions, Pattern};

use crate::skills::Skill;

pub struct LocalSearchSkill {
    root: PathBuf,
}

impl LocalSearchSkill {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn search(&self, query: &str) -> Result<Vec<String>, String> {
        let root = Pattern::escape(&self.root.to_string_lossy());
        let pattern = format!("{}/*{}*", root.trim_end_matches('/'), Pattern::escape(query));
        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };

        let mut matches = Vec::new();
        for entry in glob_with(&pattern, options).map_err(|e| e.to_string())? {
            let path = entry.map_err(|e| e.to_string())?;
            if let Some(name) = path.file_name() {
                matches.push(name.to_string_lossy().into_owned());
            }
        }
        Ok(matches)
    }
}

#[async_trait]
impl Skill for LocalSearchSkill {
    fn name(&self) -> &str {
        "local_search"
    }

    fn description(&self) -> &str {
        "Search for files in the working directory whose name contains the query."
    }

    async fn execute(&self, input: &str) -> Result<String, String> {
        let matches = self
            .search(input)
            .map_err(|e| format!("Local search error: {}", e))?;
        if matches.is_empty() {
            Ok("No matching files found.".to_string())
        } else {
            Ok(format!("Found files: {}", matches.join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_finds_matching_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("report_2024.txt"), "x").unwrap();
        std::fs::write(dir.path().join("notes.md"), "x").unwrap();
        std::fs::write(dir.path().join("old_report.csv"), "x").unwrap();

        let skill = LocalSearchSkill::new(dir.path());
        let out = skill.execute("report").await.unwrap();
        assert!(out.starts_with("Found files: "));
        assert!(out.contains("report_2024.txt"));
        assert!(out.contains("old_report.csv"));
        assert!(!out.contains("notes.md"));
    }

    #[tokio::test]
    async fn test_no_match_and_special_chars() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();

        let skill = LocalSearchSkill::new(dir.path());
        assert_eq!(skill.execute("zzz").await.unwrap(), "No matching files found.");
        // 未转义时 "[" 会导致 PatternError
        assert_eq!(skill.execute("[").await.unwrap(), "No matching files found.");
    }
}
