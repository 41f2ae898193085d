//! web_scrape：抓取 URL，HTML 转纯文本并截断
//!
//! 输入即 URL（去首尾空白）；非 2xx 返回 "Scrape error: HTTP <status>"；
//! 对 HTML 响应使用 html2text 提取可读文本，空白折叠为单个空格，结果最多保留 max_chars 个字符。

use std::time::Duration;

use async_trait::async_trait;
use html2text::from_read;
use reqwest::Client;

use crate::skills::Skill;

pub struct WebScrapeSkill {
    client: Client,
    max_chars: usize,
}

/// 简易去除 HTML 标签（html2text 失败时的回退）
fn strip_html_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// 判断内容是否像 HTML（需提取可读文本）
fn looks_like_html(s: &str) -> bool {
    let s = s.trim_start();
    s.starts_with("<!")
        || s.starts_with("<html")
        || s.starts_with("<HTML")
        || (s.contains('<') && (s.contains("</") || s.contains("<meta") || s.contains("<head")))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 按字符（非字节）截断
fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// 将 HTML 转为单行可读文本
pub(crate) fn html_to_text(html: &str) -> String {
    let text = match from_read(html.as_bytes(), 120) {
        Ok(text) if !text.trim().is_empty() => text,
        _ => strip_html_tags(html),
    };
    collapse_whitespace(&text)
}

impl WebScrapeSkill {
    pub fn new(timeout_secs: u64, max_chars: usize) -> Self {
        const USER_AGENT: &str = "Mozilla/5.0 (compatible; agentflow/0.1)";
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "web_scrape client build failed, using defaults without timeout");
                Client::new()
            });
        Self { client, max_chars }
    }

    async fn fetch(&self, url: &str) -> Result<String, String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.status().is_success() {
            return Err(format!("HTTP {}", resp.status().as_u16()));
        }
        let body = resp.text().await.map_err(|e| e.to_string())?;
        let body = body.trim_start_matches('\u{FEFF}');

        let text = if looks_like_html(body) {
            html_to_text(body)
        } else {
            collapse_whitespace(body)
        };
        Ok(truncate_chars(&text, self.max_chars))
    }
}

#[async_trait]
impl Skill for WebScrapeSkill {
    fn name(&self) -> &str {
        "web_scrape"
    }

    fn description(&self) -> &str {
        "Fetch a URL and return its readable text (truncated)."
    }

    async fn execute(&self, input: &str) -> Result<String, String> {
        let url = input.trim();
        tracing::info!(url = %url, "web_scrape fetch");
        self.fetch(url)
            .await
            .map_err(|e| format!("Scrape error: {}", e))
    }
}
