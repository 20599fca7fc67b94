// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use mantrack::config::settings::{CrawlerSettings, LedgerSettings, PathSettings, Settings};
use mantrack::domain::models::ledger::Column;
use mantrack::presentation::cli::handlers::{self, AppContext};
use mantrack::presentation::cli::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// 临时工作目录，包含追踪列表文件和结果目录
#[allow(dead_code)]
pub struct TestWorkspace {
    pub dir: TempDir,
    pub ctx: AppContext,
}

#[allow(dead_code)]
impl TestWorkspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            paths: PathSettings {
                bounty_file: dir.path().join("bounty.json").display().to_string(),
                result_dir: dir.path().join("results").display().to_string(),
            },
            ledger: LedgerSettings {
                delimiter: "|".to_string(),
                columns: Column::DEFAULT_SCHEMA
                    .iter()
                    .map(|c| c.as_str().to_string())
                    .collect(),
            },
            crawler: CrawlerSettings {
                throttle_secs: 0,
                timeout_secs: 5,
                user_agent: "mantrack-test".to_string(),
            },
        };
        Self {
            dir,
            ctx: AppContext::new(settings, true),
        }
    }

    pub fn bounty_path(&self) -> PathBuf {
        self.ctx.settings.bounty_path()
    }

    pub fn result_dir(&self) -> PathBuf {
        self.ctx.settings.result_dir()
    }

    /// 执行命令并返回标准输出内容
    pub async fn run(&self, command: Command) -> anyhow::Result<String> {
        let mut out = Vec::new();
        handlers::execute(&self.ctx, command, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    pub async fn ok(&self, command: Command) -> String {
        self.run(command).await.unwrap()
    }
}

/// `story-info-right` 布局的作品页面
#[allow(dead_code)]
pub fn story_page(title: &str, status: &str, updated: &str, chapter: &str, link: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{title}</title></head>
<body>
  <div class="story-info-right">
    <h1>{title}</h1>
    <table class="variations-tableInfo">
      <tbody>
        <tr><td>Alternative :</td><td>-</td></tr>
        <tr><td>Author(s) :</td><td><a href="/author">Someone</a></td></tr>
        <tr><td>Status :</td><td>{status}</td></tr>
        <tr><td>Genres :</td><td>Action</td></tr>
      </tbody>
    </table>
    <div class="story-info-right-extent">
      <p><span class="stre-label">Updated :</span><span class="stre-value">{updated}</span></p>
      <p><span class="stre-label">View :</span><span class="stre-value">100</span></p>
      <p><span class="stre-label">Rating :</span><span class="stre-value">4.5</span></p>
      <p><span class="stre-label">Latest :</span><span class="stre-value"><a href="{link}">{chapter}</a></span></p>
    </div>
  </div>
</body>
</html>"#
    )
}
