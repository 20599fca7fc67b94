// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::models::ledger::{Column, LedgerSchema, SchemaError};
use crate::engines::reqwest_engine::DEFAULT_USER_AGENT;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error("Invalid ledger schema: {0}")]
    Schema(#[from] SchemaError),
}

/// 应用程序配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Settings {
    /// 文件路径配置
    #[validate(nested)]
    pub paths: PathSettings,
    /// 账本输出配置
    #[validate(nested)]
    pub ledger: LedgerSettings,
    /// 抓取配置
    #[validate(nested)]
    pub crawler: CrawlerSettings,
}

/// 文件路径配置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PathSettings {
    /// 追踪列表文件
    #[validate(length(min = 1, message = "bounty_file cannot be empty"))]
    pub bounty_file: String,
    /// 任务结果目录
    #[validate(length(min = 1, message = "result_dir cannot be empty"))]
    pub result_dir: String,
}

/// 账本输出配置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LedgerSettings {
    /// 列分隔符
    #[validate(length(min = 1, message = "delimiter cannot be empty"))]
    pub delimiter: String,
    /// 输出列名，按顺序
    #[validate(length(min = 1, message = "at least one column is required"))]
    pub columns: Vec<String>,
}

/// 抓取配置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CrawlerSettings {
    /// 相邻两次抓取之间的等待时间（秒）
    #[validate(range(max = 3600))]
    pub throttle_secs: u64,
    /// 单次请求超时时间（秒）
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,
    #[validate(length(min = 1))]
    pub user_agent: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载内置默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 和 `MANTRACK__` 前缀的环境变量
    pub fn new() -> Result<Self, SettingsError> {
        Self::load(None)
    }

    /// 加载配置，`explicit` 为命令行指定的配置文件（必须存在）
    ///
    /// 显式文件的优先级高于 `config/` 目录，低于环境变量。
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let default_columns: Vec<&str> =
            Column::DEFAULT_SCHEMA.iter().map(Column::as_str).collect();

        let mut builder = Config::builder()
            .set_default("paths.bounty_file", "bounty.json")?
            .set_default("paths.result_dir", "results")?
            .set_default("ledger.delimiter", "|")?
            .set_default("ledger.columns", default_columns)?
            .set_default("crawler.throttle_secs", 5)?
            .set_default("crawler.timeout_secs", 30)?
            .set_default("crawler.user_agent", DEFAULT_USER_AGENT)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix("MANTRACK")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("ledger.columns"),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        settings.ledger_schema()?;
        Ok(settings)
    }

    /// 账本输出模式
    pub fn ledger_schema(&self) -> Result<LedgerSchema, SchemaError> {
        LedgerSchema::parse(&self.ledger.columns, &self.ledger.delimiter)
    }

    pub fn bounty_path(&self) -> PathBuf {
        PathBuf::from(&self.paths.bounty_file)
    }

    pub fn result_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.result_dir)
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_secs(self.crawler.throttle_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.crawler.timeout_secs)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
