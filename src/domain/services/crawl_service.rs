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

use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::domain::models::bounty::{Group, Target};
use crate::domain::models::job::JobMeta;
use crate::domain::models::record::LedgerEntry;
use crate::domain::repositories::watch_list_repository::{WatchListError, WatchListRepository};
use crate::domain::services::extraction_service::RecordExtractor;
use crate::domain::services::watch_list_service::WatchListStore;
use crate::engines::traits::FetchEngine;
use crate::infrastructure::ledger::job_ledger::JobLedger;
use crate::utils::errors::LedgerError;

/// 抓取任务错误
///
/// 只有追踪列表和账本的错误会中止任务，单个目标的失败不会。
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error(transparent)]
    WatchList(#[from] WatchListError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// 单个目标的失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeFailure {
    pub website: String,
    pub alias: String,
    pub reason: String,
}

/// 一次抓取任务的结果
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub meta: JobMeta,
    pub failures: Vec<ScrapeFailure>,
}

/// 爬取服务
///
/// 按追踪列表顺序逐个抓取目标：抓取 → 提取 → 写入账本。
/// 相邻两次抓取之间固定等待 `throttle`，第一次抓取前不等待。
pub struct CrawlService<F: FetchEngine> {
    /// 抓取引擎
    engine: Arc<F>,
    /// 记录提取器
    extractor: RecordExtractor,
    /// 抓取间隔
    throttle: Duration,
}

impl<F: FetchEngine> CrawlService<F> {
    pub fn new(engine: Arc<F>, extractor: RecordExtractor, throttle: Duration) -> Self {
        Self {
            engine,
            extractor,
            throttle,
        }
    }

    /// 执行一次完整的抓取任务
    ///
    /// 先读取追踪列表，列表无效时不会创建任务目录。
    pub async fn run<R: WatchListRepository>(
        &self,
        store: &WatchListStore<R>,
        ledger: &mut JobLedger,
    ) -> Result<CrawlReport, CrawlError> {
        let groups = store.read().await?;
        self.crawl_groups(&groups, ledger).await
    }

    /// 抓取给定分组中的全部目标
    pub async fn crawl_groups(
        &self,
        groups: &[Group],
        ledger: &mut JobLedger,
    ) -> Result<CrawlReport, CrawlError> {
        let job_id = ledger.init(now()).await?;
        let total: usize = groups.iter().map(|g| g.targets.len()).sum();
        info!(job_id = %job_id, targets = total, "Crawl started");

        let mut failures = Vec::new();
        let mut first = true;
        for group in groups {
            for target in &group.targets {
                if !first && !self.throttle.is_zero() {
                    tokio::time::sleep(self.throttle).await;
                }
                first = false;

                let (entry, failure) = self.scrape_target(&group.website, target).await;
                ledger.record_scrape(&entry).await?;
                failures.extend(failure);
            }
        }

        let meta = ledger.close(now()).await?;
        info!(
            job_id = %meta.job_id,
            attempted = meta.attempted,
            succeeded = meta.succeeded,
            failed = failures.len(),
            "Crawl finished"
        );
        Ok(CrawlReport { meta, failures })
    }

    /// 抓取并提取单个目标
    ///
    /// 总是返回一条账本条目；失败时条目不带记录，同时返回失败原因。
    /// 非2xx响应只是被记录的状态，仍会尝试提取。
    #[instrument(skip(self, target), fields(alias = %target.alias, engine = self.engine.name()))]
    pub async fn scrape_target(
        &self,
        website: &str,
        target: &Target,
    ) -> (LedgerEntry, Option<ScrapeFailure>) {
        let failure = |reason: String| ScrapeFailure {
            website: website.to_string(),
            alias: target.alias.clone(),
            reason,
        };

        let response = match self.engine.fetch(&target.url).await {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %target.url, error = %e, "Fetch failed");
                return (
                    LedgerEntry::new(website, target.alias.as_str(), None, None),
                    Some(failure(e.to_string())),
                );
            }
        };

        let status = Some(response.status_code);
        match self.extractor.extract(&response.content) {
            Ok(record) => {
                info!(
                    status = response.status_code,
                    latest_chapter = %record.latest_chapter,
                    "Target scraped"
                );
                (
                    LedgerEntry::new(website, target.alias.as_str(), Some(record), status),
                    None,
                )
            }
            Err(e) => {
                warn!(status = response.status_code, error = %e, "Extraction failed");
                (
                    LedgerEntry::new(website, target.alias.as_str(), None, status),
                    Some(failure(e.to_string())),
                )
            }
        }
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
#[path = "crawl_service_test.rs"]
mod tests;
