// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Local, NaiveDateTime};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::{LOG_FILE, META_FILE, OUTPUT_FILE};
use crate::domain::models::job::{JobId, JobMeta, JOB_TIME_FORMAT};
use crate::domain::models::ledger::LedgerSchema;
use crate::domain::models::record::LedgerEntry;
use crate::utils::errors::LedgerError;
use crate::utils::fs_utils;

/// 账本状态
#[derive(Debug)]
enum LedgerState {
    Uninitialized,
    Open { meta: JobMeta, dir: PathBuf },
    Closed { meta: JobMeta, dir: PathBuf },
}

/// 任务账本写入器
///
/// 状态流转为 未初始化 → 打开 → 关闭，只能前进。
/// 日志和输出文件只做追加；任务中断时留下的是没有结束时间的打开状态账本。
#[derive(Debug)]
pub struct JobLedger {
    result_dir: PathBuf,
    schema: LedgerSchema,
    bounty_path: String,
    state: LedgerState,
}

impl JobLedger {
    pub fn new(
        result_dir: impl Into<PathBuf>,
        schema: LedgerSchema,
        bounty_path: impl Into<String>,
    ) -> Self {
        Self {
            result_dir: result_dir.into(),
            schema,
            bounty_path: bounty_path.into(),
            state: LedgerState::Uninitialized,
        }
    }

    pub fn schema(&self) -> &LedgerSchema {
        &self.schema
    }

    /// 当前任务标识，未初始化时为空
    pub fn job_id(&self) -> Option<&JobId> {
        self.meta().map(|m| &m.job_id)
    }

    /// 当前任务目录，未初始化时为空
    pub fn job_dir(&self) -> Option<&Path> {
        match &self.state {
            LedgerState::Uninitialized => None,
            LedgerState::Open { dir, .. } | LedgerState::Closed { dir, .. } => Some(dir),
        }
    }

    pub fn meta(&self) -> Option<&JobMeta> {
        match &self.state {
            LedgerState::Uninitialized => None,
            LedgerState::Open { meta, .. } | LedgerState::Closed { meta, .. } => Some(meta),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, LedgerState::Open { .. })
    }

    /// 开始新任务
    ///
    /// 创建任务目录，写入输出表头、日志开始标记和元数据。
    pub async fn init(&mut self, now: NaiveDateTime) -> Result<JobId, LedgerError> {
        if let Some(job_id) = self.job_id() {
            return Err(LedgerError::AlreadyInitialized(job_id.to_string()));
        }

        let (job_id, dir) = self.create_job_dir(now).await?;

        fs_utils::append_line(&dir.join(OUTPUT_FILE), &self.schema.header_line()).await?;
        let log = dir.join(LOG_FILE);
        fs_utils::append_line(
            &log,
            &log_line(now, &format!("[Job] Starting Job. Job Id: {}", job_id)),
        )
        .await?;
        fs_utils::append_line(
            &log,
            &log_line(
                now,
                &format!("[Job] Start Time: {}", now.format(JOB_TIME_FORMAT)),
            ),
        )
        .await?;

        let meta = JobMeta {
            job_id: job_id.clone(),
            start_time: now,
            end_time: None,
            bounty_path: self.bounty_path.clone(),
            result_path: dir.display().to_string(),
            attempted: 0,
            succeeded: 0,
        };
        write_meta(&dir, &meta).await?;

        info!(job_id = %job_id, dir = %dir.display(), "Job started");
        self.state = LedgerState::Open { meta, dir };
        Ok(job_id)
    }

    /// 以同一秒内的下一个序号创建任务目录
    ///
    /// `create_dir` 在目录已存在时失败，此时换下一个序号重试，
    /// 因此并发启动的任务也不会共用目录。
    async fn create_job_dir(&self, now: NaiveDateTime) -> Result<(JobId, PathBuf), LedgerError> {
        fs::create_dir_all(&self.result_dir).await?;
        let prefix = JobId::prefix(now);

        let mut sequence = 0;
        let mut entries = fs::read_dir(&self.result_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            if let Some(used) = name.to_str().and_then(|n| JobId::sequence_for(n, &prefix)) {
                sequence = sequence.max(used + 1);
            }
        }

        loop {
            let job_id = JobId::new(now, sequence);
            let dir = self.result_dir.join(job_id.as_str());
            match fs::create_dir(&dir).await {
                Ok(()) => return Ok((job_id, dir)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => sequence += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// 记录一次抓取尝试
    ///
    /// 总是追加一行日志；条目带有记录时再追加一行输出。
    pub async fn record_scrape(&mut self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        let (meta, dir) = match &mut self.state {
            LedgerState::Uninitialized => return Err(LedgerError::LedgerNotOpen),
            LedgerState::Closed { .. } => return Err(LedgerError::LedgerClosed),
            LedgerState::Open { meta, dir } => (meta, dir),
        };

        let status = entry
            .fetch_status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".to_string());
        fs_utils::append_line(
            &dir.join(LOG_FILE),
            &log_line(
                Local::now().naive_local(),
                &format!("[Scraping] {} - Response: {}", entry.alias, status),
            ),
        )
        .await?;
        meta.attempted += 1;

        if entry.is_success() {
            fs_utils::append_line(&dir.join(OUTPUT_FILE), &self.schema.render_row(entry))
                .await?;
            meta.succeeded += 1;
        }
        debug!(
            website = %entry.website,
            alias = %entry.alias,
            success = entry.is_success(),
            "Scrape recorded"
        );
        Ok(())
    }

    /// 结束任务
    ///
    /// 先带着结束时间和计数重写元数据，再追加结束标记。
    /// 失败时账本保持打开，可以重试。
    pub async fn close(&mut self, now: NaiveDateTime) -> Result<JobMeta, LedgerError> {
        let state = std::mem::replace(&mut self.state, LedgerState::Uninitialized);
        let (mut meta, dir) = match state {
            LedgerState::Open { meta, dir } => (meta, dir),
            other => {
                let err = match other {
                    LedgerState::Closed { .. } => LedgerError::LedgerClosed,
                    _ => LedgerError::LedgerNotOpen,
                };
                self.state = other;
                return Err(err);
            }
        };

        meta.end_time = Some(now);
        if let Err(e) = seal(&dir, &meta, now).await {
            meta.end_time = None;
            self.state = LedgerState::Open { meta, dir };
            return Err(e);
        }

        info!(
            job_id = %meta.job_id,
            attempted = meta.attempted,
            succeeded = meta.succeeded,
            "Job finished"
        );
        self.state = LedgerState::Closed {
            meta: meta.clone(),
            dir,
        };
        Ok(meta)
    }
}

/// 日志行格式 `[dd/mm/YYYY HH:MM:SS] message`
pub fn log_line(at: NaiveDateTime, message: &str) -> String {
    format!("[{}] {}", at.format(JOB_TIME_FORMAT), message)
}

async fn seal(dir: &Path, meta: &JobMeta, now: NaiveDateTime) -> Result<(), LedgerError> {
    // meta first: a failed close must not leave an end marker behind
    write_meta(dir, meta).await?;
    fs_utils::append_line(
        &dir.join(LOG_FILE),
        &log_line(
            now,
            &format!("[Job] End Time: {}", now.format(JOB_TIME_FORMAT)),
        ),
    )
    .await?;
    Ok(())
}

async fn write_meta(dir: &Path, meta: &JobMeta) -> Result<(), LedgerError> {
    let mut json = serde_json::to_string_pretty(meta)?;
    json.push('\n');
    fs_utils::write_atomic(&dir.join(META_FILE), json.as_bytes()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::record::Record;
    use crate::infrastructure::ledger::ledger_reader;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn success(alias: &str) -> LedgerEntry {
        LedgerEntry::new(
            "mangakakalot",
            alias,
            Some(Record {
                title: format!("Title {}", alias),
                ongoing: true,
                updated_at: at(8, 0, 0),
                latest_chapter: "Chapter 1".to_string(),
                latest_chapter_link: format!("https://example.com/{}/1", alias),
            }),
            Some(200),
        )
    }

    #[tokio::test]
    async fn test_three_scrapes_then_close() {
        let dir = TempDir::new().unwrap();
        let mut ledger = JobLedger::new(dir.path(), LedgerSchema::default(), "bounty.json");

        let job_id = ledger.init(at(9, 0, 0)).await.unwrap();
        for alias in ["a", "b", "c"] {
            ledger.record_scrape(&success(alias)).await.unwrap();
        }
        let meta = ledger.close(at(9, 1, 0)).await.unwrap();

        let job_dir = dir.path().join(job_id.as_str());
        let output = fs::read_to_string(job_dir.join(OUTPUT_FILE)).await.unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], LedgerSchema::default().header_line());

        let log = fs::read_to_string(job_dir.join(LOG_FILE)).await.unwrap();
        let log: Vec<&str> = log.lines().collect();
        assert_eq!(log.len(), 6);
        assert_eq!(
            log[0],
            format!("[16/10/2026 09:00:00] [Job] Starting Job. Job Id: {}", job_id)
        );
        assert_eq!(log[1], "[16/10/2026 09:00:00] [Job] Start Time: 16/10/2026 09:00:00");
        for (line, alias) in log[2..5].iter().zip(["a", "b", "c"]) {
            assert!(line.ends_with(&format!("[Scraping] {} - Response: 200", alias)));
        }
        assert_eq!(log[5], "[16/10/2026 09:01:00] [Job] End Time: 16/10/2026 09:01:00");

        assert_eq!(meta.attempted, 3);
        assert_eq!(meta.succeeded, 3);
        assert!(meta.is_sealed());
    }

    #[tokio::test]
    async fn test_failed_scrape_is_logged_only() {
        let dir = TempDir::new().unwrap();
        let mut ledger = JobLedger::new(dir.path(), LedgerSchema::default(), "bounty.json");
        ledger.init(at(9, 0, 0)).await.unwrap();

        ledger
            .record_scrape(&LedgerEntry::new("mangakakalot", "gone", None, None))
            .await
            .unwrap();
        ledger.record_scrape(&success("a")).await.unwrap();

        let job_dir = ledger.job_dir().unwrap().to_path_buf();
        let output = fs::read_to_string(job_dir.join(OUTPUT_FILE)).await.unwrap();
        assert_eq!(output.lines().count(), 2);
        let log = fs::read_to_string(job_dir.join(LOG_FILE)).await.unwrap();
        assert!(log.contains("[Scraping] gone - Response: none"));
        assert_eq!(ledger.meta().unwrap().attempted, 2);
        assert_eq!(ledger.meta().unwrap().succeeded, 1);
    }

    #[tokio::test]
    async fn test_state_machine_rejects_out_of_order_calls() {
        let dir = TempDir::new().unwrap();
        let mut ledger = JobLedger::new(dir.path(), LedgerSchema::default(), "bounty.json");

        assert!(matches!(
            ledger.record_scrape(&success("a")).await,
            Err(LedgerError::LedgerNotOpen)
        ));
        assert!(matches!(
            ledger.close(at(9, 0, 0)).await,
            Err(LedgerError::LedgerNotOpen)
        ));

        ledger.init(at(9, 0, 0)).await.unwrap();
        assert!(matches!(
            ledger.init(at(9, 0, 1)).await,
            Err(LedgerError::AlreadyInitialized(_))
        ));

        ledger.close(at(9, 0, 2)).await.unwrap();
        assert!(!ledger.is_open());
        assert!(matches!(
            ledger.record_scrape(&success("a")).await,
            Err(LedgerError::LedgerClosed)
        ));
        assert!(matches!(
            ledger.close(at(9, 0, 3)).await,
            Err(LedgerError::LedgerClosed)
        ));
        assert!(matches!(
            ledger.init(at(9, 0, 4)).await,
            Err(LedgerError::AlreadyInitialized(_))
        ));
    }

    #[tokio::test]
    async fn test_jobs_in_same_minute_get_distinct_dirs() {
        let dir = TempDir::new().unwrap();
        let mut first = JobLedger::new(dir.path(), LedgerSchema::default(), "bounty.json");
        let mut second = JobLedger::new(dir.path(), LedgerSchema::default(), "bounty.json");

        let a = first.init(at(9, 0, 0)).await.unwrap();
        let b = second.init(at(9, 0, 0)).await.unwrap();

        assert_ne!(a, b);
        assert_ne!(first.job_dir(), second.job_dir());
        assert!(first.job_dir().unwrap().is_dir());
        assert!(second.job_dir().unwrap().is_dir());
    }

    #[tokio::test]
    async fn test_jobs_in_same_second_sort_by_start_order() {
        let dir = TempDir::new().unwrap();
        let mut started = Vec::new();
        for _ in 0..20 {
            let mut ledger = JobLedger::new(dir.path(), LedgerSchema::default(), "bounty.json");
            let job_id = ledger.init(at(9, 0, 0)).await.unwrap();
            let latest = ledger_reader::latest_job(dir.path()).await.unwrap();
            assert_eq!(latest, ledger.job_dir().unwrap());
            started.push(job_id);
        }

        let mut sorted = started.clone();
        sorted.sort();
        assert_eq!(started, sorted);
        assert_eq!(started[0].as_str(), "20261016090000-0000");
        assert_eq!(started[19].as_str(), "20261016090000-0019");
    }

    #[tokio::test]
    async fn test_failed_close_leaves_no_end_marker() {
        let dir = TempDir::new().unwrap();
        let mut ledger = JobLedger::new(dir.path(), LedgerSchema::default(), "bounty.json");
        ledger.init(at(9, 0, 0)).await.unwrap();
        let job_dir = ledger.job_dir().unwrap().to_path_buf();

        // a directory in place of meta.json makes the rename fail
        fs::remove_file(job_dir.join(META_FILE)).await.unwrap();
        fs::create_dir(job_dir.join(META_FILE)).await.unwrap();
        assert!(ledger.close(at(9, 1, 0)).await.is_err());
        assert!(ledger.is_open());
        let log = fs::read_to_string(job_dir.join(LOG_FILE)).await.unwrap();
        assert!(!log.contains("[Job] End Time"));

        fs::remove_dir(job_dir.join(META_FILE)).await.unwrap();
        let meta = ledger.close(at(9, 1, 0)).await.unwrap();
        assert!(meta.is_sealed());
        let log = fs::read_to_string(job_dir.join(LOG_FILE)).await.unwrap();
        assert_eq!(log.matches("[Job] End Time").count(), 1);
    }
}
