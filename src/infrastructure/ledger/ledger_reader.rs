// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{LOG_FILE, META_FILE, OUTPUT_FILE};
use crate::domain::models::job::JobMeta;
use crate::domain::models::ledger::Column;
use crate::domain::models::record::CANONICAL_DATE_FORMAT;
use crate::domain::services::report_service::ReportRow;
use crate::utils::errors::LedgerError;

/// 输出文件的原始内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl OutputTable {
    /// 按列名查找列下标
    pub fn position(&self, column: Column) -> Option<usize> {
        self.header.iter().position(|h| h == column.as_str())
    }

    fn require(&self, column: Column) -> Result<usize, LedgerError> {
        self.position(column).ok_or_else(|| {
            LedgerError::LedgerMalformed(format!("missing column '{}'", column))
        })
    }
}

/// 最近一次任务的目录
///
/// 任务标识按字符串排序即按启动时间排序，取名称最大的子目录。
pub async fn latest_job(result_dir: &Path) -> Result<PathBuf, LedgerError> {
    let no_jobs = || LedgerError::NoJobs(result_dir.display().to_string());

    let mut entries = match fs::read_dir(result_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(no_jobs()),
        Err(e) => return Err(e.into()),
    };

    let mut latest: Option<PathBuf> = None;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_dir() {
            continue;
        }
        let path = entry.path();
        let newer = match &latest {
            Some(l) => path.file_name() > l.file_name(),
            None => true,
        };
        if newer {
            latest = Some(path);
        }
    }
    latest.ok_or_else(no_jobs)
}

pub async fn read_log(job_dir: &Path) -> Result<String, LedgerError> {
    Ok(fs::read_to_string(job_dir.join(LOG_FILE)).await?)
}

/// 读取输出文件
///
/// 第一行为表头，字段数与表头不一致的数据行视为损坏。
pub async fn read_output(job_dir: &Path, delimiter: &str) -> Result<OutputTable, LedgerError> {
    let content = fs::read_to_string(job_dir.join(OUTPUT_FILE)).await?;
    parse_output(&content, delimiter)
}

pub fn parse_output(content: &str, delimiter: &str) -> Result<OutputTable, LedgerError> {
    let mut lines = content.lines();
    let header: Vec<String> = lines
        .next()
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| LedgerError::LedgerMalformed("missing header line".to_string()))?
        .split(delimiter)
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (i, line) in lines.enumerate() {
        if line.is_empty() {
            continue;
        }
        let fields: Vec<String> = line.split(delimiter).map(str::to_string).collect();
        if fields.len() != header.len() {
            return Err(LedgerError::LedgerMalformed(format!(
                "line {} has {} fields, expected {}",
                i + 2,
                fields.len(),
                header.len()
            )));
        }
        rows.push(fields);
    }
    Ok(OutputTable { header, rows })
}

/// 读取输出文件并投影为报告行
///
/// 通过表头的列名定位字段，与列顺序无关。
pub async fn read_entries(job_dir: &Path, delimiter: &str) -> Result<Vec<ReportRow>, LedgerError> {
    let table = read_output(job_dir, delimiter).await?;
    project_rows(&table)
}

pub fn project_rows(table: &OutputTable) -> Result<Vec<ReportRow>, LedgerError> {
    let website = table.require(Column::Website)?;
    let alias = table.require(Column::Alias)?;
    let latest_chapter = table.require(Column::LatestChapter)?;
    let updated_at = table.require(Column::UpdatedAt)?;

    table
        .rows
        .iter()
        .map(|row| {
            let raw = &row[updated_at];
            let updated_at = NaiveDateTime::parse_from_str(raw, CANONICAL_DATE_FORMAT)
                .map_err(|_| {
                    LedgerError::LedgerMalformed(format!("invalid updated_at '{}'", raw))
                })?;
            Ok(ReportRow {
                website: row[website].clone(),
                alias: row[alias].clone(),
                latest_chapter: row[latest_chapter].clone(),
                updated_at,
            })
        })
        .collect()
}

pub async fn read_meta(job_dir: &Path) -> Result<JobMeta, LedgerError> {
    let content = fs::read_to_string(job_dir.join(META_FILE)).await?;
    Ok(serde_json::from_str(&content)?)
}
