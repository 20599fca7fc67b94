// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 日志与元数据中使用的时间格式
pub const JOB_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// 任务标识
///
/// 由秒级启动时间和同一秒内的序号组成，例如 `20261016093005-0001`。
/// 标识按字符串排序即按启动先后排序。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(start_time: NaiveDateTime, sequence: u32) -> Self {
        Self(format!("{}-{:04}", Self::prefix(start_time), sequence))
    }

    /// 同一秒内启动的任务共享的前缀
    pub fn prefix(start_time: NaiveDateTime) -> String {
        start_time.format("%Y%m%d%H%M%S").to_string()
    }

    /// 标识中的序号，`prefix` 不匹配时为空
    pub fn sequence_for(name: &str, prefix: &str) -> Option<u32> {
        name.strip_prefix(prefix)?.strip_prefix('-')?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// 任务元数据
///
/// 持久化为任务目录下的 `meta.json`，初始化时写入一次，
/// 结束时带着结束时间和计数再写入一次。
/// `end_time` 为空表示任务未正常结束。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMeta {
    pub job_id: JobId,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub bounty_path: String,
    pub result_path: String,
    /// 已尝试抓取的目标数
    pub attempted: usize,
    /// 成功提取记录的目标数
    pub succeeded: usize,
}

impl JobMeta {
    pub fn is_sealed(&self) -> bool {
        self.end_time.is_some()
    }

    /// 成功率（百分比），未尝试任何目标时为空
    pub fn success_rate(&self) -> Option<f64> {
        if self.attempted == 0 {
            None
        } else {
            Some(self.succeeded as f64 / self.attempted as f64 * 100.0)
        }
    }
}
