// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 规范化后的更新时间格式（24小时制）
pub const CANONICAL_DATE_FORMAT: &str = "%d-%m-%Y %H:%M";

/// 作品记录
///
/// 由提取服务从一次抓取的页面中生成，字段均已规范化。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// 作品标题
    pub title: String,
    /// 是否连载中
    pub ongoing: bool,
    /// 最近更新时间
    pub updated_at: NaiveDateTime,
    /// 最新章节名称
    pub latest_chapter: String,
    /// 最新章节链接
    pub latest_chapter_link: String,
}

impl Record {
    /// 以规范格式渲染更新时间
    pub fn updated_at_display(&self) -> String {
        self.updated_at.format(CANONICAL_DATE_FORMAT).to_string()
    }
}

/// 账本条目
///
/// 每次抓取尝试产生一条，无论成功与否。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// 所属站点
    pub website: String,
    /// 目标别名
    pub alias: String,
    /// 提取到的记录，提取失败时为空
    pub record: Option<Record>,
    /// HTTP状态码，请求未得到响应时为空
    pub fetch_status: Option<u16>,
}

impl LedgerEntry {
    pub fn new(
        website: impl Into<String>,
        alias: impl Into<String>,
        record: Option<Record>,
        fetch_status: Option<u16>,
    ) -> Self {
        Self {
            website: website.into(),
            alias: alias.into(),
            record,
            fetch_status,
        }
    }

    /// 是否成功提取出记录
    pub fn is_success(&self) -> bool {
        self.record.is_some()
    }
}
