// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::models::record::LedgerEntry;

/// 账本输出列
///
/// 输出文件的列按名称解析为该枚举，读写两端都通过名称而不是位置定位字段。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Website,
    Alias,
    Title,
    Ongoing,
    UpdatedAt,
    LatestChapter,
    LatestChapterLink,
    FetchStatus,
}

impl Column {
    /// 默认输出列顺序
    pub const DEFAULT_SCHEMA: [Column; 8] = [
        Column::Website,
        Column::Alias,
        Column::Title,
        Column::Ongoing,
        Column::UpdatedAt,
        Column::LatestChapter,
        Column::LatestChapterLink,
        Column::FetchStatus,
    ];

    /// 报告投影必需的列
    pub const REQUIRED: [Column; 4] = [
        Column::Website,
        Column::Alias,
        Column::UpdatedAt,
        Column::LatestChapter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Website => "website",
            Column::Alias => "alias",
            Column::Title => "title",
            Column::Ongoing => "ongoing",
            Column::UpdatedAt => "updated_at",
            Column::LatestChapter => "latest_chapter",
            Column::LatestChapterLink => "latest_chapter_link",
            Column::FetchStatus => "fetch_status",
        }
    }

    /// 取出条目在该列上的值
    ///
    /// 记录为空时，记录相关的列返回空字符串。
    pub fn value_of(&self, entry: &LedgerEntry) -> String {
        let record = entry.record.as_ref();
        match self {
            Column::Website => entry.website.clone(),
            Column::Alias => entry.alias.clone(),
            Column::Title => record.map(|r| r.title.clone()).unwrap_or_default(),
            Column::Ongoing => record
                .map(|r| if r.ongoing { "1" } else { "0" }.to_string())
                .unwrap_or_default(),
            Column::UpdatedAt => record.map(|r| r.updated_at_display()).unwrap_or_default(),
            Column::LatestChapter => record
                .map(|r| r.latest_chapter.clone())
                .unwrap_or_default(),
            Column::LatestChapterLink => record
                .map(|r| r.latest_chapter_link.clone())
                .unwrap_or_default(),
            Column::FetchStatus => entry
                .fetch_status
                .map(|s| s.to_string())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Column {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "website" => Ok(Column::Website),
            "alias" => Ok(Column::Alias),
            "title" => Ok(Column::Title),
            "ongoing" => Ok(Column::Ongoing),
            "updated_at" => Ok(Column::UpdatedAt),
            "latest_chapter" => Ok(Column::LatestChapter),
            "latest_chapter_link" => Ok(Column::LatestChapterLink),
            "fetch_status" => Ok(Column::FetchStatus),
            other => Err(SchemaError::UnknownColumn(other.to_string())),
        }
    }
}

/// 输出模式错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Unknown ledger column: {0}")]
    UnknownColumn(String),
    #[error("Duplicate ledger column: {0}")]
    DuplicateColumn(Column),
    #[error("Ledger schema needs at least one column")]
    Empty,
    #[error("Ledger schema is missing required column: {0}")]
    MissingColumn(Column),
    #[error("Invalid ledger delimiter {0:?}: it must not be empty or share characters with column names or dates")]
    InvalidDelimiter(String),
}

/// 分隔符不能使用的字符
///
/// 列名和规范化日期 `%d-%m-%Y %H:%M` 中出现的字符，以及换行符。
fn is_reserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':' | ' ' | '\n' | '\r')
}

/// 账本输出模式
///
/// 有序、不重复且包含报告所需列的列，加上分隔符。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSchema {
    columns: Vec<Column>,
    delimiter: String,
}

impl LedgerSchema {
    pub fn new(columns: Vec<Column>, delimiter: impl Into<String>) -> Result<Self, SchemaError> {
        let delimiter = delimiter.into();
        if delimiter.is_empty() || delimiter.chars().any(is_reserved) {
            return Err(SchemaError::InvalidDelimiter(delimiter));
        }
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(SchemaError::DuplicateColumn(*column));
            }
        }
        if let Some(missing) = Column::REQUIRED.iter().find(|c| !columns.contains(*c)) {
            return Err(SchemaError::MissingColumn(*missing));
        }
        Ok(Self { columns, delimiter })
    }

    /// 从列名解析模式
    pub fn parse<S: AsRef<str>>(names: &[S], delimiter: &str) -> Result<Self, SchemaError> {
        let columns = names
            .iter()
            .map(|n| n.as_ref().parse())
            .collect::<Result<Vec<Column>, _>>()?;
        Self::new(columns, delimiter)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// 表头行（不含换行符）
    pub fn header_line(&self) -> String {
        self.columns
            .iter()
            .map(Column::as_str)
            .collect::<Vec<_>>()
            .join(&self.delimiter)
    }

    /// 渲染一条数据行（不含换行符）
    ///
    /// 字段中的分隔符和换行符替换为空格，保证一条记录始终占一行。
    pub fn render_row(&self, entry: &LedgerEntry) -> String {
        self.columns
            .iter()
            .map(|c| self.sanitize(&c.value_of(entry)))
            .collect::<Vec<_>>()
            .join(&self.delimiter)
    }

    fn sanitize(&self, value: &str) -> String {
        value
            .replace(self.delimiter.as_str(), " ")
            .replace(['\n', '\r'], " ")
    }
}

impl Default for LedgerSchema {
    fn default() -> Self {
        Self {
            columns: Column::DEFAULT_SCHEMA.to_vec(),
            delimiter: "|".to_string(),
        }
    }
}
