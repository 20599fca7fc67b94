// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::NaiveDateTime;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use thiserror::Error;

use crate::domain::models::record::Record;

/// 站点原生的更新时间格式，例如 `Jan 05,2021 - 10:15 PM`
///
/// `%B` 在解析时同时接受完整月份名和缩写。
pub const SITE_DATE_FORMAT: &str = "%B %d,%Y - %I:%M %p";

/// 提取错误类型
///
/// 提取是全有或全无的：任一字段失败则整页失败。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// 页面中没有信息块
    #[error("Extraction failed: info block '{0}' not found")]
    MissingBlock(String),
    /// 信息块中缺少字段
    #[error("Extraction failed: field '{0}' not found")]
    MissingField(RecordField),
    /// 更新时间格式无效
    #[error("Extraction failed: invalid update time '{0}'")]
    InvalidDate(String),
    /// 选择器无效
    #[error("Invalid selector '{0}'")]
    InvalidSelector(String),
}

/// 原始字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Title,
    Status,
    UpdatedAt,
    LatestChapter,
    LatestChapterLink,
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            RecordField::Title => "title",
            RecordField::Status => "status",
            RecordField::UpdatedAt => "updated_at",
            RecordField::LatestChapter => "latest_chapter",
            RecordField::LatestChapterLink => "latest_chapter_link",
        };
        f.write_str(name)
    }
}

/// 定位器从页面中取出的原始字段值
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    values: Vec<(RecordField, String)>,
}

impl RawFields {
    pub fn insert(&mut self, field: RecordField, value: impl Into<String>) {
        self.values.retain(|(f, _)| *f != field);
        self.values.push((field, value.into()));
    }

    pub fn get(&self, field: RecordField) -> Option<&str> {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }
}

impl<const N: usize> From<[(RecordField, &str); N]> for RawFields {
    fn from(pairs: [(RecordField, &str); N]) -> Self {
        let mut raw = RawFields::default();
        for (field, value) in pairs {
            raw.insert(field, value);
        }
        raw
    }
}

/// 字段定位策略
///
/// 与站点页面结构耦合的部分，只负责找出原始字符串，不做规范化。
pub trait FieldLocator: Send + Sync {
    fn locate(&self, document: &Html) -> Result<RawFields, ExtractionError>;
}

/// 单个字段的选择器规则
struct FieldRule {
    field: RecordField,
    selector: Selector,
    /// 为空时取文本，否则取属性值
    attr: Option<String>,
}

/// 基于CSS选择器的字段定位器
///
/// 先定位信息块，再在信息块内按规则选取各字段的第一个匹配元素。
pub struct SelectorLocator {
    block_css: String,
    block: Selector,
    rules: Vec<FieldRule>,
}

impl SelectorLocator {
    /// 创建定位器
    ///
    /// # 参数
    ///
    /// * `block` - 信息块选择器
    /// * `rules` - `(字段, 信息块内的选择器, 属性)`，属性为空时取元素文本
    pub fn new(
        block: &str,
        rules: &[(RecordField, &str, Option<&str>)],
    ) -> Result<Self, ExtractionError> {
        let parse = |css: &str| {
            Selector::parse(css).map_err(|_| ExtractionError::InvalidSelector(css.to_string()))
        };
        let rules = rules
            .iter()
            .map(|&(field, css, attr)| {
                Ok(FieldRule {
                    field,
                    selector: parse(css)?,
                    attr: attr.map(str::to_string),
                })
            })
            .collect::<Result<Vec<_>, ExtractionError>>()?;

        Ok(Self {
            block_css: block.to_string(),
            block: parse(block)?,
            rules,
        })
    }

    /// `story-info-right` 信息块布局
    ///
    /// 标题在 `h1`，状态在表格第三行第二格，
    /// 更新时间与最新章节分别在扩展信息块第一、第四段的第二个 `span` 中。
    pub fn story_info() -> Result<Self, ExtractionError> {
        const EXTENT: &str = "div.story-info-right-extent";
        let updated_at = format!("{EXTENT} p:nth-of-type(1) span:nth-of-type(2)");
        let latest = format!("{EXTENT} p:nth-of-type(4) span:nth-of-type(2) a");
        Self::new(
            "div.story-info-right",
            &[
                (RecordField::Title, "h1", None),
                (
                    RecordField::Status,
                    "table tr:nth-of-type(3) td:nth-of-type(2)",
                    None,
                ),
                (RecordField::UpdatedAt, updated_at.as_str(), None),
                (RecordField::LatestChapter, latest.as_str(), None),
                (RecordField::LatestChapterLink, latest.as_str(), Some("href")),
            ],
        )
    }
}

impl FieldLocator for SelectorLocator {
    fn locate(&self, document: &Html) -> Result<RawFields, ExtractionError> {
        let block = document
            .select(&self.block)
            .next()
            .ok_or_else(|| ExtractionError::MissingBlock(self.block_css.clone()))?;

        let mut raw = RawFields::default();
        for rule in &self.rules {
            let value = block
                .select(&rule.selector)
                .next()
                .and_then(|element| read_element(element, rule.attr.as_deref()))
                .ok_or(ExtractionError::MissingField(rule.field))?;
            raw.insert(rule.field, value);
        }
        Ok(raw)
    }
}

fn read_element(element: ElementRef<'_>, attr: Option<&str>) -> Option<String> {
    let value = match attr {
        Some(attr) => element.value().attr(attr)?.trim().to_string(),
        None => element.text().collect::<String>().trim().to_string(),
    };
    (!value.is_empty()).then_some(value)
}

/// 正在组装的记录
#[derive(Debug, Default)]
struct RecordDraft {
    title: Option<String>,
    ongoing: Option<bool>,
    updated_at: Option<NaiveDateTime>,
    latest_chapter: Option<String>,
    latest_chapter_link: Option<String>,
}

impl RecordDraft {
    fn finish(self) -> Result<Record, ExtractionError> {
        Ok(Record {
            title: self
                .title
                .ok_or(ExtractionError::MissingField(RecordField::Title))?,
            ongoing: self
                .ongoing
                .ok_or(ExtractionError::MissingField(RecordField::Status))?,
            updated_at: self
                .updated_at
                .ok_or(ExtractionError::MissingField(RecordField::UpdatedAt))?,
            latest_chapter: self
                .latest_chapter
                .ok_or(ExtractionError::MissingField(RecordField::LatestChapter))?,
            latest_chapter_link: self
                .latest_chapter_link
                .ok_or(ExtractionError::MissingField(RecordField::LatestChapterLink))?,
        })
    }
}

type FieldParser = fn(&str, &mut RecordDraft) -> Result<(), ExtractionError>;

/// 字段规范化表，按顺序应用
const FIELD_PARSERS: [(RecordField, FieldParser); 5] = [
    (RecordField::Title, parse_title),
    (RecordField::Status, parse_status),
    (RecordField::UpdatedAt, parse_updated_at),
    (RecordField::LatestChapter, parse_latest_chapter),
    (RecordField::LatestChapterLink, parse_latest_chapter_link),
];

fn parse_title(raw: &str, draft: &mut RecordDraft) -> Result<(), ExtractionError> {
    draft.title = Some(raw.to_string());
    Ok(())
}

fn parse_status(raw: &str, draft: &mut RecordDraft) -> Result<(), ExtractionError> {
    draft.ongoing = Some(is_ongoing(raw));
    Ok(())
}

fn parse_updated_at(raw: &str, draft: &mut RecordDraft) -> Result<(), ExtractionError> {
    draft.updated_at = Some(parse_site_date(raw)?);
    Ok(())
}

fn parse_latest_chapter(raw: &str, draft: &mut RecordDraft) -> Result<(), ExtractionError> {
    draft.latest_chapter = Some(raw.to_string());
    Ok(())
}

fn parse_latest_chapter_link(raw: &str, draft: &mut RecordDraft) -> Result<(), ExtractionError> {
    draft.latest_chapter_link = Some(raw.to_string());
    Ok(())
}

/// 状态文本是否为连载中
///
/// 只有与 "ongoing" 大小写不敏感相等时为真，其他任何值都为假。
pub fn is_ongoing(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("ongoing")
}

/// 解析站点原生的更新时间
pub fn parse_site_date(raw: &str) -> Result<NaiveDateTime, ExtractionError> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, SITE_DATE_FORMAT)
        .map_err(|_| ExtractionError::InvalidDate(raw.to_string()))
}

/// 对原始字段应用规范化表
pub fn normalize(raw: &RawFields) -> Result<Record, ExtractionError> {
    let mut draft = RecordDraft::default();
    for (field, parser) in FIELD_PARSERS {
        let value = raw.get(field).ok_or(ExtractionError::MissingField(field))?;
        parser(value, &mut draft)?;
    }
    draft.finish()
}

/// 记录提取器
///
/// 页面内容到规范化记录的纯函数转换，无副作用。
pub struct RecordExtractor {
    locator: Box<dyn FieldLocator>,
}

impl RecordExtractor {
    pub fn new(locator: Box<dyn FieldLocator>) -> Self {
        Self { locator }
    }

    /// 使用 `story-info-right` 布局的提取器
    pub fn story_info() -> Result<Self, ExtractionError> {
        Ok(Self::new(Box::new(SelectorLocator::story_info()?)))
    }

    /// 从页面内容提取记录
    pub fn extract(&self, page: &str) -> Result<Record, ExtractionError> {
        let document = Html::parse_document(page);
        let raw = self.locator.locate(&document)?;
        normalize(&raw)
    }
}

#[cfg(test)]
#[path = "extraction_service_test.rs"]
mod tests;
