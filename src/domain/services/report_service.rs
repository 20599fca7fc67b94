// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// 报告行
///
/// 账本输出按列名投影出的报告视图。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub website: String,
    pub alias: String,
    pub latest_chapter: String,
    pub updated_at: NaiveDateTime,
}

/// 更新时间分段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recency {
    Today,
    Last7Days,
    Last30Days,
    Older,
}

impl Recency {
    pub const ALL: [Recency; 4] = [
        Recency::Today,
        Recency::Last7Days,
        Recency::Last30Days,
        Recency::Older,
    ];

    /// 分段标题
    pub fn title(&self) -> &'static str {
        match self {
            Recency::Today => "Updated today",
            Recency::Last7Days => "Updated in the last 7 days",
            Recency::Last30Days => "Updated in the last 30 days",
            Recency::Older => "Updated more than 30 days ago",
        }
    }

    /// 按优先级判定日期所属分段
    ///
    /// 只检查下界，晚于 `now` 的日期落入最近7天。
    pub fn classify(date: NaiveDate, now: NaiveDate) -> Self {
        if date == now {
            Recency::Today
        } else if date >= now - Duration::days(7) {
            Recency::Last7Days
        } else if date >= now - Duration::days(30) {
            Recency::Last30Days
        } else {
            Recency::Older
        }
    }
}

/// 按更新时间分段的报告
///
/// 四个分段互不相交，合起来恰好是输入的全部行。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecencyReport {
    pub today: Vec<ReportRow>,
    pub last7: Vec<ReportRow>,
    pub last30: Vec<ReportRow>,
    pub older: Vec<ReportRow>,
}

impl RecencyReport {
    pub fn rows(&self, recency: Recency) -> &[ReportRow] {
        match recency {
            Recency::Today => &self.today,
            Recency::Last7Days => &self.last7,
            Recency::Last30Days => &self.last30,
            Recency::Older => &self.older,
        }
    }

    pub fn len(&self) -> usize {
        self.today.len() + self.last7.len() + self.last30.len() + self.older.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bucket_mut(&mut self, recency: Recency) -> &mut Vec<ReportRow> {
        match recency {
            Recency::Today => &mut self.today,
            Recency::Last7Days => &mut self.last7,
            Recency::Last30Days => &mut self.last30,
            Recency::Older => &mut self.older,
        }
    }
}

/// 将报告行按更新日期相对 `now` 分段
///
/// 每个分段内按站点、别名稳定排序。
pub fn bucket(rows: impl IntoIterator<Item = ReportRow>, now: NaiveDate) -> RecencyReport {
    let mut report = RecencyReport::default();
    for row in rows {
        let recency = Recency::classify(row.updated_at.date(), now);
        report.bucket_mut(recency).push(row);
    }
    for recency in Recency::ALL {
        report
            .bucket_mut(recency)
            .sort_by(|a, b| (&a.website, &a.alias).cmp(&(&b.website, &b.alias)));
    }
    report
}
