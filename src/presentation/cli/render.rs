// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt::Write;

use crate::domain::models::bounty::Group;
use crate::domain::models::job::{JobMeta, JOB_TIME_FORMAT};
use crate::domain::models::record::CANONICAL_DATE_FORMAT;
use crate::domain::services::crawl_service::CrawlReport;
use crate::domain::services::report_service::{Recency, RecencyReport};
use crate::infrastructure::ledger::ledger_reader::OutputTable;

/// 渲染纯文本表格
///
/// 列宽按最长单元格的字符数对齐，表头下方加一行分隔线。
pub fn table<S: AsRef<str>>(headers: &[S], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.as_ref().chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header: Vec<&str> = headers.iter().map(|h| h.as_ref()).collect();
    push_row(&mut out, header.as_slice(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, rule.as_slice(), &widths);
    for row in rows {
        push_row(&mut out, row.as_slice(), &widths);
    }
    out
}

fn push_row<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let line = widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let cell = cells.get(i).map(|c| c.as_ref()).unwrap_or("");
            format!("{:<width$}", cell, width = *w)
        })
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn bounty(groups: &[Group]) -> String {
    if groups.is_empty() {
        return "Bounty list is empty.\n".to_string();
    }
    let rows: Vec<Vec<String>> = groups
        .iter()
        .flat_map(|g| {
            if g.targets.is_empty() {
                vec![vec![g.website.clone(), "-".to_string(), "-".to_string()]]
            } else {
                g.targets
                    .iter()
                    .map(|t| vec![g.website.clone(), t.alias.clone(), t.url.clone()])
                    .collect()
            }
        })
        .collect();
    table(&["Website", "Alias", "URL"], &rows)
}

pub fn output(table_data: &OutputTable) -> String {
    table(table_data.header.as_slice(), &table_data.rows)
}

pub fn report(report: &RecencyReport) -> String {
    let mut out = String::new();
    for recency in Recency::ALL {
        let rows = report.rows(recency);
        let _ = writeln!(out, "{} ({})", recency.title(), rows.len());
        if rows.is_empty() {
            out.push_str("(none)\n\n");
            continue;
        }
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|r| {
                vec![
                    r.website.clone(),
                    r.alias.clone(),
                    r.latest_chapter.clone(),
                    r.updated_at.format(CANONICAL_DATE_FORMAT).to_string(),
                ]
            })
            .collect();
        out.push_str(&table(&["Website", "Alias", "Latest chapter", "Updated at"], &cells));
        out.push('\n');
    }
    out
}

pub fn meta(meta: &JobMeta) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Job Id:       {}", meta.job_id);
    let _ = writeln!(out, "Start Time:   {}", meta.start_time.format(JOB_TIME_FORMAT));
    let end = meta
        .end_time
        .map(|t| t.format(JOB_TIME_FORMAT).to_string())
        .unwrap_or_else(|| "unfinished".to_string());
    let _ = writeln!(out, "End Time:     {}", end);
    let _ = writeln!(out, "Bounty file:  {}", meta.bounty_path);
    let _ = writeln!(out, "Results:      {}", meta.result_path);
    let rate = meta
        .success_rate()
        .map(|r| format!(" ({:.1}%)", r))
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "Scraped:      {}/{}{}",
        meta.succeeded, meta.attempted, rate
    );
    out
}

pub fn crawl_summary(report: &CrawlReport, silent: bool) -> String {
    let mut out = meta(&report.meta);
    if !silent && !report.failures.is_empty() {
        out.push('\n');
        let rows: Vec<Vec<String>> = report
            .failures
            .iter()
            .map(|f| vec![f.website.clone(), f.alias.clone(), f.reason.clone()])
            .collect();
        out.push_str(&table(&["Website", "Alias", "Failure"], &rows));
    }
    out
}
