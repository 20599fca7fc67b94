// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 任务账本
///
/// 每次抓取任务在结果目录下占用一个子目录：
/// - `output.txt`：表头加数据行，按分隔符分列
/// - `log.txt`：带时间戳的任务日志
/// - `meta.json`：任务元数据
pub mod job_ledger;
pub mod ledger_reader;

pub const OUTPUT_FILE: &str = "output.txt";
pub const LOG_FILE: &str = "log.txt";
pub const META_FILE: &str = "meta.json";
