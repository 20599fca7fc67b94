// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 爬取服务（crawl_service）：按追踪列表逐个抓取目标并写入账本
/// - 提取服务（extraction_service）：从页面提取规范化记录
/// - 报告服务（report_service）：按更新时间对记录分段
/// - 追踪列表服务（watch_list_service）：追踪列表的读取和修改
pub mod crawl_service;
pub mod extraction_service;
pub mod report_service;
pub mod watch_list_service;
