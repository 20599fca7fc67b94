// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 追踪列表（bounty）：站点分组与追踪目标
/// - 作品记录（record）：单次抓取提取出的规范化记录及账本条目
/// - 账本模式（ledger）：输出文件的列与分隔符
/// - 任务（job）：一次爬取执行的标识与元数据
pub mod bounty;
pub mod job;
pub mod ledger;
pub mod record;
