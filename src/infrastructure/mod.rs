// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 包含的子模块：
/// - 任务账本（ledger）：每次抓取任务的日志、输出和元数据文件
/// - 仓库实现（repositories）：追踪列表仓库的JSON文件实现
///
/// 基础设施层依赖于领域层的抽象接口。
pub mod ledger;
pub mod repositories;
