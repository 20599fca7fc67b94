// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：追踪列表、作品记录、账本模式和任务
/// - 仓库接口（repositories）：追踪列表的持久化抽象
/// - 服务（services）：追踪列表维护、记录提取、抓取编排和报告
///
/// 领域层不依赖具体的文件格式和网络实现。
pub mod models;
pub mod repositories;
pub mod services;
