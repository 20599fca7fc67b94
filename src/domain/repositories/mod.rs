// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 定义领域层的数据持久化抽象：
/// - 追踪列表仓库（watch_list_repository）：整份追踪列表的读取与覆盖写入
///
/// 领域层只依赖这些接口，文件实现位于基础设施层。
pub mod watch_list_repository;
