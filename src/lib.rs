// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含命令行输入的数据传输对象和校验
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含追踪列表、记录提取、抓取编排和报告分段
pub mod domain;

/// 引擎模块
///
/// 实现网页抓取引擎
pub mod engines;

/// 基础设施模块
///
/// 提供追踪列表文件和任务账本的读写
pub mod infrastructure;

/// 表示层模块
///
/// 命令行参数、确认提示和文本渲染
pub mod presentation;

/// 工具模块
///
/// 提供文件写入、日志初始化和错误类型
pub mod utils;
