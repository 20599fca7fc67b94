// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::bounty::BountyDocument;

/// 追踪列表错误类型
#[derive(Error, Debug)]
pub enum WatchListError {
    /// 追踪列表文件内容无效或缺少 `groups` 键
    #[error("Bounty list is corrupt: {0}")]
    StoreCorrupt(String),
    /// 追踪列表文件不存在
    #[error("Bounty list not found at '{0}'")]
    StoreMissing(String),
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 站点分组不存在
    #[error("Group with website '{0}' not found!")]
    GroupNotFound(String),
    /// 目标不存在
    #[error("Target '{alias}' not found in group '{website}'!")]
    TargetNotFound { website: String, alias: String },
    /// 目标别名重复
    #[error("Target '{alias}' already exists in group '{website}'!")]
    DuplicateTarget { website: String, alias: String },
    /// 站点分组重复
    #[error("Group with website '{0}' already exists!")]
    DuplicateGroup(String),
    /// 新别名与新URL同时为空
    #[error("Both new alias and new link can't be empty at the same time!")]
    NothingToUpdate,
}

impl WatchListError {
    /// 是否为用户输入错误（此时追踪列表保持不变）
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            WatchListError::GroupNotFound(_)
                | WatchListError::TargetNotFound { .. }
                | WatchListError::DuplicateTarget { .. }
                | WatchListError::DuplicateGroup(_)
                | WatchListError::NothingToUpdate
        )
    }
}

/// 追踪列表仓库特质
///
/// 追踪列表只有整份读取和整份覆盖写入两种操作，没有局部更新格式。
#[async_trait]
pub trait WatchListRepository: Send + Sync {
    /// 读取整份追踪列表
    async fn load(&self) -> Result<BountyDocument, WatchListError>;

    /// 覆盖写入整份追踪列表
    async fn save(&self, document: &BountyDocument) -> Result<(), WatchListError>;

    /// 追踪列表是否已存在
    async fn exists(&self) -> Result<bool, WatchListError>;

    /// 存储位置描述，用于日志和元数据
    fn location(&self) -> String;
}
