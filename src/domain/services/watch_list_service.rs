// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::info;

use crate::domain::models::bounty::{BountyDocument, Group, Target, TargetLocation};
use crate::domain::repositories::watch_list_repository::{WatchListError, WatchListRepository};

/// 追踪列表服务
///
/// 所有修改操作都是对整份列表的"读取-修改-写回"：
/// 加载一次，在内存中修改，再整份写回。
/// 修改失败时不会写回，列表保持不变。
///
/// 不提供跨进程的锁，多个进程同时修改时以最后一次写入为准。
pub struct WatchListStore<R: WatchListRepository> {
    /// 追踪列表仓库
    repo: Arc<R>,
}

impl<R: WatchListRepository> WatchListStore<R> {
    /// 创建新的追踪列表服务实例
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// 读取全部站点分组
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<Group>)` - 按文件顺序排列的分组
    /// * `Err(WatchListError::StoreCorrupt)` - 文件内容无效
    pub async fn read(&self) -> Result<Vec<Group>, WatchListError> {
        Ok(self.repo.load().await?.groups)
    }

    /// 读取追踪列表并定位分组/目标
    ///
    /// 返回读取到的文档和定位结果，供调用方在确认前预览目标。
    pub async fn find(
        &self,
        website: &str,
        alias: Option<&str>,
        require_absent: bool,
    ) -> Result<(BountyDocument, TargetLocation), WatchListError> {
        let document = self.repo.load().await?;
        let location = document.find(website, alias, require_absent)?;
        Ok((document, location))
    }

    /// 查找已存在的目标
    pub async fn get_target(&self, website: &str, alias: &str) -> Result<Target, WatchListError> {
        let (document, location) = self.find(website, Some(alias), false).await?;
        document
            .target_at(&location)
            .cloned()
            .ok_or_else(|| WatchListError::TargetNotFound {
                website: website.to_string(),
                alias: alias.to_string(),
            })
    }

    /// 添加目标
    ///
    /// 要求分组存在且别名在分组内不存在。
    pub async fn add(
        &self,
        website: &str,
        alias: &str,
        url: &str,
    ) -> Result<String, WatchListError> {
        self.mutate(|doc| doc.add_target(website, alias, url)).await?;
        info!(website, alias, url, "Target added");
        Ok(format!("Successfully add '{}' to '{}'", alias, website))
    }

    /// 移除目标
    pub async fn remove(&self, website: &str, alias: &str) -> Result<String, WatchListError> {
        let removed = self.mutate(|doc| doc.remove_target(website, alias)).await?;
        info!(website, alias, url = %removed.url, "Target removed");
        Ok(format!("Successfully remove '{}' from '{}'", alias, website))
    }

    /// 更新目标
    ///
    /// `new_alias`、`new_url` 为空表示不修改对应字段。
    pub async fn update(
        &self,
        website: &str,
        alias: &str,
        new_alias: Option<&str>,
        new_url: Option<&str>,
    ) -> Result<String, WatchListError> {
        let updated = self
            .mutate(|doc| doc.update_target(website, alias, new_alias, new_url))
            .await?;
        info!(
            website,
            alias,
            new_alias = %updated.alias,
            new_url = %updated.url,
            "Target updated"
        );
        Ok(format!("Successfully changed '{}' from '{}'", alias, website))
    }

    /// 添加站点分组
    pub async fn add_group(&self, website: &str) -> Result<String, WatchListError> {
        self.mutate(|doc| doc.add_group(website)).await?;
        info!(website, "Group added");
        Ok(format!("Successfully add group '{}'", website))
    }

    /// 移除站点分组及其全部目标
    pub async fn remove_group(&self, website: &str) -> Result<String, WatchListError> {
        let removed = self.mutate(|doc| doc.remove_group(website)).await?;
        info!(website, targets = removed.targets.len(), "Group removed");
        Ok(format!(
            "Successfully remove group '{}' ({} targets)",
            website,
            removed.targets.len()
        ))
    }

    /// 初始化空的追踪列表
    ///
    /// 列表已存在时不做任何修改，返回 false。
    pub async fn init(&self) -> Result<bool, WatchListError> {
        if self.repo.exists().await? {
            return Ok(false);
        }
        self.repo.save(&BountyDocument::default()).await?;
        info!(location = %self.repo.location(), "Bounty list initialized");
        Ok(true)
    }

    /// 存储位置
    pub fn location(&self) -> String {
        self.repo.location()
    }

    async fn mutate<T, F>(&self, op: F) -> Result<T, WatchListError>
    where
        F: FnOnce(&mut BountyDocument) -> Result<T, WatchListError>,
    {
        let mut document = self.repo.load().await?;
        let out = op(&mut document)?;
        self.repo.save(&document).await?;
        Ok(out)
    }
}
