// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

use crate::domain::repositories::watch_list_repository::WatchListError;

/// 追踪目标在文件中的存储形式 `[alias, url]`
type TargetPair = (String, String);

/// 追踪目标
///
/// 表示一部被追踪的作品，由用户自定义的别名和作品页面URL组成。
/// 别名在所属分组内唯一，不同分组之间可以重复。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TargetPair", into = "TargetPair")]
pub struct Target {
    /// 别名（或作品名）
    pub alias: String,
    /// 作品页面URL
    pub url: String,
}

impl Target {
    pub fn new(alias: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            url: url.into(),
        }
    }
}

impl From<TargetPair> for Target {
    fn from((alias, url): TargetPair) -> Self {
        Self { alias, url }
    }
}

impl From<Target> for TargetPair {
    fn from(target: Target) -> Self {
        (target.alias, target.url)
    }
}

/// 站点分组
///
/// 一个来源站点及其下所有追踪目标。站点名称在整个追踪列表中唯一。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// 站点名称
    pub website: String,
    /// 按添加顺序排列的追踪目标
    #[serde(default)]
    pub targets: Vec<Target>,
}

impl Group {
    pub fn new(website: impl Into<String>) -> Self {
        Self {
            website: website.into(),
            targets: Vec::new(),
        }
    }

    /// 按别名查找目标的位置
    pub fn position_of(&self, alias: &str) -> Option<usize> {
        self.targets.iter().position(|t| t.alias == alias)
    }
}

/// 追踪列表（悬赏列表）的文件文档
///
/// 顶层只有一个 `groups` 键。缺少该键视为文件损坏。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BountyDocument {
    pub groups: Vec<Group>,
}

impl BountyDocument {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    /// 第一处重复的站点或分组内别名
    ///
    /// 变更操作保证不产生重复，手工编辑的文件则可能存在。
    pub fn first_duplicate(&self) -> Option<String> {
        for (i, group) in self.groups.iter().enumerate() {
            if self.groups[..i].iter().any(|g| g.website == group.website) {
                return Some(format!("duplicate group '{}'", group.website));
            }
            for (j, target) in group.targets.iter().enumerate() {
                if group.targets[..j].iter().any(|t| t.alias == target.alias) {
                    return Some(format!(
                        "duplicate target '{}' in group '{}'",
                        target.alias, group.website
                    ));
                }
            }
        }
        None
    }

    /// 追踪目标总数
    pub fn target_count(&self) -> usize {
        self.groups.iter().map(|g| g.targets.len()).sum()
    }

    /// 定位站点分组及（可选的）目标
    ///
    /// * 未给出 `alias` 时只检查分组是否存在
    /// * `require_absent` 为 false 时要求目标存在，否则返回 `TargetNotFound`
    /// * `require_absent` 为 true 时要求目标不存在，否则返回 `DuplicateTarget`，
    ///   此时返回的目标位置总是 `None`
    pub fn find(
        &self,
        website: &str,
        alias: Option<&str>,
        require_absent: bool,
    ) -> Result<TargetLocation, WatchListError> {
        let group = self
            .groups
            .iter()
            .position(|g| g.website == website)
            .ok_or_else(|| WatchListError::GroupNotFound(website.to_string()))?;

        let Some(alias) = alias else {
            return Ok(TargetLocation {
                group,
                target: None,
            });
        };

        match (self.groups[group].position_of(alias), require_absent) {
            (Some(_), true) => Err(WatchListError::DuplicateTarget {
                website: website.to_string(),
                alias: alias.to_string(),
            }),
            (None, true) => Ok(TargetLocation {
                group,
                target: None,
            }),
            (Some(target), false) => Ok(TargetLocation {
                group,
                target: Some(target),
            }),
            (None, false) => Err(WatchListError::TargetNotFound {
                website: website.to_string(),
                alias: alias.to_string(),
            }),
        }
    }

    /// 取出定位到的目标
    pub fn target_at(&self, location: &TargetLocation) -> Option<&Target> {
        location
            .target
            .and_then(|t| self.groups.get(location.group)?.targets.get(t))
    }

    /// 在已有分组末尾添加目标
    pub fn add_target(
        &mut self,
        website: &str,
        alias: &str,
        url: &str,
    ) -> Result<(), WatchListError> {
        let location = self.find(website, Some(alias), true)?;
        self.groups[location.group]
            .targets
            .push(Target::new(alias, url));
        Ok(())
    }

    /// 移除分组中第一个匹配别名的目标，返回被移除的目标
    pub fn remove_target(&mut self, website: &str, alias: &str) -> Result<Target, WatchListError> {
        let location = self.find(website, Some(alias), false)?;
        let index = location.target.unwrap_or_default();
        Ok(self.groups[location.group].targets.remove(index))
    }

    /// 更新目标的别名和/或URL
    ///
    /// 为空的字段表示不修改；两者都为空时拒绝更新。
    /// 新别名不能与分组内的其他别名重复，改为原别名本身是允许的。
    /// 返回更新后的目标。
    pub fn update_target(
        &mut self,
        website: &str,
        alias: &str,
        new_alias: Option<&str>,
        new_url: Option<&str>,
    ) -> Result<Target, WatchListError> {
        let new_alias = new_alias.filter(|a| !a.is_empty());
        let new_url = new_url.filter(|u| !u.is_empty());
        if new_alias.is_none() && new_url.is_none() {
            return Err(WatchListError::NothingToUpdate);
        }

        let location = self.find(website, Some(alias), false)?;
        if let Some(candidate) = new_alias.filter(|a| *a != alias) {
            self.find(website, Some(candidate), true)?;
        }

        let index = location.target.unwrap_or_default();
        let target = &mut self.groups[location.group].targets[index];
        if let Some(a) = new_alias {
            target.alias = a.to_string();
        }
        if let Some(u) = new_url {
            target.url = u.to_string();
        }
        Ok(target.clone())
    }

    /// 添加空的站点分组
    pub fn add_group(&mut self, website: &str) -> Result<(), WatchListError> {
        if self.groups.iter().any(|g| g.website == website) {
            return Err(WatchListError::DuplicateGroup(website.to_string()));
        }
        self.groups.push(Group::new(website));
        Ok(())
    }

    /// 移除站点分组及其全部目标
    pub fn remove_group(&mut self, website: &str) -> Result<Group, WatchListError> {
        let location = self.find(website, None, false)?;
        Ok(self.groups.remove(location.group))
    }
}

/// 目标在追踪列表中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetLocation {
    /// 分组下标
    pub group: usize,
    /// 目标下标，仅检查分组或要求目标不存在时为空
    pub target: Option<usize>,
}
