// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::models::bounty::BountyDocument;
use crate::domain::repositories::watch_list_repository::{WatchListError, WatchListRepository};
use crate::utils::fs_utils;

/// 基于JSON文件的追踪列表仓库
///
/// 文件格式：`{"groups": [{"website": "...", "targets": [["alias", "url"], ...]}]}`
pub struct JsonWatchListRepository {
    path: PathBuf,
}

impl JsonWatchListRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 反序列化追踪列表文档
///
/// 重复的站点或同一分组内重复的别名视为文件损坏。
pub fn decode_document(content: &str) -> Result<BountyDocument, WatchListError> {
    let document: BountyDocument =
        serde_json::from_str(content).map_err(|e| WatchListError::StoreCorrupt(e.to_string()))?;
    match document.first_duplicate() {
        Some(duplicate) => Err(WatchListError::StoreCorrupt(duplicate)),
        None => Ok(document),
    }
}

/// 序列化追踪列表文档（带结尾换行）
pub fn encode_document(document: &BountyDocument) -> Result<String, WatchListError> {
    let mut json = serde_json::to_string_pretty(document)
        .map_err(|e| WatchListError::StoreCorrupt(e.to_string()))?;
    json.push('\n');
    Ok(json)
}

#[async_trait]
impl WatchListRepository for JsonWatchListRepository {
    async fn load(&self) -> Result<BountyDocument, WatchListError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(WatchListError::StoreMissing(self.location()));
            }
            Err(e) => return Err(WatchListError::Io(e)),
        };
        let document = decode_document(&content)?;
        debug!(
            path = %self.path.display(),
            groups = document.groups.len(),
            "Bounty list loaded"
        );
        Ok(document)
    }

    async fn save(&self, document: &BountyDocument) -> Result<(), WatchListError> {
        let json = encode_document(document)?;
        fs_utils::write_atomic(&self.path, json.as_bytes()).await?;
        debug!(path = %self.path.display(), "Bounty list written");
        Ok(())
    }

    async fn exists(&self) -> Result<bool, WatchListError> {
        Ok(fs::try_exists(&self.path).await?)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// 测试用的内存追踪列表仓库
///
/// 保存的是序列化后的文本，读取时重新反序列化，行为与文件实现一致。
pub struct InMemoryWatchListRepository {
    content: Arc<RwLock<Option<String>>>,
}

impl InMemoryWatchListRepository {
    pub fn new() -> Self {
        Self {
            content: Arc::new(RwLock::new(None)),
        }
    }

    /// 使用原始文本初始化，可用于构造损坏的列表
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Arc::new(RwLock::new(Some(content.into()))),
        }
    }

    pub fn with_document(document: &BountyDocument) -> Result<Self, WatchListError> {
        Ok(Self::with_content(encode_document(document)?))
    }

    /// 当前保存的原始文本
    pub async fn raw(&self) -> Option<String> {
        self.content.read().await.clone()
    }
}

impl Default for InMemoryWatchListRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WatchListRepository for InMemoryWatchListRepository {
    async fn load(&self) -> Result<BountyDocument, WatchListError> {
        match self.content.read().await.as_deref() {
            Some(content) => decode_document(content),
            None => Err(WatchListError::StoreMissing(self.location())),
        }
    }

    async fn save(&self, document: &BountyDocument) -> Result<(), WatchListError> {
        let json = encode_document(document)?;
        *self.content.write().await = Some(json);
        Ok(())
    }

    async fn exists(&self) -> Result<bool, WatchListError> {
        Ok(self.content.read().await.is_some())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
