// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::engines::traits::{EngineError, FetchEngine, FetchResponse};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// 默认的User-Agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; mantrack/0.1)";

/// 抓取引擎
///
/// 基于reqwest实现的基本HTTP抓取引擎，整个任务共用一个客户端。
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// 创建引擎
    ///
    /// # 参数
    ///
    /// * `timeout` - 单次请求超时时间
    /// * `user_agent` - 请求使用的User-Agent
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FetchEngine for ReqwestEngine {
    /// 执行HTTP抓取
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchResponse)` - 得到响应，包括非2xx状态码
    /// * `Err(EngineError)` - 连接失败或在收到响应头之前超时
    async fn fetch(&self, url: &str) -> Result<FetchResponse, EngineError> {
        let start = Instant::now();
        let response = self.client.get(url).send().await?;

        let status_code = response.status().as_u16();
        // the status already arrived, so a broken body is recorded as empty content
        let content = match response.text().await {
            Ok(content) => content,
            Err(e) => {
                warn!(url, status_code, error = %e, "Failed to read response body");
                String::new()
            }
        };
        debug!(
            url,
            status_code,
            response_time_ms = start.elapsed().as_millis() as u64,
            "Fetched page"
        );

        Ok(FetchResponse {
            status_code,
            content,
        })
    }

    /// 获取引擎名称
    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
