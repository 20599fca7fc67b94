// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 默认的日志过滤规则
pub fn default_filter(silent: bool) -> &'static str {
    if silent {
        "warn"
    } else {
        "info,mantrack=debug"
    }
}

/// 初始化日志
///
/// 日志写到stderr，stdout只留给命令输出。`RUST_LOG` 优先于默认规则。
pub fn init_telemetry(silent: bool, json: bool) {
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| default_filter(silent).into()),
    );
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
