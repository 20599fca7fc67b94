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

use anyhow::Context;
use clap::Parser;
use mantrack::config::settings::Settings;
use mantrack::presentation::cli::handlers::{self, AppContext};
use mantrack::presentation::cli::Cli;
use mantrack::utils::telemetry;
use std::process::ExitCode;
use tracing::debug;

/// 主函数
///
/// 解析命令行，初始化日志和配置后执行命令。抓取是顺序执行的，使用单线程运行时。
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init_telemetry(cli.is_silent(), cli.json_logs);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!(?settings, "Configuration loaded");

    let ctx = AppContext::new(settings, cli.yes);
    let mut out = std::io::stdout();
    handlers::execute(&ctx, cli.command, &mut out).await
}
