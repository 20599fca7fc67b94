// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use super::{prompt, render, Command};
use crate::application::dto::target_request::{AddTargetDto, GroupDto, UpdateTargetDto};
use crate::config::settings::Settings;
use crate::domain::repositories::watch_list_repository::WatchListError;
use crate::domain::services::crawl_service::{CrawlError, CrawlService};
use crate::domain::services::extraction_service::RecordExtractor;
use crate::domain::services::report_service;
use crate::domain::services::watch_list_service::WatchListStore;
use crate::engines::reqwest_engine::ReqwestEngine;
use crate::infrastructure::ledger::job_ledger::JobLedger;
use crate::infrastructure::ledger::ledger_reader;
use crate::infrastructure::repositories::watch_list_repo_impl::JsonWatchListRepository;

/// 命令执行上下文
pub struct AppContext {
    pub settings: Settings,
    /// 跳过确认提示
    pub assume_yes: bool,
}

impl AppContext {
    pub fn new(settings: Settings, assume_yes: bool) -> Self {
        Self {
            settings,
            assume_yes,
        }
    }

    fn store(&self) -> WatchListStore<JsonWatchListRepository> {
        WatchListStore::new(Arc::new(JsonWatchListRepository::new(
            self.settings.bounty_path(),
        )))
    }

    fn confirm(&self, question: &str) -> Result<bool> {
        prompt::confirm(question, self.assume_yes).context("Failed to read confirmation")
    }
}

/// 执行一条命令，命令输出写入 `out`
pub async fn execute<W: Write>(ctx: &AppContext, command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::Crawl { silent } => crawl(ctx, silent, out).await,
        Command::ShowBounty => show_bounty(ctx, out).await,
        Command::InitBounty => init_bounty(ctx, out).await,
        Command::AddGroup { website } => add_group(ctx, &website, out).await,
        Command::RemoveGroup { website } => remove_group(ctx, &website, out).await,
        Command::AddTarget {
            website,
            alias,
            url,
        } => add_target(ctx, AddTargetDto::new(&website, &alias, &url), out).await,
        Command::RemoveTarget { website, alias } => {
            remove_target(ctx, &website, &alias, out).await
        }
        Command::UpdateTarget {
            website,
            alias,
            new_alias,
            new_url,
        } => {
            let dto = UpdateTargetDto::new(
                &website,
                &alias,
                new_alias.as_deref(),
                new_url.as_deref(),
            );
            update_target(ctx, dto, out).await
        }
        Command::ShowLog => show_log(ctx, out).await,
        Command::ShowOutput => show_output(ctx, out).await,
        Command::Result => show_result(ctx, out).await,
    }
}

fn store_hint(err: WatchListError) -> anyhow::Error {
    match err {
        WatchListError::StoreMissing(path) => anyhow!(
            "Bounty list not found at '{}'. Run `mantrack init-bounty` to create one.",
            path
        ),
        other => other.into(),
    }
}

async fn crawl<W: Write>(ctx: &AppContext, silent: bool, out: &mut W) -> Result<()> {
    let settings = &ctx.settings;
    let engine = ReqwestEngine::new(settings.timeout(), &settings.crawler.user_agent)
        .context("Failed to build HTTP client")?;
    let extractor = RecordExtractor::story_info()?;
    let service = CrawlService::new(Arc::new(engine), extractor, settings.throttle());

    let mut ledger = JobLedger::new(
        settings.result_dir(),
        settings.ledger_schema()?,
        settings.paths.bounty_file.clone(),
    );
    let report = match service.run(&ctx.store(), &mut ledger).await {
        Ok(report) => report,
        Err(CrawlError::WatchList(e)) => return Err(store_hint(e)),
        Err(e) => return Err(anyhow::Error::new(e).context("Crawl aborted")),
    };

    write!(out, "{}", render::crawl_summary(&report, silent))?;
    Ok(())
}

async fn show_bounty<W: Write>(ctx: &AppContext, out: &mut W) -> Result<()> {
    let groups = ctx.store().read().await.map_err(store_hint)?;
    write!(out, "{}", render::bounty(&groups))?;
    Ok(())
}

async fn init_bounty<W: Write>(ctx: &AppContext, out: &mut W) -> Result<()> {
    let store = ctx.store();
    if store.init().await? {
        writeln!(out, "Created empty bounty list at '{}'", store.location())?;
    } else {
        writeln!(out, "Bounty list already exists at '{}'", store.location())?;
    }
    Ok(())
}

async fn add_group<W: Write>(ctx: &AppContext, website: &str, out: &mut W) -> Result<()> {
    let dto = GroupDto::new(website);
    dto.validate().map_err(|e| anyhow!("Invalid input: {}", e))?;

    let store = ctx.store();
    // fail before prompting when the group already exists
    if store.find(&dto.website, None, false).await.is_ok() {
        return Err(WatchListError::DuplicateGroup(dto.website).into());
    }
    if !ctx.confirm(&format!("Add group '{}'?", dto.website))? {
        writeln!(out, "Cancelled.")?;
        return Ok(());
    }
    let message = store.add_group(&dto.website).await.map_err(store_hint)?;
    writeln!(out, "{}", message)?;
    Ok(())
}

async fn remove_group<W: Write>(ctx: &AppContext, website: &str, out: &mut W) -> Result<()> {
    let store = ctx.store();
    let (document, location) = store
        .find(website.trim(), None, false)
        .await
        .map_err(store_hint)?;
    let group = &document.groups[location.group];

    let question = format!(
        "Remove group '{}' and its {} target(s)?",
        group.website,
        group.targets.len()
    );
    if !ctx.confirm(&question)? {
        writeln!(out, "Cancelled.")?;
        return Ok(());
    }
    let message = store.remove_group(&group.website).await?;
    writeln!(out, "{}", message)?;
    Ok(())
}

async fn add_target<W: Write>(ctx: &AppContext, dto: AddTargetDto, out: &mut W) -> Result<()> {
    dto.validate().map_err(|e| anyhow!("Invalid input: {}", e))?;

    let store = ctx.store();
    store
        .find(&dto.website, Some(&dto.alias), true)
        .await
        .map_err(store_hint)?;

    let question = format!("Add '{}' ({}) to '{}'?", dto.alias, dto.url, dto.website);
    if !ctx.confirm(&question)? {
        writeln!(out, "Cancelled.")?;
        return Ok(());
    }
    let message = store.add(&dto.website, &dto.alias, &dto.url).await?;
    writeln!(out, "{}", message)?;
    Ok(())
}

async fn remove_target<W: Write>(
    ctx: &AppContext,
    website: &str,
    alias: &str,
    out: &mut W,
) -> Result<()> {
    let store = ctx.store();
    let target = store
        .get_target(website.trim(), alias.trim())
        .await
        .map_err(store_hint)?;

    let question = format!(
        "Remove '{}' ({}) from '{}'?",
        target.alias,
        target.url,
        website.trim()
    );
    if !ctx.confirm(&question)? {
        writeln!(out, "Cancelled.")?;
        return Ok(());
    }
    let message = store.remove(website.trim(), &target.alias).await?;
    writeln!(out, "{}", message)?;
    Ok(())
}

async fn update_target<W: Write>(
    ctx: &AppContext,
    dto: UpdateTargetDto,
    out: &mut W,
) -> Result<()> {
    dto.validate().map_err(|e| anyhow!("Invalid input: {}", e))?;
    if dto.new_alias.is_none() && dto.new_url.is_none() {
        return Err(WatchListError::NothingToUpdate.into());
    }

    let store = ctx.store();
    let target = store
        .get_target(&dto.website, &dto.alias)
        .await
        .map_err(store_hint)?;

    let new_alias = dto.new_alias.as_deref().unwrap_or(&target.alias);
    let new_url = dto.new_url.as_deref().unwrap_or(&target.url);
    let question = format!(
        "Change '{}' ({}) in '{}' to '{}' ({})?",
        target.alias, target.url, dto.website, new_alias, new_url
    );
    if !ctx.confirm(&question)? {
        writeln!(out, "Cancelled.")?;
        return Ok(());
    }
    let message = store
        .update(
            &dto.website,
            &dto.alias,
            dto.new_alias.as_deref(),
            dto.new_url.as_deref(),
        )
        .await?;
    writeln!(out, "{}", message)?;
    Ok(())
}

async fn latest_job_dir(ctx: &AppContext) -> Result<PathBuf> {
    let job_dir = ledger_reader::latest_job(&ctx.settings.result_dir()).await?;
    info!(job_dir = %job_dir.display(), "Reading latest job");
    Ok(job_dir)
}

async fn show_log<W: Write>(ctx: &AppContext, out: &mut W) -> Result<()> {
    let job_dir = latest_job_dir(ctx).await?;
    let log = ledger_reader::read_log(&job_dir)
        .await
        .with_context(|| format!("Failed to read log of {}", job_dir.display()))?;
    write!(out, "{}", log)?;
    Ok(())
}

async fn show_output<W: Write>(ctx: &AppContext, out: &mut W) -> Result<()> {
    let job_dir = latest_job_dir(ctx).await?;
    let table = ledger_reader::read_output(&job_dir, &ctx.settings.ledger.delimiter)
        .await
        .with_context(|| format!("Failed to read output of {}", job_dir.display()))?;
    write!(out, "{}", render::output(&table))?;
    Ok(())
}

async fn show_result<W: Write>(ctx: &AppContext, out: &mut W) -> Result<()> {
    let job_dir = latest_job_dir(ctx).await?;
    let meta = ledger_reader::read_meta(&job_dir)
        .await
        .with_context(|| format!("Failed to read metadata of {}", job_dir.display()))?;
    let rows = ledger_reader::read_entries(&job_dir, &ctx.settings.ledger.delimiter)
        .await
        .with_context(|| format!("Failed to read output of {}", job_dir.display()))?;
    let report = report_service::bucket(rows, Local::now().date_naive());
    writeln!(out, "{}", render::meta(&meta))?;
    write!(out, "{}", render::report(&report))?;
    Ok(())
}
