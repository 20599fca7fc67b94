// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod handlers;
pub mod prompt;
pub mod render;

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "mantrack")]
#[command(about = "Track chapter updates of serialized titles across source sites")]
#[command(version)]
pub struct Cli {
    /// Configuration file, overrides config/ and is overridden by MANTRACK__* variables
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// 是否以静默模式运行
    pub fn is_silent(&self) -> bool {
        matches!(self.command, Command::Crawl { silent: true })
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape every target in the bounty list and write a new job ledger
    Crawl {
        /// Only print the job summary
        #[arg(short, long)]
        silent: bool,
    },

    /// Show all groups and targets in the bounty list
    ShowBounty,

    /// Create an empty bounty list if none exists
    InitBounty,

    /// Add a website group
    AddGroup { website: String },

    /// Remove a website group and all of its targets
    RemoveGroup { website: String },

    /// Add a target to an existing group
    AddTarget {
        website: String,
        alias: String,
        url: String,
    },

    /// Remove a target from a group
    RemoveTarget { website: String, alias: String },

    /// Change the alias and/or url of a target
    UpdateTarget {
        website: String,
        alias: String,
        /// New alias
        #[arg(long)]
        new_alias: Option<String>,
        /// New url
        #[arg(long)]
        new_url: Option<String>,
    },

    /// Print the log of the latest job
    ShowLog,

    /// Print the output table of the latest job
    ShowOutput,

    /// Summarize the latest job, grouped by how recently each title was updated
    Result,
}
