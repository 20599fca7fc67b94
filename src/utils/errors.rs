// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 任务账本错误类型
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Ledger already initialized as job {0}")]
    AlreadyInitialized(String),

    #[error("Ledger is not open")]
    LedgerNotOpen,

    #[error("Ledger already closed")]
    LedgerClosed,

    #[error("Malformed ledger: {0}")]
    LedgerMalformed(String),

    #[error("No jobs found in {0}")]
    NoJobs(String),

    #[error("Ledger I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ledger metadata error: {0}")]
    Serialization(#[from] serde_json::Error),
}
