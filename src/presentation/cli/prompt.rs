// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dialoguer::Confirm;

/// 在终端上询问确认，默认回答为否
///
/// `assume_yes` 为真时直接确认，不进行交互。
/// 提示输出到标准错误，标准输出只用于命令结果。
pub fn confirm(question: &str, assume_yes: bool) -> Result<bool, dialoguer::Error> {
    if assume_yes {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(question)
        .default(false)
        .wait_for_newline(true)
        .interact()
}
