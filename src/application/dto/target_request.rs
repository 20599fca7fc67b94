// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 添加目标请求
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct AddTargetDto {
    #[validate(custom(function = "not_blank"))]
    pub website: String,
    #[validate(custom(function = "not_blank"))]
    pub alias: String,
    #[validate(url, custom(function = "http_scheme"))]
    pub url: String,
}

impl AddTargetDto {
    pub fn new(website: &str, alias: &str, url: &str) -> Self {
        Self {
            website: website.trim().to_string(),
            alias: alias.trim().to_string(),
            url: url.trim().to_string(),
        }
    }
}

/// 更新目标请求
///
/// 新别名和新URL为空表示不修改；两者都为空由领域层拒绝。
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UpdateTargetDto {
    #[validate(custom(function = "not_blank"))]
    pub website: String,
    #[validate(custom(function = "not_blank"))]
    pub alias: String,
    pub new_alias: Option<String>,
    #[validate(url, custom(function = "http_scheme"))]
    pub new_url: Option<String>,
}

impl UpdateTargetDto {
    pub fn new(website: &str, alias: &str, new_alias: Option<&str>, new_url: Option<&str>) -> Self {
        let field = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            website: website.trim().to_string(),
            alias: alias.trim().to_string(),
            new_alias: field(new_alias),
            new_url: field(new_url),
        }
    }
}

/// 站点分组请求
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct GroupDto {
    #[validate(custom(function = "not_blank"))]
    pub website: String,
}

impl GroupDto {
    pub fn new(website: &str) -> Self {
        Self {
            website: website.trim().to_string(),
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("cannot be empty".into()));
    }
    Ok(())
}

fn http_scheme(value: &str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::new("scheme").with_message("must be an http(s) URL".into())),
    }
}
