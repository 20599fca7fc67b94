// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// 原子地替换文件内容
///
/// 先写入同目录下的临时文件，再重命名覆盖目标文件。
/// 读者只会看到旧内容或完整的新内容。
pub async fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).await?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "data".to_string());
    let tmp_path = parent.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

    let mut file = fs::File::create(&tmp_path).await?;
    if let Err(e) = write_and_flush(&mut file, data).await {
        drop(file);
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e);
    }
    drop(file);

    if let Err(e) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e);
    }
    Ok(())
}

async fn write_and_flush(file: &mut fs::File, data: &[u8]) -> io::Result<()> {
    file.write_all(data).await?;
    file.flush().await
}

/// 以追加模式写入一行（自动补换行符）
pub async fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');
    file.write_all(buf.as_bytes()).await?;
    file.flush().await
}
