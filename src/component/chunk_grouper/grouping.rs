//! 依分塊編號分組
//!
//! 將檔名含 `chunk_NNN` 標記的片段檔移動到以編號命名的子資料夾，
//! 每個符合的檔案恰好搬移一次，其餘檔案不動。

use crate::tools::{ensure_directory_exists, validate_directory_exists};
use anyhow::{Context, Result};
use log::{info, warn};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 分組結果
#[derive(Debug, Default)]
pub struct GroupResult {
    pub total_files: usize,
    pub moved: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// 從檔名解析分塊編號（`movie_chunk_007_clip_001.mp4` -> 7）
fn parse_group_number(file_name: &str, pattern: &Regex) -> Option<u64> {
    pattern
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// 將目錄第一層的片段檔依分塊編號移入 `dir/<編號>/`
///
/// 目標已有同名檔案時跳過，不覆蓋。
pub fn group_numbered_files(dir: &Path, shutdown_signal: &Arc<AtomicBool>) -> Result<GroupResult> {
    validate_directory_exists(dir)?;

    let pattern = Regex::new(r"chunk_(\d+)")?;
    let mut result = GroupResult::default();

    let entries = fs::read_dir(dir).with_context(|| format!("無法讀取目錄: {}", dir.display()))?;

    for entry in entries {
        if shutdown_signal.load(Ordering::SeqCst) {
            warn!("收到中斷訊號，停止分組");
            break;
        }

        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("讀取目錄項目失敗: {e}");
                result.errors += 1;
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        let Some(group_number) = parse_group_number(&file_name, &pattern) else {
            continue;
        };

        result.total_files += 1;

        let target_dir = dir.join(group_number.to_string());
        if let Err(e) = ensure_directory_exists(&target_dir) {
            warn!("無法建立分組資料夾 {}: {e}", target_dir.display());
            result.errors += 1;
            continue;
        }

        let target_path = target_dir.join(&file_name);
        if target_path.exists() {
            result.skipped += 1;
            continue;
        }

        match fs::rename(&path, &target_path) {
            Ok(()) => {
                result.moved += 1;
            }
            Err(e) => {
                warn!(
                    "無法移動檔案 {} -> {}: {e}",
                    path.display(),
                    target_path.display()
                );
                result.errors += 1;
            }
        }
    }

    info!(
        "分組完成 - 移動: {}, 跳過: {}, 失敗: {}",
        result.moved, result.skipped, result.errors
    );

    Ok(result)
}
