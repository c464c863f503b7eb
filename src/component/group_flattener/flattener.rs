//! 群組攤平
//!
//! 把「一個群組一個資料夾」的結構攤平成單一目錄，
//! 檔名加上原資料夾名稱作為前綴以避免互相衝突。

use crate::tools::{ensure_directory_exists, validate_directory_exists};
use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 攤平結果
#[derive(Debug, Default)]
pub struct FlattenResult {
    pub total_files: usize,
    pub moved: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// 將 `parent` 底下每個子資料夾的檔案移動到 `dest`
///
/// 新檔名為 `{資料夾名}_{原檔名}`；只處理子資料夾的第一層，
/// 目標已存在同名檔案時跳過。
pub fn flatten_groups(
    parent: &Path,
    dest: &Path,
    shutdown_signal: &Arc<AtomicBool>,
) -> Result<FlattenResult> {
    validate_directory_exists(parent)?;
    ensure_directory_exists(dest)?;

    let mut result = FlattenResult::default();

    let entries =
        fs::read_dir(parent).with_context(|| format!("無法讀取目錄: {}", parent.display()))?;

    for entry in entries.filter_map(std::result::Result::ok) {
        if shutdown_signal.load(Ordering::SeqCst) {
            warn!("收到中斷訊號，停止攤平");
            break;
        }

        let group_dir = entry.path();
        if !group_dir.is_dir() {
            continue;
        }

        let group_name = entry.file_name().to_string_lossy().to_string();
        flatten_one_group(&group_dir, &group_name, dest, &mut result);
    }

    info!(
        "攤平完成 - 移動: {}, 跳過: {}, 失敗: {}",
        result.moved, result.skipped, result.errors
    );

    Ok(result)
}

fn flatten_one_group(group_dir: &Path, group_name: &str, dest: &Path, result: &mut FlattenResult) {
    let entries = match fs::read_dir(group_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("無法讀取群組資料夾 {}: {e}", group_dir.display());
            result.errors += 1;
            return;
        }
    };

    for entry in entries.filter_map(std::result::Result::ok) {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        result.total_files += 1;

        let file_name = entry.file_name().to_string_lossy().to_string();
        let target_path = dest.join(format!("{group_name}_{file_name}"));

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
}
