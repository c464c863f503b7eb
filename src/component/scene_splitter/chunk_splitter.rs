//! 來源影片切塊
//!
//! 以 ffmpeg segment muxer 的串流複製模式（不重新編碼）把長影片
//! 切成固定長度的工作分塊，回傳依序號排序的分塊列表。

use super::error::PipelineError;
use crate::tools::ensure_directory_exists;
use anyhow::{Context, Result, anyhow, bail};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 工作分塊
///
/// `index` 是時間軸上的序號，下游的偵測、規劃與輸出命名都依賴它。
#[derive(Debug, Clone)]
pub struct Chunk {
    pub path: PathBuf,
    pub index: usize,
    pub source_stem: String,
}

impl Chunk {
    /// 分塊識別名，快取檔與輸出片段的命名基底
    #[must_use]
    pub fn stem(&self) -> String {
        format!("{}_chunk_{:03}", self.source_stem, self.index)
    }

    /// 分塊檔案的副檔名（含點），沿用來源容器
    #[must_use]
    pub fn extension(&self) -> String {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .map_or_else(|| ".mp4".to_string(), |e| format!(".{e}"))
    }
}

/// 將來源影片切成固定長度的分塊
///
/// 失敗時整部來源放棄（`SplitFailed`），不影響其他來源的處理。
pub fn split_into_chunks(
    source: &Path,
    chunk_length_secs: u64,
    work_dir: &Path,
) -> Result<Vec<Chunk>, PipelineError> {
    split_inner(source, chunk_length_secs, work_dir).map_err(|e| PipelineError::SplitFailed {
        source_path: source.to_path_buf(),
        source: e,
    })
}

fn split_inner(source: &Path, chunk_length_secs: u64, work_dir: &Path) -> Result<Vec<Chunk>> {
    ensure_directory_exists(work_dir)?;

    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("無法取得來源檔名: {}", source.display()))?
        .to_string();
    let extension = source
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("mp4");

    let output_pattern = work_dir.join(format!("{stem}_chunk_%03d.{extension}"));

    info!("切割來源影片: {} (每塊 {chunk_length_secs}s)", source.display());

    // 串流複製不重新編碼；reset_timestamps 讓每個分塊的時間戳
    // 從零起算，偵測到的轉場時間才會落在 [0, 分塊長度) 內
    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-i"])
        .arg(source)
        .args([
            "-c:v",
            "copy",
            "-an",
            "-map",
            "0",
            "-segment_time",
            &chunk_length_secs.to_string(),
            "-reset_timestamps",
            "1",
            "-f",
            "segment",
        ])
        .arg(&output_pattern)
        .output()
        .with_context(|| format!("無法執行 ffmpeg 切塊: {}", source.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffmpeg 切塊失敗: {}", stderr.trim());
    }

    let chunks = collect_chunk_files(work_dir, &stem, extension)?;
    if chunks.is_empty() {
        bail!("切塊後找不到任何分塊檔案: {}", work_dir.display());
    }

    debug!("來源 {} 切出 {} 個分塊", source.display(), chunks.len());

    Ok(chunks)
}

/// 收集工作目錄中屬於指定來源的分塊檔，依序號排序
///
/// segment muxer 依序寫出檔案，但目錄列舉順序沒有保證，
/// 一律自檔名解析序號後重新排序。
fn collect_chunk_files(work_dir: &Path, source_stem: &str, extension: &str) -> Result<Vec<Chunk>> {
    let prefix = format!("{source_stem}_chunk_");
    let suffix = format!(".{extension}");

    let mut chunks: Vec<Chunk> = fs::read_dir(work_dir)
        .with_context(|| format!("無法讀取工作目錄: {}", work_dir.display()))?
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            let file_name = entry.file_name().to_string_lossy().to_string();
            let index = parse_chunk_index(&file_name, &prefix, &suffix)?;
            Some(Chunk {
                path: entry.path(),
                index,
                source_stem: source_stem.to_string(),
            })
        })
        .collect();

    chunks.sort_by_key(|chunk| chunk.index);
    Ok(chunks)
}

/// 從分塊檔名解析序號，格式不符時回傳 None
fn parse_chunk_index(file_name: &str, prefix: &str, suffix: &str) -> Option<usize> {
    let digits = file_name.strip_prefix(prefix)?.strip_suffix(suffix)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
