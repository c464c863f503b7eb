//! 場景轉場偵測（含快取層）
//!
//! 以 ffmpeg 的 scene 濾鏡取得分塊內的轉場時間點。每個分塊的結果
//! 持久化為一行一值的快取檔。快取存在即為權威，直接載入並跳過
//! 偵測；只有快取不存在才會重新計算。

use super::chunk_splitter::Chunk;
use super::error::PipelineError;
use anyhow::{Context, Result, bail};
use log::{debug, info};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 相鄰轉場點視為同一轉場的容差（秒）
const DEDUP_EPSILON: f64 = 0.001;

/// 分塊的快取檔路徑，由分塊識別名決定
#[must_use]
pub fn cache_path_for(chunk: &Chunk, cache_dir: &Path) -> PathBuf {
    cache_dir.join(format!("{}_scenes.txt", chunk.stem()))
}

/// 取得分塊內的轉場時間點（嚴格遞增的秒數位移）
///
/// 回傳空列表代表「未偵測到轉場」，這不是錯誤，規劃器會把
/// 整個分塊視為單一視窗處理。偵測結果（含空列表）會先寫入
/// 快取再回傳，重複執行同一分塊不會再呼叫外部引擎。
pub fn detect_transitions(
    chunk: &Chunk,
    scene_threshold: f64,
    cache_dir: &Path,
) -> Result<Vec<f64>, PipelineError> {
    detect_inner(chunk, scene_threshold, cache_dir).map_err(|e| PipelineError::DetectionFailed {
        chunk_path: chunk.path.clone(),
        source: e,
    })
}

fn detect_inner(chunk: &Chunk, scene_threshold: f64, cache_dir: &Path) -> Result<Vec<f64>> {
    let cache_path = cache_path_for(chunk, cache_dir);

    if cache_path.exists() {
        debug!("載入轉場快取: {}", cache_path.display());
        return load_cached_timestamps(&cache_path);
    }

    info!("偵測轉場中: {}", chunk.path.display());

    let filter = format!("select='gt(scene,{scene_threshold})',showinfo");

    // showinfo 把每個通過 select 的幀資訊印到 stderr，
    // 其中的 pts_time 即為轉場時間點
    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-hwaccel", "cuda", "-i"])
        .arg(&chunk.path)
        .args(["-filter_complex", &filter, "-vsync", "vfr", "-f", "null", "-"])
        .output()
        .with_context(|| format!("無法執行 ffmpeg 場景偵測: {}", chunk.path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffmpeg 場景偵測失敗: {}", last_lines(&stderr, 5));
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let timestamps = parse_pts_timestamps(&stderr)?;

    if timestamps.is_empty() {
        info!("未偵測到任何轉場: {}", chunk.path.display());
    } else {
        debug!("偵測到 {} 個轉場點", timestamps.len());
    }

    save_timestamps(&cache_path, &timestamps)?;

    Ok(timestamps)
}

/// 解析 ffmpeg 診斷輸出中的 pts_time 標記
///
/// 濾鏡照播放順序輸出，但這裡不依賴該行為，一律排序並去除
/// 幾乎重合的時間點。
fn parse_pts_timestamps(output: &str) -> Result<Vec<f64>> {
    let pts_regex = Regex::new(r"pts_time:([0-9]+\.?[0-9]*)")?;

    let mut timestamps: Vec<f64> = output
        .lines()
        .filter_map(|line| {
            pts_regex
                .captures(line)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<f64>().ok())
        })
        .collect();

    timestamps.sort_by(|a, b| a.partial_cmp(b).unwrap());
    timestamps.dedup_by(|a, b| (*a - *b).abs() < DEDUP_EPSILON);

    Ok(timestamps)
}

/// 讀取快取檔（一行一個十進位秒數值）
fn load_cached_timestamps(cache_path: &Path) -> Result<Vec<f64>> {
    let content = fs::read_to_string(cache_path)
        .with_context(|| format!("無法讀取轉場快取: {}", cache_path.display()))?;

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.parse::<f64>()
                .with_context(|| format!("快取內容無法解析為秒數: {line}"))
        })
        .collect()
}

/// 將時間點寫入快取檔
fn save_timestamps(cache_path: &Path, timestamps: &[f64]) -> Result<()> {
    let mut content = String::new();
    for ts in timestamps {
        content.push_str(&format!("{ts}\n"));
    }

    fs::write(cache_path, content)
        .with_context(|| format!("無法寫入轉場快取: {}", cache_path.display()))
}

/// 取 stderr 的最後幾行當作錯誤摘要，避免整份診斷輸出進入日誌
fn last_lines(text: &str, count: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].join("\n")
}
