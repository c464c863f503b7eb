//! 片段編碼
//!
//! 把規劃好的區間從分塊中剪出並重新編碼。輸出先寫到暫存檔名，
//! 成功後才原子改名，中斷時已完成的片段永遠是完整檔案。

use super::chunk_splitter::Chunk;
use super::clip_planner::ClipInterval;
use super::error::PipelineError;
use anyhow::{Context, Result, bail};
use indicatif::ProgressBar;
use log::{debug, error};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// 單一片段的編碼任務
#[derive(Debug, Clone)]
pub struct RenderTask {
    pub chunk_path: PathBuf,
    pub chunk_stem: String,
    pub interval: ClipInterval,
    pub output_path: PathBuf,
}

/// 編碼結果
#[derive(Debug)]
pub struct RenderResult {
    pub output_path: PathBuf,
    pub chunk_stem: String,
    pub ordinal: usize,
    pub success: bool,
    pub error_message: Option<String>,
}

/// 為分塊的所有區間建立編碼任務
///
/// 輸出檔名只由（分塊識別名、區間序號）決定，
/// 平行執行的完成順序不影響命名。
#[must_use]
pub fn create_render_tasks(
    chunk: &Chunk,
    intervals: &[ClipInterval],
    output_dir: &Path,
) -> Vec<RenderTask> {
    let stem = chunk.stem();
    let extension = chunk.extension();

    intervals
        .iter()
        .map(|interval| RenderTask {
            chunk_path: chunk.path.clone(),
            chunk_stem: stem.clone(),
            interval: interval.clone(),
            output_path: output_dir
                .join(format!("{stem}_clip_{:03}{extension}", interval.ordinal)),
        })
        .collect()
}

/// 編碼單一片段
///
/// 固定使用無音訊、closed-GOP 的硬體編碼設定；下游資料集
/// 流程要求片段不含音軌且關鍵幀密集，這不開放呼叫端調整。
pub fn render_clip(task: &RenderTask) -> Result<(), PipelineError> {
    render_inner(task).map_err(|e| PipelineError::EncodeFailed {
        chunk_stem: task.chunk_stem.clone(),
        ordinal: task.interval.ordinal,
        source: e,
    })
}

fn render_inner(task: &RenderTask) -> Result<()> {
    let temp_path = render_temp_path(&task.output_path);

    debug!(
        "編碼片段 {} [{:.3}s - {:.3}s]",
        task.output_path.display(),
        task.interval.start,
        task.interval.end
    );

    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-loglevel", "error", "-y", "-hwaccel", "cuda", "-i"])
        .arg(&task.chunk_path)
        .args([
            "-ss",
            &format!("{:.3}", task.interval.start),
            "-to",
            &format!("{:.3}", task.interval.end),
            "-c:v",
            "h264_nvenc",
            "-preset",
            "p1",
            "-cq",
            "28",
            "-g",
            "999",
            "-bf",
            "0",
            "-an",
        ])
        .arg(&temp_path)
        .output()
        .with_context(|| format!("無法執行 ffmpeg 編碼: {}", task.chunk_path.display()))?;

    if !output.status.success() {
        // 失敗的暫存檔不保留
        if temp_path.exists() {
            let _ = fs::remove_file(&temp_path);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("ffmpeg 編碼失敗: {}", stderr.trim());
    }

    fs::rename(&temp_path, &task.output_path).with_context(|| {
        format!(
            "無法改名暫存輸出: {} -> {}",
            temp_path.display(),
            task.output_path.display()
        )
    })?;

    Ok(())
}

/// 暫存輸出路徑：同目錄、隱藏檔名、保留原始副檔名
///
/// 副檔名必須留在結尾，ffmpeg 依它推斷輸出容器格式。
fn render_temp_path(output_path: &Path) -> PathBuf {
    let file_name = output_path
        .file_name()
        .map_or_else(|| "clip".to_string(), |n| n.to_string_lossy().to_string());
    let unique = Uuid::new_v4().simple().to_string();

    output_path.with_file_name(format!(".tmp_{}_{file_name}", &unique[..8]))
}

/// 以固定上限的工作池平行編碼所有任務
///
/// 每個任務各自啟動一個外部 ffmpeg 程序，池大小就是同時存在的
/// 編碼程序數上限。收到中斷訊號後，尚未開始的任務直接標記取消。
pub fn render_clips_parallel(
    tasks: &[RenderTask],
    workers: usize,
    shutdown_signal: &Arc<AtomicBool>,
) -> Result<Vec<RenderResult>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .context("無法建立編碼工作池")?;

    let bar = ProgressBar::new(tasks.len() as u64);

    let results = pool.install(|| {
        tasks
            .par_iter()
            .map(|task| {
                if shutdown_signal.load(Ordering::SeqCst) {
                    bar.inc(1);
                    return RenderResult {
                        output_path: task.output_path.clone(),
                        chunk_stem: task.chunk_stem.clone(),
                        ordinal: task.interval.ordinal,
                        success: false,
                        error_message: Some("操作已取消".to_string()),
                    };
                }

                let result = render_clip(task);
                bar.inc(1);

                match result {
                    Ok(()) => RenderResult {
                        output_path: task.output_path.clone(),
                        chunk_stem: task.chunk_stem.clone(),
                        ordinal: task.interval.ordinal,
                        success: true,
                        error_message: None,
                    },
                    Err(e) => {
                        error!("{e:#}");
                        RenderResult {
                            output_path: task.output_path.clone(),
                            chunk_stem: task.chunk_stem.clone(),
                            ordinal: task.interval.ordinal,
                            success: false,
                            error_message: Some(format!("{e:#}")),
                        }
                    }
                }
            })
            .collect()
    });

    bar.finish_and_clear();

    Ok(results)
}
