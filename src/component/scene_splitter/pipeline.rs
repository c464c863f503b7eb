//! 場景切割管線調度
//!
//! 每部來源影片依序經過：切塊 → 逐分塊（偵測 → 規劃）→ 平行編碼
//! → 清理工作檔。規劃是單執行緒的，編碼在固定上限的工作池上
//! 平行執行；清理一定等所有編碼任務結束後才進行。
//! 分塊與片段層級的錯誤只記錄，不中止整體執行。

use super::chunk_splitter::{Chunk, split_into_chunks};
use super::clip_planner::{ClipPolicy, plan_clips};
use super::clip_renderer::{RenderTask, create_render_tasks, render_clips_parallel};
use super::transition_detector::{cache_path_for, detect_transitions};
use crate::config::{FileTypeTable, SceneSplitSettings};
use crate::tools::{
    VideoFileInfo, ensure_directory_exists, get_video_duration, scan_video_files,
    validate_directory_exists,
};
use anyhow::Result;
use console::style;
use log::{error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 一次管線執行的完整參數
///
/// 工作目錄是明確參數而非固定慣例，測試可以指向獨立的暫存目錄。
#[derive(Debug, Clone)]
pub struct SceneSplitOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// 分塊檔與轉場快取的工作目錄
    pub work_dir: PathBuf,
    pub scene_threshold: f64,
    pub min_clip_secs: f64,
    pub max_clip_secs: f64,
    pub offset_start: f64,
    pub offset_end: f64,
    pub chunk_length_secs: u64,
    pub render_workers: usize,
}

impl SceneSplitOptions {
    /// 由持久化設定組出管線參數
    #[must_use]
    pub fn from_settings(
        input_dir: PathBuf,
        output_dir: PathBuf,
        settings: &SceneSplitSettings,
    ) -> Self {
        let work_dir = output_dir.join("temp_chunks");
        Self {
            input_dir,
            output_dir,
            work_dir,
            scene_threshold: settings.scene_threshold,
            min_clip_secs: settings.min_clip_secs,
            max_clip_secs: settings.max_clip_secs,
            offset_start: settings.offset_start,
            offset_end: settings.offset_end,
            chunk_length_secs: settings.chunk_length_secs,
            render_workers: settings.render_workers,
        }
    }

    #[must_use]
    pub const fn policy(&self) -> ClipPolicy {
        ClipPolicy {
            offset_start: self.offset_start,
            offset_end: self.offset_end,
            min_secs: self.min_clip_secs,
            max_secs: self.max_clip_secs,
        }
    }
}

/// 單一片段編碼失敗的記錄
#[derive(Debug)]
pub struct FailedClip {
    pub chunk_stem: String,
    pub ordinal: usize,
    pub error_message: String,
}

/// 管線執行報告
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub total_sources: usize,
    pub sources_done: usize,
    pub sources_failed: usize,
    pub chunks_processed: usize,
    pub chunks_skipped: usize,
    pub clips_rendered: usize,
    pub failed_clips: Vec<FailedClip>,
}

/// 執行場景切割管線
///
/// 只有兩種情況在開工前直接失敗：輸入資料夾不存在、
/// 片段長度政策無效。其餘錯誤都記錄在報告中。
pub fn run_pipeline(
    options: &SceneSplitOptions,
    file_type_table: &FileTypeTable,
    shutdown_signal: &Arc<AtomicBool>,
) -> Result<PipelineReport> {
    options.policy().validate()?;
    validate_directory_exists(&options.input_dir)?;
    ensure_directory_exists(&options.output_dir)?;

    let video_files = scan_video_files(&options.input_dir, file_type_table)?;

    let mut report = PipelineReport {
        total_sources: video_files.len(),
        ..PipelineReport::default()
    };

    info!(
        "開始場景切割: {} 部影片, 閾值 {}, 片段 {}-{}s",
        video_files.len(),
        options.scene_threshold,
        options.min_clip_secs,
        options.max_clip_secs
    );

    for (index, video) in video_files.iter().enumerate() {
        if shutdown_signal.load(Ordering::SeqCst) {
            warn!("收到中斷訊號，停止處理後續影片");
            break;
        }

        println!(
            "\n{} [{}/{}] {}",
            style("處理中").cyan(),
            index + 1,
            video_files.len(),
            style(video.path.display()).bold()
        );

        match process_source(video, options, shutdown_signal, &mut report) {
            Ok(()) => {
                report.sources_done += 1;
            }
            Err(e) => {
                report.sources_failed += 1;
                error!("{e:#}");
                println!("  {} 來源處理失敗: {e}", style("✗").red());
            }
        }
    }

    info!(
        "場景切割結束 - 完成: {}, 失敗: {}, 片段: {}, 編碼失敗: {}",
        report.sources_done,
        report.sources_failed,
        report.clips_rendered,
        report.failed_clips.len()
    );

    Ok(report)
}

/// 處理單一來源影片：切塊、逐分塊規劃、平行編碼、清理
///
/// 回傳 Err 代表整部來源失敗（實務上只有切塊階段會走到這裡），
/// 之後的分塊與片段層級錯誤都收進報告。
fn process_source(
    video: &VideoFileInfo,
    options: &SceneSplitOptions,
    shutdown_signal: &Arc<AtomicBool>,
    report: &mut PipelineReport,
) -> Result<()> {
    // Stage A: 切塊
    print!("  {} 切割工作分塊...", style("A").dim());
    let chunks = split_into_chunks(&video.path, options.chunk_length_secs, &options.work_dir)?;
    println!(" {} 個分塊", chunks.len());

    // Stage B: 逐分塊偵測轉場並規劃區間。規劃依賴完整的時間點
    // 列表，必須循序進行
    print!("  {} 偵測轉場並規劃片段...", style("B").dim());
    let mut tasks: Vec<RenderTask> = Vec::new();
    let policy = options.policy();

    for chunk in &chunks {
        if shutdown_signal.load(Ordering::SeqCst) {
            warn!("收到中斷訊號，停止規劃後續分塊");
            break;
        }

        let duration = match get_video_duration(&chunk.path) {
            Ok(d) => d,
            Err(e) => {
                warn!("無法取得分塊長度，跳過 {}: {e:#}", chunk.path.display());
                report.chunks_skipped += 1;
                continue;
            }
        };

        let timestamps = match detect_transitions(chunk, options.scene_threshold, &options.work_dir)
        {
            Ok(ts) => ts,
            Err(e) => {
                warn!("{e:#}");
                report.chunks_skipped += 1;
                continue;
            }
        };

        // 政策已在開工前驗證過，這裡不會再因 InvalidPolicy 失敗
        let intervals = plan_clips(&timestamps, duration, &policy)?;
        tasks.extend(create_render_tasks(chunk, &intervals, &options.output_dir));
        report.chunks_processed += 1;
    }
    println!(" {} 個片段", tasks.len());

    // Stage C: 平行編碼，join 之後才會繼續往下走
    println!(
        "  {} 編碼中（{} 個工作程序）...",
        style("C").dim(),
        options.render_workers
    );

    let results = render_clips_parallel(&tasks, options.render_workers, shutdown_signal)?;

    for result in results {
        if result.success {
            report.clips_rendered += 1;
        } else {
            report.failed_clips.push(FailedClip {
                chunk_stem: result.chunk_stem,
                ordinal: result.ordinal,
                error_message: result
                    .error_message
                    .unwrap_or_else(|| "未知錯誤".to_string()),
            });
        }
    }

    // Stage D: 清理。中斷時保留分塊與快取，重跑可直接沿用
    if shutdown_signal.load(Ordering::SeqCst) {
        warn!("因中斷保留工作檔: {}", options.work_dir.display());
        return Ok(());
    }

    print!("  {} 清理工作檔...", style("D").dim());
    cleanup_source(&chunks, &options.work_dir);
    println!(" 完成");

    Ok(())
}

/// 刪除來源的分塊檔與轉場快取
///
/// 只在該來源的所有編碼任務結束後呼叫；快取的生命週期
/// 僅限一次執行，不是常駐索引。
fn cleanup_source(chunks: &[Chunk], work_dir: &Path) {
    for chunk in chunks {
        if let Err(e) = fs::remove_file(&chunk.path) {
            warn!("無法刪除分塊檔 {}: {e}", chunk.path.display());
        }

        let cache_path = cache_path_for(chunk, work_dir);
        if cache_path.exists()
            && let Err(e) = fs::remove_file(&cache_path)
        {
            warn!("無法刪除轉場快取 {}: {e}", cache_path.display());
        }
    }

    // 最後一部影片處理完後工作目錄應已清空；還有別的檔案就留著
    let _ = fs::remove_dir(work_dir);
}
