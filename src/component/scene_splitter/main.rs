use super::pipeline::{PipelineReport, SceneSplitOptions, run_pipeline};
use crate::config::Config;
use crate::config::save::{add_recent_path, save_settings};
use crate::tools::validate_directory_exists;
use anyhow::Result;
use console::style;
use dialoguer::Input;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 場景切割元件
pub struct SceneClipSplitter {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl SceneClipSplitter {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== 場景切割 ===").cyan().bold());

        let input_path = self.prompt_input_path()?;
        let input_dir = PathBuf::from(&input_path);
        validate_directory_exists(&input_dir)?;

        // 記錄最近使用的路徑
        let mut settings_snapshot = self.config.settings.clone();
        add_recent_path(&mut settings_snapshot, &input_path);
        save_settings(&settings_snapshot)?;

        let output_path = self.prompt_output_path()?;
        let output_dir = PathBuf::from(&output_path);

        let settings = &self.config.settings.scene_split;
        println!(
            "{}",
            style(format!(
                "政策: 閾值 {}, 片段 {}-{}s, 修剪 {}/{}s, 分塊 {}s, 工作程序 {}",
                settings.scene_threshold,
                settings.min_clip_secs,
                settings.max_clip_secs,
                settings.offset_start,
                settings.offset_end,
                settings.chunk_length_secs,
                settings.render_workers
            ))
            .dim()
        );

        let options = SceneSplitOptions::from_settings(input_dir, output_dir, settings);
        let report = run_pipeline(&options, &self.config.file_type_table, &self.shutdown_signal)?;

        if report.total_sources == 0 {
            println!("{}", style("找不到任何影片檔案").yellow());
            return Ok(());
        }

        self.print_summary(&report);

        Ok(())
    }

    fn prompt_input_path(&self) -> Result<String> {
        let path: String = Input::new()
            .with_prompt("請輸入影片資料夾路徑")
            .interact_text()?;
        Ok(path.trim().to_string())
    }

    fn prompt_output_path(&self) -> Result<String> {
        let path: String = Input::new()
            .with_prompt("請輸入片段輸出資料夾路徑")
            .interact_text()?;
        Ok(path.trim().to_string())
    }

    fn print_summary(&self, report: &PipelineReport) {
        println!();
        println!("{}", style("=== 場景切割摘要 ===").cyan().bold());
        println!("  來源影片: {} 部", report.total_sources);
        println!("  完成: {} 部", style(report.sources_done).green());
        if report.sources_failed > 0 {
            println!("  失敗: {} 部", style(report.sources_failed).red());
        }
        println!("  處理分塊: {} 個", report.chunks_processed);
        if report.chunks_skipped > 0 {
            println!("  跳過分塊: {} 個", style(report.chunks_skipped).yellow());
        }
        println!("  輸出片段: {} 個", style(report.clips_rendered).green());

        if !report.failed_clips.is_empty() {
            println!(
                "  編碼失敗: {} 個",
                style(report.failed_clips.len()).red()
            );

            // 只顯示前 10 個
            let display_count = report.failed_clips.len().min(10);
            for failed in report.failed_clips.iter().take(display_count) {
                println!(
                    "    {} {} 序號 {}",
                    style("✗").red(),
                    failed.chunk_stem,
                    failed.ordinal
                );
            }
            if report.failed_clips.len() > display_count {
                println!(
                    "    {} ...還有 {} 個",
                    style("⋯").dim(),
                    report.failed_clips.len() - display_count
                );
            }
        }

        info!(
            "場景切割摘要 - 來源: {}/{}, 片段: {}, 編碼失敗: {}",
            report.sources_done,
            report.total_sources,
            report.clips_rendered,
            report.failed_clips.len()
        );
    }
}
