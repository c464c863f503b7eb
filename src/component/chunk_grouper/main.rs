use super::grouping::{GroupResult, group_numbered_files};
use anyhow::Result;
use console::style;
use dialoguer::Input;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 片段分組元件
pub struct ChunkGrouper {
    shutdown_signal: Arc<AtomicBool>,
}

impl ChunkGrouper {
    pub const fn new(shutdown_signal: Arc<AtomicBool>) -> Self {
        Self { shutdown_signal }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== 片段分組 ===").cyan().bold());

        let input_path = self.prompt_input_path()?;
        let directory = PathBuf::from(&input_path);

        println!("{}", style("依分塊編號分組中...").cyan());
        let result = group_numbered_files(&directory, &self.shutdown_signal)?;

        self.print_result(&result);

        Ok(())
    }

    fn prompt_input_path(&self) -> Result<String> {
        let path: String = Input::new()
            .with_prompt("請輸入片段資料夾路徑")
            .interact_text()?;
        Ok(path.trim().to_string())
    }

    fn print_result(&self, result: &GroupResult) {
        println!();
        println!("{}", style("=== 處理結果 ===").cyan().bold());
        println!("  符合命名的檔案: {} 個", result.total_files);
        println!("  已移動: {} 個", style(result.moved).green());

        if result.skipped > 0 {
            println!("  已跳過（目標已存在）: {} 個", style(result.skipped).dim());
        }
        if result.errors > 0 {
            println!("  失敗: {} 個", style(result.errors).red());
        }

        info!(
            "片段分組完成 - 移動: {}, 跳過: {}, 失敗: {}",
            result.moved, result.skipped, result.errors
        );
    }
}
