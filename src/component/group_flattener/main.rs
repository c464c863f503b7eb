use super::flattener::{FlattenResult, flatten_groups};
use anyhow::Result;
use console::style;
use dialoguer::Input;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 群組攤平元件
pub struct GroupFlattener {
    shutdown_signal: Arc<AtomicBool>,
}

impl GroupFlattener {
    pub const fn new(shutdown_signal: Arc<AtomicBool>) -> Self {
        Self { shutdown_signal }
    }

    pub fn run(&self) -> Result<()> {
        println!("{}", style("=== 群組攤平 ===").cyan().bold());

        let parent_path = self.prompt_parent_path()?;
        let parent = PathBuf::from(&parent_path);

        let dest_path = self.prompt_dest_path()?;
        let dest = PathBuf::from(&dest_path);

        println!("{}", style("攤平群組資料夾中...").cyan());
        let result = flatten_groups(&parent, &dest, &self.shutdown_signal)?;

        self.print_result(&result);

        Ok(())
    }

    fn prompt_parent_path(&self) -> Result<String> {
        let path: String = Input::new()
            .with_prompt("請輸入群組資料夾的上層路徑")
            .interact_text()?;
        Ok(path.trim().to_string())
    }

    fn prompt_dest_path(&self) -> Result<String> {
        let path: String = Input::new()
            .with_prompt("請輸入合併輸出資料夾路徑")
            .interact_text()?;
        Ok(path.trim().to_string())
    }

    fn print_result(&self, result: &FlattenResult) {
        println!();
        println!("{}", style("=== 處理結果 ===").cyan().bold());
        println!("  掃描檔案: {} 個", result.total_files);
        println!("  已移動: {} 個", style(result.moved).green());

        if result.skipped > 0 {
            println!("  已跳過（目標已存在）: {} 個", style(result.skipped).dim());
        }
        if result.errors > 0 {
            println!("  失敗: {} 個", style(result.errors).red());
        }

        info!(
            "群組攤平完成 - 移動: {}, 跳過: {}, 失敗: {}",
            result.moved, result.skipped, result.errors
        );
    }
}
